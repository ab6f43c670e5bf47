/*
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use xbps_dbulk::{default_distdir, run, Config};

fn print_usage() {
    let called_as = std::env::args().next();
    eprintln!(
        r#"usage: {} [-d] [-D distdir] [-j jobs] [-n] [-t tool] [target ...]

if no targets are given, every package under <distdir>/srcpkgs is planned.

options:
  --version     print version ("{}")

  -D DIR   source-distribution root [default={}]
  -j N     maximum concurrent jobs [default=1]
  -n       dry run: mark Builds completed without spawning
  -t NAME  select an alternate tool mode (reserved; skips the build loop)
  -d       print one line per planner decision on stderr
  --stats  dump timing counters on exit
"#,
        called_as.as_deref().unwrap_or("xbps-dbulk"),
        env!("CARGO_PKG_VERSION"),
        default_distdir().display(),
    );
}

fn main() -> anyhow::Result<()> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        print_usage();
        std::process::exit(1);
    }
    if args.contains("--version") {
        println!("{}", env!("CARGO_PKG_VERSION"));
        std::process::exit(0);
    }

    let config = Config {
        distdir: args
            .opt_value_from_str("-D")?
            .unwrap_or_else(default_distdir),
        maxjobs: args.opt_value_from_str("-j")?.unwrap_or(1),
        dryrun: args.contains("-n"),
        explain: args.contains("-d"),
        stats: args.contains("--stats"),
        tool_mode: args.opt_value_from_str("-t")?,
        targets: args.free()?,
    };

    run(config)
}
