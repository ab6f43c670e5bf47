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

use std::path::PathBuf;

use anyhow::Context as _;

use dbulk_fs::SystemDisk;
use dbulk_model::Context;

#[derive(Debug)]
pub struct Config {
    pub distdir: PathBuf,
    pub maxjobs: usize,
    pub dryrun: bool,
    /// `-d`: enable the planner's one-line-per-decision stderr traces.
    pub explain: bool,
    /// `--stats`: dump `dbulk-metrics` timing counters on exit. Not part of
    /// the driver's own CLI surface in spec.md, so it gets its own flag
    /// rather than riding along on `-d`.
    pub stats: bool,
    pub tool_mode: Option<String>,
    pub targets: Vec<String>,
}

/// `$HOME/void-packages`, the default distribution root. Falls
/// back to the current directory if `$HOME` isn't set, rather than failing
/// CLI parsing outright.
pub fn default_distdir() -> PathBuf {
    std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join("void-packages"))
        .unwrap_or_else(|| PathBuf::from("void-packages"))
}

pub fn run(config: Config) -> anyhow::Result<()> {
    let explain = config.explain;
    if config.stats {
        dbulk_metrics::enable();
    }

    let tool = config.distdir.join("xbps-src");
    let model_config = dbulk_model::Config {
        distdir: config.distdir,
        maxjobs: config.maxjobs.max(1),
        dryrun: config.dryrun,
        explain,
        tool_mode: config.tool_mode,
        tool,
    };

    if let Some(mode) = &model_config.tool_mode {
        if explain {
            eprintln!("explain: -t {} selected, skipping the build loop", mode);
        }
        return Ok(());
    }

    let mut ctx = Context::new(model_config);
    let disk = SystemDisk;

    let targets = if config.targets.is_empty() {
        dbulk_fs::scan_all_packages(&ctx.config, &disk)
            .with_context(|| "scanning srcpkgs for targets")?
    } else {
        config.targets
    };

    // No `-a` flag on this driver's own CLI: the native builder's target
    // architecture is the arch this binary itself was built for, the same
    // assumption `xbps-src` makes about its own host when no `-a` override
    // is given.
    let native = ctx.intern_builder(std::env::consts::ARCH, None);

    for target in &targets {
        let name = ctx.intern_name(target);
        dbulk_plan::plan(&mut ctx, &disk, name, native).with_context(|| {
            format!("planning {}", target)
        })?;
    }

    dbulk_jobs::run(&mut ctx, &disk).with_context(|| "running the job pool")?;

    if config.stats {
        dbulk_metrics::dump();
    }

    Ok(())
}
