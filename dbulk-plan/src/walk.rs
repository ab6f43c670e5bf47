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

use dbulk_fs::DiskInterface;
use dbulk_model::{BuildFlags, BuildId, BuilderId, Context, Mtime, NameId};

use crate::error::PlanError;

/// What a recursive dependency walk found, from the point of view of the
/// caller that is about to fold the result into its own `nblock`.
enum Step {
    Flags(BuildFlags),
    /// The dependency re-entered a Build already on the walker's stack.
    /// Consumed by the immediate caller: it marks itself SKIP|DIRTY, emits
    /// its own trailing trace line, and does *not* forward the signal any
    /// further up: CYCLE only lives inside one subtree.
    Cycle,
}

fn explain(ctx: &Context, msg: std::fmt::Arguments) {
    if ctx.config.explain {
        eprintln!("{}", msg);
    }
}

/// Entry point: `plan(name, builder)`. Returns the final flag-set of
/// the visited Build.
pub fn plan(
    ctx: &mut Context,
    disk: &impl DiskInterface,
    name: NameId,
    builder: BuilderId,
) -> Result<BuildFlags, PlanError> {
    match plan_step(ctx, disk, name, builder)? {
        Step::Flags(flags) => Ok(flags),
        // Only reachable if the very first requested target is somehow
        // already mid-walk, which can't happen from a fresh top-level call;
        // handled defensively rather than asserted away.
        Step::Cycle => Ok(BuildFlags {
            skip: true,
            dirty: true,
            ..BuildFlags::default()
        }),
    }
}

fn plan_step(
    ctx: &mut Context,
    disk: &impl DiskInterface,
    name: NameId,
    builder: BuilderId,
) -> Result<Step, PlanError> {
    // Step 1: probe the template. A Missing template gets a sentinel Build,
    // marked SKIP|DIRTY, and planning returns immediately. The Build is
    // allocated before its flags are set, never the reverse.
    let mtime = dbulk_fs::probe_template(ctx, disk, name)?;
    if mtime.is_missing() {
        let build_id = ctx.new_missing_template_build(name, builder);
        explain(
            ctx,
            format_args!("explain {}: no template found", ctx.name(name).name),
        );
        return Ok(Step::Flags(ctx.build(build_id).flags));
    }

    // Step 2: resolve to the owning source and find/create its Build.
    let source = ctx.resolve_source(name);
    let build_id = ctx.get_or_create_build(source, builder);

    // Step 3: re-entry onto the walker's own stack is a cycle.
    if ctx.build(build_id).flags.cycle {
        ctx.build_mut(build_id).flags.mark_skip_dirty();
        eprintln!(" <- {}", ctx.name(source).name);
        return Ok(Step::Cycle);
    }

    // Step 4: already planned this run.
    if ctx.build(build_id).flags.work {
        return Ok(Step::Flags(ctx.build(build_id).flags));
    }

    // Step 5: admit to the plan.
    {
        let flags = &mut ctx.build_mut(build_id).flags;
        flags.cycle = true;
        flags.work = true;
        flags.dirty = false;
    }

    dbulk_fs::stat_dep_files(ctx, disk, build_id)?;
    let template_mtime = ctx.name(source).mtime;
    let dep_mtime = ctx.build(build_id).dep_mtime;
    let dep_error_mtime = ctx.build(build_id).dep_error_mtime;

    if dep_mtime.older_than(template_mtime) {
        if dep_error_mtime.older_than(template_mtime) {
            // No dep file, or one older than the template, and no recent
            // failure standing in the way: (re)extract.
            explain(
                ctx,
                format_args!(
                    "explain {}: dep file missing or older than template, scheduling extraction",
                    ctx.name(source).name
                ),
            );
            ctx.build_mut(build_id).flags.dirty = true;
            ctx.build_mut(build_id).nblock = 0;
            return Ok(Step::Flags(finish(ctx, build_id)));
        }
        // A previous extraction already failed against this exact template.
        explain(
            ctx,
            format_args!(
                "explain {}: template unchanged since previous extraction error",
                ctx.name(source).name
            ),
        );
        ctx.build_mut(build_id).flags.mark_skip_dirty();
        return Ok(Step::Flags(finish(ctx, build_id)));
    }

    // Dep file is fresh. Load it if this is the first time we've seen it.
    if !ctx.build(build_id).flags.deps {
        if let Err(err) = load_dep_file(ctx, disk, build_id) {
            explain(
                ctx,
                format_args!(
                    "explain {}: dep file parse error: {}",
                    ctx.name(source).name,
                    err
                ),
            );
            ctx.build_mut(build_id).flags.mark_skip_dirty();
            return Ok(Step::Flags(finish(ctx, build_id)));
        }
    }

    dbulk_fs::stat_log_files(ctx, disk, build_id)?;
    let log_mtime = ctx.build(build_id).log_mtime;
    let log_error_mtime = ctx.build(build_id).log_error_mtime;

    match log_mtime {
        Mtime::Missing if log_error_mtime.older_than(template_mtime) => {
            explain(
                ctx,
                format_args!(
                    "explain {}: no build log, or template changed since previous build error",
                    ctx.name(source).name
                ),
            );
            ctx.build_mut(build_id).flags.dirty = true;
        }
        Mtime::Missing => {
            explain(
                ctx,
                format_args!(
                    "explain {}: template unchanged since previous build error",
                    ctx.name(source).name
                ),
            );
            ctx.build_mut(build_id).flags.mark_skip_dirty();
        }
        _ => {
            // Log present and at least as new as the template: not dirty.
        }
    }

    // Recurse into dependencies. Host deps walk under the host builder
    // (the builder's own host if set, else itself); target deps walk under
    // the same builder.
    let host_builder = ctx.host_builder_of(builder);
    let host_deps = ctx.build(build_id).host_deps.clone();
    let target_deps = ctx.build(build_id).target_deps.clone();

    'recurse: for (dep_name, dep_builder) in host_deps
        .iter()
        .map(|n| (*n, host_builder))
        .chain(target_deps.iter().map(|n| (*n, builder)))
    {
        ctx.record_use(build_id, dep_name);
        match plan_step(ctx, disk, dep_name, dep_builder)? {
            Step::Cycle => {
                ctx.build_mut(build_id).flags.mark_skip_dirty();
                eprintln!(" <- {}", ctx.name(source).name);
                break 'recurse;
            }
            Step::Flags(flags) if flags.dirty => {
                ctx.build_mut(build_id).nblock += 1;
            }
            Step::Flags(_) => {}
        }
    }

    Ok(Step::Flags(finish(ctx, build_id)))
}

/// Parses the existing `.dep` file and populates the Build's version,
/// revision, and dependency/sub-package arrays. Re-used here for dep files
/// that are fresh without having gone through an extractor job in this run.
fn load_dep_file(
    ctx: &mut Context,
    disk: &impl DiskInterface,
    build_id: BuildId,
) -> Result<(), dbulk_depfile::ParseError> {
    let (dep_path, _) = dbulk_fs::dep_paths(ctx, build_id);
    let content = match disk.read_to_string(&dep_path) {
        Ok(content) => content,
        // The file was stat'd as present a moment ago; a concurrent removal
        // races with this read. Treat it the same as an empty dep file
        // rather than propagating a spurious Fatal.
        Err(_) => String::new(),
    };
    let parsed = dbulk_depfile::parse(&content)?;
    apply_dep_file(ctx, build_id, parsed);
    ctx.build_mut(build_id).flags.deps = true;
    Ok(())
}

fn apply_dep_file(ctx: &mut Context, build_id: BuildId, dep: dbulk_depfile::DepFile) {
    if let Some(version) = dep.version {
        ctx.build_mut(build_id).version = version;
    }
    if let Some(revision) = dep.revision {
        ctx.build_mut(build_id).revision = revision;
    }
    let host_deps: Vec<NameId> = dep
        .host_depends
        .iter()
        .map(|n| ctx.intern_name(n))
        .collect();
    let target_deps: Vec<NameId> = dep
        .target_depends
        .iter()
        .map(|n| ctx.intern_name(n))
        .collect();
    let subpackages: Vec<NameId> = dep
        .subpackages
        .iter()
        .map(|n| ctx.intern_name(n))
        .collect();
    let b = ctx.build_mut(build_id);
    b.host_deps = host_deps;
    b.target_deps = target_deps;
    b.subpackages = subpackages;
}

/// Epilogue shared by every return path: clears CYCLE,
/// propagates DIRTY to the owning name and its sub-packages, and enqueues
/// the Build if it is ready to run right now.
fn finish(ctx: &mut Context, build_id: BuildId) -> BuildFlags {
    ctx.build_mut(build_id).flags.cycle = false;
    let flags = ctx.build(build_id).flags;

    if flags.dirty {
        let name = ctx.build(build_id).name;
        ctx.name_mut(name).dirty = true;
        let subpackages = ctx.build(build_id).subpackages.clone();
        for sub in subpackages {
            ctx.name_mut(sub).dirty = true;
        }

        if !flags.skip && ctx.build(build_id).nblock == 0 {
            ctx.ready.push_back(build_id);
            ctx.numtotal += 1;
        }
    }

    flags
}
