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

use std::{future::Future, pin::Pin, rc::Rc};

use futures::future::select_all;
use tokio::{runtime::Builder, sync::Semaphore, task::LocalSet};

use dbulk_fs::DiskInterface;
use dbulk_model::{BuildId, Context};

use crate::{error::JobError, printer::Printer, spawn};

/// Which half of a Build's lifecycle a ready entry represents: extraction
/// (dep metadata unknown) or the actual package build.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum JobKind {
    Extract(BuildId),
    Build(BuildId),
}

impl JobKind {
    pub(crate) fn build_id(self) -> BuildId {
        match self {
            JobKind::Extract(id) | JobKind::Build(id) => id,
        }
    }

    pub(crate) fn action(self) -> &'static str {
        match self {
            JobKind::Extract(_) => "extract",
            JobKind::Build(_) => "build",
        }
    }
}

type PendingJob = Pin<Box<dyn Future<Output = (JobKind, Result<bool, JobError>)>>>;

/// Drives the ready queue to completion on a single-threaded tokio runtime,
/// mirroring `ParallelTopoScheduler::schedule_internal`: pop everything
/// currently ready, turn each into a future gated by a `maxjobs`-sized
/// semaphore, then reap the first to finish and repeat.
pub fn run(ctx: &mut Context, disk: &impl DiskInterface) -> Result<(), JobError> {
    if ctx.config.dryrun {
        return run_dry(ctx);
    }

    let local_set = LocalSet::new();
    let mut runtime = Builder::new()
        .basic_scheduler()
        .enable_all()
        .build()
        .expect("failed to build the job pool's tokio runtime");

    // Owned rather than borrowed: the pending futures below are boxed as
    // `dyn Future + 'static` to unify extract/build's distinct anonymous
    // types, so the permit they hold must not borrow from this stack frame.
    // `LocalSet` keeps everything on one thread, so `Rc` (not `Arc`) suffices.
    let sem = Rc::new(Semaphore::new(ctx.config.maxjobs.max(1)));
    let mut printer = Printer::default();

    local_set.block_on(&mut runtime, drive(ctx, disk, sem, &mut printer))
}

async fn drive(
    ctx: &mut Context,
    disk: &impl DiskInterface,
    sem: Rc<Semaphore>,
    printer: &mut Printer,
) -> Result<(), JobError> {
    let mut pending: Vec<PendingJob> = Vec::new();

    loop {
        while let Some(build_id) = ctx.ready.pop_front() {
            let kind = if ctx.build(build_id).flags.deps {
                JobKind::Build(build_id)
            } else {
                JobKind::Extract(build_id)
            };
            let fut = prepare(ctx, kind)?;
            let sem = Rc::clone(&sem);
            pending.push(Box::pin(async move {
                let _permit = sem.acquire().await;
                (kind, fut.await)
            }));
        }

        if pending.is_empty() {
            break;
        }

        let ((kind, outcome), _, left) = select_all(pending).await;
        pending = left;

        let success = finish(ctx, disk, kind, outcome)?;
        printer.finished(kind, ctx, success);
    }

    Ok(())
}

type Job = Pin<Box<dyn Future<Output = Result<bool, JobError>>>>;

fn prepare(ctx: &Context, kind: JobKind) -> Result<Job, JobError> {
    match kind {
        JobKind::Extract(build_id) => {
            let job = spawn::prepare_extract(ctx, build_id);
            Ok(Box::pin(spawn::run_extract(job)))
        }
        JobKind::Build(build_id) => {
            let job = spawn::prepare_build(ctx, build_id)?;
            Ok(Box::pin(spawn::run_build(job)))
        }
    }
}

/// Folds a finished job's outcome back into the plan: a successful
/// extraction re-enters the planner on the same `(name, builder)` so the
/// freshly-loaded `.dep` file can schedule the build (and its newly
/// discovered dependencies); a successful build unblocks its dependents
/// through the owning name and every subpackage name it produced.
fn finish(
    ctx: &mut Context,
    disk: &impl DiskInterface,
    kind: JobKind,
    outcome: Result<bool, JobError>,
) -> Result<bool, JobError> {
    ctx.numfinished += 1;
    let success = outcome?;
    if !success {
        ctx.numfailed += 1;
        return Ok(false);
    }

    match kind {
        JobKind::Extract(build_id) => {
            ctx.build_mut(build_id).flags.work = false;
            let name = ctx.build(build_id).name;
            let builder = ctx.build(build_id).builder;
            dbulk_plan::plan(ctx, disk, name, builder)?;
        }
        JobKind::Build(build_id) => {
            ctx.build_mut(build_id).flags.dirty = false;
            let name = ctx.build(build_id).name;
            let subpackages = ctx.build(build_id).subpackages.clone();
            dbulk_plan::done(ctx, name);
            for sub in subpackages {
                dbulk_plan::done(ctx, sub);
            }
        }
    }

    Ok(true)
}

/// `-n`: pops the ready queue without spawning anything, invoking the
/// builder-completion path on every pop regardless of job kind.
fn run_dry(ctx: &mut Context) -> Result<(), JobError> {
    while let Some(build_id) = ctx.ready.pop_front() {
        ctx.numfinished += 1;
        ctx.build_mut(build_id).flags.dirty = false;
        let name = ctx.build(build_id).name;
        let subpackages = ctx.build(build_id).subpackages.clone();
        dbulk_plan::done(ctx, name);
        for sub in subpackages {
            dbulk_plan::done(ctx, sub);
        }
    }
    Ok(())
}
