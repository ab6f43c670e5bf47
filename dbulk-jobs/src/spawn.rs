use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Stdio,
};

use tokio::process::Command;

use dbulk_fs::FatalError;
use dbulk_metrics::scoped_metric;
use dbulk_model::{BuildId, BuilderId, Context};

use crate::error::JobError;

fn fatal(path: &Path, source: std::io::Error) -> JobError {
    JobError::Fatal(FatalError {
        path: path.to_path_buf(),
        source,
    })
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(OsString::from(".tmp"));
    PathBuf::from(name)
}

/// `-a <arch>` is omitted for native (non-cross) builders.
fn arch_args(ctx: &Context, builder: BuilderId) -> Vec<String> {
    let builder = ctx.builder(builder);
    match builder.host {
        Some(_) => vec!["-a".to_owned(), builder.target.clone()],
        None => Vec::new(),
    }
}

#[derive(Debug, Clone)]
pub struct ExtractJob {
    pub name: String,
    pub tool: PathBuf,
    pub arch_args: Vec<String>,
    pub dep_path: PathBuf,
    pub err_path: PathBuf,
}

pub fn prepare_extract(ctx: &Context, build: BuildId) -> ExtractJob {
    let (dep_path, err_path) = dbulk_fs::dep_paths(ctx, build);
    let b = ctx.build(build);
    ExtractJob {
        name: ctx.name(b.name).name.clone(),
        tool: ctx.config.tool.clone(),
        arch_args: arch_args(ctx, b.builder),
        dep_path,
        err_path,
    }
}

#[derive(Debug, Clone)]
pub struct BuildJob {
    pub name: String,
    pub tool: PathBuf,
    pub arch_args: Vec<String>,
    pub log_path: PathBuf,
    pub err_path: PathBuf,
}

pub fn prepare_build(ctx: &Context, build: BuildId) -> Result<BuildJob, JobError> {
    let b = ctx.build(build);
    let name = ctx.name(b.name).name.clone();
    let (log_path, err_path) =
        dbulk_fs::log_paths(ctx, build).ok_or_else(|| JobError::IncompleteDepFile {
            name: name.clone(),
        })?;
    Ok(BuildJob {
        name,
        tool: ctx.config.tool.clone(),
        arch_args: arch_args(ctx, b.builder),
        log_path,
        err_path,
    })
}

/// Runs the extractor: `<tool> [-a <arch>] dbulk-dump <name>`, stdin
/// `/dev/null`, stdout to `<name>.dep.tmp`, stderr to `<name>.err.tmp`
/// On success the `.err.tmp` is dropped and `.dep.tmp` renamed into
/// place; on failure the reverse.
pub async fn run_extract(job: ExtractJob) -> Result<bool, JobError> {
    scoped_metric!("extract");
    if let Some(parent) = job.dep_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| fatal(parent, e))?;
    }
    let dep_tmp = tmp_path(&job.dep_path);
    let err_tmp = tmp_path(&job.err_path);
    let dep_file = std::fs::File::create(&dep_tmp).map_err(|e| fatal(&dep_tmp, e))?;
    let err_file = std::fs::File::create(&err_tmp).map_err(|e| fatal(&err_tmp, e))?;

    let mut command = Command::new(&job.tool);
    command
        .args(&job.arch_args)
        .arg("dbulk-dump")
        .arg(&job.name)
        .stdin(Stdio::null())
        .stdout(Stdio::from(dep_file))
        .stderr(Stdio::from(err_file));

    let mut child = command
        .spawn()
        .map_err(|e| JobError::Spawn(job.name.clone(), e))?;
    let status = child
        .wait()
        .await
        .map_err(|e| JobError::Spawn(job.name.clone(), e))?;

    if status.success() {
        let _ = std::fs::remove_file(&err_tmp);
        std::fs::rename(&dep_tmp, &job.dep_path).map_err(|e| fatal(&job.dep_path, e))?;
    } else {
        let _ = std::fs::remove_file(&dep_tmp);
        std::fs::rename(&err_tmp, &job.err_path).map_err(|e| fatal(&job.err_path, e))?;
    }
    Ok(status.success())
}

/// Runs the builder: `<tool> [-a <arch>] -1Et -j 4 pkg <name>`, stdin
/// `/dev/null`, stdout and stderr both to one combined `.tmp` file, renamed
/// to `.log` on success or `.err` on failure.
pub async fn run_build(job: BuildJob) -> Result<bool, JobError> {
    scoped_metric!("build");
    if let Some(parent) = job.log_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| fatal(parent, e))?;
    }
    let tmp = tmp_path(&job.log_path);
    let out_file = std::fs::File::create(&tmp).map_err(|e| fatal(&tmp, e))?;
    let err_file = out_file.try_clone().map_err(|e| fatal(&tmp, e))?;

    let mut command = Command::new(&job.tool);
    command
        .args(&job.arch_args)
        .arg("-1Et")
        .arg("-j")
        .arg("4")
        .arg("pkg")
        .arg(&job.name)
        .stdin(Stdio::null())
        .stdout(Stdio::from(out_file))
        .stderr(Stdio::from(err_file));

    let mut child = command
        .spawn()
        .map_err(|e| JobError::Spawn(job.name.clone(), e))?;
    let status = child
        .wait()
        .await
        .map_err(|e| JobError::Spawn(job.name.clone(), e))?;

    if status.success() {
        std::fs::rename(&tmp, &job.log_path).map_err(|e| fatal(&job.log_path, e))?;
    } else {
        std::fs::rename(&tmp, &job.err_path).map_err(|e| fatal(&job.err_path, e))?;
    }
    Ok(status.success())
}
