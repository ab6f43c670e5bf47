use std::path::{Path, PathBuf};

use dbulk_model::{BuildId, Context, Mtime};

use crate::{
    disk::{is_not_found, DiskInterface},
    error::FatalError,
};

/// The `<arch>` or `<arch>@<host>` directory component shared by both the
/// `deps/` and `logs/` trees.
pub fn arch_dir(ctx: &Context, build: BuildId) -> String {
    let builder = ctx.builder(ctx.build(build).builder);
    match builder.host {
        None => builder.target.clone(),
        Some(host) => format!("{}@{}", builder.target, ctx.builder(host).target),
    }
}

pub fn dep_paths(ctx: &Context, build: BuildId) -> (PathBuf, PathBuf) {
    let name = &ctx.name(ctx.build(build).name).name;
    let dir = ctx.config.deps_dir().join(arch_dir(ctx, build));
    (
        dir.join(format!("{}.dep", name)),
        dir.join(format!("{}.err", name)),
    )
}

pub fn log_paths(ctx: &Context, build: BuildId) -> Option<(PathBuf, PathBuf)> {
    let b = ctx.build(build);
    if b.version.is_empty() || b.revision.is_empty() {
        return None;
    }
    let name = &ctx.name(b.name).name;
    let dir = ctx.config.logs_dir().join(arch_dir(ctx, build));
    let stem = format!("{}-{}_{}", name, b.version, b.revision);
    Some((dir.join(format!("{}.log", stem)), dir.join(format!("{}.err", stem))))
}

fn stat_or_missing(disk: &impl DiskInterface, path: &Path) -> Result<Mtime, FatalError> {
    match disk.stat_mtime(path) {
        Ok(mtime) => Ok(Mtime::Timestamp(mtime)),
        Err(e) if is_not_found(&e) => Ok(Mtime::Missing),
        Err(e) => Err(FatalError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Stats both `.dep` and `.err` for a Build and records the results.
pub fn stat_dep_files(
    ctx: &mut Context,
    disk: &impl DiskInterface,
    build: BuildId,
) -> Result<(), FatalError> {
    let (dep_path, err_path) = dep_paths(ctx, build);
    let dep_mtime = stat_or_missing(disk, &dep_path)?;
    let err_mtime = stat_or_missing(disk, &err_path)?;
    let b = ctx.build_mut(build);
    b.dep_mtime = dep_mtime;
    b.dep_error_mtime = err_mtime;
    Ok(())
}

/// Stats both `.log` and `.err` for a Build, when version/revision are
/// known. Leaves the mtime fields at `Unknown` otherwise.
pub fn stat_log_files(
    ctx: &mut Context,
    disk: &impl DiskInterface,
    build: BuildId,
) -> Result<(), FatalError> {
    let paths = match log_paths(ctx, build) {
        Some(paths) => paths,
        None => return Ok(()),
    };
    let (log_path, err_path) = paths;
    let log_mtime = stat_or_missing(disk, &log_path)?;
    let err_mtime = stat_or_missing(disk, &err_path)?;
    let b = ctx.build_mut(build);
    b.log_mtime = log_mtime;
    b.log_error_mtime = err_mtime;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk::SystemDisk;
    use dbulk_model::Config;
    use std::fs;

    fn ctx_in(dir: &std::path::Path) -> Context {
        Context::new(Config {
            distdir: dir.to_path_buf(),
            maxjobs: 1,
            dryrun: false,
            explain: false,
            tool_mode: None,
            tool: PathBuf::from("xbps-src"),
        })
    }

    #[test]
    fn native_arch_dir_has_no_at_sign() {
        let tmp = tempfile::tempdir().unwrap();
        let mut ctx = ctx_in(tmp.path());
        let foo = ctx.intern_name("foo");
        let native = ctx.intern_builder("x86_64", None);
        let build = ctx.get_or_create_build(foo, native);
        assert_eq!(arch_dir(&ctx, build), "x86_64");
    }

    #[test]
    fn cross_arch_dir_uses_at_sign() {
        let tmp = tempfile::tempdir().unwrap();
        let mut ctx = ctx_in(tmp.path());
        let foo = ctx.intern_name("foo");
        let native = ctx.intern_builder("x86_64", None);
        let cross = ctx.intern_builder("aarch64", Some(native));
        let build = ctx.get_or_create_build(foo, cross);
        assert_eq!(arch_dir(&ctx, build), "aarch64@x86_64");
    }

    #[test]
    fn missing_dep_and_err_are_recorded_as_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let mut ctx = ctx_in(tmp.path());
        let foo = ctx.intern_name("foo");
        let native = ctx.intern_builder("x86_64", None);
        let build = ctx.get_or_create_build(foo, native);

        stat_dep_files(&mut ctx, &SystemDisk, build).unwrap();
        assert_eq!(ctx.build(build).dep_mtime, Mtime::Missing);
        assert_eq!(ctx.build(build).dep_error_mtime, Mtime::Missing);
    }

    #[test]
    fn present_dep_file_is_stamped() {
        let tmp = tempfile::tempdir().unwrap();
        let mut ctx = ctx_in(tmp.path());
        let foo = ctx.intern_name("foo");
        let native = ctx.intern_builder("x86_64", None);
        let build = ctx.get_or_create_build(foo, native);

        let (dep_path, _) = dep_paths(&ctx, build);
        fs::create_dir_all(dep_path.parent().unwrap()).unwrap();
        fs::write(&dep_path, "pkgname: foo\n").unwrap();

        stat_dep_files(&mut ctx, &SystemDisk, build).unwrap();
        assert!(matches!(ctx.build(build).dep_mtime, Mtime::Timestamp(_)));
    }

    #[test]
    fn log_stat_is_skipped_without_version_and_revision() {
        let tmp = tempfile::tempdir().unwrap();
        let mut ctx = ctx_in(tmp.path());
        let foo = ctx.intern_name("foo");
        let native = ctx.intern_builder("x86_64", None);
        let build = ctx.get_or_create_build(foo, native);

        stat_log_files(&mut ctx, &SystemDisk, build).unwrap();
        assert_eq!(ctx.build(build).log_mtime, Mtime::Unknown);
    }

    #[test]
    fn log_stat_uses_name_version_revision() {
        let tmp = tempfile::tempdir().unwrap();
        let mut ctx = ctx_in(tmp.path());
        let foo = ctx.intern_name("foo");
        let native = ctx.intern_builder("x86_64", None);
        let build = ctx.get_or_create_build(foo, native);
        {
            let b = ctx.build_mut(build);
            b.version = "1.0".to_owned();
            b.revision = "1".to_owned();
        }

        let (log_path, _) = log_paths(&ctx, build).unwrap();
        assert!(log_path.ends_with("x86_64/foo-1.0_1.log"));
    }
}
