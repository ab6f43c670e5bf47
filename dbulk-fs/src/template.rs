use dbulk_model::{Context, Mtime, NameId};

use crate::{
    disk::{is_not_found, DiskInterface},
    error::FatalError,
};

const VIRTUAL_SUFFIXES: &[&str] = &["-dbg", "-32bit"];

/// `probe(name) -> mtime`, setting the `srcpkg` alias if appropriate.
/// Idempotent: a name whose `mtime` is already known returns immediately
/// without touching disk again.
pub fn probe_template(
    ctx: &mut Context,
    disk: &impl DiskInterface,
    name: NameId,
) -> Result<Mtime, FatalError> {
    if ctx.name(name).mtime.is_known() {
        return Ok(ctx.name(name).mtime);
    }

    let path = ctx.config.srcpkgs_dir().join(&ctx.name(name).name);

    let lstat = match disk.lstat(&path) {
        Ok(lstat) => lstat,
        Err(e) if is_not_found(&e) => {
            return Ok(probe_missing(ctx, disk, name)?);
        }
        Err(e) => {
            return Err(FatalError { path, source: e });
        }
    };

    if lstat.is_symlink {
        // The symlink's own mtime is what's recorded for the alias.
        ctx.name_mut(name).mtime = Mtime::Timestamp(lstat.mtime);

        let raw_target = disk.read_link(&path).map_err(|e| FatalError {
            path: path.clone(),
            source: e,
        })?;
        let mut target = raw_target.to_string_lossy().into_owned();
        if target.ends_with('/') {
            eprintln!(
                "warning: {}: symlink target {:?} has a trailing slash, stripping",
                ctx.name(name).name, target
            );
            target.pop();
        }

        let target_id = ctx.intern_name(&target);
        ctx.name_mut(name).srcpkg = Some(target_id);
        probe_template(ctx, disk, target_id)?;
        return Ok(ctx.name(name).mtime);
    }

    if lstat.is_dir {
        let template_path = path.join("template");
        return match disk.stat_mtime(&template_path) {
            Ok(mtime) => {
                ctx.name_mut(name).mtime = Mtime::Timestamp(mtime);
                Ok(ctx.name(name).mtime)
            }
            Err(e) if is_not_found(&e) => {
                ctx.name_mut(name).mtime = Mtime::Missing;
                Ok(Mtime::Missing)
            }
            Err(e) => Err(FatalError {
                path: template_path,
                source: e,
            }),
        };
    }

    // Neither a directory nor a symlink: not a shape srcpkgs/ is meant to
    // contain. Treat the same as "no template", rather than panicking on
    // distro-tree corruption.
    ctx.name_mut(name).mtime = Mtime::Missing;
    Ok(Mtime::Missing)
}

fn probe_missing(
    ctx: &mut Context,
    disk: &impl DiskInterface,
    name: NameId,
) -> Result<Mtime, FatalError> {
    let this_name = ctx.name(name).name.clone();
    for suffix in VIRTUAL_SUFFIXES {
        if let Some(base) = this_name.strip_suffix(suffix) {
            let base_id = ctx.intern_name(base);
            let mtime = probe_template(ctx, disk, base_id)?;
            ctx.name_mut(name).mtime = mtime;
            ctx.name_mut(name).srcpkg = Some(base_id);
            return Ok(mtime);
        }
    }
    ctx.name_mut(name).mtime = Mtime::Missing;
    Ok(Mtime::Missing)
}
