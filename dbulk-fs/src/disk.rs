use std::{
    io::{Error, ErrorKind, Result},
    path::{Path, PathBuf},
    time::SystemTime,
};

use dbulk_metrics::scoped_metric;

/// Abstracts the handful of raw filesystem calls the probes need, the way
/// `ninja-builder`'s `disk_interface::DiskInterface` abstracts `stat` for
/// the rebuilder.
pub trait DiskInterface {
    /// `lstat`: does not follow a final symlink component.
    fn lstat(&self, path: &Path) -> Result<Lstat>;
    fn read_link(&self, path: &Path) -> Result<PathBuf>;
    /// `stat` (follows symlinks), returning just the modification time.
    fn stat_mtime(&self, path: &Path) -> Result<SystemTime>;
    /// Reads a whole file as UTF-8, for `.dep` parsing.
    fn read_to_string(&self, path: &Path) -> Result<String>;
    /// Lists entry names of a directory (no path, no recursion), for
    /// scanning `srcpkgs/` when no targets are named on the command line.
    fn read_dir_names(&self, path: &Path) -> Result<Vec<String>>;
}

#[derive(Debug, Copy, Clone)]
pub struct Lstat {
    pub mtime: SystemTime,
    pub is_dir: bool,
    pub is_symlink: bool,
}

#[derive(Debug, Default)]
pub struct SystemDisk;

impl DiskInterface for SystemDisk {
    fn lstat(&self, path: &Path) -> Result<Lstat> {
        scoped_metric!("lstat");
        let meta = std::fs::symlink_metadata(path)?;
        Ok(Lstat {
            mtime: meta.modified()?,
            is_dir: meta.is_dir(),
            is_symlink: meta.file_type().is_symlink(),
        })
    }

    fn read_link(&self, path: &Path) -> Result<PathBuf> {
        scoped_metric!("readlink");
        std::fs::read_link(path)
    }

    fn stat_mtime(&self, path: &Path) -> Result<SystemTime> {
        scoped_metric!("stat");
        std::fs::metadata(path)?.modified()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        scoped_metric!("read");
        std::fs::read_to_string(path)
    }

    fn read_dir_names(&self, path: &Path) -> Result<Vec<String>> {
        scoped_metric!("readdir");
        std::fs::read_dir(path)?
            .map(|entry| Ok(entry?.file_name().to_string_lossy().into_owned()))
            .collect()
    }
}

/// True when `err` is exactly "the path doesn't exist" — every other I/O
/// error is fatal.
pub fn is_not_found(err: &Error) -> bool {
    err.kind() == ErrorKind::NotFound
}
