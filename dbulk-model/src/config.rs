use std::path::PathBuf;

/// Run configuration, assembled once from CLI flags and threaded through
/// the planner and job-pool callbacks.
#[derive(Debug, Clone)]
pub struct Config {
    /// Source-distribution root (`-D`, default `$HOME/void-packages`).
    pub distdir: PathBuf,
    /// Maximum concurrent jobs (`-j`, default 1).
    pub maxjobs: usize,
    /// Dry run: mark Builds completed without spawning (`-n`).
    pub dryrun: bool,
    /// Emit explanatory planner traces on stderr (`-d`).
    pub explain: bool,
    /// Alternate tool mode (`-t`); when set, the build loop is skipped.
    pub tool_mode: Option<String>,
    /// Path to the external `xbps-src`-shaped helper.
    pub tool: PathBuf,
}

impl Config {
    pub fn srcpkgs_dir(&self) -> PathBuf {
        self.distdir.join("srcpkgs")
    }

    pub fn deps_dir(&self) -> PathBuf {
        self.distdir.join("deps")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.distdir.join("logs")
    }
}
