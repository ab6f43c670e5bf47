use crate::{
    ids::{BuilderId, NameId},
    name::Mtime,
};

/// Flag semantics. Kept as explicit named booleans rather than a bitset
/// crate: there are five of them, they are read far more often than
/// written, and `build.flags.dirty` reads better at call sites than a
/// bitmask constant would.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct BuildFlags {
    /// Admitted to the current run's plan.
    pub work: bool,
    /// On the current walker's stack; re-entry signals a cycle.
    pub cycle: bool,
    /// Dependency metadata has been loaded from a `.dep` file.
    pub deps: bool,
    /// Needs action (rebuild and/or dep-regen) in this run.
    pub dirty: bool,
    /// Known-unactionable this run; still propagates as dirty.
    pub skip: bool,
}

impl BuildFlags {
    pub fn mark_skip_dirty(&mut self) {
        self.skip = true;
        self.dirty = true;
    }
}

/// The central entity: `(source PackageName, Builder)`.
#[derive(Debug, Clone)]
pub struct Build {
    pub name: NameId,
    pub builder: BuilderId,

    pub version: String,
    pub revision: String,

    pub host_deps: Vec<NameId>,
    pub target_deps: Vec<NameId>,
    pub subpackages: Vec<NameId>,

    pub dep_mtime: Mtime,
    pub dep_error_mtime: Mtime,
    pub log_mtime: Mtime,
    pub log_error_mtime: Mtime,

    /// Count of `use`-reachable Builds in this plan that are DIRTY but have
    /// not yet completed.
    pub nblock: usize,

    pub flags: BuildFlags,
}

impl Build {
    pub(crate) fn new(name: NameId, builder: BuilderId) -> Self {
        Build {
            name,
            builder,
            version: String::new(),
            revision: String::new(),
            host_deps: Vec::new(),
            target_deps: Vec::new(),
            subpackages: Vec::new(),
            dep_mtime: Mtime::Unknown,
            dep_error_mtime: Mtime::Unknown,
            log_mtime: Mtime::Unknown,
            log_error_mtime: Mtime::Unknown,
            nblock: 0,
            flags: BuildFlags::default(),
        }
    }

    /// A sentinel Build for a template that could not be resolved: never
    /// scheduled, but still occupies a `(name, builder)` slot so later
    /// lookups don't re-probe: constructed with its flags already set so
    /// there's no window where a half-built Build is visible.
    pub(crate) fn missing_template(name: NameId, builder: BuilderId) -> Self {
        let mut build = Self::new(name, builder);
        build.flags.mark_skip_dirty();
        build
    }
}
