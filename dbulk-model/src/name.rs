use std::time::SystemTime;

use crate::ids::{BuildId, NameId};

/// `Unknown` means never probed, `Missing` means probed and absent, any
/// `Timestamp` is a real `stat()` result.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mtime {
    Unknown,
    Missing,
    Timestamp(SystemTime),
}

impl Mtime {
    pub fn is_known(self) -> bool {
        !matches!(self, Mtime::Unknown)
    }

    pub fn is_missing(self) -> bool {
        matches!(self, Mtime::Missing)
    }

    /// `self < other`, where `Missing` sorts before every real timestamp and
    /// `Unknown` is never compared (callers must probe first).
    pub fn older_than(self, other: Mtime) -> bool {
        match (self, other) {
            (Mtime::Timestamp(a), Mtime::Timestamp(b)) => a < b,
            (Mtime::Missing, Mtime::Timestamp(_)) => true,
            (Mtime::Timestamp(_), Mtime::Missing) => false,
            (Mtime::Missing, Mtime::Missing) => false,
            (Mtime::Unknown, _) | (_, Mtime::Unknown) => {
                panic!("compared an unprobed Mtime::Unknown")
            }
        }
    }

    /// `self >= other`.
    pub fn at_least(self, other: Mtime) -> bool {
        !self.older_than(other)
    }
}

/// A package name, interned for the lifetime of the run.
#[derive(Debug, Clone)]
pub struct PackageName {
    pub name: String,
    pub mtime: Mtime,
    /// Set when this name is a symlink alias or a virtual `-dbg`/`-32bit`
    /// variant: the Build for this name attaches to `srcpkg`, never to self
    /// to the owning source name, never to this alias itself.
    pub srcpkg: Option<NameId>,
    /// Builds that name this as a produced package, including as a
    /// sub-package.
    pub produces: Vec<BuildId>,
    /// Builds that use this name as a dependency.
    pub used_by: Vec<BuildId>,
    pub dirty: bool,
}

impl PackageName {
    pub(crate) fn new(name: String) -> Self {
        PackageName {
            name,
            mtime: Mtime::Unknown,
            srcpkg: None,
            produces: Vec::new(),
            used_by: Vec::new(),
            dirty: false,
        }
    }
}
