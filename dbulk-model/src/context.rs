use std::collections::{hash_map::Entry, HashMap, VecDeque};

use crate::{
    build::Build,
    builder::Builder,
    config::Config,
    ids::{BuildId, BuilderId, NameId},
    name::PackageName,
};

/// The explicit `Context` value the design notes ask for in place of the
/// original's process-global tables: name table, builder table, build
/// store, work queue, counters, and config, all in one place so planner and
/// job callbacks can share it without reaching for statics.
#[derive(Debug)]
pub struct Context {
    pub config: Config,

    names: Vec<PackageName>,
    name_index: HashMap<String, NameId>,

    builders: Vec<Builder>,
    builder_index: HashMap<(String, Option<BuilderId>), BuilderId>,

    builds: Vec<Build>,
    build_index: HashMap<(NameId, BuilderId), BuildId>,

    /// FIFO of Builds with `nblock == 0`, ready to run.
    pub ready: VecDeque<BuildId>,
    pub numtotal: usize,
    pub numfinished: usize,
    pub numfailed: usize,
}

impl Context {
    pub fn new(config: Config) -> Self {
        Context {
            config,
            names: Vec::new(),
            name_index: HashMap::new(),
            builders: Vec::new(),
            builder_index: HashMap::new(),
            builds: Vec::new(),
            build_index: HashMap::new(),
            ready: VecDeque::new(),
            numtotal: 0,
            numfinished: 0,
            numfailed: 0,
        }
    }

    // -- names --------------------------------------------------------

    /// Interns `name`: two lookups of the same string return identical
    /// handles.
    pub fn intern_name(&mut self, name: &str) -> NameId {
        match self.name_index.entry(name.to_owned()) {
            Entry::Occupied(e) => *e.get(),
            Entry::Vacant(e) => {
                let id = NameId(self.names.len() as u32);
                self.names.push(PackageName::new(name.to_owned()));
                e.insert(id);
                id
            }
        }
    }

    pub fn lookup_name(&self, name: &str) -> Option<NameId> {
        self.name_index.get(name).copied()
    }

    pub fn name(&self, id: NameId) -> &PackageName {
        &self.names[id.index()]
    }

    pub fn name_mut(&mut self, id: NameId) -> &mut PackageName {
        &mut self.names[id.index()]
    }

    /// Follows the `srcpkg` alias chain to the owning source package name
    /// to the owning source name, never an alias.
    pub fn resolve_source(&self, mut id: NameId) -> NameId {
        while let Some(src) = self.name(id).srcpkg {
            id = src;
        }
        id
    }

    pub fn all_names(&self) -> impl Iterator<Item = NameId> {
        (0..self.names.len() as u32).map(NameId)
    }

    // -- builders -------------------------------------------------------

    /// Interns a `(target, host)` pair.
    pub fn intern_builder(&mut self, target: &str, host: Option<BuilderId>) -> BuilderId {
        let key = (target.to_owned(), host);
        match self.builder_index.entry(key) {
            Entry::Occupied(e) => *e.get(),
            Entry::Vacant(e) => {
                let id = BuilderId(self.builders.len() as u32);
                self.builders.push(Builder {
                    target: target.to_owned(),
                    host,
                });
                e.insert(id);
                id
            }
        }
    }

    pub fn builder(&self, id: BuilderId) -> &Builder {
        &self.builders[id.index()]
    }

    /// The builder host deps recurse under: the builder's own host if set,
    /// else itself.
    pub fn host_builder_of(&self, id: BuilderId) -> BuilderId {
        self.builder(id).host.unwrap_or(id)
    }

    // -- builds -----------------------------------------------------------

    /// Finds or creates the Build for `(source, builder)`, always attaching
    /// to the resolved source name, never an alias.
    pub fn get_or_create_build(&mut self, name: NameId, builder: BuilderId) -> BuildId {
        let source = self.resolve_source(name);
        let key = (source, builder);
        match self.build_index.entry(key) {
            Entry::Occupied(e) => *e.get(),
            Entry::Vacant(e) => {
                let id = BuildId(self.builds.len() as u32);
                self.builds.push(Build::new(source, builder));
                e.insert(id);
                self.name_mut(source).produces.push(id);
                id
            }
        }
    }

    /// Creates a standalone sentinel Build for a name whose template could
    /// not be resolved. Not indexed by `(name, builder)`
    /// since the name itself never successfully resolved to a source.
    pub fn new_missing_template_build(&mut self, name: NameId, builder: BuilderId) -> BuildId {
        let id = BuildId(self.builds.len() as u32);
        self.builds.push(Build::missing_template(name, builder));
        id
    }

    pub fn build(&self, id: BuildId) -> &Build {
        &self.builds[id.index()]
    }

    pub fn build_mut(&mut self, id: BuildId) -> &mut Build {
        &mut self.builds[id.index()]
    }

    pub fn lookup_build(&self, name: NameId, builder: BuilderId) -> Option<BuildId> {
        let source = self.resolve_source(name);
        self.build_index.get(&(source, builder)).copied()
    }

    /// Registers `dependent` as depending on `dep_name`, and records the
    /// back-reference on the name's `used_by` list.
    pub fn record_use(&mut self, dependent: BuildId, dep_name: NameId) {
        self.name_mut(dep_name).used_by.push(dependent);
    }
}
