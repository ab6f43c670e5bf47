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

//! The package/build graph model: interned names, interned builders, and
//! the `Build` nodes that join them, all addressed by index handle rather
//! than owning reference so that the `use`/dependency multigraph can be
//! cyclic without requiring `Rc`/`RefCell` bookkeeping.

mod build;
mod builder;
mod config;
mod context;
mod ids;
mod name;

pub use build::{Build, BuildFlags};
pub use builder::Builder;
pub use config::Config;
pub use context::Context;
pub use ids::{BuildId, BuilderId, NameId};
pub use name::{Mtime, PackageName};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_config() -> Config {
        Config {
            distdir: PathBuf::from("/nonexistent"),
            maxjobs: 1,
            dryrun: false,
            explain: false,
            tool_mode: None,
            tool: PathBuf::from("xbps-src"),
        }
    }

    #[test]
    fn name_interning_is_stable() {
        let mut ctx = Context::new(test_config());
        let a = ctx.intern_name("foo");
        let b = ctx.intern_name("foo");
        assert_eq!(a, b);
        let c = ctx.intern_name("bar");
        assert_ne!(a, c);
    }

    #[test]
    fn builder_interning_keys_on_target_and_host() {
        let mut ctx = Context::new(test_config());
        let native = ctx.intern_builder("x86_64", None);
        let native_again = ctx.intern_builder("x86_64", None);
        assert_eq!(native, native_again);

        let cross = ctx.intern_builder("aarch64", Some(native));
        assert_ne!(cross, native);
        let cross_again = ctx.intern_builder("aarch64", Some(native));
        assert_eq!(cross, cross_again);
    }

    #[test]
    fn build_identity_is_name_and_builder() {
        let mut ctx = Context::new(test_config());
        let foo = ctx.intern_name("foo");
        let native = ctx.intern_builder("x86_64", None);
        let cross = ctx.intern_builder("aarch64", Some(native));

        let b1 = ctx.get_or_create_build(foo, native);
        let b2 = ctx.get_or_create_build(foo, native);
        assert_eq!(b1, b2);

        let b3 = ctx.get_or_create_build(foo, cross);
        assert_ne!(b1, b3);
    }

    #[test]
    fn build_always_attaches_to_resolved_source() {
        let mut ctx = Context::new(test_config());
        let foo = ctx.intern_name("foo");
        let alias = ctx.intern_name("foo-dbg");
        ctx.name_mut(alias).srcpkg = Some(foo);

        let native = ctx.intern_builder("x86_64", None);
        let via_alias = ctx.get_or_create_build(alias, native);
        let via_source = ctx.get_or_create_build(foo, native);
        assert_eq!(via_alias, via_source);
        assert_eq!(ctx.build(via_alias).name, foo);
    }

    #[test]
    fn produces_list_records_every_build_for_a_source() {
        let mut ctx = Context::new(test_config());
        let foo = ctx.intern_name("foo");
        let native = ctx.intern_builder("x86_64", None);
        let id = ctx.get_or_create_build(foo, native);
        assert_eq!(ctx.name(foo).produces, vec![id]);
    }
}
