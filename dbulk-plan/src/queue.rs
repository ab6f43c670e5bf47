use dbulk_model::{Context, NameId};

/// Decrements `nblock` on every Build in `name`'s `used_by` list that is
/// part of the current plan (`WORK` set), enqueuing any that reach zero.
/// Called by the job pool after a builder job for `name`'s own package,
/// and again for each of its sub-packages, so that dependents of an
/// alias/sub-package name unblock too.
pub fn done(ctx: &mut Context, name: NameId) {
    let dependents = ctx.name(name).used_by.clone();
    for dependent in dependents {
        if !ctx.build(dependent).flags.work {
            continue;
        }
        let nblock = &mut ctx.build_mut(dependent).nblock;
        if *nblock == 0 {
            // Already ready (or never blocked on this edge); nothing to do.
            continue;
        }
        *nblock -= 1;
        if *nblock == 0 {
            ctx.ready.push_back(dependent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbulk_model::Config;
    use std::path::PathBuf;

    fn test_ctx() -> Context {
        Context::new(Config {
            distdir: PathBuf::from("/nonexistent"),
            maxjobs: 1,
            dryrun: false,
            explain: false,
            tool_mode: None,
            tool: PathBuf::from("xbps-src"),
        })
    }

    #[test]
    fn done_decrements_and_enqueues_when_reaching_zero() {
        let mut ctx = test_ctx();
        let native = ctx.intern_builder("x86_64", None);
        let dep = ctx.intern_name("libfoo");
        let user_name = ctx.intern_name("bar");
        let user = ctx.get_or_create_build(user_name, native);
        ctx.build_mut(user).flags.work = true;
        ctx.build_mut(user).nblock = 1;
        ctx.record_use(user, dep);

        done(&mut ctx, dep);

        assert_eq!(ctx.build(user).nblock, 0);
        assert_eq!(ctx.ready.len(), 1);
        assert_eq!(ctx.ready[0], user);
    }

    #[test]
    fn done_ignores_dependents_outside_the_plan() {
        let mut ctx = test_ctx();
        let native = ctx.intern_builder("x86_64", None);
        let dep = ctx.intern_name("libfoo");
        let user_name = ctx.intern_name("bar");
        let user = ctx.get_or_create_build(user_name, native);
        // flags.work left false: not part of this run's plan.
        ctx.build_mut(user).nblock = 1;
        ctx.record_use(user, dep);

        done(&mut ctx, dep);

        assert_eq!(ctx.build(user).nblock, 1);
        assert!(ctx.ready.is_empty());
    }

    #[test]
    fn done_on_subpackage_name_unblocks_its_own_dependents() {
        // A source build "foo" produces sub-package "foo-lib"; "bar"
        // depends on "foo-lib" directly, not on "foo".
        let mut ctx = test_ctx();
        let native = ctx.intern_builder("x86_64", None);
        let sub = ctx.intern_name("foo-lib");
        let bar_name = ctx.intern_name("bar");
        let bar = ctx.get_or_create_build(bar_name, native);
        ctx.build_mut(bar).flags.work = true;
        ctx.build_mut(bar).nblock = 1;
        ctx.record_use(bar, sub);

        done(&mut ctx, sub);

        assert_eq!(ctx.build(bar).nblock, 0);
        assert_eq!(ctx.ready.len(), 1);
    }

    #[test]
    fn done_is_a_noop_when_nblock_already_zero() {
        let mut ctx = test_ctx();
        let native = ctx.intern_builder("x86_64", None);
        let dep = ctx.intern_name("libfoo");
        let user_name = ctx.intern_name("bar");
        let user = ctx.get_or_create_build(user_name, native);
        ctx.build_mut(user).flags.work = true;
        ctx.record_use(user, dep);

        done(&mut ctx, dep);

        assert_eq!(ctx.build(user).nblock, 0);
        assert!(ctx.ready.is_empty());
    }
}
