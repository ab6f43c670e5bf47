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

//! Property-based tests over randomly generated dependency DAGs: for any
//! acyclic forest, planning never leaves a Build marked CYCLE, and every
//! Build admitted to the plan as dirty and not skipped eventually drains
//! through the ready queue.

use std::{fs, path::PathBuf};

use proptest::prelude::*;

use dbulk_fs::SystemDisk;
use dbulk_model::Config;

/// An `n x n` boolean matrix, collapsed to an adjacency list where node `i`
/// may only depend on some node `j < i`. Edges strictly decrease the index,
/// so every generated graph is acyclic by construction — cycles are already
/// covered by the targeted unit tests in `walk.rs`.
fn dag(n: usize) -> impl Strategy<Value = Vec<Vec<usize>>> {
    prop::collection::vec(prop::collection::vec(any::<bool>(), n), n).prop_map(move |rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, row)| {
                row.into_iter()
                    .enumerate()
                    .filter(|&(j, present)| present && j < i)
                    .map(|(j, _)| j)
                    .collect()
            })
            .collect()
    })
}

fn node_name(i: usize) -> String {
    format!("n{}", i)
}

proptest! {
    /// For any acyclic dependency forest with fresh templates, no pre-existing
    /// logs, and pre-seeded fresh `.dep` files (no extraction needed): after
    /// `plan` runs over every node, (1) no Build retains CYCLE, and (2)
    /// draining the ready queue by simulating a successful completion for
    /// each pop (exactly the job pool's `done` step) finishes every
    /// Build that planning marked WORK ∧ DIRTY ∧ ¬SKIP — matching testable
    /// property 2's "B ran or a prerequisite failed/skipped" for the case
    /// where nothing fails or is skipped.
    #[test]
    fn planning_drains_every_dirty_build_in_an_acyclic_forest(edges in (2usize..=6).prop_flat_map(dag)) {
        let n = edges.len();
        let tmp = tempfile::tempdir().unwrap();
        let srcpkgs = tmp.path().join("srcpkgs");
        for i in 0..n {
            let dir = srcpkgs.join(node_name(i));
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("template"), "pkgname=n\n").unwrap();
        }

        let mut ctx = dbulk_model::Context::new(Config {
            distdir: tmp.path().to_path_buf(),
            maxjobs: 1,
            dryrun: false,
            explain: false,
            tool_mode: None,
            tool: PathBuf::from("xbps-src"),
        });
        let native = ctx.intern_builder("x86_64", None);

        for i in 0..n {
            let name = ctx.intern_name(&node_name(i));
            let build_id = ctx.get_or_create_build(name, native);
            let (dep_path, _) = dbulk_fs::dep_paths(&ctx, build_id);
            fs::create_dir_all(dep_path.parent().unwrap()).unwrap();
            let mut content = format!("pkgname: {}\nversion: 1\nrevision: 1\n", node_name(i));
            if !edges[i].is_empty() {
                content.push_str("depends:\n");
                for &j in &edges[i] {
                    content.push_str(&format!(" {}\n", node_name(j)));
                }
            }
            fs::write(&dep_path, content).unwrap();
        }

        for i in 0..n {
            let name = ctx.lookup_name(&node_name(i)).unwrap();
            crate::plan(&mut ctx, &SystemDisk, name, native).unwrap();
        }

        let mut build_ids = Vec::with_capacity(n);
        for i in 0..n {
            let name = ctx.lookup_name(&node_name(i)).unwrap();
            build_ids.push(ctx.lookup_build(name, native).unwrap());
        }

        for &build_id in &build_ids {
            prop_assert!(!ctx.build(build_id).flags.cycle);
        }

        let expected_runs = build_ids
            .iter()
            .filter(|&&id| {
                let flags = ctx.build(id).flags;
                flags.work && flags.dirty && !flags.skip
            })
            .count();

        let mut drained = 0;
        while let Some(build_id) = ctx.ready.pop_front() {
            drained += 1;
            let name = ctx.build(build_id).name;
            crate::done(&mut ctx, name);
        }

        prop_assert_eq!(drained, expected_runs);
        prop_assert_eq!(drained, n);
    }
}
