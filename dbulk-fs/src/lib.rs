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

//! Template probing and the `deps/`/`logs/` on-disk layout.

mod disk;
mod error;
mod layout;
mod scan;
mod template;

pub use disk::{DiskInterface, Lstat, SystemDisk};
pub use error::FatalError;
pub use layout::{arch_dir, dep_paths, log_paths, stat_dep_files, stat_log_files};
pub use scan::scan_all_packages;
pub use template::probe_template;
