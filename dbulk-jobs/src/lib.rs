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

//! The job-slot pool: turns the planner's ready queue into spawned
//! extractor/builder child processes, bounded to `maxjobs` concurrent
//! children, and folds each completion back into the plan.

mod error;
mod pool;
mod printer;
mod spawn;

pub use error::JobError;
pub use pool::{run, JobKind};
