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

//! The staleness planner: `plan` is the depth-first dependency walker,
//! `done` is the ready-queue unblock step the job pool calls after a
//! successful build.

mod error;
mod queue;
mod walk;

#[cfg(test)]
mod property_tests;

pub use error::PlanError;
pub use queue::done;
pub use walk::plan;
