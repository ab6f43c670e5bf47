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

//! Parser for the extractor's `.dep` output.
//!
//! The grammar is two line forms:
//!
//! - `key: value` — a scalar.
//! - `key:` followed by zero or more lines starting with a single space,
//!   each contributing one array entry.
//!
//! Unrecognized keys are parsed (so their continuation lines are correctly
//! consumed) but dropped. Any other line shape is a [`ParseError`].

use thiserror::Error;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DepFile {
    pub pkgname: Option<String>,
    pub version: Option<String>,
    pub revision: Option<String>,
    /// `hostmakedepends`.
    pub host_depends: Vec<String>,
    /// `makedepends` and `depends`, concatenated in file order.
    pub target_depends: Vec<String>,
    pub subpackages: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{line_no}: expected 'key: value' or a space-prefixed continuation, got {line:?}")]
pub struct ParseError {
    pub line_no: usize,
    pub line: String,
}

enum ArrayKey {
    HostDepends,
    TargetDepends,
    Subpackages,
    Unrecognized,
}

pub fn parse(input: &str) -> Result<DepFile, ParseError> {
    let mut dep = DepFile::default();
    let mut current_array: Option<ArrayKey> = None;

    for (i, line) in input.lines().enumerate() {
        let line_no = i + 1;

        if let Some(rest) = line.strip_prefix(' ') {
            // Continuation line: an entry for whatever array key is active.
            // A continuation with no active array key is still a
            // continuation syntactically, but has nowhere to go; drop it.
            if let Some(key) = &current_array {
                match key {
                    ArrayKey::HostDepends => dep.host_depends.push(rest.to_owned()),
                    ArrayKey::TargetDepends => dep.target_depends.push(rest.to_owned()),
                    ArrayKey::Subpackages => dep.subpackages.push(rest.to_owned()),
                    ArrayKey::Unrecognized => {}
                }
            }
            continue;
        }

        match line.find(':') {
            None => {
                return Err(ParseError {
                    line_no,
                    line: line.to_owned(),
                });
            }
            Some(colon) => {
                let key = line[..colon].trim();
                let value = line[colon + 1..].trim();

                if value.is_empty() {
                    current_array = Some(match key {
                        "hostmakedepends" => ArrayKey::HostDepends,
                        "makedepends" | "depends" => ArrayKey::TargetDepends,
                        "subpackages" => ArrayKey::Subpackages,
                        _ => ArrayKey::Unrecognized,
                    });
                } else {
                    current_array = None;
                    match key {
                        "pkgname" => dep.pkgname = Some(value.to_owned()),
                        "version" => dep.version = Some(value.to_owned()),
                        "revision" => dep.revision = Some(value.to_owned()),
                        _ => {}
                    }
                }
            }
        }
    }

    Ok(dep)
}
