// Copyright 2026 The portable-text-editor Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Checking an incoming value against the document invariants and the
//! schema, and computing patches that repair it.
//!
//! Repairs work on the raw JSON so that problems the parser would reject
//! (a block that is not an object, a missing `_type`) can still be fixed.
//! Issues are found one at a time; each fix is applied before looking for
//! the next, so every reported patch applies cleanly on top of the previous
//! ones.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::warn;

use super::{value_from_json, Block, KeyGenerator, SPAN_TYPE, TEXT_BLOCK_TYPE};
use crate::patches::{apply_to_json, Patch};
use crate::schema::Schema;
use crate::selection::{Path, PathSegment};

const MAX_REPAIRS: usize = 10_000;

/// How to repair one problem in a value.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InvalidValueResolution {
    pub patches: Vec<Patch>,
    /// What is wrong, for humans.
    pub description: String,
    /// What the patches do, e.g. "Assign a fresh key".
    pub action: String,
}

/// One problem found while validating a value.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValueIssue {
    pub description: String,
    /// `None` when the problem cannot be repaired automatically.
    pub resolution: Option<InvalidValueResolution>,
}

impl ValueIssue {
    fn repair(
        description: String,
        action: &str,
        patches: Vec<Patch>,
    ) -> Self {
        Self {
            description: description.clone(),
            resolution: Some(InvalidValueResolution {
                patches,
                description,
                action: action.to_owned(),
            }),
        }
    }

    fn fatal(description: String) -> Self {
        Self {
            description,
            resolution: None,
        }
    }
}

/// Result of [`validate_value`].
#[derive(Clone, Debug, PartialEq)]
pub struct ValueValidation {
    pub issues: Vec<ValueIssue>,
    /// The value with every resolution applied, or `None` if some issue had
    /// no resolution.
    pub repaired: Option<Vec<Block>>,
}

impl ValueValidation {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Validate a raw Portable Text value. `null` counts as an empty document.
pub fn validate_value(
    raw: &Value,
    schema: &Schema,
    max_list_depth: u32,
    keys: &mut dyn KeyGenerator,
) -> ValueValidation {
    let mut json = match raw {
        Value::Null => Value::Array(Vec::new()),
        other => other.clone(),
    };
    let mut issues = Vec::new();

    for _ in 0..MAX_REPAIRS {
        let Some(issue) = next_issue(&json, schema, max_list_depth, keys) else {
            return match value_from_json(&json) {
                Ok(value) => ValueValidation {
                    issues,
                    repaired: Some(value),
                },
                Err(err) => {
                    issues.push(ValueIssue::fatal(err.to_string()));
                    ValueValidation {
                        issues,
                        repaired: None,
                    }
                }
            };
        };
        let Some(resolution) = &issue.resolution else {
            issues.push(issue);
            return ValueValidation {
                issues,
                repaired: None,
            };
        };
        for patch in &resolution.patches {
            if let Err(err) = apply_to_json(&mut json, patch) {
                warn!(%err, "value repair did not apply");
                issues.push(issue);
                return ValueValidation {
                    issues,
                    repaired: None,
                };
            }
        }
        issues.push(issue);
    }
    warn!("value repair did not converge");
    ValueValidation {
        issues,
        repaired: None,
    }
}

fn next_issue(
    json: &Value,
    schema: &Schema,
    max_list_depth: u32,
    keys: &mut dyn KeyGenerator,
) -> Option<ValueIssue> {
    let Some(blocks) = json.as_array() else {
        return Some(ValueIssue::fatal("Value is not an array of blocks".to_owned()));
    };

    let mut block_keys = HashSet::new();
    for (index, block) in blocks.iter().enumerate() {
        let at = || Path(vec![PathSegment::Index(index)]);
        let Some(map) = block.as_object() else {
            return Some(ValueIssue::repair(
                format!("Block at index {index} is not an object"),
                "Remove the block",
                vec![Patch::Unset { path: at() }],
            ));
        };
        let Some(type_name) = map.get("_type").and_then(Value::as_str) else {
            return Some(ValueIssue::repair(
                format!("Block at index {index} has no _type"),
                "Remove the block",
                vec![Patch::Unset { path: at() }],
            ));
        };
        let key = map.get("_key").and_then(Value::as_str).unwrap_or_default();
        if key.is_empty() || !block_keys.insert(key) {
            let description = if key.is_empty() {
                format!("Block at index {index} has no _key")
            } else {
                format!("Block at index {index} has duplicate _key `{key}`")
            };
            return Some(ValueIssue::repair(
                description,
                "Assign a fresh key",
                vec![Patch::Set {
                    path: at().with_field("_key"),
                    value: json!(keys.next_key()),
                }],
            ));
        }

        let issue = if type_name == TEXT_BLOCK_TYPE {
            text_block_issue(key, map, schema, max_list_depth, keys)
        } else if schema.block_object(type_name).is_none() {
            Some(ValueIssue::repair(
                format!("Block `{key}` has unknown type `{type_name}`"),
                "Remove the block",
                vec![Patch::Unset {
                    path: Path::block(key),
                }],
            ))
        } else {
            None
        };
        if issue.is_some() {
            return issue;
        }
    }
    None
}

fn text_block_issue(
    key: &str,
    map: &Map<String, Value>,
    schema: &Schema,
    max_list_depth: u32,
    keys: &mut dyn KeyGenerator,
) -> Option<ValueIssue> {
    let block = || Path::block(key);
    let children = map.get("children").and_then(Value::as_array);
    let Some(children) = children.filter(|c| !c.is_empty()) else {
        return Some(ValueIssue::repair(
            format!("Text block `{key}` has no children"),
            "Insert an empty span",
            vec![Patch::Set {
                path: block().with_field("children"),
                value: json!([{
                    "_key": keys.next_key(),
                    "_type": SPAN_TYPE,
                    "text": "",
                    "marks": [],
                }]),
            }],
        ));
    };

    let mark_def_keys: HashSet<&str> = map
        .get("markDefs")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|d| d.get("_key").and_then(Value::as_str))
        .collect();

    let mut child_keys = HashSet::new();
    for (index, child) in children.iter().enumerate() {
        let at = || block().with_field("children").with(PathSegment::Index(index));
        let Some(child) = child.as_object() else {
            return Some(ValueIssue::repair(
                format!("Child {index} of block `{key}` is not an object"),
                "Remove the child",
                vec![Patch::Unset { path: at() }],
            ));
        };
        let child_key = child.get("_key").and_then(Value::as_str).unwrap_or_default();
        if child_key.is_empty() || !child_keys.insert(child_key) {
            return Some(ValueIssue::repair(
                format!("Child {index} of block `{key}` has a missing or duplicate _key"),
                "Assign a fresh key",
                vec![Patch::Set {
                    path: at().with_field("_key"),
                    value: json!(keys.next_key()),
                }],
            ));
        }
        let is_span = match child.get("_type").and_then(Value::as_str) {
            Some(type_name) => type_name == SPAN_TYPE,
            None => child.contains_key("text"),
        };
        if !is_span {
            continue;
        }
        if !child.get("text").is_some_and(Value::is_string) {
            return Some(ValueIssue::repair(
                format!("Span `{child_key}` in block `{key}` has no text"),
                "Set empty text",
                vec![Patch::Set {
                    path: Path::child(key, child_key).with_field("text"),
                    value: json!(""),
                }],
            ));
        }
        let marks: Vec<&str> = child
            .get("marks")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .collect();
        let valid: Vec<&str> = marks
            .iter()
            .copied()
            .filter(|m| schema.has_decorator(m) || mark_def_keys.contains(m))
            .collect();
        if valid.len() != marks.len() {
            return Some(ValueIssue::repair(
                format!("Span `{child_key}` in block `{key}` has marks with no definition"),
                "Remove the orphaned marks",
                vec![Patch::Set {
                    path: Path::child(key, child_key).with_field("marks"),
                    value: json!(valid),
                }],
            ));
        }
    }

    if map.get("listItem").is_some_and(Value::is_string) {
        let level = map.get("level").and_then(Value::as_u64);
        let clamped = level.unwrap_or(1).clamp(1, u64::from(max_list_depth));
        if level != Some(clamped) {
            return Some(ValueIssue::repair(
                format!("List block `{key}` has level {level:?} outside 1..={max_list_depth}"),
                "Clamp the list level",
                vec![Patch::Set {
                    path: block().with_field("level"),
                    value: json!(clamped),
                }],
            ));
        }
    }
    None
}
