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

//! Portable Text patches: the wire format exchanged with collaborators.
//!
//! Outgoing patches are computed by diffing the value before and after a
//! committed action set ([`diff_values`]). Incoming patches are applied to a
//! JSON copy of the value ([`apply_to_json`]) and parsed back, after which
//! the editor reconciles the result into engine operations.
//!
//! ```json
//! {"type": "insert", "path": [{"_key": "b1"}], "position": "after", "items": [...]}
//! {"type": "set", "path": [{"_key": "b1"}, "children", {"_key": "s1"}, "text"], "value": "hi"}
//! {"type": "unset", "path": [{"_key": "b2"}]}
//! ```

mod apply;
mod diff;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::{value_from_json, value_to_json, Block};
use crate::error::PatchError;
use crate::selection::Path;

pub use apply::apply_to_json;
pub use diff::diff_values;

/// Where [`Patch::Insert`] places its items relative to the addressed
/// array element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertPosition {
    Before,
    After,
    Replace,
}

/// One change to a Portable Text value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Patch {
    Set {
        path: Path,
        value: Value,
    },
    SetIfMissing {
        path: Path,
        value: Value,
    },
    Unset {
        path: Path,
    },
    Insert {
        path: Path,
        position: InsertPosition,
        items: Vec<Value>,
    },
}

impl Patch {
    pub fn path(&self) -> &Path {
        match self {
            Patch::Set { path, .. }
            | Patch::SetIfMissing { path, .. }
            | Patch::Unset { path }
            | Patch::Insert { path, .. } => path,
        }
    }
}

/// The value `patches` produce when applied, in order, to `value`.
///
/// Either every patch applies or an error is returned; `value` is never
/// partially patched.
pub fn patched_value(
    value: &[Block],
    patches: &[Patch],
) -> Result<Vec<Block>, PatchError> {
    let mut json = value_to_json(value);
    for patch in patches {
        apply_to_json(&mut json, patch)?;
    }
    Ok(value_from_json(&json)?)
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use serde_json::json;

    use super::*;
    use crate::document::TextBlock;
    use crate::selection::PathSegment;

    #[test]
    fn patches_use_the_portable_text_wire_shape() {
        let patch: Patch = serde_json::from_str(indoc! {r#"
            {
                "type": "insert",
                "path": [{"_key": "b1"}],
                "position": "after",
                "items": [{"_type": "block", "_key": "b2", "children": []}]
            }
        "#})
        .unwrap();
        assert_eq!(
            patch.path(),
            &Path::block("b1"),
        );
        let round = serde_json::to_value(&patch).unwrap();
        assert_eq!(round["position"], json!("after"));

        let set = Patch::SetIfMissing {
            path: Path(vec![PathSegment::Index(0)]),
            value: json!([]),
        };
        assert_eq!(
            serde_json::to_value(&set).unwrap(),
            json!({"type": "set-if-missing", "path": [0], "value": []})
        );
    }

    #[test]
    fn patched_value_is_all_or_nothing() {
        let value = vec![Block::Text(TextBlock::with_text("b1", "s1", "hi"))];
        let ok = patched_value(
            &value,
            &[Patch::Set {
                path: Path::child("b1", "s1").with_field("text"),
                value: json!("ho"),
            }],
        )
        .unwrap();
        assert_eq!(ok[0].as_text().unwrap().text(), "ho");

        let err = patched_value(
            &value,
            &[
                Patch::Unset {
                    path: Path::block("b1"),
                },
                Patch::Set {
                    path: Path::block("b1").with_field("style"),
                    value: json!("h1"),
                },
            ],
        );
        assert!(matches!(err, Err(PatchError::PathNotFound(_))));
    }
}
