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

//! Applying a [`Patch`] to a raw JSON value.

use serde_json::Value;

use super::{InsertPosition, Patch};
use crate::error::PatchError;
use crate::selection::{Path, PathSegment};

/// Apply one patch in place. On error `root` is left unchanged.
///
/// `unset` of a path that does not resolve is a no-op, matching how
/// concurrent deletions of the same node are expected to converge.
pub fn apply_to_json(root: &mut Value, patch: &Patch) -> Result<(), PatchError> {
    match patch {
        Patch::Set { path, value } => set(root, path, value.clone(), true),
        Patch::SetIfMissing { path, value } => set(root, path, value.clone(), false),
        Patch::Unset { path } => {
            unset(root, path);
            Ok(())
        }
        Patch::Insert {
            path,
            position,
            items,
        } => insert(root, path, *position, items),
    }
}

fn set(
    root: &mut Value,
    path: &Path,
    value: Value,
    overwrite: bool,
) -> Result<(), PatchError> {
    let Some((last, parent_path)) = path.segments().split_last() else {
        if overwrite || root.is_null() {
            *root = value;
        }
        return Ok(());
    };
    let parent = resolve_mut(root, parent_path)
        .ok_or_else(|| PatchError::PathNotFound(path.to_string()))?;
    match (parent, last) {
        (Value::Object(map), PathSegment::Field(field)) => {
            if overwrite || !map.contains_key(field) {
                map.insert(field.clone(), value);
            }
            Ok(())
        }
        (Value::Array(items), segment) => {
            let index = element_index(items, segment)
                .ok_or_else(|| PatchError::PathNotFound(path.to_string()))?;
            if overwrite {
                items[index] = value;
            }
            Ok(())
        }
        _ => Err(PatchError::UnsupportedPath(path.to_string())),
    }
}

fn unset(root: &mut Value, path: &Path) {
    let Some((last, parent_path)) = path.segments().split_last() else {
        *root = Value::Null;
        return;
    };
    match (resolve_mut(root, parent_path), last) {
        (Some(Value::Object(map)), PathSegment::Field(field)) => {
            map.remove(field);
        }
        (Some(Value::Array(items)), segment) => {
            if let Some(index) = element_index(items, segment) {
                items.remove(index);
            }
        }
        _ => {}
    }
}

fn insert(
    root: &mut Value,
    path: &Path,
    position: InsertPosition,
    new_items: &[Value],
) -> Result<(), PatchError> {
    let Some((last, parent_path)) = path.segments().split_last() else {
        return Err(PatchError::UnsupportedPath(path.to_string()));
    };
    let Some(Value::Array(items)) = resolve_mut(root, parent_path) else {
        return Err(PatchError::PathNotFound(path.to_string()));
    };
    let index = match (element_index(items, last), last) {
        (Some(index), _) => index,
        // Inserting at the end of an array, or into an empty one.
        (None, PathSegment::Index(index))
            if *index == items.len() && position == InsertPosition::Before =>
        {
            *index
        }
        _ => return Err(PatchError::PathNotFound(path.to_string())),
    };
    let at = match position {
        InsertPosition::Before => index,
        InsertPosition::After => index + 1,
        InsertPosition::Replace => {
            items.remove(index);
            index
        }
    };
    items.splice(at..at, new_items.iter().cloned());
    Ok(())
}

/// Index of the array element a segment addresses.
fn element_index(items: &[Value], segment: &PathSegment) -> Option<usize> {
    match segment {
        PathSegment::Key(keyed) => items
            .iter()
            .position(|item| item.get("_key").and_then(Value::as_str) == Some(&keyed.key)),
        PathSegment::Index(index) => (*index < items.len()).then_some(*index),
        PathSegment::Field(_) => None,
    }
}

fn resolve_mut<'a>(
    root: &'a mut Value,
    segments: &[PathSegment],
) -> Option<&'a mut Value> {
    segments.iter().try_fold(root, |node, segment| match (node, segment) {
        (Value::Object(map), PathSegment::Field(field)) => map.get_mut(field),
        (Value::Array(items), segment) => {
            let index = element_index(items, segment)?;
            items.get_mut(index)
        }
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc() -> Value {
        json!([
            {"_type": "block", "_key": "b1", "children": [{"_type": "span", "_key": "s1", "text": "one"}]},
            {"_type": "block", "_key": "b2", "children": []},
        ])
    }

    fn key(k: &str) -> PathSegment {
        PathSegment::key(k)
    }

    #[test]
    fn set_and_unset_fields() {
        let mut value = doc();
        apply_to_json(
            &mut value,
            &Patch::Set {
                path: Path::child("b1", "s1").with_field("text"),
                value: json!("uno"),
            },
        )
        .unwrap();
        assert_eq!(value[0]["children"][0]["text"], json!("uno"));

        apply_to_json(&mut value, &Patch::Unset { path: Path::block("b2") }).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 1);

        // Unsetting something that is already gone is fine.
        apply_to_json(&mut value, &Patch::Unset { path: Path::block("b2") }).unwrap();
    }

    #[test]
    fn set_if_missing_keeps_existing_values() {
        let mut value = doc();
        let patch = |v: Value| Patch::SetIfMissing {
            path: Path::block("b1").with_field("style"),
            value: v,
        };
        apply_to_json(&mut value, &patch(json!("h1"))).unwrap();
        apply_to_json(&mut value, &patch(json!("h2"))).unwrap();
        assert_eq!(value[0]["style"], json!("h1"));
    }

    #[test]
    fn insert_positions() {
        let mut value = doc();
        let item = |k: &str| json!({"_type": "image", "_key": k});
        apply_to_json(
            &mut value,
            &Patch::Insert {
                path: Path(vec![key("b1")]),
                position: InsertPosition::After,
                items: vec![item("i1")],
            },
        )
        .unwrap();
        apply_to_json(
            &mut value,
            &Patch::Insert {
                path: Path(vec![PathSegment::Index(0)]),
                position: InsertPosition::Before,
                items: vec![item("i0")],
            },
        )
        .unwrap();
        apply_to_json(
            &mut value,
            &Patch::Insert {
                path: Path(vec![key("b2")]),
                position: InsertPosition::Replace,
                items: vec![item("i2")],
            },
        )
        .unwrap();
        let keys: Vec<_> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["_key"].as_str().unwrap())
            .collect();
        assert_eq!(keys, vec!["i0", "b1", "i1", "i2"]);
    }

    #[test]
    fn insert_into_empty_array() {
        let mut value = json!([]);
        apply_to_json(
            &mut value,
            &Patch::Insert {
                path: Path(vec![PathSegment::Index(0)]),
                position: InsertPosition::Before,
                items: vec![json!({"_key": "a"})],
            },
        )
        .unwrap();
        assert_eq!(value, json!([{"_key": "a"}]));
    }

    #[test]
    fn missing_targets_are_errors() {
        let mut value = doc();
        let err = apply_to_json(
            &mut value,
            &Patch::Set {
                path: Path::child("b9", "s1").with_field("text"),
                value: json!("x"),
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            PatchError::PathNotFound(r#"[_key=="b9"].children[_key=="s1"].text"#.into())
        );
        assert_eq!(value, doc());
    }
}
