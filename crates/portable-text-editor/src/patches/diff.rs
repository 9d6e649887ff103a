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

//! Patches describing the difference between two values.
//!
//! Blocks are matched by key. Removed blocks become `unset`, new blocks
//! become `insert` after their predecessor, and blocks that changed order
//! are unset and reinserted. Only blocks outside the longest run that kept
//! its relative order count as moved. Surviving blocks are diffed field by
//! field, down to span text and marks when the child keys line up.

use std::collections::{HashMap, HashSet};

use serde_json::{json, Value};

use super::{InsertPosition, Patch};
use crate::document::{value_to_json, Block, Child, TextBlock};
use crate::selection::{Path, PathSegment};

/// Patches turning `before` into `after`.
pub fn diff_values(before: &[Block], after: &[Block]) -> Vec<Patch> {
    if before == after {
        return Vec::new();
    }
    if before.is_empty() || after.is_empty() {
        return vec![Patch::Set {
            path: Path::default(),
            value: value_to_json(after),
        }];
    }

    let before_index: HashMap<&str, usize> = before
        .iter()
        .enumerate()
        .map(|(i, b)| (b.key(), i))
        .collect();
    let kept: Vec<(usize, usize)> = after
        .iter()
        .enumerate()
        .filter_map(|(i, b)| before_index.get(b.key()).map(|&old| (i, old)))
        .collect();
    let in_order: HashSet<usize> =
        longest_increasing(&kept.iter().map(|&(_, old)| old).collect::<Vec<_>>())
            .into_iter()
            .map(|position| kept[position].0)
            .collect();
    let after_keys: HashSet<&str> = after.iter().map(Block::key).collect();

    let mut patches = Vec::new();
    for block in before {
        if !after_keys.contains(block.key()) {
            patches.push(Patch::Unset {
                path: Path::block(block.key()),
            });
        }
    }
    for &(new, _) in &kept {
        if !in_order.contains(&new) {
            patches.push(Patch::Unset {
                path: Path::block(after[new].key()),
            });
        }
    }

    for (index, block) in after.iter().enumerate() {
        if in_order.contains(&index) {
            let old = &before[before_index[block.key()]];
            block_patches(old, block, &mut patches);
            continue;
        }
        let (path, position) = match index.checked_sub(1) {
            Some(previous) => (Path::block(after[previous].key()), InsertPosition::After),
            None => (Path(vec![PathSegment::Index(0)]), InsertPosition::Before),
        };
        patches.push(Patch::Insert {
            path,
            position,
            items: vec![block.to_json()],
        });
    }
    patches
}

fn block_patches(old: &Block, new: &Block, patches: &mut Vec<Patch>) {
    if old == new {
        return;
    }
    match (old, new) {
        (Block::Text(old), Block::Text(new)) => text_block_patches(old, new, patches),
        _ => patches.push(Patch::Set {
            path: Path::block(new.key()),
            value: new.to_json(),
        }),
    }
}

fn text_block_patches(old: &TextBlock, new: &TextBlock, patches: &mut Vec<Patch>) {
    let path = || Path::block(new.key.clone());

    field_patch(path().with_field("style"), &old.style, &new.style, patches);
    field_patch(
        path().with_field("listItem"),
        &old.list_item,
        &new.list_item,
        patches,
    );
    field_patch(path().with_field("level"), &old.level, &new.level, patches);

    if old.mark_defs != new.mark_defs {
        patches.push(Patch::Set {
            path: path().with_field("markDefs"),
            value: Value::Array(new.mark_defs.iter().map(|m| m.to_json()).collect()),
        });
    }

    let same_keys = old.children.len() == new.children.len()
        && old
            .children
            .iter()
            .zip(&new.children)
            .all(|(a, b)| a.key() == b.key());
    if !same_keys {
        patches.push(Patch::Set {
            path: path().with_field("children"),
            value: Value::Array(new.children.iter().map(Child::to_json).collect()),
        });
        return;
    }

    for (a, b) in old.children.iter().zip(&new.children) {
        if a == b {
            continue;
        }
        let child_path = Path::child(new.key.clone(), b.key());
        match (a, b) {
            (Child::Span(a), Child::Span(b)) => {
                if a.text != b.text {
                    patches.push(Patch::Set {
                        path: child_path.clone().with_field("text"),
                        value: json!(b.text),
                    });
                }
                if a.marks != b.marks {
                    patches.push(Patch::Set {
                        path: child_path.with_field("marks"),
                        value: json!(b.marks),
                    });
                }
            }
            _ => patches.push(Patch::Set {
                path: child_path,
                value: b.to_json(),
            }),
        }
    }
}

fn field_patch<T>(path: Path, old: &Option<T>, new: &Option<T>, patches: &mut Vec<Patch>)
where
    T: PartialEq + serde::Serialize,
{
    if old == new {
        return;
    }
    patches.push(match new {
        Some(value) => Patch::Set {
            path,
            value: json!(value),
        },
        None => Patch::Unset { path },
    });
}

/// Positions of one longest strictly increasing subsequence of `seq`.
fn longest_increasing(seq: &[usize]) -> Vec<usize> {
    // tails[len] is the position of the smallest tail of a run of len + 1.
    let mut tails: Vec<usize> = Vec::new();
    let mut previous = vec![None; seq.len()];
    for (position, &value) in seq.iter().enumerate() {
        let slot = tails.partition_point(|&t| seq[t] < value);
        if slot > 0 {
            previous[position] = Some(tails[slot - 1]);
        }
        if slot == tails.len() {
            tails.push(position);
        } else {
            tails[slot] = position;
        }
    }
    let mut run = Vec::with_capacity(tails.len());
    let mut cursor = tails.last().copied();
    while let Some(position) = cursor {
        run.push(position);
        cursor = previous[position];
    }
    run.reverse();
    run
}

#[cfg(test)]
mod tests {
    use super::super::apply_to_json;
    use super::*;
    use crate::document::{BlockObject, Span};

    fn block(key: &str, text: &str) -> Block {
        Block::Text(TextBlock::with_text(key, format!("{key}s"), text))
    }

    fn applied(before: &[Block], after: &[Block]) -> Value {
        let mut json = value_to_json(before);
        for patch in diff_values(before, after) {
            apply_to_json(&mut json, &patch).unwrap();
        }
        json
    }

    #[test]
    fn longest_increasing_subsequence() {
        assert_eq!(longest_increasing(&[0, 1, 2]), vec![0, 1, 2]);
        assert_eq!(longest_increasing(&[2, 0, 1]), vec![1, 2]);
        assert!(longest_increasing(&[]).is_empty());
    }

    #[test]
    fn text_edit_is_a_single_set() {
        let before = vec![block("a", "hello")];
        let after = vec![block("a", "hello!")];
        assert_eq!(
            diff_values(&before, &after),
            vec![Patch::Set {
                path: Path::child("a", "as").with_field("text"),
                value: json!("hello!"),
            }]
        );
    }

    #[test]
    fn inserted_block_goes_after_its_predecessor() {
        let before = vec![block("a", "1"), block("c", "3")];
        let after = vec![block("a", "1"), block("b", "2"), block("c", "3")];
        let patches = diff_values(&before, &after);
        assert!(matches!(
            patches.as_slice(),
            [Patch::Insert { position: InsertPosition::After, .. }]
        ));
        assert_eq!(applied(&before, &after), value_to_json(&after));
    }

    #[test]
    fn moved_and_removed_blocks() {
        let before = vec![block("a", "1"), block("b", "2"), block("c", "3"), block("d", "4")];
        let after = vec![block("c", "3"), block("a", "1"), block("b", "2!")];
        assert_eq!(applied(&before, &after), value_to_json(&after));
    }

    #[test]
    fn property_changes() {
        let mut list = TextBlock::with_text("a", "as", "x");
        list.list_item = Some("bullet".into());
        list.level = Some(1);
        let before = vec![Block::Text(list.clone())];
        list.list_item = None;
        list.level = None;
        list.children = vec![
            Child::Span(Span::new("as", "x")),
            Child::Span(Span::new("n", "y").with_marks(["em"])),
        ];
        let after = vec![Block::Text(list)];
        let patches = diff_values(&before, &after);
        assert!(patches.contains(&Patch::Unset {
            path: Path::block("a").with_field("listItem")
        }));
        assert_eq!(applied(&before, &after), value_to_json(&after));
    }

    #[test]
    fn objects_and_empty_values_are_replaced_whole() {
        let before = vec![Block::Object(BlockObject::new("i", "image").with_field("src", "a.png"))];
        let after = vec![Block::Object(BlockObject::new("i", "image").with_field("src", "b.png"))];
        assert_eq!(applied(&before, &after), value_to_json(&after));
        assert_eq!(
            diff_values(&before, &[]),
            vec![Patch::Set {
                path: Path::default(),
                value: json!([]),
            }]
        );
    }
}
