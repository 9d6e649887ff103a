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

//! Compute the operations that turn one value into another.
//!
//! Used whenever a value arrives from outside the behavior pipeline (remote
//! patches, `set_value`). Nodes are matched by key, so a block or span that
//! survives keeps its identity and the selection inside it is carried over.
//! Text changes inside a surviving span become a single remove/insert pair
//! around the common prefix and suffix.

use super::{BlockProps, Operation};
use crate::document::{Block, Child, TextBlock};
use crate::error::EngineError;
use crate::text::{slice, utf16_len};

/// Operations turning `before` into `after`, in application order.
pub fn reconcile(
    before: &[Block],
    after: &[Block],
) -> Result<Vec<Operation>, EngineError> {
    let mut current = before.to_vec();
    let mut ops = Vec::new();
    let mut push = |op: Operation, current: &mut Vec<Block>| {
        op.apply(current)?;
        ops.push(op);
        Ok::<_, EngineError>(())
    };

    for index in (0..current.len()).rev() {
        let key = current[index].key();
        if !after.iter().any(|b| b.key() == key) {
            let block = current[index].clone();
            push(Operation::RemoveBlock { index, block }, &mut current)?;
        }
    }

    for (index, target) in after.iter().enumerate() {
        let existing = current
            .iter()
            .skip(index)
            .position(|b| b.key() == target.key())
            .map(|p| p + index);
        match existing {
            Some(from) => {
                if from != index {
                    push(Operation::MoveBlock { from, to: index }, &mut current)?;
                }
                for op in block_operations(index, &current[index], target) {
                    push(op, &mut current)?;
                }
            }
            None => push(
                Operation::InsertBlock {
                    index,
                    block: target.clone(),
                },
                &mut current,
            )?,
        }
    }

    while current.len() > after.len() {
        let index = current.len() - 1;
        let block = current[index].clone();
        push(Operation::RemoveBlock { index, block }, &mut current)?;
    }

    Ok(ops)
}

fn block_operations(index: usize, old: &Block, new: &Block) -> Vec<Operation> {
    if old == new {
        return Vec::new();
    }
    match (old, new) {
        (Block::Text(old), Block::Text(new)) => text_block_operations(old, new),
        _ => vec![Operation::ReplaceBlock {
            index,
            old: old.clone(),
            new: new.clone(),
        }],
    }
}

fn text_block_operations(old: &TextBlock, new: &TextBlock) -> Vec<Operation> {
    let key = &old.key;
    let mut ops = Vec::new();
    let (old_props, new_props) = (BlockProps::of(old), BlockProps::of(new));
    if old_props != new_props {
        ops.push(Operation::SetBlock {
            key: key.clone(),
            old: old_props,
            new: new_props,
        });
    }

    let mut children = old.children.clone();
    for index in (0..children.len()).rev() {
        if new.child(children[index].key()).is_none() {
            let child = children.remove(index);
            ops.push(Operation::RemoveChild {
                block: key.clone(),
                index,
                child,
            });
        }
    }

    for (index, target) in new.children.iter().enumerate() {
        match children.get(index) {
            Some(existing) if existing.key() == target.key() => {
                ops.extend(child_operations(key, index, existing, target));
                children[index] = target.clone();
            }
            _ => {
                if let Some(from) = children
                    .iter()
                    .skip(index)
                    .position(|c| c.key() == target.key())
                    .map(|p| p + index)
                {
                    let moved = children.remove(from);
                    ops.push(Operation::RemoveChild {
                        block: key.clone(),
                        index: from,
                        child: moved,
                    });
                }
                children.insert(index, target.clone());
                ops.push(Operation::InsertChild {
                    block: key.clone(),
                    index,
                    child: target.clone(),
                });
            }
        }
    }

    while children.len() > new.children.len() {
        let index = children.len() - 1;
        let child = children.remove(index);
        ops.push(Operation::RemoveChild {
            block: key.clone(),
            index,
            child,
        });
    }
    ops
}

fn child_operations(
    block: &str,
    index: usize,
    old: &Child,
    new: &Child,
) -> Vec<Operation> {
    if old == new {
        return Vec::new();
    }
    let (Child::Span(old_span), Child::Span(new_span)) = (old, new) else {
        return vec![Operation::SetChild {
            block: block.to_owned(),
            index,
            old: old.clone(),
            new: new.clone(),
        }];
    };

    let mut ops = text_operations(block, &old_span.key, &old_span.text, &new_span.text);
    if old_span.marks != new_span.marks {
        let mut updated = old_span.clone();
        updated.text = new_span.text.clone();
        ops.push(Operation::SetChild {
            block: block.to_owned(),
            index,
            old: Child::Span(updated),
            new: new.clone(),
        });
    }
    ops
}

/// A remove/insert pair replacing the differing middle of `old`.
fn text_operations(
    block: &str,
    child: &str,
    old: &str,
    new: &str,
) -> Vec<Operation> {
    if old == new {
        return Vec::new();
    }
    let old_units: Vec<u16> = old.encode_utf16().collect();
    let new_units: Vec<u16> = new.encode_utf16().collect();
    let mut prefix = old_units
        .iter()
        .zip(&new_units)
        .take_while(|(a, b)| a == b)
        .count();
    // Never split a surrogate pair.
    while prefix > 0 && is_low_surrogate(old_units.get(prefix)) {
        prefix -= 1;
    }
    let max_suffix = old_units.len().min(new_units.len()) - prefix;
    let mut suffix = old_units
        .iter()
        .rev()
        .zip(new_units.iter().rev())
        .take(max_suffix)
        .take_while(|(a, b)| a == b)
        .count();
    while suffix > 0 && is_low_surrogate(old_units.get(old_units.len() - suffix)) {
        suffix -= 1;
    }

    let mut ops = Vec::new();
    let removed = slice(old, prefix, utf16_len(old) - suffix);
    if !removed.is_empty() {
        ops.push(Operation::RemoveText {
            block: block.to_owned(),
            child: child.to_owned(),
            offset: prefix,
            text: removed.to_owned(),
        });
    }
    let inserted = slice(new, prefix, utf16_len(new) - suffix);
    if !inserted.is_empty() {
        ops.push(Operation::InsertText {
            block: block.to_owned(),
            child: child.to_owned(),
            offset: prefix,
            text: inserted.to_owned(),
        });
    }
    ops
}

fn is_low_surrogate(unit: Option<&u16>) -> bool {
    unit.is_some_and(|u| (0xDC00..=0xDFFF).contains(u))
}
