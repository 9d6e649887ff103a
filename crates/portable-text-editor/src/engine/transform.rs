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

//! Rebasing recorded operations over remote ones.
//!
//! Local history stores operations relative to the document as it was when
//! they were committed. When a remote operation lands, every recorded
//! operation is shifted so its indices and offsets still point at the same
//! content. An operation whose target the remote change destroyed reports a
//! conflict and is dropped by the caller.

use super::Operation;
use crate::document::Block;
use crate::text::utf16_len;

/// Whether an index names an existing node or an insertion slot.
#[derive(Clone, Copy, PartialEq, Eq)]
enum IndexKind {
    Node,
    Slot,
}

use IndexKind::{Node, Slot};

impl Operation {
    /// Shift this (earlier, local) operation over `remote`, which is about
    /// to be applied to `before`. Returns `false` on conflict.
    pub(crate) fn rebase(&mut self, remote: &Operation, before: &[Block]) -> bool {
        match remote {
            Operation::InsertBlock { index: ri, .. } => {
                let ri = *ri;
                self.map_block_indices(|i, _| Some(if ri <= i { i + 1 } else { i }))
            }
            Operation::RemoveBlock { index: ri, block } => {
                let ri = *ri;
                if self.touches_block(block.key()) {
                    return false;
                }
                if let Operation::MergeBlock { index, .. } = self {
                    if *index + 1 == ri {
                        return false;
                    }
                }
                self.map_block_indices(|i, kind| {
                    if kind == Node && i == ri {
                        None
                    } else if i > ri {
                        Some(i - 1)
                    } else {
                        Some(i)
                    }
                })
            }
            Operation::MoveBlock { from, to } => {
                let (from, to) = (*from, *to);
                self.map_block_indices(|i, _| {
                    if i == from {
                        return Some(to);
                    }
                    let i = if i > from { i - 1 } else { i };
                    Some(if i >= to { i + 1 } else { i })
                })
            }
            Operation::ReplaceBlock { .. } | Operation::SetBlock { .. } => true,
            Operation::SplitBlock {
                index: ri,
                key,
                at,
                new_key,
                ..
            } => self.rebase_over_block_split(*ri, key, *at, new_key, before),
            Operation::MergeBlock {
                index: ri,
                key,
                at,
                next_key,
                ..
            } => self.rebase_over_block_merge(*ri, key, *at, next_key),
            Operation::InsertChild {
                block, index: ri, ..
            } => {
                let ri = *ri;
                self.map_child_indices(block, |i, _| {
                    Some(if ri <= i { i + 1 } else { i })
                })
            }
            Operation::RemoveChild {
                block,
                index: ri,
                child,
            } => {
                let ri = *ri;
                if self.targets_child(block, child.key()) {
                    return false;
                }
                if let Operation::MergeChild {
                    block: b, index, ..
                } = self
                {
                    if b == block && *index + 1 == ri {
                        return false;
                    }
                }
                self.map_child_indices(block, |i, kind| {
                    if kind == Node && i == ri {
                        None
                    } else if i > ri {
                        Some(i - 1)
                    } else {
                        Some(i)
                    }
                })
            }
            Operation::SetChild {
                block, old, new, ..
            } => {
                if old.key() != new.key() {
                    if let Some((b, c, _)) = self.text_target_mut() {
                        if b == block && c == old.key() {
                            *c = new.key().to_owned();
                        }
                    }
                }
                true
            }
            Operation::InsertText {
                block,
                child,
                offset,
                text,
            } => self.rebase_over_insert_text(block, child, *offset, utf16_len(text)),
            Operation::RemoveText {
                block,
                child,
                offset,
                text,
            } => self.rebase_over_remove_text(block, child, *offset, utf16_len(text)),
            Operation::SplitChild {
                block,
                child,
                index,
                offset,
                new_key,
            } => self.rebase_over_child_split(block, child, *index, *offset, new_key),
            Operation::MergeChild {
                block,
                child,
                index,
                offset,
                next_key,
            } => self.rebase_over_child_merge(block, child, *index, *offset, next_key),
        }
    }

    fn rebase_over_block_split(
        &mut self,
        ri: usize,
        key: &str,
        at: usize,
        new_key: &str,
        before: &[Block],
    ) -> bool {
        match self {
            Operation::SplitBlock { key: k, .. } if k == key => return false,
            Operation::MergeBlock {
                key: k, next_key, ..
            } if k == key || next_key == key => return false,
            _ => {}
        }
        if !self.map_block_indices(|i, _| Some(if i > ri { i + 1 } else { i })) {
            return false;
        }
        let moved_child = |child: &str| {
            before
                .get(ri)
                .and_then(Block::as_text)
                .and_then(|b| b.child_index(child))
                .is_some_and(|i| i >= at)
        };
        match self {
            Operation::InsertText { block, child, .. }
            | Operation::RemoveText { block, child, .. }
                if block == key && moved_child(child.as_str()) =>
            {
                *block = new_key.to_owned();
            }
            _ => {}
        }
        if let Some((block, index, kind)) = self.child_index_mut() {
            let moves = match kind {
                Node => *index >= at,
                Slot => *index > at,
            };
            if block == key && moves {
                *block = new_key.to_owned();
                *index -= at;
            }
        }
        true
    }

    fn rebase_over_block_merge(
        &mut self,
        ri: usize,
        key: &str,
        at: usize,
        next_key: &str,
    ) -> bool {
        match self {
            Operation::RemoveBlock { index, .. }
            | Operation::ReplaceBlock { index, .. }
                if *index == ri + 1 =>
            {
                return false
            }
            Operation::SplitBlock { key: k, .. } if k == next_key => return false,
            Operation::MergeBlock {
                key: k, next_key: n, ..
            } if k == key || k == next_key || n == next_key => return false,
            _ => {}
        }
        if !self.map_block_indices(|i, _| Some(if i > ri + 1 { i - 1 } else { i })) {
            return false;
        }
        if let Some((block, index, _)) = self.child_index_mut() {
            if block == next_key {
                *block = key.to_owned();
                *index += at;
                return true;
            }
        }
        if let Some((block, _, _)) = self.text_target_mut() {
            if block == next_key {
                *block = key.to_owned();
            }
        }
        if let Operation::SetBlock { key: k, .. } = self {
            if k == next_key {
                return false;
            }
        }
        true
    }

    fn rebase_over_insert_text(
        &mut self,
        block: &str,
        child: &str,
        ro: usize,
        len: usize,
    ) -> bool {
        match self {
            Operation::InsertText {
                block: b,
                child: c,
                offset,
                text,
            } if b == block && c == child => {
                let local_len = utf16_len(text);
                if ro <= *offset {
                    *offset += len;
                } else if ro < *offset + local_len {
                    return false;
                }
            }
            Operation::RemoveText {
                block: b,
                child: c,
                offset,
                ..
            } if b == block && c == child => {
                if ro < *offset {
                    *offset += len;
                }
            }
            Operation::SplitChild {
                block: b,
                child: c,
                offset,
                ..
            } if b == block && c == child => {
                *offset += len;
            }
            Operation::MergeChild {
                block: b,
                child: c,
                offset,
                ..
            } if b == block && c == child => {
                if ro < *offset {
                    *offset += len;
                }
            }
            _ => {}
        }
        true
    }

    fn rebase_over_remove_text(
        &mut self,
        block: &str,
        child: &str,
        ro: usize,
        len: usize,
    ) -> bool {
        let end = ro + len;
        match self {
            Operation::InsertText {
                block: b,
                child: c,
                offset,
                text,
            } if b == block && c == child => {
                let local_end = *offset + utf16_len(text);
                if ro < local_end && end > *offset {
                    return false;
                }
                if end <= *offset {
                    *offset -= len;
                }
            }
            Operation::RemoveText {
                block: b,
                child: c,
                offset,
                ..
            } if b == block && c == child => {
                if end <= *offset {
                    *offset -= len;
                } else if ro < *offset {
                    *offset = ro;
                }
            }
            Operation::SplitChild {
                block: b,
                child: c,
                offset,
                ..
            } if b == block && c == child => {
                *offset = offset.saturating_sub(len);
            }
            Operation::MergeChild {
                block: b,
                child: c,
                offset,
                ..
            } if b == block && c == child => {
                if end <= *offset {
                    *offset -= len;
                } else if ro < *offset {
                    return false;
                }
            }
            _ => {}
        }
        true
    }

    fn rebase_over_child_split(
        &mut self,
        block: &str,
        child: &str,
        ri: usize,
        ro: usize,
        new_key: &str,
    ) -> bool {
        match self {
            Operation::SplitChild {
                block: b, child: c, ..
            }
            | Operation::MergeChild {
                block: b, child: c, ..
            } if b == block && c == child => return false,
            _ => {}
        }
        if !self.map_child_indices(block, |i, _| Some(if i > ri { i + 1 } else { i })) {
            return false;
        }
        match self {
            Operation::InsertText {
                block: b,
                child: c,
                offset,
                text,
            } if b == block && c == child => {
                if *offset >= ro {
                    *c = new_key.to_owned();
                    *offset -= ro;
                } else if *offset + utf16_len(text) > ro {
                    return false;
                }
            }
            Operation::RemoveText {
                block: b,
                child: c,
                offset,
                ..
            } if b == block && c == child && *offset > ro => {
                *c = new_key.to_owned();
                *offset -= ro;
            }
            _ => {}
        }
        true
    }

    fn rebase_over_child_merge(
        &mut self,
        block: &str,
        child: &str,
        ri: usize,
        ro: usize,
        next_key: &str,
    ) -> bool {
        if self.targets_child(block, next_key) && self.text_target_mut().is_none() {
            return false;
        }
        match self {
            Operation::SplitChild {
                block: b,
                new_key,
                ..
            } if b == block && new_key == next_key => return false,
            Operation::SplitChild {
                block: b, child: c, ..
            }
            | Operation::MergeChild {
                block: b, child: c, ..
            } if b == block && c == next_key => return false,
            _ => {}
        }
        if !self.map_child_indices(block, |i, _| Some(if i > ri + 1 { i - 1 } else { i })) {
            return false;
        }
        if let Some((b, c, offset)) = self.text_target_mut() {
            if b == block && c == next_key {
                *c = child.to_owned();
                *offset += ro;
            }
        }
        true
    }

    // ------------------------------------------------------------------
    // Field accessors
    // ------------------------------------------------------------------

    fn map_block_indices(
        &mut self,
        f: impl Fn(usize, IndexKind) -> Option<usize>,
    ) -> bool {
        let apply = |index: &mut usize, kind| match f(*index, kind) {
            Some(mapped) => {
                *index = mapped;
                true
            }
            None => false,
        };
        match self {
            Operation::InsertBlock { index, .. } => apply(index, Slot),
            Operation::RemoveBlock { index, .. }
            | Operation::ReplaceBlock { index, .. }
            | Operation::SplitBlock { index, .. }
            | Operation::MergeBlock { index, .. } => apply(index, Node),
            Operation::MoveBlock { from, to } => apply(from, Node) && apply(to, Slot),
            _ => true,
        }
    }

    fn map_child_indices(
        &mut self,
        block: &str,
        f: impl Fn(usize, IndexKind) -> Option<usize>,
    ) -> bool {
        let Some((b, index, kind)) = self.child_index_mut() else {
            return true;
        };
        if b != block {
            return true;
        }
        match f(*index, kind) {
            Some(mapped) => {
                *index = mapped;
                true
            }
            None => false,
        }
    }

    fn child_index_mut(&mut self) -> Option<(&mut String, &mut usize, IndexKind)> {
        match self {
            Operation::InsertChild { block, index, .. } => Some((block, index, Slot)),
            Operation::RemoveChild { block, index, .. }
            | Operation::SetChild { block, index, .. }
            | Operation::SplitChild { block, index, .. }
            | Operation::MergeChild { block, index, .. } => Some((block, index, Node)),
            _ => None,
        }
    }

    fn text_target_mut(&mut self) -> Option<(&mut String, &mut String, &mut usize)> {
        match self {
            Operation::InsertText {
                block,
                child,
                offset,
                ..
            }
            | Operation::RemoveText {
                block,
                child,
                offset,
                ..
            } => Some((block, child, offset)),
            _ => None,
        }
    }

    fn targets_child(&self, block: &str, child: &str) -> bool {
        match self {
            Operation::RemoveChild { block: b, child: c, .. } => {
                b == block && c.key() == child
            }
            Operation::SetChild { block: b, old, .. } => b == block && old.key() == child,
            Operation::InsertText { block: b, child: c, .. }
            | Operation::RemoveText { block: b, child: c, .. }
            | Operation::SplitChild { block: b, child: c, .. }
            | Operation::MergeChild { block: b, child: c, .. } => {
                b == block && c == child
            }
            _ => false,
        }
    }

    fn touches_block(&self, key: &str) -> bool {
        match self {
            Operation::SetBlock { key: k, .. } | Operation::SplitBlock { key: k, .. } => {
                k == key
            }
            Operation::MergeBlock { key: k, next_key, .. } => k == key || next_key == key,
            Operation::InsertChild { block, .. }
            | Operation::RemoveChild { block, .. }
            | Operation::SetChild { block, .. }
            | Operation::InsertText { block, .. }
            | Operation::RemoveText { block, .. }
            | Operation::SplitChild { block, .. }
            | Operation::MergeChild { block, .. } => block == key,
            _ => false,
        }
    }
}
