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

//! Undo / redo stacks of committed action sets.
//!
//! Each committed action set pushes one [`HistoryEntry`] holding the
//! operations it applied plus the selection around it. Undo replays the
//! inverses in reverse order. Remote operations never enter the stacks; they
//! rebase the recorded entries instead, so undo only ever reverts local
//! work.

use tracing::debug;

use super::{transform_selection, Operation};
use crate::document::Block;
use crate::selection::EditorSelection;

/// Entries kept before the oldest is discarded.
const DEFAULT_LIMIT: usize = 100;

/// One undo step.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    pub operations: Vec<Operation>,
    pub selection_before: Option<EditorSelection>,
    pub selection_after: Option<EditorSelection>,
}

impl HistoryEntry {
    /// Operations that revert this entry, in application order.
    pub fn inverse_operations(&self) -> Vec<Operation> {
        self.operations.iter().rev().map(Operation::inverse).collect()
    }

    fn rebase(&mut self, remote: &Operation, before: &[Block]) -> bool {
        for op in &mut self.operations {
            if !op.rebase(remote, before) {
                return false;
            }
        }
        self.selection_before = self
            .selection_before
            .take()
            .and_then(|s| transform_selection(remote, before, &s));
        self.selection_after = self
            .selection_after
            .take()
            .and_then(|s| transform_selection(remote, before, &s));
        true
    }
}

#[derive(Clone, Debug)]
pub struct History {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_limit(DEFAULT_LIMIT)
    }
}

impl History {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit,
        }
    }

    /// Record a fresh local edit. Clears the redo stack.
    pub fn push_undo(&mut self, entry: HistoryEntry) {
        if entry.operations.is_empty() {
            return;
        }
        self.redo_stack.clear();
        self.push_undo_keep_redo(entry);
    }

    /// Record a redone entry without touching the redo stack.
    pub fn push_undo_keep_redo(&mut self, entry: HistoryEntry) {
        self.undo_stack.push(entry);
        if self.undo_stack.len() > self.limit {
            self.undo_stack.remove(0);
        }
    }

    pub fn pop_undo(&mut self) -> Option<HistoryEntry> {
        self.undo_stack.pop()
    }

    pub fn push_redo(&mut self, entry: HistoryEntry) {
        self.redo_stack.push(entry);
    }

    pub fn pop_redo(&mut self) -> Option<HistoryEntry> {
        self.redo_stack.pop()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Shift every recorded entry over a remote operation about to be
    /// applied to `before`. Entries the remote change conflicts with are
    /// dropped.
    pub fn rebase(&mut self, remote: &Operation, before: &[Block]) {
        for stack in [&mut self.undo_stack, &mut self.redo_stack] {
            let len = stack.len();
            stack.retain_mut(|entry| entry.rebase(remote, before));
            if stack.len() != len {
                debug!(
                    dropped = len - stack.len(),
                    "history entries conflict with a remote change"
                );
            }
        }
    }
}
