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

//! The text editing engine seam.
//!
//! The behavior pipeline never touches the document directly. It goes
//! through [`EditingEngine`], which applies primitive [`Operation`]s, keeps
//! the selection mapped across them and records every applied operation
//! until [`EditingEngine::take_changes`] drains the log.
//!
//! [`DocumentEngine`] is the in-memory implementation used by default.

mod history;
mod normalize;
mod operation;
mod reconcile;
mod transform;

pub use history::{History, HistoryEntry};
pub(crate) use normalize::normalize;
pub use operation::{BlockProps, Operation};
pub use reconcile::reconcile;

use crate::document::Block;
use crate::error::EngineError;
use crate::selection::EditorSelection;

/// Node, path and range primitives the executor is written against.
pub trait EditingEngine {
    fn value(&self) -> &[Block];

    fn selection(&self) -> Option<&EditorSelection>;

    /// Apply one operation, mapping the selection across it.
    fn apply(&mut self, op: Operation) -> Result<(), EngineError>;

    /// Replace the selection. Direction is recomputed from document order.
    fn set_selection(&mut self, selection: Option<EditorSelection>);

    /// Drain the operations applied since the previous call.
    fn take_changes(&mut self) -> Vec<Operation>;
}

/// Map a selection across `op`, which is about to be applied to `before`.
pub(crate) fn transform_selection(
    op: &Operation,
    before: &[Block],
    selection: &EditorSelection,
) -> Option<EditorSelection> {
    Some(EditorSelection {
        anchor: op.transform_point(before, &selection.anchor)?,
        focus: op.transform_point(before, &selection.focus)?,
        backward: selection.backward,
    })
}

/// A `Vec<Block>` plus selection and change log.
#[derive(Debug, Default)]
pub struct DocumentEngine {
    value: Vec<Block>,
    selection: Option<EditorSelection>,
    changes: Vec<Operation>,
}

impl DocumentEngine {
    pub fn new(value: Vec<Block>) -> Self {
        Self {
            value,
            selection: None,
            changes: Vec::new(),
        }
    }
}

impl EditingEngine for DocumentEngine {
    fn value(&self) -> &[Block] {
        &self.value
    }

    fn selection(&self) -> Option<&EditorSelection> {
        self.selection.as_ref()
    }

    fn apply(&mut self, op: Operation) -> Result<(), EngineError> {
        let selection = self
            .selection
            .as_ref()
            .and_then(|s| transform_selection(&op, &self.value, s));
        op.apply(&mut self.value)?;
        self.selection = selection.map(|s| s.with_direction(&self.value));
        self.changes.push(op);
        Ok(())
    }

    fn set_selection(&mut self, selection: Option<EditorSelection>) {
        self.selection = selection.map(|s| s.with_direction(&self.value));
    }

    fn take_changes(&mut self) -> Vec<Operation> {
        std::mem::take(&mut self.changes)
    }
}
