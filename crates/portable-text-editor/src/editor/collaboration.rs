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

//! Collaboration glue: merging changes made elsewhere.
//!
//! Remote patches are applied to a JSON copy of the value, the result is
//! reconciled into engine operations, and every operation rebases the local
//! history before it is applied. Undo therefore keeps reverting only what
//! this editor did. Remote changes are not echoed as `mutation` events.

use tracing::{debug, warn};

use super::{selection_resolves, Editor};
use crate::document::Block;
use crate::engine::reconcile;
use crate::error::{EditorError, EngineError};
use crate::patches::{patched_value, Patch};

impl Editor {
    /// Apply patches produced by another editor's `mutation` events.
    ///
    /// All or nothing: on error the value, selection and history are left
    /// as they were.
    pub fn apply_remote_patches(&mut self, patches: &[Patch]) -> Result<(), EditorError> {
        debug!(patches = patches.len(), "applying remote patches");
        let target = patched_value(self.engine.value(), patches).inspect_err(|err| {
            warn!(%err, "remote patches rejected");
        })?;
        self.merge_external(&target)
            .map_err(|err| EditorError::Patch(err.into()))
    }

    /// Bring the value to `target` without recording history.
    pub(super) fn merge_external(&mut self, target: &[Block]) -> Result<(), EngineError> {
        self.commit();
        let operations = reconcile(self.engine.value(), target)?;
        let history = self.history.clone();
        let selection = self.engine.selection().cloned();

        let mut applied = Vec::with_capacity(operations.len());
        for op in operations {
            let before = self.engine.value().to_vec();
            self.history.rebase(&op, &before);
            if let Err(err) = self.engine.apply(op.clone()) {
                warn!(%err, "external change does not apply");
                self.engine.take_changes();
                self.revert(&applied);
                self.history = history;
                self.engine.set_selection(selection);
                return Err(err);
            }
            applied.push(op);
        }
        self.engine.take_changes();

        if let Some(current) = self.engine.selection() {
            if !selection_resolves(self.engine.value(), current) {
                self.engine.set_selection(None);
            }
        }
        self.emit_selection(&selection, false);
        self.notify_watchers();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::config::EditorConfig;
    use crate::document::{IncrementingKeyGenerator, TextBlock};
    use crate::engine::DocumentEngine;
    use crate::error::PatchError;
    use crate::selection::{EditorSelection, EditorSelectionPoint, Path, PathSegment};

    fn editor() -> Editor {
        let engine = DocumentEngine::new(vec![Block::Text(TextBlock::with_text("b1", "s1", "hello"))]);
        let mut editor = Editor::with_engine(
            EditorConfig::default(),
            Box::new(engine),
            Box::new(IncrementingKeyGenerator::new()),
        )
        .unwrap();
        let _ = editor.send(crate::behaviors::SyntheticEvent::Select {
            selection: Some(EditorSelection::collapsed(EditorSelectionPoint::in_child(
                "b1", "s1", 5,
            ))),
        });
        editor
    }

    fn text_path() -> Path {
        Path::child("b1", "s1").with_field("text")
    }

    #[test]
    fn remote_text_change_keeps_the_caret_in_place() {
        let mut editor = editor();
        editor
            .apply_remote_patches(&[Patch::Set {
                path: text_path(),
                value: json!(">> hello"),
            }])
            .unwrap();
        assert_eq!(editor.value()[0].as_text().unwrap().text(), ">> hello");
        assert_eq!(editor.selection().unwrap().focus.offset, 8);
    }

    #[test]
    fn unresolvable_remote_patch_changes_nothing() {
        let mut editor = editor();
        let err = editor
            .apply_remote_patches(&[Patch::Set {
                path: Path(vec![PathSegment::key("nope"), PathSegment::Field("style".into())]),
                value: json!("h1"),
            }])
            .unwrap_err();
        assert!(matches!(err, EditorError::Patch(PatchError::PathNotFound(_))));
        assert_eq!(editor.value()[0].as_text().unwrap().text(), "hello");
    }

    #[test]
    fn removing_the_focused_block_clears_the_selection() {
        let mut editor = editor();
        editor
            .apply_remote_patches(&[Patch::Unset {
                path: Path::block("b1"),
            }])
            .unwrap();
        assert!(editor.value().is_empty());
        assert!(editor.selection().is_none());
    }
}
