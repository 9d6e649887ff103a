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

//! `insert.*` handlers other than breaks.

use super::{unresolvable, ActionContext};
use crate::behaviors::{Placement, SelectPlacement, TypedValue};
use crate::document::{Block, BlockObject, Child, InlineObject, MarkDef, Span};
use crate::engine::{BlockProps, Operation};
use crate::error::ActionError;
use crate::selection::{BlockOffset, EditorSelectionPoint};
use crate::selectors::{
    get_focus_block, get_focus_block_offset, get_focus_span, get_focus_text_block,
    is_empty_text_block,
};
use crate::text::utf16_len;

impl ActionContext<'_> {
    /// Where the caret is, as a text block key plus block offset.
    fn caret_in_text_block(&self) -> Result<BlockOffset, ActionError> {
        let snapshot = self.snapshot();
        get_focus_text_block(&snapshot)
            .and(get_focus_block_offset(&snapshot))
            .ok_or_else(|| unresolvable("focus text block"))
    }

    pub(super) fn insert_text(&mut self, text: &str) -> Result<(), ActionError> {
        self.delete_expanded()?;
        let snapshot = self.snapshot();
        let block = get_focus_text_block(&snapshot)
            .ok_or_else(|| unresolvable("focus text block"))?;
        let offset = get_focus_block_offset(&snapshot)
            .ok_or_else(|| unresolvable("focus offset"))?;

        // The span the text joins: the focus span, or the span ending at
        // the caret when the caret sits on an inline object.
        let (span, span_offset) = match get_focus_span(&snapshot) {
            Some(span) => {
                let focus = snapshot
                    .selection
                    .as_ref()
                    .map_or(0, |s| s.focus.offset.min(utf16_len(&span.text)));
                (span.clone(), focus)
            }
            None => {
                let point = crate::selectors::block_offset_to_point(
                    &snapshot.value,
                    &offset,
                    crate::selectors::Affinity::Backward,
                )
                .ok_or_else(|| unresolvable("span at caret"))?;
                let span = point
                    .path
                    .child_key()
                    .and_then(|key| block.child(key))
                    .and_then(Child::as_span)
                    .ok_or_else(|| unresolvable("span at caret"))?;
                (span.clone(), point.offset)
            }
        };

        let block_key = block.key.clone();
        let decorators: Vec<String> = span
            .marks
            .iter()
            .filter(|m| self.schema.has_decorator(m))
            .cloned()
            .collect();
        let pending = self.pending_marks.take();

        match pending {
            Some(pending) if !crate::document::same_marks(&pending, &decorators) => {
                let mut marks: Vec<String> = span
                    .marks
                    .iter()
                    .filter(|m| !self.schema.has_decorator(m))
                    .cloned()
                    .collect();
                marks.extend(pending);
                let index = self.split_at(&block_key, offset.offset)?;
                let key = self.keys.next_key();
                self.apply(Operation::InsertChild {
                    block: block_key.clone(),
                    index,
                    child: Child::Span(Span::new(key.clone(), text).with_marks(marks)),
                })?;
                self.select_point(EditorSelectionPoint::in_child(
                    block_key,
                    key,
                    utf16_len(text),
                ));
            }
            _ => {
                self.apply(Operation::InsertText {
                    block: block_key.clone(),
                    child: span.key.clone(),
                    offset: span_offset,
                    text: text.to_owned(),
                })?;
                self.select_point(EditorSelectionPoint::in_child(
                    block_key,
                    span.key,
                    span_offset + utf16_len(text),
                ));
            }
        }
        Ok(())
    }

    pub(super) fn insert_span(
        &mut self,
        text: &str,
        decorators: &[String],
        annotations: &[TypedValue],
    ) -> Result<(), ActionError> {
        self.delete_expanded()?;
        let caret = self.caret_in_text_block()?;
        let block_key = caret
            .path
            .block_key()
            .ok_or_else(|| unresolvable("focus text block"))?
            .to_owned();

        let mut marks: Vec<String> = decorators
            .iter()
            .filter(|d| self.schema.has_decorator(d))
            .cloned()
            .collect();
        let mut defs = Vec::new();
        for annotation in annotations {
            if self.schema.annotation(&annotation.name).is_none() {
                return Err(unresolvable(format!("annotation `{}`", annotation.name)));
            }
            let key = self.keys.next_key();
            marks.push(key.clone());
            defs.push(MarkDef {
                key,
                type_name: annotation.name.clone(),
                fields: annotation.value.clone(),
            });
        }
        if !defs.is_empty() {
            self.add_mark_defs(&block_key, defs)?;
        }

        let index = self.split_at(&block_key, caret.offset)?;
        let key = self.keys.next_key();
        self.apply(Operation::InsertChild {
            block: block_key.clone(),
            index,
            child: Child::Span(Span::new(key.clone(), text).with_marks(marks)),
        })?;
        self.select_point(EditorSelectionPoint::in_child(block_key, key, utf16_len(text)));
        Ok(())
    }

    pub(super) fn add_mark_defs(
        &mut self,
        block_key: &str,
        defs: Vec<MarkDef>,
    ) -> Result<(), ActionError> {
        let (_, block) = self.text_block(block_key)?;
        let old = BlockProps::of(&block);
        let mut new = old.clone();
        new.mark_defs.extend(defs);
        self.apply(Operation::SetBlock {
            key: block_key.to_owned(),
            old,
            new,
        })
    }

    pub(super) fn insert_inline_object(
        &mut self,
        object: &TypedValue,
    ) -> Result<(), ActionError> {
        if self.schema.inline_object(&object.name).is_none() {
            return Err(unresolvable(format!("inline object `{}`", object.name)));
        }
        self.delete_expanded()?;
        let caret = self.caret_in_text_block()?;
        let block_key = caret
            .path
            .block_key()
            .ok_or_else(|| unresolvable("focus text block"))?
            .to_owned();

        let index = self.split_at(&block_key, caret.offset)?;
        let key = self.keys.next_key();
        self.apply(Operation::InsertChild {
            block: block_key.clone(),
            index,
            child: Child::Object(InlineObject {
                key,
                type_name: object.name.clone(),
                fields: object.value.clone(),
            }),
        })?;

        // Keep a span after the object for the caret to land in.
        let (_, block) = self.text_block(&block_key)?;
        let after = match block.children.get(index + 1) {
            Some(Child::Span(span)) => span.key.clone(),
            _ => {
                let key = self.keys.next_key();
                self.apply(Operation::InsertChild {
                    block: block_key.clone(),
                    index: index + 1,
                    child: Child::Span(Span::new(key.clone(), "")),
                })?;
                key
            }
        };
        self.select_point(EditorSelectionPoint::in_child(block_key, after, 0));
        Ok(())
    }

    /// Where a block goes for `placement`, and which block it replaces.
    fn placement_index(&self, placement: Placement) -> (usize, Option<usize>) {
        let snapshot = self.snapshot();
        let focus = get_focus_block(&snapshot).map(|block| {
            let index = snapshot
                .value
                .iter()
                .position(|b| b.key() == block.key())
                .unwrap_or(0);
            (index, is_empty_text_block(block))
        });
        match (focus, placement) {
            (None, _) => (snapshot.value.len(), None),
            (Some((index, _)), Placement::Before) => (index, None),
            (Some((index, _)), Placement::After) => (index + 1, None),
            (Some((index, true)), Placement::Auto) => (index + 1, Some(index)),
            (Some((index, false)), Placement::Auto) => (index + 1, None),
        }
    }

    /// Insert a block relative to the focus block. Returns its key.
    pub(super) fn insert_block(
        &mut self,
        block: Block,
        placement: Placement,
        select: SelectPlacement,
    ) -> Result<String, ActionError> {
        let block = self.rekey_block(block);
        let key = block.key().to_owned();
        let (index, replaces) = self.placement_index(placement);
        self.apply(Operation::InsertBlock {
            index,
            block: block.clone(),
        })?;
        if let Some(replaced) = replaces {
            self.remove_block(replaced)?;
        }
        self.select_inserted(&key, select)?;
        Ok(key)
    }

    fn select_inserted(&mut self, key: &str, select: SelectPlacement) -> Result<(), ActionError> {
        let index = self.index_of(key)?;
        let block = &self.value()[index];
        let point = match select {
            SelectPlacement::Start => block.start_point(),
            SelectPlacement::End => block.end_point(),
            SelectPlacement::None => return Ok(()),
        };
        self.select_point(point);
        Ok(())
    }

    pub(super) fn insert_block_object(
        &mut self,
        object: &TypedValue,
        placement: Placement,
        select: SelectPlacement,
    ) -> Result<(), ActionError> {
        if self.schema.block_object(&object.name).is_none() {
            return Err(unresolvable(format!("block object `{}`", object.name)));
        }
        let block = Block::Object(BlockObject {
            key: self.keys.next_key(),
            type_name: object.name.clone(),
            fields: object.value.clone(),
        });
        self.insert_block(block, placement, select).map(drop)
    }

    /// Insert several blocks in order, placed as a group.
    pub(super) fn insert_blocks(
        &mut self,
        blocks: &[Block],
        placement: Placement,
    ) -> Result<(), ActionError> {
        if blocks.is_empty() {
            return Ok(());
        }
        let (index, replaces) = self.placement_index(placement);
        let mut last = None;
        for (offset, block) in blocks.iter().enumerate() {
            let block = self.rekey_block(block.clone());
            last = Some(block.key().to_owned());
            self.apply(Operation::InsertBlock {
                index: index + offset,
                block,
            })?;
        }
        if let Some(replaced) = replaces {
            self.remove_block(replaced)?;
        }
        match last {
            Some(key) => self.select_inserted(&key, SelectPlacement::End),
            None => Ok(()),
        }
    }
}
