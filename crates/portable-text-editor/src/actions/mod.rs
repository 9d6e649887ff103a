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

//! The action executor: carries out synthetic events against an
//! [`EditingEngine`] using only its primitive operations.
//!
//! Every handler reads the live value, decides on a list of operations and
//! applies them one at a time, so later operations always see the effect
//! of earlier ones. A handler that cannot resolve an address returns
//! [`ActionError::Unresolvable`] before touching the value; the editor logs
//! it and rolls back whatever the failing intent already applied.

mod blocks;
mod delete;
mod insert;
mod insert_break;
mod marks;
mod select;

use std::rc::Rc;

use tracing::debug;

use crate::behaviors::SyntheticEvent;
use crate::config::{EditorConfig, SoftBreakMode};
use crate::document::{Block, Child, KeyGenerator, Span, TextBlock};
use crate::engine::{BlockProps, EditingEngine, Operation};
use crate::error::ActionError;
use crate::schema::Schema;
use crate::selection::{
    block_index, BlockOffset, EditorSelection, EditorSelectionPoint, Path,
};
use crate::selectors::{
    block_offset_to_point, get_selection_end_point, get_selection_start_point,
    point_to_block_offset, Affinity,
};
use crate::snapshot::EditorSnapshot;

/// Everything a handler may touch.
pub(crate) struct ActionContext<'a> {
    pub engine: &'a mut dyn EditingEngine,
    pub schema: Rc<Schema>,
    pub config: &'a EditorConfig,
    pub keys: &'a mut dyn KeyGenerator,
    pub pending_marks: &'a mut Option<Vec<String>>,
}

/// Carry out one synthetic event.
pub(crate) fn execute(
    ctx: &mut ActionContext<'_>,
    event: &SyntheticEvent,
) -> Result<(), ActionError> {
    debug!(event = event.event_type(), "executing");
    use SyntheticEvent::*;
    match event {
        AnnotationAdd { annotation } => ctx.add_annotation(annotation),
        AnnotationRemove { annotation } => ctx.remove_annotation(&annotation.name),
        AnnotationToggle { annotation } => ctx.toggle_annotation(annotation),
        DecoratorAdd { decorator } => ctx.add_decorator(decorator),
        DecoratorRemove { decorator } => ctx.remove_decorator(decorator),
        DecoratorToggle { decorator } => ctx.toggle_decorator(decorator),
        StyleAdd { style } => ctx.add_style(style),
        StyleRemove { style } => ctx.remove_style(style),
        StyleToggle { style } => ctx.toggle_style(style),
        ListItemAdd { list_item } => ctx.add_list_item(list_item),
        ListItemRemove { list_item } => ctx.remove_list_item(list_item),
        ListItemToggle { list_item } => ctx.toggle_list_item(list_item),
        BlockSet {
            at,
            style,
            list_item,
            level,
        } => ctx.set_block(at, style.as_deref(), list_item.as_deref(), *level),
        BlockUnset { at, props } => ctx.unset_block(at, props),
        InsertText { text } => ctx.insert_text(text),
        InsertSpan {
            text,
            decorators,
            annotations,
        } => ctx.insert_span(text, decorators, annotations),
        InsertInlineObject { inline_object } => ctx.insert_inline_object(inline_object),
        InsertBlock {
            block,
            placement,
            select,
        } => ctx.insert_block(block.clone(), *placement, *select).map(drop),
        InsertBlockObject {
            block_object,
            placement,
            select,
        } => ctx.insert_block_object(block_object, *placement, *select),
        InsertTextBlock { placement, select } => {
            let block = ctx.new_text_block(None);
            ctx.insert_block(Block::Text(block), *placement, *select)
                .map(drop)
        }
        InsertBlocks { blocks, placement } => ctx.insert_blocks(blocks, *placement),
        InsertBreak => ctx.insert_break(),
        InsertSoftBreak => match ctx.config.soft_break {
            SoftBreakMode::SplitBlock => ctx.insert_break(),
            SoftBreakMode::LineBreak => ctx.insert_text("\n"),
        },
        DeleteText { anchor, focus } => ctx.delete_text(anchor, focus),
        DeleteBlock { at } => ctx.delete_block(at),
        DeleteBackward { unit } => ctx.delete_backward(*unit),
        DeleteForward { unit } => ctx.delete_forward(*unit),
        MoveBlock { at, to } => ctx.move_block(at, to),
        MoveBlockUp { at } => ctx.move_block_by(at, -1),
        MoveBlockDown { at } => ctx.move_block_by(at, 1),
        Select { selection } => ctx.select(selection.clone()),
        SelectPreviousBlock { select } => ctx.select_sibling_block(-1, *select),
        SelectNextBlock { select } => ctx.select_sibling_block(1, *select),
        // Focus and history live on the editor, not in the document.
        Focus | Blur | HistoryUndo | HistoryRedo => Ok(()),
    }
}

fn unresolvable(what: impl Into<String>) -> ActionError {
    ActionError::Unresolvable(what.into())
}

// ----------------------------------------------------------------------
// Shared helpers
// ----------------------------------------------------------------------

impl ActionContext<'_> {
    fn apply(&mut self, op: Operation) -> Result<(), ActionError> {
        self.engine.apply(op)?;
        Ok(())
    }

    fn value(&self) -> &[Block] {
        self.engine.value()
    }

    pub(crate) fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot::new(
            Rc::clone(&self.schema),
            self.engine.value().to_vec(),
            self.engine.selection().cloned(),
        )
        .with_pending_marks(self.pending_marks.clone())
    }

    fn is_collapsed(&self) -> bool {
        self.engine.selection().is_some_and(EditorSelection::is_collapsed)
    }

    fn index_of(&self, key: &str) -> Result<usize, ActionError> {
        block_index(self.value(), key).ok_or_else(|| unresolvable(format!("block `{key}`")))
    }

    fn index_at(&self, path: &Path) -> Result<usize, ActionError> {
        let key = path
            .block_key()
            .ok_or_else(|| unresolvable(format!("path {path}")))?;
        self.index_of(key)
    }

    fn text_block(&self, key: &str) -> Result<(usize, TextBlock), ActionError> {
        let index = self.index_of(key)?;
        let block = self.value()[index]
            .as_text()
            .ok_or_else(|| unresolvable(format!("text block `{key}`")))?;
        Ok((index, block.clone()))
    }

    fn text_block_at(&self, index: usize) -> Option<TextBlock> {
        self.value().get(index)?.as_text().cloned()
    }

    fn select_point(&mut self, point: EditorSelectionPoint) {
        self.engine
            .set_selection(Some(EditorSelection::collapsed(point)));
    }

    /// Collapse the caret onto `offset` in the block it names.
    fn select_block_offset(&mut self, offset: &BlockOffset) {
        if let Some(point) =
            block_offset_to_point(self.value(), offset, Affinity::Backward)
        {
            self.select_point(point);
        }
    }

    /// Selection start and end as block offsets.
    fn selection_offsets(&self) -> Result<(BlockOffset, BlockOffset), ActionError> {
        let snapshot = self.snapshot();
        let (Some(start), Some(end)) = (
            get_selection_start_point(&snapshot),
            get_selection_end_point(&snapshot),
        ) else {
            return Err(unresolvable("selection"));
        };
        match (
            point_to_block_offset(&snapshot.value, start),
            point_to_block_offset(&snapshot.value, end),
        ) {
            (Some(start), Some(end)) => Ok((start, end)),
            _ => Err(unresolvable("selection")),
        }
    }

    /// A text block with one empty span and the given (or default) style.
    fn new_text_block(&mut self, style: Option<String>) -> TextBlock {
        let style = style.or_else(|| self.schema.default_style().map(str::to_owned));
        let key = self.keys.next_key();
        TextBlock::empty(key, self.keys.next_key(), style)
    }

    /// Make sure a child boundary exists at block offset `offset`, splitting
    /// a span if needed. Returns the index of the first child at or after
    /// the boundary.
    fn split_at(&mut self, block_key: &str, offset: usize) -> Result<usize, ActionError> {
        let (_, block) = self.text_block(block_key)?;
        let mut start = 0;
        for (index, child) in block.children.iter().enumerate() {
            let len = child.offset_len();
            if offset <= start {
                return Ok(index);
            }
            if offset < start + len {
                let new_key = self.keys.next_key();
                self.apply(Operation::SplitChild {
                    block: block_key.to_owned(),
                    child: child.key().to_owned(),
                    index,
                    offset: offset - start,
                    new_key,
                })?;
                return Ok(index + 1);
            }
            start += len;
        }
        Ok(block.children.len())
    }

    /// Children between the block offsets `from` and `to`, after splitting
    /// spans at both ends. Returns the index range.
    fn isolate(
        &mut self,
        block_key: &str,
        from: usize,
        to: usize,
    ) -> Result<std::ops::Range<usize>, ActionError> {
        let start = self.split_at(block_key, from)?;
        let end = self.split_at(block_key, to)?;
        Ok(start..end)
    }

    /// Remove `children[range]`. A block left with no children gets an
    /// empty span carrying the marks of the first removed span.
    fn remove_children(
        &mut self,
        block_key: &str,
        range: std::ops::Range<usize>,
    ) -> Result<(), ActionError> {
        let (_, block) = self.text_block(block_key)?;
        if range.is_empty() {
            return Ok(());
        }
        if range.len() == block.children.len() {
            let marks = block
                .children
                .iter()
                .find_map(Child::as_span)
                .map(|s| s.marks.clone())
                .unwrap_or_default();
            let span = Span::new(self.keys.next_key(), "").with_marks(marks);
            self.apply(Operation::InsertChild {
                block: block_key.to_owned(),
                index: block.children.len(),
                child: Child::Span(span),
            })?;
        }
        for index in range.rev() {
            self.apply(Operation::RemoveChild {
                block: block_key.to_owned(),
                index,
                child: block.children[index].clone(),
            })?;
        }
        Ok(())
    }

    fn remove_block(&mut self, index: usize) -> Result<(), ActionError> {
        let block = self
            .value()
            .get(index)
            .cloned()
            .ok_or_else(|| unresolvable(format!("block at {index}")))?;
        self.apply(Operation::RemoveBlock { index, block })
    }

    /// Delete everything between two block offsets, merging the boundary
    /// text blocks, and collapse the caret where the range started.
    fn delete_range(&mut self, start: &BlockOffset, end: &BlockOffset) -> Result<(), ActionError> {
        let (mut start, mut end) = (start.clone(), end.clone());
        let mut first = self.index_at(&start.path)?;
        let mut last = self.index_at(&end.path)?;
        if (last, end.offset) < (first, start.offset) {
            std::mem::swap(&mut start, &mut end);
            std::mem::swap(&mut first, &mut last);
        }
        let start_key = self.value()[first].key().to_owned();
        let end_key = self.value()[last].key().to_owned();

        if first == last {
            if self.value()[first].is_text() {
                let range = self.isolate(&start_key, start.offset, end.offset)?;
                self.remove_children(&start_key, range)?;
                self.select_block_offset(&start);
            }
            return Ok(());
        }

        let start_is_text = self.value()[first].is_text();
        let end_is_text = self.value()[last].is_text();
        if end_is_text {
            let to = self.split_at(&end_key, end.offset)?;
            self.remove_children(&end_key, 0..to)?;
        } else {
            self.remove_block(last)?;
        }
        for index in (first + 1..last).rev() {
            self.remove_block(index)?;
        }
        if start_is_text {
            let from = self.split_at(&start_key, start.offset)?;
            let len = self.text_block(&start_key)?.1.children.len();
            self.remove_children(&start_key, from..len)?;
        } else {
            self.remove_block(first)?;
        }

        if start_is_text && end_is_text {
            let index = self.index_of(&start_key)?;
            self.merge_with_next(index)?;
        }
        if start_is_text {
            self.select_block_offset(&start);
        } else if let Ok(index) = self.index_of(&end_key) {
            let point = self.value()[index].start_point();
            self.select_point(point);
        }
        Ok(())
    }

    /// Delete the selected range, if the selection is expanded.
    fn delete_expanded(&mut self) -> Result<(), ActionError> {
        if self.engine.selection().is_none() || self.is_collapsed() {
            return Ok(());
        }
        let (start, end) = self.selection_offsets()?;
        self.delete_range(&start, &end)
    }

    /// Append the text block after `index` to the one at `index`, moving
    /// its mark definitions along and re-keying any that collide.
    fn merge_with_next(&mut self, index: usize) -> Result<(), ActionError> {
        let (Some(left), Some(right)) =
            (self.text_block_at(index), self.text_block_at(index + 1))
        else {
            return Err(unresolvable(format!("text blocks at {index}")));
        };

        let mut right_defs = right.mark_defs.clone();
        let mut renamed = Vec::new();
        for def in &mut right_defs {
            if left.mark_def(&def.key).is_some() {
                let key = self.keys.next_key();
                renamed.push((std::mem::replace(&mut def.key, key.clone()), key));
            }
        }
        if !renamed.is_empty() {
            self.rename_marks(&right.key, &renamed)?;
            let old = BlockProps::of(&right);
            let new = BlockProps {
                mark_defs: right_defs.clone(),
                ..old.clone()
            };
            self.apply(Operation::SetBlock {
                key: right.key.clone(),
                old,
                new,
            })?;
        }
        if !right_defs.is_empty() {
            let old = BlockProps::of(&left);
            let mut new = old.clone();
            new.mark_defs.extend(right_defs);
            self.apply(Operation::SetBlock {
                key: left.key.clone(),
                old,
                new,
            })?;
        }

        let (_, left) = self.text_block(&left.key)?;
        let (_, right) = self.text_block(&right.key)?;
        self.apply(Operation::MergeBlock {
            index,
            key: left.key.clone(),
            at: left.children.len(),
            next_key: right.key.clone(),
            props: BlockProps::of(&right),
        })
    }

    /// Rewrite mark references in every span of a block.
    fn rename_marks(
        &mut self,
        block_key: &str,
        renamed: &[(String, String)],
    ) -> Result<(), ActionError> {
        let (_, block) = self.text_block(block_key)?;
        for (index, child) in block.children.iter().enumerate() {
            let Child::Span(span) = child else { continue };
            if !span.marks.iter().any(|m| renamed.iter().any(|(old, _)| old == m)) {
                continue;
            }
            let marks = span
                .marks
                .iter()
                .map(|m| {
                    renamed
                        .iter()
                        .find(|(old, _)| old == m)
                        .map_or_else(|| m.clone(), |(_, new)| new.clone())
                })
                .collect();
            let new = Child::Span(Span {
                marks,
                ..span.clone()
            });
            self.apply(Operation::SetChild {
                block: block_key.to_owned(),
                index,
                old: child.clone(),
                new,
            })?;
        }
        Ok(())
    }

    /// Replace the marks of `children[index]` if it is a span.
    fn set_span_marks(
        &mut self,
        block_key: &str,
        index: usize,
        marks: impl FnOnce(&[String]) -> Vec<String>,
    ) -> Result<(), ActionError> {
        let (_, block) = self.text_block(block_key)?;
        let Some(Child::Span(span)) = block.children.get(index) else {
            return Ok(());
        };
        let marks = marks(&span.marks);
        if marks == span.marks {
            return Ok(());
        }
        self.apply(Operation::SetChild {
            block: block_key.to_owned(),
            index,
            old: Child::Span(span.clone()),
            new: Child::Span(Span {
                marks,
                ..span.clone()
            }),
        })
    }

    /// Give a block from outside fresh keys wherever its own would collide.
    fn rekey_block(&mut self, mut block: Block) -> Block {
        if block.key().is_empty() || block_index(self.value(), block.key()).is_some() {
            block.set_key(self.keys.next_key());
        }
        if let Block::Text(text_block) = &mut block {
            let mut seen = std::collections::HashSet::new();
            for child in &mut text_block.children {
                if child.key().is_empty() || !seen.insert(child.key().to_owned()) {
                    let key = self.keys.next_key();
                    seen.insert(key.clone());
                    child.set_key(key);
                }
            }
            if text_block.children.is_empty() {
                text_block
                    .children
                    .push(Child::Span(Span::new(self.keys.next_key(), "")));
            }
        }
        block
    }
}
