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

//! `delete.*` handlers.

use super::{unresolvable, ActionContext};
use crate::behaviors::DeleteUnit;
use crate::document::Child;
use crate::error::ActionError;
use crate::selection::{BlockOffset, EditorSelectionPoint, Path};
use crate::selectors::{get_focus_block, get_focus_block_offset, get_focus_child};
use crate::text::{next_grapheme_len, next_word_len, previous_grapheme_len, previous_word_len};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Direction {
    Backward,
    Forward,
}

impl ActionContext<'_> {
    pub(super) fn delete_text(
        &mut self,
        anchor: &BlockOffset,
        focus: &BlockOffset,
    ) -> Result<(), ActionError> {
        self.delete_range(anchor, focus)
    }

    pub(super) fn delete_block(&mut self, at: &Path) -> Result<(), ActionError> {
        let index = self.index_at(at)?;
        self.remove_block(index)
    }

    pub(super) fn delete_backward(&mut self, unit: DeleteUnit) -> Result<(), ActionError> {
        self.delete_directional(Direction::Backward, unit)
    }

    pub(super) fn delete_forward(&mut self, unit: DeleteUnit) -> Result<(), ActionError> {
        self.delete_directional(Direction::Forward, unit)
    }

    fn delete_directional(
        &mut self,
        direction: Direction,
        unit: DeleteUnit,
    ) -> Result<(), ActionError> {
        if self.engine.selection().is_none() {
            return Err(unresolvable("selection"));
        }
        if !self.is_collapsed() {
            return self.delete_expanded();
        }

        let snapshot = self.snapshot();
        let block = get_focus_block(&snapshot)
            .ok_or_else(|| unresolvable("focus block"))?
            .clone();
        let index = self.index_of(block.key())?;

        if unit == DeleteUnit::Block || block.is_object() {
            return self.remove_block(index);
        }
        let Some(text_block) = block.as_text() else {
            return Ok(());
        };
        let offset = get_focus_block_offset(&snapshot)
            .ok_or_else(|| unresolvable("focus offset"))?
            .offset;
        let text = text_block.text();
        let len = text_block.text_len();

        let at_boundary = match direction {
            Direction::Backward => offset == 0,
            Direction::Forward => offset >= len,
        };
        if at_boundary {
            return self.delete_across_boundary(index, direction);
        }

        if let Some(object) = self.adjacent_inline_object(direction)? {
            let (_, current) = self.text_block(&text_block.key)?;
            let child_index = current
                .child_index(&object)
                .ok_or_else(|| unresolvable(format!("child `{object}`")))?;
            let range = child_index..child_index + 1;
            return self.remove_children(&text_block.key, range);
        }

        let key = text_block.key.clone();
        let (from, to) = match direction {
            Direction::Backward => {
                let distance = match unit {
                    DeleteUnit::Word => previous_word_len(&text, offset),
                    DeleteUnit::Line => offset,
                    _ => previous_grapheme_len(&text, offset),
                };
                (offset - distance, offset)
            }
            Direction::Forward => {
                let distance = match unit {
                    DeleteUnit::Word => next_word_len(&text, offset),
                    DeleteUnit::Line => len - offset,
                    _ => next_grapheme_len(&text, offset),
                };
                (offset, offset + distance)
            }
        };
        self.delete_range(&BlockOffset::new(key.clone(), from), &BlockOffset::new(key, to))
    }

    /// The inline object the caret is on, or the one directly across the
    /// caret in `direction` from the edge of its span.
    fn adjacent_inline_object(
        &self,
        direction: Direction,
    ) -> Result<Option<String>, ActionError> {
        let snapshot = self.snapshot();
        let Some(child) = get_focus_child(&snapshot) else {
            return Ok(None);
        };
        if let Child::Object(object) = child {
            return Ok(Some(object.key.clone()));
        }
        let Some(selection) = snapshot.selection.as_ref() else {
            return Ok(None);
        };
        let Some(block) = crate::selectors::get_focus_text_block(&snapshot) else {
            return Ok(None);
        };
        let Some(position) = block.child_index(child.key()) else {
            return Ok(None);
        };
        let neighbour = match direction {
            Direction::Backward if selection.focus.offset == 0 => {
                position.checked_sub(1).and_then(|i| block.children.get(i))
            }
            Direction::Forward if selection.focus.offset >= child.offset_len() => {
                block.children.get(position + 1)
            }
            _ => None,
        };
        Ok(match neighbour {
            Some(Child::Object(object)) => Some(object.key.clone()),
            _ => None,
        })
    }

    /// Backspace at a block start or delete at a block end.
    fn delete_across_boundary(
        &mut self,
        index: usize,
        direction: Direction,
    ) -> Result<(), ActionError> {
        let neighbour = match direction {
            Direction::Backward => index.checked_sub(1),
            Direction::Forward => Some(index + 1),
        };
        let Some(neighbour) = neighbour.filter(|i| *i < self.value().len()) else {
            return Ok(());
        };
        let current_empty = self.value()[index]
            .as_text()
            .is_some_and(|b| b.is_empty());

        if self.value()[neighbour].is_text() {
            let first = match direction {
                Direction::Backward => neighbour,
                Direction::Forward => index,
            };
            let first_key = self.value()[first].key().to_owned();
            let join = self.value()[first]
                .as_text()
                .map_or(0, |b| b.text_len());
            self.merge_with_next(first)?;
            self.select_block_offset(&BlockOffset::new(first_key, join));
            return Ok(());
        }

        // The neighbour is a block object.
        if current_empty {
            let object = self.value()[neighbour].key().to_owned();
            self.remove_block(index)?;
            self.select_point(EditorSelectionPoint::on_block(object));
            Ok(())
        } else {
            self.remove_block(neighbour)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Harness;
    use super::*;
    use crate::document::{Block, BlockObject, Fields, InlineObject, TextBlock};
    use crate::selectors::test_support::{point, span, text_block};

    fn two_blocks() -> Vec<Block> {
        vec![
            text_block("b1", vec![span("s1", "foo", &[])]),
            text_block("b2", vec![span("s2", "bar baz", &[])]),
        ]
    }

    #[test]
    fn backspace_removes_one_grapheme() {
        let mut h = Harness::new(vec![text_block("b1", vec![span("s1", "ae\u{301}", &[])])])
            .caret(point("b1", "s1", 3));
        h.ctx().delete_backward(DeleteUnit::Character).unwrap();
        assert_eq!(h.texts(), vec!["a"]);
    }

    #[test]
    fn backspace_at_block_start_merges_into_previous() {
        let mut h = Harness::new(two_blocks()).caret(point("b2", "s2", 0));
        h.ctx().delete_backward(DeleteUnit::Character).unwrap();
        assert_eq!(h.texts(), vec!["foobar baz"]);
        assert_eq!(
            crate::selectors::point_to_block_offset(h.value(), &h.focus().unwrap()),
            Some(BlockOffset::new("b1", 3))
        );
    }

    #[test]
    fn delete_at_block_end_merges_next() {
        let mut h = Harness::new(two_blocks()).caret(point("b1", "s1", 3));
        h.ctx().delete_forward(DeleteUnit::Character).unwrap();
        assert_eq!(h.texts(), vec!["foobar baz"]);
    }

    #[test]
    fn word_and_line_units() {
        let mut h = Harness::new(two_blocks()).caret(point("b2", "s2", 7));
        h.ctx().delete_backward(DeleteUnit::Word).unwrap();
        assert_eq!(h.texts(), vec!["foo", "bar "]);

        let mut h = Harness::new(two_blocks()).caret(point("b2", "s2", 3));
        h.ctx().delete_forward(DeleteUnit::Line).unwrap();
        assert_eq!(h.texts(), vec!["foo", "bar"]);
    }

    #[test]
    fn backspace_at_document_start_is_a_noop() {
        let mut h = Harness::new(two_blocks()).caret(point("b1", "s1", 0));
        h.ctx().delete_backward(DeleteUnit::Character).unwrap();
        assert_eq!(h.texts(), vec!["foo", "bar baz"]);
    }

    #[test]
    fn backspace_in_empty_block_after_object_selects_object() {
        let mut h = Harness::new(vec![
            Block::Object(BlockObject::new("img", "image")),
            Block::Text(TextBlock::empty("b1", "s1", Some("normal".into()))),
        ])
        .caret(point("b1", "s1", 0));
        h.ctx().delete_backward(DeleteUnit::Character).unwrap();
        assert_eq!(h.texts(), vec!["<image>"]);
        assert_eq!(h.focus(), Some(EditorSelectionPoint::on_block("img")));
    }

    #[test]
    fn delete_on_block_object_removes_it() {
        let mut h = Harness::new(vec![
            text_block("b1", vec![span("s1", "foo", &[])]),
            Block::Object(BlockObject::new("img", "image")),
        ])
        .caret(EditorSelectionPoint::on_block("img"));
        h.ctx().delete_backward(DeleteUnit::Character).unwrap();
        assert_eq!(h.texts(), vec!["foo"]);
        assert_eq!(h.focus(), Some(point("b1", "s1", 3)));
    }

    #[test]
    fn backspace_after_inline_object_removes_it() {
        let object = Child::Object(InlineObject {
            key: "t1".into(),
            type_name: "stock-ticker".into(),
            fields: Fields::new(),
        });
        let mut h = Harness::new(vec![text_block(
            "b1",
            vec![span("s1", "foo", &[]), object, span("s2", "bar", &[])],
        )])
        .caret(point("b1", "s2", 0));
        h.ctx().delete_backward(DeleteUnit::Character).unwrap();
        let block = h.value()[0].as_text().unwrap();
        assert!(block.children.iter().all(Child::is_span));
        assert_eq!(block.text(), "foobar");
    }

    #[test]
    fn delete_text_between_offsets() {
        let mut h = Harness::new(two_blocks()).caret(point("b1", "s1", 0));
        h.ctx()
            .delete_text(&BlockOffset::new("b2", 4), &BlockOffset::new("b1", 1))
            .unwrap();
        assert_eq!(h.texts(), vec!["fbaz"]);
    }
}
