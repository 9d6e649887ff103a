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

//! `insert.break`: splitting a text block at the caret.

use super::{unresolvable, ActionContext};
use crate::document::{Block, Child, Span, TextBlock};
use crate::engine::{BlockProps, Operation};
use crate::error::ActionError;
use crate::selectors::{get_focus_block_object, get_focus_block_offset, get_focus_text_block};

impl ActionContext<'_> {
    pub(super) fn insert_break(&mut self) -> Result<(), ActionError> {
        self.delete_expanded()?;
        let snapshot = self.snapshot();

        if let Some(object) = get_focus_block_object(&snapshot) {
            let index = self.index_of(&object.key)?;
            let block = self.new_text_block(None);
            let point = Block::Text(block.clone()).start_point();
            self.apply(Operation::InsertBlock {
                index: index + 1,
                block: Block::Text(block),
            })?;
            self.select_point(point);
            return Ok(());
        }

        let block = get_focus_text_block(&snapshot)
            .ok_or_else(|| unresolvable("focus block"))?
            .clone();
        let offset = get_focus_block_offset(&snapshot)
            .ok_or_else(|| unresolvable("focus offset"))?
            .offset;
        let index = self.index_of(&block.key)?;
        let len = block.text_len();

        if offset == 0 && len > 0 {
            // Break at the start: an empty block goes in front, keeping the
            // leading decorators so typing there continues the formatting.
            let decorators = block
                .spans()
                .next()
                .map(|span| {
                    span.marks
                        .iter()
                        .filter(|m| self.schema.has_decorator(m))
                        .cloned()
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();
            let new = self.sibling_of(&block, decorators);
            let point = Block::Text(new.clone()).start_point();
            self.apply(Operation::InsertBlock {
                index,
                block: Block::Text(new),
            })?;
            self.select_point(point);
        } else if offset >= len {
            let new = self.sibling_of(&block, Vec::new());
            let point = Block::Text(new.clone()).start_point();
            self.apply(Operation::InsertBlock {
                index: index + 1,
                block: Block::Text(new),
            })?;
            self.select_point(point);
        } else {
            let at = self.split_at(&block.key, offset)?;
            let new_key = self.keys.next_key();
            let current = self.text_block(&block.key)?.1;
            self.apply(Operation::SplitBlock {
                index,
                key: block.key.clone(),
                at,
                new_key: new_key.clone(),
                props: BlockProps {
                    mark_defs: Vec::new(),
                    ..BlockProps::of(&current)
                },
            })?;
            self.relocate_mark_defs(index)?;
            let right = self.value()[index + 1].start_point();
            self.select_point(right);
        }
        Ok(())
    }

    /// An empty text block with the same style and list membership.
    fn sibling_of(&mut self, block: &TextBlock, marks: Vec<String>) -> TextBlock {
        TextBlock {
            key: self.keys.next_key(),
            style: block.style.clone(),
            list_item: block.list_item.clone(),
            level: block.level,
            children: vec![Child::Span(
                Span::new(self.keys.next_key(), "").with_marks(marks),
            )],
            mark_defs: Vec::new(),
        }
    }

    /// After a split, give the right half the mark definitions its spans
    /// use and drop the ones the left half no longer uses. A definition
    /// used on both sides is copied under a fresh key.
    fn relocate_mark_defs(&mut self, index: usize) -> Result<(), ActionError> {
        let (Some(left), Some(right)) =
            (self.text_block_at(index), self.text_block_at(index + 1))
        else {
            return Err(unresolvable(format!("split blocks at {index}")));
        };
        let uses = |block: &TextBlock, key: &str| block.spans().any(|s| s.has_mark(key));

        let mut left_defs = Vec::new();
        let mut right_defs = Vec::new();
        let mut renamed = Vec::new();
        for def in &left.mark_defs {
            let on_left = uses(&left, &def.key);
            if uses(&right, &def.key) {
                let mut copy = def.clone();
                if on_left {
                    copy.key = self.keys.next_key();
                    renamed.push((def.key.clone(), copy.key.clone()));
                }
                right_defs.push(copy);
            }
            if on_left {
                left_defs.push(def.clone());
            }
        }

        if !renamed.is_empty() {
            self.rename_marks(&right.key, &renamed)?;
        }
        if !right_defs.is_empty() {
            let old = BlockProps::of(&right);
            let new = BlockProps {
                mark_defs: right_defs,
                ..old.clone()
            };
            self.apply(Operation::SetBlock {
                key: right.key.clone(),
                old,
                new,
            })?;
        }
        if left_defs.len() != left.mark_defs.len() {
            let old = BlockProps::of(&left);
            let new = BlockProps {
                mark_defs: left_defs,
                ..old.clone()
            };
            self.apply(Operation::SetBlock {
                key: left.key.clone(),
                old,
                new,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Harness;
    use crate::document::{Block, BlockObject};
    use crate::selection::EditorSelectionPoint;
    use crate::selectors::test_support::{link, point, span, text_block};

    fn harness(at: usize) -> Harness {
        let mut block = text_block("b1", vec![span("s1", "hello", &["strong"])]);
        if let Block::Text(b) = &mut block {
            b.style = Some("h1".into());
        }
        Harness::new(vec![block]).caret(point("b1", "s1", at))
    }

    #[test]
    fn break_in_the_middle_splits_the_block() {
        let mut h = harness(2);
        h.ctx().insert_break().unwrap();
        assert_eq!(h.texts(), vec!["he", "llo"]);
        let right = h.value()[1].as_text().unwrap();
        assert_eq!(right.style.as_deref(), Some("h1"));
        assert_eq!(h.focus(), Some(h.value()[1].start_point()));
    }

    #[test]
    fn break_at_the_end_adds_an_empty_sibling() {
        let mut h = harness(5);
        h.ctx().insert_break().unwrap();
        assert_eq!(h.texts(), vec!["hello", ""]);
        let new = h.value()[1].as_text().unwrap();
        assert_eq!(new.style.as_deref(), Some("h1"));
        assert!(new.children[0].as_span().unwrap().marks.is_empty());
        assert_eq!(h.focus(), Some(h.value()[1].start_point()));
    }

    #[test]
    fn break_at_the_start_inserts_before_and_keeps_decorators() {
        let mut h = harness(0);
        h.ctx().insert_break().unwrap();
        assert_eq!(h.texts(), vec!["", "hello"]);
        assert_eq!(h.value()[1].key(), "b1");
        let new = h.value()[0].as_text().unwrap();
        assert_eq!(new.children[0].as_span().unwrap().marks, vec!["strong"]);
        assert_eq!(h.focus(), Some(h.value()[0].start_point()));
    }

    #[test]
    fn split_annotation_gets_its_own_definition() {
        let mut block = text_block("b1", vec![span("s1", "linked", &["l1"])]);
        if let Block::Text(b) = &mut block {
            b.mark_defs.push(link("l1"));
        }
        let mut h = Harness::new(vec![block]).caret(point("b1", "s1", 3));
        h.ctx().insert_break().unwrap();

        let left = h.value()[0].as_text().unwrap();
        let right = h.value()[1].as_text().unwrap();
        assert_eq!(left.mark_defs.len(), 1);
        assert_eq!(right.mark_defs.len(), 1);
        assert_ne!(left.mark_defs[0].key, right.mark_defs[0].key);
        assert!(right.spans().all(|s| s.has_mark(&right.mark_defs[0].key)));
    }

    #[test]
    fn break_on_block_object_adds_text_block_after() {
        let mut h = Harness::new(vec![Block::Object(BlockObject::new("img", "image"))])
            .caret(EditorSelectionPoint::on_block("img"));
        h.ctx().insert_break().unwrap();
        assert_eq!(h.texts(), vec!["<image>", ""]);
        assert_eq!(h.focus(), Some(h.value()[1].start_point()));
    }
}
