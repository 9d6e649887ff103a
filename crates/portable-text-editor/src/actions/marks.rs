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

//! Decorator and annotation handlers.

use std::ops::Range;

use super::{unresolvable, ActionContext};
use crate::behaviors::TypedValue;
use crate::document::MarkDef;
use crate::error::ActionError;
use crate::selectors::{
    get_active_decorators, get_focus_span, get_focus_text_block, is_active_annotation,
    is_active_decorator,
};

impl ActionContext<'_> {
    /// Split spans at the selection edges and return, per selected text
    /// block, the range of children inside the selection. Blocks the
    /// selection only touches are left out.
    fn isolate_selection(&mut self) -> Result<Vec<(String, Range<usize>)>, ActionError> {
        let (start, end) = self.selection_offsets()?;
        let first = self.index_at(&start.path)?;
        let last = self.index_at(&end.path)?;
        let mut ranges = Vec::new();
        for index in first..=last {
            let Some(block) = self.text_block_at(index) else {
                continue;
            };
            let from = if index == first { start.offset } else { 0 };
            let to = if index == last { end.offset } else { block.text_len() };
            if from >= to {
                continue;
            }
            let range = self.isolate(&block.key, from, to)?;
            ranges.push((block.key, range));
        }
        Ok(ranges)
    }

    pub(super) fn add_decorator(&mut self, decorator: &str) -> Result<(), ActionError> {
        if !self.schema.has_decorator(decorator) {
            return Err(unresolvable(format!("decorator `{decorator}`")));
        }
        if self.engine.selection().is_none() {
            return Err(unresolvable("selection"));
        }
        if self.is_collapsed() {
            let mut pending = get_active_decorators(&self.snapshot());
            if !pending.iter().any(|d| d == decorator) {
                pending.push(decorator.to_owned());
            }
            *self.pending_marks = Some(pending);
            return Ok(());
        }
        for (key, range) in self.isolate_selection()? {
            for index in range {
                self.set_span_marks(&key, index, |marks| {
                    let mut marks = marks.to_vec();
                    if !marks.iter().any(|m| m == decorator) {
                        marks.push(decorator.to_owned());
                    }
                    marks
                })?;
            }
        }
        Ok(())
    }

    pub(super) fn remove_decorator(&mut self, decorator: &str) -> Result<(), ActionError> {
        if self.engine.selection().is_none() {
            return Err(unresolvable("selection"));
        }
        if self.is_collapsed() {
            let mut pending = get_active_decorators(&self.snapshot());
            pending.retain(|d| d != decorator);
            *self.pending_marks = Some(pending);
            return Ok(());
        }
        for (key, range) in self.isolate_selection()? {
            for index in range {
                self.set_span_marks(&key, index, |marks| {
                    marks.iter().filter(|m| *m != decorator).cloned().collect()
                })?;
            }
        }
        Ok(())
    }

    pub(super) fn toggle_decorator(&mut self, decorator: &str) -> Result<(), ActionError> {
        if is_active_decorator(&self.snapshot(), decorator) {
            self.remove_decorator(decorator)
        } else {
            self.add_decorator(decorator)
        }
    }

    /// Annotate the selected text. Each block gets its own definition.
    pub(super) fn add_annotation(&mut self, annotation: &TypedValue) -> Result<(), ActionError> {
        if self.schema.annotation(&annotation.name).is_none() {
            return Err(unresolvable(format!("annotation `{}`", annotation.name)));
        }
        if self.engine.selection().is_none() {
            return Err(unresolvable("selection"));
        }
        if self.is_collapsed() {
            return Ok(());
        }
        for (block_key, range) in self.isolate_selection()? {
            let key = self.keys.next_key();
            self.add_mark_defs(
                &block_key,
                vec![MarkDef {
                    key: key.clone(),
                    type_name: annotation.name.clone(),
                    fields: annotation.value.clone(),
                }],
            )?;
            for index in range {
                self.set_span_marks(&block_key, index, |marks| {
                    let mut marks = marks.to_vec();
                    marks.push(key.clone());
                    marks
                })?;
            }
        }
        Ok(())
    }

    /// Remove annotations of `type_name` from the selection. On a collapsed
    /// caret the annotation under the caret is removed from its whole block.
    pub(super) fn remove_annotation(&mut self, type_name: &str) -> Result<(), ActionError> {
        if self.engine.selection().is_none() {
            return Err(unresolvable("selection"));
        }
        if self.is_collapsed() {
            let snapshot = self.snapshot();
            let (Some(block), Some(span)) =
                (get_focus_text_block(&snapshot), get_focus_span(&snapshot))
            else {
                return Ok(());
            };
            let doomed: Vec<String> = span
                .marks
                .iter()
                .filter(|m| block.mark_def(m).is_some_and(|d| d.type_name == type_name))
                .cloned()
                .collect();
            if doomed.is_empty() {
                return Ok(());
            }
            let key = block.key.clone();
            for index in 0..block.children.len() {
                self.set_span_marks(&key, index, |marks| {
                    marks.iter().filter(|m| !doomed.contains(m)).cloned().collect()
                })?;
            }
            return self.prune_mark_defs(&key);
        }

        for (block_key, range) in self.isolate_selection()? {
            let (_, block) = self.text_block(&block_key)?;
            let doomed: Vec<String> = block
                .mark_defs
                .iter()
                .filter(|d| d.type_name == type_name)
                .map(|d| d.key.clone())
                .collect();
            for index in range {
                self.set_span_marks(&block_key, index, |marks| {
                    marks.iter().filter(|m| !doomed.contains(m)).cloned().collect()
                })?;
            }
            self.prune_mark_defs(&block_key)?;
        }
        Ok(())
    }

    pub(super) fn toggle_annotation(&mut self, annotation: &TypedValue) -> Result<(), ActionError> {
        if is_active_annotation(&self.snapshot(), &annotation.name) {
            self.remove_annotation(&annotation.name)
        } else {
            self.add_annotation(annotation)
        }
    }

    /// Drop mark definitions no span in the block references.
    fn prune_mark_defs(&mut self, block_key: &str) -> Result<(), ActionError> {
        let (_, block) = self.text_block(block_key)?;
        let used: Vec<String> = block
            .mark_defs
            .iter()
            .filter(|d| block.spans().any(|s| s.has_mark(&d.key)))
            .map(|d| d.key.clone())
            .collect();
        self.update_mark_defs(block_key, |defs| defs.retain(|d| used.contains(&d.key)))
    }

    fn update_mark_defs(
        &mut self,
        block_key: &str,
        change: impl FnOnce(&mut Vec<MarkDef>),
    ) -> Result<(), ActionError> {
        let (_, block) = self.text_block(block_key)?;
        let old = crate::engine::BlockProps::of(&block);
        let mut new = old.clone();
        change(&mut new.mark_defs);
        if new == old {
            return Ok(());
        }
        self.apply(crate::engine::Operation::SetBlock {
            key: block_key.to_owned(),
            old,
            new,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Harness;
    use super::*;
    use crate::document::{Block, Child};
    use crate::selectors::test_support::{link, point, span, text_block};

    fn marks(h: &Harness, block: usize) -> Vec<(String, Vec<String>)> {
        h.value()[block]
            .as_text()
            .unwrap()
            .children
            .iter()
            .filter_map(Child::as_span)
            .map(|s| (s.text.clone(), s.marks.clone()))
            .collect()
    }

    fn hello() -> Harness {
        Harness::new(vec![text_block("b1", vec![span("s1", "hello world", &[])])])
    }

    #[test]
    fn decorator_on_expanded_selection_splits_spans() {
        let mut h = hello().select(point("b1", "s1", 0), point("b1", "s1", 5));
        h.ctx().add_decorator("strong").unwrap();
        assert_eq!(
            marks(&h, 0),
            vec![
                ("hello".to_owned(), vec!["strong".to_owned()]),
                (" world".to_owned(), vec![]),
            ]
        );
    }

    #[test]
    fn toggle_decorator_twice_restores_marks() {
        let mut h = hello().select(point("b1", "s1", 6), point("b1", "s1", 11));
        h.ctx().toggle_decorator("em").unwrap();
        h.ctx().toggle_decorator("em").unwrap();
        assert!(marks(&h, 0).iter().all(|(_, m)| m.is_empty()));
    }

    #[test]
    fn collapsed_decorator_goes_pending() {
        let mut h = Harness::new(vec![text_block("b1", vec![span("s1", "x", &["em"])])])
            .caret(point("b1", "s1", 1));
        h.ctx().add_decorator("strong").unwrap();
        assert_eq!(h.pending_marks, Some(vec!["em".to_owned(), "strong".to_owned()]));
        h.ctx().remove_decorator("em").unwrap();
        assert_eq!(h.pending_marks, Some(vec!["strong".to_owned()]));
    }

    #[test]
    fn annotation_across_blocks_gets_one_definition_per_block() {
        let mut h = Harness::new(vec![
            text_block("b1", vec![span("s1", "foo", &[])]),
            text_block("b2", vec![span("s2", "bar", &[])]),
        ])
        .select(point("b1", "s1", 1), point("b2", "s2", 2));
        let href = TypedValue::new("link").with("href", "https://portabletext.org");
        h.ctx().add_annotation(&href).unwrap();

        for index in 0..2 {
            let block = h.value()[index].as_text().unwrap();
            assert_eq!(block.mark_defs.len(), 1);
            let def = &block.mark_defs[0];
            assert_eq!(def.fields["href"], "https://portabletext.org");
            assert!(block.spans().any(|s| s.has_mark(&def.key)));
        }
        assert_eq!(marks(&h, 0)[0], ("f".to_owned(), vec![]));
    }

    #[test]
    fn collapsed_annotation_add_is_a_noop() {
        let mut h = hello().caret(point("b1", "s1", 2));
        h.ctx().add_annotation(&TypedValue::new("link")).unwrap();
        assert!(h.value()[0].as_text().unwrap().mark_defs.is_empty());
    }

    #[test]
    fn collapsed_annotation_remove_clears_the_whole_block() {
        let mut block = text_block(
            "b1",
            vec![span("s1", "a", &["l1"]), span("s2", "b", &[]), span("s3", "c", &["l1"])],
        );
        if let Block::Text(b) = &mut block {
            b.mark_defs.push(link("l1"));
        }
        let mut h = Harness::new(vec![block]).caret(point("b1", "s1", 1));
        h.ctx().remove_annotation("link").unwrap();
        let block = h.value()[0].as_text().unwrap();
        assert!(block.mark_defs.is_empty());
        assert!(block.spans().all(|s| s.marks.is_empty()));
    }
}
