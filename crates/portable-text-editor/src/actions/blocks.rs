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

//! Block level handlers: styles, list items, `block.set` / `block.unset`
//! and block moves.

use super::{unresolvable, ActionContext};
use crate::behaviors::BlockProperty;
use crate::engine::{BlockProps, Operation};
use crate::error::ActionError;
use crate::selection::Path;
use crate::selectors::{get_selected_text_blocks, is_active_list_item, is_active_style};

impl ActionContext<'_> {
    /// Apply `change` to the props of text block `key`, skipping no-ops.
    fn update_props(
        &mut self,
        key: &str,
        change: impl FnOnce(&mut BlockProps),
    ) -> Result<(), ActionError> {
        let (_, block) = self.text_block(key)?;
        let old = BlockProps::of(&block);
        let mut new = old.clone();
        change(&mut new);
        if new == old {
            return Ok(());
        }
        self.apply(Operation::SetBlock {
            key: key.to_owned(),
            old,
            new,
        })
    }

    fn selected_text_block_keys(&self) -> Result<Vec<String>, ActionError> {
        if self.engine.selection().is_none() {
            return Err(unresolvable("selection"));
        }
        let snapshot = self.snapshot();
        Ok(get_selected_text_blocks(&snapshot)
            .into_iter()
            .map(|b| b.key.clone())
            .collect())
    }

    pub(super) fn add_style(&mut self, style: &str) -> Result<(), ActionError> {
        if !self.schema.has_style(style) {
            return Err(unresolvable(format!("style `{style}`")));
        }
        for key in self.selected_text_block_keys()? {
            self.update_props(&key, |props| props.style = Some(style.to_owned()))?;
        }
        Ok(())
    }

    /// Reset blocks carrying `style` to the default style.
    pub(super) fn remove_style(&mut self, style: &str) -> Result<(), ActionError> {
        let default = self.schema.default_style().map(str::to_owned);
        for key in self.selected_text_block_keys()? {
            self.update_props(&key, |props| {
                if props.style.as_deref() == Some(style) {
                    props.style = default.clone();
                }
            })?;
        }
        Ok(())
    }

    pub(super) fn toggle_style(&mut self, style: &str) -> Result<(), ActionError> {
        if is_active_style(&self.snapshot(), style) {
            self.remove_style(style)
        } else {
            self.add_style(style)
        }
    }

    pub(super) fn add_list_item(&mut self, list_item: &str) -> Result<(), ActionError> {
        if !self.schema.has_list(list_item) {
            return Err(unresolvable(format!("list item `{list_item}`")));
        }
        for key in self.selected_text_block_keys()? {
            self.update_props(&key, |props| {
                props.list_item = Some(list_item.to_owned());
                props.level = Some(props.level.unwrap_or(1));
            })?;
        }
        Ok(())
    }

    pub(super) fn remove_list_item(&mut self, list_item: &str) -> Result<(), ActionError> {
        for key in self.selected_text_block_keys()? {
            self.update_props(&key, |props| {
                if props.list_item.as_deref() == Some(list_item) {
                    props.list_item = None;
                    props.level = None;
                }
            })?;
        }
        Ok(())
    }

    pub(super) fn toggle_list_item(&mut self, list_item: &str) -> Result<(), ActionError> {
        if is_active_list_item(&self.snapshot(), list_item) {
            self.remove_list_item(list_item)
        } else {
            self.add_list_item(list_item)
        }
    }

    pub(super) fn set_block(
        &mut self,
        at: &Path,
        style: Option<&str>,
        list_item: Option<&str>,
        level: Option<u32>,
    ) -> Result<(), ActionError> {
        let index = self.index_at(at)?;
        let key = self.value()[index].key().to_owned();
        if let Some(style) = style.filter(|s| !self.schema.has_style(s)) {
            return Err(unresolvable(format!("style `{style}`")));
        }
        if let Some(list) = list_item.filter(|l| !self.schema.has_list(l)) {
            return Err(unresolvable(format!("list item `{list}`")));
        }
        let level = level.map(|l| self.config.clamp_level(l));
        self.update_props(&key, |props| {
            if let Some(style) = style {
                props.style = Some(style.to_owned());
            }
            if let Some(list_item) = list_item {
                props.list_item = Some(list_item.to_owned());
                props.level = props.level.or(Some(1));
            }
            if level.is_some() {
                props.level = level;
            }
        })
    }

    pub(super) fn unset_block(
        &mut self,
        at: &Path,
        unset: &[BlockProperty],
    ) -> Result<(), ActionError> {
        let index = self.index_at(at)?;
        let key = self.value()[index].key().to_owned();
        self.update_props(&key, |props| {
            for property in unset {
                match property {
                    BlockProperty::Style => props.style = None,
                    BlockProperty::ListItem => {
                        props.list_item = None;
                        props.level = None;
                    }
                    BlockProperty::Level => props.level = None,
                }
            }
        })
    }

    pub(super) fn move_block(&mut self, at: &Path, to: &Path) -> Result<(), ActionError> {
        let from = self.index_at(at)?;
        let to = self.index_at(to)?;
        if from == to {
            return Ok(());
        }
        self.apply(Operation::MoveBlock { from, to })
    }

    /// Move a block one step. A no-op at either end of the document.
    pub(super) fn move_block_by(&mut self, at: &Path, delta: isize) -> Result<(), ActionError> {
        let from = self.index_at(at)?;
        let Some(to) = from.checked_add_signed(delta).filter(|to| *to < self.value().len())
        else {
            return Ok(());
        };
        self.apply(Operation::MoveBlock { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Harness;
    use super::*;
    use crate::document::Block;
    use crate::selectors::test_support::{point, span, text_block};

    fn three() -> Harness {
        Harness::new(vec![
            text_block("b1", vec![span("s1", "one", &[])]),
            text_block("b2", vec![span("s2", "two", &[])]),
            text_block("b3", vec![span("s3", "three", &[])]),
        ])
    }

    fn styles(h: &Harness) -> Vec<Option<&str>> {
        h.value()
            .iter()
            .map(|b| b.as_text().and_then(|t| t.style.as_deref()))
            .collect()
    }

    #[test]
    fn style_toggle_applies_then_resets() {
        let mut h = three().select(point("b1", "s1", 0), point("b2", "s2", 1));
        h.ctx().toggle_style("h2").unwrap();
        assert_eq!(styles(&h), vec![Some("h2"), Some("h2"), Some("normal")]);
        h.ctx().toggle_style("h2").unwrap();
        assert_eq!(styles(&h), vec![Some("normal"); 3]);
    }

    #[test]
    fn unknown_style_is_unresolvable() {
        let mut h = three().caret(point("b1", "s1", 0));
        assert!(h.ctx().add_style("h9").is_err());
    }

    #[test]
    fn list_item_add_sets_level_and_remove_clears_it() {
        let mut h = three().caret(point("b2", "s2", 0));
        h.ctx().add_list_item("bullet").unwrap();
        let block = h.value()[1].as_text().unwrap();
        assert_eq!(block.list_item.as_deref(), Some("bullet"));
        assert_eq!(block.level, Some(1));

        h.ctx().toggle_list_item("bullet").unwrap();
        let block = h.value()[1].as_text().unwrap();
        assert_eq!(block.list_item, None);
        assert_eq!(block.level, None);
    }

    #[test]
    fn block_set_clamps_level() {
        let mut h = three();
        h.ctx()
            .set_block(&Path::block("b1"), None, Some("number"), Some(42))
            .unwrap();
        let block = h.value()[0].as_text().unwrap();
        assert_eq!(block.list_item.as_deref(), Some("number"));
        assert_eq!(block.level, Some(10));

        h.ctx()
            .unset_block(&Path::block("b1"), &[BlockProperty::ListItem])
            .unwrap();
        let block = h.value()[0].as_text().unwrap();
        assert_eq!((block.list_item.as_deref(), block.level), (None, None));
    }

    #[test]
    fn moves_stop_at_the_edges() {
        let mut h = three();
        h.ctx().move_block_by(&Path::block("b1"), -1).unwrap();
        h.ctx().move_block_by(&Path::block("b3"), 1).unwrap();
        assert_eq!(h.texts(), vec!["one", "two", "three"]);

        h.ctx().move_block_by(&Path::block("b1"), 1).unwrap();
        assert_eq!(h.texts(), vec!["two", "one", "three"]);
        h.ctx().move_block(&Path::block("b3"), &Path::block("b2")).unwrap();
        assert_eq!(h.texts(), vec!["three", "two", "one"]);
        assert!(h.value().iter().all(Block::is_text));
    }
}
