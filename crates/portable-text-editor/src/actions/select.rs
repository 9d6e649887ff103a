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

//! Selection handlers.

use super::{unresolvable, ActionContext};
use crate::behaviors::SelectPlacement;
use crate::error::ActionError;
use crate::selection::{resolve_point, EditorSelection};
use crate::selectors::{get_next_block, get_previous_block};

impl ActionContext<'_> {
    /// Replace the selection. Both points must resolve in the value.
    pub(super) fn select(&mut self, selection: Option<EditorSelection>) -> Result<(), ActionError> {
        if let Some(selection) = &selection {
            for point in [&selection.anchor, &selection.focus] {
                if resolve_point(self.value(), point).is_none() {
                    return Err(unresolvable(format!("point {}", point.path)));
                }
            }
        }
        self.engine.set_selection(selection);
        Ok(())
    }

    /// Move the caret into the block before (`-1`) or after (`1`) the
    /// selection. A no-op at either end of the document.
    pub(super) fn select_sibling_block(
        &mut self,
        direction: isize,
        select: SelectPlacement,
    ) -> Result<(), ActionError> {
        let snapshot = self.snapshot();
        if snapshot.selection.is_none() {
            return Err(unresolvable("selection"));
        }
        let sibling = if direction < 0 {
            get_previous_block(&snapshot)
        } else {
            get_next_block(&snapshot)
        };
        let Some(block) = sibling else {
            return Ok(());
        };
        let point = match select {
            SelectPlacement::End => block.end_point(),
            SelectPlacement::Start | SelectPlacement::None => block.start_point(),
        };
        self.select_point(point);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Harness;
    use super::*;
    use crate::selectors::test_support::{point, span, text_block};

    fn two() -> Harness {
        Harness::new(vec![
            text_block("b1", vec![span("s1", "one", &[])]),
            text_block("b2", vec![span("s2", "two", &[])]),
        ])
    }

    #[test]
    fn select_rejects_stale_points() {
        let mut h = two().caret(point("b1", "s1", 0));
        let stale = EditorSelection::collapsed(point("gone", "s1", 0));
        assert!(h.ctx().select(Some(stale)).is_err());
        assert_eq!(h.focus(), Some(point("b1", "s1", 0)));

        h.ctx().select(None).unwrap();
        assert_eq!(h.focus(), None);
    }

    #[test]
    fn sibling_selection() {
        let mut h = two().caret(point("b1", "s1", 1));
        h.ctx().select_sibling_block(1, SelectPlacement::End).unwrap();
        assert_eq!(h.focus(), Some(point("b2", "s2", 3)));
        h.ctx().select_sibling_block(1, SelectPlacement::Start).unwrap();
        assert_eq!(h.focus(), Some(point("b2", "s2", 3)));
        h.ctx().select_sibling_block(-1, SelectPlacement::Start).unwrap();
        assert_eq!(h.focus(), Some(point("b1", "s1", 0)));
    }
}
