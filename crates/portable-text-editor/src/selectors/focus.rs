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

//! Selectors resolving the node under the selection's focus point.

use super::point_to_block_offset;
use crate::document::{Block, BlockObject, Child, InlineObject, Span, TextBlock};
use crate::selection::{block_index, BlockOffset};
use crate::snapshot::EditorSnapshot;

pub fn get_focus_block(snapshot: &EditorSnapshot) -> Option<&Block> {
    let key = snapshot.selection.as_ref()?.focus.path.block_key()?;
    snapshot.value.get(block_index(&snapshot.value, key)?)
}

pub fn get_focus_text_block(snapshot: &EditorSnapshot) -> Option<&TextBlock> {
    get_focus_block(snapshot)?.as_text()
}

pub fn get_focus_block_object(snapshot: &EditorSnapshot) -> Option<&BlockObject> {
    get_focus_block(snapshot)?.as_object()
}

/// The focus text block, when it carries a list item.
pub fn get_focus_list_block(snapshot: &EditorSnapshot) -> Option<&TextBlock> {
    get_focus_text_block(snapshot).filter(|b| b.list_item.is_some())
}

/// The child addressed by the focus path's third segment.
pub fn get_focus_child(snapshot: &EditorSnapshot) -> Option<&Child> {
    let key = snapshot.selection.as_ref()?.focus.path.child_key()?;
    get_focus_text_block(snapshot)?.child(key)
}

pub fn get_focus_span(snapshot: &EditorSnapshot) -> Option<&Span> {
    get_focus_child(snapshot)?.as_span()
}

pub fn get_focus_inline_object(snapshot: &EditorSnapshot) -> Option<&InlineObject> {
    match get_focus_child(snapshot)? {
        Child::Object(object) => Some(object),
        Child::Span(_) => None,
    }
}

/// The focus point as an offset across its whole block.
pub fn get_focus_block_offset(snapshot: &EditorSnapshot) -> Option<BlockOffset> {
    point_to_block_offset(&snapshot.value, &snapshot.selection.as_ref()?.focus)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::document::Fields;
    use crate::selection::EditorSelectionPoint;

    fn value() -> Vec<Block> {
        vec![
            text_block(
                "b1",
                vec![
                    span("s1", "foo", &[]),
                    Child::Object(InlineObject {
                        key: "t1".into(),
                        type_name: "stock-ticker".into(),
                        fields: Fields::new(),
                    }),
                ],
            ),
            Block::Object(BlockObject::new("img", "image")),
        ]
    }

    #[test]
    fn resolves_focus_nodes() {
        let s = caret(snapshot(value()), point("b1", "s1", 2));
        assert_eq!(get_focus_block(&s).map(Block::key), Some("b1"));
        assert_eq!(get_focus_span(&s).map(|s| s.text.as_str()), Some("foo"));
        assert!(get_focus_block_object(&s).is_none());
        assert!(get_focus_inline_object(&s).is_none());
        assert_eq!(get_focus_block_offset(&s), Some(BlockOffset::new("b1", 2)));

        let s = caret(snapshot(value()), point("b1", "t1", 0));
        assert_eq!(get_focus_inline_object(&s).map(|o| o.key.as_str()), Some("t1"));
        assert!(get_focus_span(&s).is_none());
    }

    #[test]
    fn focus_on_block_object() {
        let s = caret(snapshot(value()), EditorSelectionPoint::on_block("img"));
        assert_eq!(get_focus_block_object(&s).map(|o| o.type_name.as_str()), Some("image"));
        assert!(get_focus_text_block(&s).is_none());
        assert!(get_focus_child(&s).is_none());
    }

    #[test]
    fn null_and_stale_selections_resolve_to_nothing() {
        let null = snapshot(value());
        assert!(get_focus_block(&null).is_none());
        assert!(get_focus_child(&null).is_none());
        assert!(get_focus_block_offset(&null).is_none());

        let stale = caret(snapshot(value()), point("gone", "s1", 0));
        assert!(get_focus_block(&stale).is_none());
        assert!(get_focus_span(&stale).is_none());
        assert!(get_focus_list_block(&stale).is_none());
    }
}
