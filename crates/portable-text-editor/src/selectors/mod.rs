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

//! Pure queries over an [`EditorSnapshot`].
//!
//! Every selector is total: a null selection, or one whose keys no longer
//! resolve in the value, yields `None`, `false` or an empty `Vec`.
//!
//! [`EditorSnapshot`]: crate::EditorSnapshot

mod focus;
mod marks;
mod selection;
mod text;

pub use focus::*;
pub use marks::*;
pub use selection::*;
pub use text::*;

use crate::document::{Block, Child, TextBlock};
use crate::selection::{block_index, BlockOffset, EditorSelectionPoint};

/// Which span wins when a block offset falls on a span boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Affinity {
    /// The end of the earlier span.
    #[default]
    Backward,
    /// The start of the later span.
    Forward,
}

/// True when the block is a text block holding one empty span.
pub fn is_empty_text_block(block: &Block) -> bool {
    block.as_text().is_some_and(TextBlock::is_empty)
}

/// Concatenated span text of a text block, empty for objects.
pub fn text_block_text(block: &Block) -> String {
    block.as_text().map(TextBlock::text).unwrap_or_default()
}

/// Translate a span point into an offset across the whole block.
pub fn point_to_block_offset(
    value: &[Block],
    point: &EditorSelectionPoint,
) -> Option<BlockOffset> {
    let block_key = point.path.block_key()?;
    let block = &value[block_index(value, block_key)?];
    let Some(text_block) = block.as_text() else {
        return Some(BlockOffset::new(block_key, 0));
    };
    let Some(child_key) = point.path.child_key() else {
        return Some(BlockOffset::new(block_key, 0));
    };
    let mut offset = 0;
    for child in &text_block.children {
        if child.key() == child_key {
            return Some(BlockOffset::new(
                block_key,
                offset + point.offset.min(child.offset_len()),
            ));
        }
        offset += child.offset_len();
    }
    None
}

/// Translate a block offset into a point inside a span. Offsets past the
/// end clamp to the end of the last span.
pub fn block_offset_to_point(
    value: &[Block],
    block_offset: &BlockOffset,
    affinity: Affinity,
) -> Option<EditorSelectionPoint> {
    let block_key = block_offset.path.block_key()?;
    let block = &value[block_index(value, block_key)?];
    let Some(text_block) = block.as_text() else {
        return Some(EditorSelectionPoint::on_block(block_key));
    };
    let mut start = 0;
    let mut last = None;
    for child in &text_block.children {
        let Child::Span(span) = child else { continue };
        let len = child.offset_len();
        let end = start + len;
        let inside = match affinity {
            Affinity::Backward => block_offset.offset <= end,
            Affinity::Forward => block_offset.offset < end,
        };
        if inside && block_offset.offset >= start {
            return Some(EditorSelectionPoint::in_child(
                block_key,
                span.key.clone(),
                block_offset.offset - start,
            ));
        }
        last = Some((span.key.clone(), len));
        start = end;
    }
    last.map(|(key, len)| EditorSelectionPoint::in_child(block_key, key, len))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::rc::Rc;

    use crate::document::{Block, Child, MarkDef, Span, TextBlock};
    use crate::schema::Schema;
    use crate::selection::{EditorSelection, EditorSelectionPoint};
    use crate::snapshot::EditorSnapshot;

    pub fn span(key: &str, text: &str, marks: &[&str]) -> Child {
        Child::Span(Span::new(key, text).with_marks(marks.iter().copied()))
    }

    pub fn text_block(key: &str, children: Vec<Child>) -> Block {
        Block::Text(TextBlock {
            key: key.to_owned(),
            style: Some("normal".to_owned()),
            list_item: None,
            level: None,
            children,
            mark_defs: Vec::new(),
        })
    }

    pub fn link(key: &str) -> MarkDef {
        MarkDef {
            key: key.to_owned(),
            type_name: "link".to_owned(),
            fields: Default::default(),
        }
    }

    pub fn snapshot(value: Vec<Block>) -> EditorSnapshot {
        EditorSnapshot::new(Rc::new(Schema::default()), value, None)
    }

    pub fn point(block: &str, child: &str, offset: usize) -> EditorSelectionPoint {
        EditorSelectionPoint::in_child(block, child, offset)
    }

    pub fn select(
        snapshot: EditorSnapshot,
        anchor: EditorSelectionPoint,
        focus: EditorSelectionPoint,
    ) -> EditorSnapshot {
        let selection = EditorSelection::new(anchor, focus).with_direction(&snapshot.value);
        snapshot.with_selection(Some(selection))
    }

    pub fn caret(snapshot: EditorSnapshot, at: EditorSelectionPoint) -> EditorSnapshot {
        snapshot.with_selection(Some(EditorSelection::collapsed(at)))
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    fn value() -> Vec<Block> {
        vec![text_block(
            "b1",
            vec![span("s1", "foo", &[]), span("s2", "bar", &["strong"])],
        )]
    }

    #[test]
    fn point_to_block_offset_sums_previous_spans() {
        assert_eq!(
            point_to_block_offset(&value(), &point("b1", "s2", 1)),
            Some(BlockOffset::new("b1", 4))
        );
        assert_eq!(point_to_block_offset(&value(), &point("b1", "zz", 1)), None);
    }

    #[test]
    fn block_offset_to_point_respects_affinity() {
        let at_boundary = BlockOffset::new("b1", 3);
        assert_eq!(
            block_offset_to_point(&value(), &at_boundary, Affinity::Backward),
            Some(point("b1", "s1", 3))
        );
        assert_eq!(
            block_offset_to_point(&value(), &at_boundary, Affinity::Forward),
            Some(point("b1", "s2", 0))
        );
        assert_eq!(
            block_offset_to_point(&value(), &BlockOffset::new("b1", 99), Affinity::Forward),
            Some(point("b1", "s2", 3))
        );
    }
}
