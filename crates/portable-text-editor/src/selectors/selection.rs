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

//! Selectors over the selected range: its boundaries, the blocks and spans
//! it covers, and the blocks around it.

use std::cmp::Ordering;
use std::ops::RangeInclusive;

use super::point_to_block_offset;
use crate::document::{Block, Child, Span, TextBlock};
use crate::selection::{
    block_index, compare_points, EditorSelectionPoint, Path,
};
use crate::snapshot::EditorSnapshot;

/// A span together with the text block that owns it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpanEntry<'a> {
    pub block: &'a TextBlock,
    pub span: &'a Span,
}

impl SpanEntry<'_> {
    pub fn path(&self) -> Path {
        Path::child(self.block.key.clone(), self.span.key.clone())
    }
}

/// True iff anchor and focus share path and offset.
pub fn is_selection_collapsed(snapshot: &EditorSnapshot) -> bool {
    snapshot.selection.as_ref().is_some_and(|s| s.is_collapsed())
}

pub fn is_selection_expanded(snapshot: &EditorSnapshot) -> bool {
    snapshot.selection.as_ref().is_some_and(|s| !s.is_collapsed())
}

/// The earlier selection point in document order.
pub fn get_selection_start_point(
    snapshot: &EditorSnapshot,
) -> Option<&EditorSelectionPoint> {
    ordered_points(snapshot).map(|(start, _)| start)
}

/// The later selection point in document order.
pub fn get_selection_end_point(
    snapshot: &EditorSnapshot,
) -> Option<&EditorSelectionPoint> {
    ordered_points(snapshot).map(|(_, end)| end)
}

pub fn get_selection_start_block(snapshot: &EditorSnapshot) -> Option<&Block> {
    let range = selected_range(snapshot)?;
    snapshot.value.get(*range.start())
}

pub fn get_selection_end_block(snapshot: &EditorSnapshot) -> Option<&Block> {
    let range = selected_range(snapshot)?;
    snapshot.value.get(*range.end())
}

/// Every block from the selection start block to the end block inclusive.
pub fn get_selected_blocks(snapshot: &EditorSnapshot) -> Vec<&Block> {
    match selected_range(snapshot) {
        Some(range) => snapshot.value[range].iter().collect(),
        None => Vec::new(),
    }
}

pub fn get_selected_text_blocks(snapshot: &EditorSnapshot) -> Vec<&TextBlock> {
    get_selected_blocks(snapshot)
        .into_iter()
        .filter_map(Block::as_text)
        .collect()
}

/// Spans the selection covers.
///
/// A collapsed selection yields the span it sits in. An expanded selection
/// yields every span it overlaps by at least one character, plus empty
/// spans inside it.
pub fn get_selected_spans(snapshot: &EditorSnapshot) -> Vec<SpanEntry<'_>> {
    let Some((start, end)) = ordered_points(snapshot) else {
        return Vec::new();
    };
    let Some(range) = selected_range(snapshot) else {
        return Vec::new();
    };

    if start == end {
        let span = super::get_focus_text_block(snapshot).zip(super::get_focus_span(snapshot));
        return span
            .map(|(block, span)| vec![SpanEntry { block, span }])
            .unwrap_or_default();
    }

    let (Some(from), Some(to)) = (
        point_to_block_offset(&snapshot.value, start),
        point_to_block_offset(&snapshot.value, end),
    ) else {
        return Vec::new();
    };

    let (first, last) = (*range.start(), *range.end());
    let mut spans = Vec::new();
    for index in range {
        let Some(block) = snapshot.value[index].as_text() else {
            continue;
        };
        let lower = if index == first { from.offset } else { 0 };
        let upper = if index == last { to.offset } else { block.text_len() };
        let mut offset = 0;
        for child in &block.children {
            let len = child.offset_len();
            if let Child::Span(span) = child {
                let (s, e) = (offset, offset + len);
                let overlaps = lower < e && upper > s;
                let empty_inside = s == e && lower <= s && s <= upper;
                if overlaps || empty_inside {
                    spans.push(SpanEntry { block, span });
                }
            }
            offset += len;
        }
    }
    spans
}

/// The block before the selection start block.
pub fn get_previous_block(snapshot: &EditorSnapshot) -> Option<&Block> {
    let start = *selected_range(snapshot)?.start();
    snapshot.value.get(start.checked_sub(1)?)
}

/// The block after the selection end block.
pub fn get_next_block(snapshot: &EditorSnapshot) -> Option<&Block> {
    let end = *selected_range(snapshot)?.end();
    snapshot.value.get(end + 1)
}

pub fn get_first_block(snapshot: &EditorSnapshot) -> Option<&Block> {
    snapshot.value.first()
}

pub fn get_last_block(snapshot: &EditorSnapshot) -> Option<&Block> {
    snapshot.value.last()
}

// ----------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------

/// Start and end points. Falls back to the `backward` flag when the
/// points cannot be ordered.
fn ordered_points(
    snapshot: &EditorSnapshot,
) -> Option<(&EditorSelectionPoint, &EditorSelectionPoint)> {
    let selection = snapshot.selection.as_ref()?;
    match compare_points(&snapshot.value, &selection.anchor, &selection.focus) {
        Some(Ordering::Greater) => Some((&selection.focus, &selection.anchor)),
        Some(_) => Some((&selection.anchor, &selection.focus)),
        None => Some((selection.start(), selection.end())),
    }
}

/// Index range of the selected blocks, if both boundary keys resolve.
fn selected_range(snapshot: &EditorSnapshot) -> Option<RangeInclusive<usize>> {
    let selection = snapshot.selection.as_ref()?;
    let a = block_index(&snapshot.value, selection.anchor.path.block_key()?)?;
    let b = block_index(&snapshot.value, selection.focus.path.block_key()?)?;
    Some(a.min(b)..=a.max(b))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    fn value() -> Vec<Block> {
        vec![
            text_block("b1", vec![span("s1", "one", &[])]),
            text_block(
                "b2",
                vec![span("s2", "two", &["em"]), span("s3", "three", &[])],
            ),
            text_block("b3", vec![span("s4", "four", &[])]),
        ]
    }

    fn keys<'a>(blocks: impl IntoIterator<Item = &'a Block>) -> Vec<&'a str> {
        blocks.into_iter().map(Block::key).collect()
    }

    #[test]
    fn collapsed_and_expanded() {
        let collapsed = caret(snapshot(value()), point("b1", "s1", 1));
        assert!(is_selection_collapsed(&collapsed));
        assert!(!is_selection_expanded(&collapsed));

        let expanded = select(snapshot(value()), point("b1", "s1", 1), point("b1", "s1", 2));
        assert!(!is_selection_collapsed(&expanded));
        assert!(is_selection_expanded(&expanded));

        let null = snapshot(value());
        assert!(!is_selection_collapsed(&null));
        assert!(!is_selection_expanded(&null));
    }

    #[test]
    fn selected_blocks_respect_backward_selections() {
        let s = select(snapshot(value()), point("b3", "s4", 1), point("b1", "s1", 0));
        assert!(s.selection.as_ref().unwrap().backward);
        assert_eq!(keys(get_selected_blocks(&s)), vec!["b1", "b2", "b3"]);
        assert_eq!(get_selection_start_point(&s), Some(&point("b1", "s1", 0)));
        assert_eq!(get_selection_end_block(&s).map(Block::key), Some("b3"));
    }

    #[test]
    fn selected_spans_exclude_touching_boundaries() {
        let s = select(snapshot(value()), point("b1", "s1", 3), point("b2", "s3", 0));
        let spans: Vec<_> = get_selected_spans(&s).iter().map(|e| e.span.key.as_str()).collect();
        assert_eq!(spans, vec!["s2"]);
    }

    #[test]
    fn neighbours() {
        let s = caret(snapshot(value()), point("b2", "s2", 0));
        assert_eq!(get_previous_block(&s).map(Block::key), Some("b1"));
        assert_eq!(get_next_block(&s).map(Block::key), Some("b3"));

        let s = caret(snapshot(value()), point("b1", "s1", 0));
        assert!(get_previous_block(&s).is_none());
        assert_eq!(get_first_block(&s).map(Block::key), Some("b1"));
        assert_eq!(get_last_block(&s).map(Block::key), Some("b3"));
    }

    #[test]
    fn stale_boundary_selects_nothing() {
        let s = select(snapshot(value()), point("b1", "s1", 0), point("gone", "x", 0));
        assert!(get_selected_blocks(&s).is_empty());
        assert!(get_selected_spans(&s).is_empty());
        assert!(get_previous_block(&s).is_none());
        assert!(get_next_block(&s).is_none());
        assert!(get_selection_start_block(&s).is_none());
    }
}
