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

use super::{
    get_focus_block, get_focus_block_offset, get_selected_blocks,
    get_selection_end_point, get_selection_start_point, is_selection_collapsed,
    point_to_block_offset,
};
use crate::selection::{block_index, EditorSelectionPoint};
use crate::snapshot::EditorSnapshot;
use crate::text::slice;

/// Text of the start block up to the selection start.
pub fn get_block_text_before(snapshot: &EditorSnapshot) -> String {
    let Some(start) = get_selection_start_point(snapshot) else {
        return String::new();
    };
    text_around(snapshot, start, |text, offset| slice(text, 0, offset).to_owned())
}

/// Text of the end block after the selection end.
pub fn get_block_text_after(snapshot: &EditorSnapshot) -> String {
    let Some(end) = get_selection_end_point(snapshot) else {
        return String::new();
    };
    text_around(snapshot, end, |text, offset| {
        slice(text, offset, usize::MAX).to_owned()
    })
}

/// Plain text covered by the selection, blocks separated by a blank line.
/// Block objects contribute nothing.
pub fn get_selection_text(snapshot: &EditorSnapshot) -> String {
    let (Some(start), Some(end)) = (
        get_selection_start_point(snapshot),
        get_selection_end_point(snapshot),
    ) else {
        return String::new();
    };
    let (Some(from), Some(to)) = (
        point_to_block_offset(&snapshot.value, start),
        point_to_block_offset(&snapshot.value, end),
    ) else {
        return String::new();
    };

    let blocks = get_selected_blocks(snapshot);
    let last = blocks.len().saturating_sub(1);
    blocks
        .iter()
        .enumerate()
        .filter_map(|(i, block)| {
            let text = block.as_text()?.text();
            let lower = if i == 0 { from.offset } else { 0 };
            let upper = if i == last { to.offset } else { usize::MAX };
            Some(slice(&text, lower, upper).to_owned())
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// True for a collapsed caret at offset 0 of its block, or on a block object.
pub fn is_at_start_of_block(snapshot: &EditorSnapshot) -> bool {
    if !is_selection_collapsed(snapshot) {
        return false;
    }
    get_focus_block_offset(snapshot).is_some_and(|o| o.offset == 0)
}

/// True for a collapsed caret after the last character of its block, or on a
/// block object.
pub fn is_at_end_of_block(snapshot: &EditorSnapshot) -> bool {
    if !is_selection_collapsed(snapshot) {
        return false;
    }
    let (Some(block), Some(offset)) =
        (get_focus_block(snapshot), get_focus_block_offset(snapshot))
    else {
        return false;
    };
    match block.as_text() {
        Some(text_block) => offset.offset >= text_block.text_len(),
        None => true,
    }
}

fn text_around(
    snapshot: &EditorSnapshot,
    point: &EditorSelectionPoint,
    cut: impl Fn(&str, usize) -> String,
) -> String {
    let Some(offset) = point_to_block_offset(&snapshot.value, point) else {
        return String::new();
    };
    let block = offset
        .path
        .block_key()
        .and_then(|key| block_index(&snapshot.value, key))
        .and_then(|index| snapshot.value[index].as_text());
    match block {
        Some(text_block) => cut(&text_block.text(), offset.offset),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::document::{Block, BlockObject};

    fn value() -> Vec<Block> {
        vec![
            text_block("b1", vec![span("s1", "foo", &[]), span("s2", "bar", &["em"])]),
            Block::Object(BlockObject::new("img", "image")),
            text_block("b2", vec![span("s3", "baz", &[])]),
        ]
    }

    #[test]
    fn text_before_and_after_the_caret() {
        let s = caret(snapshot(value()), point("b1", "s2", 1));
        assert_eq!(get_block_text_before(&s), "foob");
        assert_eq!(get_block_text_after(&s), "ar");
    }

    #[test]
    fn selection_text_skips_objects() {
        let s = select(snapshot(value()), point("b1", "s2", 0), point("b2", "s3", 2));
        assert_eq!(get_selection_text(&s), "bar\n\nba");
    }

    #[test]
    fn block_boundaries() {
        let s = caret(snapshot(value()), point("b1", "s1", 0));
        assert!(is_at_start_of_block(&s));
        assert!(!is_at_end_of_block(&s));

        let s = caret(snapshot(value()), point("b1", "s2", 3));
        assert!(is_at_end_of_block(&s));

        let s = caret(snapshot(value()), EditorSelectionPoint::on_block("img"));
        assert!(is_at_start_of_block(&s));
        assert!(is_at_end_of_block(&s));

        let s = select(snapshot(value()), point("b1", "s1", 0), point("b1", "s1", 1));
        assert!(!is_at_start_of_block(&s));
    }

    #[test]
    fn null_and_stale_selections_have_no_text() {
        let null = snapshot(value());
        assert_eq!(get_block_text_before(&null), "");
        assert_eq!(get_selection_text(&null), "");
        assert!(!is_at_start_of_block(&null));

        let stale = caret(snapshot(value()), point("b1", "gone", 0));
        assert_eq!(get_block_text_after(&stale), "");
        assert!(!is_at_end_of_block(&stale));
    }
}
