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

//! Which decorators, annotations, styles and list items are active.
//!
//! "Active" always means shared by *every* selected span or text block. A
//! mixed selection reports nothing active.

use super::{get_selected_spans, get_selected_text_blocks, is_selection_collapsed};
use crate::document::{MarkDef, TextBlock};
use crate::snapshot::EditorSnapshot;

/// Decorators carried by every selected span, in schema order.
///
/// On a collapsed caret with pending decorators, the pending set wins.
pub fn get_active_decorators(snapshot: &EditorSnapshot) -> Vec<String> {
    if is_selection_collapsed(snapshot) {
        if let Some(pending) = &snapshot.pending_marks {
            return snapshot
                .schema
                .decorator_names()
                .filter(|d| pending.iter().any(|p| p == d))
                .map(str::to_owned)
                .collect();
        }
    }
    let spans = get_selected_spans(snapshot);
    if spans.is_empty() {
        return Vec::new();
    }
    snapshot
        .schema
        .decorator_names()
        .filter(|d| spans.iter().all(|entry| entry.span.has_mark(d)))
        .map(str::to_owned)
        .collect()
}

pub fn is_active_decorator(snapshot: &EditorSnapshot, decorator: &str) -> bool {
    get_active_decorators(snapshot).iter().any(|d| d == decorator)
}

/// Mark definitions referenced by every selected span.
///
/// Definitions are block scoped, so a selection across blocks only reports
/// keys that happen to be shared by all of them.
pub fn get_active_annotations(snapshot: &EditorSnapshot) -> Vec<&MarkDef> {
    let spans = get_selected_spans(snapshot);
    let Some(first) = spans.first() else {
        return Vec::new();
    };
    first
        .span
        .marks
        .iter()
        .filter(|mark| spans.iter().all(|entry| entry.span.has_mark(mark)))
        .filter_map(|mark| first.block.mark_def(mark))
        .collect()
}

/// True when every selected span carries an annotation of `type_name`.
pub fn is_active_annotation(snapshot: &EditorSnapshot, type_name: &str) -> bool {
    let spans = get_selected_spans(snapshot);
    !spans.is_empty()
        && spans.iter().all(|entry| {
            entry.span.marks.iter().any(|mark| {
                entry
                    .block
                    .mark_def(mark)
                    .is_some_and(|def| def.type_name == type_name)
            })
        })
}

pub fn get_active_style(snapshot: &EditorSnapshot) -> Option<&str> {
    shared(get_selected_text_blocks(snapshot), |b| b.style.as_deref())
}

pub fn is_active_style(snapshot: &EditorSnapshot, style: &str) -> bool {
    get_active_style(snapshot) == Some(style)
}

pub fn get_active_list_item(snapshot: &EditorSnapshot) -> Option<&str> {
    shared(get_selected_text_blocks(snapshot), |b| b.list_item.as_deref())
}

pub fn is_active_list_item(snapshot: &EditorSnapshot, list_item: &str) -> bool {
    get_active_list_item(snapshot) == Some(list_item)
}

/// The value every block agrees on, if any.
fn shared<'a>(
    blocks: Vec<&'a TextBlock>,
    property: impl Fn(&'a TextBlock) -> Option<&'a str>,
) -> Option<&'a str> {
    let (first, rest) = blocks.split_first()?;
    let value = property(*first)?;
    rest.iter()
        .all(|b| property(*b) == Some(value))
        .then_some(value)
}
