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

//! Human readable dump of a value and selection, for tests and debugging.
//!
//! ```text
//! ├─ block(h1) b1
//! │  "Hel|lo" [strong]
//! ├─ image img
//! ```
//!
//! A caret shows as `|`, a range as `{...}`.

use crate::document::{Block, Child};
use crate::selection::{EditorSelection, EditorSelectionPoint};
use crate::snapshot::EditorSnapshot;
use crate::text::split_at;

impl EditorSnapshot {
    /// Return a debug tree representation of the value.
    pub fn to_tree(&self) -> String {
        to_tree(&self.value, self.selection.as_ref())
    }
}

pub fn to_tree(value: &[Block], selection: Option<&EditorSelection>) -> String {
    if value.is_empty() {
        return "(empty)\n".to_owned();
    }
    let mut out = String::new();
    for block in value {
        match block {
            Block::Text(text_block) => {
                let style = text_block.style.as_deref().unwrap_or("-");
                out.push_str(&format!("├─ block({style}) {}", text_block.key));
                if let Some(list) = &text_block.list_item {
                    out.push_str(&format!(" {list}:{}", text_block.level.unwrap_or(1)));
                }
                out.push('\n');
                for child in &text_block.children {
                    match child {
                        Child::Span(span) => {
                            let text = annotate(&text_block.key, &span.key, &span.text, selection);
                            let marks = if span.marks.is_empty() {
                                String::new()
                            } else {
                                format!(" [{}]", span.marks.join(", "))
                            };
                            out.push_str(&format!("│  \"{text}\"{marks}\n"));
                        }
                        Child::Object(object) => {
                            let marker = marker_on_node(&text_block.key, Some(&object.key), selection);
                            out.push_str(&format!("│  <{}> {}{marker}\n", object.type_name, object.key));
                        }
                    }
                }
                for def in &text_block.mark_defs {
                    out.push_str(&format!("│  @{} {}\n", def.key, def.type_name));
                }
            }
            Block::Object(object) => {
                let marker = marker_on_node(&object.key, None, selection);
                out.push_str(&format!("├─ {} {}{marker}\n", object.type_name, object.key));
            }
        }
    }
    out
}

fn is_at(point: &EditorSelectionPoint, block: &str, child: Option<&str>) -> bool {
    point.path.block_key() == Some(block) && point.path.child_key() == child
}

fn marker_on_node(block: &str, child: Option<&str>, selection: Option<&EditorSelection>) -> &'static str {
    match selection {
        Some(s) if is_at(&s.focus, block, child) || is_at(&s.anchor, block, child) => " |",
        _ => "",
    }
}

/// Insert `|` (caret) or `{`/`}` (range bounds) at the selection points
/// that fall in this span.
fn annotate(
    block: &str,
    span: &str,
    text: &str,
    selection: Option<&EditorSelection>,
) -> String {
    let Some(selection) = selection else {
        return text.to_owned();
    };
    let (start, end) = (selection.start(), selection.end());
    let collapsed = selection.is_collapsed();
    let mut markers = Vec::new();
    if is_at(start, block, Some(span)) {
        markers.push((start.offset, if collapsed { '|' } else { '{' }));
    }
    if !collapsed && is_at(end, block, Some(span)) {
        markers.push((end.offset, '}'));
    }

    let mut out = String::new();
    let mut rest = text;
    let mut consumed = 0;
    for (offset, marker) in markers {
        let (head, tail) = split_at(rest, offset.saturating_sub(consumed));
        out.push_str(head);
        out.push(marker);
        consumed = offset.max(consumed);
        rest = tail;
    }
    out.push_str(rest);
    out
}
