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

//! Markdown shortcuts.
//!
//! Each shortcut runs as two action sets: the keystroke that triggered it,
//! then the reformat. Undoing once therefore leaves the typed characters in
//! place, the way a user expects after an unwanted autoformat.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::behaviors::{
    execute, Behavior, BehaviorAction, NativeEvent, Placement, SelectPlacement,
    SyntheticEvent, TypedValue,
};
use crate::config::MarkdownConfig;
use crate::document::Child;
use crate::selection::{BlockOffset, Path};
use crate::selectors::{
    get_block_text_before, get_focus_block_offset, get_focus_text_block,
    is_selection_collapsed,
};
use crate::snapshot::EditorSnapshot;

static BLOCK_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(>|#{1,6}|-|\*|1\.)$").unwrap());

const RULES: [&str; 3] = ["---", "***", "___"];

pub(super) fn behaviors(config: &MarkdownConfig) -> Vec<Behavior> {
    let mut behaviors = vec![block_prefix(config.clone())];
    if let Some(rule) = &config.horizontal_rule {
        behaviors.push(typed_rule(rule.clone()));
        behaviors.push(pasted_rule(rule.clone()));
    }
    behaviors
}

/// What a block prefix turns its block into.
#[derive(Clone, Debug, PartialEq)]
enum Format {
    Style(String),
    List(String),
}

#[derive(Clone, Debug)]
struct PrefixMatch {
    block_key: String,
    prefix_len: usize,
    format: Format,
}

fn format_for(prefix: &str, config: &MarkdownConfig, snapshot: &EditorSnapshot) -> Option<Format> {
    let schema = &snapshot.schema;
    let format = match prefix {
        ">" => Format::Style(config.blockquote_style.clone()?),
        "-" | "*" => Format::List(config.unordered_list.clone()?),
        "1." => Format::List(config.ordered_list.clone()?),
        hashes => Format::Style(config.heading_style(hashes.len())?.to_owned()),
    };
    let known = match &format {
        Format::Style(style) => schema.has_style(style),
        Format::List(list) => schema.has_list(list),
    };
    known.then_some(format)
}

/// `> `, `# ` through `###### `, `- `, `* ` and `1. ` at the start of a
/// text block.
fn block_prefix(config: MarkdownConfig) -> Behavior {
    Behavior::on("insert.text")
        .name("core.markdown block prefix")
        .guard(move |snapshot, event| {
            if event.inserted_text() != Some(" ")
                || !is_selection_collapsed(snapshot)
                || !only_spans_before_caret(snapshot)
            {
                return None;
            }
            let block = get_focus_text_block(snapshot)?;
            let before = get_block_text_before(snapshot);
            if !BLOCK_PREFIX.is_match(&before) {
                return None;
            }
            Some(PrefixMatch {
                block_key: block.key.clone(),
                prefix_len: before.len(),
                format: format_for(&before, &config, snapshot)?,
            })
        })
        .actions(|_, _, _| vec![execute(SyntheticEvent::InsertText { text: " ".into() })])
        .actions(|_, _, matched| {
            let at = Path::block(matched.block_key.clone());
            let set = match &matched.format {
                Format::Style(style) => SyntheticEvent::BlockSet {
                    at,
                    style: Some(style.clone()),
                    list_item: None,
                    level: None,
                },
                Format::List(list) => SyntheticEvent::BlockSet {
                    at,
                    style: None,
                    list_item: Some(list.clone()),
                    level: Some(1),
                },
            };
            vec![
                execute(SyntheticEvent::DeleteText {
                    anchor: BlockOffset::new(matched.block_key.clone(), 0),
                    focus: BlockOffset::new(matched.block_key.clone(), matched.prefix_len + 1),
                }),
                execute(set),
            ]
        })
        .build()
}

/// Typing the third `-`, `*` or `_` of a rule at the start of a block.
fn typed_rule(rule: String) -> Behavior {
    let object = rule.clone();
    Behavior::on("insert.text")
        .name("core.markdown horizontal rule")
        .guard(move |snapshot, event| {
            let typed = event.inserted_text()?;
            if !is_selection_collapsed(snapshot) || !only_spans_before_caret(snapshot) {
                return None;
            }
            let text = format!("{}{typed}", get_block_text_before(snapshot));
            if !RULES.contains(&text.as_str()) || snapshot.schema.block_object(&rule).is_none() {
                return None;
            }
            let block = get_focus_text_block(snapshot)?;
            Some((
                RuleMatch {
                    block_key: block.key.clone(),
                    start: 0,
                    split: false,
                },
                typed.to_owned(),
            ))
        })
        .actions(|_, _, (_, typed)| {
            vec![execute(SyntheticEvent::InsertText {
                text: typed.clone(),
            })]
        })
        .actions(move |_, _, (matched, _)| replace_with_rule(matched, &object))
        .build()
}

/// Pasting a rule into a text block. Pasted mid-content, the block is split
/// around the rule.
fn pasted_rule(rule: String) -> Behavior {
    let object = rule.clone();
    Behavior::on("clipboard.paste")
        .name("core.markdown pasted horizontal rule")
        .guard(move |snapshot, event| {
            let NativeEvent::ClipboardPaste {
                text_plain: Some(text),
                portable_text: None,
            } = event.as_native()?
            else {
                return None;
            };
            let text = text.trim();
            if !RULES.contains(&text)
                || snapshot.schema.block_object(&rule).is_none()
                || !is_selection_collapsed(snapshot)
                || !only_spans_before_caret(snapshot)
            {
                return None;
            }
            let block = get_focus_text_block(snapshot)?;
            let start = get_focus_block_offset(snapshot)?.offset;
            Some((
                RuleMatch {
                    block_key: block.key.clone(),
                    start,
                    split: start > 0,
                },
                text.to_owned(),
            ))
        })
        .actions(|_, _, (_, text)| {
            vec![execute(SyntheticEvent::InsertText { text: text.clone() })]
        })
        .actions(move |_, _, (matched, _)| replace_with_rule(matched, &object))
        .build()
}

/// Where the rule characters sit once they are in the block.
#[derive(Clone, Debug)]
struct RuleMatch {
    block_key: String,
    start: usize,
    /// Text precedes the rule, so the block is split and the rule goes
    /// between the halves.
    split: bool,
}

/// Remove the three rule characters and put the rule object before the
/// block holding the caret, leaving the caret where it was.
fn replace_with_rule(matched: &RuleMatch, rule: &str) -> Vec<BehaviorAction> {
    let mut actions = vec![execute(SyntheticEvent::DeleteText {
        anchor: BlockOffset::new(matched.block_key.clone(), matched.start),
        focus: BlockOffset::new(matched.block_key.clone(), matched.start + 3),
    })];
    if matched.split {
        actions.push(execute(SyntheticEvent::InsertBreak));
    }
    actions.push(execute(SyntheticEvent::InsertBlockObject {
        block_object: TypedValue::new(rule),
        placement: Placement::Before,
        select: SelectPlacement::None,
    }));
    actions
}

/// Inline objects have no text, so a prefix is only trusted when nothing
/// but spans come before the caret.
fn only_spans_before_caret(snapshot: &EditorSnapshot) -> bool {
    let (Some(block), Some(selection)) = (get_focus_text_block(snapshot), &snapshot.selection)
    else {
        return false;
    };
    let Some(focus) = selection.focus.path.child_key() else {
        return false;
    };
    for child in &block.children {
        match child {
            Child::Span(span) if span.key == focus => return true,
            Child::Span(_) => {}
            Child::Object(_) => return false,
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::behaviors::KeyboardEvent;
    use crate::config::EditorConfig;
    use crate::document::{Block, Child, Fields, InlineObject, Span, TextBlock};
    use crate::selection::EditorSelectionPoint;
    use crate::Editor;

    fn typed(editor: &mut Editor, text: &str) {
        for c in text.chars() {
            let _ = editor.key_down(KeyboardEvent::new(c.to_string()));
        }
    }

    fn style(editor: &Editor, index: usize) -> Option<String> {
        editor.value()[index].as_text()?.style.clone()
    }

    #[test]
    fn hash_space_makes_a_heading() {
        let mut editor = editor(vec![text_block("b1", "")], caret("b1", 0));
        typed(&mut editor, "## Title");
        assert_eq!(texts(&editor), vec!["Title"]);
        assert_eq!(style(&editor, 0).as_deref(), Some("h2"));
    }

    #[test]
    fn undo_reveals_the_typed_prefix() {
        let mut editor = editor(vec![text_block("b1", "#")], caret("b1", 1));
        typed(&mut editor, " ");
        assert_eq!(texts(&editor), vec![""]);
        editor.undo();
        assert_eq!(texts(&editor), vec!["# "]);
        assert_eq!(style(&editor, 0).as_deref(), Some("normal"));
        editor.undo();
        assert_eq!(texts(&editor), vec!["#"]);
    }

    #[test]
    fn prefix_must_start_the_block() {
        let mut editor = editor(vec![text_block("b1", "a#")], caret("b1", 2));
        typed(&mut editor, " ");
        assert_eq!(texts(&editor), vec!["a# "]);
    }

    #[test]
    fn quote_and_lists() {
        let mut quote = editor(vec![text_block("b1", ">")], caret("b1", 1));
        typed(&mut quote, " ");
        assert_eq!(style(&quote, 0).as_deref(), Some("blockquote"));

        for (prefix, list) in [("-", "bullet"), ("*", "bullet"), ("1.", "number")] {
            let mut list_editor =
                editor(vec![text_block("b1", prefix)], caret("b1", prefix.len()));
            typed(&mut list_editor, " ");
            let Block::Text(block) = &list_editor.value()[0] else {
                unreachable!()
            };
            assert_eq!(block.list_item.as_deref(), Some(list), "prefix {prefix}");
            assert_eq!(block.level, Some(1));
            assert_eq!(block.text(), "");
        }
    }

    #[test]
    fn heading_without_schema_style_is_left_alone() {
        let mut config = EditorConfig::default();
        config.schema.styles.retain(|s| s.name != "h1");
        let mut editor = editor_with(config, vec![text_block("b1", "#")], caret("b1", 1));
        typed(&mut editor, " ");
        assert_eq!(texts(&editor), vec!["# "]);
    }

    #[test]
    fn disabled_markdown_types_literally() {
        let mut config = EditorConfig::default();
        config.markdown.enabled = false;
        let mut editor = editor_with(config, vec![text_block("b1", "#")], caret("b1", 1));
        typed(&mut editor, " ");
        assert_eq!(texts(&editor), vec!["# "]);
    }

    #[test]
    fn typed_rule_inserts_a_break_object() {
        let mut editor = editor(vec![text_block("b1", "--")], caret("b1", 2));
        typed(&mut editor, "-");
        assert_eq!(texts(&editor), vec!["<break>", ""]);
        editor.undo();
        assert_eq!(texts(&editor), vec!["---"]);
    }

    #[test]
    fn pasted_rule_inserts_a_break_object() {
        let mut editor = editor(vec![text_block("b1", "")], caret("b1", 0));
        assert!(editor.paste(Some("***\n".into()), None).is_handled());
        assert_eq!(texts(&editor), vec!["<break>", ""]);
    }

    #[test]
    fn rule_pasted_mid_block_splits_it() {
        let mut editor = editor(vec![text_block("b1", "foobar")], caret("b1", 3));
        assert!(editor.paste(Some("---".into()), None).is_handled());
        assert_eq!(texts(&editor), vec!["foo", "<break>", "bar"]);
        editor.undo();
        assert_eq!(texts(&editor), vec!["foo---bar"]);
    }

    #[test]
    fn rule_pasted_at_block_start_goes_before_it() {
        let mut editor = editor(vec![text_block("b1", "bar")], caret("b1", 0));
        assert!(editor.paste(Some("___".into()), None).is_handled());
        assert_eq!(texts(&editor), vec!["<break>", "bar"]);
    }

    #[test]
    fn prefix_behind_an_inline_object_is_typed() {
        let mut block = TextBlock::with_text("b1", "b1s", "#");
        block.style = Some("normal".to_owned());
        block.children.push(Child::Object(InlineObject {
            key: "i1".into(),
            type_name: "stock-ticker".into(),
            fields: Fields::new(),
        }));
        block.children.push(Child::Span(Span::new("b1t", "x")));
        let mut editor = editor(
            vec![Block::Text(block)],
            EditorSelectionPoint::in_child("b1", "b1t", 0),
        );
        typed(&mut editor, " ");

        assert_eq!(texts(&editor), vec!["# x"]);
        assert_eq!(style(&editor, 0).as_deref(), Some("normal"));
        let Block::Text(block) = &editor.value()[0] else {
            unreachable!()
        };
        assert!(block.children.iter().any(|c| matches!(c, Child::Object(_))));
    }
}
