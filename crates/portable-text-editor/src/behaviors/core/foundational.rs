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

//! Keyboard and clipboard behaviors: history hotkeys, soft breaks,
//! decorator hotkeys and paste.

use crate::behaviors::{
    execute, raise, Behavior, Hotkey, KeyboardEvent, NativeEvent, Placement, SyntheticEvent,
};
use crate::config::EditorConfig;
use crate::document::{Block, TextBlock};
use crate::error::HotkeyError;
use crate::selectors::{get_focus_block, is_empty_text_block, is_selection_collapsed};

pub(super) fn behaviors(config: &EditorConfig) -> Result<Vec<Behavior>, HotkeyError> {
    let mut behaviors = vec![
        history_hotkey("mod+z", SyntheticEvent::HistoryUndo)?,
        history_hotkey("mod+shift+z", SyntheticEvent::HistoryRedo)?,
        history_hotkey("mod+y", SyntheticEvent::HistoryRedo)?,
        soft_break(),
        paste_portable_text(),
        paste_text(),
    ];
    for (hotkey, decorator) in config.decorator_hotkeys()? {
        behaviors.push(decorator_hotkey(hotkey, decorator));
    }
    Ok(behaviors)
}

fn history_hotkey(hotkey: &str, event: SyntheticEvent) -> Result<Behavior, HotkeyError> {
    let hotkey: Hotkey = hotkey.parse()?;
    Ok(Behavior::on("key.down")
        .name(format!("core.{}", event.event_type()))
        .guard(move |_, e| e.key_down().filter(|key| hotkey.matches(key)).map(|_| ()))
        .actions(move |_, _, _| vec![raise(event.clone())])
        .build())
}

fn soft_break() -> Behavior {
    Behavior::on("key.down")
        .name("core.soft break")
        .guard(|_, event| event.key_down().filter(|key| is_shift_enter(key)).map(|_| ()))
        .actions(|_, _, _| vec![raise(SyntheticEvent::InsertSoftBreak)])
        .build()
}

fn is_shift_enter(key: &KeyboardEvent) -> bool {
    key.key == "Enter" && key.shift_key && !(key.alt_key || key.ctrl_key || key.meta_key)
}

fn decorator_hotkey(hotkey: Hotkey, decorator: String) -> Behavior {
    Behavior::on("key.down")
        .name(format!("core.decorator hotkey {hotkey}"))
        .guard(move |_, event| {
            event
                .key_down()
                .filter(|key| hotkey.matches(key))
                .map(|_| decorator.clone())
        })
        .actions(|_, _, decorator| {
            vec![raise(SyntheticEvent::DecoratorToggle {
                decorator: decorator.clone(),
            })]
        })
        .build()
}

/// Portable Text on the clipboard wins over plain text.
fn paste_portable_text() -> Behavior {
    Behavior::on("clipboard.paste")
        .name("core.paste portable text")
        .guard(|_, event| match event.as_native()? {
            NativeEvent::ClipboardPaste {
                portable_text: Some(blocks),
                ..
            } if !blocks.is_empty() => Some(blocks.clone()),
            _ => None,
        })
        .actions(|_, _, blocks| {
            vec![raise(SyntheticEvent::InsertBlocks {
                blocks: blocks.clone(),
                placement: Placement::Auto,
            })]
        })
        .build()
}

/// Single-line text is typed. Multi-line text pasted into an empty block
/// becomes one text block per line, keyed by the executor. Anywhere else the
/// lines are typed with a break between each, so the first line joins the
/// text before the caret and the last line the text after it.
fn paste_text() -> Behavior {
    Behavior::on("clipboard.paste")
        .name("core.paste text")
        .guard(|snapshot, event| match event.as_native()? {
            NativeEvent::ClipboardPaste {
                text_plain: Some(text),
                portable_text: None,
            } if !text.is_empty() => {
                let into_empty = is_selection_collapsed(snapshot)
                    && get_focus_block(snapshot).is_some_and(is_empty_text_block);
                Some((text.replace("\r\n", "\n"), into_empty))
            }
            _ => None,
        })
        .actions(|_, _, (text, into_empty)| {
            if !text.contains('\n') {
                return vec![raise(SyntheticEvent::InsertText { text: text.clone() })];
            }
            if *into_empty {
                let blocks = text
                    .split('\n')
                    .map(|line| Block::Text(TextBlock::with_text("", "", line)))
                    .collect();
                return vec![raise(SyntheticEvent::InsertBlocks {
                    blocks,
                    placement: Placement::Auto,
                })];
            }
            let mut actions = Vec::new();
            for (i, line) in text.split('\n').enumerate() {
                if i > 0 {
                    actions.push(execute(SyntheticEvent::InsertBreak));
                }
                if !line.is_empty() {
                    actions.push(execute(SyntheticEvent::InsertText {
                        text: line.to_owned(),
                    }));
                }
            }
            actions
        })
        .build()
}
