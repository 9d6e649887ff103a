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

//! List editing: outdent or clear with Backspace, clear with Enter on an
//! empty item, indent and outdent with Tab.

use crate::behaviors::{
    execute, raise, Behavior, BlockProperty, DeleteUnit, SyntheticEvent,
};
use crate::config::EditorConfig;
use crate::selection::Path;
use crate::selectors::{
    get_focus_list_block, get_selected_blocks, is_at_start_of_block, is_selection_collapsed,
};

pub(super) fn behaviors(config: &EditorConfig) -> Vec<Behavior> {
    vec![
        backspace_at_start(),
        break_on_empty_item(),
        indent(config.max_list_depth),
    ]
}

fn backspace_at_start() -> Behavior {
    Behavior::on("delete.backward")
        .name("core.list outdent on backspace")
        .guard(|snapshot, event| {
            if !matches!(
                event.as_synthetic()?,
                SyntheticEvent::DeleteBackward {
                    unit: DeleteUnit::Character | DeleteUnit::Word
                }
            ) || !is_at_start_of_block(snapshot)
            {
                return None;
            }
            let block = get_focus_list_block(snapshot)?;
            Some((block.key.clone(), block.level.unwrap_or(1)))
        })
        .actions(|_, _, (key, level)| {
            let at = Path::block(key.clone());
            if *level > 1 {
                vec![raise(SyntheticEvent::BlockSet {
                    at,
                    style: None,
                    list_item: None,
                    level: Some(level - 1),
                })]
            } else {
                vec![raise(SyntheticEvent::BlockUnset {
                    at,
                    props: vec![BlockProperty::ListItem],
                })]
            }
        })
        .build()
}

fn break_on_empty_item() -> Behavior {
    Behavior::on("insert.break")
        .name("core.list clear on empty break")
        .guard(|snapshot, _| {
            if !is_selection_collapsed(snapshot) {
                return None;
            }
            get_focus_list_block(snapshot)
                .filter(|block| block.is_empty())
                .map(|block| block.key.clone())
        })
        .actions(|_, _, key| {
            vec![raise(SyntheticEvent::BlockUnset {
                at: Path::block(key.clone()),
                props: vec![BlockProperty::ListItem],
            })]
        })
        .build()
}

/// Tab and Shift+Tab shift every selected list block by one level, clamped
/// to `1..=max_depth`. A selection touching a non-list block is left to the
/// host.
fn indent(max_depth: u32) -> Behavior {
    let max_depth = max_depth.max(1);
    Behavior::on("key.down")
        .name("core.list indent")
        .guard(move |snapshot, event| {
            let key = event.key_down()?;
            if key.key != "Tab" || key.alt_key || key.ctrl_key || key.meta_key {
                return None;
            }
            let blocks = get_selected_blocks(snapshot)
                .into_iter()
                .map(|block| block.as_text().filter(|b| b.list_item.is_some()))
                .collect::<Option<Vec<_>>>()?;
            if blocks.is_empty() {
                return None;
            }
            let levels = blocks
                .iter()
                .map(|block| {
                    let level = block.level.unwrap_or(1);
                    let level = if key.shift_key {
                        level.saturating_sub(1)
                    } else {
                        level.saturating_add(1)
                    };
                    (block.key.clone(), level.clamp(1, max_depth))
                })
                .collect::<Vec<_>>();
            Some(levels)
        })
        .actions(|_, _, levels| {
            levels
                .iter()
                .map(|(key, level)| {
                    execute(SyntheticEvent::BlockSet {
                        at: Path::block(key.clone()),
                        style: None,
                        list_item: None,
                        level: Some(*level),
                    })
                })
                .collect()
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::behaviors::{KeyboardEvent, NativeEvent, SyntheticEvent};
    use crate::config::EditorConfig;
    use crate::document::{Block, BlockObject};
    use crate::selection::{EditorSelection, EditorSelectionPoint};
    use crate::Editor;

    fn levels(editor: &Editor) -> Vec<Option<(String, u32)>> {
        editor
            .value()
            .iter()
            .map(|block| {
                let block = block.as_text()?;
                Some((block.list_item.clone()?, block.level?))
            })
            .collect()
    }

    fn tab(editor: &mut Editor, shift: bool) -> bool {
        let key = KeyboardEvent::new("Tab");
        let key = if shift { key.with_shift() } else { key };
        editor.send(NativeEvent::KeyDown { key }).is_handled()
    }

    #[test]
    fn tab_indents_and_clamps() {
        let config = EditorConfig {
            max_list_depth: 2,
            ..EditorConfig::default()
        };
        let mut editor = editor_with(
            config,
            vec![list_block("b1", "one", "bullet", 1)],
            caret("b1", 1),
        );
        assert!(tab(&mut editor, false));
        assert!(tab(&mut editor, false));
        assert_eq!(levels(&editor), vec![Some(("bullet".to_owned(), 2))]);

        assert!(tab(&mut editor, true));
        assert!(tab(&mut editor, true));
        assert_eq!(levels(&editor), vec![Some(("bullet".to_owned(), 1))]);
    }

    #[test]
    fn tab_outside_lists_is_not_claimed() {
        let mut editor = editor(
            vec![list_block("b1", "one", "bullet", 1), text_block("b2", "two")],
            caret("b1", 0),
        );
        let _ = editor.send(SyntheticEvent::Select {
            selection: Some(EditorSelection::new(caret("b1", 0), caret("b2", 1))),
        });
        assert!(!tab(&mut editor, false));
        assert_eq!(levels(&editor)[0], Some(("bullet".to_owned(), 1)));
    }

    #[test]
    fn tab_with_a_block_object_selected_is_not_claimed() {
        let mut editor = editor(
            vec![
                list_block("b1", "one", "bullet", 1),
                Block::Object(BlockObject::new("img", "image")),
            ],
            caret("b1", 0),
        );
        let _ = editor.send(SyntheticEvent::Select {
            selection: Some(EditorSelection::new(
                caret("b1", 0),
                EditorSelectionPoint::on_block("img"),
            )),
        });
        assert!(!tab(&mut editor, false));
        assert_eq!(levels(&editor), vec![Some(("bullet".to_owned(), 1)), None]);
    }

    #[test]
    fn backspace_at_start_outdents_then_clears() {
        let mut editor = editor(vec![list_block("b1", "one", "number", 2)], caret("b1", 0));
        let _ = editor.key_down(KeyboardEvent::new("Backspace"));
        assert_eq!(levels(&editor), vec![Some(("number".to_owned(), 1))]);

        let _ = editor.key_down(KeyboardEvent::new("Backspace"));
        assert_eq!(levels(&editor), vec![None]);
        assert_eq!(texts(&editor), vec!["one"]);
    }

    #[test]
    fn enter_on_empty_item_clears_it() {
        let mut editor = editor(
            vec![
                list_block("b1", "one", "bullet", 1),
                list_block("b2", "", "bullet", 1),
            ],
            caret("b2", 0),
        );
        let _ = editor.key_down(KeyboardEvent::new("Enter"));
        assert_eq!(editor.value().len(), 2);
        let Block::Text(block) = &editor.value()[1] else {
            unreachable!()
        };
        assert_eq!(block.list_item, None);
        assert_eq!(block.level, None);
    }

    #[test]
    fn enter_in_non_empty_item_splits() {
        let mut editor = editor(vec![list_block("b1", "one", "bullet", 1)], caret("b1", 3));
        let _ = editor.key_down(KeyboardEvent::new("Enter"));
        assert_eq!(
            levels(&editor),
            vec![Some(("bullet".to_owned(), 1)), Some(("bullet".to_owned(), 1))]
        );
    }
}
