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

//! Keeping the caret able to reach past block objects.

use crate::behaviors::{raise, Behavior, Placement, SelectPlacement, SyntheticEvent};
use crate::selection::{EditorSelection, EditorSelectionPoint, Path};
use crate::selectors::{
    get_first_block, get_focus_block, get_focus_block_object, get_last_block,
    get_next_block, get_previous_block, is_empty_text_block, is_selection_collapsed,
};
use crate::snapshot::EditorSnapshot;

pub(super) fn behaviors() -> Vec<Behavior> {
    vec![
        arrow_past_lonely_object("ArrowDown"),
        arrow_past_lonely_object("ArrowUp"),
        break_on_object(),
        delete_empty_block_next_to_object("delete.backward"),
        delete_empty_block_next_to_object("delete.forward"),
    ]
}

/// Arrowing off a block object that is first or last in the document adds
/// a text block to land in.
fn arrow_past_lonely_object(key: &'static str) -> Behavior {
    let down = key == "ArrowDown";
    Behavior::on("key.down")
        .name(format!("core.{key} past block object"))
        .guard(move |snapshot, event| {
            let pressed = event.key_down()?;
            if pressed.key != key || !pressed.is_plain() || !is_selection_collapsed(snapshot) {
                return None;
            }
            let object = get_focus_block_object(snapshot)?;
            let edge = if down {
                get_last_block(snapshot)
            } else {
                get_first_block(snapshot)
            };
            (edge?.key() == object.key).then_some(())
        })
        .actions(move |_, _, _| {
            let placement = if down {
                Placement::After
            } else {
                Placement::Before
            };
            vec![raise(SyntheticEvent::InsertTextBlock {
                placement,
                select: SelectPlacement::Start,
            })]
        })
        .build()
}

fn break_on_object() -> Behavior {
    Behavior::on("insert.break")
        .name("core.break on block object")
        .guard(|snapshot, _| {
            (is_selection_collapsed(snapshot) && get_focus_block_object(snapshot).is_some())
                .then_some(())
        })
        .actions(|_, _, _| {
            vec![raise(SyntheticEvent::InsertTextBlock {
                placement: Placement::After,
                select: SelectPlacement::Start,
            })]
        })
        .build()
}

/// Backspace in an empty text block after a block object, or Delete in one
/// before it, removes the text block and selects the object.
fn delete_empty_block_next_to_object(on: &'static str) -> Behavior {
    let backward = on == "delete.backward";
    Behavior::on(on)
        .name(format!("core.{on} empty block next to object"))
        .guard(move |snapshot, _| empty_block_next_to_object(snapshot, backward))
        .actions(|_, _, (block, object)| {
            vec![
                raise(SyntheticEvent::DeleteBlock {
                    at: Path::block(block.clone()),
                }),
                raise(SyntheticEvent::Select {
                    selection: Some(EditorSelection::collapsed(
                        EditorSelectionPoint::on_block(object.clone()),
                    )),
                }),
            ]
        })
        .build()
}

fn empty_block_next_to_object(
    snapshot: &EditorSnapshot,
    backward: bool,
) -> Option<(String, String)> {
    if !is_selection_collapsed(snapshot) {
        return None;
    }
    let block = get_focus_block(snapshot).filter(|b| is_empty_text_block(b))?;
    let neighbour = if backward {
        get_previous_block(snapshot)
    } else {
        get_next_block(snapshot)
    }?;
    neighbour
        .is_object()
        .then(|| (block.key().to_owned(), neighbour.key().to_owned()))
}
