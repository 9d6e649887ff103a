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

//! A behavior-driven editing core for [Portable Text] documents.
//!
//! The [`Editor`] owns a value (an ordered list of text blocks and block
//! objects), a selection and an undo history. Hosts feed it events; the
//! registered [`behaviors`] decide what each event means, and the action
//! executor carries the resulting intents out through an
//! [`engine::EditingEngine`]. Every committed change is reported as
//! [`ChangeEvent`]s carrying Portable Text [`patches`], which is also how
//! collaborators exchange edits.
//!
//! ```
//! use portable_text_editor::behaviors::SyntheticEvent;
//! use portable_text_editor::selection::{EditorSelection, EditorSelectionPoint};
//! use portable_text_editor::selectors::text_block_text;
//! use portable_text_editor::{Editor, EditorConfig};
//! use serde_json::json;
//!
//! let mut editor = Editor::new(EditorConfig::default()).unwrap();
//! editor.set_value(&json!([{
//!     "_type": "block",
//!     "_key": "b1",
//!     "children": [{"_type": "span", "_key": "s1", "text": "hi", "marks": []}],
//!     "markDefs": [],
//! }]));
//! let caret = EditorSelectionPoint::in_child("b1", "s1", 2);
//! let _ = editor.send(SyntheticEvent::Select {
//!     selection: Some(EditorSelection::collapsed(caret)),
//! });
//! let _ = editor.send(SyntheticEvent::InsertText { text: "!".into() });
//! assert_eq!(text_block_text(&editor.value()[0]), "hi!");
//! ```
//!
//! [Portable Text]: https://github.com/portabletext/portabletext

mod actions;
pub mod behaviors;
pub mod config;
mod debug_tree;
pub mod document;
pub mod editor;
pub mod engine;
pub mod error;
pub mod patches;
pub mod schema;
pub mod selection;
pub mod selectors;
pub mod snapshot;
pub mod text;

pub use crate::config::EditorConfig;
pub use crate::debug_tree::to_tree;
pub use crate::editor::{ChangeEvent, Dispatch, Editor};
pub use crate::snapshot::EditorSnapshot;
