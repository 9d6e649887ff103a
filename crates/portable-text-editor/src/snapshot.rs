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

use std::rc::Rc;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::document::Block;
use crate::schema::Schema;
use crate::selection::EditorSelection;

/// Read-only editor state handed to selectors, guards and action sets.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorSnapshot {
    pub schema: Rc<Schema>,
    pub value: Vec<Block>,
    pub selection: Option<EditorSelection>,
    /// Decorators the next inserted text will carry, when a decorator was
    /// toggled on a collapsed caret.
    pub pending_marks: Option<Vec<String>>,
}

impl EditorSnapshot {
    pub fn new(
        schema: Rc<Schema>,
        value: Vec<Block>,
        selection: Option<EditorSelection>,
    ) -> Self {
        Self {
            schema,
            value,
            selection,
            pending_marks: None,
        }
    }

    pub fn with_selection(mut self, selection: Option<EditorSelection>) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_pending_marks(mut self, marks: Option<Vec<String>>) -> Self {
        self.pending_marks = marks;
        self
    }
}

/// Serializes as `{value, selection}`. The schema is configuration, not
/// state, and stays out of change payloads.
impl Serialize for EditorSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("EditorSnapshot", 2)?;
        state.serialize_field("value", &self.value)?;
        state.serialize_field("selection", &self.selection)?;
        state.end()
    }
}
