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

//! What the editor reports to its host.

use serde::Serialize;

use crate::document::{Block, InvalidValueResolution};
use crate::patches::Patch;
use crate::selection::EditorSelection;
use crate::snapshot::EditorSnapshot;

/// An editor change, delivered to every `on_change` listener.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ChangeEvent {
    /// The editor is set up. Replayed to listeners that subscribe later.
    #[serde(rename = "ready")]
    Ready,

    /// A value was loaded from outside with `set_value`.
    #[serde(rename = "value")]
    Value { value: Vec<Block> },

    /// A committed local action set changed the value. The patches are what
    /// collaborators apply with `apply_remote_patches`.
    #[serde(rename = "mutation")]
    Mutation {
        patches: Vec<Patch>,
        snapshot: EditorSnapshot,
    },

    #[serde(rename = "selection")]
    Selection { selection: Option<EditorSelection> },

    #[serde(rename = "focused")]
    Focused,

    #[serde(rename = "blurred")]
    Blurred,

    /// A value passed to `set_value` broke a document invariant.
    #[serde(rename = "invalid value")]
    InvalidValue {
        description: String,
        resolution: Option<InvalidValueResolution>,
        value: serde_json::Value,
    },

    /// Undo reverted a step. The patches are also sent as a `Mutation`.
    #[serde(rename = "undo")]
    Undo { patches: Vec<Patch> },

    #[serde(rename = "redo")]
    Redo { patches: Vec<Patch> },
}

impl ChangeEvent {
    pub fn change_type(&self) -> &'static str {
        match self {
            ChangeEvent::Ready => "ready",
            ChangeEvent::Value { .. } => "value",
            ChangeEvent::Mutation { .. } => "mutation",
            ChangeEvent::Selection { .. } => "selection",
            ChangeEvent::Focused => "focused",
            ChangeEvent::Blurred => "blurred",
            ChangeEvent::InvalidValue { .. } => "invalid value",
            ChangeEvent::Undo { .. } => "undo",
            ChangeEvent::Redo { .. } => "redo",
        }
    }

    /// Patches carried by a mutation.
    pub fn patches(&self) -> Option<&[Patch]> {
        match self {
            ChangeEvent::Mutation { patches, .. } => Some(patches),
            _ => None,
        }
    }
}

/// Whether an event was handled by the editor or should fall through to
/// the host's own default.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    Handled,
    NotHandled,
}

impl Dispatch {
    pub fn is_handled(self) -> bool {
        self == Dispatch::Handled
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn change_events_serialize_with_their_wire_type() {
        let selection = ChangeEvent::Selection { selection: None };
        assert_eq!(
            serde_json::to_value(&selection).unwrap(),
            json!({"type": "selection", "selection": null})
        );
        assert_eq!(
            serde_json::to_value(ChangeEvent::Ready).unwrap(),
            json!({"type": "ready"})
        );
        let invalid = ChangeEvent::InvalidValue {
            description: "not an array".into(),
            resolution: None,
            value: json!(1),
        };
        assert_eq!(serde_json::to_value(&invalid).unwrap()["type"], "invalid value");
        assert_eq!(invalid.change_type(), "invalid value");
    }
}
