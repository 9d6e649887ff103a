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

//! JavaScript bindings.
//!
//! Values, selections, events, patches and change events cross the
//! boundary as JSON strings in their Portable Text wire shape, so the JS
//! side needs no generated types.

use js_sys::Function;
use portable_text_editor::behaviors::{BehaviorEvent, KeyboardEvent};
use portable_text_editor::document::Block;
use portable_text_editor::editor::{Dispatch, ListenerId};
use portable_text_editor::patches::Patch;
use portable_text_editor::{Editor, EditorConfig};
use tracing::warn;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
pub struct PortableTextEditor {
    inner: Editor,
}

#[wasm_bindgen]
impl PortableTextEditor {
    /// Create an editor from a JSON config. An empty string uses the
    /// defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<PortableTextEditor, JsError> {
        let config = if config_json.trim().is_empty() {
            EditorConfig::default()
        } else {
            EditorConfig::from_json(config_json)?
        };
        Ok(Self {
            inner: Editor::new(config)?,
        })
    }

    /// Send any behavior event, e.g. `{"type": "insert.text", "text": "a"}`.
    /// Returns whether it was handled.
    pub fn send(&mut self, event_json: &str) -> Result<bool, JsError> {
        let event: BehaviorEvent = serde_json::from_str(event_json)?;
        Ok(handled(self.inner.send(event)))
    }

    /// `{"key": "b", "ctrlKey": true}`. `false` means the host should run
    /// its default handling.
    pub fn key_down(&mut self, key_json: &str) -> Result<bool, JsError> {
        let key: KeyboardEvent = serde_json::from_str(key_json)?;
        Ok(handled(self.inner.key_down(key)))
    }

    pub fn key_up(&mut self, key_json: &str) -> Result<bool, JsError> {
        let key: KeyboardEvent = serde_json::from_str(key_json)?;
        Ok(handled(self.inner.key_up(key)))
    }

    pub fn before_input(&mut self, input_type: &str, data: Option<String>) -> bool {
        handled(self.inner.before_input(input_type, data.as_deref()))
    }

    pub fn paste(
        &mut self,
        text_plain: Option<String>,
        portable_text_json: Option<String>,
    ) -> Result<bool, JsError> {
        let blocks = portable_text_json
            .map(|json| serde_json::from_str::<Vec<Block>>(&json))
            .transpose()?;
        Ok(handled(self.inner.paste(text_plain, blocks)))
    }

    pub fn undo(&mut self) {
        self.inner.undo();
    }

    pub fn redo(&mut self) {
        self.inner.redo();
    }

    /// Load a Portable Text value. Returns whether it was loaded.
    pub fn set_value(&mut self, value_json: &str) -> Result<bool, JsError> {
        let value: serde_json::Value = serde_json::from_str(value_json)?;
        Ok(self.inner.set_value(&value))
    }

    pub fn value(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(self.inner.value())?)
    }

    pub fn selection(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.inner.selection())?)
    }

    /// Apply the `patches` of another editor's `mutation` change.
    pub fn apply_remote_patches(&mut self, patches_json: &str) -> Result<(), JsError> {
        let patches: Vec<Patch> = serde_json::from_str(patches_json)?;
        self.inner.apply_remote_patches(&patches)?;
        Ok(())
    }

    /// Call `callback` with every change, as a JSON string. Returns a handle
    /// for [`Self::remove_listener`].
    pub fn on_change(&mut self, callback: Function) -> Listener {
        let id = self.inner.on_change(move |change| {
            let json = match serde_json::to_string(change) {
                Ok(json) => json,
                Err(err) => {
                    warn!(%err, "change could not be serialized");
                    return;
                }
            };
            if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                warn!(?err, "change listener threw");
            }
        });
        Listener { id }
    }

    pub fn remove_listener(&mut self, listener: &Listener) -> bool {
        self.inner.remove_listener(listener.id)
    }

    pub fn can_undo(&self) -> bool {
        self.inner.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.inner.can_redo()
    }

    /// Debug dump of the value and selection.
    pub fn to_tree(&self) -> String {
        self.inner.snapshot().to_tree()
    }
}

/// Handle for a change listener.
#[wasm_bindgen]
pub struct Listener {
    id: ListenerId,
}

fn handled(dispatch: Dispatch) -> bool {
    dispatch.is_handled()
}
