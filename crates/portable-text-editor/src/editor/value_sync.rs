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

//! Loading values from outside the editor.

use serde_json::Value;
use tracing::{debug, warn};

use super::{ChangeEvent, Editor};
use crate::document::{validate_value, value_to_json, Block};

impl Editor {
    /// Load a raw Portable Text value.
    ///
    /// Every broken invariant is reported as an `invalid value` change. If
    /// all of them can be repaired and `auto_resolve_invalid_values` is on,
    /// the repaired value is loaded; otherwise the current value is kept.
    /// Returns whether a value was loaded.
    pub fn set_value(&mut self, raw: &Value) -> bool {
        let validation = validate_value(
            raw,
            &self.schema,
            self.config.max_list_depth,
            self.keys.as_mut(),
        );
        let valid = validation.is_valid();
        for issue in validation.issues {
            warn!(issue = %issue.description, "invalid value");
            self.emit(ChangeEvent::InvalidValue {
                description: issue.description,
                resolution: issue.resolution,
                value: raw.clone(),
            });
        }
        let target = match validation.repaired {
            Some(value) if valid || self.config.auto_resolve_invalid_values => value,
            _ => {
                debug!("keeping the previous value");
                return false;
            }
        };
        if let Err(err) = self.merge_external(&target) {
            warn!(%err, "value could not be loaded");
            return false;
        }
        let value = self.engine.value().to_vec();
        self.emit(ChangeEvent::Value { value });
        true
    }

    /// Load typed blocks. They are validated like raw JSON.
    pub fn set_blocks(&mut self, blocks: &[Block]) -> bool {
        self.set_value(&value_to_json(blocks))
    }
}
