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

//! Editor configuration.
//!
//! Every field has a default, so hosts only spell out what they change:
//!
//! ```json
//! {
//!   "softBreak": "line-break",
//!   "markdown": { "enabled": false },
//!   "decoratorHotkeys": { "mod+b": "strong", "mod+shift+x": "strike-through" }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::behaviors::Hotkey;
use crate::document::MAX_LIST_LEVEL;
use crate::error::{ConfigError, HotkeyError};
use crate::schema::Schema;

/// What `insert.soft break` does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SoftBreakMode {
    /// Same as `insert.break`.
    #[default]
    SplitBlock,
    /// Insert `"\n"` into the current span.
    LineBreak,
}

/// Markdown shortcuts applied while typing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarkdownConfig {
    pub enabled: bool,
    /// Style applied by `> `.
    pub blockquote_style: Option<String>,
    /// Styles applied by `# ` through `###### `, indexed by level - 1.
    pub heading_styles: Vec<String>,
    /// List applied by `- ` and `* `.
    pub unordered_list: Option<String>,
    /// List applied by `1. `.
    pub ordered_list: Option<String>,
    /// Block object inserted for `---`, `***` and `___`.
    pub horizontal_rule: Option<String>,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            blockquote_style: Some("blockquote".to_owned()),
            heading_styles: (1..=6).map(|level| format!("h{level}")).collect(),
            unordered_list: Some("bullet".to_owned()),
            ordered_list: Some("number".to_owned()),
            horizontal_rule: Some("break".to_owned()),
        }
    }
}

impl MarkdownConfig {
    /// Style for a heading of `level` hashes, if one is configured.
    pub fn heading_style(&self, level: usize) -> Option<&str> {
        level
            .checked_sub(1)
            .and_then(|i| self.heading_styles.get(i))
            .map(String::as_str)
    }
}

/// Top-level editor configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub schema: Schema,

    /// Deepest list level. Levels are clamped to `1..=max_list_depth`.
    pub max_list_depth: u32,

    pub soft_break: SoftBreakMode,

    pub markdown: MarkdownConfig,

    /// Hotkey to decorator name, e.g. `"mod+b": "strong"`.
    pub decorator_hotkeys: BTreeMap<String, String>,

    /// Load the repaired value when an invalid one is set, instead of
    /// keeping the previous value.
    pub auto_resolve_invalid_values: bool,

    /// Refuse every event that would change the value.
    pub read_only: bool,

    /// Undo steps kept per editor.
    pub history_limit: usize,

    /// Register the built-in behaviors.
    pub core_behaviors: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        let hotkeys = [
            ("mod+b", "strong"),
            ("mod+i", "em"),
            ("mod+u", "underline"),
            ("mod+'", "code"),
        ];
        Self {
            schema: Schema::default(),
            max_list_depth: MAX_LIST_LEVEL,
            soft_break: SoftBreakMode::default(),
            markdown: MarkdownConfig::default(),
            decorator_hotkeys: hotkeys
                .into_iter()
                .map(|(k, d)| (k.to_owned(), d.to_owned()))
                .collect(),
            auto_resolve_invalid_values: true,
            read_only: false,
            history_limit: 100,
            core_behaviors: true,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.decorator_hotkeys()?;
        Ok(config)
    }

    /// The configured decorator hotkeys, parsed.
    ///
    /// Fails if a hotkey is malformed or reserved, or names a decorator the
    /// schema does not declare.
    pub fn decorator_hotkeys(&self) -> Result<Vec<(Hotkey, String)>, HotkeyError> {
        self.decorator_hotkeys
            .iter()
            .map(|(hotkey, decorator)| {
                let parsed = Hotkey::parse_bindable(hotkey)?;
                if !self.schema.has_decorator(decorator) {
                    return Err(HotkeyError::UnknownDecorator {
                        hotkey: hotkey.clone(),
                        decorator: decorator.clone(),
                    });
                }
                Ok((parsed, decorator.clone()))
            })
            .collect()
    }

    /// Clamp a list level into the configured range.
    pub fn clamp_level(&self, level: u32) -> u32 {
        level.clamp(1, self.max_list_depth.max(1))
    }
}
