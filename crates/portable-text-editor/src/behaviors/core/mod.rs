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

//! The built-in behaviors every editor registers unless
//! [`EditorConfig::core_behaviors`] is off.
//!
//! They are ordinary [`Behavior`]s registered before any host behavior, so
//! a host can override any of them by registering one for the same event.
//! Within the core set, later groups take precedence over earlier ones.

mod abstract_behaviors;
mod block_objects;
mod foundational;
mod lists;
mod markdown;

use super::Behavior;
use crate::config::EditorConfig;
use crate::error::HotkeyError;

/// Build the core behaviors in registration order.
///
/// Fails when the configured decorator hotkeys do not parse or name a
/// decorator the schema lacks.
pub fn core_behaviors(config: &EditorConfig) -> Result<Vec<Behavior>, HotkeyError> {
    let mut behaviors = abstract_behaviors::behaviors();
    behaviors.extend(foundational::behaviors(config)?);
    behaviors.extend(block_objects::behaviors());
    behaviors.extend(lists::behaviors(config));
    if config.markdown.enabled {
        behaviors.extend(markdown::behaviors(&config.markdown));
    }
    Ok(behaviors)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HotkeyError;

    #[test]
    fn markdown_behaviors_follow_config() {
        let with = core_behaviors(&EditorConfig::default()).unwrap();
        let mut config = EditorConfig::default();
        config.markdown.enabled = false;
        let without = core_behaviors(&config).unwrap();
        assert!(with.len() > without.len());
        assert!(without
            .iter()
            .all(|b| !b.name().unwrap_or_default().starts_with("core.markdown")));
    }

    #[test]
    fn bad_decorator_hotkey_is_rejected() {
        let mut config = EditorConfig::default();
        config
            .decorator_hotkeys
            .insert("mod+z".to_owned(), "strong".to_owned());
        assert_eq!(
            core_behaviors(&config).unwrap_err(),
            HotkeyError::Reserved("mod+z".to_owned())
        );
    }

    #[test]
    fn every_core_behavior_is_named() {
        let behaviors = core_behaviors(&EditorConfig::default()).unwrap();
        assert!(behaviors
            .iter()
            .all(|b| b.name().is_some_and(|n| n.starts_with("core."))));
    }
}
