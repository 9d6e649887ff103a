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

//! Keyboard shortcut descriptions such as `"mod+shift+z"`.
//!
//! `mod` is Ctrl or Cmd, whichever the platform uses, so it matches either
//! modifier being held.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use super::event::KeyboardEvent;
use crate::error::HotkeyError;

/// Combinations owned by the editor's history handling.
pub const RESERVED_HOTKEYS: [&str; 3] = ["mod+z", "mod+shift+z", "mod+y"];

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Hotkey {
    /// Lower-cased logical key.
    key: String,
    primary: bool,
    ctrl: bool,
    meta: bool,
    alt: bool,
    shift: bool,
}

impl Hotkey {
    pub fn matches(&self, event: &KeyboardEvent) -> bool {
        if !event.key.eq_ignore_ascii_case(&self.key)
            || event.alt_key != self.alt
            || event.shift_key != self.shift
        {
            return false;
        }
        if self.primary {
            event.ctrl_key || event.meta_key
        } else {
            event.ctrl_key == self.ctrl && event.meta_key == self.meta
        }
    }

    pub fn is_reserved(&self) -> bool {
        RESERVED_HOTKEYS
            .iter()
            .filter_map(|r| r.parse::<Hotkey>().ok())
            .any(|reserved| reserved == *self)
    }

    /// Parse a hotkey a user wants to bind, rejecting reserved ones.
    pub fn parse_bindable(s: &str) -> Result<Self, HotkeyError> {
        let hotkey: Hotkey = s.parse()?;
        if hotkey.is_reserved() {
            return Err(HotkeyError::Reserved(s.to_owned()));
        }
        Ok(hotkey)
    }
}

impl FromStr for Hotkey {
    type Err = HotkeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || HotkeyError::Malformed(s.to_owned());
        let mut parts: Vec<&str> = s.split('+').map(str::trim).collect();
        let key = parts.pop().filter(|k| !k.is_empty()).ok_or_else(malformed)?;
        let mut hotkey = Hotkey {
            key: key.to_lowercase(),
            ..Hotkey::default()
        };
        for modifier in parts {
            let flag = match modifier.to_lowercase().as_str() {
                "mod" => &mut hotkey.primary,
                "ctrl" | "control" => &mut hotkey.ctrl,
                "meta" | "cmd" => &mut hotkey.meta,
                "alt" | "option" => &mut hotkey.alt,
                "shift" => &mut hotkey.shift,
                _ => return Err(malformed()),
            };
            if *flag {
                return Err(malformed());
            }
            *flag = true;
        }
        Ok(hotkey)
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modifiers = [
            (self.primary, "mod"),
            (self.ctrl, "ctrl"),
            (self.meta, "meta"),
            (self.alt, "alt"),
            (self.shift, "shift"),
        ];
        for (_, name) in modifiers.iter().filter(|(held, _)| *held) {
            write!(f, "{name}+")?;
        }
        write!(f, "{}", self.key)
    }
}

impl<'de> Deserialize<'de> for Hotkey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mod_matches_ctrl_or_meta() {
        let bold: Hotkey = "mod+b".parse().unwrap();
        assert!(bold.matches(&KeyboardEvent::new("b").with_ctrl()));
        assert!(bold.matches(&KeyboardEvent::new("B").with_meta()));
        assert!(!bold.matches(&KeyboardEvent::new("b")));
        assert!(!bold.matches(&KeyboardEvent::new("b").with_ctrl().with_shift()));
    }

    #[test]
    fn explicit_modifiers_must_match_exactly() {
        let hotkey: Hotkey = "ctrl+alt+k".parse().unwrap();
        assert!(hotkey.matches(&KeyboardEvent::new("k").with_ctrl().with_alt()));
        assert!(!hotkey.matches(&KeyboardEvent::new("k").with_ctrl().with_alt().with_meta()));
        assert_eq!(hotkey.to_string(), "ctrl+alt+k");
    }

    #[test]
    fn malformed_hotkeys() {
        for bad in ["", "mod+", "hyper+x", "shift+shift+x"] {
            assert_eq!(bad.parse::<Hotkey>(), Err(HotkeyError::Malformed(bad.into())));
        }
    }

    #[test]
    fn reserved_hotkeys_cannot_be_bound() {
        assert_eq!(
            Hotkey::parse_bindable("Mod+Shift+Z"),
            Err(HotkeyError::Reserved("Mod+Shift+Z".into()))
        );
        assert!(Hotkey::parse_bindable("mod+i").is_ok());
    }
}
