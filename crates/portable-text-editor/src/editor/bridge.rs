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

//! Translating host input into behavior events.
//!
//! Hosts forward key presses and `beforeinput`-style intents. Both are
//! offered to the behaviors as native events first; whatever nobody claims
//! is mapped onto the matching synthetic event here, so that the editor
//! stays usable with no behaviors registered at all.

use tracing::trace;

use super::{Dispatch, Editor};
use crate::behaviors::{DeleteUnit, KeyboardEvent, NativeEvent, SyntheticEvent};
use crate::document::Block;

impl Editor {
    /// Handle a key press.
    pub fn key_down(&mut self, key: KeyboardEvent) -> Dispatch {
        if self.send(NativeEvent::KeyDown { key: key.clone() }).is_handled() {
            return Dispatch::Handled;
        }
        match default_key_intent(&key) {
            Some(event) => self.send(event),
            None => Dispatch::NotHandled,
        }
    }

    pub fn key_up(&mut self, key: KeyboardEvent) -> Dispatch {
        self.send(NativeEvent::KeyUp { key })
    }

    /// Handle a `beforeinput` intent such as `"insertText"`.
    pub fn before_input(&mut self, input_type: &str, data: Option<&str>) -> Dispatch {
        match input_intent(input_type, data) {
            Some(event) => self.send(event),
            None => {
                trace!(input_type, "unmapped input intent");
                Dispatch::NotHandled
            }
        }
    }

    /// Handle a paste. Portable Text wins over plain text when both are
    /// present.
    pub fn paste(&mut self, text_plain: Option<String>, portable_text: Option<Vec<Block>>) -> Dispatch {
        let native = NativeEvent::ClipboardPaste {
            text_plain: text_plain.clone(),
            portable_text: portable_text.clone(),
        };
        if self.send(native).is_handled() {
            return Dispatch::Handled;
        }
        match (portable_text, text_plain) {
            (Some(blocks), _) => self.send(SyntheticEvent::InsertBlocks {
                blocks,
                placement: Default::default(),
            }),
            (None, Some(text)) => self.send(SyntheticEvent::InsertText { text }),
            (None, None) => Dispatch::NotHandled,
        }
    }
}

/// The editing intent of a key press nobody claimed.
pub fn default_key_intent(key: &KeyboardEvent) -> Option<SyntheticEvent> {
    let command = key.ctrl_key || key.meta_key;
    let unit = if key.alt_key {
        DeleteUnit::Word
    } else {
        DeleteUnit::Character
    };
    match key.key.as_str() {
        "Enter" if key.shift_key => Some(SyntheticEvent::InsertSoftBreak),
        "Enter" => Some(SyntheticEvent::InsertBreak),
        "Backspace" => Some(SyntheticEvent::DeleteBackward { unit }),
        "Delete" => Some(SyntheticEvent::DeleteForward { unit }),
        text if !command && text.chars().count() == 1 => Some(SyntheticEvent::InsertText {
            text: text.to_owned(),
        }),
        _ => None,
    }
}

/// The synthetic event for an `InputEvent.inputType`.
pub fn input_intent(input_type: &str, data: Option<&str>) -> Option<SyntheticEvent> {
    use SyntheticEvent::*;
    let event = match input_type {
        "insertText" | "insertReplacementText" | "insertFromPaste" => InsertText {
            text: data?.to_owned(),
        },
        "insertParagraph" => InsertBreak,
        "insertLineBreak" => InsertSoftBreak,
        "deleteContentBackward" => DeleteBackward {
            unit: DeleteUnit::Character,
        },
        "deleteContentForward" => DeleteForward {
            unit: DeleteUnit::Character,
        },
        "deleteWordBackward" => DeleteBackward {
            unit: DeleteUnit::Word,
        },
        "deleteWordForward" => DeleteForward {
            unit: DeleteUnit::Word,
        },
        "deleteSoftLineBackward" | "deleteHardLineBackward" => DeleteBackward {
            unit: DeleteUnit::Line,
        },
        "deleteSoftLineForward" | "deleteHardLineForward" => DeleteForward {
            unit: DeleteUnit::Line,
        },
        "historyUndo" => HistoryUndo,
        "historyRedo" => HistoryRedo,
        "formatBold" => DecoratorToggle {
            decorator: "strong".to_owned(),
        },
        "formatItalic" => DecoratorToggle {
            decorator: "em".to_owned(),
        },
        "formatUnderline" => DecoratorToggle {
            decorator: "underline".to_owned(),
        },
        _ => return None,
    };
    Some(event)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_intents() {
        assert_eq!(default_key_intent(&KeyboardEvent::new("Enter")), Some(SyntheticEvent::InsertBreak));
        assert_eq!(
            default_key_intent(&KeyboardEvent::new("Enter").with_shift()),
            Some(SyntheticEvent::InsertSoftBreak)
        );
        assert_eq!(
            default_key_intent(&KeyboardEvent::new("Backspace").with_alt()),
            Some(SyntheticEvent::DeleteBackward {
                unit: DeleteUnit::Word
            })
        );
        assert_eq!(
            default_key_intent(&KeyboardEvent::new("x")),
            Some(SyntheticEvent::InsertText { text: "x".into() })
        );
        assert_eq!(default_key_intent(&KeyboardEvent::new("b").with_meta()), None);
        assert_eq!(default_key_intent(&KeyboardEvent::new("ArrowLeft")), None);
    }

    #[test]
    fn input_intents() {
        assert_eq!(
            input_intent("insertText", Some("a")),
            Some(SyntheticEvent::InsertText { text: "a".into() })
        );
        assert_eq!(input_intent("insertText", None), None);
        assert_eq!(input_intent("historyRedo", None), Some(SyntheticEvent::HistoryRedo));
        assert_eq!(input_intent("insertOrderedList", None), None);
    }
}
