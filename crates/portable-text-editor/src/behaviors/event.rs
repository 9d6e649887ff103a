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

//! The event vocabulary behaviors listen on.
//!
//! Three families share one namespace of dotted type names:
//!
//! | Family    | Examples                                 | Default handling     |
//! |-----------|------------------------------------------|----------------------|
//! | Synthetic | `insert.text`, `decorator.toggle`        | the action executor  |
//! | Native    | `key.down`, `clipboard.paste`            | reported to the host |
//! | Custom    | `custom.mention`                         | none                 |

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use strum::VariantNames;

use crate::document::{Block, Fields};
use crate::selection::{BlockOffset, EditorSelection, EditorSelectionPoint, Path};

/// Where a new block goes relative to the focus block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Before,
    After,
    /// After the focus block, or in place of it when it is an empty text
    /// block.
    #[default]
    Auto,
}

/// Where the selection goes after an insert.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectPlacement {
    #[default]
    Start,
    End,
    None,
}

/// How much `delete.backward` / `delete.forward` removes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteUnit {
    #[default]
    Character,
    Word,
    Line,
    Block,
}

/// A text block property that `block.unset` can remove.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockProperty {
    Style,
    ListItem,
    Level,
}

/// An annotation or object type name plus its field values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TypedValue {
    pub name: String,
    #[serde(default)]
    pub value: Fields,
}

impl TypedValue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Fields::new(),
        }
    }

    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.value.insert(field.to_owned(), value.into());
        self
    }
}

/// Events the action executor knows how to carry out.
#[derive(
    Clone,
    Debug,
    PartialEq,
    Serialize,
    Deserialize,
    strum_macros::IntoStaticStr,
    strum_macros::VariantNames,
)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum SyntheticEvent {
    #[serde(rename = "annotation.add")]
    #[strum(serialize = "annotation.add")]
    AnnotationAdd { annotation: TypedValue },
    #[serde(rename = "annotation.remove")]
    #[strum(serialize = "annotation.remove")]
    AnnotationRemove { annotation: TypedValue },
    #[serde(rename = "annotation.toggle")]
    #[strum(serialize = "annotation.toggle")]
    AnnotationToggle { annotation: TypedValue },

    #[serde(rename = "decorator.add")]
    #[strum(serialize = "decorator.add")]
    DecoratorAdd { decorator: String },
    #[serde(rename = "decorator.remove")]
    #[strum(serialize = "decorator.remove")]
    DecoratorRemove { decorator: String },
    #[serde(rename = "decorator.toggle")]
    #[strum(serialize = "decorator.toggle")]
    DecoratorToggle { decorator: String },

    #[serde(rename = "style.add")]
    #[strum(serialize = "style.add")]
    StyleAdd { style: String },
    #[serde(rename = "style.remove")]
    #[strum(serialize = "style.remove")]
    StyleRemove { style: String },
    #[serde(rename = "style.toggle")]
    #[strum(serialize = "style.toggle")]
    StyleToggle { style: String },

    #[serde(rename = "list item.add")]
    #[strum(serialize = "list item.add")]
    ListItemAdd { list_item: String },
    #[serde(rename = "list item.remove")]
    #[strum(serialize = "list item.remove")]
    ListItemRemove { list_item: String },
    #[serde(rename = "list item.toggle")]
    #[strum(serialize = "list item.toggle")]
    ListItemToggle { list_item: String },

    #[serde(rename = "block.set")]
    #[strum(serialize = "block.set")]
    BlockSet {
        at: Path,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        list_item: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        level: Option<u32>,
    },
    #[serde(rename = "block.unset")]
    #[strum(serialize = "block.unset")]
    BlockUnset { at: Path, props: Vec<BlockProperty> },

    #[serde(rename = "insert.text")]
    #[strum(serialize = "insert.text")]
    InsertText { text: String },
    #[serde(rename = "insert.span")]
    #[strum(serialize = "insert.span")]
    InsertSpan {
        text: String,
        #[serde(default)]
        decorators: Vec<String>,
        #[serde(default)]
        annotations: Vec<TypedValue>,
    },
    #[serde(rename = "insert.inline object")]
    #[strum(serialize = "insert.inline object")]
    InsertInlineObject { inline_object: TypedValue },
    #[serde(rename = "insert.block")]
    #[strum(serialize = "insert.block")]
    InsertBlock {
        block: Block,
        #[serde(default)]
        placement: Placement,
        #[serde(default)]
        select: SelectPlacement,
    },
    #[serde(rename = "insert.block object")]
    #[strum(serialize = "insert.block object")]
    InsertBlockObject {
        block_object: TypedValue,
        #[serde(default)]
        placement: Placement,
        #[serde(default)]
        select: SelectPlacement,
    },
    #[serde(rename = "insert.text block")]
    #[strum(serialize = "insert.text block")]
    InsertTextBlock {
        #[serde(default)]
        placement: Placement,
        #[serde(default)]
        select: SelectPlacement,
    },
    #[serde(rename = "insert.blocks")]
    #[strum(serialize = "insert.blocks")]
    InsertBlocks {
        blocks: Vec<Block>,
        #[serde(default)]
        placement: Placement,
    },
    #[serde(rename = "insert.break")]
    #[strum(serialize = "insert.break")]
    InsertBreak,
    #[serde(rename = "insert.soft break")]
    #[strum(serialize = "insert.soft break")]
    InsertSoftBreak,

    #[serde(rename = "delete.text")]
    #[strum(serialize = "delete.text")]
    DeleteText {
        anchor: BlockOffset,
        focus: BlockOffset,
    },
    #[serde(rename = "delete.block")]
    #[strum(serialize = "delete.block")]
    DeleteBlock { at: Path },
    #[serde(rename = "delete.backward")]
    #[strum(serialize = "delete.backward")]
    DeleteBackward {
        #[serde(default)]
        unit: DeleteUnit,
    },
    #[serde(rename = "delete.forward")]
    #[strum(serialize = "delete.forward")]
    DeleteForward {
        #[serde(default)]
        unit: DeleteUnit,
    },

    #[serde(rename = "move.block")]
    #[strum(serialize = "move.block")]
    MoveBlock { at: Path, to: Path },
    #[serde(rename = "move.block up")]
    #[strum(serialize = "move.block up")]
    MoveBlockUp { at: Path },
    #[serde(rename = "move.block down")]
    #[strum(serialize = "move.block down")]
    MoveBlockDown { at: Path },

    #[serde(rename = "select")]
    #[strum(serialize = "select")]
    Select { selection: Option<EditorSelection> },
    #[serde(rename = "select.previous block")]
    #[strum(serialize = "select.previous block")]
    SelectPreviousBlock {
        #[serde(default)]
        select: SelectPlacement,
    },
    #[serde(rename = "select.next block")]
    #[strum(serialize = "select.next block")]
    SelectNextBlock {
        #[serde(default)]
        select: SelectPlacement,
    },

    #[serde(rename = "focus")]
    #[strum(serialize = "focus")]
    Focus,
    #[serde(rename = "blur")]
    #[strum(serialize = "blur")]
    Blur,

    #[serde(rename = "history.undo")]
    #[strum(serialize = "history.undo")]
    HistoryUndo,
    #[serde(rename = "history.redo")]
    #[strum(serialize = "history.redo")]
    HistoryRedo,
}

impl SyntheticEvent {
    pub fn event_type(&self) -> &'static str {
        self.into()
    }

    /// Whether carrying this event out can change the value.
    pub fn mutates_value(&self) -> bool {
        !matches!(
            self,
            SyntheticEvent::Select { .. }
                | SyntheticEvent::SelectPreviousBlock { .. }
                | SyntheticEvent::SelectNextBlock { .. }
                | SyntheticEvent::Focus
                | SyntheticEvent::Blur
        )
    }
}

/// A keyboard event as reported by the host.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyboardEvent {
    /// The logical key, e.g. `"Enter"`, `"a"`, `"ArrowDown"`.
    pub key: String,
    /// The physical key, e.g. `"KeyA"`.
    pub code: String,
    pub alt_key: bool,
    pub ctrl_key: bool,
    pub meta_key: bool,
    pub shift_key: bool,
}

impl KeyboardEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift_key = true;
        self
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl_key = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta_key = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt_key = true;
        self
    }

    /// True when no modifier at all is held.
    pub fn is_plain(&self) -> bool {
        !(self.alt_key || self.ctrl_key || self.meta_key || self.shift_key)
    }
}

/// Raw input the host forwards before running its own default handling.
#[derive(
    Clone,
    Debug,
    PartialEq,
    Serialize,
    Deserialize,
    strum_macros::IntoStaticStr,
    strum_macros::VariantNames,
)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum NativeEvent {
    #[serde(rename = "key.down")]
    #[strum(serialize = "key.down")]
    KeyDown { key: KeyboardEvent },
    #[serde(rename = "key.up")]
    #[strum(serialize = "key.up")]
    KeyUp { key: KeyboardEvent },
    #[serde(rename = "clipboard.paste")]
    #[strum(serialize = "clipboard.paste")]
    ClipboardPaste {
        #[serde(default)]
        text_plain: Option<String>,
        #[serde(default)]
        portable_text: Option<Vec<Block>>,
    },
    #[serde(rename = "clipboard.copy")]
    #[strum(serialize = "clipboard.copy")]
    ClipboardCopy,
    #[serde(rename = "mouse.click")]
    #[strum(serialize = "mouse.click")]
    MouseClick { position: EditorSelectionPoint },
}

impl NativeEvent {
    pub fn event_type(&self) -> &'static str {
        self.into()
    }
}

/// A host-defined event, `custom.<name>`, with an arbitrary payload.
#[derive(Clone, Debug, PartialEq)]
pub struct CustomEvent {
    pub name: String,
    pub payload: Map<String, Value>,
}

impl CustomEvent {
    pub const PREFIX: &'static str = "custom.";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: Map::new(),
        }
    }

    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.payload.insert(field.to_owned(), value.into());
        self
    }
}

/// Any event a behavior can listen on.
#[derive(Clone, Debug, PartialEq)]
pub enum BehaviorEvent {
    Synthetic(SyntheticEvent),
    Native(NativeEvent),
    Custom(CustomEvent),
}

impl BehaviorEvent {
    /// The dotted type name, e.g. `"insert.text"` or `"custom.mention"`.
    pub fn event_type(&self) -> String {
        match self {
            BehaviorEvent::Synthetic(event) => event.event_type().to_owned(),
            BehaviorEvent::Native(event) => event.event_type().to_owned(),
            BehaviorEvent::Custom(event) => {
                format!("{}{}", CustomEvent::PREFIX, event.name)
            }
        }
    }

    pub fn as_synthetic(&self) -> Option<&SyntheticEvent> {
        match self {
            BehaviorEvent::Synthetic(event) => Some(event),
            _ => None,
        }
    }

    pub fn as_native(&self) -> Option<&NativeEvent> {
        match self {
            BehaviorEvent::Native(event) => Some(event),
            _ => None,
        }
    }

    pub fn as_custom(&self) -> Option<&CustomEvent> {
        match self {
            BehaviorEvent::Custom(event) => Some(event),
            _ => None,
        }
    }

    /// The key of a `key.down` event.
    pub fn key_down(&self) -> Option<&KeyboardEvent> {
        match self {
            BehaviorEvent::Native(NativeEvent::KeyDown { key }) => Some(key),
            _ => None,
        }
    }

    /// The text of an `insert.text` event.
    pub fn inserted_text(&self) -> Option<&str> {
        match self {
            BehaviorEvent::Synthetic(SyntheticEvent::InsertText { text }) => {
                Some(text)
            }
            _ => None,
        }
    }
}

impl From<SyntheticEvent> for BehaviorEvent {
    fn from(event: SyntheticEvent) -> Self {
        BehaviorEvent::Synthetic(event)
    }
}

impl From<NativeEvent> for BehaviorEvent {
    fn from(event: NativeEvent) -> Self {
        BehaviorEvent::Native(event)
    }
}

impl From<CustomEvent> for BehaviorEvent {
    fn from(event: CustomEvent) -> Self {
        BehaviorEvent::Custom(event)
    }
}

impl Serialize for BehaviorEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BehaviorEvent::Synthetic(event) => event.serialize(serializer),
            BehaviorEvent::Native(event) => event.serialize(serializer),
            BehaviorEvent::Custom(event) => {
                let mut map = event.payload.clone();
                map.insert("type".to_owned(), Value::String(self.event_type()));
                map.serialize(serializer)
            }
        }
    }
}

impl<'de> Deserialize<'de> for BehaviorEvent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut map = Map::<String, Value>::deserialize(deserializer)?;
        let event_type = match map.get("type") {
            Some(Value::String(t)) => t.clone(),
            _ => return Err(de::Error::missing_field("type")),
        };
        if let Some(name) = event_type.strip_prefix(CustomEvent::PREFIX) {
            map.remove("type");
            return Ok(BehaviorEvent::Custom(CustomEvent {
                name: name.to_owned(),
                payload: map,
            }));
        }
        let value = Value::Object(map);
        if SyntheticEvent::VARIANTS.contains(&event_type.as_str()) {
            serde_json::from_value(value)
                .map(BehaviorEvent::Synthetic)
                .map_err(de::Error::custom)
        } else if NativeEvent::VARIANTS.contains(&event_type.as_str()) {
            serde_json::from_value(value)
                .map(BehaviorEvent::Native)
                .map_err(de::Error::custom)
        } else {
            Err(de::Error::custom(format!("unknown event type `{event_type}`")))
        }
    }
}

/// Which events a behavior listens on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventMatcher {
    /// `"*"`
    Any,
    /// `"insert.*"` matches every event whose type starts with `insert.`.
    Namespace(String),
    Exact(String),
}

impl EventMatcher {
    pub fn matches(&self, event_type: &str) -> bool {
        match self {
            EventMatcher::Any => true,
            EventMatcher::Namespace(namespace) => event_type
                .strip_prefix(namespace.as_str())
                .is_some_and(|rest| rest.starts_with('.')),
            EventMatcher::Exact(expected) => expected == event_type,
        }
    }
}

impl FromStr for EventMatcher {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == "*" {
            EventMatcher::Any
        } else if let Some(namespace) = s.strip_suffix(".*") {
            EventMatcher::Namespace(namespace.to_owned())
        } else {
            EventMatcher::Exact(s.to_owned())
        })
    }
}

impl From<&str> for EventMatcher {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(matcher) => matcher,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for EventMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventMatcher::Any => write!(f, "*"),
            EventMatcher::Namespace(namespace) => write!(f, "{namespace}.*"),
            EventMatcher::Exact(event_type) => write!(f, "{event_type}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use serde_json::json;

    use super::*;

    #[test]
    fn synthetic_events_use_dotted_wire_names() {
        let event = SyntheticEvent::InsertBlockObject {
            block_object: TypedValue::new("image").with("src", "a.png"),
            placement: Placement::Auto,
            select: SelectPlacement::Start,
        };
        assert_eq!(event.event_type(), "insert.block object");
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "type": "insert.block object",
                "blockObject": {"name": "image", "value": {"src": "a.png"}},
                "placement": "auto",
                "select": "start",
            })
        );
    }

    #[test]
    fn events_deserialize_by_family() {
        let event: BehaviorEvent = serde_json::from_str(indoc! {r#"
            {"type": "key.down", "key": {"key": "Enter", "shiftKey": true}}
        "#})
        .unwrap();
        assert_eq!(event.key_down(), Some(&KeyboardEvent::new("Enter").with_shift()));

        let event: BehaviorEvent =
            serde_json::from_str(r#"{"type": "list item.toggle", "listItem": "bullet"}"#).unwrap();
        assert_eq!(
            event,
            BehaviorEvent::Synthetic(SyntheticEvent::ListItemToggle {
                list_item: "bullet".into()
            })
        );

        let event: BehaviorEvent =
            serde_json::from_str(r#"{"type": "custom.mention", "user": "@bob"}"#).unwrap();
        assert_eq!(event.event_type(), "custom.mention");
        assert_eq!(event.as_custom().unwrap().payload["user"], json!("@bob"));
        assert_eq!(serde_json::to_value(&event).unwrap()["type"], json!("custom.mention"));

        assert!(serde_json::from_str::<BehaviorEvent>(r#"{"type": "nope"}"#).is_err());
    }

    #[test]
    fn matchers() {
        let exact = EventMatcher::from("insert.text");
        assert!(exact.matches("insert.text"));
        assert!(!exact.matches("insert.text block"));

        let namespace = EventMatcher::from("insert.*");
        assert!(namespace.matches("insert.block object"));
        assert!(!namespace.matches("inserted.x"));
        assert_eq!(namespace.to_string(), "insert.*");

        assert!(EventMatcher::from("*").matches("custom.anything"));
    }
}
