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

//! The Portable Text document model.
//!
//! A document is an ordered `Vec<Block>`. Every node owns its logical key
//! directly, so there is no side table mapping engine nodes back to keys.
//!
//! | Node          | `_type`            | Contents                          |
//! |---------------|--------------------|-----------------------------------|
//! | Text block    | `"block"`          | style, list item, children, marks |
//! | Block object  | schema object name | opaque fields                     |
//! | Span          | `"span"`           | text + marks                      |
//! | Inline object | schema object name | opaque fields                     |

mod json;
mod keys;
mod validation;

use serde_json::Value;

use crate::text::utf16_len;

pub use json::{value_from_json, value_to_json};
pub use keys::{IncrementingKeyGenerator, KeyGenerator, UuidKeyGenerator};
pub use validation::{
    validate_value, InvalidValueResolution, ValueIssue, ValueValidation,
};

/// `_type` of text blocks.
pub const TEXT_BLOCK_TYPE: &str = "block";

/// `_type` of spans.
pub const SPAN_TYPE: &str = "span";

/// Maximum list nesting depth.
pub const MAX_LIST_LEVEL: u32 = 10;

/// Opaque fields on objects and mark definitions.
pub type Fields = serde_json::Map<String, Value>;

/// A top-level document node.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    Text(TextBlock),
    Object(BlockObject),
}

impl Block {
    pub fn key(&self) -> &str {
        match self {
            Block::Text(block) => &block.key,
            Block::Object(object) => &object.key,
        }
    }

    pub(crate) fn set_key(&mut self, key: String) {
        match self {
            Block::Text(block) => block.key = key,
            Block::Object(object) => object.key = key,
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            Block::Text(_) => TEXT_BLOCK_TYPE,
            Block::Object(object) => &object.type_name,
        }
    }

    pub fn as_text(&self) -> Option<&TextBlock> {
        match self {
            Block::Text(block) => Some(block),
            Block::Object(_) => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextBlock> {
        match self {
            Block::Text(block) => Some(block),
            Block::Object(_) => None,
        }
    }

    pub fn as_object(&self) -> Option<&BlockObject> {
        match self {
            Block::Object(object) => Some(object),
            Block::Text(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Block::Text(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Block::Object(_))
    }

    /// True for a text block carrying a list item.
    pub fn is_list_block(&self) -> bool {
        self.as_text().is_some_and(|b| b.list_item.is_some())
    }
}

/// A block of inline content.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBlock {
    pub key: String,
    pub style: Option<String>,
    pub list_item: Option<String>,
    pub level: Option<u32>,
    pub children: Vec<Child>,
    pub mark_defs: Vec<MarkDef>,
}

impl TextBlock {
    /// A text block holding a single empty span.
    pub fn empty(
        key: impl Into<String>,
        span_key: impl Into<String>,
        style: Option<String>,
    ) -> Self {
        Self {
            key: key.into(),
            style,
            list_item: None,
            level: None,
            children: vec![Child::Span(Span::new(span_key, ""))],
            mark_defs: Vec::new(),
        }
    }

    /// A text block with one unmarked span.
    pub fn with_text(
        key: impl Into<String>,
        span_key: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            style: None,
            list_item: None,
            level: None,
            children: vec![Child::Span(Span::new(span_key, text))],
            mark_defs: Vec::new(),
        }
    }

    /// Concatenated text of all spans.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(Child::as_span)
            .map(|s| s.text.as_str())
            .collect()
    }

    /// Length of [`Self::text`] in UTF-16 units.
    pub fn text_len(&self) -> usize {
        self.children
            .iter()
            .filter_map(Child::as_span)
            .map(|s| utf16_len(&s.text))
            .sum()
    }

    /// True when the only child is a span with empty text.
    pub fn is_empty(&self) -> bool {
        match self.children.as_slice() {
            [Child::Span(span)] => span.text.is_empty(),
            _ => false,
        }
    }

    pub fn child(&self, key: &str) -> Option<&Child> {
        self.children.iter().find(|c| c.key() == key)
    }

    pub fn child_index(&self, key: &str) -> Option<usize> {
        self.children.iter().position(|c| c.key() == key)
    }

    pub fn mark_def(&self, key: &str) -> Option<&MarkDef> {
        self.mark_defs.iter().find(|m| m.key == key)
    }

    pub fn spans(&self) -> impl Iterator<Item = &Span> {
        self.children.iter().filter_map(Child::as_span)
    }
}

/// An opaque, atomic block.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockObject {
    pub key: String,
    pub type_name: String,
    pub fields: Fields,
}

impl BlockObject {
    pub fn new(key: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            type_name: type_name.into(),
            fields: Fields::new(),
        }
    }

    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_owned(), value.into());
        self
    }
}

/// A node inside a text block.
#[derive(Clone, Debug, PartialEq)]
pub enum Child {
    Span(Span),
    Object(InlineObject),
}

impl Child {
    pub fn key(&self) -> &str {
        match self {
            Child::Span(span) => &span.key,
            Child::Object(object) => &object.key,
        }
    }

    pub(crate) fn set_key(&mut self, key: String) {
        match self {
            Child::Span(span) => span.key = key,
            Child::Object(object) => object.key = key,
        }
    }

    pub fn as_span(&self) -> Option<&Span> {
        match self {
            Child::Span(span) => Some(span),
            Child::Object(_) => None,
        }
    }

    pub fn as_span_mut(&mut self) -> Option<&mut Span> {
        match self {
            Child::Span(span) => Some(span),
            Child::Object(_) => None,
        }
    }

    pub fn is_span(&self) -> bool {
        matches!(self, Child::Span(_))
    }

    /// Number of selection positions the child spans: the text length for
    /// spans, 0 for atomic objects.
    pub fn offset_len(&self) -> usize {
        match self {
            Child::Span(span) => utf16_len(&span.text),
            Child::Object(_) => 0,
        }
    }
}

/// A run of text sharing one set of marks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    pub key: String,
    pub text: String,
    pub marks: Vec<String>,
}

impl Span {
    pub fn new(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
            marks: Vec::new(),
        }
    }

    pub fn with_marks<I, S>(mut self, marks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.marks = marks.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_mark(&self, mark: &str) -> bool {
        self.marks.iter().any(|m| m == mark)
    }
}

/// An opaque, atomic inline node.
#[derive(Clone, Debug, PartialEq)]
pub struct InlineObject {
    pub key: String,
    pub type_name: String,
    pub fields: Fields,
}

/// A block-scoped annotation definition.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkDef {
    pub key: String,
    pub type_name: String,
    pub fields: Fields,
}

/// Whether two mark lists contain the same marks, ignoring order.
pub(crate) fn same_marks(a: &[String], b: &[String]) -> bool {
    a.len() == b.len() && a.iter().all(|m| b.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_block_text_concatenates_spans() {
        let block = TextBlock {
            children: vec![
                Child::Span(Span::new("s1", "foo")),
                Child::Object(InlineObject {
                    key: "i1".into(),
                    type_name: "stock-ticker".into(),
                    fields: Fields::new(),
                }),
                Child::Span(Span::new("s2", "bar")),
            ],
            ..TextBlock::empty("b1", "s0", None)
        };
        assert_eq!(block.text(), "foobar");
        assert_eq!(block.text_len(), 6);
        assert!(!block.is_empty());
    }

    #[test]
    fn empty_block_is_empty() {
        assert!(TextBlock::empty("b1", "s1", None).is_empty());
        assert!(!TextBlock::with_text("b1", "s1", "x").is_empty());
    }

    #[test]
    fn same_marks_ignores_order() {
        let a = vec!["strong".to_owned(), "em".to_owned()];
        let b = vec!["em".to_owned(), "strong".to_owned()];
        assert!(same_marks(&a, &b));
        assert!(!same_marks(&a, &b[..1]));
    }
}
