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

//! The schema collaborator: which styles, decorators, lists, annotations and
//! object types a document may use.
//!
//! Behaviors consult the schema before acting on a detected construct, e.g.
//! the markdown heading rule only fires for `h2` when `h2` is declared.

use serde::{Deserialize, Serialize};

/// A named entry in one of the schema lists (styles, decorators, lists).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl NamedDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: None,
        }
    }
}

/// A single field on an annotation or object type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// An annotation, block object or inline object type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDefinition {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl TypeDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(
        mut self,
        name: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        self.fields.push(FieldDefinition {
            name: name.into(),
            type_name: type_name.into(),
        });
        self
    }
}

/// The set of names a document is allowed to use.
///
/// The first style is the default style given to new text blocks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Schema {
    pub styles: Vec<NamedDefinition>,
    pub decorators: Vec<NamedDefinition>,
    pub lists: Vec<NamedDefinition>,
    pub annotations: Vec<TypeDefinition>,
    pub block_objects: Vec<TypeDefinition>,
    pub inline_objects: Vec<TypeDefinition>,
}

impl Default for Schema {
    fn default() -> Self {
        let named = |names: &[&str]| {
            names.iter().copied().map(NamedDefinition::new).collect()
        };
        Self {
            styles: named(&[
                "normal",
                "h1",
                "h2",
                "h3",
                "h4",
                "h5",
                "h6",
                "blockquote",
            ]),
            decorators: named(&[
                "strong",
                "em",
                "code",
                "underline",
                "strike-through",
            ]),
            lists: named(&["bullet", "number"]),
            annotations: vec![TypeDefinition::new("link")
                .with_field("href", "string")],
            block_objects: vec![
                TypeDefinition::new("image").with_field("src", "string"),
                TypeDefinition::new("break").with_field("style", "string"),
            ],
            inline_objects: vec![
                TypeDefinition::new("stock-ticker")
                    .with_field("symbol", "string"),
            ],
        }
    }
}

impl Schema {
    /// A schema with no definitions at all. Useful as a builder seed.
    pub fn empty() -> Self {
        Self {
            styles: Vec::new(),
            decorators: Vec::new(),
            lists: Vec::new(),
            annotations: Vec::new(),
            block_objects: Vec::new(),
            inline_objects: Vec::new(),
        }
    }

    /// Style given to text blocks that don't specify one.
    pub fn default_style(&self) -> Option<&str> {
        self.styles.first().map(|s| s.name.as_str())
    }

    pub fn has_style(&self, name: &str) -> bool {
        self.styles.iter().any(|s| s.name == name)
    }

    pub fn has_decorator(&self, name: &str) -> bool {
        self.decorators.iter().any(|d| d.name == name)
    }

    pub fn has_list(&self, name: &str) -> bool {
        self.lists.iter().any(|l| l.name == name)
    }

    pub fn annotation(&self, name: &str) -> Option<&TypeDefinition> {
        self.annotations.iter().find(|a| a.name == name)
    }

    pub fn block_object(&self, name: &str) -> Option<&TypeDefinition> {
        self.block_objects.iter().find(|b| b.name == name)
    }

    pub fn inline_object(&self, name: &str) -> Option<&TypeDefinition> {
        self.inline_objects.iter().find(|i| i.name == name)
    }

    /// Decorator names in schema order.
    pub fn decorator_names(&self) -> impl Iterator<Item = &str> {
        self.decorators.iter().map(|d| d.name.as_str())
    }
}
