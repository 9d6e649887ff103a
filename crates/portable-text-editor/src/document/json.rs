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

//! Conversion between the document model and Portable Text JSON.
//!
//! Parsing is shape-strict but invariant-lenient: a missing `_key` parses
//! as an empty key and a missing `children` as an empty list. Invariant
//! repair is the job of [`super::validate_value`].

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};

use super::{
    Block, BlockObject, Child, Fields, InlineObject, MarkDef, Span, TextBlock,
    SPAN_TYPE, TEXT_BLOCK_TYPE,
};
use crate::error::ValueError;

const KEY: &str = "_key";
const TYPE: &str = "_type";

fn expect_object<'a>(
    value: &'a Value,
    path: &str,
    expected: &'static str,
) -> Result<&'a Map<String, Value>, ValueError> {
    value.as_object().ok_or_else(|| ValueError::UnexpectedShape {
        path: path.to_owned(),
        expected,
    })
}

fn optional_string(
    map: &Map<String, Value>,
    field: &str,
    path: &str,
) -> Result<Option<String>, ValueError> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValueError::UnexpectedShape {
            path: format!("{path}.{field}"),
            expected: "a string",
        }),
    }
}

fn key_of(map: &Map<String, Value>, path: &str) -> Result<String, ValueError> {
    Ok(optional_string(map, KEY, path)?.unwrap_or_default())
}

fn rest_fields(map: &Map<String, Value>, skip: &[&str]) -> Fields {
    map.iter()
        .filter(|(k, _)| !skip.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn array_of<'a>(
    map: &'a Map<String, Value>,
    field: &str,
    path: &str,
) -> Result<&'a [Value], ValueError> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(ValueError::UnexpectedShape {
            path: format!("{path}.{field}"),
            expected: "an array",
        }),
    }
}

// ----------------------------------------------------------------------
// Parsing
// ----------------------------------------------------------------------

/// Parse a whole Portable Text value.
pub fn value_from_json(value: &Value) -> Result<Vec<Block>, ValueError> {
    let items = value.as_array().ok_or_else(|| ValueError::UnexpectedShape {
        path: String::new(),
        expected: "an array of blocks",
    })?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| parse_block(item, &format!("[{i}]")))
        .collect()
}

/// Serialize a whole Portable Text value.
pub fn value_to_json(blocks: &[Block]) -> Value {
    Value::Array(blocks.iter().map(Block::to_json).collect())
}

fn parse_block(value: &Value, path: &str) -> Result<Block, ValueError> {
    let map = expect_object(value, path, "a block object")?;
    let type_name = optional_string(map, TYPE, path)?.ok_or_else(|| {
        ValueError::MissingField {
            path: path.to_owned(),
            field: TYPE,
        }
    })?;
    let key = key_of(map, path)?;

    if type_name != TEXT_BLOCK_TYPE {
        return Ok(Block::Object(BlockObject {
            key,
            type_name,
            fields: rest_fields(map, &[KEY, TYPE]),
        }));
    }

    let children = array_of(map, "children", path)?
        .iter()
        .enumerate()
        .map(|(i, c)| parse_child(c, &format!("{path}.children[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;
    let mark_defs = array_of(map, "markDefs", path)?
        .iter()
        .enumerate()
        .map(|(i, m)| parse_mark_def(m, &format!("{path}.markDefs[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;
    let level = match map.get("level") {
        None | Some(Value::Null) => None,
        Some(v) => Some(
            v.as_u64()
                .and_then(|l| u32::try_from(l).ok())
                .ok_or_else(|| ValueError::UnexpectedShape {
                    path: format!("{path}.level"),
                    expected: "a positive integer",
                })?,
        ),
    };

    Ok(Block::Text(TextBlock {
        key,
        style: optional_string(map, "style", path)?,
        list_item: optional_string(map, "listItem", path)?,
        level,
        children,
        mark_defs,
    }))
}

fn parse_child(value: &Value, path: &str) -> Result<Child, ValueError> {
    let map = expect_object(value, path, "a child object")?;
    let key = key_of(map, path)?;
    let type_name = optional_string(map, TYPE, path)?;
    let is_span = match type_name.as_deref() {
        Some(SPAN_TYPE) => true,
        Some(_) => false,
        None if map.contains_key("text") => true,
        None => {
            return Err(ValueError::MissingField {
                path: path.to_owned(),
                field: TYPE,
            })
        }
    };
    if !is_span {
        return Ok(Child::Object(InlineObject {
            key,
            type_name: type_name.unwrap_or_default(),
            fields: rest_fields(map, &[KEY, TYPE]),
        }));
    }

    let marks = array_of(map, "marks", path)?
        .iter()
        .map(|m| {
            m.as_str().map(str::to_owned).ok_or_else(|| {
                ValueError::UnexpectedShape {
                    path: format!("{path}.marks"),
                    expected: "an array of strings",
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Child::Span(Span {
        key,
        text: optional_string(map, "text", path)?.unwrap_or_default(),
        marks,
    }))
}

fn parse_mark_def(value: &Value, path: &str) -> Result<MarkDef, ValueError> {
    let map = expect_object(value, path, "a mark definition")?;
    let key = optional_string(map, KEY, path)?.ok_or_else(|| {
        ValueError::MissingField {
            path: path.to_owned(),
            field: KEY,
        }
    })?;
    let type_name = optional_string(map, TYPE, path)?.ok_or_else(|| {
        ValueError::MissingField {
            path: path.to_owned(),
            field: TYPE,
        }
    })?;
    Ok(MarkDef {
        key,
        type_name,
        fields: rest_fields(map, &[KEY, TYPE]),
    })
}

// ----------------------------------------------------------------------
// Serializing
// ----------------------------------------------------------------------

fn object_json(key: &str, type_name: &str, fields: &Fields) -> Value {
    let mut map = fields.clone();
    map.insert(KEY.to_owned(), Value::String(key.to_owned()));
    map.insert(TYPE.to_owned(), Value::String(type_name.to_owned()));
    Value::Object(map)
}

impl Block {
    pub fn from_json(value: &Value) -> Result<Self, ValueError> {
        parse_block(value, "")
    }

    pub fn to_json(&self) -> Value {
        match self {
            Block::Text(block) => block.to_json(),
            Block::Object(object) => {
                object_json(&object.key, &object.type_name, &object.fields)
            }
        }
    }
}

impl TextBlock {
    pub fn to_json(&self) -> Value {
        let children: Vec<Value> =
            self.children.iter().map(Child::to_json).collect();
        let mark_defs: Vec<Value> =
            self.mark_defs.iter().map(MarkDef::to_json).collect();
        let mut value = json!({
            KEY: self.key,
            TYPE: TEXT_BLOCK_TYPE,
            "children": children,
            "markDefs": mark_defs,
        });
        if let Some(map) = value.as_object_mut() {
            if let Some(style) = &self.style {
                map.insert("style".to_owned(), json!(style));
            }
            if let Some(list_item) = &self.list_item {
                map.insert("listItem".to_owned(), json!(list_item));
            }
            if let Some(level) = self.level {
                map.insert("level".to_owned(), json!(level));
            }
        }
        value
    }
}

impl Child {
    pub fn from_json(value: &Value) -> Result<Self, ValueError> {
        parse_child(value, "")
    }

    pub fn to_json(&self) -> Value {
        match self {
            Child::Span(span) => json!({
                KEY: span.key,
                TYPE: SPAN_TYPE,
                "text": span.text,
                "marks": span.marks,
            }),
            Child::Object(object) => {
                object_json(&object.key, &object.type_name, &object.fields)
            }
        }
    }
}

impl MarkDef {
    pub fn from_json(value: &Value) -> Result<Self, ValueError> {
        parse_mark_def(value, "")
    }

    pub fn to_json(&self) -> Value {
        object_json(&self.key, &self.type_name, &self.fields)
    }
}

macro_rules! serde_via_json {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(
                &self,
                serializer: S,
            ) -> Result<S::Ok, S::Error> {
                self.to_json().serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(
                deserializer: D,
            ) -> Result<Self, D::Error> {
                let value = Value::deserialize(deserializer)?;
                <$ty>::from_json(&value).map_err(de::Error::custom)
            }
        }
    };
}

serde_via_json!(Block);
serde_via_json!(Child);
serde_via_json!(MarkDef);

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_text_block_with_annotation() {
        let value: Value = serde_json::from_str(indoc! {r#"
            [{
                "_key": "b1",
                "_type": "block",
                "style": "normal",
                "children": [
                    {"_key": "s1", "_type": "span", "text": "hi ", "marks": []},
                    {"_key": "s2", "_type": "span", "text": "there", "marks": ["l1", "strong"]}
                ],
                "markDefs": [{"_key": "l1", "_type": "link", "href": "https://x"}]
            }]
        "#})
        .unwrap();
        let blocks = value_from_json(&value).unwrap();
        let block = blocks[0].as_text().unwrap();
        assert_eq!(block.text(), "hi there");
        assert_eq!(block.style.as_deref(), Some("normal"));
        assert_eq!(block.mark_defs[0].fields["href"], json!("https://x"));
        assert_eq!(value_to_json(&blocks), value);
    }

    #[test]
    fn parses_block_objects_and_inline_objects() {
        let block = Block::from_json(&json!({
            "_key": "img",
            "_type": "image",
            "src": "a.png"
        }))
        .unwrap();
        assert_eq!(block.type_name(), "image");
        assert_eq!(block.as_object().unwrap().fields["src"], json!("a.png"));

        let child = Child::from_json(&json!({
            "_key": "t",
            "_type": "stock-ticker",
            "symbol": "AAPL"
        }))
        .unwrap();
        assert!(!child.is_span());
    }

    #[test]
    fn missing_key_parses_as_empty_key() {
        let block = Block::from_json(&json!({"_type": "block"})).unwrap();
        assert_eq!(block.key(), "");
        assert!(block.as_text().unwrap().children.is_empty());
    }

    #[test]
    fn reports_shape_errors_with_path() {
        let err = value_from_json(&json!([{"_type": "block", "children": 3}]))
            .unwrap_err();
        assert_eq!(
            err,
            ValueError::UnexpectedShape {
                path: "[0].children".to_owned(),
                expected: "an array"
            }
        );
        assert!(matches!(
            value_from_json(&json!({})),
            Err(ValueError::UnexpectedShape { .. })
        ));
    }
}
