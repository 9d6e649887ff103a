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

//! Key-addressed paths, selection points and block offsets.
//!
//! Paths address nodes by key rather than by index, e.g.
//! `[{"_key": "b1"}, "children", {"_key": "s1"}]`, so they stay valid
//! while unrelated blocks are inserted or removed around them.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::Block;

/// `{"_key": ...}` path segment.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyedSegment {
    #[serde(rename = "_key")]
    pub key: String,
}

/// One step of a [`Path`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(KeyedSegment),
    Index(usize),
    Field(String),
}

impl PathSegment {
    pub fn key(key: impl Into<String>) -> Self {
        PathSegment::Key(KeyedSegment { key: key.into() })
    }

    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathSegment::Key(k) => Some(&k.key),
            _ => None,
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => write!(f, "[_key==\"{}\"]", k.key),
            PathSegment::Index(i) => write!(f, "[{i}]"),
            PathSegment::Field(name) => write!(f, ".{name}"),
        }
    }
}

/// A path into the document value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(pub Vec<PathSegment>);

impl Path {
    /// `[{_key: block}]`
    pub fn block(block: impl Into<String>) -> Self {
        Path(vec![PathSegment::key(block)])
    }

    /// `[{_key: block}, "children", {_key: child}]`
    pub fn child(block: impl Into<String>, child: impl Into<String>) -> Self {
        Path(vec![
            PathSegment::key(block),
            PathSegment::Field("children".to_owned()),
            PathSegment::key(child),
        ])
    }

    /// Append a segment, builder style.
    pub fn with(mut self, segment: PathSegment) -> Self {
        self.0.push(segment);
        self
    }

    pub fn with_field(self, field: &str) -> Self {
        self.with(PathSegment::Field(field.to_owned()))
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Key of the block this path starts at.
    pub fn block_key(&self) -> Option<&str> {
        self.0.first().and_then(PathSegment::as_key)
    }

    /// Key of the child this path addresses, for child paths.
    pub fn child_key(&self) -> Option<&str> {
        match self.0.as_slice() {
            [_, PathSegment::Field(children), child, ..]
                if children == "children" =>
            {
                child.as_key()
            }
            _ => None,
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.0 {
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// A position: a path plus a UTF-16 offset into a span (0 for objects).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EditorSelectionPoint {
    pub path: Path,
    pub offset: usize,
}

impl EditorSelectionPoint {
    pub fn new(path: Path, offset: usize) -> Self {
        Self { path, offset }
    }

    /// Point inside a span.
    pub fn in_child(
        block: impl Into<String>,
        child: impl Into<String>,
        offset: usize,
    ) -> Self {
        Self::new(Path::child(block, child), offset)
    }

    /// Point on a block object.
    pub fn on_block(block: impl Into<String>) -> Self {
        Self::new(Path::block(block), 0)
    }
}

/// Anchor and focus, plus whether focus precedes anchor.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EditorSelection {
    pub anchor: EditorSelectionPoint,
    pub focus: EditorSelectionPoint,
    #[serde(default)]
    pub backward: bool,
}

impl EditorSelection {
    pub fn new(
        anchor: EditorSelectionPoint,
        focus: EditorSelectionPoint,
    ) -> Self {
        Self {
            anchor,
            focus,
            backward: false,
        }
    }

    pub fn collapsed(point: EditorSelectionPoint) -> Self {
        Self::new(point.clone(), point)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// The point earlier in document order, trusting `backward`.
    pub fn start(&self) -> &EditorSelectionPoint {
        if self.backward {
            &self.focus
        } else {
            &self.anchor
        }
    }

    /// The point later in document order, trusting `backward`.
    pub fn end(&self) -> &EditorSelectionPoint {
        if self.backward {
            &self.anchor
        } else {
            &self.focus
        }
    }

    /// Recompute `backward` from document order. Unresolvable points leave
    /// the flag untouched.
    pub fn with_direction(mut self, value: &[Block]) -> Self {
        if let Some(order) = compare_points(value, &self.anchor, &self.focus)
        {
            self.backward = order == Ordering::Greater;
        }
        self
    }
}

/// A character offset across the concatenated span texts of a text block.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockOffset {
    pub path: Path,
    pub offset: usize,
}

impl BlockOffset {
    pub fn new(block: impl Into<String>, offset: usize) -> Self {
        Self {
            path: Path::block(block),
            offset,
        }
    }
}

impl Block {
    /// The first selectable position in the block.
    pub fn start_point(&self) -> EditorSelectionPoint {
        match self.as_text().and_then(|b| b.children.first()) {
            Some(child) => {
                EditorSelectionPoint::in_child(self.key(), child.key(), 0)
            }
            None => EditorSelectionPoint::on_block(self.key()),
        }
    }

    /// The last selectable position in the block.
    pub fn end_point(&self) -> EditorSelectionPoint {
        match self.as_text().and_then(|b| b.children.last()) {
            Some(child) => EditorSelectionPoint::in_child(
                self.key(),
                child.key(),
                child.offset_len(),
            ),
            None => EditorSelectionPoint::on_block(self.key()),
        }
    }
}

// ----------------------------------------------------------------------
// Resolution against a value
// ----------------------------------------------------------------------

/// A point translated to indices in a specific value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ResolvedPoint {
    pub block: usize,
    pub child: Option<usize>,
    pub offset: usize,
}

impl ResolvedPoint {
    fn sort_key(&self) -> (usize, usize, usize) {
        (self.block, self.child.unwrap_or(0), self.offset)
    }
}

pub(crate) fn block_index(value: &[Block], key: &str) -> Option<usize> {
    value.iter().position(|b| b.key() == key)
}

/// Translate a point to indices. `None` when any key is missing.
pub(crate) fn resolve_point(
    value: &[Block],
    point: &EditorSelectionPoint,
) -> Option<ResolvedPoint> {
    let block = block_index(value, point.path.block_key()?)?;
    let child = match point.path.child_key() {
        Some(child_key) => Some(value[block].as_text()?.child_index(child_key)?),
        None => None,
    };
    Some(ResolvedPoint {
        block,
        child,
        offset: point.offset,
    })
}

/// Document order of two points, if both resolve.
pub fn compare_points(
    value: &[Block],
    a: &EditorSelectionPoint,
    b: &EditorSelectionPoint,
) -> Option<Ordering> {
    let a = resolve_point(value, a)?;
    let b = resolve_point(value, b)?;
    Some(a.sort_key().cmp(&b.sort_key()))
}
