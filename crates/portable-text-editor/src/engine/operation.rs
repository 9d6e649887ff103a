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

//! Primitive, invertible document operations.
//!
//! Every edit the executor makes is expressed as a sequence of these. Each
//! operation carries enough data to build its inverse, which is what undo
//! replays, and each is checked against the value before it is applied so a
//! stale operation fails instead of corrupting the document.

use crate::document::{same_marks, Block, Child, MarkDef, Span, TextBlock};
use crate::error::EngineError;
use crate::selection::EditorSelectionPoint;
use crate::text::{self, utf16_len};

/// The mutable properties of a text block.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockProps {
    pub style: Option<String>,
    pub list_item: Option<String>,
    pub level: Option<u32>,
    pub mark_defs: Vec<MarkDef>,
}

impl BlockProps {
    pub fn of(block: &TextBlock) -> Self {
        Self {
            style: block.style.clone(),
            list_item: block.list_item.clone(),
            level: block.level,
            mark_defs: block.mark_defs.clone(),
        }
    }

    fn assign(&self, block: &mut TextBlock) {
        block.style = self.style.clone();
        block.list_item = self.list_item.clone();
        block.level = self.level;
        block.mark_defs = self.mark_defs.clone();
    }
}

/// A primitive edit.
///
/// Block-level operations address blocks by index and carry the key they
/// expect to find there. Child and text operations address by key.
#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    InsertBlock {
        index: usize,
        block: Block,
    },
    RemoveBlock {
        index: usize,
        block: Block,
    },
    MoveBlock {
        from: usize,
        to: usize,
    },
    ReplaceBlock {
        index: usize,
        old: Block,
        new: Block,
    },
    SetBlock {
        key: String,
        old: BlockProps,
        new: BlockProps,
    },
    InsertChild {
        block: String,
        index: usize,
        child: Child,
    },
    RemoveChild {
        block: String,
        index: usize,
        child: Child,
    },
    SetChild {
        block: String,
        index: usize,
        old: Child,
        new: Child,
    },
    InsertText {
        block: String,
        child: String,
        offset: usize,
        text: String,
    },
    RemoveText {
        block: String,
        child: String,
        offset: usize,
        text: String,
    },
    /// Split span `child` (at `index`) at `offset`; the right half becomes
    /// a new span `new_key` at `index + 1` with the same marks.
    SplitChild {
        block: String,
        child: String,
        index: usize,
        offset: usize,
        new_key: String,
    },
    /// Merge span `next_key` into the preceding span `child`, whose length
    /// before the merge is `offset`.
    MergeChild {
        block: String,
        child: String,
        index: usize,
        offset: usize,
        next_key: String,
    },
    /// Move `children[at..]` of block `key` into a new block `new_key`
    /// inserted right after it.
    SplitBlock {
        index: usize,
        key: String,
        at: usize,
        new_key: String,
        props: BlockProps,
    },
    /// Append the children of `next_key` (at `index + 1`) to block `key`,
    /// which has `at` children before the merge, and remove `next_key`.
    MergeBlock {
        index: usize,
        key: String,
        at: usize,
        next_key: String,
        props: BlockProps,
    },
}

impl Operation {
    /// The operation that undoes this one.
    pub fn inverse(&self) -> Operation {
        use Operation::*;
        match self.clone() {
            InsertBlock { index, block } => RemoveBlock { index, block },
            RemoveBlock { index, block } => InsertBlock { index, block },
            MoveBlock { from, to } => MoveBlock { from: to, to: from },
            ReplaceBlock { index, old, new } => ReplaceBlock {
                index,
                old: new,
                new: old,
            },
            SetBlock { key, old, new } => SetBlock {
                key,
                old: new,
                new: old,
            },
            InsertChild {
                block,
                index,
                child,
            } => RemoveChild {
                block,
                index,
                child,
            },
            RemoveChild {
                block,
                index,
                child,
            } => InsertChild {
                block,
                index,
                child,
            },
            SetChild {
                block,
                index,
                old,
                new,
            } => SetChild {
                block,
                index,
                old: new,
                new: old,
            },
            InsertText {
                block,
                child,
                offset,
                text,
            } => RemoveText {
                block,
                child,
                offset,
                text,
            },
            RemoveText {
                block,
                child,
                offset,
                text,
            } => InsertText {
                block,
                child,
                offset,
                text,
            },
            SplitChild {
                block,
                child,
                index,
                offset,
                new_key,
            } => MergeChild {
                block,
                child,
                index,
                offset,
                next_key: new_key,
            },
            MergeChild {
                block,
                child,
                index,
                offset,
                next_key,
            } => SplitChild {
                block,
                child,
                index,
                offset,
                new_key: next_key,
            },
            SplitBlock {
                index,
                key,
                at,
                new_key,
                props,
            } => MergeBlock {
                index,
                key,
                at,
                next_key: new_key,
                props,
            },
            MergeBlock {
                index,
                key,
                at,
                next_key,
                props,
            } => SplitBlock {
                index,
                key,
                at,
                new_key: next_key,
                props,
            },
        }
    }

    /// Apply to `value`, leaving it untouched on error.
    pub fn apply(&self, value: &mut Vec<Block>) -> Result<(), EngineError> {
        match self {
            Operation::InsertBlock { index, block } => {
                check_insert_index(*index, value.len())?;
                value.insert(*index, block.clone());
            }
            Operation::RemoveBlock { index, block } => {
                expect_block_at(value, *index, block.key())?;
                value.remove(*index);
            }
            Operation::MoveBlock { from, to } => {
                check_index(*from, value.len())?;
                check_index(*to, value.len())?;
                let block = value.remove(*from);
                value.insert(*to, block);
            }
            Operation::ReplaceBlock { index, old, new } => {
                expect_block_at(value, *index, old.key())?;
                value[*index] = new.clone();
            }
            Operation::SetBlock { key, new, .. } => {
                new.assign(text_block_mut(value, key)?);
            }
            Operation::InsertChild {
                block,
                index,
                child,
            } => {
                let block = text_block_mut(value, block)?;
                check_insert_index(*index, block.children.len())?;
                block.children.insert(*index, child.clone());
            }
            Operation::RemoveChild {
                block,
                index,
                child,
            } => {
                let block_key = block;
                let block = text_block_mut(value, block_key)?;
                expect_child_at(block, block_key, *index, child.key())?;
                block.children.remove(*index);
            }
            Operation::SetChild {
                block,
                index,
                old,
                new,
            } => {
                let block_key = block;
                let block = text_block_mut(value, block_key)?;
                expect_child_at(block, block_key, *index, old.key())?;
                block.children[*index] = new.clone();
            }
            Operation::InsertText {
                block,
                child,
                offset,
                text,
            } => {
                let span = span_mut(value, block, child)?;
                check_offset(span, *offset)?;
                let at = text::byte_index(&span.text, *offset);
                span.text.insert_str(at, text);
            }
            Operation::RemoveText {
                block,
                child,
                offset,
                text,
            } => {
                let span = span_mut(value, block, child)?;
                let end = offset + utf16_len(text);
                check_offset(span, end)?;
                if text::slice(&span.text, *offset, end) != text {
                    return Err(EngineError::TextMismatch {
                        child: child.clone(),
                        offset: *offset,
                    });
                }
                let start = text::byte_index(&span.text, *offset);
                let end = text::byte_index(&span.text, end);
                span.text.replace_range(start..end, "");
            }
            Operation::SplitChild {
                block,
                child,
                index,
                offset,
                new_key,
            } => {
                let block_key = block;
                let block = text_block_mut(value, block_key)?;
                expect_child_at(block, block_key, *index, child)?;
                let span = as_span_mut(block, block_key, *index)?;
                check_offset(span, *offset)?;
                let at = text::byte_index(&span.text, *offset);
                let right = Span {
                    key: new_key.clone(),
                    text: span.text.split_off(at),
                    marks: span.marks.clone(),
                };
                block.children.insert(index + 1, Child::Span(right));
            }
            Operation::MergeChild {
                block,
                child,
                index,
                offset,
                next_key,
            } => {
                let block_key = block;
                let block = text_block_mut(value, block_key)?;
                expect_child_at(block, block_key, *index, child)?;
                expect_child_at(block, block_key, index + 1, next_key)?;
                let next = match &block.children[index + 1] {
                    Child::Span(span) => span.clone(),
                    Child::Object(_) => {
                        return Err(EngineError::NotASpan {
                            block: block_key.clone(),
                            child: next_key.clone(),
                        })
                    }
                };
                let span = as_span_mut(block, block_key, *index)?;
                if utf16_len(&span.text) != *offset
                    || !same_marks(&span.marks, &next.marks)
                {
                    return Err(EngineError::Stale(child.clone()));
                }
                span.text.push_str(&next.text);
                block.children.remove(index + 1);
            }
            Operation::SplitBlock {
                index,
                key,
                at,
                new_key,
                props,
            } => {
                expect_block_at(value, *index, key)?;
                let block = text_block_mut(value, key)?;
                check_insert_index(*at, block.children.len())?;
                let mut right = TextBlock {
                    key: new_key.clone(),
                    style: None,
                    list_item: None,
                    level: None,
                    children: block.children.split_off(*at),
                    mark_defs: Vec::new(),
                };
                props.assign(&mut right);
                value.insert(index + 1, Block::Text(right));
            }
            Operation::MergeBlock {
                index,
                key,
                at,
                next_key,
                props,
            } => {
                expect_block_at(value, *index, key)?;
                expect_block_at(value, index + 1, next_key)?;
                let next = value[index + 1]
                    .as_text()
                    .ok_or_else(|| EngineError::NotATextBlock(next_key.clone()))?;
                if BlockProps::of(next) != *props {
                    return Err(EngineError::Stale(next_key.clone()));
                }
                let children = next.children.clone();
                let block = text_block_mut(value, key)?;
                if block.children.len() != *at {
                    return Err(EngineError::Stale(key.clone()));
                }
                block.children.extend(children);
                value.remove(index + 1);
            }
        }
        Ok(())
    }

    /// Where `point` ends up once this operation is applied to `before`.
    ///
    /// `None` when the document no longer has anywhere to put it.
    pub(crate) fn transform_point(
        &self,
        before: &[Block],
        point: &EditorSelectionPoint,
    ) -> Option<EditorSelectionPoint> {
        let block_key = point.path.block_key()?;
        let child_key = point.path.child_key();
        let mut point = point.clone();
        match self {
            Operation::RemoveBlock { index, block } if block.key() == block_key => {
                return index
                    .checked_sub(1)
                    .and_then(|i| before.get(i))
                    .map(Block::end_point)
                    .or_else(|| before.get(index + 1).map(Block::start_point));
            }
            Operation::ReplaceBlock { old, new, .. } if old.key() == block_key => {
                let kept = child_key.zip(new.as_text()).and_then(|(c, b)| {
                    b.child(c).map(|child| {
                        EditorSelectionPoint::in_child(
                            b.key.clone(),
                            c,
                            point.offset.min(child.offset_len()),
                        )
                    })
                });
                return Some(kept.unwrap_or_else(|| new.start_point()));
            }
            Operation::RemoveChild {
                block,
                index,
                child,
            } if block == block_key && Some(child.key()) == child_key => {
                let children = before
                    .iter()
                    .find(|b| b.key() == block_key)
                    .and_then(Block::as_text)
                    .map(|b| b.children.as_slice())
                    .unwrap_or_default();
                let fallback = match index.checked_sub(1).and_then(|i| children.get(i)) {
                    Some(prev) => EditorSelectionPoint::in_child(
                        block.clone(),
                        prev.key(),
                        prev.offset_len(),
                    ),
                    None => match children.get(index + 1) {
                        Some(next) => {
                            EditorSelectionPoint::in_child(block.clone(), next.key(), 0)
                        }
                        None => EditorSelectionPoint::on_block(block.clone()),
                    },
                };
                return Some(fallback);
            }
            Operation::SetChild {
                block, old, new, ..
            } if block == block_key && Some(old.key()) == child_key => {
                point = EditorSelectionPoint::in_child(
                    block.clone(),
                    new.key(),
                    point.offset.min(new.offset_len()),
                );
            }
            Operation::InsertText {
                block,
                child,
                offset,
                text,
            } if block == block_key && Some(child.as_str()) == child_key => {
                if point.offset >= *offset {
                    point.offset += utf16_len(text);
                }
            }
            Operation::RemoveText {
                block,
                child,
                offset,
                text,
            } if block == block_key && Some(child.as_str()) == child_key => {
                if point.offset > *offset {
                    point.offset =
                        point.offset.saturating_sub(utf16_len(text)).max(*offset);
                }
            }
            Operation::SplitChild {
                block,
                child,
                offset,
                new_key,
                ..
            } if block == block_key
                && Some(child.as_str()) == child_key
                && point.offset > *offset =>
            {
                point = EditorSelectionPoint::in_child(
                    block.clone(),
                    new_key.clone(),
                    point.offset - offset,
                );
            }
            Operation::MergeChild {
                block,
                child,
                offset,
                next_key,
                ..
            } if block == block_key && Some(next_key.as_str()) == child_key => {
                point = EditorSelectionPoint::in_child(
                    block.clone(),
                    child.clone(),
                    point.offset + offset,
                );
            }
            Operation::SplitBlock {
                index,
                key,
                at,
                new_key,
                ..
            } if key == block_key => {
                let moved = child_key
                    .and_then(|c| before.get(*index)?.as_text()?.child_index(c))
                    .is_some_and(|i| i >= *at);
                if moved {
                    let child = child_key.unwrap_or_default();
                    point = EditorSelectionPoint::in_child(
                        new_key.clone(),
                        child,
                        point.offset,
                    );
                }
            }
            Operation::MergeBlock { key, next_key, .. } if next_key == block_key => {
                point = match child_key {
                    Some(child) => EditorSelectionPoint::in_child(
                        key.clone(),
                        child,
                        point.offset,
                    ),
                    None => {
                        let first = before
                            .iter()
                            .find(|b| b.key() == next_key)
                            .map(Block::start_point);
                        match first.and_then(|p| p.path.child_key().map(str::to_owned)) {
                            Some(child) => {
                                EditorSelectionPoint::in_child(key.clone(), child, 0)
                            }
                            None => EditorSelectionPoint::on_block(key.clone()),
                        }
                    }
                };
            }
            _ => {}
        }
        Some(point)
    }
}

// ----------------------------------------------------------------------
// Lookup helpers
// ----------------------------------------------------------------------

fn check_index(index: usize, len: usize) -> Result<(), EngineError> {
    if index < len {
        Ok(())
    } else {
        Err(EngineError::IndexOutOfBounds { index, len })
    }
}

fn check_insert_index(index: usize, len: usize) -> Result<(), EngineError> {
    if index <= len {
        Ok(())
    } else {
        Err(EngineError::IndexOutOfBounds { index, len })
    }
}

fn check_offset(span: &Span, offset: usize) -> Result<(), EngineError> {
    let len = utf16_len(&span.text);
    if offset <= len {
        Ok(())
    } else {
        Err(EngineError::OffsetOutOfBounds {
            child: span.key.clone(),
            offset,
            len,
        })
    }
}

fn expect_block_at(
    value: &[Block],
    index: usize,
    key: &str,
) -> Result<(), EngineError> {
    check_index(index, value.len())?;
    if value[index].key() == key {
        Ok(())
    } else {
        Err(EngineError::BlockNotFound(key.to_owned()))
    }
}

fn expect_child_at(
    block: &TextBlock,
    block_key: &str,
    index: usize,
    key: &str,
) -> Result<(), EngineError> {
    match block.children.get(index) {
        Some(child) if child.key() == key => Ok(()),
        _ => Err(EngineError::ChildNotFound {
            block: block_key.to_owned(),
            child: key.to_owned(),
        }),
    }
}

fn text_block_mut<'a>(
    value: &'a mut [Block],
    key: &str,
) -> Result<&'a mut TextBlock, EngineError> {
    value
        .iter_mut()
        .find(|b| b.key() == key)
        .ok_or_else(|| EngineError::BlockNotFound(key.to_owned()))?
        .as_text_mut()
        .ok_or_else(|| EngineError::NotATextBlock(key.to_owned()))
}

fn as_span_mut<'a>(
    block: &'a mut TextBlock,
    block_key: &str,
    index: usize,
) -> Result<&'a mut Span, EngineError> {
    let key = block.children[index].key().to_owned();
    block.children[index]
        .as_span_mut()
        .ok_or_else(|| EngineError::NotASpan {
            block: block_key.to_owned(),
            child: key,
        })
}

fn span_mut<'a>(
    value: &'a mut [Block],
    block_key: &str,
    child_key: &str,
) -> Result<&'a mut Span, EngineError> {
    let block = text_block_mut(value, block_key)?;
    let index = block.child_index(child_key).ok_or_else(|| {
        EngineError::ChildNotFound {
            block: block_key.to_owned(),
            child: child_key.to_owned(),
        }
    })?;
    as_span_mut(block, block_key, index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value() -> Vec<Block> {
        vec![
            Block::Text(TextBlock::with_text("b1", "s1", "foobar")),
            Block::Text(TextBlock::with_text("b2", "s2", "baz")),
        ]
    }

    fn text_of(value: &[Block], index: usize) -> String {
        value[index].as_text().unwrap().text()
    }

    fn round_trip(op: Operation) -> Vec<Block> {
        let original = value();
        let mut v = original.clone();
        op.apply(&mut v).unwrap();
        assert_ne!(v, original);
        op.inverse().apply(&mut v).unwrap();
        assert_eq!(v, original);
        v
    }

    #[test]
    fn insert_and_remove_text() {
        let mut v = value();
        Operation::InsertText {
            block: "b1".into(),
            child: "s1".into(),
            offset: 3,
            text: "-".into(),
        }
        .apply(&mut v)
        .unwrap();
        assert_eq!(text_of(&v, 0), "foo-bar");
    }

    #[test]
    fn remove_text_checks_content() {
        let mut v = value();
        let err = Operation::RemoveText {
            block: "b1".into(),
            child: "s1".into(),
            offset: 0,
            text: "bar".into(),
        }
        .apply(&mut v)
        .unwrap_err();
        assert!(matches!(err, EngineError::TextMismatch { .. }));
        assert_eq!(v, value());
    }

    #[test]
    fn split_block_moves_children() {
        let mut v = value();
        Operation::SplitChild {
            block: "b1".into(),
            child: "s1".into(),
            index: 0,
            offset: 3,
            new_key: "s3".into(),
        }
        .apply(&mut v)
        .unwrap();
        Operation::SplitBlock {
            index: 0,
            key: "b1".into(),
            at: 1,
            new_key: "b3".into(),
            props: BlockProps::default(),
        }
        .apply(&mut v)
        .unwrap();
        assert_eq!(text_of(&v, 0), "foo");
        assert_eq!(text_of(&v, 1), "bar");
        assert_eq!(v[1].key(), "b3");
    }

    #[test]
    fn operations_invert() {
        round_trip(Operation::MoveBlock { from: 0, to: 1 });
        round_trip(Operation::RemoveBlock {
            index: 1,
            block: value()[1].clone(),
        });
        round_trip(Operation::SplitChild {
            block: "b1".into(),
            child: "s1".into(),
            index: 0,
            offset: 2,
            new_key: "x".into(),
        });
        round_trip(Operation::SetBlock {
            key: "b2".into(),
            old: BlockProps::default(),
            new: BlockProps {
                style: Some("h1".into()),
                ..BlockProps::default()
            },
        });
    }

    #[test]
    fn points_follow_split_child() {
        let v = value();
        let op = Operation::SplitChild {
            block: "b1".into(),
            child: "s1".into(),
            index: 0,
            offset: 3,
            new_key: "s3".into(),
        };
        let moved = op
            .transform_point(&v, &EditorSelectionPoint::in_child("b1", "s1", 5))
            .unwrap();
        assert_eq!(moved, EditorSelectionPoint::in_child("b1", "s3", 2));
        let kept = op
            .transform_point(&v, &EditorSelectionPoint::in_child("b1", "s1", 3))
            .unwrap();
        assert_eq!(kept, EditorSelectionPoint::in_child("b1", "s1", 3));
    }

    #[test]
    fn points_in_removed_block_move_to_neighbour() {
        let v = value();
        let op = Operation::RemoveBlock {
            index: 1,
            block: v[1].clone(),
        };
        let moved = op
            .transform_point(&v, &EditorSelectionPoint::in_child("b2", "s2", 1))
            .unwrap();
        assert_eq!(moved, EditorSelectionPoint::in_child("b1", "s1", 6));
    }
}
