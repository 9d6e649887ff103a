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

//! Restore document invariants after an action set.
//!
//! Fixes are found one at a time and applied through the engine as ordinary
//! operations, so they land in the same undo step and patch batch as the
//! edit that caused them.

use std::collections::HashSet;

use tracing::{trace, warn};

use super::{BlockProps, EditingEngine, Operation};
use crate::document::{same_marks, Block, Child, KeyGenerator, Span, TextBlock};
use crate::error::EngineError;
use crate::schema::Schema;

/// Upper bound on fixes per pass, in case two rules fight.
const MAX_FIXES: usize = 10_000;

pub(crate) fn normalize(
    engine: &mut dyn EditingEngine,
    schema: &Schema,
    max_list_depth: u32,
    keys: &mut dyn KeyGenerator,
) -> Result<(), EngineError> {
    for _ in 0..MAX_FIXES {
        let Some(fix) = next_fix(engine.value(), schema, max_list_depth, keys)
        else {
            return Ok(());
        };
        trace!(?fix, "normalizing");
        engine.apply(fix)?;
    }
    warn!("normalization did not converge");
    Ok(())
}

fn next_fix(
    value: &[Block],
    schema: &Schema,
    max_list_depth: u32,
    keys: &mut dyn KeyGenerator,
) -> Option<Operation> {
    let mut block_keys = HashSet::new();
    for (index, block) in value.iter().enumerate() {
        if !block_keys.insert(block.key()) || block.key().is_empty() {
            let mut rekeyed = block.clone();
            rekeyed.set_key(keys.next_key());
            return Some(Operation::ReplaceBlock {
                index,
                old: block.clone(),
                new: rekeyed,
            });
        }
        if let Block::Text(text_block) = block {
            if let Some(fix) =
                text_block_fix(text_block, schema, max_list_depth, keys)
            {
                return Some(fix);
            }
        }
    }
    None
}

fn text_block_fix(
    block: &TextBlock,
    schema: &Schema,
    max_list_depth: u32,
    keys: &mut dyn KeyGenerator,
) -> Option<Operation> {
    let key = &block.key;
    if block.children.is_empty() {
        return Some(Operation::InsertChild {
            block: key.clone(),
            index: 0,
            child: Child::Span(Span::new(keys.next_key(), "")),
        });
    }

    let mut child_keys = HashSet::new();
    for (index, child) in block.children.iter().enumerate() {
        if !child_keys.insert(child.key()) || child.key().is_empty() {
            let mut rekeyed = child.clone();
            rekeyed.set_key(keys.next_key());
            return Some(Operation::SetChild {
                block: key.clone(),
                index,
                old: child.clone(),
                new: rekeyed,
            });
        }
    }

    for (index, child) in block.children.iter().enumerate() {
        let Child::Span(span) = child else { continue };
        let mut marks: Vec<String> = Vec::with_capacity(span.marks.len());
        for mark in &span.marks {
            let known =
                schema.has_decorator(mark) || block.mark_def(mark).is_some();
            if known && !marks.contains(mark) {
                marks.push(mark.clone());
            }
        }
        if marks != span.marks {
            return Some(Operation::SetChild {
                block: key.clone(),
                index,
                old: child.clone(),
                new: Child::Span(Span {
                    marks,
                    ..span.clone()
                }),
            });
        }
    }

    for (index, pair) in block.children.windows(2).enumerate() {
        if let [Child::Span(left), Child::Span(right)] = pair {
            if same_marks(&left.marks, &right.marks) {
                return Some(Operation::MergeChild {
                    block: key.clone(),
                    child: left.key.clone(),
                    index,
                    offset: crate::text::utf16_len(&left.text),
                    next_key: right.key.clone(),
                });
            }
        }
    }

    for (index, child) in block.children.iter().enumerate() {
        let Child::Span(span) = child else { continue };
        if !span.text.is_empty() || block.children.len() == 1 {
            continue;
        }
        let beside_span = index
            .checked_sub(1)
            .and_then(|i| block.children.get(i))
            .is_some_and(Child::is_span)
            || block.children.get(index + 1).is_some_and(Child::is_span);
        if beside_span {
            return Some(Operation::RemoveChild {
                block: key.clone(),
                index,
                child: child.clone(),
            });
        }
    }

    let old = BlockProps::of(block);
    let mut new = old.clone();
    let mut seen = HashSet::new();
    new.mark_defs.retain(|def| {
        seen.insert(def.key.clone())
            && block.spans().any(|s| s.has_mark(&def.key))
    });
    if new.list_item.is_some() {
        let level = new.level.unwrap_or(1).clamp(1, max_list_depth.max(1));
        new.level = Some(level);
    }
    if new != old {
        return Some(Operation::SetBlock {
            key: key.clone(),
            old,
            new,
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{IncrementingKeyGenerator, InlineObject, MarkDef};
    use crate::engine::DocumentEngine;

    fn normalized(value: Vec<Block>) -> Vec<Block> {
        let mut engine = DocumentEngine::new(value);
        normalize(
            &mut engine,
            &Schema::default(),
            10,
            &mut IncrementingKeyGenerator::with_prefix("n"),
        )
        .unwrap();
        engine.value().to_vec()
    }

    fn block(children: Vec<Child>) -> TextBlock {
        TextBlock {
            children,
            ..TextBlock::empty("b1", "unused", None)
        }
    }

    #[test]
    fn merges_adjacent_spans_with_same_marks() {
        let value = normalized(vec![Block::Text(block(vec![
            Child::Span(Span::new("s1", "foo").with_marks(["strong"])),
            Child::Span(Span::new("s2", "bar").with_marks(["strong"])),
        ]))]);
        let b = value[0].as_text().unwrap();
        assert_eq!(b.children.len(), 1);
        assert_eq!(b.text(), "foobar");
        assert_eq!(b.children[0].key(), "s1");
    }

    #[test]
    fn inserts_span_into_childless_block() {
        let value = normalized(vec![Block::Text(block(Vec::new()))]);
        assert!(value[0].as_text().unwrap().is_empty());
    }

    #[test]
    fn drops_unused_mark_defs_and_dangling_marks() {
        let mut b = block(vec![Child::Span(
            Span::new("s1", "x").with_marks(["gone", "strong"]),
        )]);
        b.mark_defs.push(MarkDef {
            key: "unused".into(),
            type_name: "link".into(),
            fields: Default::default(),
        });
        let value = normalized(vec![Block::Text(b)]);
        let b = value[0].as_text().unwrap();
        assert!(b.mark_defs.is_empty());
        assert_eq!(b.spans().next().unwrap().marks, vec!["strong"]);
    }

    #[test]
    fn removes_empty_span_next_to_span_but_not_next_to_object() {
        let object = Child::Object(InlineObject {
            key: "o1".into(),
            type_name: "stock-ticker".into(),
            fields: Default::default(),
        });
        let value = normalized(vec![Block::Text(block(vec![
            Child::Span(Span::new("s1", "a").with_marks(["em"])),
            Child::Span(Span::new("s2", "")),
            object,
            Child::Span(Span::new("s3", "")),
        ]))]);
        let keys: Vec<_> = value[0]
            .as_text()
            .unwrap()
            .children
            .iter()
            .map(|c| c.key().to_owned())
            .collect();
        assert_eq!(keys, vec!["s1", "o1", "s3"]);
    }

    #[test]
    fn list_items_get_a_clamped_level() {
        let mut b = TextBlock::with_text("b1", "s1", "item");
        b.list_item = Some("bullet".into());
        let value = normalized(vec![Block::Text(b)]);
        assert_eq!(value[0].as_text().unwrap().level, Some(1));

        let mut deep = TextBlock::with_text("b1", "s1", "item");
        deep.list_item = Some("bullet".into());
        deep.level = Some(42);
        let value = normalized(vec![Block::Text(deep)]);
        assert_eq!(value[0].as_text().unwrap().level, Some(10));
    }

    #[test]
    fn duplicate_block_keys_are_rekeyed() {
        let value = normalized(vec![
            Block::Text(TextBlock::with_text("b1", "s1", "a")),
            Block::Text(TextBlock::with_text("b1", "s1", "b")),
        ]);
        assert_eq!(value[0].key(), "b1");
        assert_eq!(value[1].key(), "n0");
    }
}
