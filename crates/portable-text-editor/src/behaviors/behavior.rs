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

//! Declarative behaviors: `on` + optional guard + ordered action sets.
//!
//! ```
//! use portable_text_editor::behaviors::{execute, Behavior, SyntheticEvent};
//! use portable_text_editor::selectors::get_focus_text_block;
//!
//! // Typing "x" in an h1 inserts "y" instead.
//! let behavior = Behavior::on("insert.text")
//!     .guard(|snapshot, event| {
//!         let block = get_focus_text_block(snapshot)?;
//!         (event.inserted_text() == Some("x") && block.style.as_deref() == Some("h1"))
//!             .then(|| block.key.clone())
//!     })
//!     .actions(|_, _, _block_key| {
//!         vec![execute(SyntheticEvent::InsertText { text: "y".into() })]
//!     })
//!     .build();
//! assert!(behavior.listens_on("insert.text"));
//! ```
//!
//! The guard's return type is the action sets' parameter type, so an action
//! set can only ever see data its guard produced.

use super::action::BehaviorAction;
use super::event::{BehaviorEvent, EventMatcher};
use crate::snapshot::EditorSnapshot;

type GuardFn<R> = dyn Fn(&EditorSnapshot, &BehaviorEvent) -> Option<R>;
type ActionSetFn<R> =
    dyn Fn(&EditorSnapshot, &BehaviorEvent, &R) -> Vec<BehaviorAction>;

/// An immutable rule. Build one with [`Behavior::on`].
pub struct Behavior {
    name: Option<String>,
    on: EventMatcher,
    rule: Box<dyn Rule>,
}

/// Start building a behavior. Same as [`Behavior::on`].
pub fn define_behavior(on: impl Into<EventMatcher>) -> BehaviorBuilder<()> {
    Behavior::on(on)
}

impl Behavior {
    pub fn on(on: impl Into<EventMatcher>) -> BehaviorBuilder<()> {
        BehaviorBuilder {
            name: None,
            on: on.into(),
            guard: Box::new(|_: &EditorSnapshot, _: &BehaviorEvent| Some(())),
            action_sets: Vec::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn matcher(&self) -> &EventMatcher {
        &self.on
    }

    pub fn listens_on(&self, event_type: &str) -> bool {
        self.on.matches(event_type)
    }

    /// Run the guard. `None` means the behavior does not fire.
    pub fn evaluate(
        &self,
        snapshot: &EditorSnapshot,
        event: &BehaviorEvent,
    ) -> Option<MatchedBehavior<'_>> {
        let inner = self.rule.evaluate(snapshot, event)?;
        Some(MatchedBehavior {
            behavior: self,
            inner,
        })
    }

    /// Evaluate the guard and every action set against one snapshot.
    pub fn run(
        &self,
        snapshot: &EditorSnapshot,
        event: &BehaviorEvent,
    ) -> Option<Vec<Vec<BehaviorAction>>> {
        let matched = self.evaluate(snapshot, event)?;
        Some(
            (0..matched.action_set_count())
                .map(|i| matched.action_set(i, snapshot, event))
                .collect(),
        )
    }
}

impl std::fmt::Debug for Behavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Behavior")
            .field("name", &self.name)
            .field("on", &self.on)
            .finish_non_exhaustive()
    }
}

/// A behavior whose guard matched, holding the guard response.
pub struct MatchedBehavior<'a> {
    behavior: &'a Behavior,
    inner: Box<dyn MatchedRule + 'a>,
}

impl MatchedBehavior<'_> {
    pub fn behavior(&self) -> &Behavior {
        self.behavior
    }

    pub fn action_set_count(&self) -> usize {
        self.inner.action_set_count()
    }

    /// Evaluate action set `index` against `snapshot`. Out of range yields
    /// an empty set.
    pub fn action_set(
        &self,
        index: usize,
        snapshot: &EditorSnapshot,
        event: &BehaviorEvent,
    ) -> Vec<BehaviorAction> {
        self.inner.action_set(index, snapshot, event)
    }
}

pub struct BehaviorBuilder<R> {
    name: Option<String>,
    on: EventMatcher,
    guard: Box<GuardFn<R>>,
    action_sets: Vec<Box<ActionSetFn<R>>>,
}

impl BehaviorBuilder<()> {
    /// Only fire when `guard` returns `Some`. The response is handed to
    /// every action set.
    pub fn guard<R: 'static>(
        self,
        guard: impl Fn(&EditorSnapshot, &BehaviorEvent) -> Option<R> + 'static,
    ) -> BehaviorBuilder<R> {
        let action_sets = self
            .action_sets
            .into_iter()
            .map(|set| {
                Box::new(move |s: &EditorSnapshot, e: &BehaviorEvent, _: &R| set(s, e, &()))
                    as Box<ActionSetFn<R>>
            })
            .collect();
        BehaviorBuilder {
            name: self.name,
            on: self.on,
            guard: Box::new(guard),
            action_sets,
        }
    }
}

impl<R: 'static> BehaviorBuilder<R> {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append an action set. Sets run in the order they are added, each
    /// against the state the previous one produced.
    pub fn actions(
        mut self,
        set: impl Fn(&EditorSnapshot, &BehaviorEvent, &R) -> Vec<BehaviorAction>
            + 'static,
    ) -> Self {
        self.action_sets.push(Box::new(set));
        self
    }

    pub fn build(self) -> Behavior {
        Behavior {
            name: self.name,
            on: self.on,
            rule: Box::new(TypedRule {
                guard: self.guard,
                action_sets: self.action_sets,
            }),
        }
    }
}

// ----------------------------------------------------------------------
// Type erasure of the guard response
// ----------------------------------------------------------------------

trait Rule {
    fn evaluate<'a>(
        &'a self,
        snapshot: &EditorSnapshot,
        event: &BehaviorEvent,
    ) -> Option<Box<dyn MatchedRule + 'a>>;
}

trait MatchedRule {
    fn action_set_count(&self) -> usize;

    fn action_set(
        &self,
        index: usize,
        snapshot: &EditorSnapshot,
        event: &BehaviorEvent,
    ) -> Vec<BehaviorAction>;
}

struct TypedRule<R> {
    guard: Box<GuardFn<R>>,
    action_sets: Vec<Box<ActionSetFn<R>>>,
}

struct TypedMatch<'a, R> {
    response: R,
    action_sets: &'a [Box<ActionSetFn<R>>],
}

impl<R: 'static> Rule for TypedRule<R> {
    fn evaluate<'a>(
        &'a self,
        snapshot: &EditorSnapshot,
        event: &BehaviorEvent,
    ) -> Option<Box<dyn MatchedRule + 'a>> {
        let response = (self.guard)(snapshot, event)?;
        Some(Box::new(TypedMatch {
            response,
            action_sets: &self.action_sets,
        }))
    }
}

impl<R> MatchedRule for TypedMatch<'_, R> {
    fn action_set_count(&self) -> usize {
        self.action_sets.len()
    }

    fn action_set(
        &self,
        index: usize,
        snapshot: &EditorSnapshot,
        event: &BehaviorEvent,
    ) -> Vec<BehaviorAction> {
        match self.action_sets.get(index) {
            Some(set) => set(snapshot, event, &self.response),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::behaviors::{execute, noop, SyntheticEvent};
    use crate::schema::Schema;

    fn snapshot() -> EditorSnapshot {
        EditorSnapshot::new(Rc::new(Schema::default()), Vec::new(), None)
    }

    fn insert_text(text: &str) -> BehaviorEvent {
        SyntheticEvent::InsertText { text: text.into() }.into()
    }

    #[test]
    fn guard_none_means_no_match() {
        let behavior = Behavior::on("insert.text")
            .guard(|_, event| (event.inserted_text() == Some("a")).then_some(()))
            .actions(|_, _, _| vec![noop()])
            .build();
        assert!(behavior.evaluate(&snapshot(), &insert_text("b")).is_none());
        assert!(behavior.evaluate(&snapshot(), &insert_text("a")).is_some());
    }

    #[test]
    fn guard_response_reaches_every_action_set_in_order() {
        let behavior = Behavior::on("insert.text")
            .guard(|_, event| event.inserted_text().map(str::len))
            .actions(|_, _, len| {
                vec![execute(SyntheticEvent::InsertText {
                    text: format!("first {len}"),
                })]
            })
            .actions(|_, _, len| {
                vec![execute(SyntheticEvent::InsertText {
                    text: format!("second {len}"),
                })]
            })
            .build();
        let sets = behavior.run(&snapshot(), &insert_text("abc")).unwrap();
        assert_eq!(
            sets,
            vec![
                vec![execute(SyntheticEvent::InsertText { text: "first 3".into() })],
                vec![execute(SyntheticEvent::InsertText { text: "second 3".into() })],
            ]
        );
    }

    #[test]
    fn nothing_runs_at_definition_time() {
        let calls = Rc::new(Cell::new(0));
        let (guard_calls, action_calls) = (calls.clone(), calls.clone());
        let behavior = define_behavior("*")
            .name("counting")
            .guard(move |_, _| {
                guard_calls.set(guard_calls.get() + 1);
                Some(())
            })
            .actions(move |_, _, _| {
                action_calls.set(action_calls.get() + 1);
                Vec::new()
            })
            .build();
        assert_eq!(calls.get(), 0);
        assert_eq!(behavior.name(), Some("counting"));

        let matched = behavior.evaluate(&snapshot(), &insert_text("x")).unwrap();
        assert_eq!(calls.get(), 1);
        assert_eq!(matched.action_set_count(), 1);
        matched.action_set(0, &snapshot(), &insert_text("x"));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn actions_before_guard_are_kept() {
        let behavior = Behavior::on("focus")
            .actions(|_, _, _| vec![noop()])
            .guard(|_, _| Some(7))
            .build();
        let sets = behavior
            .run(&snapshot(), &SyntheticEvent::Focus.into())
            .unwrap();
        assert_eq!(sets, vec![vec![noop()]]);
    }
}
