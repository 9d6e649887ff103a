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

//! The editor: behavior dispatch, action set commits, history and change
//! events around one [`EditingEngine`].
//!
//! An event sent to the editor is offered to the registered behaviors,
//! most recently registered first. The first behavior whose guard matches
//! runs its action sets; each set is evaluated against the state the
//! previous set left behind and committed on its own, so it becomes one
//! undo step and one `mutation` change. Events nobody overwrites fall
//! through to the default: synthetic events go to the action executor,
//! native events are reported back as [`Dispatch::NotHandled`].

mod bridge;
mod changes;
mod collaboration;
mod value_sync;

use std::rc::Rc;

use tracing::{debug, error, trace, warn};

pub use bridge::{default_key_intent, input_intent};
pub use changes::{ChangeEvent, Dispatch};

use crate::actions::{self, ActionContext};
use crate::behaviors::{
    core::core_behaviors, Behavior, BehaviorAction, BehaviorEvent, BehaviorId,
    BehaviorRegistry, SyntheticEvent,
};
use crate::config::EditorConfig;
use crate::document::{Block, KeyGenerator, UuidKeyGenerator};
use crate::engine::{
    normalize, DocumentEngine, EditingEngine, History, HistoryEntry, Operation,
};
use crate::error::EditorError;
use crate::patches::{diff_values, Patch};
use crate::schema::Schema;
use crate::selection::{resolve_point, EditorSelection};
use crate::snapshot::EditorSnapshot;

/// Nesting limit for raised and forwarded events.
const MAX_DISPATCH_DEPTH: usize = 32;

/// Handle returned by [`Editor::on_change`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Handle returned by [`Editor::watch`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WatcherId(u64);

type Listener = Box<dyn FnMut(&ChangeEvent)>;
type Watcher = Box<dyn FnMut(&EditorSnapshot)>;

/// State of the action set being built.
struct PendingSet {
    operations: Vec<Operation>,
    value_before: Vec<Block>,
    selection_before: Option<EditorSelection>,
    reselect: bool,
}

pub struct Editor {
    engine: Box<dyn EditingEngine>,
    schema: Rc<Schema>,
    config: EditorConfig,
    keys: Box<dyn KeyGenerator>,
    registry: BehaviorRegistry,
    history: History,
    pending_marks: Option<Vec<String>>,
    focused: bool,
    set: Option<PendingSet>,
    native_fallthrough: bool,
    listeners: Vec<(ListenerId, Listener)>,
    watchers: Vec<(WatcherId, Watcher)>,
    next_id: u64,
}

impl Editor {
    /// An empty editor over the in-memory engine.
    pub fn new(config: EditorConfig) -> Result<Self, EditorError> {
        Self::with_engine(
            config,
            Box::new(DocumentEngine::default()),
            Box::new(UuidKeyGenerator::new()),
        )
    }

    /// An editor over a host supplied engine and key generator.
    ///
    /// Fails if the configured decorator hotkeys are invalid.
    pub fn with_engine(
        config: EditorConfig,
        engine: Box<dyn EditingEngine>,
        keys: Box<dyn KeyGenerator>,
    ) -> Result<Self, EditorError> {
        let mut registry = BehaviorRegistry::new();
        if config.core_behaviors {
            for behavior in core_behaviors(&config)
                .map_err(|e| EditorError::Config(e.into()))?
            {
                registry.register(behavior);
            }
        } else {
            config
                .decorator_hotkeys()
                .map_err(|e| EditorError::Config(e.into()))?;
        }
        debug!(behaviors = registry.len(), "editor ready");
        Ok(Self {
            engine,
            schema: Rc::new(config.schema.clone()),
            history: History::with_limit(config.history_limit),
            config,
            keys,
            registry,
            pending_marks: None,
            focused: false,
            set: None,
            native_fallthrough: false,
            listeners: Vec::new(),
            watchers: Vec::new(),
            next_id: 0,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn value(&self) -> &[Block] {
        self.engine.value()
    }

    pub fn selection(&self) -> Option<&EditorSelection> {
        self.engine.selection()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// The current state, as behaviors see it.
    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot::new(
            Rc::clone(&self.schema),
            self.engine.value().to_vec(),
            self.engine.selection().cloned(),
        )
        .with_pending_marks(self.pending_marks.clone())
    }

    /// Run a selector against the current state.
    pub fn select_with<T>(&self, selector: impl FnOnce(&EditorSnapshot) -> T) -> T {
        selector(&self.snapshot())
    }

    // ------------------------------------------------------------------
    // Behaviors
    // ------------------------------------------------------------------

    /// Register a behavior. It takes priority over everything registered
    /// before it, core behaviors included.
    pub fn register_behavior(&mut self, behavior: Behavior) -> BehaviorId {
        self.registry.register(behavior)
    }

    pub fn unregister_behavior(&mut self, id: BehaviorId) -> bool {
        self.registry.unregister(id)
    }

    // ------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------

    /// Subscribe to changes. The listener is immediately sent `ready`.
    pub fn on_change(&mut self, mut listener: impl FnMut(&ChangeEvent) + 'static) -> ListenerId {
        listener(&ChangeEvent::Ready);
        let id = ListenerId(self.fresh_id());
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let len = self.listeners.len();
        self.listeners.retain(|(listener, _)| *listener != id);
        self.listeners.len() != len
    }

    /// Call `callback` whenever the selector's result changes after a
    /// commit.
    pub fn watch<T: PartialEq + 'static>(
        &mut self,
        selector: impl Fn(&EditorSnapshot) -> T + 'static,
        mut callback: impl FnMut(&T) + 'static,
    ) -> WatcherId {
        let mut last = selector(&self.snapshot());
        let watcher = move |snapshot: &EditorSnapshot| {
            let next = selector(snapshot);
            if next != last {
                callback(&next);
                last = next;
            }
        };
        let id = WatcherId(self.fresh_id());
        self.watchers.push((id, Box::new(watcher)));
        id
    }

    pub fn unwatch(&mut self, id: WatcherId) -> bool {
        let len = self.watchers.len();
        self.watchers.retain(|(watcher, _)| *watcher != id);
        self.watchers.len() != len
    }

    fn fresh_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn emit(&mut self, change: ChangeEvent) {
        trace!(change = change.change_type(), "emitting");
        for (_, listener) in &mut self.listeners {
            listener(&change);
        }
    }

    fn notify_watchers(&mut self) {
        if self.watchers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for (_, watcher) in &mut self.watchers {
            watcher(&snapshot);
        }
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Send an event through the behaviors.
    pub fn send(&mut self, event: impl Into<BehaviorEvent>) -> Dispatch {
        let event = event.into();
        debug!(event = %event.event_type(), "dispatching");
        self.native_fallthrough = false;
        let outcome = self.dispatch(&event, None, 0);
        self.commit();
        if self.native_fallthrough {
            Dispatch::NotHandled
        } else {
            outcome
        }
    }

    pub fn undo(&mut self) {
        let _ = self.send(SyntheticEvent::HistoryUndo);
    }

    pub fn redo(&mut self) {
        let _ = self.send(SyntheticEvent::HistoryRedo);
    }

    /// Offer `event` to the behaviors below `below` (all when `None`),
    /// newest first, then to the default handling.
    fn dispatch(&mut self, event: &BehaviorEvent, below: Option<usize>, depth: usize) -> Dispatch {
        if depth > MAX_DISPATCH_DEPTH {
            error!(event = %event.event_type(), "dispatch depth exceeded, dropping event");
            return Dispatch::Handled;
        }
        let event_type = event.event_type();
        let behaviors = self.registry.ordered();
        let limit = below.unwrap_or(behaviors.len()).min(behaviors.len());

        for index in (0..limit).rev() {
            let behavior = Rc::clone(&behaviors[index]);
            if !behavior.listens_on(&event_type) {
                continue;
            }
            let snapshot = self.snapshot();
            let Some(matched) = behavior.evaluate(&snapshot, event) else {
                continue;
            };
            trace!(behavior = ?behavior.name(), event = %event_type, "guard matched");

            let mut overwritten = false;
            for set in 0..matched.action_set_count() {
                let snapshot = if set == 0 { snapshot.clone() } else { self.snapshot() };
                let actions = matched.action_set(set, &snapshot, event);
                overwritten |= actions.iter().any(|a| !a.is_effect());
                self.run_actions(actions, index, depth);
            }
            if overwritten {
                return Dispatch::Handled;
            }
        }
        self.default_action(event, depth)
    }

    fn default_action(&mut self, event: &BehaviorEvent, depth: usize) -> Dispatch {
        match event {
            BehaviorEvent::Synthetic(synthetic) => {
                self.begin_set(depth);
                self.perform(synthetic);
                self.end_set(depth);
                Dispatch::Handled
            }
            BehaviorEvent::Native(_) | BehaviorEvent::Custom(_) => Dispatch::NotHandled,
        }
    }

    /// Run one action set. At the top level it is committed on its own.
    fn run_actions(&mut self, actions: Vec<BehaviorAction>, behavior: usize, depth: usize) {
        self.begin_set(depth);
        for action in actions {
            match action {
                BehaviorAction::Execute(event) => self.perform(&event),
                BehaviorAction::Raise(event) => {
                    let _ = self.dispatch(&event, None, depth + 1);
                }
                BehaviorAction::Forward(event) => {
                    if self.dispatch(&event, Some(behavior), depth + 1) == Dispatch::NotHandled
                        && event.as_native().is_some()
                    {
                        self.native_fallthrough = true;
                    }
                }
                BehaviorAction::Reselect => {
                    if let Some(set) = &mut self.set {
                        set.reselect = true;
                    }
                }
                BehaviorAction::Effect(effect) => effect.run(),
                BehaviorAction::Noop => {}
            }
        }
        self.end_set(depth);
    }

    fn begin_set(&mut self, depth: usize) {
        if depth == 0 || self.set.is_none() {
            self.commit();
            self.open_set();
        }
    }

    fn open_set(&mut self) {
        self.set = Some(PendingSet {
            operations: Vec::new(),
            value_before: self.engine.value().to_vec(),
            selection_before: self.engine.selection().cloned(),
            reselect: false,
        });
    }

    fn end_set(&mut self, depth: usize) {
        if depth == 0 {
            self.commit();
        }
    }

    /// Carry out one synthetic event. A failing intent is rolled back on
    /// its own; the rest of the action set still runs.
    fn perform(&mut self, event: &SyntheticEvent) {
        if self.config.read_only && event.mutates_value() {
            warn!(event = event.event_type(), "editor is read-only, ignoring");
            return;
        }
        match event {
            SyntheticEvent::HistoryUndo => return self.undo_step(),
            SyntheticEvent::HistoryRedo => return self.redo_step(),
            SyntheticEvent::Focus => {
                if !self.focused {
                    self.focused = true;
                    self.emit(ChangeEvent::Focused);
                }
                return;
            }
            SyntheticEvent::Blur => {
                if self.focused {
                    self.focused = false;
                    self.emit(ChangeEvent::Blurred);
                }
                return;
            }
            _ => {}
        }

        self.collect_operations();
        let selection = self.engine.selection().cloned();
        let mut ctx = ActionContext {
            engine: self.engine.as_mut(),
            schema: Rc::clone(&self.schema),
            config: &self.config,
            keys: self.keys.as_mut(),
            pending_marks: &mut self.pending_marks,
        };
        if let Err(err) = actions::execute(&mut ctx, event) {
            warn!(event = event.event_type(), %err, "action aborted");
            let applied = self.engine.take_changes();
            self.revert(&applied);
            self.engine.set_selection(selection);
        }
    }

    /// Move the engine's change log into the pending set.
    fn collect_operations(&mut self) {
        let changes = self.engine.take_changes();
        if let Some(set) = &mut self.set {
            set.operations.extend(changes);
        }
    }

    /// Apply the inverses of `operations` and discard them from the log.
    fn revert(&mut self, operations: &[Operation]) {
        for op in operations.iter().rev() {
            if let Err(err) = self.engine.apply(op.inverse()) {
                error!(%err, "could not revert operation");
                break;
            }
        }
        self.engine.take_changes();
    }

    /// Finish the pending set: normalize, record history, emit changes.
    fn commit(&mut self) {
        self.collect_operations();
        let Some(mut set) = self.set.take() else {
            return;
        };
        if !set.operations.is_empty() {
            if let Err(err) = normalize(
                self.engine.as_mut(),
                &self.schema,
                self.config.max_list_depth,
                self.keys.as_mut(),
            ) {
                warn!(%err, "normalization failed");
            }
            set.operations.extend(self.engine.take_changes());
            self.history.push_undo(HistoryEntry {
                operations: set.operations,
                selection_before: set.selection_before.clone(),
                selection_after: self.engine.selection().cloned(),
            });
        }
        let patches = self.emit_changes(&set.value_before, &set.selection_before, set.reselect);
        if !patches.is_empty() {
            debug!(patches = patches.len(), "committed action set");
        }
    }

    /// Emit `mutation` and `selection` for the difference to the given
    /// state, and re-run watchers. Returns the patches.
    fn emit_changes(
        &mut self,
        value_before: &[Block],
        selection_before: &Option<EditorSelection>,
        reselect: bool,
    ) -> Vec<Patch> {
        let patches = diff_values(value_before, self.engine.value());
        if !patches.is_empty() {
            let snapshot = self.snapshot();
            self.emit(ChangeEvent::Mutation {
                patches: patches.clone(),
                snapshot,
            });
        }
        self.emit_selection(selection_before, reselect);
        self.notify_watchers();
        #[cfg(feature = "assert-invariants")]
        assert_invariants(self.engine.value(), &self.schema);
        patches
    }

    fn emit_selection(&mut self, before: &Option<EditorSelection>, force: bool) {
        let selection = self.engine.selection().cloned();
        let changed = selection != *before;
        if changed {
            self.pending_marks = None;
        }
        if changed || force {
            self.emit(ChangeEvent::Selection { selection });
        }
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Undo is a step of its own: the pending set is committed first and a
    /// fresh one opened afterwards for the rest of the actions.
    fn undo_step(&mut self) {
        let reopen = self.set.is_some();
        self.commit();
        self.undo_entry();
        if reopen {
            self.open_set();
        }
    }

    fn redo_step(&mut self) {
        let reopen = self.set.is_some();
        self.commit();
        self.redo_entry();
        if reopen {
            self.open_set();
        }
    }

    fn undo_entry(&mut self) {
        let Some(entry) = self.history.pop_undo() else {
            debug!("nothing to undo");
            return;
        };
        let value_before = self.engine.value().to_vec();
        let selection_before = self.engine.selection().cloned();
        if !self.replay(&entry.inverse_operations()) {
            return;
        }
        self.engine.set_selection(
            entry
                .selection_before
                .clone()
                .filter(|s| selection_resolves(self.engine.value(), s)),
        );
        self.history.push_redo(entry);
        let patches = self.emit_changes(&value_before, &selection_before, false);
        self.emit(ChangeEvent::Undo { patches });
    }

    fn redo_entry(&mut self) {
        let Some(entry) = self.history.pop_redo() else {
            debug!("nothing to redo");
            return;
        };
        let value_before = self.engine.value().to_vec();
        let selection_before = self.engine.selection().cloned();
        if !self.replay(&entry.operations) {
            return;
        }
        self.engine.set_selection(
            entry
                .selection_after
                .clone()
                .filter(|s| selection_resolves(self.engine.value(), s)),
        );
        self.history.push_undo_keep_redo(entry);
        let patches = self.emit_changes(&value_before, &selection_before, false);
        self.emit(ChangeEvent::Redo { patches });
    }

    /// Apply recorded operations outside of history. All or nothing.
    fn replay(&mut self, operations: &[Operation]) -> bool {
        for (applied, op) in operations.iter().enumerate() {
            if let Err(err) = self.engine.apply(op.clone()) {
                warn!(%err, "history step no longer applies, dropping it");
                self.engine.take_changes();
                self.revert(&operations[..applied]);
                return false;
            }
        }
        self.engine.take_changes();
        true
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("value", &self.engine.value())
            .field("selection", &self.engine.selection())
            .field("behaviors", &self.registry.len())
            .finish_non_exhaustive()
    }
}

pub(crate) fn selection_resolves(value: &[Block], selection: &EditorSelection) -> bool {
    resolve_point(value, &selection.anchor).is_some()
        && resolve_point(value, &selection.focus).is_some()
}

/// Panic if the value breaks a document invariant.
#[cfg(feature = "assert-invariants")]
fn assert_invariants(value: &[Block], schema: &Schema) {
    use std::collections::HashSet;

    use crate::document::MAX_LIST_LEVEL;

    let mut block_keys = HashSet::new();
    for block in value {
        assert!(block_keys.insert(block.key()), "duplicate block key {}", block.key());
        let Some(text_block) = block.as_text() else {
            continue;
        };
        assert!(
            !text_block.children.is_empty(),
            "text block {} has no children",
            text_block.key
        );
        if text_block.list_item.is_some() {
            let level = text_block.level.unwrap_or(0);
            assert!(
                (1..=MAX_LIST_LEVEL).contains(&level),
                "list level {level} out of range in {}",
                text_block.key
            );
        }
        let mut child_keys = HashSet::new();
        for child in &text_block.children {
            assert!(child_keys.insert(child.key()), "duplicate child key {}", child.key());
        }
        for span in text_block.spans() {
            for mark in &span.marks {
                assert!(
                    schema.has_decorator(mark) || text_block.mark_def(mark).is_some(),
                    "dangling mark {mark} in {}",
                    text_block.key
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::behaviors::{effect, execute, forward, noop, raise, KeyboardEvent, NativeEvent};
    use crate::document::{IncrementingKeyGenerator, TextBlock};
    use crate::selection::EditorSelectionPoint;

    fn editor(text: &str) -> Editor {
        let config = EditorConfig {
            core_behaviors: false,
            ..EditorConfig::default()
        };
        let engine = DocumentEngine::new(vec![Block::Text(TextBlock::with_text("b1", "s1", text))]);
        let mut editor =
            Editor::with_engine(config, Box::new(engine), Box::new(IncrementingKeyGenerator::new()))
                .unwrap();
        let caret = EditorSelectionPoint::in_child("b1", "s1", text.len());
        let _ = editor.send(SyntheticEvent::Select {
            selection: Some(EditorSelection::collapsed(caret)),
        });
        editor
    }

    fn text(editor: &Editor) -> String {
        editor.value()[0].as_text().map(TextBlock::text).unwrap_or_default()
    }

    fn recorder(editor: &mut Editor) -> Rc<RefCell<Vec<ChangeEvent>>> {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        editor.on_change(move |change| sink.borrow_mut().push(change.clone()));
        changes
    }

    fn insert(text: &str) -> SyntheticEvent {
        SyntheticEvent::InsertText { text: text.into() }
    }

    #[test]
    fn synthetic_events_default_to_the_executor() {
        let mut editor = editor("foo");
        assert_eq!(editor.send(insert("bar")), Dispatch::Handled);
        assert_eq!(text(&editor), "foobar");
    }

    #[test]
    fn native_events_fall_through() {
        let mut editor = editor("foo");
        let key = NativeEvent::KeyDown {
            key: KeyboardEvent::new("a"),
        };
        assert_eq!(editor.send(key), Dispatch::NotHandled);
    }

    #[test]
    fn newest_behavior_wins() {
        let mut editor = editor("");
        editor.register_behavior(
            Behavior::on("insert.text")
                .actions(|_, _, _| vec![execute(insert("old"))])
                .build(),
        );
        editor.register_behavior(
            Behavior::on("insert.text")
                .actions(|_, _, _| vec![execute(insert("new"))])
                .build(),
        );
        let _ = editor.send(insert("x"));
        assert_eq!(text(&editor), "new");
    }

    #[test]
    fn effect_only_sets_let_dispatch_continue() {
        let mut editor = editor("");
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        editor.register_behavior(
            Behavior::on("insert.text")
                .actions(move |_, _, _| {
                    let counter = Rc::clone(&counter);
                    vec![effect(move || *counter.borrow_mut() += 1)]
                })
                .build(),
        );
        let _ = editor.send(insert("x"));
        assert_eq!(*calls.borrow(), 1);
        assert_eq!(text(&editor), "x");
    }

    #[test]
    fn each_action_set_is_an_undo_step() {
        let mut editor = editor("");
        editor.register_behavior(
            Behavior::on("insert.text")
                .guard(|_, event| event.inserted_text().filter(|t| *t == "!").map(drop))
                .actions(|_, _, _| vec![execute(insert("a"))])
                .actions(|_, _, _| vec![execute(insert("b"))])
                .build(),
        );
        let changes = recorder(&mut editor);
        let _ = editor.send(insert("!"));
        assert_eq!(text(&editor), "ab");
        let mutations = changes.borrow().iter().filter(|c| c.patches().is_some()).count();
        assert_eq!(mutations, 2);

        editor.undo();
        assert_eq!(text(&editor), "a");
        editor.undo();
        assert_eq!(text(&editor), "");
        editor.redo();
        assert_eq!(text(&editor), "a");
    }

    #[test]
    fn raised_events_join_the_current_set() {
        let mut editor = editor("");
        editor.register_behavior(
            Behavior::on("custom.shout")
                .actions(|_, _, _| vec![raise(insert("A")), raise(insert("B"))])
                .build(),
        );
        let _ = editor.send(crate::behaviors::CustomEvent::new("shout"));
        assert_eq!(text(&editor), "AB");
        editor.undo();
        assert_eq!(text(&editor), "");
    }

    #[test]
    fn forward_reaches_older_behaviors_and_native_default() {
        let mut editor = editor("");
        editor.register_behavior(
            Behavior::on("insert.text")
                .actions(|_, _, _| vec![execute(insert("<"))])
                .build(),
        );
        editor.register_behavior(
            Behavior::on("insert.text")
                .actions(|_, event, _| vec![forward(event.clone())])
                .build(),
        );
        let _ = editor.send(insert("x"));
        assert_eq!(text(&editor), "<");

        editor.register_behavior(
            Behavior::on("key.down")
                .actions(|_, event, _| vec![forward(event.clone())])
                .build(),
        );
        let key = NativeEvent::KeyDown {
            key: KeyboardEvent::new("a"),
        };
        assert_eq!(editor.send(key), Dispatch::NotHandled);
    }

    #[test]
    fn runaway_raises_stop_at_the_depth_limit() {
        let mut editor = editor("");
        editor.register_behavior(
            Behavior::on("custom.loop")
                .actions(|_, event, _| vec![raise(event.clone())])
                .build(),
        );
        assert_eq!(
            editor.send(crate::behaviors::CustomEvent::new("loop")),
            Dispatch::Handled
        );
    }

    #[test]
    fn failing_intent_is_rolled_back_alone() {
        let mut editor = editor("foo");
        editor.register_behavior(
            Behavior::on("custom.mixed")
                .actions(|_, _, _| {
                    vec![
                        execute(insert("1")),
                        execute(SyntheticEvent::StyleAdd { style: "nope".into() }),
                        execute(insert("2")),
                    ]
                })
                .build(),
        );
        let _ = editor.send(crate::behaviors::CustomEvent::new("mixed"));
        assert_eq!(text(&editor), "foo12");
    }

    #[test]
    fn read_only_refuses_mutations() {
        let mut editor = editor("foo");
        editor.config.read_only = true;
        let _ = editor.send(insert("bar"));
        assert_eq!(text(&editor), "foo");
    }

    #[test]
    fn listeners_get_ready_and_selection_changes() {
        let mut editor = editor("foo");
        let changes = recorder(&mut editor);
        let _ = editor.send(SyntheticEvent::Select { selection: None });
        let types: Vec<_> = changes.borrow().iter().map(ChangeEvent::change_type).collect();
        assert_eq!(types, vec!["ready", "selection"]);
    }

    #[test]
    fn noop_overwrites_without_changes() {
        let mut editor = editor("foo");
        editor.register_behavior(Behavior::on("insert.*").actions(|_, _, _| vec![noop()]).build());
        let changes = recorder(&mut editor);
        let _ = editor.send(insert("x"));
        assert_eq!(text(&editor), "foo");
        assert_eq!(changes.borrow().len(), 1);
        assert!(!editor.can_undo());
    }

    #[test]
    fn watchers_fire_on_change_only() {
        let mut editor = editor("foo");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        editor.watch(
            |snapshot| crate::selectors::text_block_text(&snapshot.value[0]),
            move |text: &String| sink.borrow_mut().push(text.clone()),
        );
        let _ = editor.send(insert("d"));
        let _ = editor.send(SyntheticEvent::Select { selection: None });
        assert_eq!(*seen.borrow(), vec!["food".to_owned()]);
    }

    #[test]
    fn focus_and_blur_emit_once() {
        let mut editor = editor("");
        let changes = recorder(&mut editor);
        let _ = editor.send(SyntheticEvent::Focus);
        let _ = editor.send(SyntheticEvent::Focus);
        let _ = editor.send(SyntheticEvent::Blur);
        let types: Vec<_> = changes.borrow().iter().map(ChangeEvent::change_type).collect();
        assert_eq!(types, vec!["ready", "focused", "blurred"]);
    }
}
