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

//! Action intents: what behaviors ask the editor to do.

use std::fmt;
use std::rc::Rc;

use super::event::{BehaviorEvent, SyntheticEvent};

/// A side effect run by the editor, outside the document.
#[derive(Clone)]
pub struct Effect(Rc<dyn Fn()>);

impl Effect {
    pub fn new(f: impl Fn() + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub(crate) fn run(&self) {
        (self.0)()
    }
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Effect(..)")
    }
}

impl PartialEq for Effect {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// One unit of work produced by an action set.
#[derive(Clone, Debug, PartialEq)]
pub enum BehaviorAction {
    /// Carry out a synthetic event with the action executor, bypassing
    /// behaviors.
    Execute(SyntheticEvent),
    /// Dispatch an event through the behaviors, as if it had been sent.
    /// Its edits join the current action set.
    Raise(BehaviorEvent),
    /// Hand an event to the behaviors registered before the current one,
    /// then to the default handling. For native events this lets the host
    /// run its own default.
    Forward(BehaviorEvent),
    /// Reassert the current selection so selection listeners re-run.
    Reselect,
    /// Run a closure. Effect-only action sets do not count as handling the
    /// event.
    Effect(Effect),
    /// Handle the event by doing nothing.
    Noop,
}

impl BehaviorAction {
    pub fn is_effect(&self) -> bool {
        matches!(self, BehaviorAction::Effect(_))
    }
}

pub fn execute(event: SyntheticEvent) -> BehaviorAction {
    BehaviorAction::Execute(event)
}

pub fn raise(event: impl Into<BehaviorEvent>) -> BehaviorAction {
    BehaviorAction::Raise(event.into())
}

pub fn forward(event: impl Into<BehaviorEvent>) -> BehaviorAction {
    BehaviorAction::Forward(event.into())
}

pub fn effect(f: impl Fn() + 'static) -> BehaviorAction {
    BehaviorAction::Effect(Effect::new(f))
}

pub fn reselect() -> BehaviorAction {
    BehaviorAction::Reselect
}

pub fn noop() -> BehaviorAction {
    BehaviorAction::Noop
}
