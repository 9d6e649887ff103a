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

//! The behavior engine: events, action intents, behavior definitions and
//! the registry dispatch searches.
//!
//! Dispatch itself lives on [`crate::Editor`], which owns the state the
//! action sets are committed against.

mod action;
mod behavior;
pub mod core;
mod event;
mod hotkey;
mod registry;

pub use action::{
    effect, execute, forward, noop, raise, reselect, BehaviorAction, Effect,
};
pub use behavior::{define_behavior, Behavior, BehaviorBuilder, MatchedBehavior};
pub use event::{
    BehaviorEvent, BlockProperty, CustomEvent, DeleteUnit, EventMatcher,
    KeyboardEvent, NativeEvent, Placement, SelectPlacement, SyntheticEvent,
    TypedValue,
};
pub use hotkey::{Hotkey, RESERVED_HOTKEYS};
pub use registry::{BehaviorId, BehaviorRegistry};
