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

use std::rc::Rc;

use super::behavior::Behavior;

/// Handle returned by registration, used to unregister.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BehaviorId(u64);

/// Behaviors in registration order. Dispatch walks it from the back, so a
/// later registration shadows an earlier one.
#[derive(Debug, Default)]
pub struct BehaviorRegistry {
    entries: Vec<(BehaviorId, Rc<Behavior>)>,
    next_id: u64,
}

impl BehaviorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, behavior: Behavior) -> BehaviorId {
        let id = BehaviorId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Rc::new(behavior)));
        id
    }

    /// Returns false if `id` was not registered.
    pub fn unregister(&mut self, id: BehaviorId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The behaviors in registration order, detached from the registry so
    /// the caller can mutate the editor while walking them.
    pub fn ordered(&self) -> Vec<Rc<Behavior>> {
        self.entries.iter().map(|(_, b)| Rc::clone(b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Behavior {
        Behavior::on("*").name(name).build()
    }

    #[test]
    fn ids_are_never_reused() {
        let mut registry = BehaviorRegistry::new();
        let a = registry.register(named("a"));
        assert!(registry.unregister(a));
        let b = registry.register(named("b"));
        assert_ne!(a, b);
        assert!(!registry.unregister(a));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn ordered_keeps_registration_order() {
        let mut registry = BehaviorRegistry::new();
        registry.register(named("a"));
        let b = registry.register(named("b"));
        registry.register(named("c"));
        registry.unregister(b);
        let names: Vec<_> = registry
            .ordered()
            .iter()
            .map(|b| b.name().unwrap_or_default().to_owned())
            .collect();
        assert_eq!(names, vec!["a", "c"]);
    }
}
