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

//! Fresh node keys.
//!
//! A generator must never repeat a key for the lifetime of the editor that
//! owns it.

/// Source of fresh `_key` values.
pub trait KeyGenerator {
    fn next_key(&mut self) -> String;
}

/// Keys built from a random per-instance prefix and a counter, so two
/// collaborating editors never mint the same key.
#[derive(Debug)]
pub struct UuidKeyGenerator {
    prefix: String,
    counter: u64,
}

impl UuidKeyGenerator {
    pub fn new() -> Self {
        let id = uuid::Uuid::new_v4().simple().to_string();
        Self {
            prefix: id[..8].to_owned(),
            counter: 0,
        }
    }
}

impl Default for UuidKeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyGenerator for UuidKeyGenerator {
    fn next_key(&mut self) -> String {
        self.counter += 1;
        format!("{}{}", self.prefix, self.counter)
    }
}

/// Deterministic keys `k0`, `k1`, ... with an optional prefix. Used by
/// tests and by hosts that need reproducible output.
#[derive(Debug, Default)]
pub struct IncrementingKeyGenerator {
    prefix: String,
    counter: u64,
}

impl IncrementingKeyGenerator {
    pub fn new() -> Self {
        Self::with_prefix("k")
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: 0,
        }
    }
}

impl KeyGenerator for IncrementingKeyGenerator {
    fn next_key(&mut self) -> String {
        let key = format!("{}{}", self.prefix, self.counter);
        self.counter += 1;
        key
    }
}
