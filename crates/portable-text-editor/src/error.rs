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

//! Error types, one per concern.

/// Malformed Portable Text JSON.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("expected {expected} at {path}")]
    UnexpectedShape { path: String, expected: &'static str },

    #[error("missing `{field}` at {path}")]
    MissingField { path: String, field: &'static str },
}

/// A primitive engine operation could not be applied.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("no block with key `{0}`")]
    BlockNotFound(String),

    #[error("block `{0}` is not a text block")]
    NotATextBlock(String),

    #[error("no child `{child}` in block `{block}`")]
    ChildNotFound { block: String, child: String },

    #[error("child `{child}` in block `{block}` is not a span")]
    NotASpan { block: String, child: String },

    #[error("index {index} is out of bounds (length {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("offset {offset} is out of bounds for `{child}` (length {len})")]
    OffsetOutOfBounds {
        child: String,
        offset: usize,
        len: usize,
    },

    #[error("text at `{child}` offset {offset} does not match the operation")]
    TextMismatch { child: String, offset: usize },

    #[error("`{0}` changed since the operation was recorded")]
    Stale(String),
}

/// A single action intent could not be carried out.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("cannot resolve {0}")]
    Unresolvable(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// A Portable Text patch could not be applied to the local value.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum PatchError {
    #[error("patch path `{0}` does not resolve in the current value")]
    PathNotFound(String),

    #[error("patch path `{0}` is not supported")]
    UnsupportedPath(String),

    #[error("patch value is invalid: {0}")]
    InvalidValue(#[from] ValueError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Configuration could not be parsed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid editor config: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Hotkey(#[from] HotkeyError),
}

/// A hotkey could not be registered.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HotkeyError {
    #[error("hotkey `{0}` is empty or malformed")]
    Malformed(String),

    #[error("hotkey `{0}` is reserved by the editor")]
    Reserved(String),

    #[error("hotkey `{hotkey}` targets unknown decorator `{decorator}`")]
    UnknownDecorator { hotkey: String, decorator: String },
}

/// Errors surfaced by the [`crate::Editor`] facade.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Patch(#[from] PatchError),
}
