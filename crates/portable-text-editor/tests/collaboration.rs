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

use std::cell::RefCell;
use std::rc::Rc;

use portable_text_editor::behaviors::{KeyboardEvent, SyntheticEvent};
use portable_text_editor::document::{Block, IncrementingKeyGenerator, TextBlock};
use portable_text_editor::engine::DocumentEngine;
use portable_text_editor::patches::Patch;
use portable_text_editor::selection::{EditorSelection, EditorSelectionPoint};
use portable_text_editor::selectors::text_block_text;
use portable_text_editor::{ChangeEvent, Editor, EditorConfig};

/// An editor plus the patches its mutations produced since the last sync.
struct Peer {
    editor: Editor,
    outbox: Rc<RefCell<Vec<Patch>>>,
}

impl Peer {
    fn new(key_prefix: &str, offset: usize) -> Self {
        let value = vec![Block::Text(TextBlock::with_text("b1", "s1", "hello"))];
        let mut editor = Editor::with_engine(
            EditorConfig::default(),
            Box::new(DocumentEngine::new(value)),
            Box::new(IncrementingKeyGenerator::with_prefix(key_prefix)),
        )
        .unwrap();
        let outbox = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&outbox);
        editor.on_change(move |change| {
            if let ChangeEvent::Mutation { patches, .. } = change {
                sink.borrow_mut().extend(patches.iter().cloned());
            }
        });
        let _ = editor.send(SyntheticEvent::Select {
            selection: Some(EditorSelection::collapsed(
                EditorSelectionPoint::in_child("b1", "s1", offset),
            )),
        });
        Self { editor, outbox }
    }

    fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            let _ = self.editor.key_down(KeyboardEvent::new(c.to_string()));
        }
    }

    fn send_to(&self, other: &mut Peer) {
        let patches: Vec<Patch> = self.outbox.borrow_mut().drain(..).collect();
        other.editor.apply_remote_patches(&patches).unwrap();
    }

    fn texts(&self) -> Vec<String> {
        self.editor.value().iter().map(text_block_text).collect()
    }

    fn caret(&self) -> usize {
        self.editor.selection().unwrap().focus.offset
    }
}

fn pair() -> (Peer, Peer) {
    let mut a = Peer::new("a", 0);
    let mut b = Peer::new("b", 5);
    // Both sides normalize the shared value on their first commit.
    a.send_to(&mut b);
    b.send_to(&mut a);
    (a, b)
}

#[test]
fn peers_converge_on_typed_text() {
    let (mut a, mut b) = pair();
    a.type_text("A ");
    a.send_to(&mut b);
    b.type_text("!");
    b.send_to(&mut a);

    assert_eq!(a.texts(), vec!["A hello!"]);
    assert_eq!(b.texts(), a.texts());
}

#[test]
fn remote_edits_keep_the_local_caret_on_its_text() {
    let (mut a, mut b) = pair();
    assert_eq!(b.caret(), 5);
    a.type_text("ab ");
    a.send_to(&mut b);
    assert_eq!(b.texts(), vec!["ab hello"]);
    assert_eq!(b.caret(), 8);
    assert!(b.outbox.borrow().is_empty());
}

#[test]
fn undo_only_reverts_local_changes() {
    let (mut a, mut b) = pair();
    a.type_text("A");
    a.send_to(&mut b);
    b.type_text("B");
    b.send_to(&mut a);
    assert_eq!(a.texts(), vec!["AhelloB"]);

    a.editor.undo();
    assert_eq!(a.texts(), vec!["helloB"]);
    a.send_to(&mut b);
    assert_eq!(b.texts(), vec!["helloB"]);

    b.editor.undo();
    b.send_to(&mut a);
    assert_eq!(a.texts(), vec!["hello"]);
    assert_eq!(b.texts(), vec!["hello"]);
}

#[test]
fn remote_block_insert_is_mirrored() {
    let (mut a, mut b) = pair();
    a.type_text("x");
    let _ = a.editor.key_down(KeyboardEvent::new("Enter"));
    a.type_text("second");
    a.send_to(&mut b);
    assert_eq!(b.texts(), vec!["x", "secondhello"]);
    assert_eq!(b.editor.value()[1].key(), a.editor.value()[1].key());
    assert!(b.editor.value()[1].key().starts_with('a'));
}
