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

//! Toggles are sugar: each one is rewritten into the matching `add` or
//! `remove` event, raised so other behaviors still see it, followed by a
//! reselect so toolbars refresh.

use crate::behaviors::{raise, reselect, Behavior, BehaviorEvent, SyntheticEvent, TypedValue};
use crate::selectors::{
    is_active_annotation, is_active_decorator, is_active_list_item, is_active_style,
};

pub(super) fn behaviors() -> Vec<Behavior> {
    vec![
        decorator_toggle(),
        annotation_toggle(),
        style_toggle(),
        list_item_toggle(),
    ]
}

fn decorator_toggle() -> Behavior {
    Behavior::on("decorator.toggle")
        .name("core.decorator toggle")
        .guard(|snapshot, event| match event.as_synthetic()? {
            SyntheticEvent::DecoratorToggle { decorator } => {
                Some((decorator.clone(), is_active_decorator(snapshot, decorator)))
            }
            _ => None,
        })
        .actions(|_, _, (decorator, active)| {
            let decorator = decorator.clone();
            let event = if *active {
                SyntheticEvent::DecoratorRemove { decorator }
            } else {
                SyntheticEvent::DecoratorAdd { decorator }
            };
            vec![raise(event), reselect()]
        })
        .build()
}

fn annotation_toggle() -> Behavior {
    Behavior::on("annotation.toggle")
        .name("core.annotation toggle")
        .guard(|snapshot, event| match event.as_synthetic()? {
            SyntheticEvent::AnnotationToggle { annotation } => Some((
                annotation.clone(),
                is_active_annotation(snapshot, &annotation.name),
            )),
            _ => None,
        })
        .actions(|_, _, (annotation, active): &(TypedValue, bool)| {
            let annotation = annotation.clone();
            let event = if *active {
                SyntheticEvent::AnnotationRemove { annotation }
            } else {
                SyntheticEvent::AnnotationAdd { annotation }
            };
            vec![raise(event), reselect()]
        })
        .build()
}

fn style_toggle() -> Behavior {
    Behavior::on("style.toggle")
        .name("core.style toggle")
        .guard(|snapshot, event| match event.as_synthetic()? {
            SyntheticEvent::StyleToggle { style } => {
                Some((style.clone(), is_active_style(snapshot, style)))
            }
            _ => None,
        })
        .actions(|_, _, (style, active)| {
            let style = style.clone();
            let event = if *active {
                SyntheticEvent::StyleRemove { style }
            } else {
                SyntheticEvent::StyleAdd { style }
            };
            vec![raise(event), reselect()]
        })
        .build()
}

fn list_item_toggle() -> Behavior {
    Behavior::on("list item.toggle")
        .name("core.list item toggle")
        .guard(|snapshot, event: &BehaviorEvent| match event.as_synthetic()? {
            SyntheticEvent::ListItemToggle { list_item } => {
                Some((list_item.clone(), is_active_list_item(snapshot, list_item)))
            }
            _ => None,
        })
        .actions(|_, _, (list_item, active)| {
            let list_item = list_item.clone();
            let event = if *active {
                SyntheticEvent::ListItemRemove { list_item }
            } else {
                SyntheticEvent::ListItemAdd { list_item }
            };
            vec![raise(event), reselect()]
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviors::BehaviorAction;
    use crate::selectors::test_support::{point, select, snapshot, span, text_block};

    #[test]
    fn decorator_toggle_removes_when_active() {
        let s = select(
            snapshot(vec![text_block("b1", vec![span("s1", "foo", &["strong"])])]),
            point("b1", "s1", 0),
            point("b1", "s1", 3),
        );
        let event: BehaviorEvent = SyntheticEvent::DecoratorToggle {
            decorator: "strong".into(),
        }
        .into();
        let sets = decorator_toggle().run(&s, &event).unwrap();
        assert_eq!(
            sets,
            vec![vec![
                raise(SyntheticEvent::DecoratorRemove {
                    decorator: "strong".into()
                }),
                BehaviorAction::Reselect,
            ]]
        );
    }

    #[test]
    fn style_toggle_adds_when_inactive() {
        let s = select(
            snapshot(vec![text_block("b1", vec![span("s1", "foo", &[])])]),
            point("b1", "s1", 0),
            point("b1", "s1", 0),
        );
        let event: BehaviorEvent = SyntheticEvent::StyleToggle { style: "h1".into() }.into();
        let sets = style_toggle().run(&s, &event).unwrap();
        assert_eq!(sets[0][0], raise(SyntheticEvent::StyleAdd { style: "h1".into() }));
    }
}
