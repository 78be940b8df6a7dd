//! Focus never points past the rendered list.

use super::common::{guide_corpus, Harness, ViewCall};
use proptest::prelude::*;
use sitesearch::{FocusState, Key, KeyOutcome};

#[derive(Debug, Clone)]
enum Action {
    InputKey(Key),
    ResultKey(Key),
    Type(&'static str),
    Slash { from_editable: bool },
    Blur,
}

fn key() -> impl Strategy<Value = Key> {
    prop::sample::select(vec![Key::ArrowDown, Key::ArrowUp, Key::Slash, Key::Other])
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        3 => key().prop_map(Action::InputKey),
        3 => key().prop_map(Action::ResultKey),
        2 => prop::sample::select(vec!["guide", "guide 3", "chapter", "nothing", ""])
            .prop_map(Action::Type),
        1 => any::<bool>().prop_map(|from_editable| Action::Slash { from_editable }),
        1 => Just(Action::Blur),
    ]
}

proptest! {
    #[test]
    fn focus_stays_within_visible_results(actions in prop::collection::vec(action(), 1..40)) {
        let mut h = Harness::new(&guide_corpus(6));
        h.load();

        for action in actions {
            let before = h.widget.borrow().view().calls.len();
            let outcome = match action {
                Action::InputKey(k) => Some(h.input_key(k)),
                Action::ResultKey(k) => {
                    let focused = matches!(h.widget.borrow().focus(), FocusState::Result(_));
                    let outcome = h.result_key(k);
                    if !focused {
                        prop_assert_eq!(outcome, KeyOutcome::Ignored);
                    }
                    Some(outcome)
                }
                Action::Type(text) => {
                    h.keyup(text);
                    None
                }
                Action::Slash { from_editable } => {
                    let outcome = h.widget.borrow_mut().on_global_keydown(Key::Slash, from_editable);
                    prop_assert_eq!(outcome == KeyOutcome::Handled, !from_editable);
                    Some(outcome)
                }
                Action::Blur => {
                    h.widget.borrow_mut().on_blur();
                    None
                }
            };

            let widget = h.widget.borrow();
            let visible = widget.visible_results();
            if let FocusState::Result(i) = widget.focus() {
                prop_assert!(i < visible, "focus Result({}) with {} rows", i, visible);
            }
            for call in &widget.view().calls[before..] {
                if let ViewCall::FocusResult(i) = call {
                    prop_assert!(*i < visible);
                }
            }
            // A handled key always moves focus somewhere.
            if outcome == Some(KeyOutcome::Handled) {
                let moved = widget.view().calls[before..]
                    .iter()
                    .any(|c| matches!(c, ViewCall::FocusInput | ViewCall::FocusResult(_)));
                prop_assert!(moved);
            }
        }
    }
}
