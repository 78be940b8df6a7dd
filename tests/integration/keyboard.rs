//! Keyboard navigation across the input and the rendered results.

use super::common::{guide_corpus, install_corpus, Harness, ViewCall};
use sitesearch::{FocusState, Key, KeyOutcome};

fn loaded_with(query: &str) -> Harness {
    let mut h = Harness::new(&install_corpus());
    h.load();
    h.keyup(query);
    h
}

#[test]
fn arrow_down_roams_the_list_and_wraps_to_input() {
    let mut h = loaded_with("install");
    assert_eq!(h.widget.borrow().visible_results(), 2);

    assert_eq!(h.input_key(Key::ArrowDown), KeyOutcome::Handled);
    h.widget.borrow_mut().on_result_focus(0);
    assert_eq!(h.result_key(Key::ArrowDown), KeyOutcome::Handled);
    assert_eq!(h.widget.borrow().focus(), FocusState::Result(1));
    assert_eq!(h.result_key(Key::ArrowDown), KeyOutcome::Handled);
    assert_eq!(h.widget.borrow().focus(), FocusState::Input);

    assert_eq!(
        h.focus_calls(),
        vec![
            ViewCall::FocusResult(0),
            ViewCall::FocusResult(1),
            ViewCall::FocusInput,
        ]
    );
}

#[test]
fn arrow_up_from_input_goes_to_last_result() {
    let mut h = loaded_with("install");
    assert_eq!(h.input_key(Key::ArrowUp), KeyOutcome::Handled);
    assert_eq!(h.focus_calls(), vec![ViewCall::FocusResult(1)]);

    h.widget.borrow_mut().on_result_focus(1);
    h.result_key(Key::ArrowUp);
    assert_eq!(h.widget.borrow().focus(), FocusState::Result(0));
    h.result_key(Key::ArrowUp);
    assert_eq!(h.widget.borrow().focus(), FocusState::Input);
}

#[test]
fn arrows_do_nothing_without_results() {
    let mut h = loaded_with("kubernetes");
    assert_eq!(h.input_key(Key::ArrowDown), KeyOutcome::Ignored);
    assert_eq!(h.input_key(Key::ArrowUp), KeyOutcome::Ignored);
    assert!(h.focus_calls().is_empty());
}

#[test]
fn other_keys_pass_through() {
    let mut h = loaded_with("install");
    assert_eq!(h.input_key(Key::Other), KeyOutcome::Ignored);
    h.input_key(Key::ArrowDown);
    h.widget.borrow_mut().on_result_focus(0);
    assert_eq!(h.result_key(Key::Other), KeyOutcome::Ignored);
    assert_eq!(h.widget.borrow().focus(), FocusState::Result(0));
}

#[test]
fn slash_jumps_to_the_input_unless_typing() {
    let mut h = loaded_with("install");
    h.widget.borrow_mut().on_blur();

    let outcome = h.widget.borrow_mut().on_global_keydown(Key::Slash, true);
    assert_eq!(outcome, KeyOutcome::Ignored);
    assert_eq!(h.widget.borrow().focus(), FocusState::Unfocused);

    let outcome = h.widget.borrow_mut().on_global_keydown(Key::Slash, false);
    assert_eq!(outcome, KeyOutcome::Handled);
    assert_eq!(h.widget.borrow().focus(), FocusState::Input);
    assert_eq!(h.focus_calls(), vec![ViewCall::FocusInput]);
}

#[test]
fn shrinking_results_drops_a_stale_result_focus() {
    let mut h = loaded_with("install");
    h.input_key(Key::ArrowUp);
    assert_eq!(h.widget.borrow().focus(), FocusState::Result(1));

    // Only the first page mentions cargo.
    h.keyup("cargo");
    assert_eq!(h.widget.borrow().visible_results(), 1);
    assert_eq!(h.widget.borrow().focus(), FocusState::Unfocused);
}

#[test]
fn navigation_respects_the_current_list_length() {
    let mut h = Harness::new(&guide_corpus(5));
    h.load();
    h.keyup("guide");
    h.input_key(Key::ArrowUp);
    assert_eq!(h.widget.borrow().focus(), FocusState::Result(4));

    h.keyup("kubernetes");
    assert_eq!(h.input_key(Key::ArrowDown), KeyOutcome::Ignored);
}
