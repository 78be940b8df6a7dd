// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Keyboard navigation: a roving-focus state machine.
//!
//! Focus is tracked here, not read back from the DOM. Every transition
//! updates `FocusState` first and then asks the view to move focus.
//!
//! ```text
//!             ArrowDown (first)          ArrowDown (i+1)
//!   Input ───────────────────▶ Result(0) ──────────────▶ Result(1) ...
//!     ▲  ArrowUp (last)                                     │
//!     └──────────────── ArrowDown past end / ArrowUp before start
//! ```
//!
//! Falling off either end of the list goes back to the input, never around
//! to the other end of the list.

use crate::view::View;

/// Keys the widget cares about. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Slash,
    Other,
}

impl Key {
    /// From a `KeyboardEvent.key` value.
    pub fn from_name(name: &str) -> Key {
        match name {
            "ArrowDown" | "Down" => Key::ArrowDown,
            "ArrowUp" | "Up" => Key::ArrowUp,
            "/" => Key::Slash,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusState {
    #[default]
    Unfocused,
    Input,
    Result(usize),
}

/// Whether the host should call `preventDefault()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    Ignored,
}

impl KeyOutcome {
    pub fn prevent_default(self) -> bool {
        self == KeyOutcome::Handled
    }
}

#[derive(Debug, Clone, Default)]
pub struct NavigationController {
    focus: FocusState,
}

impl NavigationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self) -> FocusState {
        self.focus
    }

    /// The input gained focus (click, tab, or our own `focus_input`).
    pub fn input_focused(&mut self) {
        self.focus = FocusState::Input;
    }

    /// A result link gained focus by any means.
    pub fn result_focused(&mut self, index: usize) {
        self.focus = FocusState::Result(index);
    }

    /// Focus left the widget.
    pub fn blurred(&mut self) {
        self.focus = FocusState::Unfocused;
    }

    /// The result list was replaced or hidden. A focused link that no longer
    /// exists has lost DOM focus.
    pub fn results_changed(&mut self, visible: usize) {
        if let FocusState::Result(i) = self.focus {
            if i >= visible {
                self.focus = FocusState::Unfocused;
            }
        }
    }

    fn move_to_input<V: View + ?Sized>(&mut self, view: &mut V) {
        self.focus = FocusState::Input;
        view.focus_input();
    }

    fn move_to_result<V: View + ?Sized>(&mut self, view: &mut V, index: usize) {
        self.focus = FocusState::Result(index);
        view.focus_result(index);
    }

    /// Keydown inside the input. `visible` is the number of rendered results.
    pub fn input_keydown<V: View + ?Sized>(
        &mut self,
        view: &mut V,
        key: Key,
        visible: usize,
    ) -> KeyOutcome {
        self.focus = FocusState::Input;
        if visible == 0 {
            return KeyOutcome::Ignored;
        }
        match key {
            Key::ArrowDown => {
                self.move_to_result(view, 0);
                KeyOutcome::Handled
            }
            Key::ArrowUp => {
                self.move_to_result(view, visible - 1);
                KeyOutcome::Handled
            }
            _ => KeyOutcome::Ignored,
        }
    }

    /// Keydown on a focused result link.
    pub fn result_keydown<V: View + ?Sized>(
        &mut self,
        view: &mut V,
        key: Key,
        visible: usize,
    ) -> KeyOutcome {
        let FocusState::Result(current) = self.focus else {
            return KeyOutcome::Ignored;
        };
        match key {
            Key::ArrowDown => {
                if current + 1 < visible {
                    self.move_to_result(view, current + 1);
                } else {
                    self.move_to_input(view);
                }
                KeyOutcome::Handled
            }
            Key::ArrowUp => {
                if current > 0 && current - 1 < visible {
                    self.move_to_result(view, current - 1);
                } else {
                    self.move_to_input(view);
                }
                KeyOutcome::Handled
            }
            _ => KeyOutcome::Ignored,
        }
    }

    /// Keydown anywhere on the page. `/` jumps to the search box unless the
    /// user is already typing into something editable.
    pub fn global_keydown<V: View + ?Sized>(
        &mut self,
        view: &mut V,
        key: Key,
        from_editable: bool,
    ) -> KeyOutcome {
        if key != Key::Slash || from_editable {
            return KeyOutcome::Ignored;
        }
        self.move_to_input(view);
        KeyOutcome::Handled
    }
}
