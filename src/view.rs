// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The surface the widget draws on.
//!
//! In the browser this is the DOM (`runtime::wasm::DomView`). In tests it's
//! a recorder. The widget only ever *writes* to the view; focus state is
//! tracked on our side and the view's focus calls are side effects.

/// One rendered result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultItem {
    /// Position in the rendered list, 0-based. Used for keyboard lookup.
    pub index: usize,
    pub href: String,
    pub page_title: String,
    /// Already prefixed for display, e.g. `" > Installing"`.
    pub section_title: String,
}

pub trait View {
    /// Replace the input's placeholder text.
    fn set_placeholder(&mut self, text: &str);

    /// Replace the whole result list with `items` and unhide it.
    fn show_results(&mut self, items: &[ResultItem]);

    /// Hide the result list. Contents are left alone.
    fn hide_results(&mut self);

    fn focus_input(&mut self);

    fn focus_result(&mut self, index: usize);
}

impl<V: View + ?Sized> View for &mut V {
    fn set_placeholder(&mut self, text: &str) {
        (**self).set_placeholder(text);
    }

    fn show_results(&mut self, items: &[ResultItem]) {
        (**self).show_results(items);
    }

    fn hide_results(&mut self) {
        (**self).hide_results();
    }

    fn focus_input(&mut self) {
        (**self).focus_input();
    }

    fn focus_result(&mut self, index: usize) {
        (**self).focus_result(index);
    }
}
