// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Result rendering.
//!
//! Full replacement every time, no diffing. An empty result hides the
//! panel instead of showing an empty box.

use crate::types::SearchDocument;
use crate::view::{ResultItem, View};

/// Separator between page title and section title.
pub const SECTION_PREFIX: &str = " > ";

#[derive(Debug, Clone)]
pub struct ResultRenderer {
    display_limit: usize,
    visible: usize,
}

impl ResultRenderer {
    pub fn new(display_limit: usize) -> Self {
        Self {
            display_limit,
            visible: 0,
        }
    }

    /// Rows currently shown. Zero while the panel is hidden.
    pub fn visible(&self) -> usize {
        self.visible
    }

    /// Build display rows, capped and in rank order.
    pub fn items(&self, results: &[SearchDocument]) -> Vec<ResultItem> {
        results
            .iter()
            .take(self.display_limit)
            .enumerate()
            .map(|(index, doc)| ResultItem {
                index,
                href: doc.href.clone(),
                page_title: doc.page_title.clone(),
                section_title: format!("{}{}", SECTION_PREFIX, doc.title),
            })
            .collect()
    }

    pub fn render<V: View + ?Sized>(&mut self, view: &mut V, results: &[SearchDocument]) {
        if results.is_empty() {
            self.hide(view);
            return;
        }
        let items = self.items(results);
        self.visible = items.len();
        view.show_results(&items);
    }

    pub fn hide<V: View + ?Sized>(&mut self, view: &mut V) {
        self.visible = 0;
        view.hide_results();
    }
}
