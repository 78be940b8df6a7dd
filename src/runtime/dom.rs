// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! What the browser layer writes into the page and reads back out of it.
//!
//! `DomView` turns these descriptions into real elements; keeping them
//! here means markup, selectors and target checks run under native tests.

use crate::view::ResultItem;

/// Class toggled on the result container.
pub const HIDDEN_CLASS: &str = "hidden";

/// `data-*` key carrying a result's position in the list.
const INDEX_KEY: &str = "index";

/// An element to create: one optional class, attributes, text, children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewElement {
    pub tag: &'static str,
    pub class: Option<&'static str>,
    pub attributes: Vec<(&'static str, String)>,
    pub text: Option<String>,
    pub children: Vec<NewElement>,
}

impl NewElement {
    fn new(tag: &'static str) -> Self {
        Self {
            tag,
            class: None,
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    fn class(mut self, class: &'static str) -> Self {
        self.class = Some(class);
        self
    }

    fn attribute(mut self, name: &'static str, value: String) -> Self {
        self.attributes.push((name, value));
        self
    }

    fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    fn child(mut self, child: NewElement) -> Self {
        self.children.push(child);
        self
    }

    #[cfg(test)]
    fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// `<li class="suggestion"><a href data-index><span class="page-title">
/// <span class="section-title"></a></li>`
///
/// Titles go in as text, never as markup.
pub fn result_entry(item: &ResultItem) -> NewElement {
    let link = NewElement::new("a")
        .attribute("href", item.href.clone())
        .attribute("data-index", item.index.to_string())
        .child(NewElement::new("span").class("page-title").text(&item.page_title))
        .child(
            NewElement::new("span")
                .class("section-title")
                .text(&item.section_title),
        );
    NewElement::new("li").class("suggestion").child(link)
}

/// Selector for the link rendered at `index`.
pub fn result_selector(index: usize) -> String {
    format!("a[data-{}=\"{}\"]", INDEX_KEY, index)
}

/// Reads back what [`result_entry`] stored in the link's dataset.
pub fn result_index(dataset: &impl Fn(&str) -> Option<String>) -> Option<usize> {
    dataset(INDEX_KEY)?.parse().ok()
}

/// Typing into something? Then `/` is a character, not a shortcut.
pub fn is_editable(tag_name: &str, content_editable: bool) -> bool {
    content_editable
        || ["INPUT", "TEXTAREA", "SELECT"]
            .iter()
            .any(|tag| tag.eq_ignore_ascii_case(tag_name))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Input,
    Result(usize),
}

/// Focus requested while the widget is borrowed, applied once it's released.
///
/// `element.focus()` fires focus handlers synchronously and those handlers
/// borrow the widget again, so the view only records the target.
#[derive(Debug, Default)]
pub struct DeferredFocus {
    pending: Option<FocusTarget>,
}

impl DeferredFocus {
    /// Later requests replace earlier ones.
    pub fn request(&mut self, target: FocusTarget) {
        self.pending = Some(target);
    }

    pub fn take(&mut self) -> Option<FocusTarget> {
        self.pending.take()
    }
}
