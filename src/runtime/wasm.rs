// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! WebAssembly bindings for the search widget.
//!
//! This is the browser-facing API. One call wires everything:
//!
//! ```js
//! import init, { initSearch } from './sitesearch.js';
//! await init();
//! initSearch({ basePath: '/search-data' });
//! ```
//!
//! Pass a `FlexSearch.Document` as the second argument to rank with it
//! instead of the built-in engine:
//!
//! ```js
//! initSearch({}, new FlexSearch.Document({ document: { id: 'id', ... } }));
//! ```
//!
//! # Reentrancy
//!
//! `element.focus()` dispatches focus events synchronously, and those
//! handlers need the widget. So the view never focuses anything while the
//! widget is borrowed; it records the target and the handler applies it
//! after the borrow is released.
//!
//! # Logging
//!
//! Mounting installs a `tracing` subscriber that writes warnings and errors
//! to the browser console.

use super::console::{ConsoleLine, ConsoleMethod};
use super::dom::{self, DeferredFocus, NewElement, FocusTarget, HIDDEN_CLASS};
use crate::config::WidgetConfig;
use crate::engine::{FieldResults, Hit, MemoryEngine, SearchEngine, SearchRequest};
use crate::error::EngineError;
use crate::loader::{FetchedBody, IndexLoader, PartitionSource, Timer};
use crate::nav::{Key, KeyOutcome};
use crate::types::{Partition, RawId, SearchDocument};
use crate::view::{ResultItem, View};
use crate::widget::{PipelineOutcome, SearchWidget};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    Document, Element, Event, HtmlElement, HtmlInputElement, KeyboardEvent,
    Response, Window,
};

fn js_error(value: JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}

// ============================================================================
// CONSOLE LOGGING
// ============================================================================

/// Hands the formatter one buffer per event, sent to the console on drop.
struct ConsoleWriter;

struct ConsoleSink(ConsoleLine);

impl io::Write for ConsoleSink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0.write(data)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

impl Drop for ConsoleSink {
    fn drop(&mut self) {
        let Some((method, text)) = self.0.finish() else {
            return;
        };
        let text = JsValue::from_str(&text);
        match method {
            ConsoleMethod::Error => web_sys::console::error_1(&text),
            ConsoleMethod::Warn => web_sys::console::warn_1(&text),
            ConsoleMethod::Info => web_sys::console::info_1(&text),
            ConsoleMethod::Debug => web_sys::console::debug_1(&text),
        }
    }
}

impl<'a> MakeWriter<'a> for ConsoleWriter {
    type Writer = ConsoleSink;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleSink(ConsoleLine::new(ConsoleMethod::Info))
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        ConsoleSink(ConsoleLine::new(ConsoleMethod::for_level(meta.level())))
    }
}

/// Route `tracing` warnings and errors to the console. First call wins.
fn install_console_logging() {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(ConsoleWriter)
        .with_max_level(tracing::Level::WARN)
        .without_time()
        .with_ansi(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

// ============================================================================
// FLEXSEARCH ENGINE
// ============================================================================

#[wasm_bindgen]
extern "C" {
    /// A `FlexSearch.Document` instance constructed by the page.
    pub type FlexDocument;

    #[wasm_bindgen(method, catch, js_name = "import")]
    fn import_partition(this: &FlexDocument, key: &str, data: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = "search")]
    fn search_with(this: &FlexDocument, query: &str, options: &JsValue) -> Result<JsValue, JsValue>;
}

#[derive(Serialize)]
struct JsSearchOptions<'a> {
    index: &'a str,
    limit: usize,
    enrich: bool,
}

#[derive(Deserialize)]
struct JsFieldResult {
    field: String,
    result: Vec<JsHit>,
}

#[derive(Deserialize)]
struct JsHit {
    id: RawId,
    #[serde(default)]
    doc: Option<SearchDocument>,
}

/// [`SearchEngine`] over a JavaScript `FlexSearch.Document`.
pub struct FlexSearchEngine {
    inner: FlexDocument,
}

impl FlexSearchEngine {
    pub fn new(inner: FlexDocument) -> Self {
        Self { inner }
    }
}

impl SearchEngine for FlexSearchEngine {
    fn import(&mut self, partition: Partition, data: serde_json::Value) -> Result<(), EngineError> {
        let value = data
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| EngineError::Backend(e.to_string()))?;
        self.inner
            .import_partition(partition.key(), &value)
            .map_err(|e| EngineError::Backend(js_error(e)))?;
        Ok(())
    }

    fn search(&self, request: &SearchRequest<'_>) -> Result<Vec<FieldResults>, EngineError> {
        let options = JsSearchOptions {
            index: request.field,
            limit: request.limit,
            enrich: request.enrich,
        }
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| EngineError::Backend(e.to_string()))?;

        web_sys::console::time_with_label("search");
        let raw = self.inner.search_with(request.query, &options);
        web_sys::console::time_end_with_label("search");

        let raw = raw.map_err(|e| EngineError::Backend(js_error(e)))?;
        let groups: Vec<JsFieldResult> =
            serde_wasm_bindgen::from_value(raw).map_err(|e| EngineError::Backend(e.to_string()))?;

        Ok(groups
            .into_iter()
            .map(|group| FieldResults {
                field: group.field,
                result: group
                    .result
                    .into_iter()
                    .map(|hit| {
                        let id = String::from(hit.id);
                        let doc = hit.doc.map(|mut doc| {
                            doc.id.clone_from(&id);
                            doc
                        });
                        Hit { id, doc }
                    })
                    .collect(),
            })
            .collect())
    }
}

/// Built-in engine with the same `console.time` bracket as the JS one.
struct TimedMemoryEngine(MemoryEngine);

impl SearchEngine for TimedMemoryEngine {
    fn import(&mut self, partition: Partition, data: serde_json::Value) -> Result<(), EngineError> {
        self.0.import(partition, data)
    }

    fn search(&self, request: &SearchRequest<'_>) -> Result<Vec<FieldResults>, EngineError> {
        web_sys::console::time_with_label("search");
        let results = self.0.search(request);
        web_sys::console::time_end_with_label("search");
        results
    }
}

// ============================================================================
// FETCH + TIMER
// ============================================================================

pub struct FetchSource {
    window: Window,
}

impl PartitionSource for FetchSource {
    async fn fetch(&self, url: &str) -> Result<FetchedBody, String> {
        let response = JsFuture::from(self.window.fetch_with_str(url))
            .await
            .map_err(js_error)?;
        let response: Response = response.dyn_into().map_err(js_error)?;
        let status = response.status();
        let text = response.text().map_err(js_error)?;
        let body = JsFuture::from(text)
            .await
            .map_err(js_error)?
            .as_string()
            .unwrap_or_default();
        Ok(FetchedBody { status, body })
    }
}

/// `setTimeout` as a future.
pub struct TimeoutTimer;

impl Timer for TimeoutTimer {
    async fn sleep(&self, ms: u32) {
        let timeout = i32::try_from(ms).unwrap_or(i32::MAX);
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            let scheduled = web_sys::window().map(|window| {
                window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, timeout)
            });
            if !matches!(scheduled, Some(Ok(_))) {
                let _ = resolve.call0(&JsValue::NULL);
            }
        });
        let _ = JsFuture::from(promise).await;
    }
}

// ============================================================================
// DOM VIEW
// ============================================================================

pub struct DomView {
    document: Document,
    input: HtmlInputElement,
    container: HtmlElement,
    focus: DeferredFocus,
}

impl DomView {
    fn create(&self, node: &NewElement) -> Result<Element, JsValue> {
        let element = self.document.create_element(node.tag)?;
        if let Some(class) = node.class {
            element.class_list().add_1(class)?;
        }
        for (name, value) in &node.attributes {
            element.set_attribute(name, value)?;
        }
        if let Some(text) = &node.text {
            element.set_text_content(Some(text));
        }
        for child in &node.children {
            let child_element = self.create(child)?;
            element.append_child(&child_element)?;
        }
        Ok(element)
    }

    fn replace_items(&self, items: &[ResultItem]) -> Result<(), JsValue> {
        self.container.class_list().remove_1(HIDDEN_CLASS)?;
        self.container.set_text_content(None);
        for item in items {
            let entry = self.create(&dom::result_entry(item))?;
            self.container.append_child(&entry)?;
        }
        Ok(())
    }

    /// Element the widget asked to focus, resolved now, focused later.
    fn take_pending_focus(&mut self) -> Option<HtmlElement> {
        match self.focus.take()? {
            FocusTarget::Input => Some(self.input.clone().into()),
            FocusTarget::Result(index) => {
                match self.container.query_selector(&dom::result_selector(index)) {
                    Ok(Some(link)) => link.dyn_into::<HtmlElement>().ok(),
                    Ok(None) => None,
                    Err(e) => {
                        tracing::warn!(error = %js_error(e), index, "bad result selector");
                        None
                    }
                }
            }
        }
    }
}

impl View for DomView {
    fn set_placeholder(&mut self, text: &str) {
        if let Err(e) = self.input.set_attribute("placeholder", text) {
            tracing::warn!(error = %js_error(e), "could not set placeholder");
        }
    }

    fn show_results(&mut self, items: &[ResultItem]) {
        if let Err(e) = self.replace_items(items) {
            tracing::warn!(error = %js_error(e), "could not render results");
        }
    }

    fn hide_results(&mut self) {
        if let Err(e) = self.container.class_list().add_1(HIDDEN_CLASS) {
            tracing::warn!(error = %js_error(e), "could not hide results");
        }
    }

    fn focus_input(&mut self) {
        self.focus.request(FocusTarget::Input);
    }

    fn focus_result(&mut self, index: usize) {
        self.focus.request(FocusTarget::Result(index));
    }
}

// ============================================================================
// WIRING
// ============================================================================

type DomWidget = SearchWidget<Box<dyn SearchEngine>, DomView>;

struct Mounted {
    widget: Rc<RefCell<DomWidget>>,
    loader: IndexLoader<FetchSource, TimeoutTimer>,
    input: HtmlInputElement,
}

impl Mounted {
    fn input_value(&self) -> String {
        self.input.value()
    }

    /// Spawn loads and apply deferred focus. Must run with the widget unborrowed.
    fn settle(&self, outcome: Option<PipelineOutcome>) {
        if let Some(PipelineOutcome::LoadStarted(plan)) = outcome {
            for task in self.loader.tasks(&self.widget, plan) {
                spawn_local(task);
            }
        }
        let pending = self.widget.borrow_mut().view_mut().take_pending_focus();
        if let Some(element) = pending {
            if let Err(e) = element.focus() {
                tracing::warn!(error = %js_error(e), "could not move focus");
            }
        }
    }
}

/// Index attached to a rendered result link, if `target` is one.
fn result_index(target: Option<web_sys::EventTarget>) -> Option<usize> {
    let dataset = target?.dyn_into::<HtmlElement>().ok()?.dataset();
    dom::result_index(&|key: &str| dataset.get(key))
}

fn is_editable(target: Option<web_sys::EventTarget>) -> bool {
    target
        .and_then(|t| t.dyn_into::<HtmlElement>().ok())
        .is_some_and(|element| dom::is_editable(&element.tag_name(), element.is_content_editable()))
}

fn listen<T, F>(target: &web_sys::EventTarget, event: &str, handler: F) -> Result<(), JsValue>
where
    T: FromWasmAbi + 'static,
    F: FnMut(T) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(T)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    // Listeners live as long as the page.
    closure.forget();
    Ok(())
}

fn mount(config: WidgetConfig, engine: Box<dyn SearchEngine>) -> Result<Rc<Mounted>, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let input: HtmlInputElement = document
        .get_element_by_id(&config.input_id)
        .ok_or_else(|| JsValue::from_str(&format!("#{} not found", config.input_id)))?
        .dyn_into()?;
    let container: HtmlElement = document
        .get_element_by_id(&config.results_id)
        .ok_or_else(|| JsValue::from_str(&format!("#{} not found", config.results_id)))?
        .dyn_into()?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("no body"))?;

    let view = DomView {
        document: document.clone(),
        input: input.clone(),
        container: container.clone(),
        focus: DeferredFocus::default(),
    };
    let widget = SearchWidget::new(config, engine, view)
        .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?;

    let mounted = Rc::new(Mounted {
        widget: Rc::new(RefCell::new(widget)),
        loader: IndexLoader::new(FetchSource { window }, TimeoutTimer),
        input: input.clone(),
    });

    {
        let m = Rc::clone(&mounted);
        listen(&input, "keyup", move |ev: KeyboardEvent| {
            let value = m.input_value();
            let outcome = m.widget.borrow_mut().on_input_keyup(&value, ev.is_composing());
            m.settle(Some(outcome));
        })?;
    }
    {
        let m = Rc::clone(&mounted);
        listen(&input, "keydown", move |ev: KeyboardEvent| {
            let outcome = m.widget.borrow_mut().on_input_keydown(Key::from_name(&ev.key()));
            if outcome.prevent_default() {
                ev.prevent_default();
            }
            m.settle(None);
        })?;
    }
    {
        let m = Rc::clone(&mounted);
        listen(&input, "focus", move |_: Event| {
            let value = m.input_value();
            let outcome = m.widget.borrow_mut().on_input_focus(&value);
            m.settle(Some(outcome));
        })?;
    }
    {
        let m = Rc::clone(&mounted);
        listen(&input, "blur", move |_: Event| {
            m.widget.borrow_mut().on_blur();
        })?;
    }
    {
        let m = Rc::clone(&mounted);
        listen(&container, "focusin", move |ev: Event| {
            if let Some(index) = result_index(ev.target()) {
                m.widget.borrow_mut().on_result_focus(index);
            }
        })?;
    }
    {
        let m = Rc::clone(&mounted);
        listen(&container, "focusout", move |_: Event| {
            m.widget.borrow_mut().on_blur();
        })?;
    }
    {
        let m = Rc::clone(&mounted);
        listen(&container, "keydown", move |ev: KeyboardEvent| {
            if result_index(ev.target()).is_none() {
                return;
            }
            let outcome = m.widget.borrow_mut().on_result_keydown(Key::from_name(&ev.key()));
            if outcome.prevent_default() {
                ev.prevent_default();
            }
            m.settle(None);
        })?;
    }
    {
        let m = Rc::clone(&mounted);
        listen(&body, "keydown", move |ev: KeyboardEvent| {
            let outcome = m
                .widget
                .borrow_mut()
                .on_global_keydown(Key::from_name(&ev.key()), is_editable(ev.target()));
            if outcome == KeyOutcome::Handled {
                ev.prevent_default();
            }
            m.settle(None);
        })?;
    }

    Ok(mounted)
}

fn parse_config(config: JsValue) -> Result<WidgetConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        return Ok(WidgetConfig::default());
    }
    serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))
}

fn build_engine(config: &WidgetConfig, engine: Option<FlexDocument>) -> Box<dyn SearchEngine> {
    match engine {
        Some(doc) => Box::new(FlexSearchEngine::new(doc)),
        None => Box::new(TimedMemoryEngine(MemoryEngine::with_field(&config.field))),
    }
}

/// Handle to a mounted widget.
#[wasm_bindgen]
pub struct SearchWidgetHandle {
    mounted: Rc<Mounted>,
}

#[wasm_bindgen]
impl SearchWidgetHandle {
    /// `"uninitialized"`, `"loading"`, `"ready"` or `"failed"`.
    pub fn state(&self) -> String {
        self.mounted.widget.borrow().state().label().to_string()
    }

    #[wasm_bindgen(js_name = "visibleResults")]
    pub fn visible_results(&self) -> usize {
        self.mounted.widget.borrow().visible_results()
    }

    /// Start loading now instead of on first use.
    pub fn preload(&self) {
        let plan = self.mounted.widget.borrow_mut().ensure_loaded();
        self.mounted.settle(plan.map(PipelineOutcome::LoadStarted));
    }
}

/// Mount the widget on the current document. The elements must exist.
#[wasm_bindgen(js_name = "mount")]
pub fn mount_widget(
    config: JsValue,
    engine: Option<FlexDocument>,
) -> Result<SearchWidgetHandle, JsValue> {
    install_console_logging();
    let config = parse_config(config)?;
    let engine = build_engine(&config, engine);
    let mounted = mount(config, engine)?;
    Ok(SearchWidgetHandle { mounted })
}

/// Mount the widget now, or on `DOMContentLoaded` if the page is still loading.
///
/// `config` is optional; see `WidgetConfig` for keys. `engine` is an
/// optional `FlexSearch.Document`; without it the built-in engine is used.
#[wasm_bindgen(js_name = "initSearch")]
pub fn init_search(config: JsValue, engine: Option<FlexDocument>) -> Result<(), JsValue> {
    install_console_logging();
    let config = parse_config(config)?;
    let engine = build_engine(&config, engine);

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    if document.ready_state() != "loading" {
        return mount(config, engine).map(drop);
    }

    let mut pending = Some((config, engine));
    listen(&document, "DOMContentLoaded", move |_: Event| {
        if let Some((config, engine)) = pending.take() {
            if let Err(e) = mount(config, engine) {
                web_sys::console::error_1(&e);
            }
        }
    })
}
