//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides canonical implementations of test helpers to avoid duplication:
//! documents, a partition exporter for fixtures, an engine that counts calls,
//! and a view that records what it was told to do.

#![doc(hidden)]

use crate::engine::{FieldResults, MemoryEngine, SearchEngine, SearchRequest};
use crate::error::EngineError;
use crate::types::{Partition, SearchDocument};
use crate::utils::normalize;
use crate::view::{ResultItem, View};
use serde_json::{json, Map, Value};
use std::cell::Cell;
use std::collections::HashMap;
use std::path::Path;

/// Resolution and minimum term length used by [`export_fixture`].
pub const FIXTURE_RESOLUTION: usize = 9;
pub const FIXTURE_MIN_LENGTH: usize = 3;

/// Create a test document. The href anchor is the slugged title.
///
/// This is the canonical implementation used across all tests.
pub fn make_doc(id: usize, title: &str, content: &str) -> SearchDocument {
    let slug = title.to_lowercase().replace(' ', "-");
    SearchDocument {
        id: id.to_string(),
        title: title.to_string(),
        page_title: format!("Page {}", id),
        href: format!("/doc/{}#{}", id, slug),
        content: content.to_string(),
    }
}

// ============================================================================
// FIXTURE EXPORT
// ============================================================================

/// The five partitions of a fixture index, as JSON values.
#[derive(Debug, Clone)]
pub struct Export {
    parts: HashMap<Partition, Value>,
}

impl Export {
    pub fn get(&self, partition: Partition) -> Value {
        self.parts[&partition].clone()
    }

    pub fn body(&self, partition: Partition) -> String {
        self.parts[&partition].to_string()
    }

    /// Write `<key>.json` for every partition into `dir`.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<()> {
        for partition in Partition::ALL {
            std::fs::write(dir.join(partition.file_name()), self.body(partition))?;
        }
        Ok(())
    }
}

fn id_value(id: &str) -> Value {
    match id.parse::<u64>() {
        Ok(n) => json!(n),
        Err(_) => json!(id),
    }
}

fn push_id(ids: &mut Value, id: &Value) {
    if let Some(list) = ids.as_array_mut() {
        if !list.contains(id) {
            list.push(id.clone());
        }
    }
}

/// Export `docs` the way the site generator would: forward-tokenized
/// content, word position as score slot, adjacent words as context.
pub fn export_fixture(docs: &[SearchDocument]) -> Export {
    let mut map: Vec<Map<String, Value>> = vec![Map::new(); FIXTURE_RESOLUTION];
    let mut ctx: Vec<Map<String, Value>> = vec![Map::new(); FIXTURE_RESOLUTION];
    let mut reg = Map::new();
    let mut store = Map::new();

    for doc in docs {
        let id = id_value(&doc.id);
        reg.insert(doc.id.clone(), json!(1));
        store.insert(
            doc.id.clone(),
            json!({"title": doc.title, "pagetitle": doc.page_title, "ref": doc.href}),
        );

        let normalized = normalize(&doc.content);
        let words: Vec<&str> = normalized
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.chars().count() >= FIXTURE_MIN_LENGTH)
            .collect();

        for (position, word) in words.iter().enumerate() {
            let slot = position.min(FIXTURE_RESOLUTION - 1);
            let chars: Vec<char> = word.chars().collect();
            for end in FIXTURE_MIN_LENGTH..=chars.len() {
                let prefix: String = chars[..end].iter().collect();
                let ids = map[slot].entry(prefix).or_insert_with(|| json!([]));
                push_id(ids, &id);
            }
            if let Some(next) = words.get(position + 1) {
                let keyword = ctx[slot]
                    .entry(word.to_string())
                    .or_insert_with(|| json!({}));
                if let Some(keyword) = keyword.as_object_mut() {
                    let ids = keyword.entry(next.to_string()).or_insert_with(|| json!([]));
                    push_id(ids, &id);
                }
            }
        }
    }

    let parts = HashMap::from([
        (
            Partition::ContentCfg,
            json!({"res": FIXTURE_RESOLUTION, "minlength": FIXTURE_MIN_LENGTH}),
        ),
        (Partition::ContentCtx, Value::from(ctx.into_iter().map(Value::Object).collect::<Vec<_>>())),
        (Partition::ContentMap, Value::from(map.into_iter().map(Value::Object).collect::<Vec<_>>())),
        (Partition::Reg, Value::Object(reg)),
        (Partition::Store, Value::Object(store)),
    ]);
    Export { parts }
}

// ============================================================================
// COUNTING ENGINE
// ============================================================================

/// [`MemoryEngine`] that counts imports and searches, and can be told to
/// fail the next few searches.
#[derive(Debug, Default)]
pub struct CountingEngine {
    inner: MemoryEngine,
    imports: usize,
    searches: Cell<usize>,
    failures: Cell<usize>,
}

impl CountingEngine {
    pub fn imports(&self) -> usize {
        self.imports
    }

    pub fn searches(&self) -> usize {
        self.searches.get()
    }

    pub fn inner(&self) -> &MemoryEngine {
        &self.inner
    }

    /// The next `n` searches return [`EngineError::Backend`]. They still count.
    pub fn fail_next_searches(&self, n: usize) {
        self.failures.set(n);
    }
}

impl SearchEngine for CountingEngine {
    fn import(&mut self, partition: Partition, data: Value) -> Result<(), EngineError> {
        self.inner.import(partition, data)?;
        self.imports += 1;
        Ok(())
    }

    fn search(&self, request: &SearchRequest<'_>) -> Result<Vec<FieldResults>, EngineError> {
        self.searches.set(self.searches.get() + 1);
        let failures = self.failures.get();
        if failures > 0 {
            self.failures.set(failures - 1);
            return Err(EngineError::Backend("injected search failure".to_string()));
        }
        self.inner.search(request)
    }
}

/// A counting engine with every partition of `docs` already imported.
pub fn loaded_engine(docs: &[SearchDocument]) -> CountingEngine {
    let export = export_fixture(docs);
    let mut engine = CountingEngine::default();
    for partition in Partition::ALL {
        engine
            .import(partition, export.get(partition))
            .expect("fixture export imports cleanly");
    }
    engine
}

// ============================================================================
// RECORDING VIEW
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCall {
    Placeholder(String),
    Show(Vec<ResultItem>),
    Hide,
    FocusInput,
    FocusResult(usize),
}

/// View that remembers every call and the resulting state.
#[derive(Debug, Default)]
pub struct RecordingView {
    pub calls: Vec<ViewCall>,
    pub placeholder: String,
    pub items: Vec<ResultItem>,
    pub hidden: bool,
}

impl RecordingView {
    /// Items currently on screen, if the panel is visible.
    pub fn shown(&self) -> Option<&[ResultItem]> {
        (!self.hidden && !self.items.is_empty()).then_some(self.items.as_slice())
    }

    pub fn focus_calls(&self) -> Vec<ViewCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, ViewCall::FocusInput | ViewCall::FocusResult(_)))
            .cloned()
            .collect()
    }

    pub fn placeholders(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ViewCall::Placeholder(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl View for RecordingView {
    fn set_placeholder(&mut self, text: &str) {
        self.placeholder = text.to_string();
        self.calls.push(ViewCall::Placeholder(text.to_string()));
    }

    fn show_results(&mut self, items: &[ResultItem]) {
        self.items = items.to_vec();
        self.hidden = false;
        self.calls.push(ViewCall::Show(items.to_vec()));
    }

    fn hide_results(&mut self) {
        self.hidden = true;
        self.calls.push(ViewCall::Hide);
    }

    fn focus_input(&mut self) {
        self.calls.push(ViewCall::FocusInput);
    }

    fn focus_result(&mut self, index: usize) {
        self.calls.push(ViewCall::FocusResult(index));
    }
}
