// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The full-text engine seam.
//!
//! The widget never ranks anything itself. It imports partitions into an
//! engine and asks it for enriched hits on one field. Two implementations:
//! - **MemoryEngine**: native, reads the exported partitions directly
//! - **FlexSearchEngine** (`runtime::wasm`): wraps a JS `FlexSearch.Document`

pub mod memory;

pub use memory::{IndexConfig, MemoryEngine};

use crate::error::EngineError;
use crate::types::{Partition, SearchDocument};

/// What the widget asks the engine for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchRequest<'a> {
    pub query: &'a str,
    /// Restrict matching to this indexed field.
    pub field: &'a str,
    pub limit: usize,
    /// Attach the stored document to each hit.
    pub enrich: bool,
}

/// Hits for one field, in rank order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldResults {
    pub field: String,
    pub result: Vec<Hit>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub id: String,
    /// Present when the request asked for enrichment and the id is stored.
    pub doc: Option<SearchDocument>,
}

/// Import-partition plus search-by-query. That's the whole capability.
pub trait SearchEngine {
    /// Import one partition of an exported index. Order of calls is arbitrary.
    fn import(&mut self, partition: Partition, data: serde_json::Value) -> Result<(), EngineError>;

    /// Ranked search. An empty `Vec` means no matches, not an error.
    fn search(&self, request: &SearchRequest<'_>) -> Result<Vec<FieldResults>, EngineError>;
}

impl<E: SearchEngine + ?Sized> SearchEngine for Box<E> {
    fn import(&mut self, partition: Partition, data: serde_json::Value) -> Result<(), EngineError> {
        (**self).import(partition, data)
    }

    fn search(&self, request: &SearchRequest<'_>) -> Result<Vec<FieldResults>, EngineError> {
        (**self).search(request)
    }
}
