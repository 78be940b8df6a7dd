// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query execution against a ready engine.
//!
//! Key events fire constantly without changing the input (arrows, shift,
//! focus), so the one piece of state here is the previous query: asking for
//! the same string twice in a row doesn't reach the engine. A query only
//! becomes the previous one once the engine has answered it.

use crate::engine::{SearchEngine, SearchRequest};
use crate::error::EngineError;
use crate::types::SearchDocument;

#[derive(Debug, Clone)]
pub struct QueryEngine {
    field: String,
    limit: usize,
    /// `None` after a failed search: nothing on screen matches any query.
    last_query: Option<String>,
}

impl QueryEngine {
    pub fn new(field: &str, limit: usize) -> Self {
        Self {
            field: field.to_string(),
            limit,
            last_query: Some(String::new()),
        }
    }

    #[cfg(test)]
    fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    /// Run `query` unless it equals the previous one.
    ///
    /// `Ok(None)` means skipped. `Ok(Some(vec![]))` means searched, no matches.
    /// The previous query starts empty, so an empty input never searches.
    /// On error the previous query is forgotten and the next call searches
    /// whatever it is given.
    pub fn search<E: SearchEngine + ?Sized>(
        &mut self,
        engine: &E,
        query: &str,
    ) -> Result<Option<Vec<SearchDocument>>, EngineError> {
        if self.last_query.as_deref() == Some(query) {
            return Ok(None);
        }

        let request = SearchRequest {
            query,
            field: &self.field,
            limit: self.limit,
            enrich: true,
        };
        let groups = match engine.search(&request) {
            Ok(groups) => groups,
            Err(e) => {
                self.last_query = None;
                return Err(e);
            }
        };
        self.last_query = Some(query.to_string());

        // One indexed field, so at most one group.
        let docs: Vec<SearchDocument> = groups
            .into_iter()
            .next()
            .map(|group| group.result)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|hit| hit.doc)
            .take(self.limit)
            .collect();

        tracing::trace!(query, results = docs.len(), "search");
        Ok(Some(docs))
    }
}
