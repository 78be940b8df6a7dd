// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Widget configuration.
//!
//! Defaults match the markup the site generator emits, so most pages pass
//! nothing. Field names are camelCase because the usual source is a JS object.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_PATH: &str = "/search-data";
pub const DEFAULT_INPUT_ID: &str = "search-input";
pub const DEFAULT_RESULTS_ID: &str = "search-result-container";

/// Engine-side cap on results per query.
pub const DEFAULT_QUERY_LIMIT: usize = 10;
/// Layout cap on rendered items. Tighter than the query cap on purpose.
pub const DEFAULT_DISPLAY_LIMIT: usize = 9;
/// Pause between the final import and `Ready`, so the placeholder doesn't flash.
pub const DEFAULT_READY_DELAY_MS: u32 = 100;
/// The one indexed field.
pub const DEFAULT_FIELD: &str = "content";

pub const PLACEHOLDER_LOADING: &str = "Loading...";
pub const PLACEHOLDER_READY: &str = "Search...";
pub const PLACEHOLDER_ERROR: &str = "Error loading search index.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetConfig {
    /// Directory (URL path) holding the partition files.
    pub base_path: String,
    pub input_id: String,
    pub results_id: String,
    pub query_limit: usize,
    pub display_limit: usize,
    pub ready_delay_ms: u32,
    pub field: String,
    pub placeholders: Placeholders,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placeholders {
    pub loading: String,
    pub ready: String,
    pub error: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_BASE_PATH.to_string(),
            input_id: DEFAULT_INPUT_ID.to_string(),
            results_id: DEFAULT_RESULTS_ID.to_string(),
            query_limit: DEFAULT_QUERY_LIMIT,
            display_limit: DEFAULT_DISPLAY_LIMIT,
            ready_delay_ms: DEFAULT_READY_DELAY_MS,
            field: DEFAULT_FIELD.to_string(),
            placeholders: Placeholders::default(),
        }
    }
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            loading: PLACEHOLDER_LOADING.to_string(),
            ready: PLACEHOLDER_READY.to_string(),
            error: PLACEHOLDER_ERROR.to_string(),
        }
    }
}

impl WidgetConfig {
    /// Parse from JSON; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input_id.is_empty() {
            return Err(ConfigError::Empty("inputId"));
        }
        if self.results_id.is_empty() {
            return Err(ConfigError::Empty("resultsId"));
        }
        if self.field.is_empty() {
            return Err(ConfigError::Empty("field"));
        }
        if self.query_limit == 0 {
            return Err(ConfigError::Zero("queryLimit"));
        }
        if self.display_limit == 0 {
            return Err(ConfigError::Zero("displayLimit"));
        }
        if self.display_limit > self.query_limit {
            return Err(ConfigError::DisplayExceedsQuery {
                display: self.display_limit,
                query: self.query_limit,
            });
        }
        Ok(())
    }
}
