// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error types.
//!
//! Every load error is session-fatal: the store moves to `Failed` and the
//! user reloads the page. The variants exist so the log line says *why*.

use crate::types::Partition;
use thiserror::Error;

/// Failure while bringing one partition into the engine.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{partition}: HTTP {status}")]
    Status { partition: Partition, status: u16 },

    #[error("{partition}: request failed: {reason}")]
    Transport { partition: Partition, reason: String },

    #[error("{partition}: malformed JSON: {source}")]
    Malformed {
        partition: Partition,
        #[source]
        source: serde_json::Error,
    },

    #[error("{partition}: import rejected: {source}")]
    Import {
        partition: Partition,
        #[source]
        source: EngineError,
    },
}

impl LoadError {
    pub fn partition(&self) -> Partition {
        match self {
            LoadError::Status { partition, .. }
            | LoadError::Transport { partition, .. }
            | LoadError::Malformed { partition, .. }
            | LoadError::Import { partition, .. } => *partition,
        }
    }
}

/// Errors raised by a search engine implementation.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unexpected shape for {partition}: {reason}")]
    Shape {
        partition: Partition,
        reason: String,
    },

    #[error("unknown index field `{0}`")]
    UnknownField(String),

    #[error("engine error: {0}")]
    Backend(String),
}

/// Invalid widget configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{0} must be at least 1")]
    Zero(&'static str),

    #[error("displayLimit ({display}) exceeds queryLimit ({query})")]
    DisplayExceedsQuery { display: usize, query: usize },
}
