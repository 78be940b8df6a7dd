// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Index store: the engine instance plus its load state.
//!
//! One store per page session. The state machine is small and one-way:
//!
//! ```text
//! Uninitialized ──begin_loading──▶ Loading ──mark_ready──▶ Ready
//!                                     │
//!                                     └──────fail────────▶ Failed
//! ```
//!
//! Every transition method returns whether it actually moved, so callers can
//! call them blindly: a second `begin_loading` is a no-op, an import after
//! `Failed` is dropped, `mark_ready` before the partition set is complete
//! refuses. The engine is only handed out once `Ready`, which is how search
//! stays gated behind a fully imported index.

use crate::engine::SearchEngine;
use crate::error::LoadError;
use crate::types::{IndexState, Partition, PartitionSet};

/// Outcome of feeding one partition to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportProgress {
    /// Imported; this many partitions still outstanding.
    Pending { remaining: usize },
    /// Imported, and it was the last one missing.
    Complete,
    /// Not imported: store is not loading, or the partition is already in.
    Ignored,
}

#[derive(Debug)]
pub struct IndexStore<E> {
    engine: E,
    state: IndexState,
    imported: PartitionSet,
}

impl<E: SearchEngine> IndexStore<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            state: IndexState::Uninitialized,
            imported: PartitionSet::new(),
        }
    }

    pub fn state(&self) -> &IndexState {
        &self.state
    }

    pub fn imported(&self) -> PartitionSet {
        self.imported
    }

    /// `Uninitialized → Loading`. Returns false from any other state.
    pub fn begin_loading(&mut self) -> bool {
        if self.state != IndexState::Uninitialized {
            return false;
        }
        self.state = IndexState::Loading;
        true
    }

    /// Import a parsed partition into the engine.
    ///
    /// An engine rejection is returned as [`LoadError::Import`]; the caller
    /// decides to [`fail`](Self::fail) the store, same as any other load error.
    pub fn import(
        &mut self,
        partition: Partition,
        data: serde_json::Value,
    ) -> Result<ImportProgress, LoadError> {
        if self.state != IndexState::Loading || self.imported.contains(partition) {
            return Ok(ImportProgress::Ignored);
        }

        self.engine
            .import(partition, data)
            .map_err(|source| LoadError::Import { partition, source })?;
        self.imported.insert(partition);

        tracing::debug!(
            partition = partition.key(),
            imported = self.imported.len(),
            "partition imported"
        );

        if self.imported.is_complete() {
            Ok(ImportProgress::Complete)
        } else {
            Ok(ImportProgress::Pending {
                remaining: Partition::ALL.len() - self.imported.len(),
            })
        }
    }

    /// `Loading → Failed`. Only the first failure is recorded.
    pub fn fail(&mut self, error: &LoadError) -> bool {
        if self.state != IndexState::Loading {
            return false;
        }
        tracing::warn!(partition = error.partition().key(), %error, "search index load failed");
        self.state = IndexState::Failed(error.to_string());
        true
    }

    /// `Loading → Ready`, only once every partition is imported.
    pub fn mark_ready(&mut self) -> bool {
        if self.state != IndexState::Loading || !self.imported.is_complete() {
            return false;
        }
        self.state = IndexState::Ready;
        tracing::info!("search index ready");
        true
    }

    /// The engine, if and only if the index is ready.
    pub fn ready_engine(&self) -> Option<&E> {
        self.state.is_ready().then_some(&self.engine)
    }

    /// The engine regardless of state. For inspection only.
    pub fn engine(&self) -> &E {
        &self.engine
    }
}
