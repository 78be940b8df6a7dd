// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The nouns of the widget: documents, partitions, and load state.
//!
//! Everything here is plain data. The interesting rules live in the
//! transitions (`store`, `nav`), but a few invariants are worth stating up
//! front because every other module leans on them:
//!
//! - **IndexState**: `Uninitialized → Loading → {Ready | Failed}`. Nothing ever
//!   goes back to `Loading`, and nothing leaves `Ready` or `Failed`.
//!
//! - **PartitionSet**: the index is one logical unit split into five fixed
//!   partitions. Readiness means *all five* are in the set, whatever order
//!   they arrived in.
//!
//! - **SearchDocument**: created at index-build time, read-only here.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// =============================================================================
// DOCUMENTS
// =============================================================================

/// One indexed page section, as stored in the `store` partition.
///
/// The stored form only carries `title`, `pagetitle` and `ref`; `content` is
/// indexed but usually not stored, so it defaults to empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDocument {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "pagetitle", default)]
    pub page_title: String,
    #[serde(rename = "ref", default)]
    pub href: String,
    #[serde(default)]
    pub content: String,
}

/// Document id as it appears on the wire: a JSON number or a string,
/// depending on the exporter. Always handled as a string afterwards.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawId {
    Num(i64),
    Str(String),
}

impl From<RawId> for String {
    fn from(id: RawId) -> Self {
        match id {
            RawId::Num(n) => n.to_string(),
            RawId::Str(s) => s,
        }
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

// =============================================================================
// PARTITIONS
// =============================================================================

/// One of the five named chunks of the exported index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Partition {
    ContentCfg,
    ContentCtx,
    ContentMap,
    Reg,
    Store,
}

impl Partition {
    /// All partitions, in the order they are requested.
    pub const ALL: [Partition; 5] = [
        Partition::ContentCfg,
        Partition::ContentCtx,
        Partition::ContentMap,
        Partition::Reg,
        Partition::Store,
    ];

    /// Export key, also the file stem on the server.
    pub fn key(self) -> &'static str {
        match self {
            Partition::ContentCfg => "content.cfg",
            Partition::ContentCtx => "content.ctx",
            Partition::ContentMap => "content.map",
            Partition::Reg => "reg",
            Partition::Store => "store",
        }
    }

    /// Inverse of [`Partition::key`].
    pub fn from_key(key: &str) -> Option<Partition> {
        Partition::ALL.into_iter().find(|p| p.key() == key)
    }

    /// File name under the base path (`<key>.json`).
    pub fn file_name(self) -> String {
        format!("{}.json", self.key())
    }

    /// URL of this partition relative to `base`. Tolerates a trailing slash.
    pub fn url(self, base: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), self.file_name())
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Set of imported partitions. Tiny bitset; five bits used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartitionSet(u8);

impl PartitionSet {
    pub fn new() -> Self {
        Self(0)
    }

    /// Insert a partition. Returns false if it was already present.
    pub fn insert(&mut self, partition: Partition) -> bool {
        let was_absent = !self.contains(partition);
        self.0 |= partition.bit();
        was_absent
    }

    pub fn contains(self, partition: Partition) -> bool {
        self.0 & partition.bit() != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True once every partition in [`Partition::ALL`] is present.
    pub fn is_complete(self) -> bool {
        self.len() == Partition::ALL.len()
    }

    /// Partitions not yet in the set, in request order.
    pub fn missing(self) -> Vec<Partition> {
        Partition::ALL
            .into_iter()
            .filter(|p| !self.contains(*p))
            .collect()
    }
}

// =============================================================================
// LOAD STATE
// =============================================================================

/// Lifecycle of the index for one page session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IndexState {
    #[default]
    Uninitialized,
    Loading,
    Ready,
    Failed(String),
}

impl IndexState {
    pub fn is_ready(&self) -> bool {
        matches!(self, IndexState::Ready)
    }

    /// Ready and Failed are terminal for the session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, IndexState::Ready | IndexState::Failed(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            IndexState::Uninitialized => "uninitialized",
            IndexState::Loading => "loading",
            IndexState::Ready => "ready",
            IndexState::Failed(_) => "failed",
        }
    }
}
