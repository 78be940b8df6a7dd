// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Native engine over the five exported partitions.
//!
//! The export is a resolution-bucketed inverted index:
//!
//! ```text
//! content.cfg   { "res": 9, "minlength": 3 }
//! content.map   [ { term: [id, ...] }, ... ]              slot 0 = best
//! content.ctx   [ { keyword: { term: [id, ...] } }, ... ]  adjacent pairs
//! reg           { id: 1, ... }  or  [id, ...]
//! store         { id: { title, pagetitle, ref }, ... }
//! ```
//!
//! Ranking: every query term must match (AND), lower slot sums win, and
//! documents where consecutive query terms sit next to each other (a context
//! hit) float above the rest. Ties keep map order.

use super::{FieldResults, Hit, SearchEngine, SearchRequest};
use crate::config::DEFAULT_FIELD;
use crate::error::EngineError;
use crate::types::{Partition, PartitionSet, RawId, SearchDocument};
use crate::utils::tokenize;
use serde::Deserialize;
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

type TermMap = HashMap<String, Vec<String>>;

/// Settings carried in the `content.cfg` partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    #[serde(alias = "resolution")]
    pub res: usize,
    pub minlength: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            res: 9,
            minlength: 3,
        }
    }
}

#[derive(Debug)]
pub struct MemoryEngine {
    field: String,
    config: IndexConfig,
    registered: HashSet<String>,
    store: HashMap<String, SearchDocument>,
    /// Slot → term → ids.
    map: Vec<TermMap>,
    /// Slot → keyword → following term → ids.
    ctx: Vec<HashMap<String, TermMap>>,
    imported: PartitionSet,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RegData {
    List(Vec<RawId>),
    Keys(HashMap<String, serde_json::Value>),
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryEngine {
    /// Engine indexing the default `content` field.
    pub fn new() -> Self {
        Self::with_field(DEFAULT_FIELD)
    }

    pub fn with_field(field: &str) -> Self {
        Self {
            field: field.to_string(),
            config: IndexConfig::default(),
            registered: HashSet::new(),
            store: HashMap::new(),
            map: Vec::new(),
            ctx: Vec::new(),
            imported: PartitionSet::new(),
        }
    }

    pub fn config(&self) -> IndexConfig {
        self.config
    }

    pub fn doc_count(&self) -> usize {
        self.registered.len()
    }

    /// Distinct terms across all slots.
    pub fn term_count(&self) -> usize {
        self.map
            .iter()
            .flat_map(|slot| slot.keys())
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn imported(&self) -> PartitionSet {
        self.imported
    }

    fn shape(partition: Partition, err: serde_json::Error) -> EngineError {
        EngineError::Shape {
            partition,
            reason: err.to_string(),
        }
    }

    /// Best (lowest) slot for each id matching `term`, plus first-seen order.
    fn term_slots(&self, term: &str) -> Vec<(String, usize)> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for (slot, terms) in self.map.iter().enumerate() {
            if let Some(ids) = terms.get(term) {
                for id in ids {
                    if seen.insert(id.as_str()) {
                        out.push((id.clone(), slot));
                    }
                }
            }
        }
        out
    }

    fn context_ids(&self, keyword: &str, term: &str) -> HashSet<&str> {
        self.ctx
            .iter()
            .filter_map(|slot| slot.get(keyword).and_then(|next| next.get(term)))
            .flatten()
            .map(String::as_str)
            .collect()
    }

    fn rank(&self, terms: &[String]) -> Vec<String> {
        let Some((first, rest)) = terms.split_first() else {
            return Vec::new();
        };

        // (id, slot sum, context hits), in first-term map order
        let mut candidates: Vec<(String, usize, usize)> = self
            .term_slots(first)
            .into_iter()
            .map(|(id, slot)| (id, slot, 0))
            .collect();

        for term in rest {
            let slots: HashMap<String, usize> = self.term_slots(term).into_iter().collect();
            candidates.retain_mut(|(id, score, _)| match slots.get(id) {
                Some(slot) => {
                    *score += slot;
                    true
                }
                None => false,
            });
        }

        for pair in terms.windows(2) {
            let hits = self.context_ids(&pair[0], &pair[1]);
            for (id, _, ctx) in candidates.iter_mut() {
                if hits.contains(id.as_str()) {
                    *ctx += 1;
                }
            }
        }

        candidates.retain(|(id, _, _)| self.registered.contains(id));
        candidates.sort_by_key(|(_, score, ctx)| (Reverse(*ctx), *score));
        candidates.into_iter().map(|(id, _, _)| id).collect()
    }
}

impl SearchEngine for MemoryEngine {
    fn import(&mut self, partition: Partition, data: serde_json::Value) -> Result<(), EngineError> {
        match partition {
            Partition::ContentCfg => {
                self.config =
                    serde_json::from_value(data).map_err(|e| Self::shape(partition, e))?;
            }
            Partition::ContentMap => {
                let slots: Vec<Option<HashMap<String, Vec<RawId>>>> =
                    serde_json::from_value(data).map_err(|e| Self::shape(partition, e))?;
                self.map = slots
                    .into_iter()
                    .map(|slot| {
                        slot.unwrap_or_default()
                            .into_iter()
                            .map(|(term, ids)| (term, ids.into_iter().map(String::from).collect()))
                            .collect()
                    })
                    .collect();
            }
            Partition::ContentCtx => {
                let slots: Vec<Option<HashMap<String, HashMap<String, Vec<RawId>>>>> =
                    serde_json::from_value(data).map_err(|e| Self::shape(partition, e))?;
                self.ctx = slots
                    .into_iter()
                    .map(|slot| {
                        slot.unwrap_or_default()
                            .into_iter()
                            .map(|(keyword, next)| {
                                let next = next
                                    .into_iter()
                                    .map(|(term, ids)| {
                                        (term, ids.into_iter().map(String::from).collect())
                                    })
                                    .collect();
                                (keyword, next)
                            })
                            .collect()
                    })
                    .collect();
            }
            Partition::Reg => {
                let reg: RegData =
                    serde_json::from_value(data).map_err(|e| Self::shape(partition, e))?;
                self.registered = match reg {
                    RegData::List(ids) => ids.into_iter().map(String::from).collect(),
                    RegData::Keys(ids) => ids.into_keys().collect(),
                };
            }
            Partition::Store => {
                let docs: HashMap<String, SearchDocument> =
                    serde_json::from_value(data).map_err(|e| Self::shape(partition, e))?;
                self.store = docs
                    .into_iter()
                    .map(|(id, mut doc)| {
                        doc.id.clone_from(&id);
                        (id, doc)
                    })
                    .collect();
            }
        }
        self.imported.insert(partition);
        Ok(())
    }

    fn search(&self, request: &SearchRequest<'_>) -> Result<Vec<FieldResults>, EngineError> {
        if request.field != self.field {
            return Err(EngineError::UnknownField(request.field.to_string()));
        }

        let terms = tokenize(request.query, self.config.minlength);
        let mut ids = self.rank(&terms);
        ids.truncate(request.limit);
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = ids
            .into_iter()
            .map(|id| {
                let doc = if request.enrich {
                    self.store.get(&id).cloned()
                } else {
                    None
                };
                Hit { id, doc }
            })
            .collect();

        Ok(vec![FieldResults {
            field: self.field.clone(),
            result,
        }])
    }
}
