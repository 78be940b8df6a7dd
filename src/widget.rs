// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The search widget: one context object per page session.
//!
//! Owns the store (and through it the engine), the query engine, the
//! renderer, the navigation state and the view. Event handlers in the
//! runtime translate DOM events into the `on_*` methods below; nothing in
//! here touches the network or timers directly. Loading is returned as a
//! [`LoadPlan`] for the runtime to execute with an
//! [`IndexLoader`](crate::loader::IndexLoader), which feeds results back
//! through [`partition_loaded`](SearchWidget::partition_loaded) and
//! [`finish_loading`](SearchWidget::finish_loading).

use crate::config::WidgetConfig;
use crate::engine::SearchEngine;
use crate::error::{ConfigError, LoadError};
use crate::nav::{FocusState, Key, KeyOutcome, NavigationController};
use crate::query::QueryEngine;
use crate::render::ResultRenderer;
use crate::store::{ImportProgress, IndexStore};
use crate::types::{IndexState, Partition, SearchDocument};
use crate::view::View;

/// Partitions to fetch, with their URLs, plus the ready delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadPlan {
    pub partitions: Vec<(Partition, String)>,
    pub ready_delay_ms: u32,
}

/// What one run of the query pipeline did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// First use: loading started, the query was dropped.
    LoadStarted(LoadPlan),
    /// Loading or failed. Nothing searched.
    NotReady,
    /// Same input as last time. Nothing searched.
    Unchanged,
    /// Searched and rendered; `visible` rows shown (0 = panel hidden).
    Rendered { visible: usize },
}

/// What feeding one partition result did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadProgress {
    Pending { remaining: usize },
    /// All partitions imported. Sleep the ready delay, then `finish_loading`.
    Complete,
    Failed,
    Ignored,
}

pub struct SearchWidget<E, V> {
    config: WidgetConfig,
    store: IndexStore<E>,
    query: QueryEngine,
    renderer: ResultRenderer,
    nav: NavigationController,
    view: V,
}

impl<E: SearchEngine, V: View> SearchWidget<E, V> {
    pub fn new(config: WidgetConfig, engine: E, view: V) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            query: QueryEngine::new(&config.field, config.query_limit),
            renderer: ResultRenderer::new(config.display_limit),
            store: IndexStore::new(engine),
            nav: NavigationController::new(),
            view,
            config,
        })
    }

    pub fn state(&self) -> &IndexState {
        self.store.state()
    }

    pub fn store(&self) -> &IndexStore<E> {
        &self.store
    }

    pub fn focus(&self) -> FocusState {
        self.nav.focus()
    }

    pub fn visible_results(&self) -> usize {
        self.renderer.visible()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    // =========================================================================
    // LOADING
    // =========================================================================

    /// Start loading if nobody has yet. Returns the fetch plan exactly once.
    pub fn ensure_loaded(&mut self) -> Option<LoadPlan> {
        if !self.store.begin_loading() {
            return None;
        }
        self.view.set_placeholder(&self.config.placeholders.loading);
        tracing::debug!(base = %self.config.base_path, "loading search index");
        Some(LoadPlan {
            partitions: Partition::ALL
                .into_iter()
                .map(|p| (p, p.url(&self.config.base_path)))
                .collect(),
            ready_delay_ms: self.config.ready_delay_ms,
        })
    }

    /// Feed the outcome of one partition fetch.
    pub fn partition_loaded(
        &mut self,
        partition: Partition,
        fetched: Result<serde_json::Value, LoadError>,
    ) -> LoadProgress {
        let imported = fetched.and_then(|data| self.store.import(partition, data));
        match imported {
            Ok(ImportProgress::Pending { remaining }) => LoadProgress::Pending { remaining },
            Ok(ImportProgress::Complete) => LoadProgress::Complete,
            Ok(ImportProgress::Ignored) => LoadProgress::Ignored,
            Err(error) => {
                if self.store.fail(&error) {
                    self.view.set_placeholder(&self.config.placeholders.error);
                    LoadProgress::Failed
                } else {
                    LoadProgress::Ignored
                }
            }
        }
    }

    /// Called after the ready delay. Returns true if the index became ready.
    pub fn finish_loading(&mut self) -> bool {
        if !self.store.mark_ready() {
            return false;
        }
        self.view.set_placeholder(&self.config.placeholders.ready);
        true
    }

    // =========================================================================
    // QUERY PIPELINE
    // =========================================================================

    /// Load if needed, else search if the input changed, else nothing.
    pub fn run_pipeline(&mut self, input: &str) -> PipelineOutcome {
        if *self.store.state() == IndexState::Uninitialized {
            return match self.ensure_loaded() {
                Some(plan) => PipelineOutcome::LoadStarted(plan),
                None => PipelineOutcome::NotReady,
            };
        }

        // Loading or Failed: the query is dropped, the next keystroke retries.
        let Some(engine) = self.store.ready_engine() else {
            return PipelineOutcome::NotReady;
        };

        let results: Vec<SearchDocument> = match self.query.search(engine, input) {
            Ok(Some(results)) => results,
            Ok(None) => return PipelineOutcome::Unchanged,
            Err(error) => {
                tracing::warn!(%error, query = input, "search failed");
                Vec::new()
            }
        };

        self.renderer.render(&mut self.view, &results);
        let visible = self.renderer.visible();
        self.nav.results_changed(visible);
        PipelineOutcome::Rendered { visible }
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    /// Key released in the input. IME composition in progress is ignored.
    pub fn on_input_keyup(&mut self, input: &str, is_composing: bool) -> PipelineOutcome {
        if is_composing {
            return PipelineOutcome::Unchanged;
        }
        self.run_pipeline(input)
    }

    /// Input gained focus: always re-run the pipeline.
    pub fn on_input_focus(&mut self, input: &str) -> PipelineOutcome {
        self.nav.input_focused();
        self.run_pipeline(input)
    }

    pub fn on_input_keydown(&mut self, key: Key) -> KeyOutcome {
        let visible = self.renderer.visible();
        self.nav.input_keydown(&mut self.view, key, visible)
    }

    pub fn on_result_focus(&mut self, index: usize) {
        self.nav.result_focused(index);
    }

    pub fn on_result_keydown(&mut self, key: Key) -> KeyOutcome {
        let visible = self.renderer.visible();
        self.nav.result_keydown(&mut self.view, key, visible)
    }

    pub fn on_global_keydown(&mut self, key: Key, from_editable: bool) -> KeyOutcome {
        self.nav.global_keydown(&mut self.view, key, from_editable)
    }

    pub fn on_blur(&mut self) {
        self.nav.blurred();
    }
}
