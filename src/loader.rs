// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Index loader: fetch partitions concurrently, import as they land.
//!
//! Each partition gets its own task. Nothing joins them; whichever task
//! completes the partition set sleeps the ready delay and flips the widget
//! to `Ready`. Any failure flips it to `Failed` instead, and every later
//! task finds the store closed and quietly drops its data.
//!
//! The loader is single-threaded by construction: tasks share the widget
//! through `Rc<RefCell<_>>` and never hold the borrow across an `.await`.
//!
//! # Usage
//!
//! ```ignore
//! let loader = IndexLoader::new(source, timer);
//! if let PipelineOutcome::LoadStarted(plan) = widget.borrow_mut().run_pipeline("") {
//!     for task in loader.tasks(&widget, plan) {
//!         spawn_local(task);
//!     }
//! }
//! ```

use crate::engine::SearchEngine;
use crate::error::LoadError;
use crate::types::Partition;
use crate::view::View;
use crate::widget::{LoadPlan, LoadProgress, SearchWidget};
use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

/// A fetch that resolves to a status and a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedBody {
    pub status: u16,
    pub body: String,
}

impl FetchedBody {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Where partition bytes come from: `fetch` in the browser, the file system
/// in the CLI, a script in tests.
pub trait PartitionSource {
    /// `Err` is a transport failure (no response at all).
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedBody, String>>;
}

pub trait Timer {
    fn sleep(&self, ms: u32) -> impl Future<Output = ()>;
}

/// Timer that never waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Timer for NoDelay {
    fn sleep(&self, _ms: u32) -> impl Future<Output = ()> {
        std::future::ready(())
    }
}

pub type LoadTask = Pin<Box<dyn Future<Output = ()>>>;

/// Fetch one partition and parse its JSON body.
pub async fn fetch_partition<S: PartitionSource>(
    source: &S,
    partition: Partition,
    url: &str,
) -> Result<serde_json::Value, LoadError> {
    let fetched = source
        .fetch(url)
        .await
        .map_err(|reason| LoadError::Transport { partition, reason })?;

    if !fetched.is_success() {
        return Err(LoadError::Status {
            partition,
            status: fetched.status,
        });
    }

    serde_json::from_str(&fetched.body).map_err(|source| LoadError::Malformed { partition, source })
}

pub struct IndexLoader<S, T> {
    source: Rc<S>,
    timer: Rc<T>,
}

impl<S, T> Clone for IndexLoader<S, T> {
    fn clone(&self) -> Self {
        Self {
            source: Rc::clone(&self.source),
            timer: Rc::clone(&self.timer),
        }
    }
}

impl<S: PartitionSource + 'static, T: Timer + 'static> IndexLoader<S, T> {
    pub fn new(source: S, timer: T) -> Self {
        Self {
            source: Rc::new(source),
            timer: Rc::new(timer),
        }
    }

    /// One independent task per partition in the plan. Spawn them all.
    pub fn tasks<E, V>(
        &self,
        widget: &Rc<RefCell<SearchWidget<E, V>>>,
        plan: LoadPlan,
    ) -> Vec<LoadTask>
    where
        E: SearchEngine + 'static,
        V: View + 'static,
    {
        let delay = plan.ready_delay_ms;
        plan.partitions
            .into_iter()
            .map(|(partition, url)| {
                let task = load_partition(
                    Rc::clone(widget),
                    Rc::clone(&self.source),
                    Rc::clone(&self.timer),
                    partition,
                    url,
                    delay,
                );
                Box::pin(task) as LoadTask
            })
            .collect()
    }
}

async fn load_partition<E, V, S, T>(
    widget: Rc<RefCell<SearchWidget<E, V>>>,
    source: Rc<S>,
    timer: Rc<T>,
    partition: Partition,
    url: String,
    ready_delay_ms: u32,
) where
    E: SearchEngine,
    V: View,
    S: PartitionSource,
    T: Timer,
{
    let fetched = fetch_partition(&*source, partition, &url).await;
    let progress = widget.borrow_mut().partition_loaded(partition, fetched);

    if progress == LoadProgress::Complete {
        timer.sleep(ready_delay_ms).await;
        widget.borrow_mut().finish_loading();
    }
}

// ============================================================================
// FILE SYSTEM SOURCE
// ============================================================================

/// Reads partitions from disk. The "URL" is a path; missing files are 404s.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSource;

#[cfg(not(target_arch = "wasm32"))]
impl PartitionSource for FileSource {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedBody, String>> {
        let result = match std::fs::read_to_string(url) {
            Ok(body) => Ok(FetchedBody::ok(body)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FetchedBody {
                status: 404,
                body: String::new(),
            }),
            Err(e) => Err(e.to_string()),
        };
        std::future::ready(result)
    }
}
