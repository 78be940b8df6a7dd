//! Shared test utilities and fixtures.
//!
//! A scripted network and a scripted clock, so tests decide exactly when
//! each partition arrives and when the ready delay elapses.

#![allow(dead_code)]

use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;
use sitesearch::testing::{export_fixture, CountingEngine, Export, RecordingView};
use sitesearch::{
    FetchedBody, IndexLoader, IndexState, Key, KeyOutcome, Partition, PartitionSource,
    PipelineOutcome, SearchDocument, SearchWidget, Timer, WidgetConfig,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

// Re-export canonical test utilities from sitesearch::testing
pub use sitesearch::testing::{make_doc, ViewCall};

pub type TestWidget = SearchWidget<CountingEngine, RecordingView>;

type Reply = Result<FetchedBody, String>;

// ============================================================================
// SCRIPTED SOURCE AND TIMER
// ============================================================================

/// Fetches park until the test answers them.
#[derive(Clone, Default)]
pub struct ManualSource {
    pending: Rc<RefCell<HashMap<String, oneshot::Sender<Reply>>>>,
    requested: Rc<RefCell<Vec<String>>>,
}

impl ManualSource {
    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }

    pub fn answer(&self, url: &str, reply: Reply) -> bool {
        match self.pending.borrow_mut().remove(url) {
            Some(tx) => tx.send(reply).is_ok(),
            None => false,
        }
    }

    /// Drop the request without a response.
    pub fn hang_up(&self, url: &str) -> bool {
        self.pending.borrow_mut().remove(url).is_some()
    }
}

impl PartitionSource for ManualSource {
    fn fetch(&self, url: &str) -> impl Future<Output = Reply> {
        let (tx, rx) = oneshot::channel();
        self.pending.borrow_mut().insert(url.to_string(), tx);
        self.requested.borrow_mut().push(url.to_string());
        async move { rx.await.unwrap_or_else(|_| Err("connection closed".to_string())) }
    }
}

/// Sleeps park until the test fires them.
#[derive(Clone, Default)]
pub struct ManualTimer {
    pending: Rc<RefCell<Vec<(u32, oneshot::Sender<()>)>>>,
}

impl ManualTimer {
    /// Delays currently waiting, in ms.
    pub fn waiting(&self) -> Vec<u32> {
        self.pending.borrow().iter().map(|(ms, _)| *ms).collect()
    }

    pub fn fire(&self) -> usize {
        let fired: Vec<_> = self.pending.borrow_mut().drain(..).collect();
        let count = fired.len();
        for (_, tx) in fired {
            let _ = tx.send(());
        }
        count
    }
}

impl Timer for ManualTimer {
    fn sleep(&self, ms: u32) -> impl Future<Output = ()> {
        let (tx, rx) = oneshot::channel();
        self.pending.borrow_mut().push((ms, tx));
        async move {
            let _ = rx.await;
        }
    }
}

// ============================================================================
// HARNESS
// ============================================================================

/// A widget plus the scripted world around it.
pub struct Harness {
    pub widget: Rc<RefCell<TestWidget>>,
    pub source: ManualSource,
    pub timer: ManualTimer,
    pub export: Export,
    base_path: String,
    loader: IndexLoader<ManualSource, ManualTimer>,
    pool: LocalPool,
}

impl Harness {
    pub fn new(docs: &[SearchDocument]) -> Self {
        Self::with_config(WidgetConfig::default(), docs)
    }

    pub fn with_config(config: WidgetConfig, docs: &[SearchDocument]) -> Self {
        let source = ManualSource::default();
        let timer = ManualTimer::default();
        let base_path = config.base_path.clone();
        let widget = SearchWidget::new(config, CountingEngine::default(), RecordingView::default())
            .expect("valid config");
        Self {
            widget: Rc::new(RefCell::new(widget)),
            loader: IndexLoader::new(source.clone(), timer.clone()),
            source,
            timer,
            export: export_fixture(docs),
            base_path,
            pool: LocalPool::new(),
        }
    }

    fn settle(&mut self, outcome: &PipelineOutcome) {
        if let PipelineOutcome::LoadStarted(plan) = outcome {
            let spawner = self.pool.spawner();
            for task in self.loader.tasks(&self.widget, plan.clone()) {
                spawner.spawn_local(task).expect("spawn");
            }
        }
        self.pool.run_until_stalled();
    }

    pub fn focus_input(&mut self, value: &str) -> PipelineOutcome {
        let outcome = self.widget.borrow_mut().on_input_focus(value);
        self.settle(&outcome);
        outcome
    }

    pub fn keyup(&mut self, value: &str) -> PipelineOutcome {
        let outcome = self.widget.borrow_mut().on_input_keyup(value, false);
        self.settle(&outcome);
        outcome
    }

    pub fn input_key(&mut self, key: Key) -> KeyOutcome {
        self.widget.borrow_mut().on_input_keydown(key)
    }

    /// Keydown on the focused result; mirrors the browser moving focus.
    pub fn result_key(&mut self, key: Key) -> KeyOutcome {
        let mut widget = self.widget.borrow_mut();
        let outcome = widget.on_result_keydown(key);
        if outcome == KeyOutcome::Handled {
            if let Some(ViewCall::FocusResult(i)) = widget.view().calls.last().cloned() {
                widget.on_result_focus(i);
            }
        }
        outcome
    }

    pub fn url(&self, partition: Partition) -> String {
        partition.url(&self.base_path)
    }

    /// Answer one partition with the fixture body and the given status.
    pub fn respond(&mut self, partition: Partition, status: u16) -> bool {
        let body = FetchedBody {
            status,
            body: self.export.body(partition),
        };
        let answered = self.source.answer(&self.url(partition), Ok(body));
        self.pool.run_until_stalled();
        answered
    }

    pub fn respond_all(&mut self) {
        for partition in Partition::ALL {
            self.respond(partition, 200);
        }
    }

    pub fn respond_body(&mut self, partition: Partition, body: &str) -> bool {
        let answered = self
            .source
            .answer(&self.url(partition), Ok(FetchedBody::ok(body)));
        self.pool.run_until_stalled();
        answered
    }

    pub fn hang_up(&mut self, partition: Partition) -> bool {
        let dropped = self.source.hang_up(&self.url(partition));
        self.pool.run_until_stalled();
        dropped
    }

    pub fn fire_timer(&mut self) -> usize {
        let fired = self.timer.fire();
        self.pool.run_until_stalled();
        fired
    }

    /// Focus the input, deliver everything, wait out the delay.
    pub fn load(&mut self) {
        self.focus_input("");
        self.respond_all();
        self.fire_timer();
        assert_eq!(self.state(), IndexState::Ready);
    }

    pub fn state(&self) -> IndexState {
        self.widget.borrow().state().clone()
    }

    pub fn placeholder(&self) -> String {
        self.widget.borrow().view().placeholder.clone()
    }

    pub fn searches(&self) -> usize {
        self.widget.borrow().store().engine().searches()
    }

    pub fn shown_hrefs(&self) -> Vec<String> {
        let widget = self.widget.borrow();
        widget
            .view()
            .shown()
            .map(|items| items.iter().map(|i| i.href.clone()).collect())
            .unwrap_or_default()
    }

    pub fn focus_calls(&self) -> Vec<ViewCall> {
        self.widget.borrow().view().focus_calls()
    }
}

// ============================================================================
// CORPORA
// ============================================================================

/// Three pages, two of which mention "install".
pub fn install_corpus() -> Vec<SearchDocument> {
    vec![
        make_doc(1, "Installation", "install the package with cargo"),
        make_doc(2, "Usage", "run the binary from your shell"),
        make_doc(3, "Upgrading", "upgrade notes and how to install again"),
    ]
}

/// `n` pages that all mention "guide".
pub fn guide_corpus(n: usize) -> Vec<SearchDocument> {
    (1..=n)
        .map(|i| make_doc(i, &format!("Guide {}", i), "guide chapter"))
        .collect()
}
