//! Incremental site search for statically generated documentation.
//!
//! A search box that loads a pre-built index on first use, searches as you
//! type, renders a short ranked list of section links, and lets the keyboard
//! roam between the box and the results. The widget core is platform-free;
//! the browser binding lives in `runtime::wasm` and the `sitesearch` binary
//! drives the same core from disk.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │  loader.rs   │────▶│   store.rs   │────▶│ engine/*.rs  │
//! │ (fetch tasks,│     │ (IndexState, │     │ (SearchEngine│
//! │  ready delay)│     │  completion) │     │  MemoryEngine│
//! └──────────────┘     └──────────────┘     └──────────────┘
//!        ▲                    │                    │
//!        │                    ▼                    ▼
//! ┌─────────────────────────────────────────────────────┐
//! │                     widget.rs                        │
//! │  (SearchWidget: query.rs ▶ render.rs ▶ view.rs,     │
//! │   nav.rs focus state machine)                       │
//! └─────────────────────────────────────────────────────┘
//!        ▲
//!        │ DOM events
//! ┌──────────────┐
//! │ runtime/wasm │
//! └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use sitesearch::{IndexLoader, MemoryEngine, PipelineOutcome, SearchWidget, WidgetConfig};
//!
//! let widget = Rc::new(RefCell::new(SearchWidget::new(config, MemoryEngine::new(), view)?));
//! let loader = IndexLoader::new(source, timer);
//!
//! // on input focus / keyup:
//! let outcome = widget.borrow_mut().on_input_keyup(&value, false);
//! if let PipelineOutcome::LoadStarted(plan) = outcome {
//!     for task in loader.tasks(&widget, plan) {
//!         spawn(task);
//!     }
//! }
//! ```

// Module declarations
pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod nav;
mod query;
mod render;
pub mod store;
pub mod testing;
mod types;
mod utils;
pub mod view;
pub mod widget;

pub mod runtime;

// Re-exports for public API
pub use config::{Placeholders, WidgetConfig};
pub use engine::{FieldResults, Hit, IndexConfig, MemoryEngine, SearchEngine, SearchRequest};
pub use error::{ConfigError, EngineError, LoadError};
#[cfg(not(target_arch = "wasm32"))]
pub use loader::FileSource;
pub use loader::{fetch_partition, FetchedBody, IndexLoader, LoadTask, NoDelay, PartitionSource, Timer};
pub use nav::{FocusState, Key, KeyOutcome, NavigationController};
pub use query::QueryEngine;
pub use render::{ResultRenderer, SECTION_PREFIX};
pub use store::{ImportProgress, IndexStore};
pub use types::{IndexState, Partition, PartitionSet, SearchDocument};
pub use utils::{normalize, tokenize};
pub use view::{ResultItem, View};
pub use widget::{LoadPlan, LoadProgress, PipelineOutcome, SearchWidget};
