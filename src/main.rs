// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use anyhow::{bail, Context, Result};
use clap::Parser;
use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

use sitesearch::{
    FileSource, IndexLoader, IndexState, IndexStore, LoadError, MemoryEngine, NoDelay, Partition,
    PipelineOutcome, ResultItem, SearchWidget, View, WidgetConfig,
};

mod cli;
use cli::display::{self, dim, format_size, pad_right, rank, row, section_bot, section_top};
use cli::{Cli, Commands};

/// Collects what the widget renders so it can be printed.
#[derive(Default)]
struct TerminalView {
    items: Vec<ResultItem>,
    placeholder: String,
}

impl View for TerminalView {
    fn set_placeholder(&mut self, text: &str) {
        self.placeholder = text.to_string();
    }

    fn show_results(&mut self, items: &[ResultItem]) {
        self.items = items.to_vec();
    }

    fn hide_results(&mut self) {
        self.items.clear();
    }

    fn focus_input(&mut self) {}

    fn focus_result(&mut self, _index: usize) {}
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("sitesearch=debug")
    } else {
        EnvFilter::try_from_env("SITESEARCH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Search {
            dir,
            query,
            limit,
            config,
        } => run_search(&dir, &query, limit, config.as_deref()),
        Commands::Inspect { dir, partitions } => run_inspect(&dir, &partitions),
    };

    if let Err(e) = result {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<WidgetConfig> {
    let Some(path) = path else {
        return Ok(WidgetConfig::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    WidgetConfig::from_json(&json).with_context(|| format!("Invalid config {}", path.display()))
}

fn run_search(dir: &Path, query: &str, limit: Option<usize>, config: Option<&Path>) -> Result<()> {
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }

    let mut config = load_config(config)?;
    config.base_path = dir.to_string_lossy().into_owned();
    config.ready_delay_ms = 0;
    if let Some(limit) = limit {
        config.display_limit = limit;
        config.query_limit = config.query_limit.max(limit);
    }

    let engine = MemoryEngine::with_field(&config.field);
    let widget = SearchWidget::new(config, engine, TerminalView::default())
        .context("Invalid widget config")?;
    let widget = Rc::new(RefCell::new(widget));
    let loader = IndexLoader::new(FileSource, NoDelay);

    let mut pool = LocalPool::new();
    let spawner = pool.spawner();
    let outcome = widget.borrow_mut().run_pipeline("");
    if let PipelineOutcome::LoadStarted(plan) = outcome {
        for task in loader.tasks(&widget, plan) {
            spawner.spawn_local(task).context("Failed to spawn loader task")?;
        }
    }
    pool.run();

    let mut widget = widget.borrow_mut();
    let state = widget.state();
    if !state.is_terminal() {
        bail!("Index did not finish loading ({})", state.label());
    }
    if let IndexState::Failed(reason) = state {
        bail!("Index failed to load: {}", reason);
    }

    let visible = match widget.run_pipeline(query) {
        PipelineOutcome::Rendered { visible } => visible,
        _ => 0,
    };

    section_top(&format!("\"{}\"", query));
    if visible == 0 {
        row(&format!(" {}", dim("no results")));
    }
    for item in &widget.view().items {
        row(&format!(
            " {} {}{}",
            rank(item.index + 1),
            display::themed(display::CYAN, &[], &item.page_title),
            item.section_title
        ));
        row(&format!("     {}", dim(&display::truncate_left(&item.href, 60))));
    }
    section_bot();
    Ok(())
}

/// One partition file as `inspect` found it.
struct Checked {
    partition: Partition,
    size: Option<usize>,
    result: Result<(), LoadError>,
}

/// Read and import `partitions` (all five if empty) into a fresh store.
///
/// Unlike the widget, a bad file doesn't stop the others from being checked.
/// The store ends Ready if everything imported, Failed on the first problem,
/// and still Loading if only some partitions were asked for.
fn inspect_dir(dir: &Path, partitions: &[Partition]) -> (IndexStore<MemoryEngine>, Vec<Checked>) {
    let all = Partition::ALL;
    let partitions = if partitions.is_empty() {
        &all[..]
    } else {
        partitions
    };

    let mut store = IndexStore::new(MemoryEngine::new());
    store.begin_loading();

    let mut checked = Vec::with_capacity(partitions.len());
    for &partition in partitions {
        let (size, result) = match fs::read_to_string(dir.join(partition.file_name())) {
            Ok(body) => {
                let result = serde_json::from_str(&body)
                    .map_err(|source| LoadError::Malformed { partition, source })
                    .and_then(|data| store.import(partition, data))
                    .map(drop);
                (Some(body.len()), result)
            }
            Err(e) => (
                None,
                Err(LoadError::Transport {
                    partition,
                    reason: e.to_string(),
                }),
            ),
        };
        checked.push(Checked {
            partition,
            size,
            result,
        });
    }

    if !store.mark_ready() {
        if let Some(error) = checked.iter().find_map(|c| c.result.as_ref().err()) {
            store.fail(error);
        }
    }
    (store, checked)
}

fn run_inspect(dir: &Path, partitions: &[Partition]) -> Result<()> {
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }

    let (store, checked) = inspect_dir(dir, partitions);

    section_top(&display::truncate_left(&dir.display().to_string(), 60));
    for entry in &checked {
        let name = pad_right(entry.partition.key(), 12);
        let size = pad_right(&entry.size.map(format_size).unwrap_or_default(), 10);
        match &entry.result {
            Ok(()) => row(&format!(" {} {} {}", name, size, display::status_mark(true))),
            Err(error) => row(&format!(
                " {} {} {} {}",
                name,
                size,
                display::status_mark(false),
                dim(&error_detail(error))
            )),
        }
    }
    row("");

    let engine = store.engine();
    row(&format!(
        " {} documents, {} terms, resolution {}",
        engine.doc_count(),
        engine.term_count(),
        engine.config().res
    ));
    let missing = store.imported().missing();
    if !missing.is_empty() {
        let keys: Vec<&str> = missing.iter().map(|p| p.key()).collect();
        row(&format!(" not imported: {}", dim(&keys.join(", "))));
    }
    if store.state().is_terminal() {
        row(&format!(" state: {}", display::state_label(store.state().label())));
    }
    section_bot();

    let problems = checked.iter().filter(|c| c.result.is_err()).count();
    if problems > 0 {
        bail!("{} of {} partitions unusable", problems, checked.len());
    }
    Ok(())
}

/// The error without its `<partition>: ` prefix, which the row already shows.
fn error_detail(error: &LoadError) -> String {
    let text = error.to_string();
    let prefix = format!("{}: ", error.partition());
    text.strip_prefix(&prefix).map(str::to_string).unwrap_or(text)
}
