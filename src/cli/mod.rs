// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the sitesearch command-line interface.
//!
//! Two subcommands: `search` runs a query against an exported index
//! directory through the same loader and widget the browser uses, and
//! `inspect` checks the five partition files of a directory.

pub mod display;

use clap::{Parser, Subcommand};
use sitesearch::Partition;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sitesearch",
    about = "Query and inspect exported site search indexes",
    version
)]
pub struct Cli {
    /// Log loader and engine events (same as SITESEARCH_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search an exported index directory and display results
    Search {
        /// Directory containing the five partition files
        dir: PathBuf,

        /// Search query
        query: String,

        /// Maximum number of results to display
        #[arg(short, long)]
        limit: Option<usize>,

        /// Widget configuration (JSON, camelCase keys)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Check the partition files of an index directory
    Inspect {
        /// Directory containing the five partition files
        dir: PathBuf,

        /// Only check this partition (repeatable), e.g. `-p reg -p store`
        #[arg(short, long = "partition", value_name = "KEY", value_parser = parse_partition)]
        partitions: Vec<Partition>,
    },
}

fn parse_partition(key: &str) -> Result<Partition, String> {
    Partition::from_key(key).ok_or_else(|| {
        format!(
            "unknown partition `{}` (expected one of: {})",
            key,
            Partition::ALL.map(Partition::key).join(", ")
        )
    })
}
