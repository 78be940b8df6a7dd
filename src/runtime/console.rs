// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Log lines bound for the browser console.
//!
//! The formatter writes an event in pieces; [`ConsoleLine`] collects them
//! and hands back one message for the console method matching the level.

use std::io;
use tracing::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleMethod {
    Error,
    Warn,
    Info,
    Debug,
}

impl ConsoleMethod {
    pub fn for_level(level: &Level) -> Self {
        match *level {
            Level::ERROR => Self::Error,
            Level::WARN => Self::Warn,
            Level::INFO => Self::Info,
            _ => Self::Debug,
        }
    }
}

/// One formatted event, buffered until the formatter is done with it.
#[derive(Debug)]
pub struct ConsoleLine {
    method: ConsoleMethod,
    buf: Vec<u8>,
}

impl ConsoleLine {
    pub fn new(method: ConsoleMethod) -> Self {
        Self {
            method,
            buf: Vec::new(),
        }
    }

    /// The message without its trailing newline, or `None` if nothing was written.
    pub fn finish(&mut self) -> Option<(ConsoleMethod, String)> {
        let bytes = std::mem::take(&mut self.buf);
        let text = String::from_utf8_lossy(&bytes);
        let text = text.trim_end();
        if text.is_empty() {
            return None;
        }
        Some((self.method, text.to_string()))
    }
}

impl io::Write for ConsoleLine {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
