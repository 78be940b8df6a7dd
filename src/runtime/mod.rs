// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Runtime bindings.
//!
//! The widget core is platform-free. This is where it meets a real browser:
//! DOM listeners, `fetch`, `setTimeout`, the console, and optionally a
//! JavaScript engine. `dom` and `console` hold the parts that don't need a
//! browser to run.

#[cfg(any(test, feature = "wasm"))]
mod console;
#[cfg(any(test, feature = "wasm"))]
mod dom;

#[cfg(feature = "wasm")]
pub mod wasm;
