// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The iTOURu dashboard API.
//!
//! [`Dashboard`] is the single facade a presentation surface talks to. It
//! owns the initialized persistence layer (or nothing, in demo mode) and
//! applies the dashboard's error policy: reads degrade to placeholder data,
//! writes surface their errors as [`ApiError`], deletes report a `bool`.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod dashboard;
mod error;
mod export;
mod feed;
mod storage;

#[cfg(test)]
mod tests;

pub use dashboard::{Dashboard, ListFallback};
pub use error::ApiError;
pub use export::{CsvExport, ExportError, export_csv};
pub use feed::DEFAULT_ACTIVITY_LIMIT;
