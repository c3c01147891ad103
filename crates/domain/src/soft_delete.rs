// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Soft-delete sentinel values.
//!
//! When a hard delete is blocked by referential constraints, the row is kept
//! and its descriptive fields are overwritten with a sentinel. Listing views
//! hide rows whose name carries the sentinel prefix.

/// Prefix written into the name fields of a soft-deleted row.
pub const SOFT_DELETE_PREFIX: &str = "DELETED_";

/// Value written into type/category fields of a soft-deleted row.
pub const SOFT_DELETE_MARKER: &str = "DELETED";

/// Builds the sentinel for a soft delete performed at `unix_millis`.
#[must_use]
pub fn soft_delete_sentinel(unix_millis: i128) -> String {
    format!("{SOFT_DELETE_PREFIX}{unix_millis}")
}

/// Returns whether `name` marks a soft-deleted row.
#[must_use]
pub fn is_soft_deleted(name: &str) -> bool {
    name.starts_with(SOFT_DELETE_PREFIX)
}
