// crates/provision-gate-core/src/core/time.rs
// ============================================================================
// Module: Provision Gate Time Model
// Description: Explicit timestamps for minted-secret records.
// Purpose: Keep the core model free of wall-clock reads.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Timestamps are explicit values supplied by callers. The core model never
//! reads wall-clock time; the runtime pipeline owns the single helper that
//! samples the host clock when stamping minted secrets.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Unix-epoch millisecond timestamp recorded on minted secrets.
///
/// # Invariants
/// - Values are caller-supplied; no monotonicity is enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from unix milliseconds.
    #[must_use]
    pub const fn from_unix_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as unix milliseconds.
    #[must_use]
    pub const fn as_unix_millis(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
