//! Progress reporting (§5).
//!
//! An optional callback invoked after each grid point completes. A slow or
//! panicking callback must never corrupt or abort the computation: we
//! catch, log, and carry on.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Snapshot handed to the callback after one grid point finishes.
#[derive(Debug, Clone, Copy)]
pub struct GridPointProgress {
    pub completed: usize,
    pub total: usize,
    pub start_portfolio: f64,
    pub reserve_years: u32,
    pub loan_amount: f64,
}

pub type ProgressCallback = Arc<dyn Fn(GridPointProgress) + Send + Sync>;

/// Invokes `callback` with `progress`, catching any panic so a caller's
/// broken hook can't take down the run.
pub fn report(callback: &ProgressCallback, progress: GridPointProgress) {
    let callback = AssertUnwindSafe(callback);
    if let Err(_panic) = panic::catch_unwind(move || (callback.0)(progress)) {
        tracing::warn!("progress callback panicked; continuing without it");
    }
}
