//! Integration tests for the drawdown simulation engine.
//!
//! Organized by topic:
//! - `scenarios` - the concrete end-to-end scenarios scripted against the
//!   full request/response surface
//! - `boundaries` - edge-case configurations (zero reserve, RM open at
//!   start age, single-path ensembles, ...)

mod boundaries;
