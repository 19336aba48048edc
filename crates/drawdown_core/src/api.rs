//! External interface (§6).
//!
//! The engine exposes one request/response operation plus a trivial health
//! check. Everything here is the JSON-shaped boundary; the rest of the
//! crate never has to think about serialization.

use serde::{Deserialize, Serialize};

use crate::config::ScenarioConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioRequest {
    pub scenario: ScenarioConfig,
    #[serde(default)]
    pub run_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    Failed,
    Cancelled,
}

/// One grid point's result. Exactly one of `max_e_real_per_year` (mode
/// `optimize`) or `e_real_per_year` (mode `single`) is populated.
///
/// `optimizer_converged` and `notes` are diagnostics (§4.8, §7
/// "Optimizer non-convergence"): present in the struct for callers that
/// want them, but never required for correctness and never block a
/// successful response.
#[derive(Debug, Clone, Serialize)]
pub struct GridPointResult {
    pub start_portfolio: f64,
    pub reserve_years: u32,
    pub loan_amount: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_e_real_per_year: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e_real_per_year: Option<i64>,

    pub p_success_death_weighted: f64,
    pub p_success_to_age_99: f64,
    pub median_max_dd_risky: f64,
    pub median_max_dd_total: f64,
    pub home_equity_remaining_median: f64,
    pub p_any_rm_draw: f64,
    pub rm_balance_end_median: f64,
    pub risky_end_median: f64,
    pub total_net_end_median: f64,
    pub net_worth_end_median: f64,

    pub optimizer_converged: bool,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResponse {
    pub run_id: Option<String>,
    pub status: RunStatus,
    pub results: Vec<GridPointResult>,
    pub total_grid_points: usize,
    /// Set on `Failed`: the validation or internal-failure message (§7).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

#[must_use]
pub fn health() -> HealthStatus {
    HealthStatus { status: "ok" }
}
