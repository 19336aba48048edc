//! Retirement drawdown simulation engine.
//!
//! A Monte Carlo ensemble simulator for retirement-finance drawdown
//! scenarios. Given a [`config::ScenarioConfig`], [`run_scenario`] sweeps a
//! grid of `(start_portfolio, reserve_years, loan_amount)` combinations
//! and, per point, either evaluates one fixed spending level or binary-
//! searches for the largest spending level clearing a target success
//! probability.
//!
//! Entry points: [`run_scenario`] and [`health`].

pub mod accounts;
pub mod aggregate;
pub mod amortization;
pub mod api;
pub mod cancellation;
pub mod config;
pub mod error;
pub mod grid;
pub mod guardrails;
pub mod kernel;
pub mod mortality;
pub mod optimizer;
pub mod progress;
pub mod returns;

#[cfg(test)]
mod tests;

pub use api::{GridPointResult, HealthStatus, RunStatus, ScenarioRequest, ScenarioResponse};
pub use cancellation::CancellationToken;
pub use config::ScenarioConfig;
pub use error::{EngineError, Result};
pub use progress::{GridPointProgress, ProgressCallback};

/// Validates `request.scenario` and, if valid, runs the full grid.
///
/// Never returns `Err` for a validation failure (§7): an invalid scenario
/// comes back as a [`ScenarioResponse`] with `status: Failed`, empty
/// `results`, and the validation message in `error_message`.
#[must_use]
pub fn run_scenario(request: ScenarioRequest) -> ScenarioResponse {
    run_scenario_with(request, None, None)
}

/// Same as [`run_scenario`], with an optional cancellation token and
/// progress callback.
#[must_use]
pub fn run_scenario_with(
    request: ScenarioRequest,
    cancellation: Option<&CancellationToken>,
    progress: Option<&ProgressCallback>,
) -> ScenarioResponse {
    if let Err(err) = request.scenario.validate() {
        tracing::warn!("{err}");
        return ScenarioResponse {
            run_id: request.run_id,
            status: RunStatus::Failed,
            results: Vec::new(),
            total_grid_points: 0,
            error_message: Some(err.message()),
        };
    }

    let span = tracing::info_span!("scenario", run_id = request.run_id.as_deref().unwrap_or(""));
    let _enter = span.enter();
    tracing::info!(
        n_sims = request.scenario.n_sims,
        grid_points = request.scenario.start_portfolios.len()
            * request.scenario.reserve_years_list.len()
            * request.scenario.loan_amounts.len(),
        "starting scenario run"
    );

    grid::run(&request.scenario, request.run_id, cancellation, progress)
}

/// Trivial liveness check: no state, no I/O.
#[must_use]
pub fn health() -> HealthStatus {
    api::health()
}
