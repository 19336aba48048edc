//! Grid driver (C9).
//!
//! Enumerates `start_portfolios × reserve_years_list × loan_amounts` in
//! Cartesian order and delegates each point to the optimizer (C8). Owns
//! the single scenario-wide [`ReturnsMatrix`], the cancellation token, and
//! the progress callback.

use std::panic::{self, AssertUnwindSafe};

use crate::api::{GridPointResult, RunStatus, ScenarioResponse};
use crate::cancellation::CancellationToken;
use crate::config::{OptimizerMode, ScenarioConfig};
use crate::optimizer::{self, OptimizerResult};
use crate::progress::{self, GridPointProgress, ProgressCallback};
use crate::returns::ReturnsMatrix;

fn to_grid_point_result(
    start_portfolio: f64,
    reserve_years: u32,
    loan_amount: f64,
    mode: OptimizerMode,
    result: OptimizerResult,
) -> GridPointResult {
    let (max_e, e_fixed) = match mode {
        OptimizerMode::Optimize => (Some(result.e), None),
        OptimizerMode::Single => (None, Some(result.e)),
    };

    let mut notes = Vec::new();
    if result.converged == Some(false) {
        notes.push("optimizer did not converge within the configured search range; \
reporting a best-effort E"
            .to_string());
    }

    GridPointResult {
        start_portfolio,
        reserve_years,
        loan_amount,
        max_e_real_per_year: max_e,
        e_real_per_year: e_fixed,
        p_success_death_weighted: result.stats.p_success_death_weighted,
        p_success_to_age_99: result.stats.p_success_to_age_99,
        median_max_dd_risky: result.stats.median_max_dd_risky,
        median_max_dd_total: result.stats.median_max_dd_total,
        home_equity_remaining_median: result.stats.home_equity_remaining_median,
        p_any_rm_draw: result.stats.p_any_rm_draw,
        rm_balance_end_median: result.stats.rm_balance_end_median,
        risky_end_median: result.stats.risky_end_median,
        total_net_end_median: result.stats.total_net_end_median,
        net_worth_end_median: result.stats.net_worth_end_median,
        optimizer_converged: result.converged.unwrap_or(true),
        notes,
    }
}

/// Runs the full grid for `config`, honoring cancellation and reporting
/// progress after each point.
#[must_use]
pub fn run(
    config: &ScenarioConfig,
    run_id: Option<String>,
    cancellation: Option<&CancellationToken>,
    progress: Option<&ProgressCallback>,
) -> ScenarioResponse {
    let years = config.years();
    let returns = ReturnsMatrix::generate(
        config.seed,
        config.n_sims,
        years,
        config.return_mu_real,
        config.return_vol_real,
    );

    let points: Vec<(f64, u32, f64)> = config
        .start_portfolios
        .iter()
        .flat_map(|&sp| {
            config.reserve_years_list.iter().flat_map(move |&ry| {
                config.loan_amounts.iter().map(move |&la| (sp, ry, la))
            })
        })
        .collect();
    let total_grid_points = points.len();

    let mut results = Vec::with_capacity(total_grid_points);

    for (idx, (start_portfolio, reserve_years, loan_amount)) in points.into_iter().enumerate() {
        if cancellation.is_some_and(CancellationToken::is_cancelled) {
            return ScenarioResponse {
                run_id,
                status: RunStatus::Cancelled,
                results,
                total_grid_points,
                error_message: None,
            };
        }

        let span = tracing::debug_span!(
            "grid_point",
            idx,
            start_portfolio,
            reserve_years,
            loan_amount
        );
        let _enter = span.enter();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            optimizer::run(config, &returns, start_portfolio, reserve_years, loan_amount, cancellation)
        }));

        let optimizer_result = match outcome {
            Ok(result) => result,
            Err(_panic) => {
                tracing::error!("kernel panicked evaluating grid point {idx}; aborting run");
                return ScenarioResponse {
                    run_id,
                    status: RunStatus::Failed,
                    results,
                    total_grid_points,
                    error_message: Some(format!("kernel panicked evaluating grid point {idx}")),
                };
            }
        };

        if optimizer_result.converged == Some(false) {
            tracing::warn!(idx, "optimizer did not converge within the configured search range");
        }
        if optimizer_result.stats.p_success_death_weighted == 0.0 {
            tracing::debug!(idx, "grid point produced zero success probability (likely infeasible)");
        }

        results.push(to_grid_point_result(
            start_portfolio,
            reserve_years,
            loan_amount,
            config.mode,
            optimizer_result,
        ));

        if let Some(callback) = progress {
            progress::report(
                callback,
                GridPointProgress {
                    completed: idx + 1,
                    total: total_grid_points,
                    start_portfolio,
                    reserve_years,
                    loan_amount,
                },
            );
        }
    }

    ScenarioResponse {
        run_id,
        status: RunStatus::Completed,
        results,
        total_grid_points,
        error_message: None,
    }
}
