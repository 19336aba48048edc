//! Optimizer (C8).
//!
//! Mode `single` evaluates one fixed `E`. Mode `optimize` integer-binary-
//! searches for the largest `E` whose objective still meets the target,
//! auto-expanding the upper bound when the whole configured range clears
//! the bar.

use crate::aggregate::{self, GridPointStats};
use crate::cancellation::CancellationToken;
use crate::config::{OptimizeSuccessMetric, OptimizerMode, ScenarioConfig};
use crate::kernel::simulate_grid_point;
use crate::returns::ReturnsMatrix;

/// A small, fixed number of upper-bound doublings before giving up and
/// reporting best-effort (§4.8).
const MAX_EXPANSIONS: u32 = 6;

/// Outcome of running C8 for one grid point: the chosen `E`, its stats, and
/// whether the search actually converged on the target.
#[derive(Debug, Clone)]
pub struct OptimizerResult {
    pub e: i64,
    pub stats: GridPointStats,
    /// `None` in `single` mode (no search, nothing to converge). `Some(true)`
    /// when the binary search found an `E` meeting the target; `Some(false)`
    /// when it's a best-effort result.
    pub converged: Option<bool>,
}

fn objective(config: &ScenarioConfig, stats: &GridPointStats) -> f64 {
    match config.optimize_success_metric {
        OptimizeSuccessMetric::DeathWeighted => stats.p_success_death_weighted,
        OptimizeSuccessMetric::Age99 => stats.p_success_to_age_99,
        OptimizeSuccessMetric::BothMin => {
            stats.p_success_death_weighted.min(stats.p_success_to_age_99)
        }
        OptimizeSuccessMetric::BothWeighted => {
            config.both_weight * stats.p_success_death_weighted
                + (1.0 - config.both_weight) * stats.p_success_to_age_99
        }
    }
}

fn evaluate(
    config: &ScenarioConfig,
    returns: &ReturnsMatrix,
    start_portfolio: f64,
    reserve_years: u32,
    loan_amount: f64,
    e: i64,
) -> GridPointStats {
    let outcome = simulate_grid_point(config, returns, start_portfolio, reserve_years, loan_amount, e);
    aggregate::aggregate(config, &outcome)
}

#[must_use]
pub fn run(
    config: &ScenarioConfig,
    returns: &ReturnsMatrix,
    start_portfolio: f64,
    reserve_years: u32,
    loan_amount: f64,
    cancellation: Option<&CancellationToken>,
) -> OptimizerResult {
    match config.mode {
        OptimizerMode::Single => {
            let stats =
                evaluate(config, returns, start_portfolio, reserve_years, loan_amount, config.e_fixed);
            OptimizerResult { e: config.e_fixed, stats, converged: None }
        }
        OptimizerMode::Optimize => {
            optimize(config, returns, start_portfolio, reserve_years, loan_amount, cancellation)
        }
    }
}

fn meets_target(config: &ScenarioConfig, stats: &GridPointStats) -> bool {
    objective(config, stats) >= config.target_success_death_weighted
}

fn cancelled(cancellation: Option<&CancellationToken>) -> bool {
    cancellation.is_some_and(CancellationToken::is_cancelled)
}

fn optimize(
    config: &ScenarioConfig,
    returns: &ReturnsMatrix,
    start_portfolio: f64,
    reserve_years: u32,
    loan_amount: f64,
    cancellation: Option<&CancellationToken>,
) -> OptimizerResult {
    let mut lo = config.e_lo;
    let mut hi = config.e_hi;

    let mut hi_stats = evaluate(config, returns, start_portfolio, reserve_years, loan_amount, hi);
    let mut expansions = 0;
    while meets_target(config, &hi_stats) && expansions < MAX_EXPANSIONS {
        if cancelled(cancellation) {
            return OptimizerResult { e: hi, stats: hi_stats, converged: Some(false) };
        }
        let span = (hi - lo).max(1);
        lo = hi;
        hi += span * 2;
        hi_stats = evaluate(config, returns, start_portfolio, reserve_years, loan_amount, hi);
        expansions += 1;
    }

    if cancelled(cancellation) {
        return OptimizerResult { e: hi, stats: hi_stats, converged: Some(false) };
    }
    let lo_stats = evaluate(config, returns, start_portfolio, reserve_years, loan_amount, lo);

    // Neither endpoint meets the target: best effort, pick whichever is
    // closer to target (§4.8 tie-break).
    if !meets_target(config, &lo_stats) && !meets_target(config, &hi_stats) {
        let lo_gap = (config.target_success_death_weighted - objective(config, &lo_stats)).abs();
        let hi_gap = (config.target_success_death_weighted - objective(config, &hi_stats)).abs();
        return if hi_gap <= lo_gap {
            OptimizerResult { e: hi, stats: hi_stats, converged: Some(false) }
        } else {
            OptimizerResult { e: lo, stats: lo_stats, converged: Some(false) }
        };
    }

    // Both endpoints meet the target (expansions exhausted without ever
    // failing): prefer the higher E (§4.8 tie-break).
    if meets_target(config, &hi_stats) {
        return OptimizerResult { e: hi, stats: hi_stats, converged: Some(true) };
    }

    // Standard case: objective is weakly decreasing in E, lo meets the
    // target and hi doesn't. `a` always meets, `b` always fails (or is
    // the last probed point); the boundary — the largest E that still
    // meets — lies in (a, b].
    let mut best_e = lo;
    let mut best_stats = lo_stats;
    let mut a = lo;
    let mut b = hi;
    for _ in 0..config.e_search_iters {
        if b - a <= 1 {
            break;
        }
        if cancelled(cancellation) {
            return OptimizerResult { e: best_e, stats: best_stats, converged: Some(false) };
        }
        let mid = a + (b - a) / 2;
        let mid_stats = evaluate(config, returns, start_portfolio, reserve_years, loan_amount, mid);
        if meets_target(config, &mid_stats) {
            a = mid;
            best_e = mid;
            best_stats = mid_stats;
        } else {
            b = mid;
        }
    }

    OptimizerResult { e: best_e, stats: best_stats, converged: Some(true) }
}
