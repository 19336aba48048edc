//! Aggregator (C7).
//!
//! Reduces one [`crate::kernel::EnsembleOutcome`] — the per-path outcome of
//! a single `(grid point, E)` probe — to the summary statistics the
//! optimizer searches on and the grid driver ultimately reports.

use crate::config::ScenarioConfig;
use crate::kernel::EnsembleOutcome;
use crate::mortality;

/// Summary statistics for one `(grid point, E)` probe. Mirrors §4.7
/// exactly; does not yet carry the grid-point identity or the `E` that
/// produced it — the optimizer and grid driver attach those.
#[derive(Debug, Clone, Copy)]
pub struct GridPointStats {
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
}

/// Median of a slice of `f64`. Empty input returns 0; not otherwise reached
/// since every grid point runs at least one path.
fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.partial_cmp(b).expect("NaN has no place in a financial balance"));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

#[must_use]
pub fn aggregate(config: &ScenarioConfig, outcome: &EnsembleOutcome) -> GridPointStats {
    let p_success_death_weighted =
        mortality::death_weighted_success(config.start_age, config.start_age + (config.years() as u32 - 1), &outcome.survival_fraction);
    let p_success_to_age_99 = mortality::age_99_success(&outcome.survival_fraction);

    let mut max_dd_risky: Vec<f64> = outcome.paths.iter().map(|p| p.max_dd_risky).collect();
    let mut max_dd_total: Vec<f64> = outcome.paths.iter().map(|p| p.max_dd_total).collect();
    let mut home_equity: Vec<f64> = outcome.paths.iter().map(|p| p.home_equity_remaining).collect();
    let mut rm_balance_end: Vec<f64> = outcome.paths.iter().map(|p| p.rm_balance_end).collect();
    let mut risky_end: Vec<f64> = outcome.paths.iter().map(|p| p.risky_end).collect();
    let mut total_net_end: Vec<f64> = outcome.paths.iter().map(|p| p.total_net_end).collect();
    let mut net_worth_end: Vec<f64> = outcome.paths.iter().map(|p| p.net_worth_end).collect();

    let n_any_rm = outcome.paths.iter().filter(|p| p.any_rm_draw).count();
    let p_any_rm_draw = if outcome.paths.is_empty() {
        0.0
    } else {
        n_any_rm as f64 / outcome.paths.len() as f64
    };

    GridPointStats {
        p_success_death_weighted,
        p_success_to_age_99,
        median_max_dd_risky: median(&mut max_dd_risky),
        median_max_dd_total: median(&mut max_dd_total),
        home_equity_remaining_median: median(&mut home_equity),
        p_any_rm_draw,
        rm_balance_end_median: median(&mut rm_balance_end),
        risky_end_median: median(&mut risky_end),
        total_net_end_median: median(&mut total_net_end),
        net_worth_end_median: median(&mut net_worth_end),
    }
}
