//! Scenario configuration.
//!
//! `ScenarioConfig` is the single value a caller hands the engine: a flat
//! record of ensemble, return-model, optimizer, income, spending, reserve,
//! guardrails, reverse-mortgage, equity-loan and grid-sweep fields. It is
//! immutable for the lifetime of a run — the optimizer and grid driver only
//! ever read it.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Age the annual loop runs through, inclusive. Not a config field: the
/// mortality table (`crate::mortality`) is bundled for exactly this range.
pub const FINAL_AGE: u32 = 99;

fn default_true() -> bool {
    true
}

fn default_surplus_allocation() -> SurplusAllocation {
    SurplusAllocation::ReserveFirst
}

fn default_success_metric() -> OptimizeSuccessMetric {
    OptimizeSuccessMetric::DeathWeighted
}

fn default_both_weight() -> f64 {
    0.5
}

fn default_search_iters() -> u32 {
    24
}

/// `single` evaluates one fixed spending level; `optimize` binary-searches
/// for the maximum spending level achieving a target success probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerMode {
    Optimize,
    Single,
}

/// Which success metric the optimizer maximizes `E` against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizeSuccessMetric {
    DeathWeighted,
    Age99,
    BothMin,
    BothWeighted,
}

/// Where to park a positive income/spend residual when surplus saving is
/// allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurplusAllocation {
    ReserveFirst,
    RiskyFirst,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    // === Ensemble controls ===
    pub seed: u64,
    pub n_sims: usize,
    pub start_age: u32,
    pub partial_year_fraction: f64,

    // === Return model ===
    pub return_mu_real: f64,
    pub return_vol_real: f64,

    // === Optimizer controls ===
    pub mode: OptimizerMode,
    pub e_fixed: i64,
    pub target_success_death_weighted: f64,
    pub e_lo: i64,
    pub e_hi: i64,
    #[serde(default = "default_search_iters")]
    pub e_search_iters: u32,
    #[serde(default = "default_success_metric")]
    pub optimize_success_metric: OptimizeSuccessMetric,
    #[serde(default = "default_both_weight")]
    pub both_weight: f64,

    // === Income ===
    pub ss_annual_real: f64,
    pub ss_start_age: u32,
    #[serde(default)]
    pub earned_income_annual_real: f64,
    #[serde(default)]
    pub earned_income_start_age: u32,
    #[serde(default)]
    pub earned_income_end_age: u32,
    #[serde(default = "default_true")]
    pub income_applies_to_actual_spend: bool,
    #[serde(default = "default_true")]
    pub allow_surplus_savings: bool,
    #[serde(default = "default_surplus_allocation")]
    pub surplus_allocation: SurplusAllocation,

    // === Spending ===
    pub floor_annual_real: f64,

    // === Reserve ===
    pub reserve_cash_fraction: f64,
    pub safe_real_return: f64,

    // === Guardrails ===
    pub dd1: f64,
    pub dd2: f64,
    pub cut1: f64,
    pub cut2: f64,
    pub baseline_flex_pre: f64,
    pub baseline_e_for_flex: f64,
    pub baseline_flex_post: f64,
    pub baseline_net_post_ss: f64,

    // === Reverse mortgage ===
    pub rm_open_age: u32,
    pub home_value_real: f64,
    pub rm_plf_at_open: f64,
    pub rm_limit_real_growth: f64,
    pub rm_bal_real_rate: f64,
    pub rm_partial_cover: f64,
    pub rm_repay_rate: f64,
    pub payoff_dd_threshold: f64,

    // === Equity loan ===
    pub loan_real_rate: f64,
    pub loan_term_years: u32,
    pub loan_bucket_real_return: f64,
    pub loan_bucket_use_dd: f64,
    pub loan_bucket_partial_cover: f64,

    // === Sweep grids ===
    pub start_portfolios: Vec<f64>,
    pub reserve_years_list: Vec<u32>,
    pub loan_amounts: Vec<f64>,
}

impl ScenarioConfig {
    /// Number of simulated years, first-year-partial included.
    #[must_use]
    pub fn years(&self) -> usize {
        (FINAL_AGE + 1).saturating_sub(self.start_age) as usize
    }

    /// Validate every documented range, accumulating all violations rather
    /// than failing on the first (§7: the entire request fails with one
    /// descriptive message, so give the caller everything at once).
    pub fn validate(&self) -> Result<(), EngineError> {
        let mut errors = Vec::new();
        let mut unit = |name: &str, v: f64| {
            if !(0.0..=1.0).contains(&v) {
                errors.push(format!("{name} must be in [0, 1], got {v}"));
            }
        };
        unit("reserve_cash_fraction", self.reserve_cash_fraction);
        unit("dd1", self.dd1);
        unit("dd2", self.dd2);
        unit("cut1", self.cut1);
        unit("cut2", self.cut2);
        unit("rm_partial_cover", self.rm_partial_cover);
        unit("rm_repay_rate", self.rm_repay_rate);
        unit("loan_bucket_partial_cover", self.loan_bucket_partial_cover);
        unit("loan_bucket_use_dd", self.loan_bucket_use_dd);
        unit("payoff_dd_threshold", self.payoff_dd_threshold);
        unit("both_weight", self.both_weight);
        unit(
            "target_success_death_weighted",
            self.target_success_death_weighted,
        );

        let mut age = |name: &str, a: u32| {
            if a > 120 {
                errors.push(format!("{name} must be in [0, 120], got {a}"));
            }
        };
        age("start_age", self.start_age);
        age("ss_start_age", self.ss_start_age);
        age("earned_income_start_age", self.earned_income_start_age);
        age("earned_income_end_age", self.earned_income_end_age);
        age("rm_open_age", self.rm_open_age);

        let mut nonneg = |name: &str, v: f64| {
            if v < 0.0 {
                errors.push(format!("{name} must be non-negative, got {v}"));
            }
        };
        nonneg("ss_annual_real", self.ss_annual_real);
        nonneg("earned_income_annual_real", self.earned_income_annual_real);
        nonneg("floor_annual_real", self.floor_annual_real);
        nonneg("home_value_real", self.home_value_real);

        if self.n_sims == 0 {
            errors.push("n_sims must be at least 1".to_string());
        }
        if self.start_age > FINAL_AGE {
            errors.push(format!(
                "start_age must be <= {FINAL_AGE}, got {}",
                self.start_age
            ));
        }

        if self.start_portfolios.is_empty() {
            errors.push("start_portfolios must be non-empty".to_string());
        } else if self.start_portfolios.iter().any(|&v| v < 0.0) {
            errors.push("start_portfolios must contain only non-negative values".to_string());
        }
        if self.reserve_years_list.is_empty() {
            errors.push("reserve_years_list must be non-empty".to_string());
        }
        if self.loan_amounts.is_empty() {
            errors.push("loan_amounts must be non-empty".to_string());
        } else if self.loan_amounts.iter().any(|&v| v < 0.0) {
            errors.push("loan_amounts must contain only non-negative values".to_string());
        }

        match self.mode {
            OptimizerMode::Optimize => {
                if self.e_lo > self.e_hi {
                    errors.push(format!(
                        "e_lo ({}) must be <= e_hi ({}) in optimize mode",
                        self.e_lo, self.e_hi
                    ));
                }
                if self.e_lo < 0 {
                    errors.push("e_lo must be non-negative".to_string());
                }
            }
            OptimizerMode::Single => {
                if self.e_fixed < 0 {
                    errors.push("e_fixed must be non-negative".to_string());
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(EngineError::validation(errors))
        }
    }
}
