//! Boundary behaviors from the component design's testable properties.

use crate::api::ScenarioRequest;
use crate::config::{OptimizeSuccessMetric, OptimizerMode, ScenarioConfig, SurplusAllocation};
use crate::run_scenario;

fn base_config() -> ScenarioConfig {
    ScenarioConfig {
        seed: 22,
        n_sims: 40,
        start_age: 53,
        partial_year_fraction: 1.0,
        return_mu_real: 0.04,
        return_vol_real: 0.1,
        mode: OptimizerMode::Single,
        e_fixed: 60_000,
        target_success_death_weighted: 0.9,
        e_lo: 40_000,
        e_hi: 220_000,
        e_search_iters: 20,
        optimize_success_metric: OptimizeSuccessMetric::DeathWeighted,
        both_weight: 0.5,
        ss_annual_real: 30_000.0,
        ss_start_age: 67,
        earned_income_annual_real: 0.0,
        earned_income_start_age: 0,
        earned_income_end_age: 0,
        income_applies_to_actual_spend: true,
        allow_surplus_savings: true,
        surplus_allocation: SurplusAllocation::ReserveFirst,
        floor_annual_real: 20_000.0,
        reserve_cash_fraction: 0.5,
        safe_real_return: 0.01,
        dd1: 0.1,
        dd2: 0.2,
        cut1: 0.1,
        cut2: 0.25,
        baseline_flex_pre: 20_000.0,
        baseline_e_for_flex: 80_000.0,
        baseline_flex_post: 10_000.0,
        baseline_net_post_ss: 50_000.0,
        rm_open_age: 999,
        home_value_real: 500_000.0,
        rm_plf_at_open: 0.5,
        rm_limit_real_growth: 0.03,
        rm_bal_real_rate: 0.05,
        rm_partial_cover: 0.5,
        rm_repay_rate: 0.1,
        payoff_dd_threshold: 0.1,
        loan_real_rate: 0.05,
        loan_term_years: 15,
        loan_bucket_real_return: 0.02,
        loan_bucket_use_dd: 0.15,
        loan_bucket_partial_cover: 0.5,
        start_portfolios: vec![1_000_000.0],
        reserve_years_list: vec![1],
        loan_amounts: vec![0.0],
    }
}

#[test]
fn ss_start_age_equal_to_start_age_nets_ss_from_year_one() {
    let mut config = base_config();
    config.ss_start_age = config.start_age;
    let response = run_scenario(ScenarioRequest { scenario: config, run_id: None });
    assert_eq!(response.results.len(), 1);
}

#[test]
fn zero_reserve_years_runs_without_a_reserve() {
    let mut config = base_config();
    config.reserve_years_list = vec![0];
    let response = run_scenario(ScenarioRequest { scenario: config, run_id: None });
    let point = &response.results[0];
    assert!(point.p_success_death_weighted >= 0.0);
}

#[test]
fn zero_loan_amount_is_a_no_op_for_the_loan_bucket() {
    let mut config = base_config();
    config.loan_amounts = vec![0.0];
    let response = run_scenario(ScenarioRequest { scenario: config, run_id: None });
    assert_eq!(response.results[0].loan_amount, 0.0);
}

#[test]
fn rm_open_age_equal_to_start_age_opens_the_line_in_year_one() {
    let mut config = base_config();
    config.rm_open_age = config.start_age;
    config.loan_amounts = vec![50_000.0];
    let response = run_scenario(ScenarioRequest { scenario: config, run_id: None });
    // Should not panic or fail validation; the lien is paid off at year one.
    assert_eq!(response.results.len(), 1);
}

#[test]
fn single_path_ensemble_still_produces_a_well_formed_result() {
    let mut config = base_config();
    config.n_sims = 1;
    let response = run_scenario(ScenarioRequest { scenario: config, run_id: None });
    let point = &response.results[0];
    assert!(point.p_success_death_weighted == 0.0 || point.p_success_death_weighted > 0.0);
}

#[test]
fn infeasible_grid_point_reports_zero_success_not_an_error() {
    let mut config = base_config();
    config.start_portfolios = vec![1_000.0];
    config.reserve_years_list = vec![50];
    config.e_fixed = 100_000;
    let response = run_scenario(ScenarioRequest { scenario: config, run_id: None });
    let point = &response.results[0];
    assert_eq!(point.p_success_death_weighted, 0.0);
    assert_eq!(point.p_success_to_age_99, 0.0);
}
