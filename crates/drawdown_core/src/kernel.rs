//! Path kernel (C6) — the heart of the engine.
//!
//! Owns all per-path state for one `(grid point, E)` probe and runs the
//! year-by-year ensemble state machine: funding order, guardrails,
//! reverse-mortgage line of credit, amortized equity loan, failure
//! detection. Every operation here is a map over parallel per-path arrays;
//! within a year the loop is written per-path for readability, but produces
//! the same output a fully vectorized implementation would (§4.6, §9).

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::accounts::take_scalar;
use crate::amortization::annual_payment;
use crate::config::{ScenarioConfig, SurplusAllocation};
use crate::guardrails::{self, FlexFractions};
use crate::returns::ReturnsMatrix;

/// Drawdown never reported negative: a value above its own high-water mark
/// is a new high, not a "negative drawdown".
#[inline]
fn drawdown(value: f64, hwm: f64) -> f64 {
    if hwm <= 0.0 { 0.0 } else { (1.0 - value / hwm).max(0.0) }
}

/// Tolerance for "risky at a new high" in the RM-repayment trigger
/// (§9 Open Question (a)): `dd <= EPS` reads as `risky >= hwm_risky`
/// within floating-point noise.
const NEW_HIGH_EPS: f64 = 1e-9;

/// Floor below which a residual funding shortfall is treated as zero
/// (avoids spurious failures from floating-point residue).
const RESIDUAL_EPS: f64 = 1e-6;

/// Failure causes, tracked for diagnostics only — never surfaced in
/// [`crate::aggregate::GridPointResult`] (§4.6, §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    InfeasibleInitialization,
    FloorNotFundable,
    LoanPaymentNotFundable,
    LienPayoffIncomplete,
}

/// Per-path mutable state, owned exclusively by whichever worker processes
/// this path (§5: "Path state arrays are owned exclusively by a single
/// worker").
#[derive(Debug, Clone)]
struct PathState {
    risky: f64,
    cash: f64,
    base_treas: f64,
    loan_bucket: f64,
    loan_balance: f64,
    rm_limit: f64,
    rm_balance: f64,
    hwm_risky: f64,
    hwm_total: f64,
    max_dd_risky: f64,
    max_dd_total: f64,
    ever_rm_draw: bool,
    alive_and_ok: bool,
    fail_age: Option<u32>,
    fail_reason: Option<FailureReason>,
}

impl PathState {
    fn total_net(&self) -> f64 {
        self.cash + self.base_treas + self.risky + self.loan_bucket - self.loan_balance
    }

    fn fail(&mut self, age: u32, reason: FailureReason) {
        if self.alive_and_ok {
            self.alive_and_ok = false;
            self.fail_age = Some(age);
            self.fail_reason = Some(reason);
        }
    }
}

/// Per-path terminal outcome the aggregator (C7) reduces over.
#[derive(Debug, Clone)]
pub struct PathOutcome {
    pub max_dd_risky: f64,
    pub max_dd_total: f64,
    pub home_equity_remaining: f64,
    pub any_rm_draw: bool,
    pub rm_balance_end: f64,
    pub risky_end: f64,
    pub total_net_end: f64,
    pub net_worth_end: f64,
}

/// Full ensemble outcome of one kernel invocation: one `(grid point, E)`
/// probe.
#[derive(Debug, Clone)]
pub struct EnsembleOutcome {
    /// Fraction of paths `alive_and_ok` after each simulated year, indexed
    /// from `start_age`. Feeds the death-weighted and age-99 success
    /// metrics (C2).
    pub survival_fraction: Vec<f64>,
    pub paths: Vec<PathOutcome>,
    /// True if the grid point was infeasible at setup (§4.6, §7): every
    /// path failed in year 0 before the annual loop ran.
    pub infeasible: bool,
}

impl EnsembleOutcome {
    fn infeasible(n_sims: usize, years: usize, home_value_real: f64) -> Self {
        let outcome = PathOutcome {
            max_dd_risky: 0.0,
            max_dd_total: 0.0,
            home_equity_remaining: home_value_real,
            any_rm_draw: false,
            rm_balance_end: 0.0,
            risky_end: 0.0,
            total_net_end: 0.0,
            net_worth_end: home_value_real,
        };
        EnsembleOutcome {
            survival_fraction: vec![0.0; years],
            paths: vec![outcome; n_sims],
            infeasible: true,
        }
    }
}

// Values that depend only on the age, not the path — computed once per
// simulated year and shared across every path's step.
struct AgeContext {
    age: u32,
    planned: f64,
    floor_target: f64,
    earned: f64,
    /// Social Security due this year, pro-rated — only folded into the
    /// step-8 income offset when `income_applies_to_actual_spend`; the
    /// legacy branch already baked it into `planned` (§4.6 step 1/3).
    ss_amount: f64,
    flex_fraction: f64,
    target_cash: f64,
    target_treas: f64,
    loan_payment_due: bool,
}

/// Run the full year-by-year simulation for one `(grid point, E)` probe.
#[allow(clippy::too_many_arguments)]
pub fn simulate_grid_point(
    config: &ScenarioConfig,
    returns: &ReturnsMatrix,
    start_portfolio: f64,
    reserve_years: u32,
    loan_amount: f64,
    e: i64,
) -> EnsembleOutcome {
    let years = config.years();
    let e_f = e as f64;

    let next_year_withdrawal_0 = e_f * config.partial_year_fraction;
    let reserve_total = f64::from(reserve_years) * next_year_withdrawal_0;
    let cash0 = config.reserve_cash_fraction * reserve_total;
    let treas0 = reserve_total - cash0;
    let risky0 = start_portfolio - reserve_total - loan_amount;

    if risky0 < 0.0 {
        return EnsembleOutcome::infeasible(config.n_sims, years, config.home_value_real);
    }

    let loan_payment = annual_payment(loan_amount, config.loan_real_rate, config.loan_term_years);
    let flex = guardrails::calibrate(
        config.baseline_flex_pre,
        config.baseline_e_for_flex,
        config.baseline_flex_post,
        config.baseline_net_post_ss,
    );

    let total_net0 = cash0 + treas0 + risky0 + loan_amount - loan_amount;

    let mut states: Vec<PathState> = (0..config.n_sims)
        .map(|_| PathState {
            risky: risky0,
            cash: cash0,
            base_treas: treas0,
            loan_bucket: loan_amount,
            loan_balance: loan_amount,
            rm_limit: 0.0,
            rm_balance: 0.0,
            hwm_risky: risky0,
            hwm_total: total_net0,
            max_dd_risky: 0.0,
            max_dd_total: 0.0,
            ever_rm_draw: false,
            alive_and_ok: true,
            fail_age: None,
            fail_reason: None,
        })
        .collect();

    let mut survival_fraction = Vec::with_capacity(years);

    for year_idx in 0..years {
        let age = config.start_age + year_idx as u32;
        let ctx = age_context_for(config, &flex, age, year_idx, e_f, reserve_years);

        #[cfg(feature = "parallel")]
        let iter = states.par_iter_mut();
        #[cfg(not(feature = "parallel"))]
        let iter = states.iter_mut();

        iter.enumerate().for_each(|(sim, state)| {
            if state.alive_and_ok {
                step_one_year(state, config, &ctx, returns.get(sim, year_idx), loan_payment);
            }
        });

        let alive = states.iter().filter(|s| s.alive_and_ok).count();
        survival_fraction.push(alive as f64 / config.n_sims as f64);
    }

    let paths = states
        .iter()
        .map(|s| {
            let home_equity_remaining = (config.home_value_real - s.rm_balance).max(0.0);
            let total_net_end = s.total_net();
            PathOutcome {
                max_dd_risky: s.max_dd_risky,
                max_dd_total: s.max_dd_total,
                home_equity_remaining,
                any_rm_draw: s.ever_rm_draw,
                rm_balance_end: s.rm_balance,
                risky_end: s.risky,
                total_net_end,
                net_worth_end: total_net_end + home_equity_remaining,
            }
        })
        .collect();

    EnsembleOutcome { survival_fraction, paths, infeasible: false }
}

fn age_context_for(
    config: &ScenarioConfig,
    flex: &FlexFractions,
    age: u32,
    year_idx: usize,
    e_f: f64,
    reserve_years: u32,
) -> AgeContext {
    let is_first_year = year_idx == 0;
    let partial = if is_first_year { config.partial_year_fraction } else { 1.0 };

    let ss_applies = age >= config.ss_start_age;
    let ss_amount = if ss_applies { config.ss_annual_real * partial } else { 0.0 };

    // §4.6 step 1/3: in the legacy branch SS nets out of `planned` right
    // here, before guardrails ever see it. In the actual-spend branch
    // guardrails operate on the gross `planned`; SS instead offsets the
    // funded amount alongside earned income in step 3/8 (see `ss_amount`
    // use in `step_one_year`).
    let mut planned = if config.income_applies_to_actual_spend {
        e_f
    } else if ss_applies {
        (e_f - config.ss_annual_real).max(0.0)
    } else {
        e_f
    };
    planned *= partial;

    let earned_applies =
        config.earned_income_start_age <= age && age <= config.earned_income_end_age;
    let earned = if earned_applies { config.earned_income_annual_real * partial } else { 0.0 };

    let flex_fraction = if ss_applies { flex.post } else { flex.pre };

    let next_age = age + 1;
    let next_ss_applies = next_age >= config.ss_start_age;
    let next_year_withdrawal =
        (e_f - if next_ss_applies { config.ss_annual_real } else { 0.0 }).max(0.0);
    let target_total = f64::from(reserve_years) * next_year_withdrawal;
    let target_cash = config.reserve_cash_fraction * target_total;
    let target_treas = target_total - target_cash;

    AgeContext {
        age,
        planned,
        floor_target: config.floor_annual_real * partial,
        earned,
        ss_amount,
        flex_fraction,
        target_cash,
        target_treas,
        loan_payment_due: age < config.rm_open_age && year_idx < config.loan_term_years as usize,
    }
}

/// Steps 1–13 of §4.6 for a single path, for a single simulated year.
fn step_one_year(
    state: &mut PathState,
    config: &ScenarioConfig,
    ctx: &AgeContext,
    r: f64,
    loan_payment: f64,
) {
    // --- Step 4: loan payment, pre-RM-open ---
    if ctx.loan_payment_due && state.loan_balance > 0.0 {
        let mut residual = loan_payment;
        let (_, rem) = take_scalar(&mut state.cash, residual);
        residual = rem;
        let (_, rem) = take_scalar(&mut state.base_treas, residual);
        residual = rem;
        let (_, rem) = take_scalar(&mut state.risky, residual);
        residual = rem;

        if residual > RESIDUAL_EPS {
            let dd_now = drawdown(state.risky, state.hwm_risky);
            if dd_now >= config.loan_bucket_use_dd {
                let (_, rem) = take_scalar(&mut state.loan_bucket, residual);
                residual = rem;
            }
        }

        if residual > RESIDUAL_EPS {
            state.fail(ctx.age, FailureReason::LoanPaymentNotFundable);
            return;
        }

        let interest = state.loan_balance * config.loan_real_rate;
        let principal_paid = (loan_payment - interest).max(0.0);
        state.loan_balance = (state.loan_balance - principal_paid).max(0.0);
    }

    // --- Step 5: drawdown ---
    let dd = drawdown(state.risky, state.hwm_risky);

    // --- Step 6: guardrails flex split ---
    let flex_amt = (ctx.flex_fraction * ctx.planned).min(ctx.planned);
    let floor_amt = ctx.planned - flex_amt;
    let cut = if dd >= config.dd2 {
        config.cut2
    } else if dd >= config.dd1 {
        config.cut1
    } else {
        0.0
    };
    let desired_spend = floor_amt + flex_amt * (1.0 - cut);

    // --- Step 7: floor enforcement ---
    let spend_target = desired_spend.max(ctx.floor_target);

    // --- Step 3: income application ---
    // Actual-spend mode offsets the funded amount with SS *and* earned
    // income (SS was left in `planned`, gross, for the guardrails split
    // above); legacy mode already netted SS out of `planned`, so only
    // earned applies here.
    let income_offset = if config.income_applies_to_actual_spend {
        ctx.ss_amount + ctx.earned
    } else {
        ctx.earned
    };
    let funding_need = (spend_target - income_offset).max(0.0);
    let surplus = (income_offset - spend_target).max(0.0);

    // --- Step 8: funding order ---
    let mut residual = funding_need;
    let (_, rem) = take_scalar(&mut state.cash, residual);
    residual = rem;
    let (_, rem) = take_scalar(&mut state.base_treas, residual);
    residual = rem;

    if dd >= config.loan_bucket_use_dd {
        let cap = config.loan_bucket_partial_cover * residual;
        let want = cap.min(residual);
        let (_, leftover) = take_scalar(&mut state.loan_bucket, want);
        residual -= want - leftover;
    }

    if ctx.age >= config.rm_open_age && dd >= config.dd2 {
        let cap = config.rm_partial_cover * residual;
        let want = cap.min(residual);
        let (taken, _) = draw_from_rm(state, want);
        residual -= taken;
    }

    let (_, rem) = take_scalar(&mut state.risky, residual);
    residual = rem;

    if residual > RESIDUAL_EPS {
        let available_rm = (state.rm_limit - state.rm_balance).max(0.0);
        let (taken, _) = draw_from_rm(state, residual.min(available_rm));
        residual -= taken;
    }

    if residual > RESIDUAL_EPS {
        let (_, rem) = take_scalar(&mut state.loan_bucket, residual);
        residual = rem;
    }

    if residual > RESIDUAL_EPS {
        state.fail(ctx.age, FailureReason::FloorNotFundable);
        return;
    }

    // --- Surplus reinvestment (part of step 3) ---
    let reinvest = surplus > 0.0
        && (config.income_applies_to_actual_spend || config.allow_surplus_savings);
    if reinvest {
        apply_surplus(state, config, ctx, surplus);
    }

    // --- Step 9: RM open / lien payoff ---
    if ctx.age == config.rm_open_age {
        state.rm_limit = config.home_value_real * config.rm_plf_at_open;
        if state.loan_balance > 0.0 {
            let mut lien_residual = state.loan_balance;
            if dd <= config.payoff_dd_threshold {
                lien_residual = payoff_step(&mut state.risky, lien_residual);
                lien_residual = payoff_from_rm(state, lien_residual);
            } else {
                lien_residual = payoff_from_rm(state, lien_residual);
                lien_residual = payoff_step(&mut state.risky, lien_residual);
            }
            lien_residual = payoff_step(&mut state.cash, lien_residual);
            lien_residual = payoff_step(&mut state.base_treas, lien_residual);
            lien_residual = payoff_step(&mut state.loan_bucket, lien_residual);

            if lien_residual > RESIDUAL_EPS {
                state.fail(ctx.age, FailureReason::LienPayoffIncomplete);
                return;
            }
            state.loan_balance = 0.0;
        }
    }

    // --- Step 10: RM repayment ---
    if dd <= NEW_HIGH_EPS && state.rm_balance > 0.0 {
        let repay = (config.rm_repay_rate * state.rm_balance).min(state.risky);
        state.risky -= repay;
        state.rm_balance -= repay;
    }

    // --- Step 11: reserve refill ---
    if dd < config.dd1 {
        let need_cash = (ctx.target_cash - state.cash).max(0.0);
        let taken_cash = need_cash.min(state.risky);
        state.risky -= taken_cash;
        state.cash += taken_cash;

        let need_treas = (ctx.target_treas - state.base_treas).max(0.0);
        let taken_treas = need_treas.min(state.risky);
        state.risky -= taken_treas;
        state.base_treas += taken_treas;
    }

    // --- Step 12: apply returns ---
    state.risky *= 1.0 + r;
    state.cash *= 1.0 + config.safe_real_return;
    state.base_treas *= 1.0 + config.safe_real_return;
    state.loan_bucket *= 1.0 + config.loan_bucket_real_return;
    if state.rm_limit > 0.0 || ctx.age >= config.rm_open_age {
        state.rm_limit *= 1.0 + config.rm_limit_real_growth;
        state.rm_balance *= 1.0 + config.rm_bal_real_rate;
    }

    // --- Step 13: HWM and metric updates ---
    state.hwm_risky = state.hwm_risky.max(state.risky);
    state.max_dd_risky = state.max_dd_risky.max(dd);

    let total_net = state.total_net();
    let dd_total = drawdown(total_net, state.hwm_total);
    state.max_dd_total = state.max_dd_total.max(dd_total);
    state.hwm_total = state.hwm_total.max(total_net);
}

/// Surplus reinvestment per `surplus_allocation`: reserve-first tops up
/// cash then treasuries to their (next-year) targets before overflowing
/// into risky; risky-first goes straight to risky.
fn apply_surplus(state: &mut PathState, config: &ScenarioConfig, ctx: &AgeContext, surplus: f64) {
    match config.surplus_allocation {
        SurplusAllocation::RiskyFirst => state.risky += surplus,
        SurplusAllocation::ReserveFirst => {
            let mut remaining = surplus;
            let need_cash = (ctx.target_cash - state.cash).max(0.0).min(remaining);
            state.cash += need_cash;
            remaining -= need_cash;
            let need_treas = (ctx.target_treas - state.base_treas).max(0.0).min(remaining);
            state.base_treas += need_treas;
            remaining -= need_treas;
            state.risky += remaining;
        }
    }
}

/// Draw `want` from the reverse-mortgage credit line, bounded by remaining
/// available credit (`rm_limit - rm_balance`). Increases `rm_balance`.
fn draw_from_rm(state: &mut PathState, want: f64) -> (f64, f64) {
    let available = (state.rm_limit - state.rm_balance).max(0.0);
    let taken = want.min(available).max(0.0);
    state.rm_balance += taken;
    if taken > 0.0 {
        state.ever_rm_draw = true;
    }
    (taken, want - taken)
}

/// One source step in the lien-payoff sequence: draws up to `residual`
/// from `balance`, returns the remaining residual.
fn payoff_step(balance: &mut f64, residual: f64) -> f64 {
    let (_, rem) = take_scalar(balance, residual);
    rem
}

fn payoff_from_rm(state: &mut PathState, residual: f64) -> f64 {
    let (taken, _) = draw_from_rm(state, residual);
    residual - taken
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OptimizeSuccessMetric, OptimizerMode};

    fn base_config() -> ScenarioConfig {
        ScenarioConfig {
            seed: 1,
            n_sims: 50,
            start_age: 53,
            partial_year_fraction: 1.0,
            return_mu_real: 0.04,
            return_vol_real: 0.10,
            mode: OptimizerMode::Single,
            e_fixed: 80_000,
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
    fn zero_spend_never_fails() {
        let config = base_config();
        let returns = ReturnsMatrix::generate(
            config.seed,
            config.n_sims,
            config.years(),
            config.return_mu_real,
            config.return_vol_real,
        );
        let outcome = simulate_grid_point(&config, &returns, 1_000_000.0, 1, 0.0, 0);
        assert!(outcome.survival_fraction.iter().all(|&f| (f - 1.0).abs() < 1e-12));
    }

    #[test]
    fn huge_spend_on_small_portfolio_fails_immediately() {
        let mut config = base_config();
        config.floor_annual_real = 10_000_000.0;
        let returns = ReturnsMatrix::generate(
            config.seed,
            config.n_sims,
            config.years(),
            config.return_mu_real,
            config.return_vol_real,
        );
        let outcome =
            simulate_grid_point(&config, &returns, 1_000_000.0, 1, 0.0, 10_000_000);
        assert!(outcome.survival_fraction[0] < 1e-9);
    }

    #[test]
    fn infeasible_initialization_is_reported_without_running_paths() {
        let config = base_config();
        let returns = ReturnsMatrix::generate(
            config.seed,
            config.n_sims,
            config.years(),
            config.return_mu_real,
            config.return_vol_real,
        );
        // start_portfolio smaller than reserve requirement at this E.
        let outcome = simulate_grid_point(&config, &returns, 1_000.0, 50, 0.0, 200_000);
        assert!(outcome.infeasible);
        assert!(outcome.survival_fraction.iter().all(|&f| f == 0.0));
    }

    #[test]
    fn deterministic_given_identical_inputs() {
        let config = base_config();
        let returns = ReturnsMatrix::generate(
            config.seed,
            config.n_sims,
            config.years(),
            config.return_mu_real,
            config.return_vol_real,
        );
        let a = simulate_grid_point(&config, &returns, 1_000_000.0, 1, 0.0, 80_000);
        let b = simulate_grid_point(&config, &returns, 1_000_000.0, 1, 0.0, 80_000);
        assert_eq!(a.survival_fraction, b.survival_fraction);
        for (pa, pb) in a.paths.iter().zip(b.paths.iter()) {
            assert_eq!(pa.risky_end, pb.risky_end);
            assert_eq!(pa.total_net_end, pb.total_net_end);
        }
    }

    #[test]
    fn disabled_reverse_mortgage_never_draws() {
        let config = base_config(); // rm_open_age = 999
        let returns = ReturnsMatrix::generate(
            config.seed,
            config.n_sims,
            config.years(),
            config.return_mu_real,
            config.return_vol_real,
        );
        let outcome = simulate_grid_point(&config, &returns, 1_000_000.0, 1, 0.0, 80_000);
        assert!(outcome.paths.iter().all(|p| !p.any_rm_draw));
        assert!(
            outcome
                .paths
                .iter()
                .all(|p| (p.home_equity_remaining - config.home_value_real).abs() < 1e-6)
        );
    }

    #[test]
    fn zero_volatility_gives_identical_terminal_values_across_paths() {
        let mut config = base_config();
        config.return_vol_real = 0.0;
        let returns = ReturnsMatrix::generate(
            config.seed,
            config.n_sims,
            config.years(),
            config.return_mu_real,
            config.return_vol_real,
        );
        let outcome = simulate_grid_point(&config, &returns, 1_000_000.0, 1, 0.0, 80_000);
        let first = outcome.paths[0].risky_end;
        assert!(outcome.paths.iter().all(|p| (p.risky_end - first).abs() < 1e-6));
    }

    /// §4.6 step 3 / §9: the two `income_applies_to_actual_spend` branches
    /// must actually diverge once guardrails are cutting flex spending —
    /// gross `planned` (true branch) vs SS-net `planned` (legacy branch)
    /// feed different dollar amounts into the flex/cut split.
    #[test]
    fn income_application_mode_changes_outcome_once_guardrails_cut() {
        let mut config = base_config();
        // A short, three-year horizon with a steady negative return: dd
        // stays nonzero (and above dd1) from year 1 onward without ever
        // depleting the portfolio, so the two branches' spend differs but
        // neither fails.
        config.start_age = 97;
        config.ss_start_age = 97;
        config.ss_annual_real = 20_000.0;
        config.dd1 = 0.01;
        config.dd2 = 0.9;
        config.cut1 = 0.3;
        config.floor_annual_real = 1_000.0;
        config.return_mu_real = -0.15;
        config.return_vol_real = 0.0;
        config.n_sims = 1;

        let returns = ReturnsMatrix::generate(
            config.seed,
            config.n_sims,
            config.years(),
            config.return_mu_real,
            config.return_vol_real,
        );

        config.income_applies_to_actual_spend = true;
        let true_outcome = simulate_grid_point(&config, &returns, 1_000_000.0, 1, 0.0, 60_000);

        config.income_applies_to_actual_spend = false;
        let false_outcome = simulate_grid_point(&config, &returns, 1_000_000.0, 1, 0.0, 60_000);

        assert!(
            (true_outcome.paths[0].risky_end - false_outcome.paths[0].risky_end).abs() > 1.0,
            "gross-planned and SS-net-planned guardrail splits should diverge under a sustained cut"
        );
    }
}
