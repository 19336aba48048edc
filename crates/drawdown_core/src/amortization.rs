//! Amortization (C4).
//!
//! Closed-form fixed real annuity payment for the equity loan. Computed
//! once at kernel setup from `(loan_amount, loan_real_rate,
//! loan_term_years)`.

/// Annual payment that fully amortizes principal `p` over `n` years at
/// real rate `r`. `A = P·r / (1 − (1+r)^−n)` when `r > 0`, else `P / n`.
#[must_use]
pub fn annual_payment(principal: f64, rate: f64, term_years: u32) -> f64 {
    if term_years == 0 || principal <= 0.0 {
        return 0.0;
    }
    let n = f64::from(term_years);
    if rate > 0.0 {
        principal * rate / (1.0 - (1.0 + rate).powf(-n))
    } else {
        principal / n
    }
}
