//! Account arithmetic (C5).
//!
//! The only primitive that mutates a balance during withdrawal. Applied in
//! the exact funding-order sequence the path kernel defines (§4.6 step 8) —
//! this module just provides the one operation, not the ordering.

/// Withdraw `want` from a single `balance`, in place.
/// Returns `(taken, remaining_want)` with `taken = min(balance, want)`.
#[inline]
#[must_use]
pub fn take_scalar(balance: &mut f64, want: f64) -> (f64, f64) {
    debug_assert!(*balance >= 0.0, "balance must be non-negative going in");
    debug_assert!(want >= 0.0, "want must be non-negative");
    let taken = want.min(*balance);
    *balance -= taken;
    (taken, want - taken)
}

/// Vectorized form: `take(balance[], want[]) -> (taken[], remaining_want[])`,
/// applied path-by-path. Every path's `balance` is mutated in place.
pub fn take(balances: &mut [f64], wants: &[f64]) -> (Vec<f64>, Vec<f64>) {
    assert_eq!(balances.len(), wants.len(), "account arithmetic operates on parallel arrays");
    let mut taken = Vec::with_capacity(balances.len());
    let mut remaining = Vec::with_capacity(balances.len());
    for (balance, &want) in balances.iter_mut().zip(wants.iter()) {
        let (t, r) = take_scalar(balance, want);
        taken.push(t);
        remaining.push(r);
    }
    (taken, remaining)
}
