//! Guardrails calibration (C3).
//!
//! Converts the scenario's baseline flex-dollar constants into the flex
//! *fractions* the path kernel applies every year. Calibrated once per
//! scenario, reused for every path and every grid point.

/// Pre-SS and post-SS flex fractions of planned spending, each clipped to
/// `[0, 1]`.
#[derive(Debug, Clone, Copy)]
pub struct FlexFractions {
    pub pre: f64,
    pub post: f64,
}

#[must_use]
pub fn calibrate(
    baseline_flex_pre: f64,
    baseline_e_for_flex: f64,
    baseline_flex_post: f64,
    baseline_net_post_ss: f64,
) -> FlexFractions {
    let ratio = |num: f64, denom: f64| -> f64 {
        if denom == 0.0 {
            0.0
        } else {
            (num / denom).clamp(0.0, 1.0)
        }
    };

    FlexFractions {
        pre: ratio(baseline_flex_pre, baseline_e_for_flex),
        post: ratio(baseline_flex_post, baseline_net_post_ss),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_plain_ratios() {
        let f = calibrate(20_000.0, 80_000.0, 10_000.0, 50_000.0);
        assert!((f.pre - 0.25).abs() < 1e-12);
        assert!((f.post - 0.2).abs() < 1e-12);
    }

    #[test]
    fn clips_to_unit_interval() {
        let f = calibrate(100_000.0, 80_000.0, -5.0, 50_000.0);
        assert!((f.pre - 1.0).abs() < 1e-12);
        assert!((f.post - 0.0).abs() < 1e-12);
    }

    #[test]
    fn zero_denominator_is_zero_flex() {
        let f = calibrate(20_000.0, 0.0, 10_000.0, 0.0);
        assert_eq!(f.pre, 0.0);
        assert_eq!(f.post, 0.0);
    }
}
