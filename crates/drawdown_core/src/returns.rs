//! Return generator (C1).
//!
//! Produces the `n_sims × years` matrix of real annual risky returns that
//! every grid point and every optimizer probe for a scenario shares. The
//! matrix depends only on `(seed, n_sims, years, return_mu_real,
//! return_vol_real)` — never on the grid point or on `E` — so it is built
//! once per scenario and handed down by reference.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand_distr::{Distribution, Normal};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Annual real returns are clipped below at this value: a total loss
/// floor, preventing balances from swinging negative under compounding.
const MIN_RETURN: f64 = -0.99;

/// Mixing constant used to derive an independent per-path seed from the
/// scenario seed.
const PATH_SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// `n_sims × years` matrix of i.i.d. normal real returns, row-major by
/// path. Deterministic given `seed`: the same seed always produces the
/// same matrix, regardless of how many grid points or optimizer probes
/// later consume it.
#[derive(Debug, Clone)]
pub struct ReturnsMatrix {
    pub n_sims: usize,
    pub years: usize,
    data: Vec<f64>,
}

impl ReturnsMatrix {
    #[must_use]
    pub fn generate(seed: u64, n_sims: usize, years: usize, mu: f64, sigma: f64) -> Self {
        let normal = Normal::new(mu, sigma.max(0.0)).unwrap_or_else(|_| {
            Normal::new(mu, 0.0).expect("degenerate normal with zero std-dev is always valid")
        });

        let generate_path = |sim: usize| -> Vec<f64> {
            let path_seed = seed.wrapping_add((sim as u64).wrapping_mul(PATH_SEED_MIX));
            let mut rng = SmallRng::seed_from_u64(path_seed);
            (0..years)
                .map(|_| normal.sample(&mut rng).max(MIN_RETURN))
                .collect::<Vec<f64>>()
        };

        #[cfg(feature = "parallel")]
        let rows: Vec<Vec<f64>> = (0..n_sims).into_par_iter().map(generate_path).collect();
        #[cfg(not(feature = "parallel"))]
        let rows: Vec<Vec<f64>> = (0..n_sims).map(generate_path).collect();

        let mut data = Vec::with_capacity(n_sims * years);
        for row in rows {
            data.extend(row);
        }

        ReturnsMatrix {
            n_sims,
            years,
            data,
        }
    }

    /// The return for `sim` in simulation-year `year` (0-indexed from
    /// `start_age`).
    #[inline]
    #[must_use]
    pub fn get(&self, sim: usize, year: usize) -> f64 {
        self.data[sim * self.years + year]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_given_seed() {
        let a = ReturnsMatrix::generate(42, 50, 10, 0.04, 0.12);
        let b = ReturnsMatrix::generate(42, 50, 10, 0.04, 0.12);
        for sim in 0..50 {
            for year in 0..10 {
                assert_eq!(a.get(sim, year), b.get(sim, year));
            }
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let a = ReturnsMatrix::generate(1, 20, 10, 0.04, 0.12);
        let b = ReturnsMatrix::generate(2, 20, 10, 0.04, 0.12);
        let any_different = (0..20).any(|sim| (0..10).any(|year| a.get(sim, year) != b.get(sim, year)));
        assert!(any_different);
    }

    #[test]
    fn returns_are_clipped_at_minus_99_percent() {
        // Huge volatility pushes well past the floor on some draws.
        let m = ReturnsMatrix::generate(7, 200, 5, 0.0, 50.0);
        for sim in 0..200 {
            for year in 0..5 {
                assert!(m.get(sim, year) >= MIN_RETURN);
            }
        }
    }

    #[test]
    fn zero_vol_gives_constant_return_per_path() {
        let m = ReturnsMatrix::generate(3, 5, 4, 0.04, 0.0);
        for sim in 0..5 {
            for year in 0..4 {
                assert!((m.get(sim, year) - 0.04).abs() < 1e-12);
            }
        }
    }
}
