//! The three-parameter logistic response model.
//!
//! `P(θ) = c + (1 - c) / (1 + exp(-a(θ - b)))`
//!
//! The 1PL and 2PL models are special cases with `a = 1, c = 0` and `c = 0`
//! respectively. Callers that want those defaults should go through
//! [`Item::one_pl`](crate::model::Item::one_pl) and
//! [`Item::two_pl`](crate::model::Item::two_pl); the free functions here take
//! every parameter explicitly.

use rand::Rng;

/// Floor applied to `p` before dividing by it in [`information`].
pub const PROBABILITY_EPSILON: f64 = 1e-10;

/// Probability of a correct response.
///
/// Always lies in `[c, 1]` for finite inputs with `a > 0` and `c ∈ [0, 1)`.
/// `a = 0` is not guarded here; validated items never carry it.
#[inline]
pub fn probability(theta: f64, b: f64, a: f64, c: f64) -> f64 {
    c + (1.0 - c) / (1.0 + (-a * (theta - b)).exp())
}

/// Elementwise [`probability`] over a grid of abilities.
pub fn probability_curve(thetas: &[f64], b: f64, a: f64, c: f64) -> Vec<f64> {
    thetas.iter().map(|&t| probability(t, b, a, c)).collect()
}

/// Item information at `theta`.
///
/// `I(θ) = a² (p - c)² / (1 - c)² · (1 - p) / p`
///
/// As `θ → -∞` with `c = 0` the probability underflows to zero and the
/// `(1 - p) / p` factor divides by zero. The divisor is floored at
/// [`PROBABILITY_EPSILON`], so the result is always finite and
/// non-negative.
#[inline]
pub fn information(theta: f64, b: f64, a: f64, c: f64) -> f64 {
    let p = probability(theta, b, a, c);
    let q = 1.0 - p;
    let info = a * a * (p - c).powi(2) / (1.0 - c).powi(2) * (q / p.max(PROBABILITY_EPSILON));
    info.max(0.0)
}

/// Simulate a single dichotomous response.
///
/// Consumes exactly one `f64` draw from `rng` and returns `1` with
/// probability [`probability`]`(theta, b, a, c)`, otherwise `0`.
pub fn simulate_response<R: Rng + ?Sized>(rng: &mut R, theta: f64, b: f64, a: f64, c: f64) -> u8 {
    let p = probability(theta, b, a, c);
    u8::from(rng.gen::<f64>() < p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn probability_at_difficulty_is_midpoint() {
        for &(a, c) in &[(1.0, 0.0), (0.5, 0.1), (2.0, 0.25), (1.7, 0.0)] {
            let p = probability(0.3, 0.3, a, c);
            assert!((p - (c + (1.0 - c) / 2.0)).abs() < 1e-12, "a={a} c={c} p={p}");
        }
    }

    #[test]
    fn probability_bounded_by_guessing_and_one() {
        for theta in [-50.0, -4.0, 0.0, 4.0, 50.0] {
            let p = probability(theta, 0.5, 1.3, 0.2);
            assert!((0.2..=1.0).contains(&p), "theta={theta} p={p}");
        }
    }

    #[test]
    fn probability_curve_matches_scalar() {
        let thetas = [-1.0, 0.0, 1.0];
        let curve = probability_curve(&thetas, 0.0, 1.0, 0.0);
        assert_eq!(curve.len(), 3);
        assert_eq!(curve[1], 0.5);
        assert_eq!(curve[2], probability(1.0, 0.0, 1.0, 0.0));
    }

    #[test]
    fn information_peaks_near_difficulty_for_2pl() {
        let at_b = information(1.0, 1.0, 1.5, 0.0);
        let off_b = information(2.5, 1.0, 1.5, 0.0);
        // a²/4 at θ = b
        assert!((at_b - 1.5 * 1.5 / 4.0).abs() < 1e-12);
        assert!(off_b < at_b);
    }

    #[test]
    fn information_finite_at_extreme_low_ability() {
        let info = information(-1e6, 0.0, 1.0, 0.0);
        assert!(info.is_finite());
        assert!(info >= 0.0);

        let info = information(f64::NEG_INFINITY, 0.0, 1.0, 0.0);
        assert!(info.is_finite());
        assert_eq!(info, 0.0);
    }

    #[test]
    fn information_zero_when_response_certain() {
        assert_eq!(information(1e6, 0.0, 1.0, 0.0), 0.0);
    }

    #[test]
    fn simulate_response_is_reproducible() {
        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);
        let xs: Vec<u8> = (0..50)
            .map(|_| simulate_response(&mut a, 0.0, 0.0, 1.0, 0.0))
            .collect();
        let ys: Vec<u8> = (0..50)
            .map(|_| simulate_response(&mut b, 0.0, 0.0, 1.0, 0.0))
            .collect();
        assert_eq!(xs, ys);
        assert!(xs.iter().all(|&x| x <= 1));
    }

    #[test]
    fn simulate_response_follows_extremes() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(simulate_response(&mut rng, 40.0, 0.0, 1.0, 0.0), 1);
            assert_eq!(simulate_response(&mut rng, -40.0, 0.0, 1.0, 0.0), 0);
        }
    }
}
