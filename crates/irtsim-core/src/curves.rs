//! Item characteristic curve families.
//!
//! Evaluates the response model over an ability grid for the three classic
//! illustrations: shifting difficulty, steepening discrimination, and raising
//! the guessing floor.

use crate::probability::probability_curve;
use crate::traits::{LinePlot, Series};

/// Ability grid used for curve plots.
pub const THETA_MIN: f64 = -4.0;
pub const THETA_MAX: f64 = 4.0;
pub const THETA_POINTS: usize = 100;

/// `n` evenly spaced values over `[start, end]`, endpoints included.
///
/// `n == 0` yields an empty vector and `n == 1` yields `[start]`.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            values[n - 1] = end;
            values
        }
    }
}

/// The default ability grid, `linspace(-4, 4, 100)`.
pub fn theta_grid() -> Vec<f64> {
    linspace(THETA_MIN, THETA_MAX, THETA_POINTS)
}

fn curve_series(label: String, thetas: &[f64], b: f64, a: f64, c: f64) -> Series {
    let ys = probability_curve(thetas, b, a, c);
    Series::new(label, thetas.iter().copied().zip(ys).collect())
}

fn curve_plot(title: &str, series: Vec<Series>) -> LinePlot {
    LinePlot {
        name: String::new(),
        title: title.to_string(),
        x_label: "Ability (θ)".to_string(),
        y_label: "Probability of Correct Response".to_string(),
        series,
        reference_lines: Vec::new(),
    }
}

/// 1PL curves for `b ∈ {-2, -1, 0, 1, 2}`.
pub fn difficulty_family(thetas: &[f64]) -> LinePlot {
    let series = [-2.0, -1.0, 0.0, 1.0, 2.0]
        .iter()
        .map(|&b| curve_series(format!("b = {b}"), thetas, b, 1.0, 0.0))
        .collect();
    LinePlot {
        name: "icc_difficulty".into(),
        ..curve_plot("Effect of Difficulty Parameter (1PL Model)", series)
    }
}

/// 2PL curves at `b = 0` for `a ∈ {0.5, 1.0, 1.5, 2.0}`.
pub fn discrimination_family(thetas: &[f64]) -> LinePlot {
    let series = [0.5, 1.0, 1.5, 2.0]
        .iter()
        .map(|&a| curve_series(format!("a = {a:.1}"), thetas, 0.0, a, 0.0))
        .collect();
    LinePlot {
        name: "icc_discrimination".into(),
        ..curve_plot("Effect of Discrimination Parameter (2PL Model)", series)
    }
}

/// 3PL curves at `b = 0, a = 1` for `c ∈ {0.0, 0.1, 0.2, 0.25}`.
pub fn guessing_family(thetas: &[f64]) -> LinePlot {
    let series = [0.0, 0.1, 0.2, 0.25]
        .iter()
        .map(|&c| curve_series(format!("c = {c}"), thetas, 0.0, 1.0, c))
        .collect();
    LinePlot {
        name: "icc_guessing".into(),
        ..curve_plot("Effect of Guessing Parameter (3PL Model)", series)
    }
}

/// All three families over the default grid.
pub fn characteristic_curves() -> Vec<LinePlot> {
    let thetas = theta_grid();
    vec![
        difficulty_family(&thetas),
        discrimination_family(&thetas),
        guessing_family(&thetas),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_endpoints_and_spacing() {
        let xs = linspace(-3.0, 3.0, 20);
        assert_eq!(xs.len(), 20);
        assert_eq!(xs[0], -3.0);
        assert_eq!(xs[19], 3.0);
        let step = 6.0 / 19.0;
        assert!((xs[1] - xs[0] - step).abs() < 1e-12);

        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.0, 5.0, 1), vec![2.0]);
    }

    #[test]
    fn families_have_expected_series() {
        let plots = characteristic_curves();
        assert_eq!(plots.len(), 3);
        assert_eq!(plots[0].series.len(), 5);
        assert_eq!(plots[1].series.len(), 4);
        assert_eq!(plots[2].series.len(), 4);
        for plot in &plots {
            assert!(!plot.name.is_empty());
            for s in &plot.series {
                assert_eq!(s.points.len(), THETA_POINTS);
            }
        }
        assert_eq!(plots[0].series[0].label, "b = -2");
        assert_eq!(plots[1].series[1].label, "a = 1.0");
        assert_eq!(plots[2].series[3].label, "c = 0.25");
    }

    #[test]
    fn guessing_family_floors_at_c() {
        let plot = guessing_family(&theta_grid());
        let lowest = plot.series[3]
            .points
            .iter()
            .map(|&(_, y)| y)
            .fold(f64::INFINITY, f64::min);
        assert!(lowest >= 0.25);
        assert!(lowest < 0.27);
    }
}
