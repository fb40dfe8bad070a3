//! Reference objective landscapes.
//!
//! Small, well-understood functions used to demonstrate and test the
//! optimizers. Each takes a position slice so it can be passed directly as
//! an [`Objective`](crate::objective::Objective).

/// Sphere: `sum(x_i^2)`. Global minimum `0` at the origin.
pub fn sphere(x: &[f64]) -> f64 {
    x.iter().map(|v| v * v).sum()
}

/// One-dimensional multimodal energy `3 + 2 sin(x) + 1.5 sin(2.5 x)`.
///
/// Several local minima on `[0, 10]`; used as the annealing showcase.
/// Only the first coordinate is read; an empty position evaluates to NaN.
pub fn sine_mixture(x: &[f64]) -> f64 {
    let x = first_coordinate(x);
    3.0 + 2.0 * x.sin() + 1.5 * (2.5 * x).sin()
}

/// One-dimensional valley `2 sin(x) + 3 cos(x / 2) + 4`.
///
/// Only the first coordinate is read; an empty position evaluates to NaN.
pub fn sine_cosine_valley(x: &[f64]) -> f64 {
    let x = first_coordinate(x);
    2.0 * x.sin() + 3.0 * (0.5 * x).cos() + 4.0
}

fn first_coordinate(x: &[f64]) -> f64 {
    x.first().copied().unwrap_or(f64::NAN)
}

/// Rastrigin: `10 n + sum(x_i^2 - 10 cos(2 pi x_i))`. Global minimum `0` at
/// the origin.
pub fn rastrigin(x: &[f64]) -> f64 {
    let n = x.len() as f64;
    10.0 * n
        + x.iter()
            .map(|v| v * v - 10.0 * (2.0 * std::f64::consts::PI * v).cos())
            .sum::<f64>()
}
