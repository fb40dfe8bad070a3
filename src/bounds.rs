//! Per-dimension closed intervals for optional position clamping.
//!
//! Clamping is a policy, not a default: optimizers only apply it when a
//! [`Bounds`] value is configured.

use crate::error::ConfigurationError;
use rand::Rng;

/// A closed interval `[lower, upper]` for each dimension.
///
/// # Examples
///
/// ```
/// use metaheur_trace::bounds::Bounds;
///
/// let bounds = Bounds::uniform(2, 0.0, 10.0).unwrap();
/// let mut x = vec![-1.0, 12.5];
/// bounds.clamp(&mut x);
/// assert_eq!(x, vec![0.0, 10.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    intervals: Vec<(f64, f64)>,
}

impl Bounds {
    /// Creates bounds from `(lower, upper)` pairs, one per dimension.
    pub fn new(intervals: Vec<(f64, f64)>) -> Result<Self, ConfigurationError> {
        if intervals.is_empty() {
            return Err(ConfigurationError::new(
                "bounds",
                "at least one dimension is required",
            ));
        }
        for (dim, &(lower, upper)) in intervals.iter().enumerate() {
            if !lower.is_finite() || !upper.is_finite() {
                return Err(ConfigurationError::new(
                    "bounds",
                    format!("dimension {dim} has a non-finite limit"),
                ));
            }
            if lower > upper {
                return Err(ConfigurationError::new(
                    "bounds",
                    format!("dimension {dim}: lower {lower} exceeds upper {upper}"),
                ));
            }
        }
        Ok(Self { intervals })
    }

    /// Same interval in every one of `dimensions` dimensions.
    pub fn uniform(dimensions: usize, lower: f64, upper: f64) -> Result<Self, ConfigurationError> {
        Self::new(vec![(lower, upper); dimensions])
    }

    pub fn dimensions(&self) -> usize {
        self.intervals.len()
    }

    pub fn intervals(&self) -> &[(f64, f64)] {
        &self.intervals
    }

    /// Clamps `position` in place: `max(lower, min(upper, x))` per dimension.
    ///
    /// Extra coordinates beyond [`dimensions`](Self::dimensions) are left alone.
    pub fn clamp(&self, position: &mut [f64]) {
        for (x, &(lower, upper)) in position.iter_mut().zip(&self.intervals) {
            *x = lower.max(upper.min(*x));
        }
    }

    /// Returns `true` if every coordinate lies inside its interval.
    pub fn contains(&self, position: &[f64]) -> bool {
        position
            .iter()
            .zip(&self.intervals)
            .all(|(&x, &(lower, upper))| x >= lower && x <= upper)
    }

    /// Samples a point uniformly inside the box.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        self.intervals
            .iter()
            .map(|&(lower, upper)| crate::random::uniform(rng, lower, upper))
            .collect()
    }

    pub(crate) fn check_dimensions(&self, dimensions: usize) -> Result<(), ConfigurationError> {
        if self.dimensions() != dimensions {
            return Err(ConfigurationError::new(
                "bounds",
                format!(
                    "has {} dimensions but the search space has {dimensions}",
                    self.dimensions()
                ),
            ));
        }
        Ok(())
    }
}
