//! Objective functions over real vectors.
//!
//! Any `Fn(&[f64]) -> f64` is an [`Objective`]. Lower values are better.

use crate::error::ObjectiveEvaluationError;

/// A scalar function to be minimized.
pub trait Objective {
    /// Evaluates the objective at `position`.
    fn evaluate(&self, position: &[f64]) -> f64;

    /// Evaluates and rejects NaN or infinite results.
    fn evaluate_finite(&self, position: &[f64]) -> Result<f64, ObjectiveEvaluationError> {
        let value = self.evaluate(position);
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ObjectiveEvaluationError {
                value,
                position: position.to_vec(),
            })
        }
    }
}

impl<F> Objective for F
where
    F: Fn(&[f64]) -> f64,
{
    fn evaluate(&self, position: &[f64]) -> f64 {
        self(position)
    }
}
