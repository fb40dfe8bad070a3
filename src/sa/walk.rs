//! Real-vector random walk for annealing a plain objective function.

use super::types::SaProblem;
use crate::bounds::Bounds;
use crate::error::ConfigurationError;
use crate::objective::Objective;
use crate::random::uniform;
use rand::Rng;

/// Anneals an [`Objective`] over `R^n` with uniform perturbations.
///
/// A neighbor of `x` is `x + uniform(-step_size, step_size)` in every
/// dimension, clamped to the bounds when bounds are configured.
///
/// # Examples
///
/// ```
/// use metaheur_trace::bounds::Bounds;
/// use metaheur_trace::landscape::sine_mixture;
/// use metaheur_trace::sa::UniformWalk;
///
/// let walk = UniformWalk::from_start(sine_mixture, vec![6.5], 1.0)
///     .unwrap()
///     .with_bounds(Bounds::uniform(1, 0.0, 10.0).unwrap())
///     .unwrap();
/// assert_eq!(walk.step_size(), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct UniformWalk<O> {
    objective: O,
    start: Start,
    step_size: f64,
    bounds: Option<Bounds>,
}

impl<O: Objective> UniformWalk<O> {
    /// Walk starting at a fixed point. Unbounded until
    /// [`with_bounds`](Self::with_bounds) is called.
    pub fn from_start(
        objective: O,
        start: Vec<f64>,
        step_size: f64,
    ) -> Result<Self, ConfigurationError> {
        if start.is_empty() {
            return Err(ConfigurationError::new("start", "must have at least one dimension"));
        }
        if start.iter().any(|x| !x.is_finite()) {
            return Err(ConfigurationError::new("start", "must be finite"));
        }
        check_step_size(step_size)?;
        Ok(Self {
            objective,
            start: Start::Fixed(start),
            step_size,
            bounds: None,
        })
    }

    /// Walk starting at a uniformly random point inside `bounds`, and
    /// clamped to them.
    pub fn within(objective: O, bounds: Bounds, step_size: f64) -> Result<Self, ConfigurationError> {
        check_step_size(step_size)?;
        Ok(Self {
            objective,
            start: Start::Random(bounds.clone()),
            step_size,
            bounds: Some(bounds),
        })
    }

    /// Clamps every neighbor to `bounds`. The start point must lie inside.
    pub fn with_bounds(mut self, bounds: Bounds) -> Result<Self, ConfigurationError> {
        if let Start::Fixed(start) = &self.start {
            bounds.check_dimensions(start.len())?;
            if !bounds.contains(start) {
                return Err(ConfigurationError::new(
                    "start",
                    format!("{start:?} lies outside the bounds"),
                ));
            }
        }
        self.bounds = Some(bounds);
        Ok(self)
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    pub fn bounds(&self) -> Option<&Bounds> {
        self.bounds.as_ref()
    }

    pub fn objective(&self) -> &O {
        &self.objective
    }
}

#[derive(Debug, Clone)]
enum Start {
    Fixed(Vec<f64>),
    Random(Bounds),
}

fn check_step_size(step_size: f64) -> Result<(), ConfigurationError> {
    if !step_size.is_finite() || step_size <= 0.0 {
        return Err(ConfigurationError::new(
            "step_size",
            format!("must be finite and positive, got {step_size}"),
        ));
    }
    Ok(())
}

impl<O: Objective> SaProblem for UniformWalk<O> {
    type Solution = Vec<f64>;

    fn initial_solution<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        match &self.start {
            Start::Fixed(start) => start.clone(),
            Start::Random(region) => region.sample(rng),
        }
    }

    fn cost(&self, x: &Vec<f64>) -> f64 {
        self.objective.evaluate(x)
    }

    fn neighbor<R: Rng>(&self, x: &Vec<f64>, rng: &mut R) -> Vec<f64> {
        let mut next: Vec<f64> = x
            .iter()
            .map(|&xi| xi + uniform(rng, -self.step_size, self.step_size))
            .collect();
        if let Some(bounds) = &self.bounds {
            bounds.clamp(&mut next);
        }
        next
    }

    fn coordinates(&self, x: &Vec<f64>) -> Vec<f64> {
        x.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landscape::{sine_mixture, sphere};
    use crate::random::create_rng;

    #[test]
    fn test_from_start_initial_solution() {
        let walk = UniformWalk::from_start(sphere, vec![1.0, 2.0], 0.5).unwrap();
        let mut rng = create_rng(1);
        assert_eq!(walk.initial_solution(&mut rng), vec![1.0, 2.0]);
        assert_eq!(walk.cost(&vec![1.0, 2.0]), 5.0);
    }

    #[test]
    fn test_neighbor_within_step() {
        let walk = UniformWalk::from_start(sphere, vec![0.0, 0.0], 0.3).unwrap();
        let mut rng = create_rng(2);
        for _ in 0..500 {
            let n = walk.neighbor(&vec![0.0, 0.0], &mut rng);
            assert!(n.iter().all(|v| v.abs() < 0.3));
        }
    }

    #[test]
    fn test_neighbor_clamped() {
        let walk = UniformWalk::from_start(sine_mixture, vec![0.1], 1.0)
            .unwrap()
            .with_bounds(Bounds::uniform(1, 0.0, 10.0).unwrap())
            .unwrap();
        let mut rng = create_rng(3);
        for _ in 0..500 {
            let n = walk.neighbor(&vec![0.1], &mut rng);
            assert!((0.0..=1.1).contains(&n[0]));
        }
    }

    #[test]
    fn test_within_samples_inside_bounds() {
        let bounds = Bounds::uniform(3, -2.0, 2.0).unwrap();
        let walk = UniformWalk::within(sphere, bounds.clone(), 0.5).unwrap();
        let mut rng = create_rng(4);
        let x = walk.initial_solution(&mut rng);
        assert_eq!(x.len(), 3);
        assert!(bounds.contains(&x));
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(UniformWalk::from_start(sphere, vec![], 1.0).is_err());
        assert!(UniformWalk::from_start(sphere, vec![f64::NAN], 1.0).is_err());
        assert!(UniformWalk::from_start(sphere, vec![0.0], 0.0).is_err());
        assert!(UniformWalk::from_start(sphere, vec![0.0], -1.0).is_err());

        let outside = UniformWalk::from_start(sphere, vec![11.0], 1.0)
            .unwrap()
            .with_bounds(Bounds::uniform(1, 0.0, 10.0).unwrap());
        assert_eq!(outside.err().unwrap().parameter, "start");

        let mismatch = UniformWalk::from_start(sphere, vec![1.0], 1.0)
            .unwrap()
            .with_bounds(Bounds::uniform(2, 0.0, 10.0).unwrap());
        assert_eq!(mismatch.err().unwrap().parameter, "bounds");
    }
}
