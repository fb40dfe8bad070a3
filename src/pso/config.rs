//! PSO configuration.

use crate::bounds::Bounds;
use crate::error::ConfigurationError;

/// Configuration for Particle Swarm Optimization.
///
/// # Examples
///
/// ```
/// use metaheur_trace::pso::PsoConfig;
///
/// let config = PsoConfig::default()
///     .with_population_size(20)
///     .with_dimensions(3)
///     .with_inertia_weight(0.5)
///     .with_max_iterations(50)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PsoConfig {
    /// Number of particles.
    pub population_size: usize,

    /// Dimensionality of the search space.
    pub dimensions: usize,

    /// Inertia weight `w`: how much of the previous velocity is kept.
    pub inertia_weight: f64,

    /// Cognitive factor `c1`: pull toward the particle's own best.
    pub cognitive_factor: f64,

    /// Social factor `c2`: pull toward the swarm's best.
    pub social_factor: f64,

    /// Number of iterations to run. The only termination criterion.
    pub max_iterations: usize,

    /// Interval initial positions are drawn from, per dimension.
    ///
    /// Ignored when [`bounds`](Self::bounds) is set; positions are then
    /// sampled inside the bounds.
    pub position_range: (f64, f64),

    /// Interval initial velocities are drawn from, per dimension.
    pub velocity_range: (f64, f64),

    /// Optional clamping box for positions. `None` lets particles roam freely.
    pub bounds: Option<Bounds>,

    /// Optional symmetric velocity clamp `[-limit, limit]` per dimension.
    pub velocity_limit: Option<f64>,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for PsoConfig {
    /// Constriction-coefficient parameters (Clerc & Kennedy, 2002).
    fn default() -> Self {
        Self {
            population_size: 30,
            dimensions: 2,
            inertia_weight: 0.7298,
            cognitive_factor: 1.49618,
            social_factor: 1.49618,
            max_iterations: 100,
            position_range: (-3.0, 3.0),
            velocity_range: (-1.0, 1.0),
            bounds: None,
            velocity_limit: None,
            seed: None,
        }
    }
}

impl PsoConfig {
    /// Small, unit-coefficient swarm suited to step-by-step display:
    /// 3 particles in 2D, `w = c1 = c2 = 1`, 5 iterations.
    pub fn classroom() -> Self {
        Self {
            population_size: 3,
            dimensions: 2,
            inertia_weight: 1.0,
            cognitive_factor: 1.0,
            social_factor: 1.0,
            max_iterations: 5,
            ..Self::default()
        }
    }

    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_dimensions(mut self, n: usize) -> Self {
        self.dimensions = n;
        self
    }

    pub fn with_inertia_weight(mut self, w: f64) -> Self {
        self.inertia_weight = w;
        self
    }

    pub fn with_cognitive_factor(mut self, c1: f64) -> Self {
        self.cognitive_factor = c1;
        self
    }

    pub fn with_social_factor(mut self, c2: f64) -> Self {
        self.social_factor = c2;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_position_range(mut self, lower: f64, upper: f64) -> Self {
        self.position_range = (lower, upper);
        self
    }

    pub fn with_velocity_range(mut self, lower: f64, upper: f64) -> Self {
        self.velocity_range = (lower, upper);
        self
    }

    /// Enables position clamping.
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Enables velocity clamping.
    pub fn with_velocity_limit(mut self, limit: f64) -> Self {
        self.velocity_limit = Some(limit);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.population_size == 0 {
            return Err(ConfigurationError::new(
                "population_size",
                "must be at least 1",
            ));
        }
        if self.dimensions == 0 {
            return Err(ConfigurationError::new("dimensions", "must be at least 1"));
        }
        if self.max_iterations == 0 {
            return Err(ConfigurationError::new(
                "max_iterations",
                "must be at least 1",
            ));
        }
        if !self.inertia_weight.is_finite() {
            return Err(ConfigurationError::new("inertia_weight", "must be finite"));
        }
        for (name, value) in [
            ("cognitive_factor", self.cognitive_factor),
            ("social_factor", self.social_factor),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::new(
                    name,
                    format!("must be finite and non-negative, got {value}"),
                ));
            }
        }
        check_range("position_range", self.position_range)?;
        check_range("velocity_range", self.velocity_range)?;
        if let Some(bounds) = &self.bounds {
            bounds.check_dimensions(self.dimensions)?;
        }
        if let Some(limit) = self.velocity_limit {
            if !limit.is_finite() || limit <= 0.0 {
                return Err(ConfigurationError::new(
                    "velocity_limit",
                    format!("must be finite and positive, got {limit}"),
                ));
            }
        }
        Ok(())
    }
}

fn check_range(name: &'static str, (lower, upper): (f64, f64)) -> Result<(), ConfigurationError> {
    if !lower.is_finite() || !upper.is_finite() || lower > upper {
        return Err(ConfigurationError::new(
            name,
            format!("expected finite lower <= upper, got ({lower}, {upper})"),
        ));
    }
    Ok(())
}
