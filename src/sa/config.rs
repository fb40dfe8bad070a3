//! SA configuration and cooling schedules.

use crate::error::ConfigurationError;

/// Cooling schedule for temperature reduction. Applied once per iteration.
///
/// # References
///
/// - Geometric: standard textbook approach
/// - LundyMees: Lundy & Mees (1986), with convergence proof
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoolingSchedule {
    /// Geometric (exponential) cooling: `T_{k+1} = alpha * T_k`.
    ///
    /// Most widely used. Typical `alpha`: 0.85–0.99.
    Geometric {
        /// Cooling rate in (0, 1). Higher = slower cooling.
        alpha: f64,
    },

    /// Lundy-Mees cooling: `T_{k+1} = T_k / (1 + beta * T_k)`.
    ///
    /// Cools fast at high T, slow at low T.
    ///
    /// Reference: Lundy & Mees (1986)
    LundyMees {
        /// Cooling parameter. Typically `(T_0 - T_end) / (max_iter * T_0 * T_end)`.
        beta: f64,
    },
}

impl Default for CoolingSchedule {
    fn default() -> Self {
        CoolingSchedule::Geometric { alpha: 0.95 }
    }
}

impl CoolingSchedule {
    /// Temperature after one cooling step.
    pub fn cool(&self, temperature: f64) -> f64 {
        match *self {
            CoolingSchedule::Geometric { alpha } => temperature * alpha,
            CoolingSchedule::LundyMees { beta } => temperature / (1.0 + beta * temperature),
        }
    }

    /// First cooling step, within `limit` steps of `temperature`, at which
    /// the temperature reaches zero. `None` if it stays positive.
    ///
    /// Runs in bounded time regardless of `limit`.
    pub fn steps_to_zero(&self, temperature: f64, limit: usize) -> Option<usize> {
        match *self {
            // t * alpha > t / 2 never rounds below the smallest subnormal.
            CoolingSchedule::Geometric { alpha } if alpha > 0.5 => None,
            // At least halves per step, so zero arrives within a few thousand
            // steps of any finite start.
            CoolingSchedule::Geometric { .. } => {
                let mut t = temperature;
                for k in 1..=limit {
                    t = self.cool(t);
                    if t <= 0.0 {
                        return Some(k);
                    }
                }
                None
            }
            // t / (1 + beta t) >= min(t, 1 / beta) / 2 while the denominator is
            // finite. Temperature only falls, so only the first step can
            // overflow it.
            CoolingSchedule::LundyMees { .. } => {
                (limit > 0 && self.cool(temperature) <= 0.0).then_some(1)
            }
        }
    }
}

/// Configuration for the Simulated Annealing walk.
///
/// # Examples
///
/// ```
/// use metaheur_trace::sa::{CoolingSchedule, SaConfig};
///
/// let config = SaConfig::default()
///     .with_initial_temperature(10.0)
///     .with_cooling(CoolingSchedule::Geometric { alpha: 0.85 })
///     .with_max_iterations(20)
///     .with_seed(20);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaConfig {
    /// Initial temperature. Higher values allow more exploration.
    pub initial_temperature: f64,

    /// Cooling schedule.
    pub cooling: CoolingSchedule,

    /// Number of iterations (neighbor evaluations). The only termination
    /// criterion.
    pub max_iterations: usize,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            cooling: CoolingSchedule::default(),
            max_iterations: 1000,
            seed: None,
        }
    }
}

impl SaConfig {
    /// Short, visibly cooling walk: `T_0 = 10`, `alpha = 0.85`, 20 iterations.
    pub fn classroom() -> Self {
        Self {
            initial_temperature: 10.0,
            cooling: CoolingSchedule::Geometric { alpha: 0.85 },
            max_iterations: 20,
            seed: None,
        }
    }

    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.cooling = cooling;
        self
    }

    /// Shorthand for `with_cooling(CoolingSchedule::Geometric { alpha })`.
    pub fn with_cooling_rate(self, alpha: f64) -> Self {
        self.with_cooling(CoolingSchedule::Geometric { alpha })
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// Besides checking each parameter, rejects a budget over which the
    /// cooling schedule would drive the temperature to zero.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.initial_temperature.is_finite() || self.initial_temperature <= 0.0 {
            return Err(ConfigurationError::new(
                "initial_temperature",
                format!("must be finite and positive, got {}", self.initial_temperature),
            ));
        }
        if self.max_iterations == 0 {
            return Err(ConfigurationError::new(
                "max_iterations",
                "must be at least 1",
            ));
        }
        match self.cooling {
            CoolingSchedule::Geometric { alpha } => {
                if !(alpha > 0.0 && alpha < 1.0) {
                    return Err(ConfigurationError::new(
                        "cooling_rate",
                        format!("geometric alpha must be in (0, 1), got {alpha}"),
                    ));
                }
            }
            CoolingSchedule::LundyMees { beta } => {
                if !beta.is_finite() || beta <= 0.0 {
                    return Err(ConfigurationError::new(
                        "cooling_rate",
                        format!("lundy-mees beta must be finite and positive, got {beta}"),
                    ));
                }
            }
        }

        if let Some(k) = self
            .cooling
            .steps_to_zero(self.initial_temperature, self.max_iterations)
        {
            return Err(ConfigurationError::new(
                "max_iterations",
                format!("temperature underflows to zero after {k} iterations"),
            ));
        }
        Ok(())
    }
}
