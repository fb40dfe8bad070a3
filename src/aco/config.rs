//! ACO configuration.

use crate::error::ConfigurationError;

/// Configuration for the Ant System.
///
/// # Pheromone model
///
/// - Transition: `p_ij ∝ tau_ij^alpha * eta_ij^beta`, `eta_ij = 1 / d_ij`
/// - Update: `tau_ij <- (1 - rho) * tau_ij + sum_k Q / L_k` over the edges
///   of every ant's tour
///
/// # Examples
///
/// ```
/// use metaheur_trace::aco::AcoConfig;
///
/// let config = AcoConfig::default()
///     .with_ant_count(10)
///     .with_weights(1.0, 3.0)
///     .with_evaporation_rate(0.3)
///     .with_seed(43);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoConfig {
    /// Ants released per iteration.
    pub ant_count: usize,

    /// Pheromone weight `alpha`. Large values make ants follow trails blindly.
    pub alpha: f64,

    /// Heuristic weight `beta`. Large values make ants greedy.
    pub beta: f64,

    /// Evaporation rate `rho` in (0, 1).
    pub evaporation_rate: f64,

    /// Deposit constant `Q`.
    pub deposit: f64,

    /// Pheromone on every edge before the first iteration.
    pub initial_pheromone: f64,

    /// City every tour starts and ends at.
    pub start_city: usize,

    /// Number of iterations. The only termination criterion.
    pub max_iterations: usize,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for AcoConfig {
    /// Dorigo's Ant System parameters.
    fn default() -> Self {
        Self {
            ant_count: 20,
            alpha: 1.0,
            beta: 2.0,
            evaporation_rate: 0.5,
            deposit: 1.0,
            initial_pheromone: 1.0,
            start_city: 0,
            max_iterations: 100,
            seed: None,
        }
    }
}

impl AcoConfig {
    /// A handful of ants over a few iterations, small enough to animate
    /// every tour.
    pub fn classroom() -> Self {
        Self {
            ant_count: 4,
            max_iterations: 10,
            ..Self::default()
        }
    }

    pub fn with_ant_count(mut self, n: usize) -> Self {
        self.ant_count = n;
        self
    }

    /// Sets pheromone (`alpha`) and heuristic (`beta`) weights.
    pub fn with_weights(mut self, alpha: f64, beta: f64) -> Self {
        self.alpha = alpha;
        self.beta = beta;
        self
    }

    pub fn with_evaporation_rate(mut self, rho: f64) -> Self {
        self.evaporation_rate = rho;
        self
    }

    pub fn with_deposit(mut self, q: f64) -> Self {
        self.deposit = q;
        self
    }

    pub fn with_initial_pheromone(mut self, tau: f64) -> Self {
        self.initial_pheromone = tau;
        self
    }

    pub fn with_start_city(mut self, city: usize) -> Self {
        self.start_city = city;
        self
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
    /// `start_city` is checked against the problem size when the colony is
    /// built.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.ant_count == 0 {
            return Err(ConfigurationError::new("ant_count", "must be at least 1"));
        }
        if self.max_iterations == 0 {
            return Err(ConfigurationError::new(
                "max_iterations",
                "must be at least 1",
            ));
        }
        for (name, value) in [("alpha", self.alpha), ("beta", self.beta)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::new(
                    name,
                    format!("must be finite and non-negative, got {value}"),
                ));
            }
        }
        let rho = self.evaporation_rate;
        if !(rho > 0.0 && rho < 1.0) {
            return Err(ConfigurationError::new(
                "evaporation_rate",
                format!("must be in (0, 1), got {rho}"),
            ));
        }
        for (name, value) in [
            ("deposit", self.deposit),
            ("initial_pheromone", self.initial_pheromone),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigurationError::new(
                    name,
                    format!("must be finite and positive, got {value}"),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AcoConfig::default();
        assert_eq!(config.ant_count, 20);
        assert_eq!(config.alpha, 1.0);
        assert_eq!(config.beta, 2.0);
        assert_eq!(config.evaporation_rate, 0.5);
        assert_eq!(config.start_city, 0);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_classroom_preset() {
        let config = AcoConfig::classroom();
        assert_eq!(config.ant_count, 4);
        assert_eq!(config.max_iterations, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_ant_count() {
        let err = AcoConfig::default().with_ant_count(0).validate().unwrap_err();
        assert_eq!(err.parameter, "ant_count");
    }

    #[test]
    fn test_validate_weights() {
        assert!(AcoConfig::default()
            .with_weights(-1.0, 2.0)
            .validate()
            .is_err());
        assert!(AcoConfig::default()
            .with_weights(1.0, f64::NAN)
            .validate()
            .is_err());
        assert!(AcoConfig::default()
            .with_weights(0.0, 0.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_evaporation_rate() {
        for rho in [0.0, 1.0, -0.1, 2.0] {
            let err = AcoConfig::default()
                .with_evaporation_rate(rho)
                .validate()
                .unwrap_err();
            assert_eq!(err.parameter, "evaporation_rate");
        }
    }

    #[test]
    fn test_validate_deposit_and_pheromone() {
        assert!(AcoConfig::default().with_deposit(0.0).validate().is_err());
        assert!(AcoConfig::default()
            .with_initial_pheromone(-1.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_zero_iterations() {
        assert!(AcoConfig::default()
            .with_max_iterations(0)
            .validate()
            .is_err());
    }
}
