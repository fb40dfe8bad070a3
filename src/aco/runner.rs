//! Ant System execution loop.
//!
//! # Algorithm
//!
//! 1. Lay `initial_pheromone` on every edge
//! 2. At each iteration:
//!    a. Every ant builds a closed tour from `start_city`, choosing the next
//!       unvisited city by roulette wheel over `tau^alpha * eta^beta`
//!    b. Evaporate: `tau <- (1 - rho) * tau`
//!    c. Deposit `Q / L_k` on both directions of every edge of every tour
//!    d. Replace the best tour on strict improvement
//! 3. Terminate after `max_iterations`
//!
//! # Reference
//!
//! Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a Colony
//! of Cooperating Agents", *IEEE Trans. SMC-B* 26(1), 29-41.

use super::config::AcoConfig;
use super::types::{AcoFrame, ColonyState, DistanceMatrix, Tour};
use crate::error::{ConfigurationError, Error, Result};
use crate::optimizer::Optimizer;
use crate::random::{rng_from_seed, unit};
use rand::rngs::StdRng;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, info, trace};

/// An ant colony over a fixed set of cities.
pub struct AntColony {
    distances: DistanceMatrix,
    config: AcoConfig,
    rng: StdRng,
    state: ColonyState,
}

impl AntColony {
    /// Validates `config` against `distances` and lays the initial pheromone.
    pub fn new(distances: DistanceMatrix, config: AcoConfig) -> Result<Self> {
        config.validate()?;
        let size = distances.len();
        if config.start_city >= size {
            return Err(ConfigurationError::new(
                "start_city",
                format!("city {} does not exist in a {size}-city problem", config.start_city),
            )
            .into());
        }

        let rng = rng_from_seed(config.seed);
        let state = ColonyState {
            pheromone: vec![config.initial_pheromone; size * size],
            size,
            best_tour: None,
            iteration: 0,
        };

        debug!(cities = size, ants = config.ant_count, "colony initialized");

        Ok(Self {
            distances,
            config,
            rng,
            state,
        })
    }

    pub fn config(&self) -> &AcoConfig {
        &self.config
    }

    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Consumes the colony, returning its final state.
    pub fn into_state(self) -> ColonyState {
        self.state
    }

    /// Desirability of moving from `from` to `to`.
    fn attractiveness(&self, from: usize, to: usize) -> f64 {
        let tau = self.state.pheromone(from, to);
        let eta = 1.0 / self.distances.distance(from, to).max(f64::EPSILON);
        tau.powf(self.config.alpha) * eta.powf(self.config.beta)
    }

    /// Builds one closed tour. Consumes exactly one uniform draw per choice.
    fn construct_tour(&mut self) -> Tour {
        let size = self.state.size;
        let start = self.config.start_city;

        let mut visited = vec![false; size];
        let mut cities = Vec::with_capacity(size + 1);
        let mut weights = vec![0.0; size];
        visited[start] = true;
        cities.push(start);

        let mut current = start;
        for _ in 1..size {
            let mut total = 0.0;
            for (j, w) in weights.iter_mut().enumerate() {
                *w = if visited[j] {
                    0.0
                } else {
                    self.attractiveness(current, j)
                };
                total += *w;
            }

            let draw = unit(&mut self.rng);
            let next = if total > 0.0 && total.is_finite() {
                roulette(&weights, &visited, draw * total)
            } else {
                // Every weight underflowed or overflowed; fall back to uniform.
                let open: Vec<usize> = (0..size).filter(|&j| !visited[j]).collect();
                open[((draw * open.len() as f64) as usize).min(open.len() - 1)]
            };

            visited[next] = true;
            cities.push(next);
            current = next;
        }
        cities.push(start);

        let length = self.distances.path_length(&cities);
        Tour { cities, length }
    }

    /// Evaporates every edge, then deposits `Q / L` along each tour.
    fn update_pheromone(&mut self, tours: &[Tour]) {
        let keep = 1.0 - self.config.evaporation_rate;
        for tau in &mut self.state.pheromone {
            *tau = (*tau * keep).max(f64::MIN_POSITIVE);
        }

        let size = self.state.size;
        for tour in tours {
            let amount = self.config.deposit / tour.length.max(f64::EPSILON);
            for edge in tour.cities.windows(2) {
                let (a, b) = (edge[0], edge[1]);
                self.state.pheromone[a * size + b] += amount;
                self.state.pheromone[b * size + a] += amount;
            }
        }
    }
}

/// Picks the first unvisited index whose cumulative weight exceeds `target`.
fn roulette(weights: &[f64], visited: &[bool], target: f64) -> usize {
    let mut cumulative = 0.0;
    let mut last_open = 0;
    for (j, &w) in weights.iter().enumerate() {
        if visited[j] {
            continue;
        }
        cumulative += w;
        last_open = j;
        if cumulative > target {
            return j;
        }
    }
    // Rounding left `target` at or past the total.
    last_open
}

impl Optimizer for AntColony {
    type State = ColonyState;
    type Frame = AcoFrame;

    fn step(&mut self) -> Result<AcoFrame> {
        if self.is_done() {
            return Err(Error::Exhausted {
                max_iterations: self.config.max_iterations,
            });
        }

        let tours: Vec<Tour> = (0..self.config.ant_count)
            .map(|_| self.construct_tour())
            .collect();

        let mut iteration_best = 0;
        for (k, tour) in tours.iter().enumerate() {
            trace!(ant = k, length = tour.length, "tour built");
            if tour.length < tours[iteration_best].length {
                iteration_best = k;
            }
        }

        self.update_pheromone(&tours);

        let candidate = &tours[iteration_best];
        let incumbent = self.state.best_tour.take();
        let improved = incumbent
            .as_ref()
            .is_none_or(|best| candidate.length < best.length);
        let best_tour = match incumbent {
            Some(best) if !improved => best,
            _ => candidate.clone(),
        };
        self.state.best_tour = Some(best_tour.clone());
        self.state.iteration += 1;

        debug!(
            iteration = self.state.iteration,
            iteration_best = candidate.length,
            best = best_tour.length,
            improved,
            "aco iteration"
        );

        Ok(AcoFrame {
            iteration: self.state.iteration,
            iteration_best,
            best_tour,
            improved_best: improved,
            pheromone: self.state.pheromone.clone(),
            tours,
        })
    }

    fn is_done(&self) -> bool {
        self.state.iteration >= self.config.max_iterations
    }

    fn state(&self) -> &ColonyState {
        &self.state
    }

    fn iteration(&self) -> usize {
        self.state.iteration
    }
}

/// Result of a complete ACO run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoResult {
    /// Shortest tour found.
    pub best: Tour,

    /// Iterations actually executed.
    pub iterations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Best tour length after each iteration.
    pub length_history: Vec<f64>,

    pub frames: Vec<AcoFrame>,
}

/// Runs an ant colony to completion.
pub struct AcoRunner;

impl AcoRunner {
    /// Runs the Ant System for `config.max_iterations` iterations.
    pub fn run(distances: DistanceMatrix, config: &AcoConfig) -> Result<AcoResult> {
        Self::run_with_cancel(distances, config, None)
    }

    /// Runs the Ant System, stopping between iterations once `cancel` is set.
    ///
    /// Always completes at least one iteration so a tour can be reported.
    pub fn run_with_cancel(
        distances: DistanceMatrix,
        config: &AcoConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<AcoResult> {
        let mut colony = AntColony::new(distances, config.clone())?;
        let first = colony.step()?;
        let rest = colony.run_until_cancelled(cancel.as_deref())?;
        let best = rest.last().unwrap_or(&first).best_tour.clone();

        let mut frames = Vec::with_capacity(rest.len() + 1);
        frames.push(first);
        frames.extend(rest);

        let cancelled = !colony.is_done();
        let length_history = frames.iter().map(|f| f.best_tour.length).collect();
        let iterations = colony.iteration();

        info!(iterations, best = best.length, cancelled, "aco finished");

        Ok(AcoResult {
            best,
            iterations,
            cancelled,
            length_history,
            frames,
        })
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every tour visits every city once and returns to the start.
        #[test]
        fn prop_tours_are_hamiltonian(
            seed in any::<u64>(),
            points in prop::collection::vec((-10.0_f64..10.0, -10.0_f64..10.0), 2..10),
            start in 0_usize..10
        ) {
            let points: Vec<[f64; 2]> = points.into_iter().map(|(x, y)| [x, y]).collect();
            let size = points.len();
            let distances = DistanceMatrix::from_points(&points).unwrap();
            let config = AcoConfig::classroom()
                .with_start_city(start % size)
                .with_max_iterations(3)
                .with_seed(seed);
            let result = AcoRunner::run(distances, &config).unwrap();

            for tour in result.frames.iter().flat_map(|f| &f.tours) {
                prop_assert_eq!(tour.cities.len(), size + 1);
                prop_assert_eq!(tour.cities[0], start % size);
                prop_assert_eq!(tour.cities[size], start % size);
                let mut sorted = tour.cities[..size].to_vec();
                sorted.sort_unstable();
                prop_assert_eq!(sorted, (0..size).collect::<Vec<_>>());
            }
            prop_assert!(result.frames.last().unwrap().pheromone.iter().all(|&t| t > 0.0));
        }
    }
}
