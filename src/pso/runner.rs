//! PSO execution loop.

use super::config::PsoConfig;
use super::types::{Particle, ParticleMove, SwarmFrame, SwarmState};
use crate::error::{Error, Result};
use crate::objective::Objective;
use crate::optimizer::Optimizer;
use crate::random::{rng_from_seed, uniform, unit};
use rand::rngs::StdRng;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, info, trace};

/// A particle swarm that advances one iteration per [`step`](Optimizer::step).
///
/// # Examples
///
/// ```
/// use metaheur_trace::landscape::sphere;
/// use metaheur_trace::optimizer::Optimizer;
/// use metaheur_trace::pso::{PsoConfig, Swarm};
///
/// let mut swarm = Swarm::new(sphere, PsoConfig::classroom().with_seed(3)).unwrap();
/// while !swarm.is_done() {
///     let frame = swarm.step().unwrap();
///     assert_eq!(frame.moves.len(), 3);
/// }
/// assert_eq!(swarm.iteration(), 5);
/// ```
pub struct Swarm<O> {
    objective: O,
    config: PsoConfig,
    rng: StdRng,
    state: SwarmState,
}

impl<O: Objective> Swarm<O> {
    /// Validates `config` and scatters the initial particles.
    ///
    /// Each particle draws its position coordinates first, then its
    /// velocity coordinates. Every particle starts as its own personal
    /// best; the global best is the first particle with the lowest fitness.
    pub fn new(objective: O, config: PsoConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = rng_from_seed(config.seed);

        let (pos_lo, pos_hi) = config.position_range;
        let (vel_lo, vel_hi) = config.velocity_range;

        let mut particles = Vec::with_capacity(config.population_size);
        for _ in 0..config.population_size {
            let position: Vec<f64> = match &config.bounds {
                Some(bounds) => bounds.sample(&mut rng),
                None => (0..config.dimensions)
                    .map(|_| uniform(&mut rng, pos_lo, pos_hi))
                    .collect(),
            };
            let velocity: Vec<f64> = (0..config.dimensions)
                .map(|_| uniform(&mut rng, vel_lo, vel_hi))
                .collect();
            let fitness = objective.evaluate_finite(&position)?;
            particles.push(Particle {
                best_position: position.clone(),
                best_fitness: fitness,
                position,
                velocity,
                fitness,
            });
        }

        let (global_best_index, global_best_fitness) = best_personal(&particles);
        let state = SwarmState {
            global_best_position: particles[global_best_index].best_position.clone(),
            global_best_fitness,
            global_best_index,
            particles,
            iteration: 0,
        };

        debug!(
            particles = config.population_size,
            dimensions = config.dimensions,
            global_best = global_best_fitness,
            "swarm initialized"
        );

        Ok(Self {
            objective,
            config,
            rng,
            state,
        })
    }

    pub fn config(&self) -> &PsoConfig {
        &self.config
    }

    pub fn objective(&self) -> &O {
        &self.objective
    }

    /// Consumes the swarm, returning its final state.
    pub fn into_state(self) -> SwarmState {
        self.state
    }

    /// Computes the next generation of particles without touching `self.state`.
    fn advance(&mut self) -> Result<(Vec<Particle>, Vec<ParticleMove>)> {
        let w = self.config.inertia_weight;
        let c1 = self.config.cognitive_factor;
        let c2 = self.config.social_factor;
        let gbest = &self.state.global_best_position;

        let mut particles = self.state.particles.clone();
        let mut moves = Vec::with_capacity(particles.len());

        for (index, particle) in particles.iter_mut().enumerate() {
            let r1 = unit(&mut self.rng);
            let r2 = unit(&mut self.rng);
            let from = particle.position.clone();

            for d in 0..particle.position.len() {
                let x = particle.position[d];
                let mut v = w * particle.velocity[d]
                    + c1 * r1 * (particle.best_position[d] - x)
                    + c2 * r2 * (gbest[d] - x);
                if let Some(limit) = self.config.velocity_limit {
                    v = v.clamp(-limit, limit);
                }
                particle.velocity[d] = v;
                particle.position[d] = x + v;
            }
            if let Some(bounds) = &self.config.bounds {
                bounds.clamp(&mut particle.position);
            }

            particle.fitness = self.objective.evaluate_finite(&particle.position)?;
            let improved = particle.fitness < particle.best_fitness;
            if improved {
                particle.best_position = particle.position.clone();
                particle.best_fitness = particle.fitness;
            }

            trace!(
                index,
                r1,
                r2,
                fitness = particle.fitness,
                improved,
                "particle moved"
            );

            moves.push(ParticleMove {
                index,
                r1,
                r2,
                from,
                to: particle.position.clone(),
                velocity: particle.velocity.clone(),
                fitness: particle.fitness,
                best_fitness: particle.best_fitness,
                improved_personal_best: improved,
            });
        }

        Ok((particles, moves))
    }
}

impl<O: Objective> Optimizer for Swarm<O> {
    type State = SwarmState;
    type Frame = SwarmFrame;

    /// One synchronous swarm update.
    ///
    /// All particles move against the global best from the previous
    /// iteration; the global best is refreshed afterwards and replaced only
    /// on strict improvement. If the objective fails, the state is left as
    /// it was before the call.
    fn step(&mut self) -> Result<SwarmFrame> {
        if self.is_done() {
            return Err(Error::Exhausted {
                max_iterations: self.config.max_iterations,
            });
        }

        let (particles, moves) = self.advance()?;

        let (best_index, best_fitness) = best_personal(&particles);
        let improved = best_fitness < self.state.global_best_fitness;
        if improved {
            self.state.global_best_position = particles[best_index].best_position.clone();
            self.state.global_best_fitness = best_fitness;
            self.state.global_best_index = best_index;
        }
        self.state.particles = particles;
        self.state.iteration += 1;

        debug!(
            iteration = self.state.iteration,
            global_best = self.state.global_best_fitness,
            improved,
            "pso iteration"
        );

        Ok(SwarmFrame {
            iteration: self.state.iteration,
            moves,
            global_best_position: self.state.global_best_position.clone(),
            global_best_fitness: self.state.global_best_fitness,
            improved_global_best: improved,
        })
    }

    fn is_done(&self) -> bool {
        self.state.iteration >= self.config.max_iterations
    }

    fn state(&self) -> &SwarmState {
        &self.state
    }

    fn iteration(&self) -> usize {
        self.state.iteration
    }
}

/// Index and fitness of the lowest personal best; the first one wins ties.
fn best_personal(particles: &[Particle]) -> (usize, f64) {
    let mut best_index = 0;
    let mut best_fitness = particles[0].best_fitness;
    for (i, p) in particles.iter().enumerate().skip(1) {
        if p.best_fitness < best_fitness {
            best_index = i;
            best_fitness = p.best_fitness;
        }
    }
    (best_index, best_fitness)
}

/// Result of a complete PSO run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PsoResult {
    pub best_position: Vec<f64>,
    pub best_fitness: f64,

    /// Iterations actually executed.
    pub iterations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Global best fitness before the first iteration and after each one.
    pub fitness_history: Vec<f64>,

    /// The state before the first iteration.
    pub initial_state: SwarmState,

    pub frames: Vec<SwarmFrame>,
}

/// Runs a swarm to completion.
pub struct PsoRunner;

impl PsoRunner {
    /// Runs PSO for `config.max_iterations` iterations.
    pub fn run<O: Objective>(objective: O, config: &PsoConfig) -> Result<PsoResult> {
        Self::run_with_cancel(objective, config, None)
    }

    /// Runs PSO, stopping between iterations once `cancel` is set.
    pub fn run_with_cancel<O: Objective>(
        objective: O,
        config: &PsoConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<PsoResult> {
        let mut swarm = Swarm::new(objective, config.clone())?;
        let initial_state = swarm.state().clone();

        let frames = swarm.run_until_cancelled(cancel.as_deref())?;
        let cancelled = !swarm.is_done();

        let mut fitness_history = Vec::with_capacity(frames.len() + 1);
        fitness_history.push(initial_state.global_best_fitness);
        fitness_history.extend(frames.iter().map(|f| f.global_best_fitness));

        let state = swarm.into_state();
        info!(
            iterations = state.iteration,
            best = state.global_best_fitness,
            cancelled,
            "pso finished"
        );

        Ok(PsoResult {
            best_position: state.global_best_position,
            best_fitness: state.global_best_fitness,
            iterations: state.iteration,
            cancelled,
            fitness_history,
            initial_state,
            frames,
        })
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::landscape::rastrigin;
    use proptest::prelude::*;

    proptest! {
        /// The global best is non-increasing and matches the best personal best.
        #[test]
        fn prop_global_best_monotone(seed in any::<u64>(), size in 1_usize..12) {
            let config = PsoConfig::classroom()
                .with_population_size(size)
                .with_max_iterations(20)
                .with_seed(seed);
            let result = PsoRunner::run(rastrigin, &config).unwrap();

            for w in result.fitness_history.windows(2) {
                prop_assert!(w[1] <= w[0]);
            }
            let last = result.frames.last().unwrap();
            prop_assert_eq!(last.global_best_fitness, result.best_fitness);
            prop_assert_eq!(rastrigin(&result.best_position), result.best_fitness);
        }
    }
}
