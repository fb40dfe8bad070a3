//! SA execution loop.

use super::config::SaConfig;
use super::types::{AnnealFrame, AnnealState, SaProblem};
use crate::error::{Error, ObjectiveEvaluationError, Result};
use crate::optimizer::Optimizer;
use crate::random::{rng_from_seed, unit};
use rand::rngs::StdRng;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, info};

/// Metropolis acceptance probability for an energy change at `temperature`.
///
/// `1.0` whenever `delta_energy <= 0`, otherwise `exp(-delta_energy / T)`,
/// floored at the smallest positive `f64` so it never underflows to zero.
///
/// ```
/// use metaheur_trace::sa::acceptance_probability;
///
/// assert_eq!(acceptance_probability(-1.0, 5.0), 1.0);
/// assert_eq!(acceptance_probability(0.0, 5.0), 1.0);
/// assert!((acceptance_probability(1.0, 1.0) - (-1.0f64).exp()).abs() < 1e-15);
/// ```
pub fn acceptance_probability(delta_energy: f64, temperature: f64) -> f64 {
    if delta_energy < 0.0 {
        1.0
    } else {
        (-delta_energy / temperature).exp().max(f64::MIN_POSITIVE)
    }
}

/// A single-solution annealing walk that advances one move per
/// [`step`](Optimizer::step).
pub struct Annealer<P: SaProblem> {
    problem: P,
    config: SaConfig,
    rng: StdRng,
    state: AnnealState<P::Solution>,
}

impl<P: SaProblem> Annealer<P> {
    /// Validates `config` and evaluates the initial solution.
    pub fn new(problem: P, config: SaConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = rng_from_seed(config.seed);

        let current = problem.initial_solution(&mut rng);
        let current_energy = energy(&problem, &current)?;

        debug!(
            energy = current_energy,
            temperature = config.initial_temperature,
            "annealer initialized"
        );

        let state = AnnealState {
            best: current.clone(),
            best_energy: current_energy,
            current,
            current_energy,
            temperature: config.initial_temperature,
            iteration: 0,
            accepted_moves: 0,
            improving_moves: 0,
        };

        Ok(Self {
            problem,
            config,
            rng,
            state,
        })
    }

    pub fn config(&self) -> &SaConfig {
        &self.config
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// Consumes the annealer, returning its final state.
    pub fn into_state(self) -> AnnealState<P::Solution> {
        self.state
    }
}

fn energy<P: SaProblem>(problem: &P, solution: &P::Solution) -> Result<f64> {
    let value = problem.cost(solution);
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::ObjectiveEvaluation(ObjectiveEvaluationError {
            value,
            position: problem.coordinates(solution),
        }))
    }
}

impl<P: SaProblem> Optimizer for Annealer<P> {
    type State = AnnealState<P::Solution>;
    type Frame = AnnealFrame<P::Solution>;

    /// Proposes one neighbor, applies the Metropolis criterion, then cools.
    ///
    /// A uniform draw is consumed only when `delta_energy >= 0`.
    fn step(&mut self) -> Result<Self::Frame> {
        if self.is_done() {
            return Err(Error::Exhausted {
                max_iterations: self.config.max_iterations,
            });
        }

        let temperature = self.state.temperature;
        let previous_energy = self.state.current_energy;

        let candidate = self.problem.neighbor(&self.state.current, &mut self.rng);
        let candidate_energy = energy(&self.problem, &candidate)?;
        let delta_energy = candidate_energy - previous_energy;
        let accept_probability = acceptance_probability(delta_energy, temperature);

        let accepted = delta_energy < 0.0 || unit(&mut self.rng) < accept_probability;

        let state = &mut self.state;
        let mut improved_best = false;
        if delta_energy < 0.0 {
            state.improving_moves += 1;
        }
        if accepted {
            state.current = candidate.clone();
            state.current_energy = candidate_energy;
            state.accepted_moves += 1;

            if candidate_energy < state.best_energy {
                state.best = candidate.clone();
                state.best_energy = candidate_energy;
                improved_best = true;
            }
        }

        state.temperature = self.config.cooling.cool(temperature);
        state.iteration += 1;

        debug!(
            iteration = state.iteration,
            delta_energy,
            accept_probability,
            accepted,
            temperature = state.temperature,
            best = state.best_energy,
            "sa iteration"
        );

        Ok(AnnealFrame {
            iteration: state.iteration,
            candidate,
            candidate_energy,
            previous_energy,
            delta_energy,
            accept_probability,
            accepted,
            temperature,
            next_temperature: state.temperature,
            current_energy: state.current_energy,
            best_energy: state.best_energy,
            improved_best,
        })
    }

    fn is_done(&self) -> bool {
        self.state.iteration >= self.config.max_iterations
    }

    fn state(&self) -> &Self::State {
        &self.state
    }

    fn iteration(&self) -> usize {
        self.state.iteration
    }
}

/// Result of a Simulated Annealing run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaResult<S> {
    /// The best solution found.
    pub best: S,

    /// Cost of the best solution.
    pub best_cost: f64,

    /// Total number of iterations (neighbor evaluations).
    pub iterations: usize,

    /// Temperature after the last cooling step.
    pub final_temperature: f64,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of improving moves.
    pub improving_moves: usize,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Best cost before the first iteration and after each one.
    pub cost_history: Vec<f64>,

    pub frames: Vec<AnnealFrame<S>>,
}

/// Executes the Simulated Annealing algorithm.
pub struct SaRunner;

impl SaRunner {
    /// Runs SA optimization.
    pub fn run<P: SaProblem>(problem: P, config: &SaConfig) -> Result<SaResult<P::Solution>> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs SA with an optional cancellation token.
    pub fn run_with_cancel<P: SaProblem>(
        problem: P,
        config: &SaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SaResult<P::Solution>> {
        let mut annealer = Annealer::new(problem, config.clone())?;
        let initial_best = annealer.state().best_energy;

        let frames = annealer.run_until_cancelled(cancel.as_deref())?;
        let cancelled = !annealer.is_done();

        let mut cost_history = Vec::with_capacity(frames.len() + 1);
        cost_history.push(initial_best);
        cost_history.extend(frames.iter().map(|f| f.best_energy));

        let state = annealer.into_state();
        info!(
            iterations = state.iteration,
            best = state.best_energy,
            accepted = state.accepted_moves,
            final_temperature = state.temperature,
            cancelled,
            "sa finished"
        );

        Ok(SaResult {
            best: state.best,
            best_cost: state.best_energy,
            iterations: state.iteration,
            final_temperature: state.temperature,
            accepted_moves: state.accepted_moves,
            improving_moves: state.improving_moves,
            cancelled,
            cost_history,
            frames,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::Bounds;
    use crate::landscape::{sine_mixture, sphere};
    use crate::sa::{CoolingSchedule, SaConfig, UniformWalk};
    use rand::seq::SliceRandom;
    use rand::Rng;

    // ---- Quadratic minimization: f(x) = x^2, minimum at 0 ----

    struct QuadraticProblem;

    impl SaProblem for QuadraticProblem {
        type Solution = f64;

        fn initial_solution<R: Rng>(&self, rng: &mut R) -> f64 {
            rng.random_range(-10.0..10.0)
        }

        fn cost(&self, x: &f64) -> f64 {
            x * x
        }

        fn neighbor<R: Rng>(&self, x: &f64, rng: &mut R) -> f64 {
            x + rng.random_range(-1.0..1.0)
        }
    }

    fn showcase_walk() -> UniformWalk<fn(&[f64]) -> f64> {
        UniformWalk::from_start(sine_mixture as fn(&[f64]) -> f64, vec![6.5], 1.0)
            .unwrap()
            .with_bounds(Bounds::uniform(1, 0.0, 10.0).unwrap())
            .unwrap()
    }

    #[test]
    fn test_sa_quadratic_geometric() {
        let config = SaConfig::default()
            .with_initial_temperature(100.0)
            .with_cooling_rate(0.995)
            .with_max_iterations(5000)
            .with_seed(42);

        let result = SaRunner::run(QuadraticProblem, &config).unwrap();

        assert!(
            result.best_cost < 1.0,
            "expected near-zero cost, got {}",
            result.best_cost
        );
        assert!(result.improving_moves > 0);
        assert!(result.accepted_moves > result.improving_moves);
    }

    #[test]
    fn test_sa_quadratic_lundy_mees() {
        let t0 = 100.0;
        let t_end = 0.001;
        let max_iter = 5000;
        let beta = (t0 - t_end) / (max_iter as f64 * t0 * t_end);

        let config = SaConfig::default()
            .with_initial_temperature(t0)
            .with_cooling(CoolingSchedule::LundyMees { beta })
            .with_max_iterations(max_iter)
            .with_seed(42);

        let result = SaRunner::run(QuadraticProblem, &config).unwrap();

        assert!(
            result.best_cost < 1.0,
            "expected near-zero cost, got {}",
            result.best_cost
        );
        assert!((result.final_temperature - t_end).abs() < 1e-6);
    }

    #[test]
    fn test_showcase_temperature_schedule() {
        let config = SaConfig::classroom().with_seed(20);
        let result = SaRunner::run(showcase_walk(), &config).unwrap();

        assert_eq!(result.iterations, 20);
        assert_eq!(result.frames.len(), 20);
        assert_eq!(result.frames[0].temperature, 10.0);

        for frame in &result.frames {
            assert_eq!(frame.next_temperature, 0.85 * frame.temperature);
        }
        for window in result.frames.windows(2) {
            assert_eq!(window[1].temperature, window[0].next_temperature);
        }

        let expected = 10.0 * 0.85f64.powi(20);
        assert!((result.final_temperature - expected).abs() < 1e-12);
        assert!((result.final_temperature - 0.3875).abs() < 1e-3);
    }

    #[test]
    fn test_showcase_frames_are_consistent() {
        let config = SaConfig::classroom().with_seed(7);
        let result = SaRunner::run(showcase_walk(), &config).unwrap();

        let mut current = 6.5;
        let mut best = sine_mixture(&[6.5]);
        for frame in &result.frames {
            assert_eq!(frame.previous_energy, sine_mixture(&[current]));
            assert_eq!(frame.candidate_energy, sine_mixture(&frame.candidate));
            assert!((0.0..=10.0).contains(&frame.candidate[0]));
            assert!((frame.candidate[0] - current).abs() <= 1.0);
            assert_eq!(
                frame.delta_energy,
                frame.candidate_energy - frame.previous_energy
            );
            assert!(frame.accept_probability > 0.0 && frame.accept_probability <= 1.0);
            if frame.delta_energy <= 0.0 {
                assert_eq!(frame.accept_probability, 1.0);
                assert!(frame.accepted);
            }
            if frame.accepted {
                current = frame.candidate[0];
            }
            assert_eq!(frame.current_energy, sine_mixture(&[current]));
            best = best.min(frame.current_energy);
            assert_eq!(frame.best_energy, best);
        }
        assert_eq!(result.best_cost, best);
    }

    #[test]
    fn test_zero_delta_always_accepted() {
        let flat = |_: &[f64]| 2.0;
        let walk = UniformWalk::from_start(flat, vec![0.0], 0.5).unwrap();
        let config = SaConfig::classroom().with_seed(3);
        let result = SaRunner::run(walk, &config).unwrap();

        assert_eq!(result.accepted_moves, 20);
        assert_eq!(result.improving_moves, 0);
        for frame in &result.frames {
            assert_eq!(frame.delta_energy, 0.0);
            assert_eq!(frame.accept_probability, 1.0);
            assert!(frame.accepted);
            assert!(!frame.improved_best);
        }
    }

    #[test]
    fn test_same_seed_identical_trace() {
        let config = SaConfig::default().with_max_iterations(300).with_seed(99);
        let walk = || UniformWalk::from_start(sphere, vec![3.0, -2.0, 1.0], 0.5).unwrap();

        let a = SaRunner::run(walk(), &config).unwrap();
        let b = SaRunner::run(walk(), &config).unwrap();
        assert_eq!(a.frames, b.frames);
        assert_eq!(a.best, b.best);
    }

    #[test]
    fn test_sa_cost_history_non_increasing() {
        let config = SaConfig::default()
            .with_initial_temperature(50.0)
            .with_max_iterations(2000)
            .with_seed(42);

        let result = SaRunner::run(QuadraticProblem, &config).unwrap();

        assert_eq!(result.cost_history.len(), 2001);
        for window in result.cost_history.windows(2) {
            assert!(
                window[1] <= window[0],
                "best cost history should be non-increasing: {} > {}",
                window[1],
                window[0]
            );
        }
    }

    #[test]
    fn test_temperature_stays_positive_and_non_increasing() {
        let config = SaConfig::default()
            .with_initial_temperature(1.0)
            .with_cooling_rate(0.5)
            .with_max_iterations(1000)
            .with_seed(1);
        let mut annealer = Annealer::new(QuadraticProblem, config).unwrap();
        let mut previous = annealer.state().temperature;
        while !annealer.is_done() {
            annealer.step().unwrap();
            let t = annealer.state().temperature;
            assert!(t > 0.0);
            assert!(t <= previous);
            previous = t;
        }
    }

    #[test]
    fn test_step_after_budget_is_exhausted() {
        let mut annealer =
            Annealer::new(QuadraticProblem, SaConfig::classroom().with_seed(1)).unwrap();
        annealer.run_to_end().unwrap();
        assert!(matches!(
            annealer.step(),
            Err(Error::Exhausted { max_iterations: 20 })
        ));
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let config = SaConfig::default().with_cooling_rate(1.2);
        assert!(matches!(
            Annealer::new(QuadraticProblem, config),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_non_finite_cost_reports_coordinates() {
        let pinned = |x: &[f64]| if x[0] == 0.5 { 0.0 } else { f64::NAN };
        let walk = UniformWalk::from_start(pinned, vec![0.5], 1.0).unwrap();
        let mut annealer = Annealer::new(walk, SaConfig::default().with_seed(4)).unwrap();

        let before = annealer.state().clone();
        let err = annealer.step().unwrap_err();
        assert_eq!(annealer.state(), &before);
        assert_eq!(annealer.iteration(), 0);
        match err {
            Error::ObjectiveEvaluation(e) => {
                assert!(e.value.is_nan());
                assert_eq!(e.position.len(), 1);
                assert_ne!(e.position[0], 0.5);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_sa_cancellation() {
        let config = SaConfig::default().with_seed(42);
        let cancel = Arc::new(AtomicBool::new(true));

        let result = SaRunner::run_with_cancel(QuadraticProblem, &config, Some(cancel)).unwrap();
        assert!(result.cancelled);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.final_temperature, 100.0);
    }

    // ---- Discrete: permutation sorting ----

    struct PermSortProblem {
        n: usize,
    }

    impl SaProblem for PermSortProblem {
        type Solution = Vec<usize>;

        fn initial_solution<R: Rng>(&self, rng: &mut R) -> Vec<usize> {
            let mut perm: Vec<usize> = (0..self.n).collect();
            perm.shuffle(rng);
            perm
        }

        fn cost(&self, perm: &Vec<usize>) -> f64 {
            // Number of elements not in their correct position
            perm.iter().enumerate().filter(|&(i, &v)| i != v).count() as f64
        }

        fn neighbor<R: Rng>(&self, perm: &Vec<usize>, rng: &mut R) -> Vec<usize> {
            let mut new = perm.clone();
            let i = rng.random_range(0..self.n);
            let j = rng.random_range(0..self.n);
            new.swap(i, j);
            new
        }
    }

    #[test]
    fn test_sa_permutation_sort() {
        let config = SaConfig::default()
            .with_initial_temperature(5.0)
            .with_cooling_rate(0.999)
            .with_max_iterations(20000)
            .with_seed(42);

        let result = SaRunner::run(PermSortProblem { n: 10 }, &config).unwrap();

        assert!(
            result.best_cost <= 4.0,
            "expected near-sorted permutation, got cost {}",
            result.best_cost
        );
    }

    #[test]
    fn test_sa_metropolis_accepts_uphill() {
        // At very high temperature, almost all moves should be accepted
        let config = SaConfig::default()
            .with_initial_temperature(1e8)
            .with_cooling_rate(0.999)
            .with_max_iterations(1000)
            .with_seed(42);

        let result = SaRunner::run(QuadraticProblem, &config).unwrap();

        let acceptance_ratio = result.accepted_moves as f64 / result.iterations as f64;
        assert!(
            acceptance_ratio > 0.8,
            "expected high acceptance at high temp, got {acceptance_ratio}"
        );
    }
}
