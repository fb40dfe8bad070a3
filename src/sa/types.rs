//! Core trait and state types for Simulated Annealing.

use rand::Rng;

/// Defines a Simulated Annealing problem.
///
/// The user implements neighbor generation and cost evaluation.
/// The SA framework handles temperature management, acceptance
/// criterion, and cooling.
///
/// # Minimization
///
/// SA minimizes the cost function. For maximization, negate the cost.
///
/// # Examples
///
/// ```ignore
/// struct TspProblem { distances: Vec<Vec<f64>> }
///
/// impl SaProblem for TspProblem {
///     type Solution = Vec<usize>;
///
///     fn initial_solution<R: Rng>(&self, rng: &mut R) -> Vec<usize> {
///         let mut tour: Vec<usize> = (0..self.distances.len()).collect();
///         tour.shuffle(rng);
///         tour
///     }
///
///     fn cost(&self, tour: &Vec<usize>) -> f64 {
///         tour.windows(2).map(|w| self.distances[w[0]][w[1]]).sum()
///     }
///
///     fn neighbor<R: Rng>(&self, tour: &Vec<usize>, rng: &mut R) -> Vec<usize> {
///         let mut new = tour.clone();
///         let i = rng.random_range(0..new.len());
///         let j = rng.random_range(0..new.len());
///         new.swap(i, j);
///         new
///     }
/// }
/// ```
///
/// # References
///
/// Kirkpatrick et al. (1983), Cerny (1985)
pub trait SaProblem {
    /// The solution representation type.
    type Solution: Clone;

    /// Creates the initial solution.
    fn initial_solution<R: Rng>(&self, rng: &mut R) -> Self::Solution;

    /// Computes the cost (energy) of a solution. Lower is better.
    ///
    /// Must be finite; a NaN or infinite cost aborts the step with an
    /// [`ObjectiveEvaluationError`](crate::error::ObjectiveEvaluationError).
    fn cost(&self, solution: &Self::Solution) -> f64;

    /// Generates a neighbor of the current solution.
    fn neighbor<R: Rng>(&self, solution: &Self::Solution, rng: &mut R) -> Self::Solution;

    /// Numeric coordinates of a solution, used in error reports.
    fn coordinates(&self, _solution: &Self::Solution) -> Vec<f64> {
        Vec::new()
    }
}

/// The annealing walk between iterations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealState<S> {
    /// Current solution. May be worse than `best`.
    pub current: S,
    pub current_energy: f64,

    /// Best solution ever visited.
    pub best: S,

    /// Never increases.
    pub best_energy: f64,

    /// Temperature for the next iteration. Strictly positive.
    pub temperature: f64,

    /// Completed iterations.
    pub iteration: usize,

    /// Accepted moves, including improvements.
    pub accepted_moves: usize,

    /// Moves with `delta_energy < 0`.
    pub improving_moves: usize,
}

/// Result of one annealing iteration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealFrame<S> {
    /// 1-based index of the iteration this frame describes.
    pub iteration: usize,

    /// The proposed neighbor.
    pub candidate: S,
    pub candidate_energy: f64,

    /// Energy of the current solution before the move.
    pub previous_energy: f64,

    /// `candidate_energy - previous_energy`.
    pub delta_energy: f64,

    /// Metropolis probability, in `(0, 1]`.
    pub accept_probability: f64,
    pub accepted: bool,

    /// Temperature the decision was made at.
    pub temperature: f64,

    /// Temperature after cooling.
    pub next_temperature: f64,

    /// Energy of the current solution after the move.
    pub current_energy: f64,
    pub best_energy: f64,
    pub improved_best: bool,
}
