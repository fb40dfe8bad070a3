//! Swarm state and per-iteration frames.

/// One member of the swarm.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Particle {
    pub position: Vec<f64>,
    pub velocity: Vec<f64>,

    /// Objective value at `position`. Recomputed after every move.
    pub fitness: f64,

    /// Best position this particle has ever visited.
    pub best_position: Vec<f64>,

    /// Objective value at `best_position`. Never increases.
    pub best_fitness: f64,
}

/// The whole swarm between iterations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwarmState {
    pub particles: Vec<Particle>,

    /// Best personal best across the swarm.
    pub global_best_position: Vec<f64>,

    /// Never increases across iterations.
    pub global_best_fitness: f64,

    /// Index of the particle that owns the global best.
    pub global_best_index: usize,

    /// Completed iterations.
    pub iteration: usize,
}

/// How one particle moved during an iteration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParticleMove {
    pub index: usize,

    /// Random weight applied to the cognitive term.
    pub r1: f64,

    /// Random weight applied to the social term.
    pub r2: f64,

    pub from: Vec<f64>,
    pub to: Vec<f64>,
    pub velocity: Vec<f64>,
    pub fitness: f64,
    pub best_fitness: f64,

    /// Whether this move set a new personal best.
    pub improved_personal_best: bool,
}

/// Result of one swarm iteration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwarmFrame {
    /// 1-based index of the iteration this frame describes.
    pub iteration: usize,
    pub moves: Vec<ParticleMove>,
    pub global_best_position: Vec<f64>,
    pub global_best_fitness: f64,
    pub improved_global_best: bool,
}
