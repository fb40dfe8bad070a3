//! Step-wise metaheuristic optimizers whose every iteration can be observed.
//!
//! Provides seedable implementations of three classic metaheuristics:
//!
//! - **Particle Swarm Optimization (PSO)**: A swarm of particles moving
//!   through a continuous search space under inertia, personal-best and
//!   global-best attraction.
//! - **Simulated Annealing (SA)**: Single-solution trajectory optimization
//!   with Metropolis acceptance and pluggable cooling schedules.
//! - **Ant Colony Optimization (ACO)**: Ant System for closed tours over a
//!   distance matrix.
//!
//! # Architecture
//!
//! Every optimizer implements [`Optimizer`]: construction validates the
//! configuration and builds the initial state, and each `step` advances
//! exactly one iteration, returning a frame that records what moved, what
//! was accepted and what improved. Runners (`PsoRunner`, `SaRunner`,
//! `AcoRunner`) drive an optimizer to completion and collect the frames.
//!
//! All randomness flows from one generator per optimizer, so a fixed seed
//! reproduces a run exactly.
//!
//! # Examples
//!
//! ```
//! use metaheur_trace::landscape::sphere;
//! use metaheur_trace::pso::{PsoConfig, Swarm};
//! use metaheur_trace::Optimizer;
//!
//! let mut swarm = Swarm::new(sphere, PsoConfig::classroom().with_seed(7)).unwrap();
//! while !swarm.is_done() {
//!     let frame = swarm.step().unwrap();
//!     assert_eq!(frame.moves.len(), 3);
//! }
//! assert_eq!(swarm.iteration(), 5);
//! ```

pub mod aco;
pub mod bounds;
pub mod error;
pub mod landscape;
pub mod objective;
pub mod optimizer;
pub mod pso;
pub mod random;
pub mod sa;

pub use error::{Error, Result};
pub use optimizer::Optimizer;
