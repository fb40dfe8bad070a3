//! Particle Swarm Optimization (PSO).
//!
//! A population of particles moves through a real vector space. Each
//! velocity blends three pulls: inertia, attraction to the particle's own
//! best position, and attraction to the swarm's best position. Coefficients
//! are not normalized and neither velocity nor position is clamped unless
//! explicitly configured.
//!
//! # References
//!
//! - Kennedy & Eberhart (1995), "Particle Swarm Optimization"
//! - Shi & Eberhart (1998), "A Modified Particle Swarm Optimizer"
//! - Clerc & Kennedy (2002), "The Particle Swarm: Explosion, Stability,
//!   and Convergence in a Multidimensional Complex Space"

mod config;
mod runner;
mod types;

pub use config::PsoConfig;
pub use runner::{PsoResult, PsoRunner, Swarm};
pub use types::{Particle, ParticleMove, SwarmFrame, SwarmState};
