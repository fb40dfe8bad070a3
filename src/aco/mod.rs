//! Ant Colony Optimization (ACO) for the travelling salesman problem.
//!
//! Ants build tours city by city, preferring short edges that carry strong
//! pheromone trails. After every iteration trails evaporate and each ant
//! reinforces the edges of its own tour in proportion to how short it was.
//!
//! # References
//!
//! - Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a
//!   Colony of Cooperating Agents"
//! - Dorigo & Stützle (2004), *Ant Colony Optimization*, MIT Press

mod config;
mod runner;
mod types;

pub use config::AcoConfig;
pub use runner::{AcoResult, AcoRunner, AntColony};
pub use types::{AcoFrame, ColonyState, DistanceMatrix, Tour};
