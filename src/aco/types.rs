//! Problem, state and frame types for the ant colony.

use crate::error::ConfigurationError;

/// Pairwise travel costs between cities, stored row-major.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceMatrix {
    size: usize,
    distances: Vec<f64>,
}

impl DistanceMatrix {
    /// Builds a matrix from rows. Must be square with at least two cities,
    /// contain only finite, non-negative entries and have a zero diagonal.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, ConfigurationError> {
        let size = rows.len();
        if size < 2 {
            return Err(ConfigurationError::new(
                "distances",
                format!("need at least 2 cities, got {size}"),
            ));
        }
        let mut distances = Vec::with_capacity(size * size);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(ConfigurationError::new(
                    "distances",
                    format!("row {i} has {} entries, expected {size}", row.len()),
                ));
            }
            if let Some(d) = row.iter().find(|d| !d.is_finite() || **d < 0.0) {
                return Err(ConfigurationError::new(
                    "distances",
                    format!("row {i} contains invalid distance {d}"),
                ));
            }
            if row[i] != 0.0 {
                return Err(ConfigurationError::new(
                    "distances",
                    format!("city {i} is {} away from itself, expected 0", row[i]),
                ));
            }
            distances.extend(row);
        }
        Ok(Self { size, distances })
    }

    /// Euclidean distances between 2D points.
    pub fn from_points(points: &[[f64; 2]]) -> Result<Self, ConfigurationError> {
        let rows: Vec<Vec<f64>> = points
            .iter()
            .map(|a| {
                points
                    .iter()
                    .map(|b| ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt())
                    .collect()
            })
            .collect();
        Self::new(rows)
    }

    /// Number of cities.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances[from * self.size + to]
    }

    /// Total length of a path visiting `cities` in order.
    pub fn path_length(&self, cities: &[usize]) -> f64 {
        cities
            .windows(2)
            .map(|w| self.distance(w[0], w[1]))
            .sum()
    }
}

/// A closed tour: starts and ends at the same city.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tour {
    /// Visited cities, with the start city repeated at the end.
    pub cities: Vec<usize>,
    pub length: f64,
}

/// Colony state between iterations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColonyState {
    /// Pheromone per directed edge, row-major `size * size`. Always positive.
    pub pheromone: Vec<f64>,

    /// Number of cities.
    pub size: usize,

    /// Shortest tour found so far. `None` before the first iteration.
    pub best_tour: Option<Tour>,

    /// Completed iterations.
    pub iteration: usize,
}

impl ColonyState {
    pub fn pheromone(&self, from: usize, to: usize) -> f64 {
        self.pheromone[from * self.size + to]
    }
}

/// Result of one colony iteration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoFrame {
    /// 1-based index of the iteration this frame describes.
    pub iteration: usize,

    /// One tour per ant, in release order.
    pub tours: Vec<Tour>,

    /// Index into `tours` of this iteration's shortest tour.
    pub iteration_best: usize,

    pub best_tour: Tour,
    pub improved_best: bool,

    /// Pheromone after evaporation and deposit, row-major.
    pub pheromone: Vec<f64>,
}
