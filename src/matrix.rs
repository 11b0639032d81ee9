//! Pairwise distance matrix derived from a [`CitySet`].
//!
//! The matrix is always rebuilt in full. Distances are Euclidean, rounded to
//! [`DISTANCE_DECIMALS`] places with round-half-away-from-zero (`f64::round`).
//! Non-finite distances are stored as `0.0`.

use serde::{Deserialize, Serialize};

use crate::model::{CitySet, Point};

pub const DISTANCE_DECIMALS: i32 = 2;

/// Round a raw distance for the matrix; non-finite input yields `0.0`.
pub fn round_distance(d: f64) -> f64 {
    if !d.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(DISTANCE_DECIMALS);
    let rounded = (d * factor).round() / factor;
    if rounded.is_finite() { rounded } else { 0.0 }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DistanceMatrix {
    rows: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    /// Build the n×n matrix for `cities`.
    pub fn build(cities: &CitySet) -> Self {
        let points: Vec<Point> = cities.iter().map(|c| c.position()).collect();
        let n = points.len();
        let mut rows = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = round_distance(points[i].distance(points[j]));
                rows[i][j] = d;
                rows[j][i] = d;
            }
        }
        Self { rows }
    }

    /// Number of cities (rows).
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.rows.get(i)?.get(j).copied()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.rows
    }

    /// Zero diagonal and `m[i][j] == m[j][i]` everywhere.
    pub fn is_symmetric(&self) -> bool {
        let n = self.rows.len();
        (0..n).all(|i| {
            self.rows[i].len() == n
                && self.rows[i][i] == 0.0
                && (0..n).all(|j| self.rows[i][j] == self.rows[j][i])
        })
    }
}
