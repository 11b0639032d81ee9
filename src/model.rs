use anyhow::Context;
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

// ────────────────────────────────────────────────────────────────────────────
// Point
// ────────────────────────────────────────────────────────────────────────────

/// A 2D coordinate, used for both screen space and world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Length of the vector from the origin to this point.
    pub fn length(self) -> f64 {
        self.distance(Point::ZERO)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// City / CitySet
// ────────────────────────────────────────────────────────────────────────────

/// A city in world-space coordinates.
///
/// Cities carry no identifier of their own: their index inside the owning
/// [`CitySet`] is the identity used by the distance matrix and by tours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub x: f64,
    pub y: f64,
}

impl City {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn at(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Ordered set of cities. Indices are always contiguous `0..len()`.
///
/// Mutation is crate-private: edits go through the editor controller so that
/// history, tour invalidation and matrix rebuilds stay consistent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CitySet {
    cities: Vec<City>,
}

impl CitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&City> {
        self.cities.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, City> {
        self.cities.iter()
    }

    pub fn as_slice(&self) -> &[City] {
        &self.cities
    }

    /// Append a city and return its index.
    pub(crate) fn push(&mut self, city: City) -> usize {
        self.cities.push(city);
        self.cities.len() - 1
    }

    /// Remove the city at `index`; later cities shift down by one.
    pub(crate) fn remove(&mut self, index: usize) -> Option<City> {
        if index < self.cities.len() {
            Some(self.cities.remove(index))
        } else {
            None
        }
    }

    /// Load a city set from a JSON file containing `[{"x": .., "y": ..}, ...]`.
    pub fn load_json(path: impl AsRef<Utf8Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path.as_std_path())
            .with_context(|| format!("Failed to read {}", path))?;
        let set: CitySet = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse cities from {}", path))?;
        if let Some(i) = set.iter().position(|c| !c.position().is_finite()) {
            anyhow::bail!("City {} in {} has a non-finite coordinate", i + 1, path);
        }
        Ok(set)
    }

    /// Write the city set as pretty-printed JSON.
    pub fn save_json(&self, path: impl AsRef<Utf8Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_std_path(), json)
            .with_context(|| format!("Failed to write {}", path))?;
        Ok(())
    }
}

impl FromIterator<City> for CitySet {
    fn from_iter<I: IntoIterator<Item = City>>(iter: I) -> Self {
        Self {
            cities: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<City>> for CitySet {
    fn from(cities: Vec<City>) -> Self {
        Self { cities }
    }
}

impl<'a> IntoIterator for &'a CitySet {
    type Item = &'a City;
    type IntoIter = std::slice::Iter<'a, City>;

    fn into_iter(self) -> Self::IntoIter {
        self.cities.iter()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tour
// ────────────────────────────────────────────────────────────────────────────

/// A candidate route as an ordered list of city indices, as reported by the
/// solver. The indices are not checked against any city set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tour {
    indices: Vec<usize>,
}

impl Tour {
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// True when every index refers to a city of a set with `n` entries.
    pub fn fits(&self, n: usize) -> bool {
        self.indices.iter().all(|&i| i < n)
    }

    /// World-space segments between successive tour stops. Segments touching
    /// an index outside `cities` are skipped.
    pub fn segments<'a>(&'a self, cities: &'a CitySet) -> impl Iterator<Item = (Point, Point)> + 'a {
        self.indices.windows(2).filter_map(move |w| {
            let a = cities.get(w[0])?;
            let b = cities.get(w[1])?;
            Some((a.position(), b.position()))
        })
    }
}

impl From<Vec<usize>> for Tour {
    fn from(indices: Vec<usize>) -> Self {
        Self { indices }
    }
}
