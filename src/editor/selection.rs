//! Hit-testing cities under the pointer.
//!
//! Tolerances are given in screen pixels and converted to world units with
//! the current zoom, so the clickable radius looks the same at every scale.

use crate::model::{CitySet, Point};

/// Convert a screen-pixel tolerance to world units at `scale`.
pub fn world_tolerance(pixels: f64, scale: f64) -> f64 {
    if scale > 0.0 && scale.is_finite() {
        pixels / scale
    } else {
        pixels
    }
}

/// Index of the first city (storage order) strictly closer than `radius` to
/// `world`.
pub fn hit_test(cities: &CitySet, world: Point, radius: f64) -> Option<usize> {
    cities
        .iter()
        .position(|city| city.position().distance(world) < radius)
}
