//! Math helpers shared by movement, collision and the chunk cache.
//!
//! World space uses one unit per maze cell: world `x` runs along maze `x`,
//! world `z` runs along maze `y`, and world `y` is elevation above the floor.

use crate::maze::chunk;
use crate::maze::Cell;
use std::f32::consts::{FRAC_PI_2, TAU};

/// Largest pitch magnitude; keeps the camera inside the open interval (-π/2, π/2).
pub const MAX_PITCH: f32 = FRAC_PI_2 - 1.0e-3;

/// Wraps a yaw angle into `[0, 2π)`.
pub fn wrap_angle(radians: f32) -> f32 {
    let wrapped = radians.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Clamps a pitch angle strictly inside `(-π/2, π/2)`.
pub fn clamp_pitch(radians: f32) -> f32 {
    radians.clamp(-MAX_PITCH, MAX_PITCH)
}

/// Maze cell containing the world-space point `(x, z)`.
pub fn world_to_cell(x: f32, z: f32) -> Cell {
    Cell::new(x.floor() as i32, z.floor() as i32)
}

/// World-space `(x, z)` at the centre of `cell`.
pub fn cell_center(cell: Cell) -> (f32, f32) {
    (cell.x as f32 + 0.5, cell.y as f32 + 0.5)
}

/// Half-chunk coordinates of the world-space point `(x, z)`.
///
/// The chunk cache reacts to movement at this granularity so it can widen the
/// window towards the side the player is approaching.
pub fn half_chunk(x: f32, z: f32) -> (i32, i32) {
    let half = (chunk::SIZE / 2) as f32;
    ((x / half).floor() as i32, (z / half).floor() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_wrap_angle() {
        assert_eq!(wrap_angle(0.0), 0.0);
        assert!((wrap_angle(-PI / 2.0) - 1.5 * PI).abs() < 1e-5);
        assert!((wrap_angle(5.0 * PI) - PI).abs() < 1e-4);
        assert!(wrap_angle(-1.0e-9) < TAU);
    }

    #[test]
    fn test_clamp_pitch_stays_open() {
        assert!(clamp_pitch(10.0) < FRAC_PI_2);
        assert!(clamp_pitch(-10.0) > -FRAC_PI_2);
        assert_eq!(clamp_pitch(0.3), 0.3);
    }

    #[test]
    fn test_cell_conversions() {
        assert_eq!(world_to_cell(1.5, 2.99), Cell::new(1, 2));
        assert_eq!(world_to_cell(-0.1, 0.0), Cell::new(-1, 0));
        assert_eq!(cell_center(Cell::new(3, 4)), (3.5, 4.5));
    }

    #[test]
    fn test_half_chunk() {
        assert_eq!(half_chunk(0.0, 15.9), (0, 0));
        assert_eq!(half_chunk(16.0, 47.0), (1, 2));
        assert_eq!(half_chunk(-1.0, 64.0), (-1, 4));
    }
}
