//! Player state and movement logic.
//!
//! This module defines the [`Player`] struct, which tracks the player's position, orientation,
//! and movement parameters, and provides methods for mouse look and for turning held keys into
//! a displacement. Collision against the maze lives in [`collision`](super::collision).
//!
//! # Coordinate System
//!
//! - X-axis: maze columns
//! - Y-axis: elevation above the floor (0 = standing)
//! - Z-axis: maze rows
//!
//! Angles are in radians:
//! - **Pitch**: look up/down, kept inside (-π/2, π/2)
//! - **Yaw**: look left/right, wrapped into [0, 2π)
//! - **Roll**: carried for the camera and the save file; gameplay never changes it

use crate::game::keys::{GameKey, KeyState};
use crate::math::{self, cell_center};
use crate::maze::Cell;

/// Camera position and orientation, exactly as persisted in a save file.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PlayerParams {
    /// World position `[x, y, z]`.
    pub position: [f32; 3],
    /// Pitch in radians.
    pub pitch: f32,
    /// Yaw in radians.
    pub yaw: f32,
    /// Roll in radians.
    pub roll: f32,
}

/// Represents the player character's state in the world.
#[derive(Debug, Clone)]
pub struct Player {
    /// Player's world position `[x, y, z]`; `y` is the elevation of the feet.
    pub position: [f32; 3],
    /// Pitch angle in radians.
    pub pitch: f32,
    /// Yaw angle in radians.
    pub yaw: f32,
    /// Roll angle in radians.
    pub roll: f32,
    /// Movement speed in cells per second.
    pub speed: f32,
    /// Radians of rotation per pixel of cursor travel.
    pub mouse_sensitivity: f32,
    /// Radius of the collision circle, in cells.
    pub width: f32,
    /// Upward speed applied by a jump, in cells per second.
    pub jump_speed: f32,
    /// Downward acceleration in cells per second squared.
    pub gravity: f32,
    /// Current vertical velocity.
    pub vertical_velocity: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    /// Creates a new [`Player`] standing at the origin, facing along -z.
    pub fn new() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            pitch: 0.0,
            yaw: 0.0,
            roll: 0.0,
            speed: 3.0,
            mouse_sensitivity: 0.002,
            width: 0.2,
            jump_speed: 5.0,
            gravity: 9.8,
            vertical_velocity: 0.0,
        }
    }

    /// Places the player on the floor at the centre of `cell`.
    pub fn spawn_at(&mut self, cell: Cell) {
        let (x, z) = cell_center(cell);
        self.position = [x, 0.0, z];
        self.vertical_velocity = 0.0;
    }

    /// The maze cell under the player.
    pub fn current_cell(&self) -> Cell {
        math::world_to_cell(self.position[0], self.position[2])
    }

    /// Whether the player is standing on the floor.
    pub fn is_grounded(&self) -> bool {
        self.position[1] <= 0.0
    }

    /// Updates orientation from the cursor's pixel offset to the window centre.
    ///
    /// Yaw wraps around freely; pitch is clamped short of straight up/down so the
    /// camera never flips.
    pub fn look(&mut self, delta_x: f64, delta_y: f64) {
        self.yaw = math::wrap_angle(self.yaw - delta_x as f32 * self.mouse_sensitivity);
        self.pitch = math::clamp_pitch(self.pitch - delta_y as f32 * self.mouse_sensitivity);
    }

    /// Horizontal displacement `(dx, dz)` for the held movement keys.
    ///
    /// Forward is `(-sin yaw, -cos yaw)` and right is `(cos yaw, -sin yaw)`.
    /// Diagonal input is normalized so it is no faster than a single direction.
    pub fn movement_vector(&self, keys: &KeyState, delta_time: f32) -> (f32, f32) {
        let (sin, cos) = self.yaw.sin_cos();
        let forward = (-sin, -cos);
        let right = (cos, -sin);

        let mut direction = (0.0, 0.0);
        let mut add = |v: (f32, f32), sign: f32| {
            direction.0 += v.0 * sign;
            direction.1 += v.1 * sign;
        };
        if keys.is_pressed(GameKey::MoveForward) {
            add(forward, 1.0);
        }
        if keys.is_pressed(GameKey::MoveBackward) {
            add(forward, -1.0);
        }
        if keys.is_pressed(GameKey::MoveRight) {
            add(right, 1.0);
        }
        if keys.is_pressed(GameKey::MoveLeft) {
            add(right, -1.0);
        }

        let length = (direction.0 * direction.0 + direction.1 * direction.1).sqrt();
        if length > 1.0 {
            direction = (direction.0 / length, direction.1 / length);
        }

        let step = self.speed * delta_time;
        (direction.0 * step, direction.1 * step)
    }

    /// Starts a jump if the player is on the floor.
    pub fn jump(&mut self) {
        if self.is_grounded() {
            self.vertical_velocity = self.jump_speed;
        }
    }

    /// Integrates gravity and returns this tick's vertical displacement.
    pub fn vertical_step(&mut self, delta_time: f32) -> f32 {
        if self.is_grounded() && self.vertical_velocity <= 0.0 {
            self.vertical_velocity = 0.0;
            return 0.0;
        }
        self.vertical_velocity -= self.gravity * delta_time;
        self.vertical_velocity * delta_time
    }

    /// Position and orientation for saving.
    pub fn params(&self) -> PlayerParams {
        PlayerParams {
            position: self.position,
            pitch: self.pitch,
            yaw: self.yaw,
            roll: self.roll,
        }
    }

    /// Restores position and orientation from a save.
    pub fn apply_params(&mut self, params: PlayerParams) {
        self.position = params.position;
        self.pitch = params.pitch;
        self.yaw = params.yaw;
        self.roll = params.roll;
        self.vertical_velocity = 0.0;
    }
}
