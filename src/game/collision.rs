//! Circle-versus-grid collision for first-person movement.
//!
//! # Overview
//!
//! The player is a circle of radius [`Player::width`] on the maze floor. A
//! candidate position is blocked when the circle overlaps any closed cell in
//! the 3×3 neighbourhood of the cell it lands in. Each cell is the unit square
//! `[x, x + 1] × [z, z + 1]`, so the test is the squared distance from the
//! circle centre to the nearest point of that square.
//!
//! Moves are resolved one axis at a time: a blocked x step does not cancel the
//! z step, which lets the player slide along walls.
//!
//! Walls are only solid inside the walking band `[0, WALKING_BAND_TOP]`. Above
//! it the player flies over the maze freely.

use crate::game::Player;
use crate::maze::Maze;

/// Elevation above which horizontal movement ignores walls.
pub const WALKING_BAND_TOP: f32 = 1.0;

/// Whether a circle of `radius` centred at `(x, z)` overlaps a closed cell.
///
/// Cells outside the maze read as open, so the area past the exit is walkable.
pub fn circle_hits_wall(maze: &Maze, x: f32, z: f32, radius: f32) -> bool {
    let cell_x = x.floor() as i32;
    let cell_z = z.floor() as i32;
    let radius_sq = radius * radius;

    for cz in cell_z - 1..=cell_z + 1 {
        for cx in cell_x - 1..=cell_x + 1 {
            if maze.get_opened(cx, cz) {
                continue;
            }

            let nearest_x = x.clamp(cx as f32, cx as f32 + 1.0);
            let nearest_z = z.clamp(cz as f32, cz as f32 + 1.0);
            let dx = x - nearest_x;
            let dz = z - nearest_z;
            if dx * dx + dz * dz < radius_sq {
                return true;
            }
        }
    }

    false
}

// Integration with Player struct
impl Player {
    /// Applies a displacement `[dx, dy, dz]` against the maze.
    ///
    /// Elevation is always updated and clamped at the floor. While inside the
    /// walking band the x and z components are each applied only if the
    /// resulting position is clear of walls.
    pub fn try_move(&mut self, maze: &Maze, delta: [f32; 3]) {
        let [dx, dy, dz] = delta;

        self.position[1] += dy;
        if self.position[1] < 0.0 {
            self.position[1] = 0.0;
            self.vertical_velocity = self.vertical_velocity.max(0.0);
        }

        if self.position[1] > WALKING_BAND_TOP {
            self.position[0] += dx;
            self.position[2] += dz;
            return;
        }

        let [x, _, z] = self.position;
        if !circle_hits_wall(maze, x + dx, z, self.width) {
            self.position[0] = x + dx;
        }
        let x = self.position[0];
        if !circle_hits_wall(maze, x, z + dz, self.width) {
            self.position[2] = z + dz;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::{Cell, Chunk};

    /// A 3×3 maze whose only open cell is the room at (1, 1).
    fn sealed_room() -> Maze {
        let mut chunk = Chunk::new();
        chunk.set_opened(1, 1, true);
        Maze::restore(1, 1, 0, Cell::new(1, 1), Cell::new(1, 1), vec![chunk]).unwrap()
    }

    /// A 5×3 maze with rooms (1, 1) and (3, 1) joined through (2, 1).
    fn corridor() -> Maze {
        let mut chunk = Chunk::new();
        for x in 1..=3 {
            chunk.set_opened(x, 1, true);
        }
        Maze::restore(2, 1, 0, Cell::new(1, 1), Cell::new(3, 1), vec![chunk]).unwrap()
    }

    fn player_at(x: f32, z: f32) -> Player {
        let mut player = Player::new();
        player.position = [x, 0.0, z];
        player
    }

    #[test]
    fn test_circle_hits_wall() {
        let maze = sealed_room();
        assert!(!circle_hits_wall(&maze, 1.5, 1.5, 0.2));
        assert!(circle_hits_wall(&maze, 1.85, 1.5, 0.2));
        assert!(circle_hits_wall(&maze, 1.1, 1.1, 0.2));
        // Exactly touching is not an overlap.
        assert!(!circle_hits_wall(&maze, 1.5, 1.75, 0.25));
    }

    /// A player boxed into a single cell never gets its centre within `width`
    /// of the surrounding walls, whichever way it pushes.
    #[test]
    fn test_sealed_room_contains_player() {
        let maze = sealed_room();
        let radius = 0.2;
        let pushes = [
            [0.07, 0.0, 0.0],
            [-0.07, 0.0, 0.0],
            [0.0, 0.0, 0.07],
            [0.0, 0.0, -0.07],
            [0.05, 0.0, 0.05],
            [-0.05, 0.0, 0.03],
        ];

        for push in pushes {
            let mut player = player_at(1.5, 1.5);
            player.width = radius;
            for _ in 0..50 {
                player.try_move(&maze, push);
                let [x, _, z] = player.position;
                assert!(x >= 1.0 + radius - 1e-5 && x <= 2.0 - radius + 1e-5);
                assert!(z >= 1.0 + radius - 1e-5 && z <= 2.0 - radius + 1e-5);
            }
        }
    }

    /// A blocked axis does not stop the other one.
    #[test]
    fn test_wall_sliding() {
        let maze = corridor();
        let mut player = player_at(1.5, 1.5);
        for _ in 0..20 {
            player.try_move(&maze, [0.1, 0.0, 0.1]);
        }
        let [x, _, z] = player.position;
        assert!(x > 3.0, "player should slide along the corridor, x = {}", x);
        assert!(z <= 2.0 - player.width + 1e-5);
    }

    /// Elevation never goes below the floor.
    #[test]
    fn test_floor_clamp() {
        let maze = sealed_room();
        let mut player = player_at(1.5, 1.5);
        player.vertical_velocity = -4.0;
        player.try_move(&maze, [0.0, -3.0, 0.0]);
        assert_eq!(player.position[1], 0.0);
        assert_eq!(player.vertical_velocity, 0.0);
    }

    /// Above the walking band walls are ignored.
    #[test]
    fn test_flying_ignores_walls() {
        let maze = sealed_room();
        let mut player = player_at(1.5, 1.5);
        player.position[1] = 2.0;
        player.try_move(&maze, [2.0, 0.0, 0.0]);
        assert_eq!(player.position[0], 3.5);
    }

    /// Past the border everything reads open, so the exit leads outside.
    #[test]
    fn test_can_walk_out_through_exit() {
        let mut chunk = Chunk::new();
        chunk.set_opened(1, 1, true);
        chunk.set_opened(0, 1, true);
        let maze = Maze::restore(1, 1, 0, Cell::new(1, 1), Cell::new(0, 1), vec![chunk]).unwrap();

        let mut player = player_at(1.5, 1.5);
        for _ in 0..30 {
            player.try_move(&maze, [-0.1, 0.0, 0.0]);
        }
        assert!(player.position[0] < 0.0);
    }
}
