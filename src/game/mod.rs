//! Game state management module.
//!
//! This module defines the [`GameState`] struct, which tracks all mutable state for the game
//! loop: the player, the published maze, the game clock and the pause/win flags. One call to
//! [`GameState::tick`] per frame advances everything; rendering happens afterwards on the same
//! thread.

pub mod collision;
pub mod keys;
pub mod player;

use self::keys::{GameKey, InputSnapshot, KeyState};
use self::player::{Player, PlayerParams};
use crate::config::GameConfig;
use crate::maze::Maze;
use log::info;
use std::sync::Arc;

/// Things that happened during a tick that the outer loop may act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The game was paused.
    Paused,
    /// The game was resumed.
    Resumed,
    /// The player reached the exit this tick.
    Won,
    /// The player asked for an immediate save.
    SaveRequested,
    /// The player asked for the next render style.
    CycleRenderStyle,
}

/// Represents the entire mutable state of a running game.
#[derive(Debug)]
pub struct GameState {
    /// The maze being played; read-only once published.
    pub maze: Arc<Maze>,
    /// The player character.
    pub player: Player,
    /// Seconds of unpaused play.
    pub game_time: f32,
    /// Whether the simulation is frozen by the player.
    pub paused: bool,
    /// Whether the exit has been reached.
    pub won: bool,
    previous_keys: KeyState,
}

impl GameState {
    /// Starts a new game with the player at the maze start.
    pub fn new(maze: Arc<Maze>, config: &GameConfig) -> Self {
        let mut player = Player::new();
        config.apply_to_player(&mut player);
        player.spawn_at(maze.start());

        Self {
            maze,
            player,
            game_time: 0.0,
            paused: false,
            won: false,
            previous_keys: KeyState::new(),
        }
    }

    /// Resumes a saved game.
    pub fn resume(maze: Arc<Maze>, config: &GameConfig, params: PlayerParams, game_time: f32) -> Self {
        let mut state = Self::new(maze, config);
        state.player.apply_params(params);
        state.game_time = game_time;
        state.won = state.player.current_cell() == state.maze.exit();
        state
    }

    /// Advances the game by `delta_time` seconds.
    ///
    /// Movement, mouse look and the clock are frozen while paused or won; key
    /// presses for pause, save and style switching are still reported.
    pub fn tick(&mut self, input: &InputSnapshot, delta_time: f32) -> Vec<GameEvent> {
        let mut events = Vec::new();

        if self.just_pressed(&input.keys, GameKey::Pause) && !self.won {
            self.paused = !self.paused;
            events.push(if self.paused {
                GameEvent::Paused
            } else {
                GameEvent::Resumed
            });
        }
        if self.just_pressed(&input.keys, GameKey::QuickSave) {
            events.push(GameEvent::SaveRequested);
        }
        if self.just_pressed(&input.keys, GameKey::CycleRenderStyle) {
            events.push(GameEvent::CycleRenderStyle);
        }
        self.previous_keys = input.keys.clone();

        if self.paused || self.won {
            return events;
        }

        self.game_time += delta_time;

        let (look_x, look_y) = input.cursor_delta();
        self.player.look(look_x, look_y);

        if input.keys.is_pressed(GameKey::Jump) {
            self.player.jump();
        }

        let (dx, dz) = self.player.movement_vector(&input.keys, delta_time);
        let dy = self.player.vertical_step(delta_time);
        self.player.try_move(&self.maze, [dx, dy, dz]);

        if self.player.current_cell() == self.maze.exit() {
            self.won = true;
            info!("Exit reached after {:.1}s", self.game_time);
            events.push(GameEvent::Won);
        }

        events
    }

    fn just_pressed(&self, keys: &KeyState, key: GameKey) -> bool {
        keys.is_pressed(key) && !self.previous_keys.is_pressed(key)
    }
}
