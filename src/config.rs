//! Runtime configuration.
//!
//! [`GameConfig`] gathers the tunables of a session. Defaults are sensible for a
//! desktop game; [`GameConfig::from_env`] lets a launcher override the most
//! common ones without a settings file:
//!
//! | Variable | Field |
//! |---|---|
//! | `MAZE_WIDTH` | `maze_width` (rooms) |
//! | `MAZE_HEIGHT` | `maze_height` (rooms) |
//! | `MAZE_SEED` | `seed` |
//! | `MAZE_SAVE_PATH` | `save_path` |
//! | `MAZE_MOUSE_SENSITIVITY` | `mouse_sensitivity` (degrees per pixel) |

use crate::game::player::Player;
use log::warn;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Configuration for a game session
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Rooms across.
    pub maze_width: i32,
    /// Rooms down.
    pub maze_height: i32,
    /// Fixed generation seed; `None` picks a random one.
    pub seed: Option<u32>,
    /// Where the game is saved. `None` writes a timestamped file under `saves/`.
    pub save_path: Option<PathBuf>,
    /// Player speed in cells per second.
    pub player_speed: f32,
    /// Collision radius in cells.
    pub player_width: f32,
    /// Mouse sensitivity in degrees per pixel.
    pub mouse_sensitivity: f32,
    /// Seconds between automatic saves.
    pub autosave_interval: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            maze_width: 64,
            maze_height: 64,
            seed: None,
            save_path: None,
            player_speed: 3.0,
            player_width: 0.2,
            mouse_sensitivity: 0.1,
            autosave_interval: 30.0,
        }
    }
}

impl GameConfig {
    /// Defaults overridden by any `MAZE_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        override_from_env("MAZE_WIDTH", &mut config.maze_width);
        override_from_env("MAZE_HEIGHT", &mut config.maze_height);
        override_from_env("MAZE_MOUSE_SENSITIVITY", &mut config.mouse_sensitivity);

        let mut seed = 0u32;
        if override_from_env("MAZE_SEED", &mut seed) {
            config.seed = Some(seed);
        }
        if let Ok(path) = env::var("MAZE_SAVE_PATH") {
            config.save_path = Some(PathBuf::from(path));
        }
        config
    }

    /// The configured seed, or a fresh random one.
    pub fn resolve_seed(&self) -> u32 {
        self.seed.unwrap_or_else(rand::random)
    }

    /// Copies the player tunables onto `player`.
    pub fn apply_to_player(&self, player: &mut Player) {
        player.speed = self.player_speed;
        player.width = self.player_width;
        player.mouse_sensitivity = self.mouse_sensitivity.to_radians();
    }
}

/// Parses `name` into `target` if set; returns whether a value was applied.
fn override_from_env<T: FromStr>(name: &str, target: &mut T) -> bool {
    let Ok(raw) = env::var(name) else {
        return false;
    };
    match raw.trim().parse() {
        Ok(value) => {
            *target = value;
            true
        }
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid value", name, raw);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_to_player() {
        let config = GameConfig {
            player_speed: 5.0,
            mouse_sensitivity: 180.0,
            ..GameConfig::default()
        };
        let mut player = Player::new();
        config.apply_to_player(&mut player);
        assert_eq!(player.speed, 5.0);
        assert!((player.mouse_sensitivity - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn test_resolve_seed_prefers_configured() {
        let config = GameConfig {
            seed: Some(99),
            ..GameConfig::default()
        };
        assert_eq!(config.resolve_seed(), 99);
    }

    /// Each test uses its own variable names, since tests share the environment.
    fn unique_name(suffix: &str) -> String {
        format!("CHUNKMAZE_TEST_{}_{}", std::process::id(), suffix)
    }

    /// Valid values apply; invalid or missing ones leave the target alone.
    #[test]
    fn test_override_from_env() {
        let valid = unique_name("VALID");
        let invalid = unique_name("INVALID");
        // SAFETY: no other test reads or writes these variables.
        unsafe {
            env::set_var(&valid, " 42 ");
            env::set_var(&invalid, "nope");
        }

        let mut value = 7i32;
        assert!(override_from_env(&valid, &mut value));
        assert_eq!(value, 42);

        assert!(!override_from_env(&invalid, &mut value));
        assert_eq!(value, 42);

        assert!(!override_from_env(&unique_name("UNSET"), &mut value));
        assert_eq!(value, 42);

        unsafe {
            env::remove_var(&valid);
            env::remove_var(&invalid);
        }
    }

    /// `MAZE_*` variables override the defaults; a bad seed is ignored.
    #[test]
    fn test_from_env() {
        // SAFETY: this is the only test touching the `MAZE_*` variables.
        unsafe {
            env::set_var("MAZE_WIDTH", "12");
            env::set_var("MAZE_HEIGHT", "wide");
            env::set_var("MAZE_SEED", "-3");
            env::set_var("MAZE_SAVE_PATH", "saves/test.sav");
        }

        let config = GameConfig::from_env();
        assert_eq!(config.maze_width, 12);
        assert_eq!(config.maze_height, GameConfig::default().maze_height);
        assert_eq!(config.seed, None);
        assert_eq!(config.save_path, Some(PathBuf::from("saves/test.sav")));

        unsafe {
            for name in ["MAZE_WIDTH", "MAZE_HEIGHT", "MAZE_SEED", "MAZE_SAVE_PATH"] {
                env::remove_var(name);
            }
        }
    }
}
