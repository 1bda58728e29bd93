//! Chunkmaze - headless driver
//!
//! Runs the whole game core without a window: generates a maze on the
//! background loader (or loads the save file given as the first argument),
//! plays a scripted walk through it with autosaves and render style switches,
//! then saves, reloads the file and checks it matches.
//!
//! # Usage
//! `RUST_LOG=info cargo run -- [save-file]`, with the `MAZE_*` variables
//! described in [`chunkmaze::config`] for the maze size, seed and save path.

use anyhow::{bail, ensure, Context};
use chunkmaze::config::GameConfig;
use chunkmaze::game::keys::{winit_key_to_game_key, InputSnapshot, KeyState};
use chunkmaze::game::{GameEvent, GameState};
use chunkmaze::maze::{LoadState, Maze, MazeLoader};
use chunkmaze::renderer::styles::SolidWalls;
use chunkmaze::renderer::vertex::Vertex;
use chunkmaze::renderer::{MazeRenderer, RenderSurface, Topology};
use chunkmaze::save::{self, SaveOutcome, Saver};
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use winit::keyboard::{Key, NamedKey, SmolStr};

const FRAME_TIME: f32 = 1.0 / 60.0;
const FRAMES: u32 = 3600;
const WINDOW_CENTER: (f64, f64) = (640.0, 360.0);

/// Counts what would have been sent to the GPU.
#[derive(Debug, Default)]
struct FrameStats {
    draws: usize,
    triangles: usize,
    lines: usize,
}

impl RenderSurface for FrameStats {
    fn draw(&mut self, topology: Topology, vertices: &[Vertex]) {
        self.draws += 1;
        match topology {
            Topology::Triangles => self.triangles += vertices.len() / 3,
            Topology::Lines => self.lines += vertices.len() / 2,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = GameConfig::from_env();

    let mut state = match std::env::args().nth(1) {
        Some(path) => {
            let loaded = Saver::new()
                .load(&path)
                .with_context(|| format!("loading {}", path))?;
            GameState::resume(Arc::new(loaded.maze), &config, loaded.player, loaded.game_time)
        }
        None => GameState::new(generate(&config)?, &config),
    };

    let saver = Saver::new();
    let save_path = config
        .save_path
        .clone()
        .unwrap_or_else(|| save::timestamped_path("saves"));
    let mut pending: Vec<JoinHandle<()>> = Vec::new();

    let maze = Arc::clone(&state.maze);
    let mut renderer = MazeRenderer::new(&maze, Box::new(SolidWalls));
    let mut stats = FrameStats::default();
    let mut last_autosave = state.game_time;

    for frame in 0..FRAMES {
        let input = scripted_input(frame);
        for event in state.tick(&input, FRAME_TIME) {
            match event {
                GameEvent::CycleRenderStyle => renderer.cycle_style(&maze),
                GameEvent::SaveRequested => queue_save(&saver, &save_path, &state, &mut pending),
                GameEvent::Paused | GameEvent::Resumed => info!("{:?}", event),
                GameEvent::Won => info!("Won after {:.1}s", state.game_time),
            }
        }

        let [x, _, z] = state.player.position;
        renderer.frame(&maze, x, z, &mut stats);

        if state.game_time - last_autosave >= config.autosave_interval {
            last_autosave = state.game_time;
            queue_save(&saver, &save_path, &state, &mut pending);
        }
        if state.won {
            break;
        }
    }

    info!(
        "Played {:.1}s in style {}: {} draws, {} triangles, {} lines, {} chunks compiled",
        state.game_time,
        renderer.style().name(),
        stats.draws,
        stats.triangles,
        stats.lines,
        renderer.cache().compile_count()
    );

    // Let any autosave finish so the final one is not skipped.
    join_all(&mut pending);
    queue_save(&saver, &save_path, &state, &mut pending);
    join_all(&mut pending);

    let reloaded = Saver::new()
        .load(&save_path)
        .with_context(|| format!("reloading {}", save_path.display()))?;
    ensure!(
        reloaded.maze.chunks() == state.maze.chunks(),
        "reloaded maze differs from the one played"
    );
    ensure!(
        reloaded.player == state.player.params(),
        "reloaded player differs from the one played"
    );
    info!("Save verified: {}", save_path.display());
    Ok(())
}

fn queue_save(saver: &Saver, path: &Path, state: &GameState, pending: &mut Vec<JoinHandle<()>>) {
    let outcome = saver.save(
        path,
        Arc::clone(&state.maze),
        state.player.params(),
        state.game_time,
    );
    if let SaveOutcome::Started(handle) = outcome {
        pending.push(handle);
    }
}

fn join_all(pending: &mut Vec<JoinHandle<()>>) {
    for handle in pending.drain(..) {
        if handle.join().is_err() {
            warn!("A save thread panicked");
        }
    }
}

/// Generates a maze on the background loader, polling like a loading screen.
fn generate(config: &GameConfig) -> anyhow::Result<Arc<Maze>> {
    let seed = config.resolve_seed();
    let maze = Maze::new(config.maze_width, config.maze_height)?;
    info!(
        "Generating {}x{} rooms with seed {}",
        config.maze_width, config.maze_height, seed
    );

    let mut loader = MazeLoader::spawn(maze, seed);
    loop {
        match loader.poll() {
            LoadState::Generating(_) => thread::sleep(Duration::from_millis(16)),
            LoadState::Ready(maze) => return Ok(maze),
            LoadState::Canceled => bail!("maze generation was canceled"),
            LoadState::Failed => bail!("maze generation failed"),
        }
    }
}

/// Keys and mouse for one frame of the demo walk.
///
/// Walks forward while sweeping the view, strafes now and then, jumps, flips
/// the render style and asks for a quick save at fixed frames.
fn scripted_input(frame: u32) -> InputSnapshot {
    let mut pressed = vec![Key::Character(SmolStr::new("w"))];
    if (frame / 120) % 3 == 1 {
        pressed.push(Key::Character(SmolStr::new("d")));
    }
    if frame % 240 == 200 {
        pressed.push(Key::Named(NamedKey::Space));
    }
    if frame % 900 == 450 {
        pressed.push(Key::Named(NamedKey::Tab));
    }
    if frame == 1800 {
        pressed.push(Key::Named(NamedKey::F5));
    }

    let mut keys = KeyState::new();
    for key in &pressed {
        if let Some(game_key) = winit_key_to_game_key(key) {
            keys.press_key(game_key);
        }
    }

    let mut input = InputSnapshot::centered(keys, WINDOW_CENTER);
    let sweep = if (frame / 300) % 2 == 0 { 3.0 } else { -3.0 };
    input.cursor.0 += sweep;
    input
}
