//! Chunkmaze - the core of a first-person 3D maze game
//!
//! Procedurally carved mazes stored in 32×32 chunks, first-person movement with
//! wall sliding, render styles behind a chunk visibility cache, and a compact
//! binary save format. The window, the GPU and the GUI are left to the embedding
//! application, which talks to this crate through three narrow interfaces:
//! [`renderer::RenderSurface`] for drawing, [`game::keys::InputSnapshot`] for
//! input, and any `Read + Seek` / `Write + Seek` stream for persistence.
//!
//! # Architecture
//! - `maze/`: chunk storage, the backtracking generator and the background loader
//! - `game/`: player, collision, input mapping and the per-frame tick
//! - `renderer/`: chunk visibility cache and the built-in render styles
//! - `save/`: the save file codec and the background save manager
//! - `math/`: angle and coordinate helpers
//! - `config`: session tunables with environment overrides

#![warn(missing_docs)]
pub mod config;
pub mod game;
pub mod math;
pub mod maze;
pub mod renderer;
pub mod save;
