//! Saving and loading games.
//!
//! [`codec`] defines the file layout. [`Saver`] writes it on a background
//! thread so the game loop never blocks on disk: a request made while another
//! save is still running is skipped rather than queued, and a request with an
//! unchanged game clock is skipped as well. The first save after a new game or
//! a load writes the whole file; later saves to the same file only rewrite the
//! clock and the camera.

pub mod codec;

pub use self::codec::{LoadedGame, SaveError};

use crate::game::player::PlayerParams;
use crate::maze::Maze;
use log::{error, info};
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

/// What happened to a save request.
#[derive(Debug)]
pub enum SaveOutcome {
    /// A background save is running; join the handle to wait for it.
    Started(JoinHandle<()>),
    /// Another save was still in flight.
    SkippedInFlight,
    /// Nothing changed since the last save.
    SkippedUnchanged,
}

#[derive(Debug, Default)]
struct SaveRecord {
    /// Game time of the last successful save.
    last_time: Option<f32>,
    /// File the maze was last written to in full.
    written_to: Option<PathBuf>,
}

/// Holds the in-flight flag; clears it when dropped.
struct InFlight(Arc<AtomicBool>);

impl InFlight {
    fn try_acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| Self(Arc::clone(flag)))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Background save manager for one game session.
#[derive(Debug, Default)]
pub struct Saver {
    in_flight: Arc<AtomicBool>,
    record: Arc<Mutex<SaveRecord>>,
}

impl Saver {
    /// A saver whose first save writes everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a background save is running.
    pub fn is_saving(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Starts saving to `path` in the background.
    ///
    /// Failures are logged from the worker thread and not retried.
    pub fn save(
        &self,
        path: impl Into<PathBuf>,
        maze: Arc<Maze>,
        player: PlayerParams,
        game_time: f32,
    ) -> SaveOutcome {
        let Some(guard) = InFlight::try_acquire(&self.in_flight) else {
            info!("Save skipped: another save is still running");
            return SaveOutcome::SkippedInFlight;
        };

        let path = path.into();
        let full = {
            let record = self.record.lock().unwrap_or_else(PoisonError::into_inner);
            if record.last_time == Some(game_time) {
                return SaveOutcome::SkippedUnchanged;
            }
            record.written_to.as_deref() != Some(path.as_path())
        };

        let record = Arc::clone(&self.record);
        let handle = thread::spawn(move || {
            let _guard = guard;
            let result = if full {
                write_full(&path, &maze, player, game_time)
            } else {
                write_incremental(&path, player, game_time)
            };

            match result {
                Ok(()) => {
                    let mut record = record.lock().unwrap_or_else(PoisonError::into_inner);
                    record.last_time = Some(game_time);
                    record.written_to = Some(path.clone());
                    info!(
                        "Saved {} ({}) at {:.1}s",
                        path.display(),
                        if full { "full" } else { "incremental" },
                        game_time
                    );
                }
                Err(e) => error!("Failed to save {}: {}", path.display(), e),
            }
        });

        SaveOutcome::Started(handle)
    }

    /// Loads a save file; the next save through this saver writes everything.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<LoadedGame, SaveError> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);
        let loaded = codec::decode(&mut reader)?;

        let mut record = self.record.lock().unwrap_or_else(PoisonError::into_inner);
        *record = SaveRecord::default();
        info!(
            "Loaded {}: {}x{} maze at {:.1}s",
            path.display(),
            loaded.maze.width(),
            loaded.maze.height(),
            loaded.game_time
        );
        Ok(loaded)
    }
}

fn write_full(
    path: &Path,
    maze: &Maze,
    player: PlayerParams,
    game_time: f32,
) -> Result<(), SaveError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    codec::encode_full(&mut writer, maze, player, game_time)
}

fn write_incremental(path: &Path, player: PlayerParams, game_time: f32) -> Result<(), SaveError> {
    let file = OpenOptions::new().write(true).open(path)?;
    let mut writer = BufWriter::new(file);
    codec::encode_incremental(&mut writer, player, game_time)
}

/// A save path under `dir` named after the current local time.
pub fn timestamped_path(dir: impl AsRef<Path>) -> PathBuf {
    let now = chrono::Local::now();
    dir.as_ref().join(format!("{}.sav", now.format("Maze_%m-%d-%y_%I-%M%p")))
}
