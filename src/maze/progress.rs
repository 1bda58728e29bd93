//! Generation progress bridge between a worker thread and a polling UI.
//!
//! [`GenerationControl`] is the shared, lock-free part: the worker bumps the
//! carved-room counter and polls the cancel flag, while the UI reads progress
//! and may request cancellation. [`MazeLoader`] owns the worker thread and
//! publishes the finished [`Maze`] only after generation succeeds, so the
//! game never reads a half-carved grid.

use super::generator::Maze;
use log::{error, info};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Atomics shared between a generating maze and its observers.
#[derive(Debug, Default)]
pub struct GenerationControl {
    cancel: AtomicBool,
    rooms_opened: AtomicU32,
    room_total: AtomicU32,
}

impl GenerationControl {
    /// Creates an idle control block with zero progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation; observed by the worker on its next iteration.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    /// Whether a cancel request is pending.
    pub fn is_cancel_requested(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }

    /// Number of rooms carved so far.
    pub fn rooms_opened(&self) -> u32 {
        self.rooms_opened.load(Ordering::Acquire)
    }

    /// Fraction of rooms carved, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        let total = self.room_total.load(Ordering::Acquire);
        if total == 0 {
            return 0.0;
        }
        (self.rooms_opened() as f32 / total as f32).min(1.0)
    }

    /// Consumes a pending cancel request.
    pub(crate) fn take_cancel(&self) -> bool {
        self.cancel.swap(false, Ordering::AcqRel)
    }

    /// Starts a run of `total` rooms with the first room already carved.
    pub(crate) fn begin(&self, total: u32) {
        self.room_total.store(total, Ordering::Release);
        self.rooms_opened.store(1, Ordering::Release);
    }

    /// Counts one more carved room and returns the new count.
    pub(crate) fn record_room(&self) -> u32 {
        self.rooms_opened.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Drops progress back to zero after a cancel.
    pub(crate) fn reset(&self) {
        self.rooms_opened.store(0, Ordering::Release);
    }
}

/// Receives progress callbacks from the carving loop.
///
/// Keeps logging and timing concerns out of the algorithm itself.
pub trait GenerationObserver {
    /// Minimum wall-clock time between [`GenerationObserver::on_progress`] calls.
    fn interval(&self) -> Duration {
        Duration::from_secs(1)
    }

    /// Called periodically with the carved-room count.
    fn on_progress(&mut self, opened: u32, total: u32);

    /// Called once when a run finishes without being canceled.
    fn on_complete(&mut self, _total: u32, _elapsed: Duration) {}
}

/// Default observer: logs progress through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl GenerationObserver for LogProgress {
    fn on_progress(&mut self, opened: u32, total: u32) {
        info!(
            "Generating maze: {:.1}% ({}/{} rooms)",
            opened as f32 / total.max(1) as f32 * 100.0,
            opened,
            total
        );
    }

    fn on_complete(&mut self, total: u32, elapsed: Duration) {
        info!(
            "Maze generated: {} rooms in {:.2}s",
            total,
            elapsed.as_secs_f32()
        );
    }
}

/// What a [`MazeLoader`] poll reports.
#[derive(Debug, Clone)]
pub enum LoadState {
    /// Still carving; carries the current progress in `[0, 1]`.
    Generating(f32),
    /// Generation finished; the maze is now read-only and shareable.
    Ready(Arc<Maze>),
    /// The run was canceled and the partial maze discarded.
    Canceled,
    /// The worker could not be started or died without reporting.
    Failed,
}

enum Outcome {
    Finished(Maze),
    Canceled,
}

/// Runs maze generation on a background thread.
///
/// The main loop calls [`MazeLoader::poll`] once per frame and may call
/// [`MazeLoader::cancel`] at any time. Cancellation is cooperative and has no
/// timeout: keep polling until the state leaves [`LoadState::Generating`].
pub struct MazeLoader {
    control: Arc<GenerationControl>,
    slot: Arc<Mutex<Option<Outcome>>>,
    worker: Option<JoinHandle<()>>,
    state: LoadState,
}

impl MazeLoader {
    /// Spawns a worker that generates `maze` from `seed` with progress logging.
    pub fn spawn(maze: Maze, seed: u32) -> Self {
        Self::spawn_with(maze, seed, Box::new(LogProgress))
    }

    /// Spawns a worker reporting to a custom observer.
    pub fn spawn_with(
        mut maze: Maze,
        seed: u32,
        mut observer: Box<dyn GenerationObserver + Send>,
    ) -> Self {
        let control = maze.generation_control();
        let slot = Arc::new(Mutex::new(None));
        let worker_slot = Arc::clone(&slot);

        let spawned = thread::Builder::new()
            .name("maze-generation".to_string())
            .spawn(move || {
                let outcome = if maze.generate_with(seed, observer.as_mut()) {
                    Outcome::Finished(maze)
                } else {
                    Outcome::Canceled
                };
                *worker_slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(outcome);
            });

        let (worker, state) = match spawned {
            Ok(handle) => (Some(handle), LoadState::Generating(0.0)),
            Err(e) => {
                error!("Failed to start maze generation thread: {}", e);
                (None, LoadState::Failed)
            }
        };

        Self {
            control,
            slot,
            worker,
            state,
        }
    }

    /// Current progress in `[0, 1]`; 1.0 once the maze is ready.
    pub fn progress(&self) -> f32 {
        match self.state {
            LoadState::Ready(_) => 1.0,
            _ => self.control.progress(),
        }
    }

    /// Requests cancellation of a running generation.
    pub fn cancel(&self) {
        if matches!(self.state, LoadState::Generating(_)) {
            self.control.cancel();
        }
    }

    /// Whether a generated maze has been published.
    pub fn is_loaded(&self) -> bool {
        matches!(self.state, LoadState::Ready(_))
    }

    /// Checks on the worker without blocking.
    pub fn poll(&mut self) -> LoadState {
        if !matches!(self.state, LoadState::Generating(_)) {
            return self.state.clone();
        }

        let outcome = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        self.state = match outcome {
            Some(Outcome::Finished(maze)) => {
                info!("Maze {}x{} ready", maze.width(), maze.height());
                LoadState::Ready(Arc::new(maze))
            }
            Some(Outcome::Canceled) => LoadState::Canceled,
            None if self.worker.as_ref().is_some_and(JoinHandle::is_finished) => {
                error!("Maze generation thread exited without a result");
                LoadState::Failed
            }
            None => LoadState::Generating(self.control.progress()),
        };

        if !matches!(self.state, LoadState::Generating(_)) {
            // Worker is done (or dead); detach it.
            self.worker = None;
        }
        self.state.clone()
    }
}
