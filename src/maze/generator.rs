//! Maze generation using randomized backtracking over a chunked cell grid.
//!
//! A maze of `w × h` rooms is stored as a `(2w + 1) × (2h + 1)` cell grid where
//! odd coordinates are rooms and even coordinates are the walls between them.
//! The grid is split into [`Chunk`]s of `32 × 32` cells so large mazes can be
//! stored, saved and compiled for rendering piece by piece.
//!
//! # Examples
//!
//! ```rust
//! use chunkmaze::maze::Maze;
//!
//! let mut maze = Maze::new(10, 10).expect("valid dimensions");
//! assert!(maze.generate(42));
//!
//! // The exit always sits on the outer border and is open.
//! let exit = maze.exit();
//! assert!(maze.get_opened(exit.x, exit.y));
//! ```

use super::chunk::{self, Chunk};
use super::progress::{GenerationControl, GenerationObserver, LogProgress};
use super::MazeError;
use log::{debug, info};
use rand::prelude::*;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Instant;

/// Represents a cell in the maze grid
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Column index of the cell
    pub x: i32,
    /// Row index of the cell
    pub y: i32,
}

impl Cell {
    /// Creates a new Cell with the given coordinates
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Cardinal step directions used while carving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards negative y.
    North,
    /// Towards positive x.
    East,
    /// Towards positive y.
    South,
    /// Towards negative x.
    West,
}

impl Direction {
    /// All four directions, indexed by their bit position.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Unit offset `(dx, dy)` of one step in this direction.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    /// Bit of this direction inside a [`Generator`] tried mask.
    pub const fn bit(self) -> u8 {
        match self {
            Direction::North => 0b0001,
            Direction::East => 0b0010,
            Direction::South => 0b0100,
            Direction::West => 0b1000,
        }
    }

    /// The direction pointing back the way this one came.
    pub const fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }
}

/// One entry of the carving frontier.
///
/// `tried` records which of the four directions have already been attempted
/// from this room. Once every bit is set the entry is popped and carving
/// resumes from the room below it on the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generator {
    /// Room column.
    pub x: i32,
    /// Room row.
    pub y: i32,
    /// Bitmask of attempted directions (see [`Direction::bit`]).
    pub tried: u8,
}

impl Generator {
    /// Mask value once all four directions have been attempted.
    pub const EXHAUSTED: u8 = 0xF;

    /// Creates a frontier entry with nothing tried yet.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y, tried: 0 }
    }

    /// Creates a frontier entry for a room entered through `entry`.
    ///
    /// Stepping back through the wall we just opened can never carve anything,
    /// so that direction starts out marked.
    pub const fn entered_from(x: i32, y: i32, entry: Direction) -> Self {
        Self {
            x,
            y,
            tried: entry.bit(),
        }
    }
}

/// A chunked maze grid together with its generation state.
///
/// Cells outside `[0, width) × [0, height)` read as **open**. Carving relies on
/// this: a neighbour beyond the border is rejected by the same "already open"
/// test that rejects rooms carved earlier, so the algorithm needs no separate
/// bounds check. Chunks themselves are created closed.
#[derive(Debug)]
pub struct Maze {
    width: i32,
    height: i32,
    chunks_x: usize,
    chunks_y: usize,
    chunks: Vec<Chunk>,
    seed: u32,
    start: Cell,
    exit: Cell,
    generated: bool,
    control: Arc<GenerationControl>,
}

impl Maze {
    /// Creates an ungenerated maze with `w × h` rooms.
    ///
    /// No chunk memory is allocated until [`Maze::generate`] runs, so every
    /// cell reads open until then.
    ///
    /// # Errors
    /// Returns [`MazeError::InvalidDimensions`] if either dimension is below 1,
    /// or if the room count or cell grid would not fit the coordinate types.
    pub fn new(w: i32, h: i32) -> Result<Self, MazeError> {
        if w < 1 || h < 1 || (w as u32).checked_mul(h as u32).is_none() {
            return Err(MazeError::InvalidDimensions {
                width: w,
                height: h,
            });
        }

        let width = w
            .checked_mul(2)
            .and_then(|v| v.checked_add(1))
            .ok_or(MazeError::InvalidDimensions {
                width: w,
                height: h,
            })?;
        let height = h
            .checked_mul(2)
            .and_then(|v| v.checked_add(1))
            .ok_or(MazeError::InvalidDimensions {
                width: w,
                height: h,
            })?;

        Ok(Self {
            width,
            height,
            chunks_x: (width as usize).div_ceil(chunk::SIZE),
            chunks_y: (height as usize).div_ceil(chunk::SIZE),
            chunks: Vec::new(),
            seed: 0,
            start: Cell::new(1, 1),
            exit: Cell::new(1, 1),
            generated: false,
            control: Arc::new(GenerationControl::new()),
        })
    }

    /// Rebuilds a maze from persisted parts.
    ///
    /// `chunks` must hold exactly `chunks_x * chunks_y` entries for the given
    /// room dimensions.
    ///
    /// # Errors
    /// Returns [`MazeError::InvalidDimensions`] or [`MazeError::ChunkCount`].
    pub fn restore(
        w: i32,
        h: i32,
        seed: u32,
        start: Cell,
        exit: Cell,
        chunks: Vec<Chunk>,
    ) -> Result<Self, MazeError> {
        let mut maze = Self::new(w, h)?;
        let expected = maze.chunk_count();
        if chunks.len() != expected {
            return Err(MazeError::ChunkCount {
                expected,
                found: chunks.len(),
            });
        }

        maze.chunks = chunks;
        maze.seed = seed;
        maze.start = start;
        maze.exit = exit;
        maze.generated = true;
        Ok(maze)
    }

    /// Generates the maze from `seed`, logging progress about once a second.
    ///
    /// Returns `false` if generation was canceled through
    /// [`Maze::cancel_generation`]; the grid contents are then a partial carve
    /// and must be regenerated before use.
    pub fn generate(&mut self, seed: u32) -> bool {
        self.generate_with(seed, &mut LogProgress::default())
    }

    /// Generates the maze from `seed`, reporting progress to `observer`.
    ///
    /// See [`Maze::generate`].
    pub fn generate_with(&mut self, seed: u32, observer: &mut dyn GenerationObserver) -> bool {
        let mut rng = StdRng::seed_from_u64(u64::from(seed));
        let total = self.room_count();
        let started = Instant::now();

        self.generated = false;
        self.chunks.resize(self.chunk_count(), Chunk::new());
        self.chunks.iter_mut().for_each(Chunk::clear);

        self.control.begin(total);
        self.set_opened(1, 1, true);
        let mut stack = vec![Generator::new(1, 1)];

        self.start = self.random_corner(&mut rng);
        self.exit = self.random_corner(&mut rng);
        if !(self.width <= 3 && self.height <= 3) {
            while self.exit == self.start {
                self.exit = self.random_corner(&mut rng);
            }
        }
        let along_x = rng.gen_bool(0.5);
        self.exit = self.nudge_outward(self.exit, along_x);

        let interval = observer.interval();
        let mut last_report = Instant::now();

        while let Some(&Generator { x, y, tried }) = stack.last() {
            if self.control.take_cancel() {
                self.control.reset();
                info!(
                    "Maze generation canceled after {:.2}s",
                    started.elapsed().as_secs_f32()
                );
                return false;
            }

            if tried == Generator::EXHAUSTED {
                stack.pop();
                continue;
            }

            // Retry with replacement until an untried direction comes up.
            let direction = loop {
                let candidate = Direction::ALL[rng.gen_range(0..4)];
                if tried & candidate.bit() == 0 {
                    break candidate;
                }
            };

            let (dx, dy) = direction.offset();
            let (nx, ny) = (x + 2 * dx, y + 2 * dy);
            if self.get_opened(nx, ny) {
                if let Some(top) = stack.last_mut() {
                    top.tried |= direction.bit();
                }
                continue;
            }

            self.set_opened(x + dx, y + dy, true);
            self.set_opened(nx, ny, true);
            let opened = self.control.record_room();
            stack.push(Generator::entered_from(nx, ny, direction.opposite()));

            if last_report.elapsed() >= interval {
                observer.on_progress(opened, total);
                last_report = Instant::now();
            }
        }

        let exit = self.exit;
        self.set_opened(exit.x, exit.y, true);
        self.seed = seed;
        self.generated = true;

        observer.on_complete(total, started.elapsed());
        debug!(
            "Maze {}x{} generated from seed {}: start {:?}, exit {:?}",
            self.width, self.height, seed, self.start, self.exit
        );
        true
    }

    /// Asks a running [`Maze::generate`] to stop.
    ///
    /// Safe to call from any thread holding the handle returned by
    /// [`Maze::generation_control`]; this method is a convenience for callers
    /// that still own the maze.
    pub fn cancel_generation(&self) {
        self.control.cancel();
    }

    /// Fraction of rooms carved so far, in `[0, 1]`.
    pub fn get_generation_progress(&self) -> f32 {
        self.control.progress()
    }

    /// Shared handle for polling progress and canceling from another thread.
    pub fn generation_control(&self) -> Arc<GenerationControl> {
        Arc::clone(&self.control)
    }

    /// Number of rooms carved during the current or last generation run.
    pub fn angles_opened(&self) -> u32 {
        self.control.rooms_opened()
    }

    /// Whether the maze holds a complete carve (generated or loaded).
    pub fn is_generated(&self) -> bool {
        self.generated
    }

    /// Returns whether cell `(x, y)` is passable.
    ///
    /// Out-of-bounds cells and cells of a maze without allocated chunks read
    /// as open.
    pub fn get_opened(&self, x: i32, y: i32) -> bool {
        match self.locate(x, y) {
            Some((index, lx, ly)) => self.chunks[index].get_opened(lx, ly),
            None => true,
        }
    }

    /// Opens or closes cell `(x, y)`.
    ///
    /// Does nothing for out-of-bounds cells or before chunks are allocated.
    pub fn set_opened(&mut self, x: i32, y: i32, opened: bool) {
        if let Some((index, lx, ly)) = self.locate(x, y) {
            self.chunks[index].set_opened(lx, ly, opened);
        }
    }

    /// Index of the chunk holding cell `(x, y)`, or `None` when out of bounds.
    pub fn chunk_index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        Some((y / chunk::SIZE) * self.chunks_x + x / chunk::SIZE)
    }

    /// Chunk grid coordinates `(cx, cy)` of a chunk index.
    pub fn chunk_coords(&self, index: usize) -> (usize, usize) {
        (index % self.chunks_x, index / self.chunks_x)
    }

    /// The chunk at `index`, if allocated.
    pub fn chunk(&self, index: usize) -> Option<&Chunk> {
        self.chunks.get(index)
    }

    /// All allocated chunks in index order (empty before generation).
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Number of chunk columns.
    pub fn chunks_x(&self) -> usize {
        self.chunks_x
    }

    /// Number of chunk rows.
    pub fn chunks_y(&self) -> usize {
        self.chunks_y
    }

    /// Total number of chunks covering the grid.
    pub fn chunk_count(&self) -> usize {
        self.chunks_x * self.chunks_y
    }

    /// Grid width in cells (`2w + 1`).
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Grid height in cells (`2h + 1`).
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Number of rooms across (`w`).
    pub fn rooms_x(&self) -> i32 {
        (self.width - 1) / 2
    }

    /// Number of rooms down (`h`).
    pub fn rooms_y(&self) -> i32 {
        (self.height - 1) / 2
    }

    /// Total number of rooms, the denominator of generation progress.
    pub fn room_count(&self) -> u32 {
        (self.rooms_x() as u32) * (self.rooms_y() as u32)
    }

    /// Seed of the last successful generation.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Room the player spawns in.
    pub fn start(&self) -> Cell {
        self.start
    }

    /// Border opening that wins the game.
    pub fn exit(&self) -> Cell {
        self.exit
    }

    /// Whether `(x, y)` lies inside the grid.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    fn locate(&self, x: i32, y: i32) -> Option<(usize, usize, usize)> {
        if self.chunks.is_empty() {
            return None;
        }
        let index = self.chunk_index(x, y)?;
        Some((index, x as usize % chunk::SIZE, y as usize % chunk::SIZE))
    }

    fn random_corner(&self, rng: &mut StdRng) -> Cell {
        let x = if rng.gen_bool(0.5) { 0 } else { self.width - 3 };
        let y = if rng.gen_bool(0.5) { 0 } else { self.height - 3 };
        Cell::new(x + 1, y + 1)
    }

    fn nudge_outward(&self, cell: Cell, along_x: bool) -> Cell {
        if along_x {
            let x = if cell.x == 1 { 0 } else { self.width - 1 };
            Cell::new(x, cell.y)
        } else {
            let y = if cell.y == 1 { 0 } else { self.height - 1 };
            Cell::new(cell.x, y)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashSet, VecDeque};
    use std::time::Duration;

    /// Records every progress report.
    #[derive(Default)]
    struct Recorder {
        reports: Vec<(u32, u32)>,
        completed: bool,
    }

    impl GenerationObserver for Recorder {
        fn interval(&self) -> Duration {
            Duration::ZERO
        }

        fn on_progress(&mut self, opened: u32, total: u32) {
            self.reports.push((opened, total));
        }

        fn on_complete(&mut self, _total: u32, _elapsed: Duration) {
            self.completed = true;
        }
    }

    /// Flood fill over open cells inside the grid.
    fn reachable_from(maze: &Maze, from: Cell) -> HashSet<Cell> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([from]);
        seen.insert(from);
        while let Some(cell) = queue.pop_front() {
            for direction in Direction::ALL {
                let (dx, dy) = direction.offset();
                let next = Cell::new(cell.x + dx, cell.y + dy);
                if maze.in_bounds(next.x, next.y)
                    && maze.get_opened(next.x, next.y)
                    && seen.insert(next)
                {
                    queue.push_back(next);
                }
            }
        }
        seen
    }

    /// Border cells that are open.
    fn border_openings(maze: &Maze) -> Vec<Cell> {
        let mut openings = Vec::new();
        for y in 0..maze.height() {
            for x in 0..maze.width() {
                let on_border =
                    x == 0 || y == 0 || x == maze.width() - 1 || y == maze.height() - 1;
                if on_border && maze.get_opened(x, y) {
                    openings.push(Cell::new(x, y));
                }
            }
        }
        openings
    }

    /// Dimensions below one room are rejected.
    #[test]
    fn test_invalid_dimensions() {
        assert_eq!(
            Maze::new(0, 5).unwrap_err(),
            MazeError::InvalidDimensions {
                width: 0,
                height: 5
            }
        );
        assert!(Maze::new(3, -1).is_err());
    }

    /// Room counts past `u32::MAX` are rejected even when each side fits.
    #[test]
    fn test_room_count_overflow_rejected() {
        assert_eq!(
            Maze::new(70_000, 70_000).unwrap_err(),
            MazeError::InvalidDimensions {
                width: 70_000,
                height: 70_000
            }
        );
        assert!(Maze::new(i32::MAX, 1).is_err());

        let maze = Maze::new(65_535, 65_535).unwrap();
        assert_eq!(maze.room_count(), 65_535 * 65_535);
    }

    /// Before generation no chunks exist and every query reads open.
    #[test]
    fn test_unallocated_reads_open() {
        let mut maze = Maze::new(4, 4).unwrap();
        assert!(maze.chunks().is_empty());
        assert!(maze.get_opened(0, 0));
        maze.set_opened(0, 0, false);
        assert!(maze.get_opened(0, 0));
        assert!(!maze.is_generated());
    }

    /// The same seed always yields the same grid, start and exit.
    #[test]
    fn test_generation_is_deterministic() {
        let mut a = Maze::new(40, 25).unwrap();
        let mut b = Maze::new(40, 25).unwrap();
        assert!(a.generate(1234));
        assert!(b.generate(1234));

        assert_eq!(a.chunks(), b.chunks());
        assert_eq!(a.start(), b.start());
        assert_eq!(a.exit(), b.exit());
        assert_eq!(a.seed(), 1234);

        let mut c = Maze::new(40, 25).unwrap();
        assert!(c.generate(4321));
        assert_ne!(a.chunks(), c.chunks());
    }

    /// Every room, the start and the exit are connected.
    #[test]
    fn test_generated_maze_is_fully_connected() {
        for (w, h, seed) in [(1, 1, 42), (2, 7, 3), (17, 9, 99), (40, 40, 7)] {
            let mut maze = Maze::new(w, h).unwrap();
            assert!(maze.generate(seed));

            let reached = reachable_from(&maze, maze.start());
            for ry in 0..h {
                for rx in 0..w {
                    let room = Cell::new(2 * rx + 1, 2 * ry + 1);
                    assert!(reached.contains(&room), "room {:?} unreachable", room);
                }
            }
            assert!(reached.contains(&maze.exit()));
            assert_eq!(maze.angles_opened(), maze.room_count());
            assert_eq!(maze.get_generation_progress(), 1.0);
        }
    }

    /// A spanning tree over `n` rooms opens exactly `n - 1` walls, so the
    /// number of open cells is fixed.
    #[test]
    fn test_carve_is_a_spanning_tree() {
        let mut maze = Maze::new(30, 20).unwrap();
        assert!(maze.generate(5));

        let open: u32 = maze.chunks().iter().map(Chunk::open_count).sum();
        let rooms = maze.room_count();
        // rooms + connecting walls + the exit opening
        assert_eq!(open, rooms + (rooms - 1) + 1);
        assert_eq!(border_openings(&maze), vec![maze.exit()]);
    }

    /// Start is a corner room and exit is one step outside a corner room.
    #[test]
    fn test_start_and_exit_placement() {
        for seed in 0..32 {
            let mut maze = Maze::new(6, 4).unwrap();
            assert!(maze.generate(seed));
            let (start, exit) = (maze.start(), maze.exit());

            assert!(start.x == 1 || start.x == maze.width() - 2);
            assert!(start.y == 1 || start.y == maze.height() - 2);

            let on_x_border = exit.x == 0 || exit.x == maze.width() - 1;
            let on_y_border = exit.y == 0 || exit.y == maze.height() - 1;
            assert!(on_x_border ^ on_y_border, "exit {:?} not on one border", exit);
            assert_ne!(start, exit);
            assert!(maze.get_opened(exit.x, exit.y));
        }
    }

    /// `Maze(1, 1)` is a 3×3 grid with one room and a single border opening.
    /// The distinct-corner retry must not spin since only one corner exists.
    #[test]
    fn test_minimal_maze() {
        let mut maze = Maze::new(1, 1).unwrap();
        assert!(maze.generate(42));

        assert_eq!((maze.width(), maze.height()), (3, 3));
        assert_eq!(maze.start(), Cell::new(1, 1));
        assert!(maze.get_opened(1, 1));

        let openings = border_openings(&maze);
        assert_eq!(openings.len(), 1);
        assert_eq!(openings[0], maze.exit());
        assert!([Cell::new(0, 1), Cell::new(1, 0)].contains(&maze.exit()));
    }

    /// A single-row maze still finds two distinct corners.
    #[test]
    fn test_single_row_maze_has_distinct_corners() {
        let mut maze = Maze::new(5, 1).unwrap();
        assert!(maze.generate(8));
        assert_eq!(maze.height(), 3);
        assert_eq!(maze.start().y, 1);
        let exit_room = Cell::new(maze.exit().x.clamp(1, maze.width() - 2), 1);
        assert_ne!(exit_room, maze.start());
    }

    /// Chunk addressing across the 32-cell boundaries of a 65-wide maze.
    #[test]
    fn test_chunk_indexing_at_boundaries() {
        let mut maze = Maze::new(32, 40).unwrap();
        assert_eq!(maze.width(), 65);
        assert_eq!(maze.chunks_x(), 3);
        assert_eq!(maze.chunks_y(), 3);
        assert!(maze.generate(11));

        for (x, expected_cx) in [(31, 0), (32, 1), (63, 1), (64, 2)] {
            for (y, expected_cy) in [(0, 0), (31, 0), (32, 1), (64, 2)] {
                let index = maze.chunk_index(x, y).unwrap();
                assert_eq!(index, expected_cy * maze.chunks_x() + expected_cx);
                assert_eq!(maze.chunk_coords(index), (expected_cx, expected_cy));

                let local = maze
                    .chunk(index)
                    .unwrap()
                    .get_opened(x as usize % 32, y as usize % 32);
                assert_eq!(local, maze.get_opened(x, y));
            }
        }
        assert_eq!(maze.chunk_index(65, 0), None);
        assert_eq!(maze.chunk_index(-1, 0), None);
    }

    /// Out-of-bounds cells read open even after generation.
    #[test]
    fn test_out_of_bounds_reads_open() {
        let mut maze = Maze::new(3, 3).unwrap();
        assert!(maze.generate(1));
        assert!(maze.get_opened(-1, 3));
        assert!(maze.get_opened(3, maze.height()));
        assert!(!maze.get_opened(0, 0));
    }

    /// Progress reports only ever grow and end at the room total.
    #[test]
    fn test_progress_is_monotonic() {
        let mut maze = Maze::new(25, 25).unwrap();
        let mut recorder = Recorder::default();
        assert!(maze.generate_with(77, &mut recorder));

        assert!(recorder.completed);
        assert!(!recorder.reports.is_empty());
        assert!(recorder.reports.windows(2).all(|w| w[0].0 <= w[1].0));
        assert_eq!(recorder.reports.last(), Some(&(625, 625)));
    }

    /// A pending cancel stops generation, resets progress and clears itself.
    #[test]
    fn test_cancel_resets_progress() {
        let mut maze = Maze::new(20, 20).unwrap();
        maze.cancel_generation();
        assert!(!maze.generate(3));
        assert_eq!(maze.angles_opened(), 0);
        assert_eq!(maze.get_generation_progress(), 0.0);
        assert!(!maze.is_generated());

        // The flag was consumed, so the next run completes.
        assert!(maze.generate(3));
        assert!(maze.is_generated());
    }

    /// Regenerating reuses the maze object and fully replaces the grid.
    #[test]
    fn test_regenerate_replaces_grid() {
        let mut maze = Maze::new(12, 12).unwrap();
        assert!(maze.generate(1));
        assert!(maze.generate(2));

        let mut fresh = Maze::new(12, 12).unwrap();
        assert!(fresh.generate(2));
        assert_eq!(maze.chunks(), fresh.chunks());
    }

    /// Restoring checks the chunk count against the dimensions.
    #[test]
    fn test_restore_validates_chunk_count() {
        let err = Maze::restore(20, 20, 0, Cell::new(1, 1), Cell::new(0, 1), vec![Chunk::new()])
            .unwrap_err();
        assert_eq!(
            err,
            MazeError::ChunkCount {
                expected: 4,
                found: 1
            }
        );
    }
}
