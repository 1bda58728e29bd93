//! Binary save file layout.
//!
//! All values are little-endian and live at fixed offsets, so an incremental
//! save can rewrite the clock and the camera in place without touching the
//! maze:
//!
//! | Offset  | Field         | Type                                            |
//! |---------|---------------|-------------------------------------------------|
//! | `0x000` | version       | 3 bytes: major, minor, patch                    |
//! | `0x100` | game time     | `f32`                                           |
//! | `0x200` | player        | 6 × `f32`: x, y, z, pitch, yaw, roll            |
//! | `0x300` | maze params   | 7 × `i32`: w, h, seed, exit x/y, start x/y      |
//! | `0x31C` | chunk bitsets | one 128-byte block per chunk, in index order    |
//!
//! `w` and `h` are room counts. Inside a chunk block, bit `x * 32 + y` holds
//! cell `(x, y)`: byte `index / 8`, bit `index % 8`. The gaps between fields
//! are zero.

use crate::game::player::PlayerParams;
use crate::maze::{chunk, Cell, Chunk, Maze, MazeError};
use std::fmt;
use std::io::{self, Read, Seek, SeekFrom, Write};

/// Version written by this build. Files with another major version are rejected.
pub const CURRENT_VERSION: [u8; 3] = [1, 0, 0];

/// Offset of the version triple.
pub const VERSION_OFFSET: u64 = 0x000;
/// Offset of the game clock.
pub const GAME_TIME_OFFSET: u64 = 0x100;
/// Offset of the player position and orientation.
pub const PLAYER_OFFSET: u64 = 0x200;
/// Offset of the maze dimensions, seed, exit and start.
pub const MAZE_PARAMS_OFFSET: u64 = 0x300;
/// Directly after the seven maze parameters.
pub const CHUNKS_OFFSET: u64 = MAZE_PARAMS_OFFSET + 7 * 4;

/// Errors raised while reading or writing a save file.
#[derive(Debug)]
pub enum SaveError {
    /// The underlying stream failed.
    Io(io::Error),
    /// The file was written by an incompatible version.
    VersionMismatch {
        /// Version found in the file.
        found: [u8; 3],
        /// Version this build writes.
        expected: [u8; 3],
    },
    /// The file is truncated or holds values that do not describe a maze.
    Corrupt(String),
}

impl From<io::Error> for SaveError {
    fn from(e: io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<MazeError> for SaveError {
    fn from(e: MazeError) -> Self {
        SaveError::Corrupt(e.to_string())
    }
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "save file I/O error: {}", e),
            SaveError::VersionMismatch { found, expected } => write!(
                f,
                "save file version {}.{}.{} is not compatible with {}.{}.{}",
                found[0], found[1], found[2], expected[0], expected[1], expected[2]
            ),
            SaveError::Corrupt(reason) => write!(f, "corrupt save file: {}", reason),
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaveError::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// Everything a save file restores.
#[derive(Debug)]
pub struct LoadedGame {
    /// Seconds of play so far.
    pub game_time: f32,
    /// Camera position and orientation.
    pub player: PlayerParams,
    /// The maze, already generated.
    pub maze: Maze,
}

/// Writes a complete save: header, player, maze parameters and every chunk.
pub fn encode_full<W: Write + Seek>(
    writer: &mut W,
    maze: &Maze,
    player: PlayerParams,
    game_time: f32,
) -> Result<(), SaveError> {
    encode_incremental(writer, player, game_time)?;

    let start = maze.start();
    let exit = maze.exit();
    let params = [
        maze.rooms_x(),
        maze.rooms_y(),
        maze.seed() as i32,
        exit.x,
        exit.y,
        start.x,
        start.y,
    ];
    writer.seek(SeekFrom::Start(MAZE_PARAMS_OFFSET))?;
    for value in params {
        writer.write_all(&value.to_le_bytes())?;
    }

    writer.seek(SeekFrom::Start(CHUNKS_OFFSET))?;
    for chunk in maze.chunks() {
        writer.write_all(&chunk.to_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Rewrites the version, game time and player, leaving the maze untouched.
pub fn encode_incremental<W: Write + Seek>(
    writer: &mut W,
    player: PlayerParams,
    game_time: f32,
) -> Result<(), SaveError> {
    writer.seek(SeekFrom::Start(VERSION_OFFSET))?;
    writer.write_all(&CURRENT_VERSION)?;

    writer.seek(SeekFrom::Start(GAME_TIME_OFFSET))?;
    writer.write_all(&game_time.to_le_bytes())?;

    let [x, y, z] = player.position;
    writer.seek(SeekFrom::Start(PLAYER_OFFSET))?;
    for value in [x, y, z, player.pitch, player.yaw, player.roll] {
        writer.write_all(&value.to_le_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads a save written by [`encode_full`].
pub fn decode<R: Read + Seek>(reader: &mut R) -> Result<LoadedGame, SaveError> {
    reader.seek(SeekFrom::Start(VERSION_OFFSET))?;
    let version: [u8; 3] = read_array(reader, "version")?;
    if version[0] != CURRENT_VERSION[0] {
        return Err(SaveError::VersionMismatch {
            found: version,
            expected: CURRENT_VERSION,
        });
    }

    reader.seek(SeekFrom::Start(GAME_TIME_OFFSET))?;
    let game_time = f32::from_le_bytes(read_array(reader, "game time")?);

    reader.seek(SeekFrom::Start(PLAYER_OFFSET))?;
    let mut player = [0.0f32; 6];
    for value in &mut player {
        *value = f32::from_le_bytes(read_array(reader, "player")?);
    }
    let [x, y, z, pitch, yaw, roll] = player;
    let player = PlayerParams {
        position: [x, y, z],
        pitch,
        yaw,
        roll,
    };

    reader.seek(SeekFrom::Start(MAZE_PARAMS_OFFSET))?;
    let mut params = [0i32; 7];
    for value in &mut params {
        *value = i32::from_le_bytes(read_array(reader, "maze parameters")?);
    }
    let [w, h, seed, exit_x, exit_y, start_x, start_y] = params;

    // Validates the dimensions before anything is allocated for the chunks.
    let expected = Maze::new(w, h)?.chunk_count();
    reader.seek(SeekFrom::Start(CHUNKS_OFFSET))?;
    let mut chunks = Vec::with_capacity(expected.min(1024));
    for _ in 0..expected {
        let bytes: [u8; chunk::BYTES] = read_array(reader, "chunk data")?;
        chunks.push(Chunk::from_bytes(&bytes));
    }

    let start = Cell::new(start_x, start_y);
    let maze = Maze::restore(w, h, seed as u32, start, Cell::new(exit_x, exit_y), chunks)?;
    if !maze.in_bounds(start.x, start.y) {
        return Err(SaveError::Corrupt(format!(
            "start ({}, {}) lies outside the maze",
            start.x, start.y
        )));
    }

    Ok(LoadedGame {
        game_time,
        player,
        maze,
    })
}

/// Reads exactly `N` bytes, reporting a short read as corruption of `field`.
fn read_array<R: Read, const N: usize>(reader: &mut R, field: &str) -> Result<[u8; N], SaveError> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => SaveError::Corrupt(format!("truncated {}", field)),
        _ => SaveError::Io(e),
    })?;
    Ok(buf)
}
