//! Main renderer module.
//!
//! Rendering is split in two halves. A [`RenderStyle`] turns one maze chunk into
//! CPU geometry; the [`ChunkVisibilityCache`] decides which chunks are near the
//! camera and makes sure each of them is compiled at most once. The actual
//! drawing is left to whatever implements [`RenderSurface`], typically a thin
//! wrapper that uploads the vertex slices into GPU buffers.
//!
//! [`MazeRenderer`] ties one cache to one style and handles switching styles.

/// Concrete render styles.
pub mod styles;
/// Vertex layout and quad helpers.
pub mod vertex;

use self::vertex::Vertex;
use crate::math;
use crate::maze::Maze;
use log::{debug, info};

/// Largest number of chunks the visibility window can hold.
pub const MAX_VISIBLE_CHUNKS: usize = 16;

/// How far the window reaches from the camera, in half-chunks.
const WINDOW_REACH: i32 = 3;

/// Primitive topology of a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// Every three vertices form a triangle.
    Triangles,
    /// Every two vertices form a line segment.
    Lines,
}

/// Compiled geometry for one chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkMesh {
    /// How [`vertices`](Self::vertices) are assembled.
    pub topology: Topology,
    /// World-space vertices.
    pub vertices: Vec<Vertex>,
}

impl ChunkMesh {
    /// An empty mesh of the given topology.
    pub fn new(topology: Topology) -> Self {
        Self {
            topology,
            vertices: Vec::new(),
        }
    }

    /// Whether the mesh has no geometry.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Anything that can draw vertex lists.
pub trait RenderSurface {
    /// Draws `vertices` assembled as `topology`.
    fn draw(&mut self, topology: Topology, vertices: &[Vertex]);
}

/// A way of drawing the maze.
pub trait RenderStyle {
    /// Short human-readable name.
    fn name(&self) -> &'static str;

    /// Builds the geometry for the chunk at `chunk_id`.
    fn compile_chunk(&self, maze: &Maze, chunk_id: usize) -> ChunkMesh;

    /// Draws one compiled chunk.
    fn draw_chunk(&self, mesh: &ChunkMesh, surface: &mut dyn RenderSurface) {
        if !mesh.is_empty() {
            surface.draw(mesh.topology, &mesh.vertices);
        }
    }
}

/// Tracks which chunks surround the camera and their compiled meshes.
///
/// The window is recomputed only when the camera crosses into a new half-chunk.
/// Meshes are kept once built, even after their chunk leaves the window, and are
/// all dropped together by [`disable`](Self::disable).
#[derive(Debug, Default)]
pub struct ChunkVisibilityCache {
    visible: Vec<usize>,
    compiled: Vec<Option<ChunkMesh>>,
    last_half_chunk: Option<(i32, i32)>,
    enabled: bool,
    compile_count: usize,
}

impl ChunkVisibilityCache {
    /// A disabled cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates empty state sized for `maze`.
    pub fn enable(&mut self, maze: &Maze) {
        self.visible = Vec::with_capacity(MAX_VISIBLE_CHUNKS);
        self.compiled = (0..maze.chunk_count()).map(|_| None).collect();
        self.last_half_chunk = None;
        self.compile_count = 0;
        self.enabled = true;
    }

    /// Releases all state.
    pub fn disable(&mut self) {
        self.visible = Vec::new();
        self.compiled = Vec::new();
        self.last_half_chunk = None;
        self.enabled = false;
    }

    /// Whether [`enable`](Self::enable) has been called since the last disable.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Chunk ids in the current window.
    pub fn visible(&self) -> &[usize] {
        &self.visible
    }

    /// Compiled mesh for `chunk_id`, if it has been built.
    pub fn mesh(&self, chunk_id: usize) -> Option<&ChunkMesh> {
        self.compiled.get(chunk_id).and_then(Option::as_ref)
    }

    /// Chunks compiled since the last enable.
    pub fn compile_count(&self) -> usize {
        self.compile_count
    }

    /// Updates the window for a camera at world `(x, z)`.
    ///
    /// Returns `true` when the window was rebuilt.
    pub fn tick(&mut self, maze: &Maze, style: &dyn RenderStyle, x: f32, z: f32) -> bool {
        if !self.enabled {
            return false;
        }

        let half = math::half_chunk(x, z);
        if self.last_half_chunk == Some(half) {
            return false;
        }
        self.last_half_chunk = Some(half);

        self.visible.clear();
        let columns = window(half.0, maze.chunks_x());
        let rows = window(half.1, maze.chunks_y());
        for cy in rows {
            for cx in columns.clone() {
                self.visible.push(cy * maze.chunks_x() + cx);
            }
        }

        let mut compiled = 0;
        for &chunk_id in &self.visible {
            let Some(slot) = self.compiled.get_mut(chunk_id) else {
                continue;
            };
            if slot.is_none() {
                *slot = Some(style.compile_chunk(maze, chunk_id));
                compiled += 1;
            }
        }
        self.compile_count += compiled;

        debug!(
            "Chunk window at half-chunk {:?}: {} visible, {} compiled",
            half,
            self.visible.len(),
            compiled
        );
        true
    }

    /// Draws every visible compiled chunk.
    pub fn render(&self, style: &dyn RenderStyle, surface: &mut dyn RenderSurface) {
        for &chunk_id in &self.visible {
            if let Some(mesh) = self.mesh(chunk_id) {
                style.draw_chunk(mesh, surface);
            }
        }
    }
}

/// Chunk indices along one axis covering half-chunks `[h - 3, h + 3]`.
fn window(half: i32, chunks: usize) -> std::ops::Range<usize> {
    let last = chunks as i32 - 1;
    let lo = (half - WINDOW_REACH).div_euclid(2).max(0);
    let hi = (half + WINDOW_REACH).div_euclid(2).min(last);
    if hi < lo {
        return 0..0;
    }
    lo as usize..hi as usize + 1
}

/// One chunk cache driven by one render style.
pub struct MazeRenderer {
    cache: ChunkVisibilityCache,
    style: Box<dyn RenderStyle>,
}

impl MazeRenderer {
    /// Creates a renderer for `maze` drawing with `style`.
    pub fn new(maze: &Maze, style: Box<dyn RenderStyle>) -> Self {
        let mut cache = ChunkVisibilityCache::new();
        cache.enable(maze);
        Self { cache, style }
    }

    /// The active style.
    pub fn style(&self) -> &dyn RenderStyle {
        self.style.as_ref()
    }

    /// The chunk cache.
    pub fn cache(&self) -> &ChunkVisibilityCache {
        &self.cache
    }

    /// Replaces the style, discarding everything compiled by the old one.
    pub fn set_style(&mut self, maze: &Maze, style: Box<dyn RenderStyle>) {
        self.cache.disable();
        self.style = style;
        self.cache.enable(maze);
        info!("Render style: {}", self.style.name());
    }

    /// Switches to the style after the current one in [`styles::NAMES`].
    pub fn cycle_style(&mut self, maze: &Maze) {
        let next = styles::next_after(self.style.name());
        self.set_style(maze, next);
    }

    /// Updates visibility for the camera and draws the visible chunks.
    pub fn frame(&mut self, maze: &Maze, x: f32, z: f32, surface: &mut dyn RenderSurface) {
        self.cache.tick(maze, self.style.as_ref(), x, z);
        self.cache.render(self.style.as_ref(), surface);
    }
}
