//! The built-in render styles.
//!
//! - [`SolidWalls`]: shaded wall faces and wall tops, for first-person play
//! - [`Wireframe`]: edges of the same wall faces
//! - [`GlassWalls`]: the solid wall faces, translucent and without tops
//! - [`FloorPlan`]: flat squares for every open cell, for a top-down map

use super::vertex::{
    self, EXIT_COLOR, FLOOR_COLOR, MATERIAL_EXIT, MATERIAL_FLOOR, MATERIAL_WALL, WALL_COLOR,
    WALL_HEIGHT, WALL_TOP_COLOR,
};
use super::{ChunkMesh, RenderStyle, Topology};
use crate::maze::{chunk, Cell, Maze};

/// Style names in cycling order.
pub const NAMES: [&str; 4] = [
    SolidWalls::NAME,
    Wireframe::NAME,
    GlassWalls::NAME,
    FloorPlan::NAME,
];

/// Builds the style called `name`.
pub fn by_name(name: &str) -> Option<Box<dyn RenderStyle>> {
    match name {
        SolidWalls::NAME => Some(Box::new(SolidWalls)),
        Wireframe::NAME => Some(Box::new(Wireframe)),
        GlassWalls::NAME => Some(Box::new(GlassWalls)),
        FloorPlan::NAME => Some(Box::new(FloorPlan)),
        _ => None,
    }
}

/// The style following `name` in [`NAMES`], wrapping around.
pub fn next_after(name: &str) -> Box<dyn RenderStyle> {
    let index = NAMES.iter().position(|n| *n == name).map_or(0, |i| i + 1);
    by_name(NAMES[index % NAMES.len()]).unwrap_or_else(|| Box::new(SolidWalls))
}

/// Every in-bounds cell of chunk `chunk_id`.
fn chunk_cells(maze: &Maze, chunk_id: usize) -> impl Iterator<Item = Cell> + '_ {
    let in_grid = chunk_id < maze.chunk_count();
    let (cx, cy) = maze.chunk_coords(chunk_id);
    let x0 = (cx * chunk::SIZE) as i32;
    let y0 = (cy * chunk::SIZE) as i32;
    let size = if in_grid { chunk::SIZE as i32 } else { 0 };

    (y0..y0 + size)
        .flat_map(move |y| (x0..x0 + size).map(move |x| Cell::new(x, y)))
        .filter(move |cell| maze.in_bounds(cell.x, cell.y))
}

/// Corners of every wall face of `cell` that borders an open cell.
fn wall_faces(maze: &Maze, cell: Cell) -> impl Iterator<Item = [[f32; 3]; 4]> {
    let (x, z) = (cell.x as f32, cell.y as f32);
    let faces = [
        (maze.get_opened(cell.x, cell.y - 1), vertex::z_facing_wall(x, z)),
        (maze.get_opened(cell.x, cell.y + 1), vertex::z_facing_wall(x, z + 1.0)),
        (maze.get_opened(cell.x - 1, cell.y), vertex::x_facing_wall(x, z)),
        (maze.get_opened(cell.x + 1, cell.y), vertex::x_facing_wall(x + 1.0, z)),
    ];
    faces
        .into_iter()
        .filter_map(|(exposed, corners)| exposed.then_some(corners))
}

/// Triangles for the exposed faces of every closed cell, plus its top if `top` is set.
fn wall_mesh(maze: &Maze, chunk_id: usize, color: [u8; 4], top: Option<[u8; 4]>) -> ChunkMesh {
    let mut mesh = ChunkMesh::new(Topology::Triangles);
    for cell in chunk_cells(maze, chunk_id) {
        if maze.get_opened(cell.x, cell.y) {
            continue;
        }
        for corners in wall_faces(maze, cell) {
            mesh.vertices.extend(vertex::quad(corners, color, MATERIAL_WALL));
        }
        if let Some(top_color) = top {
            let square = vertex::horizontal_square(cell.x as f32, WALL_HEIGHT, cell.y as f32);
            mesh.vertices.extend(vertex::quad(square, top_color, MATERIAL_WALL));
        }
    }
    mesh
}

/// Closed cells drawn as solid blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolidWalls;

impl SolidWalls {
    const NAME: &'static str = "solid";
}

impl RenderStyle for SolidWalls {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn compile_chunk(&self, maze: &Maze, chunk_id: usize) -> ChunkMesh {
        wall_mesh(maze, chunk_id, WALL_COLOR, Some(WALL_TOP_COLOR))
    }
}

/// Outlines of the exposed wall faces.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wireframe;

impl Wireframe {
    const NAME: &'static str = "wireframe";
}

impl RenderStyle for Wireframe {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn compile_chunk(&self, maze: &Maze, chunk_id: usize) -> ChunkMesh {
        let mut mesh = ChunkMesh::new(Topology::Lines);
        for cell in chunk_cells(maze, chunk_id) {
            if maze.get_opened(cell.x, cell.y) {
                continue;
            }
            for corners in wall_faces(maze, cell) {
                mesh.vertices.extend(vertex::quad_outline(corners, WALL_COLOR, MATERIAL_WALL));
            }
        }
        mesh
    }
}

/// See-through walls, for spotting the exit from inside the maze.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlassWalls;

impl GlassWalls {
    const NAME: &'static str = "glass";
    const ALPHA: u8 = 96;
}

impl RenderStyle for GlassWalls {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn compile_chunk(&self, maze: &Maze, chunk_id: usize) -> ChunkMesh {
        let [r, g, b, _] = WALL_COLOR;
        wall_mesh(maze, chunk_id, [r, g, b, Self::ALPHA], None)
    }
}

/// Open cells as floor tiles; the exit is highlighted.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloorPlan;

impl FloorPlan {
    const NAME: &'static str = "floor-plan";
}

impl RenderStyle for FloorPlan {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn compile_chunk(&self, maze: &Maze, chunk_id: usize) -> ChunkMesh {
        let mut mesh = ChunkMesh::new(Topology::Triangles);
        for cell in chunk_cells(maze, chunk_id) {
            if !maze.get_opened(cell.x, cell.y) {
                continue;
            }
            let (color, material) = if cell == maze.exit() {
                (EXIT_COLOR, MATERIAL_EXIT)
            } else {
                (FLOOR_COLOR, MATERIAL_FLOOR)
            };
            let square = vertex::horizontal_square(cell.x as f32, 0.0, cell.y as f32);
            mesh.vertices.extend(vertex::quad(square, color, material));
        }
        mesh
    }
}
