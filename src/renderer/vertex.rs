//! Vertex definitions and geometry helpers for chunk meshes.
//!
//! This module provides the [`Vertex`] struct that every render style emits, plus
//! helpers that build the quads and edges the styles assemble chunk meshes from.
//! Vertices are plain old data so a GPU collaborator can upload a mesh with
//! [`bytemuck::cast_slice`] without copying.

/// A single vertex in world space.
///
/// `x` follows maze columns, `y` is elevation and `z` follows maze rows.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in world space.
    pub position: [f32; 3],
    /// RGBA color.
    pub color: [u8; 4],
    /// Material index; see the `MATERIAL_*` constants.
    pub material: u32,
}

/// Material id for floor geometry.
pub const MATERIAL_FLOOR: u32 = 0;
/// Material id for wall geometry.
pub const MATERIAL_WALL: u32 = 1;
/// Material id for the exit marker.
pub const MATERIAL_EXIT: u32 = 2;

/// Height of a wall, in world units.
pub const WALL_HEIGHT: f32 = 1.0;

/// Wall color.
pub const WALL_COLOR: [u8; 4] = [107, 55, 55, 255];
/// Wall top color.
pub const WALL_TOP_COLOR: [u8; 4] = [140, 80, 80, 255];
/// Floor color.
pub const FLOOR_COLOR: [u8; 4] = [100, 120, 180, 255];
/// Exit color.
pub const EXIT_COLOR: [u8; 4] = [80, 200, 120, 255];

impl Vertex {
    /// Creates a vertex.
    pub const fn new(position: [f32; 3], color: [u8; 4], material: u32) -> Self {
        Self {
            position,
            color,
            material,
        }
    }

    /// Size of one vertex in bytes, as seen by a vertex buffer.
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
}

/// Two triangles covering the quad `a b c d`, wound in that order.
pub fn quad(corners: [[f32; 3]; 4], color: [u8; 4], material: u32) -> [Vertex; 6] {
    let [a, b, c, d] = corners.map(|p| Vertex::new(p, color, material));
    [a, b, c, a, c, d]
}

/// The four edges of the quad `a b c d` as a line list.
pub fn quad_outline(corners: [[f32; 3]; 4], color: [u8; 4], material: u32) -> [Vertex; 8] {
    let [a, b, c, d] = corners.map(|p| Vertex::new(p, color, material));
    [a, b, b, c, c, d, d, a]
}

/// Corners of a wall face facing along z, spanning `x..x + 1` at depth `z`.
pub fn z_facing_wall(x: f32, z: f32) -> [[f32; 3]; 4] {
    [
        [x, 0.0, z],
        [x + 1.0, 0.0, z],
        [x + 1.0, WALL_HEIGHT, z],
        [x, WALL_HEIGHT, z],
    ]
}

/// Corners of a wall face facing along x, spanning `z..z + 1` at `x`.
pub fn x_facing_wall(x: f32, z: f32) -> [[f32; 3]; 4] {
    [
        [x, 0.0, z],
        [x, 0.0, z + 1.0],
        [x, WALL_HEIGHT, z + 1.0],
        [x, WALL_HEIGHT, z],
    ]
}

/// Corners of the horizontal unit square of cell `(x, z)` at elevation `y`.
pub fn horizontal_square(x: f32, y: f32, z: f32) -> [[f32; 3]; 4] {
    [
        [x, y, z],
        [x + 1.0, y, z],
        [x + 1.0, y, z + 1.0],
        [x, y, z + 1.0],
    ]
}
