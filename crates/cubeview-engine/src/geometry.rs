//! Static cube mesh.
//!
//! Six planar quad faces, each stored as four corners so that every face can
//! carry its own flat color. Face order is shared by positions, colors and
//! indices: front, back, top, bottom, right, left.

/// Number of faces on the cube.
pub const FACE_COUNT: usize = 6;

/// Corners stored per face.
pub const VERTICES_PER_FACE: usize = 4;

/// Total vertex count (positions and expanded colors).
pub const VERTEX_COUNT: usize = FACE_COUNT * VERTICES_PER_FACE;

/// Total index count: two triangles per face.
pub const INDEX_COUNT: usize = FACE_COUNT * 2 * 3;

/// Returns the 24 vertex positions, four per face, in `[-1, 1]`.
pub const fn cube_positions() -> [[f32; 3]; VERTEX_COUNT] {
    [
        // front
        [-1.0, -1.0, 1.0],
        [1.0, -1.0, 1.0],
        [1.0, 1.0, 1.0],
        [-1.0, 1.0, 1.0],
        // back
        [-1.0, -1.0, -1.0],
        [-1.0, 1.0, -1.0],
        [1.0, 1.0, -1.0],
        [1.0, -1.0, -1.0],
        // top
        [-1.0, 1.0, -1.0],
        [-1.0, 1.0, 1.0],
        [1.0, 1.0, 1.0],
        [1.0, 1.0, -1.0],
        // bottom
        [-1.0, -1.0, -1.0],
        [1.0, -1.0, -1.0],
        [1.0, -1.0, 1.0],
        [-1.0, -1.0, 1.0],
        // right
        [1.0, -1.0, -1.0],
        [1.0, 1.0, -1.0],
        [1.0, 1.0, 1.0],
        [1.0, -1.0, 1.0],
        // left
        [-1.0, -1.0, -1.0],
        [-1.0, -1.0, 1.0],
        [-1.0, 1.0, 1.0],
        [-1.0, 1.0, -1.0],
    ]
}

const fn srgb(r: u8, g: u8, b: u8) -> [f32; 4] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

/// Returns one opaque RGBA color per face, normalized to `[0, 1]`.
pub const fn cube_colors() -> [[f32; 4]; FACE_COUNT] {
    [
        srgb(0xa3, 0x49, 0xa4), // purple
        srgb(0xff, 0xf2, 0x00), // yellow
        srgb(0xed, 0x1c, 0x24), // red
        srgb(0x3f, 0x48, 0xcc), // blue
        srgb(0xff, 0x7f, 0x27), // orange
        srgb(0x22, 0xb1, 0x4c), // green
    ]
}

/// Returns the 36 triangle indices.
///
/// Every face uses the same fan `[0, 1, 2, 0, 2, 3]` offset by its first
/// vertex, so winding is consistent across faces.
pub const fn cube_indices() -> [u16; INDEX_COUNT] {
    let mut out = [0u16; INDEX_COUNT];
    let mut face = 0;
    while face < FACE_COUNT {
        let base = (face * VERTICES_PER_FACE) as u16;
        let i = face * 6;
        out[i] = base;
        out[i + 1] = base + 1;
        out[i + 2] = base + 2;
        out[i + 3] = base;
        out[i + 4] = base + 2;
        out[i + 5] = base + 3;
        face += 1;
    }
    out
}

/// Broadcasts each face color to the four vertices of that face.
pub fn expand_face_colors_to_vertices(colors: &[[f32; 4]]) -> Vec<[f32; 4]> {
    colors
        .iter()
        .flat_map(|c| std::iter::repeat_n(*c, VERTICES_PER_FACE))
        .collect()
}
