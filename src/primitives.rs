use super::mesh::Vertex;

pub const TRIANGLE_VERTICES: &[Vertex] = &[
    Vertex::new(glam::Vec3::new(-0.5, -0.5, 0.0), glam::Vec3::new(1.0, 0.0, 0.0)),
    Vertex::new(glam::Vec3::new(0.5, -0.5, 0.0), glam::Vec3::new(0.0, 1.0, 0.0)),
    Vertex::new(glam::Vec3::new(0.0, 0.5, 0.0), glam::Vec3::new(0.0, 0.0, 1.0)),
];

pub const CUBE_VERTICES: &[Vertex] = &[
    Vertex::new(glam::Vec3::new(0.5, 0.5, 0.5), glam::Vec3::new(1.0, 0.0, 0.0)),
    Vertex::new(glam::Vec3::new(-0.5, 0.5, 0.5), glam::Vec3::new(0.0, 0.0, 1.0)),
    Vertex::new(glam::Vec3::new(0.5, -0.5, 0.5), glam::Vec3::new(1.0, 1.0, 0.0)),
    Vertex::new(glam::Vec3::new(-0.5, -0.5, 0.5), glam::Vec3::new(0.0, 1.0, 1.0)),
    Vertex::new(glam::Vec3::new(0.5, 0.5, -0.5), glam::Vec3::new(1.0, 0.0, 1.0)),
    Vertex::new(glam::Vec3::new(-0.5, 0.5, -0.5), glam::Vec3::new(0.0, 1.0, 0.0)),
    Vertex::new(glam::Vec3::new(0.5, -0.5, -0.5), glam::Vec3::new(1.0, 1.0, 1.0)),
    Vertex::new(glam::Vec3::new(-0.5, -0.5, -0.5), glam::Vec3::new(0.3, 0.3, 0.3)),
];

#[rustfmt::skip]
pub const CUBE_INDICES : &[u16] = &[
    // Front
    0, 1, 3,
    0, 3, 2,
    // Back
    5, 4, 6,
    5, 6, 7,
    // Left
    1, 5, 7,
    1, 7, 3,
    // Right
    4, 0, 2,
    4, 2, 6,
    // Top
    4, 5, 1,
    4, 1, 0,
    // Bottom
    7, 6, 2,
    7, 2, 3,
];

/// Line-list vertices of a square grid in the XZ plane, centred on the origin.
///
/// `half_extent` lines are placed on each side of the centre line, in both
/// directions, `spacing` apart.
pub fn grid_lines(half_extent: u32, spacing: f32) -> Vec<Vertex> {
    let n = half_extent as i32;
    let far = n as f32 * spacing;
    let white = glam::Vec3::ONE;
    let mut vertices = Vec::with_capacity(((2 * n + 1) * 4) as usize);
    for i in -n..=n {
        let offset = i as f32 * spacing;
        // along X
        vertices.push(Vertex::new(glam::Vec3::new(-far, 0.0, offset), white));
        vertices.push(Vertex::new(glam::Vec3::new(far, 0.0, offset), white));
        // along Z
        vertices.push(Vertex::new(glam::Vec3::new(offset, 0.0, -far), white));
        vertices.push(Vertex::new(glam::Vec3::new(offset, 0.0, far), white));
    }
    vertices
}
