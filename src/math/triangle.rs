//! Triangle primitive

use crate::core::types::Vec3;

/// Squared length of the edge cross product below which a triangle is
/// considered degenerate. The cross product length is twice the area, so
/// this rejects triangles below roughly 5e-7 area units: coincident
/// vertices exactly, near-collinear slivers approximately.
const DEGENERACY_THRESHOLD: f32 = 1e-12;

/// Triangle with ordered vertices. Winding is significant: it defines the
/// facing direction, and every operation deriving sub-triangles preserves it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub vertices: [Vec3; 3],
}

impl Triangle {
    /// Create a triangle from three vertices in winding order
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { vertices: [a, b, c] }
    }

    /// Cross product of the two edges leaving the first vertex.
    /// Points along the winding normal with length twice the area.
    pub fn edge_cross(&self) -> Vec3 {
        let [a, b, c] = self.vertices;
        (b - a).cross(c - a)
    }

    /// Unit normal defined by the winding order, zero for degenerate triangles
    pub fn normal(&self) -> Vec3 {
        self.edge_cross().normalize_or_zero()
    }

    /// Triangle area
    pub fn area(&self) -> f32 {
        0.5 * self.edge_cross().length()
    }

    /// True for triangles with (near-)zero area: coincident or collinear vertices
    pub fn is_degenerate(&self) -> bool {
        self.edge_cross().length_squared() < DEGENERACY_THRESHOLD
    }

    /// Translate all vertices by `offset`
    pub fn translate(&mut self, offset: Vec3) {
        for vertex in &mut self.vertices {
            *vertex += offset;
        }
    }
}
