//! Exact triangle splitting against axis-aligned planes
//!
//! Partitions the triangles of one store across the plane at coordinate 0
//! on a chosen axis. Triangles straddling the plane are cut into
//! sub-triangles that tile the original exactly, preserving winding, so no
//! area is lost and no gaps open. Each output store is then re-centered on
//! its own half cell, which lets the subdivision recursion split against a
//! fixed plane at every level instead of threading absolute offsets.
//!
//! Comparisons against the plane are exact, no epsilon. A triangle lying
//! entirely in the plane goes to the plus side; that tie-break is
//! deterministic and relied on by the builder tests.

use crate::core::types::{Result, Vec3};
use crate::math::triangle::Triangle;

use super::store::TriangleStore;

/// Splitting axis selector
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Component index into a Vec3
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The selected component of `v`
    pub fn component(self, v: Vec3) -> f32 {
        v[self.index()]
    }

    /// Unit vector along the axis
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }
}

/// Split every triangle in `store` against the plane `axis == 0`.
///
/// Returns the positive-side and negative-side stores. Triangles entirely
/// on or above the plane copy to the plus store, entirely on or below to
/// the minus store (the plus test runs first, so on-plane triangles land
/// plus-side), and straddling triangles are cut. Afterwards the plus store
/// is translated by `-offset` along the axis and the minus store by
/// `+offset`, re-centering each on its half cell.
///
/// Both output stores are created with capacity hint `hint` and stay
/// unallocated when nothing lands in them.
pub fn split(
    store: &TriangleStore,
    axis: Axis,
    offset: f32,
    hint: usize,
) -> Result<(TriangleStore, TriangleStore)> {
    let mut plus = TriangleStore::with_hint(hint);
    let mut minus = TriangleStore::with_hint(hint);

    for triangle in store.iter() {
        let [a, b, c] = triangle.vertices;
        let fa = axis.component(a);
        let fb = axis.component(b);
        let fc = axis.component(c);

        if fa >= 0.0 && fb >= 0.0 && fc >= 0.0 {
            plus.push(*triangle)?;
        } else if fa <= 0.0 && fb <= 0.0 && fc <= 0.0 {
            minus.push(*triangle)?;
        } else {
            split_straddling(triangle, axis, &mut plus, &mut minus)?;
        }
    }

    plus.translate(axis.unit() * -offset);
    minus.translate(axis.unit() * offset);
    Ok((plus, minus))
}

/// Cut one triangle known to have vertices on both strict sides of the
/// plane. Rotates the vertices so the distinguished one comes first: the
/// on-plane vertex when a coordinate is exactly zero, otherwise the lone
/// vertex whose sign differs from the other two.
fn split_straddling(
    triangle: &Triangle,
    axis: Axis,
    plus: &mut TriangleStore,
    minus: &mut TriangleStore,
) -> Result<()> {
    let [a, b, c] = triangle.vertices;
    let fa = axis.component(a);
    let fb = axis.component(b);
    let fc = axis.component(c);

    if fa == 0.0 {
        split_on_vertex(a, b, c, fb, fc, axis, plus, minus)
    } else if fb == 0.0 {
        split_on_vertex(b, c, a, fc, fa, axis, plus, minus)
    } else if fc == 0.0 {
        split_on_vertex(c, a, b, fa, fb, axis, plus, minus)
    } else if (fb > 0.0) == (fc > 0.0) {
        split_lone_vertex(a, b, c, fa, fb, fc, axis, plus, minus)
    } else if (fc > 0.0) == (fa > 0.0) {
        split_lone_vertex(b, c, a, fb, fc, fa, axis, plus, minus)
    } else {
        split_lone_vertex(c, a, b, fc, fa, fb, axis, plus, minus)
    }
}

/// Crossing point of edge (p, q) with the plane, where `fp` and `fq` are
/// the endpoint coordinates on the axis and have strictly opposite signs.
/// The axis coordinate of the result is exactly zero.
fn crossing(p: Vec3, q: Vec3, fp: f32, fq: f32, axis: Axis) -> Vec3 {
    let t = fp / (fp - fq);
    let mut point = p + (q - p) * t;
    point[axis.index()] = 0.0;
    point
}

/// One vertex exactly on the plane, the other two strictly astride it.
/// Fans two triangles from the on-plane vertex `v0`, each routed by the
/// sign of its far vertex. `(v1, v2)` is the crossing edge.
#[allow(clippy::too_many_arguments)]
fn split_on_vertex(
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    f1: f32,
    f2: f32,
    axis: Axis,
    plus: &mut TriangleStore,
    minus: &mut TriangleStore,
) -> Result<()> {
    let p = crossing(v1, v2, f1, f2, axis);
    let near = Triangle::new(v0, v1, p);
    let far = Triangle::new(v0, p, v2);
    if f1 > 0.0 {
        plus.push(near)?;
        minus.push(far)?;
    } else {
        minus.push(near)?;
        plus.push(far)?;
    }
    Ok(())
}

/// No vertex on the plane; `v0` sits alone on its side of it. One triangle
/// covers the lone side, two tile the quad left on the majority side. All
/// three keep the parent's winding.
#[allow(clippy::too_many_arguments)]
fn split_lone_vertex(
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    f0: f32,
    f1: f32,
    f2: f32,
    axis: Axis,
    plus: &mut TriangleStore,
    minus: &mut TriangleStore,
) -> Result<()> {
    let p01 = crossing(v0, v1, f0, f1, axis);
    let p20 = crossing(v2, v0, f2, f0, axis);
    let lone = Triangle::new(v0, p01, p20);
    let major_a = Triangle::new(p01, v1, v2);
    let major_b = Triangle::new(p01, v2, p20);
    if f0 > 0.0 {
        plus.push(lone)?;
        minus.push(major_a)?;
        minus.push(major_b)?;
    } else {
        minus.push(lone)?;
        plus.push(major_a)?;
        plus.push(major_b)?;
    }
    Ok(())
}
