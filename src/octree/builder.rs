//! Recursive subdivision of triangle soup into octree node events

use crate::core::types::{Result, Vec3};
use crate::math::aabb::Aabb;
use crate::math::triangle::Triangle;

use super::clip::{Axis, split};
use super::config::BuildConfig;
use super::store::TriangleStore;
use super::writer::TreeWriter;

/// Capacity hint for the root store
const ROOT_STORE_HINT: usize = 1024;

/// Smallest capacity hint handed to transient child stores
const MIN_CHILD_HINT: usize = 16;

/// Builds a sparse collision octree from a triangle-soup mesh.
///
/// Triangles are accumulated with [`add_triangle`](Self::add_triangle) or
/// [`add_mesh`](Self::add_mesh), then [`build`](Self::build) subdivides
/// the mesh and streams the finished tree to a [`TreeWriter`] in pre-order.
/// Each cell the recursion visits is a cube in its own local frame,
/// centered on the origin, so every split happens against a coordinate
/// plane and child triangles are re-centered as they are cut.
pub struct OctreeBuilder {
    config: BuildConfig,
    /// Full mesh in the root cell's frame
    root: TriangleStore,
    /// Degenerate input triangles rejected so far
    dropped: usize,
}

impl OctreeBuilder {
    /// Create a builder with the given configuration
    pub fn new(config: BuildConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            root: TriangleStore::with_hint(ROOT_STORE_HINT),
            dropped: 0,
        })
    }

    /// Append one triangle; returns whether it was stored.
    ///
    /// Degenerate triangles (coincident or collinear vertices) are counted
    /// and dropped. They carry no area, so they cannot affect which cells
    /// are occupied.
    pub fn add_triangle(&mut self, triangle: Triangle) -> Result<bool> {
        let stored = self.root.push_filtered(triangle)?;
        if !stored {
            self.dropped += 1;
        }
        Ok(stored)
    }

    /// Append every triangle in `triangles`, dropping degenerate ones
    pub fn add_mesh<I: IntoIterator<Item = Triangle>>(&mut self, triangles: I) -> Result<()> {
        for triangle in triangles {
            self.add_triangle(triangle)?;
        }
        Ok(())
    }

    /// Number of triangles accepted so far
    pub fn triangle_count(&self) -> usize {
        self.root.len()
    }

    /// Number of degenerate triangles rejected so far
    pub fn dropped_count(&self) -> usize {
        self.dropped
    }

    /// Half edge length of the root cell for the current mesh: the largest
    /// absolute vertex coordinate on any axis, padded by half a unit.
    /// Exactly 0.5 for an empty mesh.
    pub fn root_radius(&self) -> f32 {
        let furthest = Aabb::from_points(self.root.iter().flat_map(|tri| tri.vertices))
            .map(|bounds| bounds.max_abs_coord())
            .unwrap_or(0.0);
        0.5 + furthest
    }

    /// Subdivide the mesh down to at most `depth` levels below the root,
    /// streaming node events to `writer`, and return the finalized tree.
    ///
    /// The builder is only borrowed, so the same mesh can be rebuilt at a
    /// different depth or into a different writer.
    pub fn build<W: TreeWriter>(&self, depth: u32, mut writer: W) -> Result<W::Tree> {
        let start = std::time::Instant::now();
        let radius = self.root_radius();
        self.subdivide(&self.root, radius, depth, &mut writer)?;
        log::info!(
            "Subdivided {} triangles ({} degenerate dropped) to depth {} at radius {:.2} in {:.2}s",
            self.root.len(),
            self.dropped,
            depth,
            radius,
            start.elapsed().as_secs_f64()
        );
        Ok(writer.finalize(radius))
    }

    /// Emit the subtree for one cell.
    ///
    /// `store` holds the cell's triangles in the cell's local frame and
    /// `radius` its half edge length. Terminal cells emit a single leaf
    /// event; mixed cells are cut into 8 octants and recursed in octant
    /// index order.
    fn subdivide<W: TreeWriter>(
        &self,
        store: &TriangleStore,
        radius: f32,
        depth: u32,
        writer: &mut W,
    ) -> Result<()> {
        if store.is_empty() {
            writer.write_empty();
            return Ok(());
        }
        // Any occupied cell at the resolution floor counts as solid.
        if radius <= self.config.min_cell_radius || depth == 0 {
            writer.write_solid();
            return Ok(());
        }
        if self.config.solid_fast_path
            && cell_inside_convex_set(store, radius, self.config.convexity_tolerance)
        {
            log::trace!("convex fast path marked cell solid at radius {:.3}", radius);
            writer.write_solid();
            return Ok(());
        }

        let offset = radius / 2.0;
        let hint = (store.len() * 2).max(MIN_CHILD_HINT);
        let octants = split_octants(store, offset, hint)?;

        writer.begin_inner();
        for octant in &octants {
            self.subdivide(octant, offset, depth - 1, writer)?;
        }
        writer.end_inner();
        Ok(())
    }
}

/// Cut a mixed cell's triangles into its 8 octant stores, each re-centered
/// on its own sub-cell.
///
/// Octants are indexed `x | y << 1 | z << 2` with a set bit meaning the
/// positive half of that axis. The cut runs Z, then Y, then X; halves that
/// come up empty are not split further, their octants stay unallocated.
fn split_octants(store: &TriangleStore, offset: f32, hint: usize) -> Result<[TriangleStore; 8]> {
    let (plus_z, minus_z) = split(store, Axis::Z, offset, hint)?;
    let [o0, o1, o2, o3] = split_quadrants(&minus_z, offset, hint)?;
    let [o4, o5, o6, o7] = split_quadrants(&plus_z, offset, hint)?;
    Ok([o0, o1, o2, o3, o4, o5, o6, o7])
}

/// Cut one Z half into its 4 quadrants, indexed `x | y << 1`
fn split_quadrants(half: &TriangleStore, offset: f32, hint: usize) -> Result<[TriangleStore; 4]> {
    if half.is_empty() {
        return Ok(std::array::from_fn(|_| TriangleStore::with_hint(hint)));
    }
    let (plus_y, minus_y) = split(half, Axis::Y, offset, hint)?;
    let [q0, q1] = split_pair(&minus_y, offset, hint)?;
    let [q2, q3] = split_pair(&plus_y, offset, hint)?;
    Ok([q0, q1, q2, q3])
}

/// Cut one quadrant into its minus-X and plus-X octants, in that order
fn split_pair(quadrant: &TriangleStore, offset: f32, hint: usize) -> Result<[TriangleStore; 2]> {
    if quadrant.is_empty() {
        return Ok(std::array::from_fn(|_| TriangleStore::with_hint(hint)));
    }
    let (plus_x, minus_x) = split(quadrant, Axis::X, offset, hint)?;
    Ok([minus_x, plus_x])
}

/// True when the cell of half-extent `radius` around the local origin lies
/// inside the convex volume the store's triangle planes enclose.
///
/// Holds only for mutually convex triangle sets (no vertex of any triangle
/// behind any other triangle's plane) whose normals face the cell, with
/// every cell corner on or in front of every plane. Distances are measured
/// against unnormalized edge-cross normals, so `tolerance` scales with
/// triangle size.
fn cell_inside_convex_set(store: &TriangleStore, radius: f32, tolerance: f32) -> bool {
    let corners = Aabb::from_center_half_extent(Vec3::ZERO, Vec3::splat(radius)).corners();
    for plane in store.iter() {
        let origin = plane.vertices[0];
        let normal = plane.edge_cross();
        let in_front = |point: Vec3| (point - origin).dot(normal) >= -tolerance;
        for other in store.iter() {
            if !other.vertices.into_iter().all(|v| in_front(v)) {
                return false;
            }
        }
        if !corners.into_iter().all(|c| in_front(c)) {
            return false;
        }
    }
    true
}

/// Generate the 12 triangles of an axis-aligned cube centered on the
/// origin, wound so every normal faces outward.
pub fn create_test_box(half_extent: f32) -> Vec<Triangle> {
    let h = half_extent;
    let quads = [
        // +X, -X
        [
            Vec3::new(h, -h, -h),
            Vec3::new(h, h, -h),
            Vec3::new(h, h, h),
            Vec3::new(h, -h, h),
        ],
        [
            Vec3::new(-h, -h, -h),
            Vec3::new(-h, -h, h),
            Vec3::new(-h, h, h),
            Vec3::new(-h, h, -h),
        ],
        // +Y, -Y
        [
            Vec3::new(-h, h, -h),
            Vec3::new(-h, h, h),
            Vec3::new(h, h, h),
            Vec3::new(h, h, -h),
        ],
        [
            Vec3::new(-h, -h, -h),
            Vec3::new(h, -h, -h),
            Vec3::new(h, -h, h),
            Vec3::new(-h, -h, h),
        ],
        // +Z, -Z
        [
            Vec3::new(-h, -h, h),
            Vec3::new(h, -h, h),
            Vec3::new(h, h, h),
            Vec3::new(-h, h, h),
        ],
        [
            Vec3::new(-h, -h, -h),
            Vec3::new(-h, h, -h),
            Vec3::new(h, h, -h),
            Vec3::new(h, -h, -h),
        ],
    ];

    let mut triangles = Vec::with_capacity(12);
    for [a, b, c, d] in quads {
        triangles.push(Triangle::new(a, b, c));
        triangles.push(Triangle::new(a, c, d));
    }
    triangles
}

/// Generate a rolling heightfield mesh: `resolution` quads per side over
/// ±`extent` on X and Z, wound so every normal faces up.
pub fn create_test_terrain(resolution: usize, extent: f32) -> Vec<Triangle> {
    assert!(resolution > 0, "resolution must be positive");
    let step = extent * 2.0 / resolution as f32;
    let height = |x: f32, z: f32| (x * 0.6).sin() * (z * 0.45).cos() * extent * 0.2;

    let mut triangles = Vec::with_capacity(resolution * resolution * 2);
    for iz in 0..resolution {
        for ix in 0..resolution {
            let x0 = -extent + ix as f32 * step;
            let z0 = -extent + iz as f32 * step;
            let (x1, z1) = (x0 + step, z0 + step);
            let p00 = Vec3::new(x0, height(x0, z0), z0);
            let p10 = Vec3::new(x1, height(x1, z0), z0);
            let p01 = Vec3::new(x0, height(x0, z1), z1);
            let p11 = Vec3::new(x1, height(x1, z1), z1);
            triangles.push(Triangle::new(p00, p01, p10));
            triangles.push(Triangle::new(p10, p01, p11));
        }
    }
    triangles
}
