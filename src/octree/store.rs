//! Transient triangle storage for subdivision cells

use crate::core::types::{Result, Vec3};
use crate::math::triangle::Triangle;

/// Append-only triangle storage for one subdivision cell.
///
/// Allocation is two-phase: a fresh store only records its capacity hint
/// and allocates on the first push, so the many all-empty stores produced
/// while subdividing sparse regions never touch the allocator. Once
/// allocated, capacity grows to `1 + 2x` the current capacity and never
/// shrinks for the lifetime of the store.
///
/// A store is exclusively owned by the activation that created it; Rust
/// ownership makes sharing and use-after-release unrepresentable, and drop
/// is the release operation.
#[derive(Debug)]
pub struct TriangleStore {
    triangles: Vec<Triangle>,
    /// Capacity reserved by the first push. Ignored once allocated.
    hint: usize,
}

impl TriangleStore {
    /// Create an unallocated store that will reserve `hint` slots on the
    /// first push.
    ///
    /// Panics if `hint` is zero.
    pub fn with_hint(hint: usize) -> Self {
        assert!(hint > 0, "capacity hint must be positive");
        Self {
            triangles: Vec::new(),
            hint,
        }
    }

    /// Number of stored triangles
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// True when no triangles are stored
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Currently allocated capacity, 0 until the first push
    pub fn capacity(&self) -> usize {
        self.triangles.capacity()
    }

    /// Append a triangle, growing storage if needed.
    ///
    /// The first push reserves exactly the creation hint; later growth
    /// reserves `1 + 2x` the current capacity. Allocation failure surfaces
    /// as a recoverable out-of-memory error instead of aborting.
    pub fn push(&mut self, triangle: Triangle) -> Result<()> {
        if self.triangles.len() == self.triangles.capacity() {
            let additional = if self.triangles.capacity() == 0 {
                self.hint
            } else {
                self.triangles.capacity() + 1
            };
            self.triangles.try_reserve_exact(additional)?;
        }
        self.triangles.push(triangle);
        Ok(())
    }

    /// Append a triangle unless it is degenerate; returns whether it was
    /// stored.
    ///
    /// Only the top of the build pipeline filters. The clipper never
    /// re-applies this check: it relies on clipping a non-degenerate
    /// triangle not producing a degenerate one, which holds for the meshes
    /// this crate targets but is an observed property, not a theorem.
    pub fn push_filtered(&mut self, triangle: Triangle) -> Result<bool> {
        if triangle.is_degenerate() {
            return Ok(false);
        }
        self.push(triangle)?;
        Ok(true)
    }

    /// Iterate stored triangles in append order
    pub fn iter(&self) -> impl Iterator<Item = &Triangle> {
        self.triangles.iter()
    }

    /// Stored triangles as a slice, in append order
    pub fn as_slice(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Translate every stored triangle by `offset`
    pub fn translate(&mut self, offset: Vec3) {
        for triangle in &mut self.triangles {
            triangle.translate(offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Error;

    fn sample_triangle(scale: f32) -> Triangle {
        Triangle::new(
            Vec3::ZERO,
            Vec3::new(scale, 0.0, 0.0),
            Vec3::new(0.0, scale, 0.0),
        )
    }

    #[test]
    fn test_allocation_is_deferred() {
        let store = TriangleStore::with_hint(32);
        assert_eq!(store.len(), 0);
        assert_eq!(store.capacity(), 0);
    }

    #[test]
    fn test_first_push_reserves_hint() {
        let mut store = TriangleStore::with_hint(8);
        store.push(sample_triangle(1.0)).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.capacity(), 8);
    }

    #[test]
    fn test_growth_doubles_plus_one() {
        let mut store = TriangleStore::with_hint(1);
        let mut expected_caps = Vec::new();
        for i in 0..20 {
            store.push(sample_triangle(1.0 + i as f32)).unwrap();
            expected_caps.push(store.capacity());
        }
        // Capacity sequence from hint 1: 1, 3, 7, 15, 31, ...
        assert_eq!(store.len(), 20);
        assert!(expected_caps.contains(&1));
        assert!(expected_caps.contains(&3));
        assert!(expected_caps.contains(&7));
        assert!(expected_caps.contains(&15));
        assert_eq!(store.capacity(), 31);
    }

    #[test]
    fn test_growth_loses_nothing() {
        let mut store = TriangleStore::with_hint(2);
        for i in 0..100 {
            store.push(sample_triangle(1.0 + i as f32)).unwrap();
        }
        assert_eq!(store.len(), 100);
        for (i, tri) in store.iter().enumerate() {
            assert_eq!(tri.vertices[1].x, 1.0 + i as f32);
        }
    }

    #[test]
    fn test_push_filtered_rejects_degenerate() {
        let mut store = TriangleStore::with_hint(4);
        let degenerate = Triangle::new(Vec3::ONE, Vec3::ONE, Vec3::X);
        assert!(!store.push_filtered(degenerate).unwrap());
        assert_eq!(store.len(), 0);

        assert!(store.push_filtered(sample_triangle(1.0)).unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_absurd_hint_fails_recoverably() {
        let mut store = TriangleStore::with_hint(usize::MAX);
        let err = store.push(sample_triangle(1.0)).unwrap_err();
        assert!(matches!(err, Error::OutOfMemory(_)));
        assert_eq!(store.len(), 0);
    }

    #[test]
    #[should_panic(expected = "capacity hint must be positive")]
    fn test_zero_hint_panics() {
        TriangleStore::with_hint(0);
    }

    #[test]
    fn test_translate() {
        let mut store = TriangleStore::with_hint(2);
        store.push(sample_triangle(1.0)).unwrap();
        store.translate(Vec3::new(0.0, 0.0, -2.0));
        assert_eq!(store.as_slice()[0].vertices[0], Vec3::new(0.0, 0.0, -2.0));
    }
}
