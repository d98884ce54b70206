//! Axis-aligned bounding box

use crate::core::types::Vec3;

/// Axis-aligned bounding box defined by min and max corners
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create AABB from min and max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create AABB from center and half-extents
    pub fn from_center_half_extent(center: Vec3, half_extent: Vec3) -> Self {
        Self {
            min: center - half_extent,
            max: center + half_extent,
        }
    }

    /// Smallest AABB containing every point, or None for an empty iterator
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut aabb = Aabb::new(first, first);
        for point in points {
            aabb.expand(point);
        }
        Some(aabb)
    }

    /// Expand AABB to include point
    pub fn expand(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Get center point
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Largest absolute coordinate over both corners, on any axis.
    /// For a box containing a point set this is the furthest the set
    /// reaches from the origin along any single axis.
    pub fn max_abs_coord(&self) -> f32 {
        self.min.abs().max(self.max.abs()).max_element()
    }

    /// The 8 corners, indexed by octant (bit 0 = max x, bit 1 = max y, bit 2 = max z)
    pub fn corners(&self) -> [Vec3; 8] {
        let mut corners = [Vec3::ZERO; 8];
        for (index, corner) in corners.iter_mut().enumerate() {
            *corner = Vec3::new(
                if index & 1 != 0 { self.max.x } else { self.min.x },
                if index & 2 != 0 { self.max.y } else { self.min.y },
                if index & 4 != 0 { self.max.z } else { self.min.z },
            );
        }
        corners
    }
}
