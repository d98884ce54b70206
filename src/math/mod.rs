//! Geometric primitives for octree construction

pub mod aabb;
pub mod triangle;

pub use aabb::Aabb;
pub use triangle::Triangle;
