//! Trisect - sparse collision octrees from triangle-soup meshes

pub mod core;
pub mod math;
pub mod octree;
