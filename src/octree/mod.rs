//! Sparse octree construction from triangle soup

pub mod config;
pub mod store;
pub mod clip;
pub mod writer;
pub mod builder;

pub use config::BuildConfig;
pub use store::TriangleStore;
pub use clip::{Axis, split};
pub use writer::{CountingWriter, FlatNode, FlatTree, FlatTreeWriter, TreeStats, TreeWriter};
pub use builder::OctreeBuilder;
