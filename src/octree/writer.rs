//! Octree emission interface
//!
//! The subdivision driver describes the finished tree as a pre-order
//! stream of node events; implementors of [`TreeWriter`] turn that stream
//! into whatever persistent representation the embedder needs. Two
//! implementations ship with the crate: [`CountingWriter`] tallies node
//! kinds for summaries and tests, [`FlatTreeWriter`] materializes an
//! in-memory tree in a flat node array.

/// Receives the pre-order node event stream of one octree build.
///
/// The driver guarantees the stream is well formed: every `begin_inner`
/// is followed by exactly eight child descriptions (each of them
/// `write_empty`, `write_solid`, or a nested inner bracket) and one
/// `end_inner`, and `finalize` is called exactly once, after the root
/// description completes.
pub trait TreeWriter {
    /// Tree representation produced by this writer
    type Tree;

    /// The current cell contains no geometry
    fn write_empty(&mut self);

    /// The current cell is treated as fully occupied
    fn write_solid(&mut self);

    /// Open an inner node; eight child descriptions follow
    fn begin_inner(&mut self);

    /// Close the innermost open inner node
    fn end_inner(&mut self);

    /// Consume the writer, producing the tree for a root cell of `radius`
    fn finalize(self, radius: f32) -> Self::Tree;
}

/// Node counts gathered over one build
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Leaves with no geometry
    pub empty_leaves: usize,
    /// Fully occupied leaves
    pub solid_leaves: usize,
    /// Inner nodes (each has exactly 8 children)
    pub inner_nodes: usize,
    /// Deepest inner-node nesting seen; 0 for a leaf-only tree
    pub max_depth: usize,
}

/// Writer that tallies node events without building anything
#[derive(Debug, Default)]
pub struct CountingWriter {
    stats: TreeStats,
    open_inner: usize,
}

impl CountingWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TreeWriter for CountingWriter {
    type Tree = TreeStats;

    fn write_empty(&mut self) {
        self.stats.empty_leaves += 1;
    }

    fn write_solid(&mut self) {
        self.stats.solid_leaves += 1;
    }

    fn begin_inner(&mut self) {
        self.stats.inner_nodes += 1;
        self.open_inner += 1;
        self.stats.max_depth = self.stats.max_depth.max(self.open_inner);
    }

    fn end_inner(&mut self) {
        assert!(
            self.open_inner > 0,
            "end_inner without matching begin_inner"
        );
        self.open_inner -= 1;
    }

    fn finalize(self, _radius: f32) -> TreeStats {
        self.stats
    }
}

/// Node of a [`FlatTree`], stored in pre-order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlatNode {
    /// Leaf with no geometry
    Empty,
    /// Fully occupied leaf
    Solid,
    /// Inner node; `children[i]` indexes the child for octant `i`
    /// (bit 0 = +X, bit 1 = +Y, bit 2 = +Z)
    Inner { children: [u32; 8] },
}

/// Sparse octree in a flat pre-order node array. Index 0 is the root.
///
/// This layout is a convenience of this crate; embedders with their own
/// encoding implement [`TreeWriter`] directly instead.
#[derive(Clone, Debug)]
pub struct FlatTree {
    nodes: Vec<FlatNode>,
    radius: f32,
}

impl FlatTree {
    /// Root node
    pub fn root(&self) -> &FlatNode {
        &self.nodes[0]
    }

    /// Node by index
    pub fn node(&self, index: u32) -> &FlatNode {
        &self.nodes[index as usize]
    }

    /// Total number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Half the edge length of the root cell
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// True when the whole tree is a single empty leaf
    pub fn is_empty(&self) -> bool {
        matches!(self.nodes[0], FlatNode::Empty)
    }

    /// Calculate memory usage in bytes
    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<FlatNode>() * self.nodes.len()
    }
}

struct PendingInner {
    index: usize,
    filled: usize,
}

/// Writer that materializes the event stream as a [`FlatTree`]
#[derive(Default)]
pub struct FlatTreeWriter {
    nodes: Vec<FlatNode>,
    open: Vec<PendingInner>,
}

impl FlatTreeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed child subtree rooted at `index` into the
    /// innermost open inner node, if any.
    fn record_child(&mut self, index: usize) {
        if let Some(parent) = self.open.last_mut() {
            let slot = parent.filled;
            parent.filled += 1;
            let parent_index = parent.index;
            assert!(slot < 8, "inner node received more than 8 children");
            match &mut self.nodes[parent_index] {
                FlatNode::Inner { children } => children[slot] = index as u32,
                _ => unreachable!("open node is always an inner node"),
            }
        }
    }
}

impl TreeWriter for FlatTreeWriter {
    type Tree = FlatTree;

    fn write_empty(&mut self) {
        let index = self.nodes.len();
        self.nodes.push(FlatNode::Empty);
        self.record_child(index);
    }

    fn write_solid(&mut self) {
        let index = self.nodes.len();
        self.nodes.push(FlatNode::Solid);
        self.record_child(index);
    }

    fn begin_inner(&mut self) {
        let index = self.nodes.len();
        self.nodes.push(FlatNode::Inner { children: [0; 8] });
        self.open.push(PendingInner { index, filled: 0 });
    }

    fn end_inner(&mut self) {
        let Some(done) = self.open.pop() else {
            panic!("end_inner without matching begin_inner");
        };
        assert!(
            done.filled == 8,
            "inner node closed with {} children, expected 8",
            done.filled
        );
        self.record_child(done.index);
    }

    fn finalize(self, radius: f32) -> FlatTree {
        assert!(self.open.is_empty(), "finalize with unclosed inner nodes");
        assert!(!self.nodes.is_empty(), "finalize before any node was written");
        FlatTree {
            nodes: self.nodes,
            radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drive `writer` through a small fixed tree: the root is inner, child
    /// octants 0-6 alternate empty/solid, octant 7 is an inner node of
    /// eight solids.
    fn emit_two_level<W: TreeWriter>(mut writer: W, radius: f32) -> W::Tree {
        writer.begin_inner();
        for i in 0..7 {
            if i % 2 == 0 {
                writer.write_empty();
            } else {
                writer.write_solid();
            }
        }
        writer.begin_inner();
        for _ in 0..8 {
            writer.write_solid();
        }
        writer.end_inner();
        writer.end_inner();
        writer.finalize(radius)
    }

    #[test]
    fn test_counting_writer() {
        let stats = emit_two_level(CountingWriter::new(), 2.0);
        assert_eq!(stats.empty_leaves, 4);
        assert_eq!(stats.solid_leaves, 3 + 8);
        assert_eq!(stats.inner_nodes, 2);
        assert_eq!(stats.max_depth, 2);
    }

    #[test]
    fn test_flat_tree_structure() {
        let tree = emit_two_level(FlatTreeWriter::new(), 2.0);
        assert_eq!(tree.radius(), 2.0);
        assert_eq!(tree.node_count(), 1 + 7 + 1 + 8);
        assert!(!tree.is_empty());
        assert_eq!(
            tree.memory_usage(),
            17 * std::mem::size_of::<FlatNode>(),
            "node storage only, no hidden header"
        );

        let FlatNode::Inner { children } = tree.root() else {
            panic!("root must be inner");
        };
        // Pre-order: children 0-6 directly follow the root.
        for i in 0..7u32 {
            assert_eq!(children[i as usize], i + 1);
            let expected = if i % 2 == 0 {
                FlatNode::Empty
            } else {
                FlatNode::Solid
            };
            assert_eq!(*tree.node(i + 1), expected);
        }
        // Octant 7 is the nested inner node.
        let nested = children[7];
        assert_eq!(nested, 8);
        let FlatNode::Inner { children: leaves } = tree.node(nested) else {
            panic!("octant 7 must be inner");
        };
        for (slot, &leaf) in leaves.iter().enumerate() {
            assert_eq!(leaf as usize, 9 + slot);
            assert_eq!(*tree.node(leaf), FlatNode::Solid);
        }
    }

    #[test]
    fn test_single_leaf_tree() {
        let mut writer = FlatTreeWriter::new();
        writer.write_empty();
        let tree = writer.finalize(0.5);
        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.radius(), 0.5);
        assert_eq!(tree.memory_usage(), std::mem::size_of::<FlatNode>());
    }

    #[test]
    #[should_panic(expected = "end_inner without matching begin_inner")]
    fn test_unbalanced_end_panics() {
        let mut writer = FlatTreeWriter::new();
        writer.end_inner();
    }

    #[test]
    #[should_panic(expected = "end_inner without matching begin_inner")]
    fn test_counting_unbalanced_end_panics() {
        let mut writer = CountingWriter::new();
        writer.begin_inner();
        writer.end_inner();
        writer.end_inner();
    }

    #[test]
    #[should_panic(expected = "expected 8")]
    fn test_underfilled_inner_panics() {
        let mut writer = FlatTreeWriter::new();
        writer.begin_inner();
        writer.write_solid();
        writer.end_inner();
    }
}
