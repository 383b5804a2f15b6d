//! Spatial index module
//!
//! Provides the AABB value type and the generic spatial tree (octree /
//! footprint quadtree) used for frustum and detail culling.

mod aabb;
mod partition;
mod node;
mod tree;

use slotmap::new_key_type;

pub use aabb::Aabb;
pub use partition::{Partition, Octants, Quadrants};
pub use node::SpatialNode;
pub use tree::{SpatialTree, Octree, Quadtree, DetailCullingParams};

new_key_type! {
    /// Conventional arena key for renderables indexed by a spatial tree.
    ///
    /// The tree is generic over any copyable key; callers with their own
    /// slotmap key types can use those directly. Keys remain valid after
    /// other elements are removed — a key dies only with its own element.
    pub struct RenderableKey;
}
