//! SpatialTree — owning wrapper around the node hierarchy.
//!
//! The tree owns its node graph exclusively and grows the root when an
//! inserted element falls outside the current bounds. Elements are
//! referenced by caller-owned arena keys; the tree never owns them and
//! performs no automatic invalidation — removing an element from its
//! arena must be paired with an explicit [`remove`](SpatialTree::remove).
//!
//! Mutation takes `&mut self` and queries take `&self`, so the borrow
//! checker enforces the intended usage: serialize all insertions and
//! removals, then issue any number of read-only visibility queries
//! (main camera, shadow cascades, debug draw) against the same frame.

use std::fmt;
use glam::Vec3;
use crate::{cull_debug, cull_warn};
use crate::error::{Error, Result};
use crate::frustum::Frustum;
use super::aabb::Aabb;
use super::node::SpatialNode;
use super::partition::{Octants, Partition, Quadrants};

const LOG_SOURCE: &str = "cull_tree::SpatialTree";

/// Configuration of the distance-based detail (LOD) culling pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetailCullingParams {
    /// Minimum apparent size (`aabb diagonal / camera distance`) below
    /// which an element or region is culled as detail.
    pub error_threshold: f32,
    /// Exponent applied to the projected-error metric by the cascade
    /// query's recursion gate.
    pub error_exponent: f32,
}

impl Default for DetailCullingParams {
    fn default() -> Self {
        Self {
            error_threshold: 0.0125,
            error_exponent: 1.0,
        }
    }
}

/// Hierarchical spatial index over caller-owned elements.
///
/// `P` selects the subdivision scheme; use the [`Octree`] and
/// [`Quadtree`] aliases rather than naming the partition directly.
pub struct SpatialTree<K, P: Partition = Octants> {
    root: SpatialNode<K, P>,
    detail_culling_params: DetailCullingParams,
    len: usize,
}

/// 3D spatial index subdividing along all three axes.
pub type Octree<K> = SpatialTree<K, Octants>;

/// Footprint spatial index subdividing along x and z only.
pub type Quadtree<K> = SpatialTree<K, Quadrants>;

impl<K, P> SpatialTree<K, P>
where
    K: Copy + PartialEq + fmt::Debug,
    P: Partition,
{
    /// Create a tree over the given initial world bounds.
    ///
    /// The bounds seed the root's union AABB, so elements inside them
    /// insert without triggering root growth. The vertical extent may
    /// be flat for the quadtree variant; x and z must be non-degenerate.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidWorldBounds`] if the bounds are inverted or
    /// degenerate on a subdivided axis.
    pub fn new(world_min: Vec3, world_max: Vec3) -> Result<Self> {
        if !(world_min.x < world_max.x && world_min.z < world_max.z)
            || world_min.y > world_max.y
            || !world_min.is_finite()
            || !world_max.is_finite()
        {
            return Err(Error::InvalidWorldBounds(format!(
                "{:?}..{:?}",
                world_min, world_max
            )));
        }

        let mut root = SpatialNode::new(world_min, world_max - world_min);
        root.set_world_aabb(Aabb::new(world_min, world_max));

        Ok(Self {
            root,
            detail_culling_params: DetailCullingParams::default(),
            len: 0,
        })
    }

    /// Replace the detail culling configuration.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidCullingParams`] for a negative or non-finite
    /// threshold, or a non-positive exponent.
    pub fn set_detail_culling_params(&mut self, params: DetailCullingParams) -> Result<()> {
        if !params.error_threshold.is_finite() || params.error_threshold < 0.0 {
            return Err(Error::InvalidCullingParams(format!(
                "error_threshold = {}",
                params.error_threshold
            )));
        }
        if !params.error_exponent.is_finite() || params.error_exponent <= 0.0 {
            return Err(Error::InvalidCullingParams(format!(
                "error_exponent = {}",
                params.error_exponent
            )));
        }
        self.detail_culling_params = params;
        Ok(())
    }

    /// Current detail culling configuration.
    pub fn detail_culling_params(&self) -> DetailCullingParams {
        self.detail_culling_params
    }

    /// Number of elements stored in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the tree stores no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The root node, mainly useful for inspecting the overall union AABB.
    pub fn root(&self) -> &SpatialNode<K, P> {
        &self.root
    }

    // ===== MUTATION =====

    /// Insert an element with its world-space AABB.
    ///
    /// If the AABB falls outside the root's current union AABB the
    /// root is rebuilt over the union of old and new bounds and every
    /// stored element is re-inserted — O(n), but scene bounds are
    /// expected to stabilize early and grow rarely after initial
    /// population.
    pub fn insert(&mut self, key: K, world_aabb: &Aabb) {
        if self.root.world_aabb().contains(world_aabb) {
            self.root.insert(key, world_aabb, 0);
        } else {
            let mut entries = Vec::with_capacity(self.len);
            self.root.collect_entries(&mut entries);

            let grown = self.root.world_aabb().union(world_aabb);
            cull_debug!(
                LOG_SOURCE,
                "growing root to {:?}..{:?}, re-inserting {} elements",
                grown.min,
                grown.max,
                entries.len()
            );

            let mut new_root = SpatialNode::new(grown.min, grown.max - grown.min);
            new_root.set_world_aabb(grown);
            new_root.insert(key, world_aabb, 0);
            for (entry_key, entry_aabb) in entries {
                new_root.insert(entry_key, &entry_aabb, 0);
            }
            self.root = new_root;
        }
        self.len += 1;
    }

    /// Remove an element, searching the tree depth-first.
    ///
    /// Returns `false` (and logs a warning) if the element was never
    /// inserted — a caller bug per the usage contract, but the tree
    /// stays structurally valid. Node bounds are not recomputed; they
    /// remain conservative supersets of the remaining contents.
    pub fn remove(&mut self, key: K) -> bool {
        if self.root.remove(key) {
            self.len -= 1;
            true
        } else {
            cull_warn!(
                LOG_SOURCE,
                "removing element {:?} that was never inserted, this should never happen",
                key
            );
            false
        }
    }

    // ===== ELEMENT QUERIES =====

    /// All element keys, in no particular order.
    pub fn all_elements(&self) -> Vec<K> {
        let mut out = Vec::with_capacity(self.len);
        self.root.collect_all(&mut out);
        out
    }

    /// Keys of elements whose AABB intersects the frustum.
    pub fn visible_elements(&self, frustum: &Frustum) -> Vec<K> {
        let mut out = Vec::new();
        self.root.visible_elements(frustum, &mut out);
        out
    }

    /// Frustum query with the additional detail (LOD) culling pass.
    ///
    /// Elements whose apparent size from `cam_pos` falls below the
    /// configured error threshold are dropped even when inside the
    /// frustum.
    pub fn visible_elements_with_detail_culling(
        &self,
        frustum: &Frustum,
        cam_pos: Vec3,
    ) -> Vec<K> {
        let mut out = Vec::new();
        self.root.visible_elements_with_detail_culling(
            frustum,
            cam_pos,
            &self.detail_culling_params,
            &mut out,
        );
        out
    }

    /// Multi-frustum query for cascaded shadow maps.
    ///
    /// An element is kept when visible in **any** of the cascade
    /// frustums. With `ignore_near`, casters behind a cascade's near
    /// plane are kept as well since they can still cast into it.
    pub fn visible_elements_in_cascades(
        &self,
        frusta: &[Frustum],
        cam_pos: Vec3,
        ignore_near: bool,
    ) -> Vec<K> {
        let mut out = Vec::new();
        self.root.visible_elements_in_cascades(
            frusta,
            cam_pos,
            &self.detail_culling_params,
            ignore_near,
            &mut out,
        );
        out
    }

    // ===== NODE QUERIES (debug visualization) =====

    /// Every node in the tree.
    pub fn all_nodes(&self) -> Vec<&SpatialNode<K, P>> {
        let mut out = Vec::new();
        self.root.collect_all_nodes(&mut out);
        out
    }

    /// Nodes whose union AABB intersects the frustum.
    pub fn visible_nodes(&self, frustum: &Frustum) -> Vec<&SpatialNode<K, P>> {
        let mut out = Vec::new();
        self.root.visible_nodes(frustum, &mut out);
        out
    }

    /// Frustum-visible nodes surviving the detail culling pass.
    pub fn visible_nodes_with_detail_culling(
        &self,
        frustum: &Frustum,
        cam_pos: Vec3,
    ) -> Vec<&SpatialNode<K, P>> {
        let mut out = Vec::new();
        self.root.visible_nodes_with_detail_culling(
            frustum,
            cam_pos,
            &self.detail_culling_params,
            &mut out,
        );
        out
    }

    // ===== DIAGNOSTICS =====

    /// Walk the tree and emit node and element bounds through the
    /// logging stack. Diagnostics only, not part of the functional
    /// contract.
    pub fn print(&self) {
        self.root.print(0);
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;
