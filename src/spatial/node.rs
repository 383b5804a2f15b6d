//! SpatialNode — one box-shaped region of the spatial tree.
//!
//! A node owns up to `P::CHILD_COUNT` lazily-created child nodes that
//! subdivide its static region, plus the elements that straddle its
//! subdivision boundaries (or that have nowhere deeper to go). The
//! static region is fixed at construction; `world_aabb` is the union
//! of everything actually stored in the subtree and grows with each
//! insertion.
//!
//! `world_aabb` and `largest_element_size` are never shrunk on
//! removal. They stay conservative supersets, which can only ever
//! over-include during culling, never drop a visible element.

use std::fmt;
use std::marker::PhantomData;
use glam::Vec3;
use crate::cull_debug;
use crate::frustum::{intersects_any, Frustum, FrustumTest};
use super::aabb::Aabb;
use super::partition::Partition;
use super::tree::DetailCullingParams;

const LOG_SOURCE: &str = "cull_tree::SpatialNode";

/// Insertion stops descending below this depth.
///
/// Regions halve every level, so a degenerate (point-sized) element
/// would otherwise recurse until the child region collapses onto the
/// point and never stops fitting. Normal-sized elements stop fitting
/// into children long before this.
pub(crate) const MAX_DEPTH: usize = 32;

/// One stored element: the caller's arena key plus the world-space
/// AABB captured at insertion time.
pub(crate) struct ElementEntry<K> {
    pub key: K,
    pub aabb: Aabb,
}

/// A box-shaped region of the tree.
///
/// Exposed to callers only through the debug node queries
/// (`all_nodes`, `visible_nodes`, ...) for drawing culling-volume
/// wireframes; all mutation goes through [`SpatialTree`].
///
/// [`SpatialTree`]: super::SpatialTree
pub struct SpatialNode<K, P: Partition> {
    /// Static region origin (fixed at construction)
    min: Vec3,
    /// Static region size (fixed at construction)
    size: Vec3,
    /// Union of all contained/descendant element AABBs — NOT the static region
    world_aabb: Aabb,
    /// Largest element AABB diagonal in this subtree, for detail culling
    largest_element_size: f32,
    /// Child regions, created on first use
    children: Vec<Option<Box<SpatialNode<K, P>>>>,
    /// Elements that fit in no single child region
    elements: Vec<ElementEntry<K>>,
    _partition: PhantomData<P>,
}

impl<K, P> SpatialNode<K, P>
where
    K: Copy + PartialEq + fmt::Debug,
    P: Partition,
{
    pub(crate) fn new(min: Vec3, size: Vec3) -> Self {
        Self {
            min,
            size,
            world_aabb: Aabb::EMPTY,
            largest_element_size: 0.0,
            children: (0..P::CHILD_COUNT).map(|_| None).collect(),
            elements: Vec::new(),
            _partition: PhantomData,
        }
    }

    pub(crate) fn set_world_aabb(&mut self, aabb: Aabb) {
        self.world_aabb = aabb;
    }

    // ===== ACCESSORS =====

    /// Static region origin.
    pub fn min(&self) -> Vec3 {
        self.min
    }

    /// Static region far corner.
    pub fn max(&self) -> Vec3 {
        self.min + self.size
    }

    /// Static region size.
    pub fn region_size(&self) -> Vec3 {
        self.size
    }

    /// Union AABB of all elements stored in this subtree.
    pub fn world_aabb(&self) -> &Aabb {
        &self.world_aabb
    }

    /// Largest element AABB diagonal stored in this subtree.
    pub fn largest_element_size(&self) -> f32 {
        self.largest_element_size
    }

    /// Number of elements stored directly in this node (not descendants).
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// True if any child node has been created.
    pub fn has_children(&self) -> bool {
        self.children.iter().any(|c| c.is_some())
    }

    fn is_unused(&self) -> bool {
        self.elements.is_empty() && !self.has_children()
    }

    // ===== MUTATION =====

    /// Insert an element, pushing it as deep as a single child region
    /// can still fully enclose it.
    ///
    /// Child regions are tested in a fixed enumeration order and the
    /// first fully-containing one wins; an element straddling every
    /// subdivision boundary stays here.
    pub(crate) fn insert(&mut self, key: K, aabb: &Aabb, depth: usize) {
        self.world_aabb = self.world_aabb.union(aabb);
        self.largest_element_size = self.largest_element_size.max(aabb.size());

        if depth < MAX_DEPTH {
            for index in 0..P::CHILD_COUNT {
                let (child_min, child_size) = P::child_region(self.min, self.size, index);
                if Aabb::new(child_min, child_min + child_size).contains(aabb) {
                    // The child region encloses the element entirely,
                    // push it further down the tree.
                    let child = self.children[index].get_or_insert_with(|| {
                        Box::new(SpatialNode::new(child_min, child_size))
                    });
                    child.insert(key, aabb, depth + 1);
                    return;
                }
            }
        }

        self.elements.push(ElementEntry { key, aabb: *aabb });
    }

    /// Remove the first entry matching `key`, depth-first.
    ///
    /// Does not shrink `world_aabb` or `largest_element_size`.
    pub(crate) fn remove(&mut self, key: K) -> bool {
        if let Some(pos) = self.elements.iter().position(|e| e.key == key) {
            self.elements.remove(pos);
            return true;
        }
        for child in self.children.iter_mut().flatten() {
            if child.remove(key) {
                return true;
            }
        }
        false
    }

    // ===== FULL TRAVERSALS =====

    /// Append every element key in this subtree.
    pub(crate) fn collect_all(&self, out: &mut Vec<K>) {
        out.extend(self.elements.iter().map(|e| e.key));
        for child in self.children.iter().flatten() {
            child.collect_all(out);
        }
    }

    /// Append every `(key, aabb)` entry in this subtree. Used for the
    /// re-insertion pass when the root grows.
    pub(crate) fn collect_entries(&self, out: &mut Vec<(K, Aabb)>) {
        out.extend(self.elements.iter().map(|e| (e.key, e.aabb)));
        for child in self.children.iter().flatten() {
            child.collect_entries(out);
        }
    }

    /// Append every node in this subtree.
    pub(crate) fn collect_all_nodes<'a>(&'a self, out: &mut Vec<&'a Self>) {
        out.push(self);
        for child in self.children.iter().flatten() {
            child.collect_all_nodes(out);
        }
    }

    /// Subtree elements with the detail test only (no frustum test).
    ///
    /// Used inside the fully-visible branch of the detail-culling
    /// query: the frustum test is already decided for the whole
    /// subtree, but an LOD-culled region may still hold one unusually
    /// large element that must be kept, so each element is checked
    /// individually.
    fn collect_all_with_detail_culling(
        &self,
        cam_pos: Vec3,
        params: &DetailCullingParams,
        out: &mut Vec<K>,
    ) {
        if self.world_aabb.is_detail_with_reference(
            cam_pos,
            params.error_threshold,
            self.largest_element_size,
        ) {
            return;
        }
        for entry in &self.elements {
            if !entry.aabb.is_detail(cam_pos, params.error_threshold) {
                out.push(entry.key);
            }
        }
        for child in self.children.iter().flatten() {
            child.collect_all_with_detail_culling(cam_pos, params, out);
        }
    }

    /// Subtree nodes with the detail test only (no frustum test).
    fn collect_all_nodes_with_detail_culling<'a>(
        &'a self,
        cam_pos: Vec3,
        params: &DetailCullingParams,
        out: &mut Vec<&'a Self>,
    ) {
        if self.world_aabb.is_detail_with_reference(
            cam_pos,
            params.error_threshold,
            self.largest_element_size,
        ) {
            return;
        }
        out.push(self);
        for child in self.children.iter().flatten() {
            child.collect_all_nodes_with_detail_culling(cam_pos, params, out);
        }
    }

    // ===== VISIBILITY QUERIES =====

    /// Frustum-culled element query.
    ///
    /// 3-way classification of the subtree's union AABB:
    /// - `Inside` → collect the whole subtree, no per-element tests
    /// - `Partial` → test local elements individually, recurse
    /// - `Outside` → prune the subtree
    pub(crate) fn visible_elements(&self, frustum: &Frustum, out: &mut Vec<K>) {
        if self.is_unused() {
            return;
        }
        match frustum.classify_aabb(&self.world_aabb) {
            FrustumTest::Outside => {}
            FrustumTest::Inside => self.collect_all(out),
            FrustumTest::Partial => {
                for entry in &self.elements {
                    if frustum.intersects_aabb(&entry.aabb) {
                        out.push(entry.key);
                    }
                }
                for child in self.children.iter().flatten() {
                    child.visible_elements(frustum, out);
                }
            }
        }
    }

    /// Frustum-culled element query with an additional detail pass.
    ///
    /// The subtree is rejected outright when even its largest element
    /// would be too small on screen; surviving elements are still
    /// detail-tested one by one, including inside the fully-visible
    /// branch.
    pub(crate) fn visible_elements_with_detail_culling(
        &self,
        frustum: &Frustum,
        cam_pos: Vec3,
        params: &DetailCullingParams,
        out: &mut Vec<K>,
    ) {
        if self.is_unused()
            || self.world_aabb.is_detail_with_reference(
                cam_pos,
                params.error_threshold,
                self.largest_element_size,
            )
        {
            return;
        }
        match frustum.classify_aabb(&self.world_aabb) {
            FrustumTest::Outside => {}
            FrustumTest::Inside => {
                for entry in &self.elements {
                    if !entry.aabb.is_detail(cam_pos, params.error_threshold) {
                        out.push(entry.key);
                    }
                }
                for child in self.children.iter().flatten() {
                    child.collect_all_with_detail_culling(cam_pos, params, out);
                }
            }
            FrustumTest::Partial => {
                for entry in &self.elements {
                    if !entry.aabb.is_detail(cam_pos, params.error_threshold)
                        && frustum.intersects_aabb(&entry.aabb)
                    {
                        out.push(entry.key);
                    }
                }
                for child in self.children.iter().flatten() {
                    child.visible_elements_with_detail_culling(frustum, cam_pos, params, out);
                }
            }
        }
    }

    /// Multi-frustum query for shadow cascades.
    ///
    /// A subtree or element is visible if it intersects any frustum in
    /// the list. The projected-error metric gates recursion into
    /// children rather than culling the current level, so casters
    /// close to the light traverse deeper than the plain detail test
    /// would allow.
    pub(crate) fn visible_elements_in_cascades(
        &self,
        frusta: &[Frustum],
        cam_pos: Vec3,
        params: &DetailCullingParams,
        ignore_near: bool,
        out: &mut Vec<K>,
    ) {
        if self.is_unused() || !intersects_any(frusta, &self.world_aabb, ignore_near) {
            return;
        }
        for entry in &self.elements {
            if intersects_any(frusta, &entry.aabb, ignore_near) {
                out.push(entry.key);
            }
        }
        let error = self.world_aabb.projected_error(cam_pos, params.error_exponent);
        if error > params.error_threshold {
            for child in self.children.iter().flatten() {
                child.visible_elements_in_cascades(frusta, cam_pos, params, ignore_near, out);
            }
        }
    }

    /// Node query for debug wireframe drawing.
    pub(crate) fn visible_nodes<'a>(&'a self, frustum: &Frustum, out: &mut Vec<&'a Self>) {
        match frustum.classify_aabb(&self.world_aabb) {
            FrustumTest::Outside => {}
            FrustumTest::Inside => {
                out.push(self);
                for child in self.children.iter().flatten() {
                    child.collect_all_nodes(out);
                }
            }
            FrustumTest::Partial => {
                out.push(self);
                for child in self.children.iter().flatten() {
                    child.visible_nodes(frustum, out);
                }
            }
        }
    }

    /// Node query for debug wireframe drawing, with the detail pass.
    pub(crate) fn visible_nodes_with_detail_culling<'a>(
        &'a self,
        frustum: &Frustum,
        cam_pos: Vec3,
        params: &DetailCullingParams,
        out: &mut Vec<&'a Self>,
    ) {
        if self.world_aabb.is_detail_with_reference(
            cam_pos,
            params.error_threshold,
            self.largest_element_size,
        ) {
            return;
        }
        match frustum.classify_aabb(&self.world_aabb) {
            FrustumTest::Outside => {}
            FrustumTest::Inside => {
                out.push(self);
                for child in self.children.iter().flatten() {
                    child.collect_all_nodes_with_detail_culling(cam_pos, params, out);
                }
            }
            FrustumTest::Partial => {
                out.push(self);
                for child in self.children.iter().flatten() {
                    child.visible_nodes_with_detail_culling(frustum, cam_pos, params, out);
                }
            }
        }
    }

    // ===== DIAGNOSTICS =====

    /// Emit node and element bounds through the logging stack.
    pub(crate) fn print(&self, level: usize) {
        let indent = "  ".repeat(level);
        cull_debug!(
            LOG_SOURCE,
            "{}node region {:?}..{:?} world aabb {:?}..{:?}",
            indent,
            self.min,
            self.max(),
            self.world_aabb.min,
            self.world_aabb.max
        );
        for entry in &self.elements {
            cull_debug!(
                LOG_SOURCE,
                "{}  element {:?} aabb {:?}..{:?}",
                indent,
                entry.key,
                entry.aabb.min,
                entry.aabb.max
            );
        }
        for child in self.children.iter().flatten() {
            child.print(level + 1);
        }
    }
}

#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;
