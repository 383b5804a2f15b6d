//! Axis-aligned bounding box in world space.
//!
//! The conservative bounding volume used for every containment and
//! visibility test in the index. Culling only ever errs on the side of
//! over-inclusion: an AABB test may keep an invisible object but never
//! drops a visible one.

use glam::{Mat4, Vec3};

/// Axis-Aligned Bounding Box
///
/// Invariant: `min <= max` componentwise once non-empty. The empty box
/// is `min = +inf, max = -inf`; it is the identity element of
/// [`union`](Aabb::union) and never contains or intersects anything.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner (x, y, z)
    pub min: Vec3,
    /// Maximum corner (x, y, z)
    pub max: Vec3,
}

impl Aabb {
    /// The empty box: union identity, contains nothing, intersects nothing.
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    /// Create an AABB from its two corners.
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// True if this is the empty box (or otherwise inverted).
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Smallest AABB enclosing both operands.
    ///
    /// Union with `EMPTY` returns the other operand unchanged.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Test if this AABB fully contains another AABB.
    ///
    /// Returns `true` if `other` is entirely within `self`. Used by the
    /// tree to decide whether an element can be pushed into a child node.
    pub fn contains(&self, other: &Aabb) -> bool {
        self.min.x <= other.min.x && self.max.x >= other.max.x
        && self.min.y <= other.min.y && self.max.y >= other.max.y
        && self.min.z <= other.min.z && self.max.z >= other.max.z
    }

    /// Test if this AABB intersects (overlaps) another AABB.
    ///
    /// Returns `true` if the two AABBs overlap or touch.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x
        && self.min.y <= other.max.y && self.max.y >= other.min.y
        && self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Compute the center point of this AABB.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Per-axis extent (`max - min`), zero for the empty box.
    pub fn extent(&self) -> Vec3 {
        if self.is_empty() { Vec3::ZERO } else { self.max - self.min }
    }

    /// Diagonal length, the scalar "apparent size" used for detail culling.
    ///
    /// Zero for the empty box.
    pub fn size(&self) -> f32 {
        self.extent().length()
    }

    /// Transform this AABB by a matrix, returning a new AABB.
    ///
    /// Uses the Arvo method: projects each matrix axis onto the AABB extents
    /// for an exact (tight) result without transforming all 8 corners.
    pub fn transformed(&self, matrix: &Mat4) -> Aabb {
        let translation = matrix.col(3).truncate();
        let mut new_min = translation;
        let mut new_max = translation;

        for i in 0..3 {
            let axis = matrix.col(i).truncate();
            let a = axis * self.min[i];
            let b = axis * self.max[i];
            new_min += a.min(b);
            new_max += a.max(b);
        }

        Aabb { min: new_min, max: new_max }
    }

    /// True when this box is too small on screen to matter.
    ///
    /// The apparent size is approximated by `size() / distance` from the
    /// camera to the box center; the box is detail when that ratio falls
    /// below `error_threshold`.
    pub fn is_detail(&self, cam_pos: Vec3, error_threshold: f32) -> bool {
        self.is_detail_with_reference(cam_pos, error_threshold, self.size())
    }

    /// Detail test against a caller-supplied reference size.
    ///
    /// The tree passes the largest element size contained in a node: a
    /// node region may be detail as a whole while still holding one
    /// element big enough to stay visible.
    pub fn is_detail_with_reference(
        &self,
        cam_pos: Vec3,
        error_threshold: f32,
        reference_size: f32,
    ) -> bool {
        let distance = cam_pos.distance(self.center());
        reference_size / distance < error_threshold
    }

    /// Projected-error metric `(size() / distance)^exponent`.
    ///
    /// Used by the cascade query to decide whether to recurse further
    /// into a subtree, not whether to cull the current level.
    pub fn projected_error(&self, cam_pos: Vec3, error_exponent: f32) -> f32 {
        let distance = cam_pos.distance(self.center());
        (self.size() / distance).powf(error_exponent)
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
#[path = "aabb_tests.rs"]
mod tests;
