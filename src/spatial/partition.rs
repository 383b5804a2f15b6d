//! Subdivision schemes for the spatial tree.
//!
//! The octree and the footprint quadtree are the same structure with a
//! different child layout; `Partition` captures that difference. All
//! regions stay three-dimensional — the quadtree variant simply never
//! splits the vertical axis.

use glam::Vec3;

/// How a node's static region subdivides into child regions.
///
/// `child_region` must be deterministic and independent of tree
/// contents: a node's K child regions are fixed by its own region
/// alone. Children are enumerated in a fixed order and the first
/// region that fully contains an element wins (a deliberate
/// simplicity-over-balance choice).
pub trait Partition {
    /// Number of child regions per node (8 for octants, 4 for quadrants).
    const CHILD_COUNT: usize;

    /// Static region of child `index`, as `(min, size)`.
    fn child_region(min: Vec3, size: Vec3, index: usize) -> (Vec3, Vec3);
}

/// Eight-way subdivision along x, y and z — the octree layout.
pub enum Octants {}

impl Partition for Octants {
    const CHILD_COUNT: usize = 8;

    fn child_region(min: Vec3, size: Vec3, index: usize) -> (Vec3, Vec3) {
        let half = size * 0.5;
        let offset = match index {
            0 => Vec3::ZERO,
            1 => Vec3::new(half.x, 0.0, 0.0),
            2 => Vec3::new(0.0, half.y, 0.0),
            3 => Vec3::new(0.0, 0.0, half.z),
            4 => Vec3::new(half.x, half.y, 0.0),
            5 => Vec3::new(half.x, 0.0, half.z),
            6 => Vec3::new(0.0, half.y, half.z),
            _ => half,
        };
        (min + offset, half)
    }
}

/// Four-way subdivision along x and z only — the footprint quadtree.
///
/// Child regions keep the parent's full vertical extent, so the
/// containment test degenerates to the element's xz footprint. Suited
/// to mostly-flat scenes (terrain, cities) where splitting height
/// would only add empty cells.
pub enum Quadrants {}

impl Partition for Quadrants {
    const CHILD_COUNT: usize = 4;

    fn child_region(min: Vec3, size: Vec3, index: usize) -> (Vec3, Vec3) {
        let half = size * 0.5;
        let offset = Vec3::new(
            (index % 2) as f32 * half.x,
            0.0,
            (index / 2) as f32 * half.z,
        );
        (min + offset, Vec3::new(half.x, size.y, half.z))
    }
}

#[cfg(test)]
#[path = "partition_tests.rs"]
mod tests;
