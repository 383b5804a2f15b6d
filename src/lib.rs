/*!
# CullTree

Hierarchical spatial index for visibility queries in a renderer.

Every frame a renderer has to answer "which objects are visible?" for
the main camera and for each shadow-map cascade. This crate provides
the data structure that answers it: a dynamically grown tree of
box-shaped regions (an octree, or a footprint quadtree for mostly-flat
scenes) that prunes the working set down to the visible subset with
conservative AABB tests and an optional distance-based detail (LOD)
culling pass.

## Architecture

- **Aabb**: world-space axis-aligned bounding box; union, containment
  and apparent-size predicates
- **Frustum**: six culling planes extracted from a view-projection
  matrix, with 3-way inside/partial/outside classification
- **SpatialNode**: one box-shaped region holding elements and up to
  K lazily-created child regions
- **SpatialTree**: owns the root node, grows it when an element falls
  outside the current bounds, and exposes the query API

The tree never owns the renderables themselves. Callers keep their
objects in an arena (a `slotmap` is the intended fit) and hand the
tree copyable keys plus world-space AABBs; queries return keys.

## Example

```no_run
use cull_tree::{Octree, Aabb, Frustum};
use cull_tree::glam::{Mat4, Vec3};
use cull_tree::spatial::RenderableKey;
use slotmap::SlotMap;

let mut meshes: SlotMap<RenderableKey, ()> = SlotMap::with_key();
let key = meshes.insert(());

let mut tree: Octree<RenderableKey> =
    Octree::new(Vec3::splat(-100.0), Vec3::splat(100.0))?;
tree.insert(key, &Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0)));

let frustum = Frustum::from_view_projection(&Mat4::IDENTITY);
let visible = tree.visible_elements(&frustum);
# Ok::<(), cull_tree::Error>(())
```
*/

// Internal modules
mod error;
pub mod frustum;
pub mod log;
pub mod spatial;

// Error types
pub use error::{Error, Result};

// Frustum culling types
pub use frustum::{Frustum, FrustumTest, ClipConvention};

// Spatial index types
pub use spatial::{
    Aabb, DetailCullingParams, SpatialNode, SpatialTree, Octree, Quadtree,
};

// Re-export math library at crate root
pub use glam;
