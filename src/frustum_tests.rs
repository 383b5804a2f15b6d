use glam::{Mat4, Vec3};
use crate::spatial::Aabb;
use super::*;

fn perspective_gl(fov: f32, near: f32, far: f32, eye: Vec3) -> Frustum {
    let projection = Mat4::perspective_rh_gl(fov, 1.0, near, far);
    let view = Mat4::look_at_rh(eye, eye + Vec3::new(0.0, 0.0, -1.0), Vec3::Y);
    Frustum::from_view_projection(&(projection * view))
}

// ============================================================================
// Frustum::from_view_projection
// ============================================================================

#[test]
fn test_frustum_from_identity_matrix() {
    let frustum = Frustum::from_view_projection(&Mat4::IDENTITY);

    // Identity VP → NDC cube: x,y,z in [-1, 1]
    // All 6 planes should exist and be normalized
    for plane in &frustum.planes {
        let normal_len = Vec3::new(plane.x, plane.y, plane.z).length();
        assert!((normal_len - 1.0).abs() < 1e-5, "plane normal should be unit length");
    }
}

#[test]
fn test_frustum_from_perspective_projection() {
    let projection = Mat4::perspective_rh_gl(
        std::f32::consts::FRAC_PI_4, // 45° FOV
        16.0 / 9.0,                  // aspect ratio
        0.1,                         // near
        100.0,                       // far
    );
    let view = Mat4::look_at_rh(
        Vec3::new(0.0, 0.0, 5.0),   // eye
        Vec3::ZERO,                  // target
        Vec3::Y,                     // up
    );
    let vp = projection * view;

    let frustum = Frustum::from_view_projection(&vp);

    // Planes should be normalized
    for plane in &frustum.planes {
        let normal_len = Vec3::new(plane.x, plane.y, plane.z).length();
        assert!((normal_len - 1.0).abs() < 1e-4, "plane normal should be unit length");
    }
}

#[test]
fn test_frustum_from_orthographic_projection() {
    let projection = Mat4::orthographic_rh_gl(
        -10.0, 10.0, // left, right
        -10.0, 10.0, // bottom, top
        0.1, 100.0,  // near, far
    );
    let vp = projection * Mat4::IDENTITY;

    let frustum = Frustum::from_view_projection(&vp);

    // All planes should be normalized
    for plane in &frustum.planes {
        let normal_len = Vec3::new(plane.x, plane.y, plane.z).length();
        assert!((normal_len - 1.0).abs() < 1e-4, "plane normal should be unit length");
    }
}

// ============================================================================
// ClipConvention
// ============================================================================

#[test]
fn test_zero_to_one_near_plane() {
    // glam's orthographic_rh maps depth to [0, 1]
    let projection = Mat4::orthographic_rh(-5.0, 5.0, -5.0, 5.0, 0.1, 100.0);
    let frustum = Frustum::from_view_projection_with(
        &projection,
        ClipConvention::ZeroToOne,
    );

    // Between the camera and the near plane (z > -0.1): outside
    let before_near = Aabb::new(Vec3::new(-1.0, -1.0, -0.05), Vec3::new(1.0, 1.0, 0.0));
    assert!(!frustum.intersects_aabb(&before_near));

    // Past the near plane: inside
    let past_near = Aabb::new(Vec3::new(-1.0, -1.0, -2.0), Vec3::new(1.0, 1.0, -1.0));
    assert!(frustum.intersects_aabb(&past_near));
}

#[test]
fn test_negative_one_to_one_near_plane() {
    // glam's orthographic_rh_gl maps depth to [-1, 1]
    let projection = Mat4::orthographic_rh_gl(-5.0, 5.0, -5.0, 5.0, 0.1, 100.0);
    let frustum = Frustum::from_view_projection_with(
        &projection,
        ClipConvention::NegativeOneToOne,
    );

    let before_near = Aabb::new(Vec3::new(-1.0, -1.0, -0.05), Vec3::new(1.0, 1.0, 0.0));
    assert!(!frustum.intersects_aabb(&before_near));

    let past_near = Aabb::new(Vec3::new(-1.0, -1.0, -2.0), Vec3::new(1.0, 1.0, -1.0));
    assert!(frustum.intersects_aabb(&past_near));
}

#[test]
fn test_convention_default_is_negative_one_to_one() {
    assert_eq!(ClipConvention::default(), ClipConvention::NegativeOneToOne);
}

// ============================================================================
// Frustum::intersects_aabb
// ============================================================================

#[test]
fn test_aabb_inside_frustum() {
    let frustum = perspective_gl(
        std::f32::consts::FRAC_PI_2, 0.1, 100.0, Vec3::new(0.0, 0.0, 5.0),
    );

    // AABB at the origin — should be inside the frustum
    let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));

    assert!(frustum.intersects_aabb(&aabb));
}

#[test]
fn test_aabb_outside_frustum() {
    let frustum = perspective_gl(
        std::f32::consts::FRAC_PI_4, 0.1, 100.0, Vec3::new(0.0, 0.0, 5.0),
    );

    // AABB far to the right — should be outside the frustum
    let aabb = Aabb::new(Vec3::splat(100.0), Vec3::splat(101.0));

    assert!(!frustum.intersects_aabb(&aabb));
}

#[test]
fn test_aabb_behind_camera() {
    let frustum = perspective_gl(
        std::f32::consts::FRAC_PI_2, 0.1, 100.0, Vec3::new(0.0, 0.0, 5.0),
    );

    // AABB behind the camera (z > 5)
    let aabb = Aabb::new(Vec3::new(-1.0, -1.0, 10.0), Vec3::new(1.0, 1.0, 12.0));

    assert!(!frustum.intersects_aabb(&aabb));
}

#[test]
fn test_aabb_beyond_far_plane() {
    let frustum = perspective_gl(
        std::f32::consts::FRAC_PI_2, 0.1, 10.0, Vec3::new(0.0, 0.0, 5.0),
    );

    // AABB beyond far plane (more than 10 units from camera)
    let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -20.0), Vec3::new(1.0, 1.0, -18.0));

    assert!(!frustum.intersects_aabb(&aabb));
}

#[test]
fn test_aabb_intersecting_frustum_boundary() {
    let projection = Mat4::orthographic_rh_gl(
        -5.0, 5.0,
        -5.0, 5.0,
        0.1, 100.0,
    );
    let frustum = Frustum::from_view_projection(&projection);

    // AABB partially inside (straddles the right boundary at x=5)
    let aabb = Aabb::new(Vec3::new(4.0, 0.0, -10.0), Vec3::new(6.0, 1.0, -5.0));

    assert!(frustum.intersects_aabb(&aabb));
}

// ============================================================================
// Frustum::classify_aabb
// ============================================================================

#[test]
fn test_classify_fully_inside() {
    let projection = Mat4::orthographic_rh_gl(-10.0, 10.0, -10.0, 10.0, 0.1, 100.0);
    let frustum = Frustum::from_view_projection(&projection);

    let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -10.0), Vec3::new(1.0, 1.0, -5.0));
    assert_eq!(frustum.classify_aabb(&aabb), FrustumTest::Inside);
}

#[test]
fn test_classify_partial() {
    let projection = Mat4::orthographic_rh_gl(-10.0, 10.0, -10.0, 10.0, 0.1, 100.0);
    let frustum = Frustum::from_view_projection(&projection);

    // Straddles the right boundary at x=10
    let aabb = Aabb::new(Vec3::new(8.0, -1.0, -10.0), Vec3::new(12.0, 1.0, -5.0));
    assert_eq!(frustum.classify_aabb(&aabb), FrustumTest::Partial);
}

#[test]
fn test_classify_outside() {
    let projection = Mat4::orthographic_rh_gl(-10.0, 10.0, -10.0, 10.0, 0.1, 100.0);
    let frustum = Frustum::from_view_projection(&projection);

    let aabb = Aabb::new(Vec3::new(50.0, -1.0, -10.0), Vec3::new(52.0, 1.0, -5.0));
    assert_eq!(frustum.classify_aabb(&aabb), FrustumTest::Outside);
}

#[test]
fn test_classify_inside_implies_intersects() {
    let frustum = perspective_gl(
        std::f32::consts::FRAC_PI_2, 0.1, 100.0, Vec3::new(0.0, 0.0, 5.0),
    );
    let aabb = Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5));

    if frustum.classify_aabb(&aabb) == FrustumTest::Inside {
        assert!(frustum.intersects_aabb(&aabb));
    }
}

// ============================================================================
// Near-plane handling for shadow cascades
// ============================================================================

#[test]
fn test_ignoring_near_keeps_caster_behind_near_plane() {
    let projection = Mat4::orthographic_rh_gl(-5.0, 5.0, -5.0, 5.0, 1.0, 100.0);
    let frustum = Frustum::from_view_projection(&projection);

    // Between the camera and the near plane: culled by the near plane,
    // but a shadow caster there still casts into the volume.
    let caster = Aabb::new(Vec3::new(-1.0, -1.0, -0.5), Vec3::new(1.0, 1.0, -0.2));
    assert!(!frustum.intersects_aabb(&caster));
    assert!(frustum.intersects_aabb_ignoring_near(&caster));
}

#[test]
fn test_ignoring_near_still_culls_sideways() {
    let projection = Mat4::orthographic_rh_gl(-5.0, 5.0, -5.0, 5.0, 1.0, 100.0);
    let frustum = Frustum::from_view_projection(&projection);

    let aabb = Aabb::new(Vec3::new(50.0, 0.0, -10.0), Vec3::new(51.0, 1.0, -9.0));
    assert!(!frustum.intersects_aabb_ignoring_near(&aabb));
}

// ============================================================================
// intersects_any (cascade lists)
// ============================================================================

#[test]
fn test_intersects_any_matches_one_cascade() {
    let near_cascade = Frustum::from_view_projection(
        &Mat4::orthographic_rh_gl(-5.0, 5.0, -5.0, 5.0, 0.1, 10.0),
    );
    let far_cascade = Frustum::from_view_projection(
        &Mat4::orthographic_rh_gl(-20.0, 20.0, -20.0, 20.0, 10.0, 100.0),
    );
    let cascades = [near_cascade, far_cascade];

    // Only in the far cascade's depth range and footprint
    let aabb = Aabb::new(Vec3::new(10.0, 0.0, -50.0), Vec3::new(12.0, 1.0, -45.0));
    assert!(!near_cascade.intersects_aabb(&aabb));
    assert!(intersects_any(&cascades, &aabb, false));
}

#[test]
fn test_intersects_any_rejects_when_outside_all() {
    let cascades = [
        Frustum::from_view_projection(
            &Mat4::orthographic_rh_gl(-5.0, 5.0, -5.0, 5.0, 0.1, 10.0),
        ),
        Frustum::from_view_projection(
            &Mat4::orthographic_rh_gl(-20.0, 20.0, -20.0, 20.0, 10.0, 100.0),
        ),
    ];

    let aabb = Aabb::new(Vec3::new(500.0, 500.0, 500.0), Vec3::new(501.0, 501.0, 501.0));
    assert!(!intersects_any(&cascades, &aabb, false));
    assert!(!intersects_any(&cascades, &aabb, true));
}

// ============================================================================
// Plane constants
// ============================================================================

#[test]
fn test_plane_constants() {
    assert_eq!(PLANE_LEFT, 0);
    assert_eq!(PLANE_RIGHT, 1);
    assert_eq!(PLANE_BOTTOM, 2);
    assert_eq!(PLANE_TOP, 3);
    assert_eq!(PLANE_NEAR, 4);
    assert_eq!(PLANE_FAR, 5);
}
