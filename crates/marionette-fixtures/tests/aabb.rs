//! Bounding-box computation on a loaded humanoid model.
//!
//! The humanoid's base is movable, so its bounding box depends on the
//! root translation bounds: the box at the current placements, swept over
//! the bounded base range.

use marionette_fixtures::{FixtureKind, make};
use marionette_model::Robot;

fn assets_prefix() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets")
}

fn load_humanoid() -> Robot {
    let mut robot = make(FixtureKind::Humanoid, assets_prefix()).unwrap();
    robot.compute_forward_kinematics().unwrap();
    robot
}

#[test]
fn compute_aabb_tracks_root_bounds() {
    let mut robot = load_humanoid();

    // Base pinned at the origin: the box is just the body geometry.
    robot
        .model_mut()
        .set_root_translation_bounds(&[0.0; 3], &[0.0; 3])
        .unwrap();
    let aabb0 = robot.compute_aabb();
    assert!(aabb0.is_finite());
    assert!(aabb0.extents().norm() > 0.0);

    // Base free in a 2x2 ground patch: the box grows by the patch.
    robot
        .model_mut()
        .set_root_translation_bounds(&[-1.0, -1.0, 0.0], &[1.0, 1.0, 0.0])
        .unwrap();
    let aabb1 = robot.compute_aabb();
    assert!(aabb1.contains(&aabb0));
    let grown = aabb1.extents() - aabb0.extents();
    assert!((grown.x - 2.0).abs() < 1e-5);
    assert!((grown.y - 2.0).abs() < 1e-5);
    assert!(grown.z.abs() < 1e-5);

    // Base confined to a corner patch: same size as the pinned box plus
    // the patch, but shifted off-center.
    robot
        .model_mut()
        .set_root_translation_bounds(&[-2.0, -2.0, 0.0], &[-1.0, -1.0, 0.0])
        .unwrap();
    let aabb2 = robot.compute_aabb();
    assert!(aabb2.min.x < aabb0.min.x);
    assert!(aabb2.max.x < aabb0.max.x);
    assert!(aabb1.min.x < aabb2.max.x);
}

#[test]
fn humanoid_stands_through_the_ground_plane() {
    let mut robot = load_humanoid();
    robot
        .model_mut()
        .set_root_translation_bounds(&[0.0; 3], &[0.0; 3])
        .unwrap();
    let aabb = robot.compute_aabb();
    // Head above the base origin, feet below it.
    assert!(aabb.max.z > 0.0);
    assert!(aabb.min.z < 0.0);
}
