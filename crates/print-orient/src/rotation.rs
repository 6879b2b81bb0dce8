//! Shortest-arc rotations onto the build direction.

use nalgebra::{Unit, UnitQuaternion, Vector3};
use std::f64::consts::PI;

/// World "up": the build direction after orientation.
#[inline]
pub fn world_up() -> Vector3<f64> {
    Vector3::y()
}

/// Rotation mapping `direction` onto world up along the shortest arc.
///
/// `direction` is normalized first; a zero vector maps to the identity.
/// The antiparallel case has no unique shortest arc and uses a half turn
/// about +X.
pub fn rotation_to_up(direction: &Vector3<f64>) -> UnitQuaternion<f64> {
    let Some(dir) = direction.try_normalize(f64::EPSILON) else {
        return UnitQuaternion::identity();
    };

    let up = world_up();
    if (dir + up).norm() < 1e-9 {
        return UnitQuaternion::from_axis_angle(&Vector3::x_axis(), PI);
    }

    UnitQuaternion::rotation_between(&dir, &up).unwrap_or_else(|| {
        // Only reachable for nearly antiparallel input that slipped past the
        // check above.
        let axis = Unit::try_new(dir.cross(&Vector3::x()), 1e-9).unwrap_or(Vector3::z_axis());
        UnitQuaternion::from_axis_angle(&axis, PI)
    })
}

/// The direction a rotation sends to world up (inverse image of +Y).
#[inline]
pub fn up_direction(rotation: &UnitQuaternion<f64>) -> Vector3<f64> {
    rotation.inverse_transform_vector(&world_up())
}
