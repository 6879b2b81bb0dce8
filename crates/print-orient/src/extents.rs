//! Height and footprint of a rotated vertex cloud.

use nalgebra::{Point3, UnitQuaternion};

/// Extents of a mesh after rotation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
pub struct Extents {
    /// Span along world Y (print height).
    pub height: f64,
    /// Area of the X-Z bounding rectangle.
    pub footprint_area: f64,
}

/// Measure extents of `points` under `rotation` without allocating.
///
/// An empty point set has zero extents.
pub fn measure_extents<'a>(
    points: impl IntoIterator<Item = &'a Point3<f64>>,
    rotation: &UnitQuaternion<f64>,
) -> Extents {
    let rot = rotation.to_rotation_matrix();
    let mut min = Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
    let mut max = Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
    let mut any = false;

    for p in points {
        let r = rot * p;
        min = min.inf(&r);
        max = max.sup(&r);
        any = true;
    }

    if !any {
        return Extents::default();
    }

    let span = max - min;
    Extents {
        height: span.y.max(0.0),
        footprint_area: (span.x * span.z).max(0.0),
    }
}
