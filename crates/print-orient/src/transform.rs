//! Applying an orientation to a mesh.
//!
//! The optimizer never mutates its input; these helpers produce the re-oriented
//! copy a slicer expects: rotated so the chosen direction points along +Y and
//! translated so it rests on the bed plane `y = 0`.

use nalgebra::UnitQuaternion;

use crate::Mesh;
use crate::optimizer::OrientationResult;

/// Rotate every vertex of a mesh. Triangle indices are unchanged.
#[must_use]
pub fn rotate_mesh(mesh: &Mesh, rotation: &UnitQuaternion<f64>) -> Mesh {
    let rot = rotation.to_rotation_matrix();
    Mesh {
        vertices: mesh.vertices.iter().map(|p| rot * p).collect(),
        indices: mesh.indices.clone(),
    }
}

/// Translate a mesh so its minimum Y is 0.
#[must_use]
pub fn place_on_bed(mesh: &Mesh) -> Mesh {
    let mut result = mesh.clone();
    place_on_bed_in_place(&mut result);
    result
}

/// In-place variant of [`place_on_bed`].
pub fn place_on_bed_in_place(mesh: &mut Mesh) {
    let min_y = mesh
        .vertices
        .iter()
        .map(|p| p.y)
        .fold(f64::INFINITY, f64::min);
    if !min_y.is_finite() {
        return;
    }
    for p in &mut mesh.vertices {
        p.y -= min_y;
    }
}

/// Rotate a mesh by an optimizer result and place it on the bed.
#[must_use]
pub fn apply_orientation(mesh: &Mesh, result: &OrientationResult) -> Mesh {
    let mut oriented = rotate_mesh(mesh, &result.rotation);
    place_on_bed_in_place(&mut oriented);
    oriented
}
