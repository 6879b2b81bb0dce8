//! JSON transport for flat mesh buffers.
//!
//! A mesh document is `{"positions": [x, y, z, ...], "indices": [a, b, c, ...]}`
//! with `indices` optional (triangle soup when absent).

use std::path::Path;

use anyhow::{Context, Result};
use print_orient::Mesh;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct MeshDocument {
    positions: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    indices: Option<Vec<u32>>,
}

/// Load and validate a mesh document.
pub fn load_mesh(path: &Path) -> Result<Mesh> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let doc: MeshDocument = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse mesh document {:?}", path))?;
    let mesh = Mesh::from_flat_f64(&doc.positions, doc.indices.as_deref())
        .with_context(|| format!("Invalid mesh buffers in {:?}", path))?;
    debug!(
        path = %path.display(),
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "Loaded mesh document"
    );
    Ok(mesh)
}

/// Write a mesh document.
pub fn save_mesh(path: &Path, mesh: &Mesh) -> Result<()> {
    let doc = MeshDocument {
        positions: mesh.vertices.iter().flat_map(|p| [p.x, p.y, p.z]).collect(),
        indices: mesh
            .indices
            .as_ref()
            .map(|tris| tris.iter().flatten().copied().collect()),
    };
    let json = serde_json::to_string(&doc).context("Failed to serialize mesh")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use print_orient::{ErrorCode, OrientError};
    use tempfile::tempdir;

    #[test]
    fn test_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tri.json");
        std::fs::write(&path, r#"{"positions": [0, 0, 0, 1, 0, 0, 0, 0, 1], "indices": [0, 1, 2]}"#)
            .unwrap();

        let mesh = load_mesh(&path).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);

        let out = dir.path().join("out.json");
        save_mesh(&out, &mesh).unwrap();
        assert_eq!(load_mesh(&out).unwrap(), mesh);
    }

    #[test]
    fn test_soup_without_indices() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("soup.json");
        std::fs::write(&path, r#"{"positions": [0, 0, 0, 1, 0, 0, 0, 0, 1]}"#).unwrap();
        let mesh = load_mesh(&path).unwrap();
        assert!(mesh.indices.is_none());
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_invalid_buffers_keep_error_code() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"positions": [0, 0, 0, 1]}"#).unwrap();
        let err = load_mesh(&path).unwrap_err();
        let orient_err = err
            .chain()
            .find_map(|c| c.downcast_ref::<OrientError>())
            .unwrap();
        assert_eq!(orient_err.code(), ErrorCode::PositionBufferLength);
    }
}
