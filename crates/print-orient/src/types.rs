//! Core mesh data type.

use nalgebra::Point3;

use crate::error::{OrientError, OrientResult};

/// A triangle mesh given as vertex positions plus an optional index buffer.
///
/// When `indices` is `None` the mesh is a triangle soup: every consecutive
/// vertex triple forms one triangle and a trailing partial triple is ignored.
///
/// Coordinates are typically in millimeters. The optimizer treats +Y as the
/// build direction ("up").
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions.
    pub vertices: Vec<Point3<f64>>,

    /// Triangles as indices into `vertices`.
    pub indices: Option<Vec<[u32; 3]>>,
}

impl Mesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an indexed mesh from parts without validation.
    ///
    /// Triangles with out-of-range indices are skipped during iteration.
    pub fn from_parts(vertices: Vec<Point3<f64>>, indices: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            indices: Some(indices),
        }
    }

    /// Create a triangle soup (no index buffer) from vertex positions.
    pub fn triangle_soup(vertices: Vec<Point3<f64>>) -> Self {
        Self {
            vertices,
            indices: None,
        }
    }

    /// Build a mesh from flat `f32` buffers, as produced by GPU/geometry exporters.
    ///
    /// # Errors
    ///
    /// Returns an error if `positions` does not hold whole triples, contains a
    /// non-finite coordinate, or `indices` is malformed.
    pub fn from_flat(positions: &[f32], indices: Option<&[u32]>) -> OrientResult<Self> {
        let widened: Vec<f64> = positions.iter().map(|&v| f64::from(v)).collect();
        Self::from_flat_f64(&widened, indices)
    }

    /// Build a mesh from flat `f64` buffers.
    ///
    /// # Errors
    ///
    /// See [`Mesh::from_flat`].
    pub fn from_flat_f64(positions: &[f64], indices: Option<&[u32]>) -> OrientResult<Self> {
        if positions.len() % 3 != 0 {
            return Err(OrientError::PositionBufferLength {
                len: positions.len(),
            });
        }

        let mut vertices = Vec::with_capacity(positions.len() / 3);
        for (vertex_index, chunk) in positions.chunks_exact(3).enumerate() {
            for (coordinate, &value) in ["x", "y", "z"].into_iter().zip(chunk) {
                if !value.is_finite() {
                    return Err(OrientError::InvalidCoordinate {
                        vertex_index,
                        coordinate,
                        value,
                    });
                }
            }
            vertices.push(Point3::new(chunk[0], chunk[1], chunk[2]));
        }

        let indices = match indices {
            None => None,
            Some(raw) => {
                if raw.len() % 3 != 0 {
                    return Err(OrientError::IndexBufferLength { len: raw.len() });
                }
                let mut triangles = Vec::with_capacity(raw.len() / 3);
                for (triangle_index, tri) in raw.chunks_exact(3).enumerate() {
                    if let Some(&bad) = tri.iter().find(|&&i| i as usize >= vertices.len()) {
                        return Err(OrientError::InvalidVertexIndex {
                            triangle_index,
                            vertex_index: bad,
                            vertex_count: vertices.len(),
                        });
                    }
                    triangles.push([tri[0], tri[1], tri[2]]);
                }
                Some(triangles)
            }
        };

        Ok(Self { vertices, indices })
    }

    /// Number of vertices in the mesh.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles, counting only those with valid indices.
    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(_) => self.triangles().count(),
            None => self.vertices.len() / 3,
        }
    }

    /// Check if mesh is empty (no vertices).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterate over triangles as `(triangle_index, [a, b, c])` vertex indices.
    ///
    /// `triangle_index` is the position in the index buffer (or the triple
    /// number of a soup), so it stays stable when malformed triangles are skipped.
    pub fn triangles(&self) -> Triangles<'_> {
        Triangles {
            mesh: self,
            next: 0,
        }
    }

    /// Compute the axis-aligned bounding box.
    /// Returns (min_corner, max_corner) or None if mesh is empty.
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = *self.vertices.first()?;
        let mut min = first;
        let mut max = first;

        for v in &self.vertices[1..] {
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            min.z = min.z.min(v.z);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
            max.z = max.z.max(v.z);
        }

        Some((min, max))
    }
}

/// Iterator over the valid triangles of a [`Mesh`].
#[derive(Debug, Clone)]
pub struct Triangles<'a> {
    mesh: &'a Mesh,
    next: usize,
}

impl Iterator for Triangles<'_> {
    type Item = (usize, [usize; 3]);

    fn next(&mut self) -> Option<Self::Item> {
        let vertex_count = self.mesh.vertices.len();
        match &self.mesh.indices {
            Some(indices) => {
                while let Some(tri) = indices.get(self.next) {
                    let index = self.next;
                    self.next += 1;
                    let [a, b, c] = tri.map(|i| i as usize);
                    if a < vertex_count && b < vertex_count && c < vertex_count {
                        return Some((index, [a, b, c]));
                    }
                }
                None
            }
            None => {
                let base = self.next * 3;
                if base + 2 < vertex_count {
                    let index = self.next;
                    self.next += 1;
                    Some((index, [base, base + 1, base + 2]))
                } else {
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_from_flat_indexed() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let mesh = Mesh::from_flat(&positions, Some(&[0, 1, 2][..])).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.triangles().next(), Some((0, [0, 1, 2])));
    }

    #[test]
    fn test_from_flat_soup_ignores_partial_triple() {
        let positions = [0.0f32; 15]; // five vertices -> one full triangle
        let mesh = Mesh::from_flat(&positions, None).unwrap();
        assert_eq!(mesh.vertex_count(), 5);
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_from_flat_rejects_bad_length() {
        let err = Mesh::from_flat(&[0.0, 1.0], None).unwrap_err();
        assert_eq!(err.code(), ErrorCode::PositionBufferLength);
    }

    #[test]
    fn test_from_flat_rejects_nan() {
        let err = Mesh::from_flat(&[0.0, f32::NAN, 0.0], None).unwrap_err();
        match err {
            OrientError::InvalidCoordinate {
                vertex_index,
                coordinate,
                ..
            } => {
                assert_eq!(vertex_index, 0);
                assert_eq!(coordinate, "y");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_flat_rejects_bad_indices() {
        let positions = [0.0; 9];
        let err = Mesh::from_flat(&positions, Some(&[0, 1][..])).unwrap_err();
        assert_eq!(err.code(), ErrorCode::IndexBufferLength);

        let err = Mesh::from_flat(&positions, Some(&[0, 1, 3][..])).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidVertexIndex);
    }

    #[test]
    fn test_triangles_skip_out_of_range() {
        let mesh = Mesh::from_parts(
            vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
            vec![[0, 1, 5], [0, 1, 2]],
        );
        let tris: Vec<_> = mesh.triangles().collect();
        assert_eq!(tris, vec![(1, [0, 1, 2])]);
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_bounds() {
        assert!(Mesh::new().bounds().is_none());

        let mesh = Mesh::triangle_soup(vec![
            Point3::new(-1.0, 2.0, 0.0),
            Point3::new(3.0, -4.0, 5.0),
            Point3::new(0.0, 0.0, -6.0),
        ]);
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, Point3::new(-1.0, -4.0, -6.0));
        assert_eq!(max, Point3::new(3.0, 2.0, 5.0));
    }
}
