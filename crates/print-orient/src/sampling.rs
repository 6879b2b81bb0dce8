//! Strided vertex subsampling for bounded-cost extent measurement.
//!
//! Extents (height and footprint) only need a representative subset of the
//! vertex cloud, so large meshes are thinned with a fixed stride before the
//! per-candidate rotation. Overhang detection never uses the sample.

use nalgebra::Point3;

/// Lower bound for the configured sample cap.
pub const MIN_VERTEX_SAMPLES: usize = 1_000;
/// Upper bound for the configured sample cap.
pub const MAX_VERTEX_SAMPLES: usize = 20_000;

/// Clamp a requested sample cap into the supported range.
#[inline]
pub fn clamp_vertex_samples(requested: usize) -> usize {
    requested.clamp(MIN_VERTEX_SAMPLES, MAX_VERTEX_SAMPLES)
}

/// Stride used to keep at most roughly `max_samples` vertices out of `n`.
///
/// `stride = max(1, floor(n / max_samples))`. A cap of zero is treated as one.
#[inline]
pub fn sample_stride(n: usize, max_samples: usize) -> usize {
    (n / max_samples.max(1)).max(1)
}

/// Iterate over every `stride`-th vertex without allocating.
pub fn sampled_vertices(
    vertices: &[Point3<f64>],
    max_samples: usize,
) -> impl ExactSizeIterator<Item = &Point3<f64>> + Clone {
    vertices
        .iter()
        .step_by(sample_stride(vertices.len(), max_samples))
}

/// Collect the strided sample into `out`, reusing its allocation.
pub fn sample_vertices_into(vertices: &[Point3<f64>], max_samples: usize, out: &mut Vec<Point3<f64>>) {
    out.clear();
    out.extend(sampled_vertices(vertices, max_samples).copied());
}

/// Collect the strided sample into a new vector.
///
/// An empty input yields an empty sample, which callers treat as "no geometry".
pub fn sample_vertices(vertices: &[Point3<f64>], max_samples: usize) -> Vec<Point3<f64>> {
    let mut out = Vec::new();
    sample_vertices_into(vertices, max_samples, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Vec<Point3<f64>> {
        (0..n).map(|i| Point3::new(i as f64, 0.0, 0.0)).collect()
    }

    #[test]
    fn test_stride_formula() {
        assert_eq!(sample_stride(0, 1000), 1);
        assert_eq!(sample_stride(999, 1000), 1);
        assert_eq!(sample_stride(2000, 1000), 2);
        assert_eq!(sample_stride(2999, 1000), 2);
        assert_eq!(sample_stride(10, 0), 10);
    }

    #[test]
    fn test_small_mesh_is_not_thinned() {
        let verts = line(8);
        assert_eq!(sample_vertices(&verts, 1000), verts);
    }

    #[test]
    fn test_large_mesh_is_strided() {
        let verts = line(5000);
        let sample = sample_vertices(&verts, 1000);
        assert_eq!(sample.len(), 1000);
        assert_eq!(sample[1].x, 5.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(sample_vertices(&[], 1000).is_empty());
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp_vertex_samples(10), MIN_VERTEX_SAMPLES);
        assert_eq!(clamp_vertex_samples(5000), 5000);
        assert_eq!(clamp_vertex_samples(1_000_000), MAX_VERTEX_SAMPLES);
    }

    #[test]
    fn test_into_reuses_buffer() {
        let mut out = Vec::with_capacity(16);
        sample_vertices_into(&line(4), 1000, &mut out);
        assert_eq!(out.len(), 4);
        sample_vertices_into(&line(2), 1000, &mut out);
        assert_eq!(out.len(), 2);
    }
}
