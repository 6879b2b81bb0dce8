//! Automatic print-orientation optimizer for triangle meshes.
//!
//! Given a mesh destined for additive manufacturing, this crate finds the rigid
//! rotation that minimizes support material, keeps the print short and puts as
//! much area as possible on the bed, within a wall-clock budget.
//!
//! # Features
//!
//! - **Orientation search**: principal axes plus a Fibonacci sphere of
//!   candidate "up" directions, scored and ranked ([`compute_orientation`])
//! - **Anytime behavior**: stops at the time budget and falls back to a
//!   height-only principal-axis heuristic, so an answer is always returned
//! - **Overhang analysis**: per-triangle overhang/contact classification with
//!   support area, volume and weight estimates ([`detect_overhangs`])
//! - **Re-orientation**: rotate and drop the mesh onto the bed ([`apply_orientation`])
//! - **Configuration**: TOML/JSON options with the `config` feature
//!
//! # Units and Coordinate System
//!
//! **This library assumes millimeter (mm) units.** Support weight uses a
//! material density in g/mm³ (PLA by default).
//!
//! The build direction is **+Y**: an oriented mesh grows along Y and rests on
//! the plane at its minimum Y. Face winding is counter-clockwise when viewed
//! from outside, so normals point outward by the right-hand rule.
//!
//! # Quick Start
//!
//! ```
//! use print_orient::{Mesh, OrientOptions, OrientationMode, apply_orientation, compute_orientation};
//!
//! // Flat buffers as they come out of a geometry exporter.
//! let positions: [f32; 12] = [
//!     0.0, 0.0, 0.0,
//!     10.0, 0.0, 0.0,
//!     5.0, 0.0, 8.66,
//!     5.0, 8.0, 2.89,
//! ];
//! let indices: [u32; 12] = [0, 1, 2, 0, 3, 1, 1, 3, 2, 2, 3, 0];
//! let mesh = Mesh::from_flat(&positions, Some(&indices[..])).unwrap();
//!
//! let options = OrientOptions::default().with_max_duration_ms(500.0);
//! let result = compute_orientation(&mesh, OrientationMode::Upright, &options);
//!
//! println!(
//!     "up = {:?}, support = {:.1} mm³, height = {:.1} mm",
//!     result.up, result.metrics.support_volume, result.metrics.height
//! );
//! let oriented = apply_orientation(&mesh, &result);
//! assert_eq!(oriented.vertex_count(), mesh.vertex_count());
//! ```
//!
//! # Error Handling
//!
//! The optimizer never fails: degenerate geometry yields sentinels and an
//! exhausted budget sets [`OrientationResult::timed_out`]. Errors only arise
//! at the edges, when validating flat buffers ([`Mesh::from_flat`]) or loading
//! configuration, and carry machine-readable [`ErrorCode`]s.
//!
//! # Logging
//!
//! All operations emit `tracing` events under the `print_orient` target; see
//! [`tracing_ext`].

mod error;
mod types;

pub mod budget;
pub mod config;
pub mod directions;
pub mod extents;
pub mod optimizer;
pub mod overhang;
pub mod principal;
pub mod rotation;
pub mod sampling;
pub mod score;
pub mod tracing_ext;
pub mod transform;

// Re-export core types at crate root
pub use error::{ErrorCode, OrientError, OrientResult};
pub use types::{Mesh, Triangles};

pub use budget::{Progress, ProgressCallback, SearchBudget, SearchPhase};
pub use config::OrientOptions;
pub use directions::{candidate_directions, fibonacci_sphere};
pub use extents::{Extents, measure_extents};
pub use optimizer::{
    CandidateScore, OrientationResult, ResultSource, compute_orientation,
    compute_orientation_with_progress, evaluate_orientation,
};
pub use overhang::{
    OverhangDetector, OverhangParams, OverhangResult, OverhangSummary, detect_overhangs,
    detect_overhangs_with_params,
};
pub use principal::{JacobiParams, PrincipalAxes, analyze_principal_axes, principal_axes};
pub use rotation::{rotation_to_up, up_direction, world_up};
pub use sampling::sample_vertices;
pub use score::{OrientationMetrics, OrientationMode, ScoreWeights, score_orientation};
pub use transform::{apply_orientation, place_on_bed, rotate_mesh};
