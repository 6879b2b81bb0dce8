//! Tracing extensions for orientation analysis.
//!
//! Structured logging and performance tracing built on the `tracing`
//! ecosystem:
//!
//! - **Performance spans**: operation timing via [`OperationTimer`]
//! - **Structured fields**: mesh dimensions, candidate counts, scores
//! - **Progress events**: per-candidate updates during the search
//!
//! # Usage
//!
//! Enable tracing by initializing a subscriber in your application:
//!
//! ```rust,ignore
//! use tracing_subscriber::{fmt, prelude::*, EnvFilter};
//!
//! tracing_subscriber::registry()
//!     .with(fmt::layer())
//!     .with(EnvFilter::from_default_env())
//!     .init();
//!
//! // Set RUST_LOG=print_orient=debug for detailed output
//! ```
//!
//! # Log Levels
//!
//! - **WARN**: search stopped early, solver did not converge
//! - **INFO**: operation summaries, timing, the chosen orientation
//! - **DEBUG**: phase transitions, new best candidates
//! - **TRACE**: every candidate evaluation

use std::time::Instant;
use tracing::{Span, debug, info, trace, warn};

use crate::Mesh;
use crate::optimizer::{OrientationResult, ResultSource};

/// A performance timer that logs duration on drop.
///
/// # Example
///
/// ```rust,ignore
/// use print_orient::tracing_ext::OperationTimer;
///
/// fn expensive_operation() {
///     let _timer = OperationTimer::new("expensive_operation");
///     // ... do work ...
/// } // Timer logs duration when dropped
/// ```
pub struct OperationTimer {
    name: &'static str,
    start: Instant,
    span: Span,
}

impl OperationTimer {
    /// Create a new operation timer.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!("orient_operation", operation = name);
        debug!(target: "print_orient::timing", operation = name, "Starting operation");
        Self {
            name,
            start: Instant::now(),
            span,
        }
    }

    /// Create a timer with mesh size fields.
    pub fn with_context(name: &'static str, triangle_count: usize, vertex_count: usize) -> Self {
        let span = tracing::info_span!(
            "orient_operation",
            operation = name,
            triangles = triangle_count,
            vertices = vertex_count
        );
        debug!(
            target: "print_orient::timing",
            operation = name,
            triangles = triangle_count,
            vertices = vertex_count,
            "Starting operation"
        );
        Self {
            name,
            start: Instant::now(),
            span,
        }
    }

    /// Get the elapsed time.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Get the span for this timer.
    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();
        info!(
            target: "print_orient::timing",
            operation = self.name,
            elapsed_ms = format!("{:.2}", elapsed_ms),
            "Operation completed"
        );
    }
}

/// Log mesh statistics at debug level.
pub fn log_mesh_stats(mesh: &Mesh, context: &str) {
    let (min_bounds, max_bounds) = mesh.bounds().unwrap_or_default();
    let dims = max_bounds - min_bounds;

    debug!(
        target: "print_orient::mesh_state",
        context = context,
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        indexed = mesh.indices.is_some(),
        dimensions = format!("{:.2} x {:.2} x {:.2}", dims.x, dims.y, dims.z),
        "Mesh state"
    );
}

/// Log one candidate evaluation at trace level.
pub fn log_candidate(index: usize, direction: &nalgebra::Vector3<f64>, score: f64, improved: bool) {
    trace!(
        target: "print_orient::search",
        candidate = index,
        direction = format!("({:.4}, {:.4}, {:.4})", direction.x, direction.y, direction.z),
        score = score,
        improved = improved,
        "Candidate evaluated"
    );
}

/// Log the final orientation.
pub fn log_orientation_result(result: &OrientationResult) {
    let up = result.up;
    match result.source {
        ResultSource::Empty => {
            info!(target: "print_orient::search", "No geometry to orient");
        }
        ResultSource::Search if !result.timed_out => {
            info!(
                target: "print_orient::search",
                up = format!("({:.4}, {:.4}, {:.4})", up.x, up.y, up.z),
                score = result.metrics.score,
                support_volume = result.metrics.support_volume,
                height = result.metrics.height,
                contact_area = result.metrics.contact_area,
                evaluated = result.candidates_evaluated,
                total = result.candidates_total,
                "Orientation found"
            );
        }
        _ => {
            warn!(
                target: "print_orient::search",
                up = format!("({:.4}, {:.4}, {:.4})", up.x, up.y, up.z),
                source = ?result.source,
                height = result.metrics.height,
                evaluated = result.candidates_evaluated,
                total = result.candidates_total,
                "Search stopped early; returning partial or fallback orientation"
            );
        }
    }
}

/// Log progress for the candidate loop.
pub fn log_progress(current: usize, total: usize, best_score: f64) {
    let percent = if total > 0 {
        (current as f64 / total as f64 * 100.0) as u32
    } else {
        0
    };

    debug!(
        target: "print_orient::progress",
        current = current,
        total = total,
        percent = percent,
        best_score = best_score,
        "Progress update"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_timer() {
        let timer = OperationTimer::new("test_operation");
        let first = timer.elapsed_ms();
        assert!(first >= 0.0);
        assert!(timer.elapsed_ms() >= first);
    }

    #[test]
    fn test_log_mesh_stats() {
        let mesh = Mesh::new();
        // Just verify it doesn't panic
        log_mesh_stats(&mesh, "test");
        log_progress(0, 0, f64::INFINITY);
    }
}
