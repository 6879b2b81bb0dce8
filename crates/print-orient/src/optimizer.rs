//! Time-budgeted orientation search.
//!
//! The optimizer runs in four phases:
//!
//! 1. **Sampling**: thin the vertex cloud, compute principal axes, generate
//!    candidate "up" directions.
//! 2. **Evaluating**: for each candidate, rotate it onto +Y, measure extents on
//!    the sample and overhangs on the full mesh, and score. The lowest score
//!    wins; a later candidate replaces the best only if it is lower by more
//!    than `1e-6`, so ties keep the earliest candidate.
//! 3. **Finalizing**: if the budget ran out (or a progress callback asked to
//!    stop) before the search finished, or nothing could be scored, a cheap
//!    height-only heuristic over the signed principal axes picks the result.
//! 4. **Done**.
//!
//! The budget is checked before each candidate, never inside one, so a single
//! evaluation on a huge mesh may overrun it. The search never fails.
//!
//! # Example
//!
//! ```
//! use nalgebra::Point3;
//! use print_orient::{Mesh, OrientOptions, OrientationMode, compute_orientation};
//!
//! // A thin slab lying on its broad face.
//! let mesh = Mesh::from_parts(
//!     vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(20.0, 0.0, 0.0),
//!         Point3::new(20.0, 0.0, 10.0),
//!         Point3::new(0.0, 0.0, 10.0),
//!     ],
//!     vec![[0, 1, 3], [1, 2, 3]],
//! );
//!
//! let result = compute_orientation(&mesh, OrientationMode::Upright, &OrientOptions::default());
//! assert!(!result.timed_out);
//! assert!(result.metrics.height.abs() < 1e-6);
//! ```

use nalgebra::{Point3, UnitQuaternion, Vector3};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::Mesh;
use crate::budget::{Progress, ProgressCallback, SearchBudget, SearchPhase, report};
use crate::config::OrientOptions;
use crate::directions::candidate_directions;
use crate::extents::measure_extents;
use crate::overhang::{OverhangDetector, OverhangParams};
use crate::principal::analyze_principal_axes;
use crate::rotation::{rotation_to_up, world_up};
use crate::sampling::sample_vertices;
use crate::score::{OrientationMetrics, OrientationMode, ScoreWeights, score_orientation};
use crate::tracing_ext::{OperationTimer, log_candidate, log_mesh_stats, log_orientation_result, log_progress};

/// A candidate must beat the best score by more than this to replace it.
const SCORE_EPSILON: f64 = 1e-6;

/// Candidates per rayon worker in each parallel batch.
const PARALLEL_BATCH_FACTOR: usize = 4;

/// Emit a debug progress event every this many candidates.
const PROGRESS_LOG_INTERVAL: usize = 16;

/// Where the final orientation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSource {
    /// Best fully evaluated candidate of a completed search.
    Search,
    /// Height-only heuristic, after the search stopped early or scored nothing.
    Fallback,
    /// No vertices; identity rotation with an infinite score.
    Empty,
}

impl ResultSource {
    /// Lowercase name for reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultSource::Search => "search",
            ResultSource::Fallback => "fallback",
            ResultSource::Empty => "empty",
        }
    }
}

impl std::fmt::Display for ResultSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scored candidate direction.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateScore {
    /// Candidate "up" direction (unit length).
    pub up: Vector3<f64>,
    /// Rotation taking `up` onto world +Y.
    pub rotation: UnitQuaternion<f64>,
    /// Metrics under `rotation`.
    pub metrics: OrientationMetrics,
}

/// Outcome of an orientation search.
#[derive(Debug, Clone, PartialEq)]
pub struct OrientationResult {
    /// Rotation to apply to the mesh before printing.
    pub rotation: UnitQuaternion<f64>,
    /// Mesh direction that ends up pointing along +Y.
    pub up: Vector3<f64>,
    /// Metrics of the chosen orientation.
    pub metrics: OrientationMetrics,
    /// The search stopped early, or no candidate produced a comparable score.
    pub timed_out: bool,
    /// Which path produced the rotation.
    pub source: ResultSource,
    /// Candidates fully evaluated.
    pub candidates_evaluated: usize,
    /// Candidates generated.
    pub candidates_total: usize,
    /// Lowest-scoring evaluated candidates other than the chosen one, best first.
    pub alternatives: Vec<CandidateScore>,
}

impl OrientationResult {
    /// Result for a mesh with no vertices.
    pub fn empty() -> Self {
        Self {
            rotation: UnitQuaternion::identity(),
            up: world_up(),
            metrics: OrientationMetrics::sentinel(),
            timed_out: false,
            source: ResultSource::Empty,
            candidates_evaluated: 0,
            candidates_total: 0,
            alternatives: Vec::new(),
        }
    }

    /// Whether the result is the empty-mesh sentinel.
    pub fn is_empty(&self) -> bool {
        self.source == ResultSource::Empty
    }

    /// Whether the height-only heuristic chose the rotation.
    pub fn used_fallback(&self) -> bool {
        self.source == ResultSource::Fallback
    }
}

/// Find the rotation that minimizes support, height and lack of bed contact.
///
/// Equivalent to [`compute_orientation_with_progress`] without a callback.
pub fn compute_orientation(mesh: &Mesh, mode: OrientationMode, options: &OrientOptions) -> OrientationResult {
    compute_orientation_with_progress(mesh, mode, options, None)
}

/// Find the best rotation, reporting progress to an optional callback.
///
/// The callback is invoked on every phase change and after every evaluated
/// candidate. Returning `false` stops the search the same way an exhausted
/// budget does: `timed_out` is set and the fallback heuristic picks the result.
pub fn compute_orientation_with_progress(
    mesh: &Mesh,
    mode: OrientationMode,
    options: &OrientOptions,
    progress: Option<&ProgressCallback>,
) -> OrientationResult {
    if mesh.vertices.is_empty() {
        debug!(target: "print_orient::search", "Empty mesh, returning identity");
        return OrientationResult::empty();
    }

    // The clock covers everything below, logging included.
    let budget = SearchBudget::from_millis(options.max_duration_ms);

    let timer = OperationTimer::with_context("compute_orientation", mesh.triangle_count(), mesh.vertex_count());
    let _enter = timer.span().enter();
    log_mesh_stats(mesh, "compute_orientation");

    let options = options.normalized();
    let search = Search {
        mesh,
        mode,
        options: &options,
        budget,
        progress,
    };
    let result = search.run();

    log_orientation_result(&result);
    result
}

/// Score a single rotation with the same measurements the search uses.
///
/// An empty mesh yields the sentinel metrics.
pub fn evaluate_orientation(
    mesh: &Mesh,
    rotation: &UnitQuaternion<f64>,
    mode: OrientationMode,
    options: &OrientOptions,
) -> OrientationMetrics {
    if mesh.vertices.is_empty() {
        return OrientationMetrics::sentinel();
    }

    let options = options.normalized();
    let sample = sample_vertices(&mesh.vertices, options.vertex_samples);
    let evaluator = Evaluator {
        mesh,
        sample: &sample,
        mode,
        overhang: options.overhang,
        weights: options.weights,
    };
    let mut detector = evaluator.detector();
    evaluator.score(&mut detector, rotation)
}

/// Per-invocation measurement state shared by all candidates.
struct Evaluator<'a> {
    mesh: &'a Mesh,
    sample: &'a [Point3<f64>],
    mode: OrientationMode,
    overhang: OverhangParams,
    weights: ScoreWeights,
}

impl Evaluator<'_> {
    fn detector(&self) -> OverhangDetector {
        OverhangDetector::with_capacity(self.overhang, self.mesh.vertex_count())
    }

    fn score(&self, detector: &mut OverhangDetector, rotation: &UnitQuaternion<f64>) -> OrientationMetrics {
        let extents = measure_extents(self.sample, rotation);
        let overhang = detector.measure(self.mesh, rotation);
        score_orientation(&extents, &overhang, self.mode, &self.weights)
    }

    fn evaluate(&self, detector: &mut OverhangDetector, up: &Vector3<f64>) -> CandidateScore {
        let rotation = rotation_to_up(up);
        let metrics = self.score(detector, &rotation);
        CandidateScore {
            up: *up,
            rotation,
            metrics,
        }
    }

    /// Height-only scoring: no overhang pass, support and contact are zero.
    fn height_only(&self, up: Vector3<f64>) -> CandidateScore {
        let rotation = rotation_to_up(&up);
        let extents = measure_extents(self.sample, &rotation);
        CandidateScore {
            up,
            rotation,
            metrics: OrientationMetrics {
                support_volume: 0.0,
                support_weight: 0.0,
                height: extents.height,
                footprint_area: extents.footprint_area,
                contact_area: 0.0,
                score: self.weights.height_only_score(extents.height, self.mode),
            },
        }
    }

    /// Minimum-height orientation over `±axes`, or +Y when there are no axes.
    fn fallback(&self, axes: &[Vector3<f64>]) -> CandidateScore {
        axes.iter()
            .flat_map(|a| [*a, -*a])
            .map(|up| self.height_only(up))
            .fold(None::<CandidateScore>, |best, candidate| match best {
                Some(b) if candidate.metrics.height >= b.metrics.height - SCORE_EPSILON => Some(b),
                _ => Some(candidate),
            })
            .unwrap_or_else(|| self.height_only(world_up()))
    }
}

/// Evaluated candidates in generation order plus the index of the best.
struct Tracker {
    evaluated: Vec<CandidateScore>,
    best: Option<usize>,
    total: usize,
}

impl Tracker {
    fn new(total: usize) -> Self {
        Self {
            evaluated: Vec::with_capacity(total),
            best: None,
            total,
        }
    }

    fn best_score(&self) -> f64 {
        self.best
            .map_or(f64::INFINITY, |i| self.evaluated[i].metrics.score)
    }

    /// Record a candidate; returns whether it became the new best.
    fn offer(&mut self, candidate: CandidateScore) -> bool {
        let improved = candidate.metrics.score < self.best_score() - SCORE_EPSILON;
        if improved {
            self.best = Some(self.evaluated.len());
        }
        self.evaluated.push(candidate);
        improved
    }

    /// Best-first runners-up, excluding the chosen candidate.
    fn alternatives(&self, exclude: Option<usize>, limit: usize) -> Vec<CandidateScore> {
        let mut ranked: Vec<&CandidateScore> = self
            .evaluated
            .iter()
            .enumerate()
            .filter(|(i, c)| Some(*i) != exclude && !c.metrics.score.is_nan())
            .map(|(_, c)| c)
            .collect();
        // Stable: equal scores stay in generation order.
        ranked.sort_by(|a, b| a.metrics.score.total_cmp(&b.metrics.score));
        ranked.into_iter().take(limit).cloned().collect()
    }
}

struct Search<'a> {
    mesh: &'a Mesh,
    mode: OrientationMode,
    options: &'a OrientOptions,
    budget: SearchBudget,
    progress: Option<&'a ProgressCallback>,
}

impl Search<'_> {
    fn report(&self, phase: SearchPhase, current: usize, total: usize, best_score: f64) -> bool {
        report(self.progress, || Progress {
            phase,
            current: current as u64,
            total: total as u64,
            best_score,
            elapsed: self.budget.elapsed(),
        })
    }

    fn run(&self) -> OrientationResult {
        let mut stopped = !self.report(SearchPhase::Sampling, 0, 0, f64::INFINITY);

        let sample = sample_vertices(&self.mesh.vertices, self.options.vertex_samples);
        let axes = analyze_principal_axes(&sample, &self.options.jacobi);
        if !axes.converged {
            warn!(
                target: "print_orient::search",
                sweeps = axes.sweeps,
                "Principal-axis solver hit its sweep cap before converging"
            );
        }
        let candidates = candidate_directions(&axes.axes, self.options.direction_samples);
        debug!(
            target: "print_orient::search",
            sampled_vertices = sample.len(),
            axes = axes.axes.len(),
            candidates = candidates.len(),
            "Candidates generated"
        );

        let evaluator = Evaluator {
            mesh: self.mesh,
            sample: &sample,
            mode: self.mode,
            overhang: self.options.overhang,
            weights: self.options.weights,
        };
        let mut tracker = Tracker::new(candidates.len());

        if !stopped {
            stopped = !self.report(SearchPhase::Evaluating, 0, candidates.len(), f64::INFINITY);
        }
        if !stopped {
            stopped = if self.options.parallel {
                self.evaluate_parallel(&evaluator, &candidates, &mut tracker)
            } else {
                self.evaluate_sequential(&evaluator, &candidates, &mut tracker)
            };
        }

        self.report(
            SearchPhase::Finalizing,
            tracker.evaluated.len(),
            candidates.len(),
            tracker.best_score(),
        );

        let result = match tracker.best {
            Some(best) if !stopped => {
                let chosen = &tracker.evaluated[best];
                OrientationResult {
                    rotation: chosen.rotation,
                    up: chosen.up,
                    metrics: chosen.metrics,
                    timed_out: false,
                    source: ResultSource::Search,
                    candidates_evaluated: tracker.evaluated.len(),
                    candidates_total: candidates.len(),
                    alternatives: tracker.alternatives(Some(best), self.options.max_alternatives),
                }
            }
            _ => {
                debug!(
                    target: "print_orient::search",
                    evaluated = tracker.evaluated.len(),
                    stopped,
                    "Running height-only fallback"
                );
                let chosen = evaluator.fallback(&axes.axes);
                OrientationResult {
                    rotation: chosen.rotation,
                    up: chosen.up,
                    metrics: chosen.metrics,
                    // Also set when no candidate produced a comparable score.
                    timed_out: stopped || tracker.best.is_none(),
                    source: ResultSource::Fallback,
                    candidates_evaluated: tracker.evaluated.len(),
                    candidates_total: candidates.len(),
                    alternatives: tracker.alternatives(None, self.options.max_alternatives),
                }
            }
        };

        self.report(
            SearchPhase::Done,
            result.candidates_evaluated,
            result.candidates_total,
            result.metrics.score,
        );
        result
    }

    /// Evaluate one candidate at a time. Returns `true` if stopped early.
    fn evaluate_sequential(
        &self,
        evaluator: &Evaluator<'_>,
        candidates: &[Vector3<f64>],
        tracker: &mut Tracker,
    ) -> bool {
        let mut detector = evaluator.detector();
        for up in candidates {
            if self.budget.is_exhausted() {
                self.log_budget_exhausted(tracker);
                return true;
            }
            let candidate = evaluator.evaluate(&mut detector, up);
            if !self.record(tracker, candidate) {
                return true;
            }
        }
        false
    }

    /// Evaluate batches on the rayon pool. The budget is checked between
    /// batches; results are recorded in generation order.
    fn evaluate_parallel(
        &self,
        evaluator: &Evaluator<'_>,
        candidates: &[Vector3<f64>],
        tracker: &mut Tracker,
    ) -> bool {
        let batch_size = (rayon::current_num_threads() * PARALLEL_BATCH_FACTOR).max(1);
        for batch in candidates.chunks(batch_size) {
            if self.budget.is_exhausted() {
                self.log_budget_exhausted(tracker);
                return true;
            }
            let scored: Vec<CandidateScore> = batch
                .par_iter()
                .map_init(|| evaluator.detector(), |detector, up| evaluator.evaluate(detector, up))
                .collect();
            for candidate in scored {
                if !self.record(tracker, candidate) {
                    return true;
                }
            }
        }
        false
    }

    /// Track, log and report one evaluated candidate. Returns `false` to stop.
    fn record(&self, tracker: &mut Tracker, candidate: CandidateScore) -> bool {
        let index = tracker.evaluated.len();
        let up = candidate.up;
        let score = candidate.metrics.score;
        let improved = tracker.offer(candidate);

        log_candidate(index, &up, score, improved);
        if improved {
            debug!(
                target: "print_orient::search",
                candidate = index,
                score = score,
                "New best orientation"
            );
        }
        let evaluated = index + 1;
        if evaluated % PROGRESS_LOG_INTERVAL == 0 {
            log_progress(evaluated, tracker.total, tracker.best_score());
        }

        let keep_going = self.report(SearchPhase::Evaluating, evaluated, tracker.total, tracker.best_score());
        if !keep_going {
            debug!(target: "print_orient::search", evaluated, "Search cancelled by progress callback");
        }
        keep_going
    }

    fn log_budget_exhausted(&self, tracker: &Tracker) {
        debug!(
            target: "print_orient::search",
            evaluated = tracker.evaluated.len(),
            total = tracker.total,
            elapsed_ms = self.budget.elapsed().as_secs_f64() * 1000.0,
            "Time budget exhausted"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Axis-aligned cube with outward-facing triangles.
    fn create_test_cube(side: f64) -> Mesh {
        let s = side;
        Mesh::from_parts(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(s, 0.0, 0.0),
                Point3::new(s, 0.0, s),
                Point3::new(0.0, 0.0, s),
                Point3::new(0.0, s, 0.0),
                Point3::new(s, s, 0.0),
                Point3::new(s, s, s),
                Point3::new(0.0, s, s),
            ],
            vec![
                [0, 1, 3],
                [1, 2, 3],
                [4, 7, 5],
                [5, 7, 6],
                [0, 4, 1],
                [1, 4, 5],
                [3, 2, 7],
                [2, 6, 7],
                [0, 3, 4],
                [3, 7, 4],
                [1, 5, 2],
                [2, 5, 6],
            ],
        )
    }

    fn is_axis_aligned(v: &Vector3<f64>) -> bool {
        v.iter().any(|c| (c.abs() - 1.0).abs() < 1e-6)
    }

    #[test]
    fn test_empty_mesh_sentinel() {
        let result = compute_orientation(&Mesh::new(), OrientationMode::Upright, &OrientOptions::default());
        assert!(result.is_empty());
        assert!(!result.timed_out);
        assert_eq!(result.rotation, UnitQuaternion::identity());
        assert_eq!(result.metrics.score, f64::INFINITY);
        assert_eq!(result.candidates_evaluated, 0);
    }

    #[test]
    fn test_cube_rests_on_a_face() {
        let mesh = create_test_cube(10.0);
        let result = compute_orientation(&mesh, OrientationMode::Upright, &OrientOptions::default());

        assert!(!result.timed_out);
        assert_eq!(result.source, ResultSource::Search);
        assert_eq!(result.candidates_evaluated, result.candidates_total);
        assert!(is_axis_aligned(&result.up), "up = {:?}", result.up);
        assert_relative_eq!(result.metrics.support_volume, 0.0, epsilon = 1e-9);
        assert_relative_eq!(result.metrics.height, 10.0, epsilon = 1e-6);
        assert_relative_eq!(result.metrics.contact_area, 100.0, epsilon = 1e-6);
        assert_relative_eq!(result.metrics.score, 0.2 * 10.0 + 0.2 / 100.0, epsilon = 1e-6);
    }

    #[test]
    fn test_ties_keep_first_candidate() {
        // All six face-down orientations of a cube score the same; the first
        // generated one (+ first principal axis) must win.
        let mesh = create_test_cube(10.0);
        let result = compute_orientation(&mesh, OrientationMode::Upright, &OrientOptions::default());
        let sample = sample_vertices(&mesh.vertices, 5_000);
        let first_axis = analyze_principal_axes(&sample, &Default::default()).axes[0];
        assert_relative_eq!(result.up, first_axis, epsilon = 1e-9);
    }

    #[test]
    fn test_deterministic() {
        let mesh = create_test_cube(7.5);
        let opts = OrientOptions::default().with_direction_samples(40);
        let a = compute_orientation(&mesh, OrientationMode::Flat, &opts);
        let b = compute_orientation(&mesh, OrientationMode::Flat, &opts);
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_budget_uses_fallback() {
        let mesh = create_test_cube(10.0);
        let opts = OrientOptions::default().with_max_duration_ms(0.0);
        let result = compute_orientation(&mesh, OrientationMode::Upright, &opts);

        assert!(result.timed_out);
        assert!(result.used_fallback());
        assert_eq!(result.candidates_evaluated, 0);
        assert!(result.alternatives.is_empty());
        assert_eq!(result.metrics.support_volume, 0.0);
        assert_eq!(result.metrics.contact_area, 0.0);
        assert_relative_eq!(result.metrics.height, 10.0, epsilon = 1e-6);
        assert_relative_eq!(result.metrics.score, 0.2 * result.metrics.height, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_budget_without_axes() {
        let mesh = Mesh::triangle_soup(vec![Point3::new(2.5, -1.0, 4.0); 3]);
        let opts = OrientOptions::default().with_max_duration_ms(0.0);
        let result = compute_orientation(&mesh, OrientationMode::Upright, &opts);

        assert!(result.timed_out);
        assert_eq!(result.source, ResultSource::Fallback);
        assert_eq!(result.up, Vector3::y());
        assert_eq!(result.rotation, UnitQuaternion::identity());
        assert_eq!(result.metrics.height, 0.0);
    }

    #[test]
    fn test_parallel_zero_budget_uses_fallback() {
        let mesh = create_test_cube(10.0);
        let opts = OrientOptions::default().with_parallel(true).with_max_duration_ms(0.0);
        let result = compute_orientation(&mesh, OrientationMode::Upright, &opts);

        assert!(result.timed_out);
        assert!(result.used_fallback());
        assert_eq!(result.candidates_evaluated, 0);
        assert_relative_eq!(result.metrics.height, 10.0, epsilon = 1e-6);
    }

    #[test]
    fn test_parallel_callback_cancel() {
        let mesh = create_test_cube(10.0);
        let callback: ProgressCallback =
            Box::new(|p: &Progress| !(p.phase == SearchPhase::Evaluating && p.current >= 2));
        let opts = OrientOptions::default().with_parallel(true);

        let result = compute_orientation_with_progress(&mesh, OrientationMode::Upright, &opts, Some(&callback));
        assert!(result.timed_out);
        assert!(result.used_fallback());
        // Cancellation is seen while recording, so the rest of the batch is dropped.
        assert_eq!(result.candidates_evaluated, 2);
    }

    #[test]
    fn test_unscorable_candidates_flag_fallback() {
        let weights = ScoreWeights {
            support: f64::NAN,
            ..ScoreWeights::default()
        };
        let mesh = create_test_cube(10.0);
        let opts = OrientOptions::default().with_weights(weights);
        let result = compute_orientation(&mesh, OrientationMode::Upright, &opts);

        assert!(result.timed_out);
        assert!(result.used_fallback());
        assert_eq!(result.candidates_evaluated, result.candidates_total);
        assert!(result.alternatives.is_empty());
        assert_relative_eq!(result.metrics.score, 0.2 * result.metrics.height, epsilon = 1e-12);
    }

    #[test]
    fn test_support_only_weights_and_alternative_cap() {
        let mesh = create_test_cube(10.0);
        let opts = OrientOptions::default()
            .with_weights(ScoreWeights::support_only())
            .with_max_alternatives(2);
        let result = compute_orientation(&mesh, OrientationMode::Upright, &opts);

        assert_eq!(result.source, ResultSource::Search);
        assert_relative_eq!(result.metrics.score, result.metrics.support_volume, epsilon = 1e-12);
        assert_eq!(result.alternatives.len(), 2);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mesh = create_test_cube(3.0);
        let opts = OrientOptions::default().with_direction_samples(64);
        let sequential = compute_orientation(&mesh, OrientationMode::Upright, &opts);
        let parallel = compute_orientation(&mesh, OrientationMode::Upright, &opts.clone().with_parallel(true));
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_callback_cancel() {
        let mesh = create_test_cube(10.0);
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        let callback: ProgressCallback = Box::new(move |p: &Progress| {
            if p.phase == SearchPhase::Evaluating && p.current > 0 {
                counter.fetch_add(1, Ordering::SeqCst);
            }
            !(p.phase == SearchPhase::Evaluating && p.current >= 3)
        });

        let result = compute_orientation_with_progress(
            &mesh,
            OrientationMode::Upright,
            &OrientOptions::default(),
            Some(&callback),
        );
        assert!(result.timed_out);
        assert!(result.used_fallback());
        assert_eq!(result.candidates_evaluated, 3);
        assert_eq!(seen.load(Ordering::SeqCst), 3);
        assert_eq!(result.alternatives.len(), 3);
    }

    #[test]
    fn test_alternatives_ranked() {
        let mesh = create_test_cube(10.0);
        let result = compute_orientation(&mesh, OrientationMode::Upright, &OrientOptions::default());
        assert_eq!(result.alternatives.len(), 5);
        for pair in result.alternatives.windows(2) {
            assert!(pair[0].metrics.score <= pair[1].metrics.score);
        }
        assert!(result.alternatives[0].metrics.score >= result.metrics.score - SCORE_EPSILON);
    }

    #[test]
    fn test_single_point_mesh() {
        let mesh = Mesh::triangle_soup(vec![Point3::new(1.0, 2.0, 3.0)]);
        let result = compute_orientation(&mesh, OrientationMode::Upright, &OrientOptions::default());
        assert!(!result.timed_out);
        assert!(result.metrics.score.is_finite());
        assert_eq!(result.metrics.height, 0.0);
    }

    #[test]
    fn test_evaluate_orientation_matches_search() {
        let mesh = create_test_cube(10.0);
        let opts = OrientOptions::default();
        let result = compute_orientation(&mesh, OrientationMode::Upright, &opts);
        let metrics = evaluate_orientation(&mesh, &result.rotation, OrientationMode::Upright, &opts);
        assert_eq!(metrics, result.metrics);
    }
}
