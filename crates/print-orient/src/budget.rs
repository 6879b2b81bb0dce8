//! Time budget and progress reporting for the orientation search.
//!
//! The search is an anytime algorithm: the budget is checked cooperatively
//! between candidates, never in the middle of one. A progress callback can
//! observe the search and stop it early by returning `false`, which the
//! optimizer treats exactly like an exhausted budget.
//!
//! # Example
//!
//! ```
//! use print_orient::budget::{Progress, ProgressCallback};
//!
//! let callback: ProgressCallback = Box::new(|progress: &Progress| {
//!     println!("{} {}/{}", progress.phase, progress.current, progress.total);
//!     true // keep searching
//! });
//! # let _ = callback;
//! ```

use std::fmt;
use std::time::{Duration, Instant};

/// Phases of one optimizer invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    /// Vertex sampling, principal axes and candidate generation.
    Sampling,
    /// Full evaluation of candidate directions.
    Evaluating,
    /// Height-only fallback and result assembly.
    Finalizing,
    /// Result is ready.
    Done,
}

impl fmt::Display for SearchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchPhase::Sampling => "sampling",
            SearchPhase::Evaluating => "evaluating",
            SearchPhase::Finalizing => "finalizing",
            SearchPhase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Progress information passed to callbacks.
#[derive(Debug, Clone)]
pub struct Progress {
    /// Current phase.
    pub phase: SearchPhase,
    /// Candidates evaluated so far.
    pub current: u64,
    /// Total number of candidates.
    pub total: u64,
    /// Best score found so far (`+inf` before the first evaluation).
    pub best_score: f64,
    /// Elapsed time since the search started.
    pub elapsed: Duration,
}

impl Progress {
    /// Get progress as a fraction (0.0 to 1.0).
    #[inline]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.current as f64) / (self.total as f64)
        }
    }

    /// Get progress as a percentage (0 to 100).
    #[inline]
    pub fn percent(&self) -> u32 {
        (self.fraction() * 100.0).round() as u32
    }
}

/// Callback function for progress reporting.
///
/// Returns `true` to continue, `false` to stop the search early.
pub type ProgressCallback = Box<dyn Fn(&Progress) -> bool + Send + Sync>;

/// Wall-clock budget for one search.
#[derive(Debug, Clone, Copy)]
pub struct SearchBudget {
    start: Instant,
    limit: Option<Duration>,
}

impl SearchBudget {
    /// A budget that never runs out.
    pub fn unbounded() -> Self {
        Self {
            start: Instant::now(),
            limit: None,
        }
    }

    /// A budget of `limit`, starting now.
    pub fn new(limit: Duration) -> Self {
        Self {
            start: Instant::now(),
            limit: Some(limit),
        }
    }

    /// Interpret a millisecond budget.
    ///
    /// `None`, `+inf` and NaN mean unbounded; zero or negative values give a
    /// budget that is exhausted from the start.
    pub fn from_millis(max_duration_ms: Option<f64>) -> Self {
        match max_duration_ms {
            None => Self::unbounded(),
            Some(ms) if ms.is_nan() || ms == f64::INFINITY => Self::unbounded(),
            Some(ms) if ms <= 0.0 => Self::new(Duration::ZERO),
            Some(ms) => Duration::try_from_secs_f64(ms / 1000.0)
                .map(Self::new)
                .unwrap_or_else(|_| Self::unbounded()),
        }
    }

    /// Whether a limit is set.
    #[inline]
    pub fn is_bounded(&self) -> bool {
        self.limit.is_some()
    }

    /// Get elapsed time.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Time left, or `None` when unbounded.
    pub fn remaining(&self) -> Option<Duration> {
        self.limit.map(|limit| limit.saturating_sub(self.elapsed()))
    }

    /// Whether the budget has run out.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        match self.limit {
            None => false,
            Some(limit) => self.elapsed() >= limit,
        }
    }
}

/// Invoke an optional callback; `true` means keep going.
pub(crate) fn report(callback: Option<&ProgressCallback>, progress: impl FnOnce() -> Progress) -> bool {
    match callback {
        Some(cb) => cb(&progress()),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_millis() {
        assert!(!SearchBudget::from_millis(None).is_bounded());
        assert!(!SearchBudget::from_millis(Some(f64::INFINITY)).is_bounded());
        assert!(!SearchBudget::from_millis(Some(f64::NAN)).is_bounded());
        assert!(SearchBudget::from_millis(Some(0.0)).is_exhausted());
        assert!(SearchBudget::from_millis(Some(-5.0)).is_exhausted());

        let generous = SearchBudget::from_millis(Some(60_000.0));
        assert!(generous.is_bounded());
        assert!(!generous.is_exhausted());
    }

    #[test]
    fn test_unbounded_never_exhausts() {
        let budget = SearchBudget::unbounded();
        assert!(!budget.is_exhausted());
        assert!(budget.remaining().is_none());
    }

    #[test]
    fn test_budget_runs_out() {
        let budget = SearchBudget::new(Duration::ZERO);
        assert!(budget.is_bounded());
        assert!(budget.is_exhausted());
        assert_eq!(budget.remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn test_progress_fraction() {
        let p = Progress {
            phase: SearchPhase::Evaluating,
            current: 25,
            total: 100,
            best_score: 1.0,
            elapsed: Duration::ZERO,
        };
        assert_eq!(p.percent(), 25);
        assert_eq!(p.phase.to_string(), "evaluating");
    }

    #[test]
    fn test_report_without_callback_continues() {
        assert!(report(None, || unreachable!()));
    }
}
