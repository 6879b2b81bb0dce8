//! Orientation search options.
//!
//! [`OrientOptions`] bundles every knob of the search: sampling sizes, the
//! wall-clock budget, overhang parameters, score weights and solver limits.
//! Values are clamped into their supported ranges by [`OrientOptions::normalized`],
//! which the optimizer applies before use, so out-of-range input is never an
//! error.
//!
//! # Loading from files
//!
//! With the `config` feature, options round-trip through TOML and JSON:
//!
//! ```toml
//! direction_samples = 150
//! max_duration_ms = 250.0
//! parallel = true
//!
//! [overhang]
//! threshold_degrees = 50.0
//!
//! [weights]
//! support = 0.8
//! height = 0.1
//! contact = 0.1
//! ```
//!
//! Omitted fields take their defaults; unknown top-level fields are rejected.

use crate::directions::clamp_direction_samples;
use crate::overhang::OverhangParams;
use crate::principal::JacobiParams;
use crate::sampling::clamp_vertex_samples;
use crate::score::ScoreWeights;

#[cfg(feature = "config")]
use crate::error::{OrientError, OrientResult};

/// Options for [`compute_orientation`](crate::compute_orientation).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default, deny_unknown_fields))]
pub struct OrientOptions {
    /// Number of Fibonacci sphere samples, clamped to 24..=200. Default: 100
    pub direction_samples: usize,
    /// Cap on vertices used for extent measurement, clamped to 1000..=20000. Default: 5000
    pub vertex_samples: usize,
    /// Wall-clock budget in milliseconds. `None`, `+inf` or NaN means
    /// unbounded; zero or negative means the budget is already spent.
    /// Default: `None`
    #[cfg_attr(feature = "config", serde(skip_serializing_if = "Option::is_none"))]
    pub max_duration_ms: Option<f64>,
    /// Evaluate candidates on the rayon pool. Default: false
    pub parallel: bool,
    /// How many runner-up candidates to keep in the result. Default: 5
    pub max_alternatives: usize,
    /// Overhang classification and support estimate parameters.
    pub overhang: OverhangParams,
    /// Cost function weights.
    pub weights: ScoreWeights,
    /// Eigen-solver limits for principal-axis analysis.
    pub jacobi: JacobiParams,
}

impl Default for OrientOptions {
    fn default() -> Self {
        Self {
            direction_samples: 100,
            vertex_samples: 5_000,
            max_duration_ms: None,
            parallel: false,
            max_alternatives: 5,
            overhang: OverhangParams::default(),
            weights: ScoreWeights::default(),
            jacobi: JacobiParams::default(),
        }
    }
}

impl OrientOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Interactive preset: coarse sphere, 200 ms budget.
    ///
    /// Suited to an upload flow that must answer before the page renders.
    pub fn fast() -> Self {
        Self {
            direction_samples: 48,
            vertex_samples: 2_000,
            max_duration_ms: Some(200.0),
            ..Default::default()
        }
    }

    /// Offline preset: densest sphere, no budget, parallel evaluation.
    pub fn thorough() -> Self {
        Self {
            direction_samples: 200,
            vertex_samples: 20_000,
            max_duration_ms: None,
            parallel: true,
            ..Default::default()
        }
    }

    /// Set the Fibonacci sphere sample count.
    pub fn with_direction_samples(mut self, n: usize) -> Self {
        self.direction_samples = n;
        self
    }

    /// Set the vertex sample cap.
    pub fn with_vertex_samples(mut self, n: usize) -> Self {
        self.vertex_samples = n;
        self
    }

    /// Set the time budget in milliseconds.
    pub fn with_max_duration_ms(mut self, ms: f64) -> Self {
        self.max_duration_ms = Some(ms);
        self
    }

    /// Remove the time budget.
    pub fn unbounded(mut self) -> Self {
        self.max_duration_ms = None;
        self
    }

    /// Set the overhang threshold angle in degrees.
    pub fn with_overhang_threshold(mut self, degrees: f64) -> Self {
        self.overhang.threshold_degrees = degrees;
        self
    }

    /// Replace the overhang parameters.
    pub fn with_overhang(mut self, overhang: OverhangParams) -> Self {
        self.overhang = overhang;
        self
    }

    /// Replace the score weights.
    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Enable or disable parallel candidate evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set how many runner-up candidates to keep.
    pub fn with_max_alternatives(mut self, n: usize) -> Self {
        self.max_alternatives = n;
        self
    }

    /// Copy with sample counts clamped into their supported ranges.
    pub fn normalized(&self) -> Self {
        Self {
            direction_samples: clamp_direction_samples(self.direction_samples),
            vertex_samples: clamp_vertex_samples(self.vertex_samples),
            ..self.clone()
        }
    }
}

#[cfg(feature = "config")]
impl OrientOptions {
    /// Parse options from a TOML string.
    pub fn from_toml(toml_str: &str) -> OrientResult<Self> {
        toml::from_str(toml_str).map_err(OrientError::invalid_config)
    }

    /// Load options from a TOML file.
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> OrientResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| OrientError::invalid_config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&contents)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> OrientResult<String> {
        toml::to_string_pretty(self).map_err(OrientError::invalid_config)
    }

    /// Save options to a TOML file.
    pub fn save_toml(&self, path: impl AsRef<std::path::Path>) -> OrientResult<()> {
        let path = path.as_ref();
        let toml_str = self.to_toml()?;
        std::fs::write(path, toml_str)
            .map_err(|e| OrientError::invalid_config(format!("{}: {}", path.display(), e)))
    }

    /// Parse options from a JSON string.
    pub fn from_json(json_str: &str) -> OrientResult<Self> {
        serde_json::from_str(json_str).map_err(OrientError::invalid_config)
    }

    /// Serialize to a pretty-printed JSON string.
    pub fn to_json(&self) -> OrientResult<String> {
        serde_json::to_string_pretty(self).map_err(OrientError::invalid_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directions::{MAX_DIRECTION_SAMPLES, MIN_DIRECTION_SAMPLES};
    use crate::sampling::{MAX_VERTEX_SAMPLES, MIN_VERTEX_SAMPLES};

    #[test]
    fn test_defaults() {
        let opts = OrientOptions::default();
        assert_eq!(opts.direction_samples, 100);
        assert_eq!(opts.vertex_samples, 5_000);
        assert!(opts.max_duration_ms.is_none());
        assert!(!opts.parallel);
        assert_eq!(opts.normalized(), opts);
    }

    #[test]
    fn test_normalized_clamps() {
        let low = OrientOptions::new().with_direction_samples(1).with_vertex_samples(0).normalized();
        assert_eq!(low.direction_samples, MIN_DIRECTION_SAMPLES);
        assert_eq!(low.vertex_samples, MIN_VERTEX_SAMPLES);

        let high = OrientOptions::new()
            .with_direction_samples(10_000)
            .with_vertex_samples(1_000_000)
            .normalized();
        assert_eq!(high.direction_samples, MAX_DIRECTION_SAMPLES);
        assert_eq!(high.vertex_samples, MAX_VERTEX_SAMPLES);
    }

    #[test]
    fn test_builder() {
        let opts = OrientOptions::fast()
            .with_overhang_threshold(60.0)
            .with_parallel(true)
            .with_weights(ScoreWeights::support_only())
            .with_max_alternatives(2)
            .unbounded();
        assert_eq!(opts.overhang.threshold_degrees, 60.0);
        assert_eq!(opts.weights, ScoreWeights::support_only());
        assert_eq!(opts.max_alternatives, 2);
        assert!(opts.parallel);
        assert!(opts.max_duration_ms.is_none());
        assert_eq!(opts.direction_samples, 48);
    }

    #[test]
    fn test_presets_stay_in_range() {
        for opts in [OrientOptions::fast(), OrientOptions::thorough()] {
            assert_eq!(opts.normalized(), opts);
        }
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_toml_partial() {
        let opts = OrientOptions::from_toml(
            r#"
            direction_samples = 64
            max_duration_ms = 150.0

            [overhang]
            threshold_degrees = 55.0
            "#,
        )
        .unwrap();
        assert_eq!(opts.direction_samples, 64);
        assert_eq!(opts.max_duration_ms, Some(150.0));
        assert_eq!(opts.overhang.threshold_degrees, 55.0);
        assert_eq!(opts.overhang.contact_epsilon, 0.1);
        assert_eq!(opts.weights, ScoreWeights::default());
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_unknown_field_rejected() {
        let err = OrientOptions::from_toml("direction_sampels = 64").unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::InvalidConfig);
    }
}
