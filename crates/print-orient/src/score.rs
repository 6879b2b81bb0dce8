//! Scalar cost of a candidate orientation.
//!
//! ```text
//! contact_penalty = 1 / max(contact_area, contact_epsilon)
//! height_penalty  = height                       (upright)
//!                 = height * flat_height_factor  (flat)
//! score = support * support_volume + height * height_penalty + contact * contact_penalty
//! ```
//!
//! Lower is better. The weights and the mode are design knobs, not physics.

use std::fmt;
use std::str::FromStr;

use crate::error::OrientError;
use crate::extents::Extents;
use crate::overhang::OverhangSummary;

/// How strongly print height is penalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum OrientationMode {
    /// Full height penalty: prefer short prints.
    #[default]
    Upright,
    /// Softened height penalty, for wide flat parts where footprint matters more.
    Flat,
}

impl OrientationMode {
    /// The lowercase name used in configuration and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrientationMode::Upright => "upright",
            OrientationMode::Flat => "flat",
        }
    }
}

impl fmt::Display for OrientationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrientationMode {
    type Err = OrientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upright" => Ok(OrientationMode::Upright),
            "flat" => Ok(OrientationMode::Flat),
            _ => Err(OrientError::UnknownMode { name: s.to_string() }),
        }
    }
}

/// Weights of the orientation cost function.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ScoreWeights {
    /// Weight of the support volume term. Default: 0.6
    pub support: f64,
    /// Weight of the height term. Default: 0.2
    pub height: f64,
    /// Weight of the inverse contact area term. Default: 0.2
    pub contact: f64,
    /// Floor applied to the contact area before inversion. Default: 1e-3
    pub contact_epsilon: f64,
    /// Height multiplier in [`OrientationMode::Flat`]. Default: 0.5
    pub flat_height_factor: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            support: 0.6,
            height: 0.2,
            contact: 0.2,
            contact_epsilon: 1e-3,
            flat_height_factor: 0.5,
        }
    }
}

impl ScoreWeights {
    /// Weights that only care about support material.
    pub fn support_only() -> Self {
        Self {
            support: 1.0,
            height: 0.0,
            contact: 0.0,
            ..Default::default()
        }
    }

    /// Height term after applying the mode.
    #[inline]
    pub fn height_penalty(&self, height: f64, mode: OrientationMode) -> f64 {
        match mode {
            OrientationMode::Upright => height,
            OrientationMode::Flat => height * self.flat_height_factor,
        }
    }

    /// Inverse contact area, floored to stay finite.
    #[inline]
    pub fn contact_penalty(&self, contact_area: f64) -> f64 {
        1.0 / contact_area.max(self.contact_epsilon)
    }

    /// Combine raw metrics into one cost.
    #[inline]
    pub fn score(&self, support_volume: f64, height: f64, contact_area: f64, mode: OrientationMode) -> f64 {
        self.support * support_volume
            + self.height * self.height_penalty(height, mode)
            + self.contact * self.contact_penalty(contact_area)
    }

    /// Cost used by the height-only fallback, which measures nothing else.
    #[inline]
    pub fn height_only_score(&self, height: f64, mode: OrientationMode) -> f64 {
        self.height * self.height_penalty(height, mode)
    }
}

/// Scored summary of one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
pub struct OrientationMetrics {
    /// Estimated support volume in mm³.
    pub support_volume: f64,
    /// Estimated support mass in grams.
    pub support_weight: f64,
    /// Print height.
    pub height: f64,
    /// Area of the X-Z bounding rectangle.
    pub footprint_area: f64,
    /// Bed contact area.
    pub contact_area: f64,
    /// Cost (lower is better). `+inf` when no orientation could be evaluated.
    pub score: f64,
}

impl OrientationMetrics {
    /// Metrics for "no usable orientation".
    pub fn sentinel() -> Self {
        Self {
            support_volume: 0.0,
            support_weight: 0.0,
            height: 0.0,
            footprint_area: 0.0,
            contact_area: 0.0,
            score: f64::INFINITY,
        }
    }

    /// Whether these are the "no usable orientation" sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.score == f64::INFINITY
    }
}

/// Score one fully evaluated candidate.
pub fn score_orientation(
    extents: &Extents,
    overhang: &OverhangSummary,
    mode: OrientationMode,
    weights: &ScoreWeights,
) -> OrientationMetrics {
    let height = extents.height.max(0.0);
    let contact_area = overhang.contact_area.max(0.0);
    let support_volume = overhang.support_volume.max(0.0);

    OrientationMetrics {
        support_volume,
        support_weight: overhang.support_weight.max(0.0),
        height,
        footprint_area: extents.footprint_area,
        contact_area,
        score: weights.score(support_volume, height, contact_area, mode),
    }
}
