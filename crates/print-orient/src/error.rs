//! Error types with rich diagnostics.
//!
//! The optimizer itself never fails: degenerate geometry, numerical trouble and
//! an exhausted time budget are all reported through sentinel values and the
//! `timed_out` flag. Errors only exist at the edges of the crate:
//!
//! - building a [`Mesh`](crate::Mesh) from raw buffers (`ORIENT-1xxx`)
//! - loading configuration (`ORIENT-2xxx`)
//!
//! # Example
//!
//! ```
//! use print_orient::{ErrorCode, Mesh};
//!
//! let err = Mesh::from_flat(&[0.0, 1.0], None).unwrap_err();
//! assert_eq!(err.code(), ErrorCode::PositionBufferLength);
//! println!("{} ({})", err, err.code());
//! ```

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for fallible operations in this crate.
pub type OrientResult<T> = Result<T, OrientError>;

/// Machine-readable error codes.
///
/// Codes follow the pattern `ORIENT-XXXX` where:
/// - 1xxx = buffer validation errors
/// - 2xxx = configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// ORIENT-1001: Position buffer length is not a multiple of 3
    PositionBufferLength = 1001,
    /// ORIENT-1002: Vertex has NaN or Infinity coordinate
    InvalidCoordinate = 1002,
    /// ORIENT-1003: Index buffer length is not a multiple of 3
    IndexBufferLength = 1003,
    /// ORIENT-1004: Triangle references a vertex that does not exist
    InvalidVertexIndex = 1004,

    /// ORIENT-2001: Unknown orientation mode name
    UnknownMode = 2001,
    /// ORIENT-2002: Configuration could not be read or parsed
    InvalidConfig = 2002,
}

impl ErrorCode {
    /// Returns the error code as a string in the format `ORIENT-XXXX`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::PositionBufferLength => "ORIENT-1001",
            ErrorCode::InvalidCoordinate => "ORIENT-1002",
            ErrorCode::IndexBufferLength => "ORIENT-1003",
            ErrorCode::InvalidVertexIndex => "ORIENT-1004",
            ErrorCode::UnknownMode => "ORIENT-2001",
            ErrorCode::InvalidConfig => "ORIENT-2002",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors raised while validating input buffers or loading configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum OrientError {
    /// Position buffer does not hold whole `[x, y, z]` triples.
    #[error("position buffer has {len} values, which is not a multiple of 3")]
    #[diagnostic(
        code(orient::buffer::positions),
        help("Positions must be packed as x, y, z triples. Check the stride used when exporting the vertex buffer.")
    )]
    PositionBufferLength { len: usize },

    /// Invalid coordinate value (NaN or Infinity).
    #[error("invalid coordinate at vertex {vertex_index}: {coordinate} is {value}")]
    #[diagnostic(
        code(orient::buffer::coordinate),
        help("Check for numerical issues in the source data before orienting the mesh.")
    )]
    InvalidCoordinate {
        vertex_index: usize,
        coordinate: &'static str,
        value: f64,
    },

    /// Index buffer does not hold whole triangles.
    #[error("index buffer has {len} values, which is not a multiple of 3")]
    #[diagnostic(
        code(orient::buffer::indices),
        help("Indices must describe whole triangles. Omit the index buffer for a triangle soup.")
    )]
    IndexBufferLength { len: usize },

    /// Triangle references a vertex past the end of the position buffer.
    #[error(
        "invalid vertex index: triangle {triangle_index} references vertex {vertex_index}, but mesh only has {vertex_count} vertices"
    )]
    #[diagnostic(
        code(orient::buffer::vertex_index),
        help("The index buffer does not match the position buffer. Make sure both come from the same mesh.")
    )]
    InvalidVertexIndex {
        triangle_index: usize,
        vertex_index: u32,
        vertex_count: usize,
    },

    /// Unknown orientation mode.
    #[error("unknown orientation mode {name:?}")]
    #[diagnostic(code(orient::config::mode), help("Valid modes are \"upright\" and \"flat\"."))]
    UnknownMode { name: String },

    /// Configuration could not be read or parsed.
    #[error("invalid orientation config: {details}")]
    #[diagnostic(
        code(orient::config::invalid),
        help("Compare the file against the documented OrientOptions fields; unknown fields are rejected.")
    )]
    InvalidConfig { details: String },
}

impl OrientError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            OrientError::PositionBufferLength { .. } => ErrorCode::PositionBufferLength,
            OrientError::InvalidCoordinate { .. } => ErrorCode::InvalidCoordinate,
            OrientError::IndexBufferLength { .. } => ErrorCode::IndexBufferLength,
            OrientError::InvalidVertexIndex { .. } => ErrorCode::InvalidVertexIndex,
            OrientError::UnknownMode { .. } => ErrorCode::UnknownMode,
            OrientError::InvalidConfig { .. } => ErrorCode::InvalidConfig,
        }
    }

    /// Whether the error came from a malformed input buffer.
    pub fn is_buffer_error(&self) -> bool {
        (self.code() as u32) < 2000
    }

    #[cfg_attr(not(feature = "config"), allow(dead_code))]
    pub(crate) fn invalid_config(details: impl std::fmt::Display) -> Self {
        OrientError::InvalidConfig {
            details: details.to_string(),
        }
    }
}
