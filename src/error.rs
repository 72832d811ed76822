//! Error types for numr-argpack

use crate::dtype::DType;
use thiserror::Error;

/// Result type alias using numr-argpack's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in packed arg-reduce operations
#[derive(Error, Debug)]
pub enum Error {
    /// Output tensor has an element type the kernel cannot write
    #[error("Unsupported output dtype {dtype:?} for operation '{op}'")]
    UnsupportedOutputDType {
        /// The unsupported dtype
        dtype: DType,
        /// The operation name
        op: &'static str,
    },

    /// Input tensor has an element type the kernel cannot read
    #[error("Unsupported dtype {dtype:?} for operation '{op}'")]
    UnsupportedDType {
        /// The unsupported dtype
        dtype: DType,
        /// The operation name
        op: &'static str,
    },

    /// Reduction axis outside `0..=3`
    #[error("Unsupported reduction axis {axis}: expected 0 (batch), 1 (channel), 2 (height) or 3 (width)")]
    UnsupportedAxis {
        /// The raw axis value
        axis: i32,
    },

    /// Layer parameter object is not the kind the operation expects
    #[error("Parameter mismatch: expected {expected} parameters, got {got}")]
    ParamMismatch {
        /// Expected layer kind
        expected: &'static str,
        /// Layer kind of the supplied parameters
        got: &'static str,
    },

    /// Shape mismatch in an operation
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected logical shape (N, C, H, W)
        expected: [usize; 4],
        /// Actual logical shape (N, C, H, W)
        got: [usize; 4],
    },

    /// DType mismatch between a tensor and a typed view of it
    #[error("DType mismatch: {lhs:?} vs {rhs:?}")]
    DTypeMismatch {
        /// Dtype of the tensor
        lhs: DType,
        /// Requested dtype
        rhs: DType,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Scratch memory could not be provided
    #[error("Workspace of {size} bytes unavailable: {reason}")]
    Workspace {
        /// Requested size in bytes
        size: usize,
        /// Reason the request failed
        reason: String,
    },

    /// Out of memory
    #[error("Out of memory: failed to allocate {size} bytes")]
    OutOfMemory {
        /// Requested size in bytes
        size: usize,
    },

    /// Backend-specific error
    #[error("Backend error: {0}")]
    Backend(String),
}

impl Error {
    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: [usize; 4], got: [usize; 4]) -> Self {
        Self::ShapeMismatch { expected, got }
    }

    /// Create an unsupported input dtype error
    pub fn unsupported_dtype(dtype: DType, op: &'static str) -> Self {
        Self::UnsupportedDType { dtype, op }
    }

    /// Create an unsupported output dtype error
    pub fn unsupported_output_dtype(dtype: DType, op: &'static str) -> Self {
        Self::UnsupportedOutputDType { dtype, op }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }

    /// Create a workspace error
    pub fn workspace(size: usize, reason: impl Into<String>) -> Self {
        Self::Workspace {
            size,
            reason: reason.into(),
        }
    }
}
