//! Error types for miotensor

use crate::dtype::DType;
use crate::runtime::Status;
use thiserror::Error;

/// Result type alias using miotensor's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in descriptor and tensor operations
///
/// Every variant carries the name of the operation that failed. Native
/// failures are never retried; they surface immediately with the status the
/// backend reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Native descriptor or resource creation failed
    #[error("{op}: failed to allocate native resource ({status})")]
    Allocation {
        /// The operation name
        op: &'static str,
        /// Status reported by the backend
        status: Status,
    },

    /// Shape, stride, rank or dtype combination was rejected
    #[error("{op}: invalid tensor configuration: {reason}")]
    InvalidConfiguration {
        /// The operation name
        op: &'static str,
        /// Reason for rejection
        reason: String,
    },

    /// Introspection was requested on a descriptor that was never configured
    #[error("{op}: tensor descriptor has not been configured")]
    UnconfiguredDescriptor {
        /// The operation name
        op: &'static str,
    },

    /// Element type has no scalar coercion mapping
    #[error("Unsupported dtype {dtype} for operation '{op}'")]
    UnsupportedType {
        /// The unsupported dtype
        dtype: DType,
        /// The operation name
        op: &'static str,
    },

    /// A fill, scale or transform request was rejected
    #[error("{op} failed: {reason}")]
    OperationFailed {
        /// The operation name
        op: &'static str,
        /// Reason for failure
        reason: String,
    },

    /// Backend failure outside the categories above (e.g. on destroy)
    #[error("{op}: backend error ({status})")]
    Backend {
        /// The operation name
        op: &'static str,
        /// Status reported by the backend
        status: Status,
    },
}

impl Error {
    /// Create an invalid configuration error
    pub fn invalid_configuration(op: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            op,
            reason: reason.into(),
        }
    }

    /// Create an operation failure error
    pub fn operation_failed(op: &'static str, reason: impl Into<String>) -> Self {
        Self::OperationFailed {
            op,
            reason: reason.into(),
        }
    }

    /// Create an unsupported dtype error
    pub fn unsupported_type(dtype: DType, op: &'static str) -> Self {
        Self::UnsupportedType { dtype, op }
    }

    /// Name of the operation that produced this error
    pub fn op(&self) -> &'static str {
        match self {
            Self::Allocation { op, .. }
            | Self::InvalidConfiguration { op, .. }
            | Self::UnconfiguredDescriptor { op }
            | Self::UnsupportedType { op, .. }
            | Self::OperationFailed { op, .. }
            | Self::Backend { op, .. } => op,
        }
    }
}
