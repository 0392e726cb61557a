//! Native status codes and their translation into `Error`

use crate::error::{Error, Result};
use std::fmt;
use std::os::raw::c_int;

/// Status code returned by every native descriptor call
///
/// Values mirror `miopenStatus_t`. Codes outside the known range decode as
/// `UnknownError`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Status {
    /// The call succeeded
    Success = 0,
    /// Handle or descriptor was not initialized
    NotInitialized = 1,
    /// An argument value was out of range
    InvalidValue = 2,
    /// An argument combination was rejected
    BadParm = 3,
    /// Resource allocation failed
    AllocFailed = 4,
    /// Library internal error
    InternalError = 5,
    /// Feature not implemented by the library
    NotImplemented = 6,
    /// Unclassified failure
    UnknownError = 7,
    /// Operation not supported for the given arguments
    UnsupportedOp = 8,
}

/// Category of a native call, used to choose the error kind on failure
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CallKind {
    /// Resource creation (descriptor, handle)
    Create,
    /// Descriptor configuration (`Set`)
    Configure,
    /// Descriptor introspection (`Get`, sizes)
    Query,
    /// Work on described memory (fill, scale, transform)
    Execute,
    /// Resource release
    Destroy,
}

impl Status {
    /// Decode a raw native status code
    pub const fn from_raw(code: c_int) -> Self {
        match code {
            0 => Self::Success,
            1 => Self::NotInitialized,
            2 => Self::InvalidValue,
            3 => Self::BadParm,
            4 => Self::AllocFailed,
            5 => Self::InternalError,
            6 => Self::NotImplemented,
            8 => Self::UnsupportedOp,
            _ => Self::UnknownError,
        }
    }

    /// Returns true for `Success`
    #[inline]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// Lift a raw status into `Result<(), Status>` for use with `?` in backends
    #[inline]
    pub const fn ok(self) -> std::result::Result<(), Status> {
        match self {
            Self::Success => Ok(()),
            other => Err(other),
        }
    }

    /// Translate this status into the crate error for a call of `kind`
    ///
    /// `AllocFailed` is `Error::Allocation` for every kind, including
    /// execute calls: resource exhaustion, not a rejected request.
    ///
    /// `Success` must not be passed here; it maps to `Error::Backend` so the
    /// mistake is visible rather than silently swallowed.
    pub fn into_error(self, op: &'static str, kind: CallKind) -> Error {
        match (self, kind) {
            (Self::AllocFailed, _) | (_, CallKind::Create) => Error::Allocation { op, status: self },
            (Self::NotInitialized, CallKind::Configure | CallKind::Query) => {
                Error::UnconfiguredDescriptor { op }
            }
            (Self::Success, _) | (_, CallKind::Destroy) => Error::Backend { op, status: self },
            (_, CallKind::Configure | CallKind::Query) => {
                Error::invalid_configuration(op, format!("native layer returned {self}"))
            }
            (_, CallKind::Execute) => {
                Error::operation_failed(op, format!("native layer returned {self}"))
            }
        }
    }

    /// Check a status, attaching the operation name on failure
    pub fn check(self, op: &'static str, kind: CallKind) -> Result<()> {
        match self {
            Self::Success => Ok(()),
            failed => Err(failed.into_error(op, kind)),
        }
    }
}

impl From<c_int> for Status {
    fn from(code: c_int) -> Self {
        Self::from_raw(code)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "miopenStatusSuccess",
            Self::NotInitialized => "miopenStatusNotInitialized",
            Self::InvalidValue => "miopenStatusInvalidValue",
            Self::BadParm => "miopenStatusBadParm",
            Self::AllocFailed => "miopenStatusAllocFailed",
            Self::InternalError => "miopenStatusInternalError",
            Self::NotImplemented => "miopenStatusNotImplemented",
            Self::UnknownError => "miopenStatusUnknownError",
            Self::UnsupportedOp => "miopenStatusUnsupportedOp",
        };
        f.write_str(name)
    }
}
