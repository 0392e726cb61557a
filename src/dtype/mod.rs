//! Data type system for tensor descriptors
//!
//! This module provides the `DType` enum representing the element types the
//! native descriptor ABI understands, the `Element` trait that ties Rust
//! types to them, and `TypedScalar` for passing host coefficients into
//! primitive calls.

mod element;
mod scalar;

pub use element::Element;
pub use scalar::TypedScalar;

use std::fmt;
use std::os::raw::c_int;

/// Element types supported by tensor descriptors
///
/// # Discriminant Values (ABI Stability)
///
/// The discriminants are the `miopenDataType_t` codes passed across the
/// native boundary. They are fixed by the accelerator library and are
/// **never** renumbered here.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
#[repr(i32)]
pub enum DType {
    /// 16-bit floating point (IEEE 754)
    F16 = 0,
    /// 32-bit floating point
    F32 = 1,
    /// 32-bit signed integer
    I32 = 2,
    /// 8-bit signed integer
    I8 = 3,
    /// Four 8-bit signed integers packed into one 32-bit element
    I8x4 = 4,
    /// 16-bit brain floating point
    BF16 = 5,
    /// 64-bit floating point
    F64 = 6,
}

impl DType {
    /// Every dtype the native ABI knows about, in code order
    pub const ALL: [DType; 7] = [
        Self::F16,
        Self::F32,
        Self::I32,
        Self::I8,
        Self::I8x4,
        Self::BF16,
        Self::F64,
    ];

    /// Size of one element in bytes
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            Self::F64 => 8,
            Self::F32 | Self::I32 | Self::I8x4 => 4,
            Self::F16 | Self::BF16 => 2,
            Self::I8 => 1,
        }
    }

    /// Returns true if this is a floating point type
    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F64 | Self::F32 | Self::F16 | Self::BF16)
    }

    /// Returns true if this is an integer type (packed or not)
    #[inline]
    pub const fn is_int(self) -> bool {
        matches!(self, Self::I32 | Self::I8 | Self::I8x4)
    }

    /// Returns true if a single host scalar can be coerced into this type
    #[inline]
    pub const fn has_scalar(self) -> bool {
        !matches!(self, Self::I8x4)
    }

    /// Native ABI code for this dtype
    #[inline]
    pub const fn to_raw(self) -> c_int {
        self as c_int
    }

    /// Decode a native ABI code
    ///
    /// Returns `None` for codes this crate does not know.
    pub const fn from_raw(code: c_int) -> Option<Self> {
        match code {
            0 => Some(Self::F16),
            1 => Some(Self::F32),
            2 => Some(Self::I32),
            3 => Some(Self::I8),
            4 => Some(Self::I8x4),
            5 => Some(Self::BF16),
            6 => Some(Self::F64),
            _ => None,
        }
    }

    /// Short name for display (e.g., "f32", "i8")
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::F16 => "f16",
            Self::F32 => "f32",
            Self::I32 => "i32",
            Self::I8 => "i8",
            Self::I8x4 => "i8x4",
            Self::BF16 => "bf16",
            Self::F64 => "f64",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}
