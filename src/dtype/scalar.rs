//! Typed scalars: host coefficients recast to a tensor's element type
//!
//! Native primitives take alpha/beta (and fill values) as an untyped pointer
//! whose pointee must match the descriptor's element type. `TypedScalar`
//! holds the recast value and hands out that pointer for the duration of a
//! borrow.

use super::{DType, Element};
use crate::error::{Error, Result};
use std::ffi::c_void;
use std::fmt;

/// A host `f64` recast into the binary layout of a specific dtype
#[derive(Copy, Clone, PartialEq)]
pub enum TypedScalar {
    /// 16-bit float
    F16(half::f16),
    /// 16-bit brain float
    BF16(half::bf16),
    /// 32-bit float
    F32(f32),
    /// 64-bit float
    F64(f64),
    /// 32-bit signed integer
    I32(i32),
    /// 8-bit signed integer
    I8(i8),
}

impl TypedScalar {
    /// Recast `value` into the layout of `dtype`
    ///
    /// Narrow types lose precision; that is accepted, not an error.
    /// `I8x4` has no single-value representation and fails with
    /// `Error::UnsupportedType`.
    pub fn new(dtype: DType, value: f64) -> Result<Self> {
        Ok(match dtype {
            DType::F16 => Self::F16(Element::from_f64(value)),
            DType::BF16 => Self::BF16(Element::from_f64(value)),
            DType::F32 => Self::F32(Element::from_f64(value)),
            DType::F64 => Self::F64(value),
            DType::I32 => Self::I32(Element::from_f64(value)),
            DType::I8 => Self::I8(Element::from_f64(value)),
            DType::I8x4 => return Err(Error::unsupported_type(dtype, "TypedScalar::new")),
        })
    }

    /// Wrap an already-typed element value
    pub fn from_element<T: Element>(value: T) -> Self {
        match Self::new(T::DTYPE, value.to_f64()) {
            Ok(scalar) => scalar,
            // Every Element dtype has a scalar mapping
            Err(_) => unreachable!("element dtype {} without scalar mapping", T::DTYPE),
        }
    }

    /// Decode a scalar of `dtype` from its native byte representation
    ///
    /// Returns `None` when `bytes` is shorter than one element or the dtype
    /// has no scalar mapping.
    pub fn read(dtype: DType, bytes: &[u8]) -> Option<Self> {
        let bytes = bytes.get(..dtype.size_in_bytes())?;
        Some(match dtype {
            DType::F16 => Self::F16(bytemuck::pod_read_unaligned(bytes)),
            DType::BF16 => Self::BF16(bytemuck::pod_read_unaligned(bytes)),
            DType::F32 => Self::F32(bytemuck::pod_read_unaligned(bytes)),
            DType::F64 => Self::F64(bytemuck::pod_read_unaligned(bytes)),
            DType::I32 => Self::I32(bytemuck::pod_read_unaligned(bytes)),
            DType::I8 => Self::I8(bytemuck::pod_read_unaligned(bytes)),
            DType::I8x4 => return None,
        })
    }

    /// The dtype this scalar is encoded as
    pub fn dtype(&self) -> DType {
        match self {
            Self::F16(_) => DType::F16,
            Self::BF16(_) => DType::BF16,
            Self::F32(_) => DType::F32,
            Self::F64(_) => DType::F64,
            Self::I32(_) => DType::I32,
            Self::I8(_) => DType::I8,
        }
    }

    /// Read the scalar back as a host double
    pub fn to_f64(&self) -> f64 {
        match *self {
            Self::F16(v) => Element::to_f64(v),
            Self::BF16(v) => Element::to_f64(v),
            Self::F32(v) => Element::to_f64(v),
            Self::F64(v) => v,
            Self::I32(v) => Element::to_f64(v),
            Self::I8(v) => Element::to_f64(v),
        }
    }

    /// The scalar's backing bytes in native layout
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::F16(v) => bytemuck::bytes_of(v),
            Self::BF16(v) => bytemuck::bytes_of(v),
            Self::F32(v) => bytemuck::bytes_of(v),
            Self::F64(v) => bytemuck::bytes_of(v),
            Self::I32(v) => bytemuck::bytes_of(v),
            Self::I8(v) => bytemuck::bytes_of(v),
        }
    }

    /// Pointer to the backing bytes, for passing into a native call
    ///
    /// The pointer is valid only while `self` is borrowed; callers must not
    /// keep it past the call that consumes it.
    #[inline]
    pub fn as_ptr(&self) -> *const c_void {
        self.as_bytes().as_ptr().cast()
    }
}

impl fmt::Debug for TypedScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypedScalar({}: {})", self.dtype(), self.to_f64())
    }
}
