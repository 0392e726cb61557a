//! Element trait for mapping Rust types to DType

use super::DType;
use bytemuck::{Pod, Zeroable};

/// Trait for types that can be elements of a described tensor
///
/// This trait connects Rust's type system to the runtime dtype carried by a
/// descriptor. It's implemented for every dtype that has a single-value host
/// representation (`I8x4` has none).
///
/// # Bounds
/// - `Copy + Send + Sync + 'static` - Basic trait requirements
/// - `Pod + Zeroable` - Safe memory transmutation (bytemuck)
/// - `PartialOrd` - Comparison in tests and kernels
pub trait Element: Copy + Send + Sync + Pod + Zeroable + PartialOrd + 'static {
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Convert to f64 for generic numeric operations
    fn to_f64(self) -> f64;

    /// Convert from f64 to this type
    ///
    /// Narrowing is lossy: floats round to nearest, integers truncate toward
    /// zero and saturate at the type bounds (NaN becomes 0).
    fn from_f64(v: f64) -> Self;
}

impl Element for f64 {
    const DTYPE: DType = DType::F64;

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }
}

impl Element for f32 {
    const DTYPE: DType = DType::F32;

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }
}

impl Element for i32 {
    const DTYPE: DType = DType::I32;

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as i32
    }
}

impl Element for i8 {
    const DTYPE: DType = DType::I8;

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as i8
    }
}

// ============================================================================
// Half-precision floating point types
// ============================================================================

impl Element for half::f16 {
    const DTYPE: DType = DType::F16;

    #[inline]
    fn to_f64(self) -> f64 {
        self.to_f64()
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        half::f16::from_f64(v)
    }
}

impl Element for half::bf16 {
    const DTYPE: DType = DType::BF16;

    #[inline]
    fn to_f64(self) -> f64 {
        self.to_f64()
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        half::bf16::from_f64(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_mapping() {
        assert_eq!(<f64 as Element>::DTYPE, DType::F64);
        assert_eq!(<f32 as Element>::DTYPE, DType::F32);
        assert_eq!(<i32 as Element>::DTYPE, DType::I32);
        assert_eq!(<i8 as Element>::DTYPE, DType::I8);
        assert_eq!(<half::f16 as Element>::DTYPE, DType::F16);
        assert_eq!(<half::bf16 as Element>::DTYPE, DType::BF16);
    }

    #[test]
    fn test_integer_narrowing_saturates() {
        assert_eq!(<i8 as Element>::from_f64(300.0), i8::MAX);
        assert_eq!(<i8 as Element>::from_f64(-300.0), i8::MIN);
        assert_eq!(<i32 as Element>::from_f64(2.9), 2);
        assert_eq!(<i32 as Element>::from_f64(f64::NAN), 0);
    }

    #[test]
    fn test_half_conversion() {
        let h = <half::f16 as Element>::from_f64(1.5);
        assert_eq!(Element::to_f64(h), 1.5);
        let b = <half::bf16 as Element>::from_f64(-2.0);
        assert_eq!(Element::to_f64(b), -2.0);
    }
}
