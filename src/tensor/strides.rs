//! Strides type: element offsets for a described tensor's memory layout

use super::shape::checked_elem_count;
use super::MAX_DIMS;
use crate::dtype::DType;
use smallvec::SmallVec;
use std::fmt;
use std::iter::FromIterator;
use std::ops::Deref;

/// Strides type: element offsets between consecutive elements along each dimension
/// NOTE: Strides are in ELEMENTS, not bytes
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Strides(SmallVec<[usize; MAX_DIMS]>);

impl Strides {
    /// Create empty strides.
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// View strides as a slice.
    pub fn as_slice(&self) -> &[usize] {
        self.0.as_slice()
    }
}

/// Compute row-major (C-contiguous) strides for a shape
///
/// The last dimension has stride 1 and each earlier stride is the product
/// of all later dimensions. An empty shape yields empty strides. Strides
/// that do not fit `usize` saturate; use [`checked_row_major_strides`] to
/// detect that case.
///
/// # Example
/// ```
/// use miotensor::tensor::row_major_strides;
/// assert_eq!(row_major_strides(&[2, 3, 4]).as_slice(), &[12, 4, 1]);
/// ```
pub fn row_major_strides(shape: &[usize]) -> Strides {
    let mut strides = SmallVec::<[usize; MAX_DIMS]>::with_capacity(shape.len());
    let mut stride = 1usize;

    // Compute strides from last dimension to first
    for &dim in shape.iter().rev() {
        strides.push(stride);
        stride = stride.saturating_mul(dim);
    }

    strides.reverse();
    Strides(strides)
}

/// Row-major strides, or `None` if any stride overflows `usize`
pub fn checked_row_major_strides(shape: &[usize]) -> Option<Strides> {
    let mut strides = SmallVec::<[usize; MAX_DIMS]>::with_capacity(shape.len());
    let mut stride = 1usize;

    for (i, &dim) in shape.iter().enumerate().rev() {
        strides.push(stride);
        if i > 0 {
            stride = stride.checked_mul(dim)?;
        }
    }

    strides.reverse();
    Some(Strides(strides))
}

/// Number of element slots a strided layout spans
///
/// `1 + Σ (dim - 1) * stride`, the distance from the first to the last
/// addressed element plus one. Equals the element count for packed layouts
/// and exceeds it for padded ones. Zero if any dimension is zero, `None` if
/// the span does not fit `usize`.
pub fn element_space(shape: &[usize], strides: &[usize]) -> Option<usize> {
    if shape.iter().any(|&d| d == 0) {
        return Some(0);
    }
    shape
        .iter()
        .zip(strides)
        .try_fold(1usize, |acc, (&d, &s)| (d - 1).checked_mul(s)?.checked_add(acc))
}

/// Bytes a strided layout of `dtype` elements spans, or `None` on overflow
///
/// Both the element count and the byte span must fit `usize`; a layout
/// passing this check can be walked without overflowing an offset.
pub fn layout_size_in_bytes(dtype: DType, shape: &[usize], strides: &[usize]) -> Option<usize> {
    checked_elem_count(shape)?;
    element_space(shape, strides)?.checked_mul(dtype.size_in_bytes())
}

impl Deref for Strides {
    type Target = [usize];

    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

impl fmt::Debug for Strides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<[usize]> for Strides {
    fn as_ref(&self) -> &[usize] {
        self.0.as_slice()
    }
}

impl From<&[usize]> for Strides {
    fn from(value: &[usize]) -> Self {
        Self(value.iter().copied().collect())
    }
}

impl<const N: usize> From<[usize; N]> for Strides {
    fn from(value: [usize; N]) -> Self {
        Self(value.into_iter().collect())
    }
}

impl FromIterator<usize> for Strides {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl PartialEq<[usize]> for Strides {
    fn eq(&self, other: &[usize]) -> bool {
        self.as_slice() == other
    }
}

impl<const N: usize> PartialEq<[usize; N]> for Strides {
    fn eq(&self, other: &[usize; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}
