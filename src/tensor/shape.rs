//! Shape type: dimensions of a described tensor, plus ABI width conversion

use super::MAX_DIMS;
use crate::error::{Error, Result};
use smallvec::SmallVec;
use std::fmt;
use std::iter::FromIterator;
use std::ops::Deref;
use std::os::raw::c_int;

/// Dimension values in the native ABI's integer width
pub type AbiDims = SmallVec<[c_int; MAX_DIMS]>;

/// Shape type: dimensions of a tensor
///
/// Descriptors never exceed `MAX_DIMS` dimensions, so shapes always live on
/// the stack.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Shape(SmallVec<[usize; MAX_DIMS]>);

impl Shape {
    /// Create an empty shape.
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// View shape as a slice.
    pub fn as_slice(&self) -> &[usize] {
        self.0.as_slice()
    }

    /// Number of dimensions in this shape.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    /// Total number of elements
    #[inline]
    pub fn elem_count(&self) -> usize {
        self.0.iter().product()
    }
}

/// Product of the dimensions, or `None` if it does not fit `usize`
pub fn checked_elem_count(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
}

/// Product of native-width dimensions
///
/// `None` if a dimension is negative or the product does not fit `usize`.
#[cfg_attr(not(feature = "miopen"), allow(dead_code))]
pub(crate) fn abi_elem_count(dims: &[c_int]) -> Option<usize> {
    dims.iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(usize::try_from(d).ok()?))
}

/// Check that `shape` is a valid descriptor shape
///
/// A valid shape has 1..=`MAX_DIMS` dimensions, each strictly positive.
pub fn validate_shape(shape: &[usize], op: &'static str) -> Result<()> {
    if shape.is_empty() || shape.len() > MAX_DIMS {
        return Err(Error::invalid_configuration(
            op,
            format!(
                "rank {} outside supported range 1..={}",
                shape.len(),
                MAX_DIMS
            ),
        ));
    }
    if let Some(axis) = shape.iter().position(|&d| d == 0) {
        return Err(Error::invalid_configuration(
            op,
            format!("dimension {axis} of shape {shape:?} is zero"),
        ));
    }
    Ok(())
}

/// Convert host-width values into the native ABI's `c_int`
///
/// Fails with `InvalidConfiguration` if any value does not fit.
pub fn to_abi(values: &[usize], op: &'static str) -> Result<AbiDims> {
    values
        .iter()
        .map(|&v| {
            c_int::try_from(v).map_err(|_| {
                Error::invalid_configuration(op, format!("value {v} exceeds native int width"))
            })
        })
        .collect()
}

/// Convert native `c_int` values back to host width
///
/// Negative values (never produced by a configured descriptor) clamp to 0.
pub fn from_abi<T: FromIterator<usize>>(values: &[c_int]) -> T {
    values
        .iter()
        .map(|&v| usize::try_from(v).unwrap_or(0))
        .collect()
}

impl Deref for Shape {
    type Target = [usize];

    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<[usize]> for Shape {
    fn as_ref(&self) -> &[usize] {
        self.0.as_slice()
    }
}

impl From<&[usize]> for Shape {
    fn from(value: &[usize]) -> Self {
        Self(value.iter().copied().collect())
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(value: [usize; N]) -> Self {
        Self(value.into_iter().collect())
    }
}

impl FromIterator<usize> for Shape {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl PartialEq<[usize]> for Shape {
    fn eq(&self, other: &[usize]) -> bool {
        self.as_slice() == other
    }
}

impl<const N: usize> PartialEq<[usize; N]> for Shape {
    fn eq(&self, other: &[usize; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}
