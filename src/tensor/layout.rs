//! Layout: dtype, shape and strides read back from a descriptor

use super::strides::{element_space, row_major_strides};
use super::{Shape, Strides};
use crate::dtype::DType;
use std::fmt;

/// Snapshot of a descriptor's configuration as reported by the native layer
///
/// Address of element at indices [i0, i1, ..., in]:
///   i0 * strides[0] + i1 * strides[1] + ... + in * strides[n]
#[derive(Clone, PartialEq, Eq)]
pub struct DescriptorLayout {
    dtype: DType,
    shape: Shape,
    strides: Strides,
}

impl DescriptorLayout {
    /// Create a layout with explicit dtype, shape, and strides
    pub fn new(dtype: DType, shape: Shape, strides: Strides) -> Self {
        debug_assert_eq!(shape.len(), strides.len());
        Self {
            dtype,
            shape,
            strides,
        }
    }

    /// Get the element type
    #[inline]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Get the strides
    #[inline]
    pub fn strides(&self) -> &Strides {
        &self.strides
    }

    /// Number of dimensions (rank)
    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements
    #[inline]
    pub fn elem_count(&self) -> usize {
        self.shape.elem_count()
    }

    /// Number of element slots the layout spans in memory
    ///
    /// `None` if the span does not fit `usize`.
    #[inline]
    pub fn element_space(&self) -> Option<usize> {
        element_space(&self.shape, &self.strides)
    }

    /// Check if strides are the row-major default for the shape
    pub fn is_packed(&self) -> bool {
        row_major_strides(&self.shape) == self.strides
    }

    /// Compute the linear index (element offset) for given indices
    pub fn index(&self, indices: &[usize]) -> Option<usize> {
        if indices.len() != self.rank() {
            return None;
        }

        let mut linear = 0usize;
        for ((&idx, &dim), &stride) in indices.iter().zip(self.shape.iter()).zip(self.strides.iter()) {
            if idx >= dim {
                return None;
            }
            linear = idx.checked_mul(stride)?.checked_add(linear)?;
        }

        Some(linear)
    }

    /// Split into its parts
    pub fn into_parts(self) -> (DType, Shape, Strides) {
        (self.dtype, self.shape, self.strides)
    }
}

impl fmt::Debug for DescriptorLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DescriptorLayout {{ dtype: {}, shape: {:?}, strides: {:?} }}",
            self.dtype,
            self.shape.as_slice(),
            self.strides.as_slice()
        )
    }
}

impl fmt::Display for DescriptorLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:?}", self.dtype, self.shape.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(shape: &[usize], strides: &[usize]) -> DescriptorLayout {
        DescriptorLayout::new(DType::F32, Shape::from(shape), Strides::from(strides))
    }

    #[test]
    fn test_packed_layout() {
        let l = layout(&[2, 3, 4], &[12, 4, 1]);
        assert_eq!(l.rank(), 3);
        assert_eq!(l.elem_count(), 24);
        assert_eq!(l.element_space(), Some(24));
        assert!(l.is_packed());
    }

    #[test]
    fn test_padded_layout() {
        let l = layout(&[2, 3], &[4, 1]);
        assert!(!l.is_packed());
        assert_eq!(l.elem_count(), 6);
        assert_eq!(l.element_space(), Some(7));
    }

    #[test]
    fn test_index() {
        let l = layout(&[2, 3], &[3, 1]);
        assert_eq!(l.index(&[0, 0]), Some(0));
        assert_eq!(l.index(&[0, 2]), Some(2));
        assert_eq!(l.index(&[1, 0]), Some(3));
        assert_eq!(l.index(&[1, 2]), Some(5));
        assert_eq!(l.index(&[2, 0]), None); // Out of bounds
        assert_eq!(l.index(&[1]), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(layout(&[2, 3], &[3, 1]).to_string(), "f32[2, 3]");
    }
}
