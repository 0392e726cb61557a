//! Tensor descriptors and the operations that act on described memory
//!
//! This module provides `TensorDescriptor`, the owned handle describing a
//! tensor's element type, shape and strides to the native backend, along with
//! the shape/stride utilities it relies on.

mod descriptor;
mod layout;
pub mod ops;
mod shape;
mod strides;

pub use descriptor::TensorDescriptor;
pub use layout::DescriptorLayout;
pub use ops::{fill, scale, transform};
#[cfg(feature = "miopen")]
pub(crate) use shape::abi_elem_count;
pub use shape::{checked_elem_count, from_abi, to_abi, validate_shape, AbiDims, Shape};
pub use strides::{
    checked_row_major_strides, element_space, layout_size_in_bytes, row_major_strides, Strides,
};

/// Maximum number of dimensions the native library supports
pub const MAX_DIMS: usize = 5;
