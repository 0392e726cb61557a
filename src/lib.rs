//! # miotensor
//!
//! **Tensor descriptors and typed scalars for MIOpen-style GPU primitives.**
//!
//! Accelerator libraries describe every tensor argument with an opaque
//! descriptor: element type, rank, shape and strides. miotensor owns those
//! descriptors, validates what goes into them, reads them back, and releases
//! them deterministically. It also recasts host `f64` coefficients into the
//! element type a primitive expects, and wraps the descriptor-level
//! operations (fill, scale, layout transform).
//!
//! ## Quick Start
//!
//! ```rust
//! use miotensor::prelude::*;
//!
//! # fn main() -> miotensor::error::Result<()> {
//! let handle = CpuHandle::new();
//! let desc = TensorDescriptor::<CpuBackend>::with_layout(DType::F32, &[2, 3], None)?;
//! assert_eq!(desc.get()?.strides().as_slice(), &[3, 1]);
//!
//! let mut mem = HostBuffer::zeroed(desc.size_in_bytes()?)?;
//! desc.fill(&handle, &mut mem, 1.5)?;
//! assert_eq!(mem.to_vec::<f32>(), vec![1.5; 6]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `cpu` (default): host-memory reference backend
//! - `miopen`: libMIOpen / HIP backend (links against ROCm)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod dtype;
pub mod error;
pub mod runtime;
pub mod tensor;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dtype::{DType, Element, TypedScalar};
    pub use crate::error::{Error, Result};
    pub use crate::runtime::{Backend, DeviceMemory, RawMemory, Status};
    pub use crate::tensor::{
        fill, row_major_strides, scale, transform, DescriptorLayout, Shape, Strides,
        TensorDescriptor, MAX_DIMS,
    };

    #[cfg(feature = "cpu")]
    pub use crate::runtime::cpu::{CpuBackend, CpuHandle, HostBuffer};

    #[cfg(feature = "miopen")]
    pub use crate::runtime::miopen::{HipBuffer, MiopenBackend, MiopenHandle};
}

/// Default backend based on enabled features
///
/// - With `miopen` feature: `MiopenBackend`
/// - Otherwise: `CpuBackend`
#[cfg(feature = "miopen")]
pub type DefaultBackend = runtime::miopen::MiopenBackend;

/// Default backend based on enabled features
#[cfg(all(feature = "cpu", not(feature = "miopen")))]
pub type DefaultBackend = runtime::cpu::CpuBackend;
