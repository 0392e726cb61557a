//! CPU backend implementation
//!
//! The CPU backend keeps descriptor state in a process-wide table and runs
//! fill, scale and transform on host memory. It is the reference
//! implementation of the native descriptor ABI: every rule the accelerator
//! library enforces on `Set` is enforced here too.
//!
//! # Strided Layouts
//!
//! Kernels walk the logical index space in row-major order and address
//! memory through each descriptor's strides, so padded and permuted layouts
//! are handled without packing first.

mod device;
pub(crate) mod helpers;
mod kernels;
mod memory;
mod registry;
mod runtime;

pub use device::CpuHandle;
pub use memory::HostBuffer;
pub use runtime::{CpuBackend, CpuDescriptorId};
