//! Native backends for tensor descriptors
//!
//! This module defines the `Backend` trait, the narrow native ABI the
//! descriptor layer consumes, and provides implementations for a host-memory
//! reference backend and libMIOpen.
//!
//! # Architecture
//!
//! ```text
//! Backend (native ABI identity)
//! ├── RawDescriptor (opaque descriptor handle, owned by TensorDescriptor)
//! ├── Handle (compute context, owned by the caller)
//! └── descriptor / fill / scale / transform entry points returning Status
//! DeviceMemory (caller-owned allocation, viewed as RawMemory)
//! ```

mod status;

#[cfg(feature = "cpu")]
pub mod cpu;

#[cfg(feature = "miopen")]
pub mod miopen;

pub use status::{CallKind, Status};

use crate::tensor::MAX_DIMS;
use std::ffi::c_void;
use std::fmt;
use std::os::raw::c_int;

/// Result of a native call: the produced value, or the failing status
pub type NativeResult<T> = std::result::Result<T, Status>;

/// Core trait for native descriptor backends
///
/// Every method corresponds to one call of the accelerator library's tensor
/// descriptor API. Methods report failure as the raw `Status`; attaching the
/// operation name and choosing the error kind is the caller's job.
///
/// Descriptor handles are plain copyable tokens. Ownership (and the
/// guarantee that `destroy_tensor_descriptor` runs exactly once) is enforced
/// by `TensorDescriptor`, not by the backend.
pub trait Backend: Sized + Send + Sync + 'static {
    /// Opaque native descriptor handle
    type RawDescriptor: Copy + fmt::Debug + Send;

    /// Compute handle (execution context) required by tensor operations
    type Handle;

    /// Human-readable name of this backend
    fn name() -> &'static str;

    /// Allocate a new, unconfigured descriptor
    fn create_tensor_descriptor() -> NativeResult<Self::RawDescriptor>;

    /// Release a descriptor
    ///
    /// Calling this twice on the same handle is undefined at the native
    /// level; callers must guarantee single release.
    fn destroy_tensor_descriptor(desc: Self::RawDescriptor) -> NativeResult<()>;

    /// Configure a descriptor with `dims.len()` dimensions
    ///
    /// `dims` and `strides` always have the same length.
    fn set_tensor_descriptor(
        desc: Self::RawDescriptor,
        dtype: c_int,
        dims: &[c_int],
        strides: &[c_int],
    ) -> NativeResult<()>;

    /// Read a descriptor's configuration
    ///
    /// Writes the first `rank` entries of `dims` and `strides` and returns
    /// the raw dtype code.
    fn get_tensor_descriptor(
        desc: Self::RawDescriptor,
        dims: &mut [c_int; MAX_DIMS],
        strides: &mut [c_int; MAX_DIMS],
    ) -> NativeResult<c_int>;

    /// Number of dimensions the descriptor was configured with
    fn get_tensor_rank(desc: Self::RawDescriptor) -> NativeResult<usize>;

    /// Number of logical elements (product of dimensions)
    fn get_tensor_num_elements(desc: Self::RawDescriptor) -> NativeResult<usize>;

    /// Bytes needed to hold the tensor, including stride padding
    fn get_tensor_num_bytes(desc: Self::RawDescriptor) -> NativeResult<usize>;

    /// Write `*value` into every element of `mem` addressed by `desc`
    ///
    /// # Safety
    /// - `value` must point to one element of the descriptor's dtype
    /// - `mem` must describe a live allocation at least
    ///   `get_tensor_num_bytes(desc)` bytes long
    unsafe fn set_tensor(
        handle: &Self::Handle,
        desc: Self::RawDescriptor,
        mem: RawMemory,
        value: *const c_void,
    ) -> NativeResult<()>;

    /// Multiply every element of `mem` addressed by `desc` by `*alpha`
    ///
    /// # Safety
    /// Same requirements as [`Backend::set_tensor`].
    unsafe fn scale_tensor(
        handle: &Self::Handle,
        desc: Self::RawDescriptor,
        mem: RawMemory,
        alpha: *const c_void,
    ) -> NativeResult<()>;

    /// `y = alpha * x + beta * y`, remapping from `x_desc` to `y_desc` layout
    ///
    /// # Safety
    /// - `alpha` and `beta` must point to one element of `x_desc`'s dtype
    /// - `x` and `y` must describe live, non-overlapping allocations large
    ///   enough for their descriptors
    #[allow(clippy::too_many_arguments)]
    unsafe fn transform_tensor(
        handle: &Self::Handle,
        alpha: *const c_void,
        x_desc: Self::RawDescriptor,
        x: RawMemory,
        beta: *const c_void,
        y_desc: Self::RawDescriptor,
        y: RawMemory,
    ) -> NativeResult<()>;
}

/// Device allocation that can be handed to tensor operations
///
/// Implemented by whatever owns the memory (a host buffer, a HIP
/// allocation). The descriptor layer never allocates or frees through it.
pub trait DeviceMemory {
    /// Raw view of the allocation, for reading
    fn as_raw(&self) -> RawMemory;

    /// Raw view of the allocation, for native calls that write through it
    ///
    /// Host-backed memory must derive the pointer from the exclusive borrow.
    #[inline]
    fn as_raw_mut(&mut self) -> RawMemory {
        self.as_raw()
    }

    /// Committed size in bytes
    #[inline]
    fn size_in_bytes(&self) -> usize {
        self.as_raw().size_in_bytes
    }
}

/// Raw memory view for passing to native calls
///
/// A simple struct that can be passed across the FFI boundary without
/// lifetime complications.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RawMemory {
    /// Device pointer (or host pointer cast to u64)
    pub ptr: u64,
    /// Committed length in bytes
    pub size_in_bytes: usize,
}

impl RawMemory {
    /// Create a new raw memory view
    #[inline]
    pub const fn new(ptr: u64, size_in_bytes: usize) -> Self {
        Self { ptr, size_in_bytes }
    }

    /// Pointer as an untyped mutable pointer
    #[inline]
    pub fn as_mut_ptr(&self) -> *mut c_void {
        self.ptr as usize as *mut c_void
    }
}
