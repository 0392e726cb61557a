//! libMIOpen backend
//!
//! Binds the native descriptor ABI to ROCm's MIOpen library. Device memory
//! is provided by `HipBuffer`; the compute handle is `MiopenHandle`.
//!
//! # Requirements
//!
//! - ROCm with libMIOpen and libamdhip64 (see `build.rs`, `ROCM_PATH`)

mod ffi;
mod memory;

pub use memory::HipBuffer;

use crate::error::{Error, Result};
use crate::runtime::{Backend, CallKind, NativeResult, RawMemory, Status};
use crate::tensor::{abi_elem_count, MAX_DIMS};
use std::ffi::c_void;
use std::fmt;
use std::os::raw::c_int;
use std::ptr::{self, NonNull};

/// MIOpen descriptor backend
#[derive(Clone, Debug, Default)]
pub struct MiopenBackend;

/// Native `miopenTensorDescriptor_t`
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct MiopenDescriptor(NonNull<ffi::miopenTensorDescriptor>);

// SAFETY: MIOpen descriptors are plain host-side metadata; TensorDescriptor
// guarantees a single owner.
unsafe impl Send for MiopenDescriptor {}

impl MiopenDescriptor {
    #[inline]
    fn as_ptr(self) -> ffi::miopenTensorDescriptor_t {
        self.0.as_ptr()
    }
}

impl fmt::Debug for MiopenDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MiopenDescriptor({:p})", self.0.as_ptr())
    }
}

/// Owned `miopenHandle_t`, destroyed on drop
pub struct MiopenHandle {
    raw: NonNull<ffi::miopenHandle>,
}

impl MiopenHandle {
    /// Create a handle on the current HIP device
    pub fn new() -> Result<Self> {
        let mut raw: ffi::miopenHandle_t = ptr::null_mut();
        // SAFETY: out-pointer to a local
        Status::from(unsafe { ffi::miopenCreate(&mut raw) }).check("miopenCreate", CallKind::Create)?;
        let raw = NonNull::new(raw).ok_or(Error::Allocation {
            op: "miopenCreate",
            status: Status::AllocFailed,
        })?;
        Ok(Self { raw })
    }

    fn as_ptr(&self) -> ffi::miopenHandle_t {
        self.raw.as_ptr()
    }
}

impl Drop for MiopenHandle {
    fn drop(&mut self) {
        // SAFETY: created by miopenCreate and destroyed only here
        let status = Status::from(unsafe { ffi::miopenDestroy(self.raw.as_ptr()) });
        if !status.is_success() {
            log::warn!("miopenDestroy: {}", status);
        }
    }
}

impl fmt::Debug for MiopenHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MiopenHandle({:p})", self.raw.as_ptr())
    }
}

fn native(code: c_int) -> NativeResult<()> {
    Status::from(code).ok()
}

impl Backend for MiopenBackend {
    type RawDescriptor = MiopenDescriptor;
    type Handle = MiopenHandle;

    fn name() -> &'static str {
        "miopen"
    }

    fn create_tensor_descriptor() -> NativeResult<MiopenDescriptor> {
        let mut raw: ffi::miopenTensorDescriptor_t = ptr::null_mut();
        // SAFETY: out-pointer to a local
        native(unsafe { ffi::miopenCreateTensorDescriptor(&mut raw) })?;
        NonNull::new(raw).map(MiopenDescriptor).ok_or(Status::AllocFailed)
    }

    fn destroy_tensor_descriptor(desc: MiopenDescriptor) -> NativeResult<()> {
        // SAFETY: desc is live; single release is guaranteed by the caller
        native(unsafe { ffi::miopenDestroyTensorDescriptor(desc.as_ptr()) })
    }

    fn set_tensor_descriptor(
        desc: MiopenDescriptor,
        dtype: c_int,
        dims: &[c_int],
        strides: &[c_int],
    ) -> NativeResult<()> {
        if dims.len() != strides.len() || dims.is_empty() || dims.len() > MAX_DIMS {
            return Err(Status::BadParm);
        }
        // SAFETY: both buffers hold nb_dims entries
        native(unsafe {
            ffi::miopenSetTensorDescriptor(
                desc.as_ptr(),
                dtype,
                dims.len() as c_int,
                dims.as_ptr(),
                strides.as_ptr(),
            )
        })
    }

    fn get_tensor_descriptor(
        desc: MiopenDescriptor,
        dims: &mut [c_int; MAX_DIMS],
        strides: &mut [c_int; MAX_DIMS],
    ) -> NativeResult<c_int> {
        let mut dtype: c_int = 0;
        // SAFETY: MIOpen writes at most MAX_DIMS entries into each buffer
        native(unsafe {
            ffi::miopenGetTensorDescriptor(
                desc.as_ptr(),
                &mut dtype,
                dims.as_mut_ptr(),
                strides.as_mut_ptr(),
            )
        })?;
        Ok(dtype)
    }

    fn get_tensor_rank(desc: MiopenDescriptor) -> NativeResult<usize> {
        let mut rank: c_int = 0;
        // SAFETY: out-pointer to a local
        native(unsafe { ffi::miopenGetTensorDescriptorSize(desc.as_ptr(), &mut rank) })?;
        usize::try_from(rank).map_err(|_| Status::InternalError)
    }

    // MIOpen has no element-count query (miopenGetTensorDescriptorSize
    // reports the rank), so the count is the product of the native dims.
    fn get_tensor_num_elements(desc: MiopenDescriptor) -> NativeResult<usize> {
        let rank = Self::get_tensor_rank(desc)?;
        if rank == 0 {
            return Err(Status::NotInitialized);
        }
        if rank > MAX_DIMS {
            return Err(Status::InternalError);
        }
        let mut dims = [0; MAX_DIMS];
        let mut strides = [0; MAX_DIMS];
        Self::get_tensor_descriptor(desc, &mut dims, &mut strides)?;
        abi_elem_count(&dims[..rank]).ok_or(Status::BadParm)
    }

    fn get_tensor_num_bytes(desc: MiopenDescriptor) -> NativeResult<usize> {
        let mut bytes = 0usize;
        // SAFETY: out-pointer to a local
        native(unsafe { ffi::miopenGetTensorNumBytes(desc.as_ptr(), &mut bytes) })?;
        Ok(bytes)
    }

    unsafe fn set_tensor(
        handle: &MiopenHandle,
        desc: MiopenDescriptor,
        mem: RawMemory,
        value: *const c_void,
    ) -> NativeResult<()> {
        native(ffi::miopenSetTensor(
            handle.as_ptr(),
            desc.as_ptr(),
            mem.as_mut_ptr(),
            value,
        ))
    }

    unsafe fn scale_tensor(
        handle: &MiopenHandle,
        desc: MiopenDescriptor,
        mem: RawMemory,
        alpha: *const c_void,
    ) -> NativeResult<()> {
        native(ffi::miopenScaleTensor(
            handle.as_ptr(),
            desc.as_ptr(),
            mem.as_mut_ptr(),
            alpha,
        ))
    }

    unsafe fn transform_tensor(
        handle: &MiopenHandle,
        alpha: *const c_void,
        x_desc: MiopenDescriptor,
        x: RawMemory,
        beta: *const c_void,
        y_desc: MiopenDescriptor,
        y: RawMemory,
    ) -> NativeResult<()> {
        native(ffi::miopenTransformTensor(
            handle.as_ptr(),
            alpha,
            x_desc.as_ptr(),
            x.as_mut_ptr() as *const c_void,
            beta,
            y_desc.as_ptr(),
            y.as_mut_ptr(),
        ))
    }
}
