//! HIP device allocations

use super::ffi;
use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::runtime::{DeviceMemory, RawMemory, Status};
use std::ffi::c_void;
use std::fmt;
use std::ptr;

/// Device allocation made with `hipMalloc`, freed on drop
pub struct HipBuffer {
    ptr: *mut c_void,
    len: usize,
}

// SAFETY: HipBuffer exclusively owns its device allocation.
unsafe impl Send for HipBuffer {}
unsafe impl Sync for HipBuffer {}

impl HipBuffer {
    /// Allocate `size_bytes` of uninitialized device memory
    pub fn new(size_bytes: usize) -> Result<Self> {
        let mut ptr: *mut c_void = ptr::null_mut();
        // SAFETY: out-pointer to a local
        let code = unsafe { ffi::hipMalloc(&mut ptr, size_bytes) };
        if code != ffi::HIP_SUCCESS || (ptr.is_null() && size_bytes != 0) {
            return Err(Error::Allocation {
                op: "hipMalloc",
                status: Status::AllocFailed,
            });
        }
        Ok(Self {
            ptr,
            len: size_bytes,
        })
    }

    /// Allocate device memory and upload `data` into it
    pub fn from_slice<T: Element>(data: &[T]) -> Result<Self> {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        let buffer = Self::new(bytes.len())?;
        // SAFETY: both regions are bytes.len() long
        let code = unsafe {
            ffi::hipMemcpy(
                buffer.ptr,
                bytes.as_ptr().cast(),
                bytes.len(),
                ffi::HIP_MEMCPY_HOST_TO_DEVICE,
            )
        };
        if code != ffi::HIP_SUCCESS {
            return Err(Error::operation_failed("hipMemcpy", format!("hip error {code}")));
        }
        Ok(buffer)
    }

    /// Download the contents as elements of `T`
    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>> {
        let mut result = vec![T::zeroed(); self.len / std::mem::size_of::<T>()];
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut result);
        // SAFETY: bytes.len() <= self.len
        let code = unsafe {
            ffi::hipMemcpy(
                bytes.as_mut_ptr().cast(),
                self.ptr,
                bytes.len(),
                ffi::HIP_MEMCPY_DEVICE_TO_HOST,
            )
        };
        if code != ffi::HIP_SUCCESS {
            return Err(Error::operation_failed("hipMemcpy", format!("hip error {code}")));
        }
        Ok(result)
    }
}

impl DeviceMemory for HipBuffer {
    fn as_raw(&self) -> RawMemory {
        RawMemory::new(self.ptr as u64, self.len)
    }
}

impl Drop for HipBuffer {
    fn drop(&mut self) {
        if self.ptr.is_null() {
            return;
        }
        // SAFETY: allocated by hipMalloc and freed only here
        let code = unsafe { ffi::hipFree(self.ptr) };
        if code != ffi::HIP_SUCCESS {
            log::warn!("hipFree: hip error {}", code);
        }
    }
}

impl fmt::Debug for HipBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HipBuffer")
            .field("ptr", &self.ptr)
            .field("len", &self.len)
            .finish()
    }
}
