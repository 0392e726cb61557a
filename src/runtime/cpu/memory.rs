//! Host buffers: device memory for the CPU backend

use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::runtime::{DeviceMemory, RawMemory, Status};
use std::alloc::{alloc_zeroed, dealloc, Layout as AllocLayout};
use std::fmt;
use std::ptr::NonNull;

/// AVX-512 friendly alignment for host allocations
const ALIGN: usize = 64;

/// Zero-initialized, 64-byte aligned heap allocation
///
/// Plays the role of device memory for the CPU backend: tensor operations
/// receive it through `DeviceMemory` and write into it by raw pointer.
pub struct HostBuffer {
    ptr: NonNull<u8>,
    len: usize,
}

// SAFETY: HostBuffer exclusively owns its allocation.
unsafe impl Send for HostBuffer {}
unsafe impl Sync for HostBuffer {}

impl HostBuffer {
    /// Allocate `size_bytes` zeroed bytes
    pub fn zeroed(size_bytes: usize) -> Result<Self> {
        if size_bytes == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                len: 0,
            });
        }

        let layout = AllocLayout::from_size_align(size_bytes, ALIGN).map_err(|_| Error::Allocation {
            op: "HostBuffer::zeroed",
            status: Status::AllocFailed,
        })?;

        // SAFETY: layout has non-zero size
        let ptr = unsafe { alloc_zeroed(layout) };
        match NonNull::new(ptr) {
            Some(ptr) => Ok(Self {
                ptr,
                len: size_bytes,
            }),
            None => std::alloc::handle_alloc_error(layout),
        }
    }

    /// Allocate a buffer holding a copy of `data`
    pub fn from_slice<T: Element>(data: &[T]) -> Result<Self> {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        let mut buffer = Self::zeroed(bytes.len())?;
        buffer.as_bytes_mut().copy_from_slice(bytes);
        Ok(buffer)
    }

    /// Copy the contents out as elements of `T`
    ///
    /// Trailing bytes that don't form a whole element are ignored.
    pub fn to_vec<T: Element>(&self) -> Vec<T> {
        self.as_bytes()
            .chunks_exact(std::mem::size_of::<T>())
            .map(bytemuck::pod_read_unaligned)
            .collect()
    }

    /// View the buffer as bytes
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: ptr is valid for len bytes (or dangling with len 0)
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// View the buffer as mutable bytes
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        // SAFETY: as above, and &mut self guarantees exclusivity
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Size in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl DeviceMemory for HostBuffer {
    fn as_raw(&self) -> RawMemory {
        RawMemory::new(self.ptr.as_ptr() as u64, self.len)
    }

    fn as_raw_mut(&mut self) -> RawMemory {
        RawMemory::new(self.as_bytes_mut().as_mut_ptr() as u64, self.len)
    }
}

impl Drop for HostBuffer {
    fn drop(&mut self) {
        if self.len == 0 {
            return;
        }
        if let Ok(layout) = AllocLayout::from_size_align(self.len, ALIGN) {
            // SAFETY: allocated in `zeroed` with this exact layout
            unsafe { dealloc(self.ptr.as_ptr(), layout) };
        }
    }
}

impl fmt::Debug for HostBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostBuffer")
            .field("ptr", &format!("0x{:x}", self.ptr.as_ptr() as usize))
            .field("len", &self.len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed() {
        let buf = HostBuffer::zeroed(16).unwrap();
        assert_eq!(buf.len(), 16);
        assert!(buf.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(buf.as_raw().ptr % ALIGN as u64, 0);
    }

    #[test]
    fn test_zero_size() {
        let buf = HostBuffer::zeroed(0).unwrap();
        assert!(buf.is_empty());
        assert_eq!(buf.size_in_bytes(), 0);
    }

    #[test]
    fn test_slice_roundtrip() {
        let data = [1.5f32, -2.0, 3.25];
        let buf = HostBuffer::from_slice(&data).unwrap();
        assert_eq!(buf.len(), 12);
        assert_eq!(buf.to_vec::<f32>(), data.to_vec());
    }
}
