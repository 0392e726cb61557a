//! CPU backend implementation

use super::device::CpuHandle;
use super::{kernels, registry};
use crate::runtime::{Backend, NativeResult, RawMemory, Status};
use crate::tensor::MAX_DIMS;
use std::ffi::c_void;
use std::fmt;
use std::os::raw::c_int;

/// CPU descriptor backend
///
/// A host-memory implementation of the native descriptor ABI. It applies the
/// same validation the accelerator library does (rank 1..=5, positive
/// dimensions and strides, known dtype) and runs fill/scale/transform on
/// `HostBuffer`s.
#[derive(Clone, Debug, Default)]
pub struct CpuBackend;

/// Native descriptor handle of the CPU backend
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct CpuDescriptorId(u64);

impl CpuDescriptorId {
    /// Get the raw id value
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for CpuDescriptorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CpuDescriptor({})", self.0)
    }
}

impl CpuBackend {
    /// Whether `desc` is still allocated in the descriptor table
    pub fn is_live(desc: CpuDescriptorId) -> bool {
        registry::is_live(desc.0)
    }
}

impl Backend for CpuBackend {
    type RawDescriptor = CpuDescriptorId;
    type Handle = CpuHandle;

    fn name() -> &'static str {
        "cpu"
    }

    fn create_tensor_descriptor() -> NativeResult<CpuDescriptorId> {
        Ok(CpuDescriptorId(registry::create()))
    }

    fn destroy_tensor_descriptor(desc: CpuDescriptorId) -> NativeResult<()> {
        registry::destroy(desc.0)
    }

    fn set_tensor_descriptor(
        desc: CpuDescriptorId,
        dtype: c_int,
        dims: &[c_int],
        strides: &[c_int],
    ) -> NativeResult<()> {
        let config = registry::DescConfig::from_abi(dtype, dims, strides)?;
        registry::configure(desc.0, config)
    }

    fn get_tensor_descriptor(
        desc: CpuDescriptorId,
        dims: &mut [c_int; MAX_DIMS],
        strides: &mut [c_int; MAX_DIMS],
    ) -> NativeResult<c_int> {
        let config = registry::lookup(desc.0)?;
        for (i, (&d, &s)) in config.dims.iter().zip(config.strides.iter()).enumerate() {
            // Values were validated from c_int on the way in
            dims[i] = c_int::try_from(d).map_err(|_| Status::InternalError)?;
            strides[i] = c_int::try_from(s).map_err(|_| Status::InternalError)?;
        }
        Ok(config.dtype.to_raw())
    }

    fn get_tensor_rank(desc: CpuDescriptorId) -> NativeResult<usize> {
        Ok(registry::lookup(desc.0)?.dims.len())
    }

    fn get_tensor_num_elements(desc: CpuDescriptorId) -> NativeResult<usize> {
        Ok(registry::lookup(desc.0)?.num_elements())
    }

    fn get_tensor_num_bytes(desc: CpuDescriptorId) -> NativeResult<usize> {
        Ok(registry::lookup(desc.0)?.num_bytes())
    }

    unsafe fn set_tensor(
        _handle: &CpuHandle,
        desc: CpuDescriptorId,
        mem: RawMemory,
        value: *const c_void,
    ) -> NativeResult<()> {
        let config = registry::lookup(desc.0)?;
        kernels::fill(&config, mem, value)
    }

    unsafe fn scale_tensor(
        _handle: &CpuHandle,
        desc: CpuDescriptorId,
        mem: RawMemory,
        alpha: *const c_void,
    ) -> NativeResult<()> {
        let config = registry::lookup(desc.0)?;
        kernels::scale(&config, mem, alpha)
    }

    unsafe fn transform_tensor(
        _handle: &CpuHandle,
        alpha: *const c_void,
        x_desc: CpuDescriptorId,
        x: RawMemory,
        beta: *const c_void,
        y_desc: CpuDescriptorId,
        y: RawMemory,
    ) -> NativeResult<()> {
        let x_cfg = registry::lookup(x_desc.0)?;
        let y_cfg = registry::lookup(y_desc.0)?;
        kernels::transform(alpha, &x_cfg, x, beta, &y_cfg, y)
    }
}
