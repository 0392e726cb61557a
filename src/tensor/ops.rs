//! Operations on described memory: fill, scale, and layout transform
//!
//! Each operation reads the element type from a descriptor, coerces its host
//! coefficients into that type, and issues one native call. Nothing is
//! retried; a native rejection surfaces as `Error::OperationFailed`.

use super::TensorDescriptor;
use crate::dtype::TypedScalar;
use crate::error::{Error, Result};
use crate::runtime::{Backend, CallKind, DeviceMemory, RawMemory};

/// Check that `raw` can hold everything `desc` addresses
fn checked_memory<B: Backend>(
    desc: &TensorDescriptor<B>,
    raw: RawMemory,
    op: &'static str,
) -> Result<RawMemory> {
    let required = desc.size_in_bytes()?;
    if raw.size_in_bytes < required {
        return Err(Error::operation_failed(
            op,
            format!(
                "memory holds {} bytes, descriptor requires {}",
                raw.size_in_bytes, required
            ),
        ));
    }
    Ok(raw)
}

/// Fill every element of `mem`, as laid out by `desc`, with `value`
///
/// `value` is coerced to the descriptor's element type first.
pub fn fill<B: Backend, M: DeviceMemory>(
    handle: &B::Handle,
    desc: &TensorDescriptor<B>,
    mem: &mut M,
    value: f64,
) -> Result<()> {
    const OP: &str = "miopenSetTensor";

    let dtype = desc.dtype()?;
    let scalar = TypedScalar::new(dtype, value)?;
    let raw = checked_memory(desc, mem.as_raw_mut(), OP)?;

    // SAFETY: scalar matches the descriptor dtype and outlives the call;
    // raw was checked against the descriptor's byte size.
    unsafe { B::set_tensor(handle, desc.raw(), raw, scalar.as_ptr()) }
        .map_err(|status| status.into_error(OP, CallKind::Execute))
}

/// Multiply every element of `mem`, as laid out by `desc`, by `value` in place
pub fn scale<B: Backend, M: DeviceMemory>(
    handle: &B::Handle,
    desc: &TensorDescriptor<B>,
    mem: &mut M,
    value: f64,
) -> Result<()> {
    const OP: &str = "miopenScaleTensor";

    let dtype = desc.dtype()?;
    let scalar = TypedScalar::new(dtype, value)?;
    let raw = checked_memory(desc, mem.as_raw_mut(), OP)?;

    // SAFETY: as in `fill`
    unsafe { B::scale_tensor(handle, desc.raw(), raw, scalar.as_ptr()) }
        .map_err(|status| status.into_error(OP, CallKind::Execute))
}

/// Copy `x` into `y` with a layout change: `y = alpha * x + beta * y`
///
/// The descriptors must describe the same logical shape; their strides may
/// differ (e.g. packed to padded). Both coefficients take `x_desc`'s element
/// type, and `y_desc` is expected to share it.
#[allow(clippy::too_many_arguments)]
pub fn transform<B: Backend, X: DeviceMemory, Y: DeviceMemory>(
    handle: &B::Handle,
    alpha: f64,
    x_desc: &TensorDescriptor<B>,
    x: &X,
    beta: f64,
    y_desc: &TensorDescriptor<B>,
    y: &mut Y,
) -> Result<()> {
    const OP: &str = "miopenTransformTensor";

    let dtype = x_desc.dtype()?;
    let alpha = TypedScalar::new(dtype, alpha)?;
    let beta = TypedScalar::new(dtype, beta)?;
    let x_raw = checked_memory(x_desc, x.as_raw(), OP)?;
    let y_raw = checked_memory(y_desc, y.as_raw_mut(), OP)?;

    // SAFETY: both scalars match x_desc's dtype and outlive the call; x and y
    // are distinct borrows (y is exclusive), checked against their descriptors.
    unsafe {
        B::transform_tensor(
            handle,
            alpha.as_ptr(),
            x_desc.raw(),
            x_raw,
            beta.as_ptr(),
            y_desc.raw(),
            y_raw,
        )
    }
    .map_err(|status| status.into_error(OP, CallKind::Execute))
}

impl<B: Backend> TensorDescriptor<B> {
    /// Fill `mem` with `value`; see [`fill`]
    pub fn fill<M: DeviceMemory>(&self, handle: &B::Handle, mem: &mut M, value: f64) -> Result<()> {
        fill(handle, self, mem, value)
    }

    /// Scale `mem` by `value` in place; see [`scale`]
    pub fn scale<M: DeviceMemory>(&self, handle: &B::Handle, mem: &mut M, value: f64) -> Result<()> {
        scale(handle, self, mem, value)
    }
}
