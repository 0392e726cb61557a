//! Host kernels for fill, scale and transform over strided layouts
//!
//! All element access goes through unaligned reads and writes, so kernels
//! accept any base pointer the caller hands in.

use super::helpers::{dispatch_dtype, for_each_offset_pair};
use super::registry::DescConfig;
use crate::dtype::{DType, Element, TypedScalar};
use crate::runtime::{NativeResult, RawMemory, Status};
use std::ffi::c_void;
use std::ptr;

/// Reject memory too small for the layout described by `config`
fn check_extent(config: &DescConfig, mem: RawMemory) -> NativeResult<()> {
    if mem.ptr == 0 || mem.size_in_bytes < config.num_bytes() {
        return Err(Status::BadParm);
    }
    Ok(())
}

/// Decode the coefficient at `ptr` as one element of `dtype`
///
/// # Safety
/// A non-null `ptr` points to `dtype.size_in_bytes()` readable bytes.
unsafe fn read_coefficient(dtype: DType, ptr: *const c_void) -> NativeResult<TypedScalar> {
    if ptr.is_null() {
        return Err(Status::BadParm);
    }
    let bytes = std::slice::from_raw_parts(ptr as *const u8, dtype.size_in_bytes());
    TypedScalar::read(dtype, bytes).ok_or(Status::UnsupportedOp)
}

/// Write the element at `value` into every slot addressed by `config`
///
/// # Safety
/// `value` points to one element of `config.dtype`; `mem` is a live
/// allocation of `mem.size_in_bytes` bytes.
pub(crate) unsafe fn fill(config: &DescConfig, mem: RawMemory, value: *const c_void) -> NativeResult<()> {
    check_extent(config, mem)?;
    let value = read_coefficient(config.dtype, value)?;
    dispatch_dtype!(config.dtype, T => {
        let v: T = bytemuck::pod_read_unaligned(value.as_bytes());
        let base = mem.as_mut_ptr() as *mut T;
        for_each_offset_pair(&config.dims, &config.strides, &config.strides, |off, _| {
            ptr::write_unaligned(base.add(off), v);
        });
    });
    Ok(())
}

/// Multiply every slot addressed by `config` by the element at `alpha`
///
/// Arithmetic is done in f64 and narrowed back to the element type.
///
/// # Safety
/// Same as [`fill`].
pub(crate) unsafe fn scale(config: &DescConfig, mem: RawMemory, alpha: *const c_void) -> NativeResult<()> {
    check_extent(config, mem)?;
    let a = read_coefficient(config.dtype, alpha)?.to_f64();
    dispatch_dtype!(config.dtype, T => {
        let base = mem.as_mut_ptr() as *mut T;
        for_each_offset_pair(&config.dims, &config.strides, &config.strides, |off, _| {
            let p = base.add(off);
            let v = ptr::read_unaligned(p).to_f64();
            ptr::write_unaligned(p, T::from_f64(v * a));
        });
    });
    Ok(())
}

/// `y = alpha * x + beta * y` across two layouts of the same shape
///
/// When `beta` is zero `y` is not read, so stale NaNs in the destination
/// don't propagate. With `alpha == 1` and `beta == 0` elements are copied
/// bit for bit.
///
/// # Safety
/// `alpha` and `beta` point to one element of `x_cfg.dtype`; `x` and `y` are
/// live, non-overlapping allocations of their stated sizes.
pub(crate) unsafe fn transform(
    alpha: *const c_void,
    x_cfg: &DescConfig,
    x: RawMemory,
    beta: *const c_void,
    y_cfg: &DescConfig,
    y: RawMemory,
) -> NativeResult<()> {
    if x_cfg.dtype != y_cfg.dtype || x_cfg.dims != y_cfg.dims {
        return Err(Status::BadParm);
    }
    check_extent(x_cfg, x)?;
    check_extent(y_cfg, y)?;
    let a = read_coefficient(x_cfg.dtype, alpha)?.to_f64();
    let b = read_coefficient(x_cfg.dtype, beta)?.to_f64();

    dispatch_dtype!(x_cfg.dtype, T => {
        let src = x.as_mut_ptr() as *const T;
        let dst = y.as_mut_ptr() as *mut T;

        if a == 1.0 && b == 0.0 {
            for_each_offset_pair(&x_cfg.dims, &x_cfg.strides, &y_cfg.strides, |xo, yo| {
                ptr::write_unaligned(dst.add(yo), ptr::read_unaligned(src.add(xo)));
            });
        } else if b == 0.0 {
            for_each_offset_pair(&x_cfg.dims, &x_cfg.strides, &y_cfg.strides, |xo, yo| {
                let xv = ptr::read_unaligned(src.add(xo)).to_f64();
                ptr::write_unaligned(dst.add(yo), T::from_f64(a * xv));
            });
        } else {
            for_each_offset_pair(&x_cfg.dims, &x_cfg.strides, &y_cfg.strides, |xo, yo| {
                let xv = ptr::read_unaligned(src.add(xo)).to_f64();
                let yv = ptr::read_unaligned(dst.add(yo)).to_f64();
                ptr::write_unaligned(dst.add(yo), T::from_f64(a * xv + b * yv));
            });
        }
    });
    Ok(())
}
