//! TensorDescriptor: owned native descriptor handle
//!
//! A descriptor records a tensor's element type, shape and strides without
//! owning the data buffer. The native handle is allocated on creation and
//! released exactly once, when the descriptor is dropped or explicitly
//! released.

use super::layout::DescriptorLayout;
use super::shape::{from_abi, to_abi, validate_shape};
use super::strides::{checked_row_major_strides, layout_size_in_bytes};
use super::{Shape, Strides, MAX_DIMS};
use crate::dtype::DType;
use crate::error::{Error, Result};
use crate::runtime::{Backend, CallKind};
use std::fmt;
use std::marker::PhantomData;
use std::os::raw::c_int;

/// Owned tensor descriptor for backend `B`
///
/// Move-only: there is no `Clone`, since two owners would release the same
/// native handle. To describe the same layout twice, create a second
/// descriptor and `set` it.
pub struct TensorDescriptor<B: Backend> {
    /// Native handle, valid until drop or `release`
    raw: B::RawDescriptor,
    /// Rank recorded by the last successful `set`; 0 = not configured here
    rank: usize,
    _backend: PhantomData<fn() -> B>,
}

impl<B: Backend> TensorDescriptor<B> {
    /// Create an empty, unconfigured descriptor
    ///
    /// Fails with `Error::Allocation` if the native layer cannot allocate a
    /// handle; nothing needs releasing in that case.
    pub fn new() -> Result<Self> {
        let raw = B::create_tensor_descriptor()
            .map_err(|status| status.into_error("miopenCreateTensorDescriptor", CallKind::Create))?;
        log::trace!("{}: created tensor descriptor {:?}", B::name(), raw);
        Ok(Self {
            raw,
            rank: 0,
            _backend: PhantomData,
        })
    }

    /// Create a descriptor and configure it in one step
    pub fn with_layout(dtype: DType, shape: &[usize], strides: Option<&[usize]>) -> Result<Self> {
        let mut desc = Self::new()?;
        desc.set(dtype, shape, strides)?;
        Ok(desc)
    }

    /// Configure the descriptor's element type, shape and strides
    ///
    /// `shape` must have 1..=`MAX_DIMS` strictly positive dimensions. When
    /// `strides` is `None` (or empty) the row-major default is used;
    /// otherwise it must have the same length as `shape`. Every dimension and
    /// stride must fit the native `int`, and the element count and byte span
    /// of the layout must fit `usize`.
    ///
    /// May be called any number of times. A failed call leaves the previously
    /// recorded rank in place.
    pub fn set(&mut self, dtype: DType, shape: &[usize], strides: Option<&[usize]>) -> Result<()> {
        const OP: &str = "miopenSetTensorDescriptor";

        validate_shape(shape, OP)?;
        let strides = match strides {
            Some(s) if !s.is_empty() => {
                if s.len() != shape.len() {
                    return Err(Error::invalid_configuration(
                        OP,
                        format!(
                            "stride length {} does not match shape length {}",
                            s.len(),
                            shape.len()
                        ),
                    ));
                }
                Strides::from(s)
            }
            _ => checked_row_major_strides(shape).ok_or_else(|| {
                Error::invalid_configuration(
                    OP,
                    format!("row-major strides of shape {shape:?} overflow"),
                )
            })?,
        };
        if layout_size_in_bytes(dtype, shape, &strides).is_none() {
            return Err(Error::invalid_configuration(
                OP,
                format!("layout {shape:?} strides {strides:?} is not addressable"),
            ));
        }

        let dims = to_abi(shape, OP)?;
        let abi_strides = to_abi(&strides, OP)?;
        B::set_tensor_descriptor(self.raw, dtype.to_raw(), &dims, &abi_strides)
            .map_err(|status| status.into_error(OP, CallKind::Configure))?;

        self.rank = shape.len();
        log::trace!(
            "{}: set descriptor {:?} to {} {:?} strides {:?}",
            B::name(),
            self.raw,
            dtype,
            shape,
            strides
        );
        Ok(())
    }

    /// Configure a packed NCHW descriptor
    pub fn set_4d(&mut self, dtype: DType, n: usize, c: usize, h: usize, w: usize) -> Result<()> {
        self.set(dtype, &[n, c, h, w], None)
    }

    /// Read back the descriptor's element type, shape and strides
    ///
    /// The native query always writes into `MAX_DIMS`-wide buffers. When this
    /// wrapper has not recorded a rank (the descriptor was configured through
    /// another native path, or not at all) the true rank is asked of the
    /// native layer afterwards.
    pub fn get(&self) -> Result<DescriptorLayout> {
        const OP: &str = "miopenGetTensorDescriptor";

        let raw = self.raw;
        let mut dims: [c_int; MAX_DIMS] = [0; MAX_DIMS];
        let mut strides: [c_int; MAX_DIMS] = [0; MAX_DIMS];
        let code = B::get_tensor_descriptor(raw, &mut dims, &mut strides)
            .map_err(|status| status.into_error(OP, CallKind::Query))?;

        let rank = if self.rank == 0 {
            log::debug!(
                "{}: descriptor {:?} has no recorded rank, querying native layer",
                B::name(),
                raw
            );
            B::get_tensor_rank(raw).map_err(|status| status.into_error(OP, CallKind::Query))?
        } else {
            self.rank
        };
        if rank == 0 {
            return Err(Error::UnconfiguredDescriptor { op: OP });
        }
        if rank > MAX_DIMS {
            return Err(Error::invalid_configuration(
                OP,
                format!("native layer reported rank {rank}, maximum is {MAX_DIMS}"),
            ));
        }

        let dtype = DType::from_raw(code).ok_or_else(|| {
            Error::invalid_configuration(OP, format!("unknown native dtype code {code}"))
        })?;
        let shape: Shape = from_abi(&dims[..rank]);
        let strides: Strides = from_abi(&strides[..rank]);
        Ok(DescriptorLayout::new(dtype, shape, strides))
    }

    /// Element type as reported by the native layer
    pub fn dtype(&self) -> Result<DType> {
        Ok(self.get()?.dtype())
    }

    /// Total number of elements, as reported by the native layer
    pub fn num_elements(&self) -> Result<usize> {
        B::get_tensor_num_elements(self.raw)
            .map_err(|status| status.into_error("miopenGetTensorNumElements", CallKind::Query))
    }

    /// Bytes needed to hold the tensor, as reported by the native layer
    ///
    /// Accounts for element width and any padding implied by the strides.
    pub fn size_in_bytes(&self) -> Result<usize> {
        B::get_tensor_num_bytes(self.raw)
            .map_err(|status| status.into_error("miopenGetTensorNumBytes", CallKind::Query))
    }

    /// Rank recorded by the last successful `set` (0 if none)
    #[inline]
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Native handle, for passing this descriptor to other native primitives
    ///
    /// The handle stays owned by `self` and must not be destroyed by the
    /// caller.
    #[inline]
    pub fn raw(&self) -> B::RawDescriptor {
        self.raw
    }

    /// Release the native handle now, reporting any native failure
    ///
    /// Consumes the descriptor, so it cannot be used or released again.
    pub fn release(self) -> Result<()> {
        let raw = self.raw;
        // Drop would destroy the handle a second time
        std::mem::forget(self);
        Self::destroy(raw)
    }

    fn destroy(raw: B::RawDescriptor) -> Result<()> {
        log::trace!("{}: destroying tensor descriptor {:?}", B::name(), raw);
        B::destroy_tensor_descriptor(raw)
            .map_err(|status| status.into_error("miopenDestroyTensorDescriptor", CallKind::Destroy))
    }
}

impl<B: Backend> Drop for TensorDescriptor<B> {
    fn drop(&mut self) {
        if let Err(err) = Self::destroy(self.raw) {
            log::warn!("{}: {}", B::name(), err);
        }
    }
}

impl<B: Backend> fmt::Debug for TensorDescriptor<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TensorDescriptor")
            .field("backend", &B::name())
            .field("raw", &self.raw)
            .field("rank", &self.rank)
            .finish()
    }
}
