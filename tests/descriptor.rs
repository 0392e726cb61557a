//! Integration tests for tensor descriptor lifecycle and introspection
//!
//! Tests verify:
//! - Set/Get round trips for every rank and dtype
//! - Native element counts and byte sizes
//! - Rejection of invalid shapes and strides
//! - Rejection of layouts beyond the native int width or `usize` arithmetic
//! - The max-rank fallback when the descriptor was configured natively
//! - Single release of the native handle

mod common;

use common::{packed, SCALAR_DTYPES, SHAPES};
use miotensor::dtype::DType;
use miotensor::error::Error;
use miotensor::runtime::cpu::CpuBackend;
use miotensor::runtime::{Backend, Status};
use miotensor::tensor::{row_major_strides, TensorDescriptor, MAX_DIMS};
use std::os::raw::c_int;

type Desc = TensorDescriptor<CpuBackend>;

// ============================================================================
// Set / Get
// ============================================================================

#[test]
fn test_new_descriptor_is_unconfigured() {
    let desc = Desc::new().unwrap();
    assert_eq!(desc.rank(), 0);
    assert!(CpuBackend::is_live(desc.raw()));
}

#[test]
fn test_set_get_roundtrip_all_ranks_and_dtypes() {
    let dtypes = SCALAR_DTYPES.iter().copied().chain([DType::I8x4]);
    for dtype in dtypes {
        for shape in SHAPES {
            let desc = packed(dtype, shape);
            assert_eq!(desc.rank(), shape.len());

            let layout = desc.get().unwrap();
            assert_eq!(layout.dtype(), dtype);
            assert_eq!(layout.shape().as_slice(), shape);
            assert_eq!(layout.strides(), &row_major_strides(shape));
            assert!(layout.is_packed());
        }
    }
}

#[test]
fn test_set_explicit_strides() {
    let mut desc = Desc::new().unwrap();
    desc.set(DType::F32, &[2, 3], Some(&[4, 1])).unwrap();

    let layout = desc.get().unwrap();
    assert_eq!(layout.strides(), &[4, 1]);
    assert!(!layout.is_packed());
}

#[test]
fn test_empty_strides_use_default() {
    let mut desc = Desc::new().unwrap();
    desc.set(DType::F64, &[3, 5], Some(&[])).unwrap();
    assert_eq!(desc.get().unwrap().strides(), &[5, 1]);
}

#[test]
fn test_set_can_be_repeated() {
    let mut desc = packed(DType::F32, &[2, 3, 4]);
    desc.set(DType::F16, &[6], None).unwrap();

    assert_eq!(desc.rank(), 1);
    let layout = desc.get().unwrap();
    assert_eq!(layout.dtype(), DType::F16);
    assert_eq!(layout.shape(), &[6]);
    assert_eq!(desc.num_elements().unwrap(), 6);
}

#[test]
fn test_set_4d() {
    let mut desc = Desc::new().unwrap();
    desc.set_4d(DType::F32, 2, 3, 4, 5).unwrap();
    let layout = desc.get().unwrap();
    assert_eq!(layout.shape(), &[2, 3, 4, 5]);
    assert_eq!(layout.strides(), &[60, 20, 5, 1]);
}

// ============================================================================
// Sizes
// ============================================================================

#[test]
fn test_num_elements() {
    let cases: [(&[usize], usize); 4] = [(&[1], 1), (&[5], 5), (&[2, 3], 6), (&[1, 1, 1, 1, 1], 1)];
    for (shape, expected) in cases {
        let desc = packed(DType::F32, shape);
        assert_eq!(desc.num_elements().unwrap(), expected, "shape {shape:?}");
        assert_eq!(desc.num_elements().unwrap(), shape.iter().product::<usize>());
    }
}

#[test]
fn test_size_in_bytes_packed() {
    for dtype in SCALAR_DTYPES {
        let desc = packed(dtype, &[2, 3, 4]);
        assert_eq!(desc.size_in_bytes().unwrap(), 24 * dtype.size_in_bytes());
    }
}

#[test]
fn test_size_in_bytes_includes_padding() {
    let desc = Desc::with_layout(DType::F32, &[2, 3], Some(&[4, 1])).unwrap();
    assert_eq!(desc.num_elements().unwrap(), 6);
    assert_eq!(desc.size_in_bytes().unwrap(), 7 * 4);
}

#[test]
fn test_size_in_bytes_monotone_in_element_count() {
    for dtype in SCALAR_DTYPES {
        let mut previous = 0;
        for n in 1..=64 {
            let desc = packed(dtype, &[n]);
            let bytes = desc.size_in_bytes().unwrap();
            assert!(bytes >= previous, "{dtype}: {bytes} < {previous} at n={n}");
            previous = bytes;
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_stride_length_mismatch() {
    let mut desc = Desc::new().unwrap();
    let err = desc.set(DType::F32, &[2, 3, 4], Some(&[4, 1])).unwrap_err();
    assert!(matches!(err, Error::InvalidConfiguration { .. }), "{err}");
    assert_eq!(desc.rank(), 0);
}

#[test]
fn test_rank_limits() {
    let mut desc = Desc::new().unwrap();
    assert!(matches!(
        desc.set(DType::F32, &[], None),
        Err(Error::InvalidConfiguration { .. })
    ));
    assert!(matches!(
        desc.set(DType::F32, &[1; MAX_DIMS + 1], None),
        Err(Error::InvalidConfiguration { .. })
    ));
}

#[test]
fn test_zero_dimension_rejected() {
    let mut desc = Desc::new().unwrap();
    assert!(matches!(
        desc.set(DType::F32, &[3, 0], None),
        Err(Error::InvalidConfiguration { .. })
    ));
}

#[test]
fn test_native_rejects_zero_stride() {
    let mut desc = Desc::new().unwrap();
    let err = desc.set(DType::F32, &[3, 2], Some(&[0, 1])).unwrap_err();
    assert_eq!(err.op(), "miopenSetTensorDescriptor");
    assert!(matches!(err, Error::InvalidConfiguration { .. }));
}

#[test]
fn test_failed_set_keeps_previous_configuration() {
    let mut desc = packed(DType::I32, &[4, 4]);
    assert!(desc.set(DType::I32, &[4, 0], None).is_err());
    assert_eq!(desc.rank(), 2);
    assert_eq!(desc.get().unwrap().shape(), &[4, 4]);
}

#[test]
fn test_queries_on_unconfigured_descriptor() {
    let desc = Desc::new().unwrap();
    assert!(matches!(desc.get(), Err(Error::UnconfiguredDescriptor { .. })));
    assert!(matches!(
        desc.num_elements(),
        Err(Error::UnconfiguredDescriptor { .. })
    ));
    assert!(matches!(
        desc.size_in_bytes(),
        Err(Error::UnconfiguredDescriptor { .. })
    ));
}

#[test]
fn test_set_rejects_values_beyond_abi_width() {
    let too_wide = c_int::MAX as usize + 1;
    let mut desc = Desc::new().unwrap();

    // Dimension
    assert!(matches!(
        desc.set(DType::F32, &[too_wide], None),
        Err(Error::InvalidConfiguration { .. })
    ));
    // Explicit stride
    assert!(matches!(
        desc.set(DType::F32, &[2, 3], Some(&[too_wide, 1])),
        Err(Error::InvalidConfiguration { .. })
    ));
    // Default stride: 65536 * 65536 fits usize but not the native int
    assert!(matches!(
        desc.set(DType::I8, &[2, 65536, 65536], None),
        Err(Error::InvalidConfiguration { .. })
    ));
    assert_eq!(desc.rank(), 0);
}

#[test]
fn test_set_rejects_overflowing_layout() {
    let big = c_int::MAX as usize;
    let mut desc = Desc::new().unwrap();

    // Default strides overflow usize
    let err = desc.set(DType::F32, &[big; 5], None).unwrap_err();
    assert!(matches!(err, Error::InvalidConfiguration { .. }), "{err}");
    assert_eq!(err.op(), "miopenSetTensorDescriptor");

    // Span fits, element count does not
    assert!(matches!(
        desc.set(DType::F32, &[big; 5], Some(&[1; 5])),
        Err(Error::InvalidConfiguration { .. })
    ));

    // Element count and span fit, the f64 byte span does not
    assert!(matches!(
        desc.set(DType::F64, &[big, 3], Some(&[big, big])),
        Err(Error::InvalidConfiguration { .. })
    ));

    assert_eq!(desc.rank(), 0);
    assert!(matches!(
        desc.size_in_bytes(),
        Err(Error::UnconfiguredDescriptor { .. })
    ));
}

#[test]
fn test_native_rejects_overflowing_layout() {
    let desc = Desc::new().unwrap();
    let max = c_int::MAX;
    assert_eq!(
        CpuBackend::set_tensor_descriptor(desc.raw(), DType::F32.to_raw(), &[max; 5], &[1; 5]),
        Err(Status::BadParm)
    );
    assert!(matches!(
        desc.num_elements(),
        Err(Error::UnconfiguredDescriptor { .. })
    ));
}

#[test]
fn test_large_layout_sizes_are_exact() {
    // Largest packed 1-D f64 descriptor the native int allows
    let big = c_int::MAX as usize;
    let desc = packed(DType::F64, &[big]);
    assert_eq!(desc.num_elements().unwrap(), big);
    assert_eq!(desc.size_in_bytes().unwrap(), big * 8);
}

// ============================================================================
// Native configuration outside `set`
// ============================================================================

#[test]
fn test_get_falls_back_to_native_rank() {
    let desc = Desc::new().unwrap();
    CpuBackend::set_tensor_descriptor(desc.raw(), DType::F64.to_raw(), &[3, 4, 5], &[20, 5, 1])
        .unwrap();

    assert_eq!(desc.rank(), 0);
    let layout = desc.get().unwrap();
    assert_eq!(layout.dtype(), DType::F64);
    assert_eq!(layout.shape(), &[3, 4, 5]);
    assert_eq!(layout.strides(), &[20, 5, 1]);
}

#[test]
fn test_get_full_rank_via_native_path() {
    let desc = Desc::new().unwrap();
    CpuBackend::set_tensor_descriptor(desc.raw(), DType::I8.to_raw(), &[1, 2, 1, 2, 1], &[4, 2, 2, 1, 1])
        .unwrap();
    assert_eq!(desc.get().unwrap().rank(), MAX_DIMS);
}

// ============================================================================
// Release
// ============================================================================

#[test]
fn test_drop_releases_handle() {
    let raw = {
        let desc = packed(DType::F32, &[8]);
        desc.raw()
    };
    assert!(!CpuBackend::is_live(raw));
}

#[test]
fn test_explicit_release() {
    let desc = packed(DType::F32, &[8]);
    let raw = desc.raw();
    desc.release().unwrap();
    assert!(!CpuBackend::is_live(raw));

    // A second native destroy of the same handle is reported, not undefined
    assert!(CpuBackend::destroy_tensor_descriptor(raw).is_err());
}

#[test]
fn test_failed_set_still_released() {
    let raw = {
        let mut desc = Desc::new().unwrap();
        assert!(desc.set(DType::F32, &[2, 3], Some(&[1])).is_err());
        desc.raw()
    };
    assert!(!CpuBackend::is_live(raw));
}

#[test]
fn test_descriptors_are_independent() {
    let a = packed(DType::F32, &[2, 2]);
    let b = packed(DType::F64, &[3]);
    assert_ne!(a.raw(), b.raw());
    drop(a);
    assert!(CpuBackend::is_live(b.raw()));
    assert_eq!(b.get().unwrap().dtype(), DType::F64);
}

#[test]
fn test_descriptor_moves_across_threads() {
    let desc = packed(DType::F32, &[4, 4]);
    let raw = desc.raw();
    let handle = std::thread::spawn(move || desc.num_elements().unwrap());
    assert_eq!(handle.join().unwrap(), 16);
    assert!(!CpuBackend::is_live(raw));
}
