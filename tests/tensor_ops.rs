//! Integration tests for fill, scale and transform on described memory

mod common;

use common::{buffer_for, handle, packed, SCALAR_DTYPES};
use miotensor::dtype::DType;
use miotensor::error::Error;
use miotensor::runtime::cpu::{CpuBackend, HostBuffer};
use miotensor::tensor::{fill, scale, transform, TensorDescriptor};

// ============================================================================
// Fill
// ============================================================================

#[test]
fn test_fill_zero_clears_buffer() {
    let h = handle();
    let desc = packed(DType::F32, &[4]);
    let mut mem = HostBuffer::from_slice(&[3.0f32, -1.0, 7.5, 2.0]).unwrap();

    fill(&h, &desc, &mut mem, 0.0).unwrap();
    assert!(mem.as_bytes().iter().all(|&b| b == 0));
}

#[test]
fn test_fill_every_scalar_dtype() {
    let h = handle();
    for dtype in SCALAR_DTYPES {
        let desc = packed(dtype, &[2, 3]);
        let mut mem = buffer_for(&desc);
        desc.fill(&h, &mut mem, 2.0).unwrap();

        let width = dtype.size_in_bytes();
        let first = &mem.as_bytes()[..width];
        for chunk in mem.as_bytes().chunks(width) {
            assert_eq!(chunk, first, "{dtype}");
        }
        assert!(first.iter().any(|&b| b != 0), "{dtype}");
    }
}

#[test]
fn test_fill_coerces_to_integer() {
    let h = handle();
    let desc = packed(DType::I32, &[3]);
    let mut mem = buffer_for(&desc);
    desc.fill(&h, &mut mem, 7.9).unwrap();
    assert_eq!(mem.to_vec::<i32>(), vec![7, 7, 7]);
}

#[test]
fn test_fill_padded_layout_skips_gaps() {
    let h = handle();
    let desc = TensorDescriptor::<CpuBackend>::with_layout(DType::F64, &[2, 2], Some(&[3, 1])).unwrap();
    let mut mem = HostBuffer::from_slice(&[-1.0f64; 6]).unwrap();
    desc.fill(&h, &mut mem, 4.0).unwrap();
    assert_eq!(mem.to_vec::<f64>(), vec![4.0, 4.0, -1.0, 4.0, 4.0, -1.0]);
}

#[test]
fn test_fill_packed_int8_unsupported() {
    let h = handle();
    let desc = packed(DType::I8x4, &[1, 4]);
    let mut mem = HostBuffer::zeroed(64).unwrap();
    let err = fill(&h, &desc, &mut mem, 1.0).unwrap_err();
    assert!(matches!(err, Error::UnsupportedType { dtype: DType::I8x4, .. }), "{err}");
}

#[test]
fn test_fill_rejects_small_buffer() {
    let h = handle();
    let desc = packed(DType::F32, &[8]);
    let mut mem = HostBuffer::zeroed(16).unwrap();
    let err = fill(&h, &desc, &mut mem, 1.0).unwrap_err();
    assert!(matches!(err, Error::OperationFailed { .. }), "{err}");
    assert_eq!(err.op(), "miopenSetTensor");
    assert!(mem.as_bytes().iter().all(|&b| b == 0));
}

#[test]
fn test_fill_unconfigured_descriptor() {
    let h = handle();
    let desc = TensorDescriptor::<CpuBackend>::new().unwrap();
    let mut mem = HostBuffer::zeroed(16).unwrap();
    assert!(matches!(
        fill(&h, &desc, &mut mem, 1.0),
        Err(Error::UnconfiguredDescriptor { .. })
    ));
}

// ============================================================================
// Scale
// ============================================================================

#[test]
fn test_scale_in_place() {
    let h = handle();
    let desc = packed(DType::F32, &[2, 2]);
    let mut mem = HostBuffer::from_slice(&[1.0f32, 2.0, 3.0, 4.0]).unwrap();
    scale(&h, &desc, &mut mem, 0.5).unwrap();
    assert_eq!(mem.to_vec::<f32>(), vec![0.5, 1.0, 1.5, 2.0]);
}

#[test]
fn test_scale_half_precision() {
    let h = handle();
    let desc = packed(DType::F16, &[3]);
    let data = [half::f16::from_f32(1.0), half::f16::from_f32(-2.0), half::f16::from_f32(0.25)];
    let mut mem = HostBuffer::from_slice(&data).unwrap();
    desc.scale(&h, &mut mem, 4.0).unwrap();

    let out: Vec<f32> = mem.to_vec::<half::f16>().into_iter().map(f32::from).collect();
    assert_eq!(out, vec![4.0, -8.0, 1.0]);
}

#[test]
fn test_scale_by_one_is_identity() {
    let h = handle();
    let desc = packed(DType::I8, &[4]);
    let mut mem = HostBuffer::from_slice(&[1i8, -2, 3, -4]).unwrap();
    desc.scale(&h, &mut mem, 1.0).unwrap();
    assert_eq!(mem.to_vec::<i8>(), vec![1, -2, 3, -4]);
}

// ============================================================================
// Transform
// ============================================================================

#[test]
fn test_transform_identity_is_exact_copy() {
    let h = handle();
    let x_desc = packed(DType::F32, &[2, 2]);
    let y_desc = packed(DType::F32, &[2, 2]);
    let x = HostBuffer::from_slice(&[1.0f32, 2.0, 3.0, 4.0]).unwrap();
    let mut y = buffer_for(&y_desc);

    transform(&h, 1.0, &x_desc, &x, 0.0, &y_desc, &mut y).unwrap();
    assert_eq!(y.as_bytes(), x.as_bytes());
}

#[test]
fn test_transform_packed_to_padded() {
    let h = handle();
    let x_desc = packed(DType::F32, &[2, 3]);
    let y_desc = TensorDescriptor::<CpuBackend>::with_layout(DType::F32, &[2, 3], Some(&[4, 1])).unwrap();
    assert_eq!(y_desc.size_in_bytes().unwrap(), 7 * 4);

    let x = HostBuffer::from_slice(&[1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    let mut y = HostBuffer::from_slice(&[-1.0f32; 8]).unwrap();

    transform(&h, 1.0, &x_desc, &x, 0.0, &y_desc, &mut y).unwrap();
    assert_eq!(
        y.to_vec::<f32>(),
        vec![1.0, 2.0, 3.0, -1.0, 4.0, 5.0, 6.0, -1.0]
    );
}

#[test]
fn test_transform_blends() {
    let h = handle();
    let desc = packed(DType::F64, &[3]);
    let x = HostBuffer::from_slice(&[1.0f64, 2.0, 3.0]).unwrap();
    let mut y = HostBuffer::from_slice(&[10.0f64, 20.0, 30.0]).unwrap();

    transform(&h, 2.0, &desc, &x, 0.5, &desc, &mut y).unwrap();
    assert_eq!(y.to_vec::<f64>(), vec![7.0, 14.0, 21.0]);
}

#[test]
fn test_transform_shape_mismatch() {
    let h = handle();
    let x_desc = packed(DType::F32, &[2, 3]);
    let y_desc = packed(DType::F32, &[3, 2]);
    let x = buffer_for(&x_desc);
    let mut y = buffer_for(&y_desc);

    let err = transform(&h, 1.0, &x_desc, &x, 0.0, &y_desc, &mut y).unwrap_err();
    assert!(matches!(err, Error::OperationFailed { .. }), "{err}");
    assert_eq!(err.op(), "miopenTransformTensor");
}

#[test]
fn test_transform_dtype_mismatch() {
    let h = handle();
    let x_desc = packed(DType::F32, &[4]);
    let y_desc = packed(DType::F64, &[4]);
    let x = buffer_for(&x_desc);
    let mut y = buffer_for(&y_desc);

    assert!(matches!(
        transform(&h, 1.0, &x_desc, &x, 0.0, &y_desc, &mut y),
        Err(Error::OperationFailed { .. })
    ));
}

#[test]
fn test_transform_rejects_small_source() {
    let h = handle();
    let desc = packed(DType::F32, &[4]);
    let x = HostBuffer::zeroed(8).unwrap();
    let mut y = buffer_for(&desc);

    assert!(matches!(
        transform(&h, 1.0, &desc, &x, 0.0, &desc, &mut y),
        Err(Error::OperationFailed { .. })
    ));
}
