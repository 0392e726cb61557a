//! Common test utilities
#![allow(dead_code)]

use miotensor::dtype::DType;
use miotensor::runtime::cpu::{CpuBackend, CpuHandle, HostBuffer};
use miotensor::tensor::TensorDescriptor;

/// Every dtype with a single-value host representation
pub const SCALAR_DTYPES: [DType; 6] = [
    DType::F16,
    DType::BF16,
    DType::F32,
    DType::F64,
    DType::I32,
    DType::I8,
];

/// Representative shapes for ranks 1 through 5
pub const SHAPES: [&[usize]; 5] = [&[7], &[2, 3], &[2, 3, 4], &[1, 2, 3, 4], &[2, 1, 3, 1, 2]];

/// Create a configured CPU descriptor with row-major strides
pub fn packed(dtype: DType, shape: &[usize]) -> TensorDescriptor<CpuBackend> {
    TensorDescriptor::with_layout(dtype, shape, None).unwrap()
}

/// Allocate a zeroed host buffer sized for `desc`
pub fn buffer_for(desc: &TensorDescriptor<CpuBackend>) -> HostBuffer {
    HostBuffer::zeroed(desc.size_in_bytes().unwrap()).unwrap()
}

/// Create a CPU compute handle
pub fn handle() -> CpuHandle {
    CpuHandle::new()
}
