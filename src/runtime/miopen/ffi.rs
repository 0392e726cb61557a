//! Raw bindings to the subset of libMIOpen and the HIP runtime used here

#![allow(non_camel_case_types, non_snake_case)]

use std::ffi::c_void;
use std::os::raw::c_int;

#[repr(C)]
pub struct miopenHandle {
    _private: [u8; 0],
}

#[repr(C)]
pub struct miopenTensorDescriptor {
    _private: [u8; 0],
}

pub type miopenHandle_t = *mut miopenHandle;
pub type miopenTensorDescriptor_t = *mut miopenTensorDescriptor;
pub type miopenStatus_t = c_int;
pub type miopenDataType_t = c_int;
pub type hipError_t = c_int;

pub const HIP_SUCCESS: hipError_t = 0;
pub const HIP_MEMCPY_HOST_TO_DEVICE: c_int = 1;
pub const HIP_MEMCPY_DEVICE_TO_HOST: c_int = 2;

extern "C" {
    pub fn miopenCreate(handle: *mut miopenHandle_t) -> miopenStatus_t;
    pub fn miopenDestroy(handle: miopenHandle_t) -> miopenStatus_t;

    pub fn miopenCreateTensorDescriptor(desc: *mut miopenTensorDescriptor_t) -> miopenStatus_t;
    pub fn miopenDestroyTensorDescriptor(desc: miopenTensorDescriptor_t) -> miopenStatus_t;
    pub fn miopenSetTensorDescriptor(
        desc: miopenTensorDescriptor_t,
        data_type: miopenDataType_t,
        nb_dims: c_int,
        dims: *const c_int,
        strides: *const c_int,
    ) -> miopenStatus_t;
    pub fn miopenGetTensorDescriptor(
        desc: miopenTensorDescriptor_t,
        data_type: *mut miopenDataType_t,
        dims: *mut c_int,
        strides: *mut c_int,
    ) -> miopenStatus_t;
    /// Reports the number of dimensions, not the element count
    pub fn miopenGetTensorDescriptorSize(
        desc: miopenTensorDescriptor_t,
        size: *mut c_int,
    ) -> miopenStatus_t;
    pub fn miopenGetTensorNumBytes(
        desc: miopenTensorDescriptor_t,
        num_bytes: *mut usize,
    ) -> miopenStatus_t;

    pub fn miopenSetTensor(
        handle: miopenHandle_t,
        y_desc: miopenTensorDescriptor_t,
        y: *mut c_void,
        alpha: *const c_void,
    ) -> miopenStatus_t;
    pub fn miopenScaleTensor(
        handle: miopenHandle_t,
        y_desc: miopenTensorDescriptor_t,
        y: *mut c_void,
        alpha: *const c_void,
    ) -> miopenStatus_t;
    pub fn miopenTransformTensor(
        handle: miopenHandle_t,
        alpha: *const c_void,
        x_desc: miopenTensorDescriptor_t,
        x: *const c_void,
        beta: *const c_void,
        y_desc: miopenTensorDescriptor_t,
        y: *mut c_void,
    ) -> miopenStatus_t;

    pub fn hipMalloc(ptr: *mut *mut c_void, size: usize) -> hipError_t;
    pub fn hipFree(ptr: *mut c_void) -> hipError_t;
    pub fn hipMemcpy(dst: *mut c_void, src: *const c_void, size: usize, kind: c_int) -> hipError_t;
}
