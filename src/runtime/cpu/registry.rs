//! Descriptor table backing the CPU backend's native handles
//!
//! Handles are process-unique ids into a global table. Releasing an id
//! removes it, so a second release of the same id is reported as `BadParm`
//! instead of corrupting state.

use crate::dtype::DType;
use crate::runtime::{NativeResult, Status};
use crate::tensor::{checked_elem_count, layout_size_in_bytes, MAX_DIMS};
use parking_lot::Mutex;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

/// Global counter for descriptor ids; 0 is never handed out
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

static DESCRIPTORS: OnceLock<Mutex<HashMap<u64, Option<DescConfig>>>> = OnceLock::new();

fn descriptors() -> &'static Mutex<HashMap<u64, Option<DescConfig>>> {
    DESCRIPTORS.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Configuration stored behind a CPU descriptor handle
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct DescConfig {
    pub dtype: DType,
    pub dims: SmallVec<[usize; MAX_DIMS]>,
    pub strides: SmallVec<[usize; MAX_DIMS]>,
    num_elements: usize,
    num_bytes: usize,
}

impl DescConfig {
    /// Validate raw ABI arguments the way the accelerator library does
    pub fn from_abi(dtype: i32, dims: &[i32], strides: &[i32]) -> NativeResult<Self> {
        if dims.is_empty() || dims.len() > MAX_DIMS || dims.len() != strides.len() {
            return Err(Status::BadParm);
        }
        let dtype = DType::from_raw(dtype).ok_or(Status::BadParm)?;
        let positive = |v: &i32| usize::try_from(*v).ok().filter(|&v| v > 0);
        let dims = dims
            .iter()
            .map(positive)
            .collect::<Option<SmallVec<_>>>()
            .ok_or(Status::BadParm)?;
        let strides = strides
            .iter()
            .map(positive)
            .collect::<Option<SmallVec<_>>>()
            .ok_or(Status::BadParm)?;
        // Kernels walk every offset of the layout; it must be addressable
        let num_elements = checked_elem_count(&dims).ok_or(Status::BadParm)?;
        let num_bytes = layout_size_in_bytes(dtype, &dims, &strides).ok_or(Status::BadParm)?;
        Ok(Self {
            dtype,
            dims,
            strides,
            num_elements,
            num_bytes,
        })
    }

    pub fn num_elements(&self) -> usize {
        self.num_elements
    }

    pub fn num_bytes(&self) -> usize {
        self.num_bytes
    }
}

/// Allocate a new, unconfigured descriptor id
pub(crate) fn create() -> u64 {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    descriptors().lock().insert(id, None);
    id
}

/// Remove a descriptor; unknown ids are `BadParm`
pub(crate) fn destroy(id: u64) -> NativeResult<()> {
    descriptors()
        .lock()
        .remove(&id)
        .map(|_| ())
        .ok_or(Status::BadParm)
}

/// Replace a descriptor's configuration
pub(crate) fn configure(id: u64, config: DescConfig) -> NativeResult<()> {
    match descriptors().lock().get_mut(&id) {
        Some(slot) => {
            *slot = Some(config);
            Ok(())
        }
        None => Err(Status::BadParm),
    }
}

/// Fetch a descriptor's configuration
///
/// Unknown ids are `BadParm`; known but unconfigured ids are `NotInitialized`.
pub(crate) fn lookup(id: u64) -> NativeResult<DescConfig> {
    match descriptors().lock().get(&id) {
        Some(Some(config)) => Ok(config.clone()),
        Some(None) => Err(Status::NotInitialized),
        None => Err(Status::BadParm),
    }
}

/// Whether `id` refers to a descriptor that has not been released
pub(crate) fn is_live(id: u64) -> bool {
    descriptors().lock().contains_key(&id)
}
