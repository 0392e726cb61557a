//! CPU compute handle

/// Compute handle for the CPU backend
///
/// There is no stream to manage on the host; operations run synchronously on
/// the calling thread. The handle exists so CPU and accelerator call sites
/// look the same.
#[derive(Clone, Debug, Default)]
pub struct CpuHandle {
    id: usize,
}

impl CpuHandle {
    /// Create a new CPU handle
    pub fn new() -> Self {
        Self { id: 0 }
    }

    /// Device index this handle targets (always 0 on the host)
    pub fn device_id(&self) -> usize {
        self.id
    }
}
