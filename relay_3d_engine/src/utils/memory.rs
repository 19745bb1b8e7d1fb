use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use bytemuck::Pod;

/// Immutable, shared byte buffer for command payloads.
///
/// A `Memory` carries vertex data, index data, pixels or uniform blobs from
/// the recording thread to the backend. Cloning shares the underlying
/// allocation; only construction copies.
///
/// # Example
///
/// ```ignore
/// let positions = [0.0f32, 1.0, 2.0, 3.0];
/// let mem = Memory::from_slice(&positions); // one copy
/// let shared = mem.clone();                // no copy
/// assert!(mem.ptr_eq(&shared));
/// assert_eq!(mem.len(), 16);
/// ```
#[derive(Clone)]
pub struct Memory {
    data: Arc<[u8]>,
}

impl Memory {
    /// Copy `bytes` into a new shared buffer
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            data: Arc::from(bytes),
        }
    }

    /// Copy a slice of plain-old-data values (vertices, indices, floats)
    pub fn from_slice<T: Pod>(values: &[T]) -> Self {
        Self::new(bytemuck::cast_slice(values))
    }

    /// Move a byte vector into a shared buffer
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self {
            data: Arc::from(bytes),
        }
    }

    /// Zero-filled buffer of `len` bytes
    pub fn zeroed(len: usize) -> Self {
        Self::from_vec(vec![0u8; len])
    }

    /// Size in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer holds no bytes
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Whether both values share the same allocation
    pub fn ptr_eq(&self, other: &Memory) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Number of live references to the allocation
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.data)
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl Deref for Memory {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl AsRef<[u8]> for Memory {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl From<Vec<u8>> for Memory {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_vec(bytes)
    }
}

impl From<&[u8]> for Memory {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memory")
            .field("len", &self.data.len())
            .field("refs", &Arc::strong_count(&self.data))
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
