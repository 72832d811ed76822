//! Scratch memory for kernels that cache intermediate values
//!
//! Kernels ask a [`ScratchProvider`] for a region of bytes and reinterpret it
//! as their element type. The region is shared: it is only valid until the
//! next request, so a kernel that uses it runs sequentially.

use crate::error::{Error, Result};
use crate::tensor::{STORAGE_ALIGN, Storage};

/// Source of shared scratch memory
pub trait ScratchProvider {
    /// Borrow at least `size_bytes` bytes of scratch memory.
    ///
    /// The returned slice may be longer than requested and its contents are
    /// unspecified. Implementations should align it to [`STORAGE_ALIGN`];
    /// callers reject regions that cannot hold their element type.
    fn shared_workspace(&mut self, size_bytes: usize) -> Result<&mut [u8]>;
}

/// Growable scratch buffer, reused across calls
///
/// Grows to the largest size requested so far and never shrinks.
#[derive(Debug)]
pub struct SharedWorkspace {
    storage: Storage,
}

impl SharedWorkspace {
    /// Empty workspace; the first request allocates
    pub fn new() -> Self {
        Self {
            storage: Storage::empty(),
        }
    }

    /// Workspace with `size_bytes` pre-allocated
    pub fn with_capacity(size_bytes: usize) -> Result<Self> {
        Ok(Self {
            storage: Storage::zeroed(size_bytes)?,
        })
    }

    /// Currently allocated bytes
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }
}

impl Default for SharedWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl ScratchProvider for SharedWorkspace {
    fn shared_workspace(&mut self, size_bytes: usize) -> Result<&mut [u8]> {
        if size_bytes > self.storage.len() {
            tracing::trace!(
                from = self.storage.len(),
                to = size_bytes,
                align = STORAGE_ALIGN,
                "growing shared workspace"
            );
            self.storage = Storage::zeroed(size_bytes)
                .map_err(|e| Error::workspace(size_bytes, e.to_string()))?;
        }
        Ok(&mut self.storage.as_bytes_mut()[..size_bytes])
    }
}

/// Reinterpret the first `len` elements' worth of a scratch region as `T`
pub(crate) fn typed_workspace<T: bytemuck::Pod>(bytes: &mut [u8], len: usize) -> Result<&mut [T]> {
    let size = len * std::mem::size_of::<T>();
    if bytes.len() < size {
        return Err(Error::workspace(
            size,
            format!("provider returned {} bytes", bytes.len()),
        ));
    }
    bytemuck::try_cast_slice_mut(&mut bytes[..size]).map_err(|e| Error::workspace(size, e.to_string()))
}
