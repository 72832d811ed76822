//! Storage: 64-byte aligned host memory for packed tensors and workspaces

use crate::error::{Error, Result};
use std::alloc::{Layout as AllocLayout, alloc_zeroed, dealloc};
use std::fmt;
use std::ptr::NonNull;

/// Alignment of every storage buffer (AVX-512 width)
pub const STORAGE_ALIGN: usize = 64;

/// Zero-initialized, 64-byte aligned byte buffer
///
/// The alignment guarantees that any `Element` view of the bytes satisfies
/// `bytemuck`'s alignment checks, so typed slices can be taken without copying.
pub struct Storage {
    ptr: NonNull<u8>,
    len: usize,
}

// SAFETY: Storage uniquely owns its allocation; access goes through &self / &mut self.
unsafe impl Send for Storage {}
// SAFETY: shared access only hands out `&[u8]`.
unsafe impl Sync for Storage {}

impl Storage {
    /// Allocate `len` zeroed bytes
    pub fn zeroed(len: usize) -> Result<Self> {
        if len == 0 {
            return Ok(Self::empty());
        }
        let layout = AllocLayout::from_size_align(len, STORAGE_ALIGN)
            .map_err(|_| Error::OutOfMemory { size: len })?;
        // SAFETY: layout has non-zero size.
        let raw = unsafe { alloc_zeroed(layout) };
        let ptr = NonNull::new(raw).ok_or(Error::OutOfMemory { size: len })?;
        Ok(Self { ptr, len })
    }

    /// Allocate and copy `data`
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut storage = Self::zeroed(data.len())?;
        storage.as_bytes_mut().copy_from_slice(data);
        Ok(storage)
    }

    /// Zero-length storage (no allocation)
    pub fn empty() -> Self {
        Self {
            ptr: aligned_dangling(),
            len: 0,
        }
    }

    /// Size in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds zero bytes
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// View the whole buffer as bytes
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: ptr is valid for len bytes (or dangling-but-aligned with len 0).
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// View the whole buffer as mutable bytes
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        // SAFETY: as above, and &mut self guarantees exclusive access.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl Drop for Storage {
    fn drop(&mut self) {
        if self.len == 0 {
            return;
        }
        // SAFETY: same layout as the successful allocation in `zeroed`.
        unsafe {
            let layout = AllocLayout::from_size_align_unchecked(self.len, STORAGE_ALIGN);
            dealloc(self.ptr.as_ptr(), layout);
        }
    }
}

impl fmt::Debug for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage").field("len", &self.len).finish()
    }
}

/// Dangling pointer with storage alignment, so empty views still cast cleanly
#[inline]
fn aligned_dangling() -> NonNull<u8> {
    // SAFETY: STORAGE_ALIGN is non-zero.
    unsafe { NonNull::new_unchecked(std::ptr::without_provenance_mut(STORAGE_ALIGN)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed_is_aligned_and_zero() {
        let s = Storage::zeroed(100).unwrap();
        assert_eq!(s.len(), 100);
        assert_eq!(s.as_bytes().as_ptr() as usize % STORAGE_ALIGN, 0);
        assert!(s.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_empty_casts_to_any_element() {
        let s = Storage::empty();
        assert!(s.is_empty());
        let view: &[f32] = bytemuck::cast_slice(s.as_bytes());
        assert!(view.is_empty());
    }

    #[test]
    fn test_from_bytes() {
        let data = [1u8, 2, 3, 4];
        let s = Storage::from_bytes(&data).unwrap();
        assert_eq!(s.as_bytes(), &data);
        assert_ne!(s.as_bytes().as_ptr(), data.as_ptr());
    }
}
