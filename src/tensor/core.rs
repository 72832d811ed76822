//! Packed tensor: NC4HW4 shape, runtime dtype, aligned storage

use super::shape::{LANES, PackedShape};
use super::storage::Storage;
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use std::fmt;

/// A 4-D tensor stored channel-packed (NC4HW4) in host memory
///
/// The element type is a runtime [`DType`], so a tensor can describe data the
/// kernels refuse to process. Typed access goes through [`as_slice`] and
/// [`as_mut_slice`], which check the requested type against the dtype.
///
/// [`as_slice`]: PackedTensor::as_slice
/// [`as_mut_slice`]: PackedTensor::as_mut_slice
pub struct PackedTensor {
    shape: PackedShape,
    dtype: DType,
    storage: Storage,
}

impl PackedTensor {
    /// Zero-filled tensor, padding lanes included
    pub fn zeros(shape: PackedShape, dtype: DType) -> Result<Self> {
        let size = shape
            .numel()
            .checked_mul(dtype.size_in_bytes())
            .ok_or(Error::OutOfMemory { size: usize::MAX })?;
        Ok(Self {
            shape,
            dtype,
            storage: Storage::zeroed(size)?,
        })
    }

    /// Pack logical NCHW data
    ///
    /// `data` holds `N * C * H * W` elements in row-major NCHW order; padding
    /// lanes of the result are zero.
    pub fn from_nchw<T: Element>(shape: PackedShape, data: &[T]) -> Result<Self> {
        let [n, c, h, w] = shape.dims();
        let expected = n * c * h * w;
        if data.len() != expected {
            return Err(Error::invalid_argument(
                "data",
                format!(
                    "expected {expected} elements for {shape:?}, got {}",
                    data.len()
                ),
            ));
        }

        let mut tensor = Self::zeros(shape, T::DTYPE)?;
        let dst = tensor.as_mut_slice::<T>()?;
        let mut src = data.iter();
        for ni in 0..n {
            for ci in 0..c {
                for hi in 0..h {
                    for wi in 0..w {
                        if let Some(&v) = src.next() {
                            dst[shape.offset(ni, ci, hi, wi)] = v;
                        }
                    }
                }
            }
        }
        Ok(tensor)
    }

    /// Pack physical data that is already in NC4HW4 order
    pub fn from_packed<T: Element>(shape: PackedShape, data: &[T]) -> Result<Self> {
        if data.len() != shape.numel() {
            return Err(Error::invalid_argument(
                "data",
                format!(
                    "expected {} packed elements for {shape:?}, got {}",
                    shape.numel(),
                    data.len()
                ),
            ));
        }
        Ok(Self {
            shape,
            dtype: T::DTYPE,
            storage: Storage::from_bytes(bytemuck::cast_slice(data))?,
        })
    }

    /// Unpack to logical NCHW order, dropping padding lanes
    pub fn to_nchw<T: Element>(&self) -> Result<Vec<T>> {
        let src = self.as_slice::<T>()?;
        let [n, c, h, w] = self.shape.dims();
        let mut out = Vec::with_capacity(n * c * h * w);
        for ni in 0..n {
            for ci in 0..c {
                for hi in 0..h {
                    for wi in 0..w {
                        out.push(src[self.shape.offset(ni, ci, hi, wi)]);
                    }
                }
            }
        }
        Ok(out)
    }

    /// Shape descriptor
    #[inline]
    pub fn shape(&self) -> PackedShape {
        self.shape
    }

    /// Element type
    #[inline]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Number of physical elements, padding included
    #[inline]
    pub fn numel(&self) -> usize {
        self.shape.numel()
    }

    /// Raw bytes
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.storage.as_bytes()
    }

    /// Physical elements as `T`, padding included
    pub fn as_slice<T: Element>(&self) -> Result<&[T]> {
        self.check_dtype::<T>()?;
        Ok(bytemuck::cast_slice(self.storage.as_bytes()))
    }

    /// Mutable physical elements as `T`, padding included
    pub fn as_mut_slice<T: Element>(&mut self) -> Result<&mut [T]> {
        self.check_dtype::<T>()?;
        Ok(bytemuck::cast_slice_mut(self.storage.as_bytes_mut()))
    }

    #[inline]
    fn check_dtype<T: Element>(&self) -> Result<()> {
        if T::DTYPE != self.dtype {
            return Err(Error::DTypeMismatch {
                lhs: self.dtype,
                rhs: T::DTYPE,
            });
        }
        Ok(())
    }
}

impl fmt::Debug for PackedTensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackedTensor")
            .field("shape", &self.shape)
            .field("dtype", &self.dtype)
            .field("lanes", &LANES)
            .finish()
    }
}
