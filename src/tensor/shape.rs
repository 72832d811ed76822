//! Shape of a channel-packed (NC4HW4) tensor

use crate::error::{Error, Result};
use std::fmt;

/// SIMD lane width the channel dimension is padded to
pub const LANES: usize = 4;

/// Round `x` up to the number of `LANES`-wide groups needed to hold it
#[inline]
pub const fn up_div(x: usize, y: usize) -> usize {
    x.div_ceil(y)
}

/// Logical extents of a 4-D tensor stored as NC4HW4
///
/// Memory order is `N -> C4 -> H -> W -> lane`, where `C4 = ceil(C / 4)` and the
/// lane index selects one of 4 consecutive channels. The last channel group may
/// hold `4 - C % 4` padding lanes; those carry no data.
///
/// All four extents are at least 1.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct PackedShape {
    dims: [usize; 4],
}

impl PackedShape {
    /// Create a shape from logical `(N, C, H, W)` extents
    pub fn new(n: usize, c: usize, h: usize, w: usize) -> Result<Self> {
        Self::from_dims([n, c, h, w])
    }

    /// Create a shape from a logical `[N, C, H, W]` array
    pub fn from_dims(dims: [usize; 4]) -> Result<Self> {
        if let Some(axis) = dims.iter().position(|&d| d == 0) {
            return Err(Error::invalid_argument(
                "shape",
                format!("extent of axis {axis} is zero in {dims:?}"),
            ));
        }
        dims.iter()
            .try_fold(LANES, |acc: usize, &d| acc.checked_mul(d))
            .ok_or_else(|| Error::invalid_argument("shape", format!("{dims:?} overflows usize")))?;
        Ok(Self { dims })
    }

    /// Logical `[N, C, H, W]`
    #[inline]
    pub fn dims(&self) -> [usize; 4] {
        self.dims
    }

    /// Batch extent
    #[inline]
    pub fn n(&self) -> usize {
        self.dims[0]
    }

    /// Logical (unpadded) channel extent
    #[inline]
    pub fn c(&self) -> usize {
        self.dims[1]
    }

    /// Height extent
    #[inline]
    pub fn h(&self) -> usize {
        self.dims[2]
    }

    /// Width extent
    #[inline]
    pub fn w(&self) -> usize {
        self.dims[3]
    }

    /// Number of 4-channel groups, `ceil(C / 4)`
    #[inline]
    pub fn c4(&self) -> usize {
        up_div(self.c(), LANES)
    }

    /// Physical channel extent, `C4 * 4`
    #[inline]
    pub fn packed_channels(&self) -> usize {
        self.c4() * LANES
    }

    /// Channels valid in the last group, 0 when `C` is a multiple of 4
    #[inline]
    pub fn channel_remainder(&self) -> usize {
        self.c() % LANES
    }

    /// Number of physical elements, padding included
    #[inline]
    pub fn numel(&self) -> usize {
        self.n() * self.packed_channels() * self.h() * self.w()
    }

    /// Extent along a logical axis
    #[inline]
    pub fn extent(&self, axis: usize) -> usize {
        self.dims[axis]
    }

    /// Shape with `axis` collapsed to 1
    #[inline]
    pub fn reduced(&self, axis: usize) -> Self {
        let mut dims = self.dims;
        dims[axis] = 1;
        Self { dims }
    }

    /// Physical offset of logical element `(n, c, h, w)`
    #[inline]
    pub fn offset(&self, n: usize, c: usize, h: usize, w: usize) -> usize {
        let group = c / LANES;
        let lane = c % LANES;
        (((n * self.c4() + group) * self.h() + h) * self.w() + w) * LANES + lane
    }
}

impl fmt::Debug for PackedShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[N={}, C={} (packed {}), H={}, W={}]",
            self.n(),
            self.c(),
            self.packed_channels(),
            self.h(),
            self.w()
        )
    }
}
