//! 4-lane f32 vector used by the packed arg-reduce kernels
//!
//! The packed layout groups channels by 4, so every kernel works on exactly one
//! 128-bit register's worth of lanes. Each architecture's baseline instruction
//! set covers that width, so the backend is chosen at compile time.
//!
//! # Module Structure
//!
//! ```text
//! simd/
//! ├── mod.rs       # Float4 (this file)
//! ├── sse2.rs      # x86-64
//! ├── neon.rs      # AArch64
//! └── portable.rs  # everything else, and the test reference
//! ```
//!
//! # Backend Support
//!
//! | Architecture | Instruction Set | Vector Width |
//! |--------------|-----------------|--------------|
//! | x86-64       | SSE2            | 128 bits     |
//! | ARM64        | NEON            | 128 bits     |
//! | Any          | Scalar          | N/A          |

#[cfg(target_arch = "x86_64")]
mod sse2;
#[cfg(target_arch = "x86_64")]
use sse2 as backend;

#[cfg(target_arch = "aarch64")]
mod neon;
#[cfg(target_arch = "aarch64")]
use neon as backend;

#[cfg(any(test, not(any(target_arch = "x86_64", target_arch = "aarch64"))))]
mod portable;
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
use portable as backend;

use crate::dtype::Element;
use crate::tensor::LANES;
use std::fmt;

/// Name of the compiled `Float4` backend
#[inline]
pub const fn backend_name() -> &'static str {
    backend::NAME
}

/// Four f32 lanes in one vector register
///
/// Loads widen any [`Element`] to f32 and saves narrow back, so the same
/// vector code serves F32 and BF16 tensors.
#[derive(Copy, Clone)]
pub struct Float4(backend::Reg);

impl Float4 {
    /// All lanes set to `v`
    #[inline(always)]
    pub fn splat(v: f32) -> Self {
        Self(backend::splat(v))
    }

    /// Lanes from an array
    #[inline(always)]
    pub fn from_array(lanes: [f32; 4]) -> Self {
        Self(backend::load(&lanes))
    }

    /// Lanes as an array
    #[inline(always)]
    pub fn to_array(self) -> [f32; 4] {
        let mut lanes = [0.0f32; 4];
        backend::store(self.0, &mut lanes);
        lanes
    }

    /// Load the first 4 elements of `src`, widened to f32
    ///
    /// Panics if `src` holds fewer than 4 elements.
    #[inline(always)]
    pub fn load<T: Element>(src: &[T]) -> Self {
        let src = &src[..LANES];
        Self::from_array([
            src[0].to_f32(),
            src[1].to_f32(),
            src[2].to_f32(),
            src[3].to_f32(),
        ])
    }

    /// Store the lanes into the first 4 elements of `dst`
    ///
    /// Panics if `dst` holds fewer than 4 elements.
    #[inline(always)]
    pub fn save<T: Element>(self, dst: &mut [T]) {
        for (d, v) in dst[..LANES].iter_mut().zip(self.to_array()) {
            *d = T::from_f32(v);
        }
    }

    /// One lane
    #[cfg(test)]
    #[inline(always)]
    pub fn lane(self, i: usize) -> f32 {
        self.to_array()[i]
    }

    /// Copy with lane `i` replaced by `v`
    #[inline(always)]
    pub fn with_lane(self, v: f32, i: usize) -> Self {
        let mut lanes = self.to_array();
        lanes[i] = v;
        Self::from_array(lanes)
    }

    /// Lane-wise `a < b ? a : b`
    #[inline(always)]
    pub fn min(a: Self, b: Self) -> Self {
        Self(backend::min(a.0, b.0))
    }

    /// Lane-wise `a > b ? a : b`
    #[inline(always)]
    pub fn max(a: Self, b: Self) -> Self {
        Self(backend::max(a.0, b.0))
    }

    /// Bit select on compare-less-than: lane-wise `a < b ? t : f`
    #[inline(always)]
    pub fn bsl_clt(a: Self, b: Self, t: Self, f: Self) -> Self {
        Self(backend::select_lt(a.0, b.0, t.0, f.0))
    }

    /// Bit select on compare-greater-than: lane-wise `a > b ? t : f`
    #[inline(always)]
    pub fn bsl_cgt(a: Self, b: Self, t: Self, f: Self) -> Self {
        Self(backend::select_gt(a.0, b.0, t.0, f.0))
    }
}

impl fmt::Debug for Float4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Float4").field(&self.to_array()).finish()
    }
}

impl PartialEq for Float4 {
    fn eq(&self, other: &Self) -> bool {
        self.to_array() == other.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use half::bf16;

    const A: [f32; 4] = [1.0, -2.0, 3.0, f32::NAN];
    const B: [f32; 4] = [1.0, 5.0, -4.0, 0.0];
    const T: [f32; 4] = [10.0, 11.0, 12.0, 13.0];
    const F: [f32; 4] = [20.0, 21.0, 22.0, 23.0];

    fn bits(lanes: [f32; 4]) -> [u32; 4] {
        lanes.map(f32::to_bits)
    }

    #[test]
    fn test_select_matches_portable() {
        let (a, b, t, f) = (
            Float4::from_array(A),
            Float4::from_array(B),
            Float4::from_array(T),
            Float4::from_array(F),
        );
        assert_eq!(
            Float4::bsl_clt(a, b, t, f).to_array(),
            portable::select_lt(A, B, T, F)
        );
        assert_eq!(
            Float4::bsl_cgt(a, b, t, f).to_array(),
            portable::select_gt(A, B, T, F)
        );
        // equal lanes and NaN lanes never select `t`
        assert_eq!(Float4::bsl_clt(a, b, t, f).to_array(), [20.0, 11.0, 22.0, 23.0]);
        assert_eq!(Float4::bsl_cgt(a, b, t, f).to_array(), [20.0, 21.0, 12.0, 23.0]);
    }

    #[test]
    fn test_min_max_match_portable_bitwise() {
        let (a, b) = (Float4::from_array(A), Float4::from_array(B));
        assert_eq!(
            bits(Float4::min(a, b).to_array()),
            bits(portable::min(A, B))
        );
        assert_eq!(
            bits(Float4::max(a, b).to_array()),
            bits(portable::max(A, B))
        );
        // NaN in the first operand yields the second operand
        assert_eq!(Float4::min(a, b).lane(3), 0.0);
        assert_eq!(Float4::max(a, b).lane(3), 0.0);
    }

    #[test]
    fn test_load_save_bf16() {
        let src: Vec<bf16> = [1.5f32, -2.0, 0.25, 8.0, 99.0]
            .iter()
            .map(|&v| bf16::from_f32(v))
            .collect();
        let v = Float4::load(&src);
        assert_eq!(v.to_array(), [1.5, -2.0, 0.25, 8.0]);

        let mut dst = [bf16::ZERO; 4];
        v.save(&mut dst);
        assert_eq!(&dst[..], &src[..4]);
    }

    #[test]
    fn test_lane_access() {
        let v = Float4::splat(0.0).with_lane(7.0, 0);
        assert_eq!(v.to_array(), [7.0, 0.0, 0.0, 0.0]);
        assert_eq!(v.lane(0), 7.0);
        assert_eq!(portable::load(&portable::splat(2.0)), [2.0; 4]);
        let mut out = [0.0f32; 4];
        portable::store([1.0; 4], &mut out);
        assert_eq!(out, [1.0; 4]);
        assert!(!backend_name().is_empty());
    }
}
