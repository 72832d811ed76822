//! SSE2 backend for `Float4`
//!
//! SSE2 is part of the x86-64 baseline, so no runtime detection is needed.
//! `minps`/`maxps` return the second operand unless the first one is strictly
//! smaller/larger, which is exactly the "candidate replaces only when strictly
//! better" rule the arg-reduce kernels rely on.

use std::arch::x86_64::*;

pub(super) type Reg = __m128;

pub(super) const NAME: &str = "sse2";

#[inline(always)]
pub(super) fn splat(v: f32) -> Reg {
    // SAFETY: SSE2 is always available on x86-64.
    unsafe { _mm_set1_ps(v) }
}

#[inline(always)]
pub(super) fn load(src: &[f32; 4]) -> Reg {
    // SAFETY: `src` is valid for 4 f32 reads; loadu has no alignment requirement.
    unsafe { _mm_loadu_ps(src.as_ptr()) }
}

#[inline(always)]
pub(super) fn store(v: Reg, dst: &mut [f32; 4]) {
    // SAFETY: `dst` is valid for 4 f32 writes; storeu has no alignment requirement.
    unsafe { _mm_storeu_ps(dst.as_mut_ptr(), v) }
}

#[inline(always)]
pub(super) fn min(a: Reg, b: Reg) -> Reg {
    // SAFETY: SSE2 baseline.
    unsafe { _mm_min_ps(a, b) }
}

#[inline(always)]
pub(super) fn max(a: Reg, b: Reg) -> Reg {
    // SAFETY: SSE2 baseline.
    unsafe { _mm_max_ps(a, b) }
}

/// Lanes where `a < b` take `t`, others take `f`
#[inline(always)]
pub(super) fn select_lt(a: Reg, b: Reg, t: Reg, f: Reg) -> Reg {
    // SAFETY: SSE2 baseline.
    unsafe { blend(_mm_cmplt_ps(a, b), t, f) }
}

/// Lanes where `a > b` take `t`, others take `f`
#[inline(always)]
pub(super) fn select_gt(a: Reg, b: Reg, t: Reg, f: Reg) -> Reg {
    // SAFETY: SSE2 baseline.
    unsafe { blend(_mm_cmpgt_ps(a, b), t, f) }
}

// (mask & t) | (!mask & f); SSE2 has no blendv
#[inline(always)]
unsafe fn blend(mask: Reg, t: Reg, f: Reg) -> Reg {
    unsafe { _mm_or_ps(_mm_and_ps(mask, t), _mm_andnot_ps(mask, f)) }
}
