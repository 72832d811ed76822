//! NEON backend for `Float4`
//!
//! NEON is mandatory on AArch64. `vminq_f32`/`vmaxq_f32` propagate NaN, which
//! would let the running value and the running index disagree, so min/max are
//! expressed as a compare + bit select with the same predicate as the index
//! update (matching SSE `minps`/`maxps`).

use std::arch::aarch64::*;

pub(super) type Reg = float32x4_t;

pub(super) const NAME: &str = "neon";

#[inline(always)]
pub(super) fn splat(v: f32) -> Reg {
    // SAFETY: NEON is always available on AArch64.
    unsafe { vdupq_n_f32(v) }
}

#[inline(always)]
pub(super) fn load(src: &[f32; 4]) -> Reg {
    // SAFETY: `src` is valid for 4 f32 reads.
    unsafe { vld1q_f32(src.as_ptr()) }
}

#[inline(always)]
pub(super) fn store(v: Reg, dst: &mut [f32; 4]) {
    // SAFETY: `dst` is valid for 4 f32 writes.
    unsafe { vst1q_f32(dst.as_mut_ptr(), v) }
}

#[inline(always)]
pub(super) fn min(a: Reg, b: Reg) -> Reg {
    select_lt(a, b, a, b)
}

#[inline(always)]
pub(super) fn max(a: Reg, b: Reg) -> Reg {
    select_gt(a, b, a, b)
}

/// Lanes where `a < b` take `t`, others take `f`
#[inline(always)]
pub(super) fn select_lt(a: Reg, b: Reg, t: Reg, f: Reg) -> Reg {
    // SAFETY: NEON baseline.
    unsafe { vbslq_f32(vcltq_f32(a, b), t, f) }
}

/// Lanes where `a > b` take `t`, others take `f`
#[inline(always)]
pub(super) fn select_gt(a: Reg, b: Reg, t: Reg, f: Reg) -> Reg {
    // SAFETY: NEON baseline.
    unsafe { vbslq_f32(vcgtq_f32(a, b), t, f) }
}
