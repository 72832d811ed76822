//! Portable scalar backend for `Float4`
//!
//! Used on targets without a 128-bit baseline and as the reference the native
//! backends are tested against.

pub(super) type Reg = [f32; 4];

#[allow(dead_code)]
pub(super) const NAME: &str = "scalar";

#[inline(always)]
pub(super) fn splat(v: f32) -> Reg {
    [v; 4]
}

#[inline(always)]
pub(super) fn load(src: &[f32; 4]) -> Reg {
    *src
}

#[inline(always)]
pub(super) fn store(v: Reg, dst: &mut [f32; 4]) {
    *dst = v;
}

#[inline(always)]
pub(super) fn min(a: Reg, b: Reg) -> Reg {
    select_lt(a, b, a, b)
}

#[inline(always)]
pub(super) fn max(a: Reg, b: Reg) -> Reg {
    select_gt(a, b, a, b)
}

#[inline(always)]
pub(super) fn select_lt(a: Reg, b: Reg, t: Reg, f: Reg) -> Reg {
    std::array::from_fn(|i| if a[i] < b[i] { t[i] } else { f[i] })
}

#[inline(always)]
pub(super) fn select_gt(a: Reg, b: Reg, t: Reg, f: Reg) -> Reg {
    std::array::from_fn(|i| if a[i] > b[i] { t[i] } else { f[i] })
}
