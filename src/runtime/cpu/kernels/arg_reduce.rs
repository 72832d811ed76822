//! Packed arg-max / arg-min kernels
//!
//! All kernels share one running-compare step ([`update`]): a candidate vector
//! replaces the running extreme only in lanes where it is strictly better, and
//! the running index follows the same predicate. Iteration always walks the
//! reduced axis in increasing order, so equal extremes keep the smallest index.
//!
//! Memory is NC4HW4 and every reduction is described by `(inner, reduce, outer)`:
//! `inner` independent windows, each `reduce` rows of `outer` contiguous
//! elements. `outer` is always a multiple of 4.

use super::simd::Float4;
use crate::dtype::Element;
use crate::runtime::Parallelism;
use crate::tensor::LANES;

/// Comparison rule of one reduction mode
pub(crate) trait Extremum: Send + Sync + 'static {
    /// Lane-wise `cur` beats `guard` ? `cur_index` : `guard_index`
    fn select_index(cur: Float4, guard: Float4, cur_index: Float4, guard_index: Float4) -> Float4;

    /// Lane-wise running extreme
    fn select_value(cur: Float4, guard: Float4) -> Float4;

    /// Scalar form of the same predicate
    fn beats(cur: f32, best: f32) -> bool;
}

/// Smallest value wins
pub(crate) struct ArgMin;

/// Largest value wins
pub(crate) struct ArgMax;

impl Extremum for ArgMin {
    #[inline(always)]
    fn select_index(cur: Float4, guard: Float4, cur_index: Float4, guard_index: Float4) -> Float4 {
        Float4::bsl_clt(cur, guard, cur_index, guard_index)
    }

    #[inline(always)]
    fn select_value(cur: Float4, guard: Float4) -> Float4 {
        Float4::min(cur, guard)
    }

    #[inline(always)]
    fn beats(cur: f32, best: f32) -> bool {
        cur < best
    }
}

impl Extremum for ArgMax {
    #[inline(always)]
    fn select_index(cur: Float4, guard: Float4, cur_index: Float4, guard_index: Float4) -> Float4 {
        Float4::bsl_cgt(cur, guard, cur_index, guard_index)
    }

    #[inline(always)]
    fn select_value(cur: Float4, guard: Float4) -> Float4 {
        Float4::max(cur, guard)
    }

    #[inline(always)]
    fn beats(cur: f32, best: f32) -> bool {
        cur > best
    }
}

/// Index-space decomposition of one reduction
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ReduceExtents {
    /// Number of independent windows
    pub inner: usize,
    /// Length of the reduced axis
    pub reduce: usize,
    /// Contiguous elements per reduce step (multiple of 4)
    pub outer: usize,
}

impl ReduceExtents {
    /// Physical elements covered, `inner * reduce * outer`
    #[inline]
    pub fn numel(&self) -> usize {
        self.inner * self.reduce * self.outer
    }
}

#[inline(always)]
fn update<M: Extremum>(
    guard_value: &mut Float4,
    guard_index: &mut Float4,
    cur_value: Float4,
    cur_index: Float4,
) {
    *guard_index = M::select_index(cur_value, *guard_value, cur_index, *guard_index);
    *guard_value = M::select_value(cur_value, *guard_value);
}

/// Running compare of one 4-lane column held in registers.
///
/// Step `r` is `column[r * stride..r * stride + 4]`; `steps` must be at least 1.
/// Returns the winning values and their step indices.
#[inline]
fn scan_column<T: Element, M: Extremum>(
    column: &[T],
    steps: usize,
    stride: usize,
) -> (Float4, Float4) {
    let mut guard_value = Float4::load(column);
    let mut guard_index = Float4::splat(0.0);
    for r in 1..steps {
        let cur_value = Float4::load(&column[r * stride..]);
        update::<M>(
            &mut guard_value,
            &mut guard_index,
            cur_value,
            Float4::splat(r as f32),
        );
    }
    (guard_value, guard_index)
}

/// Reduce one `reduce x outer` window into `out[..outer]`.
///
/// With a workspace the running extremes live in `workspace[..outer]` and the
/// loop order is reduce -> outer, so each input row is read once, front to
/// back. Without one, every 4-lane column is scanned in registers.
fn reduce_window<T: Element, M: Extremum>(
    window: &[T],
    out: &mut [f32],
    reduce: usize,
    outer: usize,
    workspace: Option<&mut [T]>,
) {
    let out = &mut out[..outer];
    match workspace {
        Some(workspace) => {
            let guard = &mut workspace[..outer];
            guard.copy_from_slice(&window[..outer]);
            out.fill(0.0);
            for r in 1..reduce {
                let row = &window[r * outer..(r + 1) * outer];
                let cur_index = Float4::splat(r as f32);
                for ((cur, value), index) in row
                    .chunks_exact(LANES)
                    .zip(guard.chunks_exact_mut(LANES))
                    .zip(out.chunks_exact_mut(LANES))
                {
                    let mut guard_value = Float4::load(value);
                    let mut guard_index = Float4::load(index);
                    update::<M>(
                        &mut guard_value,
                        &mut guard_index,
                        Float4::load(cur),
                        cur_index,
                    );
                    guard_index.save(index);
                    guard_value.save(value);
                }
            }
        }
        None => {
            for (o, index) in out.chunks_exact_mut(LANES).enumerate() {
                let (_, guard_index) = scan_column::<T, M>(&window[o * LANES..], reduce, outer);
                guard_index.save(index);
            }
        }
    }
}

/// Workspace-caching reduction for axes that are neither packed nor innermost
/// (batch, height).
///
/// Runs sequentially: `workspace` is one region shared by every window.
pub(crate) fn arg_reduce_cached<T: Element, M: Extremum>(
    input: &[T],
    output: &mut [f32],
    workspace: &mut [T],
    extents: ReduceExtents,
) {
    let ReduceExtents {
        inner,
        reduce,
        outer,
    } = extents;
    for (window, out) in input
        .chunks_exact(reduce * outer)
        .zip(output.chunks_exact_mut(outer))
        .take(inner)
    {
        reduce_window::<T, M>(window, out, reduce, outer, Some(&mut *workspace));
    }
}

/// Width-axis reduction: each window is `W * 4` contiguous elements and owns
/// its 4 output lanes, so windows run in parallel.
pub(crate) fn arg_reduce_width<T: Element, M: Extremum>(
    input: &[T],
    output: &mut [f32],
    extents: ReduceExtents,
    parallelism: &Parallelism,
) {
    let ReduceExtents { reduce, outer, .. } = extents;
    let window_len = reduce * outer;
    parallelism.for_each_chunk(output, outer, |i, out| {
        let window = &input[i * window_len..(i + 1) * window_len];
        reduce_window::<T, M>(window, out, reduce, outer, None);
    });
}

/// Channel-axis reduction over the packed dimension.
///
/// Within a 4-lane column the lanes are 4 consecutive channels of one spatial
/// position, so the vector loop yields one candidate per lane which the
/// horizontal resolver then merges. The partial last group contributes only
/// its `channels % 4` valid lanes. The winner lands in lane 0 of the output
/// group; lanes 1..3 are zero.
pub(crate) fn arg_reduce_channel<T: Element, M: Extremum>(
    input: &[T],
    output: &mut [f32],
    extents: ReduceExtents,
    channels: usize,
    parallelism: &Parallelism,
) {
    let ReduceExtents {
        inner,
        reduce,
        outer,
    } = extents;
    let remainder = channels % LANES;
    let full_groups = if remainder == 0 { reduce } else { reduce - 1 };

    for (batch, out) in input
        .chunks_exact(reduce * outer)
        .zip(output.chunks_exact_mut(outer))
        .take(inner)
    {
        parallelism.for_each_chunk(out, LANES, |o, out| {
            let column = &batch[o * LANES..];
            let index = channel_winner::<T, M>(column, full_groups, remainder, outer);
            Float4::splat(0.0).with_lane(index, 0).save(out);
        });
    }
}

#[inline]
fn channel_winner<T: Element, M: Extremum>(
    column: &[T],
    full_groups: usize,
    remainder: usize,
    stride: usize,
) -> f32 {
    let mut best = None;
    if full_groups > 0 {
        let (value, index) = scan_column::<T, M>(column, full_groups, stride);
        best = resolve_lanes::<M>(best, value, index, LANES);
    }
    if remainder != 0 {
        let value = Float4::load(&column[full_groups * stride..]);
        best = resolve_lanes::<M>(best, value, Float4::splat(full_groups as f32), remainder);
    }
    best.map_or(0.0, |(_, index)| index)
}

/// Horizontal tie-break across the first `lanes` lanes of a channel group.
///
/// Lane `l` with group index `g` stands for channel `g * 4 + l`. Lanes are
/// scanned in order; a lane replaces the current best when its value is
/// strictly better, or equal with a smaller channel index.
#[inline]
fn resolve_lanes<M: Extremum>(
    best: Option<(f32, f32)>,
    value: Float4,
    group_index: Float4,
    lanes: usize,
) -> Option<(f32, f32)> {
    let values = value.to_array();
    let groups = group_index.to_array();
    (0..lanes).fold(best, |best, lane| {
        let v = values[lane];
        let index = groups[lane] * LANES as f32 + lane as f32;
        match best {
            None => Some((v, index)),
            Some((best_value, best_index))
                if M::beats(v, best_value) || (v == best_value && index < best_index) =>
            {
                Some((v, index))
            }
            keep => keep,
        }
    })
}
