//! Common test utilities
#![allow(dead_code)]

use half::bf16;
use numr_argpack::dtype::Element;
use numr_argpack::ops::{ArgMode, ReduceAxis};
use numr_argpack::runtime::cpu::{CpuClient, CpuClientConfig, ParallelismConfig};
use numr_argpack::tensor::{PackedShape, PackedTensor};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Shapes covering full channel groups, partial groups and C < 4
pub const SHAPES: &[[usize; 4]] = &[
    [1, 1, 1, 1],
    [1, 3, 2, 2],
    [2, 4, 3, 3],
    [2, 5, 2, 3],
    [1, 6, 3, 2],
    [3, 7, 2, 4],
    [2, 8, 4, 5],
    [1, 13, 1, 7],
];

/// Create a CPU client for testing (default configuration)
pub fn create_cpu_client() -> CpuClient {
    CpuClient::new()
}

/// Create a CPU client that runs everything on the calling thread
pub fn create_sequential_client() -> CpuClient {
    CpuClient::with_config(CpuClientConfig::default().parallelism(ParallelismConfig::sequential()))
        .unwrap()
}

/// Create a CPU client with a dedicated pool and one chunk per task
pub fn create_parallel_client() -> CpuClient {
    let config =
        CpuClientConfig::default().parallelism(ParallelismConfig::with_threads(4).min_len(1));
    CpuClient::with_config(config).unwrap()
}

pub fn shape(dims: [usize; 4]) -> PackedShape {
    PackedShape::from_dims(dims).unwrap()
}

/// Random logical NCHW values drawn from a few small integers, so ties are
/// frequent and every value is exact in BF16.
pub fn random_nchw(dims: [usize; 4], seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let len = dims.iter().product();
    (0..len).map(|_| rng.random_range(-3i32..=3) as f32).collect()
}

pub fn to_bf16(values: &[f32]) -> Vec<bf16> {
    values.iter().map(|&v| bf16::from_f32(v)).collect()
}

/// Pack logical NCHW values as `T`
pub fn packed<T: Element>(dims: [usize; 4], values: &[f32]) -> PackedTensor {
    let data: Vec<T> = values.iter().map(|&v| T::from_f32(v)).collect();
    PackedTensor::from_nchw(shape(dims), &data).unwrap()
}

/// Brute-force arg-reduce over logical NCHW data.
///
/// Scans the reduced axis in increasing order and replaces the current best
/// only on a strictly better value, so the first occurrence wins.
pub fn reference_arg_reduce(
    values: &[f32],
    dims: [usize; 4],
    axis: ReduceAxis,
    mode: ArgMode,
) -> Vec<f32> {
    let [_, c, h, w] = dims;
    let axis = axis.index();
    let mut out_dims = dims;
    out_dims[axis] = 1;
    let at = |i: [usize; 4]| values[((i[0] * c + i[1]) * h + i[2]) * w + i[3]];

    let mut out = Vec::with_capacity(out_dims.iter().product());
    for ni in 0..out_dims[0] {
        for ci in 0..out_dims[1] {
            for hi in 0..out_dims[2] {
                for wi in 0..out_dims[3] {
                    let mut idx = [ni, ci, hi, wi];
                    let mut best = at(idx);
                    let mut best_index = 0;
                    for r in 1..dims[axis] {
                        idx[axis] = r;
                        let v = at(idx);
                        let better = match mode {
                            ArgMode::Min => v < best,
                            ArgMode::Max => v > best,
                        };
                        if better {
                            best = v;
                            best_index = r;
                        }
                    }
                    out.push(best_index as f32);
                }
            }
        }
    }
    out
}
