//! CPU runtime implementation
//!
//! The CPU runtime is the reference backend for packed-layout operations.
//! Vector code uses one 128-bit register per 4-channel group (SSE2 on x86-64,
//! NEON on AArch64, scalar elsewhere), and parallelizable kernels run on rayon
//! when the `rayon` feature is enabled.

mod arg_reduce;
mod client;
pub(crate) mod kernels;

pub use arg_reduce::{ReducePlan, ReduceStrategy, arg_max_or_min_with};
pub use client::{CpuClient, CpuClientConfig, ParallelismConfig};
pub use kernels::{ReduceExtents, backend_name};
