//! CPU kernel implementations
//!
//! Kernels operate on typed slices of the packed NC4HW4 buffer and never
//! allocate; scratch memory and parallelism are supplied by the caller.

mod arg_reduce;
pub mod simd;

pub use arg_reduce::ReduceExtents;
pub(crate) use arg_reduce::{
    ArgMax, ArgMin, Extremum, arg_reduce_cached, arg_reduce_channel, arg_reduce_width,
};
pub use simd::backend_name;
