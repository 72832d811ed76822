//! # numr-argpack
//!
//! **Arg-max / arg-min over packed (NC4HW4) tensors on the CPU.**
//!
//! Inference runtimes keep activations in a channel-packed layout: channels are
//! grouped by 4, and the 4 channels of a group sit next to each other for every
//! spatial position. numr-argpack reduces such tensors along any logical axis
//! and reports, for each output position, the index of the smallest or largest
//! element.
//!
//! ## Features
//!
//! - **Every axis**: batch, channel, height and width, each with a dedicated strategy
//! - **Deterministic ties**: among equal extremes the smallest index wins
//! - **Padding-aware**: padded channels of the last group never win
//! - **Input types**: F32 and BF16 input, F32 output (indices as floats)
//! - **Vectorized**: one 128-bit register per channel group (SSE2 / NEON / scalar)
//! - **Parallel**: channel and width reductions run on rayon
//!
//! ## Quick Start
//!
//! ```rust
//! use numr_argpack::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let shape = PackedShape::new(1, 4, 1, 3)?;
//! let data: Vec<f32> = (0..12).map(|i| (i % 5) as f32).collect();
//! let input = PackedTensor::from_nchw(shape, &data)?;
//!
//! let client = CpuClient::new();
//! let indices = client.argmax(&input, ReduceAxis::Width)?;
//! assert_eq!(indices.shape().dims(), [1, 4, 1, 1]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): Multi-threaded channel and width reductions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dtype;
pub mod error;
pub mod ops;
pub mod runtime;
pub mod tensor;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dtype::DType;
    pub use crate::error::{Error, Result};
    pub use crate::ops::{ArgMaxOrMinParam, ArgMode, ArgReduceOps, LayerParam, ReduceAxis};
    pub use crate::runtime::cpu::{CpuClient, CpuClientConfig, ParallelismConfig};
    pub use crate::tensor::{PackedShape, PackedTensor};
}
