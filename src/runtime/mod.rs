//! Runtime backends for packed tensor computation
//!
//! # Architecture
//!
//! ```text
//! runtime
//! ├── workspace (ScratchProvider, SharedWorkspace)
//! ├── parallel  (Parallelism: sequential or rayon)
//! └── cpu       (CpuClient, dispatch, kernels)
//! ```

pub mod cpu;
mod parallel;
mod workspace;

pub use parallel::{DEFAULT_MIN_LEN, Parallelism};
pub(crate) use workspace::typed_workspace;
pub use workspace::{ScratchProvider, SharedWorkspace};
