//! Channel-packed tensor types
//!
//! This module provides the NC4HW4 shape descriptor, aligned host storage and
//! the dtype-erased [`PackedTensor`] the arg-reduce kernels read and write.

mod core;
mod shape;
mod storage;

pub use core::PackedTensor;
pub use shape::{LANES, PackedShape, up_div};
pub use storage::{STORAGE_ALIGN, Storage};
