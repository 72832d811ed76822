//! Operator surface: layer parameters and the arg-reduce operations trait

pub mod param;
mod traits;

pub use param::{ArgMaxOrMinParam, ArgMode, LayerParam, ReduceAxis, downcast_param};
pub use traits::{ArgReduceOps, OP_NAME};
