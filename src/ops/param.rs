//! Layer parameters for the arg-max / arg-min operator
//!
//! Operators receive their parameters as `&dyn LayerParam`, one variant among
//! many layer kinds. The kernel narrows that object with a checked downcast
//! ([`downcast_param`]) and fails with [`Error::ParamMismatch`] when the caller
//! passed parameters belonging to a different layer.

use crate::error::{Error, Result};
use std::any::Any;
use std::fmt;

/// Parameters attached to one layer of a model graph
pub trait LayerParam: Any + fmt::Debug + Send + Sync {
    /// Name of the layer kind these parameters belong to
    fn layer_name(&self) -> &'static str;

    /// Upcast used for checked narrowing
    fn as_any(&self) -> &dyn Any;
}

/// Narrow a parameter object to the concrete kind `P`
pub fn downcast_param<'a, P: LayerParam>(
    param: &'a dyn LayerParam,
    expected: &'static str,
) -> Result<&'a P> {
    param
        .as_any()
        .downcast_ref::<P>()
        .ok_or_else(|| Error::ParamMismatch {
            expected,
            got: param.layer_name(),
        })
}

/// Whether the operator looks for the smallest or the largest element
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ArgMode {
    /// Index of the minimum (argmin), raw value 0
    Min,
    /// Index of the maximum (argmax), raw value 1
    Max,
}

impl ArgMode {
    /// The opposite mode
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Self::Min => Self::Max,
            Self::Max => Self::Min,
        }
    }

    /// Raw model encoding
    #[inline]
    pub fn as_raw(self) -> i32 {
        match self {
            Self::Min => 0,
            Self::Max => 1,
        }
    }
}

impl TryFrom<i32> for ArgMode {
    type Error = Error;

    fn try_from(raw: i32) -> Result<Self> {
        match raw {
            0 => Ok(Self::Min),
            1 => Ok(Self::Max),
            other => Err(Error::invalid_argument(
                "mode",
                format!("expected 0 (min) or 1 (max), got {other}"),
            )),
        }
    }
}

/// Logical axis of an NC4HW4 tensor
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ReduceAxis {
    /// Axis 0
    Batch,
    /// Axis 1, the packed axis
    Channel,
    /// Axis 2
    Height,
    /// Axis 3, innermost before the lane
    Width,
}

impl ReduceAxis {
    /// All axes in index order
    pub const ALL: [Self; 4] = [Self::Batch, Self::Channel, Self::Height, Self::Width];

    /// Logical index into `[N, C, H, W]`
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Self::Batch => 0,
            Self::Channel => 1,
            Self::Height => 2,
            Self::Width => 3,
        }
    }
}

impl TryFrom<i32> for ReduceAxis {
    type Error = Error;

    fn try_from(axis: i32) -> Result<Self> {
        match axis {
            0 => Ok(Self::Batch),
            1 => Ok(Self::Channel),
            2 => Ok(Self::Height),
            3 => Ok(Self::Width),
            _ => Err(Error::UnsupportedAxis { axis }),
        }
    }
}

/// Parameters of the `ArgMaxOrMin` layer
///
/// The axis is kept in its raw model encoding; it is resolved by the
/// dispatcher so an out-of-range value surfaces as [`Error::UnsupportedAxis`]
/// at execution time, after the dtype checks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ArgMaxOrMinParam {
    /// Min or max
    pub mode: ArgMode,
    /// Raw axis, valid values are 0..=3
    pub axis: i32,
}

impl ArgMaxOrMinParam {
    /// Layer name reported in parameter mismatch errors
    pub const LAYER_NAME: &'static str = "ArgMaxOrMin";

    /// Create parameters for a logical axis
    pub fn new(mode: ArgMode, axis: ReduceAxis) -> Self {
        Self {
            mode,
            axis: axis.index() as i32,
        }
    }

    /// Argmax along `axis`
    pub fn argmax(axis: ReduceAxis) -> Self {
        Self::new(ArgMode::Max, axis)
    }

    /// Argmin along `axis`
    pub fn argmin(axis: ReduceAxis) -> Self {
        Self::new(ArgMode::Min, axis)
    }

    /// Decode raw model values; only the mode is validated here
    pub fn from_raw(mode: i32, axis: i32) -> Result<Self> {
        Ok(Self {
            mode: ArgMode::try_from(mode)?,
            axis,
        })
    }

    /// Resolve the raw axis
    pub fn reduce_axis(&self) -> Result<ReduceAxis> {
        ReduceAxis::try_from(self.axis)
    }
}

impl LayerParam for ArgMaxOrMinParam {
    fn layer_name(&self) -> &'static str {
        Self::LAYER_NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
