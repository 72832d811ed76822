//! `ArgMaxOrMin` dispatch: validation, strategy selection, dtype/mode fan-out

use super::kernels::{self, ArgMax, ArgMin, Extremum, ReduceExtents};
use crate::dtype::{ARG_REDUCE_INPUTS, ARG_REDUCE_OUTPUT, DType, Element};
use crate::error::{Error, Result};
use crate::ops::{ArgMaxOrMinParam, ArgMode, LayerParam, OP_NAME, ReduceAxis, downcast_param};
use crate::runtime::{Parallelism, ScratchProvider, typed_workspace};
use crate::tensor::{LANES, PackedShape, PackedTensor};
use half::bf16;

/// Kernel family used for one axis
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReduceStrategy {
    /// Running extremes cached in shared scratch; sequential (batch, height)
    Cached,
    /// Packed channel axis with horizontal tie-break
    Channel,
    /// Innermost axis, register-resident (width)
    Width,
}

/// Extents and kernel choice for reducing one axis of a packed shape
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ReducePlan {
    /// Axis being reduced
    pub axis: ReduceAxis,
    /// Kernel family
    pub strategy: ReduceStrategy,
    /// `(inner, reduce, outer)` decomposition over the padded buffer
    pub extents: ReduceExtents,
}

impl ReducePlan {
    /// Plan the reduction of `axis` over `shape`.
    ///
    /// ```text
    /// axis     inner     reduce  outer       strategy
    /// batch    1         N       C4*H*W*4    Cached
    /// channel  N         C4      H*W*4       Channel
    /// height   N*C4      H       W*4         Cached
    /// width    N*C4*H    W       4           Width
    /// ```
    pub fn new(shape: PackedShape, axis: ReduceAxis) -> Self {
        let (n, c4, h, w) = (shape.n(), shape.c4(), shape.h(), shape.w());
        let (inner, reduce, outer, strategy) = match axis {
            ReduceAxis::Batch => (1, n, c4 * h * w * LANES, ReduceStrategy::Cached),
            ReduceAxis::Channel => (n, c4, h * w * LANES, ReduceStrategy::Channel),
            ReduceAxis::Height => (n * c4, h, w * LANES, ReduceStrategy::Cached),
            ReduceAxis::Width => (n * c4 * h, w, LANES, ReduceStrategy::Width),
        };
        Self {
            axis,
            strategy,
            extents: ReduceExtents {
                inner,
                reduce,
                outer,
            },
        }
    }

    /// Scratch bytes the plan needs for elements of `dtype`
    pub fn workspace_bytes(&self, dtype: DType) -> usize {
        match self.strategy {
            ReduceStrategy::Cached => self.extents.outer * dtype.size_in_bytes(),
            ReduceStrategy::Channel | ReduceStrategy::Width => 0,
        }
    }
}

/// Run the `ArgMaxOrMin` layer with an explicit scratch provider and
/// parallelism.
///
/// Checks run in this order, and nothing is written before all of them pass:
/// output dtype, input dtype, parameter kind, axis, output shape.
pub fn arg_max_or_min_with(
    input: &PackedTensor,
    output: &mut PackedTensor,
    param: &dyn LayerParam,
    scratch: &mut dyn ScratchProvider,
    parallelism: &Parallelism,
) -> Result<()> {
    if output.dtype() != ARG_REDUCE_OUTPUT {
        return Err(Error::unsupported_output_dtype(output.dtype(), OP_NAME));
    }
    if !ARG_REDUCE_INPUTS.contains(input.dtype()) {
        return Err(Error::unsupported_dtype(input.dtype(), OP_NAME));
    }
    let params = downcast_param::<ArgMaxOrMinParam>(param, ArgMaxOrMinParam::LAYER_NAME)?;
    let axis = params.reduce_axis()?;

    let expected = input.shape().reduced(axis.index());
    if output.shape() != expected {
        return Err(Error::shape_mismatch(expected.dims(), output.shape().dims()));
    }

    let plan = ReducePlan::new(input.shape(), axis);
    tracing::debug!(
        op = OP_NAME,
        ?axis,
        mode = ?params.mode,
        dtype = %input.dtype(),
        inner = plan.extents.inner,
        reduce = plan.extents.reduce,
        outer = plan.extents.outer,
        strategy = ?plan.strategy,
        backend = kernels::backend_name(),
        parallel = parallelism.is_parallel(),
        "dispatch"
    );

    match input.dtype() {
        DType::F32 => run_typed::<f32>(input, output, params.mode, &plan, scratch, parallelism),
        DType::BF16 => run_typed::<bf16>(input, output, params.mode, &plan, scratch, parallelism),
        other => Err(Error::unsupported_dtype(other, OP_NAME)),
    }
}

fn run_typed<T: Element>(
    input: &PackedTensor,
    output: &mut PackedTensor,
    mode: ArgMode,
    plan: &ReducePlan,
    scratch: &mut dyn ScratchProvider,
    parallelism: &Parallelism,
) -> Result<()> {
    match mode {
        ArgMode::Min => run_mode::<T, ArgMin>(input, output, plan, scratch, parallelism),
        ArgMode::Max => run_mode::<T, ArgMax>(input, output, plan, scratch, parallelism),
    }
}

fn run_mode<T: Element, M: Extremum>(
    input: &PackedTensor,
    output: &mut PackedTensor,
    plan: &ReducePlan,
    scratch: &mut dyn ScratchProvider,
    parallelism: &Parallelism,
) -> Result<()> {
    let channels = input.shape().c();
    let src = input.as_slice::<T>()?;

    match plan.strategy {
        ReduceStrategy::Cached => {
            let bytes = scratch.shared_workspace(plan.workspace_bytes(T::DTYPE))?;
            let workspace = typed_workspace::<T>(bytes, plan.extents.outer)?;
            let dst = output.as_mut_slice::<f32>()?;
            kernels::arg_reduce_cached::<T, M>(src, dst, workspace, plan.extents);
        }
        ReduceStrategy::Channel => {
            let dst = output.as_mut_slice::<f32>()?;
            kernels::arg_reduce_channel::<T, M>(src, dst, plan.extents, channels, parallelism);
        }
        ReduceStrategy::Width => {
            let dst = output.as_mut_slice::<f32>()?;
            kernels::arg_reduce_width::<T, M>(src, dst, plan.extents, parallelism);
        }
    }
    Ok(())
}
