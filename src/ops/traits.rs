//! Arg-reduce operations trait.

use super::param::{ArgMaxOrMinParam, LayerParam, ReduceAxis};
use crate::dtype::{ARG_REDUCE_INPUTS, ARG_REDUCE_OUTPUT};
use crate::error::{Error, Result};
use crate::tensor::{PackedShape, PackedTensor};

/// Operation name used in error messages and log fields
pub const OP_NAME: &str = "arg_max_or_min";

/// Arg-max / arg-min over one logical axis of a packed tensor
pub trait ArgReduceOps {
    /// Run the `ArgMaxOrMin` layer into a caller-provided output.
    ///
    /// The output must be F32 with the shape returned by [`output_shape`]. Each
    /// output element holds the index (as a float) of the winning element along
    /// the reduced axis; among equal extremes the smallest index wins. For the
    /// channel axis, padding channels never win.
    ///
    /// On error the output is left untouched.
    ///
    /// # Arguments
    ///
    /// * `input` - F32 or BF16 packed tensor
    /// * `output` - F32 packed tensor receiving the indices
    /// * `param` - Layer parameters; must be [`ArgMaxOrMinParam`]
    ///
    /// [`output_shape`]: ArgReduceOps::output_shape
    fn arg_max_or_min_into(
        &self,
        input: &PackedTensor,
        output: &mut PackedTensor,
        param: &dyn LayerParam,
    ) -> Result<()>;

    /// Run the `ArgMaxOrMin` layer, allocating the output.
    ///
    /// Errors are reported in the same order as [`arg_max_or_min_into`]:
    /// input dtype, parameter kind, axis.
    ///
    /// [`arg_max_or_min_into`]: ArgReduceOps::arg_max_or_min_into
    fn arg_max_or_min(&self, input: &PackedTensor, param: &dyn LayerParam) -> Result<PackedTensor> {
        if !ARG_REDUCE_INPUTS.contains(input.dtype()) {
            return Err(Error::unsupported_dtype(input.dtype(), OP_NAME));
        }
        let params = super::param::downcast_param::<ArgMaxOrMinParam>(
            param,
            ArgMaxOrMinParam::LAYER_NAME,
        )?;
        let shape = self.output_shape(input.shape(), params.reduce_axis()?);
        let mut output = PackedTensor::zeros(shape, ARG_REDUCE_OUTPUT)?;
        self.arg_max_or_min_into(input, &mut output, param)?;
        Ok(output)
    }

    /// Argmax along `axis`.
    fn argmax(&self, input: &PackedTensor, axis: ReduceAxis) -> Result<PackedTensor> {
        self.arg_max_or_min(input, &ArgMaxOrMinParam::argmax(axis))
    }

    /// Argmin along `axis`.
    fn argmin(&self, input: &PackedTensor, axis: ReduceAxis) -> Result<PackedTensor> {
        self.arg_max_or_min(input, &ArgMaxOrMinParam::argmin(axis))
    }

    /// Output shape for reducing `axis` of `input`: the reduced axis becomes 1.
    fn output_shape(&self, input: PackedShape, axis: ReduceAxis) -> PackedShape {
        input.reduced(axis.index())
    }
}
