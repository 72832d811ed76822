//! Error reporting for packed arg-reduce: kinds, precedence, untouched outputs

mod common;

use common::{create_cpu_client, packed, shape};
use numr_argpack::ops::{OP_NAME, downcast_param};
use numr_argpack::prelude::*;
use numr_argpack::runtime::cpu::arg_max_or_min_with;
use numr_argpack::runtime::{Parallelism, SharedWorkspace};
use std::any::Any;

/// Parameters of some other layer
#[derive(Debug)]
struct PoolingParam;

impl LayerParam for PoolingParam {
    fn layer_name(&self) -> &'static str {
        "Pooling"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

const DIMS: [usize; 4] = [2, 5, 3, 2];

fn f32_input() -> PackedTensor {
    let values: Vec<f32> = (0..60).map(|i| (i % 7) as f32).collect();
    packed::<f32>(DIMS, &values)
}

/// F32 output of the right shape for `axis`, filled with a sentinel
fn sentinel_output(axis: ReduceAxis) -> PackedTensor {
    let out_shape = shape(DIMS).reduced(axis.index());
    PackedTensor::from_packed(out_shape, &vec![-7.0f32; out_shape.numel()]).unwrap()
}

fn assert_untouched(output: &PackedTensor) {
    assert!(output.as_slice::<f32>().unwrap().iter().all(|&v| v == -7.0));
}

// ============================================================================
// Error kinds
// ============================================================================

#[test]
fn test_integer_output_rejected_and_untouched() {
    let client = create_cpu_client();
    let input = f32_input();
    let mut output = PackedTensor::zeros(shape(DIMS).reduced(3), DType::I32).unwrap();
    let before = output.as_bytes().to_vec();

    let err = client
        .arg_max_or_min_into(&input, &mut output, &ArgMaxOrMinParam::argmax(ReduceAxis::Width))
        .unwrap_err();

    assert!(matches!(
        err,
        Error::UnsupportedOutputDType {
            dtype: DType::I32,
            op: OP_NAME
        }
    ));
    assert_eq!(output.as_bytes(), &before[..]);
}

#[test]
fn test_bf16_output_rejected() {
    let client = create_cpu_client();
    let mut output = PackedTensor::zeros(shape(DIMS).reduced(1), DType::BF16).unwrap();
    let err = client
        .arg_max_or_min_into(&f32_input(), &mut output, &ArgMaxOrMinParam::argmin(ReduceAxis::Channel))
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedOutputDType { dtype: DType::BF16, .. }));
}

#[test]
fn test_unsupported_input_dtypes() {
    let client = create_cpu_client();
    for dtype in [DType::F16, DType::F64, DType::I8, DType::I32, DType::U8] {
        let input = PackedTensor::zeros(shape(DIMS), dtype).unwrap();

        let err = client.argmax(&input, ReduceAxis::Height).unwrap_err();
        assert!(
            matches!(err, Error::UnsupportedDType { dtype: d, .. } if d == dtype),
            "{dtype}: {err}"
        );

        let mut output = sentinel_output(ReduceAxis::Height);
        let err = client
            .arg_max_or_min_into(&input, &mut output, &ArgMaxOrMinParam::argmax(ReduceAxis::Height))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedDType { .. }));
        assert_untouched(&output);
    }
}

#[test]
fn test_unsupported_axis() {
    let client = create_cpu_client();
    let input = f32_input();
    for axis in [4, -1, 17] {
        let param = ArgMaxOrMinParam::from_raw(1, axis).unwrap();
        let err = client.arg_max_or_min(&input, &param).unwrap_err();
        assert!(matches!(err, Error::UnsupportedAxis { axis: a } if a == axis));

        let mut output = sentinel_output(ReduceAxis::Width);
        let err = client
            .arg_max_or_min_into(&input, &mut output, &param)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedAxis { .. }));
        assert_untouched(&output);
    }
}

#[test]
fn test_param_mismatch() {
    let client = create_cpu_client();
    let param = PoolingParam;

    let err = client.arg_max_or_min(&f32_input(), &param).unwrap_err();
    assert!(matches!(
        err,
        Error::ParamMismatch {
            expected: "ArgMaxOrMin",
            got: "Pooling"
        }
    ));

    let mut output = sentinel_output(ReduceAxis::Batch);
    let err = client
        .arg_max_or_min_into(&f32_input(), &mut output, &param)
        .unwrap_err();
    assert!(matches!(err, Error::ParamMismatch { .. }));
    assert_untouched(&output);
}

#[test]
fn test_downcast_param_outlives_expected_name() {
    let owned = ArgMaxOrMinParam::argmin(ReduceAxis::Channel);
    let erased: &dyn LayerParam = &owned;
    let narrowed = {
        let expected: &'static str = ArgMaxOrMinParam::LAYER_NAME;
        downcast_param::<ArgMaxOrMinParam>(erased, expected).unwrap()
    };
    assert_eq!(narrowed.mode, ArgMode::Min);
    assert_eq!(narrowed.reduce_axis().unwrap(), ReduceAxis::Channel);

    let err = downcast_param::<ArgMaxOrMinParam>(&PoolingParam, "ArgMaxOrMin").unwrap_err();
    assert!(matches!(err, Error::ParamMismatch { got: "Pooling", .. }));
}

#[test]
fn test_output_shape_mismatch() {
    let client = create_cpu_client();
    // output shaped for the width axis, reduction along height
    let mut output = sentinel_output(ReduceAxis::Width);
    let err = client
        .arg_max_or_min_into(&f32_input(), &mut output, &ArgMaxOrMinParam::argmin(ReduceAxis::Height))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::ShapeMismatch {
            expected: [2, 5, 1, 2],
            got: [2, 5, 3, 1]
        }
    ));
    assert_untouched(&output);
}

#[test]
fn test_invalid_raw_mode() {
    for mode in [-1, 2, 42] {
        assert!(matches!(
            ArgMaxOrMinParam::from_raw(mode, 0),
            Err(Error::InvalidArgument { arg: "mode", .. })
        ));
    }
}

#[test]
fn test_invalid_tensor_construction() {
    assert!(matches!(
        PackedShape::new(1, 0, 2, 2),
        Err(Error::InvalidArgument { .. })
    ));
    assert!(matches!(
        PackedTensor::from_nchw(shape(DIMS), &[1.0f32; 3]),
        Err(Error::InvalidArgument { arg: "data", .. })
    ));
    let tensor = f32_input();
    assert!(matches!(
        tensor.as_slice::<half::bf16>(),
        Err(Error::DTypeMismatch {
            lhs: DType::F32,
            rhs: DType::BF16
        })
    ));
}

// ============================================================================
// Precedence
// ============================================================================

#[test]
fn test_output_dtype_checked_first() {
    let client = create_cpu_client();
    let input = PackedTensor::zeros(shape(DIMS), DType::F16).unwrap();
    let mut output = PackedTensor::zeros(shape([1, 1, 1, 1]), DType::I8).unwrap();
    let err = client
        .arg_max_or_min_into(&input, &mut output, &PoolingParam)
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedOutputDType { .. }));
}

#[test]
fn test_input_dtype_before_param_and_axis() {
    let client = create_cpu_client();
    let input = PackedTensor::zeros(shape(DIMS), DType::F16).unwrap();
    let mut output = PackedTensor::zeros(shape([1, 1, 1, 1]), DType::F32).unwrap();

    let err = client
        .arg_max_or_min_into(&input, &mut output, &PoolingParam)
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedDType { .. }));

    let bad_axis = ArgMaxOrMinParam::from_raw(0, 9).unwrap();
    let err = client.arg_max_or_min(&input, &bad_axis).unwrap_err();
    assert!(matches!(err, Error::UnsupportedDType { .. }));
}

#[test]
fn test_axis_before_shape() {
    let mut workspace = SharedWorkspace::new();
    let mut output = PackedTensor::zeros(shape([1, 1, 1, 1]), DType::F32).unwrap();
    let err = arg_max_or_min_with(
        &f32_input(),
        &mut output,
        &ArgMaxOrMinParam::from_raw(0, 4).unwrap(),
        &mut workspace,
        &Parallelism::Sequential,
    )
    .unwrap_err();
    assert!(matches!(err, Error::UnsupportedAxis { axis: 4 }));
    // failed calls never allocate scratch
    assert_eq!(workspace.capacity(), 0);
}

#[test]
fn test_error_messages() {
    let err = Error::UnsupportedAxis { axis: 5 };
    assert!(err.to_string().contains("axis 5"));

    let err = Error::unsupported_output_dtype(DType::I32, OP_NAME);
    assert!(err.to_string().contains(OP_NAME));
}
