//! Element trait for mapping Rust types to DType

use super::DType;
use bytemuck::{Pod, Zeroable};

/// Trait for types the arg-reduce kernels can read
///
/// This trait connects Rust's type system to the runtime dtype system.
/// It's implemented for `f32` and `half::bf16`, the two input kinds the
/// kernels accept. Computation always happens in f32 lanes; values are
/// widened on load and narrowed on store.
///
/// # Bounds
/// - `Copy + Send + Sync + 'static` - Basic trait requirements
/// - `Pod + Zeroable` - Safe byte reinterpretation of tensor storage (bytemuck)
/// - `PartialOrd` - Comparison for brute-force checks
pub trait Element: Copy + Send + Sync + Pod + Zeroable + PartialOrd + 'static {
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Widen to f32 for lane computation
    fn to_f32(self) -> f32;

    /// Narrow from f32
    ///
    /// Lossless for any value produced by `to_f32` on the same type.
    fn from_f32(v: f32) -> Self;
}

impl Element for f32 {
    const DTYPE: DType = DType::F32;

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        v
    }
}

impl Element for half::bf16 {
    const DTYPE: DType = DType::BF16;

    #[inline]
    fn to_f32(self) -> f32 {
        half::bf16::to_f32(self)
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        half::bf16::from_f32(v)
    }
}
