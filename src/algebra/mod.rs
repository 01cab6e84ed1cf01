//! Scalar fields for tensor components.
//!
//! This module defines the [`Scalar`] trait implemented by every component
//! type a tensor may hold:
//! - real floating point: `f32`, `f64`
//! - integers: `i32`, `i64`, `u32`, `u64`
//! - complex: [`Complex32`], [`Complex64`]
//!
//! Each scalar names an associated real floating point type, which is what
//! norms are reported in.

use num_traits::{Float, Num};

pub use num_complex::{Complex32, Complex64};

/// Marker trait for scalar types that can be used in tensors.
///
/// Components are plain-old-data so the packed memory of a tensor can be
/// handed to external row-major routines byte for byte.
pub trait Scalar:
    Num
    + Copy
    + Clone
    + Send
    + Sync
    + Default
    + PartialEq
    + std::fmt::Debug
    + std::fmt::Display
    + 'static
    + bytemuck::Pod
{
    /// The floating point type norms of tensors over this scalar are expressed in.
    type Real: Float + std::fmt::Debug + std::fmt::Display;

    /// Convert to the associated real type.
    ///
    /// For complex scalars this keeps the real part only, which is why norms
    /// are not meaningful over complex fields.
    fn to_real(self) -> Self::Real;

    /// Additive inverse, computed as `0 - self`.
    ///
    /// Unsigned scalars overflow for any nonzero value; antisymmetric
    /// (exterior power) splitting therefore needs a signed scalar.
    #[inline]
    fn negate(self) -> Self {
        Self::zero() - self
    }
}

macro_rules! impl_scalar {
    ($($t:ty => $real:ty),* $(,)?) => {
        $(
            impl Scalar for $t {
                type Real = $real;

                #[inline]
                fn to_real(self) -> $real {
                    self as $real
                }
            }
        )*
    };
}

impl_scalar!(
    f32 => f32,
    f64 => f64,
    i32 => f64,
    i64 => f64,
    u32 => f64,
    u64 => f64,
);

impl Scalar for Complex32 {
    type Real = f32;

    #[inline]
    fn to_real(self) -> f32 {
        self.re
    }
}

impl Scalar for Complex64 {
    type Real = f64;

    #[inline]
    fn to_real(self) -> f64 {
        self.re
    }
}

/// Sum `values` under the scalar's addition.
#[inline]
pub(crate) fn sum<T: Scalar>(values: impl IntoIterator<Item = T>) -> T {
    values.into_iter().fold(T::zero(), |acc, v| acc + v)
}
