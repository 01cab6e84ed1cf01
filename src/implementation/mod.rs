//! Procedural tensors built from the structure of a concept.
//!
//! - [`inner_product`]: the standard inner product on any Euclidean concept
//! - [`direct_sum`]: summand offsets, summand views, block-diagonal 2-tensors

pub mod direct_sum;
pub mod inner_product;

pub use direct_sum::{component_for_offset, direct_sum_of_2tensors, offset_for_component};
pub use inner_product::inner_product;
