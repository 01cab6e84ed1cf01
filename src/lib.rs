//! # tenh
//!
//! Typed tensor-algebra expressions in Einstein notation.
//!
//! ## Features
//!
//! - **Described spaces**: vector spaces with a field, dimension, basis and
//!   duality, combined into tensor products, tensor/symmetric/exterior powers,
//!   direct sums and diagonal 2-tensors
//! - **Index expressions**: `a(i|j) * b(j|k)` contracts the shared index,
//!   checking that every summation pairs a space with its dual
//! - **Bundling and splitting**: merge several indices into one over a
//!   composite space, or expand one into its factors
//! - **Lazy evaluation**: nothing is computed until components are requested,
//!   with an explicit [`Eval`] cache
//! - **Aliasing-safe assignment**: `t.at_mut(i | j).assign(expr)` is correct
//!   even when `expr` reads `t`; `.no_alias()` skips the temporary
//! - **Procedural tensors**: components computed on demand (zero, basis
//!   vectors, identities, inner products, block-diagonal direct sums)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tenh::{AbstractIndex, Concept, Expression, Field, MemberTensor};
//!
//! let x = Concept::standard(Field::Real, 2, "X");
//! let endo = Concept::tensor_product(vec![x.clone(), x.dual()]);
//! let a = MemberTensor::from_components(endo.clone(), vec![1.0, 2.0, 3.0, 4.0])?;
//! let b = MemberTensor::from_components(endo.clone(), vec![0.0, 1.0, 1.0, 0.0])?;
//!
//! // C(i|k) = Σ_j A(i|j) B(j|k)
//! let (i, j, k) = (AbstractIndex::new('i'), AbstractIndex::new('j'), AbstractIndex::new('k'));
//! let mut c = MemberTensor::zeros(endo);
//! c.at_mut(i | k).assign(a.at(i | j) * b.at(j | k))?;
//!
//! // Trace
//! let trace: f64 = a.at(i | i).to_scalar()?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         User API                            │
//! │   t.at(i | j) → Indexed        t.at_mut(i | j).assign(e)    │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Expression tree                          │
//! │   Multiplication, Addition, ScalarMultiplication,           │
//! │   IndexBundle, IndexSplit, Reindex, Eval                    │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │             Tensor<T, A>: Concept + ComponentArray          │
//! │   member / preallocated / shared / procedural backings      │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod algebra;
pub mod array;
pub mod basic;
pub mod conceptual;
pub mod error;
pub mod expression;
pub mod implementation;
pub mod index;
pub mod tensor;

// Re-exports
pub use algebra::{Complex32, Complex64, Scalar};
pub use array::{CheckPointer, ComponentArray, ComponentArrayMut, ComponentGenerator};
pub use basic::{Operator, Vector};
pub use conceptual::{BasedVectorSpace, Basis, Concept, Field, VectorSpace};
pub use error::{Result, TenhError};
pub use expression::{Eval, Expression};
pub use implementation::{
    component_for_offset, direct_sum_of_2tensors, inner_product, offset_for_component,
};
pub use index::{AbstractIndex, ComponentIndex, DimIndex, IndexList, MultiIndex, RangeCheck};
pub use tensor::{
    ConstPreallocatedTensor, MemberTensor, PreallocatedTensor, ProceduralTensor, SharedTensor,
    Tensor,
};
