//! Eval-cache node.

use std::cell::OnceCell;

use tracing::trace;

use super::{free_concept, impl_expression_ops, Expression};
use crate::array::{ComponentArray, ComponentArrayMut, MemoryRange};
use crate::index::{row_major_offset, AbstractIndex, DimIndex, MultiIndex};
use crate::tensor::MemberTensor;

/// An expression materialized on first access.
///
/// The first component request (or norm) evaluates every component of the
/// operand once into an owned tensor over the free factors; every later
/// request reads that tensor. Since the cache is freshly allocated it never
/// overlaps the operand, so it is filled without an intermediate copy.
///
/// # Example
///
/// ```rust,ignore
/// let product = (a.at(i | j) * b.at(j | k)).eval();
/// let x = product.component(&[0, 0]); // computes all components
/// let y = product.component(&[1, 1]); // served from the cache
/// ```
pub struct Eval<E: Expression> {
    operand: E,
    dims: Vec<usize>,
    cache: OnceCell<MemberTensor<E::Scalar>>,
}

impl<E: Expression> Eval<E> {
    pub(crate) fn new(operand: E) -> Self {
        Self {
            dims: operand.free_dimensions(),
            operand,
            cache: OnceCell::new(),
        }
    }

    /// The materialized tensor, computing it if needed.
    ///
    /// Its concept is the single free factor, or the tensor product of the
    /// free factors in order.
    pub fn value(&self) -> &MemberTensor<E::Scalar> {
        self.cache.get_or_init(|| self.materialize())
    }

    pub fn is_cached(&self) -> bool {
        self.cache.get().is_some()
    }

    pub fn into_value(mut self) -> MemberTensor<E::Scalar> {
        match self.cache.take() {
            Some(value) => value,
            None => self.materialize(),
        }
    }

    fn materialize(&self) -> MemberTensor<E::Scalar> {
        let concept = free_concept(self.operand.free_indices());
        trace!(concept = %concept, dimension = concept.dimension(), "materializing eval cache");
        let mut tensor = MemberTensor::zeros(concept);
        let array = tensor.array_mut();
        let mut m = MultiIndex::over(&self.dims);
        while !m.is_at_end() {
            array.set(m.bundle(), self.operand.component(m.values()));
            m.increment();
        }
        tensor
    }
}

impl<E: Expression> Expression for Eval<E> {
    type Scalar = E::Scalar;

    fn free_indices(&self) -> &[DimIndex] {
        self.operand.free_indices()
    }

    fn used_indices(&self) -> &[AbstractIndex] {
        self.operand.used_indices()
    }

    fn component(&self, free: &[usize]) -> E::Scalar {
        self.value().array().get(row_major_offset(free, &self.dims))
    }

    /// Once cached, the operand's memory is no longer read.
    fn uses_memory(&self, range: &MemoryRange) -> bool {
        !self.is_cached() && self.operand.uses_memory(range)
    }
}

impl_expression_ops!([E: Expression] Eval<E>);
