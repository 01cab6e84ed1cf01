//! Multiplication node: tensor product with contraction over shared symbols.

use num_traits::Zero;
use smallvec::smallvec;

use super::{check_pairing, gather, impl_expression_ops, Expression, Source};
use crate::array::MemoryRange;
use crate::error::{Result, TenhError};
use crate::index::{AbstractIndex, DimIndex, IndexValues, MultiIndex};

/// `l * r`: every symbol free on both sides is summed over its range.
///
/// Free indices of the result are the left's uncontracted free indices
/// followed by the right's.
pub struct Multiplication<L: Expression, R: Expression<Scalar = L::Scalar>> {
    left: L,
    right: R,
    free: Vec<DimIndex>,
    used: Vec<AbstractIndex>,
    summed_dims: Vec<usize>,
    left_sources: Vec<Source>,
    right_sources: Vec<Source>,
}

impl<L: Expression, R: Expression<Scalar = L::Scalar>> Multiplication<L, R> {
    pub(crate) fn new(left: L, right: R) -> Result<Self> {
        for d in left.free_indices() {
            if right.used_indices().contains(&d.symbol) {
                return Err(TenhError::FreeIndexCollidesWithUsed(d.symbol));
            }
        }
        for d in right.free_indices() {
            if left.used_indices().contains(&d.symbol) {
                return Err(TenhError::FreeIndexCollidesWithUsed(d.symbol));
            }
        }
        if let Some(&u) = left
            .used_indices()
            .iter()
            .find(|u| right.used_indices().contains(u))
        {
            return Err(TenhError::IndexUsedMoreThanTwice(u));
        }

        let mut free = Vec::new();
        let mut summed = Vec::new();
        let mut summed_dims = Vec::new();

        let mut left_sources = Vec::with_capacity(left.free_indices().len());
        for d in left.free_indices() {
            match right.free_indices().iter().find(|r| r.symbol == d.symbol) {
                Some(r) => {
                    check_pairing(d.symbol, &d.factor, &r.factor)?;
                    left_sources.push(Source::Summed(summed.len()));
                    summed.push(d.symbol);
                    summed_dims.push(d.dimension());
                }
                None => {
                    left_sources.push(Source::Free(free.len()));
                    free.push(d.clone());
                }
            }
        }

        let mut right_sources = Vec::with_capacity(right.free_indices().len());
        for d in right.free_indices() {
            match summed.iter().position(|&s| s == d.symbol) {
                Some(n) => right_sources.push(Source::Summed(n)),
                None => {
                    right_sources.push(Source::Free(free.len()));
                    free.push(d.clone());
                }
            }
        }

        let mut used = left.used_indices().to_vec();
        used.extend_from_slice(right.used_indices());
        used.extend_from_slice(&summed);

        Ok(Self {
            left,
            right,
            free,
            used,
            summed_dims,
            left_sources,
            right_sources,
        })
    }

    /// Symbols summed by this node (not by its operands).
    pub fn contracted_indices(&self) -> &[AbstractIndex] {
        let own = self.summed_dims.len();
        &self.used[self.used.len() - own..]
    }
}

impl<L: Expression, R: Expression<Scalar = L::Scalar>> Expression for Multiplication<L, R> {
    type Scalar = L::Scalar;

    fn free_indices(&self) -> &[DimIndex] {
        &self.free
    }

    fn used_indices(&self) -> &[AbstractIndex] {
        &self.used
    }

    fn component(&self, free: &[usize]) -> L::Scalar {
        let mut left_values: IndexValues = smallvec![0; self.left_sources.len()];
        let mut right_values: IndexValues = smallvec![0; self.right_sources.len()];
        let mut summed = MultiIndex::over(&self.summed_dims);
        let mut total = L::Scalar::zero();
        while !summed.is_at_end() {
            gather(&self.left_sources, free, summed.values(), &mut left_values);
            gather(&self.right_sources, free, summed.values(), &mut right_values);
            total = total + self.left.component(&left_values) * self.right.component(&right_values);
            summed.increment();
        }
        total
    }

    fn uses_memory(&self, range: &MemoryRange) -> bool {
        self.left.uses_memory(range) || self.right.uses_memory(range)
    }
}

impl_expression_ops!([L: Expression, R: Expression<Scalar = L::Scalar>] Multiplication<L, R>);
