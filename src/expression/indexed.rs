//! Expression leaf: an indexed tensor.

use smallvec::smallvec;

use super::{check_pairing, gather, impl_expression_ops, Expression, Source};
use crate::algebra::Scalar;
use crate::array::{ComponentArray, MemoryRange};
use crate::error::{Result, TenhError};
use crate::index::{
    row_major_offset, AbstractIndex, DimIndex, IndexList, IndexValues, MultiIndex,
};
use crate::tensor::Tensor;

/// A tensor indexed by abstract symbols, `a(i|j)`.
///
/// Borrows the tensor, so the tensor outlives every expression built on it.
/// A symbol given twice is summed over (a trace).
pub struct Indexed<'a, T: Scalar, A: ComponentArray<T>> {
    tensor: &'a Tensor<T, A>,
    free: Vec<DimIndex>,
    used: Vec<AbstractIndex>,
    slots: Vec<Source>,
    slot_dims: Vec<usize>,
    summed_dims: Vec<usize>,
}

impl<'a, T: Scalar, A: ComponentArray<T>> Indexed<'a, T, A> {
    pub(crate) fn new(tensor: &'a Tensor<T, A>, indices: IndexList) -> Result<Self> {
        let concept = tensor.concept();
        let symbols = indices.as_slice();
        let factors = match concept.tensor_factors() {
            Some(factors) if factors.len() == symbols.len() => factors,
            _ if symbols.len() == 1 => vec![concept.clone()],
            _ => {
                return Err(TenhError::IndexCountMismatch {
                    concept: concept.to_string(),
                    actual: symbols.len(),
                })
            }
        };

        let mut free = Vec::new();
        let mut used = Vec::new();
        let mut summed_dims = Vec::new();
        let mut slots = Vec::with_capacity(symbols.len());

        for (n, &symbol) in symbols.iter().enumerate() {
            let occurrences: Vec<usize> = symbols
                .iter()
                .enumerate()
                .filter(|&(_, s)| *s == symbol)
                .map(|(m, _)| m)
                .collect();
            match occurrences.as_slice() {
                [_] => {
                    slots.push(Source::Free(free.len()));
                    free.push(DimIndex::new(symbol, factors[n].clone()));
                }
                [first, second] if *first == n => {
                    check_pairing(symbol, &factors[*first], &factors[*second])?;
                    slots.push(Source::Summed(used.len()));
                    used.push(symbol);
                    summed_dims.push(factors[n].dimension());
                }
                [_, _] => {
                    let position = used.iter().position(|&u| u == symbol).unwrap_or_default();
                    slots.push(Source::Summed(position));
                }
                _ => return Err(TenhError::IndexUsedMoreThanTwice(symbol)),
            }
        }

        Ok(Self {
            tensor,
            free,
            used,
            slots,
            slot_dims: factors.iter().map(|f| f.dimension()).collect(),
            summed_dims,
        })
    }

    pub fn tensor(&self) -> &'a Tensor<T, A> {
        self.tensor
    }
}

impl<T: Scalar, A: ComponentArray<T>> Expression for Indexed<'_, T, A> {
    type Scalar = T;

    fn free_indices(&self) -> &[DimIndex] {
        &self.free
    }

    fn used_indices(&self) -> &[AbstractIndex] {
        &self.used
    }

    fn component(&self, free: &[usize]) -> T {
        let mut values: IndexValues = smallvec![0; self.slots.len()];
        if self.summed_dims.is_empty() {
            gather(&self.slots, free, &[], &mut values);
            return self.tensor.component(row_major_offset(&values, &self.slot_dims));
        }

        let mut summed = MultiIndex::over(&self.summed_dims);
        let mut total = T::zero();
        while !summed.is_at_end() {
            gather(&self.slots, free, summed.values(), &mut values);
            total = total + self.tensor.component(row_major_offset(&values, &self.slot_dims));
            summed.increment();
        }
        total
    }

    fn uses_memory(&self, range: &MemoryRange) -> bool {
        self.tensor
            .array()
            .memory_range()
            .map_or(false, |r| r.overlaps(range))
    }
}

impl_expression_ops!(['a, T: Scalar, A: ComponentArray<T>] Indexed<'a, T, A>);
