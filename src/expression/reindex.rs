//! Symbol substitution.

use super::{impl_expression_ops, Expression};
use crate::array::MemoryRange;
use crate::error::{Result, TenhError};
use crate::index::{first_duplicate, AbstractIndex, DimIndex, IndexList};

/// An expression with its index symbols renamed.
///
/// Components are unchanged; only the names free indices are matched by
/// (in contraction, addition and assignment) differ.
pub struct Reindex<E: Expression> {
    operand: E,
    free: Vec<DimIndex>,
    used: Vec<AbstractIndex>,
}

impl<E: Expression> Reindex<E> {
    pub(crate) fn new(operand: E, from: IndexList, to: IndexList) -> Result<Self> {
        let (from, to) = (from.as_slice(), to.as_slice());
        if from.len() != to.len() {
            return Err(TenhError::LengthMismatch {
                left: from.len(),
                right: to.len(),
            });
        }
        if let Some(repeated) = first_duplicate(from).or_else(|| first_duplicate(to)) {
            return Err(TenhError::DuplicateFreeIndex(repeated));
        }

        let map = |s: AbstractIndex| from.iter().position(|&f| f == s).map_or(s, |n| to[n]);

        let free: Vec<DimIndex> = operand
            .free_indices()
            .iter()
            .map(|d| DimIndex::new(map(d.symbol), d.factor.clone()))
            .collect();
        let symbols: Vec<AbstractIndex> = free.iter().map(|d| d.symbol).collect();
        if let Some(repeated) = first_duplicate(&symbols) {
            return Err(TenhError::DuplicateFreeIndex(repeated));
        }

        // summed symbols only need to stay distinct from everything else
        let mut used: Vec<AbstractIndex> = Vec::with_capacity(operand.used_indices().len());
        for &u in operand.used_indices() {
            let renamed = map(u);
            if symbols.contains(&renamed) || used.contains(&renamed) {
                used.push(AbstractIndex::fresh());
            } else {
                used.push(renamed);
            }
        }

        Ok(Self {
            operand,
            free,
            used,
        })
    }
}

impl<E: Expression> Expression for Reindex<E> {
    type Scalar = E::Scalar;

    fn free_indices(&self) -> &[DimIndex] {
        &self.free
    }

    fn used_indices(&self) -> &[AbstractIndex] {
        &self.used
    }

    #[inline]
    fn component(&self, free: &[usize]) -> E::Scalar {
        self.operand.component(free)
    }

    fn uses_memory(&self, range: &MemoryRange) -> bool {
        self.operand.uses_memory(range)
    }
}

impl_expression_ops!([E: Expression] Reindex<E>);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conceptual::{Concept, Field};
    use crate::tensor::MemberTensor;

    #[test]
    fn test_reindex_renames_free_and_used() {
        let x = Concept::standard(Field::Real, 2, "X");
        let a = MemberTensor::from_components(
            Concept::tensor_product(vec![x.clone(), x.dual()]),
            vec![1, 2, 3, 4],
        )
        .unwrap();
        let (i, j, k, l) = (
            AbstractIndex::new('i'),
            AbstractIndex::new('j'),
            AbstractIndex::new('k'),
            AbstractIndex::new('l'),
        );
        let product = a.at(i | j) * a.at(j | k);
        // k -> j collides with the summed j, which gets a fresh name
        let renamed = product.reindexed(i | k, l | j).unwrap();
        assert_eq!(renamed.free_symbols(), vec![l, j]);
        assert_eq!(renamed.used_indices().len(), 1);
        assert!(renamed.used_indices()[0].is_fresh());
        assert_eq!(renamed.component(&[1, 0]), 3 * 1 + 4 * 3);
    }

    #[test]
    fn test_reindex_swap() {
        let x = Concept::standard(Field::Real, 2, "X");
        let a = MemberTensor::<f64>::zeros(Concept::tensor_product(vec![x.clone(), x.dual()]));
        let (i, j) = (AbstractIndex::new('i'), AbstractIndex::new('j'));
        let swapped = a.at(i | j).reindexed(i | j, j | i).unwrap();
        assert_eq!(swapped.free_symbols(), vec![j, i]);
    }

    #[test]
    fn test_reindex_errors() {
        let x = Concept::standard(Field::Real, 2, "X");
        let a = MemberTensor::<f64>::zeros(Concept::tensor_product(vec![x.clone(), x.dual()]));
        let (i, j, k) = (AbstractIndex::new('i'), AbstractIndex::new('j'), AbstractIndex::new('k'));
        assert!(matches!(
            a.at(i | j).reindexed(i | j, k),
            Err(TenhError::LengthMismatch { left: 2, right: 1 })
        ));
        assert!(matches!(
            a.at(i | j).reindexed(i, j),
            Err(TenhError::DuplicateFreeIndex(s)) if s == j
        ));
    }
}
