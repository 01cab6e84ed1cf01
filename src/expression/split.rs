//! Index splitting: one free index expanded into one index per factor.

use num_traits::Zero;

use super::{impl_expression_ops, Expression};
use crate::algebra::Scalar;
use crate::array::MemoryRange;
use crate::conceptual::{Concept, Sign};
use crate::error::{Result, TenhError};
use crate::index::{first_duplicate, AbstractIndex, DimIndex, IndexList, IndexValues};

/// `e.split(p, i | j)`: the free index `p` replaced in place by `i`, `j`.
///
/// Components come from the operand through the source concept's index map:
/// symmetric sources read the sorted representative, exterior sources pick
/// up the permutation sign and vanish on repeated values, and diagonal
/// 2-tensors vanish off the diagonal.
pub struct IndexSplit<E: Expression> {
    operand: E,
    free: Vec<DimIndex>,
    position: usize,
    count: usize,
    source: Concept,
}

impl<E: Expression> IndexSplit<E> {
    pub(crate) fn new(operand: E, source: AbstractIndex, indices: IndexList) -> Result<Self> {
        let operand_free = operand.free_indices();
        let position = operand_free
            .iter()
            .position(|d| d.symbol == source)
            .ok_or(TenhError::IndexNotFree(source))?;
        let concept = operand_free[position].factor.clone();
        let factors = concept
            .split_factors()
            .ok_or_else(|| TenhError::NotSplittable(concept.to_string()))?;

        let symbols = indices.as_slice();
        if symbols.len() != factors.len() {
            return Err(TenhError::LengthMustBeExactly {
                expected: factors.len(),
                actual: symbols.len(),
            });
        }
        if let Some(repeated) = first_duplicate(symbols) {
            return Err(TenhError::DuplicateFreeIndex(repeated));
        }
        if let Some(&clash) = symbols.iter().find(|s| {
            operand_free.iter().any(|d| d.symbol == **s) || operand.used_indices().contains(*s)
        }) {
            return Err(TenhError::SourceAndSplitMustBeDistinct(clash));
        }

        let mut free: Vec<DimIndex> = operand_free[..position].to_vec();
        free.extend(
            symbols
                .iter()
                .zip(factors)
                .map(|(&s, factor)| DimIndex::new(s, factor)),
        );
        free.extend_from_slice(&operand_free[position + 1..]);

        Ok(Self {
            count: symbols.len(),
            operand,
            free,
            position,
            source: concept,
        })
    }

    pub fn source(&self) -> &Concept {
        &self.source
    }
}

impl<E: Expression> Expression for IndexSplit<E> {
    type Scalar = E::Scalar;

    fn free_indices(&self) -> &[DimIndex] {
        &self.free
    }

    fn used_indices(&self) -> &[AbstractIndex] {
        self.operand.used_indices()
    }

    fn component(&self, free: &[usize]) -> E::Scalar {
        let end = self.position + self.count;
        let Some((flat, sign)) = self.source.bundle_index(&free[self.position..end]) else {
            return E::Scalar::zero();
        };
        let mut operand_values = IndexValues::with_capacity(free.len() + 1 - self.count);
        operand_values.extend_from_slice(&free[..self.position]);
        operand_values.push(flat);
        operand_values.extend_from_slice(&free[end..]);
        let value = self.operand.component(&operand_values);
        match sign {
            Sign::Positive => value,
            Sign::Negative => value.negate(),
        }
    }

    fn uses_memory(&self, range: &MemoryRange) -> bool {
        self.operand.uses_memory(range)
    }
}

impl_expression_ops!([E: Expression] IndexSplit<E>);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conceptual::Field;
    use crate::tensor::MemberTensor;

    fn x(n: usize) -> Concept {
        Concept::standard(Field::Real, n, "X")
    }

    #[test]
    fn test_split_tensor_product() {
        let square = Concept::tensor_product(vec![x(2), x(3).dual()]);
        let a = MemberTensor::from_components(square, (0..6).collect()).unwrap();
        let (p, i, j) = (AbstractIndex::new('p'), AbstractIndex::new('i'), AbstractIndex::new('j'));
        let s = a.at(p).split(p, i | j).unwrap();
        assert_eq!(s.free_dimensions(), vec![2, 3]);
        assert_eq!(s.component(&[1, 2]), 5);
    }

    #[test]
    fn test_split_symmetric_reads_representative() {
        let sym = Concept::symmetric_power(2, x(3));
        let s = MemberTensor::from_components(sym, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let (p, i, j) = (AbstractIndex::new('p'), AbstractIndex::new('i'), AbstractIndex::new('j'));
        let full = s.at(p).split(p, i | j).unwrap();
        assert_eq!(full.component(&[2, 1]), 5);
        assert_eq!(full.component(&[1, 2]), 5);
        assert_eq!(full.component(&[0, 0]), 1);
    }

    #[test]
    fn test_split_exterior_is_antisymmetric() {
        let ext = Concept::exterior_power(2, x(3));
        let w = MemberTensor::from_components(ext, vec![1, 2, 3]).unwrap();
        let (p, i, j) = (AbstractIndex::new('p'), AbstractIndex::new('i'), AbstractIndex::new('j'));
        let full = w.at(p).split(p, i | j).unwrap();
        assert_eq!(full.component(&[1, 0]), 1);
        assert_eq!(full.component(&[0, 1]), -1);
        assert_eq!(full.component(&[2, 1]), 3);
        assert_eq!(full.component(&[1, 2]), -3);
        assert_eq!(full.component(&[2, 2]), 0);
    }

    #[test]
    fn test_split_diagonal() {
        let diag = Concept::diagonal_2tensor(x(3), x(3).dual());
        let d = MemberTensor::from_components(diag, vec![4, 5, 6]).unwrap();
        let (p, i, j) = (AbstractIndex::new('p'), AbstractIndex::new('i'), AbstractIndex::new('j'));
        let full = d.at(p).split(p, i | j).unwrap();
        assert_eq!(full.component(&[1, 1]), 5);
        assert_eq!(full.component(&[1, 2]), 0);
    }

    #[test]
    fn test_split_errors() {
        let square = Concept::tensor_product(vec![x(2), x(2).dual()]);
        let a = MemberTensor::<f64>::zeros(square);
        let v = MemberTensor::<f64>::zeros(x(2));
        let (p, i, j) = (AbstractIndex::new('p'), AbstractIndex::new('i'), AbstractIndex::new('j'));
        assert!(matches!(a.at(p).split(i, i | j), Err(TenhError::IndexNotFree(_))));
        assert!(matches!(v.at(p).split(p, i | j), Err(TenhError::NotSplittable(_))));
        assert!(matches!(
            a.at(p).split(p, i | j | AbstractIndex::new('k')),
            Err(TenhError::LengthMustBeExactly { expected: 2, actual: 3 })
        ));
        assert!(matches!(a.at(p).split(p, i | i), Err(TenhError::DuplicateFreeIndex(_))));
        assert!(matches!(
            a.at(p).split(p, i | p),
            Err(TenhError::SourceAndSplitMustBeDistinct(_))
        ));
    }
}
