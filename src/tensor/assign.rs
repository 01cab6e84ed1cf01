//! Assignment of expressions into tensors.

use tracing::{debug, trace};

use super::Tensor;
use crate::algebra::Scalar;
use crate::array::{ComponentArray, ComponentArrayMut};
use crate::error::{Result, TenhError};
use crate::expression::{align_free_indices, Expression};
use crate::index::{first_duplicate, row_major_offset, DimIndex, IndexList, MultiIndex};

/// A tensor indexed for writing, `a(i|j) = ...`.
///
/// [`assign`](Self::assign) evaluates the right-hand side into a temporary
/// before writing, so it is correct even when the expression reads the
/// destination's memory. [`no_alias`](Self::no_alias) skips the temporary.
pub struct IndexedMut<'a, T: Scalar, A: ComponentArrayMut<T>> {
    tensor: &'a mut Tensor<T, A>,
    free: Vec<DimIndex>,
    slot_dims: Vec<usize>,
}

/// Assignment without an intermediate temporary.
///
/// The caller guarantees that the expression does not read the destination's
/// memory. If it does, components may be read after they were overwritten;
/// this is not detected.
pub struct NoAlias<'a, T: Scalar, A: ComponentArrayMut<T>> {
    target: IndexedMut<'a, T, A>,
}

impl<T: Scalar, A: ComponentArrayMut<T>> Tensor<T, A> {
    /// Index this tensor for assignment.
    ///
    /// # Panics
    ///
    /// Panics if the index list is ill-formed; see [`try_at_mut`](Self::try_at_mut).
    pub fn at_mut(&mut self, indices: impl Into<IndexList>) -> IndexedMut<'_, T, A> {
        self.try_at_mut(indices).unwrap_or_else(|e| panic!("{}", e))
    }

    pub fn try_at_mut(&mut self, indices: impl Into<IndexList>) -> Result<IndexedMut<'_, T, A>> {
        IndexedMut::new(self, indices.into())
    }
}

impl<'a, T: Scalar, A: ComponentArrayMut<T>> IndexedMut<'a, T, A> {
    fn new(tensor: &'a mut Tensor<T, A>, indices: IndexList) -> Result<Self> {
        let symbols = indices.as_slice();
        if let Some(repeated) = first_duplicate(symbols) {
            return Err(TenhError::DuplicateFreeIndex(repeated));
        }
        let concept = tensor.concept();
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
        let slot_dims = factors.iter().map(|f| f.dimension()).collect();
        let free = symbols
            .iter()
            .zip(factors)
            .map(|(&s, factor)| DimIndex::new(s, factor))
            .collect();
        Ok(Self {
            tensor,
            free,
            slot_dims,
        })
    }

    pub fn free_indices(&self) -> &[DimIndex] {
        &self.free
    }

    pub fn no_alias(self) -> NoAlias<'a, T, A> {
        NoAlias { target: self }
    }

    /// Evaluate `expr` into a temporary, then copy it into the destination.
    ///
    /// The expression must have the destination's free symbols over the same
    /// factors, in any order.
    pub fn assign<E: Expression<Scalar = T>>(self, expr: E) -> Result<()> {
        let positions = align_free_indices(&self.free, expr.free_indices())?;
        if let Some(range) = self.tensor.array().memory_range() {
            if expr.uses_memory(&range) {
                debug!(array = A::name(), "assignment source aliases destination");
            }
        }
        trace!(dimension = self.tensor.dimension(), "assignment through temporary");

        let mut values = Vec::with_capacity(self.tensor.dimension());
        self.for_each_component(&positions, |offset, expr_values| {
            values.push((offset, expr.component(expr_values)));
        });
        let array = self.tensor.array_mut();
        for (offset, value) in values {
            array.set(offset, value);
        }
        Ok(())
    }

    /// Visit every destination component with its offset and the matching
    /// free-index values of the expression.
    fn for_each_component(&self, positions: &[usize], mut visit: impl FnMut(usize, &[usize])) {
        let mut m = MultiIndex::over(&self.slot_dims);
        let mut expr_values = vec![0; positions.len()];
        while !m.is_at_end() {
            for (value, &p) in expr_values.iter_mut().zip(positions) {
                *value = m.values()[p];
            }
            visit(row_major_offset(m.values(), &self.slot_dims), &expr_values);
            m.increment();
        }
    }
}

impl<T: Scalar, A: ComponentArrayMut<T>> NoAlias<'_, T, A> {
    /// Evaluate `expr` directly into the destination.
    pub fn assign<E: Expression<Scalar = T>>(self, expr: E) -> Result<()> {
        let target = self.target;
        let positions = align_free_indices(&target.free, expr.free_indices())?;
        trace!(dimension = target.tensor.dimension(), "no-alias assignment");

        let mut m = MultiIndex::over(&target.slot_dims);
        let mut expr_values = vec![0; positions.len()];
        let array = target.tensor.array_mut();
        while !m.is_at_end() {
            for (value, &p) in expr_values.iter_mut().zip(&positions) {
                *value = m.values()[p];
            }
            array.set(
                row_major_offset(m.values(), &target.slot_dims),
                expr.component(&expr_values),
            );
            m.increment();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::conceptual::{Concept, Field};
    use crate::expression::Expression;
    use crate::error::TenhError;
    use crate::index::AbstractIndex;
    use crate::tensor::MemberTensor;

    fn square() -> Concept {
        let x = Concept::standard(Field::Real, 2, "X");
        Concept::tensor_product(vec![x.clone(), x.dual()])
    }

    #[test]
    fn test_assign_transposes_by_symbol() {
        let x = Concept::standard(Field::Real, 2, "X");
        let xx = Concept::tensor_product(vec![x.clone(), x]);
        let a = MemberTensor::from_components(xx.clone(), vec![1, 2, 3, 4]).unwrap();
        let mut b = MemberTensor::<i32>::zeros(xx);
        let (i, j) = (AbstractIndex::new('i'), AbstractIndex::new('j'));
        b.at_mut(i | j).assign(a.at(j | i)).unwrap();
        assert_eq!(b.to_vec(), vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_no_alias_assign() {
        let a = MemberTensor::from_components(square(), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let mut b = MemberTensor::<f64>::zeros(square());
        let (i, j) = (AbstractIndex::new('i'), AbstractIndex::new('j'));
        b.at_mut(i | j).no_alias().assign(a.at(i | j).scaled_by(2.0)).unwrap();
        assert_eq!(b.to_vec(), vec![2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn test_assign_errors() {
        let a = MemberTensor::<f64>::zeros(square());
        let mut b = MemberTensor::<f64>::zeros(square());
        let (i, j, k) = (AbstractIndex::new('i'), AbstractIndex::new('j'), AbstractIndex::new('k'));
        assert!(matches!(
            b.try_at_mut(i | i),
            Err(TenhError::DuplicateFreeIndex(_))
        ));
        assert!(matches!(
            b.at_mut(i | k).assign(a.at(i | j)),
            Err(TenhError::OperandsHaveDifferentFreeIndices { .. })
        ));
    }
}
