//! Vectors and linear operators over owned storage.
//!
//! Thin wrappers over [`MemberTensor`] for the common 1- and 2-index cases.
//! An [`Operator`] from `X` to `Y` is a tensor over `Y ⊗ X*`, so applying it
//! is the contraction `A(i|j) v(j)`.
//!
//! # Example
//!
//! ```rust,ignore
//! use tenh::{Concept, Field, Operator, Vector};
//!
//! let x = Concept::standard(Field::Real, 2, "X");
//! let a = Operator::from_components(x.clone(), x.clone(), vec![0.0, 1.0, 1.0, 0.0])?;
//! let v = Vector::from_components(x, vec![3.0, 4.0])?;
//! assert_eq!(a.apply(&v)?.as_tensor().to_vec(), vec![4.0, 3.0]);
//! ```

use std::fmt;

use crate::algebra::Scalar;
use crate::array::MemberArray;
use crate::conceptual::Concept;
use crate::error::{Result, TenhError};
use crate::expression::{Expression, Indexed};
use crate::index::AbstractIndex;
use crate::tensor::MemberTensor;

/// A vector in a single space.
#[derive(Clone, Debug)]
pub struct Vector<T: Scalar> {
    tensor: MemberTensor<T>,
}

impl<T: Scalar> Vector<T> {
    /// The zero vector of `space`.
    pub fn new(space: Concept) -> Self {
        Self {
            tensor: MemberTensor::zeros(space),
        }
    }

    pub fn from_components(space: Concept, components: Vec<T>) -> Result<Self> {
        Ok(Self {
            tensor: MemberTensor::from_components(space, components)?,
        })
    }

    pub fn space(&self) -> &Concept {
        self.tensor.concept()
    }

    pub fn as_tensor(&self) -> &MemberTensor<T> {
        &self.tensor
    }

    pub fn into_tensor(self) -> MemberTensor<T> {
        self.tensor
    }

    pub fn at(&self, index: AbstractIndex) -> Indexed<'_, T, MemberArray<T>> {
        self.tensor.at(index)
    }
}

impl<T: Scalar> fmt::Display for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tensor)
    }
}

/// A linear map `domain → codomain`, stored as a tensor over `codomain ⊗ domain*`.
#[derive(Clone, Debug)]
pub struct Operator<T: Scalar> {
    domain: Concept,
    codomain: Concept,
    tensor: MemberTensor<T>,
}

impl<T: Scalar> Operator<T> {
    /// The zero operator.
    pub fn new(domain: Concept, codomain: Concept) -> Self {
        let concept = Self::concept_of(&domain, &codomain);
        Self {
            domain,
            codomain,
            tensor: MemberTensor::zeros(concept),
        }
    }

    /// Row-major components, one row per codomain component.
    pub fn from_components(domain: Concept, codomain: Concept, components: Vec<T>) -> Result<Self> {
        let concept = Self::concept_of(&domain, &codomain);
        Ok(Self {
            domain,
            codomain,
            tensor: MemberTensor::from_components(concept, components)?,
        })
    }

    fn concept_of(domain: &Concept, codomain: &Concept) -> Concept {
        Concept::tensor_product(vec![codomain.clone(), domain.dual()])
    }

    pub fn domain(&self) -> &Concept {
        &self.domain
    }

    pub fn codomain(&self) -> &Concept {
        &self.codomain
    }

    pub fn as_tensor(&self) -> &MemberTensor<T> {
        &self.tensor
    }

    pub fn at(&self, row: AbstractIndex, col: AbstractIndex) -> Indexed<'_, T, MemberArray<T>> {
        self.tensor.at(row | col)
    }

    /// Overwrite this operator with a 2-index expression.
    ///
    /// The expression's first free index becomes the row (codomain) index and
    /// its second the column index, whatever their symbols.
    pub fn assign_from<E: Expression<Scalar = T>>(&mut self, expr: E) -> Result<()> {
        let symbols = expr.free_symbols();
        if symbols.len() != 2 {
            return Err(TenhError::LengthMustBeExactly {
                expected: 2,
                actual: symbols.len(),
            });
        }
        let (row, col) = (AbstractIndex::fresh(), AbstractIndex::fresh());
        let renamed = expr.reindexed(symbols, row | col)?;
        self.tensor.at_mut(row | col).assign(renamed)
    }

    /// `A(i|j) v(j)`.
    pub fn apply(&self, v: &Vector<T>) -> Result<Vector<T>> {
        let (i, j) = (AbstractIndex::fresh(), AbstractIndex::fresh());
        let mut result = Vector::new(self.codomain.clone());
        let image = self.at(i, j).try_mul(v.at(j))?;
        result.tensor.at_mut(i).assign(image)?;
        Ok(result)
    }
}

impl<T: Scalar> fmt::Display for Operator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tensor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conceptual::Field;

    fn x(n: usize) -> Concept {
        Concept::standard(Field::Real, n, "X")
    }

    #[test]
    fn test_apply() {
        let a = Operator::from_components(x(3), x(2), vec![1, 0, 2, 0, 1, -1]).unwrap();
        let v = Vector::from_components(x(3), vec![1, 2, 3]).unwrap();
        let w = a.apply(&v).unwrap();
        assert_eq!(w.space(), &x(2));
        assert_eq!(w.as_tensor().to_vec(), vec![7, -1]);
    }

    #[test]
    fn test_apply_wrong_space() {
        let a = Operator::<f64>::new(x(3), x(2));
        let v = Vector::new(Concept::standard(Field::Real, 3, "Y"));
        assert!(matches!(a.apply(&v), Err(TenhError::NotNaturalPairing { .. })));
    }

    #[test]
    fn test_assign_from_product() {
        let a = Operator::from_components(x(2), x(2), vec![1, 1, 0, 1]).unwrap();
        let b = Operator::from_components(x(2), x(2), vec![1, 0, 2, 1]).unwrap();
        let (i, j, k) = (AbstractIndex::new('i'), AbstractIndex::new('j'), AbstractIndex::new('k'));
        let mut c = Operator::new(x(2), x(2));
        c.assign_from(a.at(i, j) * b.at(j, k)).unwrap();
        assert_eq!(c.as_tensor().to_vec(), vec![3, 1, 2, 1]);
    }

    #[test]
    fn test_assign_from_wrong_rank() {
        let v = Vector::<f64>::new(x(2));
        let mut c = Operator::new(x(2), x(2));
        assert!(matches!(
            c.assign_from(v.at(AbstractIndex::new('i'))),
            Err(TenhError::LengthMustBeExactly {
                expected: 2,
                actual: 1
            })
        ));
    }
}
