//! Scalar multiplication, division and negation.

use super::{impl_expression_ops, Expression};
use crate::algebra::Scalar;
use crate::array::MemoryRange;
use crate::index::{AbstractIndex, DimIndex};

#[derive(Debug, Clone, Copy)]
enum Operation<T> {
    Multiply(T),
    Divide(T),
    Negate,
}

/// An expression scaled componentwise by a scalar.
pub struct ScalarMultiplication<E: Expression> {
    operand: E,
    operation: Operation<E::Scalar>,
}

impl<E: Expression> ScalarMultiplication<E> {
    pub(crate) fn multiply(operand: E, factor: E::Scalar) -> Self {
        Self {
            operand,
            operation: Operation::Multiply(factor),
        }
    }

    pub(crate) fn divide(operand: E, divisor: E::Scalar) -> Self {
        Self {
            operand,
            operation: Operation::Divide(divisor),
        }
    }

    pub(crate) fn negate(operand: E) -> Self {
        Self {
            operand,
            operation: Operation::Negate,
        }
    }
}

impl<E: Expression> Expression for ScalarMultiplication<E> {
    type Scalar = E::Scalar;

    fn free_indices(&self) -> &[DimIndex] {
        self.operand.free_indices()
    }

    fn used_indices(&self) -> &[AbstractIndex] {
        self.operand.used_indices()
    }

    fn component(&self, free: &[usize]) -> E::Scalar {
        let value = self.operand.component(free);
        match self.operation {
            Operation::Multiply(factor) => value * factor,
            Operation::Divide(divisor) => value / divisor,
            Operation::Negate => value.negate(),
        }
    }

    fn uses_memory(&self, range: &MemoryRange) -> bool {
        self.operand.uses_memory(range)
    }
}

impl_expression_ops!([E: Expression] ScalarMultiplication<E>);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conceptual::{Concept, Field};
    use crate::tensor::MemberTensor;

    #[test]
    fn test_scale_divide_negate() {
        let x = Concept::standard(Field::Real, 3, "X");
        let v = MemberTensor::from_components(x, vec![2.0f64, 4.0, 6.0]).unwrap();
        let i = AbstractIndex::new('i');
        assert_eq!(v.at(i).scaled_by(1.5).component(&[1]), 6.0);
        assert_eq!(v.at(i).divided_by(2.0).component(&[2]), 3.0);
        assert_eq!((-v.at(i)).component(&[0]), -2.0);
        assert_eq!((-v.at(i).scaled_by(2.0)).component(&[0]), -4.0);
    }
}
