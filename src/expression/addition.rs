//! Addition and subtraction nodes.

use super::{align_free_indices, impl_expression_ops, Expression};
use crate::array::MemoryRange;
use crate::error::Result;
use crate::index::{AbstractIndex, DimIndex, IndexValues};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Add,
    Subtract,
}

/// `l + r` or `l - r`.
///
/// Both operands must have the same free symbols over the same factors; the
/// order may differ, in which case the right operand is matched by symbol.
/// The result keeps the left operand's order.
pub struct Addition<L: Expression, R: Expression<Scalar = L::Scalar>> {
    left: L,
    right: R,
    operation: Operation,
    used: Vec<AbstractIndex>,
    right_positions: Vec<usize>,
}

impl<L: Expression, R: Expression<Scalar = L::Scalar>> Addition<L, R> {
    pub(crate) fn sum(left: L, right: R) -> Result<Self> {
        Self::new(left, right, Operation::Add)
    }

    pub(crate) fn difference(left: L, right: R) -> Result<Self> {
        Self::new(left, right, Operation::Subtract)
    }

    fn new(left: L, right: R, operation: Operation) -> Result<Self> {
        let right_positions = align_free_indices(left.free_indices(), right.free_indices())?;
        let mut used = left.used_indices().to_vec();
        for u in right.used_indices() {
            if !used.contains(u) {
                used.push(*u);
            }
        }
        Ok(Self {
            left,
            right,
            operation,
            used,
            right_positions,
        })
    }

    pub fn is_subtraction(&self) -> bool {
        self.operation == Operation::Subtract
    }
}

impl<L: Expression, R: Expression<Scalar = L::Scalar>> Expression for Addition<L, R> {
    type Scalar = L::Scalar;

    fn free_indices(&self) -> &[DimIndex] {
        self.left.free_indices()
    }

    fn used_indices(&self) -> &[AbstractIndex] {
        &self.used
    }

    fn component(&self, free: &[usize]) -> L::Scalar {
        let right_values: IndexValues = self.right_positions.iter().map(|&p| free[p]).collect();
        let l = self.left.component(free);
        let r = self.right.component(&right_values);
        match self.operation {
            Operation::Add => l + r,
            Operation::Subtract => l - r,
        }
    }

    fn uses_memory(&self, range: &MemoryRange) -> bool {
        self.left.uses_memory(range) || self.right.uses_memory(range)
    }
}

impl_expression_ops!([L: Expression, R: Expression<Scalar = L::Scalar>] Addition<L, R>);
