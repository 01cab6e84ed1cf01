//! Index bundling: several free indices merged into one.

use smallvec::smallvec;

use super::{impl_expression_ops, Expression};
use crate::array::MemoryRange;
use crate::conceptual::Concept;
use crate::error::{Result, TenhError};
use crate::index::{
    first_duplicate, row_major_split, AbstractIndex, DimIndex, IndexList, IndexValues,
};

/// How a component of the bundled index maps back to the operand's indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    /// Tensor products: row-major over the bundled dimensions.
    RowMajor,
    /// Symmetric/exterior powers and diagonal 2-tensors: the canonical
    /// multi-index stored at that component.
    Canonical,
}

fn describe(factors: &[Concept]) -> String {
    factors
        .iter()
        .map(Concept::to_string)
        .collect::<Vec<_>>()
        .join(" ⊗ ")
}

/// `e.bundle(i | j, target, p)`: the free indices `i`, `j` replaced by one
/// index `p` over `target`, appended after the remaining free indices.
pub struct IndexBundle<E: Expression> {
    operand: E,
    free: Vec<DimIndex>,
    kept: Vec<usize>,
    bundled: Vec<usize>,
    bundled_dims: Vec<usize>,
    target: Concept,
    layout: Layout,
}

impl<E: Expression> IndexBundle<E> {
    pub(crate) fn new(
        operand: E,
        indices: IndexList,
        target: Concept,
        result: AbstractIndex,
    ) -> Result<Self> {
        let symbols = indices.as_slice();
        if symbols.len() < 2 {
            return Err(TenhError::CanOnlyBundleAtLeastTwo(symbols.len()));
        }
        if let Some(repeated) = first_duplicate(symbols) {
            return Err(TenhError::BundleIndicesMustBeDistinct(repeated));
        }

        let operand_free = operand.free_indices();
        let bundled = symbols
            .iter()
            .map(|&s| {
                operand_free
                    .iter()
                    .position(|d| d.symbol == s)
                    .ok_or(TenhError::IndexNotFree(s))
            })
            .collect::<Result<Vec<_>>>()?;
        if operand_free.iter().any(|d| d.symbol == result)
            || operand.used_indices().contains(&result)
        {
            return Err(TenhError::BundleAndResultingMustBeDistinct(result));
        }

        let factors: Vec<Concept> = bundled.iter().map(|&p| operand_free[p].factor.clone()).collect();
        let (expected, actual, layout) = match &target {
            Concept::TensorProduct(_) | Concept::TensorPower { .. } => (
                target.flattened_factors(),
                factors.iter().flat_map(Concept::flattened_factors).collect(),
                Layout::RowMajor,
            ),
            Concept::SymmetricPower { .. }
            | Concept::ExteriorPower { .. }
            | Concept::Diagonal2Tensor(..) => (
                target.split_factors().unwrap_or_default(),
                factors.clone(),
                Layout::Canonical,
            ),
            Concept::Space(_) | Concept::DirectSum(_) => {
                return Err(TenhError::NotBundleTarget(target.to_string()))
            }
        };
        if expected != actual {
            return Err(TenhError::FactorMismatch {
                index: result,
                left: describe(&expected),
                right: describe(&actual),
            });
        }

        let kept: Vec<usize> = (0..operand_free.len()).filter(|p| !bundled.contains(p)).collect();
        let mut free: Vec<DimIndex> = kept.iter().map(|&p| operand_free[p].clone()).collect();
        free.push(DimIndex::new(result, target.clone()));

        Ok(Self {
            bundled_dims: factors.iter().map(Concept::dimension).collect(),
            operand,
            free,
            kept,
            bundled,
            target,
            layout,
        })
    }

    pub fn target(&self) -> &Concept {
        &self.target
    }
}

impl<E: Expression> Expression for IndexBundle<E> {
    type Scalar = E::Scalar;

    fn free_indices(&self) -> &[DimIndex] {
        &self.free
    }

    fn used_indices(&self) -> &[AbstractIndex] {
        self.operand.used_indices()
    }

    fn component(&self, free: &[usize]) -> E::Scalar {
        let value = free[self.kept.len()];
        let parts = match self.layout {
            Layout::RowMajor => row_major_split(value, &self.bundled_dims),
            Layout::Canonical => IndexValues::from_vec(self.target.split_index(value)),
        };
        let mut operand_values: IndexValues = smallvec![0; self.kept.len() + self.bundled.len()];
        for (&p, &v) in self.kept.iter().zip(free) {
            operand_values[p] = v;
        }
        for (&p, &v) in self.bundled.iter().zip(&parts) {
            operand_values[p] = v;
        }
        self.operand.component(&operand_values)
    }

    fn uses_memory(&self, range: &MemoryRange) -> bool {
        self.operand.uses_memory(range)
    }
}

impl_expression_ops!([E: Expression] IndexBundle<E>);
