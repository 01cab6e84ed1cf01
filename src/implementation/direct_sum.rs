//! Direct sums: summand offsets, summand views and block-diagonal 2-tensors.
//!
//! Components of a tensor over `A ⊕ B ⊕ ...` are the components of the
//! summands laid end to end, so summand `n` starts at the sum of the
//! dimensions before it.

use tracing::debug;

use crate::algebra::Scalar;
use crate::array::{
    CheckPointer, ComponentArray, ComponentArrayMut, ComponentGenerator, SubArray, SubArrayMut,
};
use crate::conceptual::{Concept, Sign};
use crate::error::{Result, TenhError};
use crate::tensor::{ProceduralTensor, Tensor};

/// Flat offset of summand `n`'s first component.
pub fn offset_for_component(summands: &[Concept], n: usize) -> Result<usize> {
    if n >= summands.len() {
        return Err(TenhError::AttemptedAccessPastListEnd {
            index: n,
            len: summands.len(),
        });
    }
    Ok(summands[..n].iter().map(Concept::dimension).sum())
}

/// The summand holding flat component `offset`, and the offset within it.
///
/// # Panics
///
/// Panics if `summands` is empty or `offset` is past the total dimension.
pub fn component_for_offset(summands: &[Concept], offset: usize) -> (usize, usize) {
    assert!(!summands.is_empty(), "Direct sum has no summands");
    let mut local = offset;
    for (n, summand) in summands.iter().enumerate() {
        let dim = summand.dimension();
        if local < dim {
            return (n, local);
        }
        local -= dim;
    }
    panic!(
        "Offset {} exceeds direct sum dimension {}",
        offset,
        offset - local
    );
}

impl<T: Scalar, A: ComponentArray<T>> Tensor<T, A> {
    /// Summand `n` of a direct-sum tensor, viewing this tensor's components.
    ///
    /// Stored tensors give views of their memory; procedural tensors give
    /// procedural views.
    pub fn el(&self, n: usize) -> Result<Tensor<T, SubArray<'_, T, A>>> {
        let (summand, offset) = summand_at(self.concept(), n)?;
        let len = summand.dimension();
        Tensor::from_array(summand, SubArray::new(self.array(), offset, len), CheckPointer::Check)
    }
}

impl<T: Scalar, A: ComponentArrayMut<T>> Tensor<T, A> {
    /// Writable summand `n` of a direct-sum tensor.
    pub fn el_mut(&mut self, n: usize) -> Result<Tensor<T, SubArrayMut<'_, T, A>>> {
        let (summand, offset) = summand_at(self.concept(), n)?;
        let len = summand.dimension();
        Tensor::from_array(
            summand,
            SubArrayMut::new(self.array_mut(), offset, len),
            CheckPointer::Check,
        )
    }
}

fn summand_at(concept: &Concept, n: usize) -> Result<(Concept, usize)> {
    let summands = concept
        .summands()
        .ok_or_else(|| TenhError::NotADirectSum(concept.to_string()))?;
    let offset = offset_for_component(summands, n)?;
    Ok((summands[n].clone(), offset))
}

/// Block-diagonal 2-tensor over `(⊕ rows) ⊗ (⊕ cols)`.
///
/// Block `n` occupies rows of summand `n` and columns of summand `n`;
/// everything off the block diagonal is zero. Each block must have exactly
/// two split factors (a tensor product, symmetric or exterior square, or a
/// diagonal 2-tensor); its components are read through its own index map.
pub fn direct_sum_of_2tensors<T: Scalar>(
    blocks: Vec<ProceduralTensor<T>>,
) -> Result<ProceduralTensor<T>> {
    let mut rows = Vec::with_capacity(blocks.len());
    let mut cols = Vec::with_capacity(blocks.len());
    for block in &blocks {
        match block.concept().split_factors().as_deref() {
            Some([row, col]) => {
                rows.push(row.clone());
                cols.push(col.clone());
            }
            _ => return Err(TenhError::NotA2Tensor(block.concept().to_string())),
        }
    }

    let row_sum = Concept::direct_sum(rows.clone());
    let col_sum = Concept::direct_sum(cols.clone());
    let col_dim = col_sum.dimension();
    let concept = Concept::tensor_product(vec![row_sum, col_sum]);
    debug!(blocks = blocks.len(), concept = %concept, "direct sum of 2-tensors");

    let id = format!("direct_sum_of_2tensors({})", concept);
    let generator = ComponentGenerator::new(id, concept.dimension(), move |flat| {
        let (n, r) = component_for_offset(&rows, flat / col_dim);
        let (m, c) = component_for_offset(&cols, flat % col_dim);
        if n != m {
            return T::zero();
        }
        let block = &blocks[n];
        match block.concept().bundle_index(&[r, c]) {
            Some((p, Sign::Positive)) => block.component(p),
            Some((p, Sign::Negative)) => block.component(p).negate(),
            None => T::zero(),
        }
    });
    ProceduralTensor::procedural(concept, generator)
}
