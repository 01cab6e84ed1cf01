//! Row-major multi-indices.

use smallvec::{smallvec, SmallVec};

use super::ComponentIndex;

/// Component values of a multi-index, inline up to rank 6.
pub type IndexValues = SmallVec<[usize; 6]>;

/// Flat offset of `values` in a row-major array with the given dimensions
/// (the last position varies fastest).
pub fn row_major_offset(values: &[usize], dims: &[usize]) -> usize {
    debug_assert_eq!(values.len(), dims.len());
    values
        .iter()
        .zip(dims)
        .fold(0, |acc, (&value, &dim)| acc * dim + value)
}

/// Inverse of [`row_major_offset`].
pub fn row_major_split(flat: usize, dims: &[usize]) -> IndexValues {
    let mut values = smallvec![0; dims.len()];
    row_major_split_into(flat, dims, &mut values);
    values
}

/// [`row_major_split`] into a caller-provided buffer of length `dims.len()`.
pub fn row_major_split_into(mut flat: usize, dims: &[usize], values: &mut [usize]) {
    debug_assert_eq!(values.len(), dims.len());
    for (value, &dim) in values.iter_mut().zip(dims).rev() {
        if dim == 0 {
            continue;
        }
        *value = flat % dim;
        flat /= dim;
    }
}

/// A tuple of component values, one per position, iterated row-major.
///
/// A multi-index over an empty dimension list has exactly one value (the
/// empty tuple); one with any zero dimension has none.
///
/// ```rust,ignore
/// let mut m = MultiIndex::new(vec![2, 3]);
/// while !m.is_at_end() {
///     println!("{:?}", m.values());
///     m.increment();
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiIndex {
    values: IndexValues,
    dims: IndexValues,
    at_end: bool,
}

impl MultiIndex {
    pub fn new(dims: Vec<usize>) -> Self {
        Self::over(&dims)
    }

    /// Multi-index over `dims`, starting at all zeros.
    ///
    /// Does not touch the heap for up to six positions.
    pub fn over(dims: &[usize]) -> Self {
        Self {
            values: smallvec![0; dims.len()],
            dims: IndexValues::from_slice(dims),
            at_end: dims.contains(&0),
        }
    }

    /// Multi-index at the given flat row-major offset.
    pub fn from_flat(flat: usize, dims: Vec<usize>) -> Self {
        let total: usize = dims.iter().product();
        Self {
            values: row_major_split(flat, &dims),
            at_end: flat >= total,
            dims: IndexValues::from_vec(dims),
        }
    }

    /// Compose range-checked component indices, one per position.
    ///
    /// A component stepped onto its end leaves the multi-index at its end.
    pub fn from_components(components: &[ComponentIndex]) -> Self {
        Self {
            values: components.iter().map(ComponentIndex::value).collect(),
            dims: components.iter().map(ComponentIndex::dimension).collect(),
            at_end: components.iter().any(ComponentIndex::is_at_end),
        }
    }

    #[inline]
    pub fn values(&self) -> &[usize] {
        &self.values
    }

    #[inline]
    pub fn dimensions(&self) -> &[usize] {
        &self.dims
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.dims.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dims.is_empty()
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.at_end
    }

    pub fn component(&self, position: usize) -> ComponentIndex {
        ComponentIndex::new_unchecked(self.values[position], self.dims[position])
    }

    pub fn reset(&mut self) {
        self.values.iter_mut().for_each(|v| *v = 0);
        self.at_end = self.dims.contains(&0);
    }

    /// Component indices of every position, the inverse of [`MultiIndex::from_components`].
    pub fn components(&self) -> impl Iterator<Item = ComponentIndex> + '_ {
        (0..self.len()).map(|position| self.component(position))
    }

    /// Advance to the next value; the last position varies fastest.
    pub fn increment(&mut self) {
        if self.at_end {
            return;
        }
        for (value, &dim) in self.values.iter_mut().zip(&self.dims).rev() {
            *value += 1;
            if *value < dim {
                return;
            }
            *value = 0;
        }
        self.at_end = true;
    }

    /// Flat row-major offset of the current value.
    pub fn bundle(&self) -> usize {
        row_major_offset(&self.values, &self.dims)
    }

    /// Total number of values this multi-index iterates over.
    pub fn count(&self) -> usize {
        self.dims.iter().product()
    }
}
