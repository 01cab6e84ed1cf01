//! Tensors: a concept together with a component array.
//!
//! The [`Tensor`] type supports:
//! - Indexed access `t.at(i | j)` producing an expression leaf
//! - Aliasing-safe and no-alias assignment `t.at_mut(i | j).assign(expr)`
//! - Member, preallocated, shared and procedural backings

mod assign;

use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;

use num_traits::Float;
use tracing::debug;

use crate::algebra::Scalar;
use crate::array::{
    CheckPointer, ComponentArray, ComponentGenerator, ConstPreallocatedArray, MemberArray,
    PreallocatedArray, ProceduralArray, SharedArray,
};
use crate::conceptual::Concept;
use crate::error::{Result, TenhError};
use crate::expression::{Expression, Indexed};
use crate::implementation::inner_product;
use crate::index::{AbstractIndex, IndexList};

pub use assign::{IndexedMut, NoAlias};

/// A tensor in the space described by a [`Concept`].
///
/// Components are stored row-major over the concept's factors (the last
/// factor varies fastest).
///
/// # Type Parameters
///
/// * `T` - The scalar component type (f32, f64, integers, complex)
/// * `A` - The component array backing
///
/// # Example
///
/// ```rust,ignore
/// use tenh::{AbstractIndex, Concept, Field, MemberTensor};
///
/// let x = Concept::standard(Field::Real, 2, "X");
/// let a = MemberTensor::from_components(
///     Concept::tensor_product(vec![x.clone(), x.dual()]),
///     vec![1.0, 2.0, 3.0, 4.0],
/// )?;
/// let (i, j) = (AbstractIndex::new('i'), AbstractIndex::new('j'));
/// let trace: f64 = a.at(i | i).to_scalar()?;
/// assert_eq!(trace, 5.0);
/// ```
#[derive(Clone)]
pub struct Tensor<T: Scalar, A: ComponentArray<T>> {
    concept: Concept,
    array: A,
    _scalar: PhantomData<T>,
}

/// Tensor owning its components.
pub type MemberTensor<T> = Tensor<T, MemberArray<T>>;
/// Tensor writing to caller-owned memory.
pub type PreallocatedTensor<'a, T> = Tensor<T, PreallocatedArray<'a, T>>;
/// Tensor reading caller-owned memory.
pub type ConstPreallocatedTensor<'a, T> = Tensor<T, ConstPreallocatedArray<'a, T>>;
/// Tensor over caller-owned cells that other tensors may view as well.
pub type SharedTensor<'a, T> = Tensor<T, SharedArray<'a, T>>;
/// Tensor whose components are computed on demand.
pub type ProceduralTensor<T> = Tensor<T, ProceduralArray<T>>;

impl<T: Scalar, A: ComponentArray<T>> Tensor<T, A> {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Wrap a component array, checking its length against the concept's
    /// dimension unless `check` is [`CheckPointer::DontCheck`].
    pub fn from_array(concept: Concept, array: A, check: CheckPointer) -> Result<Self> {
        if check == CheckPointer::Check && array.len() != concept.dimension() {
            return Err(TenhError::ComponentCountMismatch {
                expected: concept.dimension(),
                actual: array.len(),
            });
        }
        Ok(Self {
            concept,
            array,
            _scalar: PhantomData,
        })
    }

    // ========================================================================
    // Metadata
    // ========================================================================

    #[inline]
    pub fn concept(&self) -> &Concept {
        &self.concept
    }

    /// Number of components.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.concept.dimension()
    }

    #[inline]
    pub fn array(&self) -> &A {
        &self.array
    }

    #[inline]
    pub(crate) fn array_mut(&mut self) -> &mut A {
        &mut self.array
    }

    /// Bytes of component memory this tensor owns or views (zero for procedural tensors).
    pub fn allocation_size_in_bytes(&self) -> usize {
        match self.array.memory_range() {
            Some(_) => self.dimension() * std::mem::size_of::<T>(),
            None => 0,
        }
    }

    // ========================================================================
    // Data Access
    // ========================================================================

    /// Component at flat (row-major) index `index`.
    #[inline]
    pub fn component(&self, index: usize) -> T {
        self.array.get(index)
    }

    /// Copy all components to a Vec.
    pub fn to_vec(&self) -> Vec<T> {
        (0..self.dimension()).map(|p| self.array.get(p)).collect()
    }

    /// Packed component memory, when the backing can lend it as a slice.
    pub fn as_slice(&self) -> Option<&[T]> {
        self.array.as_slice().map(|s| &s[..self.dimension()])
    }

    /// Packed component memory as raw bytes, `dimension × size_of::<T>()` long.
    ///
    /// This is the layout external row-major routines expect.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        self.as_slice().map(bytemuck::cast_slice::<T, u8>)
    }

    /// Snapshot this tensor as a procedural tensor.
    ///
    /// Procedural tensors share their generator; stored tensors are copied.
    pub fn to_procedural(&self) -> ProceduralTensor<T> {
        Tensor {
            concept: self.concept.clone(),
            array: ProceduralArray::new(self.array.to_generator(self.dimension())),
            _scalar: PhantomData,
        }
    }

    // ========================================================================
    // Indexing
    // ========================================================================

    /// Index this tensor, producing an expression leaf.
    ///
    /// Either one index over the whole concept, or (for tensor products and
    /// powers) one index per factor. A symbol repeated twice is a trace.
    ///
    /// # Panics
    ///
    /// Panics if the index list is ill-formed; see [`try_at`](Self::try_at).
    pub fn at(&self, indices: impl Into<IndexList>) -> Indexed<'_, T, A> {
        self.try_at(indices).unwrap_or_else(|e| panic!("{}", e))
    }

    pub fn try_at(&self, indices: impl Into<IndexList>) -> Result<Indexed<'_, T, A>> {
        Indexed::new(self, indices.into())
    }

    // ========================================================================
    // Norms
    // ========================================================================

    /// Squared norm under the concept's standard inner product.
    ///
    /// Not meaningful for complex scalars.
    pub fn squared_norm(&self) -> Result<T::Real> {
        inner_product::squared_norm_of(&self.concept, |p| self.array.get(p))
    }

    pub fn norm(&self) -> Result<T::Real> {
        self.squared_norm().map(|s| s.sqrt())
    }

    /// Symbols used when printing, one per tensor factor for 2- and 3-factor tensors.
    fn display_indices(&self) -> IndexList {
        let count = match self.concept.tensor_factors() {
            Some(factors) if factors.len() == 2 || factors.len() == 3 => factors.len(),
            _ => 1,
        };
        ['i', 'j', 'k'][..count]
            .iter()
            .map(|&c| AbstractIndex::new(c))
            .collect::<Vec<_>>()
            .into()
    }
}

impl<T: Scalar> MemberTensor<T> {
    /// Create a tensor owning the given row-major components.
    pub fn from_components(concept: Concept, components: Vec<T>) -> Result<Self> {
        Self::from_array(concept, MemberArray::new(components), CheckPointer::Check)
    }

    /// Create a zero-filled tensor.
    pub fn zeros(concept: Concept) -> Self {
        let len = concept.dimension();
        Self {
            concept,
            array: MemberArray::zeros(len),
            _scalar: PhantomData,
        }
    }

    /// Materialize any tensor into owned storage.
    pub fn from_tensor<B: ComponentArray<T>>(tensor: &Tensor<T, B>) -> Self {
        Self {
            concept: tensor.concept.clone(),
            array: MemberArray::new(tensor.to_vec()),
            _scalar: PhantomData,
        }
    }
}

impl<'a, T: Scalar> PreallocatedTensor<'a, T> {
    pub fn preallocated(concept: Concept, data: &'a mut [T], check: CheckPointer) -> Result<Self> {
        Self::from_array(concept, PreallocatedArray::new(data), check)
    }
}

impl<'a, T: Scalar> ConstPreallocatedTensor<'a, T> {
    pub fn const_preallocated(concept: Concept, data: &'a [T], check: CheckPointer) -> Result<Self> {
        Self::from_array(concept, ConstPreallocatedArray::new(data), check)
    }
}

impl<'a, T: Scalar> SharedTensor<'a, T> {
    pub fn shared(concept: Concept, cells: &'a [Cell<T>], check: CheckPointer) -> Result<Self> {
        Self::from_array(concept, SharedArray::new(cells), check)
    }
}

impl<T: Scalar> ProceduralTensor<T> {
    /// Create a tensor backed by a generator of matching dimension.
    pub fn procedural(concept: Concept, generator: ComponentGenerator<T>) -> Result<Self> {
        debug!(generator = %generator.id(), concept = %concept, "procedural tensor");
        Self::from_array(concept, ProceduralArray::new(generator), CheckPointer::Check)
    }

    /// The zero tensor.
    pub fn zero(concept: Concept) -> Self {
        let generator = ComponentGenerator::zero(concept.dimension());
        Self {
            concept,
            array: ProceduralArray::new(generator),
            _scalar: PhantomData,
        }
    }

    /// The `k`-th standard basis vector.
    pub fn basis_vector(concept: Concept, k: usize) -> Result<Self> {
        let dimension = concept.dimension();
        if k >= dimension {
            return Err(TenhError::IndexOutOfRange {
                value: k,
                dimension,
            });
        }
        Ok(Self {
            concept,
            array: ProceduralArray::new(ComponentGenerator::characteristic(dimension, k)),
            _scalar: PhantomData,
        })
    }

    pub fn generator(&self) -> &ComponentGenerator<T> {
        self.array.generator()
    }
}

impl<T: Scalar, A: ComponentArray<T>> fmt::Debug for Tensor<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("concept", &self.concept)
            .field("dimension", &self.dimension())
            .field("array", &A::name())
            .finish()
    }
}

impl<T: Scalar, A: ComponentArray<T>> fmt::Display for Tensor<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.try_at(self.display_indices()) {
            Ok(indexed) => write!(f, "{}", indexed.display()),
            Err(_) => write!(f, "{:?}", self.to_vec()),
        }
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
    fn test_tensor_creation() {
        let t = MemberTensor::from_components(x(3), vec![1.0f64, 2.0, 3.0]).unwrap();
        assert_eq!(t.dimension(), 3);
        assert_eq!(t.component(1), 2.0);
        assert_eq!(t.allocation_size_in_bytes(), 24);
        assert!(MemberTensor::from_components(x(3), vec![1.0f64]).is_err());
    }

    #[test]
    fn test_as_bytes() {
        let t = MemberTensor::from_components(x(2), vec![1u32, 2]).unwrap();
        let bytes = t.as_bytes().unwrap();
        assert_eq!(bytes.len(), 8);
        assert_eq!(bytemuck::cast_slice::<u8, u32>(bytes), &[1, 2]);
        assert!(ProceduralTensor::<u32>::zero(x(2)).as_bytes().is_none());
    }

    #[test]
    fn test_preallocated_length_check() {
        let mut data = [0.0f32; 5];
        assert!(PreallocatedTensor::preallocated(x(4), &mut data, CheckPointer::Check).is_err());
        let t = PreallocatedTensor::preallocated(x(4), &mut data, CheckPointer::DontCheck).unwrap();
        assert_eq!(t.as_slice().map(<[f32]>::len), Some(4));
    }

    #[test]
    fn test_basis_vector() {
        let e = ProceduralTensor::<i64>::basis_vector(x(3), 2).unwrap();
        assert_eq!(e.to_vec(), vec![0, 0, 1]);
        assert!(ProceduralTensor::<i64>::basis_vector(x(3), 3).is_err());
        assert_eq!(e.allocation_size_in_bytes(), 0);
    }

    #[test]
    fn test_norm() {
        let t = MemberTensor::from_components(x(2), vec![3.0f64, 4.0]).unwrap();
        assert_eq!(t.squared_norm().unwrap(), 25.0);
        assert_eq!(t.norm().unwrap(), 5.0);
    }

    #[test]
    fn test_display_vector() {
        let t = MemberTensor::from_components(x(3), vec![1, 2, 3]).unwrap();
        assert_eq!(t.to_string(), "(1, 2, 3)(i)");
    }
}
