//! Lazy index expressions.
//!
//! Indexing a tensor (`a.at(i | j)`) produces an expression leaf; combining
//! leaves produces expression nodes:
//!
//! | node | built by |
//! |------|----------|
//! | [`Multiplication`] | `l * r`, contracting symbols both sides share |
//! | [`Addition`] | `l + r`, `l - r` |
//! | [`ScalarMultiplication`] | `e.scaled_by(s)`, `e.divided_by(s)`, `-e` |
//! | [`IndexBundle`] | `e.bundle(i | j, target, p)` |
//! | [`IndexSplit`] | `e.split(p, i | j)` |
//! | [`Reindex`] | `e.reindexed(i | j, k | l)` |
//! | [`Eval`] | `e.eval()` |
//!
//! Nothing is computed until a component is requested, either directly
//! ([`Expression::component`]), by assignment into a tensor, or through an
//! [`Eval`] cache.
//!
//! # Example
//!
//! ```rust,ignore
//! use tenh::{AbstractIndex, Expression};
//!
//! let (i, j, k) = (AbstractIndex::new('i'), AbstractIndex::new('j'), AbstractIndex::new('k'));
//! let product = a.at(i | j) * b.at(j | k);
//! assert_eq!(product.free_indices().len(), 2);
//! let c_01 = product.component(&[0, 1]);
//! ```

mod addition;
mod bundle;
mod contraction;
mod display;
mod eval;
mod indexed;
mod reindex;
mod scalar_mul;
mod split;

use crate::algebra::Scalar;
use crate::array::MemoryRange;
use crate::conceptual::Concept;
use crate::error::{Result, TenhError};
use crate::implementation::inner_product;
use crate::index::{AbstractIndex, DimIndex, IndexList, MultiIndex};

pub use addition::Addition;
pub use bundle::IndexBundle;
pub use contraction::Multiplication;
pub use display::ExpressionDisplay;
pub use eval::Eval;
pub use indexed::Indexed;
pub use reindex::Reindex;
pub use scalar_mul::ScalarMultiplication;
pub use split::IndexSplit;

/// An index expression: a lazily evaluated tensor with named free indices.
///
/// Implementors provide the four required methods; everything else
/// (composition, evaluation, norms, printing) is provided.
pub trait Expression: Sized {
    /// The scalar type of every component.
    type Scalar: Scalar;

    /// Free indices, in the order [`component`](Self::component) takes values.
    fn free_indices(&self) -> &[DimIndex];

    /// Symbols already summed inside this expression.
    fn used_indices(&self) -> &[AbstractIndex];

    /// Component at the given free-index values.
    ///
    /// `free` has one value per free index, each below that index's dimension.
    fn component(&self, free: &[usize]) -> Self::Scalar;

    /// Whether evaluating this expression reads memory in `range`.
    fn uses_memory(&self, range: &MemoryRange) -> bool;

    // ========================================================================
    // Metadata
    // ========================================================================

    fn free_symbols(&self) -> Vec<AbstractIndex> {
        self.free_indices().iter().map(|d| d.symbol).collect()
    }

    fn free_dimensions(&self) -> Vec<usize> {
        self.free_indices().iter().map(DimIndex::dimension).collect()
    }

    /// Concept of the tensor this expression evaluates to: the single free
    /// factor, or the tensor product of all free factors.
    fn free_concept(&self) -> Concept {
        free_concept(self.free_indices())
    }

    /// Component at a multi-index over the free indices.
    ///
    /// ```rust,ignore
    /// let m = MultiIndex::from_components(&[ComponentIndex::new(1, 2), ComponentIndex::new(0, 3)]);
    /// let value = a.at(i | j).component_at(&m);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the multi-index dimensions differ from the free dimensions.
    fn component_at(&self, m: &MultiIndex) -> Self::Scalar {
        assert_eq!(
            m.dimensions(),
            self.free_dimensions().as_slice(),
            "Multi-index dimensions {:?} don't match free dimensions",
            m.dimensions()
        );
        self.component(m.values())
    }

    /// The value of an expression without free indices.
    fn to_scalar(&self) -> Result<Self::Scalar> {
        match self.free_indices().len() {
            0 => Ok(self.component(&[])),
            n => Err(TenhError::NotAScalar(n)),
        }
    }

    // ========================================================================
    // Composition
    // ========================================================================

    /// Contract with `rhs` over every symbol free on both sides.
    fn try_mul<R>(self, rhs: R) -> Result<Multiplication<Self, R>>
    where
        R: Expression<Scalar = Self::Scalar>,
    {
        Multiplication::new(self, rhs)
    }

    fn try_add<R>(self, rhs: R) -> Result<Addition<Self, R>>
    where
        R: Expression<Scalar = Self::Scalar>,
    {
        Addition::sum(self, rhs)
    }

    fn try_sub<R>(self, rhs: R) -> Result<Addition<Self, R>>
    where
        R: Expression<Scalar = Self::Scalar>,
    {
        Addition::difference(self, rhs)
    }

    fn scaled_by(self, factor: Self::Scalar) -> ScalarMultiplication<Self> {
        ScalarMultiplication::multiply(self, factor)
    }

    fn divided_by(self, divisor: Self::Scalar) -> ScalarMultiplication<Self> {
        ScalarMultiplication::divide(self, divisor)
    }

    /// Merge the free `indices` into one index `result` over `target`.
    fn bundle(
        self,
        indices: impl Into<IndexList>,
        target: Concept,
        result: AbstractIndex,
    ) -> Result<IndexBundle<Self>> {
        IndexBundle::new(self, indices.into(), target, result)
    }

    /// Expand the free index `source` into one index per factor of its concept.
    fn split(self, source: AbstractIndex, indices: impl Into<IndexList>) -> Result<IndexSplit<Self>> {
        IndexSplit::new(self, source, indices.into())
    }

    /// Substitute the symbols `from` by `to`, position by position.
    fn reindexed(self, from: impl Into<IndexList>, to: impl Into<IndexList>) -> Result<Reindex<Self>> {
        Reindex::new(self, from.into(), to.into())
    }

    /// Wrap in a cache materialized on first access.
    fn eval(self) -> Eval<Self> {
        Eval::new(self)
    }

    // ========================================================================
    // Norms and printing
    // ========================================================================

    /// Squared norm under the standard inner product of the free factors.
    ///
    /// Not meaningful for complex scalars.
    fn squared_norm(&self) -> Result<<Self::Scalar as Scalar>::Real> {
        let cached = Eval::new(self);
        let value = cached.value();
        inner_product::squared_norm_of(value.concept(), |p| value.component(p))
    }

    fn norm(&self) -> Result<<Self::Scalar as Scalar>::Real> {
        use num_traits::Float;
        self.squared_norm().map(|s| s.sqrt())
    }

    /// Printable view of all components.
    fn display(&self) -> ExpressionDisplay<'_, Self> {
        ExpressionDisplay::new(self)
    }
}

impl<E: Expression> Expression for &E {
    type Scalar = E::Scalar;

    #[inline]
    fn free_indices(&self) -> &[DimIndex] {
        (**self).free_indices()
    }

    #[inline]
    fn used_indices(&self) -> &[AbstractIndex] {
        (**self).used_indices()
    }

    #[inline]
    fn component(&self, free: &[usize]) -> E::Scalar {
        (**self).component(free)
    }

    fn uses_memory(&self, range: &MemoryRange) -> bool {
        (**self).uses_memory(range)
    }
}

// ============================================================================
// Index bookkeeping shared by the nodes
// ============================================================================

/// Where an operand slot takes its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Source {
    /// Position in the parent's free values.
    Free(usize),
    /// Position in the summed multi-index.
    Summed(usize),
}

/// Fill `out` from the parent's free values and the current summed values.
#[inline]
pub(crate) fn gather(sources: &[Source], free: &[usize], summed: &[usize], out: &mut [usize]) {
    for (slot, source) in out.iter_mut().zip(sources) {
        *slot = match *source {
            Source::Free(n) => free[n],
            Source::Summed(n) => summed[n],
        };
    }
}

pub(crate) fn free_concept(free: &[DimIndex]) -> Concept {
    match free {
        [single] => single.factor.clone(),
        _ => Concept::tensor_product(free.iter().map(|d| d.factor.clone()).collect()),
    }
}

/// Check that summing `symbol` over `left` against `right` is a natural pairing.
pub(crate) fn check_pairing(symbol: AbstractIndex, left: &Concept, right: &Concept) -> Result<()> {
    if left.dimension() != right.dimension() {
        return Err(TenhError::DimensionMismatch {
            index: symbol,
            left: left.dimension(),
            right: right.dimension(),
        });
    }
    if !left.pairs_naturally_with(right) {
        return Err(TenhError::NotNaturalPairing {
            index: symbol,
            left: left.to_string(),
            right: right.to_string(),
        });
    }
    Ok(())
}

/// For each index of `other`, its position in `reference`.
///
/// Both lists must hold the same symbols over the same factors, in any order.
pub(crate) fn align_free_indices(reference: &[DimIndex], other: &[DimIndex]) -> Result<Vec<usize>> {
    let different = || TenhError::OperandsHaveDifferentFreeIndices {
        left: reference.iter().map(|d| d.symbol).collect(),
        right: other.iter().map(|d| d.symbol).collect(),
    };
    if reference.len() != other.len() {
        return Err(different());
    }
    other
        .iter()
        .map(|d| {
            let position = reference
                .iter()
                .position(|r| r.symbol == d.symbol)
                .ok_or_else(different)?;
            if reference[position].factor != d.factor {
                return Err(TenhError::FactorMismatch {
                    index: d.symbol,
                    left: reference[position].factor.to_string(),
                    right: d.factor.to_string(),
                });
            }
            Ok(position)
        })
        .collect()
}

// ============================================================================
// Operator sugar
// ============================================================================

/// `*`, `+`, `-` and unary `-` for an expression node type.
///
/// The binary operators panic on ill-formed composition; the `try_*`
/// methods of [`Expression`] return the error instead.
macro_rules! impl_expression_ops {
    ([$($generics:tt)*] $ty:ty) => {
        impl<$($generics)*, Rhs> std::ops::Mul<Rhs> for $ty
        where
            Rhs: $crate::expression::Expression<Scalar = <$ty as $crate::expression::Expression>::Scalar>,
        {
            type Output = $crate::expression::Multiplication<$ty, Rhs>;

            fn mul(self, rhs: Rhs) -> Self::Output {
                $crate::expression::Expression::try_mul(self, rhs).unwrap_or_else(|e| panic!("{}", e))
            }
        }

        impl<$($generics)*, Rhs> std::ops::Add<Rhs> for $ty
        where
            Rhs: $crate::expression::Expression<Scalar = <$ty as $crate::expression::Expression>::Scalar>,
        {
            type Output = $crate::expression::Addition<$ty, Rhs>;

            fn add(self, rhs: Rhs) -> Self::Output {
                $crate::expression::Expression::try_add(self, rhs).unwrap_or_else(|e| panic!("{}", e))
            }
        }

        impl<$($generics)*, Rhs> std::ops::Sub<Rhs> for $ty
        where
            Rhs: $crate::expression::Expression<Scalar = <$ty as $crate::expression::Expression>::Scalar>,
        {
            type Output = $crate::expression::Addition<$ty, Rhs>;

            fn sub(self, rhs: Rhs) -> Self::Output {
                $crate::expression::Expression::try_sub(self, rhs).unwrap_or_else(|e| panic!("{}", e))
            }
        }

        impl<$($generics)*> std::ops::Neg for $ty {
            type Output = $crate::expression::ScalarMultiplication<$ty>;

            fn neg(self) -> Self::Output {
                $crate::expression::ScalarMultiplication::negate(self)
            }
        }
    };
}

pub(crate) use impl_expression_ops;
