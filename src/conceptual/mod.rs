//! Conceptual description of the spaces tensors live in.
//!
//! A [`Concept`] is a closed description of a based vector space, possibly
//! composite (tensor product, tensor/symmetric/exterior power, direct sum,
//! diagonal 2-tensors). It determines a tensor's dimension, its dual, and how
//! its flat components correspond to multi-indices over its factors.
//!
//! ```rust,ignore
//! use tenh::conceptual::{Concept, Field};
//!
//! let x = Concept::standard(Field::Real, 3, "X");
//! let op = Concept::tensor_product(vec![x.clone(), x.dual()]);
//! assert_eq!(op.dimension(), 9);
//! assert_eq!(op.dual().dual(), op);
//! ```

pub mod index_map;

use std::borrow::Cow;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use index_map::Sign;

use crate::index::{row_major_offset, row_major_split};

/// Identifier used to tell apart spaces and bases of otherwise equal shape.
pub type Id = Cow<'static, str>;

/// The scalar field a vector space is defined over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Field {
    Real,
    Complex,
}

/// A vector space: field, dimension and an identifying tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VectorSpace {
    field: Field,
    dimension: usize,
    id: Id,
    dual: bool,
}

impl VectorSpace {
    /// Create a (primal) vector space.
    pub fn new(field: Field, dimension: usize, id: impl Into<Id>) -> Self {
        Self {
            field,
            dimension,
            id: id.into(),
            dual: false,
        }
    }

    #[inline]
    pub fn field(&self) -> Field {
        self.field
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn is_dual(&self) -> bool {
        self.dual
    }

    /// The dual space. `v.dual().dual() == v`.
    pub fn dual(&self) -> Self {
        Self {
            dual: !self.dual,
            ..self.clone()
        }
    }
}

/// A choice of basis, identified by tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Basis {
    id: Id,
    dual: bool,
}

impl Basis {
    pub const STANDARD: &'static str = "standard";

    pub fn new(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            dual: false,
        }
    }

    /// The standard (Euclidean) basis.
    pub fn standard() -> Self {
        Self::new(Self::STANDARD)
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn is_standard(&self) -> bool {
        self.id == Self::STANDARD
    }

    #[inline]
    pub fn is_dual(&self) -> bool {
        self.dual
    }

    pub fn dual(&self) -> Self {
        Self {
            dual: !self.dual,
            ..self.clone()
        }
    }
}

/// A vector space together with a basis, making its components coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BasedVectorSpace {
    space: VectorSpace,
    basis: Basis,
}

impl BasedVectorSpace {
    pub fn new(space: VectorSpace, basis: Basis) -> Self {
        Self { space, basis }
    }

    #[inline]
    pub fn space(&self) -> &VectorSpace {
        &self.space
    }

    #[inline]
    pub fn basis(&self) -> &Basis {
        &self.basis
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.space.dimension()
    }

    pub fn dual(&self) -> Self {
        Self {
            space: self.space.dual(),
            basis: self.basis.dual(),
        }
    }
}

/// A (possibly composite) based vector space.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Concept {
    /// A based vector space or the dual of one.
    Space(BasedVectorSpace),
    /// Ordered tensor product of factors.
    TensorProduct(Vec<Concept>),
    /// `order`-fold tensor product of one factor.
    TensorPower { order: usize, factor: Box<Concept> },
    /// Symmetric tensors of the given order.
    SymmetricPower { order: usize, factor: Box<Concept> },
    /// Antisymmetric tensors of the given order.
    ExteriorPower { order: usize, factor: Box<Concept> },
    /// Ordered direct sum of summands.
    DirectSum(Vec<Concept>),
    /// Diagonal 2-tensors inside `a ⊗ b`.
    Diagonal2Tensor(Box<Concept>, Box<Concept>),
}

impl Concept {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// A based vector space with the standard basis.
    pub fn standard(field: Field, dimension: usize, id: impl Into<Id>) -> Self {
        Concept::Space(BasedVectorSpace::new(
            VectorSpace::new(field, dimension, id),
            Basis::standard(),
        ))
    }

    pub fn based(space: VectorSpace, basis: Basis) -> Self {
        Concept::Space(BasedVectorSpace::new(space, basis))
    }

    pub fn tensor_product(factors: Vec<Concept>) -> Self {
        Concept::TensorProduct(factors)
    }

    pub fn tensor_power(order: usize, factor: Concept) -> Self {
        Concept::TensorPower {
            order,
            factor: Box::new(factor),
        }
    }

    pub fn symmetric_power(order: usize, factor: Concept) -> Self {
        Concept::SymmetricPower {
            order,
            factor: Box::new(factor),
        }
    }

    pub fn exterior_power(order: usize, factor: Concept) -> Self {
        Concept::ExteriorPower {
            order,
            factor: Box::new(factor),
        }
    }

    pub fn direct_sum(summands: Vec<Concept>) -> Self {
        Concept::DirectSum(summands)
    }

    pub fn diagonal_2tensor(a: Concept, b: Concept) -> Self {
        Concept::Diagonal2Tensor(Box::new(a), Box::new(b))
    }

    // ========================================================================
    // Metadata
    // ========================================================================

    /// Number of components of a tensor in this space.
    pub fn dimension(&self) -> usize {
        match self {
            Concept::Space(space) => space.dimension(),
            Concept::TensorProduct(factors) => factors.iter().map(Concept::dimension).product(),
            Concept::TensorPower { order, factor } => factor.dimension().pow(*order as u32),
            Concept::SymmetricPower { order, factor } => {
                index_map::symmetric_dimension(*order, factor.dimension())
            }
            Concept::ExteriorPower { order, factor } => {
                index_map::exterior_dimension(*order, factor.dimension())
            }
            Concept::DirectSum(summands) => summands.iter().map(Concept::dimension).sum(),
            Concept::Diagonal2Tensor(a, b) => a.dimension().min(b.dimension()),
        }
    }

    /// The dual space. Duality is an involution: `c.dual().dual() == c`.
    pub fn dual(&self) -> Self {
        match self {
            Concept::Space(space) => Concept::Space(space.dual()),
            Concept::TensorProduct(factors) => {
                Concept::TensorProduct(factors.iter().map(Concept::dual).collect())
            }
            Concept::TensorPower { order, factor } => Concept::tensor_power(*order, factor.dual()),
            Concept::SymmetricPower { order, factor } => {
                Concept::symmetric_power(*order, factor.dual())
            }
            Concept::ExteriorPower { order, factor } => {
                Concept::exterior_power(*order, factor.dual())
            }
            Concept::DirectSum(summands) => {
                Concept::DirectSum(summands.iter().map(Concept::dual).collect())
            }
            Concept::Diagonal2Tensor(a, b) => Concept::diagonal_2tensor(a.dual(), b.dual()),
        }
    }

    /// Whether `other` is the dual of `self`, so that summing over a pair of
    /// indices ranging over them is a natural pairing.
    pub fn pairs_naturally_with(&self, other: &Concept) -> bool {
        self.dual() == *other
    }

    /// Factors a tensor in this space can be indexed by directly, `a(i|j|...)`.
    pub fn tensor_factors(&self) -> Option<Vec<Concept>> {
        match self {
            Concept::TensorProduct(factors) => Some(factors.clone()),
            Concept::TensorPower { order, factor } => Some(vec![factor.as_ref().clone(); *order]),
            _ => None,
        }
    }

    /// Factors a single index over this space can be split into.
    pub fn split_factors(&self) -> Option<Vec<Concept>> {
        match self {
            Concept::TensorProduct(_) | Concept::TensorPower { .. } => self.tensor_factors(),
            Concept::SymmetricPower { order, factor } | Concept::ExteriorPower { order, factor } => {
                Some(vec![factor.as_ref().clone(); *order])
            }
            Concept::Diagonal2Tensor(a, b) => Some(vec![a.as_ref().clone(), b.as_ref().clone()]),
            Concept::Space(_) | Concept::DirectSum(_) => None,
        }
    }

    /// Factor list with nested tensor products expanded.
    pub fn flattened_factors(&self) -> Vec<Concept> {
        match self.tensor_factors() {
            Some(factors) => factors.iter().flat_map(Concept::flattened_factors).collect(),
            None => vec![self.clone()],
        }
    }

    /// Summands of a direct sum.
    pub fn summands(&self) -> Option<&[Concept]> {
        match self {
            Concept::DirectSum(summands) => Some(summands),
            _ => None,
        }
    }

    /// Whether every underlying space uses the standard basis.
    pub fn is_euclidean(&self) -> bool {
        match self {
            Concept::Space(space) => space.basis().is_standard(),
            Concept::TensorProduct(factors) | Concept::DirectSum(factors) => {
                factors.iter().all(Concept::is_euclidean)
            }
            Concept::TensorPower { factor, .. }
            | Concept::SymmetricPower { factor, .. }
            | Concept::ExteriorPower { factor, .. } => factor.is_euclidean(),
            Concept::Diagonal2Tensor(a, b) => a.is_euclidean() && b.is_euclidean(),
        }
    }

    // ========================================================================
    // Index maps
    // ========================================================================

    /// Flat component and sign holding the factor multi-index `parts`.
    ///
    /// `None` means the component is structurally zero (a repeated exterior
    /// index, or an off-diagonal entry of a diagonal 2-tensor). `parts` must
    /// have one entry per [`split_factors`](Self::split_factors) entry.
    pub fn bundle_index(&self, parts: &[usize]) -> Option<(usize, Sign)> {
        match self {
            Concept::SymmetricPower { .. } => {
                Some((index_map::symmetric_bundle(parts), Sign::Positive))
            }
            Concept::ExteriorPower { .. } => index_map::exterior_bundle(parts),
            Concept::Diagonal2Tensor(..) => {
                if parts[0] == parts[1] {
                    Some((parts[0], Sign::Positive))
                } else {
                    None
                }
            }
            _ => {
                let dims: Vec<usize> = self
                    .split_factors()
                    .map(|factors| factors.iter().map(Concept::dimension).collect())
                    .unwrap_or_else(|| vec![self.dimension()]);
                Some((row_major_offset(parts, &dims), Sign::Positive))
            }
        }
    }

    /// Canonical factor multi-index stored at flat component `flat`.
    pub fn split_index(&self, flat: usize) -> Vec<usize> {
        match self {
            Concept::SymmetricPower { order, .. } => index_map::symmetric_split(flat, *order),
            Concept::ExteriorPower { order, .. } => index_map::exterior_split(flat, *order),
            Concept::Diagonal2Tensor(..) => vec![flat, flat],
            _ => {
                let dims: Vec<usize> = self
                    .split_factors()
                    .map(|factors| factors.iter().map(Concept::dimension).collect())
                    .unwrap_or_else(|| vec![self.dimension()]);
                row_major_split(flat, &dims).to_vec()
            }
        }
    }
}

impl From<BasedVectorSpace> for Concept {
    fn from(space: BasedVectorSpace) -> Self {
        Concept::Space(space)
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(f: &mut fmt::Formatter<'_>, items: &[Concept], sep: &str) -> fmt::Result {
            write!(f, "(")?;
            for (n, item) in items.iter().enumerate() {
                if n > 0 {
                    write!(f, " {} ", sep)?;
                }
                write!(f, "{}", item)?;
            }
            write!(f, ")")
        }

        match self {
            Concept::Space(space) => {
                write!(f, "{}", space.space().id())?;
                if space.space().is_dual() {
                    write!(f, "*")?;
                }
                write!(f, "[{}]", space.dimension())
            }
            Concept::TensorProduct(factors) => list(f, factors, "⊗"),
            Concept::TensorPower { order, factor } => write!(f, "{}^⊗{}", factor, order),
            Concept::SymmetricPower { order, factor } => write!(f, "Sym^{}({})", order, factor),
            Concept::ExteriorPower { order, factor } => write!(f, "Λ^{}({})", order, factor),
            Concept::DirectSum(summands) => list(f, summands, "⊕"),
            Concept::Diagonal2Tensor(a, b) => write!(f, "Diag({} ⊗ {})", a, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x(n: usize) -> Concept {
        Concept::standard(Field::Real, n, "X")
    }

    #[test]
    fn test_dimensions() {
        assert_eq!(x(3).dimension(), 3);
        assert_eq!(Concept::tensor_product(vec![x(3), x(4)]).dimension(), 12);
        assert_eq!(Concept::tensor_power(3, x(2)).dimension(), 8);
        assert_eq!(Concept::symmetric_power(2, x(3)).dimension(), 6);
        assert_eq!(Concept::exterior_power(2, x(3)).dimension(), 3);
        assert_eq!(Concept::direct_sum(vec![x(3), x(4)]).dimension(), 7);
        assert_eq!(Concept::diagonal_2tensor(x(3), x(5)).dimension(), 3);
    }

    #[test]
    fn test_dual_involution() {
        let c = Concept::direct_sum(vec![
            Concept::tensor_product(vec![x(2), x(3).dual()]),
            Concept::symmetric_power(2, x(4)),
        ]);
        assert_ne!(c.dual(), c);
        assert_eq!(c.dual().dual(), c);
        assert_eq!(c.dual().dimension(), c.dimension());
    }

    #[test]
    fn test_natural_pairing() {
        assert!(x(3).pairs_naturally_with(&x(3).dual()));
        assert!(!x(3).pairs_naturally_with(&x(3)));
        let y = Concept::standard(Field::Real, 3, "Y");
        assert!(!x(3).pairs_naturally_with(&y.dual()));
    }

    #[test]
    fn test_flattened_factors() {
        let c = Concept::tensor_product(vec![x(2), Concept::tensor_power(2, x(3))]);
        assert_eq!(c.flattened_factors(), vec![x(2), x(3), x(3)]);
        assert_eq!(Concept::symmetric_power(2, x(3)).flattened_factors().len(), 1);
    }

    #[test]
    fn test_tensor_product_index_map() {
        let c = Concept::tensor_product(vec![x(2), x(3)]);
        assert_eq!(c.bundle_index(&[1, 2]), Some((5, Sign::Positive)));
        assert_eq!(c.split_index(4), vec![1, 1]);
    }

    #[test]
    fn test_diagonal_index_map() {
        let d = Concept::diagonal_2tensor(x(3), x(3));
        assert_eq!(d.bundle_index(&[2, 2]), Some((2, Sign::Positive)));
        assert_eq!(d.bundle_index(&[2, 1]), None);
        assert_eq!(d.split_index(1), vec![1, 1]);
    }

    #[test]
    fn test_euclidean() {
        let odd = Concept::based(VectorSpace::new(Field::Real, 2, "Y"), Basis::new("odd"));
        assert!(Concept::tensor_product(vec![x(2), x(2).dual()]).is_euclidean());
        assert!(!Concept::direct_sum(vec![x(2), odd]).is_euclidean());
    }

    #[test]
    fn test_display() {
        let c = Concept::tensor_product(vec![x(2), x(2).dual()]);
        assert_eq!(c.to_string(), "(X[2] ⊗ X*[2])");
    }
}
