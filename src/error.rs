//! Error types for index-expression composition and tensor construction.
//!
//! Every condition that would make an index expression ill-formed (mismatched
//! factors, duplicate free indices, bundling non-free indices, ...) is a
//! variant of [`TenhError`], returned by the fallible constructors of the
//! expression nodes and tensors.

use thiserror::Error;

use crate::index::AbstractIndex;

/// The catalog of ill-formed expression and construction conditions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TenhError {
    #[error("dimension mismatch for index {index}: {left} vs {right}")]
    DimensionMismatch {
        index: AbstractIndex,
        left: usize,
        right: usize,
    },

    #[error("factor mismatch for index {index}: {left} vs {right}")]
    FactorMismatch {
        index: AbstractIndex,
        left: String,
        right: String,
    },

    #[error("summation over {index} is not a natural pairing: {left} with {right}")]
    NotNaturalPairing {
        index: AbstractIndex,
        left: String,
        right: String,
    },

    #[error("free index {0} appears more than once")]
    DuplicateFreeIndex(AbstractIndex),

    #[error("index {0} is not free in the operand")]
    IndexNotFree(AbstractIndex),

    #[error("bundled indices must be pairwise distinct, {0} repeats")]
    BundleIndicesMustBeDistinct(AbstractIndex),

    #[error("resulting index {0} must be distinct from the operand's indices")]
    BundleAndResultingMustBeDistinct(AbstractIndex),

    #[error("split index {0} must be distinct from the operand's indices")]
    SourceAndSplitMustBeDistinct(AbstractIndex),

    #[error("bundling needs at least 2 indices, got {0}")]
    CanOnlyBundleAtLeastTwo(usize),

    #[error("free index {0} collides with an index already summed in the other operand")]
    FreeIndexCollidesWithUsed(AbstractIndex),

    #[error("index {0} is used more than twice")]
    IndexUsedMoreThanTwice(AbstractIndex),

    #[error("operands have different free indices: {left:?} vs {right:?}")]
    OperandsHaveDifferentFreeIndices {
        left: Vec<AbstractIndex>,
        right: Vec<AbstractIndex>,
    },

    #[error("index lists must have equal lengths: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("index list length must be exactly {expected}, got {actual}")]
    LengthMustBeExactly { expected: usize, actual: usize },

    #[error("{concept} cannot be indexed by {actual} indices")]
    IndexCountMismatch { concept: String, actual: usize },

    #[error("component index {value} out of range for dimension {dimension}")]
    IndexOutOfRange { value: usize, dimension: usize },

    #[error("only expressions without free indices convert to scalars, this one has {0}")]
    NotAScalar(usize),

    #[error("{0} has no factor structure to split into")]
    NotSplittable(String),

    #[error("{0} cannot be the target of a bundle")]
    NotBundleTarget(String),

    #[error("attempted access to element {index} of a list of length {len}")]
    AttemptedAccessPastListEnd { index: usize, len: usize },

    #[error("component count {actual} does not match dimension {expected}")]
    ComponentCountMismatch { expected: usize, actual: usize },

    #[error("{0} is not a direct sum")]
    NotADirectSum(String),

    #[error("{0} is not a 2-tensor")]
    NotA2Tensor(String),

    #[error("no inner product is defined on {0}")]
    NoInnerProduct(String),

    #[error("order must be positive")]
    OrderMustBePositive,
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TenhError>;
