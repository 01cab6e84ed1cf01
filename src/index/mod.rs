//! Abstract and component indices.
//!
//! An [`AbstractIndex`] is a symbol naming a tensor slot in an expression
//! (`i`, `j`, ...). Symbols are composed into an [`IndexList`] with `|`:
//!
//! ```rust,ignore
//! use tenh::index::AbstractIndex;
//!
//! let (i, j, k) = (AbstractIndex::new('i'), AbstractIndex::new('j'), AbstractIndex::new('k'));
//! let list = i | j | k;
//! assert_eq!(list.len(), 3);
//! ```
//!
//! [`ComponentIndex`] and [`MultiIndex`] are the runtime values those symbols
//! range over when an expression is evaluated.

mod multi_index;

use std::fmt;
use std::ops::BitOr;
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::conceptual::Concept;
use crate::error::{Result, TenhError};

pub use multi_index::{
    row_major_offset, row_major_split, row_major_split_into, IndexValues, MultiIndex,
};

/// First symbol handed out by [`AbstractIndex::fresh`]; above every `char`.
const FIRST_FRESH: u32 = char::MAX as u32 + 1;

static NEXT_FRESH: AtomicU32 = AtomicU32::new(FIRST_FRESH);

/// A symbolic index.
///
/// Two indices are the same symbol iff they compare equal. Symbols created
/// from characters print as that character; generated symbols print as `#n`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AbstractIndex(u32);

impl AbstractIndex {
    pub const fn new(symbol: char) -> Self {
        Self(symbol as u32)
    }

    /// A symbol distinct from every character symbol and every other fresh symbol.
    pub fn fresh() -> Self {
        Self(NEXT_FRESH.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn symbol(&self) -> Option<char> {
        char::from_u32(self.0)
    }

    #[inline]
    pub fn is_fresh(&self) -> bool {
        self.0 >= FIRST_FRESH
    }
}

impl fmt::Display for AbstractIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.symbol() {
            Some(c) => write!(f, "{}", c),
            None => write!(f, "#{}", self.0 - FIRST_FRESH),
        }
    }
}

impl fmt::Debug for AbstractIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self)
    }
}

impl From<char> for AbstractIndex {
    fn from(symbol: char) -> Self {
        Self::new(symbol)
    }
}

/// An ordered list of abstract indices, as written in `a(i|j|k)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct IndexList(Vec<AbstractIndex>);

impl IndexList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[AbstractIndex] {
        &self.0
    }

    /// First symbol occurring twice in the list, if any.
    pub fn first_duplicate(&self) -> Option<AbstractIndex> {
        first_duplicate(&self.0)
    }
}

pub(crate) fn first_duplicate(symbols: &[AbstractIndex]) -> Option<AbstractIndex> {
    symbols
        .iter()
        .enumerate()
        .find(|(n, s)| symbols[..*n].contains(s))
        .map(|(_, s)| *s)
}

impl From<AbstractIndex> for IndexList {
    fn from(index: AbstractIndex) -> Self {
        Self(vec![index])
    }
}

impl From<Vec<AbstractIndex>> for IndexList {
    fn from(indices: Vec<AbstractIndex>) -> Self {
        Self(indices)
    }
}

impl From<&[AbstractIndex]> for IndexList {
    fn from(indices: &[AbstractIndex]) -> Self {
        Self(indices.to_vec())
    }
}

impl From<()> for IndexList {
    fn from(_: ()) -> Self {
        Self::new()
    }
}

impl BitOr for AbstractIndex {
    type Output = IndexList;

    fn bitor(self, rhs: AbstractIndex) -> IndexList {
        IndexList(vec![self, rhs])
    }
}

impl BitOr<AbstractIndex> for IndexList {
    type Output = IndexList;

    fn bitor(mut self, rhs: AbstractIndex) -> IndexList {
        self.0.push(rhs);
        self
    }
}

impl IntoIterator for IndexList {
    type Item = AbstractIndex;
    type IntoIter = std::vec::IntoIter<AbstractIndex>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for IndexList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, index) in self.0.iter().enumerate() {
            if n > 0 {
                write!(f, "|")?;
            }
            write!(f, "{}", index)?;
        }
        Ok(())
    }
}

/// An abstract index bound to the factor it ranges over.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DimIndex {
    pub symbol: AbstractIndex,
    pub factor: Concept,
}

impl DimIndex {
    pub fn new(symbol: AbstractIndex, factor: Concept) -> Self {
        Self { symbol, factor }
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.factor.dimension()
    }
}

/// Whether a component index is range checked on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeCheck {
    #[default]
    Check,
    DontCheck,
}

/// A component value in `[0, dimension)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentIndex {
    value: usize,
    dimension: usize,
}

impl ComponentIndex {
    /// Create a range-checked component index.
    ///
    /// # Panics
    ///
    /// Panics if `value >= dimension`.
    pub fn new(value: usize, dimension: usize) -> Self {
        assert!(
            value < dimension,
            "Component index {} out of range for dimension {}",
            value,
            dimension
        );
        Self { value, dimension }
    }

    pub fn try_new(value: usize, dimension: usize) -> Result<Self> {
        if value < dimension {
            Ok(Self { value, dimension })
        } else {
            Err(TenhError::IndexOutOfRange { value, dimension })
        }
    }

    /// Create without range checking; the caller is responsible for `value < dimension`.
    pub fn new_unchecked(value: usize, dimension: usize) -> Self {
        Self { value, dimension }
    }

    pub fn with_check(value: usize, dimension: usize, check: RangeCheck) -> Self {
        match check {
            RangeCheck::Check => Self::new(value, dimension),
            RangeCheck::DontCheck => Self::new_unchecked(value, dimension),
        }
    }

    #[inline]
    pub fn value(&self) -> usize {
        self.value
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.value >= self.dimension
    }

    /// Advance by one; may step onto the end (`value == dimension`).
    #[inline]
    pub fn increment(&mut self) {
        self.value += 1;
    }

    #[inline]
    pub fn reset(&mut self) {
        self.value = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitor_builds_list() {
        let i = AbstractIndex::new('i');
        let j = AbstractIndex::new('j');
        let k = AbstractIndex::new('k');
        let list = i | j | k;
        assert_eq!(list.as_slice(), &[i, j, k]);
        assert_eq!(list.to_string(), "i|j|k");
        assert_eq!(list.first_duplicate(), None);
        assert_eq!((i | j | i).first_duplicate(), Some(i));
    }

    #[test]
    fn test_fresh_symbols_are_distinct() {
        let a = AbstractIndex::fresh();
        let b = AbstractIndex::fresh();
        assert_ne!(a, b);
        assert!(a.is_fresh());
        assert!(!AbstractIndex::new('z').is_fresh());
        assert!(a.to_string().starts_with('#'));
    }

    #[test]
    fn test_component_index_range() {
        let c = ComponentIndex::new(2, 3);
        assert_eq!(c.value(), 2);
        assert!(ComponentIndex::try_new(3, 3).is_err());
        let unchecked = ComponentIndex::new_unchecked(5, 3);
        assert!(unchecked.is_at_end());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_component_index_panics_when_checked() {
        ComponentIndex::with_check(4, 4, RangeCheck::Check);
    }
}
