//! Component array backings.
//!
//! A tensor's components live in one of:
//! - [`MemberArray`]: owned storage
//! - [`PreallocatedArray`] / [`ConstPreallocatedArray`]: caller-owned memory
//! - [`SharedArray`]: caller-owned cells, writable through shared views
//! - [`ProceduralArray`]: no storage, components computed by a [`ComponentGenerator`]
//!
//! [`SubArray`] and [`SubArrayMut`] window into any of them.

mod generator;
mod storage;
mod view;

use std::ops::Range;

use crate::algebra::Scalar;

pub use generator::{ComponentGenerator, GeneratorId, ProceduralArray};
pub use storage::{ConstPreallocatedArray, MemberArray, PreallocatedArray, SharedArray};
pub use view::{SubArray, SubArrayMut};

/// Read access to a flat array of components.
pub trait ComponentArray<T: Scalar> {
    /// Number of components.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Component at flat index `index`.
    fn get(&self, index: usize) -> T;

    /// Address range of the backing memory, `None` for procedural arrays.
    fn memory_range(&self) -> Option<MemoryRange>;

    /// Packed component memory, when it can be borrowed as a plain slice.
    fn as_slice(&self) -> Option<&[T]> {
        None
    }

    /// A generator reproducing the first `dimension` components.
    ///
    /// Stored arrays are copied; procedural arrays hand out their generator.
    fn to_generator(&self, dimension: usize) -> ComponentGenerator<T> {
        ComponentGenerator::snapshot((0..dimension).map(|p| self.get(p)).collect())
    }

    /// Backing name for debugging.
    fn name() -> &'static str;
}

/// Write access to a flat array of components.
pub trait ComponentArrayMut<T: Scalar>: ComponentArray<T> {
    fn set(&mut self, index: usize, value: T);
}

/// Whether the length of caller-supplied memory is checked against the dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckPointer {
    #[default]
    Check,
    DontCheck,
}

/// A half-open byte address range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryRange {
    start: usize,
    end: usize,
}

impl MemoryRange {
    pub fn of_slice<E>(slice: &[E]) -> Self {
        let Range { start, end } = slice.as_ptr_range();
        Self {
            start: start as usize,
            end: end as usize,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The sub-range `len` bytes long starting `offset` bytes in.
    pub fn narrow(&self, offset: usize, len: usize) -> Self {
        let start = self.start + offset;
        Self {
            start,
            end: (start + len).min(self.end),
        }
    }

    /// Whether the two ranges share at least one byte.
    pub fn overlaps(&self, other: &MemoryRange) -> bool {
        !self.is_empty() && !other.is_empty() && self.start < other.end && other.start < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_range_overlap() {
        let data = [0.0f64; 8];
        let whole = MemoryRange::of_slice(&data);
        let front = MemoryRange::of_slice(&data[..4]);
        let back = MemoryRange::of_slice(&data[4..]);
        assert_eq!(whole.len(), 64);
        assert!(whole.overlaps(&front));
        assert!(whole.overlaps(&back));
        assert!(!front.overlaps(&back));
        assert!(!MemoryRange::of_slice(&data[2..2]).overlaps(&whole));
    }
}
