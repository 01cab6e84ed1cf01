//! Stored component arrays.

use std::cell::Cell;

use super::{ComponentArray, ComponentArrayMut, MemoryRange};
use crate::algebra::Scalar;

/// Owned component storage.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberArray<T: Scalar> {
    data: Vec<T>,
}

impl<T: Scalar> MemberArray<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self { data }
    }

    pub fn zeros(len: usize) -> Self {
        Self {
            data: vec![T::zero(); len],
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T: Scalar> ComponentArray<T> for MemberArray<T> {
    #[inline]
    fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn get(&self, index: usize) -> T {
        self.data[index]
    }

    fn memory_range(&self) -> Option<MemoryRange> {
        Some(MemoryRange::of_slice(&self.data))
    }

    fn as_slice(&self) -> Option<&[T]> {
        Some(&self.data)
    }

    fn name() -> &'static str {
        "member"
    }
}

impl<T: Scalar> ComponentArrayMut<T> for MemberArray<T> {
    #[inline]
    fn set(&mut self, index: usize, value: T) {
        self.data[index] = value;
    }
}

/// Mutable view of caller-owned memory.
#[derive(Debug)]
pub struct PreallocatedArray<'a, T: Scalar> {
    data: &'a mut [T],
}

impl<'a, T: Scalar> PreallocatedArray<'a, T> {
    pub fn new(data: &'a mut [T]) -> Self {
        Self { data }
    }
}

impl<T: Scalar> ComponentArray<T> for PreallocatedArray<'_, T> {
    #[inline]
    fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn get(&self, index: usize) -> T {
        self.data[index]
    }

    fn memory_range(&self) -> Option<MemoryRange> {
        Some(MemoryRange::of_slice(self.data))
    }

    fn as_slice(&self) -> Option<&[T]> {
        Some(self.data)
    }

    fn name() -> &'static str {
        "preallocated"
    }
}

impl<T: Scalar> ComponentArrayMut<T> for PreallocatedArray<'_, T> {
    #[inline]
    fn set(&mut self, index: usize, value: T) {
        self.data[index] = value;
    }
}

/// Read-only view of caller-owned memory.
#[derive(Debug, Clone, Copy)]
pub struct ConstPreallocatedArray<'a, T: Scalar> {
    data: &'a [T],
}

impl<'a, T: Scalar> ConstPreallocatedArray<'a, T> {
    pub fn new(data: &'a [T]) -> Self {
        Self { data }
    }
}

impl<T: Scalar> ComponentArray<T> for ConstPreallocatedArray<'_, T> {
    #[inline]
    fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn get(&self, index: usize) -> T {
        self.data[index]
    }

    fn memory_range(&self) -> Option<MemoryRange> {
        Some(MemoryRange::of_slice(self.data))
    }

    fn as_slice(&self) -> Option<&[T]> {
        Some(self.data)
    }

    fn name() -> &'static str {
        "const-preallocated"
    }
}

/// View of caller-owned cells.
///
/// Several shared arrays may view the same cells, so a tensor written through
/// one of them can be an operand of the expression being assigned.
#[derive(Debug, Clone, Copy)]
pub struct SharedArray<'a, T: Scalar> {
    cells: &'a [Cell<T>],
}

impl<'a, T: Scalar> SharedArray<'a, T> {
    pub fn new(cells: &'a [Cell<T>]) -> Self {
        Self { cells }
    }

    /// View a mutable slice as cells.
    pub fn from_mut(data: &'a mut [T]) -> Self {
        Self {
            cells: Cell::from_mut(data).as_slice_of_cells(),
        }
    }
}

impl<T: Scalar> ComponentArray<T> for SharedArray<'_, T> {
    #[inline]
    fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    fn get(&self, index: usize) -> T {
        self.cells[index].get()
    }

    fn memory_range(&self) -> Option<MemoryRange> {
        Some(MemoryRange::of_slice(self.cells))
    }

    fn name() -> &'static str {
        "shared"
    }
}

impl<T: Scalar> ComponentArrayMut<T> for SharedArray<'_, T> {
    #[inline]
    fn set(&mut self, index: usize, value: T) {
        self.cells[index].set(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_array() {
        let mut a = MemberArray::new(vec![1i32, 2, 3]);
        a.set(1, 7);
        assert_eq!(a.get(1), 7);
        assert_eq!(a.as_slice(), Some(&[1, 7, 3][..]));
        assert_eq!(MemberArray::<f64>::zeros(2).into_vec(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_shared_arrays_see_each_other() {
        let mut data = [1.0f64, 2.0, 3.0];
        let cells = Cell::from_mut(&mut data[..]).as_slice_of_cells();
        let mut writer = SharedArray::new(cells);
        let reader = SharedArray::new(cells);
        writer.set(0, 9.0);
        assert_eq!(reader.get(0), 9.0);
        assert_eq!(writer.memory_range(), reader.memory_range());
    }

    #[test]
    fn test_preallocated_writes_through() {
        let mut data = [0u32; 4];
        {
            let mut a = PreallocatedArray::new(&mut data);
            a.set(3, 5);
        }
        assert_eq!(data[3], 5);
        let c = ConstPreallocatedArray::new(&data);
        assert_eq!(c.get(3), 5);
    }
}
