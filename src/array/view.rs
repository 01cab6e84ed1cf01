//! Borrowed sub-views of a component array.

use std::marker::PhantomData;

use super::{ComponentArray, ComponentArrayMut, ComponentGenerator, MemoryRange};
use crate::algebra::Scalar;

/// Read-only window `[offset, offset + len)` into another array.
///
/// Inherits the backing of the viewed array: stored arrays give views of
/// their memory, procedural arrays give procedural views.
#[derive(Debug)]
pub struct SubArray<'a, T: Scalar, A: ComponentArray<T>> {
    base: &'a A,
    offset: usize,
    len: usize,
    _scalar: PhantomData<T>,
}

impl<'a, T: Scalar, A: ComponentArray<T>> SubArray<'a, T, A> {
    pub fn new(base: &'a A, offset: usize, len: usize) -> Self {
        assert!(
            offset + len <= base.len(),
            "View [{}, {}) exceeds array of length {}",
            offset,
            offset + len,
            base.len()
        );
        Self {
            base,
            offset,
            len,
            _scalar: PhantomData,
        }
    }
}

/// Writable window `[offset, offset + len)` into another array.
#[derive(Debug)]
pub struct SubArrayMut<'a, T: Scalar, A: ComponentArrayMut<T>> {
    base: &'a mut A,
    offset: usize,
    len: usize,
    _scalar: PhantomData<T>,
}

impl<'a, T: Scalar, A: ComponentArrayMut<T>> SubArrayMut<'a, T, A> {
    pub fn new(base: &'a mut A, offset: usize, len: usize) -> Self {
        assert!(
            offset + len <= base.len(),
            "View [{}, {}) exceeds array of length {}",
            offset,
            offset + len,
            base.len()
        );
        Self {
            base,
            offset,
            len,
            _scalar: PhantomData,
        }
    }
}

fn narrow(range: MemoryRange, offset: usize, len: usize, element: usize) -> MemoryRange {
    range.narrow(offset * element, len * element)
}

macro_rules! impl_sub_array {
    ($name:ident, $bound:ident) => {
        impl<T: Scalar, A: $bound<T>> ComponentArray<T> for $name<'_, T, A> {
            #[inline]
            fn len(&self) -> usize {
                self.len
            }

            #[inline]
            fn get(&self, index: usize) -> T {
                debug_assert!(index < self.len);
                self.base.get(self.offset + index)
            }

            fn memory_range(&self) -> Option<MemoryRange> {
                let element = std::mem::size_of::<T>();
                self.base
                    .memory_range()
                    .map(|r| narrow(r, self.offset, self.len, element))
            }

            fn as_slice(&self) -> Option<&[T]> {
                self.base
                    .as_slice()
                    .map(|s| &s[self.offset..self.offset + self.len])
            }

            fn to_generator(&self, dimension: usize) -> ComponentGenerator<T> {
                let base = self.base.to_generator(self.base.len());
                let offset = self.offset;
                ComponentGenerator::new(
                    format!("{}[{}..]", base.id(), offset),
                    dimension,
                    move |p| base.evaluate(offset + p),
                )
            }

            fn name() -> &'static str {
                A::name()
            }
        }
    };
}

impl_sub_array!(SubArray, ComponentArray);
impl_sub_array!(SubArrayMut, ComponentArrayMut);

impl<T: Scalar, A: ComponentArrayMut<T>> ComponentArrayMut<T> for SubArrayMut<'_, T, A> {
    #[inline]
    fn set(&mut self, index: usize, value: T) {
        debug_assert!(index < self.len);
        self.base.set(self.offset + index, value);
    }
}
