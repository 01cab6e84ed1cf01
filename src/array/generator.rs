//! Procedural component generators.

use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::{ComponentArray, MemoryRange};
use crate::algebra::Scalar;

/// Identity key of a generator. Generators with equal keys and dimensions
/// are treated as the same generator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeneratorId(Cow<'static, str>);

impl GeneratorId {
    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GeneratorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for GeneratorId {
    fn from(id: &'static str) -> Self {
        Self::new(id)
    }
}

impl From<String> for GeneratorId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

static NEXT_SNAPSHOT: AtomicUsize = AtomicUsize::new(0);

type Evaluator<T> = Arc<dyn Fn(usize) -> T + Send + Sync>;

/// A pure function from flat component index to scalar.
///
/// # Example
///
/// ```rust,ignore
/// use tenh::array::ComponentGenerator;
///
/// let ramp = ComponentGenerator::new("ramp", 4, |k| k as f64);
/// assert_eq!(ramp.evaluate(3), 3.0);
/// ```
#[derive(Clone)]
pub struct ComponentGenerator<T: Scalar> {
    id: GeneratorId,
    dimension: usize,
    evaluator: Evaluator<T>,
}

impl<T: Scalar> ComponentGenerator<T> {
    pub fn new<F>(id: impl Into<GeneratorId>, dimension: usize, evaluator: F) -> Self
    where
        F: Fn(usize) -> T + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            dimension,
            evaluator: Arc::new(evaluator),
        }
    }

    /// A generator serving a copy of `values`, with an id no other generator shares.
    pub fn snapshot(values: Vec<T>) -> Self {
        let id = format!("snapshot#{}", NEXT_SNAPSHOT.fetch_add(1, Ordering::Relaxed));
        let values: Arc<[T]> = values.into();
        Self::new(id, values.len(), move |p| values[p])
    }

    /// Every component zero.
    pub fn zero(dimension: usize) -> Self {
        Self::new("zero", dimension, |_| T::zero())
    }

    /// Every component equal to `value`.
    pub fn constant(dimension: usize, value: T) -> Self {
        Self::new(format!("constant({:?})", value), dimension, move |_| value)
    }

    /// The standard basis vector `e_k`.
    pub fn characteristic(dimension: usize, k: usize) -> Self {
        Self::new(format!("characteristic({})", k), dimension, move |p| {
            if p == k {
                T::one()
            } else {
                T::zero()
            }
        })
    }

    /// Identity over a row-major `n × n` 2-tensor.
    pub fn identity(n: usize) -> Self {
        Self::new("identity", n * n, move |p| {
            if p / n == p % n {
                T::one()
            } else {
                T::zero()
            }
        })
    }

    #[inline]
    pub fn id(&self) -> &GeneratorId {
        &self.id
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Component at flat index `index`.
    #[inline]
    pub fn evaluate(&self, index: usize) -> T {
        debug_assert!(
            index < self.dimension,
            "Component {} out of range for generator {} of dimension {}",
            index,
            self.id,
            self.dimension
        );
        (self.evaluator)(index)
    }
}

impl<T: Scalar> PartialEq for ComponentGenerator<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.dimension == other.dimension
    }
}

impl<T: Scalar> Eq for ComponentGenerator<T> {}

impl<T: Scalar> fmt::Debug for ComponentGenerator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentGenerator")
            .field("id", &self.id)
            .field("dimension", &self.dimension)
            .finish()
    }
}

/// Component array with no storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProceduralArray<T: Scalar> {
    generator: ComponentGenerator<T>,
}

impl<T: Scalar> ProceduralArray<T> {
    pub fn new(generator: ComponentGenerator<T>) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &ComponentGenerator<T> {
        &self.generator
    }
}

impl<T: Scalar> ComponentArray<T> for ProceduralArray<T> {
    #[inline]
    fn len(&self) -> usize {
        self.generator.dimension()
    }

    #[inline]
    fn get(&self, index: usize) -> T {
        self.generator.evaluate(index)
    }

    fn memory_range(&self) -> Option<MemoryRange> {
        None
    }

    fn to_generator(&self, _dimension: usize) -> ComponentGenerator<T> {
        self.generator.clone()
    }

    fn name() -> &'static str {
        "procedural"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_generators() {
        let e1 = ComponentGenerator::<i32>::characteristic(3, 1);
        assert_eq!((0..3).map(|p| e1.evaluate(p)).collect::<Vec<_>>(), vec![0, 1, 0]);

        let id = ComponentGenerator::<f64>::identity(2);
        assert_eq!(id.dimension(), 4);
        assert_eq!((0..4).map(|p| id.evaluate(p)).collect::<Vec<_>>(), vec![1.0, 0.0, 0.0, 1.0]);

        assert_eq!(ComponentGenerator::<f32>::zero(5).evaluate(4), 0.0);
        assert_eq!(ComponentGenerator::constant(2, 7u64).evaluate(1), 7);
    }

    #[test]
    fn test_equality_by_id_and_dimension() {
        let a = ComponentGenerator::<f64>::new("ramp", 3, |k| k as f64);
        let b = ComponentGenerator::<f64>::new("ramp", 3, |k| 2.0 * k as f64);
        let c = ComponentGenerator::<f64>::new("ramp", 4, |k| k as f64);
        let d = ComponentGenerator::<f64>::new("other", 3, |k| k as f64);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn test_snapshot_ids_are_unique() {
        let a = ComponentGenerator::snapshot(vec![1.0f64, 2.0]);
        let b = ComponentGenerator::snapshot(vec![1.0f64, 2.0]);
        assert_ne!(a, b);
        assert_eq!(a.evaluate(1), 2.0);
    }

    #[test]
    fn test_procedural_array_has_no_memory() {
        let array = ProceduralArray::new(ComponentGenerator::<f64>::identity(3));
        assert_eq!(array.len(), 9);
        assert_eq!(array.get(4), 1.0);
        assert!(array.memory_range().is_none());
    }
}
