//! Integration tests for assignment when source and destination share memory.

use std::cell::Cell;

use tenh::array::SharedArray;
use tenh::{
    AbstractIndex, CheckPointer, ComponentArray, Concept, Expression, Field, MemberTensor,
    SharedTensor, Tensor,
};

fn square(n: usize) -> Concept {
    let x = Concept::standard(Field::Real, n, "X");
    Concept::tensor_product(vec![x.clone(), x])
}

fn transpose_of(data: &[f64], n: usize) -> Vec<f64> {
    (0..n * n).map(|p| data[(p % n) * n + p / n]).collect()
}

#[test]
fn test_in_place_transpose_through_shared_views() {
    let n = 3;
    let data: Vec<f64> = (0..9).map(f64::from).collect();
    let cells: Vec<Cell<f64>> = data.iter().copied().map(Cell::new).collect();
    let source = SharedTensor::shared(square(n), &cells, CheckPointer::Check).unwrap();
    let mut destination = SharedTensor::shared(square(n), &cells, CheckPointer::Check).unwrap();

    let (i, j) = (AbstractIndex::new('i'), AbstractIndex::new('j'));
    let range = destination.array().memory_range().unwrap();
    assert!(source.at(j | i).uses_memory(&range));

    destination.at_mut(i | j).assign(source.at(j | i)).unwrap();

    let result: Vec<f64> = cells.iter().map(Cell::get).collect();
    assert_eq!(result, transpose_of(&data, n));
}

#[test]
fn test_in_place_scaled_update() {
    let mut data = vec![1.0f64, 2.0, 3.0, 4.0];
    let cells = Cell::from_mut(data.as_mut_slice()).as_slice_of_cells();
    let source = SharedTensor::shared(square(2), cells, CheckPointer::Check).unwrap();
    let mut destination = SharedTensor::shared(square(2), cells, CheckPointer::Check).unwrap();
    let (i, j) = (AbstractIndex::new('i'), AbstractIndex::new('j'));

    // A ← A + Aᵀ
    destination
        .at_mut(i | j)
        .assign(source.at(i | j) + source.at(j | i))
        .unwrap();
    assert_eq!(data, vec![2.0, 5.0, 5.0, 8.0]);
}

#[test]
fn test_no_alias_on_disjoint_memory() {
    let a = MemberTensor::from_components(square(3), (0..9).map(f64::from).collect()).unwrap();
    let mut cells: Vec<f64> = vec![0.0; 9];
    let mut destination =
        Tensor::from_array(square(3), SharedArray::from_mut(&mut cells), CheckPointer::Check)
            .unwrap();
    let (i, j) = (AbstractIndex::new('i'), AbstractIndex::new('j'));

    let range = destination.array().memory_range().unwrap();
    assert!(!a.at(j | i).uses_memory(&range));
    destination.at_mut(i | j).no_alias().assign(a.at(j | i)).unwrap();
    assert_eq!(destination.to_vec(), transpose_of(&a.to_vec(), 3));
}

#[test]
fn test_cached_source_no_longer_aliases() {
    let cells: Vec<Cell<i32>> = (1..=4).map(Cell::new).collect();
    let source = SharedTensor::shared(square(2), &cells, CheckPointer::Check).unwrap();
    let mut destination = SharedTensor::shared(square(2), &cells, CheckPointer::Check).unwrap();
    let (i, j) = (AbstractIndex::new('i'), AbstractIndex::new('j'));
    let range = destination.array().memory_range().unwrap();

    let cached = source.at(j | i).eval();
    cached.value();
    assert!(!cached.uses_memory(&range));
    destination.at_mut(i | j).no_alias().assign(&cached).unwrap();
    assert_eq!(cells.iter().map(Cell::get).collect::<Vec<_>>(), vec![1, 3, 2, 4]);
}
