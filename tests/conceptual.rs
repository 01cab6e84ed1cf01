//! Integration tests for conceptual types: duality, dimensions, index maps.

use tenh::conceptual::index_map::{self, Sign};
use tenh::{BasedVectorSpace, Basis, Concept, Field, VectorSpace};

fn x(n: usize) -> Concept {
    Concept::standard(Field::Real, n, "X")
}

fn composites() -> Vec<Concept> {
    let y = Concept::based(VectorSpace::new(Field::Complex, 3, "Y"), Basis::new("spin"));
    vec![
        x(2),
        y.clone(),
        Concept::tensor_product(vec![x(2), y.dual()]),
        Concept::tensor_power(3, x(4)),
        Concept::symmetric_power(2, y.clone()),
        Concept::exterior_power(3, x(5)),
        Concept::direct_sum(vec![x(1), Concept::symmetric_power(2, x(2))]),
        Concept::diagonal_2tensor(x(3), y.dual()),
        Concept::tensor_product(vec![]),
    ]
}

#[test]
fn test_dual_is_involution() {
    for c in composites() {
        assert_eq!(c.dual().dual(), c, "dual of dual of {}", c);
        assert_eq!(c.dual().dimension(), c.dimension());
    }
}

#[test]
fn test_dual_differs() {
    for c in composites().into_iter().filter(|c| c.dimension() > 1) {
        assert_ne!(c.dual(), c);
        assert!(c.pairs_naturally_with(&c.dual()));
        assert!(!c.pairs_naturally_with(&c));
    }
}

#[test]
fn test_dimensions() {
    let dims: Vec<usize> = composites().iter().map(Concept::dimension).collect();
    assert_eq!(dims, vec![2, 3, 6, 64, 6, 10, 4, 3, 1]);
}

#[test]
fn test_based_vector_space_conversion() {
    let space = BasedVectorSpace::new(VectorSpace::new(Field::Real, 2, "X"), Basis::standard());
    let concept: Concept = space.clone().into();
    assert_eq!(concept, x(2));
    assert_eq!(space.dual().dual(), space);
    assert!(concept.is_euclidean());
}

#[test]
fn test_display() {
    assert_eq!(x(2).to_string(), "X[2]");
    assert_eq!(x(2).dual().to_string(), "X*[2]");
    assert_eq!(
        Concept::tensor_product(vec![x(2), x(3).dual()]).to_string(),
        "(X[2] ⊗ X*[3])"
    );
}

#[test]
fn test_exterior_sign_flips_under_transposition() {
    let (flat, sign) = index_map::exterior_bundle(&[3, 1]).unwrap();
    let (flat_swapped, sign_swapped) = index_map::exterior_bundle(&[1, 3]).unwrap();
    assert_eq!(flat, flat_swapped);
    assert_eq!(sign, Sign::Positive);
    assert_eq!(sign_swapped, Sign::Negative);
    assert!(index_map::exterior_bundle(&[2, 2]).is_none());
}

#[test]
fn test_symmetric_components_enumerate_in_order() {
    let sym = Concept::symmetric_power(3, x(3));
    for flat in 0..sym.dimension() {
        let parts = sym.split_index(flat);
        assert!(parts.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(sym.bundle_index(&parts), Some((flat, Sign::Positive)));
    }
}
