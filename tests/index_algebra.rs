//! Property tests for the index maps behind bundling and splitting.

use proptest::prelude::*;
use tenh::conceptual::index_map::{self, Sign};
use tenh::index::{row_major_offset, row_major_split};
use tenh::{Concept, Field, MultiIndex};

proptest! {
    #[test]
    fn row_major_split_inverts_offset(dims in prop::collection::vec(1usize..5, 1..5), seed in any::<usize>()) {
        let total: usize = dims.iter().product();
        let flat = seed % total;
        let values = row_major_split(flat, &dims);
        prop_assert!(values.iter().zip(&dims).all(|(v, d)| v < d));
        prop_assert_eq!(row_major_offset(&values, &dims), flat);
    }

    #[test]
    fn symmetric_bundle_ignores_order(mut parts in prop::collection::vec(0usize..6, 1..5)) {
        let flat = index_map::symmetric_bundle(&parts);
        parts.reverse();
        prop_assert_eq!(index_map::symmetric_bundle(&parts), flat);
        let split = index_map::symmetric_split(flat, parts.len());
        parts.sort_unstable_by(|a, b| b.cmp(a));
        prop_assert_eq!(split, parts);
    }

    #[test]
    fn symmetric_split_inverts_bundle(order in 1usize..4, n in 1usize..6, seed in any::<usize>()) {
        let dim = index_map::symmetric_dimension(order, n);
        let flat = seed % dim;
        let parts = index_map::symmetric_split(flat, order);
        prop_assert!(parts.iter().all(|&p| p < n));
        prop_assert_eq!(index_map::symmetric_bundle(&parts), flat);
    }

    #[test]
    fn exterior_split_inverts_bundle(order in 1usize..4, extra in 0usize..4, seed in any::<usize>()) {
        let n = order + extra;
        let dim = index_map::exterior_dimension(order, n);
        let flat = seed % dim;
        let parts = index_map::exterior_split(flat, order);
        prop_assert!(parts.windows(2).all(|w| w[0] > w[1]));
        prop_assert!(parts.iter().all(|&p| p < n));
        prop_assert_eq!(index_map::exterior_bundle(&parts), Some((flat, Sign::Positive)));
    }

    #[test]
    fn multi_index_visits_every_component_once(dims in prop::collection::vec(0usize..4, 1..4)) {
        let mut m = MultiIndex::new(dims.clone());
        let mut seen = Vec::new();
        while !m.is_at_end() {
            seen.push(m.bundle());
            m.increment();
        }
        let total: usize = dims.iter().product();
        prop_assert_eq!(seen, (0..total).collect::<Vec<_>>());
    }

    #[test]
    fn concept_bundle_split_roundtrip(order in 2usize..4, n in 2usize..5, seed in any::<usize>()) {
        let x = Concept::standard(Field::Real, n, "X");
        for concept in [
            Concept::tensor_power(order, x.clone()),
            Concept::symmetric_power(order, x.clone()),
            Concept::exterior_power(order.min(n), x.clone()),
        ] {
            let flat = seed % concept.dimension();
            let parts = concept.split_index(flat);
            prop_assert_eq!(concept.bundle_index(&parts), Some((flat, Sign::Positive)));
        }
    }
}
