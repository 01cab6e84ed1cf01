//! Index maps between flat components and factor multi-indices.
//!
//! Tensor products store components row-major over their factors. Symmetric
//! and exterior powers store one component per canonical (non-increasing,
//! respectively strictly decreasing) multi-index, numbered with the
//! combinatorial number system.

use std::cmp::Reverse;

/// Sign picked up when a multi-index is permuted into canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    fn flip(self) -> Self {
        match self {
            Sign::Positive => Sign::Negative,
            Sign::Negative => Sign::Positive,
        }
    }
}

/// Binomial coefficient `C(n, k)`, zero when `k > n`.
pub fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut acc = 1usize;
    for i in 0..k {
        acc = acc * (n - i) / (i + 1);
    }
    acc
}

/// Dimension of the `order`-th symmetric power of an `n`-dimensional space.
pub fn symmetric_dimension(order: usize, n: usize) -> usize {
    if n == 0 {
        return if order == 0 { 1 } else { 0 };
    }
    binomial(n + order - 1, order)
}

/// Dimension of the `order`-th exterior power of an `n`-dimensional space.
pub fn exterior_dimension(order: usize, n: usize) -> usize {
    binomial(n, order)
}

/// Number of distinct orderings of `parts` (the multinomial of its multiplicities).
pub fn permutation_multiplicity(parts: &[usize]) -> usize {
    let mut sorted = parts.to_vec();
    sorted.sort_unstable();
    let mut result = 1usize;
    let mut placed = 0usize;
    let mut i = 0;
    while i < sorted.len() {
        let mut run = 1;
        while i + run < sorted.len() && sorted[i + run] == sorted[i] {
            run += 1;
        }
        placed += run;
        result *= binomial(placed, run);
        i += run;
    }
    result
}

/// Sort `parts` into non-increasing order and return the sign of the permutation used.
fn sort_descending_with_sign(parts: &[usize]) -> (Vec<usize>, Sign) {
    let mut sorted = parts.to_vec();
    let mut sign = Sign::Positive;
    // insertion sort so transpositions can be counted
    for i in 1..sorted.len() {
        let mut j = i;
        while j > 0 && sorted[j - 1] < sorted[j] {
            sorted.swap(j - 1, j);
            sign = sign.flip();
            j -= 1;
        }
    }
    (sorted, sign)
}

/// Flat index of the symmetric-power component holding `parts`.
pub fn symmetric_bundle(parts: &[usize]) -> usize {
    let mut sorted = parts.to_vec();
    sorted.sort_unstable_by_key(|&p| Reverse(p));
    let order = sorted.len();
    sorted
        .iter()
        .enumerate()
        .map(|(p, &m)| binomial(m + order - p - 1, order - p))
        .sum()
}

/// Canonical (non-increasing) multi-index of a symmetric-power component.
pub fn symmetric_split(mut flat: usize, order: usize) -> Vec<usize> {
    let mut parts = Vec::with_capacity(order);
    for p in 0..order {
        let r = order - p;
        // largest c with C(c, r) <= flat, where c = m + r - 1
        let mut c = r - 1;
        while binomial(c + 1, r) <= flat {
            c += 1;
        }
        flat -= binomial(c, r);
        parts.push(c + 1 - r);
    }
    parts
}

/// Flat index and sign of the exterior-power component holding `parts`.
///
/// Returns `None` when an index repeats, where every antisymmetric component vanishes.
pub fn exterior_bundle(parts: &[usize]) -> Option<(usize, Sign)> {
    let (sorted, sign) = sort_descending_with_sign(parts);
    if sorted.windows(2).any(|w| w[0] == w[1]) {
        return None;
    }
    let order = sorted.len();
    let flat = sorted
        .iter()
        .enumerate()
        .map(|(p, &m)| binomial(m, order - p))
        .sum();
    Some((flat, sign))
}

/// Canonical (strictly decreasing) multi-index of an exterior-power component.
pub fn exterior_split(mut flat: usize, order: usize) -> Vec<usize> {
    let mut parts = Vec::with_capacity(order);
    for p in 0..order {
        let r = order - p;
        let mut c = r - 1;
        while binomial(c + 1, r) <= flat {
            c += 1;
        }
        flat -= binomial(c, r);
        parts.push(c);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binomial() {
        assert_eq!(binomial(5, 2), 10);
        assert_eq!(binomial(4, 0), 1);
        assert_eq!(binomial(2, 3), 0);
        assert_eq!(binomial(6, 6), 1);
    }

    #[test]
    fn test_symmetric_square_is_lower_triangle() {
        // (i, j) with i >= j lands at i(i+1)/2 + j
        assert_eq!(symmetric_bundle(&[0, 0]), 0);
        assert_eq!(symmetric_bundle(&[1, 0]), 1);
        assert_eq!(symmetric_bundle(&[0, 1]), 1);
        assert_eq!(symmetric_bundle(&[1, 1]), 2);
        assert_eq!(symmetric_bundle(&[2, 0]), 3);
        assert_eq!(symmetric_bundle(&[2, 2]), 5);
    }

    #[test]
    fn test_symmetric_roundtrip_cube() {
        let n = 4;
        let dim = symmetric_dimension(3, n);
        assert_eq!(dim, 20);
        for flat in 0..dim {
            let parts = symmetric_split(flat, 3);
            assert!(parts.windows(2).all(|w| w[0] >= w[1]));
            assert!(parts.iter().all(|&p| p < n));
            assert_eq!(symmetric_bundle(&parts), flat);
        }
    }

    #[test]
    fn test_exterior_roundtrip_and_sign() {
        let dim = exterior_dimension(2, 4);
        assert_eq!(dim, 6);
        for flat in 0..dim {
            let parts = exterior_split(flat, 2);
            assert!(parts[0] > parts[1]);
            assert_eq!(exterior_bundle(&parts), Some((flat, Sign::Positive)));
        }
        let (flat, sign) = exterior_bundle(&[1, 3]).unwrap();
        assert_eq!(exterior_bundle(&[3, 1]), Some((flat, Sign::Positive)));
        assert_eq!(sign, Sign::Negative);
        assert_eq!(exterior_bundle(&[2, 2]), None);
    }

    #[test]
    fn test_permutation_multiplicity() {
        assert_eq!(permutation_multiplicity(&[1, 1]), 1);
        assert_eq!(permutation_multiplicity(&[2, 1]), 2);
        assert_eq!(permutation_multiplicity(&[2, 1, 1]), 3);
        assert_eq!(permutation_multiplicity(&[3, 2, 1]), 6);
        assert_eq!(permutation_multiplicity(&[]), 1);
    }
}
