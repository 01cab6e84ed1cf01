//! Standard inner products as procedural tensors.
//!
//! The inner product on a concept `C` is a symmetric 2-tensor over the dual,
//! an element of `Sym²(C*)`, computed on demand from the inner products of
//! `C`'s factors:
//!
//! | concept | inner product |
//! |---------|---------------|
//! | based space, standard basis | identity |
//! | tensor product / power | head ⊗ body, recursively |
//! | symmetric / exterior power | diagonal, weighted by permutation multiplicity |
//! | diagonal 2-tensors | identity |
//! | direct sum | block diagonal |

use std::sync::Arc;

use tracing::debug;

use super::direct_sum::component_for_offset;
use crate::algebra::{self, Scalar};
use crate::array::ComponentGenerator;
use crate::conceptual::{index_map, Concept};
use crate::error::{Result, TenhError};
use crate::tensor::ProceduralTensor;

/// `g(p, q)` over flat component indices of a concept.
type Metric<T> = Arc<dyn Fn(usize, usize) -> T + Send + Sync>;

fn identity<T: Scalar>() -> Metric<T> {
    Arc::new(|p, q| if p == q { T::one() } else { T::zero() })
}

/// Diagonal metric of a symmetric or exterior power of `factor`.
fn power_metric<T: Scalar>(order: usize, factor: &Concept, concept: &Concept) -> Result<Metric<T>> {
    if order == 0 {
        return Err(TenhError::OrderMustBePositive);
    }
    if !factor.is_euclidean() {
        return Err(TenhError::NoInnerProduct(concept.to_string()));
    }
    let inner = metric::<T>(factor)?;
    let concept = concept.clone();
    Ok(Arc::new(move |p, q| {
        if p != q {
            return T::zero();
        }
        let parts = concept.split_index(p);
        let weight = (0..index_map::permutation_multiplicity(&parts)).map(|_| T::one());
        parts
            .iter()
            .fold(algebra::sum(weight), |acc, &m| acc * inner(m, m))
    }))
}

fn metric<T: Scalar>(concept: &Concept) -> Result<Metric<T>> {
    match concept {
        Concept::Space(space) => {
            if space.basis().is_standard() {
                Ok(identity())
            } else {
                Err(TenhError::NoInnerProduct(concept.to_string()))
            }
        }
        Concept::TensorProduct(factors) => match factors.as_slice() {
            [] => Ok(Arc::new(|_, _| T::one())),
            [only] => metric(only),
            [head, rest @ ..] => {
                let body = Concept::tensor_product(rest.to_vec());
                Ok(product_metric(metric(head)?, metric(&body)?, body.dimension()))
            }
        },
        Concept::TensorPower { order, factor } => match order {
            0 => Err(TenhError::OrderMustBePositive),
            1 => metric(factor),
            _ => {
                let body = Concept::tensor_power(order - 1, factor.as_ref().clone());
                Ok(product_metric(metric(factor)?, metric(&body)?, body.dimension()))
            }
        },
        Concept::SymmetricPower { order, factor } | Concept::ExteriorPower { order, factor } => {
            power_metric(*order, factor, concept)
        }
        Concept::Diagonal2Tensor(a, b) => {
            if a.is_euclidean() && b.is_euclidean() {
                Ok(identity())
            } else {
                Err(TenhError::NoInnerProduct(concept.to_string()))
            }
        }
        Concept::DirectSum(summands) => {
            let blocks = summands.iter().map(metric).collect::<Result<Vec<Metric<T>>>>()?;
            let summands = summands.clone();
            Ok(Arc::new(move |p, q| {
                let (n, local_p) = component_for_offset(&summands, p);
                let (m, local_q) = component_for_offset(&summands, q);
                if n == m {
                    blocks[n](local_p, local_q)
                } else {
                    T::zero()
                }
            }))
        }
    }
}

/// Combine head and body metrics over the row-major split `p = p_head * dim(body) + p_body`.
fn product_metric<T: Scalar>(head: Metric<T>, body: Metric<T>, body_dim: usize) -> Metric<T> {
    Arc::new(move |p, q| head(p / body_dim, q / body_dim) * body(p % body_dim, q % body_dim))
}

/// The standard inner product on `concept`, a procedural tensor over `Sym²(concept*)`.
///
/// # Errors
///
/// [`TenhError::NoInnerProduct`] when some underlying space has a
/// non-standard basis, [`TenhError::OrderMustBePositive`] for zeroth powers.
pub fn inner_product<T: Scalar>(concept: &Concept) -> Result<ProceduralTensor<T>> {
    let g = metric::<T>(concept)?;
    let target = Concept::symmetric_power(2, concept.dual());
    debug!(concept = %concept, dimension = target.dimension(), "inner product");
    let generator = ComponentGenerator::new(
        format!("inner_product({})", concept),
        target.dimension(),
        move |flat| {
            let pq = index_map::symmetric_split(flat, 2);
            g(pq[0], pq[1])
        },
    );
    ProceduralTensor::procedural(target, generator)
}

/// `Σ_{p,q} x_p x_q g(p, q)` for the components `x` of a tensor over `concept`.
pub(crate) fn squared_norm_of<T: Scalar>(
    concept: &Concept,
    component: impl Fn(usize) -> T,
) -> Result<T::Real> {
    let g = inner_product::<T>(concept)?;
    let n = concept.dimension();
    let x: Vec<T> = (0..n).map(component).collect();
    let terms = (0..n).flat_map(|p| {
        let (x, g) = (&x, &g);
        (0..n).map(move |q| x[p] * x[q] * g.component(index_map::symmetric_bundle(&[p, q])))
    });
    Ok(algebra::sum(terms).to_real())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conceptual::{Basis, Field, VectorSpace};

    fn x(n: usize) -> Concept {
        Concept::standard(Field::Real, n, "X")
    }

    fn full_matrix(g: &ProceduralTensor<i64>, n: usize) -> Vec<Vec<i64>> {
        (0..n)
            .map(|p| {
                (0..n)
                    .map(|q| g.component(index_map::symmetric_bundle(&[p, q])))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_standard_space_is_identity() {
        let g = inner_product::<i64>(&x(3)).unwrap();
        assert_eq!(g.concept(), &Concept::symmetric_power(2, x(3).dual()));
        assert_eq!(full_matrix(&g, 3), vec![vec![1, 0, 0], vec![0, 1, 0], vec![0, 0, 1]]);
    }

    #[test]
    fn test_symmetric_power_weights() {
        let sym = Concept::symmetric_power(2, x(2));
        let g = inner_product::<i64>(&sym).unwrap();
        // components (0,0), (1,0), (1,1)
        assert_eq!(full_matrix(&g, 3), vec![vec![1, 0, 0], vec![0, 2, 0], vec![0, 0, 1]]);
    }

    #[test]
    fn test_exterior_power_weights() {
        let ext = Concept::exterior_power(3, x(4));
        let g = inner_product::<i64>(&ext).unwrap();
        let m = full_matrix(&g, 4);
        assert!((0..4).all(|p| m[p][p] == 6));
    }

    #[test]
    fn test_direct_sum_is_block_diagonal() {
        let sum = Concept::direct_sum(vec![x(1), Concept::symmetric_power(2, x(2))]);
        let g = inner_product::<i64>(&sum).unwrap();
        let m = full_matrix(&g, 4);
        assert_eq!(m[0], vec![1, 0, 0, 0]);
        assert_eq!(m[2], vec![0, 0, 2, 0]);
    }

    #[test]
    fn test_errors() {
        let odd = Concept::based(VectorSpace::new(Field::Real, 2, "Y"), Basis::new("odd"));
        assert!(matches!(
            inner_product::<f64>(&odd),
            Err(TenhError::NoInnerProduct(_))
        ));
        assert!(matches!(
            inner_product::<f64>(&Concept::tensor_power(0, x(2))),
            Err(TenhError::OrderMustBePositive)
        ));
        assert!(matches!(
            inner_product::<f64>(&Concept::symmetric_power(2, odd)),
            Err(TenhError::NoInnerProduct(_))
        ));
    }

    #[test]
    fn test_squared_norm_of_zero_dimensional() {
        let norm = squared_norm_of::<f64>(&x(0), |_| unreachable!()).unwrap();
        assert_eq!(norm, 0.0);
    }
}
