use ark_ec::AffineRepr;
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{cfg_into_iter, cfg_iter, vec::Vec};
use digest::Digest;
use dock_crypto_utils::{affine_group_element_from_byte_slices, serde_utils::ArkObjectBytes};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::error::PVSSError;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// ShareId must be greater than 0
pub type ShareId = u16;

/// ParticipantId must be greater than 0
pub type ParticipantId = u16;

/// The pair of group generators the protocol runs over. `g` is the curve's standard base point,
/// used for public keys and for the group element the secret is masked with. `h` is an
/// independent generator whose discrete log wrt. `g` must be unknown; coefficient commitments
/// are made on `h` so that they do not leak `g * secret`.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Generators<G: AffineRepr> {
    #[serde_as(as = "ArkObjectBytes")]
    pub g: G,
    #[serde_as(as = "ArkObjectBytes")]
    pub h: G,
}

impl<G: AffineRepr> Generators<G> {
    /// Derive `h` from a public label by hashing to the curve (try-and-increment), so no one can
    /// know its discrete log wrt. `g`. Deployments targeting an existing parameter set should use
    /// that set's fixed point instead, eg. [`secp256k1::generators`](crate::secp256k1::generators).
    pub fn new<D: Digest>(label: &[u8]) -> Self {
        Self {
            g: G::generator(),
            h: affine_group_element_from_byte_slices!(label),
        }
    }
}

/// Commitments to coefficients of the polynomial created during secret sharing, one per
/// coefficient as `h * a_j`. Anyone can recompute `h * P(i)` from these as
/// `\sum_j (h * a_j) * i^j`, which is what makes the sharing publicly verifiable.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct CommitmentToCoefficients<G: AffineRepr>(
    #[serde_as(as = "Vec<ArkObjectBytes>")] pub Vec<G>,
);

impl<G: AffineRepr> From<Vec<G>> for CommitmentToCoefficients<G> {
    fn from(coeffs: Vec<G>) -> Self {
        CommitmentToCoefficients(coeffs)
    }
}

impl<G: AffineRepr> CommitmentToCoefficients<G> {
    /// Whether these commitments belong to a sharing with the given threshold, i.e. to a
    /// polynomial of degree `threshold - 1`
    pub fn supports_threshold(&self, threshold: ShareId) -> bool {
        threshold as usize == self.0.len()
    }
}

/// Return the Lagrange basis polynomial at x = 0 given the `x` coordinates
/// `(x_coords[0]) * (x_coords[1]) * ... / ((x_coords[0] - i) * (x_coords[1] - i) * ...)`
/// Assumes all `x` coordinates are distinct and appropriate number of coordinates are provided
pub fn lagrange_basis_at_0<F: PrimeField>(x_coords: &[ShareId], i: ShareId) -> Result<F, PVSSError> {
    let mut numerator = F::one();
    let mut denominator = F::one();
    let i_f = F::from(i as u64);
    for x in x_coords {
        // Ensure no x-coordinate can be 0 since we are evaluating basis polynomial at 0
        if *x == 0 {
            return Err(PVSSError::XCordCantBeZero);
        }
        if *x == i {
            continue;
        }
        let x = F::from(*x as u64);
        numerator *= x;
        denominator *= x - i_f;
    }
    denominator.inverse_in_place().unwrap();
    Ok(numerator * denominator)
}

/// Return the Lagrange basis polynomial at x = 0 for each of the given `x` coordinates. Faster than
/// doing multiple calls to `lagrange_basis_at_0`
pub fn lagrange_basis_at_0_for_all<F: PrimeField>(
    x_coords: Vec<ShareId>,
) -> Result<Vec<F>, PVSSError> {
    let x = cfg_into_iter!(x_coords.as_slice())
        .map(|x| F::from(*x as u64))
        .collect::<Vec<_>>();
    // Ensure no x-coordinate can be 0 since we are evaluating basis polynomials at 0
    if cfg_iter!(x).any(|x_i| x_i.is_zero()) {
        return Err(PVSSError::XCordCantBeZero);
    }

    // Product of all `x`, i.e. \prod_{i}(x_i}
    let product = cfg_iter!(x).product::<F>();

    let r = cfg_into_iter!(x.clone())
        .map(move |i| {
            let mut denominator = cfg_iter!(x)
                .filter(|&j| &i != j)
                .map(|&j| j - i)
                .product::<F>();
            denominator.inverse_in_place().unwrap();

            // The numerator is of the form `x_1*x_2*...x_{i-1}*x_{i+1}*x_{i+2}*..` which is a product of all
            // `x` except `x_i` and thus can be calculated as \prod_{i}(x_i} * (1 / x_i)
            let numerator = product * i.inverse().unwrap();

            denominator * numerator
        })
        .collect::<Vec<_>>();
    Ok(r)
}
