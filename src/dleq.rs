//! Non-interactive proof of equality of discrete logs, due to
//! [Chaum and Pedersen](https://link.springer.com/chapter/10.1007/3-540-48071-4_7).
//!
//! Given generators `g1`, `g2` whose mutual discrete log is unknown, the prover shows knowledge
//! of a single `alpha` such that `h1 = g1 * alpha` and `h2 = g2 * alpha`, without revealing
//! `alpha`. We denote the statement by `DLEQ(g1, h1, g2, h2)`.
//!
//! The interactive protocol is made non-interactive with a Fiat-Shamir challenge:
//!
//! 1. Prover samples a random blinding `w` and computes `t1 = g1 * w`, `t2 = g2 * w`.
//! 2. Prover computes the challenge `c = Hash(h1, h2, t1, t2) mod q` (see
//!    [`hashing`](crate::hashing) for the transcript encoding) and the response
//!    `r = w - alpha * c mod q`, and publishes `(c, r)`.
//! 3. Verifier recomputes `t1 = g1 * r + h1 * c`, `t2 = g2 * r + h2 * c` and accepts iff
//!    `Hash(h1, h2, t1, t2) mod q == c`.
//!
//! For an honest prover `g1 * r + h1 * c = g1 * (w - alpha * c) + g1 * (alpha * c) = t1` (and
//! likewise for `t2`), so the verifier reconstructs the prover's transcript exactly. Binding
//! both halves of the statement to one challenge is what forces the same `alpha` on both sides.

use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{rand::RngCore, UniformRand};
use digest::Digest;
use dock_crypto_utils::serde_utils::ArkObjectBytes;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::Zeroize;

use crate::{error::PVSSError, hashing::hash_points_to_field};

/// Proof for the statement `DLEQ(g1, h1, g2, h2)`. Holds only the challenge and response;
/// the statement points are carried alongside by the enclosing protocol.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct DleqProof<G: AffineRepr> {
    #[serde_as(as = "ArkObjectBytes")]
    pub challenge: G::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub response: G::ScalarField,
}

impl<G: AffineRepr> DleqProof<G>
where
    G::BaseField: PrimeField,
{
    /// Create a proof for `DLEQ(g1, h1, g2, h2)` with witness `alpha`. When `h1` or `h2` is not
    /// supplied it is computed as `g1 * alpha` resp. `g2 * alpha`; both are returned with the
    /// proof. All four statement points must be non-identity.
    ///
    /// The blinding is sampled freshly inside the prover and wiped before returning; reusing a
    /// blinding across two proofs reveals the witness.
    pub fn new<R: RngCore, D: Digest>(
        rng: &mut R,
        witness: &G::ScalarField,
        g1: &G,
        h1: Option<G>,
        g2: &G,
        h2: Option<G>,
    ) -> Result<(Self, G, G), PVSSError> {
        let h1 = h1.unwrap_or_else(|| (*g1 * *witness).into_affine());
        let h2 = h2.unwrap_or_else(|| (*g2 * *witness).into_affine());
        if g1.is_zero() || g2.is_zero() || h1.is_zero() || h2.is_zero() {
            return Err(PVSSError::PointAtInfinity);
        }
        let mut blinding = G::ScalarField::rand(rng);
        let t1 = (*g1 * blinding).into_affine();
        let t2 = (*g2 * blinding).into_affine();
        let challenge = hash_points_to_field::<D, G>(&[h1, h2, t1, t2]);
        let response = blinding - (*witness * challenge);
        blinding.zeroize();
        Ok((
            Self {
                challenge,
                response,
            },
            h1,
            h2,
        ))
    }

    /// Check the proof against the statement `(g1, h1, g2, h2)`. Malformed statements (any
    /// point at infinity) are rejected, never panicked on.
    pub fn verify<D: Digest>(&self, g1: &G, h1: &G, g2: &G, h2: &G) -> bool {
        if g1.is_zero() || g2.is_zero() || h1.is_zero() || h2.is_zero() {
            return false;
        }
        let t1 = (*g1 * self.response + *h1 * self.challenge).into_affine();
        let t2 = (*g2 * self.response + *h2 * self.challenge).into_affine();
        hash_points_to_field::<D, G>(&[*h1, *h2, t1, t2]) == self.challenge
    }
}
