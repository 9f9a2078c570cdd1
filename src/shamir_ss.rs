//! Shamir secret sharing over the scalar field. The dealer samples a random polynomial of
//! degree `threshold - 1` and hands out evaluations at the one-based participant positions;
//! the constant term is the pooled secret and is never evaluated at 0 for any participant.

use ark_ff::PrimeField;
use ark_poly::{univariate::DensePolynomial, DenseUVPolynomial, Polynomial};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{cfg_into_iter, collections::BTreeSet, rand::RngCore, vec::Vec};
use dock_crypto_utils::serde_utils::ArkObjectBytes;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{
    common,
    common::ShareId,
    error::PVSSError,
};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Share used in Shamir secret sharing, an evaluation of the sharing polynomial at `id`
#[serde_as]
#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    Zeroize,
    ZeroizeOnDrop,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
)]
pub struct Share<F: PrimeField> {
    #[zeroize(skip)]
    pub id: ShareId,
    #[zeroize(skip)]
    pub threshold: ShareId,
    #[serde_as(as = "ArkObjectBytes")]
    pub share: F,
}

/// Collection of `Share`s. A sufficient number of `Share`s reconstruct the secret.
/// Expects unique shares, i.e. each share has a different `ShareId` and each has the same threshold.
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct Shares<F: PrimeField>(pub Vec<Share<F>>);

impl<F: PrimeField> From<(ShareId, ShareId, F)> for Share<F> {
    fn from((i, t, s): (ShareId, ShareId, F)) -> Self {
        Share {
            id: i,
            threshold: t,
            share: s,
        }
    }
}

impl<F: PrimeField> Shares<F> {
    pub fn threshold(&self) -> ShareId {
        self.0[0].threshold
    }

    /// Reconstruct the secret. Assumes that shares have the same threshold; ids must be
    /// nonzero and pairwise distinct
    pub fn reconstruct_secret(&self) -> Result<F, PVSSError> {
        let threshold = self.threshold();
        let len = self.0.len() as ShareId;
        if threshold > len {
            return Err(PVSSError::BelowThreshold(threshold, len));
        }
        let shares = &self.0[0..threshold as usize];
        let mut share_ids = Vec::with_capacity(shares.len());
        let mut seen = BTreeSet::new();
        for share in shares {
            if !seen.insert(share.id) {
                return Err(PVSSError::DuplicateShareId(share.id));
            }
            share_ids.push(share.id);
        }
        let basis = common::lagrange_basis_at_0_for_all::<F>(share_ids)?;
        Ok(cfg_into_iter!(basis)
            .zip(cfg_into_iter!(shares))
            .map(|(b, s)| b * s.share)
            .sum::<F>())
    }
}

/// Generate a random secret with its shares according to Shamir secret sharing.
/// At least `threshold` number of shares are needed to reconstruct the secret.
/// Returns the secret, shares and the polynomial whose evaluations are the secret and the shares
pub fn deal_random_secret<R: RngCore, F: PrimeField>(
    rng: &mut R,
    threshold: ShareId,
    total: ShareId,
) -> Result<(F, Shares<F>, DensePolynomial<F>), PVSSError> {
    let secret = F::rand(rng);
    let (shares, poly) = deal_secret(rng, secret, threshold, total)?;
    Ok((secret, shares, poly))
}

/// Same as `deal_random_secret` above but accepts the secret to share. A single participant
/// (`threshold = total = 1`) is legal and yields a constant polynomial, i.e. trivial sharing.
pub fn deal_secret<R: RngCore, F: PrimeField>(
    rng: &mut R,
    secret: F,
    threshold: ShareId,
    total: ShareId,
) -> Result<(Shares<F>, DensePolynomial<F>), PVSSError> {
    if threshold < 1 || threshold > total {
        return Err(PVSSError::InvalidThresholdOrTotal(threshold, total));
    }
    let mut coeffs = Vec::with_capacity(threshold as usize);
    coeffs.append(&mut (0..threshold - 1).map(|_| F::rand(rng)).collect());
    coeffs.insert(0, secret);
    let poly = DensePolynomial::from_coefficients_vec(coeffs);
    let shares = cfg_into_iter!((1..=total))
        .map(|i| (i as ShareId, threshold, poly.evaluate(&F::from(i as u64))).into())
        .collect::<Vec<_>>();
    Ok((Shares(shares), poly))
}
