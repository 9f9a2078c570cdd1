//! The dealer's side of the protocol: distribution of a secret into publicly verifiable
//! encrypted shares, and decryption of a single share by its recipient.
//!
//! To distribute a secret to `n` parties with public keys `pk_i = g * x_i` such that any
//! `threshold` of them can recover it, the dealer samples a random polynomial `P` of degree
//! `threshold - 1`, commits to every coefficient as `C_j = h * a_j` and encrypts the share for
//! party `i` (at one-based position `i`, position 0 being the secret itself) as
//! `Y_i = pk_i * P(i)`. A proof for `DLEQ(h, h * P(i), pk_i, Y_i)` ties each ciphertext to the
//! commitments: anyone can recompute `h * P(i)` as `\sum_j C_j * i^j` and check the proof, so
//! a dealer cannot hand out inconsistent shares without being caught. The pooled secret
//! `P(0)` never leaves the dealer; the actual secret bytes are published XOR-masked with the
//! hash of `g * P(0)`, which only a threshold of decrypted shares can recover.
//!
//! Decryption undoes the encryption exponent: `S_i = Y_i * (1 / x_i) = g * P(i)`. The
//! recipient publishes `S_i` with a proof for `DLEQ(g, pk_i, S_i, S_i * x_i)`, which anyone
//! can check against the party's public key, making cheating during reconstruction evident.

use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{Field, PrimeField};
use ark_poly::univariate::DensePolynomial;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{cfg_iter, rand::RngCore, vec::Vec};
use digest::Digest;
use dock_crypto_utils::serde_utils::ArkObjectBytes;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::Zeroize;

use crate::{
    common::{CommitmentToCoefficients, Generators, ParticipantId, ShareId},
    dleq::DleqProof,
    error::PVSSError,
    hashing::{hash_affine_points, xor_bytes},
    shamir_ss,
};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Share of the secret encrypted for one party, with the dealer's proof that it is consistent
/// with the coefficient commitments. The committed value `h * P(i)` is not stored; verifiers
/// recompute it from the commitments and `id`.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct EncryptedShare<G: AffineRepr> {
    pub id: ShareId,
    pub threshold: ShareId,
    #[serde_as(as = "ArkObjectBytes")]
    pub public_key: G,
    /// `pk_i * P(i)`, decryptable only by the holder of the matching secret key
    #[serde_as(as = "ArkObjectBytes")]
    pub share: G,
    /// Proof for `DLEQ(h, h * P(i), pk_i, share)`
    pub proof: DleqProof<G>,
}

/// Share of the secret in the clear, `g * P(i)`, with the recipient's proof that it really is
/// the decryption of the share encrypted to their key
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct DecryptedShare<G: AffineRepr> {
    pub id: ShareId,
    #[serde_as(as = "ArkObjectBytes")]
    pub public_key: G,
    /// `g * P(i)`
    #[serde_as(as = "ArkObjectBytes")]
    pub share: G,
    /// `share * x_i`, the decrypted share re-encrypted under the party's own key; equals the
    /// dealer's ciphertext when both sides are honest
    #[serde_as(as = "ArkObjectBytes")]
    pub reencrypted_share: G,
    /// Proof for `DLEQ(g, pk_i, share, reencrypted_share)`
    pub proof: DleqProof<G>,
}

/// Everything the dealer publishes: the coefficient commitments on `h`, one encrypted share
/// per party, and the masked secret. The whole box is verifiable from public data alone.
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct DistributionSharesBox<G: AffineRepr> {
    pub commitments: CommitmentToCoefficients<G>,
    pub shares: Vec<EncryptedShare<G>>,
    /// The secret bytes XOR-ed with the hash of `g * P(0)`, under numeric big-endian
    /// semantics: the shorter operand is left-padded with zeros, leading zeros of the result
    /// are dropped
    pub masked_secret: Vec<u8>,
}

/// Split `secret` into publicly verifiable encrypted shares, one per public key, any
/// `threshold` of which suffice to reconstruct it. Public keys must be distinct, non-identity
/// points, given in increasing order of the one-based participant position, i.e.
/// `public_keys[i]` belongs to position `i + 1`.
///
/// The secret must not be longer than the digest output, since the mask it is XOR-ed with is a
/// single digest block; longer secrets are rejected rather than partially masked.
pub fn deal_secret<R: RngCore, G: AffineRepr, D: Digest>(
    rng: &mut R,
    secret: &[u8],
    threshold: ShareId,
    public_keys: Vec<G>,
    gens: &Generators<G>,
) -> Result<DistributionSharesBox<G>, PVSSError>
where
    G::BaseField: PrimeField,
{
    // Numeric semantics: leading zero bytes do not contribute to the masked value
    let offset = secret.iter().position(|b| *b != 0).unwrap_or(secret.len());
    let secret = &secret[offset..];
    if secret.len() > <D as Digest>::output_size() {
        return Err(PVSSError::SecretTooLong(
            secret.len(),
            <D as Digest>::output_size(),
        ));
    }
    let total = ShareId::try_from(public_keys.len())
        .map_err(|_| PVSSError::InvalidThresholdOrTotal(threshold, ShareId::MAX))?;
    for (i, pk) in public_keys.iter().enumerate() {
        if pk.is_zero() {
            return Err(PVSSError::PublicKeyCannotBeIdentity(
                i as ParticipantId + 1,
            ));
        }
    }

    let (mut pooled_secret, shares, mut poly) =
        shamir_ss::deal_random_secret::<R, G::ScalarField>(rng, threshold, total)?;
    let commitments: CommitmentToCoefficients<G> = commit_to_poly(&poly, &gens.h).into();

    let mut enc_shares = Vec::with_capacity(shares.0.len());
    for (pk, share) in public_keys.iter().zip(shares.0.iter()) {
        let (proof, _, encrypted) =
            DleqProof::new::<_, D>(rng, &share.share, &gens.h, None, pk, None)?;
        enc_shares.push(EncryptedShare {
            id: share.id,
            threshold: share.threshold,
            public_key: *pk,
            share: encrypted,
            proof,
        });
    }

    let masked_secret = xor_bytes(
        secret,
        &hash_affine_points::<D, G>(&[(gens.g * pooled_secret).into_affine()]),
    );

    // The sharing polynomial, and with it the pooled secret, must not outlive distribution
    poly.coeffs.zeroize();
    pooled_secret.zeroize();

    Ok(DistributionSharesBox {
        commitments,
        shares: enc_shares,
        masked_secret,
    })
}

pub(crate) fn commit_to_poly<G: AffineRepr>(
    poly: &DensePolynomial<G::ScalarField>,
    ck: &G,
) -> Vec<G> {
    G::Group::normalize_batch(
        &cfg_iter!(poly.coeffs)
            .map(|i| ck.mul_bigint(i.into_bigint()))
            .collect::<Vec<_>>(),
    )
}

impl<G: AffineRepr> DistributionSharesBox<G> {
    /// Decrypt this party's share and prove the decryption correct. The share belonging to
    /// `secret_key` is located by the public key derived from it.
    pub fn extract_secret_share<R: RngCore, D: Digest>(
        &self,
        rng: &mut R,
        secret_key: &G::ScalarField,
        gens: &Generators<G>,
    ) -> Result<DecryptedShare<G>, PVSSError>
    where
        G::BaseField: PrimeField,
    {
        let public_key = (gens.g * *secret_key).into_affine();
        let share = self
            .shares
            .iter()
            .find(|s| s.public_key == public_key)
            .ok_or(PVSSError::NoShareForParticipant)?;
        let sk_inv = secret_key.inverse().ok_or(PVSSError::ZeroSecretKey)?;
        let decrypted = (share.share * sk_inv).into_affine();
        let (proof, _, reencrypted) = DleqProof::new::<_, D>(
            rng,
            secret_key,
            &gens.g,
            Some(public_key),
            &decrypted,
            None,
        )?;
        Ok(DecryptedShare {
            id: share.id,
            public_key,
            share: decrypted,
            reencrypted_share: reencrypted,
            proof,
        })
    }
}
