//! Public verification of a distribution box and of decrypted shares, and reconstruction of
//! the secret from a threshold of them. Nothing here needs secret material; any observer can
//! run the checks on the dealer's published box and on the shares the parties publish during
//! reconstruction.

use ark_ec::{AffineRepr, CurveGroup, VariableBaseMSM};
use ark_ff::PrimeField;
use ark_std::{cfg_iter, collections::BTreeSet, vec::Vec};
use digest::Digest;
use dock_crypto_utils::ff::powers;

use crate::{
    common::{lagrange_basis_at_0_for_all, Generators, ShareId},
    dealer::{DecryptedShare, DistributionSharesBox},
    error::PVSSError,
    hashing::{hash_affine_points, xor_bytes},
};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

impl<G: AffineRepr> DistributionSharesBox<G> {
    /// Check that the dealer distributed consistent shares: positions must be nonzero and
    /// pairwise distinct, at least as many shares as commitments must be present, and every
    /// share must carry a valid proof against the committed value
    /// `h * P(i) = \sum_j C_j * i^j` recomputed from the coefficient commitments.
    pub fn verify<D: Digest>(&self, gens: &Generators<G>) -> Result<(), PVSSError>
    where
        G::BaseField: PrimeField,
    {
        let threshold = self.commitments.0.len();
        if self.shares.len() < threshold {
            return Err(PVSSError::BelowThreshold(
                threshold as ShareId,
                self.shares.len() as ShareId,
            ));
        }
        let mut seen = BTreeSet::new();
        for share in &self.shares {
            // Position 0 is the evaluation point of the secret and must never be dealt
            if share.id == 0 {
                return Err(PVSSError::InvalidParticipantId(share.id));
            }
            if !seen.insert(share.id) {
                return Err(PVSSError::DuplicateShareId(share.id));
            }
            if !self.commitments.supports_threshold(share.threshold) {
                return Err(PVSSError::DoesNotSupportThreshold(share.threshold));
            }
            let i_powers = powers(&G::ScalarField::from(share.id as u64), threshold as u32);
            let committed =
                G::Group::msm_unchecked(&self.commitments.0, &i_powers).into_affine();
            if !share
                .proof
                .verify::<D>(&gens.h, &committed, &share.public_key, &share.share)
            {
                return Err(PVSSError::InvalidShare);
            }
        }
        Ok(())
    }
}

impl<G: AffineRepr> DecryptedShare<G> {
    /// Check against the party's public key that `share` really is the decryption of the share
    /// that was encrypted to that key
    pub fn verify<D: Digest>(&self, gens: &Generators<G>) -> Result<(), PVSSError>
    where
        G::BaseField: PrimeField,
    {
        if self.proof.verify::<D>(
            &gens.g,
            &self.public_key,
            &self.share,
            &self.reencrypted_share,
        ) {
            Ok(())
        } else {
            Err(PVSSError::InvalidProof)
        }
    }
}

/// Reconstruct the secret from decrypted shares. The pooled group element is obtained by
/// Lagrange interpolation at 0, `\sum_i S_i * lambda_i = g * P(0)`, and unmasking with its
/// hash undoes the dealer's XOR.
///
/// Callers must supply at least `threshold` shares, each individually verified; the function
/// has no way of knowing the threshold, and with too few shares the fold still yields *a*
/// point, just not `g * P(0)`. Extra shares beyond the threshold are fine.
pub fn reconstruct_secret<G: AffineRepr, D: Digest>(
    shares: &[DecryptedShare<G>],
    masked_secret: &[u8],
) -> Result<Vec<u8>, PVSSError>
where
    G::BaseField: PrimeField,
{
    if shares.is_empty() {
        return Err(PVSSError::NoSharesGiven);
    }
    let mut ids = Vec::with_capacity(shares.len());
    let mut seen = BTreeSet::new();
    for share in shares {
        if !seen.insert(share.id) {
            return Err(PVSSError::DuplicateShareId(share.id));
        }
        ids.push(share.id);
    }
    let basis = lagrange_basis_at_0_for_all::<G::ScalarField>(ids)?;
    let points = cfg_iter!(shares).map(|s| s.share).collect::<Vec<_>>();
    let pooled = G::Group::msm_unchecked(&points, &basis).into_affine();
    Ok(xor_bytes(
        masked_secret,
        &hash_affine_points::<D, G>(&[pooled]),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dealer::{deal_secret, tests::gen_keys},
        secp256k1,
    };
    use ark_ff::One;
    use ark_secp256k1::{Affine, Fr};
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use sha3::Sha3_256;

    const SECRET: &[u8] = b"Hello, go-pvss under ECC";

    fn setup(
        rng: &mut StdRng,
        threshold: ShareId,
        total: usize,
    ) -> (
        Vec<Fr>,
        Vec<Affine>,
        DistributionSharesBox<Affine>,
        Vec<DecryptedShare<Affine>>,
    ) {
        let gens = secp256k1::generators();
        let (sks, pks) = gen_keys(rng, total, &gens);
        let sharebox =
            deal_secret::<_, Affine, Sha3_256>(rng, SECRET, threshold, pks.clone(), &gens)
                .unwrap();
        let dec_shares = sks
            .iter()
            .map(|sk| {
                sharebox
                    .extract_secret_share::<_, Sha3_256>(rng, sk, &gens)
                    .unwrap()
            })
            .collect::<Vec<_>>();
        (sks, pks, sharebox, dec_shares)
    }

    #[test]
    fn full_cycle_3_of_4() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let gens = secp256k1::generators();

        // A dealer with a key of its own distributes to the other four parties
        let (sks, pks) = gen_keys(&mut rng, 5, &gens);
        let sharebox = deal_secret::<_, Affine, Sha3_256>(
            &mut rng,
            SECRET,
            3,
            pks[1..].to_vec(),
            &gens,
        )
        .unwrap();
        assert_eq!(sharebox.commitments.0.len(), 3);
        assert_eq!(sharebox.shares.len(), 4);
        assert_ne!(sharebox.masked_secret, SECRET.to_vec());

        // The distribution is publicly verifiable
        sharebox.verify::<Sha3_256>(&gens).unwrap();

        // The dealer did not deal to itself
        assert!(matches!(
            sharebox.extract_secret_share::<_, Sha3_256>(&mut rng, &sks[0], &gens),
            Err(PVSSError::NoShareForParticipant)
        ));

        // Every party decrypts its share and the decryption is publicly verifiable
        let dec_shares = sks[1..]
            .iter()
            .map(|sk| {
                sharebox
                    .extract_secret_share::<_, Sha3_256>(&mut rng, sk, &gens)
                    .unwrap()
            })
            .collect::<Vec<_>>();
        for dec in &dec_shares {
            dec.verify::<Sha3_256>(&gens).unwrap();
        }

        // Any 3 of the 4 shares reconstruct the secret, as do all 4
        for skip in 0..4 {
            let subset = dec_shares
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, s)| s.clone())
                .collect::<Vec<_>>();
            assert_eq!(
                reconstruct_secret::<Affine, Sha3_256>(&subset, &sharebox.masked_secret)
                    .unwrap(),
                SECRET.to_vec()
            );
        }
        assert_eq!(
            reconstruct_secret::<Affine, Sha3_256>(&dec_shares, &sharebox.masked_secret)
                .unwrap(),
            SECRET.to_vec()
        );

        // Reconstruction is order-independent
        let mut reversed = dec_shares.clone();
        reversed.reverse();
        assert_eq!(
            reconstruct_secret::<Affine, Sha3_256>(&reversed, &sharebox.masked_secret).unwrap(),
            SECRET.to_vec()
        );
    }

    #[test]
    fn pvss_full_cycle_for_various_thresholds() {
        let mut rng = StdRng::seed_from_u64(10u64);
        let gens = secp256k1::generators();

        for (threshold, total) in vec![(1, 3), (2, 2), (2, 3), (3, 5), (4, 6), (5, 8)] {
            let (_, _, sharebox, dec_shares) = setup(&mut rng, threshold, total);
            assert_eq!(sharebox.commitments.0.len(), threshold as usize);
            assert_eq!(sharebox.shares.len(), total);
            sharebox.verify::<Sha3_256>(&gens).unwrap();

            for dec in &dec_shares {
                dec.verify::<Sha3_256>(&gens).unwrap();
            }

            // The first `threshold` shares suffice, as do all of them
            assert_eq!(
                reconstruct_secret::<Affine, Sha3_256>(
                    &dec_shares[..threshold as usize],
                    &sharebox.masked_secret
                )
                .unwrap(),
                SECRET.to_vec()
            );
            assert_eq!(
                reconstruct_secret::<Affine, Sha3_256>(&dec_shares, &sharebox.masked_secret)
                    .unwrap(),
                SECRET.to_vec()
            );
        }
    }

    #[test]
    fn threshold_boundaries() {
        let mut rng = StdRng::seed_from_u64(1u64);
        let gens = secp256k1::generators();

        // Trivial sharing to a single party
        let (_, _, sharebox, dec_shares) = setup(&mut rng, 1, 1);
        sharebox.verify::<Sha3_256>(&gens).unwrap();
        assert_eq!(
            reconstruct_secret::<Affine, Sha3_256>(&dec_shares, &sharebox.masked_secret)
                .unwrap(),
            SECRET.to_vec()
        );

        // All shares needed: with every share the secret comes back, with one missing the
        // fold yields a point but not the right one
        let (_, _, sharebox, dec_shares) = setup(&mut rng, 3, 3);
        sharebox.verify::<Sha3_256>(&gens).unwrap();
        assert_eq!(
            reconstruct_secret::<Affine, Sha3_256>(&dec_shares, &sharebox.masked_secret)
                .unwrap(),
            SECRET.to_vec()
        );
        assert_ne!(
            reconstruct_secret::<Affine, Sha3_256>(&dec_shares[..2], &sharebox.masked_secret)
                .unwrap(),
            SECRET.to_vec()
        );
    }

    #[test]
    fn tampered_box_is_rejected() {
        let mut rng = StdRng::seed_from_u64(2u64);
        let gens = secp256k1::generators();
        let (_, _, sharebox, _) = setup(&mut rng, 3, 4);
        sharebox.verify::<Sha3_256>(&gens).unwrap();

        // A commitment that is not the one the shares were proven against
        let mut tampered = sharebox.clone();
        tampered.commitments.0[1] = (tampered.commitments.0[1] + gens.h).into_affine();
        assert!(tampered.verify::<Sha3_256>(&gens).is_err());

        // A substituted ciphertext
        let mut tampered = sharebox.clone();
        tampered.shares[2].share = (tampered.shares[2].share + gens.g).into_affine();
        assert!(tampered.verify::<Sha3_256>(&gens).is_err());

        // Corrupted proof scalars
        let mut tampered = sharebox.clone();
        tampered.shares[0].proof.challenge += Fr::one();
        assert!(tampered.verify::<Sha3_256>(&gens).is_err());
        let mut tampered = sharebox.clone();
        tampered.shares[0].proof.response += Fr::one();
        assert!(tampered.verify::<Sha3_256>(&gens).is_err());

        // A share claiming a different position
        let mut tampered = sharebox.clone();
        tampered.shares[1].id = 5;
        assert!(tampered.verify::<Sha3_256>(&gens).is_err());

        // A share claiming a different threshold
        let mut tampered = sharebox.clone();
        tampered.shares[1].threshold = 2;
        assert!(tampered.verify::<Sha3_256>(&gens).is_err());

        // Zero or duplicated positions
        let mut tampered = sharebox.clone();
        tampered.shares[1].id = 0;
        assert!(matches!(
            tampered.verify::<Sha3_256>(&gens),
            Err(PVSSError::InvalidParticipantId(0))
        ));
        let mut tampered = sharebox.clone();
        tampered.shares[1].id = 1;
        assert!(matches!(
            tampered.verify::<Sha3_256>(&gens),
            Err(PVSSError::DuplicateShareId(1))
        ));

        // Fewer shares than commitments
        let mut tampered = sharebox.clone();
        tampered.shares.truncate(2);
        assert!(matches!(
            tampered.verify::<Sha3_256>(&gens),
            Err(PVSSError::BelowThreshold(3, 2))
        ));
    }

    #[test]
    fn tampered_decrypted_share_is_rejected() {
        let mut rng = StdRng::seed_from_u64(3u64);
        let gens = secp256k1::generators();
        let (_, _, sharebox, dec_shares) = setup(&mut rng, 2, 3);

        for dec in &dec_shares {
            dec.verify::<Sha3_256>(&gens).unwrap();
        }

        // A forged share: some other group element in place of the real decryption
        let mut forged = dec_shares[0].clone();
        forged.share = (forged.share + gens.g).into_affine();
        assert!(forged.verify::<Sha3_256>(&gens).is_err());

        let mut forged = dec_shares[0].clone();
        forged.reencrypted_share = (forged.reencrypted_share + gens.g).into_affine();
        assert!(forged.verify::<Sha3_256>(&gens).is_err());

        let mut forged = dec_shares[0].clone();
        forged.proof.challenge += Fr::one();
        assert!(forged.verify::<Sha3_256>(&gens).is_err());

        // An unverified forged share poisons reconstruction
        let mut shares = dec_shares.clone();
        shares[0].share = (shares[0].share + gens.g).into_affine();
        assert_ne!(
            reconstruct_secret::<Affine, Sha3_256>(&shares[..2], &sharebox.masked_secret)
                .unwrap(),
            SECRET.to_vec()
        );
    }

    #[test]
    fn reconstruct_rejects_degenerate_inputs() {
        let mut rng = StdRng::seed_from_u64(4u64);
        let (_, _, sharebox, dec_shares) = setup(&mut rng, 2, 3);

        let empty: [DecryptedShare<Affine>; 0] = [];
        assert!(matches!(
            reconstruct_secret::<Affine, Sha3_256>(&empty, &sharebox.masked_secret),
            Err(PVSSError::NoSharesGiven)
        ));

        let duplicated = vec![dec_shares[0].clone(), dec_shares[0].clone()];
        assert!(matches!(
            reconstruct_secret::<Affine, Sha3_256>(&duplicated, &sharebox.masked_secret),
            Err(PVSSError::DuplicateShareId(1))
        ));

        let mut zeroed = vec![dec_shares[0].clone(), dec_shares[1].clone()];
        zeroed[0].id = 0;
        assert!(matches!(
            reconstruct_secret::<Affine, Sha3_256>(&zeroed, &sharebox.masked_secret),
            Err(PVSSError::XCordCantBeZero)
        ));
    }

    #[test]
    fn secret_at_digest_width_boundary() {
        let mut rng = StdRng::seed_from_u64(5u64);
        let gens = secp256k1::generators();
        let (sks, pks) = gen_keys(&mut rng, 3, &gens);

        let secret = [0xabu8; 32];
        let sharebox =
            deal_secret::<_, Affine, Sha3_256>(&mut rng, &secret, 2, pks, &gens).unwrap();
        sharebox.verify::<Sha3_256>(&gens).unwrap();
        let dec_shares = sks
            .iter()
            .map(|sk| {
                sharebox
                    .extract_secret_share::<_, Sha3_256>(&mut rng, sk, &gens)
                    .unwrap()
            })
            .collect::<Vec<_>>();
        assert_eq!(
            reconstruct_secret::<Affine, Sha3_256>(&dec_shares[1..], &sharebox.masked_secret)
                .unwrap(),
            secret.to_vec()
        );
    }
}
