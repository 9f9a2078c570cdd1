//! Byte-level transcript encoding shared by the proof and masking layers.
//!
//! All hashes over group elements use the same contract: each affine coordinate is fed to the
//! digest as its minimal big-endian byte string, concatenated with no length prefix or
//! separator, and zero encodes as the empty string. The encoding is not injective across
//! field-element boundaries; it is sound in this protocol only because every hashed point is
//! also bound by other components of the proof, and it must not be changed where
//! compatibility with existing transcripts is required.

use ark_ec::AffineRepr;
use ark_ff::{BigInteger, PrimeField};
use ark_std::vec::Vec;
use digest::Digest;

/// Minimal big-endian encoding of a field element. Leading zero bytes are stripped, zero
/// encodes as the empty byte string.
pub fn to_bytes_be_minimal<F: PrimeField>(f: &F) -> Vec<u8> {
    let bytes = f.into_bigint().to_bytes_be();
    let offset = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    bytes[offset..].to_vec()
}

/// Digest a list of affine points, feeding each point's `x` and `y` coordinates through
/// [`to_bytes_be_minimal`]. The point at infinity contributes nothing.
pub fn hash_affine_points<D: Digest, G: AffineRepr>(points: &[G]) -> Vec<u8>
where
    G::BaseField: PrimeField,
{
    let mut hasher = D::new();
    for point in points {
        if let Some((x, y)) = point.xy() {
            hasher.update(to_bytes_be_minimal(x));
            hasher.update(to_bytes_be_minimal(y));
        }
    }
    hasher.finalize().to_vec()
}

/// Hash a list of affine points and reduce the digest, read as a big-endian integer, into the
/// scalar field. This is the Fiat-Shamir challenge computation.
pub fn hash_points_to_field<D: Digest, G: AffineRepr>(points: &[G]) -> G::ScalarField
where
    G::BaseField: PrimeField,
{
    G::ScalarField::from_be_bytes_mod_order(&hash_affine_points::<D, G>(points))
}

/// XOR of two byte strings under numeric (big-endian integer) semantics: the shorter input is
/// left-padded with zeros to the longer's length and the result is returned minimal, i.e.
/// with leading zero bytes stripped.
pub fn xor_bytes(a: &[u8], b: &[u8]) -> Vec<u8> {
    let len = a.len().max(b.len());
    let mut out = Vec::with_capacity(len);
    for i in 0..len {
        let x = if i + a.len() >= len { a[i + a.len() - len] } else { 0 };
        let y = if i + b.len() >= len { b[i + b.len() - len] } else { 0 };
        out.push(x ^ y);
    }
    let offset = out.iter().position(|c| *c != 0).unwrap_or(out.len());
    out.split_off(offset)
}
