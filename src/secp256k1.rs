//! Reference protocol parameters over secp256k1.
//!
//! The alternative generator `H` is the nothing-up-my-sleeve point used by `secp256k1-zkp`'s
//! rangeproof module: the SHA256 hash of the uncompressed encoding of `G`, interpreted as an
//! x-coordinate and lifted to the first matching curve point. Nobody can know its discrete log
//! with respect to `G`. Deployments that need compatibility with existing share boxes must use
//! exactly this point.

use ark_ec::AffineRepr;
use ark_ff::MontFp;
use ark_secp256k1::{Affine, Fq};

use crate::common::Generators;

/// x-coordinate of `H`, `0x50929b74c1a04954b78b4b6035e97a5e078a5a0f28ec96d547bfee9ace803ac0`
pub const GENERATOR_H_X: Fq =
    MontFp!("36444060476547731421425013472121489344383018981262552973668657287772036414144");

/// y-coordinate of `H`, `0x31d3c6863973926e049e637cb1b5f40a36dac28af1766968c30c2313f3a38904`
pub const GENERATOR_H_Y: Fq =
    MontFp!("22537504475708154238330251540244790414456712057027634449505794721772594235652");

/// The NUMS generator `H`
pub const GENERATOR_H: Affine = Affine::new_unchecked(GENERATOR_H_X, GENERATOR_H_Y);

/// The generator pair `(G, H)` for running the protocol over secp256k1
pub fn generators() -> Generators<Affine> {
    Generators {
        g: Affine::generator(),
        h: GENERATOR_H,
    }
}
