#![cfg_attr(not(feature = "std"), no_std)]

//! Publicly verifiable secret sharing (PVSS) following the scheme of
//! [Schoenmakers](https://www.win.tue.nl/~berry/papers/crypto99.pdf). A dealer splits a secret
//! into `n` shares, encrypted for the corresponding parties, such that any `t` of them can
//! reconstruct it while *anyone* — participant or not — can check from public data alone that
//! the dealer distributed consistent shares and that each decrypted share is authentic.
//!
//! The proof machinery is the non-interactive Chaum-Pedersen protocol for equality of discrete
//! logs ([CP93](https://link.springer.com/chapter/10.1007/3-540-48071-4_7)), made non-interactive
//! with a Fiat-Shamir challenge. See [`dleq`] for the proof, [`dealer`] for the distribution
//! protocol and [`verification`] for public verification and reconstruction.
//!
//! [`dleq`]: crate::dleq
//! [`dealer`]: crate::dealer
//! [`verification`]: crate::verification

pub mod common;
pub mod dealer;
pub mod dleq;
pub mod error;
pub mod hashing;
pub mod secp256k1;
pub mod shamir_ss;
pub mod verification;
