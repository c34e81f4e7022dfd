//! # Edwards Threshold Schnorr Library
//!
//! This Rust library provides an n-of-n threshold Schnorr signature engine over the
//! twisted Edwards curve edwards25519, built on the curve25519_dalek library.
//!
//! ## Overview of Schnorr Signatures
//!
//! Schnorr signatures prove the authenticity of a message with a single group equation.
//! Because that equation is linear, the keys, nonces and responses of several signers
//! can simply be added together, which is what makes threshold signing possible.
//!
//! - Key Pair Generation: a private key x is a nonzero scalar modulo the group order N,
//!   and the public key is X = x * G, where G is the curve's base point.
//! - Signing: the signer derives a nonce k deterministically from the key and the message,
//!   and publishes (R, s) = (kG, k + H(R, X, m)x).
//! - Verification: the signature is valid when sG = R + H(R, X, m)X.
//!
//! H is SHA-512 over the encodings of R and X followed by the message, reduced modulo N,
//! so the signatures are accepted by standard Ed25519 verifiers.
//!
//! ## Threshold Algorithm
//!
//! In an n-of-n round:
//!
//! - n participants hold private keys x1, x2, …, xn with public keys X1, X2, …, Xn.
//! - A message m is to be signed.
//!
//! ### Algorithm Steps
//!
//! 1. Participants send their public keys (Xi) to the coordinator, which publishes
//!    the aggregate key X = sum(Xi).
//! 2. Each participant derives a nonce ki and sends Ri = ki * G. The coordinator
//!    publishes R = sum(Ri).
//! 3. Each participant computes its partial signature si = ki + H(R, X, m) * xi.
//!    The coordinator checks every share against the participant's Xi and Ri
//!    and combines them into (R, s), where s is the sum of all si.
//!
//! Verification of the combined signature uses the single-signer equation with X in
//! place of the signer's key.
//!
//! The aggregate key is an unweighted sum. A participant that picks its key after
//! seeing the others can steer X, so key sets must be fixed before they are shared.
//!
//! ## Usage
//!
//! Build [`CurveParameters::ed25519`] once and borrow it everywhere. Run rounds with
//! [`party::Party`] and [`coordinator::Coordinator`], or call the functions of
//! [`schnorr_threshold::threshold_math`] directly.
//!
//! ## Telemetry
//!
//! Operations emit `tracing` spans. Enable the `telemetry` feature for a ready-made
//! Bunyan JSON subscriber in [`telemetry`].

pub mod arithmetic;
pub mod curve;
pub mod error;
pub mod keys_management;
pub mod nonce;
pub mod schnorr_single_signature;
pub mod schnorr_threshold;
pub mod signature;

#[cfg(feature = "telemetry")]
pub mod telemetry;

pub use crate::schnorr_threshold::threshold_protocol::coordinator;
pub use crate::schnorr_threshold::threshold_protocol::party;
pub use crate::schnorr_threshold::threshold_protocol::protocol_messages;

pub use crate::curve::{CurveParameters, Point};
pub use crate::error::{Error, Result};
pub use crate::keys_management::{derive_public_key, generate_key, PrivateKey, PublicKey};
pub use crate::nonce::{derive_nonce, Nonce};
pub use crate::schnorr_single_signature::verify;
pub use crate::schnorr_threshold::threshold_math::{
    combine_public_keys, combine_public_nonces, combine_signatures, partial_sign,
    verify_partial_signature,
};
pub use crate::signature::{PartialSignature, Signature};
