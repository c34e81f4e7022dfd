use crate::arithmetic::scalar::sum_scalars;
use crate::curve::{CurveParameters, Point};
use crate::error::{Error, Result};
use crate::keys_management::{PrivateKey, PublicKey};
use crate::schnorr_single_signature::calc_hash_rpm;
use crate::signature::{PartialSignature, Signature};
use curve25519_dalek::Scalar;
use secrecy::ExposeSecret;

// Sums a list of points by repeated group addition.
// Group addition is commutative and associative, so the result does not
// depend on the order of `points`.
//
// Inputs:
// - points: the public keys or public nonces to combine
// - what: name of the inputs, used in the EmptyInputSet error
//
// Returns:
// - The sum, rejected with InvalidPoint if it is the identity
pub fn aggregate_points(points: &[Point], what: &'static str) -> Result<Point> {
    if points.is_empty() {
        tracing::warn!(what, "Nothing provided for aggregation");
        return Err(Error::EmptyInputSet(what));
    }
    points.iter().sum::<Point>().validate()
}

// Aggregates public keys into the joint key X = sum of all Xi.
//
// Each Xi enters with weight one; there is no per-key coefficient, so a
// participant choosing its key after seeing the others can steer X.
// Key sets must be fixed before they are shared.
#[tracing::instrument(
    name = "Combining public keys",
    skip_all,
    fields(count = public_keys.len())
)]
pub fn combine_public_keys(public_keys: &[PublicKey]) -> Result<PublicKey> {
    let points: Vec<Point> = public_keys.iter().map(|key| *key.as_point()).collect();
    PublicKey::from_point(aggregate_points(&points, "public keys")?)
}

// Sums the public nonces Ri into the round commitment R.
#[tracing::instrument(
    name = "Combining public nonces",
    skip_all,
    fields(count = public_nonces.len())
)]
pub fn combine_public_nonces(public_nonces: &[PublicKey]) -> Result<PublicKey> {
    let points: Vec<Point> = public_nonces.iter().map(|nonce| *nonce.as_point()).collect();
    PublicKey::from_point(aggregate_points(&points, "public nonces")?)
}

// Computes a signature "share" (partial signature)
// si = ki + H(R,X,m)xi
//
// Inputs:
// - message: Message m to sign
// - private_key: Signer's private key xi
// - aggregate_public_key: Aggregated public key X
// - private_nonce: Signer's nonce ki
// - aggregate_public_nonce: Aggregated nonce R, including this signer's Ri
//
// Every signer of a round must be handed the same X and R.
//
// Returns:
// - (R, si)
#[tracing::instrument(name = "Computing a partial signature", skip_all)]
pub fn partial_sign(
    message: &[u8],
    private_key: &PrivateKey<'_>,
    aggregate_public_key: &PublicKey,
    private_nonce: &PrivateKey<'_>,
    aggregate_public_nonce: &PublicKey,
) -> PartialSignature {
    let cap_r = aggregate_public_nonce.to_bytes();
    let hash_rpm = calc_hash_rpm(&cap_r, &aggregate_public_key.to_bytes(), message);
    let s = private_nonce.expose_secret() + hash_rpm * private_key.expose_secret();

    PartialSignature::new(cap_r, s)
}

// Checks one signer's share against its own public key and nonce:
// si * G = Ri + H(R,X,m)Xi
//
// Returns:
// - true if the share carries the round's R and satisfies the equation
pub fn verify_partial_signature(
    partial_signature: &PartialSignature,
    message: &[u8],
    public_key: &PublicKey,
    public_nonce: &PublicKey,
    aggregate_public_key: &PublicKey,
    aggregate_public_nonce: &PublicKey,
) -> bool {
    let cap_r = aggregate_public_nonce.to_bytes();
    if partial_signature.r() != &cap_r {
        return false;
    }
    let hash_rpm = calc_hash_rpm(&cap_r, &aggregate_public_key.to_bytes(), message);

    let left = Point::mul_base(partial_signature.s());
    let right = *public_nonce.as_point() + public_key.as_point().mul(&hash_rpm);

    left == right
}

// Sums the partial signatures into the full signature (R, s)
//
// Inputs:
// - partial_signatures: shares that all carry the same R
//
// Returns:
// - (R, sum of all si)
#[tracing::instrument(
    name = "Combining partial signatures",
    skip_all,
    fields(count = partial_signatures.len())
)]
pub fn combine_signatures(partial_signatures: &[PartialSignature]) -> Result<Signature> {
    let first = partial_signatures
        .first()
        .ok_or(Error::EmptyInputSet("partial signatures"))?;

    if partial_signatures
        .iter()
        .any(|partial| partial.r() != first.r())
    {
        tracing::warn!("Partial signatures disagree on the nonce commitment");
        return Err(Error::InconsistentCommitment);
    }

    let s: Scalar = sum_scalars(partial_signatures.iter().map(|partial| partial.s()));
    Ok(Signature::new(*first.r(), s))
}

// Same as `Signature::verify`; kept beside the combining functions so a
// round can be checked without reaching into the single-signer module.
pub fn verify_signature(
    curve: &CurveParameters,
    aggregate_public_key: &PublicKey,
    message: &[u8],
    signature: &Signature,
) -> bool {
    signature.verify(curve, aggregate_public_key, message)
}
