/// This module defines a Party struct representing a participant in a threshold
/// Schnorr signing round. Parties progress through typed states: they publish a
/// public key, derive a nonce once the aggregate key is known, compute a partial
/// signature once the aggregate nonce is fixed, and finally accept the combined
/// signature. Every transition consumes the party, so a nonce is used at most once.
use super::protocol_messages::*;
use crate::curve::CurveParameters;
use crate::error::{Error, Result};
use crate::keys_management::{PrivateKey, PublicKey};
use crate::nonce::Nonce;
use crate::schnorr_threshold::threshold_math::partial_sign;
use crate::signature::Signature;
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha512};
use std::borrow::Cow;

/// Party struct, which manages the role of a participant in the scheme.
pub struct Party<'a, S: PartyState> {
    keys: PrivateKey<'a>,
    message: Cow<'a, [u8]>,
    state: S,
}

/// Represents the possible states of a Party.
pub trait PartyState {}

/// State for deriving the round nonce.
pub struct NonceGeneration;

/// State for computing the partial signature.
pub struct PartialSignatureComputation<'a> {
    aggregate_public_key: PublicKey,
    nonce: Nonce<'a>,
}

/// State when awaiting the combined signature.
pub struct AwaitingCombinedSignature {
    aggregate_public_key: PublicKey,
    aggregate_public_nonce: PublicKey,
}

/// State when the party's role is finalized.
pub struct PartyFinalized {
    aggregate_public_key: PublicKey,
    signature: Signature,
}

impl PartyState for NonceGeneration {}
impl PartyState for PartialSignatureComputation<'_> {}
impl PartyState for AwaitingCombinedSignature {}
impl PartyState for PartyFinalized {}

use std::fmt::{Debug, Formatter};
impl<S: PartyState> Debug for Party<'_, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Party")
            .field("public_key", &self.keys.public_key())
            .field("message", &self.message)
            .finish()
    }
}

impl<S: PartyState> Party<'_, S> {
    pub fn public_key(&self) -> PublicKey {
        self.keys.public_key()
    }

    fn curve(&self) -> &CurveParameters {
        self.keys.curve()
    }
}

impl<'a> Party<'a, NonceGeneration> {
    /// Create a new Party instance with a freshly generated key.
    ///
    /// # Arguments
    ///
    /// * `curve` - The shared curve parameters.
    /// * `message` - The message to be signed.
    /// * `rng` - Randomness source for the private key.
    ///
    /// Returns a tuple containing:
    /// 1. A Party in the "NonceGeneration" state.
    /// 2. A PublicKeyMessage carrying the Party's public key.
    pub fn new<R>(
        curve: &'a CurveParameters,
        message: impl Into<Cow<'a, [u8]>>,
        rng: &mut R,
    ) -> (Party<'a, NonceGeneration>, PublicKeyMessage)
    where
        R: CryptoRng + RngCore,
    {
        Party::new_from_private_key(PrivateKey::generate(curve, rng), message)
    }

    /// Create a new Party instance from a private key.
    ///
    /// # Arguments
    ///
    /// * `private_key` - The Party's private key.
    /// * `message` - The message to be signed.
    ///
    /// Returns a tuple containing:
    /// 1. A Party in the "NonceGeneration" state.
    /// 2. A PublicKeyMessage carrying the Party's public key.
    pub fn new_from_private_key(
        private_key: PrivateKey<'a>,
        message: impl Into<Cow<'a, [u8]>>,
    ) -> (Party<'a, NonceGeneration>, PublicKeyMessage) {
        let public_key = PublicKeyMessage::from(&private_key.public_key());
        (
            Party {
                keys: private_key,
                message: message.into(),
                state: NonceGeneration,
            },
            public_key,
        )
    }

    /// Derive the round nonce and prepare for the next state.
    ///
    /// The auxiliary entropy mixes fresh randomness with the aggregate key, so
    /// a changed participant set never reproduces an earlier nonce.
    ///
    /// # Arguments
    ///
    /// * `aggregated_public_key` - The aggregate public key of the round.
    /// * `rng` - Randomness source for the auxiliary entropy.
    ///
    /// Returns a tuple containing:
    /// 1. A Party in the "PartialSignatureComputation" state.
    /// 2. A PublicNonceMessage containing the public nonce.
    #[tracing::instrument(name = "Party deriving its round nonce", skip_all)]
    pub fn generate_nonce<R>(
        self,
        aggregated_public_key: AggregatedPublicKeyMessage,
        rng: &mut R,
    ) -> Result<(Party<'a, PartialSignatureComputation<'a>>, PublicNonceMessage)>
    where
        R: CryptoRng + RngCore,
    {
        let aggregate_public_key = aggregated_public_key.decode(self.curve())?;

        let mut fresh = [0u8; 32];
        rng.fill_bytes(&mut fresh);
        let binding = Sha512::new()
            .chain_update(aggregate_public_key.to_bytes())
            .chain_update(fresh)
            .finalize();
        let mut aux_entropy = [0u8; 32];
        aux_entropy.copy_from_slice(&binding[..32]);

        let nonce = Nonce::derive(&self.keys, &self.message, Some(&aux_entropy))?;
        let nonce_message = PublicNonceMessage::from(&nonce.public_nonce);

        Ok((
            Party {
                keys: self.keys,
                message: self.message,
                state: PartialSignatureComputation {
                    aggregate_public_key,
                    nonce,
                },
            },
            nonce_message,
        ))
    }
}

impl<'a> Party<'a, PartialSignatureComputation<'a>> {
    /// Generate a partial signature and prepare for the next state.
    ///
    /// # Arguments
    ///
    /// * `aggregated_nonce` - The aggregate public nonce, including this party's own.
    ///
    /// Returns a tuple containing:
    /// 1. A Party in the "AwaitingCombinedSignature" state.
    /// 2. A PartialSignatureMessage containing the partial signature.
    #[tracing::instrument(name = "Party computing its partial signature", skip_all)]
    pub fn generate_partial_signature(
        self,
        aggregated_nonce: AggregatedNonceMessage,
    ) -> Result<(Party<'a, AwaitingCombinedSignature>, PartialSignatureMessage)> {
        let aggregate_public_nonce = aggregated_nonce.decode(self.curve())?;
        let partial_signature = partial_sign(
            &self.message,
            &self.keys,
            &self.state.aggregate_public_key,
            self.state.nonce.private_nonce(),
            &aggregate_public_nonce,
        );

        Ok((
            Party {
                keys: self.keys,
                message: self.message,
                state: AwaitingCombinedSignature {
                    aggregate_public_key: self.state.aggregate_public_key,
                    aggregate_public_nonce,
                },
            },
            PartialSignatureMessage::from(&partial_signature),
        ))
    }
}

impl<'a> Party<'a, AwaitingCombinedSignature> {
    /// Accept the combined signature and prepare for the final state.
    ///
    /// # Arguments
    ///
    /// * `combined_signature` - The signature assembled by the coordinator.
    ///
    /// Returns a Party in the "PartyFinalized" state, or `InconsistentCommitment`
    /// if the signature does not carry this round's aggregate nonce.
    pub fn set_combined_signature(
        self,
        combined_signature: CombinedSignatureMessage,
    ) -> Result<Party<'a, PartyFinalized>> {
        let signature = combined_signature.decode()?;
        if signature.r() != &self.state.aggregate_public_nonce.to_bytes() {
            return Err(Error::InconsistentCommitment);
        }
        Ok(Party {
            keys: self.keys,
            message: self.message,
            state: PartyFinalized {
                aggregate_public_key: self.state.aggregate_public_key,
                signature,
            },
        })
    }
}

impl Party<'_, PartyFinalized> {
    /// Get the combined signature.
    pub fn get_signature(&self) -> Signature {
        self.state.signature
    }

    /// Verify the combined signature against the aggregate public key.
    pub fn verify_signature(&self) -> bool {
        self.state
            .signature
            .verify(self.curve(), &self.state.aggregate_public_key, &self.message)
    }
}
