/// This module defines a Coordinator struct that drives one threshold signing round.
/// It collects public keys, then public nonces, then partial signatures, answering each
/// step with the aggregate the parties need next, and finally combines and checks the
/// signature. A party that drops out invalidates the round: start a new Coordinator
/// over the remaining parties so keys and nonces are re-aggregated.
use super::protocol_messages::*;
use crate::curve::CurveParameters;
use crate::error::{Error, Result};
use crate::keys_management::PublicKey;
use crate::schnorr_threshold::threshold_math::*;
use crate::signature::{PartialSignature, Signature};
use std::borrow::Cow;

/// Coordinator struct, which manages the aggregation process.
pub struct Coordinator<'a, S: CoordinatorState> {
    curve: &'a CurveParameters,
    parties_quantity: usize,
    message: Cow<'a, [u8]>,
    state: S,
}

/// Represents the possible states of the Coordinator.
pub trait CoordinatorState {}

/// State when waiting for public keys from parties.
pub struct AwaitingPublicKeys;

/// State when waiting for public nonces from parties.
pub struct AwaitingPublicNonces {
    public_keys: Vec<PublicKey>,
    aggregate_public_key: PublicKey,
}

/// State when waiting for partial signatures from parties.
pub struct AwaitingPartialSignatures {
    public_keys: Vec<PublicKey>,
    aggregate_public_key: PublicKey,
    public_nonces: Vec<PublicKey>,
    aggregate_public_nonce: PublicKey,
}

/// State when the round is finalized.
pub struct CoordinationFinalized {
    aggregate_public_key: PublicKey,
    signature: Signature,
}

impl CoordinatorState for AwaitingPublicKeys {}
impl CoordinatorState for AwaitingPublicNonces {}
impl CoordinatorState for AwaitingPartialSignatures {}
impl CoordinatorState for CoordinationFinalized {}

use std::fmt::{Debug, Formatter};
impl<S: CoordinatorState> Debug for Coordinator<'_, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("parties_quantity", &self.parties_quantity)
            .field("message", &self.message)
            .finish()
    }
}

impl<'a, S: CoordinatorState> Coordinator<'a, S> {
    fn check_quantity(&self, actual: usize) -> Result<()> {
        if actual != self.parties_quantity {
            tracing::warn!(
                expected = self.parties_quantity,
                actual,
                "Mismatched quantity of protocol messages"
            );
            return Err(Error::PartyCountMismatch {
                expected: self.parties_quantity,
                actual,
            });
        }
        Ok(())
    }

    fn advance<T: CoordinatorState>(self, state: T) -> Coordinator<'a, T> {
        Coordinator {
            curve: self.curve,
            parties_quantity: self.parties_quantity,
            message: self.message,
            state,
        }
    }
}

impl<'a> Coordinator<'a, AwaitingPublicKeys> {
    /// Create a new Coordinator instance.
    ///
    /// # Arguments
    ///
    /// * `curve` - The shared curve parameters.
    /// * `parties_quantity` - The number of parties involved in the round.
    /// * `message` - The message being signed.
    ///
    /// Returns a Coordinator in the "AwaitingPublicKeys" state, or
    /// `EmptyInputSet` if `parties_quantity` is 0.
    pub fn new(
        curve: &'a CurveParameters,
        parties_quantity: usize,
        message: impl Into<Cow<'a, [u8]>>,
    ) -> Result<Coordinator<'a, AwaitingPublicKeys>> {
        if parties_quantity == 0 {
            return Err(Error::EmptyInputSet("parties"));
        }
        Ok(Coordinator {
            curve,
            parties_quantity,
            message: message.into(),
            state: AwaitingPublicKeys,
        })
    }

    /// Aggregate public keys from parties and prepare for the next state.
    ///
    /// Returns the Coordinator in the "AwaitingPublicNonces" state together
    /// with the aggregate public key to broadcast.
    #[tracing::instrument(name = "Coordinator aggregating public keys", skip_all)]
    pub fn aggregate_public_keys(
        self,
        public_keys: Vec<PublicKeyMessage>,
    ) -> Result<(
        Coordinator<'a, AwaitingPublicNonces>,
        AggregatedPublicKeyMessage,
    )> {
        self.check_quantity(public_keys.len())?;
        let public_keys = public_keys
            .iter()
            .map(|message| message.decode(self.curve))
            .collect::<Result<Vec<PublicKey>>>()?;
        let aggregate_public_key = combine_public_keys(&public_keys)?;

        Ok((
            self.advance(AwaitingPublicNonces {
                public_keys,
                aggregate_public_key,
            }),
            AggregatedPublicKeyMessage::from(&aggregate_public_key),
        ))
    }
}

impl<'a> Coordinator<'a, AwaitingPublicNonces> {
    /// Aggregate public nonces from parties and prepare for the next state.
    ///
    /// The nonces must be submitted in the same party order as the public keys.
    #[tracing::instrument(name = "Coordinator aggregating public nonces", skip_all)]
    pub fn aggregate_nonces(
        self,
        nonces: Vec<PublicNonceMessage>,
    ) -> Result<(
        Coordinator<'a, AwaitingPartialSignatures>,
        AggregatedNonceMessage,
    )> {
        self.check_quantity(nonces.len())?;
        let public_nonces = nonces
            .iter()
            .map(|message| message.decode(self.curve))
            .collect::<Result<Vec<PublicKey>>>()?;
        let aggregate_public_nonce = combine_public_nonces(&public_nonces)?;

        let AwaitingPublicNonces {
            public_keys,
            aggregate_public_key,
        } = self.state;
        Ok((
            Coordinator {
                curve: self.curve,
                parties_quantity: self.parties_quantity,
                message: self.message,
                state: AwaitingPartialSignatures {
                    public_keys,
                    aggregate_public_key,
                    public_nonces,
                    aggregate_public_nonce,
                },
            },
            AggregatedNonceMessage::from(&aggregate_public_nonce),
        ))
    }
}

impl<'a> Coordinator<'a, AwaitingPartialSignatures> {
    /// Verify each partial signature, combine them and prepare for the final state.
    ///
    /// Shares must be submitted in the same party order as the public keys.
    /// Fails with `InconsistentCommitment` if the shares disagree on R and with
    /// `InvalidPartialSignature(i)` naming the first share that does not verify.
    #[tracing::instrument(name = "Coordinator combining partial signatures", skip_all)]
    pub fn aggregate_signatures(
        self,
        partial_signatures: Vec<PartialSignatureMessage>,
    ) -> Result<(
        Coordinator<'a, CoordinationFinalized>,
        CombinedSignatureMessage,
    )> {
        self.check_quantity(partial_signatures.len())?;
        let partial_signatures = partial_signatures
            .iter()
            .map(PartialSignatureMessage::decode)
            .collect::<Result<Vec<PartialSignature>>>()?;

        let signature = combine_signatures(&partial_signatures)?;

        for (i, partial_signature) in partial_signatures.iter().enumerate() {
            if !verify_partial_signature(
                partial_signature,
                &self.message,
                &self.state.public_keys[i],
                &self.state.public_nonces[i],
                &self.state.aggregate_public_key,
                &self.state.aggregate_public_nonce,
            ) {
                tracing::warn!(party = i, "Partial signature is invalid");
                return Err(Error::InvalidPartialSignature(i));
            }
        }

        let aggregate_public_key = self.state.aggregate_public_key;
        Ok((
            self.advance(CoordinationFinalized {
                aggregate_public_key,
                signature,
            }),
            CombinedSignatureMessage::from(&signature),
        ))
    }
}

impl Coordinator<'_, CoordinationFinalized> {
    /// Get the combined signature.
    pub fn get_signature(&self) -> Signature {
        self.state.signature
    }

    pub fn aggregate_public_key(&self) -> PublicKey {
        self.state.aggregate_public_key
    }

    /// Verify the combined signature.
    ///
    /// Returns true if the verification is successful; otherwise, false.
    pub fn verify_signature(&self) -> bool {
        verify_signature(
            self.curve,
            &self.state.aggregate_public_key,
            &self.message,
            &self.state.signature,
        )
    }
}
