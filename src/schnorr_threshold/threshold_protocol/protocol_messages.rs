// The `protocol_messages` module contains the API for the messages passed between the parties
// and the coordinator of a threshold signing round. Messages carry raw encodings; the typed
// values are recovered through the validating decoders.
use crate::curve::{CurveParameters, POINT_LENGTH};
use crate::error::Result;
use crate::keys_management::PublicKey;
use crate::signature::{PartialSignature, Signature};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub struct PublicKeyMessage {
    pub public_key: [u8; POINT_LENGTH],
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub struct AggregatedPublicKeyMessage {
    pub public_key: [u8; POINT_LENGTH],
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub struct PublicNonceMessage {
    pub r_public: [u8; POINT_LENGTH],
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub struct AggregatedNonceMessage {
    pub r_public: [u8; POINT_LENGTH],
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub struct PartialSignatureMessage {
    pub signature_r: [u8; POINT_LENGTH],
    pub signature_s: [u8; 32],
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub struct CombinedSignatureMessage {
    pub signature_r: [u8; POINT_LENGTH],
    pub signature_s: [u8; 32],
}

macro_rules! impl_point_message {
    ($name:ident, $field:ident) => {
        impl $name {
            pub fn decode(&self, curve: &CurveParameters) -> Result<PublicKey> {
                PublicKey::from_bytes(curve, &self.$field)
            }
        }

        impl From<&PublicKey> for $name {
            fn from(point: &PublicKey) -> $name {
                $name {
                    $field: point.to_bytes(),
                }
            }
        }
    };
}

impl_point_message!(PublicKeyMessage, public_key);
impl_point_message!(AggregatedPublicKeyMessage, public_key);
impl_point_message!(PublicNonceMessage, r_public);
impl_point_message!(AggregatedNonceMessage, r_public);

macro_rules! impl_signature_message {
    ($name:ident, $signature:ident) => {
        impl $name {
            pub fn decode(&self) -> Result<$signature> {
                let mut bytes = [0u8; 64];
                bytes[..POINT_LENGTH].copy_from_slice(&self.signature_r);
                bytes[POINT_LENGTH..].copy_from_slice(&self.signature_s);
                $signature::from_bytes(&bytes)
            }
        }

        impl From<&$signature> for $name {
            fn from(signature: &$signature) -> $name {
                $name {
                    signature_r: *signature.r(),
                    signature_s: signature.s().to_bytes(),
                }
            }
        }
    };
}

impl_signature_message!(PartialSignatureMessage, PartialSignature);
impl_signature_message!(CombinedSignatureMessage, Signature);
