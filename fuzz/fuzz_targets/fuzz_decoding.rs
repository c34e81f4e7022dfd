#![no_main]

use libfuzzer_sys::fuzz_target;

use edwards_threshold::keys_management::{PrivateKey, PublicKey};
use edwards_threshold::{CurveParameters, PartialSignature, Signature};

fuzz_target!(|data: &[u8]| {
    let curve = CurveParameters::ed25519();

    // Decoders must reject, never panic
    let _ = PrivateKey::from_bytes(&curve, data);
    let _ = Signature::from_bytes(data);
    let _ = PartialSignature::from_bytes(data);

    if let Ok(public_key) = PublicKey::from_bytes(&curve, data) {
        assert_eq!(&public_key.to_bytes()[..], data);
        if let Ok(signature) = Signature::from_bytes(&[data, data].concat()) {
            let _ = signature.verify(&curve, &public_key, data);
        }
    }
});
