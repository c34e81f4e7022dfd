use edwards_threshold::keys_management::PrivateKey;
use edwards_threshold::{CurveParameters, Signature};
use rand_core::OsRng;

fn main() -> edwards_threshold::Result<()> {
    let curve = CurveParameters::ed25519();
    let mut csprng = OsRng;

    // Create the signer's key
    let keys = PrivateKey::generate(&curve, &mut csprng);

    // Message to be signed
    let message = b"Hello World";

    // Signature generation with a deterministic nonce
    let signature = Signature::sign(message, &keys, None)?;

    // Verification of the signature
    let result = signature.verify(&curve, &keys.public_key(), message);

    println!("Verification result: {:?}", result);
    assert!(result);
    Ok(())
}
