use curve25519_dalek::Scalar;
use ed25519_dalek::Verifier;
use edwards_threshold::arithmetic::sum_scalars;
use edwards_threshold::{
    combine_public_keys, combine_public_nonces, combine_signatures, derive_nonce,
    derive_public_key, generate_key, partial_sign, verify, CurveParameters, PartialSignature,
    PrivateKey, PublicKey, Signature,
};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use secrecy::ExposeSecret;

const MESSAGE_HEX: &str = "d04b98f48e8f8bcc15c6ae5ac050801cd6dcfd428fb5f9e65c4e16e7807340fa";

struct Signer<'c> {
    private_key: PrivateKey<'c>,
    public_key: PublicKey,
    private_nonce: PrivateKey<'c>,
    public_nonce: PublicKey,
}

fn signers<'c>(
    curve: &'c CurveParameters,
    n: usize,
    message: &[u8],
    rng: &mut ChaCha20Rng,
) -> Vec<Signer<'c>> {
    (0..n)
        .map(|_| {
            let private_key = generate_key(curve, rng);
            let public_key = derive_public_key(&private_key);
            let (private_nonce, public_nonce) = derive_nonce(&private_key, message, None).unwrap();
            Signer {
                private_key,
                public_key,
                private_nonce,
                public_nonce,
            }
        })
        .collect()
}

fn sign_round(signers: &[Signer<'_>], message: &[u8]) -> (PublicKey, Signature) {
    let public_keys: Vec<PublicKey> = signers.iter().map(|s| s.public_key).collect();
    let public_nonces: Vec<PublicKey> = signers.iter().map(|s| s.public_nonce).collect();
    let aggregate_public_key = combine_public_keys(&public_keys).unwrap();
    let aggregate_public_nonce = combine_public_nonces(&public_nonces).unwrap();

    let partial_signatures: Vec<PartialSignature> = signers
        .iter()
        .map(|s| {
            partial_sign(
                message,
                &s.private_key,
                &aggregate_public_key,
                &s.private_nonce,
                &aggregate_public_nonce,
            )
        })
        .collect();
    (
        aggregate_public_key,
        combine_signatures(&partial_signatures).unwrap(),
    )
}

fn sign_with_summed_secrets(signers: &[Signer<'_>], message: &[u8]) -> Signature {
    let curve = signers[0].private_key.curve();
    let key_sum = sum_scalars(signers.iter().map(|s| s.private_key.expose_secret()));
    let nonce_sum = sum_scalars(signers.iter().map(|s| s.private_nonce.expose_secret()));
    Signature::sign_with_nonce(
        message,
        &PrivateKey::from_scalar(curve, key_sum).unwrap(),
        &PrivateKey::from_scalar(curve, nonce_sum).unwrap(),
    )
}

#[test]
fn test_three_signers_fixed_message() {
    let curve = CurveParameters::ed25519();
    let message = hex::decode(MESSAGE_HEX).unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(543212345);
    let signers = signers(&curve, 3, &message, &mut rng);

    let (aggregate_public_key, signature) = sign_round(&signers, &message);

    assert!(verify(&curve, &aggregate_public_key, &message, &signature));
    assert_eq!(signature, sign_with_summed_secrets(&signers, &message));
}

#[test]
fn test_combined_signature_equals_summed_secret_signature() {
    let curve = CurveParameters::ed25519();
    let mut rng = ChaCha20Rng::seed_from_u64(7);

    for n in 2..=10 {
        for _ in 0..8 {
            let mut message = [0u8; 32];
            rng.fill(&mut message);
            let signers = signers(&curve, n, &message, &mut rng);

            let (aggregate_public_key, signature) = sign_round(&signers, &message);
            assert!(signature.verify(&curve, &aggregate_public_key, &message));
            assert_eq!(signature, sign_with_summed_secrets(&signers, &message));
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Corruption {
    PrivateKey,
    PublicKey,
    PrivateNonce,
    PublicNonce,
}

fn flip_bit(bytes: &[u8], bit: usize) -> Vec<u8> {
    let mut flipped = bytes.to_vec();
    flipped[bit / 8] ^= 1 << (bit % 8);
    flipped
}

// Runs a round where one signer's value is replaced by a bit-flipped copy
// before partial signing. Returns `None` when the flipped bytes do not decode.
fn corrupted_round_verifies<'c>(
    curve: &'c CurveParameters,
    signers: &[Signer<'c>],
    message: &[u8],
    victim: usize,
    corruption: Corruption,
    bit: usize,
) -> Option<bool> {
    let original_public_keys: Vec<PublicKey> = signers.iter().map(|s| s.public_key).collect();
    let original_aggregate_key = combine_public_keys(&original_public_keys).unwrap();

    let mut public_keys = original_public_keys.clone();
    let mut public_nonces: Vec<PublicKey> = signers.iter().map(|s| s.public_nonce).collect();
    let mut private_keys: Vec<PrivateKey<'c>> =
        signers.iter().map(|s| s.private_key.clone()).collect();
    let mut private_nonces: Vec<PrivateKey<'c>> =
        signers.iter().map(|s| s.private_nonce.clone()).collect();

    match corruption {
        Corruption::PrivateKey => {
            let bytes = flip_bit(&*private_keys[victim].to_bytes(), bit);
            private_keys[victim] = PrivateKey::from_bytes(curve, &bytes).ok()?;
        }
        Corruption::PublicKey => {
            let bytes = flip_bit(&public_keys[victim].to_bytes(), bit);
            public_keys[victim] = PublicKey::from_bytes(curve, &bytes).ok()?;
        }
        Corruption::PrivateNonce => {
            let bytes = flip_bit(&*private_nonces[victim].to_bytes(), bit);
            private_nonces[victim] = PrivateKey::from_bytes(curve, &bytes).ok()?;
        }
        Corruption::PublicNonce => {
            let bytes = flip_bit(&public_nonces[victim].to_bytes(), bit);
            public_nonces[victim] = PublicKey::from_bytes(curve, &bytes).ok()?;
        }
    }

    let aggregate_public_key = combine_public_keys(&public_keys).ok()?;
    let aggregate_public_nonce = combine_public_nonces(&public_nonces).ok()?;
    let partial_signatures: Vec<PartialSignature> = private_keys
        .iter()
        .zip(private_nonces.iter())
        .map(|(private_key, private_nonce)| {
            partial_sign(
                message,
                private_key,
                &aggregate_public_key,
                private_nonce,
                &aggregate_public_nonce,
            )
        })
        .collect();
    let signature = combine_signatures(&partial_signatures).ok()?;

    Some(verify(curve, &original_aggregate_key, message, &signature))
}

// Picks a bit whose flip still decodes to a valid point. Flipping the sign
// bit always gives the negated point, so the search terminates.
fn decodable_bit(curve: &CurveParameters, point: &PublicKey, rng: &mut ChaCha20Rng) -> usize {
    let encoded = point.to_bytes();
    let mut bits: Vec<usize> = (0..256).collect();
    bits.shuffle(rng);
    bits.into_iter()
        .find(|&bit| PublicKey::from_bytes(curve, &flip_bit(&encoded, bit)).is_ok())
        .unwrap()
}

#[test]
fn test_single_bit_corruption_breaks_verification() {
    let curve = CurveParameters::ed25519();
    let message = hex::decode(MESSAGE_HEX).unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(99);
    let corruptions = [
        Corruption::PrivateKey,
        Corruption::PublicKey,
        Corruption::PrivateNonce,
        Corruption::PublicNonce,
    ];

    let mut decoded_trials = [0usize; 4];
    for trial in 0..64 {
        let n = rng.gen_range(2..=5);
        let signers = signers(&curve, n, &message, &mut rng);
        let victim = rng.gen_range(0..n);
        let kind = trial % corruptions.len();
        let corruption = corruptions[kind];
        let bit = match corruption {
            Corruption::PublicKey => decodable_bit(&curve, &signers[victim].public_key, &mut rng),
            Corruption::PublicNonce => {
                decodable_bit(&curve, &signers[victim].public_nonce, &mut rng)
            }
            Corruption::PrivateKey | Corruption::PrivateNonce => rng.gen_range(0..256),
        };

        // None: the flipped bytes were already rejected while decoding
        if let Some(verified) =
            corrupted_round_verifies(&curve, &signers, &message, victim, corruption, bit)
        {
            decoded_trials[kind] += 1;
            assert!(
                !verified,
                "corrupted {corruption:?} bit {bit} of signer {victim} still verified"
            );
        }
    }
    for (corruption, count) in corruptions.iter().zip(decoded_trials) {
        assert!(count > 0, "no {corruption:?} trial reached verification");
    }
}

#[test]
fn test_curve_parameters_shared_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CurveParameters>();
    assert_send_sync::<PublicKey>();
    assert_send_sync::<Signature>();

    let curve = CurveParameters::ed25519();
    let message = hex::decode(MESSAGE_HEX).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4u64)
            .map(|seed| {
                let curve = &curve;
                let message = &message;
                scope.spawn(move || {
                    let mut rng = ChaCha20Rng::seed_from_u64(1000 + seed);
                    let signers = signers(curve, 3, message, &mut rng);
                    let (aggregate_public_key, signature) = sign_round(&signers, message);
                    assert_eq!(signature, sign_with_summed_secrets(&signers, message));
                    verify(curve, &aggregate_public_key, message, &signature)
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    });
}

#[test]
fn test_public_key_order_independence() {
    let curve = CurveParameters::ed25519();
    let mut rng = ChaCha20Rng::seed_from_u64(5);
    let mut public_keys: Vec<PublicKey> = (0..10)
        .map(|_| derive_public_key(&generate_key(&curve, &mut rng)))
        .collect();

    let expected = combine_public_keys(&public_keys).unwrap();
    for _ in 0..20 {
        public_keys.shuffle(&mut rng);
        assert_eq!(combine_public_keys(&public_keys).unwrap(), expected);
    }
}

#[test]
fn test_nonce_determinism() {
    let curve = CurveParameters::ed25519();
    let mut rng = ChaCha20Rng::seed_from_u64(11);
    let key = generate_key(&curve, &mut rng);

    let (first_private, first_public) = derive_nonce(&key, b"message", Some(&[3u8; 32])).unwrap();
    let (second_private, second_public) =
        derive_nonce(&key, b"message", Some(&[3u8; 32])).unwrap();
    assert_eq!(first_public, second_public);
    assert_eq!(first_private.expose_secret(), second_private.expose_secret());

    let (_, other_public) = derive_nonce(&key, b"messagf", Some(&[3u8; 32])).unwrap();
    assert_ne!(first_public, other_public);
}

#[test]
fn test_combined_signature_accepted_by_ed25519_verifier() {
    let curve = CurveParameters::ed25519();
    let message = hex::decode(MESSAGE_HEX).unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(12);
    let signers = signers(&curve, 4, &message, &mut rng);

    let (aggregate_public_key, signature) = sign_round(&signers, &message);

    let verifying_key =
        ed25519_dalek::VerifyingKey::from_bytes(&aggregate_public_key.to_bytes()).unwrap();
    let ed_signature = ed25519_dalek::Signature::from_bytes(&signature.to_bytes());
    assert!(verifying_key.verify(&message, &ed_signature).is_ok());
}

#[test]
fn test_tampered_signature_bytes_rejected() {
    let curve = CurveParameters::ed25519();
    let message = hex::decode(MESSAGE_HEX).unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(13);
    let signers = signers(&curve, 3, &message, &mut rng);
    let (aggregate_public_key, signature) = sign_round(&signers, &message);

    let encoded = signature.to_bytes();
    for bit in (0..512).step_by(7) {
        let flipped = flip_bit(&encoded, bit);
        if let Ok(tampered) = Signature::from_bytes(&flipped) {
            assert!(!verify(&curve, &aggregate_public_key, &message, &tampered));
        }
    }
}

#[test]
fn test_scalar_sum_helper_matches_addition() {
    let values = [Scalar::from(4u64), Scalar::from(9u64), -Scalar::from(2u64)];
    assert_eq!(sum_scalars(values.iter()), Scalar::from(11u64));
}
