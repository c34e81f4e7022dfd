#![no_main]

use libfuzzer_sys::fuzz_target;

use edwards_threshold::coordinator::Coordinator;
use edwards_threshold::party::Party;
use edwards_threshold::CurveParameters;
use rand::rngs::StdRng;
use rand::SeedableRng;

fuzz_target!(|data: &[u8]| {
    let curve = CurveParameters::ed25519();

    // Randomness source
    let mut seeded_rng = StdRng::seed_from_u64(123);

    // The first round of public keys aggregation
    let (first, first_key) = Party::new(&curve, data, &mut seeded_rng);
    let (second, second_key) = Party::new(&curve, data, &mut seeded_rng);
    let coordinator = Coordinator::new(&curve, 2, data).expect("Error");
    let (coordinator, aggregated_public_key) = coordinator
        .aggregate_public_keys(vec![first_key, second_key])
        .expect("Error");

    // The second round of public nonces aggregation
    let (first, first_nonce) = first
        .generate_nonce(aggregated_public_key, &mut seeded_rng)
        .expect("Error");
    let (second, second_nonce) = second
        .generate_nonce(aggregated_public_key, &mut seeded_rng)
        .expect("Error");
    let (coordinator, aggregated_nonce) = coordinator
        .aggregate_nonces(vec![first_nonce, second_nonce])
        .expect("Error");

    // The third round of partial signatures aggregation
    let (_first, first_share) = first
        .generate_partial_signature(aggregated_nonce)
        .expect("Error");
    let (_second, second_share) = second
        .generate_partial_signature(aggregated_nonce)
        .expect("Error");
    let (coordinator, _combined) = coordinator
        .aggregate_signatures(vec![first_share, second_share])
        .expect("Error");

    assert!(coordinator.verify_signature());
});
