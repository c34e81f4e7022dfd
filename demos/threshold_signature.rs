use edwards_threshold::coordinator::Coordinator;
use edwards_threshold::party::Party;
use edwards_threshold::CurveParameters;
use rand_core::OsRng;

const SIGNERS: usize = 3;

fn main() -> edwards_threshold::Result<()> {
    #[cfg(feature = "telemetry")]
    {
        let subscriber = edwards_threshold::telemetry::get_subscriber(
            "threshold_signature".into(),
            "info".into(),
            std::io::stdout,
        );
        if let Err(error) = edwards_threshold::telemetry::init_subscriber(subscriber) {
            eprintln!("{error}");
        }
    }

    let curve = CurveParameters::ed25519();
    let mut csprng = OsRng;

    // Message to be signed
    let message_to_sign = b"Hello World".to_vec();

    // The first round of public keys aggregation
    let coordinator = Coordinator::new(&curve, SIGNERS, message_to_sign.as_slice())?;
    let (parties, key_messages): (Vec<_>, Vec<_>) = (0..SIGNERS)
        .map(|_| Party::new(&curve, message_to_sign.as_slice(), &mut csprng))
        .unzip();
    let (coordinator, aggregated_public_key) = coordinator.aggregate_public_keys(key_messages)?;

    // The second round of public nonces aggregation
    let mut nonce_messages = Vec::with_capacity(SIGNERS);
    let mut signing_parties = Vec::with_capacity(SIGNERS);
    for party in parties {
        let (party, nonce_message) = party.generate_nonce(aggregated_public_key, &mut csprng)?;
        signing_parties.push(party);
        nonce_messages.push(nonce_message);
    }
    let (coordinator, aggregated_nonce) = coordinator.aggregate_nonces(nonce_messages)?;

    // The third round of partial signatures aggregation
    let mut partial_signatures = Vec::with_capacity(SIGNERS);
    let mut waiting_parties = Vec::with_capacity(SIGNERS);
    for party in signing_parties {
        let (party, partial_signature) = party.generate_partial_signature(aggregated_nonce)?;
        waiting_parties.push(party);
        partial_signatures.push(partial_signature);
    }
    let (coordinator, combined_signature) = coordinator.aggregate_signatures(partial_signatures)?;

    for party in waiting_parties {
        let party = party.set_combined_signature(combined_signature)?;
        assert!(party.verify_signature());
    }

    let result = coordinator.verify_signature();
    println!("Signature: {}", hex::encode(coordinator.get_signature().to_bytes()));
    println!("Verification result: {:?}", result);
    assert!(result);
    Ok(())
}
