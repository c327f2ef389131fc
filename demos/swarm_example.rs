use tracing::info;
use tracing_subscriber::fmt;

use swarm_rts::config::SchemeConfig;
use swarm_rts::{
    ElGamalKeyPair, PairingEngine, SignerSet, SplitStrategy, SwarmThresholdScheme,
    TransformableThreshold,
};

const SWARM_SIZE: usize = 6;
const MAX_THRESHOLD: usize = 6;
const THRESHOLD: usize = 4;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    fmt()
        .with_max_level(tracing::Level::INFO)
        .with_span_events(fmt::format::FmtSpan::ENTER | fmt::format::FmtSpan::CLOSE)
        .with_target(false)
        .with_ansi(false)
        .init();

    let config = SchemeConfig::new(SWARM_SIZE, MAX_THRESHOLD)?.with_seed(42);
    let mut rng = config.rng();
    let scheme = SwarmThresholdScheme::<PairingEngine>::new(config)?;

    info!(
        swarm_size = SWARM_SIZE,
        max_threshold = MAX_THRESHOLD,
        threshold = THRESHOLD,
        "starting swarm example"
    );

    let (params, secret) = scheme.setup(&mut rng)?;
    let keys = scheme.keygen(&mut rng, &params)?;

    let message = 123_456_789u64.to_be_bytes();

    // First THRESHOLD signers, selected by bitmap as a transport layer would send it
    let bitmap = SignerSet::first(THRESHOLD).to_bitmap();
    let set = SignerSet::from_bitmap(&bitmap, keys.registry.len())?;
    let coalition = keys.registry.resolve(&set)?;
    let partials = scheme.collect_partial_signatures(
        &keys.params,
        &keys.shares,
        &coalition,
        THRESHOLD,
        &message,
    )?;

    // Aggregate for one ephemeral verifier
    let verifier = ElGamalKeyPair::generate(&mut rng, keys.params.g());
    let sigma = scheme.aggregate(&mut rng, &keys.params, &secret, &partials, verifier.public())?;

    let report = scheme.verify_detailed(&keys.params, &keys.registry, &sigma, &verifier, &message)?;
    info!(
        accepted = report.accepted,
        rejected = report.rejected_signers.len(),
        "exact verification finished"
    );

    let batch = scheme.batch_verify(
        &mut rng,
        &keys.params,
        &keys.registry,
        &sigma,
        &verifier,
        &message,
    )?;
    info!(accepted = batch, "batch verification finished");

    // Split the last three signers off under a new head
    let head = ElGamalKeyPair::generate(&mut rng, keys.params.g());
    let mut sub_shares = keys.shares[SWARM_SIZE - 3..].to_vec();
    let sub = scheme.split_swarm(
        &mut rng,
        &keys.params,
        &secret,
        &mut sub_shares,
        &head,
        SplitStrategy::Full,
    )?;

    let sub_coalition = keys.registry.resolve(&sub.members)?;
    let sub_partials = scheme.collect_partial_signatures(
        &sub.params,
        &sub_shares,
        &sub_coalition,
        sub.members.len(),
        &message,
    )?;
    let sub_sigma = scheme.aggregate(
        &mut rng,
        &sub.params,
        &sub.secret,
        &sub_partials,
        verifier.public(),
    )?;
    let sub_ok = scheme.verify(&sub.params, &keys.registry, &sub_sigma, &verifier, &message)?;
    info!(
        members = sub.members.len(),
        accepted = sub_ok,
        "sub-swarm signature verified"
    );

    Ok(())
}
