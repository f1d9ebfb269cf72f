//! Seed derivation for multi-trial runs.

/// Golden-ratio increment used to spread trial indices.
const TRIAL_MIX: u64 = 0x9e3779b97f4a7c15;

/// Salt separating parameter sampling from grid generation.
const PARAM_SALT: u64 = 0x517cc1b727220a95;

/// Derives the seed for trial `index` of a run seeded with `master`.
///
/// The derivation is:
/// - Deterministic: same inputs always give the same seed
/// - Isolated: running more trials does not change earlier trials' seeds
///
/// The result is passed through a SplitMix64 finalizer so neighbouring
/// indices produce unrelated ChaCha streams.
pub fn derive_seed(master: u64, index: u64) -> u64 {
    let mut z = master
        .wrapping_mul(TRIAL_MIX)
        .wrapping_add(index.wrapping_mul(PARAM_SALT))
        .wrapping_add(TRIAL_MIX);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Seed for the scenario parameter sampler (track counts, heights, densities).
///
/// Kept separate from the trial seeds so that changing how parameters are
/// sampled never perturbs the grids themselves.
pub fn parameter_seed(master: u64) -> u64 {
    derive_seed(master ^ PARAM_SALT, u64::MAX)
}
