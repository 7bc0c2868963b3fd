//! Reproducible per-stream seeds derived from one simulation seed.

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Deterministically derive the seed of one random stream.
///
/// Arrival and service samplers of the same simulation get unrelated
/// streams while the whole run stays reproducible from a single seed.
pub fn derive_stream_seed(seed: u64, domain: u64) -> u64 {
    splitmix64(seed ^ splitmix64(domain))
}

pub const STREAM_DOMAIN_ARRIVAL: u64 = 0x4152_5249_5641_4C53; // "ARRIVALS" (tag)
pub const STREAM_DOMAIN_SERVICE: u64 = 0x5345_5256_4943_4553; // "SERVICES" (tag)
