use super::RngCore;

/// The `wyrng` stream of the `wyhash` crate with an additional output mix,
/// used as the seeded generator of every simulation step
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WyHash {
    state: u64,
}

impl RngCore for WyHash {
    type Seed = [u8; 8];

    #[must_use]
    #[inline]
    fn from_seed(seed: Self::Seed) -> Self {
        Self {
            state: u64::from_le_bytes(seed),
        }
    }

    #[must_use]
    #[inline]
    fn sample_u64(&mut self) -> u64 {
        mix(wyhash::wyrng(&mut self.state))
    }
}

/// Input-dependent xorshift between two multiplications
const fn mix(value: u64) -> u64 {
    const MULTIPLIER: u64 = 0x6eed_0e9d_a4d9_4a4f;

    let value = value.wrapping_mul(MULTIPLIER);
    let value = value ^ ((value >> 32) >> (value >> 60));

    value.wrapping_mul(MULTIPLIER)
}
