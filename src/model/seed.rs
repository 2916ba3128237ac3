use crc::{CRC_64_ECMA_182, Crc};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::input::toc::SampleKey;

const CRC64: Crc<u64> = Crc::<u64>::new(&CRC_64_ECMA_182);

pub type TrialRng = ChaCha20Rng;

pub fn sample_seed(base: u64, key: &SampleKey) -> u64 {
    let mut digest = CRC64.digest();
    digest.update(key.patient_id.as_bytes());
    digest.update(b"\0");
    digest.update(key.sample_id.as_bytes());
    base ^ digest.finalize()
}

pub fn sample_rng(base: u64, key: &SampleKey) -> TrialRng {
    ChaCha20Rng::seed_from_u64(sample_seed(base, key))
}

pub fn shared_rng(base: u64) -> TrialRng {
    ChaCha20Rng::seed_from_u64(base)
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/seed.rs"]
mod tests;
