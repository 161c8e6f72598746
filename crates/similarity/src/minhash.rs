//! MinHash signatures over token-hash sets.
//!
//! A family of hash functions is derived from one 64-bit seed: slot `j`
//! remixes every element with a key drawn from `splitmix64`, then keeps the
//! minimum. Equal seeds give bit-identical signatures.

use rayon::prelude::*;
use xxhash_rust::xxh3::xxh3_64_with_seed;

/// Signature of `unique` with `bands` slots.
///
/// An empty set yields all `u64::MAX`.
pub fn minhash_slots(unique: &[u64], bands: usize, seed: u64, use_parallel: bool) -> Vec<u64> {
    if bands == 0 {
        return Vec::new();
    }
    if unique.is_empty() {
        return vec![u64::MAX; bands];
    }

    let mut result = Vec::with_capacity(bands);
    if use_parallel {
        (0..bands)
            .into_par_iter()
            .map(|j| compute_slot(unique, j, seed))
            .collect_into_vec(&mut result);
    } else {
        result.extend((0..bands).map(|j| compute_slot(unique, j, seed)));
    }
    result
}

#[inline]
pub(crate) fn compute_slot(unique: &[u64], j: usize, seed: u64) -> u64 {
    let step = (j as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    let key = splitmix64(seed.wrapping_add(step));
    unique.iter().map(|&v| mix_u64(v, key)).min().unwrap_or(u64::MAX)
}

#[inline]
pub(crate) fn mix_u64(x: u64, key: u64) -> u64 {
    let mut h = xxh3_64_with_seed(&x.to_le_bytes(), key);
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51_afd7_ed55_8ccd);
    h ^= h >> 33;
    h = h.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    h ^ (h >> 33)
}

#[inline]
pub(crate) fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
