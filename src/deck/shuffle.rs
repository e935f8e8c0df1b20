//! Fisher-Yates shuffle.
//!
//! Walks from the last index down to 1, swapping each slot with a
//! uniformly chosen slot at or before it. Every permutation is equally
//! likely given a uniform RNG.

use crate::core::GameRng;

/// Shuffle a slice in place.
pub fn shuffle_in_place<T>(items: &mut [T], rng: &mut GameRng) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_index(i);
        items.swap(i, j);
    }
}

/// Return a shuffled copy, leaving `items` untouched.
#[must_use]
pub fn shuffle<T: Clone>(items: &[T], rng: &mut GameRng) -> Vec<T> {
    let mut out = items.to_vec();
    shuffle_in_place(&mut out, rng);
    out
}
