//! Aerial trick selection
//!
//! Pure functions: the tier union is built fresh per decision, the previous
//! pick is filtered out, and the RNG picks uniformly from what is left.
//! Duplicates across tiers are kept, so a trick listed in two unlocked tiers
//! is twice as likely.

use super::config::TrickTiers;
use super::trick_catalog::TrickKind;
use rand::seq::SliceRandom;
use rand::Rng;

/// Union of every tier unlocked at `boost`, in tier order.
pub fn candidate_pool(boost: f32, tiers: &TrickTiers) -> Vec<TrickKind> {
    tiers
        .tiers
        .iter()
        .filter(|tier| tier.is_unlocked(boost))
        .flat_map(|tier| tier.tricks.iter().copied())
        .collect()
}

/// `pool` without any occurrence of `last`; the full pool if that would
/// leave nothing.
pub fn without_repeat(pool: &[TrickKind], last: Option<TrickKind>) -> Vec<TrickKind> {
    let filtered: Vec<TrickKind> =
        pool.iter().copied().filter(|kind| Some(*kind) != last).collect();
    if filtered.is_empty() {
        pool.to_vec()
    } else {
        filtered
    }
}

/// Uniform pick honoring the no-immediate-repeat rule. `None` only for an
/// empty pool.
pub fn choose_trick<R: Rng + ?Sized>(
    pool: &[TrickKind],
    last: Option<TrickKind>,
    rng: &mut R,
) -> Option<TrickKind> {
    without_repeat(pool, last).choose(rng).copied()
}
