//! Separates characters that travel with the crowd from the ones that really
//! move.
//!
//! Deleting a prefix shifts every survivor left by the same amount. Flagging
//! all of them as moved is noise, so only characters whose shift differs from
//! the most common one are reported.

use std::{
  cmp::Reverse,
  collections::{
    BTreeMap,
    BTreeSet,
  },
};

use crate::align::AlignmentPair;

/// The most common shift across `pairs`.
///
/// Equal counts resolve to the smallest absolute shift, then to the smallest
/// signed shift. Returns `None` when there are no pairs.
pub fn bulk_shift(pairs: &[AlignmentPair]) -> Option<isize> {
  let mut counts: BTreeMap<isize, usize> = BTreeMap::new();
  for pair in pairs {
    *counts.entry(pair.shift()).or_default() += 1;
  }

  counts
    .into_iter()
    .min_by_key(|&(shift, count)| (Reverse(count), shift.unsigned_abs(), shift))
    .map(|(shift, _)| shift)
}

/// Pairs whose rank among the survivors changes.
///
/// A survivor's rank in source order is compared with its rank in target
/// order. Closing the gap left by a deletion or opening one for an insertion
/// shifts indices but keeps ranks, so only real reorderings are returned.
/// The result is sorted by source index.
pub fn reordered(pairs: &[AlignmentPair]) -> Vec<AlignmentPair> {
  let mut by_source = pairs.to_vec();
  by_source.sort_unstable();
  let mut by_target = by_source.clone();
  by_target.sort_unstable_by_key(|pair| pair.target);

  by_source
    .iter()
    .zip(&by_target)
    .filter(|(ranked_by_source, ranked_by_target)| ranked_by_source != ranked_by_target)
    .map(|(pair, _)| *pair)
    .collect()
}

/// Source indices of the `moves` whose shift deviates from the bulk shift.
///
/// The bulk shift is tallied over every pair, so a uniform slide of the
/// survivors sets it; only members of `moves` can be reported.
pub fn classify(pairs: &[AlignmentPair], moves: &[AlignmentPair]) -> BTreeSet<usize> {
  let Some(bulk) = bulk_shift(pairs) else {
    return BTreeSet::new();
  };

  moves
    .iter()
    .filter(|pair| pair.shift() != bulk)
    .map(|pair| pair.source)
    .collect()
}
