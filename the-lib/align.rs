//! Character alignment between a source and a target sequence.
//!
//! [`align`] computes a longest common subsequence and returns it as index
//! pairs that increase in both coordinates. [`relocate`] pairs the leftovers:
//! characters present on both sides that could not be kept in order.

use std::collections::{
  BTreeMap,
  VecDeque,
};

use serde::Serialize;

/// A source position matched to a target position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct AlignmentPair {
  pub source: usize,
  pub target: usize,
}

impl AlignmentPair {
  pub const fn new(source: usize, target: usize) -> Self {
    Self { source, target }
  }

  /// Signed distance the character travels, `target - source`.
  pub fn shift(&self) -> isize {
    self.target as isize - self.source as isize
  }

  pub fn is_stationary(&self) -> bool {
    self.source == self.target
  }
}

/// Suffix LCS lengths: `get(i, j)` is the LCS length of `source[i..]` and
/// `target[j..]`.
struct LcsTable {
  width: usize,
  cells: Vec<u32>,
}

impl LcsTable {
  fn new(source: &[char], target: &[char]) -> Self {
    let width = target.len() + 1;
    let mut cells = vec![0u32; (source.len() + 1) * width];
    for i in (0..source.len()).rev() {
      for j in (0..target.len()).rev() {
        cells[i * width + j] = if source[i] == target[j] {
          cells[(i + 1) * width + j + 1] + 1
        } else {
          cells[(i + 1) * width + j].max(cells[i * width + j + 1])
        };
      }
    }
    Self { width, cells }
  }

  fn get(&self, i: usize, j: usize) -> u32 {
    self.cells[i * self.width + j]
  }
}

/// Longest common subsequence of `source` and `target` as ordered pairs.
///
/// Among several maximal alignments the earliest target positions win: the
/// trace walks forward from the start of both sequences, always takes a match
/// when the characters are equal, and otherwise skips the source character
/// whenever that does not shorten the result. "ab" -> "ba" therefore keeps
/// the source 'b' (at 1) matched to target 0, not the source 'a'.
pub fn align(source: &[char], target: &[char]) -> Vec<AlignmentPair> {
  // The trace always takes the diagonal on a common prefix, so it can be
  // emitted without touching the table. A common suffix can't: an earlier
  // equal character in source would win the match.
  let prefix = source
    .iter()
    .zip(target)
    .take_while(|(a, b)| a == b)
    .count();
  let mut pairs: Vec<AlignmentPair> = (0..prefix).map(|i| AlignmentPair::new(i, i)).collect();

  let source = &source[prefix..];
  let target = &target[prefix..];
  if source.is_empty() || target.is_empty() {
    return pairs;
  }

  let table = LcsTable::new(source, target);
  pairs.reserve(table.get(0, 0) as usize);

  let (mut i, mut j) = (0, 0);
  while i < source.len() && j < target.len() {
    if source[i] == target[j] {
      pairs.push(AlignmentPair::new(prefix + i, prefix + j));
      i += 1;
      j += 1;
    } else if table.get(i + 1, j) >= table.get(i, j + 1) {
      i += 1;
    } else {
      j += 1;
    }
  }

  pairs
}

/// Pairs characters left unmatched by `anchors` that still exist on both
/// sides.
///
/// Unmatched source characters are visited in ascending order and each takes
/// the earliest free target position holding the same character. The result
/// is sorted by source index but, unlike [`align`], need not be monotone in
/// target. No index already used by `anchors` is reused.
pub fn relocate(
  source: &[char],
  target: &[char],
  anchors: &[AlignmentPair],
) -> Vec<AlignmentPair> {
  let mut source_used = vec![false; source.len()];
  let mut target_used = vec![false; target.len()];
  for pair in anchors {
    source_used[pair.source] = true;
    target_used[pair.target] = true;
  }

  let mut free: BTreeMap<char, VecDeque<usize>> = BTreeMap::new();
  for (position, ch) in target.iter().enumerate() {
    if !target_used[position] {
      free.entry(*ch).or_default().push_back(position);
    }
  }
  if free.is_empty() {
    return Vec::new();
  }

  source
    .iter()
    .enumerate()
    .filter(|(index, _)| !source_used[*index])
    .filter_map(|(index, ch)| {
      let position = free.get_mut(ch)?.pop_front()?;
      Some(AlignmentPair::new(index, position))
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn chars(text: &str) -> Vec<char> {
    text.chars().collect()
  }

  fn pairs(list: &[(usize, usize)]) -> Vec<AlignmentPair> {
    list
      .iter()
      .map(|&(source, target)| AlignmentPair::new(source, target))
      .collect()
  }

  #[test]
  fn empty_inputs_align_to_nothing() {
    assert!(align(&[], &[]).is_empty());
    assert!(align(&chars("abc"), &[]).is_empty());
    assert!(align(&[], &chars("abc")).is_empty());
  }

  #[test]
  fn identical_inputs_align_diagonally() {
    assert_eq!(
      align(&chars("word"), &chars("word")),
      pairs(&[(0, 0), (1, 1), (2, 2), (3, 3)])
    );
  }

  #[test]
  fn removed_letters_are_skipped() {
    assert_eq!(
      align(&chars("apple"), &chars("ape")),
      pairs(&[(0, 0), (1, 1), (4, 2)])
    );
  }

  #[test]
  fn inserted_letters_are_skipped() {
    assert_eq!(
      align(&chars("cat"), &chars("chart")),
      pairs(&[(0, 0), (1, 2), (2, 4)])
    );
  }

  #[test]
  fn first_reachable_match_wins() {
    // Both the 'a' at 1 and the 'a' at 3 could match; the earlier one does.
    assert_eq!(align(&chars("xaya"), &chars("a")), pairs(&[(1, 0)]));
    assert_eq!(align(&chars("a"), &chars("xaya")), pairs(&[(0, 1)]));
  }

  #[test]
  fn source_skip_preferred_on_equal_length() {
    // "ab" vs "ba": one match either way, the source 'a' is dropped first so
    // the later source 'b' takes the earliest target position.
    assert_eq!(align(&chars("ab"), &chars("ba")), pairs(&[(1, 0)]));
    assert_eq!(align(&chars("abc"), &chars("cab")), pairs(&[(0, 1), (1, 2)]));
  }

  #[test]
  fn pairs_are_strictly_increasing() {
    let result = align(&chars("the quick brown fox"), &chars("quick the fox brown"));
    assert!(
      result
        .windows(2)
        .all(|w| w[0].source < w[1].source && w[0].target < w[1].target)
    );
  }

  #[test]
  fn relocate_pairs_out_of_order_letters() {
    let source = chars("bag");
    let target = chars("gab");
    let anchors = align(&source, &target);
    assert_eq!(anchors, pairs(&[(2, 0)]));
    assert_eq!(
      relocate(&source, &target, &anchors),
      pairs(&[(0, 2), (1, 1)])
    );
  }

  #[test]
  fn relocate_never_reuses_indices() {
    let source = chars("aab");
    let target = chars("baa");
    let anchors = align(&source, &target);
    let relocated = relocate(&source, &target, &anchors);
    let mut targets: Vec<_> = anchors
      .iter()
      .chain(&relocated)
      .map(|pair| pair.target)
      .collect();
    targets.sort_unstable();
    targets.dedup();
    assert_eq!(targets.len(), anchors.len() + relocated.len());
  }

  #[test]
  fn relocate_ignores_disjoint_letters() {
    let source = chars("abc");
    let target = chars("xyz");
    assert!(relocate(&source, &target, &align(&source, &target)).is_empty());
  }

  #[test]
  fn shift_is_signed() {
    assert_eq!(AlignmentPair::new(4, 2).shift(), -2);
    assert_eq!(AlignmentPair::new(1, 3).shift(), 2);
    assert!(AlignmentPair::new(3, 3).is_stationary());
  }
}
