use std::collections::BTreeSet;

use serde::Serialize;

use crate::{
  align::{
    self,
    AlignmentPair,
  },
  movers,
};

/// A character that only exists in the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Insertion {
  pub ch:       char,
  pub position: usize,
}

/// Everything needed to turn a source sequence into a target sequence.
///
/// `pairs` is the single alignment every other field is derived from. Source
/// indices split into `deletions` and paired indices, target indices into
/// insertion positions and paired indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditPlan {
  /// Matched characters, sorted by source index.
  pub pairs:      Vec<AlignmentPair>,
  /// Unmatched source indices, descending so that removing them one by one
  /// never shifts an index that is still to be removed.
  pub deletions:  Vec<usize>,
  /// Unmatched target characters, ascending by position.
  pub insertions: Vec<Insertion>,
  /// Pairs whose rank among the survivors changes, sorted by source index.
  /// Survivors that only slide to close or open a gap are not moves.
  pub moves:      Vec<AlignmentPair>,
  /// Source indices of moves that deviate from the bulk shift.
  pub highlights: BTreeSet<usize>,
  pub source_len: usize,
  pub target_len: usize,
}

pub fn build_plan(source: &[char], target: &[char]) -> EditPlan {
  let anchors = align::align(source, target);
  let relocated = align::relocate(source, target, &anchors);

  let mut pairs = anchors;
  pairs.extend(relocated);
  pairs.sort_unstable();

  let mut source_paired = vec![false; source.len()];
  let mut target_paired = vec![false; target.len()];
  for pair in &pairs {
    source_paired[pair.source] = true;
    target_paired[pair.target] = true;
  }

  let deletions = (0..source.len())
    .rev()
    .filter(|&index| !source_paired[index])
    .collect();

  let insertions = target
    .iter()
    .enumerate()
    .filter(|&(position, _)| !target_paired[position])
    .map(|(position, &ch)| Insertion { ch, position })
    .collect();

  let moves = movers::reordered(&pairs);
  let highlights = movers::classify(&pairs, &moves);

  EditPlan {
    pairs,
    deletions,
    insertions,
    moves,
    highlights,
    source_len: source.len(),
    target_len: target.len(),
  }
}

impl EditPlan {
  /// True when source and target are identical.
  pub fn is_noop(&self) -> bool {
    self.deletions.is_empty() && self.insertions.is_empty() && self.moves.is_empty()
  }

  /// Matched pairs in target order, i.e. the survivors as they stand once
  /// every move has happened.
  pub fn survivors(&self) -> Vec<AlignmentPair> {
    let mut survivors = self.pairs.clone();
    survivors.sort_unstable_by_key(|pair| pair.target);
    survivors
  }

  /// For every target position, the source index it came from.
  pub fn target_to_source(&self) -> Vec<Option<usize>> {
    let mut map = vec![None; self.target_len];
    for pair in &self.pairs {
      map[pair.target] = Some(pair.source);
    }
    map
  }

  /// Whether the character at `source` index is flagged as a true mover.
  pub fn is_highlighted(&self, source: usize) -> bool {
    self.highlights.contains(&source)
  }

  /// Replays the plan against `source`: deletions, then moves, then
  /// insertions.
  pub fn apply(&self, source: &[char]) -> Vec<char> {
    let mut working: Vec<(usize, char)> = source.iter().copied().enumerate().collect();
    for &index in &self.deletions {
      working.remove(index);
    }

    let mut target_of = vec![0; self.source_len];
    for pair in &self.pairs {
      target_of[pair.source] = pair.target;
    }
    working.sort_by_key(|&(index, _)| target_of[index]);

    let mut result: Vec<char> = working.into_iter().map(|(_, ch)| ch).collect();
    for insertion in &self.insertions {
      result.insert(insertion.position, insertion.ch);
    }
    result
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn chars(text: &str) -> Vec<char> {
    text.chars().collect()
  }

  fn plan(source: &str, target: &str) -> EditPlan {
    build_plan(&chars(source), &chars(target))
  }

  fn replays(source: &str, target: &str) -> bool {
    let source = chars(source);
    let target = chars(target);
    build_plan(&source, &target).apply(&source) == target
  }

  fn partitions(source: &str, target: &str) -> bool {
    let plan = plan(source, target);
    let mut sources: Vec<usize> = plan
      .deletions
      .iter()
      .copied()
      .chain(plan.pairs.iter().map(|pair| pair.source))
      .collect();
    sources.sort_unstable();
    let mut targets: Vec<usize> = plan
      .insertions
      .iter()
      .map(|insertion| insertion.position)
      .chain(plan.pairs.iter().map(|pair| pair.target))
      .collect();
    targets.sort_unstable();
    sources == (0..plan.source_len).collect::<Vec<_>>()
      && targets == (0..plan.target_len).collect::<Vec<_>>()
  }

  quickcheck::quickcheck! {
      fn test_plan_replays_to_target(a: String, b: String) -> bool {
          replays(&a, &b)
      }

      fn test_plan_partitions_indices(a: String, b: String) -> bool {
          partitions(&a, &b)
      }

      fn test_plan_is_deterministic(a: String, b: String) -> bool {
          plan(&a, &b) == plan(&a, &b)
      }

      fn test_highlights_are_moves(a: String, b: String) -> bool {
          let plan = plan(&a, &b);
          plan
              .highlights
              .iter()
              .all(|index| plan.moves.iter().any(|pair| pair.source == *index))
      }
  }

  #[test]
  fn identical_is_noop() {
    let plan = plan("word", "word");
    assert!(plan.is_noop());
    assert!(plan.deletions.is_empty());
    assert!(plan.insertions.is_empty());
    assert!(plan.moves.is_empty());
    assert!(plan.highlights.is_empty());
  }

  #[test]
  fn empty_source_only_inserts() {
    let plan = plan("", "word");
    assert_eq!(plan.insertions.len(), 4);
    assert!(plan.deletions.is_empty());
    assert!(plan.moves.is_empty());
    assert_eq!(
      plan.insertions.iter().map(|i| i.ch).collect::<String>(),
      "word"
    );
  }

  #[test]
  fn empty_target_only_deletes() {
    let plan = plan("word", "");
    assert_eq!(plan.deletions, vec![3, 2, 1, 0]);
    assert!(plan.insertions.is_empty());
    assert!(plan.moves.is_empty());
  }

  #[test]
  fn disjoint_deletes_and_inserts_everything() {
    let plan = plan("abc", "xyz");
    assert_eq!(plan.deletions, vec![2, 1, 0]);
    assert_eq!(plan.insertions.len(), 3);
    assert!(plan.moves.is_empty());
    assert!(plan.highlights.is_empty());
  }

  #[test]
  fn apple_to_ape() {
    let plan = plan("apple", "ape");
    assert_eq!(plan.deletions, vec![3, 2]);
    assert!(plan.insertions.is_empty());
    // The trailing 'e' only closes the gap; survivors keep their order.
    let survivors: Vec<usize> = plan.survivors().iter().map(|pair| pair.source).collect();
    assert_eq!(survivors, vec![0, 1, 4]);
    assert!(plan.moves.iter().all(|pair| pair.is_stationary()));
    assert!(plan.highlights.is_empty());
    assert!(replays("apple", "ape"));
  }

  #[test]
  fn cat_to_chart() {
    let plan = plan("cat", "chart");
    assert!(plan.deletions.is_empty());
    assert!(plan.moves.is_empty());
    assert_eq!(plan.insertions, vec![
      Insertion {
        ch:       'h',
        position: 1,
      },
      Insertion {
        ch:       'r',
        position: 3,
      },
    ]);
  }

  #[test]
  fn bag_to_gab() {
    let plan = plan("bag", "gab");
    assert!(plan.deletions.is_empty());
    assert!(plan.insertions.is_empty());
    assert_eq!(plan.moves, vec![
      AlignmentPair::new(0, 2),
      AlignmentPair::new(2, 0)
    ]);
    // Shifts are +2, 0, -2; the stationary 'a' sets the bulk shift.
    assert_eq!(plan.highlights, BTreeSet::from([0, 2]));
    assert!(replays("bag", "gab"));
  }

  #[test]
  fn prefix_deletion_shifts_without_highlighting() {
    let plan = plan("unhappy", "happy");
    assert_eq!(plan.deletions, vec![1, 0]);
    assert!(plan.moves.is_empty());
    assert!(plan.highlights.is_empty());
  }

  #[test]
  fn insertion_gap_is_not_a_move() {
    let plan = plan("qbcde", "bcdxe");
    assert_eq!(plan.deletions, vec![0]);
    assert_eq!(plan.insertions, vec![Insertion {
      ch:       'x',
      position: 3,
    }]);
    assert!(plan.moves.is_empty());
    // 'e' slides less than its neighbours but keeps its rank
    assert!(plan.highlights.is_empty());
  }

  #[test]
  fn target_to_source_maps_survivors() {
    let plan = plan("cat", "chart");
    assert_eq!(plan.target_to_source(), vec![
      Some(0),
      None,
      Some(1),
      None,
      Some(2)
    ]);
  }

  #[test]
  fn non_ascii_characters_align() {
    assert!(replays("naïve", "vaïne"));
    assert!(replays("日本語", "語本日"));
  }
}
