#![no_main]

mod common;

use libfuzzer_sys::fuzz_target;
use the_morph_lib::build_plan;

use crate::common::pair_from_bytes;

fuzz_target!(|data: &[u8]| {
  let pair = pair_from_bytes(data);
  let plan = build_plan(&pair.source, &pair.target);

  assert_eq!(plan.apply(&pair.source), pair.target);
  assert_eq!(
    plan.pairs.len() + plan.deletions.len(),
    pair.source.len()
  );
  assert_eq!(
    plan.pairs.len() + plan.insertions.len(),
    pair.target.len()
  );
  assert!(plan.highlights.iter().all(|index| {
    plan.moves.iter().any(|pair| pair.source == *index)
  }));
  // without moves the survivors already stand in target order
  if plan.moves.is_empty() {
    assert_eq!(plan.survivors(), plan.pairs);
  }
  assert_eq!(plan, build_plan(&pair.source, &pair.target));
});
