#![no_main]

mod common;

use libfuzzer_sys::fuzz_target;
use the_morph_lib::{
  Morph,
  MorphConfig,
  Phase,
  letter::text_of,
};

use crate::common::pair_from_bytes;

fuzz_target!(|data: &[u8]| {
  let pair = pair_from_bytes(data);
  let source: String = pair.source.iter().collect();
  let target: String = pair.target.iter().collect();
  let morph = Morph::new(&source, &target, &MorphConfig::default());
  let script = morph.script();

  assert_eq!(script.idle_frame().phase, Phase::Idle);
  assert_eq!(text_of(&script.idle_frame().letters), source);
  assert_eq!(script.final_frame().phase, Phase::Final);
  assert_eq!(text_of(&script.final_frame().letters), target);
  assert!(script.windows(2).all(|w| w[0].phase <= w[1].phase));
});
