//! Character-level morphing between two strings.
//!
//! [`align`] matches characters, [`plan`] turns the matches into deletions,
//! moves and insertions, [`movers`] picks out the characters that truly move,
//! and [`script`] lays the plan out as timed frames. Everything here is a pure
//! function of its inputs; playback lives in `the-morph-event`.

pub mod align;
pub mod config;
pub mod letter;
pub mod morph;
pub mod movers;
pub mod plan;
pub mod script;

pub use align::AlignmentPair;
pub use config::{
  ConfigError,
  MorphConfig,
  PhaseDurations,
};
pub use letter::{
  LetterId,
  LetterItem,
};
pub use morph::Morph;
pub use plan::{
  EditPlan,
  Insertion,
  build_plan,
};
pub use script::{
  AnimationFrame,
  FrameScript,
  Phase,
  build_script,
};
