//! Turns an [`EditPlan`] into the frames a renderer plays back.
//!
//! Each phase is one entry in a static table: whether it applies to a plan
//! and how to build its frames. [`build_script`] walks the table once, so the
//! phase sequence for a plan can be checked with [`phases_for`] without
//! building any letters or running any timers.

use std::{
  collections::BTreeSet,
  fmt,
  ops::Deref,
  time::Duration,
};

use serde::{
  Deserialize,
  Serialize,
};
use smallvec::{
  SmallVec,
  smallvec,
};

use crate::{
  config::PhaseDurations,
  letter::{
    LetterId,
    LetterItem,
  },
  plan::EditPlan,
};

/// Animation stages, in playback order.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
  Idle,
  Deleting,
  Moving,
  Inserting,
  Final,
}

impl Phase {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Idle => "idle",
      Self::Deleting => "deleting",
      Self::Moving => "moving",
      Self::Inserting => "inserting",
      Self::Final => "final",
    }
  }
}

impl fmt::Display for Phase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// One immutable, timed snapshot of the letter sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnimationFrame {
  pub phase:    Phase,
  pub letters:  Vec<LetterItem>,
  /// Base hold time, before speed and reduced-motion adjustments.
  pub duration: Duration,
  /// Letters currently marked for deletion but still on screen.
  pub deleting: BTreeSet<LetterId>,
}

impl AnimationFrame {
  fn new(phase: Phase, letters: Vec<LetterItem>, duration: Duration) -> Self {
    Self {
      phase,
      letters,
      duration,
      deleting: BTreeSet::new(),
    }
  }
}

/// The ordered frames for one (source, target) pair.
///
/// Always starts with an `idle` frame and ends with a `final` frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FrameScript {
  frames: Vec<AnimationFrame>,
}

impl FrameScript {
  pub fn frames(&self) -> &[AnimationFrame] {
    &self.frames
  }

  pub fn idle_frame(&self) -> &AnimationFrame {
    &self.frames[0]
  }

  pub fn final_frame(&self) -> &AnimationFrame {
    &self.frames[self.frames.len() - 1]
  }

  /// Distinct phases in playback order.
  pub fn phases(&self) -> Vec<Phase> {
    let mut phases: Vec<Phase> = self.frames.iter().map(|frame| frame.phase).collect();
    phases.dedup();
    phases
  }

  /// Sum of the base durations of every frame.
  pub fn total_duration(&self) -> Duration {
    self.frames.iter().map(|frame| frame.duration).sum()
  }
}

impl Deref for FrameScript {
  type Target = [AnimationFrame];

  fn deref(&self) -> &Self::Target {
    &self.frames
  }
}

struct ScriptContext<'a> {
  plan:          &'a EditPlan,
  source:        &'a [char],
  target:        &'a [char],
  durations:     &'a PhaseDurations,
  deletion_hold: Duration,
}

type FrameBatch = SmallVec<[AnimationFrame; 2]>;

struct PhaseStep {
  phase:   Phase,
  applies: fn(&EditPlan) -> bool,
  frames:  fn(&ScriptContext<'_>) -> FrameBatch,
}

/// Content phases. `final` is appended after the table is exhausted.
const PHASE_STEPS: [PhaseStep; 4] = [
  PhaseStep {
    phase:   Phase::Idle,
    applies: always,
    frames:  idle_frames,
  },
  PhaseStep {
    phase:   Phase::Deleting,
    applies: has_deletions,
    frames:  deleting_frames,
  },
  PhaseStep {
    phase:   Phase::Moving,
    applies: has_moves,
    frames:  moving_frames,
  },
  PhaseStep {
    phase:   Phase::Inserting,
    applies: has_insertions,
    frames:  inserting_frames,
  },
];

fn always(_: &EditPlan) -> bool {
  true
}

fn has_deletions(plan: &EditPlan) -> bool {
  !plan.deletions.is_empty()
}

fn has_moves(plan: &EditPlan) -> bool {
  !plan.moves.is_empty()
}

fn has_insertions(plan: &EditPlan) -> bool {
  !plan.insertions.is_empty()
}

fn source_letters(source: &[char]) -> Vec<LetterItem> {
  source
    .iter()
    .enumerate()
    .map(|(index, &ch)| LetterItem::source(index, ch))
    .collect()
}

fn idle_frames(cx: &ScriptContext<'_>) -> FrameBatch {
  smallvec![AnimationFrame::new(
    Phase::Idle,
    source_letters(cx.source),
    cx.durations.for_phase(Phase::Idle),
  )]
}

fn deleting_frames(cx: &ScriptContext<'_>) -> FrameBatch {
  let deleting: BTreeSet<LetterId> = cx
    .plan
    .deletions
    .iter()
    .map(|&index| LetterId::Source(index))
    .collect();

  let marked = AnimationFrame {
    phase: Phase::Deleting,
    letters: source_letters(cx.source),
    duration: cx.durations.for_phase(Phase::Deleting),
    deleting: deleting.clone(),
  };

  let remaining = source_letters(cx.source)
    .into_iter()
    .filter(|letter| !deleting.contains(&letter.id))
    .collect();
  let removed = AnimationFrame::new(Phase::Deleting, remaining, cx.deletion_hold);

  smallvec![marked, removed]
}

fn moving_frames(cx: &ScriptContext<'_>) -> FrameBatch {
  let letters = cx
    .plan
    .survivors()
    .into_iter()
    .map(|pair| LetterItem::source(pair.source, cx.source[pair.source]))
    .collect();

  smallvec![AnimationFrame::new(
    Phase::Moving,
    letters,
    cx.durations.for_phase(Phase::Moving),
  )]
}

fn inserting_frames(cx: &ScriptContext<'_>) -> FrameBatch {
  let letters = cx
    .plan
    .target_to_source()
    .into_iter()
    .enumerate()
    .map(|(position, origin)| {
      match origin {
        Some(index) => LetterItem::source(index, cx.source[index]),
        None => LetterItem::inserted(position, cx.target[position]),
      }
    })
    .collect();

  smallvec![AnimationFrame::new(
    Phase::Inserting,
    letters,
    cx.durations.for_phase(Phase::Inserting),
  )]
}

/// Phases `build_script` emits for `plan`, in order.
pub fn phases_for(plan: &EditPlan) -> Vec<Phase> {
  PHASE_STEPS
    .iter()
    .filter(|step| (step.applies)(plan))
    .map(|step| step.phase)
    .chain([Phase::Final])
    .collect()
}

/// Builds the frame script for a plan.
///
/// `source` and `target` must be the sequences `plan` was built from.
pub fn build_script(
  plan: &EditPlan,
  source: &[char],
  target: &[char],
  durations: &PhaseDurations,
  deletion_hold: Duration,
) -> FrameScript {
  debug_assert_eq!(plan.source_len, source.len());
  debug_assert_eq!(plan.target_len, target.len());

  let cx = ScriptContext {
    plan,
    source,
    target,
    durations,
    deletion_hold,
  };

  let mut frames: Vec<AnimationFrame> = Vec::with_capacity(PHASE_STEPS.len() + 2);
  for step in PHASE_STEPS.iter().filter(|step| (step.applies)(plan)) {
    frames.extend((step.frames)(&cx));
  }

  // idle always applies, so there is a last content frame
  let letters = frames
    .last()
    .map(|frame| frame.letters.clone())
    .unwrap_or_default();
  frames.push(AnimationFrame::new(Phase::Final, letters, Duration::ZERO));

  FrameScript { frames }
}
