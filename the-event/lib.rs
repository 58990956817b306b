//! Time-driven side of the-morph: playback scheduling and async hooks.

pub mod autoplay;
pub mod clock;
pub mod debounce;
pub mod scheduler;

pub use autoplay::{
  AutoplayEvent,
  AutoplayHook,
};
pub use clock::{
  FrameClock,
  TokioClock,
};
pub use debounce::{
  AsyncHook,
  send_blocking,
};
pub use scheduler::{
  PhaseScheduler,
  PlaybackEvent,
  RunHandle,
  RunId,
  RunOutcome,
  Snapshot,
  StartOutcome,
  VisibleState,
};
