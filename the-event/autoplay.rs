//! Plays the morph for the latest input once typing settles.

use std::time::Duration;

use tokio::time::Instant;

use crate::{
  debounce::AsyncHook,
  scheduler::{
    PhaseScheduler,
    StartOutcome,
  },
};

/// Quiet period after the last input change before playback starts.
pub const DEFAULT_DEBOUNCE_MS: u64 = 250;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoplayEvent {
  /// New (source, target) pair. Only the last one in a burst is played.
  Input { source: String, target: String },
  /// Drops pending input and resets the scheduler to its idle frame.
  Stop,
}

pub struct AutoplayHook {
  scheduler: PhaseScheduler,
  debounce:  Duration,
  pending:   Option<(String, String)>,
}

impl AutoplayHook {
  pub fn new(scheduler: PhaseScheduler) -> Self {
    Self::with_debounce(scheduler, Duration::from_millis(DEFAULT_DEBOUNCE_MS))
  }

  pub fn with_debounce(scheduler: PhaseScheduler, debounce: Duration) -> Self {
    Self {
      scheduler,
      debounce,
      pending: None,
    }
  }
}

impl AsyncHook for AutoplayHook {
  type Event = AutoplayEvent;

  fn handle_event(&mut self, event: Self::Event, _timeout: Option<Instant>) -> Option<Instant> {
    match event {
      AutoplayEvent::Input { source, target } => {
        self.pending = Some((source, target));
        Some(Instant::now() + self.debounce)
      },
      AutoplayEvent::Stop => {
        self.pending = None;
        self.scheduler.reset();
        None
      },
    }
  }

  fn finish_debounce(&mut self) {
    let Some((source, target)) = self.pending.take() else {
      return;
    };
    // new input cancels whatever was playing, so the start below can't clash
    self.scheduler.set_input(&source, &target);
    if let StartOutcome::AlreadyRunning = self.scheduler.start() {
      log::warn!("autoplay start dropped: a run is still active");
    }
  }
}
