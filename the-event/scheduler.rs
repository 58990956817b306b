//! Timed playback of a [`FrameScript`](the_morph_lib::FrameScript).
//!
//! A [`PhaseScheduler`] owns the [`Morph`] it plays, the letters currently on
//! screen and at most one active run. Runs are tokio tasks that commit frames
//! in order and wait on a [`FrameClock`] in between. Every run gets its own
//! [`CancellationToken`] and a run id; a run that lost its slot (cancelled,
//! reset, or replaced by new input) never commits another frame and never
//! reports completion.
//!
//! All events go out through one unbounded channel and are sent while the
//! state lock is held, so their order matches the order of state changes.

use std::{
  collections::BTreeSet,
  sync::Arc,
};

use parking_lot::Mutex;
use the_morph_lib::{
  AnimationFrame,
  LetterId,
  LetterItem,
  Morph,
  MorphConfig,
  Phase,
};
use tokio::{
  sync::mpsc::{
    self,
    UnboundedReceiver,
    UnboundedSender,
  },
  task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

use crate::clock::{
  FrameClock,
  TokioClock,
};

#[cfg(test)]
mod test;

pub type RunId = u64;

/// Letters on screen at some point of playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleState {
  pub phase:    Phase,
  pub letters:  Vec<LetterItem>,
  pub deleting: BTreeSet<LetterId>,
}

impl From<&AnimationFrame> for VisibleState {
  fn from(frame: &AnimationFrame) -> Self {
    Self {
      phase:    frame.phase,
      letters:  frame.letters.clone(),
      deleting: frame.deleting.clone(),
    }
  }
}

/// A committed frame, as sent to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
  pub run:   RunId,
  pub state: VisibleState,
  /// The morph being played, for plan details such as highlights.
  pub morph: Arc<Morph>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
  RunStarted { run: RunId },
  PhaseChanged { run: RunId, phase: Phase },
  Frame(Snapshot),
  RunCompleted { run: RunId },
  /// The run was cancelled. Not a failure, and no completion follows.
  Aborted { run: RunId },
}

impl PlaybackEvent {
  pub fn run(&self) -> RunId {
    match self {
      Self::RunStarted { run }
      | Self::PhaseChanged { run, .. }
      | Self::RunCompleted { run }
      | Self::Aborted { run } => *run,
      Self::Frame(snapshot) => snapshot.run,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
  Completed,
  Aborted,
}

#[must_use]
#[derive(Debug)]
pub enum StartOutcome {
  Started(RunHandle),
  /// Another run is active; it keeps going and this request is dropped.
  AlreadyRunning,
}

impl StartOutcome {
  pub fn is_started(&self) -> bool {
    matches!(self, Self::Started(_))
  }

  pub fn handle(self) -> Option<RunHandle> {
    match self {
      Self::Started(handle) => Some(handle),
      Self::AlreadyRunning => None,
    }
  }
}

#[derive(Debug)]
pub struct RunHandle {
  run:  RunId,
  task: JoinHandle<RunOutcome>,
}

impl RunHandle {
  pub fn run(&self) -> RunId {
    self.run
  }

  /// Waits for the run to end.
  ///
  /// A panic inside the run (e.g. from the clock) is resumed here.
  pub async fn finished(self) -> RunOutcome {
    match self.task.await {
      Ok(outcome) => outcome,
      Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
      // the runtime dropped the task
      Err(_) => RunOutcome::Aborted,
    }
  }
}

struct ActiveRun {
  run:   RunId,
  token: CancellationToken,
}

struct State {
  config:   MorphConfig,
  morph:    Arc<Morph>,
  visible:  VisibleState,
  active:   Option<ActiveRun>,
  last_run: RunId,
}

impl State {
  fn owned_by(&self, run: RunId) -> bool {
    self
      .active
      .as_ref()
      .is_some_and(|active| active.run == run && !active.token.is_cancelled())
  }

  fn show_idle(&mut self) {
    let idle = VisibleState::from(self.morph.script().idle_frame());
    self.visible = idle;
  }

  /// Cancels the active run, if any, and reports it aborted. The slot stays
  /// taken until the run unwinds or the caller clears it.
  fn cancel_active(&mut self, events: &UnboundedSender<PlaybackEvent>) -> bool {
    let Some(active) = &self.active else {
      return false;
    };
    if active.token.is_cancelled() {
      return false;
    }
    log::debug!("cancelling run {}", active.run);
    active.token.cancel();
    let _ = events.send(PlaybackEvent::Aborted { run: active.run });
    true
  }
}

/// Plays frame scripts one run at a time.
///
/// Cloning yields another handle to the same scheduler. Separate
/// [`PhaseScheduler::new`] calls share nothing.
#[derive(Clone)]
pub struct PhaseScheduler {
  state:  Arc<Mutex<State>>,
  events: UnboundedSender<PlaybackEvent>,
  clock:  Arc<dyn FrameClock>,
}

impl PhaseScheduler {
  pub fn new(config: MorphConfig) -> (Self, UnboundedReceiver<PlaybackEvent>) {
    Self::with_clock(config, TokioClock)
  }

  pub fn with_clock(
    config: MorphConfig,
    clock: impl FrameClock,
  ) -> (Self, UnboundedReceiver<PlaybackEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let morph = Arc::new(Morph::new("", "", &config));
    let visible = VisibleState::from(morph.script().idle_frame());
    let state = State {
      config,
      morph,
      visible,
      active: None,
      last_run: 0,
    };
    let scheduler = Self {
      state:  Arc::new(Mutex::new(state)),
      events: tx,
      clock:  Arc::new(clock),
    };
    (scheduler, rx)
  }

  /// Replaces the input pair.
  ///
  /// Any active run is cancelled, plan and script are rebuilt and the idle
  /// frame of the new input becomes visible. A new run may start right away.
  pub fn set_input(&self, source: &str, target: &str) {
    let config = self.state.lock().config;
    let morph = Arc::new(Morph::new(source, target, &config));

    let mut state = self.state.lock();
    state.cancel_active(&self.events);
    state.active = None;
    state.morph = morph;
    state.show_idle();
  }

  /// Applies the host's reduced-motion preference to runs started from now
  /// on.
  pub fn set_reduced_motion(&self, reduced_motion: bool) {
    self.state.lock().config.reduced_motion = reduced_motion;
  }

  pub fn config(&self) -> MorphConfig {
    self.state.lock().config
  }

  /// Plan and frame script of the current input.
  pub fn morph(&self) -> Arc<Morph> {
    self.state.lock().morph.clone()
  }

  pub fn visible(&self) -> VisibleState {
    self.state.lock().visible.clone()
  }

  pub fn is_running(&self) -> bool {
    self.state.lock().active.is_some()
  }

  /// Starts playing the current script from its idle frame.
  ///
  /// Must be called from within a tokio runtime.
  pub fn start(&self) -> StartOutcome {
    let mut state = self.state.lock();
    if let Some(active) = &state.active {
      log::debug!("run {} is active, dropping start request", active.run);
      return StartOutcome::AlreadyRunning;
    }

    state.last_run += 1;
    let run = state.last_run;
    let token = CancellationToken::new();
    state.active = Some(ActiveRun {
      run,
      token: token.clone(),
    });
    let _ = self.events.send(PlaybackEvent::RunStarted { run });
    log::debug!("starting run {run}");

    let playback = Playback {
      run,
      token,
      config: state.config,
      morph: state.morph.clone(),
      state: self.state.clone(),
      events: self.events.clone(),
      clock: self.clock.clone(),
    };
    drop(state);

    StartOutcome::Started(RunHandle {
      run,
      task: tokio::spawn(playback.play()),
    })
  }

  /// Stops the active run. It ends as aborted and never reports completion.
  pub fn cancel(&self) -> bool {
    self.state.lock().cancel_active(&self.events)
  }

  /// Cancels the active run and shows the idle frame immediately.
  pub fn reset(&self) {
    let mut state = self.state.lock();
    state.cancel_active(&self.events);
    state.active = None;
    state.show_idle();
  }
}

/// One run of one script.
struct Playback {
  run:    RunId,
  token:  CancellationToken,
  config: MorphConfig,
  morph:  Arc<Morph>,
  state:  Arc<Mutex<State>>,
  events: UnboundedSender<PlaybackEvent>,
  clock:  Arc<dyn FrameClock>,
}

impl Playback {
  async fn play(self) -> RunOutcome {
    let mut phase = None;
    for frame in self.morph.script().iter() {
      if !self.commit(frame, &mut phase) {
        return self.unwind();
      }

      tokio::select! {
        biased;
        _ = self.token.cancelled() => return self.unwind(),
        _ = self.clock.redraw() => {},
      }

      let wait = self.config.effective(frame.duration);
      if !wait.is_zero() {
        tokio::select! {
          biased;
          _ = self.token.cancelled() => return self.unwind(),
          _ = self.clock.sleep(wait) => {},
        }
      }
    }

    let mut state = self.state.lock();
    if !state.owned_by(self.run) {
      drop(state);
      return self.unwind();
    }
    state.active = None;
    let _ = self.events.send(PlaybackEvent::RunCompleted { run: self.run });
    log::debug!("run {} completed", self.run);
    RunOutcome::Completed
  }

  /// Makes `frame` the visible state. Returns false if the run lost its slot
  /// or nobody is listening anymore.
  fn commit(&self, frame: &AnimationFrame, phase: &mut Option<Phase>) -> bool {
    let mut state = self.state.lock();
    if !state.owned_by(self.run) {
      return false;
    }

    if *phase != Some(frame.phase) {
      *phase = Some(frame.phase);
      let changed = PlaybackEvent::PhaseChanged {
        run:   self.run,
        phase: frame.phase,
      };
      if self.events.send(changed).is_err() {
        log::debug!("listener closed, tearing down run {}", self.run);
        self.token.cancel();
        return false;
      }
    }

    state.visible = VisibleState::from(frame);
    log::trace!(
      "run {} committed {} frame ({} letters)",
      self.run,
      frame.phase,
      frame.letters.len()
    );
    let snapshot = Snapshot {
      run:   self.run,
      state: state.visible.clone(),
      morph: self.morph.clone(),
    };
    if self.events.send(PlaybackEvent::Frame(snapshot)).is_err() {
      self.token.cancel();
      return false;
    }
    true
  }

  /// Releases the slot if this run still holds it.
  fn unwind(&self) -> RunOutcome {
    let mut state = self.state.lock();
    if state
      .active
      .as_ref()
      .is_some_and(|active| active.run == self.run)
    {
      state.active = None;
    }
    log::debug!("run {} aborted", self.run);
    RunOutcome::Aborted
  }
}
