//! Utilities for declaring an async (usually debounced) hook

use std::time::Duration;

use futures_executor::block_on;
use tokio::{
  sync::mpsc::{
    self,
    Sender,
    error::TrySendError,
  },
  time::Instant,
};

/// Longest a synchronous caller may block on a full channel. Past this the
/// event is dropped; a stalled presentation loop is worse than a lost
/// keystroke.
const SEND_TIMEOUT_MS: u64 = 2;

/// Capacity of the channel feeding a hook.
const HOOK_CHANNEL_CAPACITY: usize = 128;

/// A background task reacting to events sent over a channel.
///
/// Input arriving in bursts (typing, pasting) rarely wants to be handled one
/// event at a time. A hook decides per event whether to act right away or to
/// (re)arm a deadline; once the deadline passes without new events
/// [`AsyncHook::finish_debounce`] runs.
pub trait AsyncHook: Sync + Send + 'static + Sized {
  type Event: Sync + Send + 'static;

  /// Called for every event. Returns the deadline to wait for, which may be
  /// the current `timeout` unchanged, a new one, or `None` to disarm.
  fn handle_event(&mut self, event: Self::Event, timeout: Option<Instant>) -> Option<Instant>;

  /// Called once a deadline passes without new events.
  fn finish_debounce(&mut self);

  /// Moves the hook onto a tokio task and returns its sender.
  ///
  /// Outside a runtime no task is spawned and events sent to the returned
  /// channel are never handled.
  fn spawn(self) -> mpsc::Sender<Self::Event> {
    let (tx, rx) = mpsc::channel(HOOK_CHANNEL_CAPACITY);
    if tokio::runtime::Handle::try_current().is_ok() {
      tokio::spawn(run(self, rx));
    }
    tx
  }
}

async fn run<Hook: AsyncHook>(mut hook: Hook, mut rx: mpsc::Receiver<Hook::Event>) {
  let mut deadline = None;
  loop {
    let event = match deadline {
      Some(deadline_) => {
        match tokio::time::timeout_at(deadline_, rx.recv()).await {
          Ok(event) => event,
          Err(_) => {
            hook.finish_debounce();
            deadline = None;
            continue;
          },
        }
      },
      None => rx.recv().await,
    };
    let Some(event) = event else {
      break;
    };
    deadline = hook.handle_event(event, deadline);
  }
}

/// Sends an event from synchronous code, blocking for at most
/// `SEND_TIMEOUT_MS` if the channel is full and dropping the event after
/// that.
pub fn send_blocking<T>(tx: &Sender<T>, data: T) {
  match tx.try_send(data) {
    Ok(()) => {},
    Err(TrySendError::Full(data)) => {
      if block_on(tx.send_timeout(data, Duration::from_millis(SEND_TIMEOUT_MS))).is_err() {
        log::warn!("hook channel full, dropping event");
      }
    },
    Err(TrySendError::Closed(_)) => {
      log::warn!("Attempted to send to closed channel");
    },
  }
}
