//! Suspension points of a playback run.

use std::time::Duration;

use async_trait::async_trait;

/// Where a run waits between frames.
///
/// A run awaits [`FrameClock::redraw`] right after committing a frame so the
/// frame is actually painted, then [`FrameClock::sleep`] for the frame's hold
/// time. Panics raised here are not caught by the scheduler.
#[async_trait]
pub trait FrameClock: Send + Sync + 'static {
  /// Resolves once the host had one chance to paint.
  async fn redraw(&self);

  async fn sleep(&self, duration: Duration);
}

/// Tokio timers, with a task yield standing in for the redraw tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl FrameClock for TokioClock {
  async fn redraw(&self) {
    tokio::task::yield_now().await;
  }

  async fn sleep(&self, duration: Duration) {
    tokio::time::sleep(duration).await;
  }
}
