use std::{
  sync::{
    Arc,
    atomic::{
      AtomicUsize,
      Ordering,
    },
  },
  time::Duration,
};

use async_trait::async_trait;
use the_morph_lib::{
  MorphConfig,
  Phase,
  letter::text_of,
};
use tokio::{
  sync::mpsc::UnboundedReceiver,
  time::Instant,
};

use super::*;

fn drain(rx: &mut UnboundedReceiver<PlaybackEvent>) -> Vec<PlaybackEvent> {
  let mut events = Vec::new();
  while let Ok(event) = rx.try_recv() {
    events.push(event);
  }
  events
}

fn phase_changes(events: &[PlaybackEvent]) -> Vec<Phase> {
  events
    .iter()
    .filter_map(|event| {
      match event {
        PlaybackEvent::PhaseChanged { phase, .. } => Some(*phase),
        _ => None,
      }
    })
    .collect()
}

fn completions(events: &[PlaybackEvent]) -> usize {
  events
    .iter()
    .filter(|event| matches!(event, PlaybackEvent::RunCompleted { .. }))
    .count()
}

fn scheduler(source: &str, target: &str) -> (PhaseScheduler, UnboundedReceiver<PlaybackEvent>) {
  let (scheduler, rx) = PhaseScheduler::new(MorphConfig::default());
  scheduler.set_input(source, target);
  (scheduler, rx)
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn full_run_emits_phases_in_order() {
  let (scheduler, mut rx) = scheduler("bxa", "abz");
  let handle = scheduler.start().handle().unwrap();
  assert_eq!(handle.finished().await, RunOutcome::Completed);

  let events = drain(&mut rx);
  assert_eq!(events.first(), Some(&PlaybackEvent::RunStarted { run: 1 }));
  assert_eq!(events.last(), Some(&PlaybackEvent::RunCompleted { run: 1 }));
  assert_eq!(phase_changes(&events), vec![
    Phase::Idle,
    Phase::Deleting,
    Phase::Moving,
    Phase::Inserting,
    Phase::Final
  ]);
  assert_eq!(completions(&events), 1);

  let frames = events
    .iter()
    .filter(|event| matches!(event, PlaybackEvent::Frame(_)))
    .count();
  assert_eq!(frames, scheduler.morph().script().len());

  let visible = scheduler.visible();
  assert_eq!(visible.phase, Phase::Final);
  assert_eq!(text_of(&visible.letters), "abz");
  assert!(!scheduler.is_running());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn frame_precedes_its_wait() {
  let (scheduler, mut rx) = scheduler("word", "");
  let handle = scheduler.start().handle().unwrap();

  // idle frame is committed before its 350ms hold starts
  tokio::time::sleep(Duration::from_millis(1)).await;
  assert_eq!(scheduler.visible().phase, Phase::Idle);
  tokio::time::sleep(Duration::from_millis(400)).await;
  let visible = scheduler.visible();
  assert_eq!(visible.phase, Phase::Deleting);
  assert_eq!(visible.deleting.len(), 4);
  assert_eq!(visible.letters.len(), 4);

  assert_eq!(handle.finished().await, RunOutcome::Completed);
  assert_eq!(phase_changes(&drain(&mut rx)), vec![
    Phase::Idle,
    Phase::Deleting,
    Phase::Final
  ]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn start_while_running_is_dropped() {
  let (scheduler, mut rx) = scheduler("cat", "chart");
  let first = scheduler.start().handle().unwrap();
  tokio::time::sleep(Duration::from_millis(100)).await;

  assert!(!scheduler.start().is_started());
  assert!(scheduler.is_running());

  assert_eq!(first.finished().await, RunOutcome::Completed);
  let events = drain(&mut rx);
  assert!(events.iter().all(|event| event.run() == 1));
  assert_eq!(phase_changes(&events), vec![
    Phase::Idle,
    Phase::Inserting,
    Phase::Final
  ]);
  assert_eq!(completions(&events), 1);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn cancel_never_completes() {
  let (scheduler, mut rx) = scheduler("bag", "gab");
  let handle = scheduler.start().handle().unwrap();
  tokio::time::sleep(Duration::from_millis(100)).await;

  assert!(scheduler.cancel());
  // second cancel has nothing left to cancel
  assert!(!scheduler.cancel());
  assert_eq!(handle.finished().await, RunOutcome::Aborted);
  assert!(!scheduler.is_running());

  // give a stray timer every chance to fire
  tokio::time::sleep(Duration::from_secs(10)).await;
  let events = drain(&mut rx);
  assert_eq!(completions(&events), 0);
  assert_eq!(events.last(), Some(&PlaybackEvent::Aborted { run: 1 }));
  assert_eq!(scheduler.visible().phase, Phase::Idle);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn reset_restores_idle_and_allows_restart() {
  let (scheduler, mut rx) = scheduler("word", "");
  let first = scheduler.start().handle().unwrap();
  tokio::time::sleep(Duration::from_millis(500)).await;
  assert_eq!(scheduler.visible().phase, Phase::Deleting);

  scheduler.reset();
  let visible = scheduler.visible();
  assert_eq!(visible.phase, Phase::Idle);
  assert_eq!(text_of(&visible.letters), "word");
  assert!(visible.deleting.is_empty());
  assert!(!scheduler.is_running());

  let second = scheduler.start().handle().unwrap();
  assert_eq!(second.run(), 2);
  assert_eq!(first.finished().await, RunOutcome::Aborted);
  assert_eq!(second.finished().await, RunOutcome::Completed);

  let events = drain(&mut rx);
  let aborted_at = events
    .iter()
    .position(|event| *event == PlaybackEvent::Aborted { run: 1 })
    .unwrap();
  assert!(events[aborted_at + 1..].iter().all(|event| event.run() == 2));
  assert_eq!(events.last(), Some(&PlaybackEvent::RunCompleted { run: 2 }));
  assert_eq!(completions(&events), 1);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn reset_when_idle_is_harmless() {
  let (scheduler, mut rx) = scheduler("ab", "ba");
  scheduler.reset();
  assert_eq!(scheduler.visible().phase, Phase::Idle);
  assert!(drain(&mut rx).is_empty());
  assert!(scheduler.start().is_started());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn new_input_mid_run_cancels_and_recomputes() {
  let (scheduler, mut rx) = scheduler("ab", "ba");
  let first = scheduler.start().handle().unwrap();
  tokio::time::sleep(Duration::from_millis(100)).await;

  scheduler.set_input("cat", "chart");
  assert_eq!(text_of(&scheduler.visible().letters), "cat");
  assert_eq!(scheduler.morph().script().phases(), vec![
    Phase::Idle,
    Phase::Inserting,
    Phase::Final
  ]);
  assert_eq!(first.finished().await, RunOutcome::Aborted);

  let second = scheduler.start().handle().unwrap();
  assert_eq!(second.finished().await, RunOutcome::Completed);
  assert_eq!(text_of(&scheduler.visible().letters), "chart");

  let events = drain(&mut rx);
  assert!(events.contains(&PlaybackEvent::Aborted { run: 1 }));
  assert!(!events.contains(&PlaybackEvent::RunCompleted { run: 1 }));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn frames_carry_the_plan_they_play() {
  let (scheduler, mut rx) = scheduler("bag", "gab");
  let handle = scheduler.start().handle().unwrap();
  assert_eq!(handle.finished().await, RunOutcome::Completed);

  let snapshots: Vec<Snapshot> = drain(&mut rx)
    .into_iter()
    .filter_map(|event| {
      match event {
        PlaybackEvent::Frame(snapshot) => Some(snapshot),
        _ => None,
      }
    })
    .collect();
  assert!(!snapshots.is_empty());
  for snapshot in &snapshots {
    assert!(Arc::ptr_eq(&snapshot.morph, &scheduler.morph()));
    assert_eq!(
      snapshot.morph.plan().highlights,
      std::collections::BTreeSet::from([0, 2])
    );
  }

  scheduler.set_input("apple", "ape");
  let morph = scheduler.morph();
  assert!(morph.plan().moves.is_empty());
  assert!(!morph.script().phases().contains(&Phase::Moving));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn reduced_motion_clamps_every_wait() {
  let config = MorphConfig {
    reduced_motion: true,
    reduced_motion_ceiling_ms: 10,
    ..MorphConfig::default()
  };
  let (scheduler, _rx) = PhaseScheduler::new(config);
  scheduler.set_input("word", "");

  let started = Instant::now();
  let handle = scheduler.start().handle().unwrap();
  assert_eq!(handle.finished().await, RunOutcome::Completed);
  // idle, marked and removed frames, 10ms each
  let elapsed = started.elapsed();
  assert!(elapsed >= Duration::from_millis(30));
  assert!(elapsed < Duration::from_millis(350));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn reduced_motion_can_be_toggled_by_host() {
  let (scheduler, _rx) = scheduler("", "ab");
  scheduler.set_reduced_motion(true);
  assert!(scheduler.config().reduced_motion);

  let started = Instant::now();
  let handle = scheduler.start().handle().unwrap();
  assert_eq!(handle.finished().await, RunOutcome::Completed);
  assert!(started.elapsed() < Duration::from_millis(350));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn speed_multiplies_waits() {
  let config = MorphConfig {
    speed: 2.0,
    ..MorphConfig::default()
  };
  let (scheduler, _rx) = PhaseScheduler::new(config);
  scheduler.set_input("", "ab");

  let started = Instant::now();
  let handle = scheduler.start().handle().unwrap();
  assert_eq!(handle.finished().await, RunOutcome::Completed);
  // (350 idle + 450 inserting) * 2
  assert!(started.elapsed() >= Duration::from_millis(1600));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn instances_do_not_share_runs() {
  let (left, mut left_rx) = scheduler("ab", "ba");
  let (right, mut right_rx) = scheduler("ab", "ba");

  let left_run = left.start().handle().unwrap();
  let right_run = right.start().handle().unwrap();
  tokio::time::sleep(Duration::from_millis(100)).await;
  left.cancel();

  assert_eq!(left_run.finished().await, RunOutcome::Aborted);
  assert_eq!(right_run.finished().await, RunOutcome::Completed);
  assert_eq!(completions(&drain(&mut left_rx)), 0);
  assert_eq!(completions(&drain(&mut right_rx)), 1);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn dropped_listener_tears_run_down() {
  let (scheduler, rx) = scheduler("ab", "ba");
  drop(rx);
  let handle = scheduler.start().handle().unwrap();
  assert_eq!(handle.finished().await, RunOutcome::Aborted);
  assert!(!scheduler.is_running());
}

#[derive(Default)]
struct CountingClock {
  redraws: Arc<AtomicUsize>,
}

#[async_trait]
impl FrameClock for CountingClock {
  async fn redraw(&self) {
    self.redraws.fetch_add(1, Ordering::SeqCst);
    tokio::task::yield_now().await;
  }

  async fn sleep(&self, duration: Duration) {
    tokio::time::sleep(duration).await;
  }
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn every_frame_gets_a_redraw_tick() {
  let clock = CountingClock::default();
  let redraws = clock.redraws.clone();
  let (scheduler, _rx) = PhaseScheduler::with_clock(MorphConfig::default(), clock);
  scheduler.set_input("bxa", "abz");

  let handle = scheduler.start().handle().unwrap();
  assert_eq!(handle.finished().await, RunOutcome::Completed);
  assert_eq!(redraws.load(Ordering::SeqCst), scheduler.morph().script().len());
}

struct BrokenClock;

#[async_trait]
impl FrameClock for BrokenClock {
  async fn redraw(&self) {}

  async fn sleep(&self, _duration: Duration) {
    panic!("timer broke");
  }
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
#[should_panic(expected = "timer broke")]
async fn clock_failure_propagates() {
  let (scheduler, _rx) = PhaseScheduler::with_clock(MorphConfig::default(), BrokenClock);
  scheduler.set_input("a", "b");
  let handle = scheduler.start().handle().unwrap();
  let _ = handle.finished().await;
}
