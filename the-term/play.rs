//! Live replay: a [`PhaseScheduler`] fed by an [`AutoplayHook`], painted by
//! the terminal as frames arrive.
//!
//! Both prompts stay editable while playing. Every edit goes to the hook,
//! which replays the new pair once typing settles.

use std::time::Duration;

use crossterm::event::{
  self,
  Event,
  KeyEventKind,
};
use eyre::{
  Result,
  WrapErr,
};
use the_morph_event::{
  AutoplayEvent,
  AutoplayHook,
  AsyncHook,
  PhaseScheduler,
  PlaybackEvent,
  send_blocking,
};
use the_morph_lib::MorphConfig;
use tokio::sync::mpsc::Sender;

use crate::{
  input::{
    Action,
    Prompts,
    handle_key,
  },
  render::render,
  terminal::Terminal,
};

/// How often pending key presses are drained.
const KEY_POLL: Duration = Duration::from_millis(30);

pub fn run(source: &str, target: &str, config: MorphConfig) -> Result<()> {
  // runs and the hook live on worker threads so `send_blocking` from the
  // input loop can wait on them
  let runtime = tokio::runtime::Builder::new_multi_thread()
    .worker_threads(2)
    .enable_all()
    .build()
    .wrap_err("failed to start runtime")?;

  let mut terminal = Terminal::new();
  terminal.enter_raw_mode()?;
  let result = runtime.block_on(play(&mut terminal, Prompts::new(source, target), config));
  terminal.leave_raw_mode()?;
  result
}

async fn play(terminal: &mut Terminal, mut prompts: Prompts, config: MorphConfig) -> Result<()> {
  let (scheduler, mut events) = PhaseScheduler::new(config);
  scheduler.set_input(&prompts.source, &prompts.target);
  let autoplay = AutoplayHook::new(scheduler.clone()).spawn();

  let mut status = String::from("starting");
  let redraw = |terminal: &mut Terminal, prompts: &Prompts, status: &str| {
    render(
      terminal,
      prompts,
      &scheduler.morph(),
      &scheduler.visible(),
      status,
    )
  };
  redraw(terminal, &prompts, &status)?;
  let _ = scheduler.start();

  let mut keys = tokio::time::interval(KEY_POLL);
  loop {
    tokio::select! {
      event = events.recv() => {
        let Some(event) = event else {
          break;
        };
        match event {
          PlaybackEvent::Frame(snapshot) => {
            render(terminal, &prompts, &snapshot.morph, &snapshot.state, &status)?;
            continue;
          },
          PlaybackEvent::RunStarted { run } => status = format!("run {run}"),
          PlaybackEvent::PhaseChanged { .. } => continue,
          PlaybackEvent::RunCompleted { run } => status = format!("run {run} done"),
          PlaybackEvent::Aborted { run } => status = format!("run {run} aborted"),
        }
        redraw(terminal, &prompts, &status)?;
      },
      _ = keys.tick() => {
        for action in pending_actions(&mut prompts)? {
          match action {
            Action::Quit => {
              scheduler.cancel();
              return Ok(());
            },
            Action::Replay => {
              scheduler.reset();
              let _ = scheduler.start();
            },
            Action::Stop => send_blocking(&autoplay, AutoplayEvent::Stop),
            Action::Edited => feed(&autoplay, &prompts),
            Action::ToggleReducedMotion => {
              let reduced_motion = !scheduler.config().reduced_motion;
              scheduler.set_reduced_motion(reduced_motion);
              status = format!("reduced motion {}", if reduced_motion { "on" } else { "off" });
            },
            Action::Redraw => {},
          }
          redraw(terminal, &prompts, &status)?;
        }
      },
    }
  }
  Ok(())
}

fn feed(autoplay: &Sender<AutoplayEvent>, prompts: &Prompts) {
  let event = AutoplayEvent::Input {
    source: prompts.source.clone(),
    target: prompts.target.clone(),
  };
  send_blocking(autoplay, event);
}

/// Drains terminal input without blocking.
fn pending_actions(prompts: &mut Prompts) -> Result<Vec<Action>> {
  let mut actions = Vec::new();
  while event::poll(Duration::ZERO)? {
    let action = match event::read()? {
      Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(prompts, key),
      Event::Resize(..) => Some(Action::Redraw),
      _ => None,
    };
    actions.extend(action);
  }
  Ok(actions)
}
