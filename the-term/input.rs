//! Input handling - maps key events to edits of the source/target prompts.

use crossterm::event::{
  KeyCode,
  KeyEvent,
  KeyModifiers,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  Source,
  Target,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  Quit,
  /// Restart playback of the current input.
  Replay,
  /// Drop pending input and return to the idle frame.
  Stop,
  ToggleReducedMotion,
  /// One of the prompts changed.
  Edited,
  Redraw,
}

/// The two prompts the user types into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompts {
  pub source: String,
  pub target: String,
  pub field:  Field,
}

impl Prompts {
  pub fn new(source: &str, target: &str) -> Self {
    Self {
      source: source.to_owned(),
      target: target.to_owned(),
      field:  Field::Target,
    }
  }

  fn active_mut(&mut self) -> &mut String {
    match self.field {
      Field::Source => &mut self.source,
      Field::Target => &mut self.target,
    }
  }

  fn switch_field(&mut self) {
    self.field = match self.field {
      Field::Source => Field::Target,
      Field::Target => Field::Source,
    };
  }
}

pub fn handle_key(prompts: &mut Prompts, key: KeyEvent) -> Option<Action> {
  let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
  match key.code {
    KeyCode::Char('c' | 'q') if ctrl => Some(Action::Quit),
    KeyCode::Char('t') if ctrl => Some(Action::ToggleReducedMotion),
    KeyCode::Char(_) if ctrl => None,
    KeyCode::Esc => Some(Action::Stop),
    KeyCode::Enter => Some(Action::Replay),
    KeyCode::Tab | KeyCode::BackTab => {
      prompts.switch_field();
      Some(Action::Redraw)
    },
    KeyCode::Backspace => prompts.active_mut().pop().map(|_| Action::Edited),
    KeyCode::Char(ch) => {
      prompts.active_mut().push(ch);
      Some(Action::Edited)
    },
    _ => None,
  }
}
