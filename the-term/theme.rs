//! Hardcoded letter colors.

use crossterm::style::{
  Attribute,
  Color,
};
use the_morph_lib::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LetterStyle {
  pub fg:   Option<Color>,
  pub attr: Option<Attribute>,
}

impl LetterStyle {
  const PLAIN: Self = Self {
    fg:   None,
    attr: None,
  };
}

/// How a letter looks at a given point of playback.
///
/// `inserted` is true for letters that only exist in the target,
/// `highlighted` for source letters moving against the bulk shift.
pub fn letter_style(phase: Phase, deleting: bool, inserted: bool, highlighted: bool) -> LetterStyle {
  if deleting {
    return LetterStyle {
      fg:   Some(Color::Red),
      attr: Some(Attribute::CrossedOut),
    };
  }
  match phase {
    Phase::Moving if highlighted => {
      LetterStyle {
        fg:   Some(Color::Yellow),
        attr: Some(Attribute::Bold),
      }
    },
    Phase::Inserting if inserted => {
      LetterStyle {
        fg:   Some(Color::Green),
        attr: Some(Attribute::Bold),
      }
    },
    _ => LetterStyle::PLAIN,
  }
}

pub fn phase_color(phase: Phase) -> Color {
  match phase {
    Phase::Idle => Color::DarkGrey,
    Phase::Deleting => Color::Red,
    Phase::Moving => Color::Yellow,
    Phase::Inserting => Color::Green,
    Phase::Final => Color::Cyan,
  }
}
