use std::fmt;

use serde::Serialize;

/// Identity of a rendered letter.
///
/// A letter taken from the source keeps its `Source` id in every phase it
/// appears in, so a renderer can interpolate its position instead of
/// recreating it. Inserted letters are tagged by their target position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum LetterId {
  Source(usize),
  Inserted(usize),
}

impl fmt::Display for LetterId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Source(index) => write!(f, "s{index}"),
      Self::Inserted(position) => write!(f, "i{position}"),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LetterItem {
  pub id: LetterId,
  pub ch: char,
}

impl LetterItem {
  pub const fn source(index: usize, ch: char) -> Self {
    Self {
      id: LetterId::Source(index),
      ch,
    }
  }

  pub const fn inserted(position: usize, ch: char) -> Self {
    Self {
      id: LetterId::Inserted(position),
      ch,
    }
  }
}

/// Renders a letter run back into text.
pub fn text_of(letters: &[LetterItem]) -> String {
  letters.iter().map(|letter| letter.ch).collect()
}
