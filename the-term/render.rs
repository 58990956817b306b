//! Rendering - converts the visible letters to terminal draw calls.

use crossterm::style::{
  Attribute,
  Color,
};
use eyre::Result;
use the_morph_event::VisibleState;
use the_morph_lib::{
  LetterId,
  Morph,
};

use crate::{
  input::{
    Field,
    Prompts,
  },
  terminal::Terminal,
  theme::{
    letter_style,
    phase_color,
  },
};

const HELP: &str = "tab switch  enter replay  esc stop  ^t reduced motion  ^c quit";

pub fn render(
  terminal: &mut Terminal,
  prompts: &Prompts,
  morph: &Morph,
  visible: &VisibleState,
  status: &str,
) -> Result<()> {
  let (width, height) = terminal.size()?;
  terminal.clear()?;

  for (row, field, label, text) in [
    (0, Field::Source, "source", &prompts.source),
    (1, Field::Target, "target", &prompts.target),
  ] {
    let active = prompts.field == field;
    let attr = active.then_some(Attribute::Bold);
    let marker = if active { ">" } else { " " };
    terminal.draw_str(row, 0, &format!("{marker} {label}: {text}"), None, attr)?;
  }

  let highlights = &morph.plan().highlights;
  let row = height / 2;
  let letters = visible.letters.len() as u16;
  let col = width.saturating_sub(letters) / 2;
  for (offset, letter) in visible.letters.iter().enumerate() {
    let (inserted, highlighted) = match letter.id {
      LetterId::Source(index) => (false, highlights.contains(&index)),
      LetterId::Inserted(_) => (true, false),
    };
    let deleting = visible.deleting.contains(&letter.id);
    let style = letter_style(visible.phase, deleting, inserted, highlighted);

    let mut buf = [0; 4];
    terminal.draw_str(
      row,
      col + offset as u16,
      letter.ch.encode_utf8(&mut buf),
      style.fg,
      style.attr,
    )?;
  }

  let footer = height.saturating_sub(1);
  terminal.draw_str(
    footer,
    0,
    visible.phase.as_str(),
    Some(phase_color(visible.phase)),
    None,
  )?;
  let phase_width = visible.phase.as_str().len() as u16;
  terminal.draw_str(footer, phase_width + 2, status, None, None)?;
  terminal.draw_str(
    footer,
    width.saturating_sub(HELP.len() as u16),
    HELP,
    Some(Color::DarkGrey),
    None,
  )?;

  terminal.flush()
}
