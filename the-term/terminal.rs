//! Terminal abstraction over the crossterm backend.

use std::io::{
  self,
  Stdout,
  Write,
};

use crossterm::{
  cursor::{
    Hide,
    MoveTo,
    Show,
  },
  execute,
  queue,
  style::{
    Attribute,
    Color,
    Print,
    ResetColor,
    SetAttribute,
    SetForegroundColor,
  },
  terminal::{
    self as term,
    Clear,
    ClearType,
    EnterAlternateScreen,
    LeaveAlternateScreen,
    disable_raw_mode,
    enable_raw_mode,
  },
};
use eyre::Result;

pub struct Terminal {
  stdout: Stdout,
}

impl Terminal {
  pub fn new() -> Self {
    Self {
      stdout: io::stdout(),
    }
  }

  pub fn enter_raw_mode(&mut self) -> Result<()> {
    enable_raw_mode()?;
    execute!(self.stdout, EnterAlternateScreen, Hide)?;
    Ok(())
  }

  pub fn leave_raw_mode(&mut self) -> Result<()> {
    execute!(self.stdout, Show, LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
  }

  pub fn size(&self) -> Result<(u16, u16)> {
    Ok(term::size()?)
  }

  pub fn clear(&mut self) -> Result<()> {
    queue!(self.stdout, Clear(ClearType::All))?;
    Ok(())
  }

  pub fn draw_str(
    &mut self,
    row: u16,
    col: u16,
    text: &str,
    fg: Option<Color>,
    attr: Option<Attribute>,
  ) -> Result<()> {
    queue!(self.stdout, MoveTo(col, row))?;
    if let Some(fg) = fg {
      queue!(self.stdout, SetForegroundColor(fg))?;
    }
    if let Some(attr) = attr {
      queue!(self.stdout, SetAttribute(attr))?;
    }
    queue!(
      self.stdout,
      Print(text),
      SetAttribute(Attribute::Reset),
      ResetColor
    )?;
    Ok(())
  }

  pub fn flush(&mut self) -> Result<()> {
    self.stdout.flush()?;
    Ok(())
  }
}
