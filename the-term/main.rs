//! Terminal demo for the-morph.
//!
//! Prints the edit plan for a pair of strings, dumps plan and frame script as
//! JSON, or replays the animation live in the terminal.

mod cli;
mod input;
mod play;
mod render;
mod terminal;
mod theme;

use std::{
  io::{
    self,
    Write,
  },
  path::Path,
};

use eyre::{
  Result,
  WrapErr,
};
use the_morph_lib::{
  Morph,
  MorphConfig,
};

use crate::cli::Cli;

fn main() -> Result<()> {
  let cli = Cli::parse_args();

  the_morph_loader::initialize_log_file(cli.log_file.clone());
  setup_logging(cli.verbosity).wrap_err("failed to set up logging")?;

  the_morph_loader::initialize_config_file(cli.config_file.clone());
  let mut config = the_morph_loader::config::load_user()
    .wrap_err_with(|| {
      format!(
        "failed to load config from {}",
        the_morph_loader::config_file().display()
      )
    })?;
  cli.apply_overrides(&mut config)?;
  log::info!("config: {config:?}");

  if cli.play {
    return play::run(&cli.source, &cli.target, config);
  }

  let morph = Morph::new(&cli.source, &cli.target, &config);
  let mut stdout = io::stdout().lock();
  if cli.json {
    let dump = serde_json::json!({
      "source": cli.source,
      "target": cli.target,
      "plan": morph.plan(),
      "script": morph.script(),
    });
    serde_json::to_writer_pretty(&mut stdout, &dump)?;
    writeln!(stdout)?;
  } else {
    print_summary(&mut stdout, &morph, &config)?;
  }
  Ok(())
}

fn print_summary(out: &mut impl Write, morph: &Morph, config: &MorphConfig) -> Result<()> {
  let plan = morph.plan();
  let source = morph.source();

  writeln!(
    out,
    "{:?} -> {:?}",
    source.iter().collect::<String>(),
    morph.target().iter().collect::<String>()
  )?;
  if plan.is_noop() {
    writeln!(out, "nothing to do")?;
  }
  for &index in &plan.deletions {
    writeln!(out, "  delete  {:?} at {index}", source[index])?;
  }
  for pair in &plan.moves {
    let marker = if plan.is_highlighted(pair.source) {
      " *"
    } else {
      ""
    };
    writeln!(
      out,
      "  move    {:?} {} -> {}{marker}",
      source[pair.source], pair.source, pair.target
    )?;
  }
  for insertion in &plan.insertions {
    writeln!(
      out,
      "  insert  {:?} at {}",
      insertion.ch, insertion.position
    )?;
  }

  let phases: Vec<&str> = morph
    .script()
    .phases()
    .into_iter()
    .map(|phase| phase.as_str())
    .collect();
  let total: std::time::Duration = morph
    .script()
    .iter()
    .map(|frame| config.effective(frame.duration))
    .sum();
  writeln!(
    out,
    "phases: {} ({} frames, {}ms)",
    phases.join(" -> "),
    morph.script().len(),
    total.as_millis()
  )?;
  Ok(())
}

fn setup_logging(verbosity: u8) -> Result<()> {
  let level = match verbosity {
    0 if cfg!(debug_assertions) => log::LevelFilter::Info,
    0 => log::LevelFilter::Warn,
    1 => log::LevelFilter::Info,
    2 => log::LevelFilter::Debug,
    _ => log::LevelFilter::Trace,
  };

  let log_file = the_morph_loader::log_file();
  fern::Dispatch::new()
    .level(level)
    .format(|out, message, record| {
      let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
      out.finish(format_args!(
        "{}.{:03} {} [{}] {}",
        now.as_secs(),
        now.subsec_millis(),
        record.target(),
        record.level(),
        message
      ))
    })
    .chain(fern::log_file(&log_file).wrap_err_with(|| open_failed(&log_file))?)
    .apply()?;
  Ok(())
}

fn open_failed(path: &Path) -> String {
  format!("failed to open log file {}", path.display())
}
