use std::path::PathBuf;

use clap::{
  ArgAction,
  Parser,
};
use eyre::{
  Result,
  bail,
};
use the_morph_lib::MorphConfig;

#[derive(Debug, Parser)]
#[command(name = "the-morph")]
#[command(about = "Animate one string turning into another, letter by letter")]
pub struct Cli {
  /// Text to start from
  pub source: String,

  /// Text to end with
  pub target: String,

  /// Dump the edit plan and frame script as JSON
  #[arg(long, conflicts_with = "play")]
  pub json: bool,

  /// Replay the animation in the terminal
  #[arg(long)]
  pub play: bool,

  /// Multiply every phase duration (2.0 plays at half speed)
  #[arg(long, value_name = "FACTOR")]
  pub speed: Option<f64>,

  /// Cap every wait at the reduced-motion ceiling
  #[arg(long)]
  pub reduced_motion: bool,

  /// Increase logging verbosity (repeat for more detail)
  #[arg(short = 'v', action = ArgAction::Count)]
  pub verbosity: u8,

  /// Save logs to a specific file
  #[arg(long = "log", value_name = "FILE")]
  pub log_file: Option<PathBuf>,

  /// Load configuration from a specific file
  #[arg(short = 'c', long = "config", value_name = "FILE")]
  pub config_file: Option<PathBuf>,
}

impl Cli {
  pub fn parse_args() -> Self {
    Self::parse()
  }

  /// Flags win over whatever the config files say.
  pub fn apply_overrides(&self, config: &mut MorphConfig) -> Result<()> {
    if let Some(speed) = self.speed {
      config.speed = speed;
    }
    if self.reduced_motion {
      config.reduced_motion = true;
    }
    if let Err(err) = config.validate() {
      bail!("--speed: {err}");
    }
    Ok(())
  }
}
