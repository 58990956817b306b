//! Reading [`MorphConfig`] from disk.
//!
//! The user config (`config.toml` in [`crate::config_dir`]) is the base, and
//! a workspace config (`.the-morph/config.toml`) is merged on top of it. A
//! missing file is not an error; both missing yields the defaults.

use std::{
  fs,
  io,
  path::{
    Path,
    PathBuf,
  },
};

use the_morph_lib::{
  ConfigError,
  MorphConfig,
};
use thiserror::Error;
use toml::Value;

use crate::merge_toml_values;

/// Nesting depth up to which the workspace config merges into the global one.
const MERGE_DEPTH: usize = 3;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
  #[error("failed to read {}: {source}", path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },
  #[error("bad config: {0}")]
  BadConfig(#[from] toml::de::Error),
  #[error("invalid config: {0}")]
  Invalid(#[from] ConfigError),
}

/// Builds a config from the text of the global and workspace files.
pub fn load(global: Option<&str>, local: Option<&str>) -> Result<MorphConfig, ConfigLoadError> {
  let parse = |text: Option<&str>| text.map(toml::from_str::<Value>).transpose();

  let value = match (parse(global)?, parse(local)?) {
    (None, None) => return Ok(MorphConfig::default()),
    (Some(value), None) | (None, Some(value)) => value,
    (Some(global), Some(local)) => merge_toml_values(global, local, MERGE_DEPTH),
  };

  let config: MorphConfig = value.try_into()?;
  config.validate()?;
  Ok(config)
}

pub fn load_files(global: &Path, local: &Path) -> Result<MorphConfig, ConfigLoadError> {
  let global = read_optional(global)?;
  let local = read_optional(local)?;
  load(global.as_deref(), local.as_deref())
}

/// Loads the user config merged with the config of the current workspace.
pub fn load_user() -> Result<MorphConfig, ConfigLoadError> {
  let global = crate::config_file();
  let local = crate::workspace_config_file();
  log::debug!(
    "loading config from {} and {}",
    global.display(),
    local.display()
  );
  load_files(&global, &local)
}

fn read_optional(path: &Path) -> Result<Option<String>, ConfigLoadError> {
  match fs::read_to_string(path) {
    Ok(text) => Ok(Some(text)),
    Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
    Err(source) => {
      Err(ConfigLoadError::Io {
        path: path.to_owned(),
        source,
      })
    },
  }
}
