pub mod config;

use std::{
  borrow::Cow,
  path::{
    Path,
    PathBuf,
  },
  sync::OnceLock,
};

use etcetera::base_strategy::{
  BaseStrategy,
  choose_base_strategy,
};

const APP_DIR: &str = "the-morph";
const WORKSPACE_MARKER: &str = ".the-morph";

static CONFIG_FILE: OnceLock<PathBuf> = OnceLock::new();

static LOG_FILE: OnceLock<PathBuf> = OnceLock::new();

pub fn initialize_config_file(specified_file: Option<PathBuf>) {
  let config_file = specified_file.unwrap_or_else(default_config_file);
  ensure_parent_dir(&config_file);
  CONFIG_FILE.set(config_file).ok();
}

pub fn initialize_log_file(specified_file: Option<PathBuf>) {
  let log_file = specified_file.unwrap_or_else(default_log_file);
  ensure_parent_dir(&log_file);
  LOG_FILE.set(log_file).ok();
}

/// Expands a leading `~` to the home directory.
fn expand_tilde(path: &Path) -> Cow<'_, Path> {
  let Ok(rest) = path.strip_prefix("~") else {
    return Cow::Borrowed(path);
  };
  match etcetera::home_dir() {
    Ok(home) => Cow::Owned(home.join(rest)),
    Err(_) => Cow::Borrowed(path),
  }
}

/// Platform directory for `kind`, or the `env` override if set. Falls back to
/// a relative directory when the platform has no home directory at all.
fn app_dir(env: &str, kind: fn(&dyn BaseStrategy) -> PathBuf) -> PathBuf {
  if let Ok(dir) = std::env::var(env) {
    return expand_tilde(Path::new(&dir)).into_owned();
  }
  match choose_base_strategy() {
    Ok(strategy) => kind(&strategy).join(APP_DIR),
    Err(err) => {
      log::warn!("no home directory ({err}), using ./{APP_DIR}");
      PathBuf::from(APP_DIR)
    },
  }
}

pub fn config_dir() -> PathBuf {
  app_dir("THE_MORPH_CONFIG_DIR", |strategy| strategy.config_dir())
}

pub fn cache_dir() -> PathBuf {
  app_dir("THE_MORPH_CACHE_DIR", |strategy| strategy.cache_dir())
}

pub fn config_file() -> PathBuf {
  CONFIG_FILE
    .get_or_init(|| {
      let path = default_config_file();
      ensure_parent_dir(&path);
      path
    })
    .clone()
}

pub fn log_file() -> PathBuf {
  LOG_FILE
    .get_or_init(|| {
      let path = default_log_file();
      ensure_parent_dir(&path);
      path
    })
    .clone()
}

pub fn workspace_config_file() -> PathBuf {
  find_workspace().0.join(WORKSPACE_MARKER).join("config.toml")
}

pub fn default_log_file() -> PathBuf {
  cache_dir().join("the-morph.log")
}

/// Merge two TOML documents, merging values from `right` onto `left`
///
/// `merge_depth` sets the nesting depth up to which tables are merged instead
/// of overridden.
///
/// When a table exists in both `left` and `right`, the merged table consists of
/// all keys in `left`'s table unioned with all keys in `right` with the values
/// of `right` being merged recursively onto values of `left`. Anything else in
/// `right` replaces its counterpart in `left`.
///
/// A workspace config merged onto a global one with depth 3:
///
/// ```toml
/// # global
/// speed = 1.5
/// [durations]
/// moving-ms = 900
/// ```
/// ```toml
/// # workspace
/// [durations]
/// idle-ms = 100
/// ```
///
/// gives `speed = 1.5` with both `moving-ms = 900` and `idle-ms = 100`.
pub fn merge_toml_values(left: toml::Value, right: toml::Value, merge_depth: usize) -> toml::Value {
  use toml::Value;

  match (left, right) {
    (Value::Table(mut left_map), Value::Table(right_map)) if merge_depth > 0 => {
      for (key, rvalue) in right_map {
        let merged = match left_map.remove(&key) {
          Some(lvalue) => merge_toml_values(lvalue, rvalue, merge_depth - 1),
          None => rvalue,
        };
        left_map.insert(key, merged);
      }
      Value::Table(left_map)
    },
    (_, value) => value,
  }
}

/// Finds the workspace folder for local configuration.
///
/// Searches upward from the CWD for a directory containing `.git`, `.jj` or
/// `.the-morph`. Returns `(workspace, false)` if one was found and
/// `(CWD, true)` otherwise.
pub fn find_workspace() -> (PathBuf, bool) {
  match std::env::current_dir() {
    Ok(current_dir) => find_workspace_in(current_dir),
    Err(_) => (PathBuf::new(), true),
  }
}

pub fn find_workspace_in(dir: impl AsRef<Path>) -> (PathBuf, bool) {
  let dir = dir.as_ref();
  for ancestor in dir.ancestors() {
    if ancestor.join(".git").exists()
      || ancestor.join(".jj").exists()
      || ancestor.join(WORKSPACE_MARKER).exists()
    {
      return (ancestor.to_owned(), false);
    }
  }

  (dir.to_owned(), true)
}

fn default_config_file() -> PathBuf {
  config_dir().join("config.toml")
}

fn ensure_parent_dir(path: &Path) {
  if let Some(parent) = path.parent()
    && !parent.exists()
  {
    std::fs::create_dir_all(parent).ok();
  }
}
