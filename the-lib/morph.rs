use std::time::Instant;

use crate::{
  config::MorphConfig,
  plan::{
    EditPlan,
    build_plan,
  },
  script::{
    FrameScript,
    build_script,
  },
};

/// Plan and frame script for one (source, target) pair, computed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Morph {
  source: Vec<char>,
  target: Vec<char>,
  plan:   EditPlan,
  script: FrameScript,
}

impl Morph {
  pub fn new(source: &str, target: &str, config: &MorphConfig) -> Self {
    let start = log::log_enabled!(log::Level::Debug).then(Instant::now);

    let source: Vec<char> = source.chars().collect();
    let target: Vec<char> = target.chars().collect();
    let plan = build_plan(&source, &target);
    let script = build_script(
      &plan,
      &source,
      &target,
      &config.durations,
      config.deletion_hold(),
    );

    if let Some(start) = start {
      log::debug!(
        "morph of {} -> {} chars took {}s ({} frames)",
        source.len(),
        target.len(),
        Instant::now().duration_since(start).as_secs_f64(),
        script.len()
      );
    }

    Self {
      source,
      target,
      plan,
      script,
    }
  }

  pub fn source(&self) -> &[char] {
    &self.source
  }

  pub fn target(&self) -> &[char] {
    &self.target
  }

  pub fn plan(&self) -> &EditPlan {
    &self.plan
  }

  pub fn script(&self) -> &FrameScript {
    &self.script
  }
}
