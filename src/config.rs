use std::path::PathBuf;

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
  #[serde(default)]
  pub _data_dir: PathBuf,
  #[serde(default)]
  pub _config_dir: PathBuf,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
  #[serde(default, flatten)]
  pub config: AppConfig,
  /// Model identifier for the generative-language endpoint.
  #[serde(default = "default_model")]
  pub model: String,
  /// How many headlines to ask for.
  #[serde(default = "default_headline_count")]
  pub headline_count: usize,
}

impl Default for Config {
  fn default() -> Self {
    Self { config: AppConfig::default(), model: default_model(), headline_count: default_headline_count() }
  }
}

impl Config {
  pub fn new() -> Result<Self, config::ConfigError> {
    let data_dir = crate::utils::get_data_dir();
    let config_dir = crate::utils::get_config_dir();
    let mut builder = config::Config::builder()
      .set_default("_data_dir", data_dir.to_str().unwrap())?
      .set_default("_config_dir", config_dir.to_str().unwrap())?;

    let config_files = [("config.toml", config::FileFormat::Toml)];
    let mut found_config = false;
    for (file, format) in &config_files {
      builder = builder.add_source(config::File::from(config_dir.join(file)).format(*format).required(false));
      if config_dir.join(file).exists() {
        found_config = true
      }
    }
    if !found_config {
      log::info!("No configuration file found, using defaults");
    }

    let cfg: Self = builder.build()?.try_deserialize()?;

    Ok(cfg)
  }
}

fn default_model() -> String {
  "gemini-2.5-flash".to_string()
}

const fn default_headline_count() -> usize {
  5
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn defaults_match_the_serde_defaults() {
    let cfg = Config::default();
    assert_eq!(cfg.model, "gemini-2.5-flash");
    assert_eq!(cfg.headline_count, 5);

    let deserialized: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(deserialized.model, cfg.model);
    assert_eq!(deserialized.headline_count, cfg.headline_count);
  }
}
