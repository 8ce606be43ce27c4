//! `lctrack` configuration: TOML file, then `LCTRACK_*` environment variables,
//! then command-line flags.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  /// Signed-in account. Present means the remote store is used.
  #[serde(default)]
  pub account:    Option<String>,
  #[serde(default = "default_remote_url")]
  pub remote_url: String,
}

fn default_store_path() -> PathBuf { PathBuf::from("~/.lctrack/local.db") }

fn default_remote_url() -> String { "http://127.0.0.1:5380".to_string() }

impl Settings {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("LCTRACK"))
      .build()
      .context("failed to read config file")?
      .try_deserialize()
      .context("failed to deserialise settings")
  }

  /// Apply command-line flags on top of the loaded settings.
  pub fn with_overrides(
    mut self,
    account: Option<String>,
    remote_url: Option<String>,
    store: Option<PathBuf>,
  ) -> Self {
    if let Some(account) = account {
      self.account = Some(account);
    }
    if let Some(url) = remote_url {
      self.remote_url = url;
    }
    if let Some(store) = store {
      self.store_path = store;
    }
    self
  }

  /// The account, if one is set and not blank.
  pub fn account(&self) -> Option<&str> {
    self
      .account
      .as_deref()
      .map(str::trim)
      .filter(|a| !a.is_empty())
  }

}
