use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::cli::Args;

const ENV_PREFIX: &str = "APP";

/// Controller settings for one CLI run.
///
/// Layered lowest to highest: built-in defaults, `submit.toml` (or the file
/// given with `--config`), `APP__*` environment variables, command-line flags.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub selector: String,
    pub async_response: bool,
    pub enable_validation: bool,
    pub reset_on_success: bool,
    pub reset_on_error: bool,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    pub log_filter: String,
}

pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    build_settings(path, Environment::with_prefix(ENV_PREFIX).separator("__"))
}

fn build_settings(path: Option<&Path>, env: Environment) -> Result<Settings, ConfigError> {
    let file = match path {
        Some(path) => File::from(path).required(true),
        None => File::with_name("submit").required(false),
    };

    Config::builder()
        .set_default("selector", "form")?
        // A CLI has no page to fall back to, so async handling is on here.
        .set_default("async_response", true)?
        .set_default("enable_validation", true)?
        .set_default("reset_on_success", true)?
        .set_default("reset_on_error", true)?
        .set_default("log_filter", "info")?
        .add_source(file)
        .add_source(env)
        .build()?
        .try_deserialize()
}

impl Settings {
    pub fn apply(&mut self, args: &Args) {
        if let Some(selector) = &args.selector {
            self.selector = selector.clone();
        }
        if args.sync {
            self.async_response = false;
        }
        if args.no_validation {
            self.enable_validation = false;
        }
        if args.keep_fields {
            self.reset_on_success = false;
            self.reset_on_error = false;
        }
        if let Some(timeout_ms) = args.timeout_ms {
            self.timeout_ms = Some(timeout_ms);
        }
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
