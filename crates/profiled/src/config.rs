//! CLI-aware wrappers over `profiled_config`: flag overrides for the
//! config path, state path, project and output format.

use std::path::PathBuf;

use profiled_config::Config;
use profiled_core::DEFAULT_NAMESPACE;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Config file path: `--config`, else the platform default.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(profiled_config::config_path)
}

/// Load the config file named by `--config` (or the default path).
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(profiled_config::load_config(Some(&config_path(global)))?)
}

/// State file path: `--state`, else `[node] state_file`, else the data dir.
pub fn state_path(global: &GlobalOpts, cfg: &Config) -> PathBuf {
    global
        .state
        .clone()
        .unwrap_or_else(|| profiled_config::state_path(cfg))
}

/// Project: `--project`, else `[defaults] project`.
pub fn active_project(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .project
        .clone()
        .filter(|p| !p.is_empty())
        .or_else(|| Some(cfg.defaults.project.clone()).filter(|p| !p.is_empty()))
        .unwrap_or_else(|| DEFAULT_NAMESPACE.into())
}

/// Output format: `--output`, else `[defaults] output`, else table.
pub fn output_format(global: &GlobalOpts, cfg: &Config) -> OutputFormat {
    if let Some(format) = global.output {
        return format;
    }
    match cfg.defaults.output.as_str() {
        "json" => OutputFormat::Json,
        "json-compact" => OutputFormat::JsonCompact,
        "yaml" => OutputFormat::Yaml,
        "plain" => OutputFormat::Plain,
        _ => OutputFormat::Table,
    }
}
