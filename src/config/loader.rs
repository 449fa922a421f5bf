//! Loading `code-review.yaml` and folding it over the built-in defaults.

use std::env;
use std::fs;
use std::path::Path;

use serde_json::{Value, json};
use tracing::{debug, error};

use crate::config::merge::deep_merge;
use crate::config::schema::{Config, LlmConfig};
use crate::error::ConfigError;

/// Config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "code-review.yaml";

pub const GITIGNORE_FILE_NAME: &str = ".gitignore";

/// Environment variable overriding `LLM.BASE_URL`.
pub const BASE_URL_ENV_VAR: &str = "GPCR_LLM_BASE_URL";

/// Environment variable overriding `LLM.API_KEY`.
pub const API_KEY_ENV_VAR: &str = "GPCR_LLM_API_KEY";

/// Read the configuration for `dir`, never failing.
///
/// A missing file yields the defaults. A file that cannot be read or parsed is
/// logged and also yields the defaults. Environment overrides apply in every
/// case.
pub fn read_config(dir: &Path) -> Config {
    let mut config = match load_config(dir) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}; using built-in defaults");
            Config::default()
        }
    };
    apply_env_overrides(&mut config);
    config
}

/// Load and merge the configuration for `dir`.
///
/// Merge order is defaults, then `.gitignore` patterns (when enabled and the
/// file exists), then the user's file.
pub fn load_config(dir: &Path) -> Result<Config, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        debug!("No {} found, using defaults", CONFIG_FILE_NAME);
        return Ok(Config::default());
    }

    let display_path = config_path.display().to_string();
    let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::ReadFailed {
        path: display_path.clone(),
        source,
    })?;
    let mut user: Value = if content.trim().is_empty() {
        json!({})
    } else {
        serde_yaml::from_str(&content).map_err(|source| ConfigError::ParseFailed {
            path: display_path,
            source,
        })?
    };

    let include_gitignore = gitignore_enabled(&user);
    if let Value::Object(map) = &mut user {
        map.insert("isContainGitignore".to_string(), Value::Bool(include_gitignore));
    }

    let gitignore_patterns = if include_gitignore {
        read_gitignore_patterns(dir)
    } else {
        Vec::new()
    };

    let defaults = serde_json::to_value(Config::default()).map_err(ConfigError::Invalid)?;
    let merged = if gitignore_patterns.is_empty() {
        deep_merge([&defaults, &user])
    } else {
        debug!("Merging {} .gitignore patterns", gitignore_patterns.len());
        let gitignore = json!({ "ignore": gitignore_patterns });
        deep_merge([&defaults, &gitignore, &user])
    };

    serde_json::from_value(merged).map_err(ConfigError::Invalid)
}

/// Whether `.gitignore` joins the merge: yes when the key is absent,
/// otherwise the truthiness of its value (`null`, `false`, `0` and `""` are no).
fn gitignore_enabled(user: &Value) -> bool {
    match user.get("isContainGitignore") {
        None => true,
        Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

/// Patterns from `dir/.gitignore`, or none when the file is absent or unreadable.
pub fn read_gitignore_patterns(dir: &Path) -> Vec<String> {
    let path = dir.join(GITIGNORE_FILE_NAME);
    match fs::read_to_string(&path) {
        Ok(text) => parse_gitignore(&text),
        Err(e) => {
            debug!("No usable {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Extract ignore patterns from `.gitignore` text.
///
/// Blank lines, comments and negated patterns are dropped; a leading `/`
/// anchor is removed since staged paths are already root-relative.
pub fn parse_gitignore(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
        .map(|line| line.strip_prefix('/').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Replace the LLM endpoint and key with `GPCR_LLM_*` environment values.
pub fn apply_env_overrides(config: &mut Config) {
    let base_url = non_empty_env(BASE_URL_ENV_VAR);
    let api_key = non_empty_env(API_KEY_ENV_VAR);
    if base_url.is_none() && api_key.is_none() {
        return;
    }

    let llm = config.llm.get_or_insert_with(LlmConfig::default);
    if let Some(url) = base_url {
        llm.base_url = Some(url);
    }
    if let Some(key) = api_key {
        llm.api_key = Some(key);
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}
