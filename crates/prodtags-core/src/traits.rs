//! Shared traits.
//!
//! - [`ConfigManager`]: TOML configuration file discovery and loading

use std::env;
use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::util::paths::expand_tilde;

/// A TOML-backed configuration type.
///
/// Implementors only name their project; discovery, loading and
/// serialization come from the provided methods. The config file is
/// resolved from, in order:
///
/// 1. an explicit path (usually `--config`),
/// 2. the `{PROJECT}_CONFIG` environment variable,
/// 3. `<platform config dir>/{project}/config.toml`.
pub trait ConfigManager: Default + Serialize + DeserializeOwned {
    /// Project name, used for the config directory and env var prefix.
    fn project_name() -> &'static str;

    /// Name of the environment variable that points at the config file.
    ///
    /// "prodtags" → "PRODTAGS_CONFIG", "my-tool" → "MY_TOOL_CONFIG".
    fn config_env_var() -> String {
        format!(
            "{}_CONFIG",
            Self::project_name().to_uppercase().replace(['-', ' '], "_")
        )
    }

    /// Platform default location of the config file.
    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::project_name()).join("config.toml"))
    }

    /// Resolve which config file to use.
    fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(expand_tilde(path));
        }
        if let Ok(path) = env::var(Self::config_env_var()) {
            if !path.trim().is_empty() {
                return Some(expand_tilde(&path));
            }
        }
        Self::default_config_path()
    }

    /// Load the configuration.
    ///
    /// A missing file yields the defaults. A file that exists but does not
    /// parse is an error.
    fn load(explicit: Option<&str>) -> Result<Self> {
        let Some(path) = Self::resolve_config_path(explicit) else {
            log::debug!("No config directory on this platform, using defaults");
            return Ok(Self::default());
        };

        if !path.exists() {
            log::debug!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| Error::io_with_path(e, &path))?;
        let config = toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Serialize to pretty TOML.
    fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }
}
