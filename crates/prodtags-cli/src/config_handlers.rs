//! `tags config` subcommands.
//!
//! The file operations are generic over [`ConfigManager`] and return what
//! they read or wrote; [`handle_config_command`] prints the result through
//! [`Output`] so `--json` applies here too.

use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use prodtags_core::traits::ConfigManager;
use prodtags_core::util::paths::expand_tilde;
use prodtags_core::{Error, Result};

use crate::cli::ConfigAction;
use crate::config::TagsConfig;
use crate::output::Output;

/// Run a config subcommand against [`TagsConfig`].
pub fn handle_config_command<W: Write>(
    config_path: Option<&str>,
    action: ConfigAction,
    output: &Output,
    out: &mut W,
) -> Result<()> {
    match action {
        ConfigAction::Path => {
            let path = config_file_path::<TagsConfig>(config_path)?;
            if !path.exists() {
                log::warn!("{} does not exist yet, run `tags config init`", path.display());
            }
            output.path(out, &path)?;
        }
        ConfigAction::Get { key } => {
            let value = config_get::<TagsConfig>(config_path, &key)?;
            output.config_value(out, &value)?;
        }
        ConfigAction::Set { key, value } => {
            let path = config_set::<TagsConfig>(config_path, &key, &value)?;
            log::info!("Set {key} = {value} in {}", path.display());
            output.path(out, &path)?;
        }
        ConfigAction::Init { file, force } => {
            let path = config_init::<TagsConfig>(file.as_deref().or(config_path), force)?;
            log::info!("Wrote default configuration to {}", path.display());
            output.path(out, &path)?;
        }
    }
    Ok(())
}

/// The config file `C` would be loaded from.
pub fn config_file_path<C: ConfigManager>(config_path: Option<&str>) -> Result<PathBuf> {
    C::resolve_config_path(config_path).ok_or_else(no_config_dir)
}

/// Value of a dotted key (`logging.level`) in the effective configuration.
///
/// Defaults are included, so a key is only missing if it is unknown or an
/// optional setting nobody set.
pub fn config_get<C: ConfigManager>(config_path: Option<&str>, key: &str) -> Result<toml::Value> {
    let config = C::load(config_path)?;
    let root = toml::Value::try_from(&config).map_err(|e| Error::config(e.to_string()))?;
    key.split('.')
        .try_fold(&root, |value, part| value.get(part))
        .cloned()
        .ok_or_else(|| Error::config(format!("'{key}' is not set")))
}

/// Store `raw` under a dotted key of an existing config file.
///
/// The edited file must still load as `C`; otherwise nothing is written.
pub fn config_set<C: ConfigManager>(
    config_path: Option<&str>,
    key: &str,
    raw: &str,
) -> Result<PathBuf> {
    if key.split('.').any(str::is_empty) {
        return Err(Error::config(format!("Invalid config key '{key}'")));
    }

    let path = config_file_path::<C>(config_path)?;
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::config(format!(
                "{} does not exist, run `tags config init` first",
                path.display()
            )));
        }
        Err(e) => return Err(Error::io_with_path(e, &path)),
    };
    let mut table: toml::Table = toml::from_str(&content)
        .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?;

    let defaults = toml::Value::try_from(C::default()).map_err(|e| Error::config(e.to_string()))?;
    let is_list = key
        .split('.')
        .try_fold(&defaults, |value, part| value.get(part))
        .is_some_and(toml::Value::is_array);
    insert(&mut table, key, parse_value(raw, is_list))?;

    let text = toml::to_string_pretty(&table).map_err(|e| Error::config(e.to_string()))?;
    toml::from_str::<C>(&text)
        .map_err(|e| Error::config(format!("Invalid value for '{key}': {e}")))?;
    std::fs::write(&path, text).map_err(|e| Error::io_with_path(e, &path))?;
    Ok(path)
}

/// Write the default configuration to `file` (or the platform default).
pub fn config_init<C: ConfigManager>(file: Option<&str>, force: bool) -> Result<PathBuf> {
    let path = match file {
        Some(file) => expand_tilde(file),
        None => C::default_config_path().ok_or_else(no_config_dir)?,
    };

    if path.exists() && !force {
        return Err(Error::config(format!(
            "{} already exists, pass --force to overwrite it",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
    }

    std::fs::write(&path, C::default().to_toml_string()?)
        .map_err(|e| Error::io_with_path(e, &path))?;
    Ok(path)
}

fn no_config_dir() -> Error {
    Error::config("Could not determine the config directory for this platform")
}

fn insert(table: &mut toml::Table, key: &str, value: toml::Value) -> Result<()> {
    let Some((section, rest)) = key.split_once('.') else {
        table.insert(key.to_string(), value);
        return Ok(());
    };

    let child = table
        .entry(section)
        .or_insert_with(|| toml::Value::Table(toml::Table::new()));
    match child {
        toml::Value::Table(child) => insert(child, rest, value),
        _ => Err(Error::config(format!("'{section}' is not a section"))),
    }
}

/// Read a command-line value as a TOML literal, else as a plain string.
///
/// List settings also take a comma separated shorthand (`md,txt`).
fn parse_value(raw: &str, is_list: bool) -> toml::Value {
    let literal = toml::from_str::<toml::Table>(&format!("value = {raw}"))
        .ok()
        .and_then(|mut table| table.remove("value"));

    match literal {
        Some(value) if !is_list || value.is_array() => value,
        _ if is_list => toml::Value::Array(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| toml::Value::String(s.to_string()))
                .collect(),
        ),
        _ => toml::Value::String(raw.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_file(dir: &TempDir, content: &str) -> String {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn default_file(dir: &TempDir) -> String {
        config_file(dir, &TagsConfig::default().to_toml_string().unwrap())
    }

    #[test]
    fn test_path_prefers_explicit() {
        let path = config_file_path::<TagsConfig>(Some("/etc/prodtags.toml")).unwrap();
        assert_eq!(path, PathBuf::from("/etc/prodtags.toml"));
    }

    #[test]
    fn test_get_includes_defaults() {
        let dir = TempDir::new().unwrap();
        let file = config_file(&dir, "tag_file = \"~/tags.yaml\"\n");

        let heading = config_get::<TagsConfig>(Some(&file), "tags_heading").unwrap();
        assert_eq!(heading.as_str(), Some("# Tags"));
        let level = config_get::<TagsConfig>(Some(&file), "logging.level").unwrap();
        assert_eq!(level.as_str(), Some("warn"));
        let tag_file = config_get::<TagsConfig>(Some(&file), "tag_file").unwrap();
        assert_eq!(tag_file.as_str(), Some("~/tags.yaml"));
    }

    #[test]
    fn test_get_unset_optional_key() {
        let dir = TempDir::new().unwrap();
        let file = default_file(&dir);
        let err = config_get::<TagsConfig>(Some(&file), "documents_dir").unwrap_err();
        assert!(err.to_string().contains("not set"));
        assert!(config_get::<TagsConfig>(Some(&file), "logging.nope").is_err());
    }

    #[test]
    fn test_set_string_path() {
        let dir = TempDir::new().unwrap();
        let file = default_file(&dir);

        config_set::<TagsConfig>(Some(&file), "tag_file", "~/tags.yaml").unwrap();

        let config = TagsConfig::load(Some(&file)).unwrap();
        assert_eq!(config.tag_file.as_deref(), Some("~/tags.yaml"));
    }

    #[test]
    fn test_set_heading_with_hash() {
        let dir = TempDir::new().unwrap();
        let file = default_file(&dir);

        config_set::<TagsConfig>(Some(&file), "tags_heading", "## Labels").unwrap();

        let config = TagsConfig::load(Some(&file)).unwrap();
        assert_eq!(config.tags_heading, "## Labels");
    }

    #[test]
    fn test_set_bool_and_nested() {
        let dir = TempDir::new().unwrap();
        let file = config_file(&dir, "");

        config_set::<TagsConfig>(Some(&file), "include_hidden", "true").unwrap();
        config_set::<TagsConfig>(Some(&file), "logging.level", "debug").unwrap();

        let config = TagsConfig::load(Some(&file)).unwrap();
        assert!(config.include_hidden);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_set_extensions_shorthand_and_literal() {
        let dir = TempDir::new().unwrap();
        let file = default_file(&dir);

        config_set::<TagsConfig>(Some(&file), "extensions", "md, txt").unwrap();
        let config = TagsConfig::load(Some(&file)).unwrap();
        assert_eq!(config.extensions, ["md", "txt"]);

        config_set::<TagsConfig>(Some(&file), "extensions", "[\"org\"]").unwrap();
        let config = TagsConfig::load(Some(&file)).unwrap();
        assert_eq!(config.extensions, ["org"]);
    }

    #[test]
    fn test_set_rejects_wrong_type() {
        let dir = TempDir::new().unwrap();
        let file = default_file(&dir);
        let before = std::fs::read_to_string(&file).unwrap();

        let err = config_set::<TagsConfig>(Some(&file), "include_hidden", "maybe").unwrap_err();
        assert!(err.to_string().contains("Invalid value"));
        assert_eq!(std::fs::read_to_string(&file).unwrap(), before);
    }

    #[test]
    fn test_set_rejects_key_below_scalar() {
        let dir = TempDir::new().unwrap();
        let file = default_file(&dir);
        let err = config_set::<TagsConfig>(Some(&file), "tags_heading.x", "1").unwrap_err();
        assert!(err.to_string().contains("not a section"));
        assert!(config_set::<TagsConfig>(Some(&file), "logging.", "1").is_err());
    }

    #[test]
    fn test_set_requires_existing_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("missing.toml");
        let err =
            config_set::<TagsConfig>(Some(file.to_str().unwrap()), "tag_file", "x").unwrap_err();
        assert!(err.to_string().contains("config init"));
    }

    #[test]
    fn test_init_creates_parents() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("prodtags").join("config.toml");

        let path = config_init::<TagsConfig>(Some(file.to_str().unwrap()), false).unwrap();

        assert_eq!(path, file);
        let content = std::fs::read_to_string(&file).unwrap();
        assert!(content.contains("tags_heading"));
        assert!(content.contains("[logging]"));
    }

    #[test]
    fn test_init_respects_force() {
        let dir = TempDir::new().unwrap();
        let file = config_file(&dir, "old");

        let err = config_init::<TagsConfig>(Some(&file), false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "old");

        config_init::<TagsConfig>(Some(&file), true).unwrap();
        assert!(std::fs::read_to_string(&file).unwrap().contains("tags_heading"));
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("true", false), toml::Value::Boolean(true));
        assert_eq!(parse_value("42", false), toml::Value::Integer(42));
        assert_eq!(parse_value("~/notes", false).as_str(), Some("~/notes"));
        assert_eq!(
            parse_value("warn,prodtags_content=debug", false).as_str(),
            Some("warn,prodtags_content=debug")
        );
        assert_eq!(
            parse_value("md", true),
            toml::Value::Array(vec![toml::Value::String("md".into())])
        );
    }

    #[test]
    fn test_handle_get_prints_value() {
        let dir = TempDir::new().unwrap();
        let file = default_file(&dir);
        let mut out = Vec::new();
        let action = ConfigAction::Get {
            key: "tags_heading".into(),
        };

        handle_config_command(Some(&file), action, &Output::new(false), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "# Tags\n");
    }
}
