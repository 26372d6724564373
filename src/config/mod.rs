mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;
use vodpath_parser::KeywordTable;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    tracing::debug!("Loaded config from {:?}", path);

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./vodpath.toml",
        "~/.config/vodpath/config.toml",
        "/etc/vodpath/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.uri.multi_uri_suffix.is_empty() {
        anyhow::bail!("Multi-uri suffix cannot be empty");
    }

    if config.uri.media_root.as_deref() == Some("") {
        anyhow::bail!("Media root cannot be empty; omit it to disable mapping");
    }

    // building the tables checks name length and uniqueness
    KeywordTable::full(&config.params).context("Invalid [params] section")?;
    KeywordTable::progressive(&config.params).context("Invalid [params] section")?;

    if config.params.clip_to.is_empty() {
        tracing::warn!("Empty clip_to param name disables every uri param");
    }

    let formats = [
        ("segment_prefix", &config.formats.segment_prefix),
        ("segment_extension", &config.formats.segment_extension),
        ("thumb_prefix", &config.formats.thumb_prefix),
        ("thumb_extension", &config.formats.thumb_extension),
    ];
    for (name, value) in formats {
        if value.is_empty() {
            anyhow::bail!("Format '{}' cannot be empty", name);
        }
        if value.contains('/') {
            anyhow::bail!("Format '{}' cannot contain '/'", name);
        }
    }

    Ok(())
}
