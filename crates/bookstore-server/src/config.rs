use anyhow::Context;
use bookstore_core::BookstoreConfig;
use std::{env, path::PathBuf};

/// Load the server configuration.
///
/// A missing file is not an error: the server starts with defaults (which
/// still require key material from the environment).
pub fn load_config() -> anyhow::Result<(BookstoreConfig, PathBuf)> {
    let path = config_path();
    if !path.exists() {
        tracing::warn!(path = %path.display(), "config file not found, using defaults");
        return Ok((BookstoreConfig::default(), path));
    }

    let cfg = BookstoreConfig::from_file(&path)
        .with_context(|| format!("failed to load config from {}", path.display()))?;
    Ok((cfg, path))
}

fn config_path() -> PathBuf {
    if let Ok(p) = env::var("BOOKSTORE_CONFIG") {
        return PathBuf::from(p);
    }
    PathBuf::from("bookstore.yaml")
}
