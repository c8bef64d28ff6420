use crate::cli::DEFAULT_CONFIG_FILE;
use crate::domain::error::{HarnessError, HarnessResult};
use crate::domain::models::HarnessConfig;
use std::path::{Path, PathBuf};

/// An explicit `--config` must exist; otherwise `./cujson-bench.toml` is used when present.
pub fn load_config(explicit: Option<&Path>) -> HarnessResult<HarnessConfig> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !fallback.exists() {
                tracing::debug!("no config file, using defaults");
                return Ok(HarnessConfig::default());
            }
            fallback
        }
    };
    let raw = std::fs::read_to_string(&path).map_err(|e| HarnessError::io(&path, e))?;
    let config: HarnessConfig = toml::from_str(&raw).map_err(|source| HarnessError::Config {
        path: path.clone(),
        source,
    })?;
    tracing::debug!(path = %path.display(), figures = config.figures.len(), "config loaded");
    Ok(config)
}
