use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Name of the debug log written with `--log`.
pub const LOG_FILE_NAME: &str = "logview.log";

/// Configuration for overriding default application paths
#[derive(Debug, Clone, Default)]
pub struct PathConfig {
    /// Custom data directory (from CLI or ENV)
    pub config_dir: Option<PathBuf>,
}

impl PathConfig {
    /// Create PathConfig from CLI arguments and environment variables
    ///
    /// Priority: CLI args → ENV var (LOGVIEW_CONFIG_DIR) → None (use defaults)
    pub fn from_env_and_cli(cli_dir: Option<PathBuf>) -> Self {
        let config_dir = cli_dir.or_else(|| {
            std::env::var("LOGVIEW_CONFIG_DIR")
                .ok()
                .map(PathBuf::from)
        });

        Self { config_dir }
    }
}

/// Get path to a data file (logs)
///
/// Priority:
/// 1. CLI --config-dir argument
/// 2. LOGVIEW_CONFIG_DIR environment variable
/// 3. Current directory IF a logview.log already exists there
/// 4. Platform-specific data directory from dirs-next (default)
///
/// Platform paths:
/// - Linux: ~/.local/share/logview/{name}
/// - macOS: ~/Library/Application Support/logview/{name}
/// - Windows: %APPDATA%\logview\{name}
pub fn data_file(name: &str, config: &PathConfig) -> PathBuf {
    get_data_dir(config).join(name)
}

/// Ensure that the data directory exists
pub fn ensure_dirs(config: &PathConfig) -> Result<()> {
    let data_dir = get_data_dir(config);

    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    }

    Ok(())
}

fn has_local_log_file(dir: &Path) -> bool {
    dir.join(LOG_FILE_NAME).exists()
}

fn get_data_dir(config: &PathConfig) -> PathBuf {
    if let Some(dir) = &config.config_dir {
        return dir.clone();
    }

    if let Ok(current_dir) = std::env::current_dir()
        && has_local_log_file(&current_dir)
    {
        return current_dir;
    }

    if let Some(dir) = dirs_next::data_dir() {
        return dir.join("logview");
    }

    PathBuf::from(".")
}
