//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Read a `.env` file if one exists (never overrides the real environment)
//! 2. Attempt to load from environment variables
//! 3. If incomplete, fall back to loading from file
//! 4. Probe multiple paths for config files
//! 5. Supports JSON and TOML formats
//!
//! Whatever the source, the result is validated before it is returned.
//!
//! ## Environment Variables
//! - `WXWORK_CORP_ID`: Corporation id (required)
//! - `WXWORK_CORP_SECRET`: Application secret (required)
//! - `WXWORK_AGENT_ID`: Application agent id (required)
//! - `WXWORK_API_BASE`: API root, defaults to the public endpoint
//! - `WXWORK_TIMEOUT_SECS`: Per-request timeout in seconds, defaults to 10
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./wxwork.{json,toml}` or `./config.{json,toml}` (current working directory)
//! 2. The same names in the parent and grandparent directories
//! 3. Relative to executable location

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use wxwork_domain::constants::{DEFAULT_API_BASE, DEFAULT_TIMEOUT_SECS};
use wxwork_domain::{Result, WxWorkConfig, WxWorkError};

/// Environment variable names read by [`load_from_env`].
pub const ENV_CORP_ID: &str = "WXWORK_CORP_ID";
pub const ENV_CORP_SECRET: &str = "WXWORK_CORP_SECRET";
pub const ENV_AGENT_ID: &str = "WXWORK_AGENT_ID";
pub const ENV_API_BASE: &str = "WXWORK_API_BASE";
pub const ENV_TIMEOUT_SECS: &str = "WXWORK_TIMEOUT_SECS";

const FILE_NAMES: [&str; 4] = ["wxwork.json", "wxwork.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables (after reading `.env`).
/// If any required variable is missing, falls back to a config file.
///
/// # Errors
/// Returns `WxWorkError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - A required field is missing or empty
pub fn load() -> Result<WxWorkConfig> {
    if let Ok(path) = dotenvy::dotenv() {
        debug!(path = %path.display(), "loaded .env file");
    }

    match load_from_env() {
        Ok(config) => {
            info!("configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            debug!(error = %e, "failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `WxWorkError::Config` if a required variable is missing, the
/// timeout is not a number, or validation fails.
pub fn load_from_env() -> Result<WxWorkConfig> {
    let corp_id = env_var(ENV_CORP_ID)?;
    let corp_secret = env_var(ENV_CORP_SECRET)?;
    let agent_id = env_var(ENV_AGENT_ID)?;

    let api_base = std::env::var(ENV_API_BASE).unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
    let timeout_secs = match std::env::var(ENV_TIMEOUT_SECS) {
        Ok(raw) => raw.trim().parse::<u64>().map_err(|e| {
            WxWorkError::Config(format!("invalid {ENV_TIMEOUT_SECS} {raw:?}: {e}"))
        })?,
        Err(_) => DEFAULT_TIMEOUT_SECS,
    };

    let config = WxWorkConfig { corp_id, corp_secret, agent_id, api_base, timeout_secs };
    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations (see
/// [`probe_config_paths`]). The format follows the file extension.
///
/// # Errors
/// Returns `WxWorkError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid or validation fails
pub fn load_from_file(path: Option<PathBuf>) -> Result<WxWorkConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(WxWorkError::Config(format!(
                    "config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            WxWorkError::Config("no config file found in any of the standard locations".into())
        })?,
    };

    info!(path = %config_path.display(), "loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| WxWorkError::Config(format!("failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<WxWorkConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| WxWorkError::Config(format!("invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| WxWorkError::Config(format!("invalid JSON format: {e}"))),
        _ => Err(WxWorkError::Config(format!("unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a config file
///
/// Searches the current working directory, its parent and grandparent, then
/// the same three levels relative to the executable.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| [root.clone(), root.join(".."), root.join("../..")])
        .flat_map(|dir| FILE_NAMES.map(|name| dir.join(name)))
        .find(|path| path.exists())
}

/// # Errors
/// Returns `WxWorkError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| WxWorkError::Config(format!("missing required environment variable: {key}")))
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: [&str; 5] =
        [ENV_CORP_ID, ENV_CORP_SECRET, ENV_AGENT_ID, ENV_API_BASE, ENV_TIMEOUT_SECS];

    fn clear_env() {
        for key in ALL_VARS {
            std::env::remove_var(key);
        }
    }

    fn write_temp(contents: &str, extension: &str) -> PathBuf {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        let path = temp_file.path().with_extension(extension);
        std::fs::copy(temp_file.path(), &path).unwrap();
        path
    }

    #[test]
    fn test_load_from_env_required_vars_only() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_CORP_ID, "ww123");
        std::env::set_var(ENV_CORP_SECRET, "secret");
        std::env::set_var(ENV_AGENT_ID, "1000002");

        let config = load_from_env().expect("config from env");
        assert_eq!(config.corp_id, "ww123");
        assert_eq!(config.agent_id, "1000002");
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);

        clear_env();
    }

    #[test]
    fn test_load_from_env_overrides() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_CORP_ID, "ww123");
        std::env::set_var(ENV_CORP_SECRET, "secret");
        std::env::set_var(ENV_AGENT_ID, "1000002");
        std::env::set_var(ENV_API_BASE, "http://127.0.0.1:8080/cgi-bin");
        std::env::set_var(ENV_TIMEOUT_SECS, " 3 ");

        let config = load_from_env().expect("config from env");
        assert_eq!(config.api_base, "http://127.0.0.1:8080/cgi-bin");
        assert_eq!(config.timeout_secs, 3);

        clear_env();
    }

    #[test]
    fn test_load_from_env_missing_var() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_CORP_ID, "ww123");

        let err = load_from_env().unwrap_err();
        assert_eq!(
            err,
            WxWorkError::Config("missing required environment variable: WXWORK_CORP_SECRET".into())
        );

        clear_env();
    }

    #[test]
    fn test_load_from_env_invalid_timeout() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_CORP_ID, "ww123");
        std::env::set_var(ENV_CORP_SECRET, "secret");
        std::env::set_var(ENV_AGENT_ID, "1000002");
        std::env::set_var(ENV_TIMEOUT_SECS, "soon");

        assert!(matches!(load_from_env(), Err(WxWorkError::Config(_))));

        clear_env();
    }

    #[test]
    fn test_load_from_env_empty_secret_fails_validation() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_CORP_ID, "ww123");
        std::env::set_var(ENV_CORP_SECRET, "");
        std::env::set_var(ENV_AGENT_ID, "1000002");

        assert!(matches!(load_from_env(), Err(WxWorkError::Config(_))));

        clear_env();
    }

    #[test]
    fn test_load_from_file_json() {
        let path = write_temp(
            r#"{"corp_id": "ww1", "corp_secret": "s", "agent_id": "1000002", "timeout_secs": 5}"#,
            "json",
        );

        let config = load_from_file(Some(path.clone())).expect("config from JSON");
        assert_eq!(config.corp_id, "ww1");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.api_base, DEFAULT_API_BASE);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_toml() {
        let path = write_temp(
            r#"
corp_id = "ww1"
corp_secret = "s"
agent_id = "1000002"
api_base = "http://localhost:9000"
"#,
            "toml",
        );

        let config = load_from_file(Some(path.clone())).expect("config from TOML");
        assert_eq!(config.api_base, "http://localhost:9000");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/wxwork.json")));
        assert!(matches!(result, Err(WxWorkError::Config(_))));
    }

    #[test]
    fn test_load_from_file_missing_field() {
        let path = write_temp(r#"{"corp_id": "ww1", "agent_id": "1000002"}"#, "json");

        let err = load_from_file(Some(path.clone())).unwrap_err();
        assert!(err.to_string().contains("corp_secret"), "got {err}");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("corp_id: x", &PathBuf::from("wxwork.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }
}
