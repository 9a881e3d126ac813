use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
pub const CURRENT_VERSION: u32 = 1;

/// Environment variable that overrides [`QstConfig::output`].
pub const OUTPUT_ENV: &str = "QST_OUTPUT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QstConfig {
    /// Schema version. Missing or 0 = a hand-written file that predates
    /// `config init`; its fields are read as-is.
    #[serde(default)]
    pub config_version: u32,
    #[serde(default)]
    pub output: OutputFormat,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub log_filter: Option<String>,
}

impl Default for QstConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            output: OutputFormat::default(),
            log_filter: None,
        }
    }
}

impl QstConfig {
    /// Apply the `QST_OUTPUT` override, if set.
    pub fn with_env_override(mut self, output: Option<String>) -> eyre::Result<Self> {
        if let Some(raw) = output {
            self.output = raw
                .parse()
                .map_err(|e| eyre::eyre!("invalid {OUTPUT_ENV}: {e}"))?;
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Pretty-printed JSON analysis.
    Json,
    /// Markdown report.
    #[default]
    Report,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Report => f.write_str("report"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "report" => Ok(OutputFormat::Report),
            other => Err(format!("unknown output format '{other}' (expected json or report)")),
        }
    }
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("qst-analyzer"))
}

pub fn config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// Load the user config, falling back to defaults when none exists.
pub fn load_config() -> eyre::Result<QstConfig> {
    let path = config_path()?;
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(QstConfig::default());
    }
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> eyre::Result<QstConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = match json.get("config_version") {
        None | Some(serde_json::Value::Null) => 0,
        Some(raw) => raw
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| eyre::eyre!("invalid config_version {raw} in {}", path.display()))?,
    };

    let migrated = migrate(json, on_disk_version)?;
    let config: QstConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// The `log_filter` set in the user config, if it can be read.
///
/// Tracing is set up before the config is loaded, so this reads the raw
/// file without migrating or validating it. Any problem yields `None`;
/// the command that actually needs the config reports it.
pub fn configured_log_filter() -> Option<String> {
    peek_log_filter(&config_path().ok()?)
}

pub fn peek_log_filter(path: &Path) -> Option<String> {
    let contents = std::fs::read_to_string(path).ok()?;
    let json: serde_json::Value = serde_json::from_str(&contents).ok()?;
    json.get("log_filter")?.as_str().map(str::to_string)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
///
/// Each migration is a pure transform on the raw JSON value.
pub fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update qst."
        ));
    }

    // v0 → v1: unversioned hand-written file; missing fields take their
    // serde defaults, so only the version is stamped.
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (stamped version)");
    }

    Ok(json)
}

pub fn save_config(config: &QstConfig) -> eyre::Result<PathBuf> {
    save_config_to(&config_dir()?, config)
}

/// Write `config.json` into `dir`, creating it if needed.
pub fn save_config_to(dir: &Path, config: &QstConfig) -> eyre::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let path = dir.join("config.json");
    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = dir.join("config.json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, &path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(path)
}
