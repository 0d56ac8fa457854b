//! Configuration for the OESS SDX gateway.
//!
//! A single TOML file (platform config dir or an explicit path) merged with
//! `SDX_`-prefixed environment variables, resolved into
//! `sdx_core::GatewayConfig`. The OESS password comes from
//! `SDX_OESS_PASSWORD`, a named env var, or the file, in that order.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use sdx_core::config::{DEFAULT_MODEL_VERSION, DEFAULT_VERSION_FILE};
use sdx_core::{
    BackendConfig, GatewayConfig, InterfaceOverride, LinkOverride, StaticOverrides,
    TlsVerification,
};

/// Environment variable that always wins for the OESS password.
pub const PASSWORD_ENV: &str = "SDX_OESS_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no OESS password configured (set {PASSWORD_ENV}, oess.password_env or oess.password)")]
    NoCredentials,

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl ConfigError {
    fn missing(field: &str) -> Self {
        Self::Validation {
            field: field.into(),
            reason: "required but not set".into(),
        }
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Exchange display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oxp_name: Option<String>,

    /// Exchange domain used in every URN (e.g. "ampath.net").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oxp_url: Option<String>,

    #[serde(default = "default_model_version")]
    pub model_version: String,

    /// Per-operation backend timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_version_file")]
    pub version_file: PathBuf,

    #[serde(default)]
    pub oess: OessSection,

    /// Interface overrides keyed by OESS interface id.
    #[serde(default)]
    pub interfaces: BTreeMap<String, InterfaceOverride>,

    /// Link overrides keyed by OESS link id.
    #[serde(default)]
    pub links: BTreeMap<String, LinkOverride>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            oxp_name: None,
            oxp_url: None,
            model_version: default_model_version(),
            timeout: default_timeout(),
            version_file: default_version_file(),
            oess: OessSection::default(),
            interfaces: BTreeMap::new(),
            links: BTreeMap::new(),
        }
    }
}

fn default_model_version() -> String {
    DEFAULT_MODEL_VERSION.into()
}
fn default_timeout() -> u64 {
    30
}
fn default_version_file() -> PathBuf {
    PathBuf::from(DEFAULT_VERSION_FILE)
}

/// The `[oess]` table.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OessSection {
    /// Base URL of the OESS install (e.g. "https://oess.example.net/oess").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub workgroup_id: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Plaintext password (prefer `SDX_OESS_PASSWORD` or `password_env`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Name of an environment variable holding the password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,

    /// Path to a custom CA certificate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Skip TLS verification. Defaults to on when no CA is given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("net", "atlanticwave-sdx", "oess-sdx-gateway").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("oess-sdx-gateway");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the Config from `path` (or the platform default) plus environment.
///
/// Nested keys use a double underscore: `SDX_OESS__URL`, `SDX_OXP_NAME`.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("SDX_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the OESS password from the process environment and the file.
pub fn resolve_password(oess: &OessSection) -> Result<SecretString, ConfigError> {
    resolve_password_with(oess, |name| std::env::var(name).ok())
}

fn resolve_password_with(
    oess: &OessSection,
    env: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    // 1. Fixed env var
    if let Some(pw) = env(PASSWORD_ENV) {
        return Ok(SecretString::from(pw));
    }

    // 2. Named env var from the file
    if let Some(pw) = oess.password_env.as_deref().and_then(&env) {
        return Ok(SecretString::from(pw));
    }

    // 3. Plaintext in config
    oess.password
        .clone()
        .map(SecretString::from)
        .ok_or(ConfigError::NoCredentials)
}

// ── Translation to runtime config ───────────────────────────────────

fn tls_verification(oess: &OessSection) -> TlsVerification {
    match (oess.insecure, &oess.ca_cert) {
        (Some(true), _) => TlsVerification::DangerAcceptInvalid,
        (_, Some(ca)) => TlsVerification::CustomCa(ca.clone()),
        (Some(false), None) => TlsVerification::SystemDefaults,
        (None, None) => TlsVerification::DangerAcceptInvalid,
    }
}

fn parse_ids<T: Clone>(
    table: &str,
    entries: &BTreeMap<String, T>,
) -> Result<HashMap<u64, T>, ConfigError> {
    entries
        .iter()
        .map(|(key, value)| {
            key.trim()
                .parse::<u64>()
                .map(|id| (id, value.clone()))
                .map_err(|_| ConfigError::Validation {
                    field: format!("{table}.{key}"),
                    reason: "table keys must be numeric OESS ids".into(),
                })
        })
        .collect()
}

/// Build the runtime `GatewayConfig` from a loaded file.
pub fn to_gateway_config(config: &Config) -> Result<GatewayConfig, ConfigError> {
    build_gateway_config(config, |name| std::env::var(name).ok())
}

fn build_gateway_config(
    config: &Config,
    env: impl Fn(&str) -> Option<String>,
) -> Result<GatewayConfig, ConfigError> {
    let oxp_name = config
        .oxp_name
        .clone()
        .ok_or_else(|| ConfigError::missing("oxp_name"))?;
    let oxp_url = config
        .oxp_url
        .clone()
        .ok_or_else(|| ConfigError::missing("oxp_url"))?;

    let oess = &config.oess;
    let raw_url = oess.url.as_deref().ok_or_else(|| ConfigError::missing("oess.url"))?;
    let url: Url = raw_url.parse().map_err(|_| ConfigError::Validation {
        field: "oess.url".into(),
        reason: format!("invalid URL: {raw_url}"),
    })?;
    let workgroup_id = oess
        .workgroup_id
        .ok_or_else(|| ConfigError::missing("oess.workgroup_id"))?;
    let username = oess
        .username
        .clone()
        .ok_or_else(|| ConfigError::missing("oess.username"))?;
    let password = resolve_password_with(oess, env)?;

    if config.timeout == 0 {
        return Err(ConfigError::Validation {
            field: "timeout".into(),
            reason: "must be at least one second".into(),
        });
    }

    let backend = BackendConfig {
        url,
        workgroup_id,
        username,
        password,
        tls: tls_verification(oess),
    };

    let mut gateway = GatewayConfig::new(oxp_name, oxp_url, backend);
    gateway.model_version.clone_from(&config.model_version);
    gateway.timeout = Duration::from_secs(config.timeout);
    gateway.version_file.clone_from(&config.version_file);
    gateway.overrides = StaticOverrides {
        interfaces: parse_ids("interfaces", &config.interfaces)?,
        links: parse_ids("links", &config.links)?,
    };
    Ok(gateway)
}
