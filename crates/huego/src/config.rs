//! CLI-owned configuration: TOML profiles, credential resolution, and
//! translation to a `huego_api::Client`.
//!
//! The library never sees these types -- it receives a host, a key and a
//! `TransportConfig`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use huego_api::{Client, TlsMode, TransportConfig};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── TOML config structs ──────────────────────────────────────────────

/// CLI-owned TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name (used when --profile is not specified).
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named bridge profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// One bridge.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Bridge address (e.g. "192.168.1.20" or "https://bridge.local").
    pub bridge: Option<String>,

    /// Application key (plaintext -- prefer `app_key_env`).
    pub app_key: Option<String>,

    /// Environment variable name containing the application key.
    pub app_key_env: Option<String>,

    /// PEM file with the bridge root CA.
    pub ca_cert: Option<PathBuf>,

    pub insecure: Option<bool>,

    pub timeout: Option<u64>,
}

// ── Config file path ─────────────────────────────────────────────────

/// Resolve the config file path: `--config` / `HUE_CONFIG`, then the
/// platform config directory.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    if let Some(path) = &global.config {
        return path.clone();
    }
    ProjectDirs::from("com", "huego", "huego")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("huego");
            p.push("config.toml");
            p
        })
}

// ── Config loading ───────────────────────────────────────────────────

/// Load the full Config from defaults, the TOML file, and `HUE_` env vars
/// (`HUE_DEFAULTS__TIMEOUT=5` sets `defaults.timeout`).
pub fn load_config(path: &Path) -> Result<Config, CliError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("HUE_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Profile resolution ───────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Everything needed to build a `Client`, after flags, env and profile
/// have been merged.
#[derive(Debug)]
pub struct BridgeSettings {
    pub profile: String,
    pub bridge: String,
    pub app_key: Option<SecretString>,
    pub transport: TransportConfig,
}

impl BridgeSettings {
    /// Build the library client. Bridge-reported errors always fail a
    /// command, so the client checks every envelope.
    pub fn client(&self) -> Result<Client, CliError> {
        let key = self
            .app_key
            .as_ref()
            .ok_or_else(|| CliError::NoCredentials {
                profile: self.profile.clone(),
            })?;
        let mut client = Client::with_transport(&self.bridge, key.expose_secret(), &self.transport)?;
        client.set_check_errors(true);
        Ok(client)
    }
}

/// Merge flags (highest), the named profile, and global defaults.
///
/// A missing profile is only an error when it was explicitly requested;
/// otherwise flags and env vars alone may describe the bridge.
pub fn resolve(global: &GlobalOpts, config: &Config) -> Result<BridgeSettings, CliError> {
    let profile_name = active_profile_name(global, config);
    let empty = Profile::default();
    let profile = match config.profiles.get(&profile_name) {
        Some(p) => p,
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(config),
            });
        }
        None => &empty,
    };

    // 1. Bridge address (flag > env > profile)
    let bridge = global
        .bridge
        .clone()
        .or_else(|| profile.bridge.clone())
        .ok_or_else(|| CliError::NoBridge {
            profile: profile_name.clone(),
        })?;

    // 2. Application key (flag > profile env var > profile plaintext)
    let app_key = global
        .app_key
        .clone()
        .or_else(|| {
            profile
                .app_key_env
                .as_ref()
                .and_then(|var| std::env::var(var).ok())
        })
        .or_else(|| profile.app_key.clone())
        .filter(|k| !k.is_empty())
        .map(SecretString::from);

    // 3. Transport
    let insecure = global.insecure || profile.insecure.unwrap_or(config.defaults.insecure);
    let tls = match (&profile.ca_cert, insecure) {
        (_, true) => TlsMode::DangerAcceptInvalid,
        (Some(ca), false) => TlsMode::CustomCa(ca.clone()),
        (None, false) => TlsMode::System,
    };
    let timeout = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(config.defaults.timeout);

    let mut transport = if insecure {
        TransportConfig::insecure()
    } else {
        TransportConfig::default()
    };
    transport.tls = tls;
    transport.timeout = Some(Duration::from_secs(timeout));

    Ok(BridgeSettings {
        profile: profile_name,
        bridge,
        app_key,
        transport,
    })
}

pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}
