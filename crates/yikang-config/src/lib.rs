//! Shared configuration for yikang tools.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! on-disk session persistence, and translation to
//! `yikang_core::ServiceConfig`. The CLI adds `GlobalOpts`-aware
//! wrappers on top.

mod session;

use std::collections::HashMap;
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

use yikang_core::{CoreError, ServiceConfig, TlsVerification};

pub use session::FileSessionStore;

/// Service name under which secrets live in the system keyring.
pub const KEYRING_SERVICE: &str = "yikang";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("session file is not valid JSON: {0}")]
    Session(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl From<ConfigError> for CoreError {
    fn from(err: ConfigError) -> Self {
        CoreError::Config {
            message: err.to_string(),
        }
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named backend project.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Project URL (e.g., "https://abcd.supabase.co").
    #[serde(default)]
    pub url: String,

    /// Public anon key (plaintext; it ships in every browser bundle anyway).
    pub anon_key: Option<String>,

    /// Environment variable name containing the anon key.
    pub anon_key_env: Option<String>,

    /// Admin sign-in email.
    pub email: Option<String>,

    /// Admin password (plaintext, prefer keyring).
    pub password: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "yikang", "yikang")
}

fn dirs_fallback(kind: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(kind);
    p.push("yikang");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory holding per-profile session files.
pub fn data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

/// `session-<profile>.json` in the data directory.
pub fn session_path(profile_name: &str) -> PathBuf {
    data_dir().join(format!("session-{profile_name}.json"))
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. Defaults, then the file, then `YIKANG_*`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("YIKANG_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Keyring ─────────────────────────────────────────────────────────

/// Which secret of a profile a keyring entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKind {
    AnonKey,
    Password,
}

impl SecretKind {
    /// Keyring account name, e.g. `prod/password`.
    pub fn account(self, profile_name: &str) -> String {
        let suffix = match self {
            Self::AnonKey => "anon-key",
            Self::Password => "password",
        };
        format!("{profile_name}/{suffix}")
    }
}

fn keyring_secret(profile_name: &str, kind: SecretKind) -> Option<SecretString> {
    keyring::Entry::new(KEYRING_SERVICE, &kind.account(profile_name))
        .and_then(|entry| entry.get_password())
        .ok()
        .map(SecretString::from)
}

/// Store a secret in the system keyring.
pub fn store_secret(profile_name: &str, kind: SecretKind, secret: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &kind.account(profile_name))?;
    entry.set_password(secret)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve the anon key: `anon_key_env` → keyring → plaintext.
pub fn resolve_anon_key(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    if let Some(val) = profile
        .anon_key_env
        .as_deref()
        .and_then(|name| std::env::var(name).ok())
    {
        return Ok(SecretString::from(val));
    }

    if let Some(secret) = keyring_secret(profile_name, SecretKind::AnonKey) {
        return Ok(secret);
    }

    if let Some(ref key) = profile.anon_key {
        return Ok(SecretString::from(key.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Resolve admin sign-in credentials: email from the profile or
/// `YIKANG_EMAIL`; password from `YIKANG_PASSWORD` → keyring → plaintext.
pub fn resolve_sign_in(
    profile: &Profile,
    profile_name: &str,
) -> Result<(String, SecretString), ConfigError> {
    let email = profile
        .email
        .clone()
        .or_else(|| std::env::var("YIKANG_EMAIL").ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;

    if let Ok(pw) = std::env::var("YIKANG_PASSWORD") {
        return Ok((email, SecretString::from(pw)));
    }

    if let Some(pw) = keyring_secret(profile_name, SecretKind::Password) {
        return Ok((email, pw));
    }

    if let Some(ref pw) = profile.password {
        return Ok((email, SecretString::from(pw.clone())));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// TLS strategy for a profile.
pub fn profile_tls(profile: &Profile, force_insecure: bool) -> TlsVerification {
    if force_insecure || profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    }
}

/// Parse a project URL, reporting the offending value on failure.
pub fn parse_url(raw: &str) -> Result<url::Url, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {raw}"),
    })
}

/// Build a `ServiceConfig` from a profile with no CLI flag overrides.
pub fn profile_to_service_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<ServiceConfig, ConfigError> {
    let url = parse_url(&profile.url)?;
    let anon_key = resolve_anon_key(profile, profile_name)?;

    let mut config = ServiceConfig::new(url, anon_key);
    config.tls = profile_tls(profile, false);
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or_else(default_timeout));
    Ok(config)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn loads_profiles_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "prod"

[defaults]
output = "json"

[profiles.prod]
url = "https://abcd.supabase.co"
anon_key = "anon-plain"
email = "admin@example.com"
timeout = 10
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("prod"));
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.timeout, 30);

        let prod = &cfg.profiles["prod"];
        assert_eq!(prod.email.as_deref(), Some("admin@example.com"));

        let service = profile_to_service_config(prod, "yikang-test-prod").unwrap();
        assert_eq!(service.url.as_str(), "https://abcd.supabase.co/");
        assert_eq!(service.timeout, Duration::from_secs(10));
        assert_eq!(service.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "staging".into(),
            Profile {
                url: "https://staging.example.com".into(),
                insecure: Some(true),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let staging = &loaded.profiles["staging"];
        assert_eq!(staging.url, "https://staging.example.com");
        assert_eq!(
            profile_tls(staging, false),
            TlsVerification::DangerAcceptInvalid
        );
    }

    #[test]
    fn anon_key_env_wins_over_plaintext() {
        // Cargo sets this for every test binary it runs.
        let profile = Profile {
            url: "https://x.example.com".into(),
            anon_key: Some("from-file".into()),
            anon_key_env: Some("CARGO_PKG_NAME".into()),
            ..Profile::default()
        };
        let key = resolve_anon_key(&profile, "yikang-test-env").unwrap();
        assert_eq!(key.expose_secret(), "yikang-config");
    }

    #[test]
    fn missing_credentials_and_bad_url() {
        let profile = Profile {
            url: "not a url".into(),
            ..Profile::default()
        };
        assert!(matches!(
            profile_to_service_config(&profile, "yikang-test-none"),
            Err(ConfigError::Validation { .. })
        ));

        let profile = Profile {
            url: "https://x.example.com".into(),
            ..Profile::default()
        };
        assert!(matches!(
            resolve_anon_key(&profile, "yikang-test-none"),
            Err(ConfigError::NoCredentials { .. })
        ));
    }

    #[test]
    fn keyring_accounts_are_per_profile() {
        assert_eq!(SecretKind::AnonKey.account("prod"), "prod/anon-key");
        assert_eq!(SecretKind::Password.account("prod"), "prod/password");
    }
}
