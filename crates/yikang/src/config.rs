//! CLI configuration: a thin layer over `yikang_config`.
//!
//! Adds resolution that respects `GlobalOpts` overrides (`--url`,
//! `--anon-key`, `--insecure`, `--timeout`) on top of the shared profile
//! handling.

use std::time::Duration;

use secrecy::SecretString;

use yikang_core::{ServiceConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use yikang_config::{
    Config, Defaults, Profile, SecretKind, config_path, load_config_or_default, save_config,
    store_secret,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Everything needed to talk to one backend project.
pub struct Resolved {
    pub profile_name: String,
    pub profile: Option<Profile>,
    pub service: ServiceConfig,
}

/// Build a `ServiceConfig` from config file, profile, and flag overrides.
///
/// Flags win over the profile. Without a matching profile, `--url` and
/// `--anon-key` (or their env vars) must both be present.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let mut cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);
    let profile = cfg.profiles.remove(&profile_name);

    let service = match profile.as_ref() {
        Some(profile) => from_profile(profile, &profile_name, global)?,
        None => from_flags(&profile_name, global)?,
    };

    Ok(Resolved {
        profile_name,
        profile,
        service,
    })
}

fn from_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<ServiceConfig, CliError> {
    let url = yikang_config::parse_url(global.url.as_deref().unwrap_or(&profile.url))?;
    let anon_key = match global.anon_key {
        Some(ref key) => SecretString::from(key.clone()),
        None => yikang_config::resolve_anon_key(profile, profile_name)?,
    };

    let mut service = ServiceConfig::new(url, anon_key);
    service.tls = yikang_config::profile_tls(profile, global.insecure);
    service.timeout = Duration::from_secs(global.timeout);
    Ok(service)
}

fn from_flags(profile_name: &str, global: &GlobalOpts) -> Result<ServiceConfig, CliError> {
    let raw_url = global.url.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;
    let url = yikang_config::parse_url(raw_url)?;
    let anon_key = global
        .anon_key
        .clone()
        .map(SecretString::from)
        .ok_or_else(|| CliError::NoCredentials {
            profile: profile_name.into(),
        })?;

    let mut service = ServiceConfig::new(url, anon_key);
    if global.insecure {
        service.tls = TlsVerification::DangerAcceptInvalid;
    }
    service.timeout = Duration::from_secs(global.timeout);
    Ok(service)
}
