//! Config subcommand handlers.

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Defaults, Profile, SecretKind};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking secrets.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "url = \"{}\"", p.url);
        if p.anon_key.is_some() {
            let _ = writeln!(out, "anon_key = \"****\"");
        }
        if let Some(ref env) = p.anon_key_env {
            let _ = writeln!(out, "anon_key_env = \"{env}\"");
        }
        if let Some(ref email) = p.email {
            let _ = writeln!(out, "email = \"{email}\"");
        }
        if p.password.is_some() {
            let _ = writeln!(out, "password = \"****\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out
}

/// Copy of the config with plaintext secrets masked, for structured output.
fn redacted(cfg: &Config) -> Config {
    let mask = |s: &Option<String>| s.as_ref().map(|_| "****".to_owned());
    Config {
        default_profile: cfg.default_profile.clone(),
        defaults: Defaults {
            output: cfg.defaults.output.clone(),
            color: cfg.defaults.color.clone(),
            insecure: cfg.defaults.insecure,
            timeout: cfg.defaults.timeout,
        },
        profiles: cfg
            .profiles
            .iter()
            .map(|(name, p)| {
                let profile = Profile {
                    url: p.url.clone(),
                    anon_key: mask(&p.anon_key),
                    anon_key_env: p.anon_key_env.clone(),
                    email: p.email.clone(),
                    password: mask(&p.password),
                    ca_cert: p.ca_cert.clone(),
                    insecure: p.insecure,
                    timeout: p.timeout,
                };
                (name.clone(), profile)
            })
            .collect(),
    }
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Offer to store a secret in the system keyring or return it for plaintext config.
///
/// Returns `Some(secret)` if the user chose plaintext, `None` if stored in keyring.
fn prompt_keyring_storage(
    secret: &str,
    profile_name: &str,
    kind: SecretKind,
    label: &str,
) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt(format!("Where to store the {label}?"))
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        config::store_secret(profile_name, kind, secret)?;
        eprintln!("   ✓ {label} stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(secret.to_owned()))
    }
}

fn parse_flag<T: std::str::FromStr>(field: &str, value: &str, hint: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: hint.into(),
    })
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("✨ yikang configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let url: String = Input::new()
                .with_prompt("Project URL")
                .validate_with(|raw: &String| {
                    yikang_config::parse_url(raw)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_err)?;

            let key = rpassword::prompt_password("Anon key: ").map_err(prompt_err)?;
            if key.trim().is_empty() {
                return Err(CliError::Validation {
                    field: "anon_key".into(),
                    reason: "anon key cannot be empty".into(),
                });
            }
            let anon_key =
                prompt_keyring_storage(key.trim(), &profile_name, SecretKind::AnonKey, "anon key")?;

            let email: String = Input::new()
                .with_prompt("Admin email (empty to skip)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;
            let email = Some(email.trim().to_owned()).filter(|e| !e.is_empty());

            let password = if email.is_some() {
                let pass = rpassword::prompt_password("Admin password (empty to skip): ")
                    .map_err(prompt_err)?;
                if pass.is_empty() {
                    None
                } else {
                    prompt_keyring_storage(&pass, &profile_name, SecretKind::Password, "password")?
                }
            } else {
                None
            };

            let profile = Profile {
                url,
                anon_key,
                email,
                password,
                ..Profile::default()
            };

            // Merge into an existing file rather than replace it.
            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());

            config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: yikang site news");

            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(&global.output, &cfg, format_config_redacted, |_| {
                "config".into()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);

            let profile = cfg.profiles.entry(profile_name.clone()).or_default();

            match key.as_str() {
                "url" => {
                    yikang_config::parse_url(&value)?;
                    profile.url = value;
                }
                "anon_key" | "anon-key" => profile.anon_key = Some(value),
                "anon_key_env" | "anon-key-env" => profile.anon_key_env = Some(value),
                "email" => profile.email = Some(value),
                "insecure" => {
                    profile.insecure =
                        Some(parse_flag("insecure", &value, "must be 'true' or 'false'")?);
                }
                "timeout" => {
                    profile.timeout =
                        Some(parse_flag("timeout", &value, "must be a number (seconds)")?);
                }
                "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
                other => {
                    return Err(CliError::Validation {
                        field: other.into(),
                        reason: format!(
                            "unknown config key '{other}'. Valid keys: url, anon_key, \
                             anon_key_env, email, insecure, timeout, ca_cert"
                        ),
                    });
                }
            }

            config::save_config(&cfg)?;
            output::success(
                &format!("Set {key} on profile '{profile_name}'"),
                false,
                global.quiet,
            );
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: yikang config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
                let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
                available.sort();
                return Err(CliError::ProfileNotFound {
                    name,
                    available: if available.is_empty() {
                        "(none)".into()
                    } else {
                        available.join(", ")
                    },
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            output::success(
                &format!("Default profile set to '{name}'"),
                false,
                global.quiet,
            );
            Ok(())
        }

        // ── SetPassword ─────────────────────────────────────────────
        ConfigCommand::SetPassword { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));

            if !cfg.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound {
                    name: profile_name,
                    available: cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", "),
                });
            }

            let pass = rpassword::prompt_password(format!("Admin password for '{profile_name}': "))
                .map_err(prompt_err)?;
            if pass.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "password cannot be empty".into(),
                });
            }

            config::store_secret(&profile_name, SecretKind::Password, &pass)?;
            output::success(
                &format!("Password for '{profile_name}' stored in system keyring"),
                false,
                global.quiet,
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redaction_masks_secrets_only() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "prod".into(),
            Profile {
                url: "https://abcd.supabase.co".into(),
                anon_key: Some("eyJhbGciOi".into()),
                email: Some("admin@yikang.example".into()),
                password: Some("hunter2".into()),
                ..Profile::default()
            },
        );

        let text = format_config_redacted(&cfg);
        assert!(text.contains("[profiles.prod]"));
        assert!(text.contains("admin@yikang.example"));
        assert!(!text.contains("hunter2"));
        assert!(!text.contains("eyJhbGciOi"));

        let masked = redacted(&cfg);
        let prod = &masked.profiles["prod"];
        assert_eq!(prod.password.as_deref(), Some("****"));
        assert_eq!(prod.anon_key.as_deref(), Some("****"));
        assert_eq!(prod.url, "https://abcd.supabase.co");
    }

    #[test]
    fn flag_values_parse_or_explain() {
        assert_eq!(parse_flag::<u64>("timeout", "15", "").ok(), Some(15));
        let err = parse_flag::<bool>("insecure", "maybe", "must be 'true' or 'false'")
            .err()
            .map(|e| e.to_string());
        assert_eq!(
            err.as_deref(),
            Some("Invalid value for insecure: must be 'true' or 'false'")
        );
    }
}
