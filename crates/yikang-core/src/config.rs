// ── Runtime service configuration ──
//
// These types describe how to reach the hosted backend. They carry the
// project URL, the public anon key, and transport tuning, but never
// touch disk. The CLI builds a `ServiceConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;
use yikang_api::{ServiceClient, TlsMode, TransportConfig};

use crate::error::CoreError;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict). Hosted projects always have valid certs.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-hosted backend behind a self-signed proxy).
    DangerAcceptInvalid,
}

/// Configuration for one backend project.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Project URL (e.g., `https://abcd.supabase.co`).
    pub url: Url,
    /// Public anon key sent as `apikey` on every request.
    pub anon_key: SecretString,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ServiceConfig {
    pub fn new(url: Url, anon_key: SecretString) -> Self {
        Self {
            url,
            anon_key,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }

    /// Build the HTTP client for this project.
    pub fn build_client(&self) -> Result<ServiceClient, CoreError> {
        Ok(ServiceClient::new(
            self.url.as_str(),
            &self.anon_key,
            &self.transport(),
        )?)
    }
}
