// yikang-core: Site data access, auth gate, and admin workflows between yikang-api and the CLI.

pub mod admin;
pub mod auth;
pub mod backend;
pub mod banner;
pub mod config;
pub mod dashboard;
pub mod deploy;
pub mod error;
pub mod model;
pub mod route;
pub mod setup;
pub mod site;
pub mod upload;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use auth::{AuthClient, AuthEvent, AuthGate, AuthState, MemorySessionStore, SessionStore};
pub use backend::Backend;
pub use config::{ServiceConfig, TlsVerification};
pub use error::CoreError;
pub use route::{AdminRoute, AppMode};
pub use setup::{DatabaseSetup, SetupStatus};
pub use validate::{FieldError, FormErrors};

pub use model::{
    CaseStatus, Contact, ContactStatus, DemoRequest, DemoStatus, DeployLog, DeployStatus, News,
    NewsStatus, ProductCase, Record, RecordId, StatusKind,
};

pub use yikang_api::{AuthUser, Session};
