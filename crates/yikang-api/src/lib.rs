// yikang-api: Async Rust client for the hosted backend (tables + auth + functions)

pub mod auth;
pub mod client;
pub mod error;
pub mod functions;
pub mod tables;
pub mod transport;

pub use auth::{AuthUser, Session};
pub use client::ServiceClient;
pub use error::Error;
pub use tables::{Order, Query};
pub use transport::{TlsMode, TransportConfig};
