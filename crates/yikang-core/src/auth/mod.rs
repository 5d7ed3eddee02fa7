// ── Authentication ──
//
// `AuthClient` performs sign-in/out/refresh and broadcasts `AuthEvent`s.
// `AuthGate` is the observable context object built on top of it:
// init -> subscribe -> teardown, with state published on a watch channel.

mod client;
mod gate;
mod store;

pub use client::{AuthClient, AuthEvent};
pub use gate::{AuthGate, AuthState};
pub use store::{MemorySessionStore, SessionStore};
