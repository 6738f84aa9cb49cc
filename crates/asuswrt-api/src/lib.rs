// asuswrt-api: Async Rust client for the ASUS router web-management API

pub mod auth;
pub mod client;
pub mod error;
pub mod extract;
pub mod hooks;
pub mod transport;

pub use auth::{Credentials, Session};
pub use client::AsusClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig, USER_AGENT};
