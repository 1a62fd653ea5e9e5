//! Session-aware client for the admin platform Web API
//!
//! The client attaches the stored access credential to every outbound
//! request and transparently renews an expired session: concurrent requests
//! that hit a 401 are funneled into a single refresh exchange, then replayed
//! with the renewed credential.

pub mod client;
pub mod constants;
pub mod error;
pub mod models;
pub mod session;

pub use client::ApiClient;
pub use error::SessionError;
pub use models::{ApiResponse, TokenPair};
pub use session::RefreshCoordinator;
