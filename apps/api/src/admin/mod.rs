//! Admin review of stored submissions: session login against the configured account, the
//! submission list and per-submission detail with file links.

pub mod handlers;
pub mod service;

pub use service::{AdminCredentials, AdminService, AuthError, ReadError};
