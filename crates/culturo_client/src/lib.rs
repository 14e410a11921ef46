//! The frontend-facing service client: one HTTP egress point with bearer
//! token handling, failure normalization, and the auth-context state
//! machine.

pub mod auth;
pub mod client;
pub mod failure;

pub use auth::{AuthContext, AuthPhase, InMemoryTokenStore, TokenStore};
pub use client::{ApiClient, ClientError};
pub use failure::{normalize_failure, ApiFailure};
