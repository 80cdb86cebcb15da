//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, credential verification and session-token issuance live
//! here; persistence is reached only through [`repository::UserStore`].

pub mod domain;
pub mod errors;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;
pub mod repo;

pub use service::{AuthConfig, AuthService};
