//! Service layer for the flight records backend.
//! - `auth`: registration, credential verification and session tokens.
//! - `flight`: validated CRUD and filtered queries over flight records.
//! - Each module talks to storage only through its port trait; SeaORM-backed
//!   implementations live under the module's `repo` directory.

pub mod errors;
pub mod validation;
pub mod duration;
pub mod pagination;
pub mod auth;
pub mod flight;
#[cfg(test)]
pub mod test_support;
