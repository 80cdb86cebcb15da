//! Flight records: validated CRUD and filtered, paginated queries.
//!
//! Same layering as `auth`: domain types, the [`repository::FlightStore`]
//! port, and the [`service::FlightService`] that owns the rules.

pub mod domain;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::FlightService;
