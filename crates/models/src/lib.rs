//! SeaORM entity definitions and connection helpers for the relational store.

pub mod db;
pub mod flight;
pub mod user;
