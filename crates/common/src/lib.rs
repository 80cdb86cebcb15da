//! Pieces shared by the server crate and the binary: logging setup and
//! small wire types that do not belong to any domain module.

pub mod types;
pub mod utils;
