//! Wire models for DevPayr API responses.

pub mod models;
