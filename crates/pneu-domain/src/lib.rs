//! Domain layer for tire verification
//!
//! Models, the verification engine, the alert emitter, and the repository
//! traits that persistence adapters implement.

pub mod model;
pub mod repository;
pub mod service;
