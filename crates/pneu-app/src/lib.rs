//! Application service layer - capture, verification, registration, alerts, config

pub mod app;
pub mod config;
pub mod locks;
pub mod repository;
pub mod scanner;
