//! # Front-End State
//!
//! - [`config`] - `AppConfig`, loaded once at startup and read-only afterwards

pub mod config;

pub use config::AppConfig;
