//! Shared types, errors, and configuration for Kassa.
//!
//! This crate provides common pieces used across all other crates:
//! - Application-wide error types
//! - Configuration management
//! - Telegram Mini App init-data verification (the only identity input
//!   this service accepts; identity issuance itself is external)

pub mod config;
pub mod error;
pub mod initdata;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use initdata::{InitDataError, TelegramUser};

#[cfg(test)]
mod initdata_tests;
