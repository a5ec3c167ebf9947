//! Storage and notification channels for price alerts.
//!
//! This crate provides:
//! - SQLite-backed storage of tracked items
//! - Telegram publishing of alert events
//! - A logging publisher for runs without notification credentials

pub mod config;
pub mod db;
pub mod publisher;
pub mod store;
pub mod telegram;

pub use config::TelegramConfig;
pub use db::{Database, DbError};
pub use publisher::{AlertPublisher, LogPublisher, PublishError};
pub use store::ItemStore;
pub use telegram::{format_alert_message, TelegramPublisher};
