//! Core data types for the price watcher.

pub mod alert;
pub mod item;
pub mod price;

pub use alert::*;
pub use item::*;
pub use price::*;
