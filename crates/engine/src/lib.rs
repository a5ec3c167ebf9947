//! Price check orchestration.
//!
//! Lists tracked items, quotes each one, publishes an alert on a threshold
//! breach and stores the observed price. Items are processed one at a time
//! and each yields its own `ItemOutcome`, so a failure stays with its item.

pub mod checker;
pub mod outcome;

pub use checker::*;
pub use outcome::*;
