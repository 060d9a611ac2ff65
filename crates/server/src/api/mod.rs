//! HTTP endpoint modules.

mod ask;
pub mod doc;
mod health;

pub use ask::{ask, invoke};
pub use health::health;
