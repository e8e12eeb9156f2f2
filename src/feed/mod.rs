//! Simulated market-data feed
//!
//! Produces a bounded random-walk price sequence for a single symbol.

mod types;
mod walk;

pub use types::{Tick, TIMESTAMP_FORMAT};
pub use walk::{round_price, RandomWalk, Walk};
