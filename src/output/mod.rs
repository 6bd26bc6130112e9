//! Output side channels
//!
//! The durable artifacts of a crawl are the saved files themselves; this
//! module only adds the optional per-session statistics record.

mod stats;

pub use stats::{SessionStats, StoryStat};
