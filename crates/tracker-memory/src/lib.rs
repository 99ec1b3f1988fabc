mod store;
mod tracker;

pub use store::TrackerCall;
pub use tracker::{MemoryTracker, MemoryTrackerConfig};
