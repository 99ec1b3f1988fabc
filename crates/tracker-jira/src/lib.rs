mod config;
mod error;
mod tracker;
mod wire;

pub use config::JiraConfig;
pub use tracker::JiraTracker;
