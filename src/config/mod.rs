//! Configuration for the treasury dashboard
//!
//! - data directory resolution
//! - user settings persistence

pub mod paths;
pub mod settings;

pub use paths::TreasuryPaths;
pub use settings::Settings;
