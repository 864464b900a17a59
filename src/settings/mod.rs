// Settings domain: capture configuration and its JSON file.

pub mod error;
pub mod store;
pub mod types;
