//! Console configuration
//!
//! Read from `mcpdeck.toml` in the user's config directory. Every section
//! is optional; a missing file means all defaults.

pub mod parser;
pub mod schema;
pub mod store;

pub use parser::{parse_config_toml, parse_config_toml_str, to_toml};
pub use schema::{ConsoleConfig, ConsoleSection};
pub use store::ConfigStore;
