//! Reverse Proxy Configuration
//!
//! Turns `name=value` option assignments, from a configuration file or the command line,
//! into the single validated [`Config`] the rest of the proxy starts from.

pub mod cli;
pub mod config;
pub mod error;
pub mod hostport;
pub mod identity;
pub mod loader;
pub mod logging;
pub mod options;

// Re-export commonly used types and functions
pub use cli::{Arguments, resolve_config};
pub use config::{Config, SharedConfig, Timeouts, set_config_str};
pub use error::ConfigError;
pub use hostport::{HostPort, MAX_HOSTNAME_LEN, split_host_port};
pub use identity::{Account, AccountLookup, SystemAccounts};
pub use loader::{load_config, load_config_with, load_from_reader};
pub use logging::LogHandle;
pub use options::{ConfigOption, lookup, parse_config, parse_config_with};
