//! Configuration for the boxel toolchain.
//!
//! Settings persist to disk as a RON file, accept CLI overrides via clap, and
//! stay forward/backward compatible through `#[serde(default)]`.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, RigConfig, default_config_dir};
pub use error::ConfigError;
