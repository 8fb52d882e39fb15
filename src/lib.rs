pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::probe::HttpHealthProbe;
pub use adapters::process::TokioProcessRunner;
pub use crate::core::engine::{SetupEngine, SetupOutcome};
pub use utils::error::{Result, SetupError};
