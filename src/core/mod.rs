pub mod engine;
pub mod step_sequence;

pub use crate::domain::model::{CommandSpec, Platform, ToolOutput, VenvPaths};
pub use crate::domain::ports::{
    ConfigProvider, HealthProbe, ProcessRunner, ServerLauncher, ServerProcess,
};
pub use crate::utils::error::Result;
