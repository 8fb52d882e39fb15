use crate::app::steps::context_keys;
use crate::core::step_sequence::{SetupStep, StepContext, StepOutcome};
use crate::domain::model::CommandSpec;
use crate::domain::ports::ProcessRunner;
use crate::utils::error::{Result, SetupError};
use std::path::PathBuf;
use std::sync::Arc;

pub const DEFAULT_INIT_HOOK: &str = "init_database.py";

/// Initializes the backend database through the application's own hook
/// script. The hook is opaque to the setup tool: it is invoked on every run
/// and its exit status is trusted, nothing more.
pub struct InitializeDatabase {
    runner: Arc<dyn ProcessRunner>,
    root: PathBuf,
    hook: String,
}

impl InitializeDatabase {
    pub fn new(runner: Arc<dyn ProcessRunner>, root: PathBuf, hook: impl Into<String>) -> Self {
        Self {
            runner,
            root,
            hook: hook.into(),
        }
    }
}

#[async_trait::async_trait]
impl SetupStep for InitializeDatabase {
    async fn execute(&self, context: &StepContext) -> Result<StepOutcome> {
        let python = context
            .shared_str(context_keys::VENV_PYTHON)
            .ok_or_else(|| SetupError::StepError {
                step: self.name().to_string(),
                details: "virtual environment interpreter path missing from context".to_string(),
            })?;

        tracing::info!("🗄️ Initializing database via {}...", self.hook);
        let spec = CommandSpec::new(python, &self.root).arg(&self.hook);

        let output = self.runner.run(&spec).await?;
        if !output.success() {
            return Err(SetupError::ToolFailed {
                tool: self.hook.clone(),
                status: output.status,
                stderr: output.stderr,
            });
        }

        Ok(StepOutcome::with_detail("database initialized")
            .meta("hook", serde_json::json!(self.hook)))
    }

    fn name(&self) -> &str {
        "database"
    }
}
