use crate::core::step_sequence::{SetupStep, StepContext, StepOutcome};
use crate::domain::model::CommandSpec;
use crate::domain::ports::ProcessRunner;
use crate::utils::error::{Result, SetupError};
use std::path::PathBuf;
use std::sync::Arc;

/// Creates the Python virtual environment. Guarded by directory existence:
/// a present venv is never touched, matching the original bootstrap.
pub struct CreateVirtualenv {
    runner: Arc<dyn ProcessRunner>,
    python: String,
    root: PathBuf,
    venv_dir: String,
}

impl CreateVirtualenv {
    pub fn new(
        runner: Arc<dyn ProcessRunner>,
        python: impl Into<String>,
        root: PathBuf,
        venv_dir: impl Into<String>,
    ) -> Self {
        Self {
            runner,
            python: python.into(),
            root,
            venv_dir: venv_dir.into(),
        }
    }

    fn venv_path(&self) -> PathBuf {
        self.root.join(&self.venv_dir)
    }
}

#[async_trait::async_trait]
impl SetupStep for CreateVirtualenv {
    async fn execute(&self, _context: &StepContext) -> Result<StepOutcome> {
        let spec = CommandSpec::new(&self.python, &self.root)
            .arg("-m")
            .arg("venv")
            .arg(&self.venv_dir);
        tracing::debug!("Creating virtual environment: {}", spec.display_line());

        let output = self.runner.run(&spec).await?;
        if !output.success() {
            return Err(SetupError::ToolFailed {
                tool: format!("{} -m venv", self.python),
                status: output.status,
                stderr: output.stderr,
            });
        }

        let path = self.venv_path();
        Ok(
            StepOutcome::with_detail(format!("virtual environment created at {}", path.display()))
                .meta("path", serde_json::json!(path.to_string_lossy())),
        )
    }

    fn name(&self) -> &str {
        "virtualenv"
    }

    fn should_run(&self, _context: &StepContext) -> bool {
        !self.venv_path().exists()
    }
}
