use crate::app::steps::context_keys;
use crate::core::step_sequence::{SetupStep, StepContext, StepOutcome};
use crate::domain::model::CommandSpec;
use crate::domain::ports::ProcessRunner;
use crate::utils::error::{Result, SetupError};
use std::path::PathBuf;
use std::sync::Arc;

/// Upgrades pip inside the virtual environment and installs the pinned
/// dependency set from the manifest. Re-runs unconditionally; pip itself is
/// idempotent over an already-satisfied manifest.
pub struct InstallDependencies {
    runner: Arc<dyn ProcessRunner>,
    root: PathBuf,
    requirements: String,
}

impl InstallDependencies {
    pub fn new(runner: Arc<dyn ProcessRunner>, root: PathBuf, requirements: impl Into<String>) -> Self {
        Self {
            runner,
            root,
            requirements: requirements.into(),
        }
    }

    fn venv_pip(&self, context: &StepContext) -> Result<String> {
        context
            .shared_str(context_keys::VENV_PIP)
            .map(str::to_string)
            .ok_or_else(|| SetupError::StepError {
                step: self.name().to_string(),
                details: "virtual environment pip path missing from context".to_string(),
            })
    }

    async fn run_pip(&self, pip: &str, args: &[&str]) -> Result<()> {
        let spec = CommandSpec::new(pip, &self.root).args(args.iter().copied());
        tracing::debug!("Running: {}", spec.display_line());

        let output = self.runner.run(&spec).await?;
        if !output.success() {
            return Err(SetupError::ToolFailed {
                tool: "pip".to_string(),
                status: output.status,
                stderr: output.stderr,
            });
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl SetupStep for InstallDependencies {
    async fn execute(&self, context: &StepContext) -> Result<StepOutcome> {
        let manifest = self.root.join(&self.requirements);
        if !manifest.exists() {
            return Err(SetupError::ManifestNotFound {
                path: manifest.display().to_string(),
            });
        }

        let pip = self.venv_pip(context)?;

        tracing::info!("📦 Upgrading pip...");
        self.run_pip(&pip, &["install", "--upgrade", "pip"]).await?;

        tracing::info!("📦 Installing dependencies from {}...", self.requirements);
        self.run_pip(&pip, &["install", "-r", self.requirements.as_str()])
            .await?;

        Ok(
            StepOutcome::with_detail(format!("dependencies installed from {}", self.requirements))
                .meta("manifest", serde_json::json!(self.requirements)),
        )
    }

    fn name(&self) -> &str {
        "dependencies"
    }
}
