use crate::core::step_sequence::{SetupStep, StepContext, StepOutcome};
use crate::domain::model::CommandSpec;
use crate::domain::ports::ProcessRunner;
use crate::utils::error::{Result, SetupError};
use std::path::PathBuf;
use std::sync::Arc;

/// Reports the system interpreter version before anything else touches the
/// environment. A missing interpreter fails the whole run here rather than
/// three steps later inside pip.
pub struct InterpreterCheck {
    runner: Arc<dyn ProcessRunner>,
    python: String,
    root: PathBuf,
}

impl InterpreterCheck {
    pub fn new(runner: Arc<dyn ProcessRunner>, python: impl Into<String>, root: PathBuf) -> Self {
        Self {
            runner,
            python: python.into(),
            root,
        }
    }
}

#[async_trait::async_trait]
impl SetupStep for InterpreterCheck {
    async fn execute(&self, _context: &StepContext) -> Result<StepOutcome> {
        let spec = CommandSpec::new(&self.python, &self.root).arg("--version");
        tracing::debug!("Querying interpreter: {}", spec.display_line());

        let output = self.runner.run(&spec).await?;
        if !output.success() {
            return Err(SetupError::ToolFailed {
                tool: self.python.clone(),
                status: output.status,
                stderr: output.stderr,
            });
        }

        let version = output.first_line().to_string();
        tracing::info!("🐍 {}", version);

        Ok(StepOutcome::with_detail(version.clone())
            .meta("version", serde_json::json!(version)))
    }

    fn name(&self) -> &str {
        "interpreter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::RecordingRunner;
    use crate::domain::model::ToolOutput;

    fn context() -> StepContext {
        StepContext::new("test".to_string())
    }

    #[tokio::test]
    async fn test_reports_interpreter_version() {
        let runner = Arc::new(RecordingRunner::new().respond_when(
            "--version",
            ToolOutput {
                status: 0,
                stdout: "Python 3.11.9\n".to_string(),
                stderr: String::new(),
            },
        ));
        let step = InterpreterCheck::new(runner.clone(), "python3", PathBuf::from("."));

        let outcome = step.execute(&context()).await.unwrap();

        assert_eq!(outcome.detail, "Python 3.11.9");
        assert_eq!(runner.command_lines(), vec!["python3 --version"]);
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_tool_failure() {
        let runner = Arc::new(RecordingRunner::new().fail_when("--version"));
        let step = InterpreterCheck::new(runner, "python3", PathBuf::from("."));

        let result = step.execute(&context()).await;

        assert!(matches!(
            result,
            Err(SetupError::ToolFailed { ref tool, .. }) if tool == "python3"
        ));
    }
}
