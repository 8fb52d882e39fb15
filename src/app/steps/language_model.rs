use crate::app::steps::context_keys;
use crate::core::step_sequence::{SetupStep, StepContext, StepOutcome};
use crate::domain::model::CommandSpec;
use crate::domain::ports::ProcessRunner;
use crate::utils::error::{Result, SetupError};
use std::path::PathBuf;
use std::sync::Arc;

/// Downloads the spaCy NLP model into the virtual environment. spaCy skips
/// the network fetch on its own when the model package is already installed,
/// so the step re-runs unconditionally.
pub struct DownloadLanguageModel {
    runner: Arc<dyn ProcessRunner>,
    root: PathBuf,
    model: String,
}

impl DownloadLanguageModel {
    pub fn new(runner: Arc<dyn ProcessRunner>, root: PathBuf, model: impl Into<String>) -> Self {
        Self {
            runner,
            root,
            model: model.into(),
        }
    }
}

#[async_trait::async_trait]
impl SetupStep for DownloadLanguageModel {
    async fn execute(&self, context: &StepContext) -> Result<StepOutcome> {
        let python = context
            .shared_str(context_keys::VENV_PYTHON)
            .ok_or_else(|| SetupError::StepError {
                step: self.name().to_string(),
                details: "virtual environment interpreter path missing from context".to_string(),
            })?;

        tracing::info!("🧠 Downloading language model {}...", self.model);
        let spec = CommandSpec::new(python, &self.root)
            .args(["-m", "spacy", "download"])
            .arg(&self.model);
        tracing::debug!("Running: {}", spec.display_line());

        let output = self.runner.run(&spec).await?;
        if !output.success() {
            return Err(SetupError::ToolFailed {
                tool: "spacy download".to_string(),
                status: output.status,
                stderr: output.stderr,
            });
        }

        Ok(StepOutcome::with_detail(format!("language model {} ready", self.model))
            .meta("model", serde_json::json!(self.model)))
    }

    fn name(&self) -> &str {
        "language-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::RecordingRunner;

    #[tokio::test]
    async fn test_downloads_configured_model() {
        let runner = Arc::new(RecordingRunner::new());
        let step =
            DownloadLanguageModel::new(runner.clone(), PathBuf::from("."), "en_core_web_sm");
        let mut context = StepContext::new("test".to_string());
        context.add_shared_data(context_keys::VENV_PYTHON, serde_json::json!("venv/bin/python"));

        let outcome = step.execute(&context).await.unwrap();

        assert_eq!(
            runner.command_lines(),
            vec!["venv/bin/python -m spacy download en_core_web_sm"]
        );
        assert_eq!(outcome.detail, "language model en_core_web_sm ready");
    }
}
