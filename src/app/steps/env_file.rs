use crate::core::step_sequence::{SetupStep, StepContext, StepOutcome};
use crate::utils::error::{Result, SetupError};
use std::fs;
use std::path::PathBuf;

/// Seeds the local configuration file from its template. Guarded by target
/// existence: once `.env` exists it is never overwritten, even when the
/// template has changed since.
pub struct SeedEnvFile {
    root: PathBuf,
    template: String,
    target: String,
}

impl SeedEnvFile {
    pub fn new(root: PathBuf, template: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            root,
            template: template.into(),
            target: target.into(),
        }
    }

    fn target_path(&self) -> PathBuf {
        self.root.join(&self.target)
    }
}

#[async_trait::async_trait]
impl SetupStep for SeedEnvFile {
    async fn execute(&self, _context: &StepContext) -> Result<StepOutcome> {
        let template = self.root.join(&self.template);
        if !template.exists() {
            return Err(SetupError::TemplateNotFound {
                path: template.display().to_string(),
            });
        }

        let bytes = fs::copy(&template, self.target_path())?;
        tracing::info!("⚙️ Seeded {} from {}", self.target, self.template);

        Ok(
            StepOutcome::with_detail(format!("{} seeded from {}", self.target, self.template))
                .meta("bytes", serde_json::json!(bytes)),
        )
    }

    fn name(&self) -> &str {
        "env-file"
    }

    fn should_run(&self, _context: &StepContext) -> bool {
        !self.target_path().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn context() -> StepContext {
        StepContext::new("test".to_string())
    }

    #[tokio::test]
    async fn test_seeds_config_from_template() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".env.example"), "SECRET_KEY=change-me\n").unwrap();
        let step = SeedEnvFile::new(dir.path().to_path_buf(), ".env.example", ".env");

        assert!(step.should_run(&context()));
        step.execute(&context()).await.unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join(".env")).unwrap(),
            "SECRET_KEY=change-me\n"
        );
    }

    #[tokio::test]
    async fn test_existing_config_is_never_overwritten() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".env.example"), "SECRET_KEY=template\n").unwrap();
        fs::write(dir.path().join(".env"), "SECRET_KEY=mine\n").unwrap();
        let step = SeedEnvFile::new(dir.path().to_path_buf(), ".env.example", ".env");

        assert!(!step.should_run(&context()));
        assert_eq!(
            fs::read_to_string(dir.path().join(".env")).unwrap(),
            "SECRET_KEY=mine\n"
        );
    }

    #[tokio::test]
    async fn test_missing_template_is_an_error() {
        let dir = TempDir::new().unwrap();
        let step = SeedEnvFile::new(dir.path().to_path_buf(), ".env.example", ".env");

        let result = step.execute(&context()).await;

        assert!(matches!(result, Err(SetupError::TemplateNotFound { .. })));
    }
}
