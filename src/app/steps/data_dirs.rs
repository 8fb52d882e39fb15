use crate::core::step_sequence::{SetupStep, StepContext, StepOutcome};
use crate::utils::error::Result;
use std::fs;
use std::path::PathBuf;

/// Creates the on-disk data directories (uploads, vector store, medical
/// knowledge corpus). `create_dir_all` makes this a no-op for directories
/// that already exist; previously populated content is left untouched.
pub struct CreateDataDirs {
    root: PathBuf,
    dirs: Vec<String>,
}

impl CreateDataDirs {
    pub fn new(root: PathBuf, dirs: Vec<String>) -> Self {
        Self { root, dirs }
    }
}

#[async_trait::async_trait]
impl SetupStep for CreateDataDirs {
    async fn execute(&self, _context: &StepContext) -> Result<StepOutcome> {
        let mut created = Vec::new();
        for dir in &self.dirs {
            let path = self.root.join(dir);
            let existed = path.exists();
            fs::create_dir_all(&path)?;
            tracing::debug!("📂 {}{}", path.display(), if existed { " (existing)" } else { "" });
            if !existed {
                created.push(dir.clone());
            }
        }

        Ok(
            StepOutcome::with_detail(format!("{} data directories present", self.dirs.len()))
                .meta("directories", serde_json::json!(self.dirs))
                .meta("created", serde_json::json!(created)),
        )
    }

    fn name(&self) -> &str {
        "data-dirs"
    }
}
