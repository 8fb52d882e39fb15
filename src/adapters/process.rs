use crate::domain::model::{CommandSpec, ToolOutput};
use crate::domain::ports::{ProcessRunner, ServerProcess};
use crate::utils::error::{Result, SetupError};
use tokio::process::{Child, Command};

/// Real `ProcessRunner` over tokio subprocesses. Output of blocking tools is
/// captured in full; launched servers inherit the parent's stdio so the
/// operator sees uvicorn's own log stream.
#[derive(Debug, Default)]
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    pub fn new() -> Self {
        Self
    }

    fn map_spawn_error(spec: &CommandSpec, err: std::io::Error) -> SetupError {
        if err.kind() == std::io::ErrorKind::NotFound {
            SetupError::ToolNotFound {
                tool: spec.program.clone(),
                detail: err.to_string(),
            }
        } else {
            SetupError::IoError(err)
        }
    }
}

#[async_trait::async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<ToolOutput> {
        let output = Command::new(&spec.program)
            .args(&spec.args)
            .current_dir(&spec.cwd)
            .output()
            .await
            .map_err(|e| Self::map_spawn_error(spec, e))?;

        Ok(ToolOutput {
            status: output.status.code().unwrap_or(1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    async fn launch(&self, spec: &CommandSpec) -> Result<Box<dyn ServerProcess>> {
        let child = Command::new(&spec.program)
            .args(&spec.args)
            .current_dir(&spec.cwd)
            .spawn()
            .map_err(|e| Self::map_spawn_error(spec, e))?;

        Ok(Box::new(TokioServerProcess { child }))
    }
}

pub struct TokioServerProcess {
    child: Child,
}

#[async_trait::async_trait]
impl ServerProcess for TokioServerProcess {
    async fn wait(&mut self) -> Result<i32> {
        let status = self.child.wait().await?;
        Ok(status.code().unwrap_or(1))
    }

    async fn kill(&mut self) -> Result<()> {
        self.child.kill().await?;
        Ok(())
    }

    fn id(&self) -> Option<u32> {
        self.child.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_missing_program_maps_to_tool_not_found() {
        let runner = TokioProcessRunner::new();
        let spec = CommandSpec::new("definitely-not-a-real-tool-9e1c", PathBuf::from("."));

        let result = runner.run(&spec).await;

        assert!(matches!(result, Err(SetupError::ToolNotFound { .. })));
    }
}
