use crate::domain::model::{CommandSpec, ToolOutput};
use crate::domain::ports::{ProcessRunner, ServerProcess};
use crate::utils::error::{Result, SetupError};
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Run,
    Launch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub kind: CallKind,
}

impl RecordedCall {
    pub fn command_line(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

enum ScriptedBehavior {
    Respond(ToolOutput),
    Fail,
    NotFound,
}

/// Scripted `ProcessRunner` for tests. Every invocation is recorded; by
/// default every tool succeeds silently. Behavior can be overridden per
/// command-line substring, so a test can make exactly one step misbehave.
pub struct RecordingRunner {
    calls: Mutex<Vec<RecordedCall>>,
    scripts: Vec<(String, ScriptedBehavior)>,
    launch_exit: i32,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            scripts: Vec::new(),
            launch_exit: 0,
        }
    }

    /// Commands whose rendered line contains `needle` return this output.
    pub fn respond_when(mut self, needle: impl Into<String>, output: ToolOutput) -> Self {
        self.scripts
            .push((needle.into(), ScriptedBehavior::Respond(output)));
        self
    }

    /// Commands whose rendered line contains `needle` exit with status 1.
    pub fn fail_when(mut self, needle: impl Into<String>) -> Self {
        self.scripts.push((needle.into(), ScriptedBehavior::Fail));
        self
    }

    /// Commands whose rendered line contains `needle` fail to start at all.
    pub fn not_found_when(mut self, needle: impl Into<String>) -> Self {
        self.scripts
            .push((needle.into(), ScriptedBehavior::NotFound));
        self
    }

    /// Exit status reported by launched server processes.
    pub fn launch_exit(mut self, status: i32) -> Self {
        self.launch_exit = status;
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("recorder poisoned").clone()
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(RecordedCall::command_line).collect()
    }

    pub fn launch_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.kind == CallKind::Launch)
            .count()
    }

    fn record(&self, spec: &CommandSpec, kind: CallKind) {
        self.calls.lock().expect("recorder poisoned").push(RecordedCall {
            program: spec.program.clone(),
            args: spec.args.clone(),
            cwd: spec.cwd.clone(),
            kind,
        });
    }

    fn scripted(&self, line: &str) -> Option<&ScriptedBehavior> {
        self.scripts
            .iter()
            .find(|(needle, _)| line.contains(needle.as_str()))
            .map(|(_, behavior)| behavior)
    }
}

impl Default for RecordingRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ProcessRunner for RecordingRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<ToolOutput> {
        let line = spec.display_line();
        match self.scripted(&line) {
            Some(ScriptedBehavior::NotFound) => Err(SetupError::ToolNotFound {
                tool: spec.program.clone(),
                detail: "scripted: not found".to_string(),
            }),
            Some(ScriptedBehavior::Fail) => {
                self.record(spec, CallKind::Run);
                Ok(ToolOutput {
                    status: 1,
                    stdout: String::new(),
                    stderr: "scripted failure".to_string(),
                })
            }
            Some(ScriptedBehavior::Respond(output)) => {
                self.record(spec, CallKind::Run);
                Ok(output.clone())
            }
            None => {
                self.record(spec, CallKind::Run);
                Ok(ToolOutput {
                    status: 0,
                    stdout: String::new(),
                    stderr: String::new(),
                })
            }
        }
    }

    async fn launch(&self, spec: &CommandSpec) -> Result<Box<dyn ServerProcess>> {
        let line = spec.display_line();
        if let Some(ScriptedBehavior::NotFound) = self.scripted(&line) {
            return Err(SetupError::ToolNotFound {
                tool: spec.program.clone(),
                detail: "scripted: not found".to_string(),
            });
        }
        self.record(spec, CallKind::Launch);
        Ok(Box::new(ScriptedServerProcess {
            exit: self.launch_exit,
        }))
    }
}

pub struct ScriptedServerProcess {
    exit: i32,
}

#[async_trait::async_trait]
impl ServerProcess for ScriptedServerProcess {
    async fn wait(&mut self) -> Result<i32> {
        Ok(self.exit)
    }

    async fn kill(&mut self) -> Result<()> {
        Ok(())
    }

    fn id(&self) -> Option<u32> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_behaviors() {
        let runner = RecordingRunner::new()
            .fail_when("spacy")
            .not_found_when("python3");

        let failing = CommandSpec::new("venv/bin/python", ".").args(["-m", "spacy", "download"]);
        let output = tokio_test::block_on(runner.run(&failing)).unwrap();
        assert_eq!(output.status, 1);

        let missing = CommandSpec::new("python3", ".").arg("--version");
        let result = tokio_test::block_on(runner.run(&missing));
        assert!(matches!(result, Err(SetupError::ToolNotFound { .. })));

        // 只有真正執行到的命令會被記錄
        assert_eq!(runner.calls().len(), 1);
    }
}
