use crate::core::step_sequence::{StepReport, StepSequence};
use crate::domain::ports::ServerLauncher;
use crate::utils::error::Result;

/// Result of a full engine run. `server_exit` is `None` when the run was
/// provisioning-only.
#[derive(Debug)]
pub struct SetupOutcome {
    pub reports: Vec<StepReport>,
    pub server_exit: Option<i32>,
}

/// Orchestrates the two phases of the setup: the provisioning sequence and
/// the foreground server. The server phase is unreachable unless every
/// provisioning step succeeded.
pub struct SetupEngine {
    sequence: StepSequence,
    launcher: Option<Box<dyn ServerLauncher>>,
}

impl SetupEngine {
    pub fn new(sequence: StepSequence) -> Self {
        Self {
            sequence,
            launcher: None,
        }
    }

    pub fn with_server(mut self, launcher: Box<dyn ServerLauncher>) -> Self {
        self.launcher = Some(launcher);
        self
    }

    /// Run the provisioning steps in order, stopping at the first failure.
    pub async fn provision(&mut self) -> Result<Vec<StepReport>> {
        tracing::info!("🔧 Starting environment provisioning...");
        let reports = self.sequence.execute_all().await?;
        tracing::info!(
            "📊 Provisioning summary: {:?}",
            StepSequence::execution_summary(&reports)
        );
        Ok(reports)
    }

    pub async fn run(&mut self) -> Result<SetupOutcome> {
        let reports = self.provision().await?;

        let server_exit = match &self.launcher {
            Some(launcher) => Some(launcher.launch_and_wait().await?),
            None => {
                tracing::info!("⏭️ Server launch skipped (provision only)");
                None
            }
        };

        Ok(SetupOutcome {
            reports,
            server_exit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::step_sequence::{SetupStep, StepContext, StepOutcome};
    use crate::utils::error::SetupError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct StubStep {
        fail: bool,
    }

    #[async_trait]
    impl SetupStep for StubStep {
        async fn execute(&self, _context: &StepContext) -> crate::utils::error::Result<StepOutcome> {
            if self.fail {
                return Err(SetupError::StepError {
                    step: "stub".to_string(),
                    details: "scripted failure".to_string(),
                });
            }
            Ok(StepOutcome::with_detail("ok"))
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    struct CountingLauncher {
        launches: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ServerLauncher for CountingLauncher {
        async fn launch_and_wait(&self) -> crate::utils::error::Result<i32> {
            self.launches.fetch_add(1, Ordering::SeqCst);
            Ok(0)
        }
    }

    fn sequence_with(fail: bool) -> StepSequence {
        let mut sequence = StepSequence::new("engine_test".to_string());
        sequence.add_step(Box::new(StubStep { fail }));
        sequence
    }

    #[tokio::test]
    async fn test_server_launched_after_successful_provisioning() {
        let launches = Arc::new(AtomicUsize::new(0));
        let mut engine = SetupEngine::new(sequence_with(false)).with_server(Box::new(
            CountingLauncher {
                launches: launches.clone(),
            },
        ));

        let outcome = engine.run().await.unwrap();

        assert_eq!(launches.load(Ordering::SeqCst), 1);
        assert_eq!(outcome.server_exit, Some(0));
        assert_eq!(outcome.reports.len(), 1);
    }

    #[tokio::test]
    async fn test_server_not_launched_when_provisioning_fails() {
        let launches = Arc::new(AtomicUsize::new(0));
        let mut engine = SetupEngine::new(sequence_with(true)).with_server(Box::new(
            CountingLauncher {
                launches: launches.clone(),
            },
        ));

        let result = engine.run().await;

        assert!(result.is_err());
        assert_eq!(launches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_provision_only_run_skips_server() {
        let mut engine = SetupEngine::new(sequence_with(false));

        let outcome = engine.run().await.unwrap();

        assert_eq!(outcome.server_exit, None);
    }
}
