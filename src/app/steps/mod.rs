pub mod data_dirs;
pub mod database;
pub mod dependencies;
pub mod env_file;
pub mod interpreter;
pub mod language_model;
pub mod server;
pub mod virtualenv;

use crate::core::step_sequence::StepSequence;
use crate::domain::model::{Platform, VenvPaths};
use crate::domain::ports::{ConfigProvider, HealthProbe, ProcessRunner};
use std::path::PathBuf;
use std::sync::Arc;

/// Keys under which steps find values published into the step context.
pub mod context_keys {
    /// Interpreter binary inside the virtual environment.
    pub const VENV_PYTHON: &str = "venv_python";
    /// Pip binary inside the virtual environment.
    pub const VENV_PIP: &str = "venv_pip";
}

/// Assemble the standard provisioning sequence. The venv binary locations
/// are derived from the configuration up front and seeded into the context
/// so that steps after the virtualenv one can invoke them even when the
/// environment already existed.
pub fn provisioning_sequence(
    config: &impl ConfigProvider,
    runner: Arc<dyn ProcessRunner>,
    monitor_enabled: bool,
) -> StepSequence {
    let execution_id = format!("setup_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"));
    let root = PathBuf::from(config.project_root());
    let venv = VenvPaths::resolve(&root.join(config.venv_dir()), Platform::current());

    let mut sequence = StepSequence::new(execution_id).with_monitoring(monitor_enabled);
    sequence.add_shared_data(
        context_keys::VENV_PYTHON,
        serde_json::json!(venv.python.to_string_lossy()),
    );
    sequence.add_shared_data(
        context_keys::VENV_PIP,
        serde_json::json!(venv.pip.to_string_lossy()),
    );

    sequence.add_step(Box::new(interpreter::InterpreterCheck::new(
        runner.clone(),
        config.python(),
        root.clone(),
    )));
    sequence.add_step(Box::new(virtualenv::CreateVirtualenv::new(
        runner.clone(),
        config.python(),
        root.clone(),
        config.venv_dir(),
    )));
    sequence.add_step(Box::new(dependencies::InstallDependencies::new(
        runner.clone(),
        root.clone(),
        config.requirements(),
    )));
    sequence.add_step(Box::new(language_model::DownloadLanguageModel::new(
        runner.clone(),
        root.clone(),
        config.spacy_model(),
    )));
    sequence.add_step(Box::new(data_dirs::CreateDataDirs::new(
        root.clone(),
        config.data_dirs().to_vec(),
    )));
    sequence.add_step(Box::new(env_file::SeedEnvFile::new(
        root.clone(),
        config.env_template(),
        config.env_file(),
    )));
    sequence.add_step(Box::new(database::InitializeDatabase::new(
        runner,
        root,
        database::DEFAULT_INIT_HOOK,
    )));

    sequence
}

/// Assemble the development server launcher for the final phase.
pub fn dev_server(
    config: &impl ConfigProvider,
    runner: Arc<dyn ProcessRunner>,
    probe: Arc<dyn HealthProbe>,
) -> server::DevServer {
    let root = PathBuf::from(config.project_root());
    let venv = VenvPaths::resolve(&root.join(config.venv_dir()), Platform::current());

    server::DevServer::new(runner, probe, root, venv, config.host(), config.port())
}
