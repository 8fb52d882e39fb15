use crate::domain::model::{CommandSpec, ToolOutput};
use crate::utils::error::Result;
use async_trait::async_trait;
use url::Url;

pub trait ConfigProvider: Send + Sync {
    fn project_root(&self) -> &str;
    fn python(&self) -> &str;
    fn venv_dir(&self) -> &str;
    fn requirements(&self) -> &str;
    fn spacy_model(&self) -> &str;
    fn host(&self) -> &str;
    fn port(&self) -> u16;
    fn env_template(&self) -> &str;
    fn env_file(&self) -> &str;
    fn data_dirs(&self) -> &[String];
    fn provision_only(&self) -> bool;
}

/// Port for running external tools. `run` blocks until the tool exits and
/// captures its output; `launch` hands back a handle to a long-running
/// process such as the development server.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, spec: &CommandSpec) -> Result<ToolOutput>;
    async fn launch(&self, spec: &CommandSpec) -> Result<Box<dyn ServerProcess>>;
}

#[async_trait]
pub trait ServerProcess: Send {
    async fn wait(&mut self) -> Result<i32>;
    async fn kill(&mut self) -> Result<()>;
    fn id(&self) -> Option<u32>;
}

/// One readiness attempt against a launched server. Transport failures and
/// non-success statuses both mean "not ready yet", never an error.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn is_ready(&self, url: &Url) -> bool;
}

/// Terminal phase of the setup: launch the development server and stay in
/// the foreground until it exits.
#[async_trait]
pub trait ServerLauncher: Send + Sync {
    async fn launch_and_wait(&self) -> Result<i32>;
}
