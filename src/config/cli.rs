use crate::core::ConfigProvider;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_url, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "medalizer-setup")]
#[command(about = "Developer environment bootstrap for the medalizer backend")]
pub struct CliConfig {
    #[arg(long, default_value = ".")]
    pub project_root: String,

    #[arg(long, default_value = "python3", help = "System interpreter used to seed the venv")]
    pub python: String,

    #[arg(long, default_value = "venv")]
    pub venv_dir: String,

    #[arg(long, default_value = "requirements.txt")]
    pub requirements: String,

    #[arg(long, default_value = "en_core_web_sm")]
    pub spacy_model: String,

    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, default_value = "8000")]
    pub port: u16,

    #[arg(long, default_value = ".env.example")]
    pub env_template: String,

    #[arg(long, default_value = ".env")]
    pub env_file: String,

    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = [
            "data/uploads".to_string(),
            "data/chroma_db".to_string(),
            "data/medical_knowledge".to_string(),
        ]
    )]
    pub data_dirs: Vec<String>,

    #[arg(long, help = "Provision only, do not launch the development server")]
    pub provision_only: bool,

    #[arg(long, help = "Optional TOML file overriding the defaults above")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Enable system resource monitoring")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl ConfigProvider for CliConfig {
    fn project_root(&self) -> &str {
        &self.project_root
    }

    fn python(&self) -> &str {
        &self.python
    }

    fn venv_dir(&self) -> &str {
        &self.venv_dir
    }

    fn requirements(&self) -> &str {
        &self.requirements
    }

    fn spacy_model(&self) -> &str {
        &self.spacy_model
    }

    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn env_template(&self) -> &str {
        &self.env_template
    }

    fn env_file(&self) -> &str {
        &self.env_file
    }

    fn data_dirs(&self) -> &[String] {
        &self.data_dirs
    }

    fn provision_only(&self) -> bool {
        self.provision_only
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> crate::utils::error::Result<()> {
        validate_path("project_root", &self.project_root)?;
        validate_non_empty_string("python", &self.python)?;
        validate_path("venv_dir", &self.venv_dir)?;
        validate_path("requirements", &self.requirements)?;
        validate_non_empty_string("spacy_model", &self.spacy_model)?;
        validate_non_empty_string("host", &self.host)?;
        validate_range("port", self.port, 1, 65535)?;
        validate_path("env_template", &self.env_template)?;
        validate_path("env_file", &self.env_file)?;

        if self.data_dirs.is_empty() {
            return Err(crate::utils::error::SetupError::MissingConfigError {
                field: "data_dirs".to_string(),
            });
        }
        for dir in &self.data_dirs {
            validate_path("data_dirs", dir)?;
        }

        // The probe URL is derived from host and port; reject values the
        // URL parser cannot digest before any tool runs.
        validate_url(
            "server",
            &format!("http://{}:{}/health", probe_host(&self.host), self.port),
        )?;

        Ok(())
    }
}

fn probe_host(host: &str) -> &str {
    match host {
        "0.0.0.0" | "::" => "127.0.0.1",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_config() -> CliConfig {
        CliConfig::parse_from(["medalizer-setup"])
    }

    #[test]
    fn test_defaults_match_original_environment() {
        let config = default_config();

        assert_eq!(config.python, "python3");
        assert_eq!(config.venv_dir, "venv");
        assert_eq!(config.requirements, "requirements.txt");
        assert_eq!(config.spacy_model, "en_core_web_sm");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.env_template, ".env.example");
        assert_eq!(config.env_file, ".env");
        assert_eq!(
            config.data_dirs,
            vec!["data/uploads", "data/chroma_db", "data/medical_knowledge"]
        );
        assert!(!config.provision_only);
    }

    #[test]
    fn test_default_config_validates() {
        assert!(default_config().validate().is_ok());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = default_config();
        config.python = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = default_config();
        config.port = 0;
        assert!(config.validate().is_err());

        let mut config = default_config();
        config.data_dirs.clear();
        assert!(config.validate().is_err());

        let mut config = default_config();
        config.host = "not a host".to_string();
        assert!(config.validate().is_err());
    }
}
