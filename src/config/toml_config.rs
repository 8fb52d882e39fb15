use crate::utils::error::{Result, SetupError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 以 TOML 檔案覆寫預設安裝設定；未填寫的欄位保留原值
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetupManifest {
    pub project: Option<ProjectSection>,
    pub environment: Option<EnvironmentSection>,
    pub model: Option<ModelSection>,
    pub server: Option<ServerSection>,
    pub files: Option<FilesSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectSection {
    pub root: Option<String>,
    pub python: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentSection {
    pub venv_dir: Option<String>,
    pub requirements: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelSection {
    pub spacy: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilesSection {
    pub env_template: Option<String>,
    pub env_file: Option<String>,
    pub data_dirs: Option<Vec<String>>,
}

impl SetupManifest {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SetupError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SetupError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HOME})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        // 使用正規表達式匹配 ${VAR_NAME} 格式
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SetupError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

#[cfg(feature = "cli")]
impl crate::config::CliConfig {
    /// 套用 TOML 覆寫後回傳新的配置
    pub fn with_overrides(mut self, manifest: SetupManifest) -> Self {
        if let Some(project) = manifest.project {
            if let Some(root) = project.root {
                self.project_root = root;
            }
            if let Some(python) = project.python {
                self.python = python;
            }
        }
        if let Some(environment) = manifest.environment {
            if let Some(venv_dir) = environment.venv_dir {
                self.venv_dir = venv_dir;
            }
            if let Some(requirements) = environment.requirements {
                self.requirements = requirements;
            }
        }
        if let Some(model) = manifest.model {
            if let Some(spacy) = model.spacy {
                self.spacy_model = spacy;
            }
        }
        if let Some(server) = manifest.server {
            if let Some(host) = server.host {
                self.host = host;
            }
            if let Some(port) = server.port {
                self.port = port;
            }
        }
        if let Some(files) = manifest.files {
            if let Some(env_template) = files.env_template {
                self.env_template = env_template;
            }
            if let Some(env_file) = files.env_file {
                self.env_file = env_file;
            }
            if let Some(data_dirs) = files.data_dirs {
                self.data_dirs = data_dirs;
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_manifest() {
        let manifest = SetupManifest::from_toml_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [model]
            spacy = "en_core_web_md"
            "#,
        )
        .unwrap();

        assert_eq!(manifest.server.as_ref().unwrap().host.as_deref(), Some("127.0.0.1"));
        assert_eq!(manifest.server.as_ref().unwrap().port, Some(9000));
        assert_eq!(manifest.model.unwrap().spacy.as_deref(), Some("en_core_web_md"));
        assert!(manifest.project.is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("MEDALIZER_TEST_PORT", "9100");
        let manifest = SetupManifest::from_toml_str(
            r#"
            [server]
            port = ${MEDALIZER_TEST_PORT}
            "#,
        )
        .unwrap();

        assert_eq!(manifest.server.unwrap().port, Some(9100));
    }

    #[test]
    fn test_unresolved_env_var_is_left_intact() {
        let result = SetupManifest::substitute_env_vars("root = \"${MEDALIZER_TEST_UNSET_VAR}\"");
        assert_eq!(result.unwrap(), "root = \"${MEDALIZER_TEST_UNSET_VAR}\"");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = SetupManifest::from_toml_str("not [ valid");
        assert!(matches!(
            result,
            Err(SetupError::ConfigValidationError { .. })
        ));
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_overrides_keep_unset_fields() {
        use clap::Parser;

        let config = crate::config::CliConfig::parse_from(["medalizer-setup"]);
        let manifest = SetupManifest::from_toml_str(
            r#"
            [server]
            port = 9000
            "#,
        )
        .unwrap();

        let merged = config.with_overrides(manifest);

        assert_eq!(merged.port, 9000);
        assert_eq!(merged.host, "0.0.0.0");
        assert_eq!(merged.python, "python3");
    }
}
