use thiserror::Error;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP probe failed: {0}")]
    ProbeError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Required tool not found: {tool} ({detail})")]
    ToolNotFound { tool: String, detail: String },

    #[error("{tool} exited with status {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: i32,
        stderr: String,
    },

    #[error("Step '{step}' failed: {details}")]
    StepError { step: String, details: String },

    #[error("Dependency manifest not found: {path}")]
    ManifestNotFound { path: String },

    #[error("Configuration template not found: {path}")]
    TemplateNotFound { path: String },

    #[error("Server failed readiness check at {url} after {attempts} attempts")]
    ServerNotReady { url: String, attempts: u32 },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Network,
    Process,
    Configuration,
    Validation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SetupError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SetupError::IoError(_) | SetupError::SerializationError(_) => ErrorCategory::Io,
            SetupError::ProbeError(_) | SetupError::ServerNotReady { .. } => ErrorCategory::Network,
            SetupError::ToolNotFound { .. }
            | SetupError::ToolFailed { .. }
            | SetupError::StepError { .. } => ErrorCategory::Process,
            SetupError::ManifestNotFound { .. }
            | SetupError::TemplateNotFound { .. }
            | SetupError::ConfigError { .. }
            | SetupError::ConfigValidationError { .. }
            | SetupError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SetupError::InvalidConfigValueError { .. } | SetupError::ValidationError { .. } => {
                ErrorCategory::Validation
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // The environment itself is unusable; nothing later can work.
            SetupError::ToolNotFound { .. } => ErrorSeverity::Critical,
            // Transient network conditions; re-running usually succeeds.
            SetupError::ProbeError(_) | SetupError::ServerNotReady { .. } => ErrorSeverity::Medium,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            SetupError::IoError(_) => {
                "Check filesystem permissions and free disk space in the project directory".to_string()
            }
            SetupError::ProbeError(_) | SetupError::ServerNotReady { .. } => {
                "Check that the port is free and re-run; the server may need more time to start".to_string()
            }
            SetupError::SerializationError(_) => {
                "Report this as a bug; internal state failed to serialize".to_string()
            }
            SetupError::ToolNotFound { tool, .. } => {
                format!("Install `{}` and make sure it is on PATH", tool)
            }
            SetupError::ToolFailed { tool, .. } => {
                format!("Inspect the output of `{}` above and fix the reported problem", tool)
            }
            SetupError::StepError { .. } => {
                "Re-run with --verbose for the full step transcript".to_string()
            }
            SetupError::ManifestNotFound { path } => {
                format!("Create `{}` with the backend's pinned dependencies", path)
            }
            SetupError::TemplateNotFound { path } => {
                format!("Restore `{}` from version control", path)
            }
            SetupError::ConfigError { .. }
            | SetupError::ConfigValidationError { .. }
            | SetupError::MissingConfigError { .. }
            | SetupError::InvalidConfigValueError { .. }
            | SetupError::ValidationError { .. } => {
                "Fix the configuration value and re-run; see --help for accepted flags".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Io => format!("Filesystem problem: {}", self),
            ErrorCategory::Network => format!("Network problem: {}", self),
            ErrorCategory::Process => format!("External tool problem: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Validation => format!("Invalid configuration: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, SetupError>;
