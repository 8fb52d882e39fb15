use std::path::{Path, PathBuf};

/// Specification of one external tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Rendered command line, for logs and error messages.
    pub fn display_line(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// Captured result of a finished external tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }

    /// First non-empty line of stdout, falling back to stderr. Tools like
    /// the interpreter version query report on either stream.
    pub fn first_line(&self) -> &str {
        self.stdout
            .lines()
            .chain(self.stderr.lines())
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Unix,
    Windows,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }
}

/// Locations of the binaries inside a Python virtual environment. Invoking
/// these directly replaces sourcing the shell activation script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenvPaths {
    pub root: PathBuf,
    pub python: PathBuf,
    pub pip: PathBuf,
}

impl VenvPaths {
    pub fn resolve(venv_root: &Path, platform: Platform) -> Self {
        let (bin_dir, python, pip) = match platform {
            Platform::Unix => ("bin", "python", "pip"),
            Platform::Windows => ("Scripts", "python.exe", "pip.exe"),
        };

        Self {
            root: venv_root.to_path_buf(),
            python: venv_root.join(bin_dir).join(python),
            pip: venv_root.join(bin_dir).join(pip),
        }
    }
}
