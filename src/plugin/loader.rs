//! External command resolution and execution

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use super::protocol::{PluginRequest, PluginResponse};
use crate::error::CliError;

/// A user-declared command backed by an executable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    program: PathBuf,
}

impl ExternalCommand {
    /// Resolves `program` relative to the directory holding the config file
    /// and checks that it can be executed.
    pub fn resolve(config_dir: &Path, program: &Path) -> Result<Self> {
        let program = if program.is_absolute() {
            program.to_path_buf()
        } else {
            config_dir.join(program)
        };

        if !program.is_file() {
            anyhow::bail!("Program not found: {}", program.display());
        }
        if !is_executable(&program) {
            anyhow::bail!("Program is not executable: {}", program.display());
        }

        Ok(Self { program })
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Runs the command and returns its response.
    ///
    /// A response with `success: false` is an error carrying the message the
    /// program reported.
    pub fn run(
        &self,
        command: &str,
        args: &[String],
        options: Map<String, Value>,
    ) -> std::result::Result<PluginResponse, CliError> {
        let request = PluginRequest::run(command, args, options);
        let response = self
            .execute(&request)
            .map_err(|e| CliError::Plugin(format!("{command}: {e:#}")))?;

        if !response.success {
            let message = response
                .error
                .unwrap_or_else(|| "the command reported a failure".to_string());
            return Err(CliError::Plugin(format!("{command}: {message}")));
        }
        Ok(response)
    }

    fn execute(&self, request: &PluginRequest) -> Result<PluginResponse> {
        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to spawn {}", self.program.display()))?;

        {
            let mut stdin = child.stdin.take().context("Failed to open stdin")?;
            let request_json = serde_json::to_string(request).context("Failed to serialize request")?;
            writeln!(stdin, "{}", request_json).context("Failed to write request")?;
        }

        let output = child
            .wait_with_output()
            .with_context(|| format!("Failed to wait for {}", self.program.display()))?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        let Some(line) = stdout.lines().find(|line| !line.trim().is_empty()) else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("No response from {} ({})", self.program.display(), stderr.trim());
        };

        serde_json::from_str(line).context("Failed to parse response")
    }
}

/// Checks if a file is executable
fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(meta) = path.metadata() {
            return meta.permissions().mode() & 0o111 != 0;
        }
    }

    #[cfg(windows)]
    {
        if let Some(ext) = path.extension() {
            return ext == "exe" || ext == "bat" || ext == "cmd";
        }
    }

    false
}
