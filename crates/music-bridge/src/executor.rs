//! Running generated commands
//!
//! [`ScriptExecutor`] is the single seam between dispatch logic and the
//! outside world. The default [`ShellExecutor`] shells out; tests swap in
//! a recording fake.

use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

use crate::error::{BridgeError, Result};
use crate::script::Script;

/// Default capture buffer for script output (50 MiB)
///
/// Full library listings run to many kilobytes; this leaves a wide margin.
pub const DEFAULT_MAX_BUFFER: usize = 50 * 1024 * 1024;

/// Runs a command line and returns its trimmed stdout
pub trait ScriptExecutor {
    /// Execute `command` to completion, blocking the caller.
    fn execute(&self, command: &str) -> Result<String>;

    /// Render `script` into its command form and execute it.
    fn run(&self, script: &Script) -> Result<String> {
        tracing::debug!(mode = %script.mode(), "Running script");
        let output = self.execute(&script.to_command())?;
        tracing::debug!(bytes = output.len(), "Script finished");
        Ok(output)
    }
}

impl<T: ScriptExecutor + ?Sized> ScriptExecutor for &T {
    fn execute(&self, command: &str) -> Result<String> {
        (**self).execute(command)
    }
}

impl<T: ScriptExecutor + ?Sized> ScriptExecutor for Box<T> {
    fn execute(&self, command: &str) -> Result<String> {
        (**self).execute(command)
    }
}

/// Settings for [`ShellExecutor`]
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Shell invoked as `<shell> -c <command>`
    pub shell: PathBuf,
    /// Maximum number of stdout bytes captured before the run is aborted
    pub max_buffer: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            shell: PathBuf::from("/bin/sh"),
            max_buffer: DEFAULT_MAX_BUFFER,
        }
    }
}

/// Executes commands through a POSIX shell
#[derive(Debug, Clone, Default)]
pub struct ShellExecutor {
    config: ExecutorConfig,
}

impl ShellExecutor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }
}

impl ScriptExecutor for ShellExecutor {
    fn execute(&self, command: &str) -> Result<String> {
        let mut child = Command::new(&self.config.shell)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Drain stderr on its own thread so a chatty script cannot block
        // on a full pipe while stdout is being read.
        let stderr_pipe = child.stderr.take();
        let stderr_reader = thread::spawn(move || {
            let mut buf = Vec::new();
            if let Some(mut pipe) = stderr_pipe {
                let _ = pipe.read_to_end(&mut buf);
            }
            buf
        });

        let limit = self.config.max_buffer;
        let mut stdout = Vec::new();
        if let Some(pipe) = child.stdout.take() {
            pipe.take(limit as u64 + 1).read_to_end(&mut stdout)?;
        }

        if stdout.len() > limit {
            let _ = child.kill();
            let _ = child.wait();
            tracing::warn!(limit, "Script output exceeded capture buffer");
            return Err(BridgeError::OutputTooLarge { limit });
        }

        let status = child.wait()?;
        let stderr = stderr_reader.join().unwrap_or_default();

        if status.success() {
            return Ok(String::from_utf8_lossy(&stdout).trim().to_string());
        }

        let stderr = String::from_utf8_lossy(&stderr).trim().to_string();
        if stderr.is_empty() {
            Err(BridgeError::ExitStatus {
                code: status.code().unwrap_or(-1),
            })
        } else {
            Err(BridgeError::Script(stderr))
        }
    }
}
