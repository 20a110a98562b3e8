//! External command execution.
//!
//! All interaction with `docker` and `git` goes through [`CommandRunner`],
//! which turns a non-zero exit status into [`TagError::CommandFailed`].

use async_trait::async_trait;
use stacks_tag_core::error::{Result, TagError};

/// Captured output of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// stdout followed by stderr, trailing whitespace removed.
    ///
    /// Some tools (`spark-submit`, older `java`) print their version banner
    /// on stderr.
    pub fn combined(&self) -> String {
        let mut text = self.stdout.trim_end().to_string();
        let stderr = self.stderr.trim_end();
        if !stderr.is_empty() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(stderr);
        }
        text
    }
}

/// Runs a program to completion and captures its output.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`, failing with `CommandFailed` on non-zero exit.
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput>;
}

/// Render a command line for logs and error messages.
pub fn display_command(program: &str, args: &[String]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        if arg.contains(char::is_whitespace) {
            line.push('\'');
            line.push_str(arg);
            line.push('\'');
        } else {
            line.push_str(arg);
        }
    }
    line
}

/// [`CommandRunner`] backed by real child processes.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let command = display_command(program, args);
        tracing::debug!(command = %command, "Running command");

        let output = tokio::process::Command::new(program)
            .args(args)
            .stdin(std::process::Stdio::null())
            .output()
            .await
            .map_err(|e| TagError::Other(format!("failed to spawn `{}`: {}", command, e)))?;

        let captured = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !output.status.success() {
            // Killed by a signal has no code
            let exit_code = output.status.code().unwrap_or(-1);
            tracing::warn!(command = %command, exit_code, "Command failed");
            return Err(TagError::CommandFailed {
                command,
                exit_code,
                stderr: captured.stderr.trim().to_string(),
            });
        }

        Ok(captured)
    }
}
