//! Scripted command runner for unit tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use stacks_tag_core::error::{Result, TagError};

use crate::process::{display_command, CommandOutput, CommandRunner};

enum Reply {
    Output(CommandOutput),
    Fail { exit_code: i32, stderr: String },
}

/// Replies to command lines by prefix and records every invocation.
///
/// Rules are matched in insertion order against the rendered command line;
/// unmatched commands succeed with empty output.
#[derive(Default)]
pub(crate) struct ScriptedRunner {
    rules: Mutex<Vec<(String, Reply)>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn stdout(self, prefix: &str, stdout: &str) -> Self {
        self.rules.lock().push((
            prefix.to_string(),
            Reply::Output(CommandOutput::new(stdout, "")),
        ));
        self
    }

    pub(crate) fn stderr(self, prefix: &str, stderr: &str) -> Self {
        self.rules.lock().push((
            prefix.to_string(),
            Reply::Output(CommandOutput::new("", stderr)),
        ));
        self
    }

    pub(crate) fn fail(self, prefix: &str, exit_code: i32, stderr: &str) -> Self {
        self.rules.lock().push((
            prefix.to_string(),
            Reply::Fail {
                exit_code,
                stderr: stderr.to_string(),
            },
        ));
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub(crate) fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let command = display_command(program, args);
        self.calls.lock().push(command.clone());

        let rules = self.rules.lock();
        match rules.iter().find(|(prefix, _)| command.starts_with(prefix.as_str())) {
            Some((_, Reply::Output(out))) => Ok(out.clone()),
            Some((_, Reply::Fail { exit_code, stderr })) => Err(TagError::CommandFailed {
                command,
                exit_code: *exit_code,
                stderr: stderr.clone(),
            }),
            None => Ok(CommandOutput::default()),
        }
    }
}
