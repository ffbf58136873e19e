//! [`RecordingExecutor`] for dispatcher and server tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use music_bridge::{BridgeError, ScriptExecutor};

#[derive(Debug, Clone)]
enum Canned {
    Output(String),
    Stderr(String),
    Exit(i32),
}

#[derive(Debug, Default)]
struct State {
    commands: Vec<String>,
    replies: VecDeque<Canned>,
}

/// Records every command it is asked to run and answers from a queue of
/// canned replies.
///
/// Clones share state, so a test can hand one clone to the code under
/// test and inspect the other.
///
/// # Example
///
/// ```rust
/// use music_bridge::ScriptExecutor;
/// use music_test_utils::RecordingExecutor;
///
/// let executor = RecordingExecutor::new();
/// executor.respond("42");
/// assert_eq!(executor.execute("osascript -e 'x'").unwrap(), "42");
/// assert_eq!(executor.commands(), vec!["osascript -e 'x'".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingExecutor {
    state: Arc<Mutex<State>>,
}

impl RecordingExecutor {
    /// A recorder that answers every command with empty output.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, reply: Canned) {
        self.state.lock().unwrap().replies.push_back(reply);
    }

    /// Queue stdout for the next command.
    pub fn respond(&self, output: impl Into<String>) {
        self.push(Canned::Output(output.into()));
    }

    /// Queue a failure that wrote `stderr` for the next command.
    pub fn fail_with_stderr(&self, stderr: impl Into<String>) {
        self.push(Canned::Stderr(stderr.into()));
    }

    /// Queue a silent failure with exit status `code` for the next command.
    pub fn fail_with_exit(&self, code: i32) {
        self.push(Canned::Exit(code));
    }

    /// Every command executed so far, oldest first.
    pub fn commands(&self) -> Vec<String> {
        self.state.lock().unwrap().commands.clone()
    }

    /// The most recent command, if any.
    pub fn last_command(&self) -> Option<String> {
        self.state.lock().unwrap().commands.last().cloned()
    }
}

impl ScriptExecutor for RecordingExecutor {
    fn execute(&self, command: &str) -> music_bridge::Result<String> {
        let mut state = self.state.lock().unwrap();
        state.commands.push(command.to_string());
        match state.replies.pop_front() {
            None => Ok(String::new()),
            Some(Canned::Output(output)) => Ok(output.trim().to_string()),
            Some(Canned::Stderr(stderr)) => Err(BridgeError::Script(stderr)),
            Some(Canned::Exit(code)) => Err(BridgeError::ExitStatus { code }),
        }
    }
}
