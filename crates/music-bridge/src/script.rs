//! Generated AppleScript and its shell command form

use std::fmt;

use crate::escape::{escape_for_double_quote_shell_literal, escape_for_single_quote_shell_literal};

/// The application every script is addressed to
pub const APP_NAME: &str = "Music";

/// How a script is handed to `osascript`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptMode {
    /// One statement, passed in a single-quoted shell literal
    Statement,
    /// Multi-line procedure, passed in a double-quoted shell literal
    Procedure,
}

impl fmt::Display for ScriptMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Statement => write!(f, "statement"),
            Self::Procedure => write!(f, "procedure"),
        }
    }
}

/// A generated AppleScript program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    mode: ScriptMode,
    source: String,
}

impl Script {
    /// `tell application "Music" to <action>`
    pub fn tell(action: impl AsRef<str>) -> Self {
        Self {
            mode: ScriptMode::Statement,
            source: format!("tell application \"{APP_NAME}\" to {}", action.as_ref()),
        }
    }

    /// A `tell application "Music"` block wrapping the given lines.
    ///
    /// Needed whenever the script branches, iterates or returns a
    /// sentinel.
    pub fn tell_block<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut source = format!("tell application \"{APP_NAME}\"\n");
        for line in lines {
            source.push_str("    ");
            source.push_str(line.as_ref());
            source.push('\n');
        }
        source.push_str("end tell");
        Self {
            mode: ScriptMode::Procedure,
            source,
        }
    }

    pub fn mode(&self) -> ScriptMode {
        self.mode
    }

    /// The raw AppleScript source
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The shell command line that runs this script through `osascript`
    pub fn to_command(&self) -> String {
        match self.mode {
            ScriptMode::Statement => format!(
                "osascript -e '{}'",
                escape_for_single_quote_shell_literal(&self.source)
            ),
            ScriptMode::Procedure => format!(
                "osascript -e \"{}\"",
                escape_for_double_quote_shell_literal(&self.source)
            ),
        }
    }
}
