//! Scripting bridge to the macOS Music app
//!
//! Everything that crosses the process boundary to the Music app goes
//! through this crate:
//!
//! ```text
//! [ music-mcp dispatcher ]
//!        | Script (statement | procedure)
//!        v
//! [ music-bridge ]  -- escape -->  osascript -e '...'  /  osascript -e "..."
//!        | ScriptExecutor
//!        v
//! [ sh -c <command> ]  -->  [ Music.app ]
//! ```
//!
//! # Escaping
//!
//! Two layers of quoting are applied, always through the helpers in
//! [`escape`]:
//!
//! 1. User text becomes an AppleScript string literal via
//!    [`escape::applescript_string`].
//! 2. The finished script is embedded in a shell literal. Single-statement
//!    scripts use a single-quoted literal
//!    ([`escape::escape_for_single_quote_shell_literal`]), multi-line
//!    procedures use a double-quoted one
//!    ([`escape::escape_for_double_quote_shell_literal`]).

pub mod error;
pub mod escape;
pub mod executor;
pub mod script;

pub use error::{BridgeError, Result};
pub use escape::{
    applescript_string, escape_for_double_quote_shell_literal,
    escape_for_single_quote_shell_literal,
};
pub use executor::{DEFAULT_MAX_BUFFER, ExecutorConfig, ScriptExecutor, ShellExecutor};
pub use script::{APP_NAME, Script, ScriptMode};
