//! Quoting helpers
//!
//! No call site builds a literal by hand; every piece of user-controlled
//! text passes through one of these functions before it reaches a shell.

/// Quote `value` as an AppleScript string literal, including the
/// surrounding double quotes.
pub fn applescript_string(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r");
    format!("\"{escaped}\"")
}

/// Escape text for use inside a single-quoted shell literal.
///
/// Single quotes cannot be escaped inside `'...'`, so each one closes the
/// literal, emits an escaped quote and reopens it (`'\''`).
pub fn escape_for_single_quote_shell_literal(value: &str) -> String {
    value.replace('\'', "'\\''")
}

/// Escape text for use inside a double-quoted shell literal.
///
/// Backslashes and double quotes are escaped, as are `$` and backticks so
/// the shell performs no expansion on the embedded script.
pub fn escape_for_double_quote_shell_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '$' => escaped.push_str("\\$"),
            '`' => escaped.push_str("\\`"),
            c => escaped.push(c),
        }
    }
    escaped
}
