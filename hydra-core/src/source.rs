//! Source ingestion: splitting program text into numbered lines.

use tracing::trace;

/// Split program text into lines.
///
/// Each line goes through [`convert_line`]. Statements and line numbers
/// follow the physical lines only. CRLF line endings are accepted.
#[must_use]
pub fn lines(text: &str) -> Vec<String> {
    text.lines().map(convert_line).collect()
}

/// Turn the two-character sequence `\n` into a newline character, so
/// string literals can hold line breaks.
#[must_use]
pub fn convert_line(line: &str) -> String {
    let converted = line.replace("\\n", "\n");
    if converted.len() != line.len() {
        trace!(line, "converted escaped newlines");
    }
    converted
}
