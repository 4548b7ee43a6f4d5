//! Transcript input.

use std::io::{IsTerminal, Read};

use tracing::warn;

/// Read the transcript piped in by the host. An interactive terminal is
/// never read; an unreadable stream counts as empty.
pub fn read_transcript() -> String {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return String::new();
    }
    read_all(stdin.lock())
}

/// Read `reader` to the end. Invalid UTF-8 is replaced rather than
/// rejected; a read failure counts as no input.
pub fn read_all<R: Read>(mut reader: R) -> String {
    let mut bytes = Vec::new();
    if let Err(error) = reader.read_to_end(&mut bytes) {
        warn!(error = %error, "failed to read transcript from stdin");
        return String::new();
    }
    String::from_utf8_lossy(&bytes).into_owned()
}
