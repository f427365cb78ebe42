//! OSC 52 clipboard support.
//!
//! Writes the escape sequence directly to the terminal, so copying works
//! over SSH and inside multiplexers that pass OSC 52 through. No system
//! clipboard library is involved.

use std::io::{self, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Terminals cap OSC 52 payloads; anything longer is truncated before
/// encoding.
const MAX_PAYLOAD_BYTES: usize = 74_994;

pub fn copy_to_clipboard(text: &str) -> io::Result<()> {
    let mut bytes = text.as_bytes();
    if bytes.len() > MAX_PAYLOAD_BYTES {
        let mut end = MAX_PAYLOAD_BYTES;
        while end > 0 && !text.is_char_boundary(end) {
            end -= 1;
        }
        bytes = &text.as_bytes()[..end];
    }
    let encoded = STANDARD.encode(bytes);
    let mut out = io::stdout();
    write!(out, "\x1b]52;c;{encoded}\x07")?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_large_payload_truncates_on_char_boundary() {
        let text = "🦀".repeat(30_000);
        // Exercises the boundary walk; must not panic.
        copy_to_clipboard(&text).unwrap();
    }
}
