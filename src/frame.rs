//! Wire framing for outbound records.

/// Unicode LINE SEPARATOR substituted for embedded newlines so that a
/// multi-line message travels as one physical line.
pub const LINE_SEP: char = '\u{2028}';

/// Frame a message for the wire.
///
/// Replaces every `\n` with [`LINE_SEP`], appends the single terminating
/// `\n`, and returns the UTF-8 bytes. Token prefixing happens at the
/// delivery layer, not here.
pub fn frame(message: &str) -> Vec<u8> {
    let mut framed = message.replace('\n', "\u{2028}");
    framed.push('\n');
    framed.into_bytes()
}
