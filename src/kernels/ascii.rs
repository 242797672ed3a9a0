//! Fixed-width text kernels for the attribute table.
//!
//! dBASE stores every value as single-byte text. Characters up to U+00FF map to
//! their Latin-1 byte; anything wider becomes `?`, so one character is always
//! exactly one byte and widths computed in characters stay valid in bytes.

const REPLACEMENT: u8 = b'?';

/// Maps text to one byte per character.
pub fn to_single_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(REPLACEMENT))
        .collect()
}

/// Right-aligns `text` in a field of `width` bytes (space-padded on the left).
/// Text longer than the field keeps its first `width` bytes.
pub fn pad_left(text: &str, width: usize) -> Vec<u8> {
    let mut bytes = to_single_bytes(text);
    if bytes.len() >= width {
        bytes.truncate(width);
        return bytes;
    }
    let mut out = vec![b' '; width - bytes.len()];
    out.append(&mut bytes);
    out
}

/// Left-aligns `text` in a field of `width` bytes (space-padded on the right).
pub fn pad_right(text: &str, width: usize) -> Vec<u8> {
    let mut bytes = to_single_bytes(text);
    bytes.resize(width, b' ');
    bytes
}

/// Left-aligns `text` in a field of `width` bytes, padding with NUL.
pub fn null_padded(text: &str, width: usize) -> Vec<u8> {
    let mut bytes = to_single_bytes(text);
    bytes.resize(width, 0);
    bytes
}

/// Keeps the first `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
