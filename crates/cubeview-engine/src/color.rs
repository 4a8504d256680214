//! Hex color encoding for pixels read back from the GPU.

use std::fmt::Write;

/// Encodes an RGB triple as a lowercase `#rrggbb` string.
///
/// ```
/// use cubeview_engine::color::rgb_to_hex;
///
/// assert_eq!(rgb_to_hex(255, 0, 0), "#ff0000");
/// ```
pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    channels_to_hex([Some(r), Some(g), Some(b)])
}

/// Like [`rgb_to_hex`], but a missing channel (for example one read past the
/// end of a pixel buffer) encodes as `00`.
pub fn channels_to_hex(channels: [Option<u8>; 3]) -> String {
    let mut out = String::with_capacity(7);
    out.push('#');
    for c in channels {
        // Writing into a String cannot fail.
        let _ = write!(out, "{:02x}", c.unwrap_or(0));
    }
    out
}

/// Parses a `#rrggbb` string back into bytes.
///
/// Returns `None` for anything that is not exactly a `#` followed by six hex
/// digits.
pub fn hex_to_rgb(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}
