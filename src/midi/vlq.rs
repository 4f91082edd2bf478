//! MIDI variable-length quantities

use crate::error::{Error, Result};

/// Largest value a four-byte quantity can hold
pub const VLQ_MAX: u32 = 0x0FFF_FFFF;

/// Encode `n` as a variable-length quantity, most significant group first
pub fn encode(n: u32) -> Result<Vec<u8>> {
    if n > VLQ_MAX {
        return Err(Error::VlqOverflow(n as u64));
    }

    let mut bytes = vec![(n & 0x7F) as u8];
    let mut rest = n >> 7;
    while rest > 0 {
        bytes.push((rest & 0x7F) as u8 | 0x80);
        rest >>= 7;
    }
    bytes.reverse();

    Ok(bytes)
}

/// Decode a quantity from the start of `bytes`
///
/// Returns the value and the number of bytes consumed.
pub fn decode(bytes: &[u8]) -> Result<(u32, usize)> {
    let mut value = 0u32;
    for (i, &b) in bytes.iter().enumerate() {
        if i >= 4 {
            return Err(Error::MidiParse("Variable-length quantity longer than 4 bytes".into()));
        }
        value = (value << 7) | (b & 0x7F) as u32;
        if b & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }

    Err(Error::MidiParse("Truncated variable-length quantity".into()))
}
