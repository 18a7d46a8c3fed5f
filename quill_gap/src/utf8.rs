// This file is part of Quill.

// Quill is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
//
// Quill is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.

//! Strict UTF-8 scalar codec.
//!
//! Decoding validates the full sequence: continuation byte patterns, overlong encodings, the
//! surrogate range, and the `U+10FFFF` ceiling. Whenever [decode] fails, the caller should
//! advance by exactly one byte and substitute [REPLACEMENT] for display, so a single corrupt
//! byte costs a single replacement glyph rather than desynchronizing the rest of the stream.

use thiserror::Error;

/// Scalar substituted for display when a decode fails.
pub const REPLACEMENT: char = '\u{FFFD}';

/// A successfully decoded scalar and the number of bytes its encoding occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    /// The decoded Unicode scalar.
    pub scalar: char,
    /// Bytes consumed from the input, 1 through 4.
    pub consumed: usize,
}

/// Reasons a byte sequence fails strict UTF-8 validation.
///
/// Every variant carries the offset the failed decode started at. None of these are recoverable
/// for the sequence itself; resynchronization is one byte at a time.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Utf8Error {
    /// The offset is at or past the end of input, or the sequence is truncated by it.
    #[error("scalar at offset {offset} runs past the end of input")]
    OutOfBounds {
        /// Offset the decode started at.
        offset: usize,
    },
    /// The lead byte is a continuation byte or has five or more leading ones.
    #[error("invalid lead byte at offset {offset}")]
    InvalidLead {
        /// Offset the decode started at.
        offset: usize,
    },
    /// A byte inside the sequence does not match the `10xxxxxx` continuation pattern.
    #[error("missing continuation byte in scalar starting at offset {offset}")]
    InvalidContinuation {
        /// Offset the decode started at.
        offset: usize,
    },
    /// The sequence encodes a value representable in fewer bytes.
    #[error("overlong encoding at offset {offset}")]
    Overlong {
        /// Offset the decode started at.
        offset: usize,
    },
    /// The sequence encodes a value in the surrogate range `U+D800..=U+DFFF`.
    #[error("surrogate code point at offset {offset}")]
    Surrogate {
        /// Offset the decode started at.
        offset: usize,
    },
    /// The sequence encodes a value above `U+10FFFF`.
    #[error("code point above U+10FFFF at offset {offset}")]
    OutOfRange {
        /// Offset the decode started at.
        offset: usize,
    },
}

/// Returns the expected byte length of a scalar from its lead byte, or `None` if the byte
/// cannot start a sequence (a continuation byte or a byte with five or more leading ones).
///
/// ### Examples
/// ```
/// use quill_gap::utf8::lead_len;
///
/// assert_eq!(lead_len(b'a'), Some(1));
/// assert_eq!(lead_len(0xC3), Some(2));
/// assert_eq!(lead_len(0xE2), Some(3));
/// assert_eq!(lead_len(0xF0), Some(4));
/// assert_eq!(lead_len(0x80), None);
/// assert_eq!(lead_len(0xFF), None);
/// ```
pub fn lead_len(byte: u8) -> Option<usize> {
    if byte & 0b1000_0000 == 0 {
        Some(1)
    } else if byte & 0b1100_0000 == 0b1000_0000 {
        None
    } else if byte & 0b1110_0000 == 0b1100_0000 {
        Some(2)
    } else if byte & 0b1111_0000 == 0b1110_0000 {
        Some(3)
    } else if byte & 0b1111_1000 == 0b1111_0000 {
        Some(4)
    } else {
        None
    }
}

/// Returns true if the byte matches the `10xxxxxx` continuation pattern.
pub fn is_continuation(byte: u8) -> bool {
    byte & 0b1100_0000 == 0b1000_0000
}

/// Decodes one scalar from `bytes` starting at `offset`.
///
/// ### Examples
/// ```
/// use quill_gap::utf8::{decode, Utf8Error};
///
/// let decoded = decode("héllo".as_bytes(), 1).unwrap();
/// assert_eq!(decoded.scalar, 'é');
/// assert_eq!(decoded.consumed, 2);
///
/// // An overlong two-byte encoding of '/' is rejected, not silently accepted.
/// assert_eq!(
///     decode(&[0xC0, 0xAF], 0),
///     Err(Utf8Error::Overlong { offset: 0 })
/// );
/// ```
pub fn decode(bytes: &[u8], offset: usize) -> Result<Decoded, Utf8Error> {
    let Some(&lead) = bytes.get(offset) else {
        return Err(Utf8Error::OutOfBounds { offset });
    };

    let Some(len) = lead_len(lead) else {
        return Err(Utf8Error::InvalidLead { offset });
    };

    if len == 1 {
        return Ok(Decoded {
            scalar: lead as char,
            consumed: 1,
        });
    }

    let Some(tail) = bytes.get(offset + 1..offset + len) else {
        return Err(Utf8Error::OutOfBounds { offset });
    };
    if tail.iter().any(|&b| !is_continuation(b)) {
        return Err(Utf8Error::InvalidContinuation { offset });
    }

    let value = match len {
        2 => ((lead as u32 & 0x1F) << 6) | (tail[0] as u32 & 0x3F),
        3 => {
            ((lead as u32 & 0x0F) << 12) | ((tail[0] as u32 & 0x3F) << 6) | (tail[1] as u32 & 0x3F)
        }
        _ => {
            ((lead as u32 & 0x07) << 18)
                | ((tail[0] as u32 & 0x3F) << 12)
                | ((tail[1] as u32 & 0x3F) << 6)
                | (tail[2] as u32 & 0x3F)
        }
    };

    let minimum = match len {
        2 => 0x80,
        3 => 0x800,
        _ => 0x10000,
    };
    if value < minimum {
        return Err(Utf8Error::Overlong { offset });
    }
    if (0xD800..=0xDFFF).contains(&value) {
        return Err(Utf8Error::Surrogate { offset });
    }
    if value > 0x10FFFF {
        return Err(Utf8Error::OutOfRange { offset });
    }

    let scalar = char::from_u32(value).ok_or(Utf8Error::OutOfRange { offset })?;
    Ok(Decoded {
        scalar,
        consumed: len,
    })
}

/// Encodes `scalar` into `buf`, returning the encoded prefix.
///
/// Values that are not Unicode scalars (the surrogate range and anything above `U+10FFFF`)
/// encode to [REPLACEMENT]'s three-byte sequence.
///
/// ### Examples
/// ```
/// use quill_gap::utf8::encode;
///
/// let mut buf = [0u8; 4];
/// assert_eq!(encode('é' as u32, &mut buf), "é".as_bytes());
///
/// let mut buf = [0u8; 4];
/// assert_eq!(encode(0x110000, &mut buf), [0xEF, 0xBF, 0xBD]);
/// ```
pub fn encode(scalar: u32, buf: &mut [u8; 4]) -> &[u8] {
    match scalar {
        0..=0x7F => {
            buf[0] = scalar as u8;
            &buf[..1]
        }
        0x80..=0x7FF => {
            buf[0] = 0xC0 | (scalar >> 6) as u8;
            buf[1] = 0x80 | (scalar & 0x3F) as u8;
            &buf[..2]
        }
        0x800..=0xFFFF if !(0xD800..=0xDFFF).contains(&scalar) => {
            buf[0] = 0xE0 | (scalar >> 12) as u8;
            buf[1] = 0x80 | ((scalar >> 6) & 0x3F) as u8;
            buf[2] = 0x80 | (scalar & 0x3F) as u8;
            &buf[..3]
        }
        0x10000..=0x10FFFF => {
            buf[0] = 0xF0 | (scalar >> 18) as u8;
            buf[1] = 0x80 | ((scalar >> 12) & 0x3F) as u8;
            buf[2] = 0x80 | ((scalar >> 6) & 0x3F) as u8;
            buf[3] = 0x80 | (scalar & 0x3F) as u8;
            &buf[..4]
        }
        _ => {
            buf[0] = 0xEF;
            buf[1] = 0xBF;
            buf[2] = 0xBD;
            &buf[..3]
        }
    }
}
