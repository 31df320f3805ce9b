//! Text wire mode.
//!
//! Used for driving a board from a serial terminal. Each wire byte (after
//! stuffing) travels as its decimal value followed by a space; the sender
//! terminates every packet with a newline:
//!
//! ```text
//! 255 1 0 0 \n
//! ```
//!
//! Framing and stuffing are unchanged, only the byte representation differs.

/// Separator written after every text byte.
pub const TEXT_SEPARATOR: u8 = b' ';

/// Written after the last byte of each outbound packet.
pub const TEXT_PACKET_TERMINATOR: u8 = b'\n';

/// Longest text rendering of one byte: three digits and a separator.
pub const MAX_TEXT_BYTE_LEN: usize = 4;

/// Longest token [`TextByteReader`] buffers before giving up on it.
pub const MAX_TEXT_TOKEN_LEN: usize = 8;

/// Worst-case text size of `wire_len` wire bytes plus the packet terminator.
#[inline]
#[must_use]
pub const fn max_text_len(wire_len: usize) -> usize {
    wire_len * MAX_TEXT_BYTE_LEN + 1
}

/// Write a u8 as an unsigned decimal string.
///
/// Returns the number of bytes written (1-3 bytes).
///
/// # Panics
///
/// Panics if `buf.len() < 3` and the value needs more digits than fit.
#[inline]
pub fn write_u8(buf: &mut [u8], value: u8) -> usize {
    if value == 0 {
        buf[0] = b'0';
        return 1;
    }

    let mut temp = [0u8; 3];
    let mut n = value;
    let mut len = 0;
    while n > 0 {
        temp[len] = b'0' + (n % 10);
        n /= 10;
        len += 1;
    }

    for i in (0..len).rev() {
        buf[len - 1 - i] = temp[i];
    }
    len
}

/// Write one wire byte in text form (decimal plus separator).
///
/// Returns the number of bytes written (2-4 bytes).
///
/// # Panics
///
/// Panics if `buf` cannot hold the rendering; [`MAX_TEXT_BYTE_LEN`] always
/// suffices.
#[inline]
pub fn write_text_byte(buf: &mut [u8], value: u8) -> usize {
    let len = write_u8(buf, value);
    buf[len] = TEXT_SEPARATOR;
    len + 1
}

/// Incremental reader turning text tokens back into wire bytes.
///
/// Any ASCII whitespace ends a token. A token's leading decimal digits give
/// its value, truncated to 8 bits; empty tokens are skipped and a token
/// longer than [`MAX_TEXT_TOKEN_LEN`] is dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextByteReader {
    token: [u8; MAX_TEXT_TOKEN_LEN],
    len: usize,
}

impl TextByteReader {
    /// Create a reader with no partial token.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            token: [0; MAX_TEXT_TOKEN_LEN],
            len: 0,
        }
    }

    /// Feed one character. Returns a byte when a token is completed.
    pub fn push(&mut self, ch: u8) -> Option<u8> {
        if ch.is_ascii_whitespace() {
            if self.len == 0 {
                return None;
            }
            let value = decimal_prefix(&self.token[..self.len]);
            self.len = 0;
            return Some(value);
        }

        if self.len >= MAX_TEXT_TOKEN_LEN {
            self.len = 0;
        }
        self.token[self.len] = ch;
        self.len += 1;
        None
    }

    /// Whether a partial token is buffered.
    #[inline]
    #[must_use]
    pub const fn has_partial(&self) -> bool {
        self.len > 0
    }

    /// Drop any partial token.
    pub fn reset(&mut self) {
        self.len = 0;
    }
}

/// Value of the leading decimal digits of `token`, modulo 256.
fn decimal_prefix(token: &[u8]) -> u8 {
    token
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .fold(0u8, |acc, &d| acc.wrapping_mul(10).wrapping_add(d - b'0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_u8() {
        let mut buf = [0u8; 3];

        let len = write_u8(&mut buf, 0);
        assert_eq!(&buf[..len], b"0");

        let len = write_u8(&mut buf, 7);
        assert_eq!(&buf[..len], b"7");

        let len = write_u8(&mut buf, 64);
        assert_eq!(&buf[..len], b"64");

        let len = write_u8(&mut buf, 255);
        assert_eq!(&buf[..len], b"255");
    }

    #[test]
    fn test_write_text_byte() {
        let mut buf = [0u8; MAX_TEXT_BYTE_LEN];
        let len = write_text_byte(&mut buf, 253);
        assert_eq!(&buf[..len], b"253 ");

        let len = write_text_byte(&mut buf, 0);
        assert_eq!(&buf[..len], b"0 ");
    }

    #[test]
    fn test_reader_tokens() {
        let mut reader = TextByteReader::new();
        let mut out = [0u8; 4];
        let mut n = 0;
        for &ch in b"255 1 0 16 " {
            if let Some(b) = reader.push(ch) {
                out[n] = b;
                n += 1;
            }
        }
        assert_eq!(&out[..n], &[255, 1, 0, 16]);
        assert!(!reader.has_partial());
    }

    #[test]
    fn test_reader_skips_empty_tokens_and_newlines() {
        let mut reader = TextByteReader::new();
        let mut got = None;
        for &ch in b"  \n\r 42\n" {
            if let Some(b) = reader.push(ch) {
                got = Some(b);
            }
        }
        assert_eq!(got, Some(42));
    }

    #[test]
    fn test_reader_truncates_to_byte() {
        let mut reader = TextByteReader::new();
        for &ch in b"300" {
            assert_eq!(reader.push(ch), None);
        }
        assert_eq!(reader.push(b' '), Some(44));
    }

    #[test]
    fn test_reader_stops_at_non_digit() {
        let mut reader = TextByteReader::new();
        for &ch in b"12x9" {
            reader.push(ch);
        }
        assert_eq!(reader.push(b' '), Some(12));
    }

    #[test]
    fn test_reader_drops_overlong_token() {
        let mut reader = TextByteReader::new();
        for &ch in b"123456789" {
            assert_eq!(reader.push(ch), None);
        }
        // ninth character restarted the token
        assert_eq!(reader.push(b' '), Some(9));
    }

    #[test]
    fn test_round_trip_all_values() {
        let mut reader = TextByteReader::new();
        for value in 0..=255u8 {
            let mut buf = [0u8; MAX_TEXT_BYTE_LEN];
            let len = write_text_byte(&mut buf, value);
            let mut out = None;
            for &ch in &buf[..len] {
                out = reader.push(ch);
            }
            assert_eq!(out, Some(value));
        }
    }
}
