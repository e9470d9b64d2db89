//! Forward-only byte cursor and primitive integer readers.
//!
//! [`Cursor`] is the single source of input for the whole decoder: bounded
//! reads, single-byte peek, a one-step rewind (needed by the `ArrayObject`
//! hook, which looks at the next tag before deciding how to proceed), and
//! the current offset for diagnostics. The signed/unsigned integer readers
//! implement the `<sign?><digits><end-char>` micro-grammar shared by every
//! numeric field in the wire format.

use crate::error::{DecodeError, Result};

/// A forward-only reader over an input byte buffer.
///
/// All grammar-level reads go through this type so that every error carries
/// the offset where decoding stopped.
///
/// # Examples
///
/// ```rust
/// use phpsess::Cursor;
///
/// let mut cursor = Cursor::new(b"i:42;");
/// assert_eq!(cursor.read_byte().unwrap(), b'i');
/// cursor.expect(b':').unwrap();
/// assert_eq!(cursor.read_signed(b';').unwrap(), 42);
/// assert!(cursor.is_at_end());
/// ```
#[derive(Debug)]
pub struct Cursor<'a> {
    input: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor positioned at the start of `input`.
    #[must_use]
    pub fn new(input: &'a [u8]) -> Self {
        Cursor { input, offset: 0 }
    }

    /// Returns the current byte offset into the input.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns `true` if every input byte has been consumed.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.offset >= self.input.len()
    }

    /// Returns the next byte without consuming it, or `None` at end of
    /// input.
    #[must_use]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.offset).copied()
    }

    /// Steps the cursor back by exactly one byte.
    ///
    /// Only meaningful directly after a successful read; the cursor never
    /// rewinds past the start of the input.
    pub fn rewind(&mut self) {
        self.offset = self.offset.saturating_sub(1);
    }

    /// Reads exactly `n` bytes, failing with `UnexpectedEnd` if fewer
    /// remain.
    pub fn read(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.offset.checked_add(n).filter(|&end| end <= self.input.len());
        match end {
            Some(end) => {
                let bytes = &self.input[self.offset..end];
                self.offset = end;
                Ok(bytes)
            }
            None => Err(DecodeError::unexpected_end(
                self.input.len(),
                format!("{} more byte(s)", n - (self.input.len() - self.offset)),
            )),
        }
    }

    /// Reads a single byte.
    pub fn read_byte(&mut self) -> Result<u8> {
        match self.input.get(self.offset) {
            Some(&byte) => {
                self.offset += 1;
                Ok(byte)
            }
            None => Err(DecodeError::unexpected_end(self.offset, "1 more byte")),
        }
    }

    /// Consumes one byte and checks that it equals `expected`.
    pub fn expect(&mut self, expected: u8) -> Result<()> {
        let offset = self.offset;
        let actual = self.read_byte().map_err(|_| {
            DecodeError::unexpected_end(offset, format!("'{}'", (expected as char).escape_default()))
        })?;
        if actual == expected {
            Ok(())
        } else {
            Err(DecodeError::format(
                offset,
                format!(
                    "expected '{}', got '{}'",
                    (expected as char).escape_default(),
                    (actual as char).escape_default()
                ),
            ))
        }
    }

    /// Consumes `expected.len()` bytes and checks them against `expected`.
    pub fn expect_bytes(&mut self, expected: &[u8]) -> Result<()> {
        for &byte in expected {
            self.expect(byte)?;
        }
        Ok(())
    }

    /// Reads a signed decimal integer terminated by `end`.
    ///
    /// An optional leading `+` or `-` is followed by zero or more digits;
    /// the terminator must then be consumed exactly. Mirrors PHP's
    /// permissive integer scanner, so an empty digit run parses as zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use phpsess::Cursor;
    ///
    /// assert_eq!(Cursor::new(b"-30;").read_signed(b';').unwrap(), -30);
    /// assert_eq!(Cursor::new(b"+7:").read_signed(b':').unwrap(), 7);
    /// assert!(Cursor::new(b"12x").read_signed(b';').is_err());
    /// ```
    pub fn read_signed(&mut self, end: u8) -> Result<i64> {
        let mut c = self.read_byte()?;
        let negative = match c {
            b'-' => {
                c = self.read_byte()?;
                true
            }
            b'+' => {
                c = self.read_byte()?;
                false
            }
            _ => false,
        };

        // The magnitude is accumulated unsigned so that the full i64 range
        // decodes, including i64::MIN whose magnitude exceeds i64::MAX
        let magnitude = self.read_digits(&mut c, end)?;
        if negative {
            if magnitude > i64::MAX as u64 + 1 {
                return Err(DecodeError::format(self.offset - 1, "integer overflow"));
            }
            Ok((magnitude as i64).wrapping_neg())
        } else {
            i64::try_from(magnitude)
                .map_err(|_| DecodeError::format(self.offset - 1, "integer overflow"))
        }
    }

    /// Reads an unsigned decimal integer terminated by `end`.
    ///
    /// An optional leading `+` is ignored; a `-` sign is not accepted.
    pub fn read_unsigned(&mut self, end: u8) -> Result<u64> {
        let mut c = self.read_byte()?;
        if c == b'+' {
            c = self.read_byte()?;
        }
        self.read_digits(&mut c, end)
    }

    /// Accumulates decimal digits starting from `*c` until `end` is
    /// consumed. Any other terminator is a format error.
    fn read_digits(&mut self, c: &mut u8, end: u8) -> Result<u64> {
        let mut value: u64 = 0;
        while c.is_ascii_digit() {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add((*c - b'0') as u64))
                .ok_or_else(|| DecodeError::format(self.offset, "integer overflow"))?;
            *c = self.read_byte()?;
        }
        if *c == end {
            Ok(value)
        } else {
            Err(DecodeError::format(
                self.offset - 1,
                format!(
                    "expected '{}', got '{}'",
                    (end as char).escape_default(),
                    (*c as char).escape_default()
                ),
            ))
        }
    }
}
