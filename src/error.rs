//! Error types for PHP value and session decoding.
//!
//! Every failure carries the byte offset where decoding stopped, and most
//! variants include an expected-vs-actual description. All errors are
//! terminal for the current decode call: there is no partial result and no
//! local recovery.
//!
//! ## Examples
//!
//! ```rust
//! use phpsess::{decode_value, DecodeError};
//!
//! let result = decode_value(b"z:0;");
//! assert!(matches!(result, Err(DecodeError::UnknownType { .. })));
//! ```

use thiserror::Error;

/// Represents all possible errors produced while decoding a serialized PHP
/// value or session.
///
/// Offsets are byte positions into the input passed to the decode call. For
/// session decoding the offset is absolute within the whole session text,
/// not relative to the failing value segment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Malformed delimiter, sign, or digit sequence
    #[error("malformed input at offset {offset}: {msg}")]
    Format { offset: usize, msg: String },

    /// Input exhausted mid-token
    #[error("unexpected end of input at offset {offset}: expected {expected}")]
    UnexpectedEnd { offset: usize, expected: String },

    /// Unrecognized leading type tag
    #[error("unknown type tag 0x{tag:02x} at offset {offset}")]
    UnknownType { offset: usize, tag: u8 },

    /// A container key decoded to a non-string, non-integer value
    #[error("invalid container key at offset {offset}: {found}")]
    InvalidKey { offset: usize, found: String },

    /// Bytes remain after a value or session should have ended
    #[error("trailing data at offset {offset}")]
    TrailingData { offset: usize },

    /// A recognized but unsupported construct, currently the back-reference
    /// tags `R` and `r`
    #[error("unsupported feature at offset {offset}: {feature}")]
    Unsupported { offset: usize, feature: String },

    /// Nesting deeper than the configured bound
    #[error("nesting depth exceeded at offset {offset}: deeper than {max_depth} levels")]
    DepthExceeded { offset: usize, max_depth: usize },
}

impl DecodeError {
    /// Creates a format error for a malformed delimiter, sign, or digit
    /// sequence.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use phpsess::DecodeError;
    ///
    /// let err = DecodeError::format(7, "expected ';', got 'x'");
    /// assert!(err.to_string().contains("offset 7"));
    /// ```
    pub fn format(offset: usize, msg: impl Into<String>) -> Self {
        DecodeError::Format {
            offset,
            msg: msg.into(),
        }
    }

    /// Creates an unexpected end-of-input error.
    pub fn unexpected_end(offset: usize, expected: impl Into<String>) -> Self {
        DecodeError::UnexpectedEnd {
            offset,
            expected: expected.into(),
        }
    }

    /// Creates an unknown type tag error.
    pub fn unknown_type(offset: usize, tag: u8) -> Self {
        DecodeError::UnknownType { offset, tag }
    }

    /// Creates an invalid container key error.
    pub fn invalid_key(offset: usize, found: impl Into<String>) -> Self {
        DecodeError::InvalidKey {
            offset,
            found: found.into(),
        }
    }

    /// Creates a trailing data error.
    pub fn trailing_data(offset: usize) -> Self {
        DecodeError::TrailingData { offset }
    }

    /// Creates an unsupported feature error.
    pub fn unsupported(offset: usize, feature: impl Into<String>) -> Self {
        DecodeError::Unsupported {
            offset,
            feature: feature.into(),
        }
    }

    /// Creates a depth exceeded error.
    pub fn depth_exceeded(offset: usize, max_depth: usize) -> Self {
        DecodeError::DepthExceeded { offset, max_depth }
    }

    /// Returns the byte offset at which decoding failed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use phpsess::DecodeError;
    ///
    /// assert_eq!(DecodeError::trailing_data(12).offset(), 12);
    /// ```
    #[must_use]
    pub fn offset(&self) -> usize {
        match self {
            DecodeError::Format { offset, .. }
            | DecodeError::UnexpectedEnd { offset, .. }
            | DecodeError::UnknownType { offset, .. }
            | DecodeError::InvalidKey { offset, .. }
            | DecodeError::TrailingData { offset }
            | DecodeError::Unsupported { offset, .. }
            | DecodeError::DepthExceeded { offset, .. } => *offset,
        }
    }

    /// Shifts the carried offset by `base`.
    ///
    /// Session decoding parses each value segment through a cursor that
    /// starts at the segment, then rebases the resulting offset so callers
    /// always see positions into the full input.
    pub(crate) fn offset_by(self, base: usize) -> Self {
        match self {
            DecodeError::Format { offset, msg } => DecodeError::Format {
                offset: offset + base,
                msg,
            },
            DecodeError::UnexpectedEnd { offset, expected } => DecodeError::UnexpectedEnd {
                offset: offset + base,
                expected,
            },
            DecodeError::UnknownType { offset, tag } => DecodeError::UnknownType {
                offset: offset + base,
                tag,
            },
            DecodeError::InvalidKey { offset, found } => DecodeError::InvalidKey {
                offset: offset + base,
                found,
            },
            DecodeError::TrailingData { offset } => DecodeError::TrailingData {
                offset: offset + base,
            },
            DecodeError::Unsupported { offset, feature } => DecodeError::Unsupported {
                offset: offset + base,
                feature,
            },
            DecodeError::DepthExceeded { offset, max_depth } => DecodeError::DepthExceeded {
                offset: offset + base,
                max_depth,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;
