//! # phpsess
//!
//! A decoder for PHP's `serialize()` value grammar and for the session
//! storage format built on top of it (the `php` session serialize handler).
//!
//! ## What does it decode?
//!
//! Everything PHP's serializer emits for plain data:
//!
//! - Scalars: null, booleans, 64-bit integers, doubles (including `NAN`,
//!   `INF` and `-INF`), raw and escaped byte strings
//! - Arrays, decoded to a dense list or an insertion-ordered map depending
//!   on their key set
//! - Class instances with public/protected/private properties, including
//!   the `C:` form for classes with custom encodings (built-in support for
//!   `ArrayObject`, extensible via a registry)
//! - Whole session payloads: `|`-delimited key/value segments with the `!`
//!   unset-variable sentinel
//!
//! Object back-references (`R:`/`r:`) are recognized but unsupported and
//! fail with [`DecodeError::Unsupported`]. Encoding (producing the wire
//! format) is out of scope.
//!
//! ## Quick Start
//!
//! ```rust
//! use phpsess::{decode_session, decode_value, PhpValue};
//!
//! // One standalone value
//! let value = decode_value(b"a:3:{i:0;i:1;i:1;i:2;i:2;i:3;}").unwrap();
//! assert_eq!(
//!     value,
//!     PhpValue::List(vec![PhpValue::Int(1), PhpValue::Int(2), PhpValue::Int(3)])
//! );
//!
//! // A whole session
//! let session = decode_session(b"foo|i:42;bar|s:5:\"hello\";").unwrap();
//! assert_eq!(session.get("foo").and_then(PhpValue::as_i64), Some(42));
//! assert_eq!(session.get("bar").and_then(PhpValue::as_str), Some("hello"));
//! ```
//!
//! ## Objects
//!
//! Property visibility is encoded in the serialized key (`\0*\0name` for
//! protected, `\0Owner\0name` for private). Decoded objects keep the three
//! buckets separate and resolve bare-name lookups in public, protected,
//! private order:
//!
//! ```rust
//! use phpsess::decode_value;
//!
//! let input = b"O:5:\"Thing\":2:{s:4:\"publ\";i:1;s:7:\"\x00*\x00prot\";i:2;}";
//! let value = decode_value(input).unwrap();
//! let thing = value.as_object().unwrap();
//! assert_eq!(thing.class_name(), "Thing");
//! assert_eq!(thing.get(b"prot").unwrap().as_i64(), Some(2));
//! ```
//!
//! ## Hostile input
//!
//! Decoding is single-pass, CPU-bound and allocation-capped. Containers
//! are decoded on a heap-allocated frame stack, so input nesting never
//! consumes call stack; nesting depth is still bounded (default 128
//! levels, configurable via [`DecodeOptions`]) and adversarial
//! deeply-nested input fails with [`DecodeError::DepthExceeded`].
//! Inputs are independently owned, so decoding distinct buffers from
//! multiple threads needs no coordination.
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - All reads are bounds-checked through a cursor
//! - No panics in the public API; every failure is a [`DecodeError`]
//!   carrying the byte offset where decoding stopped

pub mod cursor;
pub mod de;
pub mod error;
pub mod map;
pub mod object;
pub mod options;
pub mod registry;
pub mod ser;
pub mod session;
pub mod value;

pub use cursor::Cursor;
pub use de::Decoder;
pub use error::{DecodeError, Result};
pub use map::PhpMap;
pub use object::{PhpObject, OPAQUE_BODY_ATTRIBUTE};
pub use options::{DecodeOptions, DEFAULT_MAX_DEPTH};
pub use registry::{CustomDecodeFn, CustomRegistry};
pub use session::{Session, SESSION_DELIMITER, UNSET_MARKER};
pub use value::{ArrayKey, PhpBytes, PhpValue};

/// Alias for the crate's dynamic value type.
pub use value::PhpValue as Value;

/// Decodes exactly one serialized PHP value.
///
/// Trailing bytes after the value are a [`DecodeError::TrailingData`]
/// failure, never silently ignored.
///
/// # Examples
///
/// ```rust
/// use phpsess::{decode_value, PhpValue};
///
/// assert_eq!(decode_value(b"i:42;").unwrap(), PhpValue::Int(42));
/// assert!(decode_value(b"i:42;i:43;").is_err());
/// ```
///
/// # Errors
///
/// Returns a [`DecodeError`] if the input is not exactly one well-formed
/// serialized value.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode_value(input: &[u8]) -> Result<PhpValue> {
    decode_value_with_options(input, &DecodeOptions::default())
}

/// Decodes exactly one serialized PHP value with custom options.
///
/// # Examples
///
/// ```rust
/// use phpsess::{decode_value_with_options, DecodeOptions, DecodeError};
///
/// let options = DecodeOptions::new().with_max_depth(2);
/// let result = decode_value_with_options(b"a:1:{i:0;a:1:{i:0;i:1;}}", &options);
/// assert!(matches!(result, Err(DecodeError::DepthExceeded { .. })));
/// ```
///
/// # Errors
///
/// Returns a [`DecodeError`] if the input is not exactly one well-formed
/// serialized value within the configured bounds.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode_value_with_options(input: &[u8], options: &DecodeOptions) -> Result<PhpValue> {
    let mut decoder = Decoder::new(input, options);
    let value = decoder.decode_value()?;
    if decoder.cursor().is_at_end() {
        Ok(value)
    } else {
        Err(DecodeError::trailing_data(decoder.cursor().offset()))
    }
}

/// Decodes a whole session payload into an ordered name/value mapping.
///
/// # Examples
///
/// ```rust
/// use phpsess::{decode_session, PhpValue};
///
/// let session = decode_session(b"user|s:5:\"alice\";cart|a:0:{}").unwrap();
/// assert_eq!(session.get("user").and_then(PhpValue::as_str), Some("alice"));
/// assert!(session.get("cart").unwrap().as_list().unwrap().is_empty());
/// ```
///
/// # Errors
///
/// Returns a [`DecodeError`] if any value segment is malformed or if bytes
/// remain after the last complete pair.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode_session(input: &[u8]) -> Result<Session> {
    decode_session_with_options(input, &DecodeOptions::default())
}

/// Decodes a whole session payload with custom options.
///
/// # Errors
///
/// Returns a [`DecodeError`] if any value segment is malformed or if bytes
/// remain after the last complete pair.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode_session_with_options(input: &[u8], options: &DecodeOptions) -> Result<Session> {
    session::decode_session_bytes(input, options)
}
