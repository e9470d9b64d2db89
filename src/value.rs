//! Dynamic value representation for decoded PHP data.
//!
//! This module provides [`PhpValue`], the tagged union every decode call
//! produces, plus the two supporting types the wire grammar needs:
//!
//! - [`PhpBytes`]: a raw byte string. PHP strings are byte-counted and may
//!   contain any byte including NUL, so they cannot be held in a `String`
//!   without loss.
//! - [`ArrayKey`]: PHP array keys are either integers or byte strings;
//!   nothing else is legal.
//!
//! Decoded trees are immutable once returned: the decoder builds a single
//! owned tree and hands it to the caller.
//!
//! ## Examples
//!
//! ```rust
//! use phpsess::{decode_value, PhpValue};
//!
//! let value = decode_value(b"a:2:{i:0;i:10;i:1;i:20;}").unwrap();
//! match value {
//!     PhpValue::List(items) => assert_eq!(items.len(), 2),
//!     _ => panic!("expected list"),
//! }
//! ```

use crate::map::PhpMap;
use crate::object::PhpObject;
use std::borrow::Borrow;
use std::fmt;

/// A raw PHP byte string.
///
/// Lengths in the wire format count bytes, not characters, and embedded
/// control bytes (including NUL, which carries property-visibility markers)
/// are legal. Accessors are provided for the common case where the content
/// happens to be UTF-8.
///
/// # Examples
///
/// ```rust
/// use phpsess::PhpBytes;
///
/// let text = PhpBytes::from("hello");
/// assert_eq!(text.as_str(), Some("hello"));
///
/// let binary = PhpBytes::from(&b"bin\x00\x01"[..]);
/// assert_eq!(binary.len(), 5);
/// assert_eq!(binary.as_str(), None);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PhpBytes(Vec<u8>);

impl PhpBytes {
    /// Creates an empty byte string.
    #[must_use]
    pub fn new() -> Self {
        PhpBytes(Vec::new())
    }

    /// Returns the raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the content as `&str` if it is valid UTF-8.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// Returns the content as a string, replacing invalid UTF-8 sequences
    /// with U+FFFD.
    #[must_use]
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }

    /// Returns the length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the byte string is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the byte string and returns the underlying vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl fmt::Debug for PhpBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b\"{}\"", self.0.escape_ascii())
    }
}

impl fmt::Display for PhpBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl Borrow<[u8]> for PhpBytes {
    fn borrow(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for PhpBytes {
    fn from(bytes: Vec<u8>) -> Self {
        PhpBytes(bytes)
    }
}

impl From<&[u8]> for PhpBytes {
    fn from(bytes: &[u8]) -> Self {
        PhpBytes(bytes.to_vec())
    }
}

impl From<&str> for PhpBytes {
    fn from(text: &str) -> Self {
        PhpBytes(text.as_bytes().to_vec())
    }
}

impl From<String> for PhpBytes {
    fn from(text: String) -> Self {
        PhpBytes(text.into_bytes())
    }
}

impl PartialEq<[u8]> for PhpBytes {
    fn eq(&self, other: &[u8]) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PhpBytes {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<str> for PhpBytes {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

/// A PHP array key: an integer or a byte string.
///
/// The decoder rejects any container key that is not one of these two
/// shapes with [`DecodeError::InvalidKey`](crate::DecodeError::InvalidKey).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ArrayKey {
    Int(i64),
    Str(PhpBytes),
}

impl ArrayKey {
    /// Returns the integer key, if this is an integer key.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ArrayKey::Int(i) => Some(*i),
            ArrayKey::Str(_) => None,
        }
    }

    /// Returns the string key, if this is a string key.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&PhpBytes> {
        match self {
            ArrayKey::Int(_) => None,
            ArrayKey::Str(bytes) => Some(bytes),
        }
    }

    /// Converts the key into the byte string PHP would use for an object
    /// property name (integer keys render in decimal).
    #[must_use]
    pub fn into_property_name(self) -> PhpBytes {
        match self {
            ArrayKey::Int(i) => PhpBytes::from(i.to_string()),
            ArrayKey::Str(bytes) => bytes,
        }
    }
}

impl fmt::Display for ArrayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayKey::Int(i) => write!(f, "{}", i),
            ArrayKey::Str(bytes) => write!(f, "{}", bytes),
        }
    }
}

impl From<i64> for ArrayKey {
    fn from(key: i64) -> Self {
        ArrayKey::Int(key)
    }
}

impl From<i32> for ArrayKey {
    fn from(key: i32) -> Self {
        ArrayKey::Int(key as i64)
    }
}

impl From<&str> for ArrayKey {
    fn from(key: &str) -> Self {
        ArrayKey::Str(PhpBytes::from(key))
    }
}

impl From<PhpBytes> for ArrayKey {
    fn from(key: PhpBytes) -> Self {
        ArrayKey::Str(key)
    }
}

/// A dynamically-typed representation of any decodable PHP value.
///
/// Arrays decode to [`PhpValue::List`] when the set of keys is exactly
/// `{0, …, N-1}` (pair order preserved, regardless of key order) and to
/// [`PhpValue::Map`] otherwise.
///
/// # Examples
///
/// ```rust
/// use phpsess::{decode_value, PhpValue};
///
/// assert_eq!(decode_value(b"N;").unwrap(), PhpValue::Null);
/// assert_eq!(decode_value(b"b:1;").unwrap(), PhpValue::Bool(true));
/// assert_eq!(decode_value(b"i:42;").unwrap(), PhpValue::Int(42));
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum PhpValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    /// IEEE-754 double; NaN, `+Infinity` and `-Infinity` are representable
    /// (PHP serializes them as `NAN`, `INF` and `-INF`).
    Float(f64),
    Bytes(PhpBytes),
    List(Vec<PhpValue>),
    Map(PhpMap),
    Object(PhpObject),
}

impl PhpValue {
    /// Returns `true` if this value is `Null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, PhpValue::Null)
    }

    /// Returns the boolean if this value is a `Bool`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PhpValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer if this value is an `Int`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use phpsess::decode_value;
    ///
    /// assert_eq!(decode_value(b"i:-30;").unwrap().as_i64(), Some(-30));
    /// assert_eq!(decode_value(b"N;").unwrap().as_i64(), None);
    /// ```
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PhpValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the float if this value is a `Float`; integers are widened.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PhpValue::Float(f) => Some(*f),
            PhpValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Returns the byte string if this value is `Bytes`.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&PhpBytes> {
        match self {
            PhpValue::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Returns the content as `&str` if this value is `Bytes` holding valid
    /// UTF-8.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(PhpBytes::as_str)
    }

    /// Returns the element slice if this value is a `List`.
    #[must_use]
    pub fn as_list(&self) -> Option<&[PhpValue]> {
        match self {
            PhpValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the map if this value is a `Map`.
    #[must_use]
    pub fn as_map(&self) -> Option<&PhpMap> {
        match self {
            PhpValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the object if this value is an `Object`.
    #[must_use]
    pub fn as_object(&self) -> Option<&PhpObject> {
        match self {
            PhpValue::Object(object) => Some(object),
            _ => None,
        }
    }
}

impl From<bool> for PhpValue {
    fn from(value: bool) -> Self {
        PhpValue::Bool(value)
    }
}

impl From<i64> for PhpValue {
    fn from(value: i64) -> Self {
        PhpValue::Int(value)
    }
}

impl From<f64> for PhpValue {
    fn from(value: f64) -> Self {
        PhpValue::Float(value)
    }
}

impl From<&str> for PhpValue {
    fn from(value: &str) -> Self {
        PhpValue::Bytes(PhpBytes::from(value))
    }
}

impl From<PhpBytes> for PhpValue {
    fn from(value: PhpBytes) -> Self {
        PhpValue::Bytes(value)
    }
}

impl From<Vec<PhpValue>> for PhpValue {
    fn from(value: Vec<PhpValue>) -> Self {
        PhpValue::List(value)
    }
}
