//! PHP session storage decoding.
//!
//! The `php` session serialize handler stores a sequence of
//! `<key>|<value>` segments, where each value uses the same grammar as
//! standalone serialized values. A `!` in value position is the "unset
//! variable" sentinel and stands for a registered variable with no value.
//!
//! Keys are taken verbatim (no escaping exists, so a key can never contain
//! `|`). Decoding fails with `TrailingData` if any input bytes remain after
//! the last complete pair.
//!
//! ## Examples
//!
//! ```rust
//! use phpsess::{decode_session, PhpValue};
//!
//! let session = decode_session(b"count|i:3;user|s:5:\"alice\";").unwrap();
//! assert_eq!(session.len(), 2);
//! assert_eq!(session.get("count").and_then(PhpValue::as_i64), Some(3));
//! assert_eq!(session.get("user").and_then(PhpValue::as_str), Some("alice"));
//! ```

use crate::de::Decoder;
use crate::error::{DecodeError, Result};
use crate::options::DecodeOptions;
use crate::value::{PhpBytes, PhpValue};
use indexmap::IndexMap;

/// Separator between a session key and its value.
pub const SESSION_DELIMITER: u8 = b'|';

/// Sentinel in value position marking an unset session variable.
pub const UNSET_MARKER: u8 = b'!';

/// An ordered mapping of session variable names to decoded values.
///
/// Iteration order is the order keys appear in the session text. A key
/// serialized twice keeps its first position with its last value.
///
/// # Examples
///
/// ```rust
/// use phpsess::decode_session;
///
/// let session = decode_session(b"a|i:1;b|i:2;").unwrap();
/// let keys: Vec<_> = session.keys().map(|k| k.to_string()).collect();
/// assert_eq!(keys, vec!["a", "b"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session(IndexMap<PhpBytes, PhpValue>);

impl Session {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Session(IndexMap::new())
    }

    /// Returns the value for a session variable.
    #[must_use]
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&PhpValue> {
        self.0.get(key.as_ref())
    }

    /// Returns `true` if the session contains `key`.
    #[must_use]
    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> bool {
        self.0.contains_key(key.as_ref())
    }

    /// Returns the number of session variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the session holds no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the variable names, in input order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, PhpBytes, PhpValue> {
        self.0.keys()
    }

    /// Returns an iterator over the name-value pairs, in input order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, PhpBytes, PhpValue> {
        self.0.iter()
    }

    fn insert(&mut self, key: PhpBytes, value: PhpValue) {
        self.0.insert(key, value);
    }
}

impl IntoIterator for Session {
    type Item = (PhpBytes, PhpValue);
    type IntoIter = indexmap::map::IntoIter<PhpBytes, PhpValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Session {
    type Item = (&'a PhpBytes, &'a PhpValue);
    type IntoIter = indexmap::map::Iter<'a, PhpBytes, PhpValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Splits session text into key/value segments and decodes each value.
///
/// Scans forward for the next `|`; bytes before it are the key. If the byte
/// after the delimiter is `!` the variable is unset (`Null`, one byte
/// consumed), otherwise exactly one value is decoded there. Repeats until
/// the input is consumed exactly; a key with no delimiter left is a
/// `TrailingData` failure.
pub(crate) fn decode_session_bytes(input: &[u8], options: &DecodeOptions) -> Result<Session> {
    let mut session = Session::new();
    let mut pos = 0;

    while pos < input.len() {
        let delim = match input[pos..].iter().position(|&b| b == SESSION_DELIMITER) {
            Some(found) => pos + found,
            None => return Err(DecodeError::trailing_data(pos)),
        };
        let key = PhpBytes::from(&input[pos..delim]);

        let value_start = delim + 1;
        if input.get(value_start) == Some(&UNSET_MARKER) {
            session.insert(key, PhpValue::Null);
            pos = value_start + 1;
        } else {
            let mut decoder = Decoder::new(&input[value_start..], options);
            let value = decoder
                .decode_value()
                .map_err(|e| e.offset_by(value_start))?;
            pos = value_start + decoder.cursor().offset();
            session.insert(key, value);
        }
    }

    Ok(session)
}
