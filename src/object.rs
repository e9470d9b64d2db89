//! Decoded PHP class instances and their visibility buckets.
//!
//! Serialized property names carry the declaring scope inline: a key that
//! begins with a NUL byte encodes `\0<owner>\0<name>`, where an owner of
//! `*` marks a protected property and any other owner is the declaring
//! class of a private property. Keys without a leading NUL are public.
//!
//! [`PhpObject`] classifies every decoded property into one of three
//! disjoint buckets and also retains the full flat pair list, so nothing
//! about the wire encoding is lost.
//!
//! ## Examples
//!
//! ```rust
//! use phpsess::decode_value;
//!
//! let input = b"O:5:\"Thing\":2:{s:4:\"publ\";i:1;s:7:\"\x00*\x00prot\";i:2;}";
//! let value = decode_value(input).unwrap();
//! let thing = value.as_object().unwrap();
//!
//! assert_eq!(thing.class_name(), "Thing");
//! assert_eq!(thing.get(b"publ").unwrap().as_i64(), Some(1));
//! assert_eq!(thing.get(b"prot").unwrap().as_i64(), Some(2));
//! ```

use crate::value::{PhpBytes, PhpValue};
use indexmap::IndexMap;

/// Attribute name used for the raw payload of an unregistered `C:` class.
pub const OPAQUE_BODY_ATTRIBUTE: &str = "_serialized";

/// A decoded PHP object: class name plus visibility-classified properties.
///
/// Bare-name lookup via [`PhpObject::get`] follows PHP's attribute
/// resolution order: public first, then protected, then the first private
/// property whose name matches. When several ancestor classes declare a
/// private property of the same name, the first one decoded wins; which
/// ancestor that is depends on the serializer's emission order.
#[derive(Debug, Clone, PartialEq)]
pub struct PhpObject {
    class_name: PhpBytes,
    entries: Vec<(PhpBytes, PhpValue)>,
    public: IndexMap<PhpBytes, PhpValue>,
    protected: IndexMap<PhpBytes, PhpValue>,
    private: IndexMap<(PhpBytes, PhpBytes), PhpValue>,
}

impl PhpObject {
    /// Builds an object from decoded property pairs, classifying each key
    /// into its visibility bucket.
    ///
    /// Duplicate keys within a bucket follow last-write-wins, while the
    /// flat entry list keeps every decoded pair.
    #[must_use]
    pub fn from_entries(
        class_name: impl Into<PhpBytes>,
        entries: Vec<(PhpBytes, PhpValue)>,
    ) -> Self {
        let mut object = PhpObject {
            class_name: class_name.into(),
            entries: Vec::with_capacity(entries.len()),
            public: IndexMap::new(),
            protected: IndexMap::new(),
            private: IndexMap::new(),
        };

        for (key, value) in entries {
            match split_visibility_marker(key.as_bytes()) {
                Visibility::Public => {
                    object.public.insert(key.clone(), value.clone());
                }
                Visibility::Protected(name) => {
                    object.protected.insert(PhpBytes::from(name), value.clone());
                }
                Visibility::Private(owner, name) => {
                    object
                        .private
                        .insert((PhpBytes::from(owner), PhpBytes::from(name)), value.clone());
                }
            }
            object.entries.push((key, value));
        }

        object
    }

    /// Builds an object holding the verbatim payload of a `C:` encoded
    /// class with no registered custom decoder.
    #[must_use]
    pub fn with_opaque_body(class_name: impl Into<PhpBytes>, body: impl Into<PhpBytes>) -> Self {
        PhpObject::from_entries(
            class_name,
            vec![(
                PhpBytes::from(OPAQUE_BODY_ATTRIBUTE),
                PhpValue::Bytes(body.into()),
            )],
        )
    }

    /// Returns the class name.
    #[must_use]
    pub fn class_name(&self) -> &PhpBytes {
        &self.class_name
    }

    /// Returns the full flat list of decoded property pairs, with
    /// visibility markers still present in the keys.
    #[must_use]
    pub fn entries(&self) -> &[(PhpBytes, PhpValue)] {
        &self.entries
    }

    /// Looks up a property by bare name.
    ///
    /// Precedence is public, then protected, then the first private
    /// property with a matching name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use phpsess::{PhpBytes, PhpObject, PhpValue};
    ///
    /// let object = PhpObject::from_entries(
    ///     "Thing",
    ///     vec![(PhpBytes::from("\x00Thing\x00priv"), PhpValue::Int(3))],
    /// );
    /// assert_eq!(object.get(b"priv"), Some(&PhpValue::Int(3)));
    /// assert_eq!(object.get(b"missing"), None);
    /// ```
    #[must_use]
    pub fn get(&self, name: &[u8]) -> Option<&PhpValue> {
        if let Some(value) = self.public.get(name) {
            return Some(value);
        }
        if let Some(value) = self.protected.get(name) {
            return Some(value);
        }
        self.private
            .iter()
            .find(|((_, prop), _)| prop.as_bytes() == name)
            .map(|(_, value)| value)
    }

    /// Returns the public property bucket.
    #[must_use]
    pub fn public(&self) -> &IndexMap<PhpBytes, PhpValue> {
        &self.public
    }

    /// Returns the protected property bucket, keyed by bare name.
    #[must_use]
    pub fn protected(&self) -> &IndexMap<PhpBytes, PhpValue> {
        &self.protected
    }

    /// Returns the private property bucket, keyed by declaring class and
    /// bare name.
    #[must_use]
    pub fn private(&self) -> &IndexMap<(PhpBytes, PhpBytes), PhpValue> {
        &self.private
    }

    /// Looks up a private property declared by a specific class.
    #[must_use]
    pub fn get_private(&self, owner: &[u8], name: &[u8]) -> Option<&PhpValue> {
        self.private
            .iter()
            .find(|((o, n), _)| o.as_bytes() == owner && n.as_bytes() == name)
            .map(|(_, value)| value)
    }
}

enum Visibility<'a> {
    Public,
    Protected(&'a [u8]),
    Private(&'a [u8], &'a [u8]),
}

/// Splits a serialized property key on its NUL visibility marker.
///
/// A key with a leading NUL but no second NUL keeps the whole remainder as
/// the owner and an empty property name, matching the reference decoder's
/// partition semantics.
fn split_visibility_marker(key: &[u8]) -> Visibility<'_> {
    match key.first() {
        Some(&0) => {
            let rest = &key[1..];
            match rest.iter().position(|&b| b == 0) {
                Some(split) => {
                    let (owner, name) = (&rest[..split], &rest[split + 1..]);
                    if owner == b"*" {
                        Visibility::Protected(name)
                    } else {
                        Visibility::Private(owner, name)
                    }
                }
                None => Visibility::Private(rest, b""),
            }
        }
        _ => Visibility::Public,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &[u8], value: i64) -> (PhpBytes, PhpValue) {
        (PhpBytes::from(key), PhpValue::Int(value))
    }

    #[test]
    fn test_bucket_classification() {
        let object = PhpObject::from_entries(
            "Thing",
            vec![
                entry(b"publ", 1),
                entry(b"\x00*\x00prot", 2),
                entry(b"\x00Thing\x00priv", 3),
            ],
        );

        assert_eq!(object.public().len(), 1);
        assert_eq!(object.protected().len(), 1);
        assert_eq!(object.private().len(), 1);
        assert_eq!(object.entries().len(), 3);

        assert_eq!(object.get(b"publ"), Some(&PhpValue::Int(1)));
        assert_eq!(object.get(b"prot"), Some(&PhpValue::Int(2)));
        assert_eq!(object.get(b"priv"), Some(&PhpValue::Int(3)));
        assert_eq!(object.get_private(b"Thing", b"priv"), Some(&PhpValue::Int(3)));
        assert_eq!(object.get_private(b"Other", b"priv"), None);
    }

    #[test]
    fn test_lookup_precedence() {
        // Same bare name in all three buckets: public wins, then protected
        let object = PhpObject::from_entries(
            "Thing",
            vec![
                entry(b"\x00Thing\x00name", 3),
                entry(b"\x00*\x00name", 2),
                entry(b"name", 1),
            ],
        );
        assert_eq!(object.get(b"name"), Some(&PhpValue::Int(1)));

        let object = PhpObject::from_entries(
            "Thing",
            vec![entry(b"\x00Thing\x00name", 3), entry(b"\x00*\x00name", 2)],
        );
        assert_eq!(object.get(b"name"), Some(&PhpValue::Int(2)));
    }

    #[test]
    fn test_first_private_match_wins() {
        let object = PhpObject::from_entries(
            "Child",
            vec![entry(b"\x00Parent\x00secret", 1), entry(b"\x00Child\x00secret", 2)],
        );
        assert_eq!(object.get(b"secret"), Some(&PhpValue::Int(1)));
    }

    #[test]
    fn test_marker_without_second_nul() {
        let object = PhpObject::from_entries("Odd", vec![entry(b"\x00Orphan", 9)]);
        assert!(object.public().is_empty());
        assert_eq!(object.get_private(b"Orphan", b""), Some(&PhpValue::Int(9)));
    }
}
