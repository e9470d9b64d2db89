//! Custom decoders for classes with bespoke wire encodings.
//!
//! PHP classes implementing the `Serializable` interface emit an opaque
//! body behind the `C:` tag. Most of them can only be kept verbatim, but a
//! few well-known classes have a structured body worth decoding; this
//! module maps class names to specialized decode hooks for them.
//!
//! A hook receives the in-flight [`Decoder`] and may consume as much of the
//! body as its format requires, returning a fully-formed [`PhpObject`].
//! Registering a new class is independent of the core tag dispatcher.
//!
//! The default registry knows one class, `ArrayObject`.
//!
//! ## Examples
//!
//! ```rust
//! use phpsess::{
//!     decode_value_with_options, DecodeOptions, PhpBytes, PhpObject, PhpValue,
//! };
//!
//! let options = DecodeOptions::new().with_custom_decoder("Wrapped", |dec| {
//!     let inner = dec.decode_value()?;
//!     Ok(PhpObject::from_entries(
//!         "Wrapped",
//!         vec![(PhpBytes::from("inner"), inner)],
//!     ))
//! });
//!
//! let value = decode_value_with_options(b"C:7:\"Wrapped\":5:{i:42;}", &options).unwrap();
//! let object = value.as_object().unwrap();
//! assert_eq!(object.get(b"inner"), Some(&PhpValue::Int(42)));
//! ```

use crate::de::Decoder;
use crate::error::{DecodeError, Result};
use crate::object::PhpObject;
use crate::value::{PhpBytes, PhpValue};
use indexmap::IndexMap;
use std::fmt;

/// A decode hook for one registered class.
pub type CustomDecodeFn = Box<dyn Fn(&mut Decoder<'_, '_>) -> Result<PhpObject> + Send + Sync>;

/// Class-name-keyed table of custom decode hooks.
pub struct CustomRegistry {
    decoders: IndexMap<PhpBytes, CustomDecodeFn>,
}

impl CustomRegistry {
    /// Creates a registry with no entries; every `C:` payload then decodes
    /// to its opaque body.
    #[must_use]
    pub fn empty() -> Self {
        CustomRegistry {
            decoders: IndexMap::new(),
        }
    }

    /// Registers a decode hook for `class_name`, replacing any previous
    /// hook for that class.
    pub fn register(
        &mut self,
        class_name: impl Into<PhpBytes>,
        decoder: impl Fn(&mut Decoder<'_, '_>) -> Result<PhpObject> + Send + Sync + 'static,
    ) {
        self.decoders.insert(class_name.into(), Box::new(decoder));
    }

    /// Returns the hook registered for `class_name`, if any.
    #[must_use]
    pub fn get(&self, class_name: &[u8]) -> Option<&CustomDecodeFn> {
        self.decoders.get(class_name)
    }

    /// Returns `true` if a hook is registered for `class_name`.
    #[must_use]
    pub fn contains(&self, class_name: &[u8]) -> bool {
        self.decoders.contains_key(class_name)
    }
}

impl Default for CustomRegistry {
    fn default() -> Self {
        let mut registry = CustomRegistry::empty();
        registry.register("ArrayObject", decode_array_object);
        registry
    }
}

impl fmt::Debug for CustomRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomRegistry")
            .field("classes", &self.decoders.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Decodes the structured body of a serialized `ArrayObject`.
///
/// The body is `x:<flags>` followed by either the backing array/object or
/// nothing (the next byte is already the `m` of the members field), then
/// `;m:<members>`.
fn decode_array_object(dec: &mut Decoder<'_, '_>) -> Result<PhpObject> {
    dec.cursor_mut().expect_bytes(b"x:")?;
    let flags = dec.decode_value()?;

    // Peek the next tag to decide whether a backing array is present; only
    // an array or object tag is legal in that slot
    let tag_offset = dec.cursor().offset();
    let tag = dec.cursor_mut().read_byte()?;
    dec.cursor_mut().rewind();
    let array = match tag {
        b'm' => PhpValue::Null,
        b'a' | b'O' | b'C' => dec.decode_value()?,
        other => {
            return Err(DecodeError::format(
                tag_offset,
                format!(
                    "ArrayObject: expected 'm', array or object, got '{}'",
                    (other as char).escape_default()
                ),
            ))
        }
    };
    dec.cursor_mut().expect(b';')?;

    dec.cursor_mut().expect_bytes(b"m:")?;
    let members = dec.decode_value()?;

    Ok(PhpObject::from_entries(
        "ArrayObject",
        vec![
            (PhpBytes::from("flags"), flags),
            (PhpBytes::from("array"), array),
            (PhpBytes::from("members"), members),
        ],
    ))
}
