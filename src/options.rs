//! Configuration options for decoding.
//!
//! [`DecodeOptions`] bundles the nesting-depth bound and the custom-class
//! registry. The defaults suit almost every caller; options exist for
//! hostile-input hardening and for classes with bespoke encodings.
//!
//! ## Examples
//!
//! ```rust
//! use phpsess::{decode_value_with_options, DecodeOptions};
//!
//! // Tighten the depth bound for untrusted input
//! let options = DecodeOptions::new().with_max_depth(8);
//! let deep = b"a:1:{i:0;a:1:{i:0;a:1:{i:0;i:1;}}}";
//! assert!(decode_value_with_options(deep, &options).is_ok());
//! ```

use crate::registry::{CustomDecodeFn, CustomRegistry};
use crate::{de::Decoder, error::Result, object::PhpObject, value::PhpBytes};

/// Default bound on value nesting depth.
///
/// Container frames live on the heap, so the bound caps the memory an
/// adversarial deeply-nested input can pin, not the call stack.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Configuration for [`decode_value`](crate::decode_value) and
/// [`decode_session`](crate::decode_session).
///
/// # Examples
///
/// ```rust
/// use phpsess::DecodeOptions;
///
/// let options = DecodeOptions::new().with_max_depth(32);
/// assert_eq!(options.max_depth(), 32);
/// ```
#[derive(Debug)]
pub struct DecodeOptions {
    max_depth: usize,
    registry: CustomRegistry,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            registry: CustomRegistry::default(),
        }
    }
}

impl DecodeOptions {
    /// Creates default options: depth bound of [`DEFAULT_MAX_DEPTH`] and a
    /// registry containing the built-in `ArrayObject` decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum value nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Replaces the custom-class registry.
    ///
    /// Use [`CustomRegistry::empty`] to treat every `C:` payload as opaque.
    #[must_use]
    pub fn with_registry(mut self, registry: CustomRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Registers a custom decode hook for one class on top of the current
    /// registry.
    #[must_use]
    pub fn with_custom_decoder(
        mut self,
        class_name: impl Into<PhpBytes>,
        decoder: impl Fn(&mut Decoder<'_, '_>) -> Result<PhpObject> + Send + Sync + 'static,
    ) -> Self {
        self.registry.register(class_name, decoder);
        self
    }

    /// Returns the configured depth bound.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns the hook registered for `class_name`, if any.
    pub(crate) fn custom_decoder(&self, class_name: &[u8]) -> Option<&CustomDecodeFn> {
        self.registry.get(class_name)
    }
}
