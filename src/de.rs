//! Decoder for PHP's `serialize()` value grammar.
//!
//! One encoded value is one type tag, a delimiter, and a tag-specific body:
//!
//! ```text
//! N;              null
//! b:1;            boolean
//! i:-30;          integer
//! d:3.141592;     double (also NAN, INF, -INF)
//! s:6:"string";   raw byte string, byte-counted
//! S:5:"bin\00\01";escaped byte string
//! a:2:{...}       array (list or map, see below)
//! o:1:"...}       stdClass instance
//! O:5:"Thing":1:{...}   class instance
//! C:11:"ArrayObject":45:{...}   class with custom encoding
//! R:1; / r:1;     back-reference (recognized, unsupported)
//! ```
//!
//! Arrays whose decoded key set is exactly `{0, …, N-1}` become
//! [`PhpValue::List`] in original pair order; anything else becomes
//! [`PhpValue::Map`].
//!
//! Containers are decoded iteratively on an explicit frame stack, so input
//! nesting never translates into call-stack recursion: the configured depth
//! bound limits memory, not stack safety.
//!
//! [`Decoder`] consumes exactly one encoded value per [`Decoder::decode_value`]
//! call and leaves the cursor positioned immediately after it, which is what
//! lets the session splitter interleave its own scanning with value decoding.
//!
//! ## Usage
//!
//! Most users should use [`decode_value`](crate::decode_value) or
//! [`decode_session`](crate::decode_session) in the crate root. Driving a
//! `Decoder` directly is only needed inside custom class decode hooks:
//!
//! ```rust
//! use phpsess::{Decoder, DecodeOptions};
//!
//! let options = DecodeOptions::new();
//! let mut decoder = Decoder::new(b"i:42;", &options);
//! let value = decoder.decode_value().unwrap();
//! assert_eq!(value.as_i64(), Some(42));
//! assert!(decoder.cursor().is_at_end());
//! ```

use crate::cursor::Cursor;
use crate::error::{DecodeError, Result};
use crate::map::PhpMap;
use crate::object::PhpObject;
use crate::options::DecodeOptions;
use crate::value::{ArrayKey, PhpBytes, PhpValue};

// Containers declare their element count up front, so a tiny input can claim
// an enormous one. Preallocation is capped and the vector grows normally past
// the cap.
const MAX_PREALLOC: usize = 4096;

/// The value decoder.
///
/// Holds the input cursor, the decode options, and the nesting depth carried
/// across custom decode hooks. Created via [`Decoder::new`]; custom class
/// decode hooks receive `&mut Decoder` and may call
/// [`Decoder::decode_value`] and [`Decoder::cursor_mut`] to consume their
/// body.
pub struct Decoder<'de, 'o> {
    cursor: Cursor<'de>,
    options: &'o DecodeOptions,
    depth: usize,
}

/// One decoding step: either a finished value or a container whose pairs
/// still have to be decoded.
enum Step {
    Scalar(PhpValue),
    Open(Frame),
}

enum Shape {
    Array,
    Object(PhpBytes),
}

/// An in-progress container on the explicit decode stack.
struct Frame {
    start_offset: usize,
    shape: Shape,
    remaining: usize,
    pending_key: Option<ArrayKey>,
    pairs: Vec<(ArrayKey, PhpValue)>,
}

impl Frame {
    fn new(start_offset: usize, shape: Shape, count: i64) -> Self {
        // A negative declared count runs zero pair iterations and then
        // fails on the unmet '}'
        let remaining = usize::try_from(count).unwrap_or(0);
        Frame {
            start_offset,
            shape,
            remaining,
            pending_key: None,
            pairs: Vec::with_capacity(remaining.min(MAX_PREALLOC)),
        }
    }

    /// Feeds one finished value into the frame: first of a pair is the key,
    /// second completes the pair. Keys must be integers or strings.
    fn accept(&mut self, offset: usize, value: PhpValue) -> Result<()> {
        match self.pending_key.take() {
            None => {
                self.pending_key = Some(match value {
                    PhpValue::Int(i) => ArrayKey::Int(i),
                    PhpValue::Bytes(bytes) => ArrayKey::Str(bytes),
                    other => {
                        return Err(DecodeError::invalid_key(offset, value_kind(&other)))
                    }
                });
            }
            Some(key) => {
                self.pairs.push((key, value));
                self.remaining -= 1;
            }
        }
        Ok(())
    }

    fn is_done(&self) -> bool {
        self.remaining == 0 && self.pending_key.is_none()
    }

    fn finish(self) -> PhpValue {
        match self.shape {
            Shape::Array => classify_array(self.pairs),
            Shape::Object(class_name) => {
                let entries = self
                    .pairs
                    .into_iter()
                    .map(|(key, value)| (key.into_property_name(), value))
                    .collect();
                PhpValue::Object(PhpObject::from_entries(class_name, entries))
            }
        }
    }
}

impl<'de, 'o> Decoder<'de, 'o> {
    /// Creates a decoder positioned at the start of `input`.
    pub fn new(input: &'de [u8], options: &'o DecodeOptions) -> Self {
        Decoder {
            cursor: Cursor::new(input),
            options,
            depth: 0,
        }
    }

    /// Returns the input cursor.
    #[must_use]
    pub fn cursor(&self) -> &Cursor<'de> {
        &self.cursor
    }

    /// Returns the input cursor mutably, for custom decode hooks that read
    /// fixed delimiters around the values they decode.
    pub fn cursor_mut(&mut self) -> &mut Cursor<'de> {
        &mut self.cursor
    }

    /// Decodes exactly one encoded value, leaving the cursor immediately
    /// after it.
    ///
    /// Container nesting is handled on an explicit frame stack, so raising
    /// the configured depth bound never risks exhausting the call stack.
    ///
    /// # Errors
    ///
    /// Any of the [`DecodeError`] kinds; the error carries the byte offset
    /// where decoding stopped.
    pub fn decode_value(&mut self) -> Result<PhpValue> {
        let mut stack: Vec<Frame> = Vec::new();
        loop {
            let offset = self.cursor.offset();
            let mut completed = match self.decode_atom(stack.len())? {
                Step::Scalar(value) => Some((offset, value)),
                Step::Open(frame) => {
                    stack.push(frame);
                    None
                }
            };

            // Feed the finished value to the enclosing frame and close every
            // frame that is now complete
            loop {
                match stack.pop() {
                    None => {
                        if let Some((_, value)) = completed {
                            return Ok(value);
                        }
                        break;
                    }
                    Some(mut frame) => {
                        if let Some((offset, value)) = completed.take() {
                            frame.accept(offset, value)?;
                        }
                        if frame.is_done() {
                            self.cursor.expect(b'}')?;
                            completed = Some((frame.start_offset, frame.finish()));
                        } else {
                            stack.push(frame);
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Decodes the next tag into either a scalar value or an opened
    /// container frame. `depth` is the number of frames already open.
    fn decode_atom(&mut self, depth: usize) -> Result<Step> {
        let tag_offset = self.cursor.offset();
        if self.depth + depth >= self.options.max_depth() {
            return Err(DecodeError::depth_exceeded(
                tag_offset,
                self.options.max_depth(),
            ));
        }

        let tag = self
            .cursor
            .read_byte()
            .map_err(|_| DecodeError::unexpected_end(tag_offset, "a type tag"))?;

        // NULL has no body, so its tag is followed by ';' instead of ':'
        if tag == b'N' {
            self.cursor.expect(b';')?;
            return Ok(Step::Scalar(PhpValue::Null));
        }
        self.cursor.expect(b':')?;

        match tag {
            b'R' | b'r' => {
                let _id = self.cursor.read_signed(b';')?;
                Err(DecodeError::unsupported(tag_offset, "object back-references"))
            }
            b'b' => {
                let flag = self.cursor.read_byte()?;
                self.cursor.expect(b';')?;
                Ok(Step::Scalar(PhpValue::Bool(flag == b'1')))
            }
            b'i' => Ok(Step::Scalar(PhpValue::Int(self.cursor.read_signed(b';')?))),
            b'd' => Ok(Step::Scalar(self.decode_float()?)),
            b's' => Ok(Step::Scalar(PhpValue::Bytes(self.decode_raw_string()?))),
            b'S' => Ok(Step::Scalar(PhpValue::Bytes(self.decode_escaped_string()?))),
            b'a' => {
                // The count is parsed with the signed reader even though it
                // is semantically non-negative, matching PHP's scanner
                let count = self.cursor.read_signed(b':')?;
                self.cursor.expect(b'{')?;
                Ok(Step::Open(Frame::new(tag_offset, Shape::Array, count)))
            }
            b'o' | b'O' => {
                let class_name = if tag == b'o' {
                    PhpBytes::from("stdClass")
                } else {
                    self.decode_class_name()?
                };
                let count = self.cursor.read_signed(b':')?;
                // stdClass bodies open with '"' where O bodies open with '{'
                let open = if tag == b'o' { b'"' } else { b'{' };
                self.cursor.expect(open)?;
                Ok(Step::Open(Frame::new(
                    tag_offset,
                    Shape::Object(class_name),
                    count,
                )))
            }
            b'C' => self.decode_custom(depth),
            _ => Err(DecodeError::unknown_type(tag_offset, tag)),
        }
    }

    /// `<len>:"<name>":` as it appears after the `O:` and `C:` tags.
    fn decode_class_name(&mut self) -> Result<PhpBytes> {
        let length = self.cursor.read_unsigned(b':')? as usize;
        self.cursor.expect(b'"')?;
        let name = PhpBytes::from(self.cursor.read(length)?);
        self.cursor.expect(b'"')?;
        self.cursor.expect(b':')?;
        Ok(name)
    }

    /// `C:<len>:"<name>":<body-len>:{<body>}`. A registered hook consumes
    /// the body itself; otherwise the body is kept verbatim.
    fn decode_custom(&mut self, depth: usize) -> Result<Step> {
        let class_name = self.decode_class_name()?;
        let body_length = self.cursor.read_unsigned(b':')? as usize;
        self.cursor.expect(b'{')?;

        let options = self.options;
        let object = match options.custom_decoder(class_name.as_bytes()) {
            Some(hook) => {
                // Hooks re-enter decode_value, so the frames already open
                // below this atom count toward the depth seen inside
                self.depth += depth + 1;
                let result = hook(self);
                self.depth -= depth + 1;
                result?
            }
            None => PhpObject::with_opaque_body(class_name, self.cursor.read(body_length)?),
        };
        self.cursor.expect(b'}')?;
        Ok(Step::Scalar(PhpValue::Object(object)))
    }

    /// Doubles are serialized as raw text up to the closing `;`. PHP emits
    /// `NAN`, `INF` and `-INF` for the IEEE specials; anything else goes
    /// through ordinary float parsing.
    fn decode_float(&mut self) -> Result<PhpValue> {
        let start = self.cursor.offset();
        let mut text = Vec::new();
        loop {
            let c = self.cursor.read_byte()?;
            if c == b';' {
                break;
            }
            text.push(c);
        }

        let value = match text.as_slice() {
            b"NAN" => f64::NAN,
            b"INF" => f64::INFINITY,
            b"-INF" => f64::NEG_INFINITY,
            _ => std::str::from_utf8(&text)
                .ok()
                .and_then(|s| s.parse::<f64>().ok())
                .ok_or_else(|| {
                    DecodeError::format(
                        start,
                        format!("invalid float literal \"{}\"", String::from_utf8_lossy(&text)),
                    )
                })?,
        };
        Ok(PhpValue::Float(value))
    }

    /// `s:<len>:"<len raw bytes>";`. The length counts bytes, never
    /// characters, and the bytes pass through unmodified.
    fn decode_raw_string(&mut self) -> Result<PhpBytes> {
        let length = self.cursor.read_unsigned(b':')? as usize;
        self.cursor.expect(b'"')?;
        let bytes = self.cursor.read(length)?.to_vec();
        self.cursor.expect(b'"')?;
        self.cursor.expect(b';')?;
        Ok(PhpBytes::from(bytes))
    }

    /// `S:<len>:"...";`, like `s` except that the length counts logical
    /// characters and `\xx` (two hex digits) decodes to one raw byte. PHP
    /// never seems to emit this form but accepts it, so we do too.
    fn decode_escaped_string(&mut self) -> Result<PhpBytes> {
        let length = self.cursor.read_unsigned(b':')? as usize;
        self.cursor.expect(b'"')?;

        let mut bytes = Vec::with_capacity(length.min(MAX_PREALLOC));
        for _ in 0..length {
            let c = self.cursor.read_byte()?;
            if c == b'\\' {
                let hex_offset = self.cursor.offset();
                let hex = self.cursor.read(2)?;
                let byte = std::str::from_utf8(hex)
                    .ok()
                    .and_then(|s| u8::from_str_radix(s, 16).ok())
                    .ok_or_else(|| {
                        DecodeError::format(
                            hex_offset,
                            format!(
                                "invalid hex escape \"{}\"",
                                String::from_utf8_lossy(hex)
                            ),
                        )
                    })?;
                bytes.push(byte);
            } else {
                bytes.push(c);
            }
        }

        self.cursor.expect(b'"')?;
        self.cursor.expect(b';')?;
        Ok(PhpBytes::from(bytes))
    }
}

/// Classifies decoded array pairs as a dense list or an ordered map.
///
/// The pairs form a list exactly when every key is an integer and the
/// sorted key set equals `{0, …, N-1}`; the list keeps the original pair
/// order, not key order.
fn classify_array(pairs: Vec<(ArrayKey, PhpValue)>) -> PhpValue {
    let mut int_keys = Vec::with_capacity(pairs.len());
    for (key, _) in &pairs {
        match key {
            ArrayKey::Int(i) => int_keys.push(*i),
            ArrayKey::Str(_) => return PhpValue::Map(PhpMap::from_pairs(pairs)),
        }
    }

    int_keys.sort_unstable();
    let dense = int_keys.iter().enumerate().all(|(i, &k)| k == i as i64);
    if dense {
        PhpValue::List(pairs.into_iter().map(|(_, value)| value).collect())
    } else {
        PhpValue::Map(PhpMap::from_pairs(pairs))
    }
}

fn value_kind(value: &PhpValue) -> &'static str {
    match value {
        PhpValue::Null => "null",
        PhpValue::Bool(_) => "bool",
        PhpValue::Int(_) => "int",
        PhpValue::Float(_) => "float",
        PhpValue::Bytes(_) => "string",
        PhpValue::List(_) | PhpValue::Map(_) => "array",
        PhpValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_pair(key: i64, value: i64) -> (ArrayKey, PhpValue) {
        (ArrayKey::Int(key), PhpValue::Int(value))
    }

    #[test]
    fn test_classify_dense_keys_as_list() {
        let value = classify_array(vec![int_pair(0, 10), int_pair(1, 11)]);
        assert_eq!(value, PhpValue::List(vec![PhpValue::Int(10), PhpValue::Int(11)]));
    }

    #[test]
    fn test_classify_out_of_order_dense_keys_keeps_pair_order() {
        let value = classify_array(vec![int_pair(1, 11), int_pair(0, 10)]);
        // Dense key set, so still a list, in decoded pair order
        assert_eq!(value, PhpValue::List(vec![PhpValue::Int(11), PhpValue::Int(10)]));
    }

    #[test]
    fn test_classify_sparse_keys_as_map() {
        let value = classify_array(vec![int_pair(0, 10), int_pair(2, 12)]);
        assert!(matches!(value, PhpValue::Map(_)));
    }

    #[test]
    fn test_classify_duplicate_keys_as_map() {
        let value = classify_array(vec![int_pair(0, 10), int_pair(0, 11)]);
        match value {
            PhpValue::Map(map) => {
                assert_eq!(map.len(), 1);
                assert_eq!(map.get(0), Some(&PhpValue::Int(11)));
            }
            other => panic!("expected map, got {:?}", other),
        }
    }

    #[test]
    fn test_frame_rejects_non_scalar_keys() {
        let mut frame = Frame::new(0, Shape::Array, 1);
        let err = frame.accept(5, PhpValue::List(Vec::new())).unwrap_err();
        assert_eq!(err, DecodeError::invalid_key(5, "array"));
    }
}
