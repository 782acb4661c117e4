//! Append-only big-endian byte builder.

/// Errors raised while assembling a canonical byte stream.
///
/// These are [`PreconditionViolated`](crate)-class errors: they signal a
/// caller bug (a fixed-width field given the wrong length, an array longer
/// than the single-byte count prefix can hold), never a data-dependent
/// condition to recover from.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CanonError {
    /// `write_fixed_bytes` received a slice whose length did not match
    /// the declared fixed width.
    #[error("fixed-width field expected {expected} bytes, got {actual}")]
    FixedWidthMismatch {
        /// The declared width.
        expected: usize,
        /// The actual slice length.
        actual: usize,
    },
    /// An array had more elements than the single-byte count prefix can
    /// represent (255).
    #[error("array length {actual} exceeds the 255-element count prefix")]
    ArrayTooLong {
        /// The actual element count.
        actual: usize,
    },
}

/// Builds a canonical byte stream: all multi-byte integers big-endian,
/// arrays length-prefixed with a single `u8` count, optional fields tagged
/// with a one-byte presence marker.
///
/// Deterministic laws this type upholds: `n` single-byte appends produce
/// byte-identical output to one `n`-byte slice append, and every method
/// here is a pure append — nothing is ever rewritten or reordered.
#[derive(Debug, Default, Clone)]
pub struct CanonWriter {
    buf: Vec<u8>,
}

impl CanonWriter {
    /// Builds an empty writer.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Builds an empty writer with room for at least `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// The bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the writer, returning the assembled bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Appends a single byte.
    pub fn u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    /// Appends a big-endian `u16`.
    pub fn u16_be(&mut self, value: u16) -> &mut Self {
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Appends a big-endian `u32`.
    pub fn u32_be(&mut self, value: u32) -> &mut Self {
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Appends a big-endian `u64`.
    pub fn u64_be(&mut self, value: u64) -> &mut Self {
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Appends a big-endian two's-complement `i32`.
    pub fn i32_be(&mut self, value: i32) -> &mut Self {
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Appends a big-endian two's-complement `i64`.
    pub fn i64_be(&mut self, value: i64) -> &mut Self {
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Appends `bytes` verbatim, with no length prefix.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Appends `bytes` verbatim, failing if its length does not match
    /// `expected`.
    pub fn write_fixed_bytes(&mut self, bytes: &[u8], expected: usize) -> Result<&mut Self, CanonError> {
        if bytes.len() != expected {
            return Err(CanonError::FixedWidthMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        self.buf.extend_from_slice(bytes);
        Ok(self)
    }

    /// Writes the single-byte count prefix for an array of `count`
    /// elements. Callers follow this with `count` element writes.
    pub fn array_prefix(&mut self, count: usize) -> Result<&mut Self, CanonError> {
        if count > u8::MAX as usize {
            return Err(CanonError::ArrayTooLong { actual: count });
        }
        self.buf.push(count as u8);
        Ok(self)
    }

    /// Writes a one-byte absence tag (`0x00`).
    pub fn presence_absent(&mut self) -> &mut Self {
        self.buf.push(0x00);
        self
    }

    /// Writes a one-byte presence tag (`0x01`).
    pub fn presence_present(&mut self) -> &mut Self {
        self.buf.push(0x01);
        self
    }

    /// Writes an optional value as a presence tag followed by the payload
    /// written by `write_payload` when `value` is `Some`.
    pub fn optional<T>(&mut self, value: Option<T>, write_payload: impl FnOnce(&mut Self, T)) -> &mut Self {
        match value {
            Some(v) => {
                self.presence_present();
                write_payload(self, v);
            }
            None => {
                self.presence_absent();
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_byte_appends_equal_one_slice_append() {
        let mut a = CanonWriter::new();
        a.u8(1).u8(2).u8(3);
        let mut b = CanonWriter::new();
        b.write_bytes(&[1, 2, 3]);
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn u64_be_matches_spec_vector() {
        let mut w = CanonWriter::new();
        w.u64_be(0x1234_5678_9ABC_DEF0).i64_be(-1);
        assert_eq!(
            w.as_bytes(),
            &[0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn fixed_bytes_rejects_length_mismatch() {
        let mut w = CanonWriter::new();
        let err = w.write_fixed_bytes(&[1, 2, 3], 4).unwrap_err();
        assert_eq!(
            err,
            CanonError::FixedWidthMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn array_prefix_rejects_over_255_elements() {
        let mut w = CanonWriter::new();
        let err = w.array_prefix(256).unwrap_err();
        assert_eq!(err, CanonError::ArrayTooLong { actual: 256 });
    }

    #[test]
    fn optional_absent_writes_only_the_tag() {
        let mut w = CanonWriter::new();
        w.optional::<u8>(None, |w, v| {
            w.u8(v);
        });
        assert_eq!(w.as_bytes(), &[0x00]);
    }

    #[test]
    fn optional_present_writes_tag_then_payload() {
        let mut w = CanonWriter::new();
        w.optional(Some(7u8), |w, v| {
            w.u8(v);
        });
        assert_eq!(w.as_bytes(), &[0x01, 0x07]);
    }
}
