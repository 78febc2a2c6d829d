//! Lossy, resynchronising UTF-8 decoding over raw byte buffers.
//!
//! Text arrives from the layout engine as bytes with an explicit length and
//! no validity guarantee. Decoding never fails: a malformed sequence yields
//! U+FFFD and consumes exactly one byte, so the next call starts on the
//! following byte.

/// Result of decoding one scalar value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decoded {
    pub codepoint: char,
    /// Bytes consumed, 1..=4.
    pub len: usize,
    /// `false` when `codepoint` is a substituted U+FFFD.
    pub valid: bool,
}

impl Decoded {
    const fn replacement() -> Self {
        Self {
            codepoint: char::REPLACEMENT_CHARACTER,
            len: 1,
            valid: false,
        }
    }
}

/// Decode the scalar value starting at `bytes[0]`.
///
/// Returns `None` only for an empty slice.
///
/// ```
/// use tessera_text::utf8::decode;
///
/// let d = decode("語".as_bytes()).unwrap();
/// assert_eq!((d.codepoint, d.len, d.valid), ('語', 3, true));
///
/// let bad = decode(&[0xE0, b'A']).unwrap();
/// assert_eq!((bad.codepoint, bad.len, bad.valid), ('\u{FFFD}', 1, false));
/// ```
pub fn decode(bytes: &[u8]) -> Option<Decoded> {
    let &lead = bytes.first()?;

    let (len, initial, min) = match lead {
        0x00..=0x7F => {
            return Some(Decoded {
                codepoint: lead as char,
                len: 1,
                valid: true,
            });
        }
        b if b & 0xE0 == 0xC0 => (2, (b & 0x1F) as u32, 0x80),
        b if b & 0xF0 == 0xE0 => (3, (b & 0x0F) as u32, 0x800),
        b if b & 0xF8 == 0xF0 => (4, (b & 0x07) as u32, 0x1_0000),
        // stray continuation byte or 0xF8..=0xFF
        _ => return Some(Decoded::replacement()),
    };

    let Some(tail) = bytes.get(1..len) else {
        return Some(Decoded::replacement());
    };

    let mut value = initial;
    for &byte in tail {
        if byte & 0xC0 != 0x80 {
            return Some(Decoded::replacement());
        }
        value = (value << 6) | (byte & 0x3F) as u32;
    }

    if value < min {
        return Some(Decoded::replacement());
    }

    // Rejects surrogates and values above U+10FFFF.
    match char::from_u32(value) {
        Some(codepoint) => Some(Decoded {
            codepoint,
            len,
            valid: true,
        }),
        None => Some(Decoded::replacement()),
    }
}

/// Lazy iterator over the scalar values of a byte buffer.
#[derive(Clone, Debug)]
pub struct Utf8Chars<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Utf8Chars<'a> {
    /// Byte offset of the next value to be decoded.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl Iterator for Utf8Chars<'_> {
    type Item = Decoded;

    #[inline]
    fn next(&mut self) -> Option<Decoded> {
        let decoded = decode(&self.bytes[self.offset..])?;
        self.offset += decoded.len;
        Some(decoded)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bytes.len() - self.offset;
        (remaining.div_ceil(4), Some(remaining))
    }
}

impl std::iter::FusedIterator for Utf8Chars<'_> {}

/// Iterate from the start of `bytes`.
pub fn chars(bytes: &[u8]) -> Utf8Chars<'_> {
    chars_from(bytes, 0)
}

/// Iterate starting at `offset`.
///
/// Starting inside a multi-byte sequence yields one U+FFFD per stray
/// continuation byte before decoding resumes.
pub fn chars_from(bytes: &[u8], offset: usize) -> Utf8Chars<'_> {
    Utf8Chars {
        bytes,
        offset: offset.min(bytes.len()),
    }
}

/// Number of scalar values, counting each substitution as one.
pub fn char_count(bytes: &[u8]) -> usize {
    chars(bytes).count()
}
