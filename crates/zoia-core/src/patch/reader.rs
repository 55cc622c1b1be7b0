use super::error::PatchError;
use super::layout;

/// Bounds-checked byte access over a patch buffer.
pub struct PatchReader<'a> {
    buffer: &'a [u8],
}

impl<'a> PatchReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer }
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], PatchError> {
        self.buffer
            .get(range.clone())
            .ok_or(PatchError::TruncatedBuffer {
                offset: range.start,
                needed: range.end.saturating_sub(range.start),
                actual: self.buffer.len(),
            })
    }

    pub fn read_fixed_string(&self, offset: usize, len: usize) -> Result<String, PatchError> {
        let bytes = self.read_slice(offset..offset + len)?;
        let end = bytes
            .iter()
            .position(|&b| is_name_terminator(b))
            .unwrap_or(bytes.len());
        Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
    }

    pub fn read_i16_pair(&self, offset: usize) -> Result<(i16, i16), PatchError> {
        let bytes = self.read_slice(offset..offset + layout::WORD_SIZE)?;
        Ok((
            i16::from_le_bytes([bytes[0], bytes[1]]),
            i16::from_le_bytes([bytes[2], bytes[3]]),
        ))
    }

    pub fn words(&self) -> Result<Vec<i32>, PatchError> {
        if self.buffer.len() % layout::WORD_SIZE != 0 {
            return Err(PatchError::MisalignedLength {
                len: self.buffer.len(),
            });
        }
        Ok(self
            .buffer
            .chunks_exact(layout::WORD_SIZE)
            .map(|w| i32::from_le_bytes([w[0], w[1], w[2], w[3]]))
            .collect())
    }
}

/// Names end at the first padding null, quote, backslash or non-printable
/// byte.
fn is_name_terminator(byte: u8) -> bool {
    matches!(byte, 0 | b'\'' | b'"' | b'\\') || !(0x20..0x7f).contains(&byte)
}

/// Decode the whole buffer as little-endian 32-bit words.
///
/// # Examples
/// ```
/// use zoia_core::read_int32_sequence;
///
/// let words = read_int32_sequence(&[1, 0, 0, 0, 0xff, 0xff, 0xff, 0xff]).unwrap();
/// assert_eq!(words, vec![1, -1]);
/// ```
///
/// # Errors
/// Returns `PatchError::MisalignedLength` when the length is not a multiple
/// of 4.
pub fn read_int32_sequence(buffer: &[u8]) -> Result<Vec<i32>, PatchError> {
    PatchReader::new(buffer).words()
}

/// Read a fixed-length, padded name.
///
/// # Examples
/// ```
/// use zoia_core::read_fixed_string;
///
/// let mut bytes = [0u8; 16];
/// bytes[..3].copy_from_slice(b"LFO");
/// assert_eq!(read_fixed_string(&bytes, 0, 16).unwrap(), "LFO");
/// ```
pub fn read_fixed_string(buffer: &[u8], offset: usize, len: usize) -> Result<String, PatchError> {
    PatchReader::new(buffer).read_fixed_string(offset, len)
}

/// Read two signed 16-bit values packed into one word (low half first).
///
/// # Examples
/// ```
/// use zoia_core::read_int16_pair;
///
/// let pair = read_int16_pair(&[3, 0, 130, 0], 0).unwrap();
/// assert_eq!(pair, (3, 130));
/// ```
pub fn read_int16_pair(buffer: &[u8], offset: usize) -> Result<(i16, i16), PatchError> {
    PatchReader::new(buffer).read_i16_pair(offset)
}

/// Read-and-advance cursor over the decoded word array.
///
/// Positions are absolute word indices; every read is bounds-checked and
/// reports the failing byte offset.
pub struct WordCursor<'w> {
    words: &'w [i32],
    pos: usize,
}

impl<'w> WordCursor<'w> {
    pub fn new(words: &'w [i32], pos: usize) -> Self {
        Self { words, pos }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Byte offset of the word `relative` words past the cursor.
    pub fn byte_offset(&self, relative: usize) -> usize {
        (self.pos + relative) * layout::WORD_SIZE
    }

    pub fn peek(&self, relative: usize) -> Result<i32, PatchError> {
        word_at(self.words, self.pos + relative)
    }

    pub fn read_word(&mut self) -> Result<i32, PatchError> {
        let value = self.peek(0)?;
        self.pos += 1;
        Ok(value)
    }

    /// Read a record count; negative counts are rejected.
    pub fn read_count(&mut self, field: &'static str) -> Result<usize, PatchError> {
        let value = self.read_word()?;
        usize::try_from(value).map_err(|_| PatchError::InvalidCount { field, value })
    }

    pub fn advance(&mut self, words: usize) {
        self.pos += words;
    }
}

pub fn word_at(words: &[i32], index: usize) -> Result<i32, PatchError> {
    words
        .get(index)
        .copied()
        .ok_or(PatchError::TruncatedBuffer {
            offset: index * layout::WORD_SIZE,
            needed: layout::WORD_SIZE,
            actual: words.len() * layout::WORD_SIZE,
        })
}
