// Bounds-checked little-endian byte cursor.
//
// Every usmap integer is little-endian and fixed-width; the cursor owns
// the read offset and fails with `OutOfBounds` instead of slicing past
// the end. Strings in this format are sequences of single-byte code
// units (one byte = one code point), not UTF-8, so `read_ascii_string`
// maps each byte directly to the char with that value.

use crate::error::DecodeError;

/// Cursor over a borrowed byte buffer.
///
/// The cursor borrows the input without copying; decoded values own
/// their data outright, so nothing in the output model aliases the
/// input buffer.
pub struct ByteReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a cursor positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Current read offset.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Take `count` bytes, advancing the offset.
    fn take(&mut self, count: usize) -> Result<&'a [u8], DecodeError> {
        let end = self
            .offset
            .checked_add(count)
            .filter(|&end| end <= self.data.len())
            .ok_or(DecodeError::OutOfBounds {
                offset: self.offset,
                requested: count,
                len: self.data.len(),
            })?;
        let bytes = &self.data[self.offset..end];
        self.offset = end;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
        let bytes = self.take(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(buf))
    }

    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        Ok(self.read_u32()? as i32)
    }

    /// Read `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        self.take(len)
    }

    /// Read a string of `len` single-byte code units.
    ///
    /// Each byte maps directly to the char with that code point; byte
    /// 0xE9 decodes to U+00E9 regardless of what UTF-8 would say.
    pub fn read_ascii_string(&mut self, len: usize) -> Result<String, DecodeError> {
        let bytes = self.take(len)?;
        Ok(bytes.iter().map(|&b| char::from(b)).collect())
    }

    /// Read a signed 32-bit name-table index and resolve it.
    ///
    /// Out-of-range indices (negative or past the end) resolve to
    /// `None`, never an error; call sites that structurally require a
    /// name promote `None` to `MissingRequiredName`.
    pub fn read_name<'t>(
        &mut self,
        names: &'t [String],
    ) -> Result<(i32, Option<&'t str>), DecodeError> {
        let index = self.read_i32()?;
        let resolved = usize::try_from(index)
            .ok()
            .and_then(|i| names.get(i))
            .map(String::as_str);
        Ok((index, resolved))
    }

    /// View of all unread bytes; the offset does not advance.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.offset..]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
