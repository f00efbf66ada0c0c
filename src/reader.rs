//! Bounded cursor over borrowed input bytes.

use crate::error::DecodeError;

/// A forward-only reader over a borrowed byte slice.
///
/// Every read is bounds-checked; running past the end yields
/// [`DecodeError::UnexpectedEnd`] carrying the cursor offset.
#[derive(Debug)]
pub struct ByteReader<'a> {
    input: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, offset: 0 }
    }

    /// Current cursor position from the start of the input.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.input.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Takes the next `n` bytes and advances the cursor.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if n > self.remaining() {
            return Err(DecodeError::UnexpectedEnd {
                offset: self.offset,
                needed: n - self.remaining(),
            });
        }
        let slice = &self.input[self.offset..self.offset + n];
        self.offset += n;
        Ok(slice)
    }

    /// Takes everything from the cursor to the end of the input.
    pub fn take_rest(&mut self) -> &'a [u8] {
        let slice = &self.input[self.offset..];
        self.offset = self.input.len();
        slice
    }

    /// Reads the next byte without advancing.
    pub fn peek(&self) -> Result<u8, DecodeError> {
        self.input
            .get(self.offset)
            .copied()
            .ok_or(DecodeError::UnexpectedEnd {
                offset: self.offset,
                needed: 1,
            })
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16_be(&mut self) -> Result<u16, DecodeError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn read_u32_be(&mut self) -> Result<u32, DecodeError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_i32_be(&mut self) -> Result<i32, DecodeError> {
        Ok(self.read_u32_be()? as i32)
    }

    pub fn read_u64_be(&mut self) -> Result<u64, DecodeError> {
        let b = self.take(8)?;
        Ok(u64::from_be_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    /// Reads an IEEE-754 binary64 in network byte order.
    pub fn read_f64_be(&mut self) -> Result<f64, DecodeError> {
        Ok(f64::from_bits(self.read_u64_be()?))
    }
}
