//! # Stream Cursor
//!
//! Validated big-endian reads over an in-memory stream file.
//!
//! Every read is bounds checked and every failure names the file, the field
//! and the offset at which the field started.

use super::errors::StreamFileError;

/// Constant the length checksum is computed against.
pub const LENGTH_CHECKSUM_BASE: i32 = 101;

/// Single-pass reader over a fixed buffer.
#[derive(Debug)]
pub struct StreamCursor<'a> {
    file: &'a str,
    bytes: &'a [u8],
    position: usize,
}

impl<'a> StreamCursor<'a> {
    pub fn new(file: &'a str, bytes: &'a [u8]) -> Self {
        Self {
            file,
            bytes,
            position: 0,
        }
    }

    pub fn file(&self) -> &'a str {
        self.file
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// The whole underlying buffer.
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn read_bytes(
        &mut self,
        len: usize,
        field: &'static str,
    ) -> Result<&'a [u8], StreamFileError> {
        if self.remaining() < len {
            return Err(StreamFileError::Truncated {
                file: self.file.to_string(),
                offset: self.position,
                field,
                needed: len,
                available: self.remaining(),
            });
        }
        let start = self.position;
        self.position += len;
        Ok(&self.bytes[start..self.position])
    }

    pub fn read_array<const N: usize>(
        &mut self,
        field: &'static str,
    ) -> Result<[u8; N], StreamFileError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N, field)?);
        Ok(out)
    }

    pub fn read_u8(&mut self, field: &'static str) -> Result<u8, StreamFileError> {
        Ok(self.read_array::<1>(field)?[0])
    }

    pub fn read_i32(&mut self, field: &'static str) -> Result<i32, StreamFileError> {
        Ok(i32::from_be_bytes(self.read_array(field)?))
    }

    pub fn read_i64(&mut self, field: &'static str) -> Result<i64, StreamFileError> {
        Ok(i64::from_be_bytes(self.read_array(field)?))
    }

    /// Look at the next `i64` without consuming it.
    pub fn peek_i64(&self) -> Option<i64> {
        let end = self.position.checked_add(8)?;
        let bytes: [u8; 8] = self.bytes.get(self.position..end)?.try_into().ok()?;
        Some(i64::from_be_bytes(bytes))
    }

    /// Read a one-byte marker and check its value.
    pub fn read_marker(
        &mut self,
        expected: u8,
        field: &'static str,
    ) -> Result<(), StreamFileError> {
        let offset = self.position;
        let actual = self.read_u8(field)?;
        self.expect_value(offset, field, expected as i64, actual as i64)
    }

    pub fn read_expected_i32(
        &mut self,
        expected: i32,
        field: &'static str,
    ) -> Result<(), StreamFileError> {
        let offset = self.position;
        let actual = self.read_i32(field)?;
        self.expect_value(offset, field, expected as i64, actual as i64)
    }

    pub fn read_expected_i64(
        &mut self,
        expected: i64,
        field: &'static str,
    ) -> Result<(), StreamFileError> {
        let offset = self.position;
        let actual = self.read_i64(field)?;
        self.expect_value(offset, field, expected, actual)
    }

    /// Read an `int` length, an optional length checksum, then that many bytes.
    ///
    /// The length must lie in `[min, max]`. With `has_checksum` the length is
    /// followed by an `int` equal to `101 - length`.
    pub fn read_length_and_bytes(
        &mut self,
        min: usize,
        max: usize,
        has_checksum: bool,
        field: &'static str,
    ) -> Result<&'a [u8], StreamFileError> {
        let offset = self.position;
        let length = self.read_i32(field)?;

        if has_checksum {
            let checksum_offset = self.position;
            let checksum = self.read_i32(field)?;
            let expected = LENGTH_CHECKSUM_BASE.wrapping_sub(length);
            if checksum != expected {
                return Err(StreamFileError::ChecksumMismatch {
                    file: self.file.to_string(),
                    offset: checksum_offset,
                    field,
                    expected,
                    actual: checksum,
                });
            }
        }

        let in_bounds = usize::try_from(length)
            .ok()
            .filter(|len| (min..=max).contains(len));
        let Some(length) = in_bounds else {
            return Err(StreamFileError::LengthOutOfBounds {
                file: self.file.to_string(),
                offset,
                field,
                length: length as i64,
                min,
                max,
            });
        };

        self.read_bytes(length, field)
    }

    /// Fail if anything is left.
    pub fn expect_end(&self) -> Result<(), StreamFileError> {
        if self.is_exhausted() {
            return Ok(());
        }
        Err(StreamFileError::TrailingBytes {
            file: self.file.to_string(),
            offset: self.position,
            remaining: self.remaining(),
        })
    }

    fn expect_value(
        &self,
        offset: usize,
        field: &'static str,
        expected: i64,
        actual: i64,
    ) -> Result<(), StreamFileError> {
        if expected == actual {
            return Ok(());
        }
        Err(StreamFileError::UnexpectedValue {
            file: self.file.to_string(),
            offset,
            field,
            expected,
            actual,
        })
    }
}
