//! Little-endian record reader
//!
//! A byte cursor over a chunk payload. Every read consumes exactly the width
//! of the value it returns; a read past the end of the payload fails with
//! [`ReadError::TruncatedInput`] and leaves the cursor where it was.

use thiserror::Error;

/// Failure while reading primitive fields from a payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    /// Fewer bytes remain than the read requires
    #[error("truncated input: needed {needed} bytes at offset {offset}, {available} available")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        available: usize,
    },
}

pub type ReadResult<T> = Result<T, ReadError>;

/// Cursor over a little-endian byte payload
#[derive(Debug, Clone)]
pub struct RecordReader<'a> {
    data: &'a [u8],
    pos: usize,
}

macro_rules! read_le {
    ($($name:ident => $ty:ty),* $(,)?) => {
        $(
            #[doc = concat!("Read a little-endian `", stringify!($ty), "`")]
            pub fn $name(&mut self) -> ReadResult<$ty> {
                Ok(<$ty>::from_le_bytes(self.take_array()?))
            }
        )*
    };
}

impl<'a> RecordReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Offset of the cursor from the start of the payload
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the cursor
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Consume `len` raw bytes
    pub fn take(&mut self, len: usize) -> ReadResult<&'a [u8]> {
        if self.remaining() < len {
            return Err(ReadError::TruncatedInput {
                offset: self.pos,
                needed: len,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> ReadResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Skip `len` bytes of padding
    pub fn skip(&mut self, len: usize) -> ReadResult<()> {
        self.take(len).map(|_| ())
    }

    read_le! {
        read_u8 => u8,
        read_i8 => i8,
        read_u16 => u16,
        read_i16 => i16,
        read_u32 => u32,
        read_i32 => i32,
        read_u64 => u64,
        read_i64 => i64,
        read_f32 => f32,
    }

    /// Read `N` consecutive little-endian floats
    pub fn read_f32_array<const N: usize>(&mut self) -> ReadResult<[f32; N]> {
        // Check the whole block up front so a short read consumes nothing.
        let bytes = self.take(N * 4)?;
        let mut out = [0.0f32; N];
        for (value, chunk) in out.iter_mut().zip(bytes.chunks_exact(4)) {
            *value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Ok(out)
    }

    /// Read a fixed-length text field.
    ///
    /// The text ends at the first NUL byte; trailing spaces are dropped.
    /// Invalid UTF-8 is replaced rather than rejected since engine names are
    /// identifiers, not validated text.
    pub fn read_fixed_string(&mut self, len: usize) -> ReadResult<String> {
        let bytes = self.take(len)?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Ok(String::from_utf8_lossy(&bytes[..end])
            .trim_end_matches(' ')
            .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_little_endian() {
        let mut data = Vec::new();
        data.extend_from_slice(&0x1234_5678u32.to_le_bytes());
        data.extend_from_slice(&(-3i32).to_le_bytes());
        data.extend_from_slice(&0xBEEFu16.to_le_bytes());
        data.extend_from_slice(&1.5f32.to_le_bytes());
        data.push(0xFF);

        let mut reader = RecordReader::new(&data);
        assert_eq!(reader.read_u32().unwrap(), 0x1234_5678);
        assert_eq!(reader.read_i32().unwrap(), -3);
        assert_eq!(reader.read_u16().unwrap(), 0xBEEF);
        assert_eq!(reader.read_f32().unwrap(), 1.5);
        assert_eq!(reader.read_i8().unwrap(), -1);
        assert_eq!(reader.remaining(), 0);
        assert_eq!(reader.position(), data.len());
    }

    #[test]
    fn test_truncated_read_reports_position() {
        let data = [1u8, 2, 3, 4, 5, 6];
        let mut reader = RecordReader::new(&data);
        reader.skip(4).unwrap();

        let err = reader.read_u32().unwrap_err();
        assert_eq!(
            err,
            ReadError::TruncatedInput {
                offset: 4,
                needed: 4,
                available: 2
            }
        );
        // Failed reads do not move the cursor
        assert_eq!(reader.position(), 4);
        assert_eq!(reader.read_u16().unwrap(), 0x0605);
    }

    #[test]
    fn test_fixed_string_padding() {
        let mut field = [0u8; 16];
        field[..5].copy_from_slice(b"Bip01");
        let mut reader = RecordReader::new(&field);
        assert_eq!(reader.read_fixed_string(16).unwrap(), "Bip01");
        assert_eq!(reader.position(), 16);

        let spaced = *b"Pelvis    ";
        let mut reader = RecordReader::new(&spaced);
        assert_eq!(reader.read_fixed_string(10).unwrap(), "Pelvis");
    }

    #[test]
    fn test_fixed_string_ignores_bytes_after_nul() {
        let field = *b"hang\0garbage";
        let mut reader = RecordReader::new(&field);
        assert_eq!(reader.read_fixed_string(field.len()).unwrap(), "hang");
    }

    #[test]
    fn test_f32_array_is_all_or_nothing() {
        let data = [0u8; 10];
        let mut reader = RecordReader::new(&data);
        assert!(reader.read_f32_array::<3>().is_err());
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.read_f32_array::<2>().unwrap(), [0.0, 0.0]);
    }
}
