//! Little-endian primitive readers and writers.
//!
//! Every multi-byte value in a Spark model file is little-endian. Strings
//! are stored as a `u32` byte length followed by that many UTF-8 bytes.

use std::io::{self, Read, Result, Write};

/// Extension trait for reading little-endian values from a reader
pub trait ReadExt: Read {
    fn read_u32_le(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    fn read_i32_le(&mut self) -> Result<i32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(i32::from_le_bytes(buf))
    }

    fn read_f32_le(&mut self) -> Result<f32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(f32::from_le_bytes(buf))
    }

    fn read_f32_pair(&mut self) -> Result<[f32; 2]> {
        Ok([self.read_f32_le()?, self.read_f32_le()?])
    }

    fn read_f32_triple(&mut self) -> Result<[f32; 3]> {
        Ok([
            self.read_f32_le()?,
            self.read_f32_le()?,
            self.read_f32_le()?,
        ])
    }

    fn read_f32_quad(&mut self) -> Result<[f32; 4]> {
        Ok([
            self.read_f32_le()?,
            self.read_f32_le()?,
            self.read_f32_le()?,
            self.read_f32_le()?,
        ])
    }

    /// Read a length-prefixed UTF-8 string (`u32` byte count, then bytes)
    fn read_len_string(&mut self) -> Result<String> {
        let len = self.read_u32_le()? as usize;
        let mut buf = vec![0u8; len];
        self.read_exact(&mut buf)?;
        String::from_utf8(buf)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Consume and discard exactly `n` bytes
    fn skip_bytes(&mut self, n: u64) -> Result<()> {
        let copied = io::copy(&mut self.take(n), &mut io::sink())?;
        if copied < n {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stream ended inside skipped region",
            ));
        }
        Ok(())
    }
}

/// Extension trait for writing little-endian values to a writer
pub trait WriteExt: Write {
    fn write_u32_le(&mut self, n: u32) -> Result<()> {
        self.write_all(&n.to_le_bytes())
    }

    fn write_i32_le(&mut self, n: i32) -> Result<()> {
        self.write_all(&n.to_le_bytes())
    }

    fn write_f32_le(&mut self, n: f32) -> Result<()> {
        self.write_all(&n.to_le_bytes())
    }

    fn write_f32_pair(&mut self, v: [f32; 2]) -> Result<()> {
        for n in v {
            self.write_f32_le(n)?;
        }
        Ok(())
    }

    fn write_f32_triple(&mut self, v: [f32; 3]) -> Result<()> {
        for n in v {
            self.write_f32_le(n)?;
        }
        Ok(())
    }

    fn write_f32_quad(&mut self, v: [f32; 4]) -> Result<()> {
        for n in v {
            self.write_f32_le(n)?;
        }
        Ok(())
    }

    /// Write a length-prefixed UTF-8 string
    fn write_len_string(&mut self, s: &str) -> Result<()> {
        self.write_u32_le(s.len() as u32)?;
        self.write_all(s.as_bytes())
    }
}

// Implement the traits for all types that implement Read/Write
impl<R: Read + ?Sized> ReadExt for R {}
impl<W: Write + ?Sized> WriteExt for W {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_primitives() {
        let data = [
            0x2A, 0x00, 0x00, 0x00, // u32 = 42
            0xFF, 0xFF, 0xFF, 0xFF, // i32 = -1
            0x00, 0x00, 0x80, 0x3F, // f32 = 1.0
        ];
        let mut cursor = Cursor::new(data);

        assert_eq!(cursor.read_u32_le().unwrap(), 42);
        assert_eq!(cursor.read_i32_le().unwrap(), -1);
        assert_eq!(cursor.read_f32_le().unwrap(), 1.0);
    }

    #[test]
    fn test_read_len_string() {
        let mut data = Vec::new();
        data.extend_from_slice(&5u32.to_le_bytes());
        data.extend_from_slice(b"spark");

        let mut cursor = Cursor::new(data);
        assert_eq!(cursor.read_len_string().unwrap(), "spark");
    }

    #[test]
    fn test_string_round_trip() {
        let mut data = Vec::new();
        data.write_len_string("bone_root").unwrap();

        let mut cursor = Cursor::new(data);
        assert_eq!(cursor.read_len_string().unwrap(), "bone_root");
    }

    #[test]
    fn test_short_read_is_eof() {
        let mut cursor = Cursor::new([0u8; 2]);
        let err = cursor.read_u32_le().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_skip_bytes() {
        let mut cursor = Cursor::new([1u8, 2, 3, 4, 5, 0, 0, 0, 7]);
        cursor.skip_bytes(5).unwrap();
        assert_eq!(cursor.read_u32_le().unwrap(), 0x0700_0000);
    }

    #[test]
    fn test_skip_past_end_is_eof() {
        let mut cursor = Cursor::new([1u8, 2, 3]);
        let err = cursor.skip_bytes(5).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
