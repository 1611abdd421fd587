//! Internal helpers for reading the root binary layouts.
//!
//! All multi-byte fields in these formats are little-endian with no
//! padding between fields.

use std::io::{Error, ErrorKind, Read};

/// Generic trait for reading integer types from a buffer.
pub trait ReadInt {
    /// Error type which can be returned on read failures.
    type Error;

    /// Read a little-endian `i32` from the buffer.
    fn read_i32le(&mut self) -> Result<i32, Self::Error>;

    /// Read a little-endian `u32` from the buffer.
    fn read_u32le(&mut self) -> Result<u32, Self::Error>;
}

impl<T: Read> ReadInt for T {
    type Error = Error;

    fn read_i32le(&mut self) -> Result<i32, Self::Error> {
        let mut b = [0; size_of::<i32>()];
        self.read_exact(&mut b)?;
        Ok(i32::from_le_bytes(b))
    }

    fn read_u32le(&mut self) -> Result<u32, Self::Error> {
        let mut b = [0; size_of::<u32>()];
        self.read_exact(&mut b)?;
        Ok(u32::from_le_bytes(b))
    }
}

/// Read a null-terminated string from the buffer.
pub fn read_cstring<R: Read>(f: &mut R) -> Result<String, Error> {
    let mut bytes = Vec::new();
    let mut b = [0u8; 1];

    loop {
        f.read_exact(&mut b)?;
        if b[0] == 0 {
            break;
        }
        bytes.push(b[0]);
    }

    String::from_utf8(bytes).map_err(|e| {
        Error::new(
            ErrorKind::InvalidData,
            format!("invalid UTF-8 in string: {e}"),
        )
    })
}

/// Read a 16-byte content hash from the buffer.
pub fn read_content_hash<R: Read>(f: &mut R) -> Result<[u8; 16], Error> {
    let mut b = [0u8; 16];
    f.read_exact(&mut b)?;
    Ok(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn cstring() {
        let mut f = Cursor::new(b"subroot\\Base\0trailing");
        assert_eq!(read_cstring(&mut f).unwrap(), "subroot\\Base");
        assert_eq!(f.position(), 13);
    }

    #[test]
    fn cstring_empty() {
        let mut f = Cursor::new(b"\0");
        assert_eq!(read_cstring(&mut f).unwrap(), "");
    }

    #[test]
    fn cstring_unterminated() {
        let mut f = Cursor::new(b"no terminator");
        assert!(read_cstring(&mut f).is_err());
    }

    #[test]
    fn ints() {
        let mut f = Cursor::new(b"\xfe\xff\xff\xff\x78\x56\x34\x12");
        assert_eq!(f.read_i32le().unwrap(), -2);
        assert_eq!(f.read_u32le().unwrap(), 0x12345678);
        assert!(f.read_i32le().is_err());
    }
}
