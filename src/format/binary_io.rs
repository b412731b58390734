use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write},
    path::Path,
};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{Error, Result};

/// Seekable little-endian sink over a buffered file.
pub struct ByteWriter {
    file: BufWriter<File>,
}

impl ByteWriter {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|source| Error::Open {
            path: path.to_owned(),
            source,
        })?;
        Ok(ByteWriter {
            file: BufWriter::new(file),
        })
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.file.write_all(bytes)?;
        Ok(())
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.file.write_u8(value)?;
        Ok(())
    }

    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        self.file.write_i16::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.file.write_i32::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        self.file.write_i64::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.file.write_u32::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        self.file.write_u64::<LittleEndian>(value)?;
        Ok(())
    }

    /// u32 byte length followed by the raw bytes; a zero length emits no
    /// body.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        self.write_u32(value.len() as u32)?;
        if !value.is_empty() {
            self.write_bytes(value.as_bytes())?;
        }
        Ok(())
    }

    pub fn position(&mut self) -> Result<u64> {
        Ok(self.file.stream_position()?)
    }

    pub fn seek(&mut self, position: u64) -> Result<()> {
        self.file.seek(SeekFrom::Start(position))?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.file.flush()?;
        Ok(())
    }
}

/// Seekable little-endian source over a buffered file. The total size is
/// captured once at open time.
pub struct ByteReader {
    file: BufReader<File>,
    file_size: u64,
}

impl ByteReader {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_owned(),
            source,
        })?;
        let file_size = file.metadata()?.len();
        Ok(ByteReader {
            file: BufReader::new(file),
            file_size,
        })
    }

    /// Fill `buffer` exactly; running out of data mid-read means the file is
    /// truncated and is reported as a format error.
    pub fn read_exact(&mut self, buffer: &mut [u8]) -> Result<()> {
        self.file.read_exact(buffer).map_err(map_read_error)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.file.read_u8().map_err(map_read_error)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.file.read_i16::<LittleEndian>().map_err(map_read_error)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.file.read_i32::<LittleEndian>().map_err(map_read_error)
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        self.file.read_i64::<LittleEndian>().map_err(map_read_error)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.file.read_u32::<LittleEndian>().map_err(map_read_error)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.file.read_u64::<LittleEndian>().map_err(map_read_error)
    }

    /// Inverse of [`ByteWriter::write_string`].
    pub fn read_string(&mut self) -> Result<String> {
        let length = self.read_u32()? as usize;
        if length == 0 {
            return Ok(String::new());
        }
        let mut buffer = vec![0u8; length];
        self.read_exact(&mut buffer)?;
        String::from_utf8(buffer).map_err(|_| Error::Format("string is not valid UTF-8".to_owned()))
    }

    pub fn position(&mut self) -> Result<u64> {
        Ok(self.file.stream_position()?)
    }

    pub fn seek(&mut self, position: u64) -> Result<()> {
        self.file.seek(SeekFrom::Start(position))?;
        Ok(())
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }
}

fn map_read_error(error: io::Error) -> Error {
    if error.kind() == io::ErrorKind::UnexpectedEof {
        Error::Format("unexpected end of data".to_owned())
    } else {
        Error::Io(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_round_trip_with_length_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strings.bin");

        let mut writer = ByteWriter::create(&path).unwrap();
        writer.write_string("hello").unwrap();
        writer.write_string("").unwrap();
        writer.write_string("wörld").unwrap();
        writer.flush().unwrap();
        drop(writer);

        let mut reader = ByteReader::open(&path).unwrap();
        assert_eq!(reader.read_string().unwrap(), "hello");
        assert_eq!(reader.read_string().unwrap(), "");
        assert_eq!(reader.read_string().unwrap(), "wörld");
        // An empty string occupies exactly its four length bytes.
        assert_eq!(reader.file_size(), 4 + 5 + 4 + 4 + "wörld".len() as u64);
    }

    #[test]
    fn integers_are_little_endian() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ints.bin");

        let mut writer = ByteWriter::create(&path).unwrap();
        writer.write_u32(0x0102_0304).unwrap();
        writer.write_i16(-2).unwrap();
        writer.flush().unwrap();
        drop(writer);

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes, [0x04, 0x03, 0x02, 0x01, 0xFE, 0xFF]);
    }

    #[test]
    fn truncated_read_is_a_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.bin");
        std::fs::write(&path, [1u8, 2]).unwrap();

        let mut reader = ByteReader::open(&path).unwrap();
        assert!(matches!(reader.read_u64(), Err(Error::Format(_))));
    }

    #[test]
    fn seek_then_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patch.bin");

        let mut writer = ByteWriter::create(&path).unwrap();
        writer.write_u32(0).unwrap();
        writer.write_u32(7).unwrap();
        let end = writer.position().unwrap();
        writer.seek(0).unwrap();
        writer.write_u32(42).unwrap();
        writer.seek(end).unwrap();
        writer.flush().unwrap();
        drop(writer);

        let mut reader = ByteReader::open(&path).unwrap();
        assert_eq!(reader.read_u32().unwrap(), 42);
        assert_eq!(reader.read_u32().unwrap(), 7);
    }
}
