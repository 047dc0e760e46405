// bytes range  | description
// -------------|-----------------------------
// 0-79         | header, opaque
// 80-83        | triangle count, u32 LE
// 84 + 50 * i  | normal, 3 x f32 LE
//   + 12       | vertices, 9 x f32 LE
//   + 48       | attribute byte count, u16 LE
use crate::error::{Result, StlError};
use crate::nalgebra_types::*;
use crate::triangle::Triangle;
use byteorder::{ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use log::{debug, trace};
use std::io::{BufReader, Read, Write};

pub const HEADER_LEN: usize = 80;
pub const PREAMBLE_LEN: usize = HEADER_LEN + 4;
pub const RECORD_LEN: usize = 50;

/// Size in bytes of a well formed binary stream holding `count` triangles.
pub fn stream_len(count: u32) -> u64 {
    PREAMBLE_LEN as u64 + RECORD_LEN as u64 * count as u64
}

/// `header` right padded with NULs or truncated to [`HEADER_LEN`] bytes.
pub fn pad_header(header: &[u8]) -> [u8; HEADER_LEN] {
    let mut result = [0u8; HEADER_LEN];
    let n = header.len().min(HEADER_LEN);
    result[..n].copy_from_slice(&header[..n]);
    result
}

/// Streaming binary STL decoder.
pub struct BinaryDecoder<R: Read> {
    header: [u8; HEADER_LEN],
    declared: u32,
    read: u32,
    failed: bool,
    reader: BufReader<R>,
}

impl<R: Read> BinaryDecoder<R> {
    /// Reads the header and triangle count.
    pub fn new(read: R) -> Result<BinaryDecoder<R>> {
        let mut reader = BufReader::new(read);
        let mut header = [0u8; HEADER_LEN];
        reader.read_exact(&mut header)?;
        let declared = reader.read_u32::<LittleEndian>()?;
        debug!("stl: binary stream declares {} triangles", declared);

        Ok(BinaryDecoder {
            header,
            declared,
            read: 0,
            failed: false,
            reader,
        })
    }

    /// Raw header bytes. Often text, often NUL padded, neither is guaranteed.
    pub fn header(&self) -> &[u8; HEADER_LEN] {
        &self.header
    }

    /// Header with trailing NULs and surrounding whitespace removed.
    pub fn header_text(&self) -> String {
        header_text(&self.header)
    }

    /// Triangle count stored in the preamble.
    pub fn declared(&self) -> u32 {
        self.declared
    }

    /// Triangles decoded so far.
    pub fn triangles_read(&self) -> u32 {
        self.read
    }

    /// Returns the next triangle, or `Ok(None)` once the declared count has
    /// been read. Bytes past the last declared record are never touched.
    pub fn decode(&mut self) -> Result<Option<Triangle>> {
        if self.read == self.declared {
            return Ok(None);
        }

        let mut record = [0u8; RECORD_LEN];
        self.reader.read_exact(&mut record)?;
        let t = Triangle {
            normal: get_vector(&record[..12]),
            vertex: [
                get_vector(&record[12..24]),
                get_vector(&record[24..36]),
                get_vector(&record[36..48]),
            ],
            attr_byte_count: LittleEndian::read_u16(&record[48..]),
        };
        self.read += 1;
        trace!("stl: record {} {:?}", self.read, t);
        if self.read == self.declared {
            debug!("stl: read all {} declared triangles", self.declared);
        }
        Ok(Some(t))
    }
}

/// Yields triangles until the declared count. Stops after the first error.
impl<R: Read> Iterator for BinaryDecoder<R> {
    type Item = Result<Triangle>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.decode().transpose();
        if let Some(Err(_)) = item {
            self.failed = true;
        }
        item
    }
}

pub(crate) fn header_text(header: &[u8]) -> String {
    let end = header.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    String::from_utf8_lossy(&header[..end]).trim().to_string()
}

fn get_vector(b: &[u8]) -> Vector {
    let mut x = [0f32; 3];
    LittleEndian::read_f32_into(&b[..12], &mut x);
    Vector::widen(x)
}

/// Streaming binary STL encoder.
///
/// The triangle count is fixed up front. Writing fewer triangles than
/// declared leaves a short stream; that is the caller's responsibility.
pub struct BinaryEncoder<W: Write> {
    writer: W,
    declared: u32,
    written: u32,
    record: Vec<u8>,
}

impl<W: Write> BinaryEncoder<W> {
    /// Writes the header and count. Only `declared` calls to
    /// [`BinaryEncoder::encode`] are allowed afterwards.
    pub fn new(mut writer: W, header: &[u8], declared: u32) -> Result<BinaryEncoder<W>> {
        writer.write_all(&pad_header(header))?;
        writer.write_u32::<LittleEndian>(declared)?;
        Ok(BinaryEncoder {
            writer,
            declared,
            written: 0,
            record: Vec::with_capacity(RECORD_LEN),
        })
    }

    pub fn declared(&self) -> u32 {
        self.declared
    }

    pub fn triangles_written(&self) -> u32 {
        self.written
    }

    /// Narrows `t` to single precision and writes one record.
    pub fn encode(&mut self, t: &Triangle) -> Result<()> {
        if self.written == self.declared {
            return Err(StlError::CapacityExceeded {
                declared: self.declared as u64,
            });
        }

        let record = &mut self.record;
        record.clear();
        for v in std::iter::once(&t.normal).chain(&t.vertex) {
            for c in v.narrow() {
                record.write_f32::<LittleEndian>(c)?;
            }
        }
        record.write_u16::<LittleEndian>(t.attr_byte_count)?;

        self.writer.write_all(record)?;
        self.written += 1;
        trace!("stl: wrote record {}/{}", self.written, self.declared);
        Ok(())
    }

    /// Flushes and hands back the writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
