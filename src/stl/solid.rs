use crate::error::{Result, StlError};
use crate::stl::binary::{stream_len, BinaryDecoder, BinaryEncoder, HEADER_LEN, PREAMBLE_LEN};
use crate::stl::text::{TextDecoder, TextEncoder, DEFAULT_INDENT};
use crate::triangle::Triangle;
use byteorder::{ByteOrder, LittleEndian};
use log::debug;
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};

/// Which of the two STL encodings a stream uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Text,
    Binary,
}

/// Sniffs the encoding of `read` and seeks back to where it started.
///
/// Some binary writers start their header with `solid`, so a stream whose
/// length matches its declared triangle count is taken as binary first.
pub fn detect_format<R: Read + Seek>(read: &mut R) -> Result<Format> {
    let start = read.stream_position()?;
    let end = read.seek(SeekFrom::End(0))?;
    read.seek(SeekFrom::Start(start))?;

    let mut preamble = Vec::with_capacity(PREAMBLE_LEN);
    let maybe_read_error = (&mut *read)
        .take(PREAMBLE_LEN as u64)
        .read_to_end(&mut preamble);
    // Seek back before evaluating potential read errors.
    read.seek(SeekFrom::Start(start))?;
    maybe_read_error?;

    if preamble.len() == PREAMBLE_LEN {
        let declared = LittleEndian::read_u32(&preamble[HEADER_LEN..]);
        if end.saturating_sub(start) == stream_len(declared) {
            return Ok(Format::Binary);
        }
    }
    let text = preamble
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .map_or(false, |i| preamble[i..].starts_with(b"solid"));
    Ok(if text { Format::Text } else { Format::Binary })
}

/// A fully decoded STL stream.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Solid {
    /// Text solid name, or the trimmed binary header.
    pub name: String,
    pub triangles: Vec<Triangle>,
}

impl Solid {
    pub fn new(name: impl Into<String>) -> Solid {
        Solid {
            name: name.into(),
            triangles: Vec::new(),
        }
    }

    /// Reads a stream of either encoding.
    pub fn read<R: Read + Seek>(read: &mut R) -> Result<Solid> {
        let format = detect_format(read)?;
        debug!("stl: detected {:?} stream", format);
        match format {
            Format::Text => Solid::read_text(read),
            Format::Binary => Solid::read_binary(read),
        }
    }

    pub fn read_text<R: Read>(read: R) -> Result<Solid> {
        let decoder = TextDecoder::new(read)?;
        let name = decoder.name().to_string();
        let triangles = decoder.collect::<Result<Vec<_>>>()?;
        Ok(Solid { name, triangles })
    }

    pub fn read_binary<R: Read>(read: R) -> Result<Solid> {
        let decoder = BinaryDecoder::new(read)?;
        let name = decoder.header_text();
        let triangles = decoder.collect::<Result<Vec<_>>>()?;
        Ok(Solid { name, triangles })
    }

    /// Writes every triangle in `format`. Binary output uses the name as
    /// its header.
    pub fn write<W: Write>(&self, writer: W, format: Format) -> Result<()> {
        let mut writer = BufWriter::new(writer);
        match format {
            Format::Text => {
                let mut encoder = TextEncoder::new(&mut writer, &self.name, DEFAULT_INDENT)?;
                for t in &self.triangles {
                    encoder.encode(t)?;
                }
                encoder.close()?;
            }
            Format::Binary => {
                let declared =
                    u32::try_from(self.triangles.len()).map_err(|_| StlError::CapacityExceeded {
                        declared: u32::MAX as u64,
                    })?;
                let mut encoder = BinaryEncoder::new(&mut writer, self.name.as_bytes(), declared)?;
                for t in &self.triangles {
                    encoder.encode(t)?;
                }
                encoder.into_inner()?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    /// Indices of triangles whose stored normal differs from the computed
    /// facet normal by more than `tol` in some component. Degenerate
    /// triangles always count.
    pub fn facet_normal_mismatches(&self, tol: f64) -> Vec<usize> {
        self.triangles
            .iter()
            .enumerate()
            .filter(|(_, t)| {
                (t.facet_normal() - t.normal)
                    .iter()
                    .any(|d| !(d.abs() <= tol))
            })
            .map(|(i, _)| i)
            .collect()
    }
}
