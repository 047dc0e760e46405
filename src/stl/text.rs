//! ASCII STL.
//!
//! ```text
//! solid <name>
//!   facet normal <nx> <ny> <nz>
//!     outer loop
//!       vertex <x> <y> <z>
//!       vertex <x> <y> <z>
//!       vertex <x> <y> <z>
//!     endloop
//!   endfacet
//! endsolid <name>
//! ```
//!
//! Indentation and blank lines are ignored on input.
use crate::error::{Result, StlError};
use crate::nalgebra_types::*;
use crate::triangle::Triangle;
use log::{debug, trace};
use std::fmt::{self, Write as _};
use std::io::{BufRead, BufReader, Read, Write};

/// Indent unit used by [`crate::Solid::write`].
pub const DEFAULT_INDENT: &str = "  ";

/// The line the decoder wants next while inside a facet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Expect {
    FacetNormal,
    OuterLoop,
    Vertex1,
    Vertex2,
    Vertex3,
    EndLoop,
    EndFacet,
}

impl Expect {
    fn next(self) -> Expect {
        match self {
            Expect::FacetNormal => Expect::OuterLoop,
            Expect::OuterLoop => Expect::Vertex1,
            Expect::Vertex1 => Expect::Vertex2,
            Expect::Vertex2 => Expect::Vertex3,
            Expect::Vertex3 => Expect::EndLoop,
            Expect::EndLoop => Expect::EndFacet,
            Expect::EndFacet => Expect::FacetNormal,
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            Expect::FacetNormal => "facet normal",
            Expect::OuterLoop => "outer loop",
            Expect::Vertex1 | Expect::Vertex2 | Expect::Vertex3 => "vertex",
            Expect::EndLoop => "endloop",
            Expect::EndFacet => "endfacet",
        }
    }

}

/// Streaming ASCII STL decoder.
pub struct TextDecoder<R: Read> {
    name: String,
    reader: BufReader<R>,
    line: String,
    read: u64,
    done: bool,
}

impl<R: Read> TextDecoder<R> {
    /// Reads up to and including the `solid` line.
    pub fn new(read: R) -> Result<TextDecoder<R>> {
        let mut reader = BufReader::new(read);
        let mut line = String::new();
        if !next_line(&mut reader, &mut line)? {
            return Err(StlError::MissingSolid);
        }
        let name = match keyword_rest(line.trim(), "solid") {
            Some(name) => name.to_string(),
            None => {
                return Err(StlError::UnexpectedLine {
                    expected: "solid",
                    found: line.trim_end().to_string(),
                })
            }
        };
        debug!("stl: text solid {:?}", name);

        Ok(TextDecoder {
            name,
            reader,
            line,
            read: 0,
            done: false,
        })
    }

    /// Name given on the `solid` line.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of facets decoded so far.
    pub fn triangles_read(&self) -> u64 {
        self.read
    }

    /// Returns the next facet, or `Ok(None)` once `endsolid` is reached.
    pub fn decode(&mut self) -> Result<Option<Triangle>> {
        if self.done {
            return Ok(None);
        }

        let mut expect = Expect::FacetNormal;
        let mut t = Triangle::default();
        loop {
            if !next_line(&mut self.reader, &mut self.line)? {
                if expect == Expect::FacetNormal {
                    debug!("stl: input ended without endsolid after {} facets", self.read);
                    self.done = true;
                    return Ok(None);
                }
                return Err(StlError::UnexpectedEof {
                    expected: expect.keyword(),
                });
            }
            let line = self.line.trim();

            match expect {
                Expect::FacetNormal => {
                    if let Some(name) = keyword_rest(line, "endsolid") {
                        if !name.is_empty() && name != self.name {
                            return Err(StlError::NameMismatch {
                                expected: self.name.clone(),
                                found: name.to_string(),
                            });
                        }
                        debug!("stl: endsolid after {} facets", self.read);
                        self.done = true;
                        return Ok(None);
                    }
                    t.normal = parse_vector(line, expect_rest(line, expect)?)?;
                }
                Expect::Vertex1 | Expect::Vertex2 | Expect::Vertex3 => {
                    let i = match expect {
                        Expect::Vertex1 => 0,
                        Expect::Vertex2 => 1,
                        _ => 2,
                    };
                    t.vertex[i] = parse_vector(line, expect_rest(line, expect)?)?;
                }
                Expect::OuterLoop | Expect::EndLoop => expect_exact(line, expect)?,
                Expect::EndFacet => {
                    expect_exact(line, expect)?;
                    self.read += 1;
                    trace!("stl: facet {} {:?}", self.read, t);
                    return Ok(Some(t));
                }
            }
            expect = expect.next();
        }
    }
}

/// Yields facets until `endsolid`. Stops after the first error.
impl<R: Read> Iterator for TextDecoder<R> {
    type Item = Result<Triangle>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.decode().transpose();
        if let Some(Err(_)) = item {
            self.done = true;
        }
        item
    }
}

/// Fills `line` with the next non-blank line. Returns false at end of input.
/// A last line without a newline still counts.
fn next_line<R: BufRead>(reader: &mut R, line: &mut String) -> Result<bool> {
    loop {
        line.clear();
        if reader.read_line(line)? == 0 {
            return Ok(false);
        }
        if !line.trim().is_empty() {
            return Ok(true);
        }
    }
}

/// If `line` is `keyword` alone or `keyword` followed by whitespace,
/// returns the trimmed remainder.
fn keyword_rest<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(keyword)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

fn expect_rest<'a>(line: &'a str, expect: Expect) -> Result<&'a str> {
    keyword_rest(line, expect.keyword()).ok_or_else(|| StlError::UnexpectedLine {
        expected: expect.keyword(),
        found: line.to_string(),
    })
}

fn expect_exact(line: &str, expect: Expect) -> Result<()> {
    if line == expect.keyword() {
        Ok(())
    } else {
        Err(StlError::UnexpectedLine {
            expected: expect.keyword(),
            found: line.to_string(),
        })
    }
}

fn parse_vector(line: &str, text: &str) -> Result<Vector> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() != 3 {
        return Err(StlError::InvalidVector(line.to_string()));
    }
    let mut result = Vector::zeros();
    for (c, token) in result.iter_mut().zip(&tokens) {
        *c = token.parse().map_err(|_| StlError::InvalidNumber {
            token: token.to_string(),
            line: line.to_string(),
        })?;
    }
    Ok(result)
}

/// `%g` style number: the shortest digits that parse back to the same
/// `f64`, in scientific form when the decimal exponent is below -4 or at
/// least 6.
struct General(f64);

impl fmt::Display for General {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        if v.is_nan() {
            return f.write_str("NaN");
        }
        if v.is_infinite() {
            return f.write_str(if v > 0.0 { "+Inf" } else { "-Inf" });
        }

        let sci = format!("{:e}", v);
        let Some((mantissa, exp)) = sci.split_once('e') else {
            return write!(f, "{}", v);
        };
        let exp: i32 = exp.parse().map_err(|_| fmt::Error)?;
        if exp < -4 || exp >= 6 {
            let sign = if exp < 0 { '-' } else { '+' };
            write!(f, "{}e{}{:02}", mantissa, sign, exp.abs())
        } else {
            write!(f, "{}", v)
        }
    }
}

struct Components<'a>(&'a Vector);

impl fmt::Display for Components<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            General(self.0.x),
            General(self.0.y),
            General(self.0.z)
        )
    }
}

/// Streaming ASCII STL encoder.
///
/// [`TextEncoder::close`] must be called after the last facet, otherwise
/// the stream has no `endsolid` line.
pub struct TextEncoder<W: Write> {
    writer: W,
    name: String,
    indent: [String; 3],
    facet: String,
    written: u64,
}

impl<W: Write> TextEncoder<W> {
    /// Writes the `solid` line. `name` and `indent` should be ASCII.
    pub fn new(mut writer: W, name: &str, indent: &str) -> Result<TextEncoder<W>> {
        writeln!(writer, "solid {}", name)?;
        Ok(TextEncoder {
            writer,
            name: name.to_string(),
            indent: [indent.repeat(1), indent.repeat(2), indent.repeat(3)],
            facet: String::new(),
            written: 0,
        })
    }

    /// Number of facets written so far.
    pub fn triangles_written(&self) -> u64 {
        self.written
    }

    pub fn encode(&mut self, t: &Triangle) -> Result<()> {
        let [one, two, three] = &self.indent;
        let s = &mut self.facet;
        s.clear();
        // Writing into a String cannot fail.
        let _ = writeln!(s, "{}facet normal {}", one, Components(&t.normal));
        let _ = writeln!(s, "{}outer loop", two);
        for v in &t.vertex {
            let _ = writeln!(s, "{}vertex {}", three, Components(v));
        }
        let _ = writeln!(s, "{}endloop", two);
        let _ = writeln!(s, "{}endfacet", one);

        self.writer.write_all(s.as_bytes())?;
        self.written += 1;
        trace!("stl: wrote facet {}", self.written);
        Ok(())
    }

    /// Writes the `endsolid` line and hands back the writer.
    pub fn close(mut self) -> Result<W> {
        writeln!(self.writer, "endsolid {}", self.name)?;
        self.writer.flush()?;
        debug!("stl: closed text solid {:?} after {} facets", self.name, self.written);
        Ok(self.writer)
    }
}
