//! Streaming reader and writer for STL triangle meshes, in both the ASCII
//! and the binary encoding.
//!
//! Decoders pull one [`Triangle`] per call and return `Ok(None)` at the end
//! of the stream. Encoders push one per call. The two families are
//! independent, so a triangle decoded from one encoding can be written to
//! the other.
//!
//! ```no_run
//! use stl_codec::{BinaryEncoder, TextDecoder};
//!
//! # fn main() -> stl_codec::Result<()> {
//! let mut text = TextDecoder::new(std::io::stdin())?;
//! let mut triangles = Vec::new();
//! while let Some(t) = text.decode()? {
//!     triangles.push(t);
//! }
//! let mut out = BinaryEncoder::new(std::io::stdout(), text.name().as_bytes(), triangles.len() as u32)?;
//! for t in &triangles {
//!     out.encode(t)?;
//! }
//! # Ok(())
//! # }
//! ```
pub mod error;
pub mod geometry;
pub mod nalgebra_types;
pub mod stl;
pub mod triangle;

pub use error::{Result, StlError};
pub use nalgebra_types::Vector;
pub use stl::*;
pub use triangle::Triangle;
