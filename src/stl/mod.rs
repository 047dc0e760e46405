pub mod binary;
pub mod solid;
pub mod text;

pub use binary::{BinaryDecoder, BinaryEncoder, HEADER_LEN};
pub use solid::{detect_format, Format, Solid};
pub use text::{TextDecoder, TextEncoder, DEFAULT_INDENT};
