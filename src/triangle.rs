use crate::geometry;
use crate::nalgebra_types::*;

/// One facet of an STL stream.
///
/// `normal` and `vertex` hold whatever the stream contained. Neither the
/// decoders nor the encoders reorder vertices or correct the normal, so the
/// stored normal may disagree with [`Triangle::facet_normal`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Triangle {
    /// Stored normal as read from, or to be written to, the stream.
    pub normal: Vector,

    /// Vertices in winding order.
    pub vertex: [Vector; 3],

    /// Trailing 16 bit field of a binary record. Producers disagree on what
    /// it means (some use it as a colour flag), so it is carried untouched.
    /// Always zero for triangles decoded from text.
    pub attr_byte_count: u16,
}

impl Triangle {
    pub fn new(normal: Vector, vertex: [Vector; 3]) -> Triangle {
        Triangle {
            normal,
            vertex,
            attr_byte_count: 0,
        }
    }

    pub fn with_attr_byte_count(mut self, attr_byte_count: u16) -> Triangle {
        self.attr_byte_count = attr_byte_count;
        self
    }

    /// Computed unit normal, see [`geometry::facet_normal`].
    pub fn facet_normal(&self) -> Vector {
        geometry::facet_normal(self)
    }
}
