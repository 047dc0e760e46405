pub use nalgebra::base::*;
pub use nalgebra::Vector3;

/// Every component the codecs read or write is carried as a double.
/// Binary records narrow to `f32` on the way out and widen on the way in.
pub type Vector = Vector3<f64>;

/// Shorthand for building a `Vector` from three components.
#[macro_export]
macro_rules! vec3 {
    ($x:expr, $y:expr, $z:expr) => {
        $crate::nalgebra_types::Vector::new($x, $y, $z)
    };
}

pub(crate) trait Narrow {
    fn narrow(&self) -> [f32; 3];
    fn widen(x: [f32; 3]) -> Self;
}

impl Narrow for Vector {
    fn narrow(&self) -> [f32; 3] {
        [self.x as f32, self.y as f32, self.z as f32]
    }

    fn widen(x: [f32; 3]) -> Vector {
        Vector::new(x[0] as f64, x[1] as f64, x[2] as f64)
    }
}
