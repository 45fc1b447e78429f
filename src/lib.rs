/*!
proxima3d
=========

**proxima3d** is a 3-dimensional proximity-query library written with
the rust programming language.

It lets triangle meshes, point clouds, volume grids, convex hulls,
parametric primitives and groups of those be queried uniformly for
collision, signed distance, contact regions and ray casts. Every query
takes the current transform and collision margin of its operands into
account without touching the stored coordinates.

```
use proxima3d::geometry::Geometry;
use proxima3d::math::Point;
use proxima3d::shape::Primitive;

let a = Geometry::from(Primitive::sphere(Point::origin(), 1.0));
let b = Geometry::from(Primitive::sphere(Point::new(3.0, 0.0, 0.0), 1.0));
assert_eq!(a.distance_simple(&b, 0.0, 0.0).unwrap(), 1.0);
```
*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::module_inception)]
#![allow(clippy::manual_range_contains)] // This usually makes it way more verbose that it could be.
#![allow(clippy::type_complexity)] // Complains about closures that are fairly simple.
#![warn(unused_qualifications)]

#[cfg(feature = "serde-serialize")]
#[macro_use]
extern crate serde;
#[macro_use]
extern crate approx;
extern crate num_traits as num;

pub extern crate nalgebra as na;

pub mod bounding_volume;
pub mod error;
pub mod geometry;
pub mod partitioning;
pub mod query;
pub mod shape;
pub mod transformation;
pub mod utils;

pub use crate::error::GeometryError;

mod real {
    /// The scalar type used throughout this crate.
    pub use f64 as Real;
}

/// Aliases for mathematical types.
pub mod math {
    pub use super::real::*;
    pub use na::{Isometry3, Matrix3, Point3, Translation3, UnitVector3, Vector3};
    use na::UnitQuaternion;

    /// The default tolerance used for geometric operations.
    pub const DEFAULT_EPSILON: Real = Real::EPSILON;

    /// The dimension of the space.
    pub const DIM: usize = 3;

    /// The point type.
    pub use Point3 as Point;

    /// The vector type.
    pub use Vector3 as Vector;

    /// The unit vector type.
    pub use UnitVector3 as UnitVector;

    /// The matrix type.
    pub use Matrix3 as Matrix;

    /// The transformation matrix type.
    pub use Isometry3 as Isometry;

    /// The rotation type.
    pub type Rotation<N> = UnitQuaternion<N>;

    /// The translation type.
    pub use Translation3 as Translation;
}
