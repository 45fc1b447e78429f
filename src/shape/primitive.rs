//! Parametric geometric primitives.

use crate::bounding_volume::Aabb;
use crate::error::GeometryError;
use crate::math::{Matrix, Point, Real, Vector};
use crate::shape::SupportMap;
use std::fmt;
use std::str::FromStr;

/// A parametric convex primitive: a point, a sphere, a segment or an axis-aligned box.
///
/// The text form of a primitive is its type name followed by its parameters, e.g.
/// `"Sphere 0 0 0 1"` for the unit sphere at the origin.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Primitive {
    /// A single point.
    Point(Point<Real>),
    /// A solid ball.
    Sphere {
        /// The center of the ball.
        center: Point<Real>,
        /// The radius of the ball.
        radius: Real,
    },
    /// A segment between two points.
    Segment {
        /// The first endpoint.
        a: Point<Real>,
        /// The second endpoint.
        b: Point<Real>,
    },
    /// A solid axis-aligned box.
    Aabb {
        /// The corner with the smallest coordinates.
        mins: Point<Real>,
        /// The corner with the largest coordinates.
        maxs: Point<Real>,
    },
}

impl Primitive {
    /// A point primitive.
    pub fn point(pt: Point<Real>) -> Self {
        Primitive::Point(pt)
    }

    /// A sphere primitive.
    pub fn sphere(center: Point<Real>, radius: Real) -> Self {
        Primitive::Sphere { center, radius }
    }

    /// A segment primitive.
    pub fn segment(a: Point<Real>, b: Point<Real>) -> Self {
        Primitive::Segment { a, b }
    }

    /// An axis-aligned box primitive. The corners are reordered if needed.
    pub fn aabb(mins: Point<Real>, maxs: Point<Real>) -> Self {
        Primitive::Aabb {
            mins: mins.inf(&maxs),
            maxs: mins.sup(&maxs),
        }
    }

    /// The type tag of this primitive, as used in its text form.
    pub fn type_name(&self) -> &'static str {
        match self {
            Primitive::Point(_) => "Point",
            Primitive::Sphere { .. } => "Sphere",
            Primitive::Segment { .. } => "Segment",
            Primitive::Aabb { .. } => "AABB",
        }
    }

    /// The flat parameter list of this primitive.
    ///
    /// A point has 3 parameters, a sphere 4 (center then radius), a segment and a box 6.
    pub fn properties(&self) -> Vec<Real> {
        match self {
            Primitive::Point(p) => p.coords.as_slice().to_vec(),
            Primitive::Sphere { center, radius } => {
                vec![center.x, center.y, center.z, *radius]
            }
            Primitive::Segment { a: p1, b: p2 } | Primitive::Aabb { mins: p1, maxs: p2 } => {
                vec![p1.x, p1.y, p1.z, p2.x, p2.y, p2.z]
            }
        }
    }

    /// Builds a primitive from its type tag and its flat parameter list.
    pub fn from_properties(type_name: &str, props: &[Real]) -> Result<Self, GeometryError> {
        let expected = match type_name {
            "Point" => 3,
            "Sphere" => 4,
            "Segment" | "AABB" => 6,
            _ => {
                return Err(GeometryError::MalformedData(format!(
                    "unknown primitive type `{type_name}`"
                )))
            }
        };

        if props.len() != expected {
            return Err(GeometryError::MalformedData(format!(
                "a {} needs {} parameters, got {}",
                type_name,
                expected,
                props.len()
            )));
        }

        if props.iter().any(|x| !x.is_finite()) {
            return Err(GeometryError::MalformedData(
                "primitive parameters must be finite".to_string(),
            ));
        }

        let p1 = Point::new(props[0], props[1], props[2]);

        Ok(match type_name {
            "Point" => Primitive::Point(p1),
            "Sphere" => {
                if props[3] < 0.0 {
                    return Err(GeometryError::MalformedData(
                        "a sphere radius cannot be negative".to_string(),
                    ));
                }
                Primitive::sphere(p1, props[3])
            }
            "Segment" => Primitive::segment(p1, Point::new(props[3], props[4], props[5])),
            _ => Primitive::aabb(p1, Point::new(props[3], props[4], props[5])),
        })
    }

    /// The axis-aligned bounding box of this primitive.
    pub fn local_aabb(&self) -> Aabb {
        match self {
            Primitive::Point(p) => Aabb::new(*p, *p),
            Primitive::Sphere { center, radius } => {
                Aabb::from_half_extents(*center, Vector::repeat(*radius))
            }
            Primitive::Segment { a, b } => Aabb::from_points(&[*a, *b]),
            Primitive::Aabb { mins, maxs } => Aabb::new(*mins, *maxs),
        }
    }

    /// The volume enclosed by this primitive.
    pub fn volume(&self) -> Real {
        match self {
            Primitive::Point(_) | Primitive::Segment { .. } => 0.0,
            Primitive::Sphere { radius, .. } => {
                4.0 / 3.0 * std::f64::consts::PI * radius * radius * radius
            }
            Primitive::Aabb { mins, maxs } => Aabb::new(*mins, *maxs).volume(),
        }
    }

    /// Does this primitive enclose a volume?
    pub fn is_solid(&self) -> bool {
        matches!(self, Primitive::Sphere { .. } | Primitive::Aabb { .. })
    }

    /// Translates this primitive.
    pub fn translate(&mut self, t: &Vector<Real>) {
        match self {
            Primitive::Point(p) => *p += t,
            Primitive::Sphere { center, .. } => *center += t,
            Primitive::Segment { a: p1, b: p2 } | Primitive::Aabb { mins: p1, maxs: p2 } => {
                *p1 += t;
                *p2 += t;
            }
        }
    }

    /// Checks that the linear map `linear` can be baked into this primitive.
    ///
    /// Spheres only accept similarities and boxes only accept maps sending the coordinate axes
    /// to coordinate axes.
    pub fn check_linear_map(&self, linear: &Matrix<Real>) -> Result<(), GeometryError> {
        let supported = match self {
            Primitive::Point(_) | Primitive::Segment { .. } => true,
            Primitive::Sphere { .. } => uniform_scale(linear).is_some(),
            Primitive::Aabb { .. } => permutes_axes(linear),
        };

        if supported {
            Ok(())
        } else {
            Err(GeometryError::InvalidParameter(format!(
                "the linear map cannot be applied exactly to a {}",
                self.type_name()
            )))
        }
    }

    /// Applies the affine map `x -> linear * x + t` to this primitive.
    pub fn transform(&mut self, linear: &Matrix<Real>, t: &Vector<Real>) -> Result<(), GeometryError> {
        self.check_linear_map(linear)?;

        match self {
            Primitive::Point(p) => *p = Point::from(linear * p.coords + t),
            Primitive::Sphere { center, radius } => {
                *center = Point::from(linear * center.coords + t);
                *radius *= uniform_scale(linear).unwrap_or(1.0);
            }
            Primitive::Segment { a, b } => {
                *a = Point::from(linear * a.coords + t);
                *b = Point::from(linear * b.coords + t);
            }
            Primitive::Aabb { mins, maxs } => {
                let p1 = Point::from(linear * mins.coords + t);
                let p2 = Point::from(linear * maxs.coords + t);
                *mins = p1.inf(&p2);
                *maxs = p1.sup(&p2);
            }
        }

        Ok(())
    }
}

/// The scale factor of `linear` if it is a rotation (or reflection) times a uniform scaling.
fn uniform_scale(linear: &Matrix<Real>) -> Option<Real> {
    let s = linear.determinant().abs().cbrt();
    let gram = linear.transpose() * linear;
    let err = (gram - Matrix::identity() * (s * s)).norm();

    if s > 0.0 && err <= 1.0e-9 * (1.0 + s * s) {
        Some(s)
    } else {
        None
    }
}

fn permutes_axes(linear: &Matrix<Real>) -> bool {
    let eps = 1.0e-12 * (1.0 + linear.amax());

    (0..3).all(|c| linear.column(c).iter().filter(|x| x.abs() > eps).count() == 1)
        && (0..3).all(|r| linear.row(r).iter().filter(|x| x.abs() > eps).count() == 1)
}

impl SupportMap for Primitive {
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        match self {
            Primitive::Point(p) => *p,
            Primitive::Sphere { center, radius } => match dir.try_normalize(0.0) {
                Some(n) => center + n * *radius,
                None => *center,
            },
            Primitive::Segment { a, b } => {
                if a.coords.dot(dir) > b.coords.dot(dir) {
                    *a
                } else {
                    *b
                }
            }
            Primitive::Aabb { mins, maxs } => Point::new(
                if dir.x >= 0.0 { maxs.x } else { mins.x },
                if dir.y >= 0.0 { maxs.y } else { mins.y },
                if dir.z >= 0.0 { maxs.z } else { mins.z },
            ),
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())?;
        for x in self.properties() {
            write!(f, " {x}")?;
        }
        Ok(())
    }
}

impl FromStr for Primitive {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let type_name = tokens
            .next()
            .ok_or_else(|| GeometryError::MalformedData("empty primitive string".to_string()))?;
        let props = tokens
            .map(|tok| {
                tok.parse::<Real>().map_err(|_| {
                    GeometryError::MalformedData(format!("invalid primitive parameter `{tok}`"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Primitive::from_properties(type_name, &props)
    }
}

#[cfg(test)]
mod test {
    use super::Primitive;
    use crate::math::{Matrix, Point, Vector};

    #[test]
    fn primitive_text_form() {
        let sphere = Primitive::sphere(Point::new(1.0, 2.0, 3.0), 0.5);
        let text = sphere.to_string();
        assert_eq!(text, "Sphere 1 2 3 0.5");
        assert_eq!(text.parse::<Primitive>().unwrap(), sphere);
        assert!("Sphere 1 2".parse::<Primitive>().is_err());
        assert!("Cone 1 2 3 4".parse::<Primitive>().is_err());
    }

    #[test]
    fn sphere_rejects_non_uniform_scaling() {
        let mut sphere = Primitive::sphere(Point::origin(), 1.0);
        let stretch = Matrix::from_diagonal(&Vector::new(1.0, 2.0, 1.0));
        assert!(sphere.transform(&stretch, &Vector::zeros()).is_err());
        assert_eq!(sphere, Primitive::sphere(Point::origin(), 1.0));

        sphere
            .transform(&(Matrix::identity() * 2.0), &Vector::x())
            .unwrap();
        assert_eq!(sphere, Primitive::sphere(Point::new(1.0, 0.0, 0.0), 2.0));
    }

    #[test]
    fn aabb_accepts_axis_permutations_only() {
        let mut aabb = Primitive::aabb(Point::origin(), Point::new(1.0, 2.0, 3.0));
        let swap_xy = Matrix::new(0.0, 1.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
        aabb.transform(&swap_xy, &Vector::zeros()).unwrap();
        assert_eq!(
            aabb,
            Primitive::aabb(Point::new(0.0, -1.0, 0.0), Point::new(2.0, 0.0, 3.0))
        );

        let rot = na::Rotation3::from_axis_angle(&Vector::z_axis(), 0.3);
        assert!(aabb.transform(rot.matrix(), &Vector::zeros()).is_err());
    }
}
