use crate::error::GeometryError;
use crate::math::{Point, Real, Vector};

/// Tolerances of a distance query.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct DistanceQuerySettings {
    /// Relative error allowed on the result.
    pub rel_err: Real,
    /// Absolute error allowed on the result.
    pub abs_err: Real,
    /// Once the distance is known to be at least this value, the query stops and returns it.
    pub upper_bound: Real,
}

impl Default for DistanceQuerySettings {
    fn default() -> Self {
        DistanceQuerySettings {
            rel_err: 0.0,
            abs_err: 0.0,
            upper_bound: Real::INFINITY,
        }
    }
}

impl DistanceQuerySettings {
    /// Settings with the given error tolerances and no upper bound.
    pub fn with_tolerances(rel_err: Real, abs_err: Real) -> Self {
        DistanceQuerySettings {
            rel_err,
            abs_err,
            ..Default::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<(), GeometryError> {
        if !(self.rel_err >= 0.0 && self.abs_err >= 0.0) || self.upper_bound.is_nan() {
            return Err(GeometryError::InvalidParameter(format!(
                "invalid distance query settings: {self:?}"
            )));
        }

        Ok(())
    }
}

/// The result of a distance query.
///
/// Points and gradients are expressed in world coordinates. `grad1` is the gradient of the
/// distance with respect to a translation of the first object, so moving it along `-grad1`
/// reduces the distance. For separated objects this is the unit vector from `cp2` toward
/// `cp1`. `grad2` is always `-grad1`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct DistanceQueryResult {
    /// The signed distance, negative when the objects penetrate.
    pub d: Real,
    /// Are `cp1` and `cp2` meaningful?
    pub has_closest_points: bool,
    /// Are `grad1` and `grad2` meaningful?
    pub has_gradients: bool,
    /// The closest point on the first object.
    pub cp1: Point<Real>,
    /// The closest point on the second object.
    pub cp2: Point<Real>,
    /// The gradient of the distance with respect to the position of the first object.
    pub grad1: Vector<Real>,
    /// The gradient of the distance with respect to the position of the second object.
    pub grad2: Vector<Real>,
    /// The element of the first object realizing the distance: a triangle, a point or a
    /// group child.
    pub elem1: Option<usize>,
    /// The element of the second object realizing the distance.
    pub elem2: Option<usize>,
}

impl DistanceQueryResult {
    /// A result carrying only a distance value.
    pub fn from_distance(d: Real) -> Self {
        DistanceQueryResult {
            d,
            has_closest_points: false,
            has_gradients: false,
            cp1: Point::origin(),
            cp2: Point::origin(),
            grad1: Vector::zeros(),
            grad2: Vector::zeros(),
            elem1: None,
            elem2: None,
        }
    }
}

/// Contacts between two objects, as parallel arrays with one entry per contact.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct ContactQueryResult {
    /// Penetration depths between the padded objects. Zero when it could not be determined.
    pub depths: Vec<Real>,
    /// Contact points on the padded surface of the first object.
    pub points1: Vec<Point<Real>>,
    /// Contact points on the padded surface of the second object.
    pub points2: Vec<Point<Real>>,
    /// Unit normals pointing from the first object toward the second, or zero.
    pub normals: Vec<Vector<Real>>,
    /// Elements of the first object in contact.
    pub elems1: Vec<Option<usize>>,
    /// Elements of the second object in contact.
    pub elems2: Vec<Option<usize>>,
}

impl ContactQueryResult {
    /// The number of contacts.
    #[inline]
    pub fn len(&self) -> usize {
        self.depths.len()
    }

    /// Are there no contacts?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }
}
