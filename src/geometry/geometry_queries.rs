use crate::error::GeometryError;
use crate::geometry::Geometry;
use crate::math::{Point, Real, Vector};
use crate::query::{
    self, ContactQueryResult, DistanceQueryResult, DistanceQuerySettings, Posed, Ray,
};

fn check_non_negative(what: &str, value: Real) -> Result<(), GeometryError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(GeometryError::InvalidParameter(format!(
            "{what} must be finite and non-negative, got {value}"
        )))
    }
}

impl Geometry {
    fn with_posed<R>(&self, f: impl FnOnce(&Posed<'_>) -> R) -> Result<R, GeometryError> {
        let pos = *self.current_isometry();
        let margin = self.collision_margin();
        self.with_stored(|stored| f(&Posed::new(stored, pos, margin)))
    }

    fn with_pair<R>(
        &self,
        other: &Geometry,
        f: impl FnOnce(&Posed<'_>, &Posed<'_>) -> Result<R, GeometryError>,
    ) -> Result<R, GeometryError> {
        self.with_posed(|a| other.with_posed(|b| f(a, b)))??
    }

    /// Do `self` and `other`, enlarged by their margins, touch or overlap?
    ///
    /// Fails with `UnsupportedOperation` if some pair of (possibly nested) elements has no
    /// collision backend.
    pub fn collides(&self, other: &Geometry) -> Result<bool, GeometryError> {
        self.with_pair(other, query::query_collides)
    }

    /// Are `self` and `other`, enlarged by their margins, at most `tol` apart?
    pub fn within_distance(&self, other: &Geometry, tol: Real) -> Result<bool, GeometryError> {
        check_non_negative("the distance tolerance", tol)?;
        self.with_pair(other, |a, b| {
            let b = Posed::new(b.geom, b.pos, b.margin + tol);
            query::query_collides(a, &b)
        })
    }

    /// The signed distance between `self` and `other`, within the given error tolerances.
    pub fn distance_simple(
        &self,
        other: &Geometry,
        rel_err: Real,
        abs_err: Real,
    ) -> Result<Real, GeometryError> {
        let settings = DistanceQuerySettings::with_tolerances(rel_err, abs_err);
        Ok(self.distance_ext(other, &settings)?.d)
    }

    /// The signed distance between `self` and `other`, with closest points and gradients.
    pub fn distance(&self, other: &Geometry) -> Result<DistanceQueryResult, GeometryError> {
        self.distance_ext(other, &DistanceQuerySettings::default())
    }

    /// The signed distance between `self` and `other` under the given settings.
    ///
    /// If the objects are at least `settings.upper_bound` apart, the result carries only
    /// that bound.
    pub fn distance_ext(
        &self,
        other: &Geometry,
        settings: &DistanceQuerySettings,
    ) -> Result<DistanceQueryResult, GeometryError> {
        self.with_pair(other, |a, b| query::query_distance(a, b, settings))
    }

    /// The distance from `self`, enlarged by its margin, to a world-space point.
    ///
    /// Signed for primitives, volume grids and convex hulls. Infinite if `self` is empty.
    pub fn distance_point(&self, pt: &Point<Real>) -> Result<Real, GeometryError> {
        let prox = self.with_posed(|a| query::point_distance(a, pt))??;
        Ok(prox.map(|p| p.dist).unwrap_or(Real::INFINITY))
    }

    /// The distance from `self` to a world-space point, with the closest point on `self`
    /// as `cp1` and the query point as `cp2`.
    pub fn distance_point_ext(
        &self,
        pt: &Point<Real>,
        settings: &DistanceQuerySettings,
    ) -> Result<DistanceQueryResult, GeometryError> {
        settings.validate()?;
        let prox = self.with_posed(|a| query::point_distance(a, pt))??;

        Ok(match prox.filter(|p| p.dist < settings.upper_bound) {
            Some(prox) => prox.to_result(),
            None => DistanceQueryResult::from_distance(settings.upper_bound),
        })
    }

    /// The first world-space point hit by the ray `origin + t * dir`, `t >= 0`.
    pub fn ray_cast(
        &self,
        origin: &Point<Real>,
        dir: &Vector<Real>,
    ) -> Result<Option<Point<Real>>, GeometryError> {
        let ray = Ray::new(*origin, *dir);
        let toi = self.with_posed(|a| query::ray_cast(a, &ray))??;
        Ok(toi.map(|t| ray.point_at(t)))
    }

    /// The contacts between `self` padded by `padding1` and `other` padded by `padding2`,
    /// on top of their margins.
    ///
    /// If `max_contacts` is non-zero, nearby contacts are clustered so that at most
    /// `max_contacts` are reported.
    pub fn contacts(
        &self,
        other: &Geometry,
        padding1: Real,
        padding2: Real,
        max_contacts: usize,
    ) -> Result<ContactQueryResult, GeometryError> {
        self.with_pair(other, |a, b| {
            query::query_contacts(a, b, padding1, padding2, max_contacts)
        })
    }

    /// The world-space point of a convex hull furthest along `dir`, margin included.
    pub fn support(&self, dir: &Vector<Real>) -> Result<Point<Real>, GeometryError> {
        self.with_posed(|a| query::support(a, dir))?
    }
}
