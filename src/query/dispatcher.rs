//! Routing of queries to the backend matching the variants of their operands.
//!
//! Pairs are validated, recursively through groups, before any backend runs. Groups are
//! then expanded child by child, composing poses and margins, and every leaf pair is handed
//! to a backend in the frame of its first operand.

use crate::error::GeometryError;
use crate::geometry::{GeometryData, GeometryType};
use crate::math::{Point, Real, Vector};
use crate::query::distance::{
    self, grid_point, mesh_point, polyhedron_point, primitive_point,
};
use crate::query::proximity::{DistanceOptions, Posed, Proximity};
use crate::query::{
    ray_toi_with_ball, DistanceQueryResult, DistanceQuerySettings, Ray, RayCast,
};
use crate::shape::{Primitive, SupportMap};

/// The pairwise queries subject to the support matrix.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum QueryKind {
    Collides,
    Distance,
    Contacts,
}

impl QueryKind {
    pub fn name(self) -> &'static str {
        match self {
            QueryKind::Collides => "collides",
            QueryKind::Distance => "distance",
            QueryKind::Contacts => "contacts",
        }
    }
}

fn is_pair(t1: GeometryType, t2: GeometryType, a: GeometryType, b: GeometryType) -> bool {
    (t1 == a && t2 == b) || (t1 == b && t2 == a)
}

/// Is there a backend for `kind` between two non-group variants?
///
/// Contacts additionally depend on the primitive subtypes and on the padding, see
/// [`check_leaf_pair`].
pub(crate) fn pair_supported(kind: QueryKind, t1: GeometryType, t2: GeometryType) -> bool {
    use GeometryType as T;

    if t1 == T::Group || t2 == T::Group {
        return true;
    }

    if t1 == T::ConvexHull || t2 == T::ConvexHull {
        return t1 == t2 && kind != QueryKind::Contacts;
    }

    if is_pair(t1, t2, T::VolumeGrid, T::TriangleMesh) || is_pair(t1, t2, T::VolumeGrid, T::VolumeGrid) {
        return false;
    }

    !(kind == QueryKind::Distance && is_pair(t1, t2, T::PointCloud, T::PointCloud))
}

fn is_point_or_sphere(data: &GeometryData) -> bool {
    matches!(
        data,
        GeometryData::Primitive(Primitive::Point(_) | Primitive::Sphere { .. })
    )
}

/// Checks that a pair of non-group data is supported. `tol` is the total padding of the pair.
fn check_leaf_pair(
    kind: QueryKind,
    d1: &GeometryData,
    d2: &GeometryData,
    tol: Real,
) -> Result<(), GeometryError> {
    use GeometryType as T;

    let (t1, t2) = (d1.geometry_type(), d2.geometry_type());
    let unsupported = || Err(GeometryError::unsupported(kind.name(), t1, Some(t2)));

    if !pair_supported(kind, t1, t2) {
        return unsupported();
    }

    if kind == QueryKind::Contacts {
        let has_primitive = t1 == T::Primitive || t2 == T::Primitive;
        if has_primitive
            && !((t1 != T::Primitive || is_point_or_sphere(d1))
                && (t2 != T::Primitive || is_point_or_sphere(d2)))
        {
            return unsupported();
        }

        let needs_padding = is_pair(t1, t2, T::TriangleMesh, T::TriangleMesh)
            || is_pair(t1, t2, T::TriangleMesh, T::PointCloud)
            || is_pair(t1, t2, T::PointCloud, T::PointCloud);
        if needs_padding && tol <= 0.0 {
            return Err(GeometryError::InvalidParameter(format!(
                "contacts between a {t1} and a {t2} need a positive padding or margin"
            )));
        }
    }

    Ok(())
}

/// Validates `kind` between `a` and `b`, recursing through groups.
///
/// `padding` is added to the margins of the first and second operand respectively. Empty
/// data is always valid.
pub(crate) fn validate(
    kind: QueryKind,
    a: &Posed<'_>,
    b: &Posed<'_>,
    padding: (Real, Real),
) -> Result<(), GeometryError> {
    match (a.geom.data(), b.geom.data()) {
        (None, _) | (_, None) => Ok(()),
        (Some(GeometryData::Group(children)), _) => {
            a.for_each_child(children, |_, child| validate(kind, child, b, padding))
        }
        (_, Some(GeometryData::Group(children))) => {
            b.for_each_child(children, |_, child| validate(kind, a, child, padding))
        }
        (Some(d1), Some(d2)) => {
            let tol = a.margin + b.margin + padding.0 + padding.1;
            log::trace!("{} between {} and {}", kind.name(), d1.geometry_type(), d2.geometry_type());
            check_leaf_pair(kind, d1, d2, tol)
        }
    }
}

fn leaf_distance(a: &Posed<'_>, b: &Posed<'_>, opts: &DistanceOptions) -> Option<Proximity> {
    if a.geom.is_empty() || b.geom.is_empty() {
        return None;
    }

    let pos12 = a.pos.inv_mul(&b.pos);
    let local_opts = opts.unpadded(a.margin + b.margin);

    distance::local_distance(a.geom, b.geom, &pos12, &local_opts)
        .map(|p| p.transform_by(&a.pos).padded(a.margin, b.margin))
        .filter(|p| p.dist < opts.max_dist)
}

/// A lower bound of the signed distance to a group child, from the distance to its box.
///
/// Overlapping boxes bound nothing: the child may penetrate arbitrarily deep.
fn child_lower_bound(box_dist: Real) -> Real {
    if box_dist > 0.0 {
        box_dist
    } else {
        Real::NEG_INFINITY
    }
}

/// The closest points between two validated operands, closer than `opts.max_dist`.
///
/// Children of groups whose bounding box is already too far are skipped. The element index
/// reported for a group is the index of the child realizing the distance.
pub(crate) fn posed_distance(
    a: &Posed<'_>,
    b: &Posed<'_>,
    opts: &DistanceOptions,
) -> Result<Option<Proximity>, GeometryError> {
    match (a.geom.data(), b.geom.data()) {
        (None, _) | (_, None) => Ok(None),
        (Some(GeometryData::Group(children)), _) => {
            let b_aabb = b.world_aabb();
            let mut best: Option<Proximity> = None;
            a.for_each_child(children, |i, child| {
                let max_dist = best.map(|p| p.dist).unwrap_or(opts.max_dist);
                let lower_bound = child_lower_bound(child.world_aabb().distance_to_aabb(&b_aabb));
                if opts.prune_cost(lower_bound) < max_dist {
                    if let Some(prox) = posed_distance(child, b, &opts.with_max_dist(max_dist))? {
                        best = Some(prox.with_elem1(Some(i)));
                    }
                }
                Ok(())
            })?;
            Ok(best)
        }
        (_, Some(GeometryData::Group(children))) => {
            let a_aabb = a.world_aabb();
            let mut best: Option<Proximity> = None;
            b.for_each_child(children, |j, child| {
                let max_dist = best.map(|p| p.dist).unwrap_or(opts.max_dist);
                let lower_bound = child_lower_bound(child.world_aabb().distance_to_aabb(&a_aabb));
                if opts.prune_cost(lower_bound) < max_dist {
                    if let Some(prox) = posed_distance(a, child, &opts.with_max_dist(max_dist))? {
                        best = Some(prox.with_elem2(Some(j)));
                    }
                }
                Ok(())
            })?;
            Ok(best)
        }
        _ => Ok(leaf_distance(a, b, opts)),
    }
}

/// Signed distance query between two operands.
pub(crate) fn query_distance(
    a: &Posed<'_>,
    b: &Posed<'_>,
    settings: &DistanceQuerySettings,
) -> Result<DistanceQueryResult, GeometryError> {
    settings.validate()?;
    validate(QueryKind::Distance, a, b, (0.0, 0.0))?;

    let opts = DistanceOptions::from_settings(settings);
    Ok(match posed_distance(a, b, &opts)? {
        Some(prox) => prox.to_result(),
        None => DistanceQueryResult::from_distance(settings.upper_bound),
    })
}

/// Do the padded operands touch or overlap?
pub(crate) fn query_collides(a: &Posed<'_>, b: &Posed<'_>) -> Result<bool, GeometryError> {
    validate(QueryKind::Collides, a, b, (0.0, 0.0))?;
    let opts = DistanceOptions::exact(Real::MIN_POSITIVE);
    Ok(posed_distance(a, b, &opts)?.is_some())
}

/// The proximity between an operand (first object) and a world-space point (second object).
///
/// Primitives, grids and hulls give signed distances, meshes and point clouds unsigned ones.
pub(crate) fn point_distance(
    a: &Posed<'_>,
    pt: &Point<Real>,
) -> Result<Option<Proximity>, GeometryError> {
    let Some(data) = a.geom.data() else {
        return Ok(None);
    };

    let local = a.pos.inverse_transform_point(pt);
    let prox = match data {
        GeometryData::Primitive(p) => Some(primitive_point(p, &local)),
        GeometryData::TriangleMesh(mesh) => a.geom.bvh().and_then(|bvh| {
            mesh_point(mesh, &bvh, &local, &DistanceOptions::exact(Real::INFINITY))
        }),
        GeometryData::PointCloud(pc) => a.geom.point_index().and_then(|index| {
            let (i, _) = index.nearest(&local, Real::INFINITY)?;
            Some(Proximity::between_points(pc.points()[i as usize], local).with_elem1(Some(i as usize)))
        }),
        GeometryData::VolumeGrid(grid) if !grid.is_empty() => Some(grid_point(grid, &local)),
        GeometryData::VolumeGrid(_) => None,
        GeometryData::ConvexHull(hull) if !hull.is_empty() => a
            .geom
            .polyhedron()
            .map(|poly| polyhedron_point(&poly, &local)),
        GeometryData::ConvexHull(_) => None,
        GeometryData::Group(children) => {
            let mut best: Option<Proximity> = None;
            a.for_each_child(children, |i, child| {
                let bound = best.map(|p| p.dist).unwrap_or(Real::INFINITY);
                if child_lower_bound(child.world_aabb().distance_to_local_point(pt)) < bound {
                    if let Some(prox) = point_distance(child, pt)?.filter(|p| p.dist < bound) {
                        best = Some(prox.with_elem1(Some(i)));
                    }
                }
                Ok(())
            })?;
            return Ok(best);
        }
    };

    Ok(prox.map(|p| p.transform_by(&a.pos).padded(a.margin, 0.0)))
}

/// The time of impact of a world-space ray on an operand, if it hits.
///
/// Only zero-volume elements are fattened by the margin.
pub(crate) fn ray_cast(a: &Posed<'_>, ray: &Ray) -> Result<Option<Real>, GeometryError> {
    if ray.dir.norm_squared() == 0.0 {
        return Ok(None);
    }

    let Some(data) = a.geom.data() else {
        return Ok(None);
    };

    let local = ray.inverse_transform_by(&a.pos);
    let toi = match data {
        GeometryData::Primitive(p) => p.cast_local_ray_with_margin(&local, Real::MAX, true, a.margin),
        GeometryData::TriangleMesh(mesh) => a.geom.bvh().and_then(|bvh| {
            bvh.cast_ray(&local, Real::MAX, |i, best| {
                mesh.triangle(i).cast_local_ray(&local, best, true)
            })
            .map(|(_, toi)| toi)
        }),
        GeometryData::PointCloud(pc) => {
            let radius = pc.numeric_setting("radius").unwrap_or(0.0).max(a.margin);
            pc.points()
                .iter()
                .filter_map(|pt| ray_toi_with_ball(pt, radius, &local, true).1)
                .min_by(|t1, t2| t1.total_cmp(t2))
        }
        GeometryData::VolumeGrid(grid) => grid.cast_local_ray(&local, Real::MAX, true),
        GeometryData::ConvexHull(hull) if !hull.is_empty() => a
            .geom
            .polyhedron()
            .and_then(|poly| poly.cast_local_ray(&local, Real::MAX, true)),
        GeometryData::ConvexHull(_) => None,
        GeometryData::Group(children) => {
            let mut best: Option<Real> = None;
            a.for_each_child(children, |_, child| {
                if let Some(toi) = ray_cast(child, ray)? {
                    if best.map(|b| toi < b).unwrap_or(true) {
                        best = Some(toi);
                    }
                }
                Ok(())
            })?;
            best
        }
    };

    Ok(toi)
}

/// The world-space support point of a convex hull along `dir`, including its margin.
pub(crate) fn support(a: &Posed<'_>, dir: &Vector<Real>) -> Result<Point<Real>, GeometryError> {
    match a.geom.data() {
        Some(GeometryData::ConvexHull(hull)) if hull.is_empty() => Err(GeometryError::MalformedData(
            "the convex hull has no point".to_string(),
        )),
        Some(GeometryData::ConvexHull(_)) => {
            let poly = a.geom.polyhedron().ok_or(GeometryError::TypeMismatch {
                expected: GeometryType::ConvexHull,
                found: a.geom.geometry_type(),
            })?;
            let local_dir = a.pos.inverse_transform_vector(dir);
            let pt = a.pos * poly.local_support_point(&local_dir);
            let offset = dir.try_normalize(0.0).unwrap_or_else(Vector::zeros) * a.margin;
            Ok(pt + offset)
        }
        Some(data) => Err(GeometryError::unsupported("support", data.geometry_type(), None)),
        None => Err(GeometryError::TypeMismatch {
            expected: GeometryType::ConvexHull,
            found: None,
        }),
    }
}

#[cfg(test)]
mod test {
    use super::{pair_supported, QueryKind};
    use crate::geometry::GeometryType as T;

    #[test]
    fn support_matrix() {
        for kind in [QueryKind::Collides, QueryKind::Distance, QueryKind::Contacts] {
            assert!(!pair_supported(kind, T::VolumeGrid, T::TriangleMesh));
            assert!(!pair_supported(kind, T::TriangleMesh, T::VolumeGrid));
            assert!(!pair_supported(kind, T::VolumeGrid, T::VolumeGrid));
            assert!(!pair_supported(kind, T::ConvexHull, T::Primitive));
            assert!(pair_supported(kind, T::Primitive, T::TriangleMesh));
            assert!(pair_supported(kind, T::PointCloud, T::VolumeGrid));
            assert!(pair_supported(kind, T::Group, T::ConvexHull));
        }

        assert!(pair_supported(QueryKind::Collides, T::PointCloud, T::PointCloud));
        assert!(!pair_supported(QueryKind::Distance, T::PointCloud, T::PointCloud));
        assert!(pair_supported(QueryKind::Distance, T::ConvexHull, T::ConvexHull));
        assert!(!pair_supported(QueryKind::Contacts, T::ConvexHull, T::ConvexHull));
    }
}
