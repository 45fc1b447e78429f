//! Distance between a point cloud and other geometries.
//!
//! The points are the elements of the cloud: they have no volume, so distances to solids are
//! signed while distances to other clouds are not.

use crate::math::{Isometry, Real};
use crate::partitioning::PointIndex;
use crate::query::distance::distance_point::{grid_point, primitive_point};
use crate::query::distance::distance_primitive::RoundCore;
use crate::query::proximity::Proximity;
use crate::shape::{PointCloud, Primitive, VolumeGrid};

#[cfg(feature = "parallel")]
use {ordered_float::OrderedFloat, rayon::prelude::*};

/// Clouds with fewer points are always processed sequentially.
#[cfg(feature = "parallel")]
const PARALLEL_MIN_POINTS: usize = 4096;

/// The smallest proximity returned by `f` over the points `0..num_points`.
///
/// `f` is given the index of a point and the distance it must beat. Among equal distances,
/// the smallest point index wins.
pub(crate) fn closest_over_points(
    num_points: usize,
    max_dist: Real,
    f: impl Fn(usize, Real) -> Option<Proximity> + Sync,
) -> Option<Proximity> {
    #[cfg(feature = "parallel")]
    if num_points >= PARALLEL_MIN_POINTS {
        return (0..num_points)
            .into_par_iter()
            .filter_map(|i| f(i, max_dist).filter(|p| p.dist < max_dist).map(|p| (i, p)))
            .min_by_key(|(i, p)| (OrderedFloat(p.dist), *i))
            .map(|(_, p)| p);
    }

    let mut best: Option<Proximity> = None;
    for i in 0..num_points {
        let bound = best.map(|b| b.dist).unwrap_or(max_dist);
        if let Some(prox) = f(i, bound).filter(|p| p.dist < bound) {
            best = Some(prox);
        }
    }

    best
}

/// Distance between a point cloud and a primitive placed by `pos12` in the frame of the cloud.
pub(crate) fn point_cloud_primitive(
    pc: &PointCloud,
    index: &PointIndex,
    prim: &Primitive,
    pos12: &Isometry<Real>,
    max_dist: Real,
) -> Option<Proximity> {
    let points = pc.points();

    if let Some((RoundCore::Point(center), radius)) = RoundCore::of(prim) {
        let center = pos12 * center;
        let (i, _) = index.nearest(&center, max_dist + radius)?;
        let prox = Proximity::between_points(points[i as usize], center)
            .padded(0.0, radius)
            .with_elem1(Some(i as usize));
        return (prox.dist < max_dist).then_some(prox);
    }

    closest_over_points(points.len(), max_dist, |i, _| {
        let local = pos12.inverse_transform_point(&points[i]);
        let prox = primitive_point(prim, &local)
            .flipped()
            .transform_by(pos12)
            .with_elem1(Some(i));
        Some(prox)
    })
}

/// Distance between a point cloud and the level set of a volume grid placed by `pos12`.
pub(crate) fn point_cloud_grid(
    pc: &PointCloud,
    grid: &VolumeGrid,
    pos12: &Isometry<Real>,
    max_dist: Real,
) -> Option<Proximity> {
    let points = pc.points();

    closest_over_points(points.len(), max_dist, |i, _| {
        let local = pos12.inverse_transform_point(&points[i]);
        let prox = grid_point(grid, &local)
            .flipped()
            .transform_by(pos12)
            .with_elem1(Some(i));
        Some(prox)
    })
}

/// Unsigned distance between the closest points of two clouds.
pub(crate) fn point_cloud_point_cloud(
    pc1: &PointCloud,
    pc2: &PointCloud,
    index2: &PointIndex,
    pos12: &Isometry<Real>,
    max_dist: Real,
) -> Option<Proximity> {
    let points1 = pc1.points();
    let points2 = pc2.points();

    closest_over_points(points1.len(), max_dist, |i, bound| {
        let local = pos12.inverse_transform_point(&points1[i]);
        let (j, _) = index2.nearest(&local, bound)?;
        let prox = Proximity::between_points(points1[i], pos12 * points2[j as usize])
            .with_elem1(Some(i))
            .with_elem2(Some(j as usize));
        Some(prox)
    })
}

#[cfg(test)]
mod test {
    use super::{point_cloud_point_cloud, point_cloud_primitive};
    use crate::math::{Isometry, Point, Real};
    use crate::partitioning::PointIndex;
    use crate::shape::{PointCloud, Primitive};

    fn line_cloud() -> PointCloud {
        PointCloud::from_points((0..10).map(|i| Point::new(i as Real, 0.0, 0.0)).collect())
    }

    #[test]
    fn cloud_sphere_uses_the_nearest_point() {
        let pc = line_cloud();
        let index = PointIndex::new(pc.points());
        let sphere = Primitive::sphere(Point::origin(), 0.5);
        let pos12 = Isometry::translation(4.2, 2.0, 0.0);
        let prox = point_cloud_primitive(&pc, &index, &sphere, &pos12, Real::MAX).unwrap();
        assert_eq!(prox.elem1, Some(4));
        assert_relative_eq!(prox.dist, (0.04 as Real + 4.0).sqrt() - 0.5, epsilon = 1.0e-12);
    }

    #[test]
    fn cloud_inside_a_box_is_at_negative_distance() {
        let pc = line_cloud();
        let index = PointIndex::new(pc.points());
        let aabb = Primitive::aabb(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0));
        let pos12 = Isometry::translation(4.0, 0.0, 0.0);
        let prox = point_cloud_primitive(&pc, &index, &aabb, &pos12, Real::MAX).unwrap();
        assert_eq!(prox.elem1, Some(4));
        assert_relative_eq!(prox.dist, -1.0, epsilon = 1.0e-12);
    }

    #[test]
    fn equally_close_points_resolve_to_the_first_one() {
        let pc1 = line_cloud();
        let pc2 = PointCloud::from_points(vec![Point::new(0.0, 3.0, 0.0)]);
        let index2 = PointIndex::new(pc2.points());
        let pos12 = Isometry::translation(0.0, 0.0, 0.0);
        let prox = point_cloud_point_cloud(&pc1, &pc2, &index2, &pos12, Real::MAX).unwrap();
        assert_eq!(prox.elem1, Some(0));
        assert_relative_eq!(prox.dist, 3.0);

        // Every point of the first cloud is at distance 2 from its shifted copy.
        let shifted = line_cloud();
        let pos12 = Isometry::translation(0.0, 0.0, 2.0);
        let index2 = PointIndex::new(shifted.points());
        let prox = point_cloud_point_cloud(&pc1, &shifted, &index2, &pos12, Real::MAX).unwrap();
        assert_eq!(prox.elem1, Some(0));
        assert_relative_eq!(prox.dist, 2.0);
    }
}
