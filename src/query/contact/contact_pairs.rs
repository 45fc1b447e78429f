//! Contact generation between two non-group geometries.
//!
//! Each backend reports, in the frame of its first object, the point pairs at most `tol`
//! apart, ignoring margins. Meshes report one pair per triangle (or triangle pair), point
//! clouds one pair per point.

use crate::bounding_volume::Aabb;
use crate::geometry::{GeometryData, StoredGeometry};
use crate::math::{Isometry, Point, Real, Vector};
use crate::query::distance::{
    grid_point, mesh_point, primitive_primitive, triangle_point, triangle_triangle, RoundCore,
};
use crate::query::proximity::{DistanceOptions, Proximity};
use crate::shape::Primitive;

/// The smallest bound strictly above `tol`, for backends that only report distances below
/// their bound.
fn inclusive(tol: Real) -> Real {
    tol + Real::EPSILON * tol.abs().max(1.0)
}

/// The center and radius of a point or sphere primitive.
fn ball(prim: &Primitive) -> Option<(Point<Real>, Real)> {
    match RoundCore::of(prim)? {
        (RoundCore::Point(center), radius) => Some((center, radius)),
        _ => None,
    }
}

pub(crate) fn local_contacts(
    g1: &StoredGeometry,
    g2: &StoredGeometry,
    pos12: &Isometry<Real>,
    tol: Real,
    out: &mut Vec<Proximity>,
) {
    use GeometryData as D;

    let (Some(d1), Some(d2)) = (g1.data(), g2.data()) else {
        return;
    };
    let bound = inclusive(tol);
    let start = out.len();

    match (d1, d2) {
        (D::TriangleMesh(m1), D::TriangleMesh(m2)) => {
            let (Some(bvh1), Some(bvh2)) = (g1.bvh(), g2.bvh()) else {
                return;
            };
            bvh1.traverse_bvtt(&bvh2, pos12, tol, &mut |i, j| {
                let tri2 = m2.triangle(j).transformed(pos12);
                if let Some(prox) = triangle_triangle(&m1.triangle(i), &tri2, bound) {
                    out.push(prox.with_elem1(Some(i as usize)).with_elem2(Some(j as usize)));
                }
            });
        }
        (D::TriangleMesh(mesh), D::PointCloud(pc)) => {
            let Some(bvh) = g1.bvh() else {
                return;
            };
            let opts = DistanceOptions::exact(bound);
            for (j, pt) in pc.points().iter().enumerate() {
                if let Some(prox) = mesh_point(mesh, &bvh, &(pos12 * pt), &opts) {
                    out.push(prox.with_elem2(Some(j)));
                }
            }
        }
        (D::PointCloud(pc1), D::PointCloud(pc2)) => {
            let Some(index2) = g2.point_index() else {
                return;
            };
            let points2 = pc2.points();
            for (i, pt) in pc1.points().iter().enumerate() {
                let local = pos12.inverse_transform_point(pt);
                if let Some((j, _)) = index2.nearest(&local, bound) {
                    let prox = Proximity::between_points(*pt, pos12 * points2[j as usize]);
                    out.push(prox.with_elem1(Some(i)).with_elem2(Some(j as usize)));
                }
            }
        }
        (D::PointCloud(pc), D::VolumeGrid(grid)) => {
            for (i, pt) in pc.points().iter().enumerate() {
                let local = pos12.inverse_transform_point(pt);
                let prox = grid_point(grid, &local).flipped().transform_by(pos12);
                if prox.dist <= tol {
                    out.push(prox.with_elem1(Some(i)));
                }
            }
        }
        (D::PointCloud(pc), D::Primitive(prim)) => {
            let (Some((center, radius)), Some(index)) = (ball(prim), g1.point_index()) else {
                return;
            };
            let center = pos12 * center;
            let mut ids: Vec<u32> = index.within_distance(&center, tol + radius).collect();
            ids.sort_unstable();

            for i in ids {
                let prox = Proximity::between_points(pc.points()[i as usize], center).padded(0.0, radius);
                if prox.dist <= tol {
                    out.push(prox.with_elem1(Some(i as usize)));
                }
            }
        }
        (D::TriangleMesh(mesh), D::Primitive(prim)) => {
            let (Some((center, radius)), Some(bvh)) = (ball(prim), g1.bvh()) else {
                return;
            };
            let center = pos12 * center;
            let region = Aabb::from_half_extents(center, Vector::repeat(radius + tol));
            let mut ids: Vec<u32> = bvh.intersect_aabb(&region).collect();
            ids.sort_unstable();

            for i in ids {
                let prox = triangle_point(&mesh.triangle(i), &center).padded(0.0, radius);
                if prox.dist <= tol {
                    out.push(prox.with_elem1(Some(i as usize)));
                }
            }
        }
        (D::VolumeGrid(grid), D::Primitive(prim)) => {
            if let Some((center, radius)) = ball(prim) {
                let prox = grid_point(grid, &(pos12 * center)).padded(0.0, radius);
                if prox.dist <= tol {
                    out.push(prox);
                }
            }
        }
        (D::Primitive(p1), D::Primitive(p2)) => {
            if let Some(prox) = primitive_primitive(p1, p2, pos12, bound) {
                out.push(prox);
            }
        }
        (D::PointCloud(_), D::TriangleMesh(_))
        | (D::Primitive(_), D::TriangleMesh(_))
        | (D::Primitive(_), D::PointCloud(_))
        | (D::Primitive(_), D::VolumeGrid(_))
        | (D::VolumeGrid(_), D::PointCloud(_)) => {
            local_contacts(g2, g1, &pos12.inverse(), tol, out);
            for prox in &mut out[start..] {
                *prox = prox.transform_by(pos12).flipped();
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod test {
    use super::local_contacts;
    use crate::geometry::StoredGeometry;
    use crate::math::{Isometry, Point, Real};
    use crate::shape::{PointCloud, Primitive};

    #[test]
    fn cloud_points_within_tolerance_of_a_sphere() {
        let pc = PointCloud::from_points((0..10).map(|i| Point::new(i as Real * 0.5, 0.0, 0.0)).collect());
        let g1 = StoredGeometry::new(pc);
        let g2 = StoredGeometry::new(Primitive::sphere(Point::origin(), 1.0));
        let mut out = vec![];

        local_contacts(&g1, &g2, &Isometry::translation(2.0, 0.0, 0.0), 0.1, &mut out);
        // Points 2 to 6 lie in [1, 3], points 2 and 6 exactly on the sphere.
        let elems: Vec<_> = out.iter().map(|p| p.elem1).collect();
        assert_eq!(elems, vec![Some(2), Some(3), Some(4), Some(5), Some(6)]);
        assert!(out.iter().all(|p| p.dist <= 0.1));

        let mut swapped = vec![];
        local_contacts(&g2, &g1, &Isometry::translation(-2.0, 0.0, 0.0), 0.1, &mut swapped);
        assert_eq!(swapped.len(), out.len());
        assert!(swapped.iter().all(|p| p.elem2.is_some() && p.elem1.is_none()));
    }
}
