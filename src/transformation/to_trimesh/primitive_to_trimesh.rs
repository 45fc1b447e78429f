use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::math::{Point, Real};
use crate::shape::{Primitive, TriangleMesh};
use crate::transformation::utils;

const MAX_SUBDIV: u32 = 256;

/// Discretizes the boundary of an axis-aligned box as a triangle mesh.
pub fn aabb_to_trimesh(mins: &Point<Real>, maxs: &Point<Real>) -> TriangleMesh {
    let (vtx, idx) = unit_cuboid();
    let center = na::center(mins, maxs);
    let extents = maxs - mins;
    let vtx = vtx
        .into_iter()
        .map(|p| center + p.coords.component_mul(&extents))
        .collect();

    TriangleMesh::new(vtx, idx).unwrap_or_default()
}

/// Discretizes the boundary of a ball as a closed triangle mesh with edges of length at most
/// about `step`.
pub fn sphere_to_trimesh(center: &Point<Real>, radius: Real, step: Real) -> TriangleMesh {
    let ntheta = utils::subdivisions(TAU * radius, step, 8, MAX_SUBDIV);
    let nphi = utils::subdivisions(PI * radius, step, 4, MAX_SUBDIV);
    let (vtx, idx) = unit_sphere(ntheta, nphi);
    let vtx = vtx.into_iter().map(|p| center + p.coords * (radius * 2.0)).collect();

    TriangleMesh::new(vtx, idx).unwrap_or_default()
}

/// Discretizes the boundary of a primitive.
///
/// Points and segments enclose no surface: they give meshes with vertices but no triangle.
pub fn primitive_to_trimesh(prim: &Primitive, step: Real) -> TriangleMesh {
    match prim {
        Primitive::Point(pt) => TriangleMesh::new(vec![*pt], vec![]).unwrap_or_default(),
        Primitive::Segment { a, b } => TriangleMesh::new(vec![*a, *b], vec![]).unwrap_or_default(),
        Primitive::Sphere { center, radius } => sphere_to_trimesh(center, *radius, step),
        Primitive::Aabb { mins, maxs } => aabb_to_trimesh(mins, maxs),
    }
}

/// A unit-diameter sphere with one vertex at each pole and no duplicated vertex.
fn unit_sphere(ntheta_subdiv: u32, nphi_subdiv: u32) -> (Vec<Point<Real>>, Vec<[u32; 3]>) {
    let dtheta = TAU / ntheta_subdiv as Real;
    let dphi = PI / nphi_subdiv as Real;

    let mut coords = Vec::new();
    let mut idx = Vec::new();

    for k in 1..nphi_subdiv {
        let phi = -FRAC_PI_2 + k as Real * dphi;
        utils::push_circle(phi.cos() * 0.5, ntheta_subdiv, dtheta, phi.sin() * 0.5, &mut coords);
    }

    let nrings = nphi_subdiv - 1;
    let south = coords.len() as u32;
    coords.push(Point::new(0.0, -0.5, 0.0));
    let north = coords.len() as u32;
    coords.push(Point::new(0.0, 0.5, 0.0));

    for k in 0..nrings - 1 {
        utils::push_ring_indices(k * ntheta_subdiv, (k + 1) * ntheta_subdiv, ntheta_subdiv, &mut idx);
    }

    utils::push_bottom_fan_indices(0, south, ntheta_subdiv, &mut idx);
    utils::push_top_fan_indices((nrings - 1) * ntheta_subdiv, north, ntheta_subdiv, &mut idx);

    (coords, idx)
}

/// A cube centered at the origin with half extents set to 0.5.
fn unit_cuboid() -> (Vec<Point<Real>>, Vec<[u32; 3]>) {
    let coords = vec![
        Point::new(-0.5, -0.5, 0.5),
        Point::new(-0.5, -0.5, -0.5),
        Point::new(0.5, -0.5, -0.5),
        Point::new(0.5, -0.5, 0.5),
        Point::new(-0.5, 0.5, 0.5),
        Point::new(-0.5, 0.5, -0.5),
        Point::new(0.5, 0.5, -0.5),
        Point::new(0.5, 0.5, 0.5),
    ];

    let faces = vec![
        [4, 5, 0],
        [5, 1, 0],
        [5, 6, 1],
        [6, 2, 1],
        [6, 7, 3],
        [2, 6, 3],
        [7, 4, 0],
        [3, 7, 0],
        [0, 1, 2],
        [3, 0, 2],
        [7, 6, 5],
        [4, 7, 5],
    ];

    (coords, faces)
}

#[cfg(test)]
mod test {
    use super::{aabb_to_trimesh, sphere_to_trimesh};
    use crate::math::Point;

    #[test]
    fn sphere_mesh_is_closed() {
        let mesh = sphere_to_trimesh(&Point::new(1.0, 2.0, 3.0), 2.0, 0.2);
        assert!(mesh.is_watertight());
        let exact = 4.0 / 3.0 * std::f64::consts::PI * 8.0;
        assert!(mesh.volume() > 0.95 * exact && mesh.volume() < exact);
    }

    #[test]
    fn box_mesh_matches_its_corners() {
        let mesh = aabb_to_trimesh(&Point::new(-1.0, 0.0, 0.0), &Point::new(1.0, 1.0, 3.0));
        assert_relative_eq!(mesh.volume(), 6.0, epsilon = 1.0e-12);
        assert_relative_eq!(mesh.local_aabb().mins, Point::new(-1.0, 0.0, 0.0));
    }
}
