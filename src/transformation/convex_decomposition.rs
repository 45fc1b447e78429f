//! Approximate convex decomposition of triangle meshes by recursive splitting.

use ordered_float::OrderedFloat;

use crate::math::{Point, Real};
use crate::shape::{ConvexHull, ConvexPolyhedron, TriangleMesh};

const MAX_DEPTH: usize = 8;

fn part_points(mesh: &TriangleMesh, part: &[u32]) -> Vec<Point<Real>> {
    let mut ids: Vec<u32> = part
        .iter()
        .flat_map(|i| mesh.indices()[*i as usize])
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids.into_iter().map(|i| mesh.vertices()[i as usize]).collect()
}

/// How much of the hull of a part is not enclosed by the part, relative to the hull volume.
///
/// The part volume is the signed volume swept by its triangles as seen from the hull
/// centroid, which is exact for closed parts.
fn relative_concavity(mesh: &TriangleMesh, part: &[u32]) -> Real {
    let poly = ConvexPolyhedron::from_points(&part_points(mesh, part));
    if poly.is_degenerate() {
        return 0.0;
    }

    let hull_volume = poly.volume();
    if hull_volume <= 0.0 {
        return 0.0;
    }

    let apex = crate::utils::center(poly.vertices());
    let part_volume: Real = part
        .iter()
        .map(|i| {
            let tri = mesh.triangle(*i);
            (tri.a - apex).dot(&(tri.b - apex).cross(&(tri.c - apex))) / 6.0
        })
        .sum();

    ((hull_volume - part_volume.abs()) / hull_volume).max(0.0)
}

fn split(mesh: &TriangleMesh, mut part: Vec<u32>, concavity: Real, depth: usize, out: &mut Vec<Vec<u32>>) {
    if depth >= MAX_DEPTH || part.len() < 2 || relative_concavity(mesh, &part) <= concavity {
        out.push(part);
        return;
    }

    let centers: Vec<_> = part.iter().map(|i| mesh.triangle(*i).center()).collect();
    let axis = crate::bounding_volume::Aabb::from_points(&centers).longest_axis();

    part.sort_by_key(|i| OrderedFloat(mesh.triangle(*i).center()[axis]));
    let right = part.split_off(part.len() / 2);

    split(mesh, part, concavity, depth + 1, out);
    split(mesh, right, concavity, depth + 1, out);
}

/// Splits a mesh into parts whose convex hulls exceed their enclosed volume by at most
/// `concavity` (relative to the hull volume), and returns those hulls.
///
/// Parts are split at the median of their triangle centers along their longest axis.
pub fn convex_decomposition(mesh: &TriangleMesh, concavity: Real) -> Vec<ConvexHull> {
    let mut parts = Vec::new();
    split(mesh, (0..mesh.num_triangles() as u32).collect(), concavity, 0, &mut parts);

    log::debug!(
        "decomposed a mesh of {} triangles into {} convex parts",
        mesh.num_triangles(),
        parts.len()
    );

    parts
        .iter()
        .map(|part| ConvexHull::new(part_points(mesh, part)))
        .collect()
}
