use crate::error::GeometryError;
use crate::math::{Point, Real};
use crate::shape::{PointCloud, TriangleMesh};

fn is_finite(pt: &Point<Real>) -> bool {
    pt.coords.iter().all(|x| x.is_finite())
}

/// Triangulates a structured point cloud, e.g. the output of a depth camera.
///
/// The cloud must have its `width` and `height` settings set, its points being stored row by
/// row. Each quad of neighboring points gives two triangles, except those having a
/// non-finite corner or an edge longer than `max_edge`. Unused points are dropped.
pub fn point_cloud_to_trimesh(pc: &PointCloud, max_edge: Real) -> Result<TriangleMesh, GeometryError> {
    let (width, height) = pc.structured_dims().ok_or_else(|| {
        GeometryError::MalformedData(
            "only structured point clouds with valid width and height settings can be triangulated"
                .to_string(),
        )
    })?;

    let points = pc.points();
    let mut remap = vec![u32::MAX; points.len()];
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    let mut push_triangle = |tri: [usize; 3]| {
        let corners = tri.map(|i| points[i]);
        if !corners.iter().all(is_finite) {
            return;
        }

        for k in 0..3 {
            if na::distance(&corners[k], &corners[(k + 1) % 3]) > max_edge {
                return;
            }
        }

        indices.push(tri.map(|i| {
            if remap[i] == u32::MAX {
                remap[i] = vertices.len() as u32;
                vertices.push(points[i]);
            }
            remap[i]
        }));
    };

    for r in 0..height.saturating_sub(1) {
        for c in 0..width.saturating_sub(1) {
            let a = r * width + c;
            let b = a + 1;
            let d = a + width;
            let e = d + 1;
            push_triangle([a, d, b]);
            push_triangle([b, d, e]);
        }
    }

    log::debug!(
        "triangulated a {}x{} point cloud into {} triangles",
        width,
        height,
        indices.len()
    );

    TriangleMesh::new(vertices, indices)
}

#[cfg(test)]
mod test {
    use super::point_cloud_to_trimesh;
    use crate::math::{Point, Real};
    use crate::shape::PointCloud;

    fn depth_image(width: usize, height: usize) -> PointCloud {
        let mut pc = PointCloud::new();
        for r in 0..height {
            for c in 0..width {
                let _ = pc.add_point(Point::new(c as Real, r as Real, 1.0));
            }
        }
        pc.set_setting("width", &width.to_string());
        pc.set_setting("height", &height.to_string());
        pc
    }

    #[test]
    fn every_quad_gives_two_triangles() {
        let mesh = point_cloud_to_trimesh(&depth_image(4, 3), Real::INFINITY).unwrap();
        assert_eq!(mesh.num_triangles(), 12);
        assert_eq!(mesh.vertices().len(), 12);
    }

    #[test]
    fn invalid_points_and_long_edges_are_skipped() {
        let mut pc = depth_image(3, 3);
        pc.set_point(4, Point::new(Real::NAN, 0.0, 0.0)).unwrap();
        let mesh = point_cloud_to_trimesh(&pc, Real::INFINITY).unwrap();
        // The center point touches six of the eight triangles.
        assert_eq!(mesh.num_triangles(), 2);

        let mesh = point_cloud_to_trimesh(&depth_image(3, 3), 0.5).unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn unstructured_clouds_are_rejected() {
        let pc = PointCloud::from_points(vec![Point::origin(); 4]);
        assert!(point_cloud_to_trimesh(&pc, 1.0).is_err());
    }
}
