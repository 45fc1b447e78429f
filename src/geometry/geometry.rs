use std::sync::{Arc, PoisonError, RwLock, Weak};

use na::{Rotation3, UnitQuaternion};

use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::error::GeometryError;
use crate::geometry::{GeometryData, GeometryType, SharedGeometry, StoredGeometry};
use crate::math::{Isometry, Matrix, Point, Real, Translation, Vector};
use crate::shape::{ConvexHull, PointCloud, Primitive, TriangleMesh, VolumeGrid};
use crate::transformation;

#[derive(Debug)]
enum Ownership {
    Standalone(Box<StoredGeometry>),
    Reference(Weak<RwLock<StoredGeometry>>),
}

/// A handle on geometry data, with a current transform and a collision margin.
///
/// A standalone handle owns its data. A reference handle aliases data owned by a scene item
/// (a [`SharedGeometry`]): modifications made through it are seen by the scene item and
/// conversely, and it never frees the aliased data.
///
/// Queries see the data as if it were moved by the current transform and enlarged by the
/// collision margin, but neither is baked into the stored coordinates. The permanent
/// modifiers (`translate`, `scale`, `rotate`, `transform`, the setters) do rewrite the data.
#[derive(Debug)]
pub struct Geometry {
    ownership: Ownership,
    current_transform: Isometry<Real>,
    margin: Real,
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Geometry {
    /// A standalone deep copy, with the same current transform and margin.
    ///
    /// The copy of a dangling reference is empty.
    fn clone(&self) -> Self {
        let stored = self.with_stored(StoredGeometry::clone).unwrap_or_else(|err| {
            log::debug!("cloning a geometry with no data: {err}");
            StoredGeometry::default()
        });

        Geometry {
            ownership: Ownership::Standalone(Box::new(stored)),
            current_transform: self.current_transform,
            margin: self.margin,
        }
    }
}

macro_rules! impl_from_data(
    ($($Data: ty),*) => {$(
        impl From<$Data> for Geometry {
            fn from(data: $Data) -> Self {
                Geometry::from_stored(StoredGeometry::new(data))
            }
        }
    )*}
);

impl_from_data!(
    GeometryData,
    Primitive,
    TriangleMesh,
    PointCloud,
    VolumeGrid,
    ConvexHull,
    Vec<Geometry>
);

impl Geometry {
    /// An empty standalone geometry.
    pub fn new() -> Self {
        Self::from_stored(StoredGeometry::default())
    }

    fn from_stored(stored: StoredGeometry) -> Self {
        Geometry {
            ownership: Ownership::Standalone(Box::new(stored)),
            current_transform: Isometry::identity(),
            margin: 0.0,
        }
    }

    /// A handle aliasing the data owned by a scene item.
    pub fn reference(shared: &SharedGeometry) -> Self {
        Geometry {
            ownership: Ownership::Reference(Arc::downgrade(shared)),
            current_transform: Isometry::identity(),
            margin: 0.0,
        }
    }

    /// Does this handle own its data?
    pub fn is_standalone(&self) -> bool {
        matches!(self.ownership, Ownership::Standalone(_))
    }

    /// Runs `f` on the stored data.
    ///
    /// Reference handles hold a read lock on the aliased data while `f` runs.
    pub fn with_stored<R>(&self, f: impl FnOnce(&StoredGeometry) -> R) -> Result<R, GeometryError> {
        match &self.ownership {
            Ownership::Standalone(stored) => Ok(f(&**stored)),
            Ownership::Reference(item) => {
                let shared = item.upgrade().ok_or(GeometryError::DanglingReference)?;
                let stored = shared.read().unwrap_or_else(PoisonError::into_inner);
                Ok(f(&*stored))
            }
        }
    }

    fn with_stored_mut<R>(
        &mut self,
        f: impl FnOnce(&mut StoredGeometry) -> R,
    ) -> Result<R, GeometryError> {
        match &mut self.ownership {
            Ownership::Standalone(stored) => Ok(f(&mut **stored)),
            Ownership::Reference(item) => {
                let shared = item.upgrade().ok_or(GeometryError::DanglingReference)?;
                let mut stored = shared.write().unwrap_or_else(PoisonError::into_inner);
                Ok(f(&mut *stored))
            }
        }
    }

    fn typed<R>(
        &self,
        expected: GeometryType,
        f: impl FnOnce(&GeometryData) -> Option<R>,
    ) -> Result<R, GeometryError> {
        self.with_stored(|stored| {
            let found = stored.geometry_type();
            stored
                .data()
                .and_then(f)
                .ok_or(GeometryError::TypeMismatch { expected, found })
        })?
    }

    /*
     * Data access.
     */
    /// The variant held, `None` if the geometry is empty.
    pub fn geometry_type(&self) -> Result<Option<GeometryType>, GeometryError> {
        self.with_stored(|s| s.geometry_type())
    }

    /// The name of the variant held, the empty string if there is none.
    pub fn type_name(&self) -> Result<&'static str, GeometryError> {
        Ok(self.geometry_type()?.map(|t| t.name()).unwrap_or(""))
    }

    /// Is there nothing a query could hit?
    pub fn is_empty(&self) -> Result<bool, GeometryError> {
        self.with_stored(|s| s.is_empty())
    }

    /// Replaces the data held. This invalidates the acceleration cache.
    pub fn set(&mut self, data: impl Into<GeometryData>) -> Result<(), GeometryError> {
        let data = data.into();
        self.with_stored_mut(|s| s.set_data(Some(data)))
    }

    /// Releases the data of a standalone handle; detaches a reference handle.
    pub fn free(&mut self) {
        if let Ownership::Standalone(stored) = &mut self.ownership {
            stored.set_data(None);
        } else {
            self.ownership = Ownership::Standalone(Box::default());
        }
    }

    /// A copy of the primitive held.
    pub fn primitive(&self) -> Result<Primitive, GeometryError> {
        self.typed(GeometryType::Primitive, |d| match d {
            GeometryData::Primitive(p) => Some(*p),
            _ => None,
        })
    }

    /// A copy of the triangle mesh held.
    pub fn triangle_mesh(&self) -> Result<TriangleMesh, GeometryError> {
        self.typed(GeometryType::TriangleMesh, |d| match d {
            GeometryData::TriangleMesh(m) => Some(m.clone()),
            _ => None,
        })
    }

    /// A copy of the point cloud held.
    pub fn point_cloud(&self) -> Result<PointCloud, GeometryError> {
        self.typed(GeometryType::PointCloud, |d| match d {
            GeometryData::PointCloud(pc) => Some(pc.clone()),
            _ => None,
        })
    }

    /// A copy of the volume grid held.
    pub fn volume_grid(&self) -> Result<VolumeGrid, GeometryError> {
        self.typed(GeometryType::VolumeGrid, |d| match d {
            GeometryData::VolumeGrid(g) => Some(g.clone()),
            _ => None,
        })
    }

    /// A copy of the convex hull held.
    pub fn convex_hull(&self) -> Result<ConvexHull, GeometryError> {
        self.typed(GeometryType::ConvexHull, |d| match d {
            GeometryData::ConvexHull(h) => Some(h.clone()),
            _ => None,
        })
    }

    /// Standalone copies of the children of the group held.
    pub fn group(&self) -> Result<Vec<Geometry>, GeometryError> {
        self.typed(GeometryType::Group, |d| match d {
            GeometryData::Group(children) => Some(children.clone()),
            _ => None,
        })
    }

    /// Replaces the data held by a primitive.
    pub fn set_primitive(&mut self, primitive: Primitive) -> Result<(), GeometryError> {
        self.set(primitive)
    }

    /// Replaces the data held by a triangle mesh.
    pub fn set_triangle_mesh(&mut self, mesh: TriangleMesh) -> Result<(), GeometryError> {
        self.set(mesh)
    }

    /// Replaces the data held by a point cloud.
    pub fn set_point_cloud(&mut self, cloud: PointCloud) -> Result<(), GeometryError> {
        self.set(cloud)
    }

    /// Replaces the data held by a volume grid.
    pub fn set_volume_grid(&mut self, grid: VolumeGrid) -> Result<(), GeometryError> {
        self.set(grid)
    }

    /// Replaces the data held by a convex hull.
    pub fn set_convex_hull(&mut self, hull: ConvexHull) -> Result<(), GeometryError> {
        self.set(hull)
    }

    /// Replaces the data held by a group of geometries.
    pub fn set_group(&mut self, children: Vec<Geometry>) -> Result<(), GeometryError> {
        self.set(children)
    }

    /// Replaces the data held by the convex hull of two convex hull geometries, each seen
    /// under its own current transform.
    pub fn set_convex_hull_group(
        &mut self,
        hull1: &Geometry,
        hull2: &Geometry,
    ) -> Result<(), GeometryError> {
        let pts1 = hull1.convex_hull()?;
        let pts2 = hull2.convex_hull()?;
        let points = pts1
            .points()
            .iter()
            .map(|pt| hull1.current_transform * pt)
            .chain(pts2.points().iter().map(|pt| hull2.current_transform * pt))
            .collect();

        self.set(ConvexHull::new(points))
    }

    /// The number of elements: triangles, points, grid cells, hull points, or children.
    pub fn num_elements(&self) -> Result<usize, GeometryError> {
        self.with_stored(|s| s.data().map(|d| d.num_elements()).unwrap_or(0))
    }

    /// The `index`-th element as a standalone geometry, in the local frame of this geometry.
    ///
    /// Elements are the primitive itself, a single-triangle mesh, a point, the box of a grid
    /// cell, a hull point, or a copy of a child.
    pub fn element(&self, index: usize) -> Result<Geometry, GeometryError> {
        self.with_stored(|s| {
            let Some(data) = s.data() else {
                return Err(GeometryError::InvalidIndex { index, len: 0 });
            };
            GeometryError::check_index(index, data.num_elements())?;

            Ok(match data {
                GeometryData::Primitive(p) => Geometry::from(*p),
                GeometryData::TriangleMesh(m) => {
                    let tri = m.triangle(index as u32);
                    Geometry::from(TriangleMesh::new(tri.vertices().to_vec(), vec![[0, 1, 2]])?)
                }
                GeometryData::PointCloud(pc) => Geometry::from(Primitive::point(pc.point(index)?)),
                GeometryData::VolumeGrid(g) => {
                    let [i, j, k] = g.cell_coords(index);
                    let cell = g.cell_aabb(i, j, k);
                    Geometry::from(Primitive::aabb(cell.mins, cell.maxs))
                }
                GeometryData::ConvexHull(h) => Geometry::from(Primitive::point(h.point(index)?)),
                GeometryData::Group(children) => children[index].clone(),
            })
        })?
    }

    /// Replaces the `index`-th child of a group.
    pub fn set_element(&mut self, index: usize, element: Geometry) -> Result<(), GeometryError> {
        let (ty, len) = self.with_stored(|s| (s.geometry_type(), s.data().map(|d| d.num_elements())))?;

        match ty {
            Some(GeometryType::Group) => {
                GeometryError::check_index(index, len.unwrap_or(0))?;
                self.with_stored_mut(|s| {
                    if let Some(GeometryData::Group(children)) = s.data_mut() {
                        children[index] = element;
                    }
                })
            }
            Some(ty) => Err(GeometryError::unsupported("set_element", ty, None)),
            None => Err(GeometryError::TypeMismatch {
                expected: GeometryType::Group,
                found: None,
            }),
        }
    }

    /*
     * Current transform and margin.
     */
    /// Sets the current transform from a rotation matrix and a translation.
    ///
    /// The matrix is projected on the closest rotation.
    pub fn set_current_transform(
        &mut self,
        rotation: &Matrix<Real>,
        translation: &Vector<Real>,
    ) -> Result<(), GeometryError> {
        if !rotation.iter().chain(translation.iter()).all(|x| x.is_finite()) {
            return Err(GeometryError::InvalidParameter(
                "the current transform must be finite".to_string(),
            ));
        }

        let rot = Rotation3::from_matrix(rotation);
        self.current_transform = Isometry::from_parts(
            Translation::from(*translation),
            UnitQuaternion::from_rotation_matrix(&rot),
        );
        Ok(())
    }

    /// The current transform, as a rotation matrix and a translation.
    pub fn current_transform(&self) -> (Matrix<Real>, Vector<Real>) {
        (
            self.current_transform.rotation.to_rotation_matrix().into_inner(),
            self.current_transform.translation.vector,
        )
    }

    /// Sets the current transform.
    pub fn set_current_isometry(&mut self, pos: Isometry<Real>) {
        self.current_transform = pos;
    }

    /// The current transform.
    #[inline]
    pub fn current_isometry(&self) -> &Isometry<Real> {
        &self.current_transform
    }

    /// Sets the collision margin. It must be finite and non-negative.
    pub fn set_collision_margin(&mut self, margin: Real) -> Result<(), GeometryError> {
        if !(margin >= 0.0 && margin.is_finite()) {
            return Err(GeometryError::InvalidParameter(format!(
                "the collision margin must be finite and non-negative, got {margin}"
            )));
        }

        self.margin = margin;
        Ok(())
    }

    /// The collision margin.
    #[inline]
    pub fn collision_margin(&self) -> Real {
        self.margin
    }

    /*
     * Permanent modifications.
     */
    /// Translates the data.
    pub fn translate(&mut self, t: &Vector<Real>) -> Result<(), GeometryError> {
        self.transform(&Matrix::identity(), t)
    }

    /// Scales the data uniformly about the origin.
    pub fn scale(&mut self, s: Real) -> Result<(), GeometryError> {
        self.scale_xyz(s, s, s)
    }

    /// Scales the data about the origin, with one factor per axis.
    pub fn scale_xyz(&mut self, sx: Real, sy: Real, sz: Real) -> Result<(), GeometryError> {
        self.transform(&Matrix::from_diagonal(&Vector::new(sx, sy, sz)), &Vector::zeros())
    }

    /// Rotates the data about the origin.
    pub fn rotate(&mut self, rotation: &Matrix<Real>) -> Result<(), GeometryError> {
        self.transform(rotation, &Vector::zeros())
    }

    /// Applies the affine map `x -> linear * x + t` to the geometry as currently placed.
    ///
    /// The current transform is baked into the data together with the map, then reset to the
    /// identity. Fails without modifying anything if the map cannot be represented exactly
    /// by the data (e.g. shearing a sphere or rotating a volume grid).
    pub fn transform(&mut self, linear: &Matrix<Real>, t: &Vector<Real>) -> Result<(), GeometryError> {
        if !linear.iter().chain(t.iter()).all(|x| x.is_finite()) {
            return Err(GeometryError::InvalidParameter(
                "the transform must be finite".to_string(),
            ));
        }

        let (linear, t) = self.composed_with_current(linear, t);
        self.check_linear_map(&linear)?;
        self.with_stored_mut(|s| match s.data_mut() {
            Some(data) => apply_affine(data, &linear, &t),
            None => Ok(()),
        })??;
        self.current_transform = Isometry::identity();
        Ok(())
    }

    fn composed_with_current(&self, linear: &Matrix<Real>, t: &Vector<Real>) -> (Matrix<Real>, Vector<Real>) {
        let (rot, trans) = self.current_transform();
        (linear * rot, linear * trans + t)
    }

    fn check_linear_map(&self, linear: &Matrix<Real>) -> Result<(), GeometryError> {
        self.with_stored(|s| match s.data() {
            Some(GeometryData::Primitive(p)) => p.check_linear_map(linear),
            Some(GeometryData::VolumeGrid(_)) => {
                let diagonal = (0..3).all(|i| (0..3).all(|j| i == j || linear[(i, j)] == 0.0));
                if diagonal {
                    Ok(())
                } else {
                    Err(GeometryError::unsupported(
                        "transform",
                        GeometryType::VolumeGrid,
                        None,
                    ))
                }
            }
            Some(GeometryData::Group(children)) => children.iter().try_for_each(|child| {
                let (linear, _) = child.composed_with_current(linear, &Vector::zeros());
                child.check_linear_map(&linear)
            }),
            _ => Ok(()),
        })?
    }

    /*
     * Bounding boxes.
     */
    /// A bounding box of the geometry under its current transform, including the margin.
    ///
    /// This is the cached local box moved by the current transform, so it may be loose
    /// under rotations.
    pub fn bb(&self) -> Result<Aabb, GeometryError> {
        let local = self.with_stored(|s| s.local_aabb())?;
        if !local.is_valid() {
            return Ok(local);
        }

        Ok(local
            .transform_by(&self.current_transform)
            .loosened(self.margin))
    }

    /// The tightest axis-aligned box around the geometry under its current transform,
    /// including the margin.
    pub fn bb_tight(&self) -> Result<Aabb, GeometryError> {
        self.tight_aabb(&Isometry::identity())
    }

    fn tight_aabb(&self, parent: &Isometry<Real>) -> Result<Aabb, GeometryError> {
        let pos = parent * self.current_transform;
        let aabb = self.with_stored(|s| -> Result<Aabb, GeometryError> {
            let Some(data) = s.data() else {
                return Ok(Aabb::new_invalid());
            };

            let transformed = |pts: &[Point<Real>]| {
                let mut aabb = Aabb::new_invalid();
                pts.iter().for_each(|pt| aabb.take_point(pos * pt));
                aabb
            };

            Ok(match data {
                GeometryData::Primitive(Primitive::Sphere { center, radius }) => {
                    Aabb::from_half_extents(pos * center, Vector::repeat(*radius))
                }
                GeometryData::Primitive(Primitive::Point(p)) => transformed(&[*p]),
                GeometryData::Primitive(Primitive::Segment { a, b }) => transformed(&[*a, *b]),
                GeometryData::Primitive(Primitive::Aabb { mins, maxs }) => {
                    transformed(&Aabb::new(*mins, *maxs).vertices())
                }
                GeometryData::TriangleMesh(m) => {
                    let mut aabb = Aabb::new_invalid();
                    m.indices()
                        .iter()
                        .flatten()
                        .for_each(|i| aabb.take_point(pos * m.vertices()[*i as usize]));
                    aabb
                }
                GeometryData::PointCloud(pc) => transformed(pc.points()),
                GeometryData::VolumeGrid(g) => transformed(&g.bbox().vertices()),
                GeometryData::ConvexHull(h) => transformed(h.points()),
                GeometryData::Group(children) => {
                    let mut aabb = Aabb::new_invalid();
                    for child in children {
                        aabb.merge(&child.tight_aabb(&pos)?);
                    }
                    aabb
                }
            })
        })??;

        if aabb.is_valid() {
            Ok(aabb.loosened(self.margin))
        } else {
            Ok(aabb)
        }
    }

    /*
     * Conversions.
     */
    /// Converts the data to another representation.
    ///
    /// See [`transformation::convert`] for the meaning of `param`, zero selecting a default
    /// value. The result is a
    /// new standalone geometry with the same current transform and margin; `self` is not
    /// modified.
    pub fn convert(&self, target: GeometryType, param: Real) -> Result<Geometry, GeometryError> {
        let data = self.with_stored(|s| match s.data() {
            Some(data) => transformation::convert(data, target, param).map(Some),
            None => Ok(None),
        })??;

        let stored = data.map(StoredGeometry::new).unwrap_or_default();
        let mut result = Geometry::from_stored(stored);
        result.current_transform = self.current_transform;
        result.margin = self.margin;
        Ok(result)
    }
}

fn apply_affine(
    data: &mut GeometryData,
    linear: &Matrix<Real>,
    t: &Vector<Real>,
) -> Result<(), GeometryError> {
    match data {
        GeometryData::Primitive(p) => p.transform(linear, t)?,
        GeometryData::TriangleMesh(m) => m.transform(linear, t),
        GeometryData::PointCloud(pc) => pc.transform(linear, t),
        GeometryData::VolumeGrid(g) => {
            g.scale(&linear.diagonal())?;
            g.translate(t);
        }
        GeometryData::ConvexHull(h) => h.transform(linear, t),
        GeometryData::Group(children) => {
            for child in children {
                child.transform(linear, t)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::Geometry;
    use crate::error::GeometryError;
    use crate::geometry::{GeometryType, StoredGeometry};
    use crate::math::{Matrix, Point, Vector};
    use crate::shape::{PointCloud, Primitive};

    #[test]
    fn clone_is_standalone() {
        let shared = StoredGeometry::new(Primitive::point(Point::origin())).into_shared();
        let reference = Geometry::reference(&shared);
        assert!(!reference.is_standalone());
        let copy = reference.clone();
        assert!(copy.is_standalone());
        drop(shared);
        assert_eq!(reference.type_name(), Err(GeometryError::DanglingReference));
        assert_eq!(copy.type_name().unwrap(), "Primitive");
    }

    #[test]
    fn wrong_accessor_is_a_type_mismatch() {
        let g = Geometry::from(PointCloud::new());
        assert_eq!(
            g.triangle_mesh().unwrap_err(),
            GeometryError::TypeMismatch {
                expected: GeometryType::TriangleMesh,
                found: Some(GeometryType::PointCloud),
            }
        );
    }

    #[test]
    fn transform_bakes_the_current_transform() {
        let mut g = Geometry::from(Primitive::point(Point::new(1.0, 0.0, 0.0)));
        g.set_current_transform(&Matrix::identity(), &Vector::new(0.0, 2.0, 0.0))
            .unwrap();
        g.translate(&Vector::new(0.0, 0.0, 3.0)).unwrap();
        assert_eq!(g.current_transform().1, Vector::zeros());
        assert_eq!(g.primitive().unwrap(), Primitive::point(Point::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn failed_transform_leaves_the_data_untouched() {
        let mut g = Geometry::from(Primitive::sphere(Point::origin(), 1.0));
        let version = g.with_stored(|s| s.version()).unwrap();
        assert!(g.scale_xyz(1.0, 2.0, 1.0).is_err());
        assert_eq!(g.with_stored(|s| s.version()).unwrap(), version);
        assert_eq!(g.primitive().unwrap(), Primitive::sphere(Point::origin(), 1.0));
    }

    #[test]
    fn negative_margin_is_rejected() {
        let mut g = Geometry::new();
        assert!(matches!(
            g.set_collision_margin(-1.0),
            Err(GeometryError::InvalidParameter(_))
        ));
        assert_eq!(g.collision_margin(), 0.0);
    }

    #[test]
    fn tight_box_of_a_rotated_segment() {
        let mut g = Geometry::from(Primitive::segment(Point::origin(), Point::new(1.0, 0.0, 0.0)));
        let rot = na::Rotation3::from_axis_angle(&Vector::z_axis(), std::f64::consts::FRAC_PI_2);
        g.set_current_transform(rot.matrix(), &Vector::zeros()).unwrap();
        let bb = g.bb_tight().unwrap();
        assert_relative_eq!(bb.maxs, Point::new(0.0, 1.0, 0.0), epsilon = 1.0e-12);
        assert_relative_eq!(bb.mins, Point::origin(), epsilon = 1.0e-12);
    }
}
