use std::sync::{Arc, RwLock};

use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::geometry::{AccelerationCache, CacheRef, GeometryData, GeometryType};
use crate::partitioning::{Bvh, PointIndex};
use crate::shape::ConvexPolyhedron;

/// Geometry data owned by an external scene item and aliased by reference handles.
pub type SharedGeometry = Arc<RwLock<StoredGeometry>>;

/// Geometry data together with its version counter and acceleration cache.
///
/// Any mutable access to the data increments the version and discards the cache, so cached
/// structures always describe the data they are read with.
#[derive(Debug, Default)]
pub struct StoredGeometry {
    data: Option<GeometryData>,
    version: u64,
    cache: AccelerationCache,
}

impl Clone for StoredGeometry {
    fn clone(&self) -> Self {
        StoredGeometry {
            data: self.data.clone(),
            version: self.version,
            cache: AccelerationCache::default(),
        }
    }
}

impl StoredGeometry {
    /// Stores `data`.
    pub fn new(data: impl Into<GeometryData>) -> Self {
        StoredGeometry {
            data: Some(data.into()),
            version: 0,
            cache: AccelerationCache::default(),
        }
    }

    /// Wraps this store so it can be owned by a scene item and aliased by reference handles.
    pub fn into_shared(self) -> SharedGeometry {
        Arc::new(RwLock::new(self))
    }

    /// The stored data, if any.
    #[inline]
    pub fn data(&self) -> Option<&GeometryData> {
        self.data.as_ref()
    }

    /// Mutable access to the stored data.
    ///
    /// This counts as a permanent modification: the version is incremented and the cache is
    /// discarded.
    pub fn data_mut(&mut self) -> Option<&mut GeometryData> {
        self.invalidate();
        self.data.as_mut()
    }

    /// Replaces the stored data.
    pub fn set_data(&mut self, data: Option<GeometryData>) {
        self.invalidate();
        self.data = data;
    }

    /// The version of the stored data.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The structures built from the current version of the data.
    #[inline]
    pub fn cache(&self) -> &AccelerationCache {
        &self.cache
    }

    /// The variant stored, `None` if empty.
    pub fn geometry_type(&self) -> Option<GeometryType> {
        self.data.as_ref().map(|d| d.geometry_type())
    }

    /// Is there nothing a query could hit?
    pub fn is_empty(&self) -> bool {
        self.data.as_ref().map(|d| d.is_empty()).unwrap_or(true)
    }

    fn invalidate(&mut self) {
        self.version += 1;
        self.cache = AccelerationCache::default();
        log::trace!("geometry data modified, now at version {}", self.version);
    }

    /// The BVH over the triangles of a mesh. `None` for other variants.
    pub(crate) fn bvh(&self) -> Option<CacheRef<'_, Bvh>> {
        match &self.data {
            Some(GeometryData::TriangleMesh(mesh)) => Some(self.cache.bvh(self.version, || {
                Bvh::from_leaves(
                    mesh.triangles()
                        .enumerate()
                        .map(|(i, tri)| (i as u32, tri.local_aabb())),
                )
            })),
            _ => None,
        }
    }

    /// The spatial index over the points of a point cloud. `None` for other variants.
    pub(crate) fn point_index(&self) -> Option<CacheRef<'_, PointIndex>> {
        match &self.data {
            Some(GeometryData::PointCloud(pc)) => Some(
                self.cache
                    .point_index(self.version, || PointIndex::new(pc.points())),
            ),
            _ => None,
        }
    }

    /// The polytope of a convex hull. `None` for other variants.
    pub(crate) fn polyhedron(&self) -> Option<CacheRef<'_, ConvexPolyhedron>> {
        match &self.data {
            Some(GeometryData::ConvexHull(hull)) => Some(
                self.cache
                    .polyhedron(self.version, || ConvexPolyhedron::from_points(hull.points())),
            ),
            _ => None,
        }
    }

    /// The bounding box of the data in its own frame, ignoring margins of the owning handle.
    ///
    /// Invalid for empty data. Children of a group contribute their box under their own
    /// current transform, enlarged by their own margin.
    pub fn local_aabb(&self) -> Aabb {
        let Some(data) = &self.data else {
            return Aabb::new_invalid();
        };

        *self.cache.local_aabb(self.version, || match data {
            GeometryData::Primitive(p) => p.local_aabb(),
            GeometryData::TriangleMesh(m) => m.local_aabb(),
            GeometryData::PointCloud(pc) => pc.local_aabb(),
            GeometryData::VolumeGrid(g) => *g.bbox(),
            GeometryData::ConvexHull(h) => h.local_aabb(),
            GeometryData::Group(children) => children
                .iter()
                .filter_map(|child| child.bb().ok())
                .fold(Aabb::new_invalid(), |acc, bb| acc.merged(&bb)),
        })
    }
}
