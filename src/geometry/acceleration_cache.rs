use std::ops::Deref;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use crate::bounding_volume::Aabb;
use crate::partitioning::{Bvh, PointIndex};
use crate::shape::ConvexPolyhedron;

/// Spatial structures derived lazily from one version of a geometry's data.
///
/// Each structure is built at most once, by the first query needing it, even when several
/// threads race to trigger the build. Entries are tagged with the data version they were
/// built from; an entry whose tag does not match the version requested is never trusted.
#[derive(Debug, Default)]
pub struct AccelerationCache {
    bvh: OnceLock<(u64, Bvh)>,
    point_index: OnceLock<(u64, PointIndex)>,
    polyhedron: OnceLock<(u64, ConvexPolyhedron)>,
    local_aabb: OnceLock<(u64, Aabb)>,
    builds: AtomicUsize,
}

/// A structure read from an [`AccelerationCache`], or built on the spot when the cache could
/// not be trusted.
#[derive(Debug)]
pub enum CacheRef<'a, T> {
    /// The structure stored in the cache.
    Cached(&'a T),
    /// A structure built for this query only.
    Fresh(T),
}

impl<T> Deref for CacheRef<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        match self {
            CacheRef::Cached(val) => val,
            CacheRef::Fresh(val) => val,
        }
    }
}

impl AccelerationCache {
    /// The number of structures built into this cache so far.
    pub fn num_builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    /// Has the BVH over the triangles of a mesh been built?
    pub fn has_bvh(&self) -> bool {
        self.bvh.get().is_some()
    }

    /// Has the spatial index over the points of a point cloud been built?
    pub fn has_point_index(&self) -> bool {
        self.point_index.get().is_some()
    }

    /// Has the polytope of a convex hull been built?
    pub fn has_polyhedron(&self) -> bool {
        self.polyhedron.get().is_some()
    }

    pub(crate) fn bvh(&self, version: u64, build: impl Fn() -> Bvh) -> CacheRef<'_, Bvh> {
        self.get_or_build(&self.bvh, version, "triangle BVH", build)
    }

    pub(crate) fn point_index(
        &self,
        version: u64,
        build: impl Fn() -> PointIndex,
    ) -> CacheRef<'_, PointIndex> {
        self.get_or_build(&self.point_index, version, "point index", build)
    }

    pub(crate) fn polyhedron(
        &self,
        version: u64,
        build: impl Fn() -> ConvexPolyhedron,
    ) -> CacheRef<'_, ConvexPolyhedron> {
        self.get_or_build(&self.polyhedron, version, "hull polytope", build)
    }

    pub(crate) fn local_aabb(&self, version: u64, build: impl Fn() -> Aabb) -> CacheRef<'_, Aabb> {
        self.get_or_build(&self.local_aabb, version, "local AABB", build)
    }

    fn get_or_build<'a, T>(
        &'a self,
        slot: &'a OnceLock<(u64, T)>,
        version: u64,
        name: &str,
        build: impl Fn() -> T,
    ) -> CacheRef<'a, T> {
        let entry = slot.get_or_init(|| {
            let _ = self.builds.fetch_add(1, Ordering::SeqCst);
            log::debug!("building {name} for data version {version}");
            (version, build())
        });

        if entry.0 == version {
            CacheRef::Cached(&entry.1)
        } else {
            log::warn!(
                "stale {name} (built for version {}, queried for version {version}); bypassing the cache",
                entry.0
            );
            CacheRef::Fresh(build())
        }
    }
}

#[cfg(test)]
mod test {
    use super::{AccelerationCache, CacheRef};
    use crate::bounding_volume::Aabb;
    use crate::math::Point;

    fn unit_box() -> Aabb {
        Aabb::new(Point::origin(), Point::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn builds_once_per_version() {
        let cache = AccelerationCache::default();
        let _ = cache.local_aabb(3, unit_box);
        assert!(matches!(cache.local_aabb(3, unit_box), CacheRef::Cached(_)));
        assert_eq!(cache.num_builds(), 1);
    }

    #[test]
    fn stale_entries_are_bypassed() {
        let cache = AccelerationCache::default();
        let _ = cache.local_aabb(1, unit_box);
        let fresh = cache.local_aabb(2, || Aabb::new(Point::origin(), Point::new(2.0, 2.0, 2.0)));
        assert!(matches!(fresh, CacheRef::Fresh(_)));
        assert_eq!(fresh.maxs, Point::new(2.0, 2.0, 2.0));
        assert_eq!(cache.num_builds(), 1);
    }
}
