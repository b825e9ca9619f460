use std::f64::consts::PI;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::trace;

use crate::geo::WorldPixel;

// ---------------------------------------------------------------------------
// Projector
// ---------------------------------------------------------------------------

/// Geographic to world pixel transform of a map provider.
///
/// Two projectors with the same `projection_id` must produce identical pixels
/// for the same zoom; the id is the cache key.
pub trait Projector: Send + Sync {
    fn projection_id(&self) -> &str;

    fn tile_size(&self) -> u32;

    fn min_zoom(&self) -> u32;

    fn max_zoom(&self) -> u32;

    fn geo_to_pixel(&self, latitude: f64, longitude: f64, zoom: u32) -> WorldPixel;

    /// World width and height in pixels at `zoom`.
    fn map_size(&self, zoom: u32) -> i64 {
        (self.tile_size() as i64) << zoom
    }
}

/// Spherical Web Mercator as used by slippy map tile servers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WebMercator {
    pub tile_size: u32,
    pub max_zoom: u32,
}

impl Default for WebMercator {
    fn default() -> Self {
        Self {
            tile_size: 256,
            max_zoom: 19,
        }
    }
}

impl WebMercator {
    pub const MAX_LATITUDE: f64 = 85.051_128_779_806_6;
}

impl Projector for WebMercator {
    fn projection_id(&self) -> &str {
        "epsg:3857"
    }

    fn tile_size(&self) -> u32 {
        self.tile_size
    }

    fn min_zoom(&self) -> u32 {
        0
    }

    fn max_zoom(&self) -> u32 {
        self.max_zoom
    }

    fn geo_to_pixel(&self, latitude: f64, longitude: f64, zoom: u32) -> WorldPixel {
        let size = self.map_size(zoom) as f64;
        let lat = latitude.clamp(-Self::MAX_LATITUDE, Self::MAX_LATITUDE);
        let sin = lat.to_radians().sin();

        let x = (longitude + 180.0) / 360.0 * size;
        let y = (0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * PI)) * size;

        let last = size - 1.0;
        WorldPixel::new(
            x.floor().clamp(0.0, last) as i32,
            y.floor().clamp(0.0, last) as i32,
        )
    }
}

// ---------------------------------------------------------------------------
// Projected point cache
// ---------------------------------------------------------------------------

/// Identifies the projection a set of pixels was computed with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectionKey {
    pub projection_id: String,
    pub zoom: u32,
}

impl ProjectionKey {
    fn matches(&self, projection_id: &str, zoom: u32) -> bool {
        self.zoom == zoom && self.projection_id == projection_id
    }
}

/// Projected pixels tagged with their projection.
#[derive(Debug, Clone)]
pub struct ProjectedPoints {
    pub key: ProjectionKey,
    pub pixels: Arc<[WorldPixel]>,
}

/// Remembers the last projection of one position list.
///
/// The tag and the pixel array are published together, so concurrent tile
/// paints either see a complete snapshot or recompute it.
#[derive(Debug, Default)]
pub struct ProjectedPointCache {
    snapshot: RwLock<Option<Arc<ProjectedPoints>>>,
}

impl Clone for ProjectedPointCache {
    fn clone(&self) -> Self {
        Self {
            snapshot: RwLock::new(self.current()),
        }
    }
}

impl ProjectedPointCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pixels of parallel latitude/longitude slices for `projector` at `zoom`.
    pub fn project(
        &self,
        latitudes: &[f64],
        longitudes: &[f64],
        projector: &dyn Projector,
        zoom: u32,
    ) -> Arc<[WorldPixel]> {
        self.project_with(projector, zoom, || {
            latitudes.iter().copied().zip(longitudes.iter().copied())
        })
    }

    /// Like [`project`](Self::project) but the positions are only produced on a cache miss.
    pub fn project_with<I, F>(&self, projector: &dyn Projector, zoom: u32, positions: F) -> Arc<[WorldPixel]>
    where
        F: FnOnce() -> I,
        I: IntoIterator<Item = (f64, f64)>,
    {
        let projection_id = projector.projection_id();

        if let Some(cached) = self.current() {
            if cached.key.matches(projection_id, zoom) {
                return Arc::clone(&cached.pixels);
            }
        }

        let pixels: Arc<[WorldPixel]> = positions()
            .into_iter()
            .map(|(lat, lon)| projector.geo_to_pixel(lat, lon, zoom))
            .collect();

        trace!(projection_id, zoom, samples = pixels.len(), "Projected positions");

        let points = Arc::new(ProjectedPoints {
            key: ProjectionKey {
                projection_id: projection_id.to_string(),
                zoom,
            },
            pixels: Arc::clone(&pixels),
        });
        *self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(points);

        pixels
    }

    pub fn current(&self) -> Option<Arc<ProjectedPoints>> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Forget the cached projection, e.g. after the positions changed.
    pub fn invalidate(&self) {
        *self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        id: &'static str,
        calls: AtomicUsize,
    }

    impl Counting {
        fn new(id: &'static str) -> Self {
            Self {
                id,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Projector for Counting {
        fn projection_id(&self) -> &str {
            self.id
        }
        fn tile_size(&self) -> u32 {
            256
        }
        fn min_zoom(&self) -> u32 {
            0
        }
        fn max_zoom(&self) -> u32 {
            20
        }
        fn geo_to_pixel(&self, latitude: f64, longitude: f64, zoom: u32) -> WorldPixel {
            self.calls.fetch_add(1, Ordering::Relaxed);
            WorldPixel::new((longitude * zoom as f64) as i32, (latitude * zoom as f64) as i32)
        }
    }

    #[test]
    fn second_call_hits_cache() {
        let cache = ProjectedPointCache::new();
        let projector = Counting::new("a");
        let lats = [1.0, 2.0, 3.0];
        let lons = [4.0, 5.0, 6.0];

        let first = cache.project(&lats, &lons, &projector, 2);
        assert_eq!(projector.calls.load(Ordering::Relaxed), 3);
        let second = cache.project(&lats, &lons, &projector, 2);
        assert_eq!(projector.calls.load(Ordering::Relaxed), 3);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first[1], WorldPixel::new(10, 4));
    }

    #[test]
    fn zoom_change_recomputes() {
        let cache = ProjectedPointCache::new();
        let projector = Counting::new("a");
        let lats = [1.0, 2.0];
        let lons = [1.0, 2.0];

        cache.project(&lats, &lons, &projector, 2);
        let pixels = cache.project(&lats, &lons, &projector, 3);
        assert_eq!(projector.calls.load(Ordering::Relaxed), 4);
        assert_eq!(pixels[1], WorldPixel::new(6, 6));
        assert_eq!(cache.current().unwrap().key.zoom, 3);
    }

    #[test]
    fn projection_change_recomputes() {
        let cache = ProjectedPointCache::new();
        let a = Counting::new("a");
        let b = Counting::new("b");
        cache.project(&[1.0], &[1.0], &a, 1);
        cache.project(&[1.0], &[1.0], &b, 1);
        assert_eq!(b.calls.load(Ordering::Relaxed), 1);
        cache.project(&[1.0], &[1.0], &b, 1);
        assert_eq!(b.calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn invalidate_forces_recompute() {
        let cache = ProjectedPointCache::new();
        let projector = Counting::new("a");
        cache.project(&[1.0], &[1.0], &projector, 1);
        cache.invalidate();
        assert!(cache.current().is_none());
        cache.project(&[1.0], &[1.0], &projector, 1);
        assert_eq!(projector.calls.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn web_mercator_reference_points() {
        let wm = WebMercator::default();
        assert_eq!(wm.geo_to_pixel(0.0, 0.0, 0), WorldPixel::new(128, 128));
        assert_eq!(wm.geo_to_pixel(0.0, -180.0, 1), WorldPixel::new(0, 256));
        let north = wm.geo_to_pixel(89.9, 0.0, 0);
        assert_eq!(north.y, 0);
        let south = wm.geo_to_pixel(-89.9, 179.999, 0);
        assert_eq!(south, WorldPixel::new(255, 255));
    }
}
