//! Boundaries to the device: clock, network reachability, GPS, and the photo
//! picker. The core only talks to these traits so tests can pin each one.

use crate::config::GpsBounds;
use crate::domain::{Coordinates, Photo};
use crate::error::{RegistryError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

pub trait Connectivity: Send + Sync {
    fn is_online(&self) -> bool;
}

/// A reachability flag shared between the front-end (which may flip it) and
/// the capture flow (which reads it when an upload resolves).
#[derive(Debug, Clone)]
pub struct SharedConnectivity {
    online: Arc<AtomicBool>,
}

impl SharedConnectivity {
    pub fn new(online: bool) -> Self {
        Self {
            online: Arc::new(AtomicBool::new(online)),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// Flips the flag and returns the new value.
    pub fn toggle(&self) -> bool {
        !self.online.fetch_xor(true, Ordering::SeqCst)
    }
}

impl Connectivity for SharedConnectivity {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}

pub trait LocationProvider: Send {
    fn locate(&mut self) -> Coordinates;
}

/// Pseudo-random fixes inside a bounding box, rounded to 6 decimal places.
pub struct SimulatedGps {
    bounds: GpsBounds,
    rng: StdRng,
}

impl SimulatedGps {
    pub fn new(bounds: GpsBounds) -> Result<Self> {
        bounds.validate()?;
        Ok(Self {
            bounds,
            rng: StdRng::from_os_rng(),
        })
    }

    pub fn seeded(bounds: GpsBounds, seed: u64) -> Result<Self> {
        bounds.validate()?;
        Ok(Self {
            bounds,
            rng: StdRng::seed_from_u64(seed),
        })
    }
}

fn round6(v: f64, min: f64, max: f64) -> f64 {
    ((v * 1e6).round() / 1e6).clamp(min, max)
}

impl LocationProvider for SimulatedGps {
    fn locate(&mut self) -> Coordinates {
        let b = self.bounds;
        let lat = self.rng.random_range(b.lat_min..=b.lat_max);
        let lng = self.rng.random_range(b.lng_min..=b.lng_max);
        Coordinates {
            lat: round6(lat, b.lat_min, b.lat_max),
            lng: round6(lng, b.lng_min, b.lng_max),
        }
    }
}

#[async_trait]
pub trait PhotoSource: Send + Sync {
    /// Returns `None` when the user backed out without choosing a file.
    async fn acquire(&self, path: &Path) -> Result<Option<Photo>>;
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "heic", "heif", "bmp"];

pub struct FilePhotoSource;

#[async_trait]
impl PhotoSource for FilePhotoSource {
    async fn acquire(&self, path: &Path) -> Result<Option<Photo>> {
        if path.as_os_str().is_empty() {
            return Ok(None);
        }

        let is_image = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
        if !is_image {
            return Err(RegistryError::UnsupportedPhoto {
                path: path.to_path_buf(),
            });
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| RegistryError::PhotoRead {
                path: path.to_path_buf(),
                source,
            })?;
        if bytes.is_empty() {
            return Err(RegistryError::EmptyPhoto {
                path: path.to_path_buf(),
            });
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        tracing::debug!("Loaded photo {} ({} bytes)", file_name, bytes.len());
        Ok(Some(Photo { file_name, bytes }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_simulated_gps_stays_in_bounds() {
        let bounds = GpsBounds::default();
        let mut gps = SimulatedGps::seeded(bounds, 7).unwrap();
        for _ in 0..1000 {
            let c = gps.locate();
            assert!((12.9..=13.1).contains(&c.lat), "lat {} out of range", c.lat);
            assert!((77.5..=77.7).contains(&c.lng), "lng {} out of range", c.lng);
        }
    }

    #[test]
    fn test_simulated_gps_six_decimals() {
        let mut gps = SimulatedGps::seeded(GpsBounds::default(), 42).unwrap();
        for _ in 0..100 {
            let text = gps.locate().to_string();
            let (lat, lng) = text.split_once(", ").unwrap();
            let lat = lat.strip_suffix("° N").unwrap();
            let lng = lng.strip_suffix("° E").unwrap();
            assert_eq!(lat.split_once('.').unwrap().1.len(), 6);
            assert_eq!(lng.split_once('.').unwrap().1.len(), 6);
        }
    }

    #[test]
    fn test_simulated_gps_rejects_bad_bounds() {
        let inverted = GpsBounds {
            lat_min: 13.1,
            lat_max: 12.9,
            ..GpsBounds::default()
        };
        assert!(matches!(
            SimulatedGps::seeded(inverted, 1),
            Err(RegistryError::InvalidConfig(_))
        ));

        let nan = GpsBounds {
            lng_min: f64::NAN,
            ..GpsBounds::default()
        };
        assert!(SimulatedGps::new(nan).is_err());
    }

    #[test]
    fn test_seeded_gps_is_deterministic() {
        let mut a = SimulatedGps::seeded(GpsBounds::default(), 9).unwrap();
        let mut b = SimulatedGps::seeded(GpsBounds::default(), 9).unwrap();
        assert_eq!(a.locate(), b.locate());
    }

    #[test]
    fn test_connectivity_toggle() {
        let net = SharedConnectivity::new(true);
        let other = net.clone();
        assert!(!net.toggle());
        assert!(!other.is_online());
        assert!(other.toggle());
        assert!(net.is_online());
        net.set_online(false);
        assert!(!other.is_online());
    }

    #[tokio::test]
    async fn test_file_photo_source() {
        let tmp = tempdir().unwrap();
        let source = FilePhotoSource;

        assert!(source.acquire(Path::new("")).await.unwrap().is_none());

        let good = tmp.path().join("mangrove.JPG");
        tokio::fs::write(&good, b"\xff\xd8\xff").await.unwrap();
        let photo = source.acquire(&good).await.unwrap().unwrap();
        assert_eq!(photo.file_name, "mangrove.JPG");
        assert_eq!(photo.bytes.len(), 3);

        let text = tmp.path().join("notes.txt");
        tokio::fs::write(&text, b"hello").await.unwrap();
        assert!(matches!(
            source.acquire(&text).await,
            Err(RegistryError::UnsupportedPhoto { .. })
        ));

        let empty = tmp.path().join("empty.png");
        tokio::fs::write(&empty, b"").await.unwrap();
        assert!(matches!(
            source.acquire(&empty).await,
            Err(RegistryError::EmptyPhoto { .. })
        ));

        assert!(matches!(
            source.acquire(&tmp.path().join("missing.png")).await,
            Err(RegistryError::PhotoRead { .. })
        ));
    }
}
