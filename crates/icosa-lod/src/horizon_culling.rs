//! Horizon culling of registry tiles.
//!
//! A tile is hidden when its bounding sphere lies entirely beyond the
//! tangent cone from the camera to the sphere.

use glam::DVec3;
use icosa_geo::{RegistryEntry, RegistrySettings};

/// Horizon test state for one camera position.
#[derive(Clone, Debug)]
pub struct HorizonCuller {
    center: DVec3,
    radius: f64,
    /// Unit direction from the sphere centre to the camera.
    camera_dir: DVec3,
    camera_distance: f64,
    /// `radius / camera_distance`, the cosine of the visible cap half-angle.
    cos_horizon: f64,
}

impl HorizonCuller {
    #[must_use]
    pub fn new(camera: DVec3, center: DVec3, radius: f64) -> Self {
        let offset = camera - center;
        let camera_distance = offset.length();
        let cos_horizon = if camera_distance > radius {
            radius / camera_distance
        } else {
            0.0
        };
        Self {
            center,
            radius,
            camera_dir: offset.normalize_or_zero(),
            camera_distance,
            cos_horizon,
        }
    }

    /// Culler for the sphere described by registry `settings`.
    #[must_use]
    pub fn for_settings(camera: DVec3, settings: &RegistrySettings) -> Self {
        Self::new(camera, settings.center, settings.base_radius)
    }

    /// Returns true if a sphere at `point` with `margin` radius may be
    /// visible. Conservative: never false for a visible sphere.
    #[must_use]
    pub fn is_above_horizon(&self, point: DVec3, margin: f64) -> bool {
        // Camera inside or on the sphere: no horizon to test against.
        if self.camera_distance <= self.radius {
            return true;
        }
        let offset = point - self.center;
        let dist = offset.length();
        if dist <= margin {
            return true;
        }

        let cos_angle = offset.dot(self.camera_dir) / dist;
        let sin_margin = margin / dist;
        let cos_margin = (1.0 - sin_margin * sin_margin).max(0.0).sqrt();
        let sin_horizon = (1.0 - self.cos_horizon * self.cos_horizon).max(0.0).sqrt();
        // cos(horizon angle + margin angle)
        let threshold = self.cos_horizon * cos_margin - sin_horizon * sin_margin;
        cos_angle >= threshold
    }

    /// Horizon test for a registry tile using its centroid and corner bound.
    #[must_use]
    pub fn is_entry_visible(&self, entry: &RegistryEntry) -> bool {
        self.is_above_horizon(entry.centroid(), entry.bounding_radius())
    }

    /// Distance from the camera to the tangent point.
    #[must_use]
    pub fn horizon_distance(&self) -> f64 {
        if self.camera_distance <= self.radius {
            return 0.0;
        }
        (self.camera_distance * self.camera_distance - self.radius * self.radius).sqrt()
    }

    #[must_use]
    pub fn camera_altitude(&self) -> f64 {
        (self.camera_distance - self.radius).max(0.0)
    }
}
