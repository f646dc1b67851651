//! Altitude-based subdivision depth selection.

use glam::DVec3;
use icosa_geo::TileAddress;

/// Altitude boundaries between subdivision depths.
#[derive(Clone, Debug)]
pub struct DepthThresholds {
    /// `altitudes[i]` is the highest altitude at which depth `finest - i` is
    /// used. Above the last boundary the coarsest depth applies.
    altitudes: Vec<f64>,
    finest: u8,
}

impl DepthThresholds {
    /// Thresholds scaled to a sphere of `radius`: the finest depth 6 below
    /// `0.05 * radius`, stepping down to depth 0 above `2 * radius`.
    #[must_use]
    pub fn for_radius(radius: f64) -> Self {
        Self::custom(
            [0.05, 0.1, 0.25, 0.5, 1.0, 2.0]
                .iter()
                .map(|f| f * radius)
                .collect(),
            6,
        )
    }

    /// Custom altitude boundaries ending at `finest` depth.
    ///
    /// # Panics
    ///
    /// Panics if `altitudes` is empty, not strictly increasing, contains
    /// non-positive values, has more entries than `finest`, or if `finest`
    /// exceeds [`TileAddress::MAX_DEPTH`].
    #[must_use]
    pub fn custom(altitudes: Vec<f64>, finest: u8) -> Self {
        assert!(!altitudes.is_empty(), "must have at least one threshold");
        assert!(finest <= TileAddress::MAX_DEPTH, "finest depth {finest} out of range");
        assert!(
            altitudes.len() <= finest as usize,
            "{} thresholds cannot step down from depth {finest}",
            altitudes.len()
        );
        for pair in altitudes.windows(2) {
            assert!(pair[1] > pair[0], "thresholds must be strictly increasing");
        }
        assert!(altitudes[0] > 0.0, "thresholds must be positive");
        Self { altitudes, finest }
    }

    #[must_use]
    pub fn finest(&self) -> u8 {
        self.finest
    }

    /// Depth used above every boundary.
    #[must_use]
    pub fn coarsest(&self) -> u8 {
        self.finest - self.altitudes.len() as u8
    }

    #[must_use]
    pub fn altitudes(&self) -> &[f64] {
        &self.altitudes
    }
}

/// Picks a subdivision depth from the camera altitude.
#[derive(Clone, Debug)]
pub struct DepthSelector {
    thresholds: DepthThresholds,
}

impl DepthSelector {
    #[must_use]
    pub fn new(thresholds: DepthThresholds) -> Self {
        Self { thresholds }
    }

    /// Depth for a camera `altitude` above the surface. Lower altitudes get
    /// finer depths; the result never increases with altitude.
    #[must_use]
    pub fn select_depth(&self, altitude: f64) -> u8 {
        let altitude = altitude.max(0.0);
        let steps = self
            .thresholds
            .altitudes
            .iter()
            .take_while(|&&t| altitude >= t)
            .count();
        self.thresholds.finest - steps as u8
    }

    /// Depth for a camera at `camera` above a sphere at `center`.
    #[must_use]
    pub fn select_for_camera(&self, camera: DVec3, center: DVec3, radius: f64) -> u8 {
        self.select_depth(camera.distance(center) - radius)
    }

    #[must_use]
    pub fn thresholds(&self) -> &DepthThresholds {
        &self.thresholds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> DepthSelector {
        DepthSelector::new(DepthThresholds::for_radius(1000.0))
    }

    #[test]
    fn test_surface_gets_finest_depth() {
        assert_eq!(selector().select_depth(0.0), 6);
        assert_eq!(selector().select_depth(49.9), 6);
    }

    #[test]
    fn test_far_camera_gets_coarsest_depth() {
        let s = selector();
        assert_eq!(s.thresholds().coarsest(), 0);
        assert_eq!(s.select_depth(1.0e9), 0);
        assert_eq!(s.select_depth(f64::MAX), 0);
    }

    #[test]
    fn test_boundary_belongs_to_coarser_depth() {
        let s = selector();
        assert_eq!(s.select_depth(49.999), 6);
        assert_eq!(s.select_depth(50.0), 5);
        assert_eq!(s.select_depth(100.0), 4);
    }

    #[test]
    fn test_depth_never_increases_with_altitude() {
        let s = selector();
        let mut prev = u8::MAX;
        for i in 0..200 {
            let depth = s.select_depth(f64::from(i) * 15.0);
            assert!(depth <= prev, "depth rose to {depth} at step {i}");
            prev = depth;
        }
    }

    #[test]
    fn test_negative_altitude_treated_as_surface() {
        assert_eq!(selector().select_depth(-10.0), 6);
    }

    #[test]
    fn test_select_for_camera() {
        let s = selector();
        let depth = s.select_for_camera(DVec3::new(0.0, 1300.0, 0.0), DVec3::ZERO, 1000.0);
        assert_eq!(depth, 3);
    }

    #[test]
    fn test_custom_thresholds() {
        let s = DepthSelector::new(DepthThresholds::custom(vec![10.0, 20.0], 4));
        assert_eq!(s.select_depth(5.0), 4);
        assert_eq!(s.select_depth(15.0), 3);
        assert_eq!(s.select_depth(25.0), 2);
    }

    #[test]
    #[should_panic(expected = "strictly increasing")]
    fn test_non_increasing_thresholds_panic() {
        let _ = DepthThresholds::custom(vec![10.0, 5.0], 4);
    }

    #[test]
    #[should_panic(expected = "cannot step down")]
    fn test_too_many_thresholds_panic() {
        let _ = DepthThresholds::custom(vec![1.0, 2.0, 3.0], 2);
    }
}
