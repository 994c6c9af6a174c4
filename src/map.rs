//! Camera model for the map screen
//!
//! Opening a location first snaps the camera to a world view over the
//! target, pauses, then zooms in to street level.

use std::time::Duration;

use crate::models::Coordinate;

pub const WORLD_ZOOM: f64 = 2.0;
pub const STREET_ZOOM: f64 = 15.0;

/// Largest zoom the terminal canvas still renders meaningfully
pub const MAX_ZOOM: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPosition {
    pub target: Coordinate,
    pub zoom: f64,
}

impl CameraPosition {
    pub fn new(target: Coordinate, zoom: f64) -> Self {
        Self { target, zoom }
    }

    /// Longitude/latitude span visible at this zoom level.
    ///
    /// Zoom 0 shows the whole world; every level halves both spans.
    pub fn span(&self) -> (f64, f64) {
        let scale = 2f64.powf(self.zoom.clamp(0.0, MAX_ZOOM));
        (360.0 / scale, 180.0 / scale)
    }

    /// Visible `([min_lng, max_lng], [min_lat, max_lat])`, centered on the
    /// target and shifted so it stays inside the world
    pub fn bounds(&self) -> ([f64; 2], [f64; 2]) {
        let (lng_span, lat_span) = self.span();
        (
            clamp_window(self.target.longitude, lng_span, -180.0, 180.0),
            clamp_window(self.target.latitude, lat_span, -90.0, 90.0),
        )
    }
}

fn clamp_window(center: f64, span: f64, min: f64, max: f64) -> [f64; 2] {
    let half = span / 2.0;
    let low = (center - half).clamp(min, max - span);
    [low, low + span]
}

/// One camera move: animate to `zoom` over `duration` after waiting `delay`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomStage {
    pub delay: Duration,
    pub zoom: f64,
    pub duration: Duration,
}

/// The two-stage zoom-out-then-zoom-in presentation
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomPlan {
    pub stages: Vec<ZoomStage>,
}

impl Default for ZoomPlan {
    fn default() -> Self {
        Self {
            stages: vec![
                ZoomStage {
                    delay: Duration::ZERO,
                    zoom: WORLD_ZOOM,
                    duration: Duration::from_millis(10),
                },
                ZoomStage {
                    delay: Duration::from_millis(300),
                    zoom: STREET_ZOOM,
                    duration: Duration::from_millis(1500),
                },
            ],
        }
    }
}

impl ZoomPlan {
    pub fn total_duration(&self) -> Duration {
        self.stages
            .iter()
            .map(|stage| stage.delay + stage.duration)
            .sum()
    }

    pub fn final_zoom(&self) -> Option<f64> {
        self.stages.last().map(|stage| stage.zoom)
    }
}

/// A zoom plan running against a fixed target
#[derive(Debug, Clone)]
pub struct CameraAnimation {
    target: Coordinate,
    start_zoom: f64,
    plan: ZoomPlan,
}

impl CameraAnimation {
    /// The camera starts zoomed out over the target
    pub fn new(target: Coordinate, plan: ZoomPlan) -> Self {
        Self {
            target,
            start_zoom: WORLD_ZOOM,
            plan,
        }
    }

    pub fn target(&self) -> Coordinate {
        self.target
    }

    /// Zoom level `elapsed` after the animation started
    pub fn zoom_at(&self, elapsed: Duration) -> f64 {
        let mut zoom = self.start_zoom;
        let mut stage_start = Duration::ZERO;

        for stage in &self.plan.stages {
            let move_start = stage_start + stage.delay;
            let move_end = move_start + stage.duration;

            if elapsed < move_start {
                return zoom;
            }
            if elapsed < move_end {
                let progress = (elapsed - move_start).as_secs_f64() / stage.duration.as_secs_f64();
                return zoom + (stage.zoom - zoom) * progress;
            }

            zoom = stage.zoom;
            stage_start = move_end;
        }

        zoom
    }

    pub fn camera_at(&self, elapsed: Duration) -> CameraPosition {
        CameraPosition::new(self.target, self.zoom_at(elapsed))
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.plan.total_duration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TASHKENT: Coordinate = Coordinate::new(41.3111, 69.2797);

    #[test]
    fn test_default_plan_matches_presentation() {
        let plan = ZoomPlan::default();
        assert_eq!(plan.stages.len(), 2);
        assert_eq!(plan.stages[0].zoom, 2.0);
        assert_eq!(plan.stages[1].delay, Duration::from_millis(300));
        assert_eq!(plan.final_zoom(), Some(15.0));
        assert_eq!(plan.total_duration(), Duration::from_millis(1810));
    }

    #[test]
    fn test_zoom_progression() {
        let animation = CameraAnimation::new(TASHKENT, ZoomPlan::default());

        assert_eq!(animation.zoom_at(Duration::ZERO), 2.0);
        assert_eq!(animation.zoom_at(Duration::from_millis(200)), 2.0);
        let midway = animation.zoom_at(Duration::from_millis(310 + 750));
        assert!((midway - 8.5).abs() < 1e-9, "{}", midway);
        assert_eq!(animation.zoom_at(Duration::from_millis(1810)), 15.0);
        assert_eq!(animation.zoom_at(Duration::from_secs(60)), 15.0);

        assert!(!animation.is_finished(Duration::from_millis(1000)));
        assert!(animation.is_finished(Duration::from_millis(1810)));
    }

    #[test]
    fn test_world_zoom_bounds_are_clamped() {
        let camera = CameraPosition::new(Coordinate::new(80.0, 170.0), 0.0);
        assert_eq!(camera.bounds(), ([-180.0, 180.0], [-90.0, 90.0]));

        let camera = CameraPosition::new(Coordinate::new(80.0, 170.0), 1.0);
        assert_eq!(camera.bounds(), ([0.0, 180.0], [0.0, 90.0]));
    }

    #[test]
    fn test_street_zoom_bounds_center_on_target() {
        let camera = CameraPosition::new(TASHKENT, STREET_ZOOM);
        let ([min_lng, max_lng], [min_lat, max_lat]) = camera.bounds();
        assert!(min_lng < TASHKENT.longitude && TASHKENT.longitude < max_lng);
        assert!(min_lat < TASHKENT.latitude && TASHKENT.latitude < max_lat);
        assert!((max_lng - min_lng - 360.0 / 32768.0).abs() < 1e-12);
    }
}
