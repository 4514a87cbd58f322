use eframe::egui::{Pos2, Rect, Vec2};

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 8.0;
/// Initial scale: slightly zoomed out so the whole graph fits on first render.
pub const INITIAL_ZOOM: f32 = 0.8;
/// Scale reached by the double-click center animation.
pub const FOCUS_ZOOM: f32 = 1.5;
pub const FOCUS_ANIMATION_SECS: f64 = 0.75;

/// Viewport transform: world coordinates map to screen as
/// `rect.center() + pan + world * zoom`. Scale is clamped; translation is
/// unconstrained.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub pan: Vec2,
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: INITIAL_ZOOM,
        }
    }
}

impl Camera {
    /// Camera that places `world` at the viewport center at the given scale.
    pub fn centered_on(world: Vec2, zoom: f32) -> Self {
        let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        Self {
            pan: -world * zoom,
            zoom,
        }
    }

    pub fn world_to_screen(&self, rect: Rect, world: Vec2) -> Pos2 {
        rect.center() + self.pan + world * self.zoom
    }

    pub fn screen_to_world(&self, rect: Rect, screen: Pos2) -> Vec2 {
        (screen - rect.center() - self.pan) / self.zoom
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Scales around a screen-space anchor so the world point under the
    /// pointer stays put. The factor may be anything; the result is clamped.
    pub fn zoom_around(&mut self, rect: Rect, anchor: Pos2, factor: f32) {
        let world_before = self.screen_to_world(rect, anchor);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan = anchor - rect.center() - world_before * self.zoom;
    }
}

fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
    }
}

/// Time-based interpolation between two camera transforms, used by
/// double-click-to-center. Sampled against the host frame clock.
#[derive(Clone, Copy, Debug)]
pub struct CameraAnimation {
    start: Camera,
    end: Camera,
    started_at: f64,
    duration_secs: f64,
}

impl CameraAnimation {
    pub fn focus_on(start: Camera, world: Vec2, now: f64) -> Self {
        Self {
            start,
            end: Camera::centered_on(world, FOCUS_ZOOM),
            started_at: now,
            duration_secs: FOCUS_ANIMATION_SECS,
        }
    }

    /// Returns the interpolated camera and whether the animation finished.
    pub fn sample(&self, now: f64) -> (Camera, bool) {
        let elapsed = ((now - self.started_at) / self.duration_secs).clamp(0.0, 1.0);
        let eased = ease_in_out_cubic(elapsed as f32);

        let camera = Camera {
            pan: self.start.pan + (self.end.pan - self.start.pan) * eased,
            zoom: self.start.zoom + (self.end.zoom - self.start.zoom) * eased,
        };
        (camera, elapsed >= 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use eframe::egui::{pos2, vec2};

    fn viewport() -> Rect {
        Rect::from_min_max(pos2(0.0, 0.0), pos2(800.0, 600.0))
    }

    #[test]
    fn zoom_is_always_clamped() {
        let rect = viewport();
        let mut camera = Camera::default();

        for factor in [0.5, 0.01, 100.0, 3.0, 0.0001, 7.5, 1.1, 1e6, 1e-6] {
            camera.zoom_around(rect, pos2(120.0, 450.0), factor);
            assert!(
                (MIN_ZOOM..=MAX_ZOOM).contains(&camera.zoom),
                "zoom {} escaped its range",
                camera.zoom
            );
        }
    }

    #[test]
    fn zoom_keeps_anchor_point_fixed() {
        let rect = viewport();
        let mut camera = Camera {
            pan: vec2(30.0, -12.0),
            zoom: 1.0,
        };

        let anchor = pos2(200.0, 150.0);
        let world_before = camera.screen_to_world(rect, anchor);
        camera.zoom_around(rect, anchor, 1.4);
        let anchor_after = camera.world_to_screen(rect, world_before);

        assert_relative_eq!(anchor_after.x, anchor.x, epsilon = 1e-3);
        assert_relative_eq!(anchor_after.y, anchor.y, epsilon = 1e-3);
    }

    #[test]
    fn round_trip_screen_world_screen() {
        let rect = viewport();
        let camera = Camera {
            pan: vec2(-55.0, 17.0),
            zoom: 2.5,
        };

        let screen = pos2(613.0, 42.0);
        let back = camera.world_to_screen(rect, camera.screen_to_world(rect, screen));
        assert_relative_eq!(back.x, screen.x, epsilon = 1e-3);
        assert_relative_eq!(back.y, screen.y, epsilon = 1e-3);
    }

    #[test]
    fn focus_animation_ends_centered_at_focus_zoom() {
        let rect = viewport();
        let node = vec2(40.0, -25.0);
        let animation = CameraAnimation::focus_on(Camera::default(), node, 10.0);

        let (camera, done) = animation.sample(10.0 + FOCUS_ANIMATION_SECS);
        assert!(done);
        assert_relative_eq!(camera.zoom, FOCUS_ZOOM);

        let on_screen = camera.world_to_screen(rect, node);
        assert_relative_eq!(on_screen.x, rect.center().x, epsilon = 1e-3);
        assert_relative_eq!(on_screen.y, rect.center().y, epsilon = 1e-3);
    }

    #[test]
    fn focus_animation_midpoint_lies_between_endpoints() {
        let node = vec2(100.0, 80.0);
        let start = Camera::default();
        let animation = CameraAnimation::focus_on(start, node, 0.0);
        let end = Camera::centered_on(node, FOCUS_ZOOM);

        let (mid, done) = animation.sample(FOCUS_ANIMATION_SECS / 2.0);
        assert!(!done);
        assert!(mid.zoom > start.zoom.min(end.zoom) && mid.zoom < start.zoom.max(end.zoom));
        assert!(mid.pan.x > end.pan.x.min(start.pan.x) && mid.pan.x < end.pan.x.max(start.pan.x));
        assert!(mid.pan.y > end.pan.y.min(start.pan.y) && mid.pan.y < end.pan.y.max(start.pan.y));
    }

    #[test]
    fn sampling_before_start_holds_start_transform() {
        let animation = CameraAnimation::focus_on(Camera::default(), vec2(10.0, 10.0), 5.0);
        let (camera, done) = animation.sample(4.0);
        assert!(!done);
        assert_eq!(camera, Camera::default());
    }
}
