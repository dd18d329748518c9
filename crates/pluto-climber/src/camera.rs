use serde::{Deserialize, Serialize};

use pluto_core::geometry::Rect;

use crate::config::PlutoConfig;

/// Height of the strip that ends the run when the player reaches it.
const FALL_STRIP_HEIGHT: f32 = 1.0;

/// Per-frame camera state, derived from the player's peak and passed to every
/// world-to-screen mapping. Never stored between frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraView {
    /// How far the view has scrolled up, in world units. Never negative.
    pub offset: f32,
    /// World y above which new platforms are spawned.
    pub upper_bound: f32,
    /// World y at or below which entities are pruned.
    pub lower_bound: f32,
    /// World y of the trigger strip that ends the run.
    pub fall_line: f32,
    window_width: f32,
}

impl CameraView {
    /// Scroll so the player's highest point never rises above the follow line.
    pub fn compute(peak_y: f32, player_height: f32, cfg: &PlutoConfig) -> Self {
        let offset = (cfg.camera.follow_line_y - peak_y).max(0.0);
        Self::from_offset(offset, player_height, cfg)
    }

    pub fn from_offset(offset: f32, player_height: f32, cfg: &PlutoConfig) -> Self {
        let height = cfg.window.height;
        Self {
            offset,
            upper_bound: -offset,
            lower_bound: height - offset,
            fall_line: height + player_height * cfg.camera.fall_margin_factor - offset,
            window_width: cfg.window.width,
        }
    }

    pub fn to_screen(&self, rect: Rect) -> Rect {
        rect.offset_y(self.offset)
    }

    /// Whether a world y is still above the prune line.
    pub fn is_visible(&self, world_y: f32) -> bool {
        world_y < self.lower_bound
    }

    /// Trigger strip three window widths wide, centred on the window.
    pub fn fall_strip(&self) -> Rect {
        Rect::new(
            -self.window_width,
            self.fall_line,
            self.window_width * 3.0,
            FALL_STRIP_HEIGHT,
        )
    }

    /// Swept fall test: once the hitbox bottom passes the top of the strip the
    /// player cannot come back, so reaching it at any speed ends the run.
    pub fn player_fell(&self, hitbox: &Rect) -> bool {
        let strip = self.fall_strip();
        hitbox.bottom() > strip.top() && hitbox.overlaps_x(&strip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> PlutoConfig {
        PlutoConfig::default()
    }

    #[test]
    fn no_scroll_below_follow_line() {
        let cam = CameraView::compute(600.0, 60.0, &cfg());
        assert_eq!(cam.offset, 0.0);
        assert_eq!(cam.upper_bound, 0.0);
        assert_eq!(cam.lower_bound, 800.0);
        assert_eq!(cam.fall_line, 890.0);
    }

    #[test]
    fn offset_tracks_ascent_above_follow_line() {
        let cam = CameraView::compute(200.0, 60.0, &cfg());
        assert_eq!(cam.offset, 200.0);
        assert_eq!(cam.upper_bound, -200.0);
        assert_eq!(cam.lower_bound, 600.0);
        assert_eq!(cam.fall_line, 690.0);
        assert_eq!(cam.to_screen(Rect::new(0.0, 200.0, 1.0, 1.0)).y, 400.0);
    }

    #[test]
    fn to_screen_shifts_only_y() {
        let cam = CameraView::from_offset(150.0, 60.0, &cfg());
        let r = cam.to_screen(Rect::new(10.0, -100.0, 5.0, 6.0));
        assert_eq!(r, Rect::new(10.0, 50.0, 5.0, 6.0));
    }

    #[test]
    fn visibility_uses_strict_lower_bound() {
        let cam = CameraView::from_offset(0.0, 60.0, &cfg());
        assert!(cam.is_visible(799.9));
        assert!(!cam.is_visible(800.0));
    }

    #[test]
    fn fall_detected_anywhere_in_strip() {
        let cam = CameraView::from_offset(300.0, 60.0, &cfg());
        for x in [-390.0, 0.0, 200.0, 790.0] {
            let hb = Rect::new(x, cam.fall_line - 59.0, 34.0, 60.0);
            assert!(cam.player_fell(&hb), "x={x} should trigger");
        }
        let above = Rect::new(100.0, cam.fall_line - 61.0, 34.0, 60.0);
        assert!(!cam.player_fell(&above));
    }

    #[test]
    fn fast_fall_through_strip_still_counts() {
        let cam = CameraView::from_offset(0.0, 60.0, &cfg());
        let hb = Rect::new(100.0, cam.fall_line + 500.0, 34.0, 60.0);
        assert!(cam.player_fell(&hb));
    }

    #[test]
    fn fall_needs_horizontal_overlap() {
        let cam = CameraView::from_offset(0.0, 60.0, &cfg());
        let hb = Rect::new(1300.0, cam.fall_line, 34.0, 60.0);
        assert!(!cam.player_fell(&hb));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn offset_never_negative_and_bounds_consistent(peak in -100_000.0f32..2000.0) {
                let c = cfg();
                let cam = CameraView::compute(peak, c.player.height, &c);
                prop_assert!(cam.offset >= 0.0);
                prop_assert!(cam.upper_bound < cam.lower_bound);
                prop_assert!(cam.lower_bound < cam.fall_line);
                prop_assert!((cam.lower_bound - cam.upper_bound - c.window.height).abs() < 0.1);
            }
        }
    }
}
