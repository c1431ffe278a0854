/// Joint state model: clamped control parameters and the load block
use crate::camera::{CameraAngles, ViewMode};
use crate::rig::RigConfig;
use crate::scene::DrawStyle;

/// Smallest zoom factor the wheel can reach.
pub const ZOOM_FLOOR: f32 = 0.05;
/// Simulation time added per frame at startup.
const DEFAULT_SPEED: f32 = 1.0 / 60.0;
/// Trolley alignment tolerance for re-attachment.
const TROLLEY_EPS: f32 = 1e-4;

/// The lifted block: attached it tracks the hook, released it settles where
/// it was dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadBlock {
    attached: bool,
    anchor_slew_deg: f32,
    anchor_trolley: f32,
    y: f32,
}

impl LoadBlock {
    fn new(hoist: f32, hook_len: f32) -> Self {
        Self {
            attached: true,
            anchor_slew_deg: 0.0,
            anchor_trolley: 0.0,
            y: Self::attached_height(hoist, hook_len),
        }
    }

    /// Height the block hangs at while attached, tracking the hook tip.
    fn attached_height(hoist: f32, hook_len: f32) -> f32 {
        hoist / 4.0 - hook_len / 20.0 + 5.7
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Slew at the moment of release. Meaningful only while released.
    pub fn anchor_slew_deg(&self) -> f32 {
        self.anchor_slew_deg
    }

    /// Trolley offset at the moment of release. Meaningful only while released.
    pub fn anchor_trolley(&self) -> f32 {
        self.anchor_trolley
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    fn release(&mut self, slew_deg: f32, trolley: f32) {
        self.attached = false;
        self.anchor_slew_deg = slew_deg;
        self.anchor_trolley = trolley;
    }

    fn reattach(&mut self) {
        self.attached = true;
    }

    /// Per-frame position update: track the hook while attached, sink toward
    /// the resting height while released.
    fn settle(&mut self, rig: &RigConfig, hoist: f32, hook_len: f32) {
        if self.attached {
            self.y = Self::attached_height(hoist, hook_len);
        } else {
            self.y = (self.y - rig.block_descent_rate).max(rig.block_rest_height);
        }
    }
}

/// Every controllable parameter of the crane plus derived simulation state.
///
/// One instance lives for the whole session, owned by the frame-loop driver.
/// Mutators are total: out-of-range requests saturate at the bound and the
/// new value is returned, so the rig can never be driven into an impossible
/// pose. Only angles wrap, and only the camera's.
#[derive(Debug, Clone)]
pub struct CraneState {
    rig: RigConfig,
    hoist: f32,
    slew_deg: f32,
    trolley: f32,
    hook_len: f32,
    hook_open: bool,
    camera: CameraAngles,
    view: ViewMode,
    style: DrawStyle,
    zoom_scale: f32,
    sim_time: f32,
    speed: f32,
    animating: bool,
    block: LoadBlock,
}

impl CraneState {
    /// Fresh state at the rig's parked pose.
    pub fn new(rig: RigConfig) -> Self {
        let hoist = rig.min_hoist();
        let trolley = rig.trolley_min;
        let hook_len = rig.hook_init.min(rig.hook_max(hoist));
        Self {
            hoist,
            slew_deg: 0.0,
            trolley,
            hook_len,
            hook_open: false,
            camera: CameraAngles::default(),
            view: ViewMode::Axonometric,
            style: DrawStyle::Wireframe,
            zoom_scale: 1.0,
            sim_time: 0.0,
            speed: DEFAULT_SPEED,
            animating: true,
            block: LoadBlock::new(hoist, hook_len),
            rig,
        }
    }

    pub fn rig(&self) -> &RigConfig {
        &self.rig
    }

    pub fn hoist(&self) -> f32 {
        self.hoist
    }

    pub fn slew_deg(&self) -> f32 {
        self.slew_deg
    }

    pub fn trolley(&self) -> f32 {
        self.trolley
    }

    pub fn hook_len(&self) -> f32 {
        self.hook_len
    }

    pub fn hook_open(&self) -> bool {
        self.hook_open
    }

    pub fn camera(&self) -> &CameraAngles {
        &self.camera
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn draw_style(&self) -> DrawStyle {
        self.style
    }

    pub fn zoom_scale(&self) -> f32 {
        self.zoom_scale
    }

    pub fn sim_time(&self) -> f32 {
        self.sim_time
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn block(&self) -> &LoadBlock {
        &self.block
    }

    /// Raise or lower the telescoping lift.
    ///
    /// Lowering shortens the cable's reach, so the hook length is re-clamped
    /// in the same step; the hook can never be left past its maximum.
    pub fn adjust_hoist(&mut self, delta: f32) -> f32 {
        self.hoist = (self.hoist + delta).clamp(self.rig.min_hoist(), self.rig.max_hoist());
        self.hook_len = self.hook_len.min(self.rig.hook_max(self.hoist));
        self.hoist
    }

    pub fn adjust_trolley(&mut self, delta: f32) -> f32 {
        self.trolley = (self.trolley + delta).clamp(self.rig.trolley_min, self.rig.trolley_max());
        self.trolley
    }

    pub fn adjust_hook(&mut self, delta: f32) -> f32 {
        self.hook_len = (self.hook_len + delta).clamp(0.0, self.rig.hook_max(self.hoist));
        self.hook_len
    }

    /// Slew accumulates without wrapping; alignment checks use raw degrees.
    pub fn adjust_slew(&mut self, delta: f32) -> f32 {
        self.slew_deg += delta;
        self.slew_deg
    }

    /// Flip the jaws.
    ///
    /// Opening them releases the block, snapshotting the current slew and
    /// trolley as its anchor. Closing them re-attaches it only when the cable
    /// is fully paid out directly over the anchor; otherwise the jaws close
    /// on nothing and the block stays released.
    pub fn toggle_hook_open(&mut self) -> bool {
        self.hook_open = !self.hook_open;
        if self.hook_open && self.block.attached {
            self.block.release(self.slew_deg, self.trolley);
        } else if !self.hook_open && !self.block.attached && self.reattach_allowed() {
            self.block.reattach();
        }
        self.hook_open
    }

    fn reattach_allowed(&self) -> bool {
        self.hook_len >= self.rig.hook_max(self.hoist)
            && (self.trolley - self.block.anchor_trolley).abs() <= TROLLEY_EPS
            && (self.slew_deg - self.block.anchor_slew_deg).abs()
                <= self.rig.reattach_tolerance_deg
    }

    pub fn orbit_camera(&mut self, dtheta_deg: f32, dgamma_deg: f32) -> (f32, f32) {
        self.camera.orbit(dtheta_deg, dgamma_deg)
    }

    pub fn reset_camera(&mut self) {
        self.camera = CameraAngles::default();
    }

    pub fn set_view(&mut self, view: ViewMode) {
        self.view = view;
    }

    pub fn set_draw_style(&mut self, style: DrawStyle) {
        self.style = style;
    }

    pub fn toggle_draw_style(&mut self) -> DrawStyle {
        self.style = match self.style {
            DrawStyle::Wireframe => DrawStyle::Solid,
            DrawStyle::Solid => DrawStyle::Wireframe,
        };
        self.style
    }

    pub fn adjust_zoom(&mut self, delta: f32) -> f32 {
        self.zoom_scale = (self.zoom_scale + delta).max(ZOOM_FLOOR);
        self.zoom_scale
    }

    /// Scale the simulation speed. Ignored while the animation is paused.
    pub fn adjust_speed(&mut self, factor: f32) -> f32 {
        if self.animating {
            self.speed *= factor;
        }
        self.speed
    }

    pub fn toggle_animation(&mut self) -> bool {
        self.animating = !self.animating;
        self.animating
    }

    /// Advance one frame: accumulate simulation time and settle the block.
    ///
    /// This is the only place per-frame derived state changes; the scene
    /// evaluator just reads. Returns the (possibly unchanged) simulation time.
    pub fn tick(&mut self) -> f32 {
        if self.animating {
            self.sim_time += self.speed;
        }
        self.block.settle(&self.rig, self.hoist, self.hook_len);
        self.sim_time
    }
}

impl Default for CraneState {
    fn default() -> Self {
        Self::new(RigConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Fully paid-out cable with the block already released over the anchor.
    fn released_over_anchor() -> CraneState {
        let mut state = CraneState::default();
        state.adjust_hook(1000.0);
        state.toggle_hook_open();
        assert!(!state.block().is_attached());
        state
    }

    #[test]
    fn test_parked_pose() {
        let state = CraneState::default();
        assert_relative_eq!(state.hoist(), 0.0);
        assert_relative_eq!(state.trolley(), 8.0);
        assert_relative_eq!(state.hook_len(), 10.0);
        assert!(!state.hook_open());
        assert!(state.is_animating());
        assert_eq!(state.view(), ViewMode::Axonometric);
        assert_eq!(state.draw_style(), DrawStyle::Wireframe);
        assert!(state.block().is_attached());
        // Hanging height of the hook tip at the parked pose.
        assert_relative_eq!(state.block().y(), 5.2);
    }

    #[test]
    fn test_hook_saturates_at_max() {
        let mut state = CraneState::default();
        for _ in 0..20 {
            state.adjust_hook(5.0);
        }
        assert_relative_eq!(state.hook_len(), 101.0);
        assert_relative_eq!(state.adjust_hook(5.0), 101.0);
        assert_relative_eq!(state.adjust_hook(-1000.0), 0.0);
    }

    #[test]
    fn test_hook_max_grows_with_hoist() {
        let mut state = CraneState::default();
        assert_relative_eq!(state.adjust_hoist(1000.0), 16.0);
        assert_relative_eq!(state.adjust_hook(1000.0), 181.0);
    }

    #[test]
    fn test_lowering_hoist_reclamps_hook() {
        let mut state = CraneState::default();
        state.adjust_hoist(1000.0);
        state.adjust_hook(1000.0);
        state.adjust_hoist(-1.0);
        // hook_max(15) = 101 + 15 * 2 * 2.5
        assert_relative_eq!(state.hook_len(), 176.0);
        assert!(state.hook_len() <= state.rig().hook_max(state.hoist()));
    }

    #[test]
    fn test_hoist_respects_misalignment_floor() {
        let rig = RigConfig {
            lift_count: 8,
            ..RigConfig::default()
        };
        let mut state = CraneState::new(rig);
        assert_relative_eq!(state.hoist(), 4.0);
        assert_relative_eq!(state.adjust_hoist(-100.0), 4.0);
    }

    #[test]
    fn test_trolley_clamps_both_ways() {
        let mut state = CraneState::default();
        assert_relative_eq!(state.adjust_trolley(1000.0), 19.0);
        assert_relative_eq!(state.adjust_trolley(-1000.0), 8.0);
    }

    #[test]
    fn test_slew_accumulates_without_wrap() {
        let mut state = CraneState::default();
        state.adjust_slew(365.0);
        assert_relative_eq!(state.adjust_slew(-5.0), 360.0);
        let mut direct = CraneState::default();
        direct.adjust_slew(360.0);
        // Modulo-consistent with the one-step adjustment.
        assert_relative_eq!(
            crate::transform::wrap_degrees(state.slew_deg()),
            crate::transform::wrap_degrees(direct.slew_deg())
        );
    }

    #[test]
    fn test_release_snapshots_anchor() {
        let mut state = CraneState::default();
        state.adjust_slew(20.0);
        state.adjust_trolley(2.0);
        assert!(state.toggle_hook_open());
        let block = state.block();
        assert!(!block.is_attached());
        assert_relative_eq!(block.anchor_slew_deg(), 20.0);
        assert_relative_eq!(block.anchor_trolley(), 10.0);
    }

    #[test]
    fn test_reattach_over_anchor() {
        let mut state = released_over_anchor();
        assert!(!state.toggle_hook_open());
        assert!(state.block().is_attached());
    }

    #[test]
    fn test_reattach_blocked_by_slack_cable() {
        let mut state = released_over_anchor();
        state.adjust_hook(-5.0);
        state.toggle_hook_open();
        assert!(!state.block().is_attached());
    }

    #[test]
    fn test_reattach_blocked_by_trolley_offset() {
        let mut state = released_over_anchor();
        state.adjust_trolley(1.0);
        state.toggle_hook_open();
        assert!(!state.block().is_attached());
    }

    #[test]
    fn test_reattach_blocked_by_slew_misalignment() {
        let mut state = released_over_anchor();
        state.adjust_slew(5.1);
        state.toggle_hook_open();
        assert!(!state.block().is_attached());
    }

    #[test]
    fn test_reattach_at_slew_tolerance_edge() {
        let mut state = released_over_anchor();
        state.adjust_slew(5.0);
        state.toggle_hook_open();
        assert!(state.block().is_attached());
    }

    #[test]
    fn test_reattach_compares_raw_slew_degrees() {
        // A full extra turn is a misalignment even though it lands on the
        // same heading.
        let mut state = released_over_anchor();
        state.adjust_slew(360.0);
        state.toggle_hook_open();
        assert!(!state.block().is_attached());
    }

    #[test]
    fn test_failed_reattach_keeps_jaws_usable() {
        let mut state = released_over_anchor();
        state.adjust_trolley(1.0);
        assert!(!state.toggle_hook_open()); // closes on nothing
        state.adjust_trolley(-1.0);
        state.toggle_hook_open(); // open again
        assert!(!state.toggle_hook_open()); // close over the anchor
        assert!(state.block().is_attached());
    }

    #[test]
    fn test_released_block_descends_to_rest() {
        let mut state = CraneState::default();
        state.toggle_hook_open();
        let mut previous = state.block().y();
        for _ in 0..60 {
            state.tick();
            let y = state.block().y();
            assert!(y <= previous);
            assert!(y >= 0.65);
            previous = y;
        }
        assert_relative_eq!(state.block().y(), 0.65);
    }

    #[test]
    fn test_attached_block_tracks_hook() {
        let mut state = CraneState::default();
        state.adjust_hook(5.0);
        state.tick();
        assert_relative_eq!(state.block().y(), 4.95);
        state.adjust_hoist(4.0);
        state.tick();
        assert_relative_eq!(state.block().y(), 5.95);
    }

    #[test]
    fn test_speed_adjust_gated_by_animation() {
        let mut state = CraneState::default();
        let initial = state.speed();
        assert!(!state.toggle_animation());
        assert_relative_eq!(state.adjust_speed(1.1), initial);
        let t = state.tick();
        assert_relative_eq!(t, 0.0);
        assert!(state.toggle_animation());
        assert_relative_eq!(state.adjust_speed(1.1), initial * 1.1);
        assert!(state.tick() > 0.0);
    }

    #[test]
    fn test_zoom_floor() {
        let mut state = CraneState::default();
        assert_relative_eq!(state.adjust_zoom(-10.0), ZOOM_FLOOR);
        assert_relative_eq!(state.adjust_zoom(0.05), ZOOM_FLOOR + 0.05);
    }

    #[test]
    fn test_camera_orbit_wraps_and_resets() {
        let mut state = CraneState::default();
        let (theta, gamma) = state.orbit_camera(365.0, -20.0);
        assert_relative_eq!(theta, 55.0, epsilon = 1e-3);
        assert_relative_eq!(gamma, 355.0, epsilon = 1e-3);
        state.reset_camera();
        assert_relative_eq!(state.camera().theta_deg, 50.0);
        assert_relative_eq!(state.camera().gamma_deg, 15.0);
    }

    #[test]
    fn test_tick_returns_time_unchanged_when_paused() {
        let mut state = CraneState::default();
        state.tick();
        state.toggle_animation();
        let before = state.sim_time();
        assert_relative_eq!(state.tick(), before);
    }
}
