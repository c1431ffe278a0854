/// Rig configuration: segment counts, sizes and motion limits
use thiserror::Error;

/// A structurally invalid rig configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RigError {
    #[error("invalid rig: {reason}")]
    Invalid { reason: String },
}

/// Dimensions and motion limits of one tower-crane rig.
///
/// Earlier iterations of the scene existed as near-identical copies with
/// different constants baked in; those variants are now data. Every clamp
/// bound the state model enforces is derived from this struct, so a rig
/// that passes [`RigConfig::validate`] can never be driven into a
/// geometrically impossible pose.
#[derive(Debug, Clone, PartialEq)]
pub struct RigConfig {
    /// Display name of the preset.
    pub name: String,
    /// Side length of the square ground slab.
    pub ground_length: f32,
    /// Side of one base-column cube.
    pub base_side: f32,
    /// Number of cubes in the base column.
    pub base_count: usize,
    /// Horizontal side of one lift-column cube (the lift is narrower).
    pub lift_side: f32,
    /// Number of cubes in the telescoping lift column.
    pub lift_count: usize,
    /// Number of cubes in the boom. Must be at least 10 so the trolley
    /// travel range stays non-empty.
    pub boom_size: usize,
    /// Cable length change per hook raise/lower action.
    pub hook_step: f32,
    /// Slew change per action, in degrees.
    pub slew_step: f32,
    /// Trolley travel per action.
    pub trolley_step: f32,
    /// Innermost trolley position along the boom.
    pub trolley_min: f32,
    /// Cable length at startup.
    pub hook_init: f32,
    /// Cable length available at zero hoist; extra reach scales with hoist.
    pub hook_reach: f32,
    /// How far the released load block falls per frame.
    pub block_descent_rate: f32,
    /// Resting height of a released load block.
    pub block_rest_height: f32,
    /// Slew misalignment tolerated when re-attaching the load block, degrees.
    pub reattach_tolerance_deg: f32,
    /// Half-height of the orthographic view volume.
    pub zoom: f32,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            name: "compact".to_string(),
            ground_length: 65.0,
            base_side: 2.0,
            base_count: 10,
            lift_side: 0.8,
            lift_count: 12,
            boom_size: 20,
            hook_step: 5.0,
            slew_step: 5.0,
            trolley_step: 1.0,
            trolley_min: 8.0,
            hook_init: 10.0,
            hook_reach: 101.0,
            block_descent_rate: 0.1,
            block_rest_height: 0.65,
            reattach_tolerance_deg: 5.0,
            zoom: 30.0,
        }
    }
}

impl RigConfig {
    /// The taller rig variant: more mast segments and a longer boom.
    pub fn high_mast() -> Self {
        Self {
            name: "high-mast".to_string(),
            base_count: 14,
            lift_count: 16,
            boom_size: 26,
            zoom: 40.0,
            ..Self::default()
        }
    }

    /// Look up a builtin preset by name.
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "compact" => Some(Self::default()),
            "high-mast" => Some(Self::high_mast()),
            _ => None,
        }
    }

    /// Hoist travel per raise/lower action: half a base cube.
    pub fn hoist_step(&self) -> f32 {
        0.5 * self.base_side
    }

    /// Highest hoist at which the lift column still overlaps the base.
    pub fn max_hoist(&self) -> f32 {
        (self.base_count as f32 - 2.0) * self.base_side
    }

    /// Lowest hoist at which the lift column does not sink into the base.
    ///
    /// Zero unless the base has more segments than the lift, in which case
    /// the lift bottoms out at the misalignment threshold.
    pub fn min_hoist(&self) -> f32 {
        ((self.base_count as f32 - self.lift_count as f32) * self.base_side).max(0.0)
    }

    /// Longest cable extension for the given hoist. Raising the mast
    /// raises the trolley, so the cable may pay out further.
    pub fn hook_max(&self, hoist: f32) -> f32 {
        self.hook_reach + hoist * self.base_side * 2.5
    }

    /// Outermost trolley position along the boom.
    pub fn trolley_max(&self) -> f32 {
        (self.boom_size - 1) as f32
    }

    /// Check structural constraints that the clamp bounds rely on.
    pub fn validate(&self) -> Result<(), RigError> {
        if self.boom_size < 10 {
            return Err(RigError::Invalid {
                reason: format!("boom_size must be at least 10, got {}", self.boom_size),
            });
        }
        if self.base_count < 2 || self.lift_count < 2 {
            return Err(RigError::Invalid {
                reason: "base_count and lift_count must be at least 2".to_string(),
            });
        }
        if self.base_side <= 0.0 || self.lift_side <= 0.0 || self.ground_length <= 0.0 {
            return Err(RigError::Invalid {
                reason: "segment sides and ground length must be positive".to_string(),
            });
        }
        if self.hook_step <= 0.0 || self.slew_step <= 0.0 || self.trolley_step <= 0.0 {
            return Err(RigError::Invalid {
                reason: "action steps must be positive".to_string(),
            });
        }
        if self.trolley_min > self.trolley_max() {
            return Err(RigError::Invalid {
                reason: format!(
                    "trolley_min {} exceeds trolley_max {}",
                    self.trolley_min,
                    self.trolley_max()
                ),
            });
        }
        if self.hook_reach < 0.0 || self.hook_init < 0.0 || self.hook_init > self.hook_reach {
            return Err(RigError::Invalid {
                reason: "hook_init must lie within [0, hook_reach]".to_string(),
            });
        }
        if self.block_descent_rate <= 0.0 || self.zoom <= 0.0 {
            return Err(RigError::Invalid {
                reason: "block_descent_rate and zoom must be positive".to_string(),
            });
        }
        Ok(())
    }
}
