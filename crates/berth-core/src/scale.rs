//! Multiplicative scale applied to the object being placed.
//!
//! The effective object scale always composes against the baseline captured
//! at session start, never against a live scale, so repeated adjustment
//! cannot compound across frames.

use crate::config::ScaleConfig;
use crate::frame::Vec3;

/// Owns the current scale multiplier for the active placement session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleController {
    config: ScaleConfig,
    current: f32,
}

impl Default for ScaleController {
    fn default() -> Self {
        Self::new(ScaleConfig::default())
    }
}

impl ScaleController {
    pub fn new(config: ScaleConfig) -> Self {
        Self {
            config,
            current: 1.0,
        }
    }

    pub fn config(&self) -> &ScaleConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ScaleConfig {
        &mut self.config
    }

    /// The current multiplier, always within `[min, max]`.
    pub fn current(&self) -> f32 {
        self.current
    }

    fn clamp(&mut self) {
        self.current = self.current.clamp(self.config.min, self.config.max);
    }

    /// Multiplies the current scale by one step. Returns the clamped value.
    pub fn increase(&mut self) -> f32 {
        self.current *= 1.0 + self.config.step_percent;
        self.clamp();
        self.current
    }

    /// Divides the current scale by one step. Returns the clamped value.
    pub fn decrease(&mut self) -> f32 {
        self.current /= 1.0 + self.config.step_percent;
        self.clamp();
        self.current
    }

    /// Back to 1.0 exactly. Called at every session boundary.
    pub fn reset(&mut self) {
        self.current = 1.0;
    }

    /// Effective object scale: authored mesh scale ⊙ baseline parent scale,
    /// times the current multiplier. Reapplied to the live preview every tick
    /// so unrelated transform writes cannot silently drop it.
    pub fn effective(&self, mesh_scale: &Vec3, baseline_parent_scale: &Vec3) -> Vec3 {
        mesh_scale.component_mul(baseline_parent_scale) * self.current
    }

    /// Parent-level scale to apply to the actual object on confirm.
    pub fn final_parent_scale(&self, baseline_parent_scale: &Vec3) -> Vec3 {
        baseline_parent_scale * self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> ScaleController {
        ScaleController::new(ScaleConfig {
            min: 0.1,
            max: 3.0,
            step_percent: 0.05,
        })
    }

    #[test]
    fn test_increase_and_decrease_step() {
        let mut scale = controller();
        assert!((scale.increase() - 1.05).abs() < 1e-6);
        assert!((scale.decrease() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_increase_clamps_at_max() {
        // 40 increases at 5% would reach ~7x; the controller clamps at 3.0
        let mut scale = controller();
        for _ in 0..40 {
            scale.increase();
        }
        assert!((scale.current() - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_decrease_clamps_at_min() {
        let mut scale = controller();
        for _ in 0..80 {
            scale.decrease();
        }
        assert!((scale.current() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_bounds_hold_after_every_call() {
        let mut scale = controller();
        for i in 0..200 {
            if i % 3 == 0 {
                scale.decrease();
            } else {
                scale.increase();
            }
            let v = scale.current();
            assert!((0.1..=3.0).contains(&v), "out of bounds: {v}");
        }
    }

    #[test]
    fn test_reset_is_exact() {
        let mut scale = controller();
        scale.increase();
        scale.increase();
        scale.reset();
        assert_eq!(scale.current(), 1.0);
    }

    #[test]
    fn test_effective_composes_with_baseline() {
        let mut scale = controller();
        scale.increase();

        let mesh = Vec3::new(2.0, 1.0, 0.5);
        let baseline = Vec3::new(1.0, 2.0, 2.0);
        let effective = scale.effective(&mesh, &baseline);

        assert!((effective.x - 2.0 * 1.05).abs() < 1e-5);
        assert!((effective.y - 2.0 * 1.05).abs() < 1e-5);
        assert!((effective.z - 1.0 * 1.05).abs() < 1e-5);
    }

    #[test]
    fn test_final_parent_scale() {
        let mut scale = controller();
        scale.increase();
        let parent = scale.final_parent_scale(&Vec3::new(2.0, 2.0, 2.0));
        assert!((parent.x - 2.1).abs() < 1e-5);
    }
}
