use crate::math::lerp;
use crate::state::{CursorState, EffectState};

/// Fraction of the remaining distance covered per frame
pub const DEFAULT_LERP_FACTOR: f64 = 0.15;

/// Exponential easing of the displayed cursor toward the raw pointer.
///
/// Each step moves the cursor `factor` of the way to the latest pointer
/// sample, so with the pointer held still the gap shrinks by `1 - factor`
/// every frame and never overshoots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingIntegrator {
    factor: f64,
}

impl SmoothingIntegrator {
    /// `factor` is expected in (0, 1]; configs are validated before they get here
    pub fn new(factor: f64) -> Self {
        SmoothingIntegrator { factor }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Advances one frame and returns the new displayed state
    pub fn step(&self, state: &mut EffectState) -> CursorState {
        state.cursor.x = lerp(state.cursor.x, state.pointer.x, self.factor);
        state.cursor.y = lerp(state.cursor.y, state.pointer.y, self.factor);
        state.cursor
    }

    /// Remaining distance after `frames` steps toward a stationary pointer
    pub fn remaining_after(&self, distance: f64, frames: u32) -> f64 {
        distance * (1.0 - self.factor).powi(frames as i32)
    }
}

impl Default for SmoothingIntegrator {
    fn default() -> Self {
        Self::new(DEFAULT_LERP_FACTOR)
    }
}
