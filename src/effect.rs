//! The cursor effect: one mounted instance of pointer sampling, per-frame
//! smoothing, hover magnification and rendering.
//!
//! ```text
//! window pointer/touch move ──> PointerSampler ──┐
//!                                                ├─> EffectState ──> FrameLoop tick
//! page enter/leave ─────────> HoverMagnifier ────┘        │
//!                                                         └─> SmoothingIntegrator
//!                                                               └─> RendererBinding::apply
//! ```
//!
//! Phases run `Uninitialized -> Running -> Cancelled`. Teardown removes the
//! window listeners, cancels the pending frame and removes every hover
//! listener; it may be called any number of times.

use crate::config::EffectConfig;
use crate::error::{EffectError, Result};
use crate::host::Host;
use crate::hover::HoverMagnifier;
use crate::integrator::SmoothingIntegrator;
use crate::math::Point;
use crate::pointer::PointerSampler;
use crate::render::{CursorClass, RendererBinding, VisualElement};
use crate::scheduler::FrameLoop;
use crate::selector::Selector;
use crate::state::{shared, CursorState, EffectPhase, EffectState, PointerPosition, SharedState};
use std::rc::Rc;
use tracing::{debug, trace};

pub struct CursorEffect {
    config: EffectConfig,
    selector: Selector,
    element: Rc<dyn VisualElement>,
    phase: EffectPhase,
    state: SharedState,
    sampler: Option<PointerSampler>,
    magnifier: Option<HoverMagnifier>,
    frame_loop: Option<FrameLoop>,
}

impl CursorEffect {
    pub fn new(config: EffectConfig, element: Rc<dyn VisualElement>) -> Result<Self> {
        let selector = config.validate()?;
        Ok(CursorEffect {
            config,
            selector,
            element,
            phase: EffectPhase::Uninitialized,
            state: shared(EffectState::at(Point::ZERO)),
            sampler: None,
            magnifier: None,
            frame_loop: None,
        })
    }

    /// Attaches listeners and starts the frame loop
    pub fn mount(&mut self, host: &Host) -> Result<()> {
        match self.phase {
            EffectPhase::Running => return Err(EffectError::AlreadyMounted),
            EffectPhase::Cancelled => return Err(EffectError::TornDown),
            EffectPhase::Uninitialized => {}
        }

        let window = host.window();
        *self.state.borrow_mut() = EffectState::centered(window.viewport());

        if self.config.hide_on_touch && window.is_touch_capable() {
            self.element.set_class(CursorClass::Hidden, true);
        }

        self.sampler = Some(PointerSampler::attach(window, Rc::clone(&self.state)));
        self.magnifier = Some(HoverMagnifier::attach(
            host.page(),
            self.selector.clone(),
            self.config.hover_scale,
            self.config.observe_mutations,
            Rc::clone(&self.state),
            Rc::clone(&self.element),
        ));

        let integrator = SmoothingIntegrator::new(self.config.lerp_factor);
        let binding = RendererBinding::new(Rc::clone(&self.element), self.config.center_offset);
        let state = Rc::clone(&self.state);
        self.frame_loop = Some(FrameLoop::start(host.scheduler(), move |time| {
            let cursor = integrator.step(&mut state.borrow_mut());
            binding.apply(cursor.x, cursor.y, cursor.scale);
            trace!(time, x = cursor.x, y = cursor.y, scale = cursor.scale, "cursor frame");
        }));

        self.phase = EffectPhase::Running;
        debug!(
            lerp_factor = self.config.lerp_factor,
            hover_scale = self.config.hover_scale,
            selector = %self.selector,
            "cursor effect mounted"
        );
        Ok(())
    }

    /// Detaches everything `mount` attached. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        if self.phase == EffectPhase::Cancelled {
            return;
        }
        if let Some(mut sampler) = self.sampler.take() {
            sampler.detach();
        }
        if let Some(frame_loop) = self.frame_loop.take() {
            frame_loop.cancel();
        }
        if let Some(mut magnifier) = self.magnifier.take() {
            magnifier.detach();
        }
        let was_running = self.phase == EffectPhase::Running;
        self.phase = EffectPhase::Cancelled;
        if was_running {
            debug!("cursor effect torn down");
        }
    }

    pub fn phase(&self) -> EffectPhase {
        self.phase
    }

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    pub fn cursor(&self) -> CursorState {
        self.state.borrow().cursor
    }

    pub fn pointer(&self) -> PointerPosition {
        self.state.borrow().pointer
    }

    /// Number of page elements currently registered for magnification
    pub fn hover_target_count(&self) -> usize {
        self.magnifier.as_ref().map_or(0, HoverMagnifier::target_count)
    }

    /// Frames integrated since mount
    pub fn frames(&self) -> u64 {
        self.frame_loop.as_ref().map_or(0, FrameLoop::ticks)
    }
}

impl Drop for CursorEffect {
    fn drop(&mut self) {
        self.teardown();
    }
}
