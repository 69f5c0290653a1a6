//! Pointer sampling: window-level move listeners that overwrite the effect's
//! raw pointer position.

use crate::dom::Window;
use crate::events::{listener, Event, EventKind, Listener};
use crate::math::Point;
use crate::state::{EffectState, SharedState};
use std::rc::Rc;
use tracing::debug;

/// Primary coordinate of a pointer event: the mouse position, or the first
/// touch point. Touch events with no points, and non-move events, have none.
pub fn primary_coordinate(event: &Event) -> Option<Point> {
    match event {
        Event::PointerMove(p) => Some(*p),
        Event::TouchMove(points) => points.first().copied(),
        Event::PointerEnter(_) | Event::PointerLeave(_) => None,
    }
}

/// Latches the event's primary coordinate into `state`
pub fn sample(state: &mut EffectState, event: &Event) -> bool {
    match primary_coordinate(event) {
        Some(p) => {
            state.pointer.x = p.x;
            state.pointer.y = p.y;
            true
        }
        None => false,
    }
}

/// Owns the window listener that feeds pointer samples into one effect
pub struct PointerSampler {
    window: Window,
    on_move: Listener,
    attached: bool,
}

impl PointerSampler {
    /// The same handler is registered for mouse and touch movement
    pub fn attach(window: &Window, state: SharedState) -> Self {
        let on_move = listener(move |event| {
            sample(&mut state.borrow_mut(), event);
        });
        window.add_listener(EventKind::PointerMove, Rc::clone(&on_move));
        window.add_listener(EventKind::TouchMove, Rc::clone(&on_move));
        debug!("pointer sampler attached");

        PointerSampler {
            window: window.clone(),
            on_move,
            attached: true,
        }
    }

    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.window.remove_listener(EventKind::PointerMove, &self.on_move);
        self.window.remove_listener(EventKind::TouchMove, &self.on_move);
        self.attached = false;
        debug!("pointer sampler detached");
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

impl Drop for PointerSampler {
    fn drop(&mut self) {
        self.detach();
    }
}
