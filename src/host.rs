use crate::dom::{Page, Window};
use crate::events::Event;
use crate::math::{Point, Size};
use crate::scheduler::{FrameClock, FrameScheduler};
use std::rc::Rc;

/// Everything a cursor effect mounts onto: the window, the page and the
/// frame clock. Input is routed the way a browser does it: window listeners
/// first, then hover transitions on the page.
#[derive(Debug, Clone)]
pub struct Host {
    window: Window,
    page: Page,
    clock: Rc<FrameClock>,
}

impl Host {
    pub fn new(viewport: Size) -> Self {
        Host {
            window: Window::new(viewport),
            page: Page::new(),
            clock: Rc::new(FrameClock::new()),
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn scheduler(&self) -> Rc<dyn FrameScheduler> {
        self.clock.clone()
    }

    pub fn pointer_move(&self, p: Point) {
        self.window.dispatch(&Event::PointerMove(p));
        self.page.update_hover(p);
    }

    pub fn touch_move(&self, touches: Vec<Point>) {
        let primary = touches.first().copied();
        self.window.dispatch(&Event::TouchMove(touches));
        if let Some(p) = primary {
            self.page.update_hover(p);
        }
    }

    pub fn run_frame(&self, frame_time_nanos: u64) -> usize {
        self.clock.run_frame(frame_time_nanos)
    }

    /// Window plus element listeners
    pub fn listener_count(&self) -> usize {
        self.window.listener_count() + self.page.listener_count()
    }

    pub fn pending_frames(&self) -> usize {
        self.clock.pending_count()
    }
}
