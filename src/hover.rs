//! Hover magnification.
//!
//! Every page element matching the selector gets an enter and a leave
//! listener. The listeners are kept in the registration that created them and
//! exactly those references are removed again on detach. Removed elements
//! are always released, and a hovered one counts as left. With mutation
//! observation on, elements inserted after attach are registered too.

use crate::dom::{Element, ElementId, MutationRecord, ObserverId, Page};
use crate::events::{listener, EventKind, Listener};
use crate::render::{CursorClass, VisualElement};
use crate::selector::Selector;
use crate::state::{SharedState, DEFAULT_SCALE};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, trace};

/// Cursor scale while over a hover target
pub const DEFAULT_HOVER_SCALE: f64 = 1.8;

pub struct HoverMagnifier {
    page: Page,
    inner: Rc<MagnifierInner>,
    observer: Option<ObserverId>,
    attached: bool,
}

struct MagnifierInner {
    selector: Selector,
    register_inserted: bool,
    hover_scale: f64,
    state: SharedState,
    cursor: Rc<dyn VisualElement>,
    registrations: RefCell<Vec<HoverRegistration>>,
    hovered: RefCell<Vec<ElementId>>,
}

struct HoverRegistration {
    target: Element,
    on_enter: Listener,
    on_leave: Listener,
}

impl HoverMagnifier {
    pub fn attach(
        page: &Page,
        selector: Selector,
        hover_scale: f64,
        observe_mutations: bool,
        state: SharedState,
        cursor: Rc<dyn VisualElement>,
    ) -> Self {
        let inner = Rc::new(MagnifierInner {
            selector,
            register_inserted: observe_mutations,
            hover_scale,
            state,
            cursor,
            registrations: RefCell::new(Vec::new()),
            hovered: RefCell::new(Vec::new()),
        });

        for target in page.query_selector_all(&inner.selector) {
            MagnifierInner::register(&inner, &target);
        }

        let weak: Weak<MagnifierInner> = Rc::downgrade(&inner);
        let observer = page.observe(move |record| {
            if let Some(inner) = weak.upgrade() {
                MagnifierInner::on_mutation(&inner, record);
            }
        });

        debug!(
            selector = %inner.selector,
            targets = inner.registrations.borrow().len(),
            observing = observe_mutations,
            "hover magnifier attached"
        );

        HoverMagnifier {
            page: page.clone(),
            inner,
            observer: Some(observer),
            attached: true,
        }
    }

    /// Removes every listener this magnifier registered and stops observing
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        if let Some(id) = self.observer.take() {
            self.page.disconnect(id);
        }
        let registrations = std::mem::take(&mut *self.inner.registrations.borrow_mut());
        for registration in &registrations {
            registration.release();
        }
        let was_hovering = !std::mem::take(&mut *self.inner.hovered.borrow_mut()).is_empty();
        if was_hovering {
            self.inner.reset_scale();
        }
        self.attached = false;
        debug!(released = registrations.len(), "hover magnifier detached");
    }

    pub fn target_count(&self) -> usize {
        self.inner.registrations.borrow().len()
    }

    pub fn is_hovering(&self) -> bool {
        !self.inner.hovered.borrow().is_empty()
    }

    /// Whether elements inserted after attach become targets
    pub fn is_observing(&self) -> bool {
        self.inner.register_inserted
    }

    pub fn hover_scale(&self) -> f64 {
        self.inner.hover_scale
    }
}

impl Drop for HoverMagnifier {
    fn drop(&mut self) {
        self.detach();
    }
}

impl HoverRegistration {
    fn release(&self) {
        self.target.remove_listener(EventKind::PointerEnter, &self.on_enter);
        self.target.remove_listener(EventKind::PointerLeave, &self.on_leave);
    }
}

impl MagnifierInner {
    fn register(this: &Rc<Self>, target: &Element) {
        let id = target.id();
        if this
            .registrations
            .borrow()
            .iter()
            .any(|r| r.target.id() == id)
        {
            return;
        }

        let weak = Rc::downgrade(this);
        let on_enter = listener(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.enter(id);
            }
        });
        let weak = Rc::downgrade(this);
        let on_leave = listener(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.leave(id);
            }
        });

        target.add_listener(EventKind::PointerEnter, Rc::clone(&on_enter));
        target.add_listener(EventKind::PointerLeave, Rc::clone(&on_leave));
        this.registrations.borrow_mut().push(HoverRegistration {
            target: target.clone(),
            on_enter,
            on_leave,
        });
        trace!(element = %id, label = target.label(), "hover target registered");
    }

    fn unregister(&self, id: ElementId) {
        let registration = {
            let mut registrations = self.registrations.borrow_mut();
            let Some(index) = registrations.iter().position(|r| r.target.id() == id) else {
                return;
            };
            registrations.remove(index)
        };
        registration.release();
        trace!(element = %id, "hover target released");
        // a removed target gets no leave event from the page
        self.leave(id);
    }

    fn on_mutation(this: &Rc<Self>, record: &MutationRecord) {
        for removed in &record.removed {
            this.unregister(removed.id());
        }
        if !this.register_inserted {
            return;
        }
        for added in &record.added {
            if this.selector.matches(added.classes()) {
                MagnifierInner::register(this, added);
            }
        }
    }

    fn enter(&self, id: ElementId) {
        {
            let mut hovered = self.hovered.borrow_mut();
            if !hovered.contains(&id) {
                hovered.push(id);
            }
        }
        self.state.borrow_mut().cursor.scale = self.hover_scale;
        self.cursor.set_class(CursorClass::Hover, true);
    }

    fn leave(&self, id: ElementId) {
        let now_empty = {
            let mut hovered = self.hovered.borrow_mut();
            let before = hovered.len();
            hovered.retain(|h| *h != id);
            if hovered.len() == before {
                return;
            }
            hovered.is_empty()
        };
        if now_empty {
            self.reset_scale();
        }
    }

    fn reset_scale(&self) {
        self.state.borrow_mut().cursor.scale = DEFAULT_SCALE;
        self.cursor.set_class(CursorClass::Hover, false);
    }
}
