//! Listener registration and dispatch.
//!
//! Listeners are reference-counted closures. Removal matches on the identity
//! of the closure, so a caller has to hand back the exact `Listener` it
//! registered; an equivalent freshly built closure removes nothing.

use crate::math::Point;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Input events delivered to windows and elements
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Mouse (or pen) moved to a viewport coordinate
    PointerMove(Point),
    /// Touch points moved; the first entry is the primary touch
    TouchMove(Vec<Point>),
    /// Pointer entered an element's bounds
    PointerEnter(Point),
    /// Pointer left an element's bounds
    PointerLeave(Point),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerMove,
    TouchMove,
    PointerEnter,
    PointerLeave,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::PointerMove(_) => EventKind::PointerMove,
            Event::TouchMove(_) => EventKind::TouchMove,
            Event::PointerEnter(_) => EventKind::PointerEnter,
            Event::PointerLeave(_) => EventKind::PointerLeave,
        }
    }
}

pub type Listener = Rc<dyn Fn(&Event)>;

/// Wraps a closure as a listener
pub fn listener(f: impl Fn(&Event) + 'static) -> Listener {
    Rc::new(f)
}

fn same_listener(a: &Listener, b: &Listener) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// A set of `(kind, listener)` registrations
#[derive(Default)]
pub struct EventTarget {
    listeners: RefCell<Vec<(EventKind, Listener)>>,
}

impl EventTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` for `kind`. Registering the same listener for the
    /// same kind twice is a no-op and returns `false`.
    pub fn add_listener(&self, kind: EventKind, listener: Listener) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        if listeners
            .iter()
            .any(|(k, l)| *k == kind && same_listener(l, &listener))
        {
            return false;
        }
        listeners.push((kind, listener));
        true
    }

    /// Removes the registration of this exact listener for `kind`
    pub fn remove_listener(&self, kind: EventKind, listener: &Listener) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(k, l)| !(*k == kind && same_listener(l, listener)));
        listeners.len() != before
    }

    /// Invokes every listener registered for the event's kind and returns how
    /// many ran. Listeners may add or remove registrations while running.
    pub fn dispatch(&self, event: &Event) -> usize {
        let kind = event.kind();
        let snapshot: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for l in &snapshot {
            l(event);
        }
        snapshot.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn listener_count_for(&self, kind: EventKind) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|(k, _)| *k == kind)
            .count()
    }
}

impl fmt::Debug for EventTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventTarget")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn dispatch_only_reaches_matching_kind() {
        let target = EventTarget::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        target.add_listener(EventKind::PointerMove, listener(move |_| h.set(h.get() + 1)));

        assert_eq!(target.dispatch(&Event::PointerMove(Point::ZERO)), 1);
        assert_eq!(target.dispatch(&Event::PointerEnter(Point::ZERO)), 0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn removal_requires_the_registered_reference() {
        let target = EventTarget::new();
        let registered = listener(|_| {});
        target.add_listener(EventKind::PointerEnter, Rc::clone(&registered));

        // A look-alike closure is a different listener
        let lookalike = listener(|_| {});
        assert!(!target.remove_listener(EventKind::PointerEnter, &lookalike));
        assert_eq!(target.listener_count(), 1);

        assert!(target.remove_listener(EventKind::PointerEnter, &registered));
        assert_eq!(target.listener_count(), 0);
    }

    #[test]
    fn duplicate_registration_is_ignored() {
        let target = EventTarget::new();
        let l = listener(|_| {});
        assert!(target.add_listener(EventKind::TouchMove, Rc::clone(&l)));
        assert!(!target.add_listener(EventKind::TouchMove, Rc::clone(&l)));
        assert!(target.add_listener(EventKind::PointerMove, l));
        assert_eq!(target.listener_count(), 2);
        assert_eq!(target.listener_count_for(EventKind::TouchMove), 1);
    }

    #[test]
    fn listener_can_remove_itself_during_dispatch() {
        let target = Rc::new(EventTarget::new());
        let slot: Rc<RefCell<Option<Listener>>> = Rc::new(RefCell::new(None));
        let (t, s) = (Rc::clone(&target), Rc::clone(&slot));
        let l = listener(move |_| {
            if let Some(me) = s.borrow().as_ref() {
                t.remove_listener(EventKind::PointerLeave, me);
            }
        });
        *slot.borrow_mut() = Some(Rc::clone(&l));
        target.add_listener(EventKind::PointerLeave, l);

        assert_eq!(target.dispatch(&Event::PointerLeave(Point::ZERO)), 1);
        assert_eq!(target.listener_count(), 0);
        slot.borrow_mut().take();
    }
}
