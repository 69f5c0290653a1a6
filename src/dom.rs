//! The host surface the cursor effect attaches to: a window that receives
//! pointer input and a page of positioned elements.

use crate::events::{Event, EventKind, EventTarget, Listener};
use crate::math::{Point, Rect, Size};
use crate::selector::Selector;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to an element on a page. Clones refer to the same element.
#[derive(Clone)]
pub struct Element {
    inner: Rc<ElementInner>,
}

struct ElementInner {
    id: ElementId,
    label: String,
    classes: Vec<String>,
    bounds: Cell<Rect>,
    events: EventTarget,
}

impl Element {
    fn new(id: ElementId, label: String, classes: Vec<String>, bounds: Rect) -> Self {
        Element {
            inner: Rc::new(ElementInner {
                id,
                label,
                classes,
                bounds: Cell::new(bounds),
                events: EventTarget::new(),
            }),
        }
    }

    pub fn id(&self) -> ElementId {
        self.inner.id
    }

    pub fn label(&self) -> &str {
        &self.inner.label
    }

    pub fn classes(&self) -> &[String] {
        &self.inner.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.inner.classes.iter().any(|c| c == class)
    }

    pub fn bounds(&self) -> Rect {
        self.inner.bounds.get()
    }

    pub fn set_bounds(&self, bounds: Rect) {
        self.inner.bounds.set(bounds);
    }

    pub fn add_listener(&self, kind: EventKind, listener: Listener) -> bool {
        self.inner.events.add_listener(kind, listener)
    }

    pub fn remove_listener(&self, kind: EventKind, listener: &Listener) -> bool {
        self.inner.events.remove_listener(kind, listener)
    }

    pub fn dispatch(&self, event: &Event) -> usize {
        self.inner.events.dispatch(event)
    }

    pub fn listener_count(&self) -> usize {
        self.inner.events.listener_count()
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.inner.id)
            .field("label", &self.inner.label)
            .field("classes", &self.inner.classes)
            .field("bounds", &self.inner.bounds.get())
            .finish()
    }
}

/// Elements added to or removed from a page in one mutation
#[derive(Debug, Default)]
pub struct MutationRecord {
    pub added: Vec<Element>,
    pub removed: Vec<Element>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type MutationCallback = Rc<dyn Fn(&MutationRecord)>;

/// An ordered collection of elements. Later elements are painted on top.
#[derive(Clone, Default)]
pub struct Page {
    inner: Rc<PageInner>,
}

#[derive(Default)]
struct PageInner {
    elements: RefCell<Vec<Element>>,
    observers: RefCell<Vec<(ObserverId, MutationCallback)>>,
    hovered: RefCell<Vec<ElementId>>,
    next_id: Cell<u64>,
}

impl PageInner {
    fn next_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an element and notifies mutation observers
    pub fn insert(&self, label: impl Into<String>, classes: &[&str], bounds: Rect) -> Element {
        let id = ElementId(self.inner.next_id());
        let classes = classes.iter().map(|c| c.to_string()).collect();
        let element = Element::new(id, label.into(), classes, bounds);
        self.inner.elements.borrow_mut().push(element.clone());
        self.notify(&MutationRecord {
            added: vec![element.clone()],
            removed: Vec::new(),
        });
        element
    }

    /// Removes an element and notifies mutation observers. A removed element
    /// that was hovered gets no leave event.
    pub fn remove(&self, id: ElementId) -> Option<Element> {
        let removed = {
            let mut elements = self.inner.elements.borrow_mut();
            let index = elements.iter().position(|e| e.id() == id)?;
            elements.remove(index)
        };
        self.inner.hovered.borrow_mut().retain(|h| *h != id);
        self.notify(&MutationRecord {
            added: Vec::new(),
            removed: vec![removed.clone()],
        });
        Some(removed)
    }

    pub fn get(&self, id: ElementId) -> Option<Element> {
        self.inner
            .elements
            .borrow()
            .iter()
            .find(|e| e.id() == id)
            .cloned()
    }

    pub fn elements(&self) -> Vec<Element> {
        self.inner.elements.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.elements.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn query_selector_all(&self, selector: &Selector) -> Vec<Element> {
        self.inner
            .elements
            .borrow()
            .iter()
            .filter(|e| selector.matches(e.classes()))
            .cloned()
            .collect()
    }

    /// Subscribes to insertions and removals
    pub fn observe(&self, callback: impl Fn(&MutationRecord) + 'static) -> ObserverId {
        let id = ObserverId(self.inner.next_id());
        self.inner
            .observers
            .borrow_mut()
            .push((id, Rc::new(callback)));
        id
    }

    pub fn disconnect(&self, id: ObserverId) -> bool {
        let mut observers = self.inner.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|(o, _)| *o != id);
        observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.inner.observers.borrow().len()
    }

    /// Total listeners registered across all elements
    pub fn listener_count(&self) -> usize {
        self.inner
            .elements
            .borrow()
            .iter()
            .map(Element::listener_count)
            .sum()
    }

    /// Elements currently under the pointer, in page order
    pub fn hovered(&self) -> Vec<ElementId> {
        self.inner.hovered.borrow().clone()
    }

    /// Hit-tests every element against `p` and fires leave events on the
    /// elements the pointer left, then enter events on the ones it entered.
    /// Overlapping elements are tracked independently.
    pub fn update_hover(&self, p: Point) {
        let elements = self.elements();
        let previous = self.inner.hovered.borrow().clone();
        let current: Vec<ElementId> = elements
            .iter()
            .filter(|e| e.bounds().contains(p))
            .map(Element::id)
            .collect();
        *self.inner.hovered.borrow_mut() = current.clone();

        for e in elements.iter().rev() {
            if previous.contains(&e.id()) && !current.contains(&e.id()) {
                e.dispatch(&Event::PointerLeave(p));
            }
        }
        for e in &elements {
            if current.contains(&e.id()) && !previous.contains(&e.id()) {
                e.dispatch(&Event::PointerEnter(p));
            }
        }
    }

    fn notify(&self, record: &MutationRecord) {
        let observers: Vec<MutationCallback> = self
            .inner
            .observers
            .borrow()
            .iter()
            .map(|(_, cb)| Rc::clone(cb))
            .collect();
        for cb in observers {
            cb(record);
        }
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("elements", &self.len())
            .field("observers", &self.observer_count())
            .finish()
    }
}

/// The window-level input target
#[derive(Clone)]
pub struct Window {
    inner: Rc<WindowInner>,
}

struct WindowInner {
    events: EventTarget,
    viewport: Cell<Size>,
    touch_capable: Cell<bool>,
}

impl Window {
    pub fn new(viewport: Size) -> Self {
        Window {
            inner: Rc::new(WindowInner {
                events: EventTarget::new(),
                viewport: Cell::new(viewport),
                touch_capable: Cell::new(false),
            }),
        }
    }

    pub fn viewport(&self) -> Size {
        self.inner.viewport.get()
    }

    pub fn set_viewport(&self, viewport: Size) {
        self.inner.viewport.set(viewport);
    }

    pub fn is_touch_capable(&self) -> bool {
        self.inner.touch_capable.get()
    }

    pub fn set_touch_capable(&self, touch: bool) {
        self.inner.touch_capable.set(touch);
    }

    pub fn add_listener(&self, kind: EventKind, listener: Listener) -> bool {
        self.inner.events.add_listener(kind, listener)
    }

    pub fn remove_listener(&self, kind: EventKind, listener: &Listener) -> bool {
        self.inner.events.remove_listener(kind, listener)
    }

    pub fn dispatch(&self, event: &Event) -> usize {
        self.inner.events.dispatch(event)
    }

    pub fn listener_count(&self) -> usize {
        self.inner.events.listener_count()
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("viewport", &self.viewport())
            .field("touch_capable", &self.is_touch_capable())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::listener;

    fn recorder(log: &Rc<RefCell<Vec<String>>>, tag: &str) -> Listener {
        let log = Rc::clone(log);
        let tag = tag.to_string();
        listener(move |event| {
            let kind = match event {
                Event::PointerEnter(_) => "enter",
                Event::PointerLeave(_) => "leave",
                _ => "other",
            };
            log.borrow_mut().push(format!("{kind}:{tag}"));
        })
    }

    #[test]
    fn hover_tracks_overlapping_elements_independently() {
        let page = Page::new();
        let card = page.insert("card", &["projects-box"], Rect::new(0.0, 0.0, 100.0, 100.0));
        let button = page.insert("view", &["view-project-btn"], Rect::new(10.0, 70.0, 50.0, 20.0));

        let log = Rc::new(RefCell::new(Vec::new()));
        for (e, tag) in [(&card, "card"), (&button, "button")] {
            e.add_listener(EventKind::PointerEnter, recorder(&log, tag));
            e.add_listener(EventKind::PointerLeave, recorder(&log, tag));
        }

        page.update_hover(Point::new(50.0, 20.0));
        page.update_hover(Point::new(20.0, 75.0));
        page.update_hover(Point::new(50.0, 20.0));
        page.update_hover(Point::new(500.0, 20.0));

        assert_eq!(
            *log.borrow(),
            vec!["enter:card", "enter:button", "leave:button", "leave:card"]
        );
        assert!(page.hovered().is_empty());
    }

    #[test]
    fn observers_see_insert_and_remove() {
        let page = Page::new();
        let seen = Rc::new(RefCell::new((0, 0)));
        let s = Rc::clone(&seen);
        let id = page.observe(move |record| {
            let mut s = s.borrow_mut();
            s.0 += record.added.len();
            s.1 += record.removed.len();
        });

        let e = page.insert("x", &["btn"], Rect::default());
        assert!(page.remove(e.id()).is_some());
        assert!(page.remove(e.id()).is_none());
        assert_eq!(*seen.borrow(), (1, 1));

        assert!(page.disconnect(id));
        assert!(!page.disconnect(id));
        page.insert("y", &["btn"], Rect::default());
        assert_eq!(*seen.borrow(), (1, 1));
    }

    #[test]
    fn query_filters_by_selector() {
        let page = Page::new();
        page.insert("a", &["skill-row"], Rect::default());
        page.insert("b", &["btn", "ghost"], Rect::default());
        page.insert("c", &["btn"], Rect::default());

        let ghost = Selector::parse(".btn.ghost").unwrap();
        let labels: Vec<String> = page
            .query_selector_all(&ghost)
            .iter()
            .map(|e| e.label().to_string())
            .collect();
        assert_eq!(labels, vec!["b"]);
    }
}
