//! Renderer binding: pushes the cursor state onto a visual element.

use crate::state::DEFAULT_SCALE;
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

/// Half the cursor's diameter
pub const DEFAULT_CENTER_OFFSET: f64 = 18.0;

/// Translate followed by a scale about the element's centre
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: DEFAULT_SCALE,
    };
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "translate3d({:.2}px, {:.2}px, 0) scale({})",
            self.translate_x, self.translate_y, self.scale
        )
    }
}

/// State classes toggled on the cursor element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CursorClass {
    /// Pointer is over a hover target
    Hover,
    /// Cursor suppressed on touch devices
    Hidden,
}

impl CursorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            CursorClass::Hover => "cursor--hover",
            CursorClass::Hidden => "cursor--hidden",
        }
    }
}

/// Something that can be positioned and scaled every frame
pub trait VisualElement {
    fn set_transform(&self, transform: Transform);
    fn set_class(&self, class: CursorClass, enabled: bool);
}

/// Writes centred transforms to one visual element
#[derive(Clone)]
pub struct RendererBinding {
    element: Rc<dyn VisualElement>,
    offset: f64,
}

impl RendererBinding {
    pub fn new(element: Rc<dyn VisualElement>, offset: f64) -> Self {
        RendererBinding { element, offset }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Centres the element on `(x, y)` at the given scale
    pub fn apply(&self, x: f64, y: f64, scale: f64) {
        self.element.set_transform(Transform {
            translate_x: x - self.offset,
            translate_y: y - self.offset,
            scale,
        });
    }
}

/// A cursor element that records what was written to it. Hosts read it back
/// when painting.
#[derive(Debug)]
pub struct CursorElement {
    transform: Cell<Transform>,
    classes: RefCell<BTreeSet<CursorClass>>,
    writes: Cell<u64>,
}

impl CursorElement {
    pub fn new() -> Self {
        CursorElement {
            transform: Cell::new(Transform::IDENTITY),
            classes: RefCell::new(BTreeSet::new()),
            writes: Cell::new(0),
        }
    }

    pub fn transform(&self) -> Transform {
        self.transform.get()
    }

    pub fn has_class(&self, class: CursorClass) -> bool {
        self.classes.borrow().contains(&class)
    }

    pub fn is_hidden(&self) -> bool {
        self.has_class(CursorClass::Hidden)
    }

    /// Number of transforms written so far
    pub fn writes(&self) -> u64 {
        self.writes.get()
    }

    /// Space-separated class list, like a DOM `className`
    pub fn class_name(&self) -> String {
        let mut name = String::from("site-cursor");
        for class in self.classes.borrow().iter() {
            name.push(' ');
            name.push_str(class.as_str());
        }
        name
    }
}

impl Default for CursorElement {
    fn default() -> Self {
        Self::new()
    }
}

impl VisualElement for CursorElement {
    fn set_transform(&self, transform: Transform) {
        self.transform.set(transform);
        self.writes.set(self.writes.get() + 1);
    }

    fn set_class(&self, class: CursorClass, enabled: bool) {
        let mut classes = self.classes.borrow_mut();
        if enabled {
            classes.insert(class);
        } else {
            classes.remove(&class);
        }
    }
}
