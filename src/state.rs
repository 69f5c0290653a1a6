use crate::math::{Point, Size};
use std::cell::RefCell;
use std::rc::Rc;

/// Scale of the cursor when nothing is hovered
pub const DEFAULT_SCALE: f64 = 1.0;

/// Latest raw pointer sample, overwritten on every input event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Displayed cursor state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorState {
    /// Eased x coordinate
    pub x: f64,
    /// Eased y coordinate
    pub y: f64,
    /// Scale applied on top of the translation
    pub scale: f64,
}

impl CursorState {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Lifecycle of one mounted cursor effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectPhase {
    Uninitialized,
    Running,
    Cancelled,
}

/// State owned by a single effect instance and shared by its handlers
#[derive(Debug, Clone, PartialEq)]
pub struct EffectState {
    pub pointer: PointerPosition,
    pub cursor: CursorState,
}

impl EffectState {
    /// Pointer and cursor both start at the middle of the viewport
    pub fn centered(viewport: Size) -> Self {
        Self::at(viewport.center())
    }

    pub fn at(p: Point) -> Self {
        EffectState {
            pointer: PointerPosition { x: p.x, y: p.y },
            cursor: CursorState {
                x: p.x,
                y: p.y,
                scale: DEFAULT_SCALE,
            },
        }
    }
}

pub type SharedState = Rc<RefCell<EffectState>>;

pub fn shared(state: EffectState) -> SharedState {
    Rc::new(RefCell::new(state))
}
