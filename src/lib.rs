//! cursorfx - a pointer-following cursor with hover magnification
//!
//! The effect samples the raw pointer on every input event, eases a
//! displayed cursor toward it once per frame, and scales the cursor up while
//! the pointer is over designated targets. It runs against a small host
//! model (window, page, frame scheduler) so it can be driven by a terminal
//! or by tests that produce pointer events and frames themselves.

pub mod config;
pub mod dom;
pub mod effect;
pub mod error;
pub mod events;
pub mod host;
pub mod hover;
pub mod integrator;
pub mod math;
pub mod pointer;
pub mod render;
pub mod scheduler;
pub mod selector;
pub mod state;

pub use config::{ConfigFile, ConfigOverrides, EffectConfig, Preset};
pub use effect::CursorEffect;
pub use error::{ConfigError, EffectError, SelectorError};
pub use host::Host;
pub use render::{CursorElement, RendererBinding, Transform, VisualElement};
pub use state::{CursorState, EffectPhase, PointerPosition};
