use crate::graphics::{draw_box, draw_cursor, Canvas, CellMetrics};
use crate::scene::{column_left, Scene, HEADINGS};
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};
use crossterm::style::Color;
use cursorfx::error::Result;
use cursorfx::math::Size;
use cursorfx::render::CursorClass;
use cursorfx::{CursorEffect, CursorElement, EffectConfig, Host, Preset};
use std::io::{self, Write};
use std::rc::Rc;
use std::time::Instant;
use tracing::{debug, info};

/// What the run loop should do after an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// Portfolio page with the cursor effect mounted on it
pub struct PortfolioWidget {
    host: Host,
    effect: CursorEffect,
    cursor: Rc<CursorElement>,
    scene: Scene,
    canvas: Canvas,
    metrics: CellMetrics,
    preset: Preset,
    cols: u16,
    rows: u16,
    /// Show the debug overlay
    debug: bool,
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
    started: Instant,
}

impl PortfolioWidget {
    /// Lays out the page, then mounts the effect so the initial targets are
    /// registered at mount time
    pub fn new(
        config: EffectConfig,
        preset: Preset,
        metrics: CellMetrics,
        (cols, rows): (u16, u16),
        touch: bool,
    ) -> Result<Self> {
        let host = Host::new(viewport(metrics, cols, rows));
        host.window().set_touch_capable(touch);
        let scene = Scene::build(host.page(), metrics, preset, cols);

        let cursor = Rc::new(CursorElement::new());
        let mut effect = CursorEffect::new(config, cursor.clone())?;
        effect.mount(&host)?;

        Ok(PortfolioWidget {
            host,
            effect,
            cursor,
            scene,
            canvas: Canvas::new(cols as usize, rows as usize),
            metrics,
            preset,
            cols,
            rows,
            debug: false,
            frames_since_last_update: 0,
            last_fps_calculation: Instant::now(),
            fps: 0.0,
            started: Instant::now(),
        })
    }

    pub fn event(&mut self, event: &Event) -> Action {
        match event {
            Event::Mouse(MouseEvent { kind, column, row, .. }) => {
                let p = self.metrics.cell_center(*column, *row);
                match kind {
                    MouseEventKind::Drag(_) if self.host.window().is_touch_capable() => {
                        self.host.touch_move(vec![p]);
                    }
                    MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                        self.host.pointer_move(p);
                    }
                    _ => {}
                }
            }
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Action::Quit;
                }
                KeyCode::Char('d') | KeyCode::Char('D') => self.debug = !self.debug,
                KeyCode::Char('a') => {
                    let element = self.scene.add_dynamic(self.cols, self.rows);
                    debug!(element = %element.id(), "dynamic target added");
                }
                KeyCode::Char('x') => {
                    if let Some(element) = self.scene.remove_dynamic() {
                        debug!(element = %element.id(), "dynamic target removed");
                    }
                }
                _ => {}
            },
            Event::Resize(cols, rows) => self.resize(*cols, *rows),
            _ => {}
        }
        Action::Continue
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.canvas.resize(cols as usize, rows as usize);
        self.scene.relayout(cols, rows);
        self.host.window().set_viewport(viewport(self.metrics, cols, rows));
        debug!(cols, rows, "terminal resized");
    }

    /// Runs one host frame, returning the number of callbacks it ran
    pub fn frame(&mut self) -> usize {
        let nanos = self.started.elapsed().as_nanos() as u64;
        self.host.run_frame(nanos)
    }

    pub fn paint(&mut self, out: &mut impl Write) -> io::Result<()> {
        // Update FPS calculation
        self.frames_since_last_update += 1;
        let now = Instant::now();
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }

        self.canvas.clear();
        for (column, heading) in HEADINGS.iter().enumerate() {
            let x = column_left(self.cols, column as u16) as usize;
            self.canvas.put_str(x, 1, heading, Color::White);
        }

        let hovered = self.host.page().hovered();
        for element in self.host.page().elements() {
            let fg = if hovered.contains(&element.id()) {
                Color::Yellow
            } else {
                Color::Grey
            };
            let rect = self.scene.cell_rect(&element);
            draw_box(&mut self.canvas, rect, element.label(), fg, Color::Reset);
        }

        let footer = "q quit  d debug  a add target  x remove target";
        let last_row = (self.rows as usize).saturating_sub(1);
        self.canvas.put_str(1, last_row, footer, Color::DarkGrey);

        if self.debug {
            self.paint_debug();
        }

        if !self.cursor.is_hidden() {
            let color = if self.cursor.has_class(CursorClass::Hover) {
                Color::Magenta
            } else {
                Color::Cyan
            };
            draw_cursor(
                &mut self.canvas,
                self.cursor.transform(),
                self.effect.config().center_offset,
                self.metrics,
                color,
            );
        }

        self.canvas.flush(out)
    }

    fn paint_debug(&mut self) {
        let pointer = self.effect.pointer();
        let cursor = self.effect.cursor();
        let lines = [
            format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            format!("Preset: {}", self.preset.title()),
            format!("FPS: {:.2}", self.fps),
            format!("Pointer: ({:.1}, {:.1})", pointer.x, pointer.y),
            format!("Cursor: ({:.1}, {:.1})", cursor.x, cursor.y),
            format!("Scale: {:.2}", cursor.scale),
            format!("Transform: {}", self.cursor.transform()),
            format!("Class: {}", self.cursor.class_name()),
            format!(
                "Listeners: {}  Observers: {}  Pending frames: {}",
                self.host.listener_count(),
                self.host.page().observer_count(),
                self.host.pending_frames()
            ),
            format!(
                "Targets: {}  Dynamic: {}",
                self.effect.hover_target_count(),
                self.scene.dynamic_count()
            ),
        ];
        let top = (self.rows as usize).saturating_sub(lines.len() + 2);
        for (i, line) in lines.iter().enumerate() {
            self.canvas.put_str(1, top + i, line, Color::Green);
        }
    }

    /// Tears the effect down and reports what is left attached to the host
    pub fn shutdown(&mut self) {
        self.effect.teardown();
        info!(
            frames = self.host.clock().frame_count(),
            listeners = self.host.listener_count(),
            pending = self.host.pending_frames(),
            "cursor effect stopped"
        );
    }
}

fn viewport(metrics: CellMetrics, cols: u16, rows: u16) -> Size {
    Size::new(cols as f64 * metrics.width, rows as f64 * metrics.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    const METRICS: CellMetrics = CellMetrics {
        width: 8.0,
        height: 16.0,
    };

    fn widget(preset: Preset) -> PortfolioWidget {
        PortfolioWidget::new(preset.config(), preset, METRICS, (120, 40), false).unwrap()
    }

    fn mouse_move(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Moved,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn hovering_a_card_magnifies_the_cursor() {
        let mut widget = widget(Preset::Projects);

        // inside the first project card, above its button
        widget.event(&mouse_move(20, 4));
        widget.frame();
        assert_eq!(widget.cursor.transform().scale, 1.8);
        assert!(widget.cursor.has_class(CursorClass::Hover));

        widget.event(&mouse_move(0, 0));
        widget.frame();
        assert_eq!(widget.cursor.transform().scale, 1.0);
    }

    #[test]
    fn dynamic_targets_follow_the_keys() {
        let mut widget = widget(Preset::Projects);
        let before = widget.effect.hover_target_count();

        widget.event(&key('a'));
        assert_eq!(widget.effect.hover_target_count(), before + 1);
        widget.event(&key('x'));
        assert_eq!(widget.effect.hover_target_count(), before);
    }

    #[test]
    fn quit_keys() {
        let mut widget = widget(Preset::Skills);
        assert_eq!(widget.event(&key('d')), Action::Continue);
        assert!(widget.debug);
        assert_eq!(widget.event(&key('q')), Action::Quit);
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(widget.event(&ctrl_c), Action::Quit);
    }

    #[test]
    fn resize_updates_the_viewport() {
        let mut widget = widget(Preset::Contact);
        widget.event(&Event::Resize(100, 30));
        assert_eq!(widget.host.window().viewport(), Size::new(800.0, 480.0));
        assert_eq!(widget.canvas.width(), 100);
    }

    #[test]
    fn paint_draws_the_cursor_and_overlay() {
        let mut widget = widget(Preset::Projects);
        widget.event(&key('d'));
        widget.frame();

        let mut out = Vec::new();
        widget.paint(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains('█'));
        assert!(text.contains("Pending frames: 1"));
    }

    #[test]
    fn touch_screens_hide_the_cursor() {
        let preset = Preset::Projects;
        let widget =
            PortfolioWidget::new(preset.config(), preset, METRICS, (120, 40), true).unwrap();
        assert!(widget.cursor.is_hidden());
    }

    #[test]
    fn shutdown_releases_the_host() {
        let mut widget = widget(Preset::Skills);
        widget.shutdown();
        assert_eq!(widget.host.listener_count(), 0);
        assert_eq!(widget.host.pending_frames(), 0);
    }
}
