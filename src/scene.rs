//! The portfolio page rendered in the terminal: project cards, skill rows and
//! contact buttons laid out in three columns.

use crate::graphics::{CellMetrics, CellRect};
use cursorfx::dom::{Element, Page};
use cursorfx::Preset;

const PROJECTS: [&str; 4] = [
    "E-Commerce Platform",
    "Portfolio Dashboard",
    "Fitness Tracking App",
    "Restaurant Booking System",
];

const SKILLS: [(&str, u8); 4] = [
    ("React & TypeScript", 95),
    ("UI / UX Design", 90),
    ("Creative Development", 88),
    ("Animation & Motion", 85),
];

const CONTACT_BUTTONS: [(&str, &[&str]); 6] = [
    ("Email", &["btn"]),
    ("Copy email", &["btn", "ghost"]),
    ("Call", &["btn"]),
    ("Copy phone", &["btn", "ghost"]),
    ("Email me", &["btn"]),
    ("Download CV", &["btn", "ghost"]),
];

/// Column headings, left to right
pub const HEADINGS: [&str; 3] = ["Projects", "Skills & Expertise", "Contact Me"];

struct Item {
    label: String,
    classes: Vec<&'static str>,
}

/// Static page content in insertion order
fn page_items() -> Vec<Item> {
    let mut items = Vec::new();
    for title in PROJECTS {
        items.push(Item {
            label: title.to_string(),
            classes: vec!["projects-box"],
        });
        items.push(Item {
            label: "View Project".to_string(),
            classes: vec!["view-project-btn"],
        });
    }
    for (name, level) in SKILLS {
        items.push(Item {
            label: format!("{name}  {level}%"),
            classes: vec!["skill-row"],
        });
    }
    for (label, classes) in CONTACT_BUTTONS {
        items.push(Item {
            label: label.to_string(),
            classes: classes.to_vec(),
        });
    }
    items.push(Item {
        label: "Github - code samples & security projects".to_string(),
        classes: vec!["social-card"],
    });
    items.push(Item {
        label: "Open".to_string(),
        classes: vec!["btn", "ghost"],
    });
    items
}

fn column_width(cols: u16) -> u16 {
    (cols / 3).max(12)
}

/// Left edge of one of the three page columns
pub fn column_left(cols: u16, column: u16) -> u16 {
    column * column_width(cols) + 2
}

/// Cell rectangles for the static items, matching `page_items` order
fn layout(cols: u16) -> Vec<CellRect> {
    let inner = column_width(cols).saturating_sub(4);
    let left = |column: u16| column_left(cols, column);
    let top = 3;

    let mut rects = Vec::new();
    for i in 0..PROJECTS.len() as u16 {
        let row = top + i * 5;
        rects.push(CellRect::new(left(0), row, inner, 4));
        rects.push(CellRect::new(left(0) + 2, row + 2, 14.min(inner.saturating_sub(4)), 1));
    }
    for i in 0..SKILLS.len() as u16 {
        rects.push(CellRect::new(left(1), top + i * 4, inner, 3));
    }
    for i in 0..CONTACT_BUTTONS.len() as u16 {
        let half = inner / 2;
        let col = left(2) + (i % 2) * half;
        rects.push(CellRect::new(col, top + (i / 2) * 2, half.saturating_sub(1), 1));
    }
    let social_row = top + 7;
    rects.push(CellRect::new(left(2), social_row, inner, 4));
    rects.push(CellRect::new(left(2) + 2, social_row + 2, 8, 1));
    rects
}

/// The page elements making up the terminal portfolio
pub struct Scene {
    page: Page,
    metrics: CellMetrics,
    preset: Preset,
    items: Vec<Element>,
    dynamic: Vec<Element>,
}

impl Scene {
    pub fn build(page: &Page, metrics: CellMetrics, preset: Preset, cols: u16) -> Self {
        let items = page_items()
            .into_iter()
            .zip(layout(cols))
            .map(|(item, rect)| page.insert(item.label, &item.classes, metrics.to_pixels(rect)))
            .collect();
        Scene {
            page: page.clone(),
            metrics,
            preset,
            items,
            dynamic: Vec::new(),
        }
    }

    pub fn relayout(&mut self, cols: u16, rows: u16) {
        for (element, rect) in self.items.iter().zip(layout(cols)) {
            element.set_bounds(self.metrics.to_pixels(rect));
        }
        for (i, element) in self.dynamic.iter().enumerate() {
            element.set_bounds(self.metrics.to_pixels(dynamic_rect(i, cols, rows)));
        }
    }

    /// Adds a target carrying the preset's primary hover class along the
    /// bottom of the screen
    pub fn add_dynamic(&mut self, cols: u16, rows: u16) -> Element {
        let class = match self.preset {
            Preset::Projects => "projects-box",
            Preset::Skills => "skill-row",
            Preset::Contact => "btn",
        };
        let index = self.dynamic.len();
        let element = self.page.insert(
            format!("New item {}", index + 1),
            &[class, "dynamic"],
            self.metrics.to_pixels(dynamic_rect(index, cols, rows)),
        );
        self.dynamic.push(element.clone());
        element
    }

    pub fn remove_dynamic(&mut self) -> Option<Element> {
        let element = self.dynamic.pop()?;
        self.page.remove(element.id())
    }

    pub fn dynamic_count(&self) -> usize {
        self.dynamic.len()
    }

    pub fn cell_rect(&self, element: &Element) -> CellRect {
        self.metrics.to_cells(element.bounds())
    }
}

fn dynamic_rect(index: usize, cols: u16, rows: u16) -> CellRect {
    let width = 18;
    let per_row = (cols / (width + 2)).max(1) as usize;
    let col = (index % per_row) as u16 * (width + 2) + 2;
    let row = rows.saturating_sub(4 + (index / per_row) as u16 * 4);
    CellRect::new(col, row, width, 3)
}
