use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use cursorfx::math::{point_in_circle, Point, Rect};
use cursorfx::Transform;
use std::io::{self, Write};

/// Pixel size of one terminal cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    pub width: f64,
    pub height: f64,
}

impl CellMetrics {
    /// Centre of a cell in pixels
    pub fn cell_center(&self, col: u16, row: u16) -> Point {
        Point::new(
            (col as f64 + 0.5) * self.width,
            (row as f64 + 0.5) * self.height,
        )
    }

    pub fn to_pixels(&self, rect: CellRect) -> Rect {
        Rect::new(
            rect.col as f64 * self.width,
            rect.row as f64 * self.height,
            rect.width as f64 * self.width,
            rect.height as f64 * self.height,
        )
    }

    pub fn to_cells(&self, rect: Rect) -> CellRect {
        CellRect {
            col: (rect.x / self.width).round() as u16,
            row: (rect.y / self.height).round() as u16,
            width: (rect.width / self.width).round() as u16,
            height: (rect.height / self.height).round() as u16,
        }
    }
}

/// Rectangle in terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellRect {
    pub col: u16,
    pub row: u16,
    pub width: u16,
    pub height: u16,
}

impl CellRect {
    pub const fn new(col: u16, row: u16, width: u16, height: u16) -> Self {
        CellRect {
            col,
            row,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::Reset,
        bg: Color::Reset,
    };
}

/// A grid of styled cells, flushed to the terminal once per frame
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Canvas {
            width,
            height,
            cells: vec![Cell::BLANK; width * height],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![Cell::BLANK; width * height];
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x])
    }

    /// Out-of-bounds writes are dropped
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    pub fn put_str(&mut self, x: usize, y: usize, text: &str, fg: Color) {
        for (i, ch) in text.chars().enumerate() {
            let bg = self.get(x + i, y).map_or(Color::Reset, |c| c.bg);
            self.set(x + i, y, Cell { ch, fg, bg });
        }
    }

    /// Writes the whole grid, emitting colour changes only where they happen
    pub fn flush(&self, out: &mut impl Write) -> io::Result<()> {
        let mut fg = Color::Reset;
        let mut bg = Color::Reset;
        queue!(out, ResetColor)?;
        for y in 0..self.height {
            queue!(out, MoveTo(0, y as u16))?;
            for cell in &self.cells[y * self.width..(y + 1) * self.width] {
                if cell.fg != fg {
                    fg = cell.fg;
                    queue!(out, SetForegroundColor(fg))?;
                }
                if cell.bg != bg {
                    bg = cell.bg;
                    queue!(out, SetBackgroundColor(bg))?;
                }
                queue!(out, Print(cell.ch))?;
            }
        }
        queue!(out, ResetColor)?;
        out.flush()
    }
}

/// Draws a box outline with a label on its first inner row
pub fn draw_box(canvas: &mut Canvas, rect: CellRect, label: &str, fg: Color, bg: Color) {
    if rect.width == 0 || rect.height == 0 {
        return;
    }
    let (x0, y0) = (rect.col as usize, rect.row as usize);
    let (x1, y1) = (x0 + rect.width as usize - 1, y0 + rect.height as usize - 1);

    for y in y0..=y1 {
        for x in x0..=x1 {
            let ch = match (x == x0, x == x1, y == y0, y == y1) {
                _ if rect.height == 1 => {
                    if x == x0 {
                        '['
                    } else if x == x1 {
                        ']'
                    } else {
                        ' '
                    }
                }
                (true, _, true, _) => '┌',
                (_, true, true, _) => '┐',
                (true, _, _, true) => '└',
                (_, true, _, true) => '┘',
                (_, _, true, _) | (_, _, _, true) => '─',
                (true, _, _, _) | (_, true, _, _) => '│',
                _ => ' ',
            };
            canvas.set(x, y, Cell { ch, fg, bg });
        }
    }

    let label_row = if rect.height >= 3 { y0 + 1 } else { y0 };
    let room = (rect.width as usize).saturating_sub(2);
    let label: String = label.chars().take(room).collect();
    for (i, ch) in label.chars().enumerate() {
        canvas.set(x0 + 1 + i, label_row, Cell { ch, fg, bg });
    }
}

/// Rasterises the cursor as a disk of radius `offset * scale` centred on the
/// translated element's centre. Cells are sampled at their centres.
pub fn draw_cursor(
    canvas: &mut Canvas,
    transform: Transform,
    offset: f64,
    metrics: CellMetrics,
    color: Color,
) {
    let center = [
        transform.translate_x + offset,
        transform.translate_y + offset,
    ];
    // at least half a cell so the cursor never vanishes
    let radius = (offset * transform.scale).max(metrics.width.min(metrics.height) / 2.0);

    // Compute bounding box of the disk in cells
    let min_x = ((center[0] - radius) / metrics.width).floor().max(0.0) as usize;
    let max_x = ((center[0] + radius) / metrics.width)
        .ceil()
        .min(canvas.width() as f64 - 1.0);
    let min_y = ((center[1] - radius) / metrics.height).floor().max(0.0) as usize;
    let max_y = ((center[1] + radius) / metrics.height)
        .ceil()
        .min(canvas.height() as f64 - 1.0);
    if max_x < 0.0 || max_y < 0.0 {
        return;
    }
    let (max_x, max_y) = (max_x as usize, max_y as usize);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = [
                (x as f64 + 0.5) * metrics.width,
                (y as f64 + 0.5) * metrics.height,
            ];
            if point_in_circle(p, center, radius) {
                let bg = canvas.get(x, y).map_or(Color::Reset, |c| c.bg);
                canvas.set(x, y, Cell { ch: '█', fg: color, bg });
            }
        }
    }
}
