//! Renderer — the terminal rasterizer.
//!
//! `TerminalCanvas` implements [`Canvas`] on a fixed-size cell grid. Draw
//! calls arrive in pixel space; a cell is painted when its center pixel is
//! covered. A grid can report the cells that changed since a previous one, so
//! only those are sent to the terminal.
//!
//! The renderer is pure and stateless apart from the grid itself. It knows
//! nothing about time, animation, or layout.

use crate::assets::{Bitmap, CELL_HEIGHT, CELL_WIDTH, Sprite};
use crate::surface::Canvas;
use crate::types::{Bounds, Cell, CellChange, Color, Style};

pub struct TerminalCanvas {
    cols: u16,
    rows: u16,
    grid: Vec<Vec<Cell>>,
}

impl TerminalCanvas {
    pub fn new(cols: u16, rows: u16) -> Self {
        TerminalCanvas {
            cols,
            rows,
            grid: vec![vec![Cell::default(); cols as usize]; rows as usize],
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Surface size in pixels.
    pub fn pixel_size(&self) -> (i32, i32) {
        (
            self.cols as i32 * CELL_WIDTH,
            self.rows as i32 * CELL_HEIGHT,
        )
    }

    pub fn grid(&self) -> &[Vec<Cell>] {
        &self.grid
    }

    /// Center pixel of cell (`col`, `row`).
    fn cell_center(col: usize, row: usize) -> (i32, i32) {
        (
            col as i32 * CELL_WIDTH + CELL_WIDTH / 2,
            row as i32 * CELL_HEIGHT + CELL_HEIGHT / 2,
        )
    }

    /// Cells whose centers fall inside `bounds`, clipped to the grid.
    fn covered_cells(&self, bounds: Bounds) -> Vec<(usize, usize)> {
        let first_col = div_ceil(bounds.left - CELL_WIDTH / 2, CELL_WIDTH).max(0);
        let end_col = div_ceil(bounds.right - CELL_WIDTH / 2, CELL_WIDTH).min(self.cols as i32);
        let first_row = div_ceil(bounds.top - CELL_HEIGHT / 2, CELL_HEIGHT).max(0);
        let end_row = div_ceil(bounds.bottom - CELL_HEIGHT / 2, CELL_HEIGHT).min(self.rows as i32);
        let mut cells = Vec::new();
        for row in first_row..end_row {
            for col in first_col..end_col {
                cells.push((col as usize, row as usize));
            }
        }
        cells
    }

    /// Cells that differ from `shown`, a grid of the same size.
    pub fn changes_since(&self, shown: &[Vec<Cell>]) -> Vec<CellChange> {
        self.grid
            .iter()
            .zip(shown)
            .enumerate()
            .flat_map(|(y, (row, before))| {
                row.iter()
                    .zip(before)
                    .enumerate()
                    .filter(|(_, (now, then))| now != then)
                    .map(move |(x, (now, _))| CellChange {
                        x: x as u16,
                        y: y as u16,
                        cell: now.clone(),
                    })
            })
            .collect()
    }

    fn paint(&mut self, col: usize, row: usize, ch: char, style: &Style) {
        let cell = &mut self.grid[row][col];
        cell.style = style.over(&cell.style);
        cell.ch = ch;
    }
}

impl Canvas for TerminalCanvas {
    fn draw_color(&mut self, color: &Color) {
        let cell = Cell {
            ch: ' ',
            style: Style {
                bg: Some(color.clone()),
                ..Default::default()
            },
        };
        for row in &mut self.grid {
            row.fill(cell.clone());
        }
    }

    fn draw_bitmap(&mut self, bitmap: &Bitmap, left: f32, top: f32) {
        let (left, top) = (left.floor() as i32, top.floor() as i32);
        let bounds = Bounds {
            left,
            top,
            right: left + bitmap.width(),
            bottom: top + bitmap.height(),
        };
        for (col, row) in self.covered_cells(bounds) {
            let (cx, cy) = Self::cell_center(col, row);
            if let Some(ch) = bitmap.sample(cx - left, cy - top) {
                self.paint(col, row, ch, bitmap.style());
            }
        }
    }

    fn draw_sprite(&mut self, sprite: &Sprite, bounds: Bounds) {
        for (col, row) in self.covered_cells(bounds) {
            self.paint(col, row, sprite.ch, &sprite.style);
        }
    }
}

/// Integer division rounding toward positive infinity.
fn div_ceil(a: i32, b: i32) -> i32 {
    let q = a.div_euclid(b);
    if a.rem_euclid(b) == 0 { q } else { q + 1 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;

    fn sprite() -> Sprite {
        Sprite {
            intrinsic_width: 24,
            intrinsic_height: 16,
            ch: '#',
            style: Style::default(),
        }
    }

    fn painted(canvas: &TerminalCanvas, ch: char) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for (row, cells) in canvas.grid().iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if cell.ch == ch {
                    out.push((col, row));
                }
            }
        }
        out
    }

    #[test]
    fn pixel_size_follows_cell_size() {
        let canvas = TerminalCanvas::new(80, 24);
        assert_eq!(canvas.pixel_size(), (640, 384));
    }

    #[test]
    fn sprite_paints_cells_whose_centers_it_covers() {
        let mut canvas = TerminalCanvas::new(10, 4);
        canvas.draw_sprite(&sprite(), Bounds::at(Point::new(8, 16), 24, 16));
        assert_eq!(painted(&canvas, '#'), vec![(1, 1), (2, 1), (3, 1)]);
    }

    #[test]
    fn sprite_off_screen_is_clipped() {
        let mut canvas = TerminalCanvas::new(10, 4);
        canvas.draw_sprite(&sprite(), Bounds::at(Point::new(-16, -4), 24, 16));
        assert_eq!(painted(&canvas, '#'), vec![(0, 0)]);
        canvas.draw_sprite(&sprite(), Bounds::at(Point::new(80, 64), 24, 16));
        assert_eq!(painted(&canvas, '#'), vec![(0, 0)]);
    }

    #[test]
    fn background_survives_drawing_on_top() {
        let mut canvas = TerminalCanvas::new(4, 2);
        canvas.draw_color(&Color::rgb(5, 5, 5));
        canvas.draw_sprite(&sprite(), Bounds::at(Point::new(0, 0), 24, 16));
        let cell = &canvas.grid()[0][0];
        assert_eq!(cell.ch, '#');
        assert_eq!(cell.style.bg, Some(Color::rgb(5, 5, 5)));
        assert_eq!(canvas.grid()[1][0].ch, ' ');
    }

    #[test]
    fn bitmap_skips_transparent_cells() {
        let mut canvas = TerminalCanvas::new(6, 3);
        let bmp = Bitmap::from_art(&["a b", " c"], Style::default());
        canvas.draw_bitmap(&bmp, 8.0, 16.0);
        assert_eq!(painted(&canvas, 'a'), vec![(1, 1)]);
        assert_eq!(painted(&canvas, 'b'), vec![(3, 1)]);
        assert_eq!(painted(&canvas, 'c'), vec![(2, 2)]);
        assert_eq!(canvas.grid()[1][2].ch, ' ');
    }

    #[test]
    fn changes_since_reports_only_changed_cells() {
        let before = TerminalCanvas::new(4, 2);
        let mut canvas = TerminalCanvas::new(4, 2);
        canvas.draw_sprite(&sprite(), Bounds::at(Point::new(8, 16), 8, 16));
        assert!(canvas.changes_since(canvas.grid()).is_empty());
        let changes = canvas.changes_since(before.grid());
        assert_eq!(changes.len(), 1);
        assert_eq!((changes[0].x, changes[0].y), (1, 1));
        assert_eq!(changes[0].cell.ch, '#');
    }

    #[test]
    fn div_ceil_rounds_up_for_negatives_too() {
        assert_eq!(div_ceil(-12, 8), -1);
        assert_eq!(div_ceil(-16, 8), -2);
        assert_eq!(div_ceil(4, 8), 1);
        assert_eq!(div_ceil(16, 8), 2);
    }
}
