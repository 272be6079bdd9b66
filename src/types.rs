//! Shared boundary types for the logo wallpaper.
//!
//! Geometry lives in pixel space (`Point`, `Bounds`) and is produced by the
//! engine. Cells and colors are what the renderer puts on the terminal.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

/// Pixel rectangle, right/bottom exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Bounds {
    /// Place a `width` x `height` rectangle with its top-left corner at `p`.
    pub fn at(p: Point, width: i32, height: i32) -> Self {
        Bounds {
            left: p.x,
            top: p.y,
            right: p.x + width,
            bottom: p.y + height,
        }
    }
}

// ---------------------------------------------------------------------------
// Style primitives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Color {
    Named(NamedColor),
    Rgb { r: u8, g: u8, b: u8 },
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
    pub dim: bool,
}

impl Style {
    /// Paint `self` over `under`; unset colors fall through.
    pub fn over(&self, under: &Style) -> Style {
        Style {
            fg: self.fg.clone().or_else(|| under.fg.clone()),
            bg: self.bg.clone().or_else(|| under.bg.clone()),
            bold: self.bold,
            dim: self.dim,
        }
    }
}

// ---------------------------------------------------------------------------
// Terminal grid
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            ch: ' ',
            style: Style::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellChange {
    pub x: u16,
    pub y: u16,
    pub cell: Cell,
}
