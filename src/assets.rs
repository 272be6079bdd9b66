//! Built-in visual assets: the logo bitmap and the box sprite.
//!
//! Assets are defined on a virtual pixel grid where one terminal cell is
//! `CELL_WIDTH` x `CELL_HEIGHT` pixels. Art rows are given one character per
//! cell; a space means "transparent".

use std::rc::Rc;

use crate::types::{Color, NamedColor, Style};

/// Pixel width of one terminal cell.
pub const CELL_WIDTH: i32 = 8;
/// Pixel height of one terminal cell.
pub const CELL_HEIGHT: i32 = 16;

const LOGO_ART: [&str; 4] = [
    "╭──────────────────────────╮",
    "│  l  i  n  a  r  o        │",
    "│                          │",
    "╰──────────────────────────╯",
];

const BOX_WIDTH: i32 = 24;
const BOX_HEIGHT: i32 = 16;
const BOX_CHAR: char = '█';

/// A static image made of character art.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    width: i32,
    height: i32,
    rows: Vec<Vec<char>>,
    style: Style,
}

impl Bitmap {
    /// Build a bitmap from art rows. Shorter rows are padded with
    /// transparent cells.
    pub fn from_art(art: &[&str], style: Style) -> Self {
        let rows: Vec<Vec<char>> = art.iter().map(|r| r.chars().collect()).collect();
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        Bitmap {
            width: cols as i32 * CELL_WIDTH,
            height: rows.len() as i32 * CELL_HEIGHT,
            rows,
            style,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    /// The character at bitmap-local pixel (`x`, `y`), or `None` where the
    /// bitmap is transparent or out of range.
    pub fn sample(&self, x: i32, y: i32) -> Option<char> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        let row = self.rows.get((y / CELL_HEIGHT) as usize)?;
        match row.get((x / CELL_WIDTH) as usize) {
            Some(' ') | None => None,
            Some(&c) => Some(c),
        }
    }
}

/// A solid, resizable shape with an intrinsic size.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub intrinsic_width: i32,
    pub intrinsic_height: i32,
    pub ch: char,
    pub style: Style,
}

/// Everything the director needs from the asset provider.
#[derive(Debug, Clone)]
pub struct Assets {
    pub logo: Rc<Bitmap>,
    pub box_sprite: Rc<Sprite>,
    /// Display density scalar applied to layout offsets.
    pub density: f32,
}

impl Assets {
    pub fn builtin(density: f32) -> Self {
        let logo = Bitmap::from_art(
            &LOGO_ART,
            Style {
                fg: Some(Color::Named(NamedColor::White)),
                bold: true,
                ..Default::default()
            },
        );
        let box_sprite = Sprite {
            intrinsic_width: BOX_WIDTH,
            intrinsic_height: BOX_HEIGHT,
            ch: BOX_CHAR,
            style: Style {
                fg: Some(Color::rgb(0x6d, 0xc0, 0x48)),
                ..Default::default()
            },
        };
        Assets {
            logo: Rc::new(logo),
            box_sprite: Rc::new(box_sprite),
            density,
        }
    }
}

impl Default for Assets {
    fn default() -> Self {
        Self::builtin(1.0)
    }
}
