//! Layout variants: where the logo sits and where each box flies in from.
//!
//! Everything here is a pure function of the screen metrics and the asset
//! sizes, so layouts can be computed and inspected without a draw loop.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::assets::Assets;
use crate::error::LayoutError;
use crate::types::Point;

/// Number of decorative boxes.
pub const BOX_COUNT: usize = 5;

/// Pixels from the logo's left edge to the first box, before density.
pub const BOX_X_OFFSET: f32 = 48.0;
/// Pixels from the logo's top edge to the box row, before density.
pub const BOX_Y_OFFSET: f32 = 36.0;
/// Gutter between boxes, before density.
pub const BOX_GUTTER: f32 = 3.0;

const LOGO_MARGIN_X: f32 = 40.0;
const LOGO_MARGIN_TOP: f32 = 40.0;
const LOGO_MARGIN_BOTTOM: f32 = 80.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Location {
    #[default]
    #[serde(rename = "Center")]
    Center,
    #[serde(rename = "Top-Left")]
    TopLeft,
    #[serde(rename = "Top-Right")]
    TopRight,
    #[serde(rename = "Bottom-Left")]
    BottomLeft,
    #[serde(rename = "Bottom-Right")]
    BottomRight,
}

impl Location {
    pub const ALL: [Location; 5] = [
        Location::Center,
        Location::TopLeft,
        Location::TopRight,
        Location::BottomLeft,
        Location::BottomRight,
    ];

    /// The persisted setting value for this location.
    pub fn name(self) -> &'static str {
        match self {
            Location::Center => "Center",
            Location::TopLeft => "Top-Left",
            Location::TopRight => "Top-Right",
            Location::BottomLeft => "Bottom-Left",
            Location::BottomRight => "Bottom-Right",
        }
    }

    /// The location after this one, wrapping around.
    pub fn next(self) -> Location {
        let i = Self::ALL.iter().position(|l| *l == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Location {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|l| l.name() == s)
            .ok_or_else(|| LayoutError::UnknownLocation(s.to_string()))
    }
}

/// Screen and asset measurements a layout is computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub width: i32,
    pub height: i32,
    pub density: f32,
    pub logo_width: i32,
    pub logo_height: i32,
    pub box_width: i32,
}

impl Metrics {
    /// Metrics for a `width` x `height` screen using the sizes of `assets`.
    pub fn new(width: i32, height: i32, density: f32, assets: &Assets) -> Self {
        Metrics {
            width,
            height,
            density,
            logo_width: assets.logo.width(),
            logo_height: assets.logo.height(),
            box_width: assets.box_sprite.intrinsic_width,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoxPath {
    pub start: Point,
    pub end: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub location: Location,
    pub logo_x: f32,
    pub logo_y: f32,
    /// Left anchor of the box row.
    pub box_x: i32,
    /// Top of the box row.
    pub box_y: i32,
    /// Distance between the left edges of adjacent boxes.
    pub box_spacing: i32,
    pub boxes: [BoxPath; BOX_COUNT],
}

/// Round half up, the way the box anchors have always been rounded.
fn round(v: f32) -> i32 {
    (v + 0.5).floor() as i32
}

pub fn compute(location: Location, m: &Metrics) -> Layout {
    let (logo_x, logo_y) = logo_placement(location, m);
    let box_x = round(logo_x + BOX_X_OFFSET * m.density);
    let box_y = round(logo_y + BOX_Y_OFFSET * m.density);
    let s = m.box_width + round(BOX_GUTTER * m.density);
    let (w, h) = (m.width, m.height);

    let starts: [Point; BOX_COUNT] = match location {
        Location::Center => [
            Point::new(0, 0),
            Point::new(0, h),
            Point::new(box_x + 2 * s, 0),
            Point::new(w, h),
            Point::new(w, 0),
        ],
        Location::TopLeft => [
            Point::new(0, h),
            Point::new(w / 2, h),
            Point::new(w, h),
            Point::new(w, h / 2),
            Point::new(w, box_y),
        ],
        Location::TopRight => [
            Point::new(0, h / 2),
            Point::new(0, h),
            Point::new(w / 2, h),
            Point::new(box_x + 3 * s, h),
            Point::new(0, box_y),
        ],
        Location::BottomLeft => [
            Point::new(box_x, 0),
            Point::new(w / 2, 0),
            Point::new(w, 0),
            Point::new(w, h / 2),
            Point::new(w, box_y),
        ],
        Location::BottomRight => [
            Point::new(0, box_y),
            Point::new(0, h / 2),
            Point::new(0, 0),
            Point::new(w / 2, 0),
            Point::new(box_x + 4 * s, 0),
        ],
    };

    let mut i = 0;
    let boxes = starts.map(|start| {
        let end = Point::new(box_x + i * s, box_y);
        i += 1;
        BoxPath { start, end }
    });

    Layout {
        location,
        logo_x,
        logo_y,
        box_x,
        box_y,
        box_spacing: s,
        boxes,
    }
}

fn logo_placement(location: Location, m: &Metrics) -> (f32, f32) {
    let (w, h) = (m.width as f32, m.height as f32);
    let (lw, lh) = (m.logo_width as f32, m.logo_height as f32);
    let right = w - lw - LOGO_MARGIN_X;
    let bottom = h - lh - LOGO_MARGIN_BOTTOM;
    match location {
        Location::Center => (w / 2.0 - lw / 2.0, h / 2.0 - lh / 2.0),
        Location::TopLeft => (LOGO_MARGIN_X, LOGO_MARGIN_TOP),
        Location::TopRight => (right, LOGO_MARGIN_TOP),
        Location::BottomLeft => (LOGO_MARGIN_X, bottom),
        Location::BottomRight => (right, bottom),
    }
}
