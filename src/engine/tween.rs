use std::rc::Rc;

use crate::assets::Sprite;
use crate::types::{Bounds, Point};

/// A sprite that moves from a start point to an end point over a fixed
/// number of frames.
///
/// All positions are computed up front. Each call to
/// [`advance_and_get_bounds`](Self::advance_and_get_bounds) steps one frame
/// forward and then sticks at the end point.
#[derive(Debug, Clone)]
pub struct MotionTween {
    sprite: Rc<Sprite>,
    positions: Vec<Point>,
    /// Index into `positions`; `None` before the first frame.
    cursor: Option<usize>,
}

impl MotionTween {
    /// # Panics
    ///
    /// Panics if `frame_count < 2`.
    pub fn new(sprite: Rc<Sprite>, start: Point, end: Point, frame_count: usize) -> Self {
        assert!(frame_count >= 2, "a tween needs at least two frames");

        let steps = (frame_count - 1) as i32;
        // Truncating per-step increment; the last point absorbs the remainder.
        let x_inc = (end.x - start.x) / steps;
        let y_inc = (end.y - start.y) / steps;
        let mut positions: Vec<Point> = (0..frame_count as i32)
            .map(|i| Point::new(start.x + i * x_inc, start.y + i * y_inc))
            .collect();
        if let Some(last) = positions.last_mut() {
            *last = end;
        }

        MotionTween {
            sprite,
            positions,
            cursor: None,
        }
    }

    /// Step to the next frame (unless already at the end) and return where
    /// the sprite sits now.
    pub fn advance_and_get_bounds(&mut self) -> Bounds {
        let last = self.last_index();
        let next = match self.cursor {
            None => 0,
            Some(i) if i < last => i + 1,
            Some(i) => i,
        };
        self.cursor = Some(next);
        Bounds::at(
            self.positions[next],
            self.sprite.intrinsic_width,
            self.sprite.intrinsic_height,
        )
    }

    pub fn is_done(&self) -> bool {
        self.cursor == Some(self.last_index())
    }

    pub fn restart(&mut self) {
        self.cursor = None;
    }

    /// Raw frame cursor: -1 before the first advance, then `0..frame_count`.
    pub fn current_frame_index(&self) -> isize {
        self.cursor.map_or(-1, |i| i as isize)
    }

    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    pub fn start(&self) -> Point {
        self.positions[0]
    }

    pub fn end(&self) -> Point {
        self.positions[self.last_index()]
    }

    fn last_index(&self) -> usize {
        self.positions.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Style;

    fn sprite() -> Rc<Sprite> {
        Rc::new(Sprite {
            intrinsic_width: 24,
            intrinsic_height: 16,
            ch: '#',
            style: Style::default(),
        })
    }

    #[test]
    fn first_point_is_start_and_last_is_end() {
        let t = MotionTween::new(sprite(), Point::new(0, 2000), Point::new(575, 1004), 20);
        assert_eq!(t.positions().len(), 20);
        assert_eq!(t.start(), Point::new(0, 2000));
        assert_eq!(t.end(), Point::new(575, 1004));
    }

    #[test]
    fn increments_truncate_toward_zero() {
        // (10 - 0) / 3 = 3, (-10 - 0) / 3 = -3
        let t = MotionTween::new(sprite(), Point::new(0, 0), Point::new(10, -10), 4);
        assert_eq!(
            t.positions(),
            &[
                Point::new(0, 0),
                Point::new(3, -3),
                Point::new(6, -6),
                Point::new(10, -10),
            ]
        );
    }

    #[test]
    fn cursor_starts_before_first_frame() {
        let t = MotionTween::new(sprite(), Point::new(0, 0), Point::new(19, 19), 20);
        assert_eq!(t.current_frame_index(), -1);
        assert!(!t.is_done());
    }

    #[test]
    fn done_after_frame_count_advances() {
        let mut t = MotionTween::new(sprite(), Point::new(0, 0), Point::new(100, 50), 20);
        // The first advance lands on index 0, so 20 advances reach index 19.
        for n in 0..20 {
            assert!(!t.is_done(), "done too early after {n} advances");
            t.advance_and_get_bounds();
        }
        assert!(t.is_done());
        assert_eq!(t.current_frame_index(), 19);
    }

    #[test]
    fn over_advancing_sticks_at_end() {
        let mut t = MotionTween::new(sprite(), Point::new(0, 0), Point::new(100, 50), 5);
        for _ in 0..5 {
            t.advance_and_get_bounds();
        }
        for _ in 0..10 {
            let b = t.advance_and_get_bounds();
            assert_eq!(b, Bounds::at(Point::new(100, 50), 24, 16));
            assert_eq!(t.current_frame_index(), 4);
        }
    }

    #[test]
    fn restart_replays_the_same_positions() {
        let mut t = MotionTween::new(sprite(), Point::new(1000, 0), Point::new(48, 36), 20);
        let first: Vec<Bounds> = (0..20).map(|_| t.advance_and_get_bounds()).collect();
        t.restart();
        assert_eq!(t.current_frame_index(), -1);
        let second: Vec<Bounds> = (0..20).map(|_| t.advance_and_get_bounds()).collect();
        assert_eq!(first, second);
        assert_eq!(first[0], Bounds::at(Point::new(1000, 0), 24, 16));
    }

    #[test]
    #[should_panic]
    fn single_frame_is_rejected() {
        MotionTween::new(sprite(), Point::new(0, 0), Point::new(1, 1), 1);
    }
}
