//! Engine — the animation director.
//!
//! Owns the layout and the five box tweens, composes one frame per tick and
//! decides when the next tick happens. Lifecycle events arrive from the host
//! through the `on_*` methods; pixels leave through a [`Surface`].
//!
//! The engine never deals with terminals, ANSI codes, or grids.

pub mod layout;
pub mod schedule;
pub mod tween;

use std::time::Instant;

use anyhow::Result;
use log::{debug, info};

use crate::assets::Assets;
use crate::error::LayoutError;
use crate::settings::{DEFAULT_LOCATION, KEY_LOCATION, SettingsStore, Subscription};
use crate::surface::{Canvas, Surface};
use crate::types::Color;
use layout::{BOX_COUNT, Layout, Location, Metrics};
use schedule::{FRAME_DELAY, FrameScheduler, RESTART_DELAY};
use tween::MotionTween;

/// Frames each box takes to travel from its start to its end point.
pub const FRAME_COUNT: usize = 20;

/// Background fill for every frame.
pub const BACKGROUND: Color = Color::rgb(5, 5, 5);

pub struct AnimationDirector {
    assets: Assets,
    location: String,
    width: i32,
    height: i32,
    logo_x: f32,
    logo_y: f32,
    /// Empty until the first layout has been computed.
    boxes: Vec<MotionTween>,
    /// A box starts drawing once the previous one is past this frame.
    stagger_threshold: isize,
    visible: bool,
    scheduler: FrameScheduler,
    subscription: Option<Subscription>,
}

impl AnimationDirector {
    pub fn new(assets: Assets) -> Self {
        AnimationDirector {
            assets,
            location: DEFAULT_LOCATION.to_string(),
            width: 0,
            height: 0,
            logo_x: 0.0,
            logo_y: 0.0,
            boxes: Vec::new(),
            stagger_threshold: (FRAME_COUNT / BOX_COUNT) as isize,
            visible: false,
            scheduler: FrameScheduler::new(),
            subscription: None,
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Read the stored location and start listening for setting changes.
    pub fn on_create(&mut self, store: &mut SettingsStore) {
        self.location = store.get_string(KEY_LOCATION, DEFAULT_LOCATION);
        self.subscription = Some(store.subscribe());
        info!("created, location {}", self.location);
    }

    pub fn on_destroy(&mut self) {
        self.scheduler.cancel();
        self.subscription = None;
        info!("destroyed");
    }

    pub fn on_surface_changed(
        &mut self,
        width: i32,
        height: i32,
        surface: &mut dyn Surface,
    ) -> Result<()> {
        let location = self.location.clone();
        self.recompute(width, height, self.assets.density, &location)?;
        self.draw_frame(surface)
    }

    pub fn on_surface_destroyed(&mut self) {
        self.visible = false;
        self.scheduler.cancel();
    }

    /// Showing resumes where the animation left off; hiding only stops the
    /// ticks.
    pub fn on_visibility_changed(
        &mut self,
        visible: bool,
        surface: &mut dyn Surface,
    ) -> Result<()> {
        debug!("visible: {visible}");
        self.visible = visible;
        if visible {
            self.draw_frame(surface)
        } else {
            self.scheduler.cancel();
            Ok(())
        }
    }

    pub fn on_offsets_changed(&mut self, surface: &mut dyn Surface) -> Result<()> {
        self.draw_frame(surface)
    }

    /// Apply setting changes delivered through the subscription.
    pub fn on_settings_changed(
        &mut self,
        store: &SettingsStore,
        surface: &mut dyn Surface,
    ) -> Result<()> {
        let changed = match &self.subscription {
            Some(sub) => sub.drain(),
            None => return Ok(()),
        };
        if !changed.iter().any(|key| key == KEY_LOCATION) {
            return Ok(());
        }
        let location = store.get_string(KEY_LOCATION, &self.location);
        info!("location changed to {location}");
        self.recompute(self.width, self.height, self.assets.density, &location)?;
        self.draw_frame(surface)
    }

    /// Run the scheduled tick if it is due at `now`. Returns whether a frame
    /// was drawn.
    pub fn run_due(&mut self, now: Instant, surface: &mut dyn Surface) -> Result<bool> {
        if !self.scheduler.take_due(now) {
            return Ok(false);
        }
        self.draw_frame(surface)?;
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Layout
    // -----------------------------------------------------------------------

    /// Recompute the logo placement and all box tweens.
    ///
    /// An unknown location leaves every piece of state as it was.
    pub fn recompute(
        &mut self,
        width: i32,
        height: i32,
        density: f32,
        location: &str,
    ) -> Result<(), LayoutError> {
        let variant: Location = location.parse()?;
        let layout = layout::compute(variant, &Metrics::new(width, height, density, &self.assets));
        debug!("layout {variant} for {width}x{height}@{density}: {layout:?}");
        self.apply(layout);

        self.width = width;
        self.height = height;
        self.location = location.to_string();
        Ok(())
    }

    fn apply(&mut self, layout: Layout) {
        self.logo_x = layout.logo_x;
        self.logo_y = layout.logo_y;
        self.boxes = layout
            .boxes
            .iter()
            .map(|path| {
                MotionTween::new(
                    self.assets.box_sprite.clone(),
                    path.start,
                    path.end,
                    FRAME_COUNT,
                )
            })
            .collect();
    }

    // -----------------------------------------------------------------------
    // Drawing
    // -----------------------------------------------------------------------

    /// Draw one frame and schedule the next one.
    ///
    /// A surface without a canvas skips the drawing but not the scheduling.
    pub fn draw_frame(&mut self, surface: &mut dyn Surface) -> Result<()> {
        let posted = match surface.lock_canvas() {
            Some(canvas) => {
                self.compose(canvas);
                surface.unlock_canvas_and_post()
            }
            None => Ok(()),
        };

        self.scheduler.cancel();
        if self.visible {
            match self.boxes.last().map(MotionTween::is_done) {
                Some(true) => {
                    for b in &mut self.boxes {
                        b.restart();
                    }
                    debug!("animation complete, restarting");
                    self.scheduler.post_delayed(RESTART_DELAY);
                }
                Some(false) => self.scheduler.post_delayed(FRAME_DELAY),
                // nothing to animate before the first layout
                None => {}
            }
        }

        posted
    }

    fn compose(&mut self, canvas: &mut dyn Canvas) {
        canvas.draw_color(&BACKGROUND);
        canvas.draw_bitmap(&self.assets.logo, self.logo_x, self.logo_y);

        for i in 0..self.boxes.len() {
            if i == 0 || self.boxes[i - 1].current_frame_index() > self.stagger_threshold {
                let bounds = self.boxes[i].advance_and_get_bounds();
                canvas.draw_sprite(self.boxes[i].sprite(), bounds);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn boxes(&self) -> &[MotionTween] {
        &self.boxes
    }

    pub fn logo_placement(&self) -> (f32, f32) {
        (self.logo_x, self.logo_y)
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn stagger_threshold(&self) -> isize {
        self.stagger_threshold
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }
}
