//! Player — the terminal host.
//!
//! Plays the wallpaper in the terminal: turns terminal events into the
//! director's lifecycle events, runs due ticks, and posts finished frames.
//! The player makes no animation decisions of its own.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::{cursor, execute, queue, style, terminal};
use log::info;

use crate::engine::AnimationDirector;
use crate::engine::layout::Location;
use crate::menubar::{MENU_ITEMS, render_menubar};
use crate::renderer::TerminalCanvas;
use crate::settings::{KEY_LOCATION, SettingsStore};
use crate::surface::{Canvas, Surface};
use crate::types::{Cell, Color, NamedColor, Style};

/// Rows reserved above the canvas for the menu bar.
const CANVAS_OFFSET: u16 = 1;
/// Rows taken by the menu bar and the status bar.
const CHROME_ROWS: u16 = 2;
/// Poll timeout while no tick is pending.
const IDLE_POLL: Duration = Duration::from_millis(250);

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

/// A [`Surface`] that shows its canvas on a terminal below the menu bar.
pub struct TerminalSurface<W: Write> {
    out: W,
    canvas: TerminalCanvas,
    /// What is on screen now; `None` forces a full repaint.
    shown: Option<Vec<Vec<Cell>>>,
    locked: bool,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, cols: u16, rows: u16) -> Self {
        TerminalSurface {
            out,
            canvas: TerminalCanvas::new(cols, rows),
            shown: None,
            locked: false,
        }
    }

    /// Replace the canvas with one of the new size and repaint fully on the
    /// next post.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.canvas = TerminalCanvas::new(cols, rows);
        self.shown = None;
    }

    pub fn pixel_size(&self) -> (i32, i32) {
        self.canvas.pixel_size()
    }

    pub fn canvas(&self) -> &TerminalCanvas {
        &self.canvas
    }

    pub fn out_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render_full(&mut self) -> Result<()> {
        for (y, row) in self.canvas.grid().iter().enumerate() {
            queue!(self.out, cursor::MoveTo(0, y as u16 + CANVAS_OFFSET))?;
            for cell in row {
                let cs = style::ContentStyle::from(&cell.style);
                queue!(
                    self.out,
                    style::PrintStyledContent(style::StyledContent::new(cs, cell.ch))
                )?;
            }
        }
        Ok(())
    }

    fn render_changes(&mut self, shown: &[Vec<Cell>]) -> Result<()> {
        for change in self.canvas.changes_since(shown) {
            let cs = style::ContentStyle::from(&change.cell.style);
            queue!(
                self.out,
                cursor::MoveTo(change.x, change.y + CANVAS_OFFSET),
                style::PrintStyledContent(style::StyledContent::new(cs, change.cell.ch)),
            )?;
        }
        Ok(())
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn lock_canvas(&mut self) -> Option<&mut dyn Canvas> {
        if self.canvas.cols() == 0 || self.canvas.rows() == 0 {
            return None;
        }
        self.locked = true;
        Some(&mut self.canvas)
    }

    fn unlock_canvas_and_post(&mut self) -> Result<()> {
        if !self.locked {
            return Ok(());
        }
        self.locked = false;
        match self.shown.take() {
            Some(shown) => self.render_changes(&shown)?,
            None => self.render_full()?,
        }
        self.shown = Some(self.canvas.grid().to_vec());
        self.out.flush()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

pub struct Player<W: Write> {
    director: AnimationDirector,
    store: SettingsStore,
    surface: TerminalSurface<W>,
    /// Terminal height, menu and status bar included.
    term_rows: u16,
    focused: bool,
    paused: bool,
}

impl Player<io::Stdout> {
    pub fn new(director: AnimationDirector, store: SettingsStore) -> Self {
        Self::with_output(director, store, io::stdout())
    }

    /// Play the wallpaper in the terminal.
    ///
    /// Sets up the terminal, enters the event loop, and restores the terminal
    /// on exit (even on error).
    pub fn play(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.surface.out_mut(),
            terminal::EnterAlternateScreen,
            event::EnableFocusChange,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;

        let result = self.run_loop();

        // Always restore terminal state.
        let _ = execute!(
            self.surface.out_mut(),
            event::DisableFocusChange,
            cursor::Show,
            terminal::LeaveAlternateScreen,
        );
        let _ = terminal::disable_raw_mode();

        result
    }

    fn run_loop(&mut self) -> Result<()> {
        let (cols, rows) = terminal::size()?;
        self.start(cols, rows)?;

        loop {
            let timeout = self
                .director
                .scheduler()
                .time_until_due(Instant::now())
                .unwrap_or(IDLE_POLL);

            if event::poll(timeout)? && !self.handle_event(event::read()?)? {
                break;
            }

            self.director.run_due(Instant::now(), &mut self.surface)?;
        }

        self.stop();
        Ok(())
    }
}

impl<W: Write> Player<W> {
    /// A player drawing to `out` instead of the real terminal.
    pub fn with_output(director: AnimationDirector, store: SettingsStore, out: W) -> Self {
        Self {
            director,
            store,
            surface: TerminalSurface::new(out, 0, 0),
            term_rows: 0,
            focused: true,
            paused: false,
        }
    }

    /// Create the director on a `cols` x `rows` terminal and show the first
    /// frame.
    pub fn start(&mut self, cols: u16, rows: u16) -> Result<()> {
        self.director.on_create(&mut self.store);
        self.surface_changed(cols, rows)?;
        self.update_visibility()
    }

    pub fn stop(&mut self) {
        self.director.on_surface_destroyed();
        self.director.on_destroy();
    }

    /// Returns `false` when the player should quit.
    pub fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => return self.handle_key(key),
            Event::Resize(cols, rows) => self.surface_changed(cols, rows)?,
            Event::FocusLost => {
                self.focused = false;
                self.update_visibility()?;
            }
            Event::FocusGained => {
                self.focused = true;
                self.update_visibility()?;
            }
            _ => {}
        }
        Ok(true)
    }

    /// Returns `false` when the player should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(false),
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                self.set_location(Location::ALL[index])?;
            }
            KeyCode::Char('l') => {
                let current: Location = self.director.location().parse().unwrap_or_default();
                self.set_location(current.next())?;
            }
            KeyCode::Char('p') | KeyCode::Char(' ') => {
                self.paused = !self.paused;
                self.update_visibility()?;
            }
            KeyCode::Left | KeyCode::Right => {
                self.director.on_offsets_changed(&mut self.surface)?;
            }
            _ => {}
        }
        Ok(true)
    }

    pub fn director(&self) -> &AnimationDirector {
        &self.director
    }

    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    fn set_location(&mut self, location: Location) -> Result<()> {
        self.store.set_string(KEY_LOCATION, location.name());
        self.store.commit()?;
        self.director
            .on_settings_changed(&self.store, &mut self.surface)?;
        self.render_status()
    }

    fn surface_changed(&mut self, cols: u16, rows: u16) -> Result<()> {
        info!("surface {cols}x{rows}");
        self.term_rows = rows;
        execute!(
            self.surface.out_mut(),
            terminal::Clear(terminal::ClearType::All)
        )?;
        self.surface.resize(cols, rows.saturating_sub(CHROME_ROWS));
        render_menubar(self.surface.out_mut(), 0, MENU_ITEMS)?;
        let (width, height) = self.surface.pixel_size();
        self.director
            .on_surface_changed(width, height, &mut self.surface)?;
        self.render_status()
    }

    fn update_visibility(&mut self) -> Result<()> {
        let visible = self.focused && !self.paused;
        if visible != self.director.is_visible() {
            self.director
                .on_visibility_changed(visible, &mut self.surface)?;
        }
        self.render_status()
    }

    fn render_status(&mut self) -> Result<()> {
        let status_y = self.surface.canvas().rows() + CANVAS_OFFSET;
        if status_y >= self.term_rows {
            return Ok(()); // No room for status bar.
        }

        let state = if self.director.is_visible() {
            "playing"
        } else {
            "paused"
        };
        let status = format!(" {} | {} ", self.director.location(), state);

        let mut cs = style::ContentStyle::default();
        cs.attributes.set(style::Attribute::Dim);

        let out = self.surface.out_mut();
        queue!(
            out,
            cursor::MoveTo(0, status_y),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::PrintStyledContent(style::StyledContent::new(cs, status)),
        )?;
        out.flush()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Style conversion
// ---------------------------------------------------------------------------

impl From<&Style> for style::ContentStyle {
    fn from(s: &Style) -> Self {
        let mut cs = style::ContentStyle {
            foreground_color: s.fg.as_ref().map(style::Color::from),
            background_color: s.bg.as_ref().map(style::Color::from),
            ..Default::default()
        };
        for (on, attr) in [(s.bold, style::Attribute::Bold), (s.dim, style::Attribute::Dim)] {
            if on {
                cs.attributes.set(attr);
            }
        }
        cs
    }
}

impl From<&Color> for style::Color {
    fn from(c: &Color) -> Self {
        match *c {
            Color::Rgb { r, g, b } => style::Color::Rgb { r, g, b },
            Color::Named(ref n) => match n {
                NamedColor::Black => style::Color::Black,
                NamedColor::Red => style::Color::Red,
                NamedColor::Green => style::Color::Green,
                NamedColor::Yellow => style::Color::Yellow,
                NamedColor::Blue => style::Color::Blue,
                NamedColor::Magenta => style::Color::Magenta,
                NamedColor::Cyan => style::Color::Cyan,
                NamedColor::White => style::Color::White,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    use crate::assets::{Assets, Sprite};
    use crate::settings::DEFAULT_LOCATION;
    use crate::types::{Bounds, Point};

    fn draw_box(surface: &mut TerminalSurface<Vec<u8>>, at: Point) -> Result<()> {
        let sprite = Sprite {
            intrinsic_width: 8,
            intrinsic_height: 16,
            ch: '#',
            style: Style::default(),
        };
        let canvas = surface.lock_canvas().expect("canvas available");
        canvas.draw_color(&Color::rgb(5, 5, 5));
        canvas.draw_sprite(&sprite, Bounds::at(at, 8, 16));
        surface.unlock_canvas_and_post()
    }

    /// A started player on an 80 x 26 terminal writing into memory.
    fn started() -> Result<Player<Vec<u8>>> {
        let director = AnimationDirector::new(Assets::default());
        let mut player = Player::with_output(director, SettingsStore::in_memory(), Vec::new());
        player.start(80, 26)?;
        Ok(player)
    }

    fn press(player: &mut Player<Vec<u8>>, c: char) -> Result<bool> {
        player.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    fn stored_location(player: &Player<Vec<u8>>) -> String {
        player.store().get_string(KEY_LOCATION, DEFAULT_LOCATION)
    }

    #[test]
    fn empty_surface_has_no_canvas() {
        let mut surface = TerminalSurface::new(Vec::new(), 0, 0);
        assert!(surface.lock_canvas().is_none());
        // posting without a lock writes nothing
        surface.unlock_canvas_and_post().unwrap();
        assert!(surface.into_inner().is_empty());
    }

    #[test]
    fn first_post_is_full_then_diffs() -> Result<()> {
        let mut surface = TerminalSurface::new(Vec::new(), 10, 3);
        draw_box(&mut surface, Point::new(0, 0))?;
        let full = surface.out_mut().len();
        assert!(full > 0);

        surface.out_mut().clear();
        draw_box(&mut surface, Point::new(8, 0))?;
        let moved = surface.out_mut().len();
        assert!(moved > 0 && moved < full);

        surface.out_mut().clear();
        draw_box(&mut surface, Point::new(8, 0))?;
        assert!(surface.out_mut().is_empty(), "unchanged frame writes nothing");
        Ok(())
    }

    #[test]
    fn resize_forces_full_repaint() -> Result<()> {
        let mut surface = TerminalSurface::new(Vec::new(), 10, 3);
        draw_box(&mut surface, Point::new(0, 0))?;
        surface.resize(12, 3);
        assert_eq!(surface.pixel_size(), (96, 48));
        surface.out_mut().clear();
        draw_box(&mut surface, Point::new(0, 0))?;
        let text = String::from_utf8_lossy(surface.out_mut()).into_owned();
        assert_eq!(text.matches('#').count(), 1);
        assert!(text.matches(' ').count() >= 12 * 3 - 1);
        Ok(())
    }

    #[test]
    fn start_lays_out_below_the_menu_bar() -> Result<()> {
        let player = started()?;
        // 24 canvas rows of 16 px, 80 columns of 8 px
        assert_eq!(player.director().size(), (640, 384));
        assert!(player.director().is_visible());
        assert!(player.director().scheduler().is_pending());
        let text = String::from_utf8_lossy(&player.surface.out);
        assert!(text.contains(" Center | playing "));
        Ok(())
    }

    #[test]
    fn number_key_stores_and_applies_location() -> Result<()> {
        let mut player = started()?;
        assert!(press(&mut player, '2')?);
        assert_eq!(stored_location(&player), "Top-Left");
        assert_eq!(player.director().location(), "Top-Left");
        Ok(())
    }

    #[test]
    fn next_location_wraps_back_to_center() -> Result<()> {
        let mut player = started()?;
        press(&mut player, '5')?;
        assert_eq!(player.director().location(), "Bottom-Right");

        press(&mut player, 'l')?;
        assert_eq!(stored_location(&player), "Center");
        assert_eq!(player.director().location(), "Center");
        Ok(())
    }

    #[test]
    fn pause_key_toggles_visibility() -> Result<()> {
        let mut player = started()?;
        press(&mut player, 'p')?;
        assert!(!player.director().is_visible());
        assert!(!player.director().scheduler().is_pending());

        press(&mut player, 'p')?;
        assert!(player.director().is_visible());
        assert!(player.director().scheduler().is_pending());
        Ok(())
    }

    #[test]
    fn losing_focus_hides_until_regained() -> Result<()> {
        let mut player = started()?;
        assert!(player.handle_event(Event::FocusLost)?);
        assert!(!player.director().is_visible());

        // unpausing while unfocused stays hidden
        press(&mut player, 'p')?;
        press(&mut player, 'p')?;
        assert!(!player.director().is_visible());

        player.handle_event(Event::FocusGained)?;
        assert!(player.director().is_visible());
        Ok(())
    }

    #[test]
    fn resize_relays_out_the_director() -> Result<()> {
        let mut player = started()?;
        assert!(player.handle_event(Event::Resize(40, 12))?);
        assert_eq!(player.director().size(), (320, 160));
        Ok(())
    }

    #[test]
    fn quit_keys_stop_only_on_press() -> Result<()> {
        let mut player = started()?;
        let release = KeyEvent::new_with_kind(
            KeyCode::Char('q'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        );
        assert!(player.handle_event(Event::Key(release))?);
        assert!(!press(&mut player, 'q')?);
        assert!(!player.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE))?);

        player.stop();
        assert!(!player.director().is_visible());
        assert!(!player.director().scheduler().is_pending());
        Ok(())
    }

    #[test]
    fn converts_styles_for_crossterm() {
        assert_eq!(
            style::Color::from(&Color::rgb(5, 5, 5)),
            style::Color::Rgb { r: 5, g: 5, b: 5 }
        );
        let cs = style::ContentStyle::from(&Style {
            fg: Some(Color::Named(NamedColor::White)),
            bold: true,
            ..Default::default()
        });
        assert_eq!(cs.foreground_color, Some(style::Color::White));
        assert_eq!(cs.background_color, None);
        assert!(cs.attributes.has(style::Attribute::Bold));
        assert!(!cs.attributes.has(style::Attribute::Dim));
    }
}
