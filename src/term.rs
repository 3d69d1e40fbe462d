use std::io::{self, IsTerminal, Stdout, Write, stdout};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{self, Attribute, Color as CColor},
    terminal::{self, ClearType},
};
use tracing::{debug, info, warn};

use crate::driver::{CancelToken, Host};
use crate::error::AppError;
use crate::game::{Command, CommandQueue};
use crate::session::SessionState;
use crate::surface::{Align, PixelBuf, Rgb, TextRun};

/// Rows kept under the playfield for the score line.
const STATUS_ROWS: u16 = 1;

fn ccolor(c: Rgb) -> CColor {
    CColor::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

// ── Viewport ────────────────────────────────────────────────────────────────

/// Where the surface lands in the terminal. Each cell shows two vertically stacked pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub col: u16,
    pub cols: u16,
    pub rows: u16,
    /// Terminal pixels per surface unit.
    pub scale: f64,
}

impl Viewport {
    /// Largest aspect-preserving fit of a `w` x `h` surface, centred horizontally.
    pub fn fit(term_cols: u16, term_rows: u16, w: f64, h: f64) -> Option<Self> {
        let px_w = term_cols as f64;
        let px_h = term_rows.saturating_sub(STATUS_ROWS) as f64 * 2.0;
        let scale = (px_w / w).min(px_h / h);
        let cols = (w * scale).floor() as u16;
        let rows = ((h * scale) / 2.0).floor() as u16;
        if cols == 0 || rows == 0 {
            return None;
        }
        Some(Self {
            col: (term_cols - cols) / 2,
            cols,
            rows,
            scale,
        })
    }

    pub fn contains(&self, col: u16, row: u16) -> bool {
        col >= self.col && col < self.col + self.cols && row < self.rows
    }

    /// Terminal cell covering the surface point `(x, y)`. May lie outside the viewport.
    pub fn cell_at(&self, x: f64, y: f64) -> (i32, i32) {
        let col = self.col as f64 + (x * self.scale).floor();
        let row = (y * self.scale / 2.0).floor();
        (col as i32, row as i32)
    }

    /// Nearest-sample the surface for terminal pixel `(c, py)` of the viewport.
    fn sample(&self, frame: &PixelBuf, c: u16, py: u16) -> Rgb {
        let x = ((c as f64 + 0.5) / self.scale) as usize;
        let y = ((py as f64 + 0.5) / self.scale) as usize;
        frame.get(
            x.min(frame.width().saturating_sub(1)),
            y.min(frame.height().saturating_sub(1)),
        )
    }
}

/// Where a text run starts on screen, clamped so it stays on the terminal.
fn text_origin(run: &TextRun, vp: &Viewport, term_cols: u16) -> (u16, u16) {
    let len = run.text.chars().count() as i32;
    // Baseline to the middle of the glyphs.
    let mid_y = run.y - run.font.size as f64 * 0.35;
    let (anchor, row) = vp.cell_at(run.x, mid_y);
    let start = match run.font.align {
        Align::Left => anchor,
        Align::Center => anchor - len / 2,
        Align::Right => anchor - len,
    };
    let max_start = (term_cols as i32 - len).max(0);
    let row = row.clamp(0, vp.rows.saturating_sub(1) as i32);
    (start.clamp(0, max_start) as u16, row as u16)
}

pub fn status_line(session: &SessionState) -> String {
    format!("Score: {} | High Score: {}", session.score, session.high_score)
}

// ── Terminal host ───────────────────────────────────────────────────────────

/// Raw-mode, alternate-screen terminal that presents frames with half blocks.
/// The terminal is restored when this is dropped.
pub struct TerminalHost {
    out: Stdout,
    cols: u16,
    surface_w: f64,
    surface_h: f64,
    viewport: Option<Viewport>,
}

impl TerminalHost {
    pub fn new(surface_w: f64, surface_h: f64) -> Result<Self, AppError> {
        if !io::stdout().is_terminal() {
            return Err(AppError::NotATerminal);
        }
        let (cols, rows) = terminal::size()?;
        let viewport = Viewport::fit(cols, rows, surface_w, surface_h)
            .ok_or(AppError::SurfaceTooSmall { cols, rows })?;

        terminal::enable_raw_mode()?;
        // From here on, dropping `host` puts the terminal back.
        let mut host = Self {
            out: stdout(),
            cols,
            surface_w,
            surface_h,
            viewport: Some(viewport),
        };
        execute!(
            host.out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
            EnableMouseCapture,
        )?;
        info!(cols, rows, ?viewport, "terminal ready");

        Ok(host)
    }

    fn resize(&mut self, cols: u16, rows: u16) -> io::Result<()> {
        self.cols = cols;
        self.viewport = Viewport::fit(cols, rows, self.surface_w, self.surface_h);
        debug!(cols, rows, viewport = ?self.viewport, "terminal resized");
        execute!(self.out, terminal::Clear(ClearType::All))
    }

    fn draw_pixels(&mut self, frame: &PixelBuf, vp: &Viewport) -> io::Result<()> {
        let out = &mut self.out;
        let mut prev_fg = Rgb(0, 0, 0);
        let mut prev_bg = Rgb(0, 0, 0);

        for row in 0..vp.rows {
            queue!(out, cursor::MoveTo(vp.col, row))?;
            let mut need_fg = true;
            let mut need_bg = true;
            for c in 0..vp.cols {
                let top = vp.sample(frame, c, row * 2);
                let bot = vp.sample(frame, c, row * 2 + 1);

                if top == bot {
                    if need_bg || prev_bg != top {
                        queue!(out, style::SetBackgroundColor(ccolor(top)))?;
                        prev_bg = top;
                        need_bg = false;
                    }
                    queue!(out, style::Print(' '))?;
                } else {
                    if need_fg || prev_fg != top {
                        queue!(out, style::SetForegroundColor(ccolor(top)))?;
                        prev_fg = top;
                        need_fg = false;
                    }
                    if need_bg || prev_bg != bot {
                        queue!(out, style::SetBackgroundColor(ccolor(bot)))?;
                        prev_bg = bot;
                        need_bg = false;
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            queue!(out, style::ResetColor)?;
        }
        Ok(())
    }

    fn draw_texts(&mut self, frame: &PixelBuf, vp: &Viewport) -> io::Result<()> {
        for run in frame.texts() {
            let (col, row) = text_origin(run, vp, self.cols);
            // Blend into whatever the text sits on.
            let bg = if vp.contains(col, row) {
                ccolor(vp.sample(frame, col - vp.col, row * 2 + 1))
            } else {
                CColor::Reset
            };
            queue!(
                self.out,
                cursor::MoveTo(col, row),
                style::SetBackgroundColor(bg),
                style::SetForegroundColor(ccolor(run.color.0)),
            )?;
            if run.font.bold {
                queue!(self.out, style::SetAttribute(Attribute::Bold))?;
            }
            queue!(
                self.out,
                style::Print(&run.text),
                style::SetAttribute(Attribute::Reset),
                style::ResetColor,
            )?;
        }
        Ok(())
    }

    fn draw_status(&mut self, session: &SessionState, vp: &Viewport) -> io::Result<()> {
        let text = status_line(session);
        let len = text.chars().count() as u16;
        let col = (vp.col + vp.cols / 2).saturating_sub(len / 2);
        queue!(
            self.out,
            cursor::MoveTo(0, vp.rows),
            terminal::Clear(ClearType::CurrentLine),
            cursor::MoveTo(col.min(self.cols.saturating_sub(len)), vp.rows),
            style::SetAttribute(Attribute::Bold),
            style::Print(text),
            style::SetAttribute(Attribute::Reset),
        )
    }

    fn restore(&mut self) -> io::Result<()> {
        execute!(
            self.out,
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )?;
        terminal::disable_raw_mode()
    }
}

// ── Input ───────────────────────────────────────────────────────────────────

/// Space activates; `q`, `Esc` and `Ctrl-C` stop the loop. Repeats and releases are ignored.
fn handle_key(key: KeyEvent, queue: &mut CommandQueue, cancel: &CancelToken) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    match key.code {
        KeyCode::Char(' ') => {
            queue.push(Command::Activate);
        }
        KeyCode::Char('q') | KeyCode::Esc => cancel.cancel(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => cancel.cancel(),
        _ => {}
    }
}

/// A left press inside the playfield activates. No viewport means no playfield.
fn handle_mouse(mouse: MouseEvent, viewport: Option<Viewport>, queue: &mut CommandQueue) {
    let in_playfield = viewport.is_some_and(|vp| vp.contains(mouse.column, mouse.row));
    if mouse.kind == MouseEventKind::Down(MouseButton::Left) && in_playfield {
        queue.push(Command::Activate);
    }
}

impl Host for TerminalHost {
    type Error = io::Error;

    fn poll_input(&mut self, queue: &mut CommandQueue, cancel: &CancelToken) -> io::Result<()> {
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => handle_key(key, queue, cancel),
                Event::Mouse(mouse) => handle_mouse(mouse, self.viewport, queue),
                Event::Resize(c, r) => self.resize(c, r)?,
                _ => {}
            }
        }
        Ok(())
    }

    fn present(&mut self, frame: &PixelBuf, session: &SessionState) -> io::Result<()> {
        let Some(vp) = self.viewport else {
            queue!(
                self.out,
                cursor::MoveTo(0, 0),
                terminal::Clear(ClearType::All),
                style::Print("terminal too small"),
            )?;
            return self.out.flush();
        };

        self.draw_pixels(frame, &vp)?;
        self.draw_texts(frame, &vp)?;
        self.draw_status(session, &vp)?;
        self.out.flush()
    }
}

impl Drop for TerminalHost {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            warn!(%err, "failed to restore terminal");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::surface::{Font, Surface};

    #[test]
    fn test_fit_is_limited_by_height_on_wide_terminals() {
        let vp = Viewport::fit(200, 51, 400.0, 600.0).unwrap();
        // 50 rows of playfield = 100 pixels high, so 1/6 scale.
        assert_eq!(vp.rows, 50);
        assert_eq!(vp.cols, 66);
        assert_eq!(vp.col, 67);
    }

    #[test]
    fn test_fit_is_limited_by_width_on_narrow_terminals() {
        let vp = Viewport::fit(40, 100, 400.0, 600.0).unwrap();
        assert_eq!(vp.cols, 40);
        assert_eq!(vp.rows, 30);
        assert_eq!(vp.col, 0);
    }

    #[test]
    fn test_fit_rejects_tiny_terminals() {
        assert_eq!(Viewport::fit(80, 1, 400.0, 600.0), None);
        assert_eq!(Viewport::fit(0, 50, 400.0, 600.0), None);
    }

    #[test]
    fn test_contains_only_playfield_cells() {
        let vp = Viewport::fit(200, 51, 400.0, 600.0).unwrap();
        assert!(vp.contains(67, 0));
        assert!(vp.contains(132, 49));
        assert!(!vp.contains(66, 10));
        assert!(!vp.contains(133, 10));
        assert!(!vp.contains(100, 50)); // status row
    }

    #[test]
    fn test_centered_text_is_centered_on_anchor() {
        let vp = Viewport::fit(200, 51, 400.0, 600.0).unwrap();
        let mut buf = PixelBuf::new(400, 600);
        buf.fill_text("abcd", 200.0, 300.0, Font::new(20), Rgb(0, 0, 0).opaque());
        let (col, row) = text_origin(&buf.texts()[0], &vp, 200);
        // Anchor column is 67 + floor(200 / 6) = 100.
        assert_eq!(col, 98);
        assert_eq!(row, 24);
    }

    #[test]
    fn test_left_and_right_text_hang_off_the_anchor() {
        let vp = Viewport::fit(200, 51, 400.0, 600.0).unwrap();
        let mut buf = PixelBuf::new(400, 600);
        let black = Rgb(0, 0, 0).opaque();
        buf.fill_text("abcd", 200.0, 300.0, Font::new(20).align(Align::Left), black);
        buf.fill_text("abcd", 200.0, 300.0, Font::new(20).align(Align::Right), black);
        assert_eq!(text_origin(&buf.texts()[0], &vp, 200), (100, 24));
        assert_eq!(text_origin(&buf.texts()[1], &vp, 200), (96, 24));
    }

    #[test]
    fn test_long_text_is_kept_on_terminal() {
        let vp = Viewport::fit(30, 24, 400.0, 600.0).unwrap();
        let mut buf = PixelBuf::new(400, 600);
        let text = "x".repeat(40);
        buf.fill_text(&text, 200.0, 300.0, Font::new(20), Rgb(0, 0, 0).opaque());
        let (col, _) = text_origin(&buf.texts()[0], &vp, 30);
        assert_eq!(col, 0);
    }

    #[test]
    fn test_status_line_reports_both_scores() {
        let mut session = SessionState::new(&GameConfig::default());
        session.score = 2;
        session.high_score = 11;
        assert_eq!(status_line(&session), "Score: 2 | High Score: 11");
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_space_press_activates() {
        let mut queue = CommandQueue::default();
        let cancel = CancelToken::new();
        handle_key(press(KeyCode::Char(' ')), &mut queue, &cancel);
        assert_eq!(queue.pop(), Some(Command::Activate));
        assert!(!cancel.is_cancelled());
    }

    #[test]
    fn test_key_repeats_and_releases_are_ignored() {
        let mut queue = CommandQueue::default();
        let cancel = CancelToken::new();
        for kind in [KeyEventKind::Repeat, KeyEventKind::Release] {
            let key = KeyEvent::new_with_kind(KeyCode::Char(' '), KeyModifiers::NONE, kind);
            handle_key(key, &mut queue, &cancel);
            let key = KeyEvent::new_with_kind(KeyCode::Esc, KeyModifiers::NONE, kind);
            handle_key(key, &mut queue, &cancel);
        }
        assert!(queue.is_empty());
        assert!(!cancel.is_cancelled());
    }

    #[test]
    fn test_quit_keys_cancel_without_queueing() {
        let quits = [
            press(KeyCode::Char('q')),
            press(KeyCode::Esc),
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ];
        for key in quits {
            let mut queue = CommandQueue::default();
            let cancel = CancelToken::new();
            handle_key(key, &mut queue, &cancel);
            assert!(cancel.is_cancelled(), "{key:?} should cancel");
            assert!(queue.is_empty());
        }
    }

    #[test]
    fn test_other_keys_do_nothing() {
        let mut queue = CommandQueue::default();
        let cancel = CancelToken::new();
        handle_key(press(KeyCode::Char('c')), &mut queue, &cancel);
        handle_key(press(KeyCode::Enter), &mut queue, &cancel);
        assert!(queue.is_empty());
        assert!(!cancel.is_cancelled());
    }

    #[test]
    fn test_left_click_inside_playfield_activates() {
        let vp = Viewport::fit(200, 51, 400.0, 600.0);
        let mut queue = CommandQueue::default();
        handle_mouse(click(MouseEventKind::Down(MouseButton::Left), 100, 20), vp, &mut queue);
        assert_eq!(queue.pop(), Some(Command::Activate));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_clicks_outside_playfield_or_not_left_down_are_dropped() {
        let vp = Viewport::fit(200, 51, 400.0, 600.0);
        let mut queue = CommandQueue::default();
        let left = MouseEventKind::Down(MouseButton::Left);

        handle_mouse(click(left, 10, 20), vp, &mut queue); // left margin
        handle_mouse(click(left, 100, 50), vp, &mut queue); // status row
        handle_mouse(click(MouseEventKind::Down(MouseButton::Right), 100, 20), vp, &mut queue);
        handle_mouse(click(MouseEventKind::Up(MouseButton::Left), 100, 20), vp, &mut queue);
        handle_mouse(click(MouseEventKind::Moved, 100, 20), vp, &mut queue);
        handle_mouse(click(left, 100, 20), None, &mut queue); // terminal too small
        assert!(queue.is_empty());
    }
}
