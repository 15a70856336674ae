use crate::color::Rgb;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{poll, read, Event, KeyCode},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, size, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use std::io::{self, stdout, Write};
use std::time::Duration;

/// Terminal abstraction for rendering
pub struct Terminal {
    width: u16,
    height: u16,
    buffer: Vec<Vec<Cell>>,
    alternate_screen: bool,
}

/// A single cell in the terminal buffer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Rgb>,
}

impl Default for Cell {
    fn default() -> Self {
        Self { ch: ' ', fg: None }
    }
}

fn to_color(c: Rgb) -> Color {
    Color::Rgb { r: c.r, g: c.g, b: c.b }
}

impl Terminal {
    /// Initialize the terminal for drawing
    pub fn new(alternate_screen: bool) -> io::Result<Self> {
        let (width, height) = size()?;

        if alternate_screen {
            enable_raw_mode()?;
            execute!(stdout(), EnterAlternateScreen, Hide)?;
        }

        Ok(Self {
            width,
            height,
            buffer: vec![vec![Cell::default(); width as usize]; height as usize],
            alternate_screen,
        })
    }

    /// Off-screen buffer of a fixed size, never touches the real terminal
    pub fn headless(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            buffer: vec![vec![Cell::default(); width as usize]; height as usize],
            alternate_screen: false,
        }
    }

    /// Get terminal dimensions
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        for row in &mut self.buffer {
            for cell in row {
                *cell = Cell::default();
            }
        }
    }

    /// Clear the actual terminal
    pub fn clear_screen(&self) -> io::Result<()> {
        execute!(stdout(), Clear(ClearType::All))?;
        Ok(())
    }

    /// Set a character at position with optional color
    pub fn set(&mut self, x: i32, y: i32, ch: char, fg: Option<Rgb>) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.buffer[y as usize][x as usize] = Cell { ch, fg };
        }
    }

    /// Set a string starting at position
    pub fn set_str(&mut self, x: i32, y: i32, s: &str, fg: Option<Rgb>) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i as i32, y, ch, fg);
        }
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<Cell> {
        self.buffer.get(y as usize).and_then(|row| row.get(x as usize)).copied()
    }

    /// Draw a single buffered cell immediately (for live mode)
    pub fn draw_cell(&self, x: u16, y: u16) -> io::Result<()> {
        let Some(cell) = self.cell(x, y) else {
            return Ok(());
        };
        let mut out = stdout();
        queue!(out, MoveTo(x, y))?;
        match cell.fg {
            Some(color) => queue!(out, SetForegroundColor(to_color(color)), Print(cell.ch), ResetColor)?,
            None => queue!(out, Print(cell.ch))?,
        }
        out.flush()
    }

    /// Render the entire buffer to screen
    pub fn render(&self) -> io::Result<()> {
        let mut out = stdout();

        for (y, row) in self.buffer.iter().enumerate() {
            queue!(out, MoveTo(0, y as u16))?;
            for cell in row {
                match cell.fg {
                    Some(color) => queue!(out, SetForegroundColor(to_color(color)), Print(cell.ch))?,
                    None => queue!(out, ResetColor, Print(cell.ch))?,
                }
            }
        }
        queue!(out, ResetColor)?;
        out.flush()
    }

    /// Check for keypress (non-blocking)
    pub fn check_key(&self) -> io::Result<Option<KeyCode>> {
        self.wait_key(0)
    }

    /// Wait for a keypress with timeout
    pub fn wait_key(&self, timeout_ms: u64) -> io::Result<Option<KeyCode>> {
        if poll(Duration::from_millis(timeout_ms))? {
            if let Event::Key(key_event) = read()? {
                return Ok(Some(key_event.code));
            }
        }
        Ok(None)
    }

    /// Sleep for specified duration
    pub fn sleep(&self, seconds: f32) {
        if let Ok(delay) = Duration::try_from_secs_f32(seconds) {
            if !delay.is_zero() {
                std::thread::sleep(delay);
            }
        }
    }

    /// Print buffer to stdout with truecolor ANSI escapes (for print mode)
    pub fn print_to_stdout(&self) -> io::Result<()> {
        let mut out = stdout().lock();
        for line in self.ansi_lines() {
            writeln!(out, "{}", line)?;
        }
        out.flush()
    }

    /// Buffer rows as ANSI strings, trailing blank rows dropped
    pub fn ansi_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .buffer
            .iter()
            .map(|row| {
                let mut line = String::new();
                for cell in row {
                    match cell.fg {
                        Some(c) if cell.ch != ' ' => {
                            line.push_str(&format!("\x1b[38;2;{};{};{}m{}\x1b[0m", c.r, c.g, c.b, cell.ch));
                        }
                        _ => line.push(cell.ch),
                    }
                }
                line.trim_end().to_string()
            })
            .collect();

        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        lines
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.alternate_screen {
            let _ = execute!(stdout(), ResetColor, Show, LeaveAlternateScreen);
            let _ = disable_raw_mode();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sleep_ignores_unrepresentable_delays() {
        let term = Terminal::headless(1, 1);
        term.sleep(f32::INFINITY);
        term.sleep(f32::NAN);
        term.sleep(-1.0);
    }

    #[test]
    fn set_clips_out_of_bounds() {
        let mut term = Terminal::headless(4, 2);
        term.set(-1, 0, 'x', None);
        term.set(4, 1, 'x', None);
        term.set(3, 1, 'y', Some(Rgb::new(1, 2, 3)));
        assert_eq!(term.cell(3, 1), Some(Cell { ch: 'y', fg: Some(Rgb::new(1, 2, 3)) }));
        assert_eq!(term.cell(4, 1), None);
    }

    #[test]
    fn ansi_lines_trim_blank_tail() {
        let mut term = Terminal::headless(5, 3);
        term.set_str(0, 0, "ab", None);
        term.set(1, 1, '*', Some(Rgb::new(255, 0, 0)));
        assert_eq!(
            term.ansi_lines(),
            vec!["ab".to_string(), " \x1b[38;2;255;0;0m*\x1b[0m".to_string()]
        );

        term.clear();
        assert!(term.ansi_lines().is_empty());
    }
}
