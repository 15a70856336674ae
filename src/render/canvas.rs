//! Terminal line renderer using braille dots
//!
//! Each terminal cell holds a 2x4 braille dot grid, which gives roughly
//! square dots. The turtle field (11.09 x 11.09, origin bottom left) is
//! scaled to fit the dot grid and centered horizontally.

use super::{LineRenderer, PenState, Point};
use crate::color::Rgb;
use crate::error::{FractalError, Result};
use crate::terminal::Terminal;
use crossterm::event::KeyCode;

const BRAILLE_BASE: u32 = 0x2800;
const DOTS_X: usize = 2;
const DOTS_Y: usize = 4;

// Braille dot positions:
// 0 3
// 1 4
// 2 5
// 6 7
const BRAILLE_BITS: [[u8; DOTS_X]; DOTS_Y] = [[0x01, 0x08], [0x02, 0x10], [0x04, 0x20], [0x40, 0x80]];

/// Side length of the turtle field in world units
pub const WORLD_SIZE: f64 = 11.09;

pub struct Canvas {
    term: Terminal,
    masks: Vec<u8>,
    dirty: Vec<(u16, u16)>,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    pos: Point,
    pen: PenState,
    color: Rgb,
    width: u32,
    live: bool,
    time_step: f32,
}

impl Canvas {
    pub fn new(term: Terminal, live: bool, time_step: f32) -> Self {
        let (w, h) = term.size();
        let grid_w = w as f64 * DOTS_X as f64;
        let grid_h = h as f64 * DOTS_Y as f64;
        let scale = (grid_w.min(grid_h) / WORLD_SIZE).max(f64::MIN_POSITIVE);

        Self {
            masks: vec![0; w as usize * h as usize],
            dirty: Vec::new(),
            scale,
            offset_x: (grid_w - WORLD_SIZE * scale) / 2.0,
            offset_y: (grid_h - WORLD_SIZE * scale) / 2.0,
            pos: Point::new(0.0, 0.0),
            pen: PenState::Up,
            color: Rgb::new(255, 255, 255),
            width: 1,
            live,
            time_step,
            term,
        }
    }

    pub fn terminal(&self) -> &Terminal {
        &self.term
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal {
        &mut self.term
    }

    pub fn into_terminal(self) -> Terminal {
        self.term
    }

    /// Wipe the drawing for the next tree
    pub fn reset(&mut self) {
        self.masks.iter_mut().for_each(|m| *m = 0);
        self.dirty.clear();
        self.term.clear();
        self.pen = PenState::Up;
    }

    #[cfg(test)]
    fn lit_dots(&self) -> u32 {
        self.masks.iter().map(|m| m.count_ones()).sum()
    }

    /// World point to fractional dot coordinates (row 0 at the top)
    pub fn world_to_dot(&self, p: Point) -> (f64, f64) {
        let (_, h) = self.term.size();
        let grid_h = h as f64 * DOTS_Y as f64;
        (
            self.offset_x + p.x * self.scale,
            grid_h - self.offset_y - p.y * self.scale,
        )
    }

    fn plot(&mut self, gx: i64, gy: i64) {
        let (w, h) = self.term.size();
        let (grid_w, grid_h) = (w as i64 * DOTS_X as i64, h as i64 * DOTS_Y as i64);
        if gx < 0 || gy < 0 || gx >= grid_w || gy >= grid_h {
            return;
        }

        let (cx, cy) = ((gx / DOTS_X as i64) as u16, (gy / DOTS_Y as i64) as u16);
        let bit = BRAILLE_BITS[(gy % DOTS_Y as i64) as usize][(gx % DOTS_X as i64) as usize];
        let idx = cy as usize * w as usize + cx as usize;
        self.masks[idx] |= bit;

        let ch = char::from_u32(BRAILLE_BASE + self.masks[idx] as u32).unwrap_or(' ');
        self.term.set(cx as i32, cy as i32, ch, Some(self.color));
        if self.live {
            self.dirty.push((cx, cy));
        }
    }

    /// Stroke from `from` to `to` in the current color, thickened by width
    fn ink(&mut self, from: Point, to: Point) {
        let (w, h) = self.term.size();
        let radius = (self.width.saturating_sub(1) / 3) as i64;
        let margin = radius as f64 + 1.0;
        let field = (
            -margin,
            -margin,
            w as f64 * DOTS_X as f64 + margin,
            h as f64 * DOTS_Y as f64 + margin,
        );
        let Some(((x0, y0), (x1, y1))) = clip(self.world_to_dot(from), self.world_to_dot(to), field) else {
            return;
        };
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0) as i64;

        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let gx = (x0 + (x1 - x0) * t).floor() as i64;
            let gy = (y0 + (y1 - y0) * t).floor() as i64;
            for oy in -radius..=radius {
                for ox in -radius..=radius {
                    self.plot(gx + ox, gy + oy);
                }
            }
        }
    }

    /// Push touched cells to the screen and honor quit keys
    fn flush_live(&mut self) -> Result<()> {
        for (x, y) in self.dirty.drain(..) {
            self.term.draw_cell(x, y)?;
        }
        if let Some(KeyCode::Char('q') | KeyCode::Esc) = self.term.check_key()? {
            return Err(FractalError::Interrupted);
        }
        self.term.sleep(self.time_step);
        Ok(())
    }
}

/// Liang-Barsky clip of a dot-space segment to `(min_x, min_y, max_x, max_y)`
fn clip(
    (x0, y0): (f64, f64),
    (x1, y1): (f64, f64),
    (min_x, min_y, max_x, max_y): (f64, f64, f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    if ![x0, y0, x1, y1].iter().all(|v| v.is_finite()) {
        return None;
    }

    let (dx, dy) = (x1 - x0, y1 - y0);
    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    for (p, q) in [(-dx, x0 - min_x), (dx, max_x - x0), (-dy, y0 - min_y), (dy, max_y - y0)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some(((x0 + dx * t0, y0 + dy * t0), (x0 + dx * t1, y0 + dy * t1)))
}

impl LineRenderer for Canvas {
    fn set_stroke(&mut self, color: Rgb, width: u32, pen: PenState) -> Result<()> {
        self.pen = pen;
        if pen == PenState::Down {
            self.color = color;
            self.width = width.max(1);
        }
        Ok(())
    }

    fn move_to(&mut self, x: f64, y: f64, _heading: f64) -> Result<()> {
        let to = Point::new(x, y);
        if self.pen == PenState::Down {
            self.ink(self.pos, to);
        }
        self.pos = to;
        if self.live {
            self.flush_live()?;
        }
        Ok(())
    }
}
