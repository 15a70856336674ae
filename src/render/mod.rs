//! Render boundary for pen commands
//!
//! The generator only ever talks to a [`LineRenderer`]. A line is drawn the
//! way a turtle draws it: lift the pen, move to the start, set the stroke
//! and put the pen down, then move to the end.

pub mod canvas;
pub mod command_log;
pub mod json_lines;

pub use canvas::Canvas;
pub use command_log::CommandLog;
pub use json_lines::JsonLines;

use crate::color::Rgb;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A position in turtle field coordinates (y up)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Polar offset from this point
    pub fn offset(self, length: f64, angle: f64) -> Self {
        Self::new(self.x + length * angle.cos(), self.y + length * angle.sin())
    }

    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// One straight branch, ready to emit
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
    pub color: Rgb,
    pub width: u32,
    pub depth: u32,
    pub max_depth: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PenState {
    Up,
    Down,
}

/// A single command sent across the render boundary
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PenCommand {
    SetStroke { r: u8, g: u8, b: u8, width: u32, pen: PenState },
    MoveTo { x: f64, y: f64, heading: f64 },
}

impl PenCommand {
    pub fn set_stroke(color: Rgb, width: u32, pen: PenState) -> Self {
        PenCommand::SetStroke { r: color.r, g: color.g, b: color.b, width, pen }
    }
}

/// Anything that can take turtle pen commands
pub trait LineRenderer {
    /// Configure the stroke used by subsequent moves
    fn set_stroke(&mut self, color: Rgb, width: u32, pen: PenState) -> Result<()>;

    /// Move the cursor, inking a line when the pen is down
    fn move_to(&mut self, x: f64, y: f64, heading: f64) -> Result<()>;

    fn draw_segment(&mut self, segment: &Segment) -> Result<()> {
        self.set_stroke(Rgb::new(0, 0, 0), 0, PenState::Up)?;
        self.move_to(segment.start.x, segment.start.y, 0.0)?;
        self.set_stroke(segment.color, segment.width, PenState::Down)?;
        self.move_to(segment.end.x, segment.end.y, 0.0)
    }

    /// Zero-length mark at `at`
    fn draw_point(&mut self, at: Point, color: Rgb, width: u32) -> Result<()> {
        self.set_stroke(Rgb::new(0, 0, 0), 0, PenState::Up)?;
        self.move_to(at.x, at.y, 0.0)?;
        self.set_stroke(color, width, PenState::Down)?;
        self.move_to(at.x, at.y, 0.0)
    }
}

impl<T: LineRenderer + ?Sized> LineRenderer for &mut T {
    fn set_stroke(&mut self, color: Rgb, width: u32, pen: PenState) -> Result<()> {
        (**self).set_stroke(color, width, pen)
    }

    fn move_to(&mut self, x: f64, y: f64, heading: f64) -> Result<()> {
        (**self).move_to(x, y, heading)
    }

    fn draw_segment(&mut self, segment: &Segment) -> Result<()> {
        (**self).draw_segment(segment)
    }

    fn draw_point(&mut self, at: Point, color: Rgb, width: u32) -> Result<()> {
        (**self).draw_point(at, color, width)
    }
}
