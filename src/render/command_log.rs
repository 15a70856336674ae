use super::{LineRenderer, PenCommand, PenState, Point};
use crate::color::Rgb;
use crate::error::Result;

/// A visible line as the surface would see it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub from: Point,
    pub to: Point,
    pub color: Rgb,
    pub width: u32,
}

impl Stroke {
    pub fn length(&self) -> f64 {
        self.from.distance(self.to)
    }
}

/// Renderer that simply records every command in order
#[derive(Debug, Default)]
pub struct CommandLog {
    commands: Vec<PenCommand>,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[PenCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<PenCommand> {
        self.commands
    }

    /// Replay the log and collect every pen-down move
    pub fn strokes(&self) -> Vec<Stroke> {
        let mut strokes = Vec::new();
        let mut pos = Point::new(0.0, 0.0);
        let mut pen = PenState::Up;
        let mut color = Rgb::new(0, 0, 0);
        let mut width = 0;

        for command in &self.commands {
            match *command {
                PenCommand::SetStroke { r, g, b, width: w, pen: p } => {
                    color = Rgb::new(r, g, b);
                    width = w;
                    pen = p;
                }
                PenCommand::MoveTo { x, y, .. } => {
                    let to = Point::new(x, y);
                    if pen == PenState::Down {
                        strokes.push(Stroke { from: pos, to, color, width });
                    }
                    pos = to;
                }
            }
        }
        strokes
    }
}

impl LineRenderer for CommandLog {
    fn set_stroke(&mut self, color: Rgb, width: u32, pen: PenState) -> Result<()> {
        self.commands.push(PenCommand::set_stroke(color, width, pen));
        Ok(())
    }

    fn move_to(&mut self, x: f64, y: f64, heading: f64) -> Result<()> {
        self.commands.push(PenCommand::MoveTo { x, y, heading });
        Ok(())
    }
}
