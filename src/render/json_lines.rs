use super::{LineRenderer, PenCommand, PenState};
use crate::color::Rgb;
use crate::error::Result;
use std::io::{self, Write};

/// Streams pen commands as newline-delimited JSON for an external renderer
pub struct JsonLines<W: Write> {
    out: W,
    written: usize,
}

impl<W: Write> JsonLines<W> {
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    /// Number of commands written so far
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and hand back the writer
    pub fn finish(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }

    fn emit(&mut self, command: &PenCommand) -> Result<()> {
        serde_json::to_writer(&mut self.out, command).map_err(io::Error::from)?;
        self.out.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }
}

impl<W: Write> LineRenderer for JsonLines<W> {
    fn set_stroke(&mut self, color: Rgb, width: u32, pen: PenState) -> Result<()> {
        self.emit(&PenCommand::set_stroke(color, width, pen))
    }

    fn move_to(&mut self, x: f64, y: f64, heading: f64) -> Result<()> {
        self.emit(&PenCommand::MoveTo { x, y, heading })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FractalError;
    use pretty_assertions::assert_eq;

    #[test]
    fn one_object_per_line() {
        let mut sink = JsonLines::new(Vec::new());
        sink.set_stroke(Rgb::new(34, 139, 34), 3, PenState::Down).unwrap();
        sink.move_to(1.5, 2.0, 0.0).unwrap();
        assert_eq!(sink.written(), 2);

        let bytes = sink.finish().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                r#"{"cmd":"set_stroke","r":34,"g":139,"b":34,"width":3,"pen":"down"}"#,
                r#"{"cmd":"move_to","x":1.5,"y":2.0,"heading":0.0}"#,
            ]
        );

        let parsed: PenCommand = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed, PenCommand::MoveTo { x: 1.5, y: 2.0, heading: 0.0 });
    }

    struct Closed;

    impl Write for Closed {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_is_renderer_unavailable() {
        let mut sink = JsonLines::new(Closed);
        let err = sink.move_to(0.0, 0.0, 0.0).unwrap_err();
        assert!(matches!(err, FractalError::RendererUnavailable(_)));
        assert_eq!(sink.written(), 0);
    }
}
