pub mod color;
pub mod config;
pub mod error;
pub mod generator;
pub mod render;
pub mod settings;
pub mod terminal;

pub use color::{ColorStrategy, Rgb};
pub use config::{ColorMode, DrawConfig, FractalConfig, TreeOptions};
pub use error::{FractalError, Result};
pub use generator::{BranchState, BranchTask, FractalGenerator, TreeStats};
pub use render::{Canvas, CommandLog, JsonLines, LineRenderer, PenCommand, PenState, Point, Segment};
pub use settings::{Settings, TreeOverrides};
pub use terminal::Terminal;
