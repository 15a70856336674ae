use crate::color::{palettes, ColorStrategy, Rgb};
use crate::error::{FractalError, Result};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_DEPTH: u32 = 7;
pub const DEFAULT_LENGTH: f64 = 2.0;
pub const DEFAULT_ANGLE: f64 = 30.0;
pub const DEFAULT_TIME_STEP: f32 = 0.015;
pub const DEFAULT_WAIT: f64 = 4.0;

/// Bottom center of the 11.09 x 11.09 turtle field
pub const DEFAULT_ORIGIN: (f64, f64) = (5.5, 0.5);

/// Named color schemes selectable from the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Classic,
    Autumn,
    Winter,
    Spring,
    Fire,
    Random,
}

impl ColorMode {
    pub const NAMES: &'static str = "classic, autumn, winter, spring, fire, random";
    pub const ALL: [ColorMode; 6] = [
        ColorMode::Classic,
        ColorMode::Autumn,
        ColorMode::Winter,
        ColorMode::Spring,
        ColorMode::Fire,
        ColorMode::Random,
    ];

    /// Fixed palette for this mode, `None` for random
    pub fn palette(self) -> Option<&'static [Rgb]> {
        match self {
            ColorMode::Classic => Some(palettes::CLASSIC),
            ColorMode::Autumn => Some(palettes::AUTUMN),
            ColorMode::Winter => Some(palettes::WINTER),
            ColorMode::Spring => Some(palettes::SPRING),
            ColorMode::Fire => Some(palettes::FIRE),
            ColorMode::Random => None,
        }
    }

    /// Coloring for this scheme; rainbow overrides whatever scheme was named
    pub fn strategy(self, rainbow: bool) -> ColorStrategy {
        if rainbow {
            return ColorStrategy::Rainbow;
        }
        match self.palette() {
            Some(colors) => ColorStrategy::Palette(colors),
            None => ColorStrategy::Random,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorMode::Classic => "classic",
            ColorMode::Autumn => "autumn",
            ColorMode::Winter => "winter",
            ColorMode::Spring => "spring",
            ColorMode::Fire => "fire",
            ColorMode::Random => "random",
        }
    }
}

impl FromStr for ColorMode {
    type Err = FractalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "classic" => Ok(ColorMode::Classic),
            "autumn" | "fall" => Ok(ColorMode::Autumn),
            "winter" => Ok(ColorMode::Winter),
            "spring" => Ok(ColorMode::Spring),
            "fire" => Ok(ColorMode::Fire),
            "random" => Ok(ColorMode::Random),
            other => Err(FractalError::config(format!(
                "unknown color scheme '{}' (available: {})",
                other,
                ColorMode::NAMES
            ))),
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw tree options as the user supplied them (angle in degrees)
#[derive(Clone, Debug, PartialEq)]
pub struct TreeOptions {
    pub depth: i64,
    pub length: f64,
    pub angle: f64,
    pub color: String,
    pub rainbow: bool,
    pub middle_branch: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH as i64,
            length: DEFAULT_LENGTH,
            angle: DEFAULT_ANGLE,
            color: ColorMode::Classic.name().to_string(),
            rainbow: false,
            middle_branch: false,
        }
    }
}

/// Validated, immutable configuration for one tree
#[derive(Clone, Debug, PartialEq)]
pub struct FractalConfig {
    pub max_depth: u32,
    pub trunk_length: f64,
    /// Radians
    pub branch_angle: f64,
    pub color: ColorStrategy,
    pub middle_branch: bool,
}

impl Default for FractalConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_DEPTH,
            trunk_length: DEFAULT_LENGTH,
            branch_angle: DEFAULT_ANGLE.to_radians(),
            color: ColorMode::Classic.strategy(false),
            middle_branch: false,
        }
    }
}

impl FractalConfig {
    /// Validate user options. The generator assumes a config built here.
    pub fn from_options(opts: &TreeOptions) -> Result<Self> {
        if opts.depth < 1 {
            return Err(FractalError::config(format!(
                "depth must be at least 1, got {}",
                opts.depth
            )));
        }
        let max_depth = u32::try_from(opts.depth)
            .map_err(|_| FractalError::config(format!("depth {} is too large", opts.depth)))?;
        if !opts.length.is_finite() || opts.length <= 0.0 {
            return Err(FractalError::config(format!(
                "length must be a positive number, got {}",
                opts.length
            )));
        }
        if !opts.angle.is_finite() {
            return Err(FractalError::config(format!(
                "angle must be a finite number of degrees, got {}",
                opts.angle
            )));
        }

        Ok(Self {
            max_depth,
            trunk_length: opts.length,
            branch_angle: opts.angle.to_radians(),
            color: opts.color.parse::<ColorMode>()?.strategy(opts.rainbow),
            middle_branch: opts.middle_branch,
        })
    }

    pub fn rainbow(&self) -> bool {
        self.color == ColorStrategy::Rainbow
    }

    /// Scheme name for labels
    pub fn color_name(&self) -> &'static str {
        match self.color {
            ColorStrategy::Rainbow => "rainbow",
            ColorStrategy::Random => "random",
            ColorStrategy::Palette(colors) => ColorMode::ALL
                .iter()
                .find(|mode| mode.palette() == Some(colors))
                .map_or("custom", |mode| mode.name()),
        }
    }

    /// Probability that an eligible branch grows a middle child
    pub fn middle_chance(&self) -> f64 {
        let threshold = if self.middle_branch { 0.0 } else { 1.0 };
        1.0 - threshold
    }
}

/// Settings for the terminal drawing surface
#[derive(Clone, Debug)]
pub struct DrawConfig {
    pub live: bool,
    pub print: bool,
    pub infinite: bool,
    /// Seconds per pen command in live mode
    pub time_step: f32,
    /// Seconds between trees in infinite mode
    pub time_wait: f64,
    pub seed: Option<u64>,
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_validate() {
        let config = FractalConfig::from_options(&TreeOptions::default()).unwrap();
        assert_eq!(config, FractalConfig::default());
        assert!((config.branch_angle - std::f64::consts::PI / 6.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_non_positive_depth() {
        for depth in [0, -3] {
            let opts = TreeOptions { depth, ..TreeOptions::default() };
            assert!(matches!(FractalConfig::from_options(&opts), Err(FractalError::Config(_))));
        }
    }

    #[test]
    fn rejects_bad_length_and_angle() {
        for length in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let opts = TreeOptions { length, ..TreeOptions::default() };
            assert!(FractalConfig::from_options(&opts).is_err(), "length {}", length);
        }
        let opts = TreeOptions { angle: f64::NAN, ..TreeOptions::default() };
        assert!(FractalConfig::from_options(&opts).is_err());
    }

    #[test]
    fn color_mode_parsing() {
        assert_eq!("Autumn".parse::<ColorMode>().unwrap(), ColorMode::Autumn);
        assert_eq!(" fire ".parse::<ColorMode>().unwrap(), ColorMode::Fire);
        let err = "plaid".parse::<ColorMode>().unwrap_err();
        assert!(err.to_string().contains("plaid"));
        assert!(err.to_string().contains(ColorMode::NAMES));
    }

    #[test]
    fn rainbow_overrides_palette() {
        assert_eq!(ColorMode::Winter.strategy(true), ColorStrategy::Rainbow);
        assert_eq!(ColorMode::Random.strategy(false), ColorStrategy::Random);
        assert_eq!(ColorMode::Spring.strategy(false), ColorStrategy::Palette(palettes::SPRING));

        let opts = TreeOptions { color: "winter".to_string(), rainbow: true, ..TreeOptions::default() };
        let config = FractalConfig::from_options(&opts).unwrap();
        assert_eq!(config.color, ColorStrategy::Rainbow);
        assert!(config.rainbow());
    }

    #[test]
    fn color_names_follow_the_strategy() {
        for mode in ColorMode::ALL {
            let config = FractalConfig { color: mode.strategy(false), ..FractalConfig::default() };
            assert_eq!(config.color_name(), mode.name());
        }
        let config = FractalConfig { color: ColorStrategy::Rainbow, ..FractalConfig::default() };
        assert_eq!(config.color_name(), "rainbow");
    }

    #[test]
    fn middle_chance_is_binary() {
        assert_eq!(FractalConfig::default().middle_chance(), 0.0);
        let config = FractalConfig { middle_branch: true, ..FractalConfig::default() };
        assert_eq!(config.middle_chance(), 1.0);
    }
}
