//! Branch coloring: fixed palette gradients, continuous rainbow hues and random tints

use rand::Rng;
use serde::{Deserialize, Serialize};

/// An 8-bit RGB triple
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from float channels, rounding and clamping each into 0..=255
    fn from_channels(r: f64, g: f64, b: f64) -> Self {
        let quantize = |v: f64| v.round().clamp(0.0, 255.0) as u8;
        Self::new(quantize(r), quantize(g), quantize(b))
    }
}

/// Palettes run from the outermost leaves (first entry) to the trunk (last entry)
pub mod palettes {
    use super::Rgb;

    pub const CLASSIC: &[Rgb] = &[Rgb::new(34, 139, 34), Rgb::new(139, 69, 19)];
    pub const AUTUMN: &[Rgb] = &[Rgb::new(165, 42, 42), Rgb::new(255, 140, 0), Rgb::new(255, 215, 0)];
    pub const WINTER: &[Rgb] = &[Rgb::new(70, 130, 180), Rgb::new(135, 206, 250), Rgb::new(240, 248, 255)];
    pub const SPRING: &[Rgb] = &[Rgb::new(148, 0, 211), Rgb::new(75, 0, 130), Rgb::new(0, 255, 127)];
    pub const FIRE: &[Rgb] = &[Rgb::new(139, 0, 0), Rgb::new(255, 69, 0), Rgb::new(255, 215, 0)];
}

// Rainbow mode uses s = 0.8, v = 0.9: chroma 0.72 and a fixed match offset of 0.09
const RAINBOW_CHROMA: f64 = 0.72;
const RAINBOW_MATCH: f64 = 0.09;
/// Degrees of hue shift per already-drawn branch
const RAINBOW_STEP: f64 = 17.0;

const RANDOM_MIN: u8 = 50;
const PALE_MIN: u8 = 200;

/// How a tree walk picks the color of each segment. Rainbow wins over any palette.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColorStrategy {
    /// Hue follows depth, perturbed by the running branch count
    Rainbow,
    /// Linear blend across a fixed palette by depth ratio
    Palette(&'static [Rgb]),
    /// Each channel drawn independently from 50..=255
    Random,
}

impl ColorStrategy {
    /// Color of a segment at `depth` in a walk rooted at `max_depth`
    pub fn color_for<R: Rng + ?Sized>(
        &self,
        depth: u32,
        max_depth: u32,
        branch_count: u64,
        rng: &mut R,
    ) -> Rgb {
        match *self {
            ColorStrategy::Rainbow => rainbow(depth, max_depth, branch_count),
            ColorStrategy::Palette(colors) if !colors.is_empty() => {
                palette_blend(colors, depth, max_depth)
            }
            _ => random_color(rng, RANDOM_MIN),
        }
    }
}

/// Rainbow hue for a branch, in degrees within [0, 360)
pub fn rainbow_hue(depth: u32, max_depth: u32, branch_count: u64) -> f64 {
    let ratio = if max_depth == 0 {
        1.0
    } else {
        depth as f64 / max_depth as f64
    };
    (ratio * 360.0 + branch_count as f64 * RAINBOW_STEP).rem_euclid(360.0)
}

fn rainbow(depth: u32, max_depth: u32, branch_count: u64) -> Rgb {
    hue_to_rgb(rainbow_hue(depth, max_depth, branch_count), RAINBOW_CHROMA, RAINBOW_MATCH)
}

/// Six-sector hue conversion with explicit chroma and match value
pub fn hue_to_rgb(hue: f64, chroma: f64, offset: f64) -> Rgb {
    let h = hue.rem_euclid(360.0);
    let c = chroma;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    Rgb::from_channels((r + offset) * 255.0, (g + offset) * 255.0, (b + offset) * 255.0)
}

/// Standard HSV to RGB, `s` and `v` in [0, 1]
#[cfg(test)]
fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> Rgb {
    let chroma = value * saturation;
    hue_to_rgb(hue, chroma, value - chroma)
}

/// Blend across `colors` by `depth / max_depth`; `colors` must not be empty.
///
/// The segment index and blend weight come from integer division so that
/// ratios landing exactly on a palette entry select that entry.
pub fn palette_blend(colors: &[Rgb], depth: u32, max_depth: u32) -> Rgb {
    let last = colors.len() - 1;
    if max_depth == 0 || last == 0 {
        return colors[last];
    }

    let depth = depth.min(max_depth) as u64;
    let max_depth = max_depth as u64;
    let scaled = depth * last as u64;
    let idx = (scaled / max_depth) as usize;
    let next_idx = (idx + 1).min(last);
    let blend = (scaled % max_depth) as f64 / max_depth as f64;

    let (a, b) = (colors[idx], colors[next_idx]);
    let mix = |from: u8, to: u8| from as f64 * (1.0 - blend) + to as f64 * blend;
    Rgb::from_channels(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
}

/// Independent channels drawn uniformly from `min..=255`
pub fn random_color<R: Rng + ?Sized>(rng: &mut R, min: u8) -> Rgb {
    Rgb::new(
        rng.gen_range(min..=255),
        rng.gen_range(min..=255),
        rng.gen_range(min..=255),
    )
}

/// Pale tint used for decorative dots
pub fn pale_color<R: Rng + ?Sized>(rng: &mut R) -> Rgb {
    random_color(rng, PALE_MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const ALL: [&[Rgb]; 5] = [
        palettes::CLASSIC,
        palettes::AUTUMN,
        palettes::WINTER,
        palettes::SPRING,
        palettes::FIRE,
    ];

    #[test]
    fn palette_endpoints_match_first_and_last_entries() {
        let mut rng = StdRng::seed_from_u64(1);
        for colors in ALL {
            let strategy = ColorStrategy::Palette(colors);
            for max_depth in 1..=12 {
                assert_eq!(strategy.color_for(0, max_depth, 3, &mut rng), colors[0]);
                assert_eq!(
                    strategy.color_for(max_depth, max_depth, 3, &mut rng),
                    colors[colors.len() - 1]
                );
            }
        }
    }

    #[test]
    fn classic_midpoint_is_rounded_average() {
        assert_eq!(palette_blend(palettes::CLASSIC, 1, 2), Rgb::new(87, 104, 27));
    }

    #[test]
    fn three_stop_palette_hits_middle_entry_exactly() {
        // ratio 3/6 lands exactly on index 1
        assert_eq!(palette_blend(palettes::AUTUMN, 3, 6), palettes::AUTUMN[1]);
        assert_eq!(palette_blend(palettes::FIRE, 1, 2), palettes::FIRE[1]);
    }

    #[test]
    fn palette_gradient_is_monotonic_for_two_stops() {
        let reds: Vec<u8> = (0..=7).map(|d| palette_blend(palettes::CLASSIC, d, 7).r).collect();
        assert!(reds.windows(2).all(|w| w[0] <= w[1]), "{:?}", reds);
    }

    #[test]
    fn rainbow_known_sectors() {
        // hue 0 -> (c, 0, 0) + m
        assert_eq!(rainbow(0, 3, 0), Rgb::new(207, 23, 23));
        // hue 120 -> (0, c, 0) + m
        assert_eq!(rainbow(1, 3, 0), Rgb::new(23, 207, 23));
        // hue 240 -> (0, 0, c) + m
        assert_eq!(rainbow(2, 3, 0), Rgb::new(23, 23, 207));
    }

    #[test]
    fn rainbow_hue_wraps_with_branch_count() {
        let hue = rainbow_hue(2, 4, 30);
        assert!((hue - (180.0 + 510.0) % 360.0).abs() < 1e-9);
        assert!((0.0..360.0).contains(&rainbow_hue(4, 4, 0)));
    }

    #[test]
    fn rainbow_channels_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(9);
        for max_depth in 1..=10 {
            for depth in 0..=max_depth {
                for branch_count in 0..64 {
                    let c = ColorStrategy::Rainbow.color_for(depth, max_depth, branch_count, &mut rng);
                    // u8 already bounds the channels; every channel carries the match offset
                    assert!(c.r >= 22 && c.g >= 22 && c.b >= 22, "{:?}", c);
                    assert!(c.r <= 207 && c.g <= 207 && c.b <= 207, "{:?}", c);
                }
            }
        }
    }

    #[test]
    fn standard_hsv_primaries() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), Rgb::new(255, 0, 0));
        assert_eq!(hsv_to_rgb(120.0, 1.0, 1.0), Rgb::new(0, 255, 0));
        assert_eq!(hsv_to_rgb(240.0, 1.0, 1.0), Rgb::new(0, 0, 255));
        assert_eq!(hsv_to_rgb(42.0, 0.0, 1.0), Rgb::new(255, 255, 255));
    }

    #[test]
    fn random_mode_channels_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let c = ColorStrategy::Random.color_for(2, 5, 0, &mut rng);
            assert!(c.r >= 50 && c.g >= 50 && c.b >= 50);
        }
    }

    #[test]
    fn pale_colors_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let c = pale_color(&mut rng);
            assert!(c.r >= 200 && c.g >= 200 && c.b >= 200);
        }
    }

    #[test]
    fn empty_palette_falls_back_to_random() {
        let mut rng = StdRng::seed_from_u64(3);
        let c = ColorStrategy::Palette(&[]).color_for(1, 2, 0, &mut rng);
        assert!(c.r >= 50 && c.g >= 50 && c.b >= 50);
    }
}
