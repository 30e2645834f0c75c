use std::fmt;
use std::str::FromStr;

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Channels closer than this to each other count as a shade of gray.
const GRAY_CHANNEL_SPREAD: i16 = 30;
/// Saturation (percent) below which a pixel is treated as achromatic.
const ACHROMATIC_SATURATION: f64 = 20.0;

/// Hue in degrees `[0, 360)`, saturation and value in percent `[0, 100]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsv {
    pub hue: f64,
    pub saturation: f64,
    pub value: f64,
}

impl Hsv {
    /// Standard RGB → HSV transform.
    ///
    /// The sector arithmetic runs on the integer channel values so that inputs
    /// which sit exactly on a hue band edge (`(252, 0, 63)` is 345°) come out
    /// exact instead of a hair below it.
    pub fn from_rgb(rgb: Srgb<u8>) -> Self {
        let r = f64::from(rgb.red);
        let g = f64::from(rgb.green);
        let b = f64::from(rgb.blue);

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let value = max / 255.0 * 100.0;

        if max == min {
            return Hsv {
                hue: 0.0,
                saturation: 0.0,
                value,
            };
        }

        let delta = max - min;
        let saturation = delta / max * 100.0;

        // Ties prefer red, then green, matching the usual reference transform.
        let sector = if max == r {
            (g - b) / delta
        } else if max == g {
            2.0 + (b - r) / delta
        } else {
            4.0 + (r - g) / delta
        };

        let mut hue = sector * 60.0;
        if hue < 0.0 {
            hue += 360.0;
        }

        Hsv {
            hue,
            saturation,
            value,
        }
    }

    /// Each component rounded to one decimal place, as written to the table.
    pub fn rounded(self) -> Self {
        Hsv {
            hue: round_tenth(self.hue) % 360.0,
            saturation: round_tenth(self.saturation),
            value: round_tenth(self.value),
        }
    }
}

/// Decimal rounding of the exact binary value; ties go to even (6.25 → 6.2).
fn round_tenth(v: f64) -> f64 {
    format!("{v:.1}").parse().unwrap_or(v)
}

/// Coarse human-readable label for a color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ColorName {
    Black,
    DarkGray,
    Gray,
    LightGray,
    White,
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Blue,
    Purple,
    Pink,
}

impl ColorName {
    pub const ALL: [ColorName; 13] = [
        ColorName::Black,
        ColorName::DarkGray,
        ColorName::Gray,
        ColorName::LightGray,
        ColorName::White,
        ColorName::Red,
        ColorName::Orange,
        ColorName::Yellow,
        ColorName::Green,
        ColorName::Cyan,
        ColorName::Blue,
        ColorName::Purple,
        ColorName::Pink,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ColorName::Black => "Black",
            ColorName::DarkGray => "DarkGray",
            ColorName::Gray => "Gray",
            ColorName::LightGray => "LightGray",
            ColorName::White => "White",
            ColorName::Red => "Red",
            ColorName::Orange => "Orange",
            ColorName::Yellow => "Yellow",
            ColorName::Green => "Green",
            ColorName::Cyan => "Cyan",
            ColorName::Blue => "Blue",
            ColorName::Purple => "Purple",
            ColorName::Pink => "Pink",
        }
    }
}

impl fmt::Display for ColorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ColorName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| Error::Parse(format!("unknown color name {s:?}")))
    }
}

/// Classify an RGB triple into one of the thirteen [`ColorName`] labels.
///
/// Near-gray triples are bucketed by the red channel alone, low-saturation
/// colors by value, everything else by hue band.
pub fn classify(rgb: Srgb<u8>) -> ColorName {
    let (r, g, b) = (
        i16::from(rgb.red),
        i16::from(rgb.green),
        i16::from(rgb.blue),
    );

    if (r - g).abs() < GRAY_CHANNEL_SPREAD
        && (g - b).abs() < GRAY_CHANNEL_SPREAD
        && (r - b).abs() < GRAY_CHANNEL_SPREAD
    {
        return match r {
            ..50 => ColorName::Black,
            50..100 => ColorName::DarkGray,
            100..150 => ColorName::Gray,
            150..200 => ColorName::LightGray,
            _ => ColorName::White,
        };
    }

    let hsv = Hsv::from_rgb(rgb);

    if hsv.saturation < ACHROMATIC_SATURATION {
        return if hsv.value < 30.0 {
            ColorName::Black
        } else if hsv.value < 60.0 {
            ColorName::Gray
        } else {
            ColorName::LightGray
        };
    }

    let h = hsv.hue;
    if h < 15.0 || h >= 345.0 {
        ColorName::Red
    } else if h < 45.0 {
        ColorName::Orange
    } else if h < 75.0 {
        ColorName::Yellow
    } else if h < 150.0 {
        ColorName::Green
    } else if h < 210.0 {
        ColorName::Cyan
    } else if h < 270.0 {
        ColorName::Blue
    } else if h < 315.0 {
        ColorName::Purple
    } else {
        ColorName::Pink
    }
}

/// `#rrggbb`, lowercase and zero-padded.
pub fn hex_color(rgb: Srgb<u8>) -> String {
    format!("#{rgb:x}")
}

/// Parse a `#rrggbb` (or `rrggbb`) string back into channels.
pub fn parse_hex(hex: &str) -> Result<Srgb<u8>> {
    hex.parse::<Srgb<u8>>()
        .map_err(|e| Error::Parse(format!("invalid hex color {hex:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(r: u8, g: u8, b: u8) -> Srgb<u8> {
        Srgb::new(r, g, b)
    }

    #[test]
    fn extremes() {
        assert_eq!(classify(rgb(0, 0, 0)), ColorName::Black);
        assert_eq!(classify(rgb(255, 255, 255)), ColorName::White);
        assert_eq!(classify(rgb(255, 0, 0)), ColorName::Red);
    }

    #[test]
    fn gray_ladder_uses_red_channel() {
        assert_eq!(classify(rgb(49, 60, 40)), ColorName::Black);
        assert_eq!(classify(rgb(50, 50, 50)), ColorName::DarkGray);
        assert_eq!(classify(rgb(100, 110, 120)), ColorName::Gray);
        assert_eq!(classify(rgb(150, 150, 150)), ColorName::LightGray);
        assert_eq!(classify(rgb(199, 199, 199)), ColorName::LightGray);
        assert_eq!(classify(rgb(200, 200, 200)), ColorName::White);
    }

    #[test]
    fn low_saturation_uses_value() {
        // spread of 30 escapes the gray test, saturation stays under 20%
        assert_eq!(classify(rgb(200, 230, 215)), ColorName::LightGray);
        assert_eq!(classify(rgb(121, 151, 136)), ColorName::Gray);
    }

    #[test]
    fn hue_bands() {
        assert_eq!(classify(rgb(255, 128, 0)), ColorName::Orange);
        assert_eq!(classify(rgb(255, 255, 0)), ColorName::Yellow);
        assert_eq!(classify(rgb(0, 255, 0)), ColorName::Green);
        assert_eq!(classify(rgb(0, 255, 255)), ColorName::Cyan);
        assert_eq!(classify(rgb(0, 0, 255)), ColorName::Blue);
        assert_eq!(classify(rgb(160, 0, 255)), ColorName::Purple);
        assert_eq!(classify(rgb(255, 0, 128)), ColorName::Pink);
    }

    #[test]
    fn red_wraps_at_345() {
        let edge = rgb(252, 0, 63);
        assert_eq!(Hsv::from_rgb(edge).hue, 345.0);
        assert_eq!(classify(edge), ColorName::Red);

        let below = rgb(255, 0, 65);
        let hue = Hsv::from_rgb(below).hue;
        assert!(hue < 345.0 && hue > 344.0, "hue {hue}");
        assert_eq!(classify(below), ColorName::Pink);
    }

    #[test]
    fn classify_is_total_and_deterministic() {
        for r in (0..=255u8).step_by(5) {
            for g in (0..=255u8).step_by(5) {
                for b in (0..=255u8).step_by(5) {
                    let first = classify(rgb(r, g, b));
                    assert!(ColorName::ALL.contains(&first));
                    assert_eq!(first, classify(rgb(r, g, b)));
                }
            }
        }
    }

    #[test]
    fn hsv_of_primaries() {
        let red = Hsv::from_rgb(rgb(255, 0, 0));
        assert_eq!(
            red,
            Hsv {
                hue: 0.0,
                saturation: 100.0,
                value: 100.0
            }
        );
        assert_eq!(Hsv::from_rgb(rgb(0, 0, 255)).hue, 240.0);
        assert_eq!(Hsv::from_rgb(rgb(255, 255, 0)).hue, 60.0);

        let gray = Hsv::from_rgb(rgb(128, 128, 128)).rounded();
        assert_eq!(gray.hue, 0.0);
        assert_eq!(gray.saturation, 0.0);
        assert_eq!(gray.value, 50.2);
    }

    #[test]
    fn rounding_ties_go_to_even() {
        let hsv = Hsv::from_rgb(rgb(16, 15, 15));
        assert_eq!(hsv.saturation, 6.25);
        let rounded = hsv.rounded();
        assert_eq!(rounded.saturation, 6.2);
        assert_eq!(rounded.value, 6.3);
        assert_eq!(round_tenth(0.35), 0.3);
        assert_eq!(round_tenth(99.96), 100.0);
    }

    #[test]
    fn hex_is_lowercase_and_round_trips() {
        assert_eq!(hex_color(rgb(255, 0, 0)), "#ff0000");
        assert_eq!(hex_color(rgb(1, 10, 171)), "#010aab");

        for (r, g, b) in [(0, 0, 0), (1, 2, 3), (171, 205, 239), (255, 255, 255)] {
            let parsed = parse_hex(&hex_color(rgb(r, g, b))).unwrap();
            assert_eq!((parsed.red, parsed.green, parsed.blue), (r, g, b));
        }
        assert!(parse_hex("#12345").is_err());
    }

    #[test]
    fn names_parse_back() {
        for name in ColorName::ALL {
            assert_eq!(name.to_string().parse::<ColorName>().unwrap(), name);
        }
        assert!("Magenta".parse::<ColorName>().is_err());
    }
}
