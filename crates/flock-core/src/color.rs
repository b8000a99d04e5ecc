//! Color helpers backing telemetry and trail rendering.
//!
//! The physics never touches these; they exist so the driver can turn a
//! user-supplied hex color into the resolved `rgba(...)` strings the
//! telemetry reports and the trail polyline fades through.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Trail hues are steered out of this band so trails stay readable
// against the default background.
const HUE_BAND_MIN: f64 = 220.0;
const HUE_BAND_MAX: f64 = 280.0;

/// Errors raised when parsing a hex color.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("hex color must be six digits, optionally prefixed with '#'")]
    InvalidLength,
    #[error("hex color contains a non-hexadecimal digit")]
    InvalidDigit,
}

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Construct a color from channel values.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RRGGBB` string (the `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ColorError::InvalidLength);
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ColorError::InvalidDigit)
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Convert to HSL (hue in degrees, saturation/lightness in percent).
    #[must_use]
    pub fn to_hsl(self) -> Hsl {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;
        let l = (max + min) / 2.0;

        let mut h = 0.0;
        let mut s = 0.0;
        if delta != 0.0 {
            s = delta / (1.0 - (2.0 * l - 1.0).abs());
            h = if max == r {
                ((g - b) / delta).rem_euclid(6.0)
            } else if max == g {
                (b - r) / delta + 2.0
            } else {
                (r - g) / delta + 4.0
            };
            h *= 60.0;
        }

        Hsl {
            h,
            s: s * 100.0,
            l: l * 100.0,
        }
    }
}

/// HSL color; hue in `[0, 360)`, saturation and lightness in `[0, 100]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    /// Convert back to 8-bit RGB.
    #[must_use]
    pub fn to_rgb(self) -> Rgb {
        let h = self.h.rem_euclid(360.0);
        let s = self.s / 100.0;
        let l = self.l / 100.0;

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
        let m = l - c / 2.0;

        let (r1, g1, b1) = if h < 60.0 {
            (c, x, 0.0)
        } else if h < 120.0 {
            (x, c, 0.0)
        } else if h < 180.0 {
            (0.0, c, x)
        } else if h < 240.0 {
            (0.0, x, c)
        } else if h < 300.0 {
            (x, 0.0, c)
        } else {
            (c, 0.0, x)
        };

        Rgb {
            r: ((r1 + m) * 255.0).round() as u8,
            g: ((g1 + m) * 255.0).round() as u8,
            b: ((b1 + m) * 255.0).round() as u8,
        }
    }
}

/// Steer a hue out of the reserved band, wrapping as needed.
fn trail_hue(hue: f64) -> f64 {
    if hue > HUE_BAND_MIN && hue < HUE_BAND_MAX {
        (hue + (HUE_BAND_MAX - hue) + HUE_BAND_MIN).rem_euclid(360.0)
    } else {
        (hue + 100.0).rem_euclid(360.0)
    }
}

/// Derive a trail color from the base boid color.
///
/// The hue is rotated away from the base color, and near-black inputs
/// get a lightness floor so trails never vanish.
#[must_use]
pub fn trail_color(base: Rgb) -> Rgb {
    let hsl = base.to_hsl();
    let h = trail_hue(hsl.h);
    if hsl.l < 17.0 {
        Hsl {
            h,
            s: hsl.s,
            l: (hsl.l + 20.0).min(100.0),
        }
        .to_rgb()
    } else {
        Hsl { h, ..hsl }.to_rgb()
    }
}

/// Render a color as an `rgba(...)` string with the given opacity.
#[must_use]
pub fn rgba_string(color: Rgb, opacity: f64) -> String {
    format!("rgba({},{},{},{})", color.r, color.g, color.b, opacity)
}

/// Render a color faded by trail age: alpha is `opacity * (1 - fade)`.
#[must_use]
pub fn faded_rgba(color: Rgb, opacity: f64, fade: f64) -> String {
    rgba_string_alpha(color, opacity * (1.0 - fade))
}

fn rgba_string_alpha(color: Rgb, alpha: f64) -> String {
    format!("rgba({},{},{},{})", color.r, color.g, color.b, alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_with_and_without_prefix() {
        assert_eq!(Rgb::from_hex("#E0177B"), Ok(Rgb::new(224, 23, 123)));
        assert_eq!(Rgb::from_hex("ffffff"), Ok(Rgb::new(255, 255, 255)));
        assert_eq!(Rgb::from_hex("#000000"), Ok(Rgb::new(0, 0, 0)));
    }

    #[test]
    fn rejects_malformed_hex() {
        assert_eq!(Rgb::from_hex("#fff"), Err(ColorError::InvalidLength));
        assert_eq!(Rgb::from_hex("#gggggg"), Err(ColorError::InvalidDigit));
        assert_eq!(Rgb::from_hex(""), Err(ColorError::InvalidLength));
    }

    #[test]
    fn hsl_round_trip_is_stable() {
        for hex in ["#E0177B", "#1E90FF", "#00FF00", "#123456"] {
            let rgb = Rgb::from_hex(hex).expect("hex");
            let back = rgb.to_hsl().to_rgb();
            // Quantization allows one count of drift per channel.
            assert!((i16::from(rgb.r) - i16::from(back.r)).abs() <= 1, "{hex} red");
            assert!((i16::from(rgb.g) - i16::from(back.g)).abs() <= 1, "{hex} green");
            assert!((i16::from(rgb.b) - i16::from(back.b)).abs() <= 1, "{hex} blue");
        }
    }

    #[test]
    fn trail_hue_leaves_reserved_band() {
        for base_hue in [0.0, 90.0, 219.0, 240.0, 260.0, 279.0, 300.0, 359.0] {
            let shifted = trail_hue(base_hue);
            assert!(
                !(shifted > HUE_BAND_MIN && shifted < HUE_BAND_MAX),
                "hue {base_hue} shifted into the reserved band ({shifted})"
            );
        }
    }

    #[test]
    fn near_black_trail_color_gains_lightness() {
        let dark = Rgb::new(10, 10, 10);
        let trail = trail_color(dark);
        assert!(trail.to_hsl().l > dark.to_hsl().l);
    }

    #[test]
    fn rgba_strings_carry_opacity() {
        let color = Rgb::new(224, 23, 123);
        assert_eq!(rgba_string(color, 0.75), "rgba(224,23,123,0.75)");
        assert_eq!(faded_rgba(color, 1.0, 0.5), "rgba(224,23,123,0.5)");
    }
}
