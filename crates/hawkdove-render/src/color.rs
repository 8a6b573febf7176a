//! Colours, palettes and colormaps.
//!
//! Colours are configured as `#RRGGBB` strings. A [`Palette`] cycles through
//! a list; a [`Colormap`] interpolates linearly between evenly spaced stops.

use std::fmt;
use std::str::FromStr;

use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// An opaque colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Black.
    pub const BLACK: Self = Self(0, 0, 0);

    /// Convert for drawing.
    pub const fn to_plotters(self) -> RGBColor {
        RGBColor(self.0, self.1, self.2)
    }

    /// Linear blend towards `other`; `t` is clamped to `[0, 1]`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        // Result stays within [0, 255] because t is clamped.
        let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Self(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

impl FromStr for Rgb {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RenderError::InvalidData(format!("colour {s:?} is not #RRGGBB"));
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|digits| u8::from_str_radix(digits, 16).ok())
                .ok_or_else(invalid)
        };
        Ok(Self(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = RenderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(rgb: Rgb) -> Self {
        rgb.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// A list of colours assigned to series in order, wrapping around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(Vec<Rgb>);

impl Palette {
    /// Build from colours. An empty list draws everything black.
    pub const fn new(colors: Vec<Rgb>) -> Self {
        Self(colors)
    }

    /// Colour of the `index`-th series.
    pub fn color(&self, index: usize) -> Rgb {
        index
            .checked_rem(self.0.len())
            .and_then(|i| self.0.get(i))
            .copied()
            .unwrap_or(Rgb::BLACK)
    }

    /// The colours.
    pub fn colors(&self) -> &[Rgb] {
        &self.0
    }

    /// One colour per rank/network regime.
    pub fn regimes() -> Self {
        Self(vec![
            Rgb(0xB8, 0xE1, 0x83),
            Rgb(0x4C, 0xAC, 0x26),
            Rgb(0xF2, 0xB6, 0xDA),
            Rgb(0xD0, 0x1C, 0x8A),
        ])
    }

    /// Five-step yellow-orange-brown ramp for population sizes.
    pub fn populations() -> Self {
        Self(vec![
            Rgb(0xFE, 0xE3, 0x91),
            Rgb(0xFE, 0xC4, 0x4F),
            Rgb(0xFE, 0x99, 0x29),
            Rgb(0xD9, 0x5F, 0x0E),
            Rgb(0x99, 0x34, 0x04),
        ])
    }

    /// Line colours of the agent cycle figure.
    pub fn cycles() -> Self {
        Self(vec![
            Rgb(0x00, 0x00, 0x00),
            Rgb(0x00, 0x80, 0x00),
            Rgb(0xFF, 0xA5, 0x00),
            Rgb(0xFF, 0x00, 0xFF),
            Rgb(0x00, 0x00, 0xFF),
            Rgb(0xFF, 0x00, 0x00),
        ])
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::regimes()
    }
}

/// Evenly spaced colour stops with linear interpolation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Colormap(Vec<Rgb>);

/// Magma, dark to light.
const MAGMA: [Rgb; 10] = [
    Rgb(0x00, 0x00, 0x04),
    Rgb(0x18, 0x0F, 0x3D),
    Rgb(0x44, 0x0F, 0x76),
    Rgb(0x72, 0x1F, 0x81),
    Rgb(0x9E, 0x2F, 0x7F),
    Rgb(0xCD, 0x40, 0x71),
    Rgb(0xF1, 0x60, 0x5D),
    Rgb(0xFD, 0x96, 0x68),
    Rgb(0xFE, 0xCA, 0x8D),
    Rgb(0xFC, 0xFD, 0xBF),
];

impl Colormap {
    /// Build from stops. At least one stop is required.
    ///
    /// # Errors
    ///
    /// [`RenderError::InvalidData`] for an empty stop list.
    pub fn new(stops: Vec<Rgb>) -> crate::Result<Self> {
        if stops.is_empty() {
            return Err(RenderError::InvalidData("colormap has no stops".to_owned()));
        }
        Ok(Self(stops))
    }

    /// Magma, light to dark: low values pale, high values near black.
    pub fn magma_r() -> Self {
        let mut stops = MAGMA.to_vec();
        stops.reverse();
        Self(stops)
    }

    /// Colour at `t` in `[0, 1]`; out-of-range and NaN values clamp.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn sample(&self, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let segments = self.0.len().saturating_sub(1);
        if segments == 0 {
            return self.0.first().copied().unwrap_or(Rgb::BLACK);
        }
        let scaled = t * segments as f64;
        // floor of a value in [0, segments]
        let lower = (scaled.floor() as usize).min(segments.saturating_sub(1));
        let frac = scaled - lower as f64;
        match (self.0.get(lower), self.0.get(lower.saturating_add(1))) {
            (Some(a), Some(b)) => a.lerp(*b, frac),
            (Some(a), None) => *a,
            _ => Rgb::BLACK,
        }
    }

    /// Colour of `value` within `domain`.
    pub fn map(&self, value: f64, domain: (f64, f64)) -> Rgb {
        let span = domain.1 - domain.0;
        if span > 0.0 {
            self.sample((value - domain.0) / span)
        } else {
            self.sample(0.0)
        }
    }
}

impl Default for Colormap {
    fn default() -> Self {
        Self::magma_r()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_prints_hex() {
        let rgb: Rgb = "#d01c8a".parse().unwrap();
        assert_eq!(rgb, Rgb(0xD0, 0x1C, 0x8A));
        assert_eq!(rgb.to_string(), "#D01C8A");
        assert!("D01C8A".parse::<Rgb>().is_err());
        assert!("#D01C8".parse::<Rgb>().is_err());
        assert!("#GG1C8A".parse::<Rgb>().is_err());
    }

    #[test]
    fn palette_cycles() {
        let palette = Palette::regimes();
        assert_eq!(palette.color(4), palette.color(0));
        assert_eq!(Palette::new(Vec::new()).color(3), Rgb::BLACK);
    }

    #[test]
    fn colormap_endpoints_and_midpoint() {
        let map = Colormap::new(vec![Rgb(0, 0, 0), Rgb(200, 100, 50)]).unwrap();
        assert_eq!(map.sample(0.0), Rgb(0, 0, 0));
        assert_eq!(map.sample(1.0), Rgb(200, 100, 50));
        assert_eq!(map.sample(0.5), Rgb(100, 50, 25));
        assert_eq!(map.sample(7.0), Rgb(200, 100, 50));
        assert_eq!(map.map(5.0, (0.0, 10.0)), Rgb(100, 50, 25));
        assert!(Colormap::new(Vec::new()).is_err());
    }

    #[test]
    fn magma_r_starts_light() {
        let map = Colormap::magma_r();
        assert_eq!(map.sample(0.0), Rgb(0xFC, 0xFD, 0xBF));
        assert_eq!(map.sample(1.0), Rgb(0x00, 0x00, 0x04));
    }

    #[test]
    fn palette_deserialises_from_hex_list() {
        let palette: Palette = serde_json::from_str(r##"["#000000", "#FFFFFF"]"##).unwrap();
        assert_eq!(palette.color(1), Rgb(255, 255, 255));
    }
}
