use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Poids de luminance (ITU-R BT.601, entiers sur 1000).
pub const LUMA_WEIGHTS: (u32, u32, u32) = (299, 587, 114);

/// Luminance entière d'un triplet RGB : `floor((R×299 + G×587 + B×114) / 1000)`.
///
/// # Example
/// ```
/// use pt_core::color::luma;
/// assert_eq!(luma(255, 255, 255), 255);
/// assert_eq!(luma(255, 0, 0), 76);
/// assert_eq!(luma(0, 0, 0), 0);
/// ```
#[inline(always)]
#[must_use]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let (wr, wg, wb) = LUMA_WEIGHTS;
    ((u32::from(r) * wr + u32::from(g) * wg + u32::from(b) * wb) / 1000) as u8
}

/// Alpha-composite a luminance value over a background luminance.
///
/// Opaque and fully transparent samples short-circuit so the blend never
/// rounds them away from their exact values.
///
/// # Example
/// ```
/// use pt_core::color::composite;
/// assert_eq!(composite(200, 255, 10), 200);
/// assert_eq!(composite(200, 0, 10), 10);
/// assert_eq!(composite(255, 128, 0), 128);
/// ```
#[inline(always)]
#[must_use]
pub fn composite(value: u8, alpha: u8, background: u8) -> u8 {
    match alpha {
        255 => value,
        0 => background,
        a => {
            let a = u32::from(a);
            ((u32::from(value) * a + u32::from(background) * (255 - a)) / 255) as u8
        }
    }
}

/// Couleur de fond RGB utilisée pour composer les pixels semi-transparents.
///
/// Parses from `"R,G,B"` or `"#rrggbb"`.
///
/// # Example
/// ```
/// use pt_core::color::Rgb;
/// let bg: Rgb = "#ff8000".parse().unwrap();
/// assert_eq!(bg, Rgb(255, 128, 0));
/// let bg: Rgb = "10, 20, 30".parse().unwrap();
/// assert_eq!(bg.luma(), 18);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Black, the default terminal background.
    pub const BLACK: Self = Self(0, 0, 0);

    /// Luminance of this color with the same weights as image pixels.
    #[must_use]
    pub fn luma(self) -> u8 {
        luma(self.0, self.1, self.2)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self(r, g, b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.0, self.1, self.2)
    }
}

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(format!("invalid hex color: {s}"));
            }
            let channel = |i: usize| {
                u8::from_str_radix(&hex[i..i + 2], 16)
                    .map_err(|_| format!("invalid hex color: {s}"))
            };
            return Ok(Self(channel(0)?, channel(2)?, channel(4)?));
        }

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [r, g, b] = parts.as_slice() else {
            return Err(format!("expected R,G,B or #rrggbb, got: {s}"));
        };
        let channel = |v: &str| {
            v.parse::<u8>()
                .map_err(|_| format!("channel out of range [0, 255]: {v}"))
        };
        Ok(Self(channel(*r)?, channel(*g)?, channel(*b)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luma_floor_division() {
        // 10*299 + 20*587 + 30*114 = 18150
        assert_eq!(luma(10, 20, 30), 18);
        assert_eq!(luma(0, 255, 0), 149);
        assert_eq!(luma(0, 0, 255), 29);
    }

    #[test]
    fn composite_is_monotonic_in_alpha() {
        let mut prev = composite(255, 0, 0);
        for a in 1..=255u8 {
            let v = composite(255, a, 0);
            assert!(v >= prev, "composite not monotonic at alpha {a}");
            prev = v;
        }
        assert_eq!(prev, 255);
    }

    #[test]
    fn composite_half_alpha_floors() {
        // (100*128 + 50*127) / 255 = 75.09...
        assert_eq!(composite(100, 128, 50), 75);
    }

    #[test]
    fn rgb_parse_rejects_garbage() {
        assert!("1,2".parse::<Rgb>().is_err());
        assert!("1,2,300".parse::<Rgb>().is_err());
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("#gg0000".parse::<Rgb>().is_err());
        assert_eq!("0,0,0".parse::<Rgb>(), Ok(Rgb::BLACK));
    }

    #[test]
    fn rgb_parse_errors_are_english() {
        assert_eq!(
            "#12345".parse::<Rgb>(),
            Err("invalid hex color: #12345".to_owned())
        );
        assert_eq!(
            "1,2".parse::<Rgb>(),
            Err("expected R,G,B or #rrggbb, got: 1,2".to_owned())
        );
        assert_eq!(
            "1,2,300".parse::<Rgb>(),
            Err("channel out of range [0, 255]: 300".to_owned())
        );
    }

    #[test]
    fn rgb_display_roundtrips_through_parse() {
        let c = Rgb(1, 22, 233);
        assert_eq!(c.to_string().parse::<Rgb>(), Ok(c));
    }
}
