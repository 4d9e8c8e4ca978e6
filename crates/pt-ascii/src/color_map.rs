/// First index of the 24-step grayscale ramp in the 256-color palette.
pub const RAMP_START: u8 = 232;

/// Last index of the ramp.
pub const RAMP_END: u8 = 255;

/// Map a luminance value to the ANSI 256-color grayscale ramp (232–255).
///
/// # Example
/// ```
/// use pt_ascii::color_map::gray_to_ramp;
/// assert_eq!(gray_to_ramp(0), 232);
/// assert_eq!(gray_to_ramp(255), 255);
/// assert_eq!(gray_to_ramp(128), 243);
/// ```
#[inline(always)]
#[must_use]
pub fn gray_to_ramp(v: u8) -> u8 {
    match v {
        0 => RAMP_START,
        255 => RAMP_END,
        v => RAMP_START + (u16::from(v) * 23 / 255) as u8,
    }
}

/// Lookup table luminance [0..255] → index de rampe.
///
/// Pre-computed once per render for O(1) per-pixel cost.
///
/// # Example
/// ```
/// use pt_ascii::color_map::{gray_to_ramp, RampLut};
/// let lut = RampLut::new();
/// assert_eq!(lut.map(200), gray_to_ramp(200));
/// ```
pub struct RampLut {
    lut: [u8; 256],
}

impl RampLut {
    /// Build the table from [`gray_to_ramp`].
    #[must_use]
    pub fn new() -> Self {
        let mut lut = [RAMP_START; 256];
        for (v, slot) in lut.iter_mut().enumerate() {
            *slot = gray_to_ramp(v as u8);
        }
        Self { lut }
    }

    /// Ramp index for a luminance value.
    #[inline(always)]
    #[must_use]
    pub fn map(&self, luminance: u8) -> u8 {
        self.lut[luminance as usize]
    }
}

impl Default for RampLut {
    fn default() -> Self {
        Self::new()
    }
}
