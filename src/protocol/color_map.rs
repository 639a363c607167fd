use crate::error::RfbError;

/// One palette entry, already truncated to 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Builds an entry from the wire's 16-bit channels. Only the high byte
    /// of each channel is significant per RFC 6143 Section 7.6.2.
    pub(crate) fn from_wire(r: u16, g: u16, b: u16) -> Self {
        Self {
            r: (r >> 8) as u8,
            g: (g >> 8) as u8,
            b: (b >> 8) as u8,
        }
    }
}

/// The 256-entry palette used when the pixel format is not true-color.
///
/// Entries are populated exclusively by SetColorMapEntries messages, so a
/// fresh connection starts with every slot unset. Decoding a paletted pixel
/// against an unset slot is an error rather than an arbitrary color.
#[derive(Debug, Clone)]
pub struct ColorMap {
    entries: [Option<Color>; 256],
}

impl ColorMap {
    pub fn new() -> Self {
        Self {
            entries: [None; 256],
        }
    }

    pub(crate) fn set(&mut self, index: u16, color: Color) {
        if let Some(slot) = self.entries.get_mut(usize::from(index)) {
            *slot = Some(color);
        }
    }

    /// Resolves a raw pixel value as a palette index.
    pub fn lookup(&self, raw: u32) -> Result<Color, RfbError> {
        usize::try_from(raw)
            .ok()
            .and_then(|idx| self.entries.get(idx))
            .copied()
            .flatten()
            .ok_or(RfbError::PaletteOutOfRange(raw))
    }
}

impl Default for ColorMap {
    fn default() -> Self {
        Self::new()
    }
}
