//! Construction time settings for a [`LedMatrix`](crate::LedMatrix).

use crate::text::{CharWidth, TextAlignment};

/// Display configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DisplayConfig {
    /// Number of chained 8x8 modules
    pub devices: usize,
    /// Brightness sent by `init`, 0-15
    pub intensity: u8,
    pub alignment: TextAlignment,
    pub char_width: CharWidth,
    /// Transpose glyphs for modules mounted at 90 degrees
    pub rotate: bool,
    /// Extra columns text travels past the edge before a scroll cycle restarts
    pub exit_margin: i32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            devices: 1,
            intensity: 0x07,
            alignment: TextAlignment::LeftEnd,
            char_width: CharWidth::Fixed(8),
            rotate: false,
            exit_margin: 0,
        }
    }
}

impl DisplayConfig {
    pub fn new(devices: usize) -> Self {
        Self {
            devices,
            ..Self::default()
        }
    }

    pub fn intensity(mut self, intensity: u8) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn alignment(mut self, alignment: TextAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn char_width(mut self, char_width: CharWidth) -> Self {
        self.char_width = char_width;
        self
    }

    pub fn rotate(mut self, rotate: bool) -> Self {
        self.rotate = rotate;
        self
    }

    pub fn exit_margin(mut self, exit_margin: i32) -> Self {
        self.exit_margin = exit_margin;
        self
    }

    /// Display width in columns
    pub fn width(&self) -> usize {
        self.devices * crate::framebuffer::COLUMNS_PER_DEVICE
    }
}
