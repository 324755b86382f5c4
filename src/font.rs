//! Glyph tables used to render text into the frame buffer.

/// A source of 8x8 column glyphs.
///
/// Each glyph is eight column bytes, leftmost column first, bit 0 being the top row.
pub trait Font {
    /// Column pattern for `ch`. Characters the font does not cover should map to a
    /// placeholder glyph rather than panic.
    fn glyph(&self, ch: char) -> [u8; 8];

    /// Number of lit columns in the glyph for `ch`, not counting trailing spacing.
    ///
    /// The default implementation scans the glyph for its last non-empty column.
    fn glyph_width(&self, ch: char) -> u8 {
        let glyph = self.glyph(ch);
        glyph
            .iter()
            .rposition(|column| *column != 0)
            .map(|last| last as u8 + 1)
            .unwrap_or(0)
    }
}

impl<F: Font + ?Sized> Font for &F {
    fn glyph(&self, ch: char) -> [u8; 8] {
        (**self).glyph(ch)
    }

    fn glyph_width(&self, ch: char) -> u8 {
        (**self).glyph_width(ch)
    }
}

/// Classic 5x7 ASCII font covering ' ' (0x20) to '~' (0x7E).
///
/// Anything outside that range is drawn as '?'.
#[derive(Debug, Default, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Font5x7;

/// Width used for the space character, which has no lit columns.
const SPACE_WIDTH: u8 = 3;

const FIRST: u8 = b' ';
const LAST: u8 = b'~';

impl Font5x7 {
    fn index(ch: char) -> usize {
        match ch {
            ' '..='~' => (ch as u8 - FIRST) as usize,
            _ => (b'?' - FIRST) as usize,
        }
    }
}

impl Font for Font5x7 {
    fn glyph(&self, ch: char) -> [u8; 8] {
        let columns = ASCII5X7[Self::index(ch)];
        let mut glyph = [0; 8];
        glyph[..5].copy_from_slice(&columns);
        glyph
    }

    fn glyph_width(&self, ch: char) -> u8 {
        if ch == ' ' {
            return SPACE_WIDTH;
        }
        let columns = ASCII5X7[Self::index(ch)];
        columns
            .iter()
            .rposition(|column| *column != 0)
            .map(|last| last as u8 + 1)
            .unwrap_or(SPACE_WIDTH)
    }
}

const GLYPHS: usize = (LAST - FIRST + 1) as usize;

#[rustfmt::skip]
const ASCII5X7: [[u8; 5]; GLYPHS] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // !
    [0x00, 0x07, 0x00, 0x07, 0x00], // "
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // #
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // $
    [0x23, 0x13, 0x08, 0x64, 0x62], // %
    [0x36, 0x49, 0x55, 0x22, 0x50], // &
    [0x00, 0x05, 0x03, 0x00, 0x00], // '
    [0x00, 0x1C, 0x22, 0x41, 0x00], // (
    [0x00, 0x41, 0x22, 0x1C, 0x00], // )
    [0x14, 0x08, 0x3E, 0x08, 0x14], // *
    [0x08, 0x08, 0x3E, 0x08, 0x08], // +
    [0x00, 0x50, 0x30, 0x00, 0x00], // ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // -
    [0x00, 0x60, 0x60, 0x00, 0x00], // .
    [0x20, 0x10, 0x08, 0x04, 0x02], // /
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // 0
    [0x00, 0x42, 0x7F, 0x40, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 2
    [0x21, 0x41, 0x45, 0x4B, 0x31], // 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1E], // 9
    [0x00, 0x36, 0x36, 0x00, 0x00], // :
    [0x00, 0x56, 0x36, 0x00, 0x00], // ;
    [0x08, 0x14, 0x22, 0x41, 0x00], // <
    [0x14, 0x14, 0x14, 0x14, 0x14], // =
    [0x00, 0x41, 0x22, 0x14, 0x08], // >
    [0x02, 0x01, 0x51, 0x09, 0x06], // ?
    [0x32, 0x49, 0x79, 0x41, 0x3E], // @
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // A
    [0x7F, 0x49, 0x49, 0x49, 0x36], // B
    [0x3E, 0x41, 0x41, 0x41, 0x22], // C
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // D
    [0x7F, 0x49, 0x49, 0x49, 0x41], // E
    [0x7F, 0x09, 0x09, 0x09, 0x01], // F
    [0x3E, 0x41, 0x49, 0x49, 0x7A], // G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // H
    [0x00, 0x41, 0x7F, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3F, 0x01], // J
    [0x7F, 0x08, 0x14, 0x22, 0x41], // K
    [0x7F, 0x40, 0x40, 0x40, 0x40], // L
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], // M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // N
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // O
    [0x7F, 0x09, 0x09, 0x09, 0x06], // P
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], // R
    [0x46, 0x49, 0x49, 0x49, 0x31], // S
    [0x01, 0x01, 0x7F, 0x01, 0x01], // T
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // U
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // V
    [0x3F, 0x40, 0x38, 0x40, 0x3F], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x07, 0x08, 0x70, 0x08, 0x07], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
    [0x00, 0x7F, 0x41, 0x41, 0x00], // [
    [0x02, 0x04, 0x08, 0x10, 0x20], // \
    [0x00, 0x41, 0x41, 0x7F, 0x00], // ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // _
    [0x00, 0x01, 0x02, 0x04, 0x00], // `
    [0x20, 0x54, 0x54, 0x54, 0x78], // a
    [0x7F, 0x48, 0x44, 0x44, 0x38], // b
    [0x38, 0x44, 0x44, 0x44, 0x20], // c
    [0x38, 0x44, 0x44, 0x48, 0x7F], // d
    [0x38, 0x54, 0x54, 0x54, 0x18], // e
    [0x08, 0x7E, 0x09, 0x01, 0x02], // f
    [0x0C, 0x52, 0x52, 0x52, 0x3E], // g
    [0x7F, 0x08, 0x04, 0x04, 0x78], // h
    [0x00, 0x44, 0x7D, 0x40, 0x00], // i
    [0x20, 0x40, 0x44, 0x3D, 0x00], // j
    [0x7F, 0x10, 0x28, 0x44, 0x00], // k
    [0x00, 0x41, 0x7F, 0x40, 0x00], // l
    [0x7C, 0x04, 0x18, 0x04, 0x78], // m
    [0x7C, 0x08, 0x04, 0x04, 0x78], // n
    [0x38, 0x44, 0x44, 0x44, 0x38], // o
    [0x7C, 0x14, 0x14, 0x14, 0x08], // p
    [0x08, 0x14, 0x14, 0x18, 0x7C], // q
    [0x7C, 0x08, 0x04, 0x04, 0x08], // r
    [0x48, 0x54, 0x54, 0x54, 0x20], // s
    [0x04, 0x3F, 0x44, 0x40, 0x20], // t
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // u
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // v
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // w
    [0x44, 0x28, 0x10, 0x28, 0x44], // x
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // y
    [0x44, 0x64, 0x54, 0x4C, 0x44], // z
    [0x00, 0x08, 0x36, 0x41, 0x00], // {
    [0x00, 0x00, 0x7F, 0x00, 0x00], // |
    [0x00, 0x41, 0x36, 0x08, 0x00], // }
    [0x10, 0x08, 0x08, 0x10, 0x08], // ~
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_is_padded_to_eight_columns() {
        let glyph = Font5x7.glyph('A');
        assert_eq!(glyph, [0x7E, 0x11, 0x11, 0x11, 0x7E, 0, 0, 0]);
    }

    #[test]
    fn glyph_width_ignores_trailing_blank_columns() {
        assert_eq!(Font5x7.glyph_width('A'), 5);
        assert_eq!(Font5x7.glyph_width('1'), 4);
        assert_eq!(Font5x7.glyph_width('.'), 3);
    }

    #[test]
    fn space_has_a_fixed_width() {
        assert_eq!(Font5x7.glyph(' '), [0; 8]);
        assert_eq!(Font5x7.glyph_width(' '), SPACE_WIDTH);
    }

    #[test]
    fn unsupported_characters_fall_back_to_question_mark() {
        assert_eq!(Font5x7.glyph('\u{e9}'), Font5x7.glyph('?'));
        assert_eq!(Font5x7.glyph('\n'), Font5x7.glyph('?'));
    }

    #[test]
    fn default_glyph_width_scans_the_glyph() {
        struct Bar;
        impl Font for Bar {
            fn glyph(&self, _ch: char) -> [u8; 8] {
                [0xFF, 0, 0xFF, 0, 0, 0, 0, 0]
            }
        }
        assert_eq!(Bar.glyph_width('x'), 3);
        assert_eq!((&Bar).glyph_width('x'), 3);
    }
}
