//! Text layout and scroll state.
//!
//! Positions are in display columns. The leftmost column of text is drawn at
//! `alignment_offset + offset`, where the alignment offset is fixed per text and the
//! scroll offset is what the scroll and oscillate steps move.

use crate::font::Font;
use crate::framebuffer::FrameBuffer;

/// Where text sits before any scrolling happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextAlignment {
    /// Text starts at the left edge of the display
    Left,
    /// Text starts just past the right edge of the display
    #[default]
    LeftEnd,
    /// Text ends at the right edge of the display
    Right,
    /// Text ends just before the left edge of the display
    RightEnd,
}

/// Horizontal advance of each character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CharWidth {
    /// Every character takes the same number of columns, spacing included
    Fixed(u8),
    /// Glyph width plus one blank column
    Proportional,
}

impl Default for CharWidth {
    fn default() -> Self {
        CharWidth::Fixed(8)
    }
}

/// Borrowed text plus everything needed to place it on the display.
///
/// Text is never copied: `set_text` and `set_next_text` keep a reference, so the
/// caller's buffer has to outlive the renderer. Completing a scroll cycle moves the
/// next text reference into the current slot.
#[derive(Debug, Clone)]
pub struct TextRenderer<'a> {
    text: &'a str,
    next_text: Option<&'a str>,
    offset: i32,
    alignment_offset: i32,
    increment: i32,
    text_len: i32,
    display_width: i32,
    alignment: TextAlignment,
    char_width: CharWidth,
    exit_margin: i32,
}

impl<'a> TextRenderer<'a> {
    pub fn new(display_width: usize) -> Self {
        TextRenderer {
            text: "",
            next_text: None,
            offset: 0,
            alignment_offset: display_width as i32,
            increment: -1,
            text_len: 0,
            display_width: display_width as i32,
            alignment: TextAlignment::default(),
            char_width: CharWidth::default(),
            exit_margin: 0,
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn next_text(&self) -> Option<&'a str> {
        self.next_text
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }

    pub fn alignment_offset(&self) -> i32 {
        self.alignment_offset
    }

    pub fn alignment(&self) -> TextAlignment {
        self.alignment
    }

    pub fn char_width(&self) -> CharWidth {
        self.char_width
    }

    /// Total width of the current text in columns.
    pub fn text_pixel_len(&self) -> i32 {
        self.text_len
    }

    /// Current scroll direction of `oscillate`, `1` or `-1`.
    pub fn increment(&self) -> i32 {
        self.increment
    }

    /// Replace the current text and rewind the scroll position.
    pub fn set_text<F: Font>(&mut self, text: &'a str, font: &F) {
        self.text = text;
        self.offset = 0;
        self.recalculate(font);
    }

    /// Text that replaces the current one once a scroll cycle completes.
    pub fn set_next_text(&mut self, text: &'a str) {
        self.next_text = Some(text);
    }

    pub fn set_alignment<F: Font>(&mut self, alignment: TextAlignment, font: &F) {
        self.alignment = alignment;
        self.recalculate(font);
    }

    pub fn set_char_width<F: Font>(&mut self, char_width: CharWidth, font: &F) {
        self.char_width = char_width;
        self.recalculate(font);
    }

    /// Extra columns of travel added to every scroll cycle. Zero restarts after
    /// exactly `display width + text width` steps.
    pub fn set_exit_margin(&mut self, margin: i32) {
        self.exit_margin = margin;
    }

    /// Steps from the alignment start until a scroll cycle restarts, in either
    /// direction.
    pub fn cycle_len(&self) -> i32 {
        self.display_width + self.text_len + self.exit_margin
    }

    fn advance<F: Font>(&self, ch: char, font: &F) -> i32 {
        match self.char_width {
            CharWidth::Fixed(width) => width as i32,
            CharWidth::Proportional => font.glyph_width(ch) as i32 + 1,
        }
    }

    fn recalculate<F: Font>(&mut self, font: &F) {
        self.text_len = self.text.chars().map(|ch| self.advance(ch, font)).sum();
        self.alignment_offset = match self.alignment {
            TextAlignment::Left => 0,
            TextAlignment::LeftEnd => self.display_width,
            TextAlignment::Right => self.display_width - self.text_len,
            TextAlignment::RightEnd => -self.text_len,
        };
    }

    /// Leftmost column of the text on the display.
    pub fn position(&self) -> i32 {
        self.alignment_offset + self.offset
    }

    /// Clear `fb` and draw the visible part of the text at the current position.
    pub fn draw<F: Font>(&self, fb: &mut FrameBuffer, font: &F, rotate: bool) {
        fb.clear();
        let mut x = self.position();
        for ch in self.text.chars() {
            if x >= self.display_width {
                break;
            }
            let advance = self.advance(ch, font);
            if x + advance > 0 {
                let width = advance.clamp(0, 8) as u8;
                fb.set_custom_char(x, width, &font.glyph(ch), rotate);
            }
            x += advance;
        }
    }

    /// Move the text one column left. Returns `true` when the text has travelled a
    /// full cycle and restarted from the alignment start.
    pub fn scroll_left<F: Font>(&mut self, font: &F) -> bool {
        self.offset -= 1;
        if -self.offset >= self.cycle_len() {
            self.restart_cycle(font);
            return true;
        }
        false
    }

    /// Move the text one column right. Returns `true` when the text has travelled a
    /// full cycle and restarted from the alignment start.
    pub fn scroll_right<F: Font>(&mut self, font: &F) -> bool {
        self.offset += 1;
        if self.offset >= self.cycle_len() {
            self.restart_cycle(font);
            return true;
        }
        false
    }

    fn restart_cycle<F: Font>(&mut self, font: &F) {
        self.offset = 0;
        if let Some(next) = self.next_text.take() {
            self.text = next;
            self.recalculate(font);
        }
    }

    /// Move the text one column towards the current limit, reversing at the limits.
    ///
    /// The limits are the positions where the text touches the left edge and where
    /// it touches the right edge. Text exactly as wide as the display has nowhere
    /// to go and stays put.
    pub fn oscillate(&mut self) {
        let right_aligned = self.display_width - self.text_len;
        let lo = right_aligned.min(0);
        let hi = right_aligned.max(0);
        if lo == hi {
            return;
        }

        self.offset += self.increment;
        let position = self.position();
        if position <= lo {
            self.increment = 1;
        } else if position >= hi {
            self.increment = -1;
        }
    }
}
