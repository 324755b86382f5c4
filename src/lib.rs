#![cfg_attr(not(test), no_std)]

// This is a driver for a row of MAX7219 chips, each connected to an 8x8 LED dot matrix, that
// treats the whole chain as one display. It keeps a column frame buffer, renders scrolling or
// oscillating text into it and pushes it to the chain over SPI.
// see http://www.gammon.com.au/forum/?id=11516 a description of this chip and uses
// see also https://github.com/nickgammon/MAX7219

extern crate embedded_hal;
use embedded_hal::blocking::spi::Write;
use embedded_hal::digital::v2::OutputPin;

pub mod config;
pub mod font;
pub mod framebuffer;
pub mod text;
pub mod transport;

pub use config::DisplayConfig;
pub use font::{Font, Font5x7};
pub use framebuffer::{FrameBuffer, MAX_DEVICES};
pub use text::{CharWidth, TextAlignment, TextRenderer};
pub use transport::Transport;

#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<SpiError, PinError> {
    /// SPI communication error
    Spi(SpiError),
    /// CS output pin error
    Pin(PinError),
    /// device count should be between 1 and MAX_DEVICES
    InvalidDeviceCount,
    /// device index should be less than the device count
    InvalidDevice,
}

/// max7219 register addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    Noop = 0x00,
    Digit0 = 0x01,
    Digit1 = 0x02,
    Digit2 = 0x03,
    Digit3 = 0x04,
    Digit4 = 0x05,
    Digit5 = 0x06,
    Digit6 = 0x07,
    Digit7 = 0x08,
    DecodeMode = 0x09,
    /// Intensity of the light 0-15
    Intensity = 0x0A,
    ScanLimit = 0x0B,
    /// 0 = shutdown, 1 = normal operation
    Shutdown = 0x0C,
    DisplayTest = 0x0F,
}

impl Command {
    /// Digit register for column `digit` (0-7) of a device. Wraps past 7.
    pub fn digit(digit: u8) -> Command {
        match digit & 0x07 {
            0 => Command::Digit0,
            1 => Command::Digit1,
            2 => Command::Digit2,
            3 => Command::Digit3,
            4 => Command::Digit4,
            5 => Command::Digit5,
            6 => Command::Digit6,
            _ => Command::Digit7,
        }
    }
}

impl From<Command> for u8 {
    fn from(command: Command) -> u8 {
        command as u8
    }
}

/// A chain of 8x8 modules driven as one display.
///
/// Drawing calls only touch the frame buffer, nothing reaches the hardware until
/// [`LedMatrix::commit`]. Text is borrowed, never copied, so it has to outlive the
/// matrix.
pub struct LedMatrix<'a, SPI, CS, F = Font5x7> {
    transport: Transport<SPI, CS>,
    fb: FrameBuffer,
    text: TextRenderer<'a>,
    font: F,
    rotate: bool,
    intensity: u8,
}

impl<'a, SPI, CS, SpiError, PinError> LedMatrix<'a, SPI, CS, Font5x7>
where
    SPI: Write<u8, Error = SpiError>,
    CS: OutputPin<Error = PinError>,
{
    /// `num_devices` chained modules sharing the chip select pin `cs`.
    pub fn new(spi: SPI, cs: CS, num_devices: usize) -> Result<Self, Error<SpiError, PinError>> {
        Self::with_config(spi, cs, DisplayConfig::new(num_devices))
    }

    pub fn with_config(
        spi: SPI,
        cs: CS,
        config: DisplayConfig,
    ) -> Result<Self, Error<SpiError, PinError>> {
        Self::with_font(spi, cs, config, Font5x7)
    }
}

impl<'a, SPI, CS, F, SpiError, PinError> LedMatrix<'a, SPI, CS, F>
where
    SPI: Write<u8, Error = SpiError>,
    CS: OutputPin<Error = PinError>,
    F: Font,
{
    pub fn with_font(
        spi: SPI,
        cs: CS,
        config: DisplayConfig,
        font: F,
    ) -> Result<Self, Error<SpiError, PinError>> {
        let transport = Transport::new(spi, cs, config.devices)?;

        let mut text = TextRenderer::new(config.width());
        text.set_exit_margin(config.exit_margin);
        text.set_char_width(config.char_width, &font);
        text.set_alignment(config.alignment, &font);

        Ok(LedMatrix {
            transport,
            fb: FrameBuffer::new(config.devices),
            text,
            font,
            rotate: config.rotate,
            intensity: config.intensity,
        })
    }

    /// Gets the number of devices you passed in when calling new
    pub fn num_devices(&self) -> usize {
        self.transport.num_devices()
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.fb
    }

    pub fn text_renderer(&self) -> &TextRenderer<'a> {
        &self.text
    }

    /// Give back the bus and chip select pin.
    pub fn release(self) -> (SPI, CS) {
        self.transport.release()
    }

    /// Blank every device, set the configured intensity and clear the frame buffer.
    pub fn init(&mut self) -> Result<(), Error<SpiError, PinError>> {
        self.transport.init()?;
        self.transport.set_intensity(self.intensity)?;
        self.fb.clear();
        Ok(())
    }

    /// Intensity 0-15 on all devices
    pub fn set_intensity(&mut self, intensity: u8) -> Result<(), Error<SpiError, PinError>> {
        self.intensity = intensity & 0x0F;
        self.transport.set_intensity(intensity)
    }

    pub fn shutdown(&mut self, shutdown: bool) -> Result<(), Error<SpiError, PinError>> {
        self.transport.shutdown(shutdown)
    }

    pub fn display_test(&mut self, on: bool) -> Result<(), Error<SpiError, PinError>> {
        self.transport.display_test(on)
    }

    /// Columns per character, spacing included. Default is 8.
    pub fn set_char_width(&mut self, char_width: u8) {
        self.text.set_char_width(CharWidth::Fixed(char_width), &self.font);
    }

    /// Advance each character by its glyph width plus one blank column.
    pub fn set_proportional(&mut self) {
        self.text.set_char_width(CharWidth::Proportional, &self.font);
    }

    pub fn set_text_alignment(&mut self, alignment: TextAlignment) {
        self.text.set_alignment(alignment, &self.font);
    }

    pub fn set_text(&mut self, text: &'a str) {
        self.text.set_text(text, &self.font);
    }

    /// Text that replaces the current text after a complete scroll cycle.
    pub fn set_next_text(&mut self, text: &'a str) {
        self.text.set_next_text(text);
    }

    /// Transpose glyphs, for modules mounted at 90 degrees.
    pub fn set_rotate(&mut self, rotate: bool) {
        self.rotate = rotate;
    }

    /// Turn on pixel (x, y) in the frame buffer.
    ///
    /// The caller guarantees `x` is a valid column, see [`FrameBuffer::set_pixel`].
    pub fn set_pixel(&mut self, x: usize, y: u8) {
        self.fb.set_pixel(x, y);
    }

    /// Turn on pixel (x, y) without any index check.
    ///
    /// # Safety
    ///
    /// `x` must be less than `8 * num_devices`.
    pub unsafe fn set_pixel_unchecked(&mut self, x: usize, y: u8) {
        self.fb.set_pixel_unchecked(x, y);
    }

    /// Write a raw column byte, ignored when `x` is off the display.
    pub fn set_column(&mut self, x: i32, value: u8) {
        self.fb.set_column(x, value);
    }

    /// Draw a custom 8x8 character at column `x`, `width` columns wide.
    pub fn set_custom_char(&mut self, x: i32, width: u8, data: &[u8; 8]) {
        self.fb.set_custom_char(x, width, data, self.rotate);
    }

    /// Clear the frame buffer.
    pub fn clear(&mut self) {
        self.fb.clear();
    }

    /// Draw the current text at the current offset.
    pub fn draw_text(&mut self) {
        self.text.draw(&mut self.fb, &self.font, self.rotate);
    }

    /// Scroll one column left and redraw. Returns `true` when a scroll cycle completed.
    pub fn scroll_text_left(&mut self) -> bool {
        let restarted = self.text.scroll_left(&self.font);
        self.log_restart(restarted);
        self.draw_text();
        restarted
    }

    /// Scroll one column right and redraw. Returns `true` when a scroll cycle completed.
    pub fn scroll_text_right(&mut self) -> bool {
        let restarted = self.text.scroll_right(&self.font);
        self.log_restart(restarted);
        self.draw_text();
        restarted
    }

    /// Move the text back and forth between the two edges of the display.
    pub fn oscillate_text(&mut self) {
        self.text.oscillate();
        self.draw_text();
    }

    #[allow(unused_variables)]
    fn log_restart(&self, restarted: bool) {
        #[cfg(feature = "defmt")]
        {
            if restarted {
                defmt::debug!(
                    "max7219: scroll cycle complete, now showing {} columns of text",
                    self.text.text_pixel_len()
                );
            }
        }
    }

    /// Write the frame buffer to the displays.
    pub fn commit(&mut self) -> Result<(), Error<SpiError, PinError>> {
        self.transport.commit(&self.fb)
    }

    /// Send a byte to a specific device.
    pub fn send_byte(
        &mut self,
        device: usize,
        register: u8,
        data: u8,
    ) -> Result<(), Error<SpiError, PinError>> {
        self.transport.send_byte(device, register, data)
    }

    /// Send a byte to all devices.
    pub fn send_byte_all(&mut self, register: u8, data: u8) -> Result<(), Error<SpiError, PinError>> {
        self.transport.send_byte_all(register, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh0::digital::{Mock as PinMock, State, Transaction as PinTransaction};
    use embedded_hal_mock::eh0::spi::{Mock as SpiMock, Transaction};

    fn latches(batches: usize) -> Vec<PinTransaction> {
        (0..batches)
            .flat_map(|_| [PinTransaction::set(State::Low), PinTransaction::set(State::High)])
            .collect()
    }

    /// Expected commit batches for a single device showing `columns`.
    fn single_device_commit(columns: &[u8]) -> Vec<Transaction> {
        columns
            .iter()
            .enumerate()
            .map(|(digit, value)| Transaction::write(vec![digit as u8 + 1, *value]))
            .collect()
    }

    #[test]
    fn digit_registers() {
        assert_eq!(Command::digit(0), Command::Digit0);
        assert_eq!(u8::from(Command::digit(7)), 0x08);
        assert_eq!(Command::digit(9), Command::Digit1);
    }

    #[test]
    fn rejects_empty_chain() {
        let mut spi = SpiMock::new(&[]);
        let mut cs = PinMock::new(&[]);
        let result = LedMatrix::new(spi.clone(), cs.clone(), 0);
        assert!(matches!(result, Err(Error::InvalidDeviceCount)));
        spi.done();
        cs.done();
    }

    #[test]
    fn draw_and_commit_a_letter() {
        let glyph = Font5x7.glyph('A');
        let mut spi = SpiMock::new(&single_device_commit(&glyph));
        let mut cs = PinMock::new(&latches(8));

        let config = DisplayConfig::new(1).alignment(TextAlignment::Left);
        let mut matrix = LedMatrix::with_config(spi.clone(), cs.clone(), config).unwrap();
        matrix.set_text("A");
        matrix.draw_text();

        let columns = matrix.frame_buffer().columns();
        assert_eq!(&columns[..5], &glyph[..5]);
        assert_eq!(&columns[5..], &[0, 0, 0]);

        matrix.commit().unwrap();
        spi.done();
        cs.done();
    }

    #[test]
    fn init_ends_with_configured_intensity() {
        let mut expected = vec![
            Transaction::write(vec![0x09, 0x00]),
            Transaction::write(vec![0x0B, 0x07]),
            Transaction::write(vec![0x0C, 0x01]),
            Transaction::write(vec![0x0F, 0x00]),
        ];
        expected.extend((1..=8u8).map(|register| Transaction::write(vec![register, 0x00])));
        expected.push(Transaction::write(vec![0x0A, 0x03]));
        let mut spi = SpiMock::new(&expected);

        let mut pins = vec![PinTransaction::set(State::High)];
        pins.extend(latches(13));
        let mut cs = PinMock::new(&pins);

        let config = DisplayConfig::new(1).intensity(3);
        let mut matrix = LedMatrix::with_config(spi.clone(), cs.clone(), config).unwrap();
        matrix.set_pixel(0, 0);
        matrix.init().unwrap();
        assert!(matrix.frame_buffer().columns().iter().all(|c| *c == 0));

        spi.done();
        cs.done();
    }

    #[test]
    fn commit_spreads_columns_over_devices() {
        let mut expected = Vec::new();
        for digit in 0..8u8 {
            let left = if digit == 2 { 0x81 } else { 0 };
            let right = if digit == 7 { 0x04 } else { 0 };
            expected.push(Transaction::write(vec![digit + 1, left, digit + 1, right]));
        }
        let mut spi = SpiMock::new(&expected);
        let mut cs = PinMock::new(&latches(8));

        let mut matrix = LedMatrix::new(spi.clone(), cs.clone(), 2).unwrap();
        matrix.set_pixel(2, 0);
        matrix.set_pixel(2, 7);
        matrix.set_column(15, 0x04);
        matrix.set_column(16, 0xFF);
        matrix.set_column(-1, 0xFF);
        matrix.commit().unwrap();

        spi.done();
        cs.done();
    }

    #[test]
    fn marquee_swaps_text_after_a_full_cycle() {
        let mut spi = SpiMock::new(&[]);
        let mut cs = PinMock::new(&[]);

        let mut matrix = LedMatrix::new(spi.clone(), cs.clone(), 2).unwrap();
        matrix.set_text("Hi");
        matrix.set_next_text("Bye");

        let cycle = 16 + matrix.text_renderer().text_pixel_len();
        let mut completed = 0;
        for _ in 0..cycle {
            if matrix.scroll_text_left() {
                completed += 1;
            }
        }
        assert_eq!(completed, 1);
        assert_eq!(matrix.text_renderer().text(), "Bye");
        // back at the right edge, nothing visible yet
        assert!(matrix.frame_buffer().columns().iter().all(|c| *c == 0));

        matrix.scroll_text_left();
        assert_eq!(matrix.frame_buffer().column(15), Some(Font5x7.glyph('B')[0]));

        spi.done();
        cs.done();
    }

    #[test]
    fn rotated_text_is_transposed() {
        let mut spi = SpiMock::new(&[]);
        let mut cs = PinMock::new(&[]);

        let config = DisplayConfig::new(1).alignment(TextAlignment::Left).rotate(true);
        let mut matrix = LedMatrix::with_config(spi.clone(), cs.clone(), config).unwrap();
        matrix.set_text("A");
        matrix.draw_text();
        assert_eq!(
            matrix.frame_buffer().columns(),
            &framebuffer::transpose(&Font5x7.glyph('A'))
        );

        matrix.set_rotate(false);
        matrix.clear();
        matrix.set_custom_char(0, 8, &Font5x7.glyph('A'));
        assert_eq!(matrix.frame_buffer().columns(), &Font5x7.glyph('A'));

        spi.done();
        cs.done();
    }

    #[test]
    fn oscillating_text_bounces() {
        let mut spi = SpiMock::new(&[]);
        let mut cs = PinMock::new(&[]);

        let config = DisplayConfig::new(1).alignment(TextAlignment::Left);
        let mut matrix = LedMatrix::with_config(spi.clone(), cs.clone(), config).unwrap();
        matrix.set_proportional();
        // "II": two glyphs of width 4 plus spacing, 10 columns on an 8 column display
        matrix.set_text("II");
        assert_eq!(matrix.text_renderer().text_pixel_len(), 10);

        matrix.oscillate_text();
        matrix.oscillate_text();
        assert_eq!(matrix.text_renderer().position(), -2);
        assert_eq!(matrix.text_renderer().increment(), 1);
        matrix.oscillate_text();
        assert_eq!(matrix.text_renderer().position(), -1);

        spi.done();
        cs.done();
    }

    #[test]
    fn targeted_send_byte_masks_other_devices() {
        let spi = SpiMock::new(&[Transaction::write(vec![0x05, 0xAA, 0x00, 0x00])]);
        let cs = PinMock::new(&latches(1));

        let mut matrix = LedMatrix::new(spi, cs, 2).unwrap();
        matrix.send_byte(0, Command::Digit4 as u8, 0xAA).unwrap();

        let (mut spi, mut cs) = matrix.release();
        spi.done();
        cs.done();
    }
}
