//! Chained SPI framing for a row of max7219 chips.
//!
//! Every chip in the chain shifts 16 bits through to the next one and latches the
//! last 16 bits it holds when chip select goes high. A batch therefore carries one
//! (register, data) word per device: the first word sent ends up in the device
//! farthest from the MCU, which is device 0 and shows the leftmost columns.

use embedded_hal::blocking::spi::Write;
use embedded_hal::digital::v2::OutputPin;
use heapless::Vec;

use crate::framebuffer::{FrameBuffer, COLUMNS_PER_DEVICE, MAX_DEVICES};
use crate::{Command, Error};

const MAX_BATCH: usize = MAX_DEVICES * 2;

pub struct Transport<SPI, CS> {
    spi: SPI,
    cs: CS,
    num_devices: usize,
    batch: Vec<u8, MAX_BATCH>,
}

impl<SPI, CS, SpiError, PinError> Transport<SPI, CS>
where
    SPI: Write<u8, Error = SpiError>,
    CS: OutputPin<Error = PinError>,
{
    pub fn new(spi: SPI, cs: CS, num_devices: usize) -> Result<Self, Error<SpiError, PinError>> {
        if num_devices == 0 || num_devices > MAX_DEVICES {
            return Err(Error::InvalidDeviceCount);
        }

        let mut batch = Vec::new();
        // num_devices * 2 <= MAX_BATCH
        let _ = batch.resize(num_devices * 2, 0);

        Ok(Transport {
            spi,
            cs,
            num_devices,
            batch,
        })
    }

    pub fn num_devices(&self) -> usize {
        self.num_devices
    }

    /// Give back the bus and chip select pin.
    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }

    /// Bring every chip from its power-on state to a blank, running display.
    pub fn init(&mut self) -> Result<(), Error<SpiError, PinError>> {
        self.cs.set_high().map_err(Error::Pin)?;

        self.send_command_all(Command::DecodeMode, 0x00)?;
        self.send_command_all(Command::ScanLimit, 0x07)?;
        self.send_command_all(Command::Shutdown, 0x01)?;
        self.send_command_all(Command::DisplayTest, 0x00)?;
        for digit in 0..COLUMNS_PER_DEVICE as u8 {
            self.send_command_all(Command::digit(digit), 0x00)?;
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("max7219: initialized {} devices", self.num_devices);

        Ok(())
    }

    /// Brightness 0-15 on every device. Upper bits are dropped.
    pub fn set_intensity(&mut self, intensity: u8) -> Result<(), Error<SpiError, PinError>> {
        self.send_command_all(Command::Intensity, intensity & 0x0F)
    }

    /// Enter (`true`) or leave (`false`) low power shutdown on every device.
    pub fn shutdown(&mut self, shutdown: bool) -> Result<(), Error<SpiError, PinError>> {
        self.send_command_all(Command::Shutdown, if shutdown { 0x00 } else { 0x01 })
    }

    /// Light every LED regardless of the digit registers.
    pub fn display_test(&mut self, on: bool) -> Result<(), Error<SpiError, PinError>> {
        self.send_command_all(Command::DisplayTest, on as u8)
    }

    pub fn send_command_all(
        &mut self,
        command: Command,
        data: u8,
    ) -> Result<(), Error<SpiError, PinError>> {
        self.send_byte_all(command as u8, data)
    }

    /// Write `(register, data)` to one device, every other device gets a no-op.
    pub fn send_byte(
        &mut self,
        device: usize,
        register: u8,
        data: u8,
    ) -> Result<(), Error<SpiError, PinError>> {
        if device >= self.num_devices {
            return Err(Error::InvalidDevice);
        }

        for word in self.batch.chunks_exact_mut(2) {
            word[0] = Command::Noop as u8;
            word[1] = 0;
        }
        self.batch[device * 2] = register;
        self.batch[device * 2 + 1] = data;

        self.flush()
    }

    /// Write the same `(register, data)` to every device in one batch.
    pub fn send_byte_all(&mut self, register: u8, data: u8) -> Result<(), Error<SpiError, PinError>> {
        for word in self.batch.chunks_exact_mut(2) {
            word[0] = register;
            word[1] = data;
        }

        self.flush()
    }

    /// Push the whole frame buffer: one batch per digit register, each batch
    /// carrying the matching column of every device.
    pub fn commit(&mut self, fb: &FrameBuffer) -> Result<(), Error<SpiError, PinError>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("max7219: commit {} columns", fb.len());

        for digit in 0..COLUMNS_PER_DEVICE {
            let register = Command::digit(digit as u8) as u8;
            for (device, word) in self.batch.chunks_exact_mut(2).enumerate() {
                word[0] = register;
                word[1] = fb.device_columns(device).map_or(0, |cols| cols[digit]);
            }
            self.flush()?;
        }

        Ok(())
    }

    fn flush(&mut self) -> Result<(), Error<SpiError, PinError>> {
        self.cs.set_low().map_err(Error::Pin)?;
        self.spi.write(&self.batch).map_err(Error::Spi)?;
        // latch
        self.cs.set_high().map_err(Error::Pin)?;
        Ok(())
    }
}
