use heapless::Vec;

/// Most devices a single chain can drive.
pub const MAX_DEVICES: usize = 32;

/// Columns (digits) per 8x8 device.
pub const COLUMNS_PER_DEVICE: usize = 8;

pub const MAX_COLUMNS: usize = MAX_DEVICES * COLUMNS_PER_DEVICE;

/// One byte per 8 pixel tall column, column 0 being the leftmost column of the
/// leftmost device. Bit 0 of a column byte is its top row.
///
/// The length is always `8 * devices` and never changes after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    cols: Vec<u8, MAX_COLUMNS>,
}

impl FrameBuffer {
    /// Callers check `1..=MAX_DEVICES` beforehand, larger counts are capped.
    pub fn new(devices: usize) -> Self {
        let len = devices.min(MAX_DEVICES) * COLUMNS_PER_DEVICE;
        let mut cols = Vec::new();
        // capacity is MAX_COLUMNS and len <= MAX_COLUMNS
        let _ = cols.resize(len, 0);
        FrameBuffer { cols }
    }

    /// Number of columns, the display width in pixels.
    pub fn len(&self) -> usize {
        self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cols.is_empty()
    }

    pub fn devices(&self) -> usize {
        self.cols.len() / COLUMNS_PER_DEVICE
    }

    pub fn columns(&self) -> &[u8] {
        &self.cols
    }

    pub fn column(&self, x: usize) -> Option<u8> {
        self.cols.get(x).copied()
    }

    /// The eight columns belonging to `device`, `None` past the last device.
    pub fn device_columns(&self, device: usize) -> Option<&[u8]> {
        let start = device * COLUMNS_PER_DEVICE;
        self.cols.get(start..start + COLUMNS_PER_DEVICE)
    }

    pub fn clear(&mut self) {
        self.cols.iter_mut().for_each(|col| *col = 0);
    }

    /// Turn on the pixel at column `x`, row `y`.
    ///
    /// This is the fast path and does not validate `x`: the caller guarantees
    /// `x < self.len()`. `y` is taken modulo 8.
    ///
    /// # Panics
    ///
    /// Panics if `x` is out of range. Use [`FrameBuffer::set_pixel_unchecked`] to skip
    /// the index check entirely.
    pub fn set_pixel(&mut self, x: usize, y: u8) {
        self.cols[x] |= 1 << (y & 0x07);
    }

    /// Turn on the pixel at column `x`, row `y` without any index check.
    ///
    /// # Safety
    ///
    /// `x` must be less than [`FrameBuffer::len`].
    pub unsafe fn set_pixel_unchecked(&mut self, x: usize, y: u8) {
        *self.cols.get_unchecked_mut(x) |= 1 << (y & 0x07);
    }

    /// Turn off a pixel. Out of range coordinates are ignored.
    pub fn clear_pixel(&mut self, x: usize, y: u8) {
        if let Some(col) = self.cols.get_mut(x) {
            *col &= !(1 << (y & 0x07));
        }
    }

    /// `false` for out of range coordinates.
    pub fn pixel(&self, x: usize, y: u8) -> bool {
        y < 8 && self.cols.get(x).map_or(false, |col| col & (1 << y) != 0)
    }

    /// Write a raw column byte. Columns outside `0..len()` are silently skipped,
    /// scrolling arithmetic regularly produces them.
    pub fn set_column(&mut self, x: i32, value: u8) {
        if x < 0 {
            return;
        }
        if let Some(col) = self.cols.get_mut(x as usize) {
            *col = value;
        }
    }

    /// Blit the first `width` columns of an 8x8 glyph starting at column `x`.
    ///
    /// Columns that land outside the buffer are clipped. With `rotate` the glyph is
    /// transposed first, for modules mounted at 90 degrees.
    pub fn set_custom_char(&mut self, x: i32, width: u8, data: &[u8; 8], rotate: bool) {
        let glyph = if rotate { transpose(data) } else { *data };
        for (i, value) in glyph.iter().take(width.min(8) as usize).enumerate() {
            self.set_column(x + i as i32, *value);
        }
    }
}

/// Swap rows and columns of an 8x8 bitmap: bit `r` of output column `c` is bit `c`
/// of input column `r`.
pub fn transpose(data: &[u8; 8]) -> [u8; 8] {
    let mut out = [0u8; 8];
    for (r, byte) in data.iter().enumerate() {
        for (c, col) in out.iter_mut().enumerate() {
            if byte & (1 << c) != 0 {
                *col |= 1 << r;
            }
        }
    }
    out
}
