//! In-memory model of the CD+G screen, used for change detection while
//! rendering bitmap content into tile packets.

/// Visible frame width in pixels.
pub const SCREEN_WIDTH: usize = 300;

/// Visible frame height in pixels.
pub const SCREEN_HEIGHT: usize = 216;

/// Tile width in pixels.
pub const TILE_WIDTH: usize = 6;

/// Tile height in pixels.
pub const TILE_HEIGHT: usize = 12;

/// Number of tile columns across the frame.
pub const TILE_COLUMNS: usize = 50;

/// Number of tile rows down the frame.
pub const TILE_ROWS: usize = 18;

/// Total tiles in the grid.
pub const TILE_COUNT: usize = TILE_COLUMNS * TILE_ROWS;

/// Length of one tile's pixel data in a linear row-major buffer.
pub const BLOCK_LEN: usize = TILE_WIDTH * TILE_HEIGHT;

/// Screen-state model: one palette index per pixel, addressable both as
/// pixels and as 6x12 tile blocks.
///
/// A buffer is owned by exactly one render pass at a time; it is reset (or
/// freshly constructed) before each pass. Out-of-range access is silently
/// ignored on write and reads back as 0, since legitimate boundary math
/// occurs during generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VRAMBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl VRAMBuffer {
    /// Create a buffer at the standard 300x216 frame size, cleared to 0.
    pub fn new() -> Self {
        Self::with_size(SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    /// Create a buffer with explicit dimensions, cleared to 0.
    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    /// Buffer width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Buffer height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Write one pixel. Out-of-range coordinates are ignored.
    pub fn write_pixel(&mut self, x: usize, y: usize, color: u8) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    /// Read one pixel. Out-of-range coordinates read as 0.
    pub fn read_pixel(&self, x: usize, y: usize) -> u8 {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            0
        }
    }

    /// Map a linear 6x12 row-major buffer onto the grid at tile (bx, by).
    ///
    /// No-ops when `data` is not exactly [`BLOCK_LEN`] bytes.
    pub fn write_block(&mut self, bx: usize, by: usize, data: &[u8]) {
        if data.len() != BLOCK_LEN {
            return;
        }
        for row in 0..TILE_HEIGHT {
            for col in 0..TILE_WIDTH {
                self.write_pixel(
                    bx * TILE_WIDTH + col,
                    by * TILE_HEIGHT + row,
                    data[row * TILE_WIDTH + col],
                );
            }
        }
    }

    /// Read tile (bx, by) as a linear 6x12 row-major buffer.
    ///
    /// Always returns [`BLOCK_LEN`] bytes; regions outside the buffer read
    /// as 0.
    pub fn read_block(&self, bx: usize, by: usize) -> [u8; BLOCK_LEN] {
        let mut out = [0u8; BLOCK_LEN];
        for row in 0..TILE_HEIGHT {
            for col in 0..TILE_WIDTH {
                out[row * TILE_WIDTH + col] =
                    self.read_pixel(bx * TILE_WIDTH + col, by * TILE_HEIGHT + row);
            }
        }
        out
    }

    /// Fill the entire buffer with `color`.
    pub fn clear(&mut self, color: u8) {
        self.pixels.fill(color);
    }

    /// Apply a memory preset: clears the entire buffer to `color`.
    ///
    /// Real hardware addresses one of several preset groups through `group`;
    /// this model does not track sub-group presets and clears everything.
    pub fn memory_preset(&mut self, _group: u8, color: u8) {
        self.clear(color);
    }

    /// True iff `data` is exactly [`BLOCK_LEN`] bytes and every element
    /// equals the stored block at (bx, by).
    pub fn block_matches(&self, bx: usize, by: usize, data: &[u8]) -> bool {
        if data.len() != BLOCK_LEN {
            return false;
        }
        self.read_block(bx, by) == data[..BLOCK_LEN]
    }
}

impl Default for VRAMBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/codec/vram.rs"]
mod tests;
