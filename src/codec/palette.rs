//! Palette quantization and 12-bit color packing.
//!
//! Colors live in two packings:
//!
//! - the internal canonical form `(r4<<8)|(g4<<4)|b4`, used everywhere in
//!   the composition model and project files, and
//! - the wire word `(r4<<10)|(g4<<6)|(b4<<2)`, rebuilt only at emission time
//!   and split into a high/low byte pair inside a load-color-table packet.

/// Entries in a full color table.
pub const PALETTE_SIZE: usize = 16;

/// Entries in one emitted table half.
pub const HALF_SIZE: usize = 8;

/// Quantize an 8-bit RGB triple to the internal canonical 12-bit form.
///
/// Each channel maps through `floor(channel / 17)` to 4 bits.
pub fn rgb_to_cdg(r: u8, g: u8, b: u8) -> u16 {
    let r4 = u16::from(r / 17);
    let g4 = u16::from(g / 17);
    let b4 = u16::from(b / 17);
    (r4 << 8) | (g4 << 4) | b4
}

/// Rebuild a canonical 12-bit entry as its wire word.
pub fn wire_word(entry: u16) -> u16 {
    let r4 = (entry >> 8) & 0x0F;
    let g4 = (entry >> 4) & 0x0F;
    let b4 = entry & 0x0F;
    (r4 << 10) | (g4 << 6) | (b4 << 2)
}

/// Which 8-entry half of a color table a load packet carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TableHalf {
    /// Entries 0-7.
    Low,
    /// Entries 8-15.
    High,
}

impl TableHalf {
    fn first_entry(self) -> usize {
        match self {
            TableHalf::Low => 0,
            TableHalf::High => HALF_SIZE,
        }
    }
}

/// A 16-entry color table in internal canonical form.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PaletteTable {
    entries: [u16; PALETTE_SIZE],
}

impl PaletteTable {
    /// Create a table with all entries 0 (black).
    pub fn new() -> Self {
        Self::default()
    }

    /// Quantize up to 16 RGB triples into a table; remaining entries stay 0.
    pub fn from_rgb(colors: &[(u8, u8, u8)]) -> Self {
        let mut table = Self::new();
        for (i, &(r, g, b)) in colors.iter().take(PALETTE_SIZE).enumerate() {
            table.entries[i] = rgb_to_cdg(r, g, b);
        }
        table
    }

    /// Build a table directly from canonical 12-bit entries; extra input is
    /// ignored and missing entries stay 0.
    pub fn from_entries(entries: &[u16]) -> Self {
        let mut table = Self::new();
        for (i, &e) in entries.iter().take(PALETTE_SIZE).enumerate() {
            table.entries[i] = e & 0x0FFF;
        }
        table
    }

    /// Set one entry to a canonical 12-bit value. Out-of-range indices are
    /// ignored.
    pub fn set(&mut self, index: usize, entry: u16) {
        if index < PALETTE_SIZE {
            self.entries[index] = entry & 0x0FFF;
        }
    }

    /// Read one entry. Out-of-range indices read as 0.
    pub fn get(&self, index: usize) -> u16 {
        if index < PALETTE_SIZE {
            self.entries[index]
        } else {
            0
        }
    }

    /// All 16 canonical entries.
    pub fn entries(&self) -> &[u16; PALETTE_SIZE] {
        &self.entries
    }

    /// The 16 data bytes carried by a load-color-table packet for `half`:
    /// each entry's wire word split into a high byte then a low byte.
    pub fn wire_bytes(&self, half: TableHalf) -> [u8; 2 * HALF_SIZE] {
        let mut out = [0u8; 2 * HALF_SIZE];
        let first = half.first_entry();
        for i in 0..HALF_SIZE {
            let word = wire_word(self.entries[first + i]);
            out[2 * i] = (word >> 8) as u8;
            out[2 * i + 1] = (word & 0xFF) as u8;
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/codec/palette.rs"]
mod tests;
