//! The fixed 24-byte CD+G packet and its builder.
//!
//! Known decoder-compatibility quirks are modelled as explicit capability
//! flags ([`CompatOptions`]) rather than hidden branches, so a strict-spec
//! stream and a compatibility stream are both independently testable:
//!
//! - [`DataOffset`]: some decoders expect command data to start at byte 4
//!   instead of the canonical byte 3.
//! - `align_palette_loads`: some decoders only latch a palette load when the
//!   packet's stream index satisfies `index % 3 == 1`; the scheduler inserts
//!   empty filler packets to reach such an index.

use crate::codec::palette::{PaletteTable, TableHalf};
use crate::foundation::timing::PACKET_SIZE;

/// Fixed subcode marker carried in byte 0 of every packet.
pub const SUBCODE_MARKER: u8 = 0x09;

/// Maximum command data bytes a packet can carry.
pub const MAX_DATA_LEN: usize = 16;

/// CD+G command codes (byte 1, low 6 bits).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum Command {
    /// Clear the screen memory to a color.
    MemoryPreset = 1,
    /// Set the border area to a color.
    BorderPreset = 2,
    /// Write a two-color 6x12 tile.
    TileBlockNormal = 6,
    /// Shift the display with preset fill of the uncovered area.
    ScrollPreset = 20,
    /// Shift the display, wrapping the uncovered area.
    ScrollCopy = 24,
    /// Load color table entries 0-7.
    LoadColorTableLow = 30,
    /// Load color table entries 8-15.
    LoadColorTableHigh = 31,
    /// XOR a two-color 6x12 tile onto the screen.
    TileBlockXor = 38,
}

impl Command {
    /// The 6-bit wire code.
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Where command data bytes start inside a packet.
///
/// The choice is an explicit per-call flag; it is never inferred from
/// packet contents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DataOffset {
    /// Data starts at byte 3.
    #[default]
    Canonical,
    /// Data starts at byte 4, for decoders that skip an extra header byte.
    Shifted,
}

impl DataOffset {
    fn byte_index(self) -> usize {
        match self {
            DataOffset::Canonical => 3,
            DataOffset::Shifted => 4,
        }
    }
}

/// Decoder-compatibility switches applied by [`PacketBuilder`] and the
/// scheduler. The default is strict-spec: canonical data offset, no palette
/// alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CompatOptions {
    /// Data offset used by the typed packet constructors.
    pub data_offset: DataOffset,
    /// Insert filler packets so palette-load packets land on a stream index
    /// with `index % 3 == 1`.
    pub align_palette_loads: bool,
}

/// One 24-byte CD+G packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Packet([u8; PACKET_SIZE]);

impl Packet {
    /// The all-zero packet used for unwritten timeline slots and alignment
    /// fillers (command 0, instruction 0).
    pub const EMPTY: Packet = Packet([0; PACKET_SIZE]);

    /// Raw wire bytes.
    pub fn bytes(&self) -> &[u8; PACKET_SIZE] {
        &self.0
    }

    /// The 6-bit command code in byte 1.
    pub fn command(&self) -> u8 {
        self.0[1] & 0x3F
    }

    /// The 6-bit instruction index in byte 2.
    pub fn instruction(&self) -> u8 {
        self.0[2] & 0x3F
    }
}

/// Constructs packets for each wire command, honoring [`CompatOptions`].
#[derive(Clone, Copy, Debug, Default)]
pub struct PacketBuilder {
    /// Compatibility switches applied by the typed constructors.
    pub compat: CompatOptions,
}

impl PacketBuilder {
    /// Builder with explicit compatibility options.
    pub fn new(compat: CompatOptions) -> Self {
        Self { compat }
    }

    /// Build one packet from raw parts.
    ///
    /// `cmd` and `instr` are masked to 6 bits; up to [`MAX_DATA_LEN`] data
    /// bytes are copied starting at the byte `offset` selects.
    pub fn command_packet(&self, cmd: u8, instr: u8, data: &[u8], offset: DataOffset) -> Packet {
        let mut raw = [0u8; PACKET_SIZE];
        raw[0] = SUBCODE_MARKER;
        raw[1] = cmd & 0x3F;
        raw[2] = instr & 0x3F;
        let start = offset.byte_index();
        let len = data.len().min(MAX_DATA_LEN);
        raw[start..start + len].copy_from_slice(&data[..len]);
        Packet(raw)
    }

    /// Memory preset: clear screen memory to `color` (low 4 bits).
    pub fn memory_preset(&self, color: u8, repeat: u8) -> Packet {
        let data = [color & 0x0F, repeat & 0x0F];
        self.command_packet(Command::MemoryPreset.code(), 0, &data, self.compat.data_offset)
    }

    /// Border preset: set the border area to `color` (low 4 bits).
    pub fn border_preset(&self, color: u8) -> Packet {
        let data = [color & 0x0F];
        self.command_packet(Command::BorderPreset.code(), 0, &data, self.compat.data_offset)
    }

    /// Tile block at tile (column, row): two colors plus 12 rows of 6-bit
    /// pixel masks (bit 5 = leftmost pixel). `xor` selects the XOR variant.
    pub fn tile_block(
        &self,
        color0: u8,
        color1: u8,
        row: u8,
        column: u8,
        rows: &[u8; 12],
        xor: bool,
    ) -> Packet {
        let mut data = [0u8; MAX_DATA_LEN];
        data[0] = color0 & 0x0F;
        data[1] = color1 & 0x0F;
        data[2] = row & 0x1F;
        data[3] = column & 0x3F;
        for (i, &r) in rows.iter().enumerate() {
            data[4 + i] = r & 0x3F;
        }
        let cmd = if xor {
            Command::TileBlockXor
        } else {
            Command::TileBlockNormal
        };
        self.command_packet(cmd.code(), 0, &data, self.compat.data_offset)
    }

    /// Scroll command. `copy` selects scroll-copy (wrap) over scroll-preset
    /// (fill with `color`); `horizontal`/`vertical` are the raw scroll
    /// control bytes.
    pub fn scroll(&self, copy: bool, color: u8, horizontal: u8, vertical: u8) -> Packet {
        let data = [color & 0x0F, horizontal & 0x3F, vertical & 0x3F];
        let cmd = if copy {
            Command::ScrollCopy
        } else {
            Command::ScrollPreset
        };
        self.command_packet(cmd.code(), 0, &data, self.compat.data_offset)
    }

    /// Load one half of a color table.
    pub fn load_color_table(&self, table: &PaletteTable, half: TableHalf) -> Packet {
        let cmd = match half {
            TableHalf::Low => Command::LoadColorTableLow,
            TableHalf::High => Command::LoadColorTableHigh,
        };
        self.command_packet(cmd.code(), 0, &table.wire_bytes(half), self.compat.data_offset)
    }

    /// Number of filler packets needed before a palette-load packet at
    /// stream `index` so the load lands on an index with `index % 3 == 1`.
    ///
    /// Always 0 when `align_palette_loads` is off.
    pub fn palette_alignment_fillers(&self, index: u64) -> u64 {
        if !self.compat.align_palette_loads {
            return 0;
        }
        (1 + 3 - (index % 3)) % 3
    }
}

#[cfg(test)]
#[path = "../../tests/unit/codec/packet.rs"]
mod tests;
