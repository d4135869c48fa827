//! Graphyte produces and consumes CD+Graphics (CD+G) binary stream data:
//! the subcode-channel graphics protocol that drives synchronized
//! low-resolution graphics on karaoke playback devices.
//!
//! # Pipeline overview
//!
//! 1. **Model**: a composition is an ordered list of timed [`Clip`] values
//!    (text, bitmap, scroll, palette), each with an internal event timeline.
//! 2. **Schedule**: the [`Exporter`] turns registered clips into packet
//!    writes on an absolute timeline (`Clip -> Packet` via
//!    [`PacketBuilder`], [`PaletteTable`], [`TransitionPlan`], and
//!    [`VRAMBuffer`] diffing).
//! 3. **Export**: the sparse timeline is materialized as a flat stream of
//!    24-byte packets, padded to a target duration with empty packets.
//! 4. **Persist**: [`parse_project`] / [`serialize_project`] round-trip the
//!    persisted composition format byte for byte.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: scheduling and serialization are pure and stable
//!   for a given input; decoder-compatibility quirks are explicit
//!   [`CompatOptions`] flags, never hidden branches.
//! - **Single-threaded**: one export per exporter at a time; callers
//!   serialize access externally.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod codec;
mod composition;
mod export;
mod foundation;

pub use assets::bitmap::{IndexedBitmap, decode_indexed_bmp, read_indexed_bmp};
pub use codec::packet::{
    Command, CompatOptions, DataOffset, MAX_DATA_LEN, Packet, PacketBuilder, SUBCODE_MARKER,
};
pub use codec::palette::{HALF_SIZE, PALETTE_SIZE, PaletteTable, TableHalf, rgb_to_cdg, wire_word};
pub use codec::transition::{RevealPacing, TileCoord, TransitionPlan};
pub use codec::vram::{
    BLOCK_LEN, SCREEN_HEIGHT, SCREEN_WIDTH, TILE_COLUMNS, TILE_COUNT, TILE_HEIGHT, TILE_ROWS,
    TILE_WIDTH, VRAMBuffer,
};
pub use composition::model::{
    BitmapClip, Clip, ClipEvent, ClipKind, EventPayload, Project, TextClip, TilePatch,
    TransitionSource,
};
pub use composition::serializer::{FORMAT_VERSION, MAGIC, parse_project, serialize_project};
pub use export::exporter::Exporter;
pub use export::render::render_bitmap_ops;
pub use foundation::error::{GraphyteError, GraphyteResult};
pub use foundation::timing::{
    PACKET_SIZE, PACKETS_PER_SECOND, PACKETS_PER_SECTOR, SECTORS_PER_SECOND, packets_to_secs,
    secs_to_packets_floor,
};
