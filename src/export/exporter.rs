//! Clip registration, packet scheduling, and binary export.
//!
//! The exporter owns a sparse packet timeline keyed by absolute packet
//! index. Scheduling walks the registered clips in registration order and
//! applies each clip's packet writes; later clips overwrite earlier ones at
//! a shared index (last write wins, no collision error). Export then
//! materializes the sparse timeline into one dense buffer, zero packets in
//! every unwritten slot.
//!
//! One export per exporter at a time: `schedule_packets` and
//! `export_to_binary` are not safe to drive concurrently from multiple
//! callers.

use std::collections::BTreeMap;
use std::path::Path;

use crate::assets::bitmap::read_indexed_bmp;
use crate::codec::packet::{CompatOptions, Packet, PacketBuilder};
use crate::codec::palette::{PaletteTable, TableHalf};
use crate::codec::transition::{RevealPacing, TransitionPlan};
use crate::codec::vram::VRAMBuffer;
use crate::composition::model::{Clip, ClipKind, EventPayload, TilePatch, TransitionSource};
use crate::export::render::render_bitmap_ops;
use crate::foundation::error::GraphyteResult;
use crate::foundation::timing::PACKET_SIZE;

/// Schedules registered clips onto an absolute packet timeline and
/// serializes it to a flat CD+G stream.
#[derive(Debug, Default)]
pub struct Exporter {
    builder: PacketBuilder,
    clips: Vec<Clip>,
    timeline: BTreeMap<u64, Packet>,
    scheduled_len: u64,
    scheduled: bool,
    target_duration: Option<u64>,
}

impl Exporter {
    /// Exporter in strict-spec mode (no compatibility quirks).
    pub fn new() -> Self {
        Self::with_compat(CompatOptions::default())
    }

    /// Exporter with explicit decoder-compatibility options.
    pub fn with_compat(compat: CompatOptions) -> Self {
        Self {
            builder: PacketBuilder::new(compat),
            clips: Vec::new(),
            timeline: BTreeMap::new(),
            scheduled_len: 0,
            scheduled: false,
            target_duration: None,
        }
    }

    /// Register a clip for scheduling.
    ///
    /// Returns false (and stores nothing) for clips with duration 0;
    /// exporter state is unchanged in that case.
    pub fn register_clip(&mut self, clip: Clip) -> bool {
        if clip.duration == 0 {
            return false;
        }
        self.clips.push(clip);
        true
    }

    /// Number of accepted clips.
    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    /// Pad the scheduled stream to at least `packets` packets.
    pub fn set_target_duration(&mut self, packets: u64) {
        self.target_duration = Some(packets);
    }

    /// True only when at least one clip is registered and packets have
    /// been scheduled.
    pub fn validate(&self) -> bool {
        !self.clips.is_empty() && self.scheduled
    }

    /// Compute every clip's packet writes and apply them to the timeline.
    ///
    /// Returns the total scheduled length in packets: the maximum of the
    /// farthest clip end and the target duration, never less than the
    /// highest written index. The written index can exceed every clip end
    /// when a paced bitmap changes more tiles than its clip has packets;
    /// those writes spill past the clip rather than dropping tiles, and
    /// the stream grows to keep them.
    #[tracing::instrument(skip(self))]
    pub fn schedule_packets(&mut self) -> GraphyteResult<u64> {
        let mut timeline = BTreeMap::new();
        let mut farthest = 0u64;
        for clip in &self.clips {
            schedule_clip(&self.builder, clip, &mut timeline)?;
            farthest = farthest.max(clip.end());
        }

        let written_end = timeline.keys().next_back().map_or(0, |&i| i + 1);
        self.scheduled_len = farthest
            .max(written_end)
            .max(self.target_duration.unwrap_or(0));
        self.timeline = timeline;
        self.scheduled = true;

        tracing::debug!(
            packets = self.scheduled_len,
            written = self.timeline.len(),
            clips = self.clips.len(),
            "scheduled packet timeline"
        );
        Ok(self.scheduled_len)
    }

    /// Materialize the timeline as a flat stream of 24-byte packets.
    ///
    /// The buffer is sized once at `scheduled length * 24` and unwritten
    /// indices stay all-zero (an empty packet). Calling before scheduling
    /// yields whatever has been scheduled so far: a zero-length buffer on
    /// a fresh exporter, never an error.
    pub fn export_to_binary(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.scheduled_len as usize * PACKET_SIZE];
        for (&index, packet) in &self.timeline {
            let at = index as usize * PACKET_SIZE;
            out[at..at + PACKET_SIZE].copy_from_slice(packet.bytes());
        }
        out
    }
}

fn schedule_clip(
    builder: &PacketBuilder,
    clip: &Clip,
    timeline: &mut BTreeMap<u64, Packet>,
) -> GraphyteResult<()> {
    let base = u64::from(clip.effective_start());

    if let ClipKind::Bitmap(bitmap_clip) = &clip.kind {
        schedule_bitmap(builder, clip, bitmap_clip, base, timeline)?;
    }

    for event in &clip.events {
        schedule_event(builder, base + u64::from(event.offset), &event.payload, timeline);
    }
    Ok(())
}

fn schedule_bitmap(
    builder: &PacketBuilder,
    clip: &Clip,
    bitmap_clip: &crate::composition::model::BitmapClip,
    base: u64,
    timeline: &mut BTreeMap<u64, Packet>,
) -> GraphyteResult<()> {
    let bitmap = read_indexed_bmp(Path::new(&bitmap_clip.path))?;
    let plan = match &bitmap_clip.transition {
        TransitionSource::Sequential => TransitionPlan::sequential(),
        TransitionSource::Atomic => TransitionPlan::atomic(),
        TransitionSource::File { path } => TransitionPlan::from_cmt_file(Path::new(path))?,
    };

    let palette = PaletteTable::from_rgb(&bitmap.palette);
    let mut cursor = base;
    cursor = put_palette_packet(builder, timeline, cursor, builder.load_color_table(&palette, TableHalf::Low));
    cursor = put_palette_packet(builder, timeline, cursor, builder.load_color_table(&palette, TableHalf::High));
    timeline.insert(cursor, builder.memory_preset(0, 0));
    cursor += 1;

    let mut vram = VRAMBuffer::new();
    let ops = render_bitmap_ops(&bitmap, &plan, &mut vram);

    let step = match plan.pacing {
        RevealPacing::Atomic => 1,
        RevealPacing::Paced => {
            let header = cursor - base;
            let remaining = u64::from(clip.duration).saturating_sub(header);
            if ops.is_empty() {
                1
            } else {
                (remaining / ops.len() as u64).max(1)
            }
        }
    };

    for (i, op) in ops.iter().enumerate() {
        timeline.insert(cursor + i as u64 * step, tile_packet(builder, op));
    }
    Ok(())
}

fn schedule_event(
    builder: &PacketBuilder,
    at: u64,
    payload: &EventPayload,
    timeline: &mut BTreeMap<u64, Packet>,
) {
    match payload {
        EventPayload::Tiles { tiles } => {
            for (i, tile) in tiles.iter().enumerate() {
                timeline.insert(at + i as u64, tile_packet(builder, tile));
            }
        }
        EventPayload::PaletteLoad { colors } => {
            let table = PaletteTable::from_entries(colors);
            let mut cursor = at;
            cursor = put_palette_packet(builder, timeline, cursor, builder.load_color_table(&table, TableHalf::Low));
            put_palette_packet(builder, timeline, cursor, builder.load_color_table(&table, TableHalf::High));
        }
        EventPayload::MemoryPreset { color } => {
            timeline.insert(at, builder.memory_preset(*color, 0));
        }
        EventPayload::BorderPreset { color } => {
            timeline.insert(at, builder.border_preset(*color));
        }
        EventPayload::Scroll {
            copy,
            color,
            horizontal,
            vertical,
        } => {
            timeline.insert(at, builder.scroll(*copy, *color, *horizontal, *vertical));
        }
    }
}

/// Write a palette-load packet, inserting explicit empty fillers first when
/// the compatibility alignment quirk is on. Returns the index after the
/// load packet.
fn put_palette_packet(
    builder: &PacketBuilder,
    timeline: &mut BTreeMap<u64, Packet>,
    at: u64,
    packet: Packet,
) -> u64 {
    let fillers = builder.palette_alignment_fillers(at);
    for k in 0..fillers {
        timeline.insert(at + k, Packet::EMPTY);
    }
    timeline.insert(at + fillers, packet);
    at + fillers + 1
}

fn tile_packet(builder: &PacketBuilder, tile: &TilePatch) -> Packet {
    builder.tile_block(
        tile.color0,
        tile.color1,
        tile.row,
        tile.column,
        &tile.rows,
        tile.xor,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/export/exporter.rs"]
mod tests;
