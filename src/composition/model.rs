//! The composition model: timed clips and the persisted project.
//!
//! Clips are immutable value snapshots. The surrounding editor deep-clones
//! them through JSON for undo/redo, so every type here derives Serde with
//! the clip type as a tagged variant rather than a class hierarchy. The
//! exporter consumes clips read-only during a single scheduling pass and
//! never mutates them.

use crate::foundation::error::{GraphyteError, GraphyteResult};

/// A persisted composition: ordered clip list plus audio metadata.
///
/// Parsing a project file preserves every field verbatim, including path
/// separators and reserved header bytes, so the binary codec can reproduce
/// the input byte for byte. Cleanups such as
/// [`Project::normalize_legacy_separators`] are explicit transforms applied
/// by the caller, never implied by parse or serialize.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Project {
    /// Format version the file was read with (or will be written as).
    pub version: u16,
    /// Reserved header bytes, preserved verbatim.
    pub reserved: [u8; 2],
    /// Reference to the backing audio file, preserved verbatim.
    pub audio_file: String,
    /// Ordered clip list.
    pub clips: Vec<Clip>,
}

impl Project {
    /// Create an empty project at the current format version.
    pub fn new(audio_file: impl Into<String>) -> Self {
        Self {
            version: crate::composition::serializer::FORMAT_VERSION,
            reserved: [0; 2],
            audio_file: audio_file.into(),
            clips: Vec::new(),
        }
    }

    /// Rewrite legacy backslash path separators to forward slashes in the
    /// audio reference and any clip file references.
    ///
    /// This is the explicit normalization step for old files; it changes
    /// the in-memory model only, so a later serialize writes the cleaned
    /// paths.
    pub fn normalize_legacy_separators(&mut self) {
        self.audio_file = self.audio_file.replace('\\', "/");
        for clip in &mut self.clips {
            if let ClipKind::Bitmap(bitmap) = &mut clip.kind {
                bitmap.path = bitmap.path.replace('\\', "/");
                if let TransitionSource::File { path } = &mut bitmap.transition {
                    *path = path.replace('\\', "/");
                }
            }
        }
    }
}

/// A timed content unit on the composition timeline.
///
/// `start` and `duration` are in packets (300 per second of audio).
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Clip {
    /// Editor track index.
    pub track: u16,
    /// Start offset on the packet timeline.
    pub start: u32,
    /// Duration in packets. Clips with duration 0 are rejected at
    /// registration.
    pub duration: u32,
    /// Optional audio-frame alignment: when set, the effective start
    /// rounds down to the nearest multiple.
    pub audio_frame_align: Option<u32>,
    /// Type-specific payload.
    pub kind: ClipKind,
    /// Ordered internal event timeline, offsets relative to the clip start.
    pub events: Vec<ClipEvent>,
}

impl Clip {
    /// The start offset after audio-frame alignment.
    pub fn effective_start(&self) -> u32 {
        match self.audio_frame_align {
            Some(align) if align > 0 => self.start - self.start % align,
            _ => self.start,
        }
    }

    /// One past the last packet the clip's duration covers.
    pub fn end(&self) -> u64 {
        u64::from(self.effective_start()) + u64::from(self.duration)
    }

    /// Check structural invariants of the clip value itself.
    pub fn validate(&self) -> GraphyteResult<()> {
        if self.duration == 0 {
            return Err(GraphyteError::validation("clip duration must be > 0"));
        }
        for event in &self.events {
            if event.offset >= self.duration {
                return Err(GraphyteError::validation(format!(
                    "event offset {} is outside clip duration {}",
                    event.offset, self.duration
                )));
            }
        }
        Ok(())
    }
}

/// Type-specific clip payload, serialized as a tagged variant.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum ClipKind {
    /// Overlay text. Layout happens upstream; the rendered tiles arrive as
    /// [`EventPayload::Tiles`] events and reveal atomically per event.
    Text(TextClip),
    /// Progressive bitmap draw with a transition reveal order.
    Bitmap(BitmapClip),
    /// Display scrolling driven by [`EventPayload::Scroll`] events.
    Scroll,
    /// Palette effects driven by [`EventPayload::PaletteLoad`] events.
    Palette,
}

/// Text clip payload.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TextClip {
    /// Source text, kept for the editor.
    pub text: String,
}

/// Bitmap clip payload.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BitmapClip {
    /// Path to the 8-bit indexed bitmap file.
    pub path: String,
    /// Reveal order for the draw.
    pub transition: TransitionSource,
}

/// Where a bitmap clip's reveal order comes from.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum TransitionSource {
    /// Row-major sequential reveal, paced across the clip.
    Sequential,
    /// Single-frame reveal.
    Atomic,
    /// Reveal order loaded from a `.cmt` transition file.
    File {
        /// Path to the transition file.
        path: String,
    },
}

/// One step of a clip's internal timeline.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ClipEvent {
    /// Packet offset relative to the clip's effective start.
    pub offset: u32,
    /// What happens at the offset.
    pub payload: EventPayload,
}

/// Event payload, serialized as a tagged variant.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum EventPayload {
    /// Reveal a set of tiles atomically (consecutive packets from the
    /// event offset).
    Tiles {
        /// Tiles in emission order.
        tiles: Vec<TilePatch>,
    },
    /// Load a color table: up to 16 canonical 12-bit entries, emitted as a
    /// low then a high half packet.
    PaletteLoad {
        /// Canonical `(r4<<8)|(g4<<4)|b4` entries.
        colors: Vec<u16>,
    },
    /// Clear screen memory to a color.
    MemoryPreset {
        /// Palette index to clear to.
        color: u8,
    },
    /// Set the border area to a color.
    BorderPreset {
        /// Palette index for the border.
        color: u8,
    },
    /// Shift the display.
    Scroll {
        /// Scroll-copy (wrap) instead of scroll-preset (fill).
        copy: bool,
        /// Fill color for scroll-preset.
        color: u8,
        /// Raw horizontal scroll control byte.
        horizontal: u8,
        /// Raw vertical scroll control byte.
        vertical: u8,
    },
}

/// One tile's worth of wire content: two colors and 12 six-pixel rows.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TilePatch {
    /// Tile column, 0-indexed.
    pub column: u8,
    /// Tile row, 0-indexed.
    pub row: u8,
    /// Color written where a row bit is clear.
    pub color0: u8,
    /// Color written where a row bit is set.
    pub color1: u8,
    /// 12 rows of 6-bit pixel masks, bit 5 = leftmost pixel.
    pub rows: [u8; 12],
    /// Emit as a tile-block-XOR packet instead of a normal write.
    pub xor: bool,
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;
