//! Binary codec for the persisted project format.
//!
//! The format is a canonical little-endian layout: every field has exactly
//! one encoding, every length is derived from content, and parse consumes
//! the whole input. That gives the round-trip law the exporter and editor
//! rely on: for any well-formed file `P`,
//! `serialize_project(&parse_project(P)?)? == P`.
//!
//! Parse never normalizes anything. Path bytes, separators, and reserved
//! header bytes come back verbatim; cleanups are explicit transforms on the
//! in-memory [`Project`] (see [`Project::normalize_legacy_separators`]).
//!
//! Layout:
//!
//! ```text
//! magic          [4]  = "CDGP"
//! version        u16  = 1
//! reserved       [2]       (verbatim)
//! audio file     u16 len + UTF-8 bytes
//! clip count     u32
//! per clip:
//!   kind tag     u8        (1 text, 2 bitmap, 3 scroll, 4 palette)
//!   track        u16
//!   start        u32       (packets)
//!   duration     u32       (packets)
//!   align flag   u8        (1 => u32 alignment value follows)
//!   payload      u32 len + kind-specific bytes
//!   events       u16 count, each: u32 offset, u8 tag, tag-specific bytes
//! ```

use crate::composition::model::{
    BitmapClip, Clip, ClipEvent, ClipKind, EventPayload, Project, TextClip, TilePatch,
    TransitionSource,
};
use crate::foundation::error::{GraphyteError, GraphyteResult};

/// Magic bytes at the start of every project file.
pub const MAGIC: [u8; 4] = *b"CDGP";

/// Current project format version.
pub const FORMAT_VERSION: u16 = 1;

const TAG_TEXT: u8 = 1;
const TAG_BITMAP: u8 = 2;
const TAG_SCROLL: u8 = 3;
const TAG_PALETTE: u8 = 4;

const EVENT_TILES: u8 = 1;
const EVENT_PALETTE_LOAD: u8 = 2;
const EVENT_MEMORY_PRESET: u8 = 3;
const EVENT_BORDER_PRESET: u8 = 4;
const EVENT_SCROLL: u8 = 5;

const TRANSITION_SEQUENTIAL: u8 = 0;
const TRANSITION_ATOMIC: u8 = 1;
const TRANSITION_FILE: u8 = 2;

/// Decode a persisted project. Rejects bad magic, unknown versions, any
/// truncation, and trailing bytes.
pub fn parse_project(bytes: &[u8]) -> GraphyteResult<Project> {
    let mut r = Reader::new(bytes);

    if r.take(4)? != &MAGIC {
        return Err(GraphyteError::codec("not a project file (bad magic)"));
    }
    let version = r.u16()?;
    if version != FORMAT_VERSION {
        return Err(GraphyteError::codec(format!(
            "unsupported project format version {version}"
        )));
    }
    let reserved_bytes = r.take(2)?;
    let reserved = [reserved_bytes[0], reserved_bytes[1]];
    let audio_file = r.string16()?;

    let clip_count = r.u32()? as usize;
    let mut clips = Vec::with_capacity(clip_count.min(1024));
    for _ in 0..clip_count {
        clips.push(parse_clip(&mut r)?);
    }

    if r.remaining() != 0 {
        return Err(GraphyteError::codec(format!(
            "{} trailing bytes after last clip",
            r.remaining()
        )));
    }

    Ok(Project {
        version,
        reserved,
        audio_file,
        clips,
    })
}

/// Encode a project in the canonical layout.
pub fn serialize_project(project: &Project) -> GraphyteResult<Vec<u8>> {
    if project.version != FORMAT_VERSION {
        return Err(GraphyteError::validation(format!(
            "cannot serialize project format version {}",
            project.version
        )));
    }

    let mut w = Writer::new();
    w.bytes(&MAGIC);
    w.u16(project.version);
    w.bytes(&project.reserved);
    w.string16(&project.audio_file, "audio file path")?;

    let clip_count = u32::try_from(project.clips.len())
        .map_err(|_| GraphyteError::validation("too many clips"))?;
    w.u32(clip_count);
    for clip in &project.clips {
        serialize_clip(&mut w, clip)?;
    }
    Ok(w.into_bytes())
}

fn parse_clip(r: &mut Reader<'_>) -> GraphyteResult<Clip> {
    let tag = r.u8()?;
    let track = r.u16()?;
    let start = r.u32()?;
    let duration = r.u32()?;
    let audio_frame_align = match r.u8()? {
        0 => None,
        1 => Some(r.u32()?),
        other => {
            return Err(GraphyteError::codec(format!(
                "bad alignment flag {other} in clip record"
            )));
        }
    };

    let payload_len = r.u32()? as usize;
    let mut payload = Reader::new(r.take(payload_len)?);
    let kind = match tag {
        TAG_TEXT => ClipKind::Text(TextClip {
            text: payload.string16()?,
        }),
        TAG_BITMAP => {
            let path = payload.string16()?;
            let transition = match payload.u8()? {
                TRANSITION_SEQUENTIAL => TransitionSource::Sequential,
                TRANSITION_ATOMIC => TransitionSource::Atomic,
                TRANSITION_FILE => TransitionSource::File {
                    path: payload.string16()?,
                },
                other => {
                    return Err(GraphyteError::codec(format!(
                        "unknown transition source tag {other}"
                    )));
                }
            };
            ClipKind::Bitmap(BitmapClip { path, transition })
        }
        TAG_SCROLL => ClipKind::Scroll,
        TAG_PALETTE => ClipKind::Palette,
        other => {
            return Err(GraphyteError::codec(format!("unknown clip type tag {other}")));
        }
    };
    if payload.remaining() != 0 {
        return Err(GraphyteError::codec("clip payload has trailing bytes"));
    }

    let event_count = r.u16()? as usize;
    let mut events = Vec::with_capacity(event_count);
    for _ in 0..event_count {
        events.push(parse_event(r)?);
    }

    Ok(Clip {
        track,
        start,
        duration,
        audio_frame_align,
        kind,
        events,
    })
}

fn serialize_clip(w: &mut Writer, clip: &Clip) -> GraphyteResult<()> {
    let (tag, payload) = match &clip.kind {
        ClipKind::Text(text) => {
            let mut p = Writer::new();
            p.string16(&text.text, "clip text")?;
            (TAG_TEXT, p)
        }
        ClipKind::Bitmap(bitmap) => {
            let mut p = Writer::new();
            p.string16(&bitmap.path, "bitmap path")?;
            match &bitmap.transition {
                TransitionSource::Sequential => p.u8(TRANSITION_SEQUENTIAL),
                TransitionSource::Atomic => p.u8(TRANSITION_ATOMIC),
                TransitionSource::File { path } => {
                    p.u8(TRANSITION_FILE);
                    p.string16(path, "transition path")?;
                }
            }
            (TAG_BITMAP, p)
        }
        ClipKind::Scroll => (TAG_SCROLL, Writer::new()),
        ClipKind::Palette => (TAG_PALETTE, Writer::new()),
    };

    w.u8(tag);
    w.u16(clip.track);
    w.u32(clip.start);
    w.u32(clip.duration);
    match clip.audio_frame_align {
        None => w.u8(0),
        Some(align) => {
            w.u8(1);
            w.u32(align);
        }
    }

    let payload = payload.into_bytes();
    let payload_len = u32::try_from(payload.len())
        .map_err(|_| GraphyteError::validation("clip payload too large"))?;
    w.u32(payload_len);
    w.bytes(&payload);

    let event_count = u16::try_from(clip.events.len())
        .map_err(|_| GraphyteError::validation("too many events in clip"))?;
    w.u16(event_count);
    for event in &clip.events {
        serialize_event(w, event)?;
    }
    Ok(())
}

fn parse_event(r: &mut Reader<'_>) -> GraphyteResult<ClipEvent> {
    let offset = r.u32()?;
    let payload = match r.u8()? {
        EVENT_TILES => {
            let count = r.u16()? as usize;
            let mut tiles = Vec::with_capacity(count);
            for _ in 0..count {
                tiles.push(parse_tile_patch(r)?);
            }
            EventPayload::Tiles { tiles }
        }
        EVENT_PALETTE_LOAD => {
            let count = r.u8()? as usize;
            if count > crate::codec::palette::PALETTE_SIZE {
                return Err(GraphyteError::codec(format!(
                    "palette load event carries {count} colors"
                )));
            }
            let mut colors = Vec::with_capacity(count);
            for _ in 0..count {
                colors.push(r.u16()?);
            }
            EventPayload::PaletteLoad { colors }
        }
        EVENT_MEMORY_PRESET => EventPayload::MemoryPreset { color: r.u8()? },
        EVENT_BORDER_PRESET => EventPayload::BorderPreset { color: r.u8()? },
        EVENT_SCROLL => EventPayload::Scroll {
            copy: r.bool()?,
            color: r.u8()?,
            horizontal: r.u8()?,
            vertical: r.u8()?,
        },
        other => {
            return Err(GraphyteError::codec(format!("unknown event tag {other}")));
        }
    };
    Ok(ClipEvent { offset, payload })
}

fn serialize_event(w: &mut Writer, event: &ClipEvent) -> GraphyteResult<()> {
    w.u32(event.offset);
    match &event.payload {
        EventPayload::Tiles { tiles } => {
            w.u8(EVENT_TILES);
            let count = u16::try_from(tiles.len())
                .map_err(|_| GraphyteError::validation("too many tiles in event"))?;
            w.u16(count);
            for tile in tiles {
                serialize_tile_patch(w, tile);
            }
        }
        EventPayload::PaletteLoad { colors } => {
            if colors.len() > crate::codec::palette::PALETTE_SIZE {
                return Err(GraphyteError::validation(
                    "palette load event carries more than 16 colors",
                ));
            }
            w.u8(EVENT_PALETTE_LOAD);
            w.u8(colors.len() as u8);
            for &color in colors {
                w.u16(color);
            }
        }
        EventPayload::MemoryPreset { color } => {
            w.u8(EVENT_MEMORY_PRESET);
            w.u8(*color);
        }
        EventPayload::BorderPreset { color } => {
            w.u8(EVENT_BORDER_PRESET);
            w.u8(*color);
        }
        EventPayload::Scroll {
            copy,
            color,
            horizontal,
            vertical,
        } => {
            w.u8(EVENT_SCROLL);
            w.u8(u8::from(*copy));
            w.u8(*color);
            w.u8(*horizontal);
            w.u8(*vertical);
        }
    }
    Ok(())
}

fn parse_tile_patch(r: &mut Reader<'_>) -> GraphyteResult<TilePatch> {
    let column = r.u8()?;
    let row = r.u8()?;
    let color0 = r.u8()?;
    let color1 = r.u8()?;
    let row_bytes = r.take(12)?;
    let mut rows = [0u8; 12];
    rows.copy_from_slice(row_bytes);
    let xor = r.bool()?;
    Ok(TilePatch {
        column,
        row,
        color0,
        color1,
        rows,
        xor,
    })
}

fn serialize_tile_patch(w: &mut Writer, tile: &TilePatch) {
    w.u8(tile.column);
    w.u8(tile.row);
    w.u8(tile.color0);
    w.u8(tile.color1);
    w.bytes(&tile.rows);
    w.u8(u8::from(tile.xor));
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, n: usize) -> GraphyteResult<&'a [u8]> {
        let slice = self
            .bytes
            .get(self.pos..self.pos + n)
            .ok_or_else(|| GraphyteError::codec("project file truncated"))?;
        self.pos += n;
        Ok(slice)
    }

    fn u8(&mut self) -> GraphyteResult<u8> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> GraphyteResult<u16> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> GraphyteResult<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn bool(&mut self) -> GraphyteResult<bool> {
        match self.u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(GraphyteError::codec(format!(
                "bad boolean byte {other} in project file"
            ))),
        }
    }

    fn string16(&mut self) -> GraphyteResult<String> {
        let len = self.u16()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| GraphyteError::codec("string field is not valid UTF-8"))
    }
}

struct Writer {
    out: Vec<u8>,
}

impl Writer {
    fn new() -> Self {
        Self { out: Vec::new() }
    }

    fn into_bytes(self) -> Vec<u8> {
        self.out
    }

    fn bytes(&mut self, bytes: &[u8]) {
        self.out.extend_from_slice(bytes);
    }

    fn u8(&mut self, v: u8) {
        self.out.push(v);
    }

    fn u16(&mut self, v: u16) {
        self.out.extend_from_slice(&v.to_le_bytes());
    }

    fn u32(&mut self, v: u32) {
        self.out.extend_from_slice(&v.to_le_bytes());
    }

    fn string16(&mut self, s: &str, what: &str) -> GraphyteResult<()> {
        let len = u16::try_from(s.len())
            .map_err(|_| GraphyteError::validation(format!("{what} is too long")))?;
        self.u16(len);
        self.bytes(s.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/serializer.rs"]
mod tests;
