//! Build a tiny composition and export it as a CD+G stream.
//!
//! Writes `target/demo.cdg` next to the build output.

use anyhow::Context as _;
use graphyte::{
    Clip, ClipEvent, ClipKind, EventPayload, Exporter, GraphyteResult, PACKETS_PER_SECOND,
    TextClip, TilePatch, rgb_to_cdg,
};

fn main() -> GraphyteResult<()> {
    tracing_subscriber::fmt::init();

    let mut exporter = Exporter::new();

    exporter.register_clip(Clip {
        track: 0,
        start: 0,
        duration: PACKETS_PER_SECOND,
        audio_frame_align: None,
        kind: ClipKind::Palette,
        events: vec![ClipEvent {
            offset: 0,
            payload: EventPayload::PaletteLoad {
                colors: vec![rgb_to_cdg(0, 0, 0), rgb_to_cdg(255, 255, 0)],
            },
        }],
    });

    exporter.register_clip(Clip {
        track: 1,
        start: PACKETS_PER_SECOND,
        duration: PACKETS_PER_SECOND,
        audio_frame_align: Some(4),
        kind: ClipKind::Text(TextClip {
            text: "la la la".into(),
        }),
        events: vec![ClipEvent {
            offset: 0,
            payload: EventPayload::Tiles {
                tiles: vec![TilePatch {
                    column: 24,
                    row: 8,
                    color0: 0,
                    color1: 1,
                    rows: [0x2D; 12],
                    xor: false,
                }],
            },
        }],
    });

    exporter.set_target_duration(u64::from(10 * PACKETS_PER_SECOND));
    let packets = exporter.schedule_packets()?;
    let stream = exporter.export_to_binary();
    println!("scheduled {packets} packets, {} bytes", stream.len());

    std::fs::create_dir_all("target").context("creating output directory")?;
    std::fs::write("target/demo.cdg", &stream).context("writing demo stream")?;
    Ok(())
}
