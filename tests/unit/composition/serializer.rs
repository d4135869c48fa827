use super::*;

fn sample_project() -> Project {
    Project {
        version: FORMAT_VERSION,
        reserved: [0xCA, 0xFE],
        audio_file: "media\\legacy path.mp3".to_string(),
        clips: vec![
            Clip {
                track: 0,
                start: 300,
                duration: 1200,
                audio_frame_align: Some(4),
                kind: ClipKind::Text(TextClip {
                    text: "chorus".to_string(),
                }),
                events: vec![ClipEvent {
                    offset: 30,
                    payload: EventPayload::Tiles {
                        tiles: vec![TilePatch {
                            column: 12,
                            row: 9,
                            color0: 0,
                            color1: 15,
                            rows: [0x2A; 12],
                            xor: true,
                        }],
                    },
                }],
            },
            Clip {
                track: 1,
                start: 0,
                duration: 600,
                audio_frame_align: None,
                kind: ClipKind::Bitmap(BitmapClip {
                    path: "art/title.bmp".to_string(),
                    transition: TransitionSource::File {
                        path: "art/wipe.cmt".to_string(),
                    },
                }),
                events: Vec::new(),
            },
            Clip {
                track: 2,
                start: 1500,
                duration: 90,
                audio_frame_align: None,
                kind: ClipKind::Palette,
                events: vec![ClipEvent {
                    offset: 0,
                    payload: EventPayload::PaletteLoad {
                        colors: vec![0x0F00, 0x00F0, 0x000F],
                    },
                }],
            },
            Clip {
                track: 2,
                start: 1600,
                duration: 150,
                audio_frame_align: None,
                kind: ClipKind::Scroll,
                events: vec![ClipEvent {
                    offset: 10,
                    payload: EventPayload::Scroll {
                        copy: false,
                        color: 3,
                        horizontal: 0x10,
                        vertical: 0,
                    },
                }],
            },
        ],
    }
}

#[test]
fn model_roundtrips_through_bytes() {
    let project = sample_project();
    let bytes = serialize_project(&project).unwrap();
    let back = parse_project(&bytes).unwrap();
    assert_eq!(back, project);
}

#[test]
fn bytes_roundtrip_exactly() {
    // The law: serialize(parse(P)) == P for any well-formed file.
    let bytes = serialize_project(&sample_project()).unwrap();
    let reencoded = serialize_project(&parse_project(&bytes).unwrap()).unwrap();
    assert_eq!(reencoded, bytes);
}

#[test]
fn reserved_bytes_and_separators_survive_verbatim() {
    let bytes = serialize_project(&sample_project()).unwrap();
    let back = parse_project(&bytes).unwrap();
    assert_eq!(back.reserved, [0xCA, 0xFE]);
    // Parse must not normalize the legacy backslash path.
    assert_eq!(back.audio_file, "media\\legacy path.mp3");
}

#[test]
fn empty_project_roundtrips() {
    let project = Project::new("");
    let bytes = serialize_project(&project).unwrap();
    assert_eq!(parse_project(&bytes).unwrap(), project);
    let reencoded = serialize_project(&parse_project(&bytes).unwrap()).unwrap();
    assert_eq!(reencoded, bytes);
}

#[test]
fn rejects_bad_magic_and_version() {
    let mut bytes = serialize_project(&sample_project()).unwrap();
    bytes[0] = b'X';
    assert!(parse_project(&bytes).is_err());

    let mut bytes = serialize_project(&sample_project()).unwrap();
    bytes[4] = 0xFF;
    bytes[5] = 0xFF;
    assert!(parse_project(&bytes).is_err());
}

#[test]
fn rejects_truncation_at_any_boundary() {
    let bytes = serialize_project(&sample_project()).unwrap();
    for cut in [0, 3, 7, 9, bytes.len() / 2, bytes.len() - 1] {
        assert!(parse_project(&bytes[..cut]).is_err(), "cut at {cut}");
    }
}

#[test]
fn rejects_trailing_bytes() {
    let mut bytes = serialize_project(&sample_project()).unwrap();
    bytes.push(0);
    let err = parse_project(&bytes).unwrap_err();
    assert!(err.to_string().contains("trailing"));
}

#[test]
fn rejects_unknown_tags() {
    let project = Project {
        clips: vec![sample_project().clips[3].clone()],
        ..sample_project()
    };
    let bytes = serialize_project(&project).unwrap();
    // The clip tag is the first byte after the header + audio path.
    let tag_at = 4 + 2 + 2 + 2 + project.audio_file.len() + 4;
    let mut bad = bytes.clone();
    bad[tag_at] = 99;
    assert!(parse_project(&bad).is_err());
}

#[test]
fn serialize_rejects_foreign_version() {
    let project = Project {
        version: 2,
        ..sample_project()
    };
    assert!(serialize_project(&project).is_err());
}
