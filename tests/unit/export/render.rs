use super::*;

use crate::codec::vram::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// A bitmap where every pixel holds the same palette index.
fn solid_bitmap(width: u32, height: u32, index: u8) -> IndexedBitmap {
    IndexedBitmap {
        width,
        height,
        palette: vec![(0, 0, 0); 16],
        pixels: vec![index; (width * height) as usize],
    }
}

#[test]
fn all_zero_bitmap_over_cleared_vram_produces_no_ops() {
    let bitmap = solid_bitmap(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32, 0);
    let mut vram = VRAMBuffer::new();
    let ops = render_bitmap_ops(&bitmap, &TransitionPlan::sequential(), &mut vram);
    assert!(ops.is_empty());
}

#[test]
fn single_bit_index_needs_one_normal_plane_per_tile() {
    let bitmap = solid_bitmap(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32, 1);
    let mut vram = VRAMBuffer::new();
    let ops = render_bitmap_ops(&bitmap, &TransitionPlan::sequential(), &mut vram);
    assert_eq!(ops.len(), crate::codec::vram::TILE_COUNT);
    for op in &ops {
        assert!(!op.xor);
        assert_eq!(op.color1, 1);
        assert_eq!(op.rows, [0x3F; 12]);
    }
}

#[test]
fn multi_bit_index_decomposes_into_xor_planes() {
    // Index 0b1010 needs the (empty) normal plane for bit 0 plus XOR
    // planes for bits 1 and 3.
    let bitmap = solid_bitmap(6, 12, 0b1010);
    let mut vram = VRAMBuffer::new();
    let plan = TransitionPlan {
        tiles: vec![crate::codec::transition::TileCoord { x: 0, y: 0 }],
        pacing: crate::codec::transition::RevealPacing::Atomic,
    };
    let ops = render_bitmap_ops(&bitmap, &plan, &mut vram);
    assert_eq!(ops.len(), 3);

    assert!(!ops[0].xor);
    assert_eq!(ops[0].color1, 1);
    assert_eq!(ops[0].rows, [0u8; 12]);

    assert!(ops[1].xor);
    assert_eq!(ops[1].color1, 1 << 1);
    assert_eq!(ops[1].rows, [0x3F; 12]);

    assert!(ops[2].xor);
    assert_eq!(ops[2].color1, 1 << 3);
    assert_eq!(ops[2].rows, [0x3F; 12]);
}

#[test]
fn planes_reconstruct_the_exact_indices() {
    // A tile mixing all 16 indices: replay the planes by hand and compare
    // against the source block.
    let mut bitmap = solid_bitmap(6, 12, 0);
    for (i, px) in bitmap.pixels.iter_mut().enumerate() {
        *px = (i % 16) as u8;
    }
    let plan = TransitionPlan {
        tiles: vec![crate::codec::transition::TileCoord { x: 0, y: 0 }],
        pacing: crate::codec::transition::RevealPacing::Atomic,
    };
    let mut vram = VRAMBuffer::new();
    let ops = render_bitmap_ops(&bitmap, &plan, &mut vram);

    let mut screen = [0u8; BLOCK_LEN];
    for op in &ops {
        for row in 0..TILE_HEIGHT {
            for col in 0..TILE_WIDTH {
                let bit = (op.rows[row] >> (TILE_WIDTH - 1 - col)) & 1;
                let color = if bit == 1 { op.color1 } else { op.color0 };
                let px = &mut screen[row * TILE_WIDTH + col];
                if op.xor {
                    *px ^= color;
                } else {
                    *px = color;
                }
            }
        }
    }
    assert_eq!(screen.to_vec(), bitmap.pixels);
    // The VRAM model tracked the same result.
    assert!(vram.block_matches(0, 0, &screen));
}

#[test]
fn unchanged_tiles_are_skipped_on_a_second_render() {
    let bitmap = solid_bitmap(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32, 5);
    let mut vram = VRAMBuffer::new();
    let first = render_bitmap_ops(&bitmap, &TransitionPlan::sequential(), &mut vram);
    assert!(!first.is_empty());
    let second = render_bitmap_ops(&bitmap, &TransitionPlan::sequential(), &mut vram);
    assert!(second.is_empty());
}

#[test]
fn pixels_outside_the_bitmap_extent_read_as_zero() {
    // A 6x12 bitmap only covers tile (0,0); every other tile stays zero
    // and produces no ops over cleared VRAM.
    let bitmap = solid_bitmap(6, 12, 3);
    let mut vram = VRAMBuffer::new();
    let ops = render_bitmap_ops(&bitmap, &TransitionPlan::sequential(), &mut vram);
    let touched: Vec<(u8, u8)> = ops.iter().map(|op| (op.column, op.row)).collect();
    assert!(touched.iter().all(|&(c, r)| c == 0 && r == 0));
    assert!(!ops.is_empty());
}

#[test]
fn indices_above_fifteen_are_masked() {
    let bitmap = solid_bitmap(6, 12, 0x13);
    let plan = TransitionPlan {
        tiles: vec![crate::codec::transition::TileCoord { x: 0, y: 0 }],
        pacing: crate::codec::transition::RevealPacing::Atomic,
    };
    let mut vram = VRAMBuffer::new();
    let ops = render_bitmap_ops(&bitmap, &plan, &mut vram);
    // 0x13 & 0x0F == 0b0011: normal plane bit 0 + XOR plane bit 1.
    assert_eq!(ops.len(), 2);
    assert_eq!(ops[0].rows, [0x3F; 12]);
    assert_eq!(ops[1].color1, 1 << 1);
}
