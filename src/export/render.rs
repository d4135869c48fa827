//! Bitmap-to-tile rendering with VRAM change detection.
//!
//! Tile packets carry 1 bit per pixel, so indexed artwork is decomposed
//! into bit planes: a normal tile write for bit 0, then XOR tiles for bits
//! 1-3. A decoder replaying the planes reconstructs the exact 4-bit index
//! at every pixel. The render diffs each tile against a caller-owned
//! [`VRAMBuffer`] and skips tiles (and planes) that would not change
//! anything on screen.

use crate::assets::bitmap::IndexedBitmap;
use crate::codec::transition::TransitionPlan;
use crate::codec::vram::{BLOCK_LEN, TILE_HEIGHT, TILE_WIDTH, VRAMBuffer};
use crate::composition::model::TilePatch;

/// Index bit planes per pixel (CD+G palettes hold 16 colors).
const INDEX_BITS: u8 = 4;

/// Compute the tile writes that draw `bitmap` in `plan` order.
///
/// `vram` reflects the current screen content and is updated as tiles are
/// produced; pass a freshly cleared buffer for a draw that follows a memory
/// preset. Bitmap pixels outside the 16-color range are masked to their low
/// 4 bits; tiles whose content already matches VRAM produce no ops.
pub fn render_bitmap_ops(
    bitmap: &IndexedBitmap,
    plan: &TransitionPlan,
    vram: &mut VRAMBuffer,
) -> Vec<TilePatch> {
    let mut ops = Vec::new();
    for coord in &plan.tiles {
        let bx = coord.x as usize;
        let by = coord.y as usize;
        let desired = sample_block(bitmap, bx, by);
        if vram.block_matches(bx, by, &desired) {
            continue;
        }

        for plane in 0..INDEX_BITS {
            let rows = plane_rows(&desired, plane);
            // The first plane is a normal write and always emitted: it
            // establishes the tile's low bit and clears stale content.
            // Higher planes are XOR layers, skipped when empty.
            if plane > 0 && rows == [0u8; TILE_HEIGHT] {
                continue;
            }
            ops.push(TilePatch {
                column: coord.x,
                row: coord.y,
                color0: 0,
                color1: 1 << plane,
                rows,
                xor: plane > 0,
            });
        }

        vram.write_block(bx, by, &desired);
    }

    tracing::debug!(
        tiles = plan.tiles.len(),
        ops = ops.len(),
        "rendered bitmap tile ops"
    );
    ops
}

/// Read the 6x12 block of palette indices under tile (bx, by), masked to
/// 4 bits. Pixels outside the bitmap extent read as 0.
fn sample_block(bitmap: &IndexedBitmap, bx: usize, by: usize) -> [u8; BLOCK_LEN] {
    let mut block = [0u8; BLOCK_LEN];
    let width = bitmap.width as usize;
    let height = bitmap.height as usize;
    for row in 0..TILE_HEIGHT {
        for col in 0..TILE_WIDTH {
            let px = bx * TILE_WIDTH + col;
            let py = by * TILE_HEIGHT + row;
            if px < width && py < height {
                block[row * TILE_WIDTH + col] = bitmap.pixels[py * width + px] & 0x0F;
            }
        }
    }
    block
}

/// Extract one bit plane of a block as 12 rows of 6-bit masks
/// (bit 5 = leftmost pixel).
fn plane_rows(block: &[u8; BLOCK_LEN], plane: u8) -> [u8; TILE_HEIGHT] {
    let mut rows = [0u8; TILE_HEIGHT];
    for (row, out) in rows.iter_mut().enumerate() {
        let mut bits = 0u8;
        for col in 0..TILE_WIDTH {
            if (block[row * TILE_WIDTH + col] >> plane) & 1 == 1 {
                bits |= 1 << (TILE_WIDTH - 1 - col);
            }
        }
        *out = bits;
    }
    rows
}

#[cfg(test)]
#[path = "../../tests/unit/export/render.rs"]
mod tests;
