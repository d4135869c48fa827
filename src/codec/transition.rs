//! Tile reveal order for progressive drawing.
//!
//! A [`TransitionPlan`] lists every tile of the 50x18 grid exactly once in
//! the order it should be revealed, plus a pacing mode. Plans come from one
//! of three strategies: the sequential row-major default, the atomic
//! full-frame reveal, or a `.cmt` transition file.

use anyhow::Context;

use crate::codec::vram::{TILE_COLUMNS, TILE_COUNT, TILE_ROWS};
use crate::foundation::error::GraphyteResult;

/// A 0-indexed tile coordinate: x in [0, 49], y in [0, 17].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TileCoord {
    /// Tile column.
    pub x: u8,
    /// Tile row.
    pub y: u8,
}

/// How reveal steps map onto the packet timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RevealPacing {
    /// Spread tile packets across the clip duration.
    Paced,
    /// Emit all tile packets back to back so the content appears as a
    /// single frame.
    Atomic,
}

/// An ordered, complete cover of the tile grid.
///
/// Invariant after construction: every grid position appears exactly once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionPlan {
    /// Reveal order over the full grid.
    pub tiles: Vec<TileCoord>,
    /// Pacing mode for the scheduler.
    pub pacing: RevealPacing,
}

impl TransitionPlan {
    /// The default paced reveal: row by row, left to right.
    pub fn sequential() -> Self {
        Self {
            tiles: row_major_tiles(),
            pacing: RevealPacing::Paced,
        }
    }

    /// A full-grid plan scheduled as one atomic reveal (overlay text and
    /// other content that must not draw progressively).
    pub fn atomic() -> Self {
        Self {
            tiles: row_major_tiles(),
            pacing: RevealPacing::Atomic,
        }
    }

    /// Parse a `.cmt` transition blob: 1-indexed (x, y) byte pairs, nominal
    /// size `2 * 900` bytes.
    ///
    /// Best-effort recovery, never an error: undersized or oversized input
    /// is processed as whole pairs, out-of-range coordinates are clamped
    /// into the grid, duplicates keep their first occurrence, and any grid
    /// position still missing is appended in row-major order at the end
    /// (with a logged warning) so the order covers every tile.
    pub fn from_cmt_bytes(bytes: &[u8]) -> Self {
        if bytes.len() != 2 * TILE_COUNT {
            tracing::warn!(
                len = bytes.len(),
                expected = 2 * TILE_COUNT,
                "transition file has unexpected size, processing whole pairs"
            );
        }

        let mut seen = [false; TILE_COUNT];
        let mut tiles = Vec::with_capacity(TILE_COUNT);
        for pair in bytes.chunks_exact(2) {
            let x = clamp_one_indexed(pair[0], TILE_COLUMNS);
            let y = clamp_one_indexed(pair[1], TILE_ROWS);
            let slot = y * TILE_COLUMNS + x;
            if !seen[slot] {
                seen[slot] = true;
                tiles.push(TileCoord {
                    x: x as u8,
                    y: y as u8,
                });
            }
        }

        let missing = TILE_COUNT - tiles.len();
        if missing > 0 {
            tracing::warn!(missing, "transition order does not cover the tile grid, backfilling");
            for coord in row_major_tiles() {
                let slot = coord.y as usize * TILE_COLUMNS + coord.x as usize;
                if !seen[slot] {
                    seen[slot] = true;
                    tiles.push(coord);
                }
            }
        }

        Self {
            tiles,
            pacing: RevealPacing::Paced,
        }
    }

    /// Read and parse a `.cmt` transition file.
    pub fn from_cmt_file(path: &std::path::Path) -> GraphyteResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read transition file {}", path.display()))?;
        Ok(Self::from_cmt_bytes(&bytes))
    }

    /// Number of reveal steps (always [`TILE_COUNT`] after construction).
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// True when the plan has no steps. Constructed plans are never empty.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

fn row_major_tiles() -> Vec<TileCoord> {
    let mut tiles = Vec::with_capacity(TILE_COUNT);
    for y in 0..TILE_ROWS {
        for x in 0..TILE_COLUMNS {
            tiles.push(TileCoord {
                x: x as u8,
                y: y as u8,
            });
        }
    }
    tiles
}

fn clamp_one_indexed(value: u8, count: usize) -> usize {
    (value as usize).saturating_sub(1).min(count - 1)
}

#[cfg(test)]
#[path = "../../tests/unit/codec/transition.rs"]
mod tests;
