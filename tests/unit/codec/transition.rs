use super::*;

use std::collections::HashSet;

fn covers_grid_once(plan: &TransitionPlan) {
    assert_eq!(plan.len(), TILE_COUNT);
    let unique: HashSet<TileCoord> = plan.tiles.iter().copied().collect();
    assert_eq!(unique.len(), TILE_COUNT);
    for coord in &plan.tiles {
        assert!((coord.x as usize) < TILE_COLUMNS);
        assert!((coord.y as usize) < TILE_ROWS);
    }
}

fn full_grid_cmt() -> Vec<u8> {
    let mut bytes = Vec::with_capacity(2 * TILE_COUNT);
    for y in 1..=TILE_ROWS as u8 {
        for x in 1..=TILE_COLUMNS as u8 {
            bytes.push(x);
            bytes.push(y);
        }
    }
    bytes
}

#[test]
fn sequential_is_row_major() {
    let plan = TransitionPlan::sequential();
    covers_grid_once(&plan);
    assert_eq!(plan.pacing, RevealPacing::Paced);
    assert_eq!(plan.tiles[0], TileCoord { x: 0, y: 0 });
    assert_eq!(plan.tiles[1], TileCoord { x: 1, y: 0 });
    assert_eq!(plan.tiles[TILE_COLUMNS], TileCoord { x: 0, y: 1 });
}

#[test]
fn atomic_covers_grid_with_atomic_pacing() {
    let plan = TransitionPlan::atomic();
    covers_grid_once(&plan);
    assert_eq!(plan.pacing, RevealPacing::Atomic);
}

#[test]
fn full_file_loads_without_backfill_reordering() {
    let bytes = full_grid_cmt();
    let plan = TransitionPlan::from_cmt_bytes(&bytes);
    covers_grid_once(&plan);
    // First pair (1,1) is tile (0,0) after 1-indexed conversion.
    assert_eq!(plan.tiles[0], TileCoord { x: 0, y: 0 });
    assert_eq!(plan.tiles[TILE_COUNT - 1], TileCoord { x: 49, y: 17 });
}

#[test]
fn duplicates_keep_first_occurrence() {
    let mut bytes = full_grid_cmt();
    // Repeat the first pair at the end; the grid is still fully covered.
    bytes.extend_from_slice(&[1, 1]);
    let plan = TransitionPlan::from_cmt_bytes(&bytes);
    covers_grid_once(&plan);
}

#[test]
fn out_of_range_coordinates_are_clamped_not_dropped() {
    // (0,0) underflows to tile (0,0); (255,255) clamps to (49,17).
    let plan = TransitionPlan::from_cmt_bytes(&[0, 0, 255, 255]);
    covers_grid_once(&plan);
    assert_eq!(plan.tiles[0], TileCoord { x: 0, y: 0 });
    assert_eq!(plan.tiles[1], TileCoord { x: 49, y: 17 });
}

#[test]
fn undersized_file_is_backfilled_in_row_major_order() {
    // A legacy 768-entry file covering only the first 16 rows.
    let mut bytes = Vec::new();
    for y in 1..=16u8 {
        for x in 1..=TILE_COLUMNS as u8 {
            bytes.push(x);
            bytes.push(y);
        }
    }
    let plan = TransitionPlan::from_cmt_bytes(&bytes);
    covers_grid_once(&plan);
    // The two missing rows arrive at the end, row major.
    assert_eq!(plan.tiles[800], TileCoord { x: 0, y: 16 });
    assert_eq!(plan.tiles[801], TileCoord { x: 1, y: 16 });
    assert_eq!(plan.tiles[TILE_COUNT - 1], TileCoord { x: 49, y: 17 });
}

#[test]
fn odd_trailing_byte_is_ignored() {
    let mut bytes = full_grid_cmt();
    bytes.push(42);
    let plan = TransitionPlan::from_cmt_bytes(&bytes);
    covers_grid_once(&plan);
}

#[test]
fn empty_input_yields_a_fully_backfilled_plan() {
    let plan = TransitionPlan::from_cmt_bytes(&[]);
    covers_grid_once(&plan);
    assert_eq!(plan.tiles, TransitionPlan::sequential().tiles);
}

#[test]
fn file_loader_reads_and_parses() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reveal.cmt");
    std::fs::write(&path, full_grid_cmt()).unwrap();
    let plan = TransitionPlan::from_cmt_file(&path).unwrap();
    covers_grid_once(&plan);

    let missing = dir.path().join("missing.cmt");
    assert!(TransitionPlan::from_cmt_file(&missing).is_err());
}
