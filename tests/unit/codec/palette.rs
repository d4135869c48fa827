use super::*;

#[test]
fn rgb_quantization_matches_documented_layout() {
    // (255, 255, 0) -> r4=15, g4=15, b4=0.
    assert_eq!(rgb_to_cdg(255, 255, 0), (15 << 8) | (15 << 4));
    assert_eq!(rgb_to_cdg(0, 0, 0), 0);
    assert_eq!(rgb_to_cdg(255, 255, 255), 0x0FFF);
    // floor(16 / 17) == 0, floor(17 / 17) == 1.
    assert_eq!(rgb_to_cdg(16, 17, 34), (1 << 4) | 2);
}

#[test]
fn wire_word_repacks_channels() {
    let entry = rgb_to_cdg(255, 255, 0);
    assert_eq!(wire_word(entry), (15 << 10) | (15 << 6));
    assert_eq!(wire_word(0x0FFF), (15 << 10) | (15 << 6) | (15 << 2));
}

#[test]
fn wire_bytes_split_each_entry_high_then_low() {
    let mut table = PaletteTable::new();
    table.set(0, 0x0FFF);
    table.set(7, rgb_to_cdg(255, 0, 0));
    table.set(8, rgb_to_cdg(0, 255, 0));

    let low = table.wire_bytes(TableHalf::Low);
    let word = wire_word(0x0FFF);
    assert_eq!(low[0], (word >> 8) as u8);
    assert_eq!(low[1], (word & 0xFF) as u8);
    let red = wire_word(rgb_to_cdg(255, 0, 0));
    assert_eq!(low[14], (red >> 8) as u8);
    assert_eq!(low[15], (red & 0xFF) as u8);

    let high = table.wire_bytes(TableHalf::High);
    let green = wire_word(rgb_to_cdg(0, 255, 0));
    assert_eq!(high[0], (green >> 8) as u8);
    assert_eq!(high[1], (green & 0xFF) as u8);
    // Unset entries emit zero bytes.
    assert_eq!(&high[2..], &[0u8; 14]);
}

#[test]
fn out_of_range_indices_are_ignored() {
    let mut table = PaletteTable::new();
    table.set(16, 0x0123);
    assert_eq!(table.get(16), 0);
    assert_eq!(*table.entries(), [0u16; PALETTE_SIZE]);
}

#[test]
fn from_rgb_takes_at_most_sixteen_entries() {
    let colors: Vec<(u8, u8, u8)> = (0u8..20).map(|i| (i * 12, 0, 0)).collect();
    let table = PaletteTable::from_rgb(&colors);
    assert_eq!(table.get(0), 0);
    assert_eq!(table.get(15), rgb_to_cdg(15 * 12, 0, 0));
}

#[test]
fn from_entries_masks_to_twelve_bits() {
    let table = PaletteTable::from_entries(&[0xFFFF, 0x0ABC]);
    assert_eq!(table.get(0), 0x0FFF);
    assert_eq!(table.get(1), 0x0ABC);
}
