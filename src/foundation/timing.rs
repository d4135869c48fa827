//! Packet-rate constants and timing conversions.
//!
//! All timing math in the crate goes through [`PACKETS_PER_SECOND`]. The
//! sector framing of the physical medium (75 sectors/sec carrying 4 graphics
//! packets each) resolves to the same rate and only exists here so callers
//! working in CD frames can convert without inventing their own constant.

/// Nominal CD+G packet rate, in packets per second of audio.
pub const PACKETS_PER_SECOND: u32 = 300;

/// CD sector rate of the underlying medium.
pub const SECTORS_PER_SECOND: u32 = 75;

/// Graphics packets carried per CD sector.
pub const PACKETS_PER_SECTOR: u32 = 4;

/// Size of one CD+G packet on the wire, in bytes.
pub const PACKET_SIZE: usize = 24;

/// Convert a duration in seconds to whole packets, rounding down.
pub fn secs_to_packets_floor(secs: f64) -> u64 {
    (secs * f64::from(PACKETS_PER_SECOND)).floor().max(0.0) as u64
}

/// Convert a packet count to seconds.
pub fn packets_to_secs(packets: u64) -> f64 {
    (packets as f64) / f64::from(PACKETS_PER_SECOND)
}
