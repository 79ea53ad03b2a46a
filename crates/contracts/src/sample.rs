//! Sample - SensorSource output
//!
//! One 3-axis reading and its staged byte layout.

use serde::{Deserialize, Serialize};

/// Bytes occupied by one staged sample (3 x i16)
pub const SAMPLE_WIDTH: usize = 6;

/// 3-axis motion sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl Sample {
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    /// Staged encoding: x, y, z, each little-endian
    pub fn to_le_bytes(&self) -> [u8; SAMPLE_WIDTH] {
        let [x0, x1] = self.x.to_le_bytes();
        let [y0, y1] = self.y.to_le_bytes();
        let [z0, z1] = self.z.to_le_bytes();
        [x0, x1, y0, y1, z0, z1]
    }

    /// Decode one staged record
    pub fn from_le_bytes(bytes: [u8; SAMPLE_WIDTH]) -> Self {
        Self {
            x: i16::from_le_bytes([bytes[0], bytes[1]]),
            y: i16::from_le_bytes([bytes[2], bytes[3]]),
            z: i16::from_le_bytes([bytes[4], bytes[5]]),
        }
    }

    /// Decode a byte stream of concatenated samples, ignoring a trailing partial record
    pub fn decode_all(bytes: &[u8]) -> Vec<Sample> {
        bytes
            .chunks_exact(SAMPLE_WIDTH)
            .map(|chunk| {
                let mut record = [0u8; SAMPLE_WIDTH];
                record.copy_from_slice(chunk);
                Sample::from_le_bytes(record)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_layout() {
        let sample = Sample::new(1, -1, 0x1234);
        assert_eq!(sample.to_le_bytes(), [0x01, 0x00, 0xFF, 0xFF, 0x34, 0x12]);
    }

    #[test]
    fn test_decode_all_skips_partial_tail() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&Sample::new(1, 2, 3).to_le_bytes());
        bytes.extend_from_slice(&Sample::new(-4, -5, -6).to_le_bytes());
        bytes.extend_from_slice(&[0xAA, 0xBB]);

        let samples = Sample::decode_all(&bytes);
        assert_eq!(samples, vec![Sample::new(1, 2, 3), Sample::new(-4, -5, -6)]);
    }
}
