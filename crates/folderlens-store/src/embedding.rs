//! Lossy uint8 codec for persisted file embeddings.
//!
//! A stored embedding is a similarity signal, not ground truth, so each
//! vector is kept as one byte per component with a per-vector scale and
//! offset. Decoding reconstructs `byte * scale + offset`.

/// One file embedding in its persisted form.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizedEmbedding {
    pub bytes: Vec<u8>,
    pub scale: f32,
    pub offset: f32,
}

impl QuantizedEmbedding {
    /// Encode a float vector by mapping `[min, max]` linearly onto
    /// `[0, 255]`.
    pub fn encode(values: &[f32]) -> Self {
        let min_val = values.iter().copied().fold(f32::INFINITY, f32::min);
        let max_val = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);

        let range = max_val - min_val;
        if range < 1e-9 {
            // Constant vector: every byte decodes to the offset
            return Self {
                bytes: vec![0u8; values.len()],
                scale: 0.0,
                offset: min_val,
            };
        }

        let scale = range / 255.0;
        let offset = min_val;
        let bytes = values
            .iter()
            .map(|&v| ((v - offset) / scale).round().clamp(0.0, 255.0) as u8)
            .collect();

        Self {
            bytes,
            scale,
            offset,
        }
    }

    /// Decode back to the float vector a `FileRecord` carries.
    pub fn decode(&self) -> Vec<f32> {
        self.bytes
            .iter()
            .map(|&b| b as f32 * self.scale + self.offset)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_within_tolerance() {
        let original = vec![0.1f32, 0.5, -0.3, 0.8, -0.1];
        let restored = QuantizedEmbedding::encode(&original).decode();

        assert_eq!(restored.len(), original.len());
        for (a, b) in original.iter().zip(restored.iter()) {
            assert!((a - b).abs() < 0.01, "Values differ: {} vs {}", a, b);
        }
    }

    #[test]
    fn test_constant_vector() {
        let encoded = QuantizedEmbedding::encode(&[0.5f32, 0.5, 0.5]);
        assert_eq!(encoded.scale, 0.0);
        assert_eq!(encoded.offset, 0.5);
        assert!(encoded.bytes.iter().all(|&b| b == 0));
        assert_eq!(encoded.decode(), vec![0.5f32, 0.5, 0.5]);
    }

    #[test]
    fn test_extremes_map_to_byte_range() {
        let encoded = QuantizedEmbedding::encode(&[-1.0f32, 0.0, 1.0]);
        assert_eq!(encoded.bytes[0], 0);
        assert_eq!(encoded.bytes[2], 255);
    }
}
