//! Little-endian f32 blob encoding for embedding vectors.

/// Encode a vector as little-endian f32 bytes.
pub fn f32_vec_to_bytes(vector: &[f32]) -> Vec<u8> {
    vector.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Decode little-endian f32 bytes. Trailing partial values are dropped.
pub fn bytes_to_f32_vec(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_values() {
        let v = vec![0.5f32, -1.25, 3.0e-7, 0.0];
        assert_eq!(bytes_to_f32_vec(&f32_vec_to_bytes(&v)), v);
    }

    #[test]
    fn empty_vector_is_empty_blob() {
        assert!(f32_vec_to_bytes(&[]).is_empty());
        assert!(bytes_to_f32_vec(&[1, 2, 3]).is_empty());
    }
}
