/// Access frequency: `min(1, retrieval_count / saturation)`.
pub fn calculate(retrieval_count: u64, saturation: f64) -> f64 {
    if saturation <= 0.0 {
        return 1.0;
    }
    (retrieval_count as f64 / saturation).min(1.0)
}
