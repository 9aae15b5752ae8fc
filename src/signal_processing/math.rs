/// Root-mean-square amplitude of a buffer, 0.0 for an empty buffer.
pub fn rms(buffer: &[f32]) -> f32 {
    if buffer.is_empty() {
        return 0.0;
    }
    let sum: f32 = buffer.iter().map(|&x| x * x).sum();
    (sum / buffer.len() as f32).sqrt()
}

/// Evaluate `coeffs[0]·x^(n-1) + ... + coeffs[n-1]` by Horner's rule.
pub fn polynomial(coeffs: &[f32], x: f32) -> f32 {
    coeffs.iter().fold(0.0, |acc, &c| acc * x + c)
}
