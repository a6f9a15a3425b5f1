//! Similarity metrics between embedding vectors

/// Largest component magnitude, or `0.0` for a zero vector.
fn max_abs(v: &[f64]) -> f64 {
    v.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()))
}

/// Compute cosine similarity `dot(a, b) / (|a| * |b|)`.
///
/// Each operand is first divided by its largest component magnitude, so any
/// pair of finite vectors scores the same as their rescaled copies and the
/// sums of squares can neither overflow nor underflow. A zero-norm operand
/// yields `0.0` instead of dividing by zero. The result is clamped to
/// `[-1, 1]` to absorb floating point drift. Callers must pass slices of
/// equal length.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let scale_a = max_abs(a);
    let scale_b = max_abs(b);
    if scale_a == 0.0 || scale_b == 0.0 {
        return 0.0;
    }

    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (x / scale_a, y / scale_b);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let sim = dot / (norm_a.sqrt() * norm_b.sqrt());
    if !sim.is_finite() {
        return 0.0;
    }
    sim.clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cosine_identical() {
        let sim = cosine_similarity(&[1.0, 0.0, 0.0], &[1.0, 0.0, 0.0]);
        assert_relative_eq!(sim, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cosine_orthogonal() {
        let sim = cosine_similarity(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]);
        assert_relative_eq!(sim, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cosine_opposite() {
        let sim = cosine_similarity(&[1.0, 0.0, 0.0], &[-1.0, 0.0, 0.0]);
        assert_relative_eq!(sim, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cosine_ignores_magnitude() {
        let sim = cosine_similarity(&[3.0, 4.0], &[6.0, 8.0]);
        assert_relative_eq!(sim, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cosine_zero_vector_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[0.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_cosine_huge_components() {
        assert_eq!(cosine_similarity(&[1e200, 0.0], &[1.0, 0.0]), 1.0);
        assert_relative_eq!(
            cosine_similarity(&[1e200, 1e200], &[1.0, 1.0]),
            1.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            cosine_similarity(&[1e200, 1e200], &[1.0, 0.0]),
            std::f64::consts::FRAC_1_SQRT_2,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_cosine_tiny_components() {
        assert_eq!(cosine_similarity(&[1e-200, 0.0], &[1.0, 0.0]), 1.0);
        assert_eq!(cosine_similarity(&[5e-324, 0.0], &[-1.0, 0.0]), -1.0);
        assert_relative_eq!(
            cosine_similarity(&[1e-200, 1e-200], &[1e200, 0.0]),
            std::f64::consts::FRAC_1_SQRT_2,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_cosine_orthogonal_is_positive_zero() {
        let sim = cosine_similarity(&[1.0, 0.0], &[-0.0, 1.0]);
        assert_eq!(sim.to_bits(), 0.0_f64.to_bits());
    }
}
