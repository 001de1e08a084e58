//! Numeric and boolean value generators.

use rand::Rng;

/// Upper bound (inclusive) of the default number generator.
pub const MAX_GENERATED_NUMBER: i64 = 999;

/// Generate a random integer in the given range (inclusive).
///
/// An inverted range collapses to `min`.
pub fn generate_random_number<R: Rng + ?Sized>(rng: &mut R, min: i64, max: i64) -> i64 {
    if min >= max {
        return min;
    }
    rng.random_range(min..=max)
}

/// Generate a random integer in `[0, 999]`.
pub fn generate_number<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    generate_random_number(rng, 0, MAX_GENERATED_NUMBER) as f64
}

/// Generate a boolean from the parity of a random integer in `[1, 10]`.
pub fn generate_boolean<R: Rng + ?Sized>(rng: &mut R) -> bool {
    generate_random_number(rng, 1, 10) % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_random_number() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let value = generate_random_number(&mut rng, 10, 20);
            assert!((10..=20).contains(&value));
        }
    }

    #[test]
    fn test_generate_random_number_degenerate_range() {
        let mut rng = StdRng::seed_from_u64(42);

        assert_eq!(generate_random_number(&mut rng, 5, 5), 5);
        assert_eq!(generate_random_number(&mut rng, 9, 3), 9);
    }

    #[test]
    fn test_generate_number() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let value = generate_number(&mut rng);
            assert!((0.0..=999.0).contains(&value));
            assert_eq!(value.fract(), 0.0);
        }
    }

    #[test]
    fn test_generate_boolean_yields_both() {
        let mut rng = StdRng::seed_from_u64(42);

        let values: Vec<bool> = (0..200).map(|_| generate_boolean(&mut rng)).collect();
        assert!(values.contains(&true));
        assert!(values.contains(&false));
    }

    #[test]
    fn test_deterministic_generation() {
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);

        assert_eq!(generate_number(&mut rng1), generate_number(&mut rng2));
    }
}
