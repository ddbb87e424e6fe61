//! Float assertions shared by the workspace tests.

use assert_float_eq::*;

/// Asserts that two slices have the same length and that each pair of elements lies within a
/// relative `epsilon` of one another.
pub fn assert_slice_f64_relative(expected: &[f64], actual: &[f64], epsilon: f64) {
    assert_eq!(
        expected.len(),
        actual.len(),
        "lengths do not match: {} ≠ {}",
        expected.len(),
        actual.len()
    );
    for (index, &expected) in expected.iter().enumerate() {
        let actual = actual[index];
        if actual != expected {
            assert_float_relative_eq!(expected, actual, epsilon);
        }
    }
}

/// Asserts that the elements of `values` sum to `expected` within an absolute `epsilon`.
pub fn assert_sum_f64_near(expected: f64, values: &[f64], epsilon: f64) {
    let sum: f64 = values.iter().sum();
    assert_float_absolute_eq!(expected, sum, epsilon);
}

/// Asserts that `values` are strictly descending.
pub fn assert_strictly_descending(values: &[f64]) {
    for pair in values.windows(2) {
        assert!(pair[0] > pair[1], "{} is not greater than {} in {values:?}", pair[0], pair[1]);
    }
}
