//! Testing helpers.

use assert_float_eq::*;

pub fn assert_opt_f64_relative(expected: Option<f64>, actual: Option<f64>, epsilon: f64) {
    match (expected, actual) {
        (None, None) => {}
        (Some(expected), Some(actual)) => {
            if actual != expected {
                assert_float_relative_eq!(expected, actual, epsilon);
            }
        }
        _ => panic!("definedness does not match: {expected:?} ≠ {actual:?}"),
    }
}

pub fn assert_slice_opt_f64_relative(
    expected: &[Option<f64>],
    actual: &[Option<f64>],
    epsilon: f64,
) {
    assert_eq!(
        expected.len(),
        actual.len(),
        "lengths do not match: {} ≠ {}",
        expected.len(),
        actual.len()
    );
    for (index, &expected) in expected.iter().enumerate() {
        assert_opt_f64_relative(expected, actual[index], epsilon);
    }
}
