//! A regression test for the "approximation" example
use regression::run_regression_test;

#[test]
fn test_regression_approximation() {
    run_regression_test("approximation");
}
