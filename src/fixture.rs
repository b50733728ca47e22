//! Fixtures for tests

use crate::drivers::Drivers;
use crate::scenario::Scenario;
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

#[fixture]
pub fn drivers() -> Drivers {
    Drivers::default()
}

#[fixture]
pub fn scenario() -> Scenario {
    Scenario::builtin().unwrap()
}
