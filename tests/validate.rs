//! Integration tests for the `validate` command.
use stackcost::cli::handle_validate_command;
use stackcost::log::is_logger_initialised;
use stackcost::settings::Settings;
use std::path::PathBuf;

/// Get the path to the bundled scenario.
fn get_scenario_dir() -> PathBuf {
    PathBuf::from("scenarios/default")
}

/// An integration test for the `validate` command.
///
/// We also check that the logger is initialised after it is run.
#[test]
fn test_handle_validate_command() {
    unsafe { std::env::set_var("STACKCOST_LOG_LEVEL", "off") };

    assert!(!is_logger_initialised());

    handle_validate_command(Some(&get_scenario_dir()), Some(Settings::default())).unwrap();

    assert!(is_logger_initialised());
}
