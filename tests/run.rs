//! Integration tests for the `run` command.
use stackcost::cli::{RunOpts, handle_run_command};
use stackcost::settings::Settings;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

/// Get the path to the bundled scenario.
fn get_scenario_dir() -> PathBuf {
    PathBuf::from("scenarios/custom_stacks")
}

/// An integration test for the `run` command.
#[test]
fn test_handle_run_command() {
    unsafe { std::env::set_var("STACKCOST_LOG_LEVEL", "off") };

    // Save results to non-existent directory to check that directory creation works
    let tempdir = tempdir().unwrap();
    let output_dir = tempdir.path().join("results");
    let opts = RunOpts {
        output_dir: Some(output_dir.clone()),
        overwrite: false,
        debug_model: true,
    };
    handle_run_command(Some(&get_scenario_dir()), &opts, Some(Settings::default())).unwrap();

    for file_name in [
        "mixed_stacks.csv",
        "mixed_stacks.svg",
        "debug_cost_components.csv",
        "metadata.toml",
        "stackcost_info.log",
        "stackcost_error.log",
    ] {
        assert!(
            output_dir.join(file_name).is_file(),
            "Missing output file {file_name}"
        );
    }

    let table = fs::read_to_string(output_dir.join("mixed_stacks.csv")).unwrap();
    let mut lines = table.lines();
    assert_eq!(
        lines.next(),
        Some("month,Snowflake_Airbyte_PowerBI,BigQuery_Fivetran_QuickSight,Databricks_Fivetran_Tableau")
    );
    assert_eq!(lines.count(), 24);

    // Second time will fail because the logging is already initialised
    let opts = RunOpts {
        output_dir: Some(tempdir.path().join("results2")),
        ..RunOpts::default()
    };
    assert_eq!(
        handle_run_command(Some(&get_scenario_dir()), &opts, Some(Settings::default()))
            .unwrap_err()
            .chain()
            .next()
            .unwrap()
            .to_string(),
        "Failed to initialise logging."
    );
}
