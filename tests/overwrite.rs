//! Integration tests for running into an output folder which already has contents.
use stackcost::cli::{RunOpts, handle_run_command};
use stackcost::settings::Settings;
use std::fs;
use tempfile::tempdir;

/// Check that a non-empty output folder is only reused when overwriting is enabled
#[test]
fn test_run_existing_output_dir() {
    unsafe { std::env::set_var("STACKCOST_LOG_LEVEL", "off") };

    let tempdir = tempdir().unwrap();
    let output_dir = tempdir.path().to_path_buf();
    let old_file = output_dir.join("old.txt");
    fs::write(&old_file, "old results").unwrap();

    // The output folder is checked before the logger is set up, so this doesn't initialise it
    let opts = RunOpts {
        output_dir: Some(output_dir.clone()),
        ..RunOpts::default()
    };
    assert_eq!(
        handle_run_command(None, &opts, Some(Settings::default()))
            .unwrap_err()
            .chain()
            .next()
            .unwrap()
            .to_string(),
        format!(
            "Failed to create output directory: {}",
            output_dir.display()
        )
    );
    assert!(old_file.exists());

    let opts = RunOpts {
        output_dir: Some(output_dir.clone()),
        overwrite: true,
        debug_model: false,
    };
    handle_run_command(None, &opts, Some(Settings::default())).unwrap();
    assert!(!old_file.exists());
    assert!(output_dir.join("stack_comparison_output.csv").is_file());
    assert!(!output_dir.join("debug_cost_components.csv").exists());
}
