//! Projects the monthly cost of competing data-platform stacks.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod cli;
pub mod drivers;
pub mod id;
pub mod input;
pub mod log;
pub mod output;
pub mod pricing;
pub mod scenario;
pub mod settings;
pub mod simulation;
pub mod stack;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get the config folder for the program.
///
/// Falls back on the current directory if there is no config directory for the platform.
pub fn get_stackcost_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        return PathBuf::default();
    };

    config_dir.push("stackcost");
    config_dir
}
