//! The command line interface for the cost projection.
use crate::log;
use crate::output::metadata::write_metadata;
use crate::output::{create_output_directory, get_output_dir, write_results};
use crate::scenario::Scenario;
use crate::settings::Settings;
use crate::simulation::{CostTable, simulate};
use ::log::{info, warn};
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use itertools::Itertools;
use std::path::{Path, PathBuf};

pub mod example;
pub mod settings;
use example::ExampleSubcommands;
use settings::SettingsSubcommands;

/// The number of months of results to show in the log once a run is complete
const PREVIEW_MONTHS: usize = 5;

/// The command line interface for the cost projection.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options for the run command
#[derive(Args, Default)]
pub struct RunOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already contains files
    #[arg(long)]
    pub overwrite: bool,
    /// Whether to write every cost component to a debug CSV file
    #[arg(long)]
    pub debug_model: bool,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Project stack costs for a scenario.
    Run {
        /// Path to the scenario directory. The built-in default scenario is used if omitted.
        scenario_dir: Option<PathBuf>,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Manage example scenarios.
    Example {
        /// The available subcommands for managing example scenarios.
        #[command(subcommand)]
        subcommand: ExampleSubcommands,
    },
    /// Validate a scenario.
    Validate {
        /// Path to the scenario directory. The built-in default scenario is used if omitted.
        scenario_dir: Option<PathBuf>,
    },
    /// Manage settings file.
    Settings {
        /// The subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Run { scenario_dir, opts } => {
                handle_run_command(scenario_dir.as_deref(), &opts, None)
            }
            Self::Example { subcommand } => subcommand.execute(),
            Self::Validate { scenario_dir } => {
                handle_validate_command(scenario_dir.as_deref(), None)
            }
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and run the requested command
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ stackcost --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        // Output program help
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Load the scenario from the given directory, or the built-in default if there is none
fn load_scenario(scenario_path: Option<&Path>) -> Result<Scenario> {
    match scenario_path {
        Some(path) => Scenario::from_path(path),
        None => Scenario::builtin(),
    }
}

/// Load the program settings, if not provided
fn load_settings(settings: Option<Settings>) -> Result<Settings> {
    match settings {
        Some(settings) => Ok(settings),
        None => Settings::load().context("Failed to load settings."),
    }
}

/// Handle the `run` command.
pub fn handle_run_command(
    scenario_path: Option<&Path>,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let mut settings = load_settings(settings)?;

    // These settings can be overridden by command-line arguments
    if opts.debug_model {
        settings.debug_model = true;
    }
    if opts.overwrite {
        settings.overwrite = true;
    }

    // Get path to output folder
    let pathbuf: PathBuf;
    let output_path = if let Some(p) = opts.output_dir.as_deref() {
        p
    } else {
        pathbuf = get_output_dir(scenario_path)?;
        &pathbuf
    };

    let overwrite =
        create_output_directory(output_path, settings.overwrite).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_path.display()
            )
        })?;

    // Initialise program logger
    log::init(&settings.log_level, Some(output_path))
        .context("Failed to initialise logging.")?;

    // Load the scenario to run
    let scenario = load_scenario(scenario_path).context("Failed to load scenario.")?;
    match scenario_path {
        Some(path) => info!("Loaded scenario from {}", path.display()),
        None => info!("Using built-in default scenario"),
    }
    info!("Output folder: {}", output_path.display());

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder will be overwritten");
    }

    // Run the projection, then write everything out
    let table = simulate(&scenario);
    write_results(output_path, &scenario, &table, settings.debug_model)?;
    write_metadata(output_path, scenario_path, scenario.months)
        .context("Failed to save metadata.")?;
    log_preview(&table);
    info!("Projection complete!");

    Ok(())
}

/// Log the stack totals for the first few months
fn log_preview(table: &CostTable) {
    for record in table.months().iter().take(PREVIEW_MONTHS) {
        let totals = table
            .stack_ids()
            .iter()
            .zip(&record.totals)
            .map(|(id, total)| format!("{id}: {:.2}", total.value()))
            .join(", ");
        info!("Month {}: {totals}", record.month);
    }
}

/// Handle the `validate` command.
pub fn handle_validate_command(
    scenario_path: Option<&Path>,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = load_settings(settings)?;

    // Initialise program logger (we won't save log files when running the validate command)
    log::init(&settings.log_level, None).context("Failed to initialise logging.")?;

    // Load/validate the scenario
    load_scenario(scenario_path).context("Failed to validate scenario.")?;
    info!("Scenario validation successful!");

    Ok(())
}
