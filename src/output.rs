//! The module responsible for writing output data to disk.
use crate::drivers::Drivers;
use crate::pricing::CostComponents;
use crate::scenario::Scenario;
use crate::simulation::{CostTable, MonthRecord};
use crate::stack::{MONTH_COLUMN, StackID};
use crate::units::Money;
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use serde::Serialize;
use std::fs;
use std::fs::File;
use std::iter;
use std::path::{Path, PathBuf};

pub mod chart;
pub mod metadata;

/// The root folder in which scenario-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "stackcost_results";

/// The name used for the output folder when running the built-in default scenario
const DEFAULT_SCENARIO_NAME: &str = "default";

/// The output file name for the per-component debug table
const DEBUG_COST_COMPONENTS_FILE_NAME: &str = "debug_cost_components.csv";

/// Get the output folder for the scenario at the specified path.
///
/// If no scenario directory is given, the built-in default scenario is assumed.
pub fn get_output_dir(scenario_dir: Option<&Path>) -> Result<PathBuf> {
    let Some(scenario_dir) = scenario_dir else {
        return Ok([OUTPUT_DIRECTORY_ROOT, DEFAULT_SCENARIO_NAME].iter().collect());
    };

    // Canonicalise in case the user has specified "."
    let scenario_dir = scenario_dir
        .canonicalize()
        .context("Could not resolve path to scenario")?;

    let scenario_name = scenario_dir
        .file_name()
        .context("Scenario cannot be in root folder")?
        .to_str()
        .context("Invalid chars in scenario dir name")?;

    Ok([OUTPUT_DIRECTORY_ROOT, scenario_name].iter().collect())
}

/// Create a new output directory, optionally clearing out an existing one.
///
/// # Arguments
///
/// * `output_dir` - The folder to create
/// * `allow_overwrite` - Whether a non-empty existing folder may be emptied and reused
///
/// # Returns
///
/// `true` if an existing folder with contents was overwritten, else `false`
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    if output_dir.is_dir() {
        if output_dir.read_dir()?.next().is_none() {
            // Already exists and is empty
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. Use --overwrite to replace its contents."
        );

        fs::remove_dir_all(output_dir)?;
        fs::create_dir_all(output_dir)?;
        return Ok(true);
    }

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(false)
}

/// The month column of the debug table.
///
/// This will be written along with the month's [`Drivers`] and [`CostComponents`].
#[derive(Serialize)]
struct MonthRow {
    month: u32,
}

/// A row of the stack totals table, as read back from file
#[derive(Debug, Clone, PartialEq)]
pub struct StackTotalsRow {
    /// The month index
    pub month: u32,
    /// The total for each stack, in column order
    pub totals: Vec<Money>,
}

/// An object for writing the projected costs to file
pub struct DataWriter {
    table_writer: csv::Writer<File>,
    debug_writer: Option<csv::Writer<File>>,
}

impl DataWriter {
    /// Open CSV files to write output data to and write the table header.
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    /// * `table_file` - File name for the stack totals table, relative to `output_path`
    /// * `stack_ids` - The stack columns, in order
    /// * `save_debug_info` - Whether to also write every cost component to a debug CSV file
    pub fn create(
        output_path: &Path,
        table_file: &Path,
        stack_ids: &[StackID],
        save_debug_info: bool,
    ) -> Result<Self> {
        let mut table_writer = csv::Writer::from_path(output_path.join(table_file))?;
        table_writer.write_record(
            iter::once(MONTH_COLUMN).chain(stack_ids.iter().map(StackID::as_str)),
        )?;

        let debug_writer = if save_debug_info {
            Some(csv::Writer::from_path(
                output_path.join(DEBUG_COST_COMPONENTS_FILE_NAME),
            )?)
        } else {
            None
        };

        Ok(Self {
            table_writer,
            debug_writer,
        })
    }

    /// Write a single month's results
    pub fn write_month(&mut self, record: &MonthRecord) -> Result<()> {
        self.table_writer.write_record(
            iter::once(record.month.to_string())
                .chain(record.totals.iter().map(|total| total.value().to_string())),
        )?;

        if let Some(wtr) = &mut self.debug_writer {
            write_debug_row(wtr, record.month, &record.drivers, &record.costs)?;
        }

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        self.table_writer.flush()?;
        if let Some(wtr) = &mut self.debug_writer {
            wtr.flush()?;
        }

        Ok(())
    }
}

/// Write the month, its drivers and every cost component as one row
fn write_debug_row(
    wtr: &mut csv::Writer<File>,
    month: u32,
    drivers: &Drivers,
    costs: &CostComponents,
) -> Result<()> {
    wtr.serialize((MonthRow { month }, drivers, costs))?;
    Ok(())
}

/// Write all results for a completed projection: the table, the optional debug table and the chart
pub fn write_results(
    output_path: &Path,
    scenario: &Scenario,
    table: &CostTable,
    save_debug_info: bool,
) -> Result<()> {
    let table_path = output_path.join(&scenario.output.table_file);
    let mut writer = DataWriter::create(
        output_path,
        &scenario.output.table_file,
        table.stack_ids(),
        save_debug_info,
    )
    .with_context(|| format!("Failed to create {}", table_path.display()))?;
    for record in table.months() {
        writer.write_month(record)?;
    }
    writer.flush()?;

    let chart_path = output_path.join(&scenario.output.chart_file);
    chart::draw_chart(&chart_path, &scenario.chart_title(), table)
        .with_context(|| format!("Failed to draw chart {}", chart_path.display()))?;

    Ok(())
}

/// Read back a stack totals table written by [`DataWriter`]
pub fn read_stack_totals(file_path: &Path) -> Result<(Vec<StackID>, Vec<StackTotalsRow>)> {
    let mut reader = csv::Reader::from_path(file_path)?;
    let headers = reader.headers()?.clone();
    let mut columns = headers.iter();
    ensure!(
        columns.next() == Some(MONTH_COLUMN),
        "First column must be {MONTH_COLUMN}"
    );
    let stack_ids = columns.map(StackID::from).collect_vec();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut fields = record.iter();
        let month: u32 = fields
            .next()
            .context("Missing month")?
            .parse()
            .context("Invalid month")?;
        let totals: Vec<Money> = fields
            .map(|field| field.parse().map(Money))
            .try_collect()
            .with_context(|| format!("Invalid total for month {month}"))?;
        rows.push(StackTotalsRow { month, totals });
    }

    Ok((stack_ids, rows))
}
