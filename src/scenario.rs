//! Code for loading scenarios, which describe everything needed to run a cost projection.
use crate::drivers::{DEFAULT_GROWTH_RATE, DEFAULT_USER_GROWTH_RATE, Drivers, GrowthModel};
use crate::input::{deserialise_table, input_err_msg, merge_toml_tables, read_toml};
use crate::pricing::{PricingProfile, RateCard};
use crate::stack::{Stack, StackDefinitions, build_stacks, default_stack_definitions};
use crate::units::Dimensionless;
use anyhow::{Context, Result, ensure};
use log::warn;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The name of the scenario file within a scenario directory
pub const SCENARIO_FILE_NAME: &str = "scenario.toml";

const DEFAULT_TABLE_FILE_NAME: &str = "stack_comparison_output.csv";
const DEFAULT_CHART_FILE_NAME: &str = "stack_cost_comparison.svg";

macro_rules! define_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            $value
        }
    };
}

define_param_default!(default_months, u32, 60);
define_param_default!(default_growth_rate, f64, DEFAULT_GROWTH_RATE);
define_param_default!(default_user_growth_rate, f64, DEFAULT_USER_GROWTH_RATE);
define_param_default!(default_table_file, PathBuf, DEFAULT_TABLE_FILE_NAME.into());
define_param_default!(default_chart_file, PathBuf, DEFAULT_CHART_FILE_NAME.into());

/// Where results are written, relative to the output directory
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputOptions {
    /// The CSV file for the monthly stack totals
    #[serde(default = "default_table_file")]
    pub table_file: PathBuf,
    /// The SVG file for the comparison chart
    #[serde(default = "default_chart_file")]
    pub chart_file: PathBuf,
    /// Title for the chart. A default is generated from the horizon if not given.
    #[serde(default)]
    pub chart_title: Option<String>,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            table_file: default_table_file(),
            chart_file: default_chart_file(),
            chart_title: None,
        }
    }
}

/// Represents the contents of a scenario file. Every key is optional.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct ScenarioFile {
    /// The number of months to project
    #[serde(default = "default_months")]
    months: u32,
    /// Which bundled rate card to start from
    #[serde(default)]
    pricing_profile: PricingProfile,
    /// Monthly growth factor for volumes and the row-change rate
    #[serde(default = "default_growth_rate")]
    growth_rate: f64,
    /// Monthly growth factor for users
    #[serde(default = "default_user_growth_rate")]
    user_growth_rate: f64,
    /// Driver values for the first month
    #[serde(default)]
    drivers: Drivers,
    /// The stacks to compare
    #[serde(default = "default_stack_definitions")]
    stacks: StackDefinitions,
    /// Overrides for individual rates in the chosen profile
    #[serde(default)]
    rates: toml::Table,
    #[serde(default)]
    output: OutputOptions,
}

/// Everything needed to run a cost projection
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    /// The number of months to project
    pub months: u32,
    /// Driver values for the first month
    pub initial_drivers: Drivers,
    /// How drivers grow each month
    pub growth: GrowthModel,
    /// Rates for every vendor
    pub rates: RateCard,
    /// The stacks to compare, in output order
    pub stacks: Vec<Stack>,
    /// Output file locations
    pub output: OutputOptions,
}

/// Build the rate card for a profile with any overrides applied
fn build_rate_card(profile: PricingProfile, overrides: toml::Table) -> Result<RateCard> {
    let rates = RateCard::for_profile(profile);
    if overrides.is_empty() {
        return Ok(rates);
    }

    let mut table: toml::Table = toml::from_str(&toml::to_string(&rates)?)?;
    merge_toml_tables(&mut table, overrides);
    let rates: RateCard = deserialise_table(&table).context("Invalid rate overrides")?;

    Ok(rates)
}

impl Scenario {
    /// Read a scenario from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `scenario_dir` - Folder containing `scenario.toml`
    ///
    /// # Returns
    ///
    /// The scenario or an error if the file is missing or invalid
    pub fn from_path<P: AsRef<Path>>(scenario_dir: P) -> Result<Scenario> {
        let file_path = scenario_dir.as_ref().join(SCENARIO_FILE_NAME);
        let file: ScenarioFile = read_toml(&file_path)?;
        Self::from_file(file).with_context(|| input_err_msg(&file_path))
    }

    /// The built-in scenario, used when no scenario file is given
    pub fn builtin() -> Result<Scenario> {
        Self::from_toml_str("").context("Invalid built-in scenario")
    }

    /// Read a scenario from a TOML string
    pub fn from_toml_str(raw: &str) -> Result<Scenario> {
        let file: ScenarioFile = toml::from_str(raw)?;
        Self::from_file(file)
    }

    /// Validate the file contents and build the scenario
    fn from_file(file: ScenarioFile) -> Result<Scenario> {
        ensure!(
            file.drivers.concurrency >= 1,
            "concurrency must be at least 1"
        );
        if file.months == 0 {
            warn!("The scenario has a horizon of zero months; no costs will be projected");
        }

        let rates = build_rate_card(file.pricing_profile, file.rates)?;
        rates.validate()?;
        let stacks = build_stacks(&file.stacks).context("Invalid stack definitions")?;

        Ok(Scenario {
            months: file.months,
            initial_drivers: file.drivers,
            growth: GrowthModel {
                growth_rate: Dimensionless(file.growth_rate),
                user_growth_rate: Dimensionless(file.user_growth_rate),
            },
            rates,
            stacks,
            output: file.output,
        })
    }

    /// The title to use for the comparison chart
    pub fn chart_title(&self) -> String {
        self.output.chart_title.clone().unwrap_or_else(|| {
            format!(
                "{} Month Cost Projection with Updated Pricing Assumptions",
                self.months
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use crate::pricing::Component;
    use crate::pricing::ingestion::FivetranRates;
    use crate::pricing::warehouse::SnowflakeCompute;
    use crate::units::{Gigabytes, Money};
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_scenario() {
        let scenario = Scenario::builtin().unwrap();
        assert_eq!(scenario.months, 60);
        assert_eq!(scenario.initial_drivers, Drivers::default());
        assert_eq!(scenario.growth, GrowthModel::default());
        assert_eq!(scenario.rates, RateCard::realistic());
        assert_eq!(scenario.stacks.len(), 5);
        assert_eq!(scenario.output, OutputOptions::default());
        assert_eq!(
            scenario.chart_title(),
            "60 Month Cost Projection with Updated Pricing Assumptions"
        );
    }

    #[test]
    fn test_scenario_from_path() {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(SCENARIO_FILE_NAME)).unwrap();
            writeln!(
                file,
                "months = 24
pricing_profile = \"approximation\"
growth_rate = 1.02

[drivers]
database_size_gb = 100.0
num_users = 20

[stacks]
Cheap = [\"bigquery_total\", \"quicksight_total\"]

[output]
chart_title = \"Two years\""
            )
            .unwrap();
        }

        let scenario = Scenario::from_path(dir.path()).unwrap();
        assert_eq!(scenario.months, 24);
        assert_eq!(scenario.growth.growth_rate, Dimensionless(1.02));
        assert_eq!(
            scenario.growth.user_growth_rate,
            Dimensionless(DEFAULT_USER_GROWTH_RATE)
        );
        assert_eq!(scenario.initial_drivers.database_size_gb, Gigabytes(100.0));
        assert_eq!(scenario.initial_drivers.num_users, 20);
        assert_eq!(scenario.initial_drivers.concurrency, 8);
        assert_eq!(scenario.rates, RateCard::approximation());
        assert_eq!(scenario.stacks.len(), 1);
        assert_eq!(
            scenario.stacks[0].components.iter().copied().collect::<Vec<_>>(),
            [Component::BigQuery, Component::QuickSight]
        );
        assert_eq!(scenario.chart_title(), "Two years");
    }

    #[test]
    fn test_scenario_from_path_missing() {
        let dir = tempdir().unwrap();
        assert!(Scenario::from_path(dir.path()).is_err());
    }

    #[test]
    fn test_unknown_component() {
        let result = Scenario::from_toml_str("[stacks]\nBad = [\"snowflake_total\", \"looker\"]");
        let message = format!("{:#}", result.unwrap_err());
        assert!(
            message.contains("Unknown cost component: looker"),
            "Unexpected error: {message}"
        );
    }

    #[test]
    fn test_unknown_key() {
        assert!(Scenario::from_toml_str("monthz = 3").is_err());
    }

    #[test]
    fn test_zero_concurrency() {
        assert_error!(
            Scenario::from_toml_str("[drivers]\nconcurrency = 0"),
            "concurrency must be at least 1"
        );
    }

    #[test]
    fn test_invalid_stacks() {
        assert_error!(
            Scenario::from_toml_str("[stacks]\nEmpty = []"),
            "Invalid stack definitions"
        );
    }

    #[test]
    fn test_rate_overrides() {
        let scenario = Scenario::from_toml_str(
            "[rates.tableau.seats]
remainder_price = 12.0

[rates.fivetran]
connectors = 3

[rates.snowflake.compute]
warehouses = [{credits_per_hour = 8.0, hours_per_month = 10.0, cost_per_credit = 2.0}]",
        )
        .unwrap();

        let rates = scenario.rates;
        assert_eq!(rates.tableau.seats.remainder_price, Money(12.0));
        assert_eq!(rates.tableau.seats.tiers[0].price, Money(70.0));
        match rates.fivetran {
            FivetranRates::MonthlyActiveRows(mar) => {
                assert_eq!(mar.connectors, 3);
                assert_eq!(mar.per_connector, Money(100.0));
            }
            FivetranRates::Volume(_) => panic!("Expected MAR pricing"),
        }
        match rates.snowflake.compute {
            SnowflakeCompute::Warehouses { warehouses } => {
                assert_eq!(warehouses.len(), 1);
                assert_eq!(warehouses[0].monthly_cost(), Money(160.0));
            }
            SnowflakeCompute::QueryScaled { .. } => panic!("Expected warehouse pricing"),
        }
    }

    #[test]
    fn test_rate_override_switches_model() {
        let scenario = Scenario::from_toml_str(
            "[rates.snowflake.compute]
model = \"query_scaled\"
gb_per_credit = 100.0
credit_price = 3.0",
        )
        .unwrap();
        assert_eq!(
            scenario.rates.snowflake.compute,
            SnowflakeCompute::QueryScaled {
                gb_per_credit: 100.0,
                credit_price: Money(3.0)
            }
        );
    }

    #[test]
    fn test_rate_override_switches_fivetran_to_volume() {
        let scenario = Scenario::from_toml_str(
            "[rates.fivetran]
model = \"volume\"
per_gb = 1.2
minimum = 350.0
surcharge = 75.0
history_per_gb = 0.2
per_row = 0.000015",
        )
        .unwrap();
        assert_eq!(scenario.rates.fivetran, RateCard::approximation().fivetran);
    }

    #[test]
    fn test_rate_override_switches_fivetran_to_mar() {
        let scenario = Scenario::from_toml_str(
            "pricing_profile = \"approximation\"

[rates.fivetran]
model = \"monthly_active_rows\"
platform_minimum = 500.0
connectors = 2
per_connector = 100.0
history_fraction = 0.1

[rates.fivetran.price_per_thousand_rows]
bands = [{below = 5000000.0, value = 1.0}]
otherwise = 0.5",
        )
        .unwrap();

        match scenario.rates.fivetran {
            FivetranRates::MonthlyActiveRows(mar) => {
                assert_eq!(mar.connectors, 2);
                assert_eq!(mar.platform_minimum, Money(500.0));
                assert_eq!(mar.price_per_thousand_rows.lookup(1.0), Money(1.0));
                assert_eq!(mar.price_per_thousand_rows.lookup(5e6), Money(0.5));
            }
            FivetranRates::Volume(_) => panic!("Expected MAR pricing"),
        }
    }

    #[test]
    fn test_rate_override_switch_needs_every_field() {
        // Fields of the old model aren't carried over
        assert_error!(
            Scenario::from_toml_str("[rates.fivetran]\nmodel = \"volume\"\nper_gb = 1.2"),
            "Invalid rate overrides"
        );
    }

    #[test]
    fn test_rate_override_unknown_field() {
        assert_error!(
            Scenario::from_toml_str("[rates.bigquery]\nscan_per_pb = 5000.0"),
            "Invalid rate overrides"
        );
    }
}
