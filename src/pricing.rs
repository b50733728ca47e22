//! The pricing catalog: one pure pricing function per vendor, parameterised by a rate card.
//!
//! Every function maps the month's [`Drivers`] to a dollar amount and cannot fail. Two profiles
//! of rates are bundled: a simple approximation and a realistic profile with tiered, volume-based
//! pricing. Both produce the same [`CostComponents`] record.
use crate::drivers::Drivers;
use crate::units::{Dimensionless, Money, MoneyPerGigabyte, MoneyPerTerabyte};
use anyhow::{Context, Result};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_string_enum::DeserializeLabeledStringEnum;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

pub mod bi;
pub mod ingestion;
pub mod tiers;
pub mod warehouse;
use bi::{PowerBiRates, QuickSightRates, TableauRates};
use ingestion::{AirbyteRates, FivetranMarRates, FivetranRates, FivetranVolumeRates};
use tiers::{SeatPlan, SeatTier, Tiers};
use warehouse::{
    BigQueryRates, DatabricksRates, FabricRates, RdsRates, RedshiftRates, SnowflakeCompute,
    SnowflakeRates, SqlServerRates, WarehouseProfile,
};

/// A named cost produced by exactly one pricing function each month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum Component {
    #[strum(serialize = "sql_total")]
    SqlServer,
    #[strum(serialize = "snowflake_total")]
    Snowflake,
    #[strum(serialize = "fabric_total")]
    Fabric,
    #[strum(serialize = "tableau_total")]
    Tableau,
    #[strum(serialize = "databricks_total")]
    Databricks,
    #[strum(serialize = "fivetran_total")]
    Fivetran,
    #[strum(serialize = "airbyte_ent_total")]
    AirbyteEnterprise,
    #[strum(serialize = "rds_total")]
    Rds,
    #[strum(serialize = "redshift_total")]
    Redshift,
    #[strum(serialize = "bigquery_total")]
    BigQuery,
    #[strum(serialize = "powerbi_total")]
    PowerBi,
    #[strum(serialize = "quicksight_total")]
    QuickSight,
}

impl<'de> Deserialize<'de> for Component {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Component::from_str(&name)
            .map_err(|_| de::Error::custom(format!("Unknown cost component: {name}")))
    }
}

impl Serialize for Component {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The cost of every component for a single month
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CostComponents {
    pub sql_total: Money,
    pub snowflake_total: Money,
    pub fabric_total: Money,
    pub tableau_total: Money,
    pub databricks_total: Money,
    pub fivetran_total: Money,
    pub airbyte_ent_total: Money,
    pub rds_total: Money,
    pub redshift_total: Money,
    pub bigquery_total: Money,
    pub powerbi_total: Money,
    pub quicksight_total: Money,
}

impl CostComponents {
    /// Get the cost of the specified component
    pub fn get(&self, component: Component) -> Money {
        match component {
            Component::SqlServer => self.sql_total,
            Component::Snowflake => self.snowflake_total,
            Component::Fabric => self.fabric_total,
            Component::Tableau => self.tableau_total,
            Component::Databricks => self.databricks_total,
            Component::Fivetran => self.fivetran_total,
            Component::AirbyteEnterprise => self.airbyte_ent_total,
            Component::Rds => self.rds_total,
            Component::Redshift => self.redshift_total,
            Component::BigQuery => self.bigquery_total,
            Component::PowerBi => self.powerbi_total,
            Component::QuickSight => self.quicksight_total,
        }
    }

    /// Iterate over every component and its cost
    pub fn iter(&self) -> impl Iterator<Item = (Component, Money)> + '_ {
        Component::iter().map(|component| (component, self.get(component)))
    }
}

/// The bundled set of rates used to price drivers
#[derive(DeserializeLabeledStringEnum, Debug, Clone, Copy, PartialEq, Default)]
pub enum PricingProfile {
    /// Simple linear approximations for every vendor
    #[string = "approximation"]
    Approximation,
    /// Tiered and volume-based pricing where vendors publish it
    #[default]
    #[string = "realistic"]
    Realistic,
}

/// The rates for every vendor in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateCard {
    pub sql_server: SqlServerRates,
    pub snowflake: SnowflakeRates,
    pub fabric: FabricRates,
    pub tableau: TableauRates,
    pub databricks: DatabricksRates,
    pub fivetran: FivetranRates,
    pub airbyte: AirbyteRates,
    pub rds: RdsRates,
    pub redshift: RedshiftRates,
    pub bigquery: BigQueryRates,
    pub powerbi: PowerBiRates,
    pub quicksight: QuickSightRates,
}

impl RateCard {
    /// The bundled rate card for the given profile
    pub fn for_profile(profile: PricingProfile) -> Self {
        match profile {
            PricingProfile::Approximation => Self::approximation(),
            PricingProfile::Realistic => Self::realistic(),
        }
    }

    /// Simple linear approximations
    pub fn approximation() -> Self {
        Self {
            sql_server: SqlServerRates {
                os_licence: Money(25.0 * 6.0),
                core_licence: Money(50.0 * 20.0),
                storage_per_gb: MoneyPerGigabyte(0.12),
                backup_per_gb: MoneyPerGigabyte(0.095),
                per_user: Money(2.0),
            },
            snowflake: SnowflakeRates {
                storage_per_tb: MoneyPerTerabyte(23.0),
                compute: SnowflakeCompute::QueryScaled {
                    gb_per_credit: 200.0,
                    credit_price: Money(4.0),
                },
                cloud_services_fraction: Dimensionless(0.10),
                per_user: Money(2.0),
            },
            fabric: FabricRates {
                capacity_fee: Tiers::new(&[(10000.0, Money(720.0))], Money(1440.0)),
                storage_per_gb: MoneyPerGigabyte(0.02),
                per_user: Money(2.0),
            },
            tableau: TableauRates {
                seats: SeatPlan {
                    tiers: vec![
                        SeatTier {
                            role: "creator".into(),
                            percent: 10,
                            price: Money(70.0),
                        },
                        SeatTier {
                            role: "explorer".into(),
                            percent: 40,
                            price: Money(42.0),
                        },
                    ],
                    remainder_role: "viewer".into(),
                    remainder_price: Money(15.0),
                },
            },
            databricks: DatabricksRates {
                gb_per_unit: 150.0,
                unit_price: Money(0.40),
                storage_per_gb: MoneyPerGigabyte(0.02),
                per_user: Money(2.5),
            },
            fivetran: FivetranRates::Volume(FivetranVolumeRates {
                per_gb: MoneyPerGigabyte(1.20),
                minimum: Money(350.0),
                surcharge: Money(75.0),
                history_per_gb: MoneyPerGigabyte(0.20),
                per_row: Money(0.000_015),
            }),
            airbyte: AirbyteRates {
                base_fee: Money(900.0),
                per_gb: MoneyPerGigabyte(0.30),
                per_row: Money(0.000_008),
                normalisation_per_gb: MoneyPerGigabyte(0.03),
            },
            rds: RdsRates {
                instance_hourly: Money(0.40),
                hours_per_month: 730.0,
                storage_per_gb: MoneyPerGigabyte(0.115),
                backup_per_gb: MoneyPerGigabyte(0.095),
                per_user: Money(0.40),
            },
            redshift: RedshiftRates {
                storage_per_tb: MoneyPerTerabyte(23.0),
                gb_per_rpu: 500.0,
                rpu_price: Money(0.36),
            },
            bigquery: BigQueryRates {
                storage_per_tb: MoneyPerTerabyte(20.0),
                scan_per_tb: MoneyPerTerabyte(5.0),
            },
            powerbi: PowerBiRates {
                capacity_fee: Tiers::new(&[(1000.0, Money(8000.0))], Money(15000.0)),
                per_user: Money(2.0),
            },
            quicksight: QuickSightRates {
                seats: SeatPlan {
                    tiers: vec![SeatTier {
                        role: "author".into(),
                        percent: 7,
                        price: Money(24.0),
                    }],
                    remainder_role: "reader".into(),
                    remainder_price: Money(5.0),
                },
            },
        }
    }

    /// Tiered and volume-based pricing.
    ///
    /// Snowflake compute is billed per virtual warehouse, Fivetran by monthly active rows and
    /// Airbyte no longer charges for normalisation. Other vendors match the approximation.
    pub fn realistic() -> Self {
        let warehouse = |credits_per_hour, hours_per_month| WarehouseProfile {
            credits_per_hour,
            hours_per_month,
            cost_per_credit: Money(3.0),
        };

        Self {
            snowflake: SnowflakeRates {
                storage_per_tb: MoneyPerTerabyte(23.0),
                compute: SnowflakeCompute::Warehouses {
                    warehouses: vec![
                        // Loading (S), dashboards (M) and ad hoc analysis (XS)
                        warehouse(2.0, 200.0),
                        warehouse(4.0, 160.0),
                        warehouse(1.0, 100.0),
                    ],
                },
                cloud_services_fraction: Dimensionless(0.10),
                per_user: Money(0.0),
            },
            fivetran: FivetranRates::MonthlyActiveRows(FivetranMarRates {
                price_per_thousand_rows: Tiers::new(
                    &[(5_000_000.0, Money(1.00)), (25_000_000.0, Money(0.70))],
                    Money(0.50),
                ),
                platform_minimum: Money(500.0),
                connectors: 12,
                per_connector: Money(100.0),
                history_fraction: Dimensionless(0.10),
            }),
            airbyte: AirbyteRates {
                normalisation_per_gb: MoneyPerGigabyte(0.0),
                ..Self::approximation().airbyte
            },
            ..Self::approximation()
        }
    }

    /// Price every component for one month's drivers
    pub fn price(&self, drivers: &Drivers) -> CostComponents {
        CostComponents {
            sql_total: self.sql_server.cost(drivers),
            snowflake_total: self.snowflake.cost(drivers),
            fabric_total: self.fabric.cost(drivers),
            tableau_total: self.tableau.cost(drivers),
            databricks_total: self.databricks.cost(drivers),
            fivetran_total: self.fivetran.cost(drivers),
            airbyte_ent_total: self.airbyte.cost(drivers),
            rds_total: self.rds.cost(drivers),
            redshift_total: self.redshift.cost(drivers),
            bigquery_total: self.bigquery.cost(drivers),
            powerbi_total: self.powerbi.cost(drivers),
            quicksight_total: self.quicksight.cost(drivers),
        }
    }

    /// Check the structure of tiered and per-seat rates
    pub fn validate(&self) -> Result<()> {
        self.fabric
            .capacity_fee
            .validate()
            .context("Invalid Fabric capacity fee")?;
        self.powerbi
            .capacity_fee
            .validate()
            .context("Invalid Power BI capacity fee")?;
        if let FivetranRates::MonthlyActiveRows(rates) = &self.fivetran {
            rates
                .price_per_thousand_rows
                .validate()
                .context("Invalid Fivetran MAR prices")?;
        }
        self.tableau
            .seats
            .validate()
            .context("Invalid Tableau seats")?;
        self.quicksight
            .seats
            .validate()
            .context("Invalid QuickSight seats")?;

        Ok(())
    }
}
